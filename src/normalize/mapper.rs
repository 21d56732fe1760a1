//! The normalizer proper: section-by-section flattening into the
//! canonical map.

use crate::fields::{CanonicalFieldMap, FieldValue};
use crate::normalize::{aliases, dates};
use crate::schema::{value_text, MedicalHistory, RawExtraction};
use crate::teeth::{RestorationCode, SurgeryCode, ToothCondition, ToothFinding};
use chrono::NaiveDate;
use serde_json::Value;

/// Patient section keys holding dates.
const PATIENT_DATE_KEYS: [&str; 2] = ["birthdate", "effectiveDate"];

/// Flattens [`RawExtraction`] pages into a [`CanonicalFieldMap`].
///
/// Carries the reference date used to pivot two-digit years so that
/// normalization is reproducible in tests.
pub struct Normalizer {
    today: NaiveDate,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    /// Normalizer pivoting dates on the current local date.
    pub fn new() -> Self {
        Self {
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Normalizer pivoting dates on a fixed reference date.
    pub fn with_reference_date(today: NaiveDate) -> Self {
        Self { today }
    }

    /// The reference date in use.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Flatten one merged extraction into the canonical field map.
    pub fn normalize(&self, raw: &RawExtraction) -> CanonicalFieldMap {
        let mut map = CanonicalFieldMap::new();

        if let Some(patient) = &raw.patient {
            self.flatten_scalars(&mut map, patient, &PATIENT_DATE_KEYS);
            self.propagate_identity(&mut map, patient);
        }
        if let Some(history) = &raw.dental_history {
            self.flatten_scalars(&mut map, history, &["lastDentalVisit"]);
        }
        if let Some(medical) = &raw.medical_history {
            self.flatten_medical_history(&mut map, medical);
        }

        self.aggregate_findings(&mut map, &raw.tooth_findings);
        if !raw.tooth_findings.is_empty() {
            map.insert(
                "toothFindings".to_string(),
                FieldValue::Teeth(raw.tooth_findings.clone()),
            );
        }

        if let Some(periodontal) = &raw.periodontal {
            for (key, value) in periodontal {
                if key == "initial" {
                    insert_text(&mut map, "periodontalInitial", value_text(value));
                } else {
                    map.insert(key.clone(), FieldValue::Text(tri_state(value).to_string()));
                }
            }
        }

        if let Some(occlusion) = &raw.occlusion {
            if let Some(class) = &occlusion.molar_class {
                insert_text(&mut map, "occlusionClass", class.clone());
            }
            for (key, flag) in [
                ("overjet", occlusion.overjet),
                ("overbite", occlusion.overbite),
                ("midlineDeviation", occlusion.midline_deviation),
                ("crossbite", occlusion.crossbite),
            ] {
                if flag == Some(true) {
                    map.insert(key.to_string(), FieldValue::Text("Present".to_string()));
                }
            }
        }

        if let Some(appliances) = &raw.appliances {
            if appliances.orthodontic == Some(true) {
                map.insert("orthodontic".to_string(), FieldValue::Text("Present".to_string()));
            }
            if appliances.stayplate == Some(true) {
                map.insert("stayplate".to_string(), FieldValue::Text("Present".to_string()));
            }
            if let Some(others) = &appliances.others {
                insert_text(&mut map, "otherAppliances", others.clone());
            }
        }

        if let Some(tmd) = &raw.tmd {
            for (key, value) in tmd {
                map.insert(key.clone(), FieldValue::Text(tri_state(value).to_string()));
            }
        }

        for (canonical, section) in [
            ("treatmentInitial", &raw.treatment),
            ("drugsInitial", &raw.drugs_medication),
            ("planChangesInitial", &raw.changes_in_plan),
            ("radiographInitial", &raw.radiograph),
            ("removalInitial", &raw.removal_of_teeth),
            ("crownsInitial", &raw.crowns_bridges),
            ("rootCanalInitial", &raw.endodontics),
            ("fillingsInitial", &raw.fillings),
            ("denturesInitial", &raw.dentures),
        ] {
            if let Some(initial) = section.as_ref().and_then(|s| s.initial.clone()) {
                insert_text(&mut map, canonical, initial);
            }
        }

        if let Some(signature) = &raw.patient_signature {
            insert_text(&mut map, "patientSignature", signature.clone());
        }
        if let Some(signature) = &raw.dentist_signature {
            insert_text(&mut map, "dentistSignature", signature.clone());
        }
        if let Some(date) = &raw.date {
            let iso = dates::to_iso_date(&value_text(date), self.today);
            insert_text(&mut map, "signatureDate", iso);
        }

        if !raw.treatment_record.is_empty() {
            map.insert(
                "treatmentRecord".to_string(),
                FieldValue::Records(raw.treatment_record.clone()),
            );
            self.flatten_last_record(&mut map, raw);
        }

        log::debug!("normalized {} canonical fields", map.len());
        map
    }

    fn flatten_scalars(
        &self,
        map: &mut CanonicalFieldMap,
        section: &indexmap::IndexMap<String, Value>,
        date_keys: &[&str],
    ) {
        for (key, value) in section {
            let canonical = aliases::canonical_for(key);
            if date_keys.contains(&key.as_str()) {
                let iso = dates::to_iso_date(&value_text(value), self.today);
                insert_text(map, canonical, iso);
            } else {
                map.insert(canonical.to_string(), scalar_value(value));
            }
        }
    }

    /// Derive the full name, gender letter, and the per-page copies of
    /// the identity header fields.
    fn propagate_identity(
        &self,
        map: &mut CanonicalFieldMap,
        patient: &indexmap::IndexMap<String, Value>,
    ) {
        let get = |key: &str| {
            patient
                .get(key)
                .map(value_text)
                .unwrap_or_default()
                .trim()
                .to_string()
        };

        let last = get("lastName");
        let first = get("firstName");
        let middle = get("middleName");
        if !last.is_empty() || !first.is_empty() {
            let full = format!("{}, {} {}", last, first, middle).trim().to_string();
            insert_text(map, "fullName", full.clone());
            insert_text(map, "chartPatientName", full.clone());
            insert_text(map, "treatmentPatientName", full);
        }

        let age = get("age");
        if !age.is_empty() {
            insert_text(map, "chartAge", age.clone());
            insert_text(map, "treatmentAge", age);
        }

        let sex = get("sex");
        if !sex.is_empty() {
            let gender = if sex == "Male" || sex == "M" { "M" } else { "F" };
            insert_text(map, "gender", gender.to_string());
            insert_text(map, "chartGender", gender.to_string());
            insert_text(map, "treatmentGender", gender.to_string());
        }
    }

    fn flatten_medical_history(&self, map: &mut CanonicalFieldMap, medical: &MedicalHistory) {
        for (key, value) in &medical.scalars {
            let canonical = aliases::canonical_for(key);
            insert_text(map, canonical, value_text(value));
        }
        for (key, value) in &medical.allergies {
            map.insert(format!("allergy_{}", key), FieldValue::Bool(is_yes(value)));
        }
        for (key, value) in &medical.for_women_only {
            insert_text(map, &format!("women_{}", key), value_text(value));
        }
        for (key, value) in &medical.medical_conditions {
            insert_text(map, &format!("condition_{}", key), value_text(value));
        }
    }

    /// Derive the comma-joined tooth number summaries for the chart
    /// legend. A summary is only emitted when at least one tooth
    /// matches.
    fn aggregate_findings(&self, map: &mut CanonicalFieldMap, findings: &[ToothFinding]) {
        let by_condition = |want: &[ToothCondition]| {
            findings
                .iter()
                .filter(|f| f.condition.map(|c| want.contains(&c)).unwrap_or(false))
                .map(|f| f.tooth_number.clone())
                .collect::<Vec<_>>()
        };
        let by_surgery = |want: SurgeryCode| {
            findings
                .iter()
                .filter(|f| f.surgeries.contains(&want))
                .map(|f| f.tooth_number.clone())
                .collect::<Vec<_>>()
        };
        let by_restoration = |want: &[RestorationCode]| {
            findings
                .iter()
                .filter(|f| f.restorations.iter().any(|r| want.contains(r)))
                .map(|f| f.tooth_number.clone())
                .collect::<Vec<_>>()
        };

        let summaries: [(&str, Vec<String>); 13] = [
            ("presentTeeth", by_condition(&[ToothCondition::Present])),
            ("decayedTeeth", by_condition(&[ToothCondition::Decayed])),
            (
                "missingTeeth",
                by_condition(&[ToothCondition::MissingCaries, ToothCondition::MissingOther]),
            ),
            ("impactedTeeth", by_condition(&[ToothCondition::Impacted])),
            ("rootFragments", by_condition(&[ToothCondition::RootFragment])),
            ("extractionCaries", by_surgery(SurgeryCode::ExtractionCaries)),
            ("extractionOther", by_surgery(SurgeryCode::ExtractionOther)),
            ("amalgamFilling", by_restoration(&[RestorationCode::Amalgam])),
            ("compositeFilling", by_restoration(&[RestorationCode::Composite])),
            ("jacketCrown", by_restoration(&[RestorationCode::JacketCrown])),
            (
                "inlayImplant",
                by_restoration(&[RestorationCode::Inlay, RestorationCode::Implant]),
            ),
            ("sealants", by_restoration(&[RestorationCode::Sealant])),
            (
                "removableDentures",
                by_restoration(&[RestorationCode::RemovableDenture]),
            ),
        ];

        for (key, teeth) in summaries {
            if !teeth.is_empty() {
                map.insert(key.to_string(), FieldValue::Text(teeth.join(", ")));
            }
        }
    }

    /// Flatten the most recent treatment row into scalar fields so it
    /// pre-fills the current row of the table.
    fn flatten_last_record(&self, map: &mut CanonicalFieldMap, raw: &RawExtraction) {
        let Some(last) = raw.treatment_record.last() else {
            return;
        };
        if let Some(date) = &last.date {
            insert_text(map, "treatmentDate", dates::to_iso_date(date, self.today));
        }
        if let Some(teeth) = &last.tooth_quantity {
            insert_text(map, "toothNumbers", teeth.clone());
        }
        if let Some(procedure) = &last.procedure {
            insert_text(map, "procedure", procedure.clone());
        }
        if let Some(dentist) = &last.dentist {
            insert_text(map, "dentistName", dentist.clone());
        }
        if let Some(charged) = &last.amount_charged {
            insert_text(map, "amountCharged", value_text(charged));
        }
        if let Some(paid) = &last.amount_paid {
            insert_text(map, "amountPaid", value_text(paid));
        }
        if let Some(balance) = &last.balance {
            insert_text(map, "balance", value_text(balance));
        }
        if let Some(next) = &last.next_appointment {
            insert_text(map, "nextAppointment", dates::to_iso_date(next, self.today));
        }
    }
}

fn insert_text(map: &mut CanonicalFieldMap, key: &str, value: String) {
    map.insert(key.to_string(), FieldValue::Text(value));
}

/// Numeric scalars keep their type so display can trim float noise.
fn scalar_value(value: &Value) -> FieldValue {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(n) => FieldValue::Number(n),
            None => FieldValue::Text(value_text(value)),
        },
        _ => FieldValue::Text(value_text(value)),
    }
}

/// Affirmative checkbox reading of a raw scalar.
fn is_yes(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("yes") || s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn is_no(value: &Value) -> bool {
    match value {
        Value::Bool(b) => !*b,
        Value::String(s) => s.eq_ignore_ascii_case("no") || s.eq_ignore_ascii_case("false"),
        _ => false,
    }
}

/// Screening answers render as a tri-state word.
fn tri_state(value: &Value) -> &'static str {
    if is_yes(value) {
        "present"
    } else if is_no(value) {
        "absent"
    } else {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::with_reference_date(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap())
    }

    fn normalize(json: &str) -> CanonicalFieldMap {
        let raw = RawExtraction::from_json(json).unwrap();
        normalizer().normalize(&raw)
    }

    #[test]
    fn test_patient_dates_coerced() {
        let map = normalize(r#"{"patient":{"birthdate":"3/4/99","effectiveDate":"01/15/25"}}"#);
        assert_eq!(map["birthdate"].as_display(), "1999-03-04");
        assert_eq!(map["effectiveDate"].as_display(), "2025-01-15");
    }

    #[test]
    fn test_identity_propagation() {
        let map = normalize(
            r#"{"patient":{
                "lastName":"Dela Cruz","firstName":"Juan","middleName":"Santos",
                "age":34,"sex":"Male"
            }}"#,
        );
        assert_eq!(map["fullName"].as_display(), "Dela Cruz, Juan Santos");
        assert_eq!(map["chartPatientName"].as_display(), "Dela Cruz, Juan Santos");
        assert_eq!(map["treatmentPatientName"].as_display(), "Dela Cruz, Juan Santos");
        assert_eq!(map["chartAge"].as_display(), "34");
        assert_eq!(map["treatmentAge"].as_display(), "34");
        assert_eq!(map["chartGender"].as_display(), "M");
        assert_eq!(map["treatmentGender"].as_display(), "M");
    }

    #[test]
    fn test_female_gender_letter() {
        let map = normalize(r#"{"patient":{"sex":"Female"}}"#);
        assert_eq!(map["gender"].as_display(), "F");
    }

    #[test]
    fn test_source_keys_reconciled() {
        let map = normalize(
            r#"{"patient":{"homeNo":"555-0101"},
                "medicalHistory":{"useAlcoholDrugs":"No","medicationDetails":"Metformin"}}"#,
        );
        assert_eq!(map["homePhone"].as_display(), "555-0101");
        assert_eq!(map["substanceUse"].as_display(), "No");
        assert_eq!(map["medicationList"].as_display(), "Metformin");
        assert!(!map.contains_key("homeNo"));
    }

    #[test]
    fn test_numeric_scalars_keep_their_type() {
        let map = normalize(r#"{"patient":{"age":26,"lastName":"Santos"}}"#);
        assert_eq!(map["age"], FieldValue::Number(26.0));
        assert_eq!(map["age"].as_display(), "26");
        assert!(matches!(map["lastName"], FieldValue::Text(_)));
    }

    #[test]
    fn test_allergy_checkboxes_become_bools() {
        let map = normalize(
            r#"{"medicalHistory":{"allergies":{"penicillin":"Yes","latex":"No"}}}"#,
        );
        assert_eq!(map["allergy_penicillin"], FieldValue::Bool(true));
        assert_eq!(map["allergy_latex"], FieldValue::Bool(false));
    }

    #[test]
    fn test_women_and_condition_prefixes() {
        let map = normalize(
            r#"{"medicalHistory":{
                "forWomenOnly":{"pregnant":"No"},
                "medicalConditions":{"diabetes":true}
            }}"#,
        );
        assert_eq!(map["women_pregnant"].as_display(), "No");
        assert_eq!(map["condition_diabetes"].as_display(), "true");
    }

    #[test]
    fn test_tooth_summaries() {
        let map = normalize(
            r#"{"ToothFinding":[
                {"toothNumber":"18","condition":"DECAYED"},
                {"toothNumber":"17","condition":"MISSING_CARIES"},
                {"toothNumber":"27","condition":"MISSING_OTHER"},
                {"toothNumber":"16","restorations":["AM"]},
                {"toothNumber":"26","restorations":["IMP"]},
                {"toothNumber":"36","surgeries":["EXTRACTION_CARIES"]},
                {"toothNumber":"11","condition":"PRESENT"}
            ]}"#,
        );
        assert_eq!(map["decayedTeeth"].as_display(), "18");
        assert_eq!(map["missingTeeth"].as_display(), "17, 27");
        assert_eq!(map["amalgamFilling"].as_display(), "16");
        assert_eq!(map["inlayImplant"].as_display(), "26");
        assert_eq!(map["extractionCaries"].as_display(), "36");
        assert_eq!(map["presentTeeth"].as_display(), "11");
        // No sealants recorded, so no summary field at all
        assert!(!map.contains_key("sealants"));
    }

    #[test]
    fn test_findings_preserved() {
        let map = normalize(r#"{"ToothFinding":[{"toothNumber":"18","condition":"DECAYED"}]}"#);
        match &map["toothFindings"] {
            FieldValue::Teeth(teeth) => assert_eq!(teeth[0].tooth_number, "18"),
            other => panic!("expected teeth, got {:?}", other),
        }
    }

    #[test]
    fn test_periodontal_tri_state_and_initial() {
        let map = normalize(
            r#"{"periodontal":{"gingivitis":true,"recession":false,"mobility":"?","initial":"JDC"}}"#,
        );
        assert_eq!(map["gingivitis"].as_display(), "present");
        assert_eq!(map["recession"].as_display(), "absent");
        assert_eq!(map["mobility"].as_display(), "unknown");
        assert_eq!(map["periodontalInitial"].as_display(), "JDC");
    }

    #[test]
    fn test_occlusion_and_appliances() {
        let map = normalize(
            r#"{"occlusion":{"molarClass":"Class I","overjet":true,"overbite":false},
                "appliances":{"orthodontic":true,"others":"Retainer"}}"#,
        );
        assert_eq!(map["occlusionClass"].as_display(), "Class I");
        assert_eq!(map["overjet"].as_display(), "Present");
        assert!(!map.contains_key("overbite"));
        assert_eq!(map["orthodontic"].as_display(), "Present");
        assert_eq!(map["otherAppliances"].as_display(), "Retainer");
    }

    #[test]
    fn test_consent_initials() {
        let map = normalize(
            r#"{"treatment":{"initial":"JD"},
                "endodontics":{"initial":"JD"},
                "changesInPlan":{"initial":"JD"},
                "patientSignature":"Juan Dela Cruz",
                "date":"6/1/25"}"#,
        );
        assert_eq!(map["treatmentInitial"].as_display(), "JD");
        assert_eq!(map["rootCanalInitial"].as_display(), "JD");
        assert_eq!(map["planChangesInitial"].as_display(), "JD");
        assert_eq!(map["patientSignature"].as_display(), "Juan Dela Cruz");
        assert_eq!(map["signatureDate"].as_display(), "2025-06-01");
    }

    #[test]
    fn test_last_record_flattened() {
        let map = normalize(
            r#"{"treatmentRecord":[
                {"date":"01/05/24","procedure":"Cleaning"},
                {"date":"02/10/24","toothNumber":"36","procedure":"Extraction",
                 "dentist":"Dr. Reyes","amountCharged":1500,"amountPaid":"500",
                 "nextVisit":"03/10/24"}
            ]}"#,
        );
        assert_eq!(map["treatmentDate"].as_display(), "2024-02-10");
        assert_eq!(map["toothNumbers"].as_display(), "36");
        assert_eq!(map["procedure"].as_display(), "Extraction");
        assert_eq!(map["dentistName"].as_display(), "Dr. Reyes");
        assert_eq!(map["amountCharged"].as_display(), "1500");
        assert_eq!(map["amountPaid"].as_display(), "500");
        assert_eq!(map["nextAppointment"].as_display(), "2024-03-10");
        match &map["treatmentRecord"] {
            FieldValue::Records(records) => assert_eq!(records.len(), 2),
            other => panic!("expected records, got {:?}", other),
        }
    }
}
