//! Typed boundary for extractor output.
//!
//! Upstream form extraction produces loosely structured JSON whose field
//! names have drifted across schema revisions. Sections with stable
//! structure (tooth findings, treatment records, occlusion, appliances,
//! consent initials) are fully typed; free-form scalar sections keep their
//! source keys in ordered maps and are reconciled by the normalizer.
//! Unknown fields are ignored everywhere. Malformed entries inside the
//! per-item lists are skipped, never fatal.

use crate::teeth::ToothFinding;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One page (or a merge of pages) of extracted form data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExtraction {
    /// Patient information record scalars
    #[serde(default)]
    pub patient: Option<IndexMap<String, Value>>,
    /// Dental history scalars
    #[serde(default)]
    pub dental_history: Option<IndexMap<String, Value>>,
    /// Medical history questionnaire
    #[serde(default)]
    pub medical_history: Option<MedicalHistory>,
    /// Per-tooth chart findings
    #[serde(default, rename = "ToothFinding", deserialize_with = "lenient_list")]
    pub tooth_findings: Vec<ToothFinding>,
    /// Periodontal screening tri-states (plus the consent initial)
    #[serde(default)]
    pub periodontal: Option<IndexMap<String, Value>>,
    /// Occlusion findings
    #[serde(default)]
    pub occlusion: Option<Occlusion>,
    /// Appliance findings
    #[serde(default)]
    pub appliances: Option<Appliances>,
    /// TMD screening tri-states
    #[serde(default)]
    pub tmd: Option<IndexMap<String, Value>>,
    /// Consent to treatment
    #[serde(default)]
    pub treatment: Option<ConsentSection>,
    /// Consent to drugs and medication
    #[serde(default)]
    pub drugs_medication: Option<ConsentSection>,
    /// Consent to changes in treatment plan
    #[serde(default)]
    pub changes_in_plan: Option<ConsentSection>,
    /// Consent to radiographs
    #[serde(default)]
    pub radiograph: Option<ConsentSection>,
    /// Consent to removal of teeth
    #[serde(default)]
    pub removal_of_teeth: Option<ConsentSection>,
    /// Consent to crowns and bridges
    #[serde(default)]
    pub crowns_bridges: Option<ConsentSection>,
    /// Consent to endodontic treatment
    #[serde(default)]
    pub endodontics: Option<ConsentSection>,
    /// Consent to filling materials
    #[serde(default)]
    pub fillings: Option<ConsentSection>,
    /// Consent to dentures
    #[serde(default)]
    pub dentures: Option<ConsentSection>,
    /// Patient signature text
    #[serde(default)]
    pub patient_signature: Option<String>,
    /// Dentist signature text
    #[serde(default)]
    pub dentist_signature: Option<String>,
    /// Signature date as written on the form
    #[serde(default)]
    pub date: Option<Value>,
    /// Treatment record rows
    #[serde(default, deserialize_with = "lenient_list")]
    pub treatment_record: Vec<TreatmentRecord>,
}

/// Medical history: scalar answers plus three nested checkbox maps.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalHistory {
    /// Allergy checkboxes, e.g. penicillin, aspirin
    #[serde(default)]
    pub allergies: IndexMap<String, Value>,
    /// Women-only questions
    #[serde(default)]
    pub for_women_only: IndexMap<String, Value>,
    /// Medical condition grid checkboxes
    #[serde(default)]
    pub medical_conditions: IndexMap<String, Value>,
    /// Everything else in the section
    #[serde(flatten)]
    pub scalars: IndexMap<String, Value>,
}

/// Occlusion findings from the chart page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occlusion {
    /// Angle molar classification
    #[serde(default)]
    pub molar_class: Option<String>,
    /// Overjet present
    #[serde(default)]
    pub overjet: Option<bool>,
    /// Overbite present
    #[serde(default)]
    pub overbite: Option<bool>,
    /// Midline deviation present
    #[serde(default)]
    pub midline_deviation: Option<bool>,
    /// Crossbite present
    #[serde(default)]
    pub crossbite: Option<bool>,
}

/// Appliance findings from the chart page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appliances {
    /// Orthodontic appliance present
    #[serde(default)]
    pub orthodontic: Option<bool>,
    /// Stayplate present
    #[serde(default)]
    pub stayplate: Option<bool>,
    /// Free-text other appliances
    #[serde(default)]
    pub others: Option<String>,
}

/// A consent paragraph's captured initials.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsentSection {
    /// Patient initials for the paragraph
    #[serde(default)]
    pub initial: Option<String>,
}

/// One row of the treatment record table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentRecord {
    /// Treatment date as written
    #[serde(default)]
    pub date: Option<String>,
    /// Tooth number or numbers treated
    #[serde(default, alias = "toothNumber", alias = "tooth")]
    pub tooth_quantity: Option<String>,
    /// Procedure performed
    #[serde(default, alias = "treatment")]
    pub procedure: Option<String>,
    /// Treating dentist
    #[serde(default)]
    pub dentist: Option<String>,
    /// Amount charged (number or string in source data)
    #[serde(default)]
    pub amount_charged: Option<Value>,
    /// Amount paid
    #[serde(default)]
    pub amount_paid: Option<Value>,
    /// Remaining balance
    #[serde(default)]
    pub balance: Option<Value>,
    /// Next appointment date
    #[serde(default, alias = "nextVisit")]
    pub next_appointment: Option<String>,
}

impl TreatmentRecord {
    /// True when no cell carries data.
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.tooth_quantity.is_none()
            && self.procedure.is_none()
            && self.dentist.is_none()
            && self.amount_charged.is_none()
            && self.amount_paid.is_none()
            && self.balance.is_none()
            && self.next_appointment.is_none()
    }
}

/// Render a scalar JSON value the way it reads on the form.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Deserialize a list item by item, dropping entries that fail to parse.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let raw: Vec<Value> = Vec::deserialize(deserializer)?;
    let mut parsed = Vec::with_capacity(raw.len());
    for entry in raw {
        match serde_json::from_value::<T>(entry) {
            Ok(item) => parsed.push(item),
            Err(e) => log::warn!("skipping malformed list entry: {}", e),
        }
    }
    Ok(parsed)
}

impl RawExtraction {
    /// Parse one page of extractor JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Merge another page into this one. Sections present in `other`
    /// replace the same section here, matching the page-by-page upload
    /// flow where later pages win.
    pub fn merge(&mut self, other: RawExtraction) {
        fn take<T>(dst: &mut Option<T>, src: Option<T>) {
            if src.is_some() {
                *dst = src;
            }
        }

        take(&mut self.patient, other.patient);
        take(&mut self.dental_history, other.dental_history);
        take(&mut self.medical_history, other.medical_history);
        if !other.tooth_findings.is_empty() {
            self.tooth_findings = other.tooth_findings;
        }
        take(&mut self.periodontal, other.periodontal);
        take(&mut self.occlusion, other.occlusion);
        take(&mut self.appliances, other.appliances);
        take(&mut self.tmd, other.tmd);
        take(&mut self.treatment, other.treatment);
        take(&mut self.drugs_medication, other.drugs_medication);
        take(&mut self.changes_in_plan, other.changes_in_plan);
        take(&mut self.radiograph, other.radiograph);
        take(&mut self.removal_of_teeth, other.removal_of_teeth);
        take(&mut self.crowns_bridges, other.crowns_bridges);
        take(&mut self.endodontics, other.endodontics);
        take(&mut self.fillings, other.fillings);
        take(&mut self.dentures, other.dentures);
        take(&mut self.patient_signature, other.patient_signature);
        take(&mut self.dentist_signature, other.dentist_signature);
        take(&mut self.date, other.date);
        if !other.treatment_record.is_empty() {
            self.treatment_record = other.treatment_record;
        }
    }
}
