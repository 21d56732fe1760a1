//! Static alias tables reconciling field names across schema revisions.
//!
//! Two tables exist because drift happens at two points. `canonical_for`
//! maps source keys seen in extractor output to the canonical form key at
//! flatten time. `resolver_aliases` gives the ordered candidate keys a
//! logical field may live under in an already-flattened map, which covers
//! documents normalized by older revisions.

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    /// Source key -> canonical key, applied while flattening sections.
    static ref SOURCE_TO_CANONICAL: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("homeNo", "homePhone");
        m.insert("officeNo", "officePhone");
        m.insert("cellMobileNo", "mobileNumber");
        m.insert("faxNo", "faxNumber");
        m.insert("emailAddress", "email");
        m.insert("parentGuardianName", "guardianName");
        m.insert("parentOccupation", "guardianOccupation");
        m.insert("physicianOfficeNumber", "physicianPhone");
        m.insert("underMedicalTreatment", "underTreatment");
        m.insert("medicalConditionBeingTreated", "treatmentCondition");
        m.insert("seriousIllnessSurgery", "seriousIllness");
        m.insert("illnessOrOperationDetails", "illnessDetails");
        m.insert("takingMedication", "medications");
        m.insert("medicationDetails", "medicationList");
        m.insert("useTobacco", "tobacco");
        m.insert("useAlcoholDrugs", "substanceUse");
        m
    };

    /// Logical field -> ordered lookup chain over flattened keys.
    static ref RESOLVER_ALIASES: HashMap<&'static str, &'static [&'static str]> = {
        let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        m.insert("homeNumber", &["homeNumber", "homeNo", "homePhone"]);
        m.insert("officeNumber", &["officeNumber", "officeNo", "officePhone"]);
        m.insert("mobileNumber", &["mobileNumber", "cellMobileNo", "cellphone"]);
        m.insert("faxNumber", &["faxNumber", "faxNo"]);
        m.insert("email", &["email", "emailAddress"]);
        m.insert("guardianName", &["guardianName", "parentGuardianName"]);
        m.insert("guardianOccupation", &["guardianOccupation", "parentOccupation"]);
        m.insert("underTreatment", &["underTreatment", "underMedicalTreatment"]);
        m.insert(
            "treatmentCondition",
            &["treatmentCondition", "medicalConditionBeingTreated"],
        );
        m.insert("seriousIllness", &["seriousIllness", "seriousIllnessSurgery"]);
        m.insert("illnessDetails", &["illnessDetails", "illnessOrOperationDetails"]);
        m.insert("takingMedication", &["takingMedication", "medications"]);
        m.insert("medications", &["medications", "takingMedication"]);
        m.insert("medicationsList", &["medicationsList", "medicationList", "medicationDetails"]);
        m.insert("tobacco", &["tobacco", "useTobacco"]);
        m.insert(
            "dangerousDrugs",
            &["dangerousDrugs", "substanceUse", "useAlcoholDrugs"],
        );
        m.insert(
            "allergyAnesthetic",
            &["allergyAnesthetic", "allergy_localAnesthetic", "localAnesthetic"],
        );
        m.insert(
            "allergyPenicillin",
            &["allergyPenicillin", "allergy_penicillin", "penicillin"],
        );
        m.insert(
            "allergyAntibiotics",
            &["allergyAntibiotics", "allergy_antibiotics", "antibiotics"],
        );
        m.insert("allergyAspirin", &["allergyAspirin", "allergy_aspirin", "aspirin"]);
        m.insert("allergyLatex", &["allergyLatex", "allergy_latex", "latex"]);
        m.insert("allergySulfa", &["allergySulfa", "allergy_sulfaDrugs", "sulfaDrugs"]);
        m.insert("allergyOthers", &["allergyOthers", "allergy_others", "others"]);
        m.insert("pregnant", &["pregnant", "women_pregnant"]);
        m.insert("nursing", &["nursing", "women_nursing"]);
        m.insert(
            "birthControl",
            &[
                "birthControl",
                "women_takingBirthControl",
                "takingBirthControl",
                "women_birthControl",
            ],
        );
        m
    };
}

/// Canonical key for a flattened section key.
pub fn canonical_for(source_key: &str) -> &str {
    SOURCE_TO_CANONICAL.get(source_key).copied().unwrap_or(source_key)
}

/// Ordered candidate keys for a logical field at resolve time.
///
/// Fields without registered aliases resolve under their own name only.
pub fn resolver_aliases(key: &str) -> &[&str] {
    RESOLVER_ALIASES.get(key).copied().unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_for_known_source() {
        assert_eq!(canonical_for("homeNo"), "homePhone");
        assert_eq!(canonical_for("useAlcoholDrugs"), "substanceUse");
    }

    #[test]
    fn test_canonical_for_passthrough() {
        assert_eq!(canonical_for("firstName"), "firstName");
    }

    #[test]
    fn test_resolver_chain_order() {
        let chain = resolver_aliases("homeNumber");
        assert_eq!(chain, &["homeNumber", "homeNo", "homePhone"]);
    }

    #[test]
    fn test_resolver_unknown_key_empty() {
        assert!(resolver_aliases("chartPatientName").is_empty());
    }
}
