//! Tooth findings: FDI position tables, per-tooth codes, and glyph
//! resolution for the odontogram.

use serde::{Deserialize, Serialize};

/// Upper deciduous arch in display order (left to right on the form).
pub const UPPER_DECIDUOUS: [&str; 10] =
    ["55", "54", "53", "52", "51", "61", "62", "63", "64", "65"];

/// Upper permanent arch in display order.
pub const UPPER_PERMANENT: [&str; 16] = [
    "18", "17", "16", "15", "14", "13", "12", "11", "21", "22", "23", "24", "25", "26", "27", "28",
];

/// Lower permanent arch in display order.
pub const LOWER_PERMANENT: [&str; 16] = [
    "48", "47", "46", "45", "44", "43", "42", "41", "31", "32", "33", "34", "35", "36", "37", "38",
];

/// Lower deciduous arch in display order.
pub const LOWER_DECIDUOUS: [&str; 10] =
    ["85", "84", "83", "82", "81", "71", "72", "73", "74", "75"];

/// Clinical condition of a single tooth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToothCondition {
    /// Tooth present, no findings
    Present,
    /// Carious lesion
    Decayed,
    /// Missing due to caries
    MissingCaries,
    /// Missing for another reason
    MissingOther,
    /// Impacted tooth
    Impacted,
    /// Retained root fragment
    RootFragment,
    /// Supernumerary tooth
    Supernumerary,
    /// Unerupted tooth
    Unerupted,
}

impl ToothCondition {
    /// Chart glyph for the condition. Present teeth carry no glyph.
    pub fn glyph(&self) -> Option<&'static str> {
        match self {
            ToothCondition::Present => None,
            ToothCondition::Decayed => Some("D"),
            ToothCondition::MissingCaries => Some("M"),
            ToothCondition::MissingOther => Some("MO"),
            ToothCondition::Impacted => Some("Im"),
            ToothCondition::RootFragment => Some("Rf"),
            ToothCondition::Supernumerary => Some("Sp"),
            ToothCondition::Unerupted => Some("Un"),
        }
    }
}

/// Restoration or prosthetic code on a tooth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestorationCode {
    /// Amalgam filling
    #[serde(rename = "AM")]
    Amalgam,
    /// Composite filling
    #[serde(rename = "CO")]
    Composite,
    /// Jacket crown
    #[serde(rename = "JC")]
    JacketCrown,
    /// Abutment
    #[serde(rename = "AB")]
    Abutment,
    /// Attachment
    #[serde(rename = "ATT")]
    Attachment,
    /// Pontic
    #[serde(rename = "P")]
    Pontic,
    /// Inlay
    #[serde(rename = "IN")]
    Inlay,
    /// Implant
    #[serde(rename = "IMP")]
    Implant,
    /// Sealant
    #[serde(rename = "S")]
    Sealant,
    /// Removable denture
    #[serde(rename = "RM")]
    RemovableDenture,
}

impl RestorationCode {
    /// Chart glyph, which is the printed code itself.
    pub fn glyph(&self) -> &'static str {
        match self {
            RestorationCode::Amalgam => "AM",
            RestorationCode::Composite => "CO",
            RestorationCode::JacketCrown => "JC",
            RestorationCode::Abutment => "AB",
            RestorationCode::Attachment => "ATT",
            RestorationCode::Pontic => "P",
            RestorationCode::Inlay => "IN",
            RestorationCode::Implant => "IMP",
            RestorationCode::Sealant => "S",
            RestorationCode::RemovableDenture => "RM",
        }
    }
}

/// Surgery indication on a tooth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SurgeryCode {
    /// Extraction due to caries
    ExtractionCaries,
    /// Extraction for another reason
    ExtractionOther,
}

impl SurgeryCode {
    /// Chart glyph for the surgery code.
    pub fn glyph(&self) -> &'static str {
        match self {
            SurgeryCode::ExtractionCaries => "X",
            SurgeryCode::ExtractionOther => "XO",
        }
    }
}

/// All recorded findings for one tooth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToothFinding {
    /// FDI tooth number, e.g. "18" or "55"
    pub tooth_number: String,
    /// Clinical condition, if recorded
    #[serde(default)]
    pub condition: Option<ToothCondition>,
    /// Restoration codes in recorded order
    #[serde(default)]
    pub restorations: Vec<RestorationCode>,
    /// Surgery codes in recorded order
    #[serde(default)]
    pub surgeries: Vec<SurgeryCode>,
}

impl ToothFinding {
    /// Resolve the single glyph drawn inside the tooth circle.
    ///
    /// Surgery outranks restorations, which outrank the condition.
    /// Within a category the first recorded code wins.
    pub fn display_glyph(&self) -> Option<String> {
        if let Some(surgery) = self.surgeries.first() {
            return Some(surgery.glyph().to_string());
        }
        if let Some(restoration) = self.restorations.first() {
            return Some(restoration.glyph().to_string());
        }
        self.condition.and_then(|c| c.glyph()).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(tooth: &str) -> ToothFinding {
        ToothFinding {
            tooth_number: tooth.to_string(),
            condition: None,
            restorations: Vec::new(),
            surgeries: Vec::new(),
        }
    }

    #[test]
    fn test_surgery_outranks_restoration() {
        let mut f = finding("18");
        f.restorations.push(RestorationCode::Amalgam);
        f.surgeries.push(SurgeryCode::ExtractionCaries);
        assert_eq!(f.display_glyph().as_deref(), Some("X"));
    }

    #[test]
    fn test_restoration_outranks_condition() {
        let mut f = finding("16");
        f.condition = Some(ToothCondition::Decayed);
        f.restorations.push(RestorationCode::Composite);
        assert_eq!(f.display_glyph().as_deref(), Some("CO"));
    }

    #[test]
    fn test_present_tooth_has_no_glyph() {
        let mut f = finding("11");
        f.condition = Some(ToothCondition::Present);
        assert_eq!(f.display_glyph(), None);
    }

    #[test]
    fn test_first_restoration_wins() {
        let mut f = finding("24");
        f.restorations.push(RestorationCode::JacketCrown);
        f.restorations.push(RestorationCode::Amalgam);
        assert_eq!(f.display_glyph().as_deref(), Some("JC"));
    }

    #[test]
    fn test_condition_deserializes_from_screaming_snake() {
        let c: ToothCondition = serde_json::from_str("\"MISSING_CARIES\"").unwrap();
        assert_eq!(c, ToothCondition::MissingCaries);
        assert_eq!(c.glyph(), Some("M"));
    }

    #[test]
    fn test_restoration_code_round_trip() {
        let r: RestorationCode = serde_json::from_str("\"IMP\"").unwrap();
        assert_eq!(r, RestorationCode::Implant);
        assert_eq!(r.glyph(), "IMP");
    }

    #[test]
    fn test_arch_sizes() {
        assert_eq!(UPPER_DECIDUOUS.len() + LOWER_DECIDUOUS.len(), 20);
        assert_eq!(UPPER_PERMANENT.len() + LOWER_PERMANENT.len(), 32);
    }
}
