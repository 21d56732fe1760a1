//! Canonical field map and the edit-aware resolver.
//!
//! Normalization produces a flat ordered map of canonical keys. Reviewers
//! may overlay corrections as plain text edits keyed by the same names.
//! The resolver layers edits over canonical values, walks alias chains
//! for fields whose names drifted across revisions, and is total: an
//! absent field resolves to the empty string, never an error.

use crate::normalize::aliases;
use crate::schema::TreatmentRecord;
use crate::teeth::ToothFinding;
use indexmap::IndexMap;

/// A normalized field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Free text
    Text(String),
    /// Numeric value
    Number(f64),
    /// Checkbox state
    Bool(bool),
    /// The preserved treatment record table
    Records(Vec<TreatmentRecord>),
    /// The preserved per-tooth findings
    Teeth(Vec<ToothFinding>),
}

impl FieldValue {
    /// Text rendering used for form fields.
    ///
    /// Structured values render empty; they are consumed through the
    /// typed accessors instead.
    pub fn as_display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            },
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Records(_) | FieldValue::Teeth(_) => String::new(),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

/// Flat, insertion-ordered map of canonical keys to values.
pub type CanonicalFieldMap = IndexMap<String, FieldValue>;

/// Reviewer corrections keyed by canonical field name.
pub type UserEdits = IndexMap<String, String>;

/// Edit keys that mark the single treatment row as reviewer-entered.
const TREATMENT_EDIT_KEYS: [&str; 6] = [
    "treatmentDate",
    "toothNumbers",
    "procedure",
    "dentistName",
    "amountCharged",
    "amountPaid",
];

/// Field lookup over the canonical map with a user edit overlay.
pub struct FieldResolver<'a> {
    canonical: &'a CanonicalFieldMap,
    edits: &'a UserEdits,
}

impl<'a> FieldResolver<'a> {
    /// Create a resolver over a canonical map and edit overlay.
    pub fn new(canonical: &'a CanonicalFieldMap, edits: &'a UserEdits) -> Self {
        Self { canonical, edits }
    }

    fn lookup(&self, key: &str) -> Option<String> {
        if let Some(edit) = self.edits.get(key) {
            if !edit.is_empty() {
                return Some(edit.clone());
            }
        }
        match self.canonical.get(key) {
            Some(value) => {
                let text = value.as_display();
                if text.is_empty() {
                    None
                } else {
                    Some(text)
                }
            },
            None => None,
        }
    }

    /// Resolve a field to display text. Absent fields yield `""`.
    pub fn resolve(&self, key: &str) -> String {
        let chain = aliases::resolver_aliases(key);
        if chain.is_empty() {
            return self.lookup(key).unwrap_or_default();
        }
        for alias in chain {
            if let Some(value) = self.lookup(alias) {
                return value;
            }
        }
        String::new()
    }

    /// True when the field reads as an affirmative answer.
    pub fn is_affirmative(&self, key: &str) -> bool {
        let value = self.resolve(key);
        value.eq_ignore_ascii_case("yes") || value.eq_ignore_ascii_case("true")
    }

    /// True when the field reads as a negative answer.
    pub fn is_negative(&self, key: &str) -> bool {
        let value = self.resolve(key);
        value.eq_ignore_ascii_case("no") || value.eq_ignore_ascii_case("false")
    }

    /// The preserved treatment records, oldest first.
    pub fn records(&self) -> &[TreatmentRecord] {
        match self.canonical.get("treatmentRecord") {
            Some(FieldValue::Records(records)) => records,
            _ => &[],
        }
    }

    /// The preserved per-tooth findings.
    pub fn teeth(&self) -> &[ToothFinding] {
        match self.canonical.get("toothFindings") {
            Some(FieldValue::Teeth(teeth)) => teeth,
            _ => &[],
        }
    }

    /// True when the reviewer entered the current treatment row by hand.
    pub fn has_treatment_edits(&self) -> bool {
        TREATMENT_EDIT_KEYS
            .iter()
            .any(|key| self.edits.get(*key).is_some_and(|v| !v.is_empty()))
    }

    /// Raw edit value, if present and non-empty.
    pub fn edit(&self, key: &str) -> Option<&str> {
        self.edits.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }
}
