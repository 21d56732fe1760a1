//! End-to-end rendering: the five-page document, determinism, the
//! treatment table, and file naming.

use chrono::NaiveDate;
use odontoform::fields::UserEdits;
use odontoform::normalize::Normalizer;
use odontoform::render::DocumentAssembler;
use odontoform::schema::RawExtraction;
use std::fs;

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

const FIXTURE: &str = r#"{
    "patient": {
        "lastName": "Dela Cruz",
        "firstName": "Juan",
        "middleName": "Santos",
        "birthdate": "3/4/99",
        "age": 26,
        "sex": "Male",
        "nickname": "JD",
        "religion": "Catholic",
        "nationality": "Filipino",
        "homeAddress": "123 Mabini St, Quezon City",
        "homeNo": "555-0101",
        "occupation": "Engineer"
    },
    "medicalHistory": {
        "goodHealth": "Yes",
        "useTobacco": "No",
        "allergies": { "penicillin": "Yes" },
        "forWomenOnly": {},
        "medicalConditions": { "asthma": "Yes" }
    },
    "ToothFinding": [
        { "toothNumber": "18", "condition": "DECAYED" },
        { "toothNumber": "36", "surgeries": ["EXTRACTION_OTHER"] },
        { "toothNumber": "16", "restorations": ["JC"] }
    ],
    "periodontal": { "gingivitis": true, "initial": "JDC" },
    "treatment": { "initial": "JDC" },
    "patientSignature": "Juan S. Dela Cruz",
    "date": "6/1/25",
    "treatmentRecord": [
        { "date": "01/05/24", "toothNumber": "36", "treatment": "Extraction",
          "dentist": "Dr. Reyes", "amountCharged": 1500, "amountPaid": "500",
          "balance": 1000, "nextVisit": "02/05/24" }
    ]
}"#;

fn render_fixture(edits: &UserEdits) -> odontoform::RenderedChart {
    let raw = RawExtraction::from_json(FIXTURE).unwrap();
    let canonical = Normalizer::with_reference_date(reference_date()).normalize(&raw);
    DocumentAssembler::new()
        .with_reference_date(reference_date())
        .with_compress(false)
        .assemble(&canonical, edits)
        .unwrap()
}

#[test]
fn test_renders_five_letter_pages() {
    let chart = render_fixture(&UserEdits::new());
    let text = String::from_utf8_lossy(&chart.bytes);

    assert!(text.starts_with("%PDF-1.7"));
    assert!(text.ends_with("%%EOF"));
    assert!(text.contains("/Count 5"));
    assert!(text.contains("/MediaBox [0 0 612 792]"));
    for page in 1..=5 {
        assert!(text.contains(&format!("(Page {} of 5) Tj", page)), "page {}", page);
    }
}

#[test]
fn test_text_objects_balanced_on_every_page() {
    let chart = render_fixture(&UserEdits::new());
    let text = String::from_utf8_lossy(&chart.bytes);

    let begins = text.matches("BT\n").count();
    let ends = text.matches("ET\n").count();
    assert!(begins > 0);
    assert_eq!(begins, ends, "{} BT vs {} ET", begins, ends);
}

#[test]
fn test_patient_fields_appear_on_page_one() {
    let chart = render_fixture(&UserEdits::new());
    let text = String::from_utf8_lossy(&chart.bytes);

    assert!(text.contains("(PATIENT INFORMATION RECORD) Tj"));
    assert!(text.contains("(Dela Cruz) Tj"));
    assert!(text.contains("(Juan) Tj"));
    assert!(text.contains("(1999-03-04) Tj"));
    assert!(text.contains("(123 Mabini St, Quezon City) Tj"));
    // Drifted homeNo lands on the home number line
    assert!(text.contains("(555-0101) Tj"));
}

#[test]
fn test_tooth_glyphs_and_summaries() {
    let chart = render_fixture(&UserEdits::new());
    let text = String::from_utf8_lossy(&chart.bytes);

    assert!(text.contains("(D) Tj"));
    assert!(text.contains("(XO) Tj"));
    assert!(text.contains("(JC) Tj"));
    assert!(text.contains("(RIGHT) Tj"));
    assert!(text.contains("(Legend:) Tj"));
}

#[test]
fn test_consent_initials_and_signature() {
    let chart = render_fixture(&UserEdits::new());
    let text = String::from_utf8_lossy(&chart.bytes);

    assert!(text.contains("(INFORMED CONSENT) Tj"));
    assert!(text.contains("(Initials: JDC) Tj"));
    // Sections without captured initials still render their label
    assert!(text.contains("(Initials: ) Tj"));
    assert!(text.contains("(Juan S. Dela Cruz) Tj"));
    assert!(text.contains("(2025-06-01) Tj"));
}

#[test]
fn test_treatment_history_row_rendered() {
    let chart = render_fixture(&UserEdits::new());
    let text = String::from_utf8_lossy(&chart.bytes);

    assert!(text.contains("(TREATMENT RECORD) Tj"));
    assert!(text.contains("(01/05/24) Tj"));
    assert!(text.contains("(Extraction) Tj"));
    assert!(text.contains("(Dr. Reyes) Tj"));
    assert!(text.contains("(1500) Tj"));
    assert!(text.contains("(mcml/10) Tj"));
}

#[test]
fn test_edited_treatment_row_shadows_history() {
    let mut edits = UserEdits::new();
    edits.insert("procedure".to_string(), "Root canal".to_string());
    edits.insert("amountCharged".to_string(), "2500".to_string());
    let chart = render_fixture(&edits);
    let text = String::from_utf8_lossy(&chart.bytes);

    assert!(text.contains("(Root canal) Tj"));
    assert!(text.contains("(2500) Tj"));
    // The extracted history row is suppressed
    assert!(!text.contains("(Dr. Reyes) Tj"));
}

#[test]
fn test_output_is_deterministic() {
    let raw = RawExtraction::from_json(FIXTURE).unwrap();
    let canonical = Normalizer::with_reference_date(reference_date()).normalize(&raw);
    let edits = UserEdits::new();
    let assembler = DocumentAssembler::new().with_reference_date(reference_date());

    let a = assembler.assemble(&canonical, &edits).unwrap();
    let b = assembler.assemble(&canonical, &edits).unwrap();
    assert_eq!(a.bytes, b.bytes);
}

#[test]
fn test_compression_shrinks_output() {
    let raw = RawExtraction::from_json(FIXTURE).unwrap();
    let canonical = Normalizer::with_reference_date(reference_date()).normalize(&raw);
    let edits = UserEdits::new();

    let plain = DocumentAssembler::new()
        .with_reference_date(reference_date())
        .with_compress(false)
        .assemble(&canonical, &edits)
        .unwrap();
    let packed = DocumentAssembler::new()
        .with_reference_date(reference_date())
        .assemble(&canonical, &edits)
        .unwrap();

    assert!(packed.bytes.len() < plain.bytes.len());
    let text = String::from_utf8_lossy(&packed.bytes);
    assert!(text.contains("/Filter /FlateDecode"));
}

#[test]
fn test_file_name_derived_from_patient() {
    let chart = render_fixture(&UserEdits::new());
    assert_eq!(chart.file_name, "Dela_Cruz_Juan_Dental_Chart.pdf");
}

#[test]
fn test_empty_extraction_still_renders() {
    let raw = RawExtraction::from_json("{}").unwrap();
    let canonical = Normalizer::with_reference_date(reference_date()).normalize(&raw);
    let chart = DocumentAssembler::new()
        .with_reference_date(reference_date())
        .with_compress(false)
        .assemble(&canonical, &UserEdits::new())
        .unwrap();
    let text = String::from_utf8_lossy(&chart.bytes);

    assert!(text.contains("/Count 5"));
    assert_eq!(chart.file_name, "Patient_Dental_Chart.pdf");
    // Unanswered questions draw no checkbox mark
    assert!(!text.contains("(X) Tj"));
}

#[test]
fn test_long_history_reflows_to_extra_page() {
    let records: Vec<String> = (0..40)
        .map(|i| format!(r#"{{"date":"01/{:02}/24","procedure":"Visit {}"}}"#, i % 28 + 1, i))
        .collect();
    let json = format!(r#"{{"treatmentRecord":[{}]}}"#, records.join(","));
    let raw = RawExtraction::from_json(&json).unwrap();
    let canonical = Normalizer::with_reference_date(reference_date()).normalize(&raw);
    let chart = DocumentAssembler::new()
        .with_reference_date(reference_date())
        .with_compress(false)
        .assemble(&canonical, &UserEdits::new())
        .unwrap();
    let text = String::from_utf8_lossy(&chart.bytes);

    assert!(text.contains("/Count 6"));
    assert!(text.contains("(Visit 39) Tj"));
}

#[test]
fn test_save_writes_under_derived_name() {
    let chart = render_fixture(&UserEdits::new());
    let dir = tempfile::tempdir().unwrap();
    let path = chart.save_to_dir(dir.path()).unwrap();

    assert!(path.ends_with("Dela_Cruz_Juan_Dental_Chart.pdf"));
    let written = fs::read(&path).unwrap();
    assert_eq!(written, chart.bytes);
}
