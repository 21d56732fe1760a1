//! Assembles the five chart pages into a finished document.

use crate::error::Result;
use crate::fields::{CanonicalFieldMap, FieldResolver, UserEdits};
use crate::render::{layout, odontogram, table};
use crate::render::page::{PageCanvas, MARGIN, PAGE_HEIGHT, PAGE_WIDTH};
use crate::writer::{ChartFont, PdfWriter, PdfWriterConfig};
use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("whitespace pattern");
}

/// Consent paragraphs with the canonical key of their initials field.
const CONSENT_SECTIONS: [(&str, &str, &str); 10] = [
    (
        "TREATMENT TO BE DONE:",
        "I understand and consent to have any treatment done by the dentist. After the procedure, the risks & benefits & cost have been fully explained. These treatments include, but are not limited to x-rays, cleanings/periodontal therapy, fillings, crowns, bridges & root canal therapy, local anesthetics & surgical cases.",
        "treatmentInitial",
    ),
    (
        "DRUGS & MEDICATIONS:",
        "I understand that antibiotics, analgesics & other medications can cause allergic reactions like redness & swelling of tissues, pain, itching, vomiting, and/or anaphylactic shock.",
        "drugsInitial",
    ),
    (
        "CHANGES IN TREATMENT PLAN:",
        "I understand that during treatment it may be necessary to change/add procedures because of conditions found while working on the teeth that was not discovered during examination. For example, root canal therapy may be needed following routine restorative procedures. I give my permission to the dentist to make any/all changes and additions as necessary. It is my responsibility to pay all the extra costs related to the procedures performed.",
        "planChangesInitial",
    ),
    (
        "RADIOGRAPH:",
        "I understand that an x-ray shot or a radiograph maybe necessary as part of diagnostic aid to come up with tentative diagnosis of my Dental problem and to support judgement, but this is not a perfect instrument, & that by its use, the Dentist cannot accurately predict future events, are subject to unpredictable complications that later, on may lead to sudden change of treatment plan and subject to new charges.",
        "radiographInitial",
    ),
    (
        "REMOVAL OF TEETH:",
        "I understand that alternatives to tooth removal (root canal therapy, crowns & periodontal surgery, etc.) & I completely understand that retaining the teeth by any dental specialty, always removes all the infections, if present, & it may be necessary to have further treatment. I understand the risk involved in having teeth removed, such as pain, swelling, spread of infection, dry socket, loss of feeling in my teeth, lips, tongue & surrounding tissue (paresthesia) that can last for an indefinite period of time. I understand that I may need further treatment under a specialist if complications arise during or following treatment.",
        "removalInitial",
    ),
    (
        "CROWNS (CAPS) & BRIDGES:",
        "Preparing a tooth may irritate the nerve tissue in the center of the tooth, leaving the tooth extra sensitive to heat, cold & pressure. This sensitivity usually subsides, but where it does not, root canal therapy or tooth extraction may be necessary. It may not be possible to match the color of natural teeth exactly with artificial teeth. I further understand that I may be wearing temporary crowns, which may come off easily & that I must be careful to ensure that they are kept on. If they come off before my next visit or if the tooth structure comes off cement, it is my responsibility to see the dentist immediately for permanent cementation within 20 days from tooth preparation, as excessive days delay may allow for tooth movement, which may necessitate a remake of the crown, bridge or cap. I understand that at times of permanent cementation, if there is need to modify the shape/fit/size/color of my new crown, bridges or cap (including shape, fit, size, & color) will be before permanent cementation.",
        "crownsInitial",
    ),
    (
        "ENDODONTICS (ROOT CANAL):",
        "I understand there is no guarantee that a root canal treatment will save a tooth & that complications can occur from the treatment itself, that occasionally metal instruments and/or files are used in their manufacture, and that it may be necessary to have the tooth extracted if complications arise. I also understand that endodontic files & drills are very fragile instruments & stresses vented in their manufacture & calcifications present in teeth can cause them to break apart in the procedure, I am responsible for any additional cost for treatment performed by the endodontist. I understand that a tooth may require removal in spite of all efforts to save it.",
        "rootCanalInitial",
    ),
    (
        "PERIODONTAL DISEASE:",
        "I understand that periodontal disease is a serious condition causing gum & bone inflammation &/or loss & that can lead eventually to the loss of my teeth. I understand that various treatment plans to correct the condition depending upon each individual situation or without replacement. I understand that undertaking any dental procedures may have necessary adverse effects on my pre-existing periodontal conditions.",
        "periodontalInitial",
    ),
    (
        "FILLINGS:",
        "I understand that care must be exercised in chewing on fillings, especially during the first 24 hours to avoid breakage. I understand that a more extensive restoration than originally planned may sometimes be required due to additional unseen decay. I acknowledge that the newly placed filling or crown, sensitivity is a common, but usually temporary, after-effect of a newly placed filling. I further understand that filling a tooth may irritate the nerve tissue creating sensitivity or requiring further treatment, including root canal treatment or tooth extraction.",
        "fillingsInitial",
    ),
    (
        "DENTURES:",
        "I understand that wearing of dentures can be difficult. Sore spots, altered speech & difficulty in eating are common problems. Immediate dentures (placement of denture immediately after extractions) may be painful. Immediate dentures may require considerable adjusting & several relines. A permanent reline will be needed later, when the tissue is completely healed. This is an additional charge. If a remake is required due to my delay of more than 30 days, there will be additional charges. A permanent reline will be needed later, which is not covered in the initial cost of dentures or surgical extractions if alterations are requested or any time that has not been specified or alterations are requested at any time.",
        "denturesInitial",
    ),
];

const FINAL_CONSENT: &str = "I understand that dentistry is not an exact science and that no dentist can properly guarantee accurate results all the time.\n\nI hereby authorize any of the doctors/dental auxiliaries to proceed with & perform the dental restorations & treatments as explained to me. I understand that these are subject to modification depending on undiagnosable circumstances that may arise during the course of treatment. I understand that regardless of my dental insurance coverage I may have, I am responsible for payment of dental fees. I agree to pay any attorney's fees, collection fee, or court costs that may be incurred to satisfy any obligation to this office. All treatment were properly explained to me & any untoward circumstances that may arise during the procedure, the attending dentist will not be held liable since it is my free will, with full trust & confidence in him/her, to undergo Dental Treatment under his/her care.";

/// Medical condition checkbox grid, three columns of thirteen rows.
const CONDITION_ROWS: [[(&str, &str); 3]; 13] = [
    [
        ("High Blood Pressure", "highBloodPressure"),
        ("Heart Disease", "heartDisease"),
        ("Cancer/Tumors", "cancerTumors"),
    ],
    [
        ("Low Blood Pressure", "lowBloodPressure"),
        ("Heart Murmur", "heartMurmur"),
        ("Anemia", "anemia"),
    ],
    [
        ("Epilepsy/Convulsions", "epilepsyConvulsions"),
        ("Hepatitis/Liver Disease", "hepatitisLiverDisease"),
        ("Angina", "angina"),
    ],
    [
        ("AIDS or HIV Infection", "aidsHivInfection"),
        ("Rheumatic Fever", "rheumaticFever"),
        ("Asthma", "asthma"),
    ],
    [
        ("Sexually Transmitted Disease", "sexuallyTransmittedDisease"),
        ("Hay Fever/Allergies", "hayFeverAllergies"),
        ("Emphysema", "emphysema"),
    ],
    [
        ("Stomach Troubles/Ulcers", "stomachTroublesUlcers"),
        ("Respiratory Problems", "respiratoryProblems"),
        ("Bleeding Problems", "bleedingProblems"),
    ],
    [
        ("Fainting Seizure", "faintingSeizure"),
        ("Hepatitis/Jaundice", "hepatitisJaundice"),
        ("Blood Diseases", "bloodDiseases"),
    ],
    [
        ("Rapid Weight Loss", "rapidWeightLoss"),
        ("Tuberculosis", "tuberculosis"),
        ("Head Injuries", "headInjuries"),
    ],
    [
        ("Radiation Therapy", "radiationTherapy"),
        ("Swollen Ankles", "swollenAnkles"),
        ("Arthritis/Rheumatism", "arthritisRheumatism"),
    ],
    [
        ("Joint Replacement", "jointReplacementImplant"),
        ("Kidney Disease", "kidneyDisease"),
        ("Other", "other"),
    ],
    [("Heart Surgery", "heartSurgery"), ("Diabetes", "diabetes"), ("", "")],
    [("Heart Attack", "heartAttack"), ("Chest Pain", "chestPain"), ("", "")],
    [("Thyroid Problem", "thyroidProblem"), ("Stroke", "stroke"), ("", "")],
];

/// A finished chart: the document bytes and its derived file name.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

impl RenderedChart {
    /// Write the chart into `dir` under its derived name. The bytes go
    /// to a temporary file first and are renamed into place, so a
    /// partially written chart is never observed at the final path.
    pub fn save_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let final_path = dir.join(&self.file_name);
        let tmp_path = dir.join(format!(".{}.tmp", self.file_name));
        fs::write(&tmp_path, &self.bytes)?;
        fs::rename(&tmp_path, &final_path)?;
        log::info!("saved {} ({} bytes)", final_path.display(), self.bytes.len());
        Ok(final_path)
    }
}

/// Renders the canonical field map into the five-page chart.
pub struct DocumentAssembler {
    today: NaiveDate,
    compress: bool,
}

impl Default for DocumentAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentAssembler {
    pub fn new() -> Self {
        Self {
            today: chrono::Local::now().date_naive(),
            compress: true,
        }
    }

    /// Fixed reference date for the chart date fallback.
    pub fn with_reference_date(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Toggle content stream compression.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Render every page and produce the final document.
    pub fn assemble(
        &self,
        canonical: &CanonicalFieldMap,
        edits: &UserEdits,
    ) -> Result<RenderedChart> {
        let resolver = FieldResolver::new(canonical, edits);

        let config = PdfWriterConfig::default()
            .with_title("Dental Chart")
            .with_compress(self.compress);
        let mut writer = PdfWriter::with_config(config);

        writer.push_letter_page(self.page_patient_info(&resolver).into_builder());
        writer.push_letter_page(self.page_medical_history(&resolver).into_builder());
        writer.push_letter_page(self.page_informed_consent(&resolver).into_builder());
        writer.push_letter_page(self.page_dental_chart(&resolver).into_builder());
        for canvas in self.pages_treatment_record(&resolver) {
            writer.push_letter_page(canvas.into_builder());
        }

        log::debug!("assembled chart with {} pages", writer.page_count());
        let bytes = writer.finish()?;
        Ok(RenderedChart {
            bytes,
            file_name: file_name(&resolver),
        })
    }

    /// Page 1: association header, patient information record, dental
    /// history, and medical questions 1-5.
    fn page_patient_info(&self, r: &FieldResolver) -> PageCanvas {
        let mut c = PageCanvas::new();
        page_one_header(&mut c);

        let mut y = 46.0;
        c.text("PATIENT INFORMATION RECORD", MARGIN, y, ChartFont::HelveticaBold, 10.0);
        y += 6.0;

        // Name row: three underlines sharing one label
        c.text("Name:", MARGIN, y, ChartFont::Helvetica, 8.0);
        c.set_draw_color(0, 0, 0);
        c.set_line_width(0.3);
        let name_x = MARGIN + 13.0;
        let w1 = 50.0;
        let w2 = 52.0;
        c.line(name_x, y + 1.0, name_x + w1, y + 1.0);
        c.line(name_x + w1 + 3.0, y + 1.0, name_x + w1 + w2 + 3.0, y + 1.0);
        c.line(name_x + w1 + w2 + 6.0, y + 1.0, PAGE_WIDTH - MARGIN, y + 1.0);
        c.text(&r.resolve("lastName"), name_x + 2.0, y - 0.5, ChartFont::Helvetica, 8.0);
        c.text(&r.resolve("firstName"), name_x + w1 + 5.0, y - 0.5, ChartFont::Helvetica, 8.0);
        c.text(&r.resolve("middleName"), name_x + w1 + w2 + 8.0, y - 0.5, ChartFont::Helvetica, 8.0);
        c.set_text_color(100, 100, 100);
        c.text("(Last)", name_x + 18.0, y + 4.0, ChartFont::Helvetica, 7.0);
        c.text("(First)", name_x + w1 + 22.0, y + 4.0, ChartFont::Helvetica, 7.0);
        c.text("(Middle)", name_x + w1 + w2 + 16.0, y + 4.0, ChartFont::Helvetica, 7.0);
        c.set_text_color(0, 0, 0);
        y += 8.0;

        // Birthdate, age, sex, nickname
        layout::labeled_field(&mut c, "Birthdate(mm/dd/yy):", &r.resolve("birthdate"), MARGIN, y, MARGIN + 37.0, MARGIN + 70.0);
        layout::labeled_field(&mut c, "Age:", &r.resolve("age"), MARGIN + 75.0, y, MARGIN + 85.0, MARGIN + 94.0);
        c.text("Sex: M/F", MARGIN + 99.0, y, ChartFont::Helvetica, 8.0);
        let sex = r.resolve("sex").to_uppercase();
        c.rect(MARGIN + 116.0, y - 3.0, 3.0, 3.0);
        if sex == "M" || sex == "MALE" {
            c.text("X", MARGIN + 116.5, y - 0.5, ChartFont::HelveticaBold, 8.0);
        }
        c.rect(MARGIN + 122.0, y - 3.0, 3.0, 3.0);
        if sex == "F" || sex == "FEMALE" {
            c.text("X", MARGIN + 122.5, y - 0.5, ChartFont::HelveticaBold, 8.0);
        }
        layout::labeled_field(&mut c, "Nickname:", &r.resolve("nickname"), MARGIN + 129.0, y, MARGIN + 147.0, PAGE_WIDTH - MARGIN);
        y += 6.0;

        layout::labeled_field(&mut c, "Religion:", &r.resolve("religion"), MARGIN, y, MARGIN + 20.0, MARGIN + 85.0);
        layout::labeled_field(&mut c, "Nationality:", &r.resolve("nationality"), MARGIN + 90.0, y, MARGIN + 109.0, PAGE_WIDTH - MARGIN);
        y += 6.0;

        layout::labeled_field(&mut c, "Home Address:", &r.resolve("homeAddress"), MARGIN, y, MARGIN + 29.0, MARGIN + 125.0);
        layout::labeled_field(&mut c, "Home No.:", &r.resolve("homeNumber"), MARGIN + 130.0, y, MARGIN + 150.0, PAGE_WIDTH - MARGIN);
        y += 6.0;

        layout::labeled_field(&mut c, "Occupation:", &r.resolve("occupation"), MARGIN, y, MARGIN + 25.0, MARGIN + 95.0);
        layout::labeled_field(&mut c, "Office No.:", &r.resolve("officeNumber"), MARGIN + 100.0, y, MARGIN + 120.0, PAGE_WIDTH - MARGIN);
        y += 6.0;

        layout::labeled_field(&mut c, "Dental Insurance:", &r.resolve("dentalInsurance"), MARGIN, y, MARGIN + 35.0, MARGIN + 95.0);
        layout::labeled_field(&mut c, "Fax No.:", &r.resolve("faxNumber"), MARGIN + 100.0, y, MARGIN + 118.0, PAGE_WIDTH - MARGIN);
        y += 6.0;

        layout::labeled_field(&mut c, "Effective Date:", &r.resolve("effectiveDate"), MARGIN, y, MARGIN + 32.0, MARGIN + 95.0);
        layout::labeled_field(&mut c, "Cell/Mobile No.:", &r.resolve("mobileNumber"), MARGIN + 100.0, y, MARGIN + 130.0, PAGE_WIDTH - MARGIN);
        y += 8.0;

        layout::labeled_field(&mut c, "Email Add.:", &r.resolve("email"), MARGIN + 100.0, y, MARGIN + 122.0, PAGE_WIDTH - MARGIN);
        y += 6.0;

        c.text("For minors:", MARGIN, y, ChartFont::HelveticaBold, 8.0);
        y += 4.0;
        layout::labeled_field(&mut c, "Parent/ Guardian's Name:", &r.resolve("guardianName"), MARGIN, y, MARGIN + 48.0, PAGE_WIDTH - MARGIN);
        y += 6.0;
        layout::labeled_field(&mut c, "Occupation:", &r.resolve("guardianOccupation"), MARGIN, y, MARGIN + 25.0, PAGE_WIDTH - MARGIN);
        y += 6.0;
        layout::labeled_field(&mut c, "Whom may we thank for referring you?", &r.resolve("referredBy"), MARGIN, y, MARGIN + 72.0, PAGE_WIDTH - MARGIN);
        y += 6.0;
        layout::labeled_field(&mut c, "What is your reason for dental consultation?", &r.resolve("consultationReason"), MARGIN, y, MARGIN + 88.0, PAGE_WIDTH - MARGIN);
        y += 8.0;

        c.text("DENTAL HISTORY", MARGIN, y, ChartFont::HelveticaBold, 9.0);
        y += 5.0;
        layout::labeled_field(&mut c, "Previous Dentist: Dr.", &r.resolve("previousDentist"), MARGIN, y, MARGIN + 40.0, MARGIN + 105.0);
        layout::labeled_field(&mut c, "Last Dental visit:", &r.resolve("lastDentalVisit"), MARGIN + 110.0, y, MARGIN + 137.0, PAGE_WIDTH - MARGIN);
        y += 8.0;

        c.text("MEDICAL HISTORY", MARGIN, y, ChartFont::HelveticaBold, 9.0);
        y += 5.0;
        layout::labeled_field(&mut c, "Name of Physician: Dr.", &r.resolve("physicianName"), MARGIN, y, MARGIN + 45.0, MARGIN + 105.0);
        layout::labeled_field(&mut c, "Specialty, if applicable:", &r.resolve("physicianSpecialty"), MARGIN + 110.0, y, MARGIN + 147.0, PAGE_WIDTH - MARGIN);
        y += 6.0;
        layout::labeled_field(&mut c, "Office Address:", &r.resolve("physicianAddress"), MARGIN, y, MARGIN + 30.0, MARGIN + 105.0);
        layout::labeled_field(&mut c, "Office Number:", &r.resolve("physicianPhone"), MARGIN + 110.0, y, MARGIN + 137.0, PAGE_WIDTH - MARGIN);
        y += 8.0;

        // Questions 1-5
        let checkbox_x = PAGE_WIDTH - MARGIN - 27.0;
        c.text("1. Are you in good health?", MARGIN, y, ChartFont::Helvetica, 8.0);
        layout::yes_no_checkbox(&mut c, checkbox_x, y - 2.0, r.is_affirmative("goodHealth"), r.is_negative("goodHealth"));
        y += 4.5;

        c.text("2. Are you under medical treatment now?", MARGIN, y, ChartFont::Helvetica, 8.0);
        layout::yes_no_checkbox(&mut c, checkbox_x, y - 2.0, r.is_affirmative("underTreatment"), r.is_negative("underTreatment"));
        y += 4.0;
        c.text("   If so, what is the condition being treated?", MARGIN, y, ChartFont::Helvetica, 7.0);
        y += 4.5;

        c.text(
            "3. Have you ever been hospitalized or had serious illness or surgical operation?",
            MARGIN,
            y,
            ChartFont::Helvetica,
            8.0,
        );
        layout::yes_no_checkbox(&mut c, checkbox_x, y - 2.0, r.is_affirmative("seriousIllness"), r.is_negative("seriousIllness"));
        y += 4.0;
        c.text("   If so, what illness or operation?", MARGIN, y, ChartFont::Helvetica, 7.0);
        layout::underline(&mut c, MARGIN + 55.0, PAGE_WIDTH - MARGIN, y);
        y += 4.5;

        c.text("4. Have you been hospitalized?", MARGIN, y, ChartFont::Helvetica, 8.0);
        layout::yes_no_checkbox(&mut c, checkbox_x, y - 2.0, r.is_affirmative("hospitalized"), r.is_negative("hospitalized"));
        y += 4.0;
        c.text("   If so, when and why?", MARGIN, y, ChartFont::Helvetica, 7.0);
        layout::underline(&mut c, MARGIN + 40.0, PAGE_WIDTH - MARGIN, y);
        y += 4.5;

        c.text(
            "5. Are you taking any prescription/non-prescription medication?",
            MARGIN,
            y,
            ChartFont::Helvetica,
            8.0,
        );
        layout::yes_no_checkbox(&mut c, checkbox_x, y - 2.0, r.is_affirmative("takingMedication"), r.is_negative("takingMedication"));
        y += 4.0;
        c.text("   If so, please specify", MARGIN, y, ChartFont::Helvetica, 7.0);
        layout::underline(&mut c, MARGIN + 40.0, PAGE_WIDTH - MARGIN, y);

        layout::footer(&mut c, 1);
        c
    }

    /// Page 2: medical questions 6-13 with the allergy and condition
    /// checkbox grids.
    fn page_medical_history(&self, r: &FieldResolver) -> PageCanvas {
        let mut c = PageCanvas::new();
        let mut y = MARGIN + 5.0;
        let checkbox_x = PAGE_WIDTH - MARGIN - 27.0;

        c.text("6. Do you use tobacco products?", MARGIN, y, ChartFont::Helvetica, 8.0);
        layout::yes_no_checkbox(&mut c, checkbox_x, y - 2.0, r.is_affirmative("tobacco"), r.is_negative("tobacco"));
        y += 5.0;

        c.text("7. Do you use alcohol, cocaine or other dangerous drugs?", MARGIN, y, ChartFont::Helvetica, 8.0);
        layout::yes_no_checkbox(&mut c, checkbox_x, y - 2.0, r.is_affirmative("dangerousDrugs"), r.is_negative("dangerousDrugs"));
        y += 5.0;

        c.text("8. Are you allergic to any of the following:", MARGIN, y, ChartFont::Helvetica, 8.0);
        y += 4.0;
        let col1 = MARGIN + 5.0;
        let col2 = MARGIN + 70.0;
        let col3 = MARGIN + 130.0;
        layout::paren_checkbox(&mut c, "Local Anesthetic (ex. Lidocaine)", r.is_affirmative("allergyAnesthetic"), col1, y);
        layout::paren_checkbox(&mut c, "Penicillin, Antibiotics", r.is_affirmative("allergyPenicillin"), col2, y);
        y += 3.5;
        layout::paren_checkbox(&mut c, "Aspirin", r.is_affirmative("allergyAspirin"), col1, y);
        layout::paren_checkbox(&mut c, "Latex", r.is_affirmative("allergyLatex"), col2, y);
        y += 3.5;
        layout::paren_checkbox(&mut c, "Sulfa drugs", r.is_affirmative("allergySulfa"), col3, y);
        y += 3.5;
        layout::paren_checkbox(&mut c, "Others", r.is_affirmative("allergyOthers"), col3, y);
        y += 5.0;

        layout::labeled_field(&mut c, "9. Bleeding Time:", &r.resolve("bleedingTime"), MARGIN, y, MARGIN + 30.0, MARGIN + 60.0);
        y += 5.0;

        c.text("10. For women only:", MARGIN, y, ChartFont::Helvetica, 8.0);
        y += 4.0;
        c.text("    Are you pregnant?", MARGIN, y, ChartFont::Helvetica, 8.0);
        layout::yes_no_checkbox(&mut c, checkbox_x, y - 2.0, r.is_affirmative("pregnant"), r.is_negative("pregnant"));
        y += 4.0;
        c.text("    Are you nursing?", MARGIN, y, ChartFont::Helvetica, 8.0);
        layout::yes_no_checkbox(&mut c, checkbox_x, y - 2.0, r.is_affirmative("nursing"), r.is_negative("nursing"));
        y += 4.0;
        c.text("    Are you taking birth control pills?", MARGIN, y, ChartFont::Helvetica, 8.0);
        layout::yes_no_checkbox(&mut c, checkbox_x, y - 2.0, r.is_affirmative("birthControl"), r.is_negative("birthControl"));
        y += 5.0;

        c.text("11.", MARGIN, y, ChartFont::Helvetica, 8.0);
        layout::labeled_field(&mut c, "Blood Type:", &r.resolve("bloodType"), MARGIN + 6.0, y, MARGIN + 25.0, MARGIN + 50.0);
        y += 5.0;

        c.text("12.", MARGIN, y, ChartFont::Helvetica, 8.0);
        layout::labeled_field(&mut c, "Blood Pressure:", &r.resolve("bloodPressure"), MARGIN + 6.0, y, MARGIN + 30.0, MARGIN + 60.0);
        y += 6.0;

        c.text("13.", MARGIN, y, ChartFont::Helvetica, 8.0);
        c.text(
            "Do you have or have you had any of the following? Check which apply:",
            MARGIN + 6.0,
            y,
            ChartFont::Helvetica,
            8.0,
        );
        y += 4.0;

        let cols = [MARGIN + 3.0, MARGIN + 65.0, MARGIN + 125.0];
        for row in &CONDITION_ROWS {
            for (i, (label, key)) in row.iter().enumerate() {
                if label.is_empty() {
                    continue;
                }
                let checked = r.is_affirmative(&format!("condition_{}", key)) || r.is_affirmative(key);
                layout::paren_checkbox(&mut c, label, checked, cols[i], y);
            }
            y += 3.2;
        }

        y += 4.0;
        c.set_draw_color(0, 0, 0);
        c.set_line_width(0.3);
        c.line(PAGE_WIDTH - 50.0, y, PAGE_WIDTH - MARGIN, y);
        c.text("Signature", PAGE_WIDTH - 32.0, y + 3.0, ChartFont::Helvetica, 7.0);

        layout::footer(&mut c, 2);
        c
    }

    /// Page 3: the consent paragraphs with per-section initials and the
    /// signature block.
    fn page_informed_consent(&self, r: &FieldResolver) -> PageCanvas {
        let mut c = PageCanvas::new();
        let mut y = MARGIN + 10.0;
        layout::banner(&mut c, "INFORMED CONSENT", y, 12.0, (180, 180, 180), 13.0);
        y += 18.0;

        for (title, text, initial_key) in CONSENT_SECTIONS {
            c.text(title, MARGIN, y, ChartFont::HelveticaBold, 7.0);
            y += 3.0;
            let consumed = layout::paragraph(
                &mut c,
                text,
                MARGIN,
                y,
                PAGE_WIDTH - 2.0 * MARGIN,
                ChartFont::Helvetica,
                6.5,
            );
            let initials = r.resolve(initial_key);
            c.text(
                &format!("Initials: {}", initials),
                PAGE_WIDTH - MARGIN - 40.0,
                y + consumed + 3.0,
                ChartFont::HelveticaBold,
                7.0,
            );
            y += consumed + 7.0;
        }

        let consumed = layout::paragraph(
            &mut c,
            FINAL_CONSENT,
            MARGIN,
            y,
            PAGE_WIDTH - 2.0 * MARGIN,
            ChartFont::Helvetica,
            6.5,
        );
        y += consumed + 5.0;

        let date = r.resolve("signatureDate");
        c.set_draw_color(0, 0, 0);
        c.set_line_width(0.3);

        c.line(MARGIN, y, MARGIN + 70.0, y);
        c.text(&r.resolve("patientSignature"), MARGIN + 2.0, y - 1.0, ChartFont::Helvetica, 7.0);
        c.text("Patient/Parent/Guardian Signature", MARGIN, y + 3.5, ChartFont::Helvetica, 7.0);
        c.text_centered(&date, MARGIN + 107.5, y - 1.0, ChartFont::Helvetica, 6.5);
        c.line(MARGIN + 85.0, y, MARGIN + 130.0, y);
        c.text("Date", MARGIN + 100.0, y + 3.5, ChartFont::Helvetica, 7.0);

        y += 8.0;
        c.line(MARGIN, y, MARGIN + 70.0, y);
        c.text(&r.resolve("dentistSignature"), MARGIN + 2.0, y - 1.0, ChartFont::Helvetica, 7.0);
        c.text("Dentist Signature", MARGIN, y + 3.5, ChartFont::Helvetica, 7.0);
        c.text_centered(&date, MARGIN + 107.5, y - 1.0, ChartFont::Helvetica, 6.5);
        c.line(MARGIN + 85.0, y, MARGIN + 130.0, y);
        c.text("Date", MARGIN + 100.0, y + 3.5, ChartFont::Helvetica, 7.0);

        layout::footer(&mut c, 3);
        c
    }

    /// Page 4: the odontogram with its legend and clinical findings.
    fn page_dental_chart(&self, r: &FieldResolver) -> PageCanvas {
        let mut c = PageCanvas::new();
        let mut y = MARGIN + 10.0;
        layout::banner(&mut c, "DENTAL RECORD CHART", y, 12.0, (180, 180, 180), 13.0);
        y += 18.0;

        c.text("INTRAORAL EXAMINATION", MARGIN, y, ChartFont::HelveticaBold, 9.0);

        let name = format!(
            "{} {} {}",
            r.resolve("firstName"),
            r.resolve("middleName"),
            r.resolve("lastName")
        )
        .trim()
        .to_string();
        c.text(&format!("Name: {}", name), PAGE_WIDTH - 110.0, y, ChartFont::Helvetica, 8.0);
        y += 4.0;
        let age = non_blank(r.resolve("age"));
        let sex = non_blank(r.resolve("sex"));
        c.text(&format!("Age: {}", age), PAGE_WIDTH - 110.0, y, ChartFont::Helvetica, 8.0);
        c.text(&format!("Gender: M/F {}", sex), PAGE_WIDTH - 70.0, y, ChartFont::Helvetica, 8.0);
        let date = match r.resolve("signatureDate") {
            d if d.is_empty() => format!("{}/{}/{}", self.today.month(), self.today.day(), self.today.year()),
            d => d,
        };
        c.text(&format!("Date: {}", date), PAGE_WIDTH - 40.0, y, ChartFont::Helvetica, 8.0);
        y += 8.0;

        odontogram::draw_arches(&mut c, r.teeth(), y);
        odontogram::draw_legend(&mut c);
        odontogram::draw_clinical_findings(&mut c, r);

        layout::footer(&mut c, 4);
        c
    }

    /// Page 5 and any continuation pages holding the treatment table.
    fn pages_treatment_record(&self, r: &FieldResolver) -> Vec<PageCanvas> {
        let rows = table::build_rows(r);
        let mut pages = Vec::new();
        let mut remaining: &[table::Row] = &rows;
        let mut first = true;

        while !remaining.is_empty() {
            let mut c = PageCanvas::new();
            let start_y = if first {
                let mut y = 13.0;
                let name = format!("{}, {}", r.resolve("lastName"), r.resolve("firstName"));
                c.text(&format!("Name: {}", name), MARGIN, y, ChartFont::Helvetica, 8.0);
                c.text(&format!("Age: {}", non_blank(r.resolve("age"))), PAGE_WIDTH - 80.0, y, ChartFont::Helvetica, 8.0);
                c.text(&format!("Gender: M/F {}", non_blank(r.resolve("sex"))), PAGE_WIDTH - 50.0, y, ChartFont::Helvetica, 8.0);
                y += 10.0;
                layout::banner(&mut c, "TREATMENT RECORD", y, 10.0, (52, 152, 219), 12.0);
                y + 15.0
            } else {
                MARGIN + 5.0
            };

            let drawn = table::draw_chunk(&mut c, remaining, start_y);
            remaining = &remaining[drawn..];

            layout::footer(&mut c, 5);
            c.set_text_color(180, 180, 180);
            c.text("mcml/10", PAGE_WIDTH - MARGIN - 10.0, PAGE_HEIGHT - 5.0, ChartFont::Helvetica, 6.0);

            pages.push(c);
            first = false;
        }
        pages
    }
}

/// The association header drawn on page 1 only.
fn page_one_header(c: &mut PageCanvas) {
    // Logo placeholder
    c.set_draw_color(150, 100, 180);
    c.set_line_width(1.5);
    c.circle(MARGIN + 19.0, 26.0, 13.0);

    c.set_text_color(0, 0, 0);
    c.text("PHILIPPINE DENTAL ASSOCIATION", MARGIN + 45.0, 20.0, ChartFont::HelveticaBold, 14.0);

    c.set_fill_color(52, 152, 219);
    c.filled_rounded_rect(MARGIN + 45.0, 25.0, 70.0, 10.0, 2.0);
    c.set_text_color(255, 255, 255);
    c.text_centered("DENTAL CHART", MARGIN + 80.0, 31.0, ChartFont::HelveticaBold, 11.0);
    c.set_text_color(0, 0, 0);

    // Photo box
    c.set_draw_color(0, 0, 0);
    c.set_line_width(0.3);
    c.rect(PAGE_WIDTH - MARGIN - 48.0, 12.0, 48.0, 28.0);
    c.set_text_color(150, 150, 150);
    c.text_centered("(Photo)", PAGE_WIDTH - MARGIN - 24.0, 27.0, ChartFont::Helvetica, 9.0);
    c.set_text_color(0, 0, 0);
}

fn non_blank(value: String) -> String {
    if value.is_empty() {
        "___".to_string()
    } else {
        value
    }
}

fn non_empty(value: String) -> String {
    if value.is_empty() {
        "Patient".to_string()
    } else {
        value
    }
}

/// `<Last>_<First>_Dental_Chart.pdf`, whitespace collapsed to
/// underscores. Falls back to `Patient` when no last name is known.
fn file_name(resolver: &FieldResolver) -> String {
    let last = non_empty(resolver.resolve("lastName"));
    let first = resolver.resolve("firstName");
    let stem = if first.is_empty() {
        last
    } else {
        format!("{}_{}", last, first)
    };
    format!("{}_Dental_Chart.pdf", WHITESPACE.replace_all(&stem, "_"))
}
