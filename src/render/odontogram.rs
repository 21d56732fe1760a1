//! The odontogram: four centred tooth arches with per-tooth glyphs,
//! the legend, and the clinical findings columns.

use crate::fields::FieldResolver;
use crate::render::page::{PageCanvas, MARGIN, PAGE_WIDTH};
use crate::teeth::{
    ToothFinding, LOWER_DECIDUOUS, LOWER_PERMANENT, UPPER_DECIDUOUS, UPPER_PERMANENT,
};
use crate::writer::ChartFont;

/// Horizontal pitch between tooth centres.
const TOOTH_WIDTH: f32 = 7.0;

/// Draw the four arches starting at `start_y`. Returns the y just
/// below the chart.
pub fn draw_arches(canvas: &mut PageCanvas, findings: &[ToothFinding], start_y: f32) -> f32 {
    canvas.text("RIGHT", MARGIN + 5.0, start_y + 15.0, ChartFont::HelveticaBold, 7.0);
    canvas.text("LEFT", PAGE_WIDTH - MARGIN - 20.0, start_y + 15.0, ChartFont::HelveticaBold, 7.0);

    canvas.set_draw_color(0, 0, 0);
    canvas.set_line_width(0.4);

    let mut y = start_y + 5.0;

    // Upper deciduous: numbers above small circles
    row_labels(canvas, &UPPER_DECIDUOUS, y);
    y += 4.0;
    row_circles(canvas, &UPPER_DECIDUOUS, findings, y, ArchRow::Deciduous);
    y += 8.0;

    // Upper permanent: numbers above large circles
    row_labels(canvas, &UPPER_PERMANENT, y);
    y += 5.0;
    row_circles(canvas, &UPPER_PERMANENT, findings, y, ArchRow::Permanent);
    y += 10.0;

    // Lower permanent: circles first, numbers below
    row_circles(canvas, &LOWER_PERMANENT, findings, y, ArchRow::Permanent);
    y += 7.0;
    row_labels(canvas, &LOWER_PERMANENT, y);
    y += 6.0;

    // Lower deciduous
    row_circles(canvas, &LOWER_DECIDUOUS, findings, y, ArchRow::Deciduous);
    y += 5.0;
    row_labels(canvas, &LOWER_DECIDUOUS, y);

    y + 10.0
}

fn arch_start(len: usize) -> f32 {
    PAGE_WIDTH / 2.0 - (len as f32 * TOOTH_WIDTH / 2.0)
}

fn row_labels(canvas: &mut PageCanvas, teeth: &[&str], y: f32) {
    let mut x = arch_start(teeth.len());
    for tooth in teeth {
        canvas.text_centered(tooth, x + 3.5, y, ChartFont::Helvetica, 6.0);
        x += TOOTH_WIDTH;
    }
}

/// Deciduous teeth draw smaller than permanent ones.
#[derive(Clone, Copy)]
enum ArchRow {
    Deciduous,
    Permanent,
}

impl ArchRow {
    fn radius(self) -> f32 {
        match self {
            ArchRow::Deciduous => 2.2,
            ArchRow::Permanent => 3.0,
        }
    }

    fn center_offset(self) -> f32 {
        match self {
            ArchRow::Deciduous => 1.5,
            ArchRow::Permanent => 2.0,
        }
    }

    fn glyph_size(self) -> f32 {
        match self {
            ArchRow::Deciduous => 4.0,
            ArchRow::Permanent => 5.0,
        }
    }
}

fn row_circles(canvas: &mut PageCanvas, teeth: &[&str], findings: &[ToothFinding], y: f32, row: ArchRow) {
    let mut x = arch_start(teeth.len());
    for tooth in teeth {
        canvas.circle(x + 3.5, y + row.center_offset(), row.radius());
        if let Some(glyph) = findings
            .iter()
            .find(|f| f.tooth_number == *tooth)
            .and_then(ToothFinding::display_glyph)
        {
            canvas.text_centered(
                &glyph,
                x + 3.5,
                y + row.center_offset() + 0.5,
                ChartFont::Helvetica,
                row.glyph_size(),
            );
        }
        x += TOOTH_WIDTH;
    }
}

/// The legend's three columns at their fixed positions.
pub fn draw_legend(canvas: &mut PageCanvas) {
    canvas.text("Legend:", MARGIN, 145.0, ChartFont::HelveticaBold, 6.0);

    let columns: [(f32, &str, &[&str]); 3] = [
        (
            MARGIN + 2.0,
            "Condition",
            &[
                "P - Present Teeth",
                "D - Decayed (Caries indicated for Filling)",
                "M - Missing due to Caries",
                "MO - Missing due to Other Causes",
                "Im - Impacted Tooth",
                "Sp - Supernumerary Tooth",
                "Rf - Root Fragment",
                "Un - Unerupted",
            ],
        ),
        (
            MARGIN + 65.0,
            "Restorations & Prosthetics",
            &[
                "Am - Amalgam Filling",
                "Co - Composite Filling",
                "JC - Jacket Crown",
                "Ab - Abutment",
                "Att - Attachment",
                "P - Pontic",
                "In - Inlay",
                "Imp - Implant",
                "S - Sealants",
                "Rm - Removable Denture",
            ],
        ),
        (
            MARGIN + 130.0,
            "Surgery",
            &[
                "X - Extraction due to Caries",
                "XO - Extraction due to Other Causes",
                "",
                "X-ray Taken:",
                "  Periapical (Th No.: ___)",
                "  Panoramic",
                "  Cephalometric",
                "  Occlusal (Upper/Lower)",
                "  Others:",
            ],
        ),
    ];

    for (x, title, items) in columns {
        let mut y = 150.0;
        canvas.text(title, x, y, ChartFont::HelveticaBold, 5.5);
        y += 3.0;
        for item in items {
            canvas.text(item, x, y, ChartFont::Helvetica, 5.5);
            y += 2.5;
        }
    }
}

/// Clinical findings columns: periodontal screening, occlusion,
/// appliances, and TMD. A present finding is ticked, an absent or
/// unknown one keeps its blank.
pub fn draw_clinical_findings(canvas: &mut PageCanvas, resolver: &FieldResolver) {
    const CLINICAL_Y: f32 = 175.0;

    // Screening columns tick only an explicit "present"; the occlusion
    // and appliance columns also tick free-text answers like the molar
    // class.
    let columns: [(f32, &str, bool, &[(&str, &str)]); 4] = [
        (
            MARGIN,
            "Periodontal Screening:",
            false,
            &[
                ("Gingivitis", "gingivitis"),
                ("Early Periodontitis", "earlyPeriodontitis"),
                ("Moderate Periodontitis", "moderatePeriodontitis"),
                ("Advanced Periodontitis", "advancedPeriodontitis"),
            ],
        ),
        (
            MARGIN + 50.0,
            "Occlusion:",
            true,
            &[
                ("Class (Molar)", "occlusionClass"),
                ("Overjet", "overjet"),
                ("Overbite", "overbite"),
                ("Midline Deviation", "midlineDeviation"),
                ("Crossbite", "crossbite"),
            ],
        ),
        (
            MARGIN + 100.0,
            "Appliances:",
            true,
            &[
                ("Orthodontic", "orthodontic"),
                ("Stayplate", "stayplate"),
                ("Others", "otherAppliances"),
            ],
        ),
        (
            MARGIN + 145.0,
            "TMD:",
            false,
            &[
                ("Clenching", "clenching"),
                ("Clicking", "clicking"),
                ("Trismus", "trismus"),
                ("Muscle Spasm", "muscleSpasm"),
            ],
        ),
    ];

    for (x, title, any_text_ticks, items) in columns {
        canvas.text(title, x, CLINICAL_Y, ChartFont::HelveticaBold, 6.0);
        let mut y = CLINICAL_Y + 3.0;
        for (label, key) in items {
            let value = resolver.resolve(key);
            let checked = value == "present" || value == "Present" || (any_text_ticks && !value.is_empty());
            let mark = if checked { "/" } else { "_____" };
            canvas.text(mark, x, y, ChartFont::Helvetica, 5.5);
            canvas.text(label, x + 8.0, y, ChartFont::Helvetica, 5.5);
            y += 3.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{CanonicalFieldMap, FieldValue, UserEdits};
    use crate::teeth::{SurgeryCode, ToothCondition};

    fn content(canvas: PageCanvas) -> String {
        String::from_utf8(canvas.into_builder().build().unwrap()).unwrap()
    }

    #[test]
    fn test_all_fifty_two_circles_drawn() {
        let mut canvas = PageCanvas::new();
        draw_arches(&mut canvas, &[], 50.0);
        let stream = content(canvas);
        // 4 cubic segments per circle
        assert_eq!(stream.matches(" c\n").count(), 52 * 4);
    }

    #[test]
    fn test_glyphs_drawn_for_findings() {
        let findings = vec![
            ToothFinding {
                tooth_number: "18".to_string(),
                condition: Some(ToothCondition::Decayed),
                restorations: Vec::new(),
                surgeries: Vec::new(),
            },
            ToothFinding {
                tooth_number: "36".to_string(),
                condition: None,
                restorations: Vec::new(),
                surgeries: vec![SurgeryCode::ExtractionOther],
            },
        ];
        let mut canvas = PageCanvas::new();
        draw_arches(&mut canvas, &findings, 50.0);
        let stream = content(canvas);
        assert!(stream.contains("(D) Tj"));
        assert!(stream.contains("(XO) Tj"));
    }

    #[test]
    fn test_present_tooth_circle_stays_empty() {
        let findings = vec![ToothFinding {
            tooth_number: "11".to_string(),
            condition: Some(ToothCondition::Present),
            restorations: Vec::new(),
            surgeries: Vec::new(),
        }];
        let mut canvas = PageCanvas::new();
        draw_arches(&mut canvas, &findings, 50.0);
        let stream = content(canvas);
        // Tooth labels appear, but no glyph beyond them
        assert!(stream.contains("(11) Tj"));
        assert!(!stream.contains("(P) Tj"));
    }

    #[test]
    fn test_legend_columns() {
        let mut canvas = PageCanvas::new();
        draw_legend(&mut canvas);
        let stream = content(canvas);
        assert!(stream.contains("(Legend:) Tj"));
        assert!(stream.contains("(Rm - Removable Denture) Tj"));
        assert!(stream.contains("(X - Extraction due to Caries) Tj"));
    }

    #[test]
    fn test_clinical_findings_tick_present() {
        let mut canonical = CanonicalFieldMap::new();
        canonical.insert("gingivitis".to_string(), FieldValue::Text("present".to_string()));
        canonical.insert("clenching".to_string(), FieldValue::Text("absent".to_string()));
        let edits = UserEdits::new();
        let resolver = FieldResolver::new(&canonical, &edits);

        let mut canvas = PageCanvas::new();
        draw_clinical_findings(&mut canvas, &resolver);
        let stream = content(canvas);
        assert!(stream.contains("(Gingivitis) Tj"));
        assert!(stream.contains("(/) Tj"));
        assert!(stream.contains("(_____) Tj"));
    }
}
