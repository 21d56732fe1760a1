//! The treatment record grid: eight columns, thirty-row minimum, with
//! re-flow onto continuation pages when the history is long.

use crate::fields::FieldResolver;
use crate::render::page::{PageCanvas, MARGIN, MM, PAGE_HEIGHT};
use crate::schema::value_text;
use crate::writer::ChartFont;

/// Column widths in millimetres.
pub const COLUMN_WIDTHS: [f32; 8] = [20.0, 12.0, 50.0, 30.0, 20.0, 20.0, 18.0, 16.0];

/// Header labels; embedded newlines stack within the header row.
const HEADERS: [&str; 8] = [
    "Date",
    "Tooth\nNo./s",
    "Procedure",
    "Dentist/s",
    "Amount\ncharged",
    "Amount\nPaid",
    "Balance",
    "Next\nAppt.",
];

#[derive(Clone, Copy, PartialEq)]
enum Align {
    Left,
    Center,
    Right,
}

const ALIGNS: [Align; 8] = [
    Align::Center,
    Align::Center,
    Align::Left,
    Align::Left,
    Align::Right,
    Align::Right,
    Align::Right,
    Align::Center,
];

/// Minimum body row height.
const MIN_ROW_HEIGHT: f32 = 7.0;

const HEADER_HEIGHT: f32 = 10.0;
const CELL_PADDING: f32 = 1.5;
const LINE_HEIGHT: f32 = 3.0;

/// Rows drawn below this line spill to a continuation page.
const BOTTOM_LIMIT: f32 = PAGE_HEIGHT - 18.0;

/// One rendered row, eight cells.
pub type Row = [String; 8];

/// Assemble the table body. A reviewer-entered row takes priority over
/// the extracted history; either way the table is padded with blanks to
/// thirty rows.
pub fn build_rows(resolver: &FieldResolver) -> Vec<Row> {
    let mut rows = Vec::new();

    if resolver.has_treatment_edits() {
        rows.push([
            resolver.edit("treatmentDate").unwrap_or_default().to_string(),
            resolver.edit("toothNumbers").unwrap_or_default().to_string(),
            resolver.edit("procedure").unwrap_or_default().to_string(),
            resolver.edit("dentistName").unwrap_or_default().to_string(),
            resolver.edit("amountCharged").unwrap_or_default().to_string(),
            resolver.edit("amountPaid").unwrap_or_default().to_string(),
            resolver.edit("balance").unwrap_or_default().to_string(),
            resolver.edit("nextAppointment").unwrap_or_default().to_string(),
        ]);
    } else {
        for record in resolver.records() {
            rows.push([
                record.date.clone().unwrap_or_default(),
                record.tooth_quantity.clone().unwrap_or_default(),
                record.procedure.clone().unwrap_or_default(),
                record.dentist.clone().unwrap_or_default(),
                record.amount_charged.as_ref().map(value_text).unwrap_or_default(),
                record.amount_paid.as_ref().map(value_text).unwrap_or_default(),
                record.balance.as_ref().map(value_text).unwrap_or_default(),
                record.next_appointment.clone().unwrap_or_default(),
            ]);
        }
    }

    while rows.len() < 30 {
        rows.push(Default::default());
    }
    rows
}

/// Draw the header and as many rows as fit, starting at `start_y`.
/// Returns the number of rows consumed; the caller re-flows the rest
/// onto the next page.
pub fn draw_chunk(canvas: &mut PageCanvas, rows: &[Row], start_y: f32) -> usize {
    let mut y = start_y;
    draw_header(canvas, y);
    y += HEADER_HEIGHT;

    let mut drawn = 0;
    for row in rows {
        let height = row_height(row);
        if y + height > BOTTOM_LIMIT && drawn > 0 {
            break;
        }
        draw_row(canvas, row, y, height);
        y += height;
        drawn += 1;
    }
    drawn
}

fn column_x(index: usize) -> f32 {
    MARGIN + COLUMN_WIDTHS[..index].iter().sum::<f32>()
}

fn table_width() -> f32 {
    COLUMN_WIDTHS.iter().sum()
}

fn row_height(row: &Row) -> f32 {
    let mut lines = 1;
    for (i, cell) in row.iter().enumerate() {
        if cell.is_empty() {
            continue;
        }
        let width = (COLUMN_WIDTHS[i] - 2.0 * CELL_PADDING) * MM;
        lines = lines.max(ChartFont::Helvetica.wrap_text(cell, 7.0, width).len());
    }
    (lines as f32 * LINE_HEIGHT + 2.0 * CELL_PADDING).max(MIN_ROW_HEIGHT)
}

fn draw_header(canvas: &mut PageCanvas, y: f32) {
    canvas.set_fill_color(220, 220, 220);
    canvas.filled_rect(MARGIN, y, table_width(), HEADER_HEIGHT);

    canvas.set_draw_color(0, 0, 0);
    canvas.set_line_width(0.4);
    grid_lines(canvas, y, HEADER_HEIGHT);

    canvas.set_text_color(0, 0, 0);
    for (i, header) in HEADERS.iter().enumerate() {
        let lines: Vec<&str> = header.split('\n').collect();
        let block_height = lines.len() as f32 * LINE_HEIGHT;
        let mut line_y = y + (HEADER_HEIGHT - block_height) / 2.0 + LINE_HEIGHT - 0.5;
        let center = column_x(i) + COLUMN_WIDTHS[i] / 2.0;
        for line in lines {
            canvas.text_centered(line, center, line_y, ChartFont::HelveticaBold, 8.0);
            line_y += LINE_HEIGHT;
        }
    }
}

fn draw_row(canvas: &mut PageCanvas, row: &Row, y: f32, height: f32) {
    canvas.set_draw_color(150, 150, 150);
    canvas.set_line_width(0.3);
    grid_lines(canvas, y, height);

    canvas.set_text_color(0, 0, 0);
    for (i, cell) in row.iter().enumerate() {
        if cell.is_empty() {
            continue;
        }
        let width = (COLUMN_WIDTHS[i] - 2.0 * CELL_PADDING) * MM;
        let mut line_y = y + CELL_PADDING + LINE_HEIGHT - 0.5;
        for (line, _) in ChartFont::Helvetica.wrap_text(cell, 7.0, width) {
            match ALIGNS[i] {
                Align::Left => {
                    canvas.text(&line, column_x(i) + CELL_PADDING, line_y, ChartFont::Helvetica, 7.0);
                },
                Align::Center => {
                    let center = column_x(i) + COLUMN_WIDTHS[i] / 2.0;
                    canvas.text_centered(&line, center, line_y, ChartFont::Helvetica, 7.0);
                },
                Align::Right => {
                    let right = column_x(i) + COLUMN_WIDTHS[i] - CELL_PADDING;
                    canvas.text_right(&line, right, line_y, ChartFont::Helvetica, 7.0);
                },
            }
            line_y += LINE_HEIGHT;
        }
    }
}

fn grid_lines(canvas: &mut PageCanvas, y: f32, height: f32) {
    let right = MARGIN + table_width();
    canvas.line(MARGIN, y, right, y);
    canvas.line(MARGIN, y + height, right, y + height);
    for i in 0..COLUMN_WIDTHS.len() {
        canvas.line(column_x(i), y, column_x(i), y + height);
    }
    canvas.line(right, y, right, y + height);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{CanonicalFieldMap, FieldValue, UserEdits};
    use crate::schema::RawExtraction;

    #[test]
    fn test_empty_chart_still_has_thirty_rows() {
        let canonical = CanonicalFieldMap::new();
        let edits = UserEdits::new();
        let rows = build_rows(&FieldResolver::new(&canonical, &edits));
        assert_eq!(rows.len(), 30);
        assert!(rows.iter().all(|r| r.iter().all(String::is_empty)));
    }

    #[test]
    fn test_edited_row_shadows_history() {
        let raw = RawExtraction::from_json(
            r#"{"treatmentRecord":[
                {"date":"01/05/24","procedure":"Cleaning"},
                {"date":"02/10/24","procedure":"Extraction"}
            ]}"#,
        )
        .unwrap();
        let mut canonical = CanonicalFieldMap::new();
        canonical.insert(
            "treatmentRecord".to_string(),
            FieldValue::Records(raw.treatment_record),
        );
        let mut edits = UserEdits::new();
        edits.insert("procedure".to_string(), "Root canal".to_string());
        edits.insert("balance".to_string(), "750".to_string());

        let rows = build_rows(&FieldResolver::new(&canonical, &edits));
        assert_eq!(rows.len(), 30);
        assert_eq!(rows[0][2], "Root canal");
        assert_eq!(rows[0][6], "750");
        // The extracted history does not appear
        assert!(rows[1].iter().all(String::is_empty));
    }

    #[test]
    fn test_history_rows_in_order() {
        let raw = RawExtraction::from_json(
            r#"{"treatmentRecord":[
                {"date":"01/05/24","toothNumber":"36","treatment":"Extraction",
                 "dentist":"Dr. Reyes","amountCharged":1500,"amountPaid":"500",
                 "balance":1000,"nextVisit":"02/05/24"},
                {"date":"02/05/24","procedure":"Follow-up"}
            ]}"#,
        )
        .unwrap();
        let mut canonical = CanonicalFieldMap::new();
        canonical.insert(
            "treatmentRecord".to_string(),
            FieldValue::Records(raw.treatment_record),
        );
        let edits = UserEdits::new();

        let rows = build_rows(&FieldResolver::new(&canonical, &edits));
        assert_eq!(
            rows[0],
            [
                "01/05/24".to_string(),
                "36".to_string(),
                "Extraction".to_string(),
                "Dr. Reyes".to_string(),
                "1500".to_string(),
                "500".to_string(),
                "1000".to_string(),
                "02/05/24".to_string(),
            ]
        );
        assert_eq!(rows[1][2], "Follow-up");
    }

    #[test]
    fn test_long_history_keeps_every_row() {
        let records: Vec<String> = (0..45)
            .map(|i| format!(r#"{{"date":"01/{:02}/24","procedure":"Visit {}"}}"#, i % 28 + 1, i))
            .collect();
        let json = format!(r#"{{"treatmentRecord":[{}]}}"#, records.join(","));
        let raw = RawExtraction::from_json(&json).unwrap();
        let mut canonical = CanonicalFieldMap::new();
        canonical.insert(
            "treatmentRecord".to_string(),
            FieldValue::Records(raw.treatment_record),
        );
        let edits = UserEdits::new();
        let rows = build_rows(&FieldResolver::new(&canonical, &edits));
        assert_eq!(rows.len(), 45);
    }

    #[test]
    fn test_chunk_never_exceeds_page() {
        let rows: Vec<Row> = (0..45).map(|_| Default::default()).collect();
        let mut canvas = PageCanvas::new();
        let drawn = draw_chunk(&mut canvas, &rows, 40.0);
        assert!(drawn > 0);
        assert!(drawn < 45);
        // The rows that fit end above the footer area
        let used = 40.0 + HEADER_HEIGHT + drawn as f32 * MIN_ROW_HEIGHT;
        assert!(used <= BOTTOM_LIMIT);
    }

    #[test]
    fn test_row_height_grows_with_long_procedure() {
        let mut row: Row = Default::default();
        row[2] = "Full mouth rehabilitation with multiple crown preparations and provisional restorations".to_string();
        assert!(row_height(&row) > MIN_ROW_HEIGHT);
    }
}
