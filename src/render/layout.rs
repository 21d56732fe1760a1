//! Shared form widgets: labelled underline fields, checkbox styles,
//! banner headers, wrapped paragraphs, and the page footer.

use crate::render::page::{PageCanvas, MARGIN, MM, PAGE_HEIGHT, PAGE_WIDTH};
use crate::writer::ChartFont;

/// Baseline-to-baseline distance for wrapped consent text.
pub const PARAGRAPH_LINE_HEIGHT: f32 = 2.8;

/// A label, an underline, and the value sitting on it.
///
/// The label baseline is at `(x, y)`, the underline runs from
/// `line_start` to `line_end` just under the baseline, and the value is
/// printed on the line.
pub fn labeled_field(
    canvas: &mut PageCanvas,
    label: &str,
    value: &str,
    x: f32,
    y: f32,
    line_start: f32,
    line_end: f32,
) {
    canvas.text(label, x, y, ChartFont::Helvetica, 8.0);
    canvas.line(line_start, y + 1.0, line_end, y + 1.0);
    canvas.text(value, line_start + 1.0, y - 0.5, ChartFont::Helvetica, 8.0);
}

/// A bare underline with no label.
pub fn underline(canvas: &mut PageCanvas, x1: f32, x2: f32, y: f32) {
    canvas.line(x1, y + 1.0, x2, y + 1.0);
}

/// Side-by-side Yes and No boxes, 3mm square, with an X in the chosen
/// one.
pub fn yes_no_checkbox(canvas: &mut PageCanvas, x: f32, y: f32, yes: bool, no: bool) {
    canvas.set_draw_color(100, 100, 100);
    canvas.set_line_width(0.3);

    canvas.rect(x, y, 3.0, 3.0);
    if yes {
        canvas.text("X", x + 0.5, y + 2.3, ChartFont::HelveticaBold, 9.0);
    }
    canvas.text("Yes", x + 4.0, y + 2.3, ChartFont::Helvetica, 8.0);

    canvas.rect(x + 12.0, y, 3.0, 3.0);
    if no {
        canvas.text("X", x + 12.5, y + 2.3, ChartFont::HelveticaBold, 9.0);
    }
    canvas.text("No", x + 16.0, y + 2.3, ChartFont::Helvetica, 8.0);
}

/// Parenthesis-style checkbox, `( X ) Label`.
pub fn paren_checkbox(canvas: &mut PageCanvas, label: &str, checked: bool, x: f32, y: f32) {
    canvas.text("(", x, y, ChartFont::Helvetica, 8.0);
    if checked {
        canvas.text("X", x + 1.0, y, ChartFont::HelveticaBold, 8.0);
    }
    canvas.text(")", x + 2.5, y, ChartFont::Helvetica, 8.0);
    canvas.text(label, x + 4.5, y, ChartFont::Helvetica, 8.0);
}

/// Rounded banner header with centred white title text.
pub fn banner(canvas: &mut PageCanvas, title: &str, y: f32, height: f32, fill: (u8, u8, u8), size: f32) {
    canvas.set_fill_color(fill.0, fill.1, fill.2);
    canvas.filled_rounded_rect(
        MARGIN + 10.0,
        y,
        PAGE_WIDTH - 2.0 * MARGIN - 20.0,
        height,
        3.0,
    );
    canvas.set_text_color(255, 255, 255);
    canvas.text_centered(
        title,
        PAGE_WIDTH / 2.0,
        y + height - 4.0,
        ChartFont::HelveticaBold,
        size,
    );
    canvas.set_text_color(0, 0, 0);
}

/// Wrapped paragraph starting at `(x, y)`. Returns the height consumed.
pub fn paragraph(
    canvas: &mut PageCanvas,
    text: &str,
    x: f32,
    y: f32,
    max_width: f32,
    font: ChartFont,
    size: f32,
) -> f32 {
    let mut line_y = y;
    for block in text.split('\n') {
        if block.is_empty() {
            line_y += PARAGRAPH_LINE_HEIGHT;
            continue;
        }
        for (line, _) in font.wrap_text(block, size, max_width * MM) {
            canvas.text(&line, x, line_y, font, size);
            line_y += PARAGRAPH_LINE_HEIGHT;
        }
    }
    line_y - y
}

/// Centred page footer.
pub fn footer(canvas: &mut PageCanvas, page_number: usize) {
    canvas.set_text_color(0, 0, 0);
    canvas.text_centered(
        &format!("Page {} of 5", page_number),
        PAGE_WIDTH / 2.0,
        PAGE_HEIGHT - 10.0,
        ChartFont::Helvetica,
        8.0,
    );
}
