//! Millimetre page canvas over the raw content stream.
//!
//! The chart layout is specified in millimetres from the top-left corner
//! of a US Letter page. This canvas does the unit and axis conversion at
//! emit time so the layout code reads in form coordinates.

use crate::writer::{ChartFont, ContentStreamBuilder, LETTER_HEIGHT, LETTER_WIDTH};

/// Points per millimetre.
pub const MM: f32 = 72.0 / 25.4;

/// Page width in millimetres (US Letter).
pub const PAGE_WIDTH: f32 = LETTER_WIDTH / MM;

/// Page height in millimetres.
pub const PAGE_HEIGHT: f32 = LETTER_HEIGHT / MM;

/// Form margin on all sides, in millimetres.
pub const MARGIN: f32 = 13.0;

/// One page of the chart, drawn in top-down millimetre coordinates.
pub struct PageCanvas {
    builder: ContentStreamBuilder,
}

impl Default for PageCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl PageCanvas {
    pub fn new() -> Self {
        Self {
            builder: ContentStreamBuilder::new(),
        }
    }

    /// Finish the page and hand back the underlying content stream.
    /// Closes the text object a trailing text draw leaves open.
    pub fn into_builder(mut self) -> ContentStreamBuilder {
        self.builder.end_text();
        self.builder
    }

    fn x_pt(x: f32) -> f32 {
        x * MM
    }

    fn y_pt(y: f32) -> f32 {
        LETTER_HEIGHT - y * MM
    }

    /// Text with its baseline at `(x, y)` millimetres.
    pub fn text(&mut self, text: &str, x: f32, y: f32, font: ChartFont, size: f32) -> &mut Self {
        if text.is_empty() {
            return self;
        }
        self.builder.set_font(font.resource_name(), size);
        self.builder.text(text, Self::x_pt(x), Self::y_pt(y));
        self
    }

    /// Text horizontally centred on `x`.
    pub fn text_centered(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        font: ChartFont,
        size: f32,
    ) -> &mut Self {
        let width = font.text_width(text, size) / MM;
        self.text(text, x - width / 2.0, y, font, size)
    }

    /// Text ending at `x`.
    pub fn text_right(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        font: ChartFont,
        size: f32,
    ) -> &mut Self {
        let width = font.text_width(text, size) / MM;
        self.text(text, x - width, y, font, size)
    }

    /// Straight line between two points.
    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> &mut Self {
        self.builder
            .move_to(Self::x_pt(x1), Self::y_pt(y1))
            .line_to(Self::x_pt(x2), Self::y_pt(y2))
            .stroke();
        self
    }

    /// Stroked rectangle with its top-left corner at `(x, y)`.
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.builder
            .rect(Self::x_pt(x), Self::y_pt(y + height), width * MM, height * MM)
            .stroke();
        self
    }

    /// Filled rectangle with its top-left corner at `(x, y)`.
    pub fn filled_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.builder
            .rect(Self::x_pt(x), Self::y_pt(y + height), width * MM, height * MM)
            .fill();
        self
    }

    /// Filled rounded rectangle, the section header banner shape.
    pub fn filled_rounded_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
    ) -> &mut Self {
        self.builder
            .rounded_rect(
                Self::x_pt(x),
                Self::y_pt(y + height),
                width * MM,
                height * MM,
                radius * MM,
            )
            .fill();
        self
    }

    /// Stroked circle centred at `(cx, cy)`.
    pub fn circle(&mut self, cx: f32, cy: f32, radius: f32) -> &mut Self {
        self.builder
            .circle(Self::x_pt(cx), Self::y_pt(cy), radius * MM)
            .stroke();
        self
    }

    /// Text colour as 0-255 RGB.
    pub fn set_text_color(&mut self, r: u8, g: u8, b: u8) -> &mut Self {
        self.builder
            .set_fill_color(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
        self
    }

    /// Stroke colour as 0-255 RGB.
    pub fn set_draw_color(&mut self, r: u8, g: u8, b: u8) -> &mut Self {
        self.builder
            .set_stroke_color(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
        self
    }

    /// Fill colour for shapes, shared with the text colour operator.
    pub fn set_fill_color(&mut self, r: u8, g: u8, b: u8) -> &mut Self {
        self.set_text_color(r, g, b)
    }

    /// Line width in millimetres.
    pub fn set_line_width(&mut self, width: f32) -> &mut Self {
        self.builder.set_line_width(width * MM);
        self
    }
}
