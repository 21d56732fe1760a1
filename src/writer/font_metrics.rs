//! Base-14 font metrics for text measurement.
//!
//! Widths are standard PostScript metrics in units of 1/1000 em. Only the
//! Helvetica family is needed; the printed form uses nothing else.

/// The fonts used by the chart renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartFont {
    /// Helvetica regular
    Helvetica,
    /// Helvetica bold
    HelveticaBold,
}

impl ChartFont {
    /// The PDF BaseFont name.
    pub fn base_name(&self) -> &'static str {
        match self {
            ChartFont::Helvetica => "Helvetica",
            ChartFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// The resource name used in content streams and page resources.
    pub fn resource_name(&self) -> &'static str {
        match self {
            ChartFont::Helvetica => "F1",
            ChartFont::HelveticaBold => "F2",
        }
    }

    /// Width of a single character in font units (1/1000 em).
    pub fn char_width(&self, ch: char) -> f32 {
        let bold = matches!(self, ChartFont::HelveticaBold);
        match ch {
            ' ' | '.' | ',' | ';' => 278.0,
            ':' => {
                if bold {
                    333.0
                } else {
                    278.0
                }
            },
            '-' | '(' | ')' | '[' | ']' | '{' | '}' | '!' | '`' => 333.0,
            '\'' => {
                if bold {
                    278.0
                } else {
                    222.0
                }
            },
            '"' => 400.0,
            '/' | '\\' | '|' => 278.0,
            '?' => 500.0,
            '@' => 800.0,
            '#' | '$' | '_' => 556.0,
            '%' => 889.0,
            '^' => 500.0,
            '&' => 722.0,
            '*' => 389.0,
            '+' | '=' | '<' | '>' | '~' => 584.0,
            '0'..='9' => 556.0,
            'A'..='D' | 'H' | 'K' | 'N' | 'R' | 'U' => 722.0,
            'E' | 'P' | 'S' | 'V' | 'X' | 'Y' => 667.0,
            'F' | 'L' | 'T' | 'Z' => 611.0,
            'G' | 'O' | 'Q' => 778.0,
            'I' => 278.0,
            'J' => 556.0,
            'M' => 833.0,
            'W' => 944.0,
            'a' | 'c' | 'e' | 'k' | 's' | 'v' | 'x' | 'y' => 556.0,
            'b' | 'd' | 'g' | 'h' | 'n' | 'o' | 'p' | 'q' | 'u' => 611.0,
            'f' => {
                if bold {
                    333.0
                } else {
                    278.0
                }
            },
            'i' | 'j' | 'l' => {
                if bold {
                    278.0
                } else {
                    222.0
                }
            },
            'm' => {
                if bold {
                    889.0
                } else {
                    833.0
                }
            },
            'r' => 389.0,
            't' => 333.0,
            'w' => 778.0,
            'z' => 500.0,
            // Unknown characters get a middling default
            _ => 500.0,
        }
    }

    /// Width of a string in points at the given size.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: f32 = text.chars().map(|c| self.char_width(c)).sum();
        units * font_size / 1000.0
    }

    /// Greedy word wrap. Returns lines with their widths in points.
    ///
    /// Words longer than `max_width` are placed on their own line rather
    /// than split.
    pub fn wrap_text(&self, text: &str, font_size: f32, max_width: f32) -> Vec<(String, f32)> {
        let mut lines = Vec::new();
        let mut current_line = String::new();
        let mut current_width = 0.0;
        let space_width = self.char_width(' ') * font_size / 1000.0;

        for word in text.split_whitespace() {
            let word_width = self.text_width(word, font_size);

            if current_line.is_empty() {
                current_line = word.to_string();
                current_width = word_width;
            } else if current_width + space_width + word_width <= max_width {
                current_line.push(' ');
                current_line.push_str(word);
                current_width += space_width + word_width;
            } else {
                lines.push((current_line, current_width));
                current_line = word.to_string();
                current_width = word_width;
            }
        }

        if !current_line.is_empty() {
            lines.push((current_line, current_width));
        }

        if lines.is_empty() {
            lines.push((String::new(), 0.0));
        }

        lines
    }
}
