//! Text layers and a coarse text metric used where no font shaper is available.

use crate::geometry::MIN_ELEMENT_SIZE;
use crate::style::TextStyle;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Average advance of one glyph as a fraction of the font size.
pub const GLYPH_WIDTH_FACTOR: f64 = 0.6;

/// Payload of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLayer {
    pub text: String,
    /// `None` sizes the box to its content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl TextLayer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            width: None,
            height: None,
        }
    }

    /// Box size, measuring whichever dimension is unset.
    pub fn resolved_size(&self, style: &TextStyle) -> Size {
        let measured = measure_text(&self.text, self.width, style);
        Size::new(
            self.width.unwrap_or(measured.width),
            self.height.unwrap_or(measured.height),
        )
    }
}

fn glyph_advance(style: &TextStyle) -> f64 {
    style.resolved_font_size() * GLYPH_WIDTH_FACTOR + style.letter_spacing.unwrap_or(0.0)
}

/// Break `text` into lines, greedily wrapping words at `max_width` when given.
pub fn layout_lines(text: &str, max_width: Option<f64>, style: &TextStyle) -> Vec<String> {
    let advance = glyph_advance(style).max(f64::EPSILON);
    let Some(max_width) = max_width else {
        return text.split('\n').map(str::to_string).collect();
    };
    let max_chars = ((max_width / advance).floor() as usize).max(1);

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if line.is_empty() {
                word.chars().count()
            } else {
                line.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

/// Estimated box for `text`. With a fixed width only the height is measured.
pub fn measure_text(text: &str, width: Option<f64>, style: &TextStyle) -> Size {
    let lines = layout_lines(text, width, style);
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let measured_width = width.unwrap_or(longest as f64 * glyph_advance(style));
    let line_box = style.resolved_font_size() * style.resolved_line_height();
    let measured_height = lines.len().max(1) as f64 * line_box;
    Size::new(
        measured_width.max(MIN_ELEMENT_SIZE),
        measured_height.max(MIN_ELEMENT_SIZE),
    )
}
