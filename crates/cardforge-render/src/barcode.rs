//! Barcode encoding for the card front.
//!
//! Symbol encoding is delegated to the barcoders crate; this module only turns
//! its module pattern into bar rectangles.

use barcoders::sym::code128::Code128;
use cardforge_core::BarcodeConfig;
use cardforge_core::config::TextPosition;
use kurbo::{BezPath, Rect, Shape};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BarcodeError {
    #[error("Nothing to encode")]
    Empty,
    #[error("Cannot encode {data:?}: {reason}")]
    Encode {
        data: String,
        reason: String,
    },
}

/// Turns text into a run of modules, `true` = bar.
pub trait BarcodeEncoder {
    fn encode(&self, data: &str) -> Result<Vec<bool>, BarcodeError>;
}

/// Code 128, character set B.
#[derive(Debug, Clone, Copy, Default)]
pub struct Code128Encoder;

impl BarcodeEncoder for Code128Encoder {
    fn encode(&self, data: &str) -> Result<Vec<bool>, BarcodeError> {
        if data.is_empty() {
            return Err(BarcodeError::Empty);
        }
        // Set B covers upper and lower case letters, digits and punctuation.
        let prefixed = format!("\u{0181}{data}");
        let barcode = Code128::new(&prefixed).map_err(|e| BarcodeError::Encode {
            data: data.to_string(),
            reason: format!("{e:?}"),
        })?;
        Ok(barcode.encode().into_iter().map(|module| module == 1).collect())
    }
}

/// Laid-out bars inside a frame.
#[derive(Debug, Clone)]
pub struct BarcodeLayout {
    /// All bars as one path, in card coordinates.
    pub bars: BezPath,
    /// Area the bars occupy.
    pub bar_area: Rect,
    /// Where the human-readable value goes, when shown.
    pub caption: Option<Rect>,
}

/// Fit `modules` into `frame` following `config`.
///
/// The module width shrinks when the symbol would overflow the frame. A shown
/// caption takes its height out of the frame before the bars are sized.
pub fn layout_barcode(modules: &[bool], frame: Rect, config: &BarcodeConfig) -> BarcodeLayout {
    let caption_height = if config.display_value { config.font_size * 1.2 } else { 0.0 };
    let bar_height = config.height.min(frame.height() - caption_height).max(1.0);
    let module_width = if modules.is_empty() {
        config.width
    } else {
        config.width.min(frame.width() / modules.len() as f64)
    };
    let total_width = module_width * modules.len() as f64;
    let x0 = frame.x0 + (frame.width() - total_width) / 2.0;

    let (bar_y0, caption) = match (config.display_value, config.text_position) {
        (false, _) => (frame.y0, None),
        (true, TextPosition::Bottom) => (
            frame.y0,
            Some(Rect::new(
                frame.x0,
                frame.y0 + bar_height,
                frame.x1,
                frame.y0 + bar_height + caption_height,
            )),
        ),
        (true, TextPosition::Top) => (
            frame.y0 + caption_height,
            Some(Rect::new(frame.x0, frame.y0, frame.x1, frame.y0 + caption_height)),
        ),
    };

    let mut bars = BezPath::new();
    let mut index = 0;
    while index < modules.len() {
        if !modules[index] {
            index += 1;
            continue;
        }
        let start = index;
        while index < modules.len() && modules[index] {
            index += 1;
        }
        let rect = Rect::new(
            x0 + start as f64 * module_width,
            bar_y0,
            x0 + index as f64 * module_width,
            bar_y0 + bar_height,
        );
        bars.extend(rect.path_elements(0.1));
    }

    BarcodeLayout {
        bars,
        bar_area: Rect::new(x0, bar_y0, x0 + total_width, bar_y0 + bar_height),
        caption,
    }
}
