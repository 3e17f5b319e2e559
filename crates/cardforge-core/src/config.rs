//! Card appearance settings and editor configuration.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Card canvas size in design units.
pub const CARD_SIZE: Size = Size::new(320.0, 500.0);

/// Default prompt sent to the autofill collaborator.
pub const DEFAULT_AUTOFILL_PROMPT: &str = "Generate a fictitious Sri Lankan postal employee profile for an identity card. \
Respond with a single JSON object with the string keys nameWithInitials, fullName, designation, grade, \
nic, issueDate, fileNumber and officialAddress. Do not include any other text.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPosition {
    #[default]
    Bottom,
    Top,
}

/// Barcode appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BarcodeConfig {
    pub line_color: String,
    /// Width of a single module bar.
    pub width: f64,
    /// Bar height.
    pub height: f64,
    pub display_value: bool,
    pub text_position: TextPosition,
    pub font_size: f64,
}

impl Default for BarcodeConfig {
    fn default() -> Self {
        Self {
            line_color: "#000000".to_string(),
            width: 1.5,
            height: 40.0,
            display_value: true,
            text_position: TextPosition::Bottom,
            font_size: 12.0,
        }
    }
}

/// Profile photo frame and placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfilePhotoStyle {
    pub border_width: f64,
    pub border_color: String,
    pub border_radius: f64,
    /// Photo scale inside the frame, 1.0 = fill.
    pub scale: f64,
    pub offset_y: f64,
}

impl Default for ProfilePhotoStyle {
    fn default() -> Self {
        Self {
            border_width: 2.0,
            border_color: "#1e88e5".to_string(),
            border_radius: 8.0,
            scale: 1.0,
            offset_y: 0.0,
        }
    }
}

/// Placement of a signature image inside its box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignatureStyle {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Percent in [0, 100].
    pub opacity: f64,
}

impl Default for SignatureStyle {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            opacity: 100.0,
        }
    }
}

impl SignatureStyle {
    pub fn opacity_fraction(&self) -> f64 {
        self.opacity.clamp(0.0, 100.0) / 100.0
    }
}

/// Editor-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub card_size: Size,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Pick radius around resize handles, in card units.
    pub handle_tolerance: f64,
    /// Where the inspector panel opens, in screen units.
    pub inspector_position: Point,
    pub autofill_prompt: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            card_size: CARD_SIZE,
            min_zoom: 0.25,
            max_zoom: 4.0,
            handle_tolerance: 6.0,
            inspector_position: Point::new(24.0, 96.0),
            autofill_prompt: DEFAULT_AUTOFILL_PROMPT.to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
