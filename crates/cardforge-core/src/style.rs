//! Text styling shared by standard fields and custom elements, and the
//! defaulting function that turns a sparse style record into render-ready values.

use crate::color::CardColor;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";
pub const DEFAULT_FONT_SIZE: f64 = 14.0;
pub const DEFAULT_LINE_HEIGHT: f64 = 1.2;
pub const DEFAULT_OPACITY: f64 = 100.0;

/// Letter case transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Caps {
    #[default]
    None,
    All,
    Small,
}

/// Superscript / subscript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    #[default]
    None,
    Super,
    Sub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// A sparse text style record. `None` everywhere means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caps: Option<Caps>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<Script>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Percent, 0 to 100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
}

impl TextStyle {
    /// Overwrite every field that is present in `patch`.
    pub fn merge(&mut self, patch: &TextStyle) {
        fn take<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if let Some(v) = value {
                *slot = Some(v.clone());
            }
        }
        take(&mut self.font_family, &patch.font_family);
        take(&mut self.font_size, &patch.font_size);
        take(&mut self.bold, &patch.bold);
        take(&mut self.italic, &patch.italic);
        take(&mut self.underline, &patch.underline);
        take(&mut self.strikethrough, &patch.strikethrough);
        take(&mut self.caps, &patch.caps);
        take(&mut self.script, &patch.script);
        take(&mut self.color, &patch.color);
        take(&mut self.opacity, &patch.opacity);
        take(&mut self.text_align, &patch.text_align);
        take(&mut self.letter_spacing, &patch.letter_spacing);
        take(&mut self.line_height, &patch.line_height);
        take(&mut self.stroke_width, &patch.stroke_width);
        take(&mut self.stroke_color, &patch.stroke_color);
    }

    /// Resolved font size in design units.
    pub fn resolved_font_size(&self) -> f64 {
        self.font_size.unwrap_or(DEFAULT_FONT_SIZE)
    }

    /// Resolved line height multiplier.
    pub fn resolved_line_height(&self) -> f64 {
        self.line_height.unwrap_or(DEFAULT_LINE_HEIGHT)
    }

    /// Opacity as a fraction in [0, 1].
    pub fn opacity_fraction(&self) -> f64 {
        self.opacity.unwrap_or(DEFAULT_OPACITY).clamp(0.0, 100.0) / 100.0
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.text_align = Some(align);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
}

impl FontWeight {
    pub fn css(self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Italic,
}

impl FontStyle {
    pub fn css(self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTransform {
    None,
    Uppercase,
    Lowercase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontVariant {
    Normal,
    SmallCaps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineShift {
    Baseline,
    Super,
    Sub,
}

/// Combined underline / line-through decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextDecoration {
    pub underline: bool,
    pub line_through: bool,
}

impl TextDecoration {
    /// CSS `text-decoration` value.
    pub fn css(&self) -> &'static str {
        match (self.underline, self.line_through) {
            (true, true) => "underline line-through",
            (true, false) => "underline",
            (false, true) => "line-through",
            (false, false) => "none",
        }
    }

    pub fn is_none(&self) -> bool {
        !self.underline && !self.line_through
    }
}

/// Outline drawn around glyphs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStroke {
    pub width: f64,
    pub color: CardColor,
}

/// Fully resolved visual description of a text style.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableStyle {
    pub font_family: String,
    /// CSS font size, e.g. `"14px"`.
    pub font_size: String,
    /// Font size in design units, for layout.
    pub font_size_px: f64,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub text_decoration: TextDecoration,
    pub text_transform: TextTransform,
    pub font_variant: FontVariant,
    pub baseline_shift: BaselineShift,
    pub color: CardColor,
    /// Fraction in [0, 1].
    pub opacity: f64,
    pub text_align: TextAlign,
    /// CSS letter spacing, `"normal"` when unset.
    pub letter_spacing: String,
    pub line_height: f64,
    pub stroke: Option<TextStroke>,
}

impl RenderableStyle {
    /// Apply the case transform to `text`, for backends without CSS `text-transform`.
    pub fn apply_case(&self, text: &str) -> String {
        match self.text_transform {
            TextTransform::None => text.to_string(),
            TextTransform::Uppercase => text.to_uppercase(),
            TextTransform::Lowercase => text.to_lowercase(),
        }
    }

    /// Distance between consecutive baselines.
    pub fn line_advance(&self) -> f64 {
        self.font_size_px * self.line_height
    }
}

/// Resolve a sparse style into its final visual description.
pub fn compute_visual_style(style: &TextStyle) -> RenderableStyle {
    let font_size_px = style.resolved_font_size();
    let (text_transform, font_variant) = match style.caps.unwrap_or_default() {
        Caps::None => (TextTransform::None, FontVariant::Normal),
        Caps::All => (TextTransform::Uppercase, FontVariant::Normal),
        Caps::Small => (TextTransform::Lowercase, FontVariant::SmallCaps),
    };
    let baseline_shift = match style.script.unwrap_or_default() {
        Script::None => BaselineShift::Baseline,
        Script::Super => BaselineShift::Super,
        Script::Sub => BaselineShift::Sub,
    };
    let stroke = style
        .stroke_width
        .filter(|width| *width > 0.0)
        .map(|width| TextStroke {
            width,
            color: CardColor::parse_or(style.stroke_color.as_deref(), CardColor::black()),
        });

    RenderableStyle {
        font_family: style
            .font_family
            .as_deref()
            .filter(|family| !family.trim().is_empty())
            .unwrap_or(DEFAULT_FONT_FAMILY)
            .to_string(),
        font_size: format!("{font_size_px}px"),
        font_size_px,
        font_weight: if style.bold.unwrap_or(false) {
            FontWeight::Bold
        } else {
            FontWeight::Normal
        },
        font_style: if style.italic.unwrap_or(false) {
            FontStyle::Italic
        } else {
            FontStyle::Normal
        },
        text_decoration: TextDecoration {
            underline: style.underline.unwrap_or(false),
            line_through: style.strikethrough.unwrap_or(false),
        },
        text_transform,
        font_variant,
        baseline_shift,
        color: CardColor::parse_or(style.color.as_deref(), CardColor::black()),
        opacity: style.opacity_fraction(),
        text_align: style.text_align.unwrap_or_default(),
        letter_spacing: match style.letter_spacing {
            Some(spacing) => format!("{spacing}px"),
            None => "normal".to_string(),
        },
        line_height: style.resolved_line_height(),
        stroke,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_style_defaults() {
        let resolved = compute_visual_style(&TextStyle::default());
        assert_eq!(resolved.font_family, DEFAULT_FONT_FAMILY);
        assert_eq!(resolved.font_size, "14px");
        assert_eq!(resolved.font_weight, FontWeight::Normal);
        assert_eq!(resolved.font_style, FontStyle::Normal);
        assert_eq!(resolved.text_transform, TextTransform::None);
        assert_eq!(resolved.font_variant, FontVariant::Normal);
        assert_eq!(resolved.text_decoration.css(), "none");
        assert!((resolved.opacity - 1.0).abs() < f64::EPSILON);
        assert_eq!(resolved.color, CardColor::black());
        assert_eq!(resolved.text_align, TextAlign::Left);
        assert_eq!(resolved.letter_spacing, "normal");
        assert!(resolved.stroke.is_none());
    }

    #[test]
    fn test_deterministic() {
        let style = TextStyle {
            font_family: Some("Georgia".into()),
            bold: Some(true),
            caps: Some(Caps::Small),
            stroke_width: Some(1.5),
            stroke_color: Some("#ff0000".into()),
            opacity: Some(40.0),
            ..Default::default()
        };
        assert_eq!(compute_visual_style(&style), compute_visual_style(&style));
    }

    #[test]
    fn test_caps_mapping() {
        let all = compute_visual_style(&TextStyle {
            caps: Some(Caps::All),
            ..Default::default()
        });
        assert_eq!(all.text_transform, TextTransform::Uppercase);
        assert_eq!(all.apply_case("Perera"), "PERERA");

        let small = compute_visual_style(&TextStyle {
            caps: Some(Caps::Small),
            ..Default::default()
        });
        assert_eq!(small.text_transform, TextTransform::Lowercase);
        assert_eq!(small.font_variant, FontVariant::SmallCaps);
    }

    #[test]
    fn test_decoration_and_stroke() {
        let style = TextStyle {
            underline: Some(true),
            strikethrough: Some(true),
            stroke_width: Some(0.0),
            ..Default::default()
        };
        let resolved = compute_visual_style(&style);
        assert_eq!(resolved.text_decoration.css(), "underline line-through");
        assert!(resolved.stroke.is_none(), "zero-width stroke is not drawn");

        let stroked = compute_visual_style(&TextStyle {
            stroke_width: Some(2.0),
            ..Default::default()
        });
        let stroke = stroked.stroke.expect("stroke");
        assert_eq!(stroke.width, 2.0);
        assert_eq!(stroke.color, CardColor::black());
    }

    #[test]
    fn test_opacity_clamped() {
        let over = compute_visual_style(&TextStyle {
            opacity: Some(250.0),
            ..Default::default()
        });
        assert!((over.opacity - 1.0).abs() < f64::EPSILON);
        let half = compute_visual_style(&TextStyle {
            opacity: Some(50.0),
            ..Default::default()
        });
        assert!((half.opacity - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_merge_only_present_fields() {
        let mut base = TextStyle::default().with_font_size(18.0).with_color("#111111");
        base.merge(&TextStyle {
            bold: Some(true),
            ..Default::default()
        });
        assert_eq!(base.font_size, Some(18.0));
        assert_eq!(base.color.as_deref(), Some("#111111"));
        assert_eq!(base.bold, Some(true));
    }

    #[test]
    fn test_serde_skips_unset() {
        let json = serde_json::to_string(&TextStyle::default().with_bold(true)).unwrap();
        assert_eq!(json, r#"{"bold":true}"#);
    }
}
