//! RGBA colors parsed from the CSS hex strings stored in templates.

use peniko::Color;
use serde::{Deserialize, Serialize};

/// Fallback accent used when a designation or grade has no configured color.
pub const DEFAULT_ACCENT_HEX: &str = "#1e88e5";

/// An RGBA8 color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl CardColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`, plus the keyword `transparent`.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("transparent") {
            return Some(Self::transparent());
        }
        let hex = input.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let r = channel(&hex[0..1])? * 17;
                let g = channel(&hex[1..2])? * 17;
                let b = channel(&hex[2..3])? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                255,
            )),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Parse, falling back to `fallback` for missing or malformed input.
    pub fn parse_or(input: Option<&str>, fallback: CardColor) -> Self {
        input.and_then(Self::parse).unwrap_or(fallback)
    }

    /// Format as `#rrggbb`; alpha is carried separately by the renderers.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a fraction in [0, 1].
    pub fn alpha(&self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

impl From<Color> for CardColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<CardColor> for Color {
    fn from(color: CardColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(CardColor::parse("#fff"), Some(CardColor::white()));
        assert_eq!(CardColor::parse("#1e88e5"), Some(CardColor::new(0x1e, 0x88, 0xe5, 255)));
        assert_eq!(CardColor::parse("#00000080"), Some(CardColor::new(0, 0, 0, 0x80)));
        assert_eq!(CardColor::parse("transparent"), Some(CardColor::transparent()));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(CardColor::parse("red"), None);
        assert_eq!(CardColor::parse("#12"), None);
        assert_eq!(CardColor::parse("#zzzzzz"), None);
        assert_eq!(CardColor::parse_or(Some("nope"), CardColor::black()), CardColor::black());
    }

    #[test]
    fn test_peniko_roundtrip() {
        let color = CardColor::new(12, 34, 56, 200);
        let peniko: Color = color.into();
        assert_eq!(CardColor::from(peniko), color);
        assert_eq!(color.to_hex(), "#0c2238");
    }
}
