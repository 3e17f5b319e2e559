//! Image layers and the data URIs that carry their pixels.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

/// Display width given to freshly inserted images.
pub const DEFAULT_IMAGE_WIDTH: f64 = 100.0;

/// Raster formats accepted for uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }
}

/// Encode raw bytes as a `data:` URI.
pub fn encode_data_url(format: ImageFormat, data: &[u8]) -> String {
    format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(data))
}

/// Decode the payload of a base64 `data:` URI. Returns `None` for anything else.
pub fn decode_data_url(src: &str) -> Option<Vec<u8>> {
    let rest = src.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    if !header.ends_with(";base64") {
        return None;
    }
    STANDARD.decode(payload.trim()).ok()
}

/// Payload of an image element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLayer {
    pub src: String,
    pub width: f64,
    pub height: f64,
    /// Intrinsic width / height of the source asset.
    pub aspect_ratio: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default)]
    pub flip_y: bool,
}

impl ImageLayer {
    /// Default width, height following the intrinsic aspect ratio.
    pub fn new(src: impl Into<String>, intrinsic: (u32, u32)) -> Self {
        let (w, h) = intrinsic;
        let aspect_ratio = if w == 0 || h == 0 { 1.0 } else { f64::from(w) / f64::from(h) };
        Self {
            src: src.into(),
            width: DEFAULT_IMAGE_WIDTH,
            height: DEFAULT_IMAGE_WIDTH / aspect_ratio,
            aspect_ratio,
            rotation: 0.0,
            flip_x: false,
            flip_y: false,
        }
    }

    /// Decoded bytes of an embedded source.
    pub fn data(&self) -> Option<Vec<u8>> {
        decode_data_url(&self.src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_bytes() {
        let png = [0x89, b'P', b'N', b'G', 0];
        assert_eq!(ImageFormat::from_magic_bytes(&png), Some(ImageFormat::Png));
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0];
        assert_eq!(ImageFormat::from_magic_bytes(&jpeg), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_magic_bytes(b"RIFF\0\0\0\0WEBPVP8 "), Some(ImageFormat::WebP));
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF8"), None);
        assert_eq!(ImageFormat::from_extension("JPG"), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn test_data_url() {
        let url = encode_data_url(ImageFormat::Png, b"abc");
        assert_eq!(url, "data:image/png;base64,YWJj");
        assert_eq!(decode_data_url(&url), Some(b"abc".to_vec()));
        assert_eq!(decode_data_url("https://example.com/a.png"), None);
        assert_eq!(decode_data_url("data:text/plain,abc"), None);
    }

    #[test]
    fn test_degenerate_intrinsic_size() {
        let layer = ImageLayer::new("", (0, 0));
        assert_eq!(layer.aspect_ratio, 1.0);
        assert_eq!(layer.height, DEFAULT_IMAGE_WIDTH);
    }
}
