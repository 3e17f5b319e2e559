//! Asynchronous image uploads.
//!
//! The shell starts a read with [`UploadTracker::begin`], performs the file read
//! however it likes, and hands the bytes back together with the ticket. Each
//! card slot keeps a monotonic token so a slow read that finishes after a newer
//! one for the same slot is discarded. New-element uploads never replace each
//! other, so every one of them lands.

use crate::card::ImageSlot;
use crate::elements::{ImageFormat, encode_data_url};
use image::GenericImageView;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Unsupported image format")]
    UnsupportedFormat,
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to read file: {0}")]
    Read(String),
}

/// Where an uploaded image goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadTarget {
    Card(ImageSlot),
    /// Inserted as a new image element on the active side.
    NewElement,
}

/// Proof of an in-flight upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket {
    pub target: UploadTarget,
    pub token: u64,
}

/// Latest issued token per target.
#[derive(Debug, Clone, Default)]
pub struct UploadTracker {
    latest: HashMap<UploadTarget, u64>,
}

impl UploadTracker {
    pub fn begin(&mut self, target: UploadTarget) -> UploadTicket {
        let token = self.latest.entry(target).or_insert(0);
        *token += 1;
        UploadTicket { target, token: *token }
    }

    /// Whether `ticket` may still be applied: the newest for its card slot,
    /// or any new-element insertion.
    pub fn is_current(&self, ticket: &UploadTicket) -> bool {
        match ticket.target {
            UploadTarget::NewElement => true,
            UploadTarget::Card(_) => self.latest.get(&ticket.target) == Some(&ticket.token),
        }
    }
}

/// A decoded upload, ready to be embedded.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedImage {
    pub src: String,
    pub format: ImageFormat,
    /// Intrinsic pixel size.
    pub dimensions: (u32, u32),
}

/// Sniff, decode and embed raw file bytes.
pub fn prepare_image(bytes: &[u8]) -> Result<PreparedImage, UploadError> {
    let format = ImageFormat::from_magic_bytes(bytes).ok_or(UploadError::UnsupportedFormat)?;
    let decoded = image::load_from_memory(bytes).map_err(|e| UploadError::Decode(e.to_string()))?;
    Ok(PreparedImage {
        src: encode_data_url(format, bytes),
        format,
        dimensions: decoded.dimensions(),
    })
}

#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut out = std::io::Cursor::new(Vec::new());
    image::RgbaImage::new(width, height)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}
