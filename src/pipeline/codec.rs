//! Decode/encode boundary for uploaded images.
//!
//! Everything fallible about the pipeline lives here: byte-level sanity
//! checks, magic-byte format sniffing (the HTTP content type is advisory
//! only), decoding to RGB, and PNG/data-URL encoding of the results.

use std::io::Cursor;

use base64::Engine;
use image::{DynamicImage, GrayImage, ImageOutputFormat, RgbImage};

use super::PipelineError;
use crate::config::{MAX_UPLOAD_BYTES, MIN_UPLOAD_BYTES};

/// Reject clearly invalid uploads before spending decode time.
pub fn validate_image_bytes(bytes: &[u8]) -> Result<(), PipelineError> {
    if bytes.len() < MIN_UPLOAD_BYTES {
        return Err(PipelineError::TooSmall);
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(PipelineError::TooLarge(MAX_UPLOAD_BYTES / (1024 * 1024)));
    }
    Ok(())
}

/// Detect MIME type from file magic bytes (not extension or Content-Type).
pub fn detect_mime_from_bytes(bytes: &[u8]) -> &'static str {
    if bytes.len() < 4 {
        return "application/octet-stream";
    }

    // JPEG: FF D8 FF
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return "image/jpeg";
    }
    // PNG: 89 50 4E 47
    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return "image/png";
    }
    // WebP: RIFF....WEBP
    if bytes.len() >= 12 && bytes[..4] == *b"RIFF" && bytes[8..12] == *b"WEBP" {
        return "image/webp";
    }

    "application/octet-stream"
}

/// Decode uploaded bytes into an RGB image.
///
/// Formats are gated on magic bytes so the error distinguishes "not an
/// image we take" from "an image we take, but corrupt".
pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage, PipelineError> {
    if detect_mime_from_bytes(bytes) == "application/octet-stream" {
        return Err(PipelineError::UnsupportedFormat);
    }

    let img = image::load_from_memory(bytes).map_err(|e| PipelineError::Decode(e.to_string()))?;
    Ok(img.to_rgb8())
}

/// Encode a grayscale result as PNG bytes.
pub fn encode_gray_png(img: &GrayImage) -> Result<Vec<u8>, PipelineError> {
    encode_png(DynamicImage::ImageLuma8(img.clone()))
}

/// Encode a color result as PNG bytes.
pub fn encode_rgb_png(img: &RgbImage) -> Result<Vec<u8>, PipelineError> {
    encode_png(DynamicImage::ImageRgb8(img.clone()))
}

/// Default PNG compression — results are transient, not archived.
fn encode_png(img: DynamicImage) -> Result<Vec<u8>, PipelineError> {
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageOutputFormat::Png)
        .map_err(|e| PipelineError::Encoding(e.to_string()))?;
    Ok(cursor.into_inner())
}

/// Wrap PNG bytes as a `data:` URL the browser can assign to an `<img>`.
pub fn to_data_url(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}
