//! Day-image upload pipeline.
//!
//! JPG/PNG only, 5 MB pre-compression cap. Files above 1 MB are downscaled
//! to a maximum width of 800 px and re-encoded as JPEG at quality 80 before
//! storage. Each day slot carries an upload token so that a slow upload
//! finishing after a newer one is discarded (latest call wins).

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use parking_lot::Mutex;
use thiserror::Error;
use uuid::Uuid;

use crate::itinerary::model::DayImage;

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
pub const COMPRESS_THRESHOLD_BYTES: usize = 1024 * 1024;
pub const MAX_IMAGE_WIDTH: u32 = 800;
pub const JPEG_QUALITY: u8 = 80;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Only JPG, PNG files are allowed")]
    UnsupportedType,
    #[error("File size must be less than 5MB")]
    TooLarge,
    #[error("Upload payload is empty")]
    Empty,
    #[error("Failed to process image: {0}")]
    Image(#[from] image::ImageError),
}

pub fn accepted_mime(mime: &str) -> bool {
    matches!(mime, "image/jpeg" | "image/jpg" | "image/png")
}

/// Validate and process one upload into the stored [`DayImage`] payload.
pub fn process_image(file_name: &str, mime: &str, bytes: &[u8]) -> Result<DayImage, UploadError> {
    if !accepted_mime(mime) {
        return Err(UploadError::UnsupportedType);
    }
    if bytes.is_empty() {
        return Err(UploadError::Empty);
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge);
    }

    let (stored, stored_mime) = if bytes.len() > COMPRESS_THRESHOLD_BYTES {
        (downscale(bytes)?, "image/jpeg".to_string())
    } else {
        (bytes.to_vec(), mime.to_string())
    };

    Ok(DayImage {
        file_name: sanitize_filename::sanitize(file_name),
        mime_type: stored_mime,
        size_bytes: stored.len(),
        data: BASE64.encode(&stored),
    })
}

/// Resize to at most [`MAX_IMAGE_WIDTH`] wide (aspect preserved) and
/// re-encode as JPEG.
fn downscale(bytes: &[u8]) -> Result<Vec<u8>, UploadError> {
    let decoded = image::load_from_memory(bytes)?;
    let resized = if decoded.width() > MAX_IMAGE_WIDTH {
        let height = (decoded.height() as u64 * MAX_IMAGE_WIDTH as u64 / decoded.width() as u64)
            .max(1) as u32;
        decoded.resize_exact(MAX_IMAGE_WIDTH, height, FilterType::Triangle)
    } else {
        decoded
    };

    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    resized.to_rgb8().write_with_encoder(encoder)?;
    Ok(out)
}

/// Stale-result guard: one live token per day slot.
#[derive(Default)]
pub struct UploadTokens {
    latest: Mutex<HashMap<usize, Uuid>>,
}

impl UploadTokens {
    /// Start an upload for a day slot, invalidating any in-flight one.
    pub fn begin(&self, day: usize) -> Uuid {
        let token = Uuid::new_v4();
        self.latest.lock().insert(day, token);
        token
    }

    /// True while `token` is still the newest upload for the slot.
    pub fn is_current(&self, day: usize, token: Uuid) -> bool {
        self.latest.lock().get(&day) == Some(&token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        let mut out = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn test_rejects_unsupported_type() {
        let err = process_image("doc.gif", "image/gif", &[1, 2, 3]).unwrap_err();
        assert_eq!(err.to_string(), "Only JPG, PNG files are allowed");
    }

    #[test]
    fn test_rejects_oversized_payload() {
        let big = vec![0u8; MAX_UPLOAD_BYTES + 1];
        let err = process_image("big.png", "image/png", &big).unwrap_err();
        assert_eq!(err.to_string(), "File size must be less than 5MB");
    }

    #[test]
    fn test_small_file_stored_as_is() {
        let bytes = png_bytes(100, 80);
        let stored = process_image("beach.png", "image/png", &bytes).unwrap();
        assert_eq!(stored.mime_type, "image/png");
        assert_eq!(stored.size_bytes, bytes.len());
        assert_eq!(BASE64.decode(&stored.data).unwrap(), bytes);
    }

    #[test]
    fn test_downscale_limits_width() {
        let bytes = png_bytes(1600, 1200);
        let out = downscale(&bytes).unwrap();
        let reloaded = image::load_from_memory(&out).unwrap();
        assert_eq!(reloaded.width(), MAX_IMAGE_WIDTH);
        assert_eq!(reloaded.height(), 600);
    }

    #[test]
    fn test_downscale_keeps_narrow_images() {
        let bytes = png_bytes(400, 300);
        let out = downscale(&bytes).unwrap();
        let reloaded = image::load_from_memory(&out).unwrap();
        assert_eq!(reloaded.width(), 400);
    }

    #[test]
    fn test_file_name_is_sanitized() {
        let bytes = png_bytes(10, 10);
        let stored = process_image("../../etc/passwd.png", "image/png", &bytes).unwrap();
        // separators are stripped, dots may remain
        assert!(!stored.file_name.contains('/'));
        assert!(!stored.file_name.contains('\\'));
        assert!(stored.file_name.ends_with("passwd.png"));
    }

    #[test]
    fn test_latest_upload_wins() {
        let tokens = UploadTokens::default();
        let first = tokens.begin(0);
        let second = tokens.begin(0);

        assert!(!tokens.is_current(0, first));
        assert!(tokens.is_current(0, second));
        // other day slots are independent
        let other = tokens.begin(3);
        assert!(tokens.is_current(3, other));
        assert!(tokens.is_current(0, second));
    }
}
