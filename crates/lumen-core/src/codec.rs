//! Image transport encoding and thumbnail production.
//!
//! Uploaded files and gateway results travel as base64 payloads paired with
//! a declared media type. History never stores full-resolution results;
//! [`thumbnail`] produces the compact lossy re-encoding kept per item. The
//! longer side of a thumbnail always equals the requested dimension, so an
//! image already within bounds is still resized and re-encoded rather than
//! passed through.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

use crate::core_types::EncodedImage;
use crate::errors::StudioError;

/// Longer-side bound used for history thumbnails.
pub const THUMBNAIL_MAX_DIMENSION: u32 = 128;

/// Fixed quality for the lossy thumbnail re-encode.
const THUMBNAIL_JPEG_QUALITY: u8 = 80;

/// Converts raw image bytes into the transport form.
pub fn encode(bytes: &[u8], declared_media_type: &str) -> EncodedImage {
    EncodedImage::new(BASE64.encode(bytes), declared_media_type)
}

/// Recovers the raw bytes behind a transport-encoded image.
pub fn decode_payload(encoded: &EncodedImage) -> Result<Vec<u8>, StudioError> {
    BASE64
        .decode(&encoded.data)
        .map_err(|e| StudioError::Codec(format!("Invalid base64 payload: {}", e)))
}

/// Proportional dimensions with the longer side equal to `max_dimension`.
/// The shorter side is rounded to the nearest pixel and never drops below 1.
fn scaled_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    if width >= height {
        let scaled = (height as f64 * max_dimension as f64 / width as f64).round() as u32;
        (max_dimension, scaled.max(1))
    } else {
        let scaled = (width as f64 * max_dimension as f64 / height as f64).round() as u32;
        (scaled.max(1), max_dimension)
    }
}

/// Produces a bounded JPEG thumbnail of `encoded`, returned as a `data:`
/// URI ready for history storage.
pub fn thumbnail(encoded: &EncodedImage, max_dimension: u32) -> Result<String, StudioError> {
    let bytes = decode_payload(encoded)?;
    let source = image::load_from_memory(&bytes)
        .map_err(|e| StudioError::Codec(format!("Failed to decode image: {}", e)))?;

    let (width, height) = scaled_dimensions(source.width(), source.height(), max_dimension);
    let resized = source
        .resize_exact(width, height, FilterType::Triangle)
        .to_rgb8();

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, THUMBNAIL_JPEG_QUALITY);
    resized
        .write_with_encoder(encoder)
        .map_err(|e| StudioError::Codec(format!("Failed to encode thumbnail: {}", e)))?;

    let thumb = encode(buffer.get_ref(), "image/jpeg");
    Ok(thumb.to_data_uri())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb([120, 40, 200]));
        let mut buffer = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    fn decode_data_uri(uri: &str) -> Vec<u8> {
        let payload = uri.split_once(";base64,").unwrap().1;
        BASE64.decode(payload).unwrap()
    }

    #[test]
    fn encode_then_decode_is_lossless() {
        let bytes = vec![0u8, 1, 2, 3, 250, 255];
        let encoded = encode(&bytes, "image/png");
        assert_eq!(decode_payload(&encoded).unwrap(), bytes);
    }

    #[test]
    fn decode_rejects_invalid_base64() {
        let bogus = EncodedImage::new("not valid!", "image/png");
        assert!(matches!(
            decode_payload(&bogus),
            Err(StudioError::Codec(_))
        ));
    }

    #[test]
    fn scaled_dimensions_bounds_longer_side() {
        assert_eq!(scaled_dimensions(400, 200, 128), (128, 64));
        assert_eq!(scaled_dimensions(200, 400, 128), (64, 128));
        assert_eq!(scaled_dimensions(300, 300, 128), (128, 128));
        // rounding to nearest, not truncation
        assert_eq!(scaled_dimensions(1000, 333, 128), (128, 43));
    }

    #[test]
    fn scaled_dimensions_never_reaches_zero() {
        assert_eq!(scaled_dimensions(5000, 1, 128), (128, 1));
    }

    #[test]
    fn thumbnail_longer_side_equals_max_dimension() {
        let encoded = encode(&png_bytes(640, 360), "image/png");
        let uri = thumbnail(&encoded, 128).unwrap();
        assert!(uri.starts_with("data:image/jpeg;base64,"));

        let thumb = image::load_from_memory(&decode_data_uri(&uri)).unwrap();
        assert_eq!(thumb.width(), 128);
        assert_eq!(thumb.height(), 72);
    }

    #[test]
    fn thumbnail_upscales_small_images() {
        let encoded = encode(&png_bytes(32, 64), "image/png");
        let uri = thumbnail(&encoded, 128).unwrap();
        let thumb = image::load_from_memory(&decode_data_uri(&uri)).unwrap();
        assert_eq!(thumb.height(), 128);
        assert_eq!(thumb.width(), 64);
    }

    #[test]
    fn thumbnail_fails_on_undecodable_payload() {
        let encoded = encode(b"definitely not an image", "image/png");
        assert!(matches!(
            thumbnail(&encoded, 128),
            Err(StudioError::Codec(_))
        ));
    }
}
