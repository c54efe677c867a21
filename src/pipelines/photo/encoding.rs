// SPDX-License-Identifier: GPL-3.0-only

//! Photo encoding
//!
//! Compresses a rendered frame to JPEG, the format every camera and webcam
//! capture is uploaded in.

use crate::errors::{CaptureError, CaptureResult};
use image::RgbImage;
use tracing::debug;

/// JPEG encoder with a fixed quality
#[derive(Debug, Clone, Copy)]
pub struct PhotoEncoder {
    quality: u8,
}

impl PhotoEncoder {
    /// Create an encoder; quality is clamped to 1-100
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encode image as JPEG
    pub fn encode_jpeg(&self, image: &RgbImage) -> CaptureResult<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);

        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, self.quality);

        encoder
            .encode(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| CaptureError::Encoding(format!("JPEG encoding failed: {}", e)))?;

        debug!(
            size = buffer.len(),
            quality = self.quality,
            "JPEG encoding complete"
        );
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_is_clamped() {
        assert_eq!(PhotoEncoder::new(0).quality(), 1);
        assert_eq!(PhotoEncoder::new(250).quality(), 100);
        assert_eq!(PhotoEncoder::new(90).quality(), 90);
    }

    #[test]
    fn test_output_is_jpeg() {
        let image = RgbImage::from_pixel(16, 8, image::Rgb([200, 10, 10]));
        let bytes = PhotoEncoder::new(90).encode_jpeg(&image).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }
}
