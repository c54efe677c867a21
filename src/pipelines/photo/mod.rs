// SPDX-License-Identifier: GPL-3.0-only

//! Still photo pipeline
//!
//! ```text
//! Raw frame → Decode (MJPEG / YUYV / RGB) → RGB raster → JPEG → CapturedImage
//! ```

pub mod encoding;
pub mod processing;

pub use encoding::PhotoEncoder;
pub use processing::decode_frame;

use crate::backends::capture::types::{CapturedImage, RawFrame};
use crate::constants::encoding as encoding_consts;
use crate::errors::CaptureResult;
use image::RgbImage;

/// Turns device frames into upload-ready images
#[derive(Debug, Clone, Copy)]
pub struct PhotoPipeline {
    encoder: PhotoEncoder,
}

impl PhotoPipeline {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            encoder: PhotoEncoder::new(jpeg_quality),
        }
    }

    /// Decode a raw frame, failing if it is not a complete picture
    pub fn render(&self, frame: &RawFrame) -> CaptureResult<RgbImage> {
        decode_frame(frame)
    }

    /// Compress a rendered frame into a capture with no filename of its own
    pub fn finish(&self, image: &RgbImage) -> CaptureResult<CapturedImage> {
        let bytes = self.encoder.encode_jpeg(image)?;
        Ok(CapturedImage::new(
            bytes,
            encoding_consts::CAPTURE_MIME_TYPE,
            None,
        ))
    }

    /// Render and compress in one step
    pub fn process(&self, frame: &RawFrame) -> CaptureResult<CapturedImage> {
        let image = self.render(frame)?;
        self.finish(&image)
    }
}

impl Default for PhotoPipeline {
    fn default() -> Self {
        Self::new(encoding_consts::JPEG_QUALITY)
    }
}
