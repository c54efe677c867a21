// SPDX-License-Identifier: GPL-3.0-only

//! Frame decoding
//!
//! Turns a raw device frame into an RGB raster. A frame that fails here is
//! treated as "not ready yet" by the webcam source, which simply pulls the
//! next one.

use crate::backends::capture::types::{FramePixelFormat, RawFrame};
use crate::errors::{CaptureError, CaptureResult};
use image::{ImageFormat, RgbImage};
use tracing::debug;

/// Decode a raw frame into RGB
pub fn decode_frame(frame: &RawFrame) -> CaptureResult<RgbImage> {
    if frame.data.is_empty() || frame.width == 0 || frame.height == 0 {
        return Err(CaptureError::Encoding("empty frame".to_string()));
    }

    let image = match frame.format {
        FramePixelFormat::Mjpeg => decode_mjpeg(&frame.data)?,
        FramePixelFormat::Yuyv => {
            check_layout(frame)?;
            yuyv_to_rgb(&frame.data, frame.width, frame.height, frame.stride)
        }
        FramePixelFormat::Rgb24 => {
            check_layout(frame)?;
            rgb24_rows(&frame.data, frame.width, frame.height, frame.stride)
        }
    };

    debug!(
        width = image.width(),
        height = image.height(),
        format = ?frame.format,
        "Frame decoded"
    );
    Ok(image)
}

fn decode_mjpeg(data: &[u8]) -> CaptureResult<RgbImage> {
    image::load_from_memory_with_format(data, ImageFormat::Jpeg)
        .map(|img| img.to_rgb8())
        .map_err(|e| CaptureError::Encoding(format!("MJPEG decode failed: {}", e)))
}

/// Make sure a packed frame holds every row it claims to
fn check_layout(frame: &RawFrame) -> CaptureResult<()> {
    let min_stride = frame.format.min_stride(frame.width);
    if frame.stride < min_stride {
        return Err(CaptureError::Encoding(format!(
            "stride {} below minimum {}",
            frame.stride, min_stride
        )));
    }
    let needed = frame.stride as usize * (frame.height as usize - 1) + min_stride as usize;
    if frame.data.len() < needed {
        return Err(CaptureError::Encoding(format!(
            "truncated frame: {} of {} bytes",
            frame.data.len(),
            needed
        )));
    }
    Ok(())
}

/// Copy RGB rows out of a (possibly padded) buffer
fn rgb24_rows(data: &[u8], width: u32, height: u32, stride: u32) -> RgbImage {
    let row_bytes = width as usize * 3;
    let mut out = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * stride as usize;
        out.extend_from_slice(&data[start..start + row_bytes]);
    }
    RgbImage::from_raw(width, height, out).unwrap_or_else(|| RgbImage::new(width, height))
}

/// Convert packed YUYV (BT.601, limited range) to RGB
pub fn yuyv_to_rgb(data: &[u8], width: u32, height: u32, stride: u32) -> RgbImage {
    let mut image = RgbImage::new(width, height);

    for y in 0..height {
        let row = &data[(y * stride) as usize..];
        let mut x = 0;
        while x < width {
            let base = (x / 2 * 4) as usize;
            let y0 = row[base];
            let u = row[base + 1];
            let y1 = row[base + 2];
            let v = row[base + 3];

            image.put_pixel(x, y, image::Rgb(ycbcr_to_rgb(y0, u, v)));
            if x + 1 < width {
                image.put_pixel(x + 1, y, image::Rgb(ycbcr_to_rgb(y1, u, v)));
            }
            x += 2;
        }
    }

    image
}

fn ycbcr_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let c = y as i32 - 16;
    let d = u as i32 - 128;
    let e = v as i32 - 128;

    let r = (298 * c + 409 * e + 128) >> 8;
    let g = (298 * c - 100 * d - 208 * e + 128) >> 8;
    let b = (298 * c + 516 * d + 128) >> 8;

    [
        r.clamp(0, 255) as u8,
        g.clamp(0, 255) as u8,
        b.clamp(0, 255) as u8,
    ]
}
