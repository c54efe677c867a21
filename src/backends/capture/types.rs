// SPDX-License-Identifier: GPL-3.0-only
// Shared types for capture sources

//! Shared types for capture sources

use crate::constants::encoding;
use std::sync::Arc;

/// The three places an image can come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Platform camera service (PipeWire)
    Camera,
    /// Direct V4L2 webcam access
    Webcam,
    /// Image file chosen by the user
    File,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Camera => write!(f, "camera"),
            SourceKind::Webcam => write!(f, "webcam"),
            SourceKind::File => write!(f, "file"),
        }
    }
}

/// An image ready for submission
///
/// Created once per capture and never modified. Camera and webcam captures
/// carry no filename of their own; [`CapturedImage::upload_filename`]
/// synthesizes a timestamped one for them.
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedImage {
    bytes: Arc<[u8]>,
    mime_type: String,
    suggested_filename: Option<String>,
}

impl CapturedImage {
    pub fn new(
        bytes: impl Into<Arc<[u8]>>,
        mime_type: impl Into<String>,
        suggested_filename: Option<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
            suggested_filename,
        }
    }

    /// Encoded image bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn suggested_filename(&self) -> Option<&str> {
        self.suggested_filename.as_deref()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Filename sent with the upload
    ///
    /// The suggested name when there is one, otherwise
    /// `camera_capture_<unix millis>.jpg`.
    pub fn upload_filename(&self) -> String {
        match &self.suggested_filename {
            Some(name) => name.clone(),
            None => format!(
                "{}{}.jpg",
                encoding::CAPTURE_FILENAME_PREFIX,
                chrono::Utc::now().timestamp_millis()
            ),
        }
    }
}

impl std::fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedImage")
            .field("bytes", &format_args!("{} bytes", self.bytes.len()))
            .field("mime_type", &self.mime_type)
            .field("suggested_filename", &self.suggested_filename)
            .finish()
    }
}

/// Pixel layout of a raw frame coming off a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePixelFormat {
    /// Motion JPEG, each frame a complete JPEG
    Mjpeg,
    /// Packed 4:2:2 (Y0 U Y1 V)
    Yuyv,
    /// 24-bit RGB
    Rgb24,
}

impl FramePixelFormat {
    /// Parse from a V4L2 FourCC
    pub fn from_fourcc(fourcc: &[u8; 4]) -> Option<Self> {
        match fourcc {
            b"MJPG" | b"JPEG" => Some(Self::Mjpeg),
            b"YUYV" | b"YUY2" => Some(Self::Yuyv),
            b"RGB3" => Some(Self::Rgb24),
            _ => None,
        }
    }

    /// Minimum bytes per row
    pub fn min_stride(&self, width: u32) -> u32 {
        match self {
            Self::Mjpeg => 0,
            // Pixels come in pairs sharing one U/V sample
            Self::Yuyv => width.div_ceil(2) * 4,
            Self::Rgb24 => width * 3,
        }
    }
}

/// A single undecoded frame
#[derive(Clone)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    pub format: FramePixelFormat,
    /// Row stride in bytes (ignored for MJPEG)
    pub stride: u32,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("stride", &self.stride)
            .field("data", &format_args!("{} bytes", self.data.len()))
            .finish()
    }
}

/// Requested stream properties
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Display for StreamConstraints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
