// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Classification service endpoints and protocol values
pub mod api {
    /// Base URL used when neither the config file nor the command line sets one.
    ///
    /// Baked in at build time from `SNAPDIAG_API_URL`.
    pub const DEFAULT_BASE_URL: &str = match option_env!("SNAPDIAG_API_URL") {
        Some(url) => url,
        None => "http://localhost:8000",
    };

    /// Health probe path
    pub const HEALTH_PATH: &str = "/health";

    /// Image upload path
    pub const IDENTIFY_PATH: &str = "/identify";

    /// Multipart field carrying the image
    pub const UPLOAD_FIELD: &str = "file";

    /// `status` value of a running service
    pub const OPERATIONAL_STATUS: &str = "healthy";

    /// `status` value of a successful identification
    pub const STATUS_SUCCESS: &str = "success";

    /// `status` value while the remote model warms up
    pub const STATUS_MODEL_LOADING: &str = "model_loading";

    /// Wait suggested when a model-loading reply carries no estimate, in seconds
    pub const DEFAULT_ESTIMATED_SECONDS: f64 = 30.0;
}

/// Webcam capture defaults
pub mod webcam {
    /// Default V4L2 capture node
    pub const DEFAULT_DEVICE: &str = "/dev/video0";

    /// Target capture width
    pub const DEFAULT_WIDTH: u32 = 1280;

    /// Target capture height
    pub const DEFAULT_HEIGHT: u32 = 720;

    /// Number of mmap buffers requested from the driver
    pub const BUFFER_COUNT: u32 = 4;

    /// Frames to pull before giving up on a decodable one
    ///
    /// Many UVC cameras emit a few empty or truncated MJPEG frames while
    /// auto-exposure settles.
    pub const MAX_WARMUP_FRAMES: u32 = 30;
}

/// Platform camera (GStreamer) constants
pub mod pipeline {
    /// Pipeline description for a single still from the default PipeWire camera
    pub const CAMERA_PIPELINE: &str = "pipewiresrc name=src ! videoconvert ! \
         video/x-raw,format=RGB ! appsink name=sink max-buffers=1 drop=true sync=false";

    /// Source element that must be installed for the platform camera to be usable
    pub const SOURCE_ELEMENT: &str = "pipewiresrc";

    /// Poll interval while waiting for the first sample, in milliseconds
    pub const SAMPLE_POLL_MS: u64 = 100;

    /// Upper bound on waiting for the camera to deliver its first sample
    pub const FIRST_SAMPLE_TIMEOUT_SECS: u64 = 10;

    /// Pipeline state change timeout on stop
    pub const STOP_TIMEOUT_SECS: u64 = 2;
}

/// Image encoding constants
pub mod encoding {
    /// JPEG quality used for camera and webcam captures
    pub const JPEG_QUALITY: u8 = 90;

    /// MIME type of camera and webcam captures
    pub const CAPTURE_MIME_TYPE: &str = "image/jpeg";

    /// Prefix of synthesized upload filenames
    pub const CAPTURE_FILENAME_PREFIX: &str = "camera_capture_";
}

/// Supported file formats for the file picker
pub mod file_formats {
    /// Image file extensions offered by the picker dialog
    pub const IMAGE_EXTENSIONS: &[&str] = &[
        "png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff",
    ];

    /// MIME type reported for files the image crate does not recognize
    pub const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";
}

/// Prediction confidence thresholds
pub mod confidence {
    /// Scores at or above this are shown as high confidence
    pub const HIGH: f64 = 0.8;

    /// Scores at or above this are shown as medium confidence
    pub const MEDIUM: f64 = 0.6;
}

/// Application information utilities
pub mod app_info {
    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }

    /// Directory name used under the user config dir
    pub const CONFIG_DIR_NAME: &str = "snapdiag";

    /// Config file name
    pub const CONFIG_FILE_NAME: &str = "config.json";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url_is_http() {
        assert!(api::DEFAULT_BASE_URL.starts_with("http"));
    }
}
