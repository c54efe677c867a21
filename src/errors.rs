// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the capture and submission workflow
//!
//! Every error here is recoverable at the user boundary: the session turns it
//! into a [`Notice`] and the program carries on.

use crate::notify::{Notice, Severity};
use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Result type alias for submission operations
pub type SubmissionResult<T> = Result<T, SubmissionError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Capture-related errors
    Capture(CaptureError),
    /// Submission-related errors
    Submission(SubmissionError),
    /// Profile editing errors
    Profile(ProfileError),
    /// Configuration errors
    Config(String),
    /// Generic error with message
    Other(String),
}

/// Errors raised while acquiring an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The capture source is not supported on this platform
    Unavailable(String),
    /// Access to the video device was refused
    PermissionDenied,
    /// No video device exists
    DeviceNotFound,
    /// The video device is held by another process
    DeviceBusy,
    /// Any other device failure
    Device(String),
    /// The stream never produced a decodable frame
    NoFrame,
    /// Rendering or compressing the frame failed
    Encoding(String),
    /// The selected file is not an image; carries the offending MIME type
    InvalidFileType(String),
    /// The selected file could not be read
    FileRead(String),
    /// The user dismissed the picker without choosing anything
    Cancelled,
}

/// Errors raised while talking to the classification service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The image carries no bytes; refused before any request
    NoImageData,
    /// Health was not confirmed; refused before any request
    ServiceUnavailable,
    /// No HTTP response at all (connection refused, DNS, reset)
    ServiceUnreachable(String),
    /// The service answered with a structured error body
    Rejected(String),
    /// Anything else that went wrong on the way
    Failed(String),
}

/// Profile editing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// Name or email was left blank
    MissingRequired,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
            AppError::Submission(e) => write!(f, "Submission error: {}", e),
            AppError::Profile(e) => write!(f, "Profile error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Unavailable(msg) => write!(f, "Capture source unavailable: {}", msg),
            CaptureError::PermissionDenied => write!(f, "Camera permission denied"),
            CaptureError::DeviceNotFound => write!(f, "No camera device found"),
            CaptureError::DeviceBusy => write!(f, "Camera is busy"),
            CaptureError::Device(msg) => write!(f, "Camera error: {}", msg),
            CaptureError::NoFrame => write!(f, "No decodable frame received"),
            CaptureError::Encoding(msg) => write!(f, "Encoding failed: {}", msg),
            CaptureError::InvalidFileType(mime) => write!(f, "Not an image file: {}", mime),
            CaptureError::FileRead(msg) => write!(f, "Failed to read file: {}", msg),
            CaptureError::Cancelled => write!(f, "Selection cancelled"),
        }
    }
}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionError::NoImageData => write!(f, "No image data available"),
            SubmissionError::ServiceUnavailable => write!(f, "Service health not confirmed"),
            SubmissionError::ServiceUnreachable(msg) => write!(f, "Service unreachable: {}", msg),
            SubmissionError::Rejected(detail) => write!(f, "Service rejected request: {}", detail),
            SubmissionError::Failed(msg) => write!(f, "Request failed: {}", msg),
        }
    }
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::MissingRequired => write!(f, "Name and email are required"),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for SubmissionError {}
impl std::error::Error for ProfileError {}

impl CaptureError {
    /// User-facing notice for this error
    ///
    /// Capture problems block the flow, so they surface as alerts. A cancelled
    /// picker is not an error from the user's point of view and yields nothing.
    pub fn notice(&self) -> Option<Notice> {
        let (header, message) = match self {
            CaptureError::Cancelled => return None,
            CaptureError::Unavailable(_) => (
                "Webcam Not Supported",
                "This system does not support camera access. Try selecting a file instead."
                    .to_string(),
            ),
            CaptureError::PermissionDenied => (
                "Permission Denied",
                "Please allow camera access to use this feature.".to_string(),
            ),
            CaptureError::DeviceNotFound => (
                "No Camera Found",
                "No camera detected. Please connect a camera or select a file instead."
                    .to_string(),
            ),
            CaptureError::DeviceBusy => (
                "Camera In Use",
                "Camera is already in use by another application. Please close other apps using the camera."
                    .to_string(),
            ),
            CaptureError::Device(msg) => (
                "Webcam Error",
                format!(
                    "Failed to access webcam: {}. Try selecting a file instead.",
                    msg
                ),
            ),
            CaptureError::NoFrame | CaptureError::Encoding(_) => (
                "Capture Error",
                "Failed to capture image from camera.".to_string(),
            ),
            CaptureError::InvalidFileType(_) => {
                ("Invalid File", "Please select an image file.".to_string())
            }
            CaptureError::FileRead(_) => {
                ("Read Error", "Failed to read the selected file.".to_string())
            }
        };
        Some(Notice::alert(header, message))
    }
}

impl SubmissionError {
    /// User-facing notice for this error
    ///
    /// Client-side refusals are toasts; failures of an attempted request are
    /// alerts.
    pub fn notice(&self) -> Notice {
        match self {
            SubmissionError::NoImageData => {
                Notice::toast("No image data available", Severity::Danger)
            }
            SubmissionError::ServiceUnavailable => Notice::toast(
                "API is not available. Please check the diagnosis service.",
                Severity::Danger,
            ),
            SubmissionError::ServiceUnreachable(_) => Notice::alert(
                "Identification Error",
                "Failed to identify device. Cannot connect to API. Make sure the diagnosis service is running.",
            ),
            SubmissionError::Rejected(detail) => Notice::alert(
                "Identification Error",
                format!("Failed to identify device. {}", detail),
            ),
            SubmissionError::Failed(_) => Notice::alert(
                "Identification Error",
                "Failed to identify device. Please try again.",
            ),
        }
    }
}

impl ProfileError {
    /// User-facing notice for this error
    pub fn notice(&self) -> Notice {
        Notice::toast(self.to_string(), Severity::Warning)
    }
}

// Conversions from sub-errors to AppError
impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        AppError::Capture(err)
    }
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        AppError::Submission(err)
    }
}

impl From<ProfileError> for AppError {
    fn from(err: ProfileError) -> Self {
        AppError::Profile(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Other(err.to_string())
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::FileRead(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_has_no_notice() {
        assert!(CaptureError::Cancelled.notice().is_none());
    }

    #[test]
    fn test_device_errors_have_distinct_headers() {
        let headers: Vec<String> = [
            CaptureError::PermissionDenied,
            CaptureError::DeviceNotFound,
            CaptureError::DeviceBusy,
            CaptureError::Device("boom".into()),
        ]
        .iter()
        .filter_map(|e| e.notice())
        .map(|n| n.header().unwrap_or_default().to_string())
        .collect();

        assert_eq!(
            headers,
            vec![
                "Permission Denied",
                "No Camera Found",
                "Camera In Use",
                "Webcam Error"
            ]
        );
    }

    #[test]
    fn test_rejected_surfaces_detail() {
        let notice = SubmissionError::Rejected("File must be an image".into()).notice();
        assert!(notice.message().ends_with("File must be an image"));
        assert!(notice.is_alert());
    }

    #[test]
    fn test_refusals_are_toasts() {
        assert!(!SubmissionError::ServiceUnavailable.notice().is_alert());
        assert!(!SubmissionError::NoImageData.notice().is_alert());
    }
}
