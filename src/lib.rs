// SPDX-License-Identifier: GPL-3.0-only

//! snapdiag - photograph a piece of equipment and get a diagnosis
//!
//! An image is acquired from the platform camera, a V4L2 webcam or a file,
//! uploaded to a remote classification service, and the outcome is reported
//! through a [`notify::Notifier`].
//!
//! # Architecture
//!
//! - [`backends`]: capture sources and the camera → webcam fallback
//! - [`pipelines`]: frame decoding and JPEG encoding
//! - [`api`]: health probe and multipart upload
//! - [`session`]: the capture → identify workflow
//! - [`profile`]: the in-memory user profile
//! - [`config`]: user configuration handling

pub mod api;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod notify;
pub mod pipelines;
pub mod profile;
pub mod session;

// Re-export commonly used types
pub use api::{HealthStatus, IdentificationResult, SubmissionClient, SubmissionContext};
pub use backends::capture::{CaptureCoordinator, CaptureSource, CapturedImage, SourceKind};
pub use config::Config;
pub use errors::{AppError, AppResult, CaptureError, SubmissionError};
pub use session::DiagnosisSession;
