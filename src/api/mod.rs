// SPDX-License-Identifier: GPL-3.0-only

//! Classification service access
//!
//! - [`client`]: health probe and multipart image upload
//! - [`types`]: response bodies and their interpretation into outcomes

pub mod client;
pub mod types;

pub use client::{SubmissionClient, SubmissionContext};
pub use types::{
    ConfidenceLevel, Diagnosis, HealthIssue, HealthResponse, HealthStatus, IdentificationResult,
    IdentifyResponse, Prediction, confidence_percent,
};
