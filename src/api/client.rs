// SPDX-License-Identifier: GPL-3.0-only

//! HTTP client for the classification service

use super::types::{HealthResponse, HealthStatus, IdentificationResult, IdentifyResponse};
use crate::backends::capture::CapturedImage;
use crate::constants::api;
use crate::errors::{SubmissionError, SubmissionResult};
use reqwest::multipart::{Form, Part};
use tracing::{debug, info, warn};

/// Everything a single submission needs to know besides the image
///
/// Built fresh for each request from the latest health probe, so nothing
/// about service state is shared between submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionContext {
    pub health: HealthStatus,
}

impl SubmissionContext {
    pub fn new(health: HealthStatus) -> Self {
        Self { health }
    }

    pub fn is_healthy(&self) -> bool {
        self.health.healthy
    }
}

/// Talks to `/health` and `/identify`
#[derive(Debug, Clone)]
pub struct SubmissionClient {
    http: reqwest::Client,
    base_url: String,
}

impl SubmissionClient {
    pub fn new(base_url: &str) -> SubmissionResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SubmissionError::Failed(format!("HTTP client setup failed: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Probe the service
    ///
    /// Never fails: transport errors and odd answers become an unhealthy
    /// status with the matching issue.
    pub async fn check_health(&self) -> HealthStatus {
        let url = self.endpoint(api::HEALTH_PATH);
        debug!(%url, "Checking service health");

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, error = %e, "Health check failed to connect");
                return HealthStatus::unreachable(e.to_string());
            }
        };

        let code = response.status();
        if !code.is_success() {
            warn!(%url, status = code.as_u16(), "Health check returned an error status");
            return HealthStatus::misconfigured(format!("HTTP {}", code.as_u16()));
        }

        let status = match response.json::<HealthResponse>().await {
            Ok(body) => HealthStatus::from_response(body),
            Err(e) => {
                warn!(%url, error = %e, "Health response was not understood");
                HealthStatus::misconfigured("invalid response")
            }
        };

        info!(
            healthy = status.healthy,
            service = ?status.service,
            model = ?status.model,
            "Service health checked"
        );
        status
    }

    /// Client-side checks done before any request
    pub fn ensure_submittable(
        image: &CapturedImage,
        context: &SubmissionContext,
    ) -> SubmissionResult<()> {
        if image.is_empty() {
            return Err(SubmissionError::NoImageData);
        }
        if !context.is_healthy() {
            return Err(SubmissionError::ServiceUnavailable);
        }
        Ok(())
    }

    /// Upload an image for classification
    ///
    /// `filename` overrides the image's own upload name.
    pub async fn submit(
        &self,
        image: &CapturedImage,
        filename: Option<&str>,
        context: &SubmissionContext,
    ) -> SubmissionResult<IdentificationResult> {
        if let Err(e) = Self::ensure_submittable(image, context) {
            warn!(error = %e, "Submission refused");
            return Err(e);
        }

        let filename = filename
            .map(str::to_string)
            .unwrap_or_else(|| image.upload_filename());
        let url = self.endpoint(api::IDENTIFY_PATH);

        let part = Part::bytes(image.bytes().to_vec())
            .file_name(filename.clone())
            .mime_str(image.mime_type())
            .map_err(|e| SubmissionError::Failed(format!("Invalid MIME type: {}", e)))?;
        let form = Form::new().part(api::UPLOAD_FIELD, part);

        info!(%url, %filename, size = image.len(), mime = image.mime_type(), "Submitting image");

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!(%url, error = %e, "Identification request failed to connect");
                SubmissionError::ServiceUnreachable(e.to_string())
            })?;

        let code = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmissionError::Failed(format!("Failed to read response: {}", e)))?;

        if !code.is_success() {
            warn!(status = code.as_u16(), "Identification request rejected");
            return Err(error_from_body(code.as_u16(), &body));
        }

        let parsed: IdentifyResponse = serde_json::from_str(&body)
            .map_err(|e| SubmissionError::Failed(format!("Invalid response: {}", e)))?;
        let result = IdentificationResult::from_response(parsed);

        info!(
            status = code.as_u16(),
            success = result.is_success(),
            retry_after = ?result.retry_after(),
            "Identification finished"
        );
        Ok(result)
    }
}

/// Turn a non-2xx body into an error, surfacing the service's `detail`
fn error_from_body(status: u16, body: &str) -> SubmissionError {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("detail").cloned());

    match detail {
        Some(serde_json::Value::String(detail)) => SubmissionError::Rejected(detail),
        Some(serde_json::Value::Null) | None => SubmissionError::Failed(format!("HTTP {}", status)),
        Some(other) => SubmissionError::Rejected(other.to_string()),
    }
}
