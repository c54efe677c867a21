// SPDX-License-Identifier: GPL-3.0-only

//! Wire types for the classification service and their interpretation

use crate::constants::{api, confidence};
use crate::notify::{Notice, Severity};
use serde::Deserialize;

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub huggingface_configured: bool,
    #[serde(default)]
    pub model: Option<String>,
}

impl HealthResponse {
    /// Healthy only with the expected status and a configured model credential
    pub fn is_operational(&self) -> bool {
        self.status == api::OPERATIONAL_STATUS && self.huggingface_configured
    }
}

/// Why the service is not usable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthIssue {
    /// No HTTP response at all
    Unreachable(String),
    /// The service answered but is not ready to classify
    Misconfigured {
        status: String,
        model_configured: bool,
    },
}

/// Result of the last health probe
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HealthStatus {
    pub healthy: bool,
    pub issue: Option<HealthIssue>,
    pub service: Option<String>,
    pub model: Option<String>,
}

impl HealthStatus {
    /// Not probed yet; treated as unhealthy
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn from_response(response: HealthResponse) -> Self {
        let healthy = response.is_operational();
        let issue = (!healthy).then(|| HealthIssue::Misconfigured {
            status: response.status.clone(),
            model_configured: response.huggingface_configured,
        });
        Self {
            healthy,
            issue,
            service: response.service,
            model: response.model,
        }
    }

    pub fn unreachable(detail: impl Into<String>) -> Self {
        Self {
            issue: Some(HealthIssue::Unreachable(detail.into())),
            ..Self::default()
        }
    }

    pub fn misconfigured(status: impl Into<String>) -> Self {
        Self {
            issue: Some(HealthIssue::Misconfigured {
                status: status.into(),
                model_configured: false,
            }),
            ..Self::default()
        }
    }

    /// Short explanation when unhealthy
    pub fn reason(&self) -> Option<String> {
        if self.healthy {
            return None;
        }
        Some(match &self.issue {
            None => "health not checked".to_string(),
            Some(HealthIssue::Unreachable(detail)) => format!("unreachable: {}", detail),
            Some(HealthIssue::Misconfigured {
                status,
                model_configured,
            }) => format!(
                "status \"{}\", model credential {}",
                status,
                if *model_configured {
                    "configured"
                } else {
                    "missing"
                }
            ),
        })
    }

    /// Toast shown after a probe; nothing when healthy
    pub fn notice(&self) -> Option<Notice> {
        match self.issue.as_ref()? {
            HealthIssue::Unreachable(_) => Some(Notice::toast(
                "Cannot connect to the diagnosis service. Make sure it is running.",
                Severity::Danger,
            )),
            HealthIssue::Misconfigured { .. } => Some(Notice::toast(
                "API is not properly configured. Please check the diagnosis service.",
                Severity::Warning,
            )),
        }
    }
}

/// One classifier label with its score in 0..=1
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub score: f64,
}

/// Display bucket for a score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= confidence::HIGH {
            ConfidenceLevel::High
        } else if score >= confidence::MEDIUM {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            ConfidenceLevel::High => Severity::Success,
            ConfidenceLevel::Medium => Severity::Warning,
            ConfidenceLevel::Low => Severity::Danger,
        }
    }
}

impl Prediction {
    /// Score as a percentage with one decimal, e.g. `87.5%`
    pub fn confidence_percent(&self) -> String {
        confidence_percent(self.score)
    }

    pub fn level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_score(self.score)
    }
}

pub fn confidence_percent(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// Body of `POST /identify`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct IdentifyResponse {
    pub status: String,
    pub filename: Option<String>,
    pub file_size: Option<u64>,
    pub model_used: Option<String>,
    pub predictions: Option<Vec<Prediction>>,
    pub top_prediction: Option<Prediction>,
    pub confidence: Option<f64>,
    pub message: Option<String>,
    pub estimated_time: Option<f64>,
    pub problem_detected: Option<bool>,
    pub problem_description: Option<String>,
    pub dispatch_note: Option<String>,
}

/// A successful classification
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosis {
    pub description: String,
    pub problem_detected: bool,
    pub predictions: Vec<Prediction>,
    pub top_prediction: Option<Prediction>,
    pub confidence: Option<f64>,
    pub dispatch_note: Option<String>,
    pub model_used: Option<String>,
    pub filename: Option<String>,
    pub file_size: Option<u64>,
}

/// Interpreted outcome of one submission
#[derive(Debug, Clone, PartialEq)]
pub enum IdentificationResult {
    Success(Diagnosis),
    /// The model is warming up; the user should retry after the estimate
    ModelLoading { estimated_seconds: f64 },
    /// The service answered but could not classify
    Failure { message: String },
}

impl IdentificationResult {
    pub fn from_response(response: IdentifyResponse) -> Self {
        match response.status.as_str() {
            api::STATUS_SUCCESS => {
                let description = response
                    .problem_description
                    .or_else(|| response.top_prediction.as_ref().map(|p| p.label.clone()))
                    .unwrap_or_else(|| "Unknown".to_string());
                IdentificationResult::Success(Diagnosis {
                    description,
                    problem_detected: response.problem_detected.unwrap_or(false),
                    predictions: response.predictions.unwrap_or_default(),
                    top_prediction: response.top_prediction,
                    confidence: response.confidence,
                    dispatch_note: response.dispatch_note,
                    model_used: response.model_used,
                    filename: response.filename,
                    file_size: response.file_size,
                })
            }
            api::STATUS_MODEL_LOADING => IdentificationResult::ModelLoading {
                estimated_seconds: response
                    .estimated_time
                    .unwrap_or(api::DEFAULT_ESTIMATED_SECONDS),
            },
            _ => IdentificationResult::Failure {
                message: response
                    .message
                    .unwrap_or_else(|| "Unable to identify device".to_string()),
            },
        }
    }

    /// Outcome toast
    pub fn notice(&self) -> Notice {
        match self {
            IdentificationResult::Success(diagnosis) => Notice::toast(
                format!("Problem identified: {}", diagnosis.description),
                Severity::Danger,
            ),
            IdentificationResult::ModelLoading { estimated_seconds } => Notice::toast(
                format!(
                    "Model is loading. Please wait {}s and try again.",
                    estimated_seconds
                ),
                Severity::Warning,
            ),
            IdentificationResult::Failure { message } => {
                Notice::toast(message.clone(), Severity::Warning)
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, IdentificationResult::Success(_))
    }

    /// Suggested wait before trying again, for model warm-up only
    pub fn retry_after(&self) -> Option<f64> {
        match self {
            IdentificationResult::ModelLoading { estimated_seconds } => Some(*estimated_seconds),
            _ => None,
        }
    }
}
