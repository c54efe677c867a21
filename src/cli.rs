// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Probing the classification service
//! - Capturing an image and identifying it
//! - Showing and editing the user profile
//!
//! Workflow problems are reported as notices and still exit successfully;
//! only setup failures (bad config, runtime start) return an error.

use snapdiag::api::{ConfidenceLevel, IdentificationResult, SubmissionClient};
use snapdiag::backends::capture::{CaptureCoordinator, SourceKind};
use snapdiag::config::Config;
use snapdiag::notify::{Notifier, TerminalNotifier};
use snapdiag::profile::{ProfileEdit, UserProfile};
use snapdiag::session::DiagnosisSession;
use std::path::{Path, PathBuf};
use tracing::info;

/// Load the config file and apply command-line overrides
pub fn load_config(
    path: Option<&Path>,
    api_url: Option<&str>,
) -> Result<Config, Box<dyn std::error::Error>> {
    let config = Config::load(path)?;
    match api_url {
        Some(url) => Ok(config.with_api_base_url(url)?),
        None => Ok(config),
    }
}

/// Probe the service and print its status
pub fn check_health(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let client = SubmissionClient::new(&config.api_base_url)?;
    let mut session = DiagnosisSession::new(
        CaptureCoordinator::from_config(config, None),
        client,
        TerminalNotifier::new(),
    );

    let rt = tokio::runtime::Runtime::new()?;
    let health = rt.block_on(session.refresh_health()).clone();

    println!("Service: {}", config.api_base_url);
    if health.healthy {
        println!("Status:  healthy");
    } else {
        println!(
            "Status:  unhealthy ({})",
            health.reason().unwrap_or_default()
        );
    }
    if let Some(service) = &health.service {
        println!("Name:    {}", service);
    }
    if let Some(model) = &health.model {
        println!("Model:   {}", model);
    }
    Ok(())
}

/// Capture an image from `kind` and submit it
pub fn identify(
    config: &Config,
    kind: SourceKind,
    file: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = SubmissionClient::new(&config.api_base_url)?;
    let mut session = DiagnosisSession::new(
        CaptureCoordinator::from_config(config, file),
        client,
        TerminalNotifier::new(),
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(session.refresh_health());

    // Hardware and dialogs block, so capture stays outside the runtime
    let Some(image) = session.capture(kind) else {
        return Ok(());
    };
    info!(source = %kind, size = image.len(), "Submitting capture");

    if let Some(result) = rt.block_on(session.identify(&image, None)) {
        print_result(result);
    }
    Ok(())
}

fn print_result(result: &IdentificationResult) {
    let IdentificationResult::Success(diagnosis) = result else {
        return;
    };

    println!();
    println!("Diagnosis:  {}", diagnosis.description);
    if let Some(note) = &diagnosis.dispatch_note {
        println!("Dispatch:   {}", note);
    }
    if let Some(top) = &diagnosis.top_prediction {
        println!(
            "Top match:  {} ({}, {})",
            top.label,
            top.confidence_percent(),
            level_name(top.level())
        );
    }
    if !diagnosis.predictions.is_empty() {
        println!("Predictions:");
        for prediction in &diagnosis.predictions {
            println!(
                "  {:<32} {:>7}",
                prediction.label,
                prediction.confidence_percent()
            );
        }
    }
    if let Some(model) = &diagnosis.model_used {
        println!("Model:      {}", model);
    }
}

fn level_name(level: ConfidenceLevel) -> &'static str {
    match level {
        ConfidenceLevel::High => "high confidence",
        ConfidenceLevel::Medium => "medium confidence",
        ConfidenceLevel::Low => "low confidence",
    }
}

/// Print the user profile
pub fn show_profile() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", UserProfile::default());
    Ok(())
}

/// Apply an edit to the profile and print the result
pub fn edit_profile(
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut profile = UserProfile::default();
    let mut notifier = TerminalNotifier::new();

    match profile.apply(ProfileEdit { name, email, phone }) {
        Ok(notice) => notifier.notify(notice),
        Err(e) => notifier.notify(e.notice()),
    }
    println!("{}", profile);
    Ok(())
}
