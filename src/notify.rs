// SPDX-License-Identifier: GPL-3.0-only

//! User-facing notices
//!
//! The workflow never decides how a message is shown. It produces a [`Notice`]
//! (a blocking alert or a transient toast) and hands it to a [`Notifier`].

use std::io::Write;
use tracing::{info, warn};

/// Toast colour, mirroring the severity of the outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    Success,
    Warning,
    Danger,
    #[default]
    Dark,
}

impl Severity {
    /// Short tag used by the terminal notifier
    pub fn tag(&self) -> &'static str {
        match self {
            Severity::Success => "ok",
            Severity::Warning => "warning",
            Severity::Danger => "error",
            Severity::Dark => "info",
        }
    }
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Blocking dialog with a header, acknowledged by the user
    Alert { header: String, message: String },
    /// Transient status line
    Toast { message: String, severity: Severity },
}

impl Notice {
    pub fn alert(header: impl Into<String>, message: impl Into<String>) -> Self {
        Notice::Alert {
            header: header.into(),
            message: message.into(),
        }
    }

    pub fn toast(message: impl Into<String>, severity: Severity) -> Self {
        Notice::Toast {
            message: message.into(),
            severity,
        }
    }

    /// Alert header, `None` for toasts
    pub fn header(&self) -> Option<&str> {
        match self {
            Notice::Alert { header, .. } => Some(header),
            Notice::Toast { .. } => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Alert { message, .. } | Notice::Toast { message, .. } => message,
        }
    }

    /// Toast severity, `None` for alerts
    pub fn severity(&self) -> Option<Severity> {
        match self {
            Notice::Toast { severity, .. } => Some(*severity),
            Notice::Alert { .. } => None,
        }
    }

    pub fn is_alert(&self) -> bool {
        matches!(self, Notice::Alert { .. })
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::Alert { header, message } => write!(f, "{}: {}", header, message),
            Notice::Toast { message, severity } => write!(f, "[{}] {}", severity.tag(), message),
        }
    }
}

/// Presentation layer for notices and the loading indicator
pub trait Notifier {
    /// Show a notice to the user
    fn notify(&mut self, notice: Notice);

    /// Present the loading indicator with a message
    fn show_loading(&mut self, message: &str);

    /// Dismiss the loading indicator
    fn hide_loading(&mut self);
}

/// Keeps the loading indicator up for as long as it lives
///
/// Dropping the guard dismisses the indicator, so every exit path of a
/// submission (success, error, early return, panic unwind) clears it.
pub struct LoadingGuard<'a, N: Notifier + ?Sized> {
    notifier: &'a mut N,
}

impl<'a, N: Notifier + ?Sized> LoadingGuard<'a, N> {
    pub fn present(notifier: &'a mut N, message: &str) -> Self {
        notifier.show_loading(message);
        Self { notifier }
    }
}

impl<N: Notifier + ?Sized> Drop for LoadingGuard<'_, N> {
    fn drop(&mut self) {
        self.notifier.hide_loading();
    }
}

/// Notifier printing to the terminal
///
/// Alerts go to stderr, toasts to stdout. The loading indicator is a single
/// line that gets erased when dismissed.
#[derive(Debug, Default)]
pub struct TerminalNotifier {
    loading: bool,
}

impl TerminalNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Erase the progress line
    fn clear_line(&self) {
        print!("\r\x1b[2K");
        let _ = std::io::stdout().flush();
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&mut self, notice: Notice) {
        if self.loading {
            self.clear_line();
        }
        match &notice {
            Notice::Alert { header, message } => {
                warn!(header = %header, message = %message, "Alert");
                eprintln!();
                eprintln!("{}", header);
                eprintln!("  {}", message);
            }
            Notice::Toast { message, severity } => {
                info!(severity = severity.tag(), message = %message, "Toast");
                println!("{}", notice);
            }
        }
    }

    fn show_loading(&mut self, message: &str) {
        self.loading = true;
        print!("{} ", message);
        let _ = std::io::stdout().flush();
    }

    fn hide_loading(&mut self) {
        if self.loading {
            self.loading = false;
            self.clear_line();
        }
    }
}
