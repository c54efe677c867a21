// SPDX-License-Identifier: GPL-3.0-only

//! Capture → identify workflow
//!
//! Holds the current image, the last result and the last health probe, and
//! turns every outcome into a notice. Errors stop here: callers only see
//! whether a step produced something.

use crate::api::{HealthStatus, IdentificationResult, SubmissionClient, SubmissionContext};
use crate::backends::capture::{CaptureCoordinator, CapturedImage, SourceKind};
use crate::notify::{LoadingGuard, Notifier};
use tracing::{debug, info};

/// Message shown while a submission is in flight
pub const LOADING_MESSAGE: &str = "Diagnosing internet issue...";

/// Submission state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
}

/// Marks a submission in flight; dropping it returns to idle and hides the
/// loading indicator
struct SubmissionGuard<'a, N: Notifier> {
    state: &'a mut SubmissionState,
    _loading: LoadingGuard<'a, N>,
}

impl<'a, N: Notifier> SubmissionGuard<'a, N> {
    fn begin(state: &'a mut SubmissionState, notifier: &'a mut N) -> Self {
        *state = SubmissionState::Submitting;
        Self {
            state,
            _loading: LoadingGuard::present(notifier, LOADING_MESSAGE),
        }
    }
}

impl<N: Notifier> Drop for SubmissionGuard<'_, N> {
    fn drop(&mut self) {
        *self.state = SubmissionState::Idle;
    }
}

/// One user's capture-and-identify session
pub struct DiagnosisSession<N: Notifier> {
    coordinator: CaptureCoordinator,
    client: SubmissionClient,
    notifier: N,
    health: HealthStatus,
    image: Option<CapturedImage>,
    result: Option<IdentificationResult>,
    state: SubmissionState,
}

impl<N: Notifier> DiagnosisSession<N> {
    pub fn new(coordinator: CaptureCoordinator, client: SubmissionClient, notifier: N) -> Self {
        Self {
            coordinator,
            client,
            notifier,
            health: HealthStatus::unknown(),
            image: None,
            result: None,
            state: SubmissionState::Idle,
        }
    }

    /// Probe the service and report problems
    pub async fn refresh_health(&mut self) -> &HealthStatus {
        self.health = self.client.check_health().await;
        if let Some(notice) = self.health.notice() {
            self.notifier.notify(notice);
        }
        &self.health
    }

    /// Acquire a new image, replacing the old one and its result
    ///
    /// Returns `None` when the capture failed or was cancelled; failures have
    /// already been reported.
    pub fn capture(&mut self, kind: SourceKind) -> Option<CapturedImage> {
        match self.coordinator.capture(kind) {
            Ok(image) => {
                info!(source = %kind, size = image.len(), mime = image.mime_type(), "Image captured");
                self.result = None;
                self.image = Some(image.clone());
                Some(image)
            }
            Err(e) => {
                debug!(source = %kind, error = %e, "Capture did not produce an image");
                if let Some(notice) = e.notice() {
                    self.notifier.notify(notice);
                }
                None
            }
        }
    }

    /// Submit an image and report the outcome
    ///
    /// `filename` overrides the image's own upload name.
    pub async fn identify(
        &mut self,
        image: &CapturedImage,
        filename: Option<&str>,
    ) -> Option<&IdentificationResult> {
        let context = SubmissionContext::new(self.health.clone());

        // Refusals happen before the loading indicator appears
        if let Err(e) = SubmissionClient::ensure_submittable(image, &context) {
            self.notifier.notify(e.notice());
            return None;
        }

        let outcome = {
            let _guard = SubmissionGuard::begin(&mut self.state, &mut self.notifier);
            self.client.submit(image, filename, &context).await
        };

        match outcome {
            Ok(result) => {
                self.notifier.notify(result.notice());
                self.result = Some(result);
                self.result.as_ref()
            }
            Err(e) => {
                self.notifier.notify(e.notice());
                None
            }
        }
    }

    /// Capture from `kind` and, if an image came back, identify it
    pub async fn capture_and_identify(
        &mut self,
        kind: SourceKind,
    ) -> Option<&IdentificationResult> {
        let image = self.capture(kind)?;
        self.identify(&image, None).await
    }

    /// Forget the current image and result
    pub fn clear(&mut self) {
        self.image = None;
        self.result = None;
    }

    pub fn health(&self) -> &HealthStatus {
        &self.health
    }

    pub fn image(&self) -> Option<&CapturedImage> {
        self.image.as_ref()
    }

    pub fn result(&self) -> Option<&IdentificationResult> {
        self.result.as_ref()
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::capture::CaptureSource;
    use crate::errors::{CaptureError, CaptureResult};
    use crate::notify::{Notice, Severity};

    #[derive(Default)]
    struct Recorder {
        notices: Vec<Notice>,
        shown: u32,
        hidden: u32,
    }

    impl Notifier for Recorder {
        fn notify(&mut self, notice: Notice) {
            self.notices.push(notice);
        }
        fn show_loading(&mut self, _message: &str) {
            self.shown += 1;
        }
        fn hide_loading(&mut self) {
            self.hidden += 1;
        }
    }

    struct Fixed(CaptureResult<CapturedImage>);

    impl CaptureSource for Fixed {
        fn kind(&self) -> SourceKind {
            SourceKind::File
        }
        fn is_available(&self) -> bool {
            true
        }
        fn capture(&mut self) -> CaptureResult<CapturedImage> {
            self.0.clone()
        }
    }

    fn session(file: CaptureResult<CapturedImage>) -> DiagnosisSession<Recorder> {
        let coordinator = CaptureCoordinator::new(
            Box::new(Fixed(Err(CaptureError::DeviceNotFound))),
            Box::new(Fixed(Err(CaptureError::DeviceBusy))),
            Box::new(Fixed(file)),
        );
        // Port 9 (discard) is never reached: these tests stop before any request
        let client = SubmissionClient::new("http://127.0.0.1:9").unwrap();
        DiagnosisSession::new(coordinator, client, Recorder::default())
    }

    fn leaf() -> CapturedImage {
        CapturedImage::new(vec![0xFF, 0xD8, 0xFF], "image/jpeg", Some("leaf.jpg".into()))
    }

    #[test]
    fn test_capture_clears_previous_result() {
        let mut session = session(Ok(leaf()));
        session.result = Some(IdentificationResult::Failure {
            message: "old".into(),
        });

        let image = session.capture(SourceKind::File).unwrap();
        assert_eq!(image.suggested_filename(), Some("leaf.jpg"));
        assert!(session.result().is_none());
        assert_eq!(session.image(), Some(&image));
        assert!(session.notifier().notices.is_empty());
    }

    #[test]
    fn test_capture_failure_raises_alert_and_keeps_state() {
        let mut session = session(Ok(leaf()));
        session.result = Some(IdentificationResult::Failure {
            message: "old".into(),
        });

        assert!(session.capture(SourceKind::Webcam).is_none());
        assert!(session.result().is_some());
        let notices = &session.notifier().notices;
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].header(), Some("Camera In Use"));
    }

    #[test]
    fn test_cancelled_picker_is_silent() {
        let mut session = session(Err(CaptureError::Cancelled));
        assert!(session.capture(SourceKind::File).is_none());
        assert!(session.notifier().notices.is_empty());
    }

    #[tokio::test]
    async fn test_identify_refused_when_unhealthy() {
        let mut session = session(Ok(leaf()));
        let image = leaf();

        assert!(session.identify(&image, None).await.is_none());
        let notifier = session.notifier();
        assert_eq!(notifier.shown, 0);
        assert_eq!(notifier.notices.len(), 1);
        assert_eq!(notifier.notices[0].severity(), Some(Severity::Danger));
        assert_eq!(session.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_identify_refused_without_bytes() {
        let mut session = session(Ok(leaf()));
        session.health.healthy = true;
        let empty = CapturedImage::new(Vec::new(), "image/jpeg", None);

        assert!(session.identify(&empty, None).await.is_none());
        assert_eq!(
            session.notifier().notices[0].message(),
            "No image data available"
        );
    }

    #[test]
    fn test_submission_guard_returns_to_idle() {
        let mut state = SubmissionState::Idle;
        let mut notifier = Recorder::default();
        {
            let _guard = SubmissionGuard::begin(&mut state, &mut notifier);
        }
        assert_eq!(state, SubmissionState::Idle);
        assert_eq!((notifier.shown, notifier.hidden), (1, 1));
    }

    #[test]
    fn test_clear() {
        let mut session = session(Ok(leaf()));
        session.capture(SourceKind::File);
        session.clear();
        assert!(session.image().is_none());
        assert!(session.result().is_none());
    }
}
