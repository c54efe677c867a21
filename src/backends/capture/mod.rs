// SPDX-License-Identifier: GPL-3.0-only

//! Capture source abstraction
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │   DiagnosisSession  │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ CaptureCoordinator  │  ← camera → webcam fallback
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ CaptureSource trait │  ← common interface, runtime capability check
//! └──────────┬──────────┘
//!            │
//!     ┌──────┼────────┐
//!     ▼      ▼        ▼
//! ┌──────┐┌──────┐┌──────┐
//! │Native││Webcam││ File │
//! │camera││(V4L2)││picker│
//! └──────┘└──────┘└──────┘
//! ```

pub mod camera;
pub mod coordinator;
pub mod file;
pub mod types;
pub mod webcam;

pub use camera::NativeCamera;
pub use coordinator::CaptureCoordinator;
pub use file::{DialogPicker, FilePicker, FileSelection, FileSource, PathPicker};
pub use types::*;
pub use webcam::{StreamGuard, V4l2Input, VideoInput, VideoStream, Webcam};

use crate::errors::CaptureResult;

/// A place images can be acquired from
///
/// Implementations own whatever hardware they touch only for the duration of
/// [`CaptureSource::capture`]; nothing stays open between calls.
pub trait CaptureSource {
    /// Which of the three sources this is
    fn kind(&self) -> SourceKind;

    /// Whether the platform supports this source at all
    ///
    /// This is a capability check, not a readiness check: a webcam that is
    /// merely unplugged is still "available" and fails in `capture` with
    /// `DeviceNotFound`.
    fn is_available(&self) -> bool;

    /// Acquire one image
    fn capture(&mut self) -> CaptureResult<CapturedImage>;
}
