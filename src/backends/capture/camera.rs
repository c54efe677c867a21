// SPDX-License-Identifier: GPL-3.0-only

//! Platform camera capture through PipeWire
//!
//! Uses a short-lived GStreamer pipeline (`pipewiresrc → videoconvert →
//! appsink`) to take one RGB still. The pipeline is torn down as soon as the
//! first sample arrives or anything fails.

use super::types::{CapturedImage, FramePixelFormat, RawFrame, SourceKind};
use super::CaptureSource;
use crate::constants::pipeline as pipeline_consts;
use crate::errors::{CaptureError, CaptureResult};
use crate::pipelines::photo::PhotoPipeline;
use gstreamer as gst;
use gstreamer::prelude::*;
use gstreamer_app as gst_app;
use gstreamer_video::VideoInfo;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Camera exposed by the platform media stack
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCamera {
    pipeline: PhotoPipeline,
}

impl NativeCamera {
    pub fn new(pipeline: PhotoPipeline) -> Self {
        Self { pipeline }
    }

    /// Check that GStreamer and the PipeWire source element are present
    pub fn probe() -> CaptureResult<()> {
        gst::init().map_err(|e| CaptureError::Unavailable(format!("GStreamer init failed: {}", e)))?;

        if gst::ElementFactory::find(pipeline_consts::SOURCE_ELEMENT).is_none() {
            return Err(CaptureError::Unavailable(format!(
                "{} element not installed",
                pipeline_consts::SOURCE_ELEMENT
            )));
        }
        Ok(())
    }
}

impl CaptureSource for NativeCamera {
    fn kind(&self) -> SourceKind {
        SourceKind::Camera
    }

    fn is_available(&self) -> bool {
        Self::probe().is_ok()
    }

    fn capture(&mut self) -> CaptureResult<CapturedImage> {
        Self::probe()?;

        info!("Capturing still from platform camera");
        let session = CameraSession::start()?;
        let frame = session.first_frame()?;
        drop(session);

        let captured = self.pipeline.process(&frame)?;
        info!(
            width = frame.width,
            height = frame.height,
            size = captured.len(),
            "Platform camera image captured"
        );
        Ok(captured)
    }
}

/// Running capture pipeline; dropping it releases the camera
struct CameraSession {
    pipeline: gst::Pipeline,
    appsink: gst_app::AppSink,
}

impl CameraSession {
    fn start() -> CaptureResult<Self> {
        debug!(pipeline = pipeline_consts::CAMERA_PIPELINE, "Building camera pipeline");

        let pipeline = gst::parse::launch(pipeline_consts::CAMERA_PIPELINE)
            .map_err(|e| CaptureError::Unavailable(format!("Failed to create pipeline: {}", e)))?
            .downcast::<gst::Pipeline>()
            .map_err(|_| CaptureError::Device("Failed to downcast to Pipeline".into()))?;

        let appsink = pipeline
            .by_name("sink")
            .and_then(|e| e.dynamic_cast::<gst_app::AppSink>().ok())
            .ok_or_else(|| CaptureError::Device("Pipeline has no appsink".into()))?;

        // Wrap before starting so a failed start still reaches Null
        let session = Self { pipeline, appsink };

        if let Err(e) = session.pipeline.set_state(gst::State::Playing) {
            debug!(error = ?e, "Pipeline refused to start");
            return Err(session
                .pending_error()
                .unwrap_or_else(|| CaptureError::Device(format!("Failed to start pipeline: {}", e))));
        }
        Ok(session)
    }

    /// Wait for the first sample, bailing out on pipeline errors or EOS
    fn first_frame(&self) -> CaptureResult<RawFrame> {
        let deadline =
            Instant::now() + Duration::from_secs(pipeline_consts::FIRST_SAMPLE_TIMEOUT_SECS);

        while Instant::now() < deadline {
            if let Some(sample) = self
                .appsink
                .try_pull_sample(gst::ClockTime::from_mseconds(pipeline_consts::SAMPLE_POLL_MS))
            {
                return sample_to_frame(&sample);
            }

            if let Some(err) = self.pending_error() {
                return Err(err);
            }
            if self.appsink.is_eos() {
                warn!("Camera stream ended before producing a frame");
                return Err(CaptureError::NoFrame);
            }
        }

        warn!(
            timeout_secs = pipeline_consts::FIRST_SAMPLE_TIMEOUT_SECS,
            "Timed out waiting for the first camera frame"
        );
        Err(CaptureError::NoFrame)
    }

    /// Error posted on the bus, if any
    fn pending_error(&self) -> Option<CaptureError> {
        let bus = self.pipeline.bus()?;
        let msg = bus.pop_filtered(&[gst::MessageType::Error])?;
        match msg.view() {
            gst::MessageView::Error(err) => {
                error!(
                    error = %err.error(),
                    debug = ?err.debug(),
                    source = ?err.src().map(|s| s.name()),
                    "GStreamer error during capture"
                );
                Some(classify_error(&err.error()))
            }
            _ => None,
        }
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        if let Err(e) = self.pipeline.set_state(gst::State::Null) {
            debug!(error = ?e, "Failed to stop camera pipeline");
            return;
        }
        let (result, state, _) = self
            .pipeline
            .state(gst::ClockTime::from_seconds(pipeline_consts::STOP_TIMEOUT_SECS));
        debug!(ok = result.is_ok(), state = ?state, "Camera pipeline stopped");
    }
}

/// Map a GStreamer resource error onto the capture taxonomy
fn classify_error(err: &gst::glib::Error) -> CaptureError {
    if err.matches(gst::ResourceError::NotAuthorized) {
        CaptureError::PermissionDenied
    } else if err.matches(gst::ResourceError::NotFound) {
        CaptureError::DeviceNotFound
    } else if err.matches(gst::ResourceError::Busy) {
        CaptureError::DeviceBusy
    } else {
        CaptureError::Device(err.message().to_string())
    }
}

/// Copy a packed RGB sample out of GStreamer
fn sample_to_frame(sample: &gst::Sample) -> CaptureResult<RawFrame> {
    let caps = sample
        .caps()
        .ok_or_else(|| CaptureError::Encoding("Sample has no caps".into()))?;
    let info = VideoInfo::from_caps(caps)
        .map_err(|e| CaptureError::Encoding(format!("Unreadable caps: {}", e)))?;
    let buffer = sample
        .buffer()
        .ok_or_else(|| CaptureError::Encoding("Sample has no buffer".into()))?;
    let map = buffer
        .map_readable()
        .map_err(|_| CaptureError::Encoding("Failed to map buffer".into()))?;

    Ok(RawFrame {
        width: info.width(),
        height: info.height(),
        format: FramePixelFormat::Rgb24,
        stride: info.stride()[0] as u32,
        data: map.as_slice().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_errors_are_classified() {
        let cases = [
            (gst::ResourceError::NotAuthorized, CaptureError::PermissionDenied),
            (gst::ResourceError::NotFound, CaptureError::DeviceNotFound),
            (gst::ResourceError::Busy, CaptureError::DeviceBusy),
        ];
        for (code, expected) in cases {
            let err = gst::glib::Error::new(code, "boom");
            assert_eq!(classify_error(&err), expected);
        }

        let other = gst::glib::Error::new(gst::ResourceError::Failed, "stream lost");
        assert_eq!(
            classify_error(&other),
            CaptureError::Device("stream lost".into())
        );
    }

    #[test]
    fn test_kind_is_camera() {
        assert_eq!(NativeCamera::default().kind(), SourceKind::Camera);
    }
}
