// SPDX-License-Identifier: GPL-3.0-only

//! Direct webcam capture over V4L2
//!
//! The device is opened exclusively for a single capture. Readiness is
//! detected by pulling frames until one decodes, instead of sleeping for a
//! fixed warm-up period. The stream is wrapped in a [`StreamGuard`] the
//! moment it exists, so every exit path stops it and closes the device.

use super::types::{CapturedImage, FramePixelFormat, RawFrame, SourceKind, StreamConstraints};
use super::CaptureSource;
use crate::config::Config;
use crate::constants::webcam as webcam_consts;
use crate::errors::{CaptureError, CaptureResult};
use crate::pipelines::photo::PhotoPipeline;
use image::RgbImage;
use std::io;
use tracing::{debug, info, warn};
use v4l::buffer::Type;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;

/// Something that can hand out an exclusive video stream
pub trait VideoInput {
    /// Whether this kind of input exists on the platform
    fn is_supported(&self) -> bool;

    /// Acquire the device and start streaming
    fn open(&mut self, constraints: &StreamConstraints) -> CaptureResult<Box<dyn VideoStream>>;
}

/// A running video stream holding the device
pub trait VideoStream {
    /// Block until the next frame arrives
    fn next_frame(&mut self) -> CaptureResult<RawFrame>;

    /// Stop streaming; must be safe to call more than once
    fn stop(&mut self);
}

/// Stops the wrapped stream when dropped
pub struct StreamGuard {
    stream: Box<dyn VideoStream>,
}

impl StreamGuard {
    pub fn new(stream: Box<dyn VideoStream>) -> Self {
        Self { stream }
    }

    pub fn next_frame(&mut self) -> CaptureResult<RawFrame> {
        self.stream.next_frame()
    }

    /// Stop the stream and release the device now
    pub fn release(self) {
        // Drop does the work
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        debug!("Releasing video stream");
        self.stream.stop();
    }
}

/// Webcam capture source
pub struct Webcam<I: VideoInput = V4l2Input> {
    input: I,
    constraints: StreamConstraints,
    max_warmup_frames: u32,
    pipeline: PhotoPipeline,
}

impl Webcam<V4l2Input> {
    /// V4L2 webcam configured from user settings
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            V4l2Input::new(&config.webcam_device),
            StreamConstraints {
                width: config.webcam_width,
                height: config.webcam_height,
            },
            config.max_warmup_frames,
            PhotoPipeline::new(config.jpeg_quality),
        )
    }
}

impl<I: VideoInput> Webcam<I> {
    pub fn new(
        input: I,
        constraints: StreamConstraints,
        max_warmup_frames: u32,
        pipeline: PhotoPipeline,
    ) -> Self {
        Self {
            input,
            constraints,
            max_warmup_frames: max_warmup_frames.max(1),
            pipeline,
        }
    }

    /// Pull frames until one decodes
    ///
    /// Device errors end the wait immediately; undecodable frames are skipped
    /// up to the warm-up budget.
    fn wait_for_first_frame(&self, stream: &mut StreamGuard) -> CaptureResult<RgbImage> {
        for attempt in 1..=self.max_warmup_frames {
            let frame = stream.next_frame()?;
            match self.pipeline.render(&frame) {
                Ok(image) => {
                    debug!(attempt, "First decodable frame received");
                    return Ok(image);
                }
                Err(e) => {
                    debug!(attempt, error = %e, "Skipping frame that did not decode");
                }
            }
        }

        warn!(
            frames = self.max_warmup_frames,
            "Webcam produced no decodable frame"
        );
        Err(CaptureError::NoFrame)
    }
}

impl<I: VideoInput> CaptureSource for Webcam<I> {
    fn kind(&self) -> SourceKind {
        SourceKind::Webcam
    }

    fn is_available(&self) -> bool {
        self.input.is_supported()
    }

    fn capture(&mut self) -> CaptureResult<CapturedImage> {
        info!(constraints = %self.constraints, "Requesting webcam access");

        let mut stream = StreamGuard::new(self.input.open(&self.constraints)?);
        let image = self.wait_for_first_frame(&mut stream)?;
        stream.release();

        let captured = self.pipeline.finish(&image)?;
        info!(
            width = image.width(),
            height = image.height(),
            size = captured.len(),
            "Webcam image captured"
        );
        Ok(captured)
    }
}

/// V4L2 device input
#[derive(Debug, Clone)]
pub struct V4l2Input {
    device_path: String,
}

impl V4l2Input {
    pub fn new(device_path: &str) -> Self {
        Self {
            device_path: device_path.to_string(),
        }
    }

    pub fn device_path(&self) -> &str {
        &self.device_path
    }
}

impl Default for V4l2Input {
    fn default() -> Self {
        Self::new(webcam_consts::DEFAULT_DEVICE)
    }
}

impl VideoInput for V4l2Input {
    fn is_supported(&self) -> bool {
        cfg!(target_os = "linux")
    }

    fn open(&mut self, constraints: &StreamConstraints) -> CaptureResult<Box<dyn VideoStream>> {
        info!(device = %self.device_path, "Opening V4L2 device");

        let dev = Device::with_path(&self.device_path).map_err(map_io_error)?;

        let caps = dev.query_caps().map_err(map_io_error)?;
        if !caps
            .capabilities
            .contains(v4l::capability::Flags::VIDEO_CAPTURE)
        {
            warn!(device = %self.device_path, card = %caps.card, "Not a video capture device");
            return Err(CaptureError::DeviceNotFound);
        }

        // Ask for MJPEG at the target size; the driver picks the closest match
        let mut format = dev.format().map_err(map_io_error)?;
        format.width = constraints.width;
        format.height = constraints.height;
        format.fourcc = v4l::FourCC::new(b"MJPG");
        let format = dev.set_format(&format).map_err(map_io_error)?;

        let pixel_format = FramePixelFormat::from_fourcc(&format.fourcc.repr).ok_or_else(|| {
            CaptureError::Device(format!("unsupported pixel format {:?}", format.fourcc))
        })?;

        info!(
            card = %caps.card,
            width = format.width,
            height = format.height,
            fourcc = ?format.fourcc,
            "V4L2 format negotiated"
        );

        let stream =
            MmapStream::with_buffers(&dev, Type::VideoCapture, webcam_consts::BUFFER_COUNT)
                .map_err(map_io_error)?;

        Ok(Box::new(V4l2Stream {
            stream,
            _device: dev,
            width: format.width,
            height: format.height,
            stride: format.stride,
            format: pixel_format,
            stopped: false,
        }))
    }
}

/// Running V4L2 mmap stream
struct V4l2Stream {
    stream: MmapStream<'static>,
    // Dropped after the stream; closing it releases the device
    _device: Device,
    width: u32,
    height: u32,
    stride: u32,
    format: FramePixelFormat,
    stopped: bool,
}

impl VideoStream for V4l2Stream {
    fn next_frame(&mut self) -> CaptureResult<RawFrame> {
        let (buf, meta) = CaptureStream::next(&mut self.stream).map_err(map_io_error)?;

        let used = match meta.bytesused as usize {
            0 => buf.len(),
            n => n.min(buf.len()),
        };

        Ok(RawFrame {
            width: self.width,
            height: self.height,
            format: self.format,
            stride: self.stride,
            data: buf[..used].to_vec(),
        })
    }

    fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        if let Err(e) = v4l::io::traits::Stream::stop(&mut self.stream) {
            debug!(error = %e, "VIDIOC_STREAMOFF failed");
        }
        info!("V4L2 stream stopped");
    }
}

/// Map an OS error from the device into the capture taxonomy
pub fn map_io_error(err: io::Error) -> CaptureError {
    if err.raw_os_error() == Some(libc::EBUSY) {
        return CaptureError::DeviceBusy;
    }
    match err.kind() {
        io::ErrorKind::NotFound => CaptureError::DeviceNotFound,
        io::ErrorKind::PermissionDenied => CaptureError::PermissionDenied,
        _ if err.raw_os_error() == Some(libc::ENODEV) => CaptureError::DeviceNotFound,
        _ => CaptureError::Device(err.to_string()),
    }
}
