// SPDX-License-Identifier: GPL-3.0-only

//! Picks a capture source and applies the camera → webcam fallback

use super::camera::NativeCamera;
use super::file::{DialogPicker, FileSource, PathPicker};
use super::types::{CapturedImage, SourceKind};
use super::webcam::Webcam;
use super::CaptureSource;
use crate::config::Config;
use crate::errors::{CaptureError, CaptureResult};
use crate::pipelines::photo::PhotoPipeline;
use std::path::PathBuf;
use tracing::{info, warn};

/// Owns one source of each kind
pub struct CaptureCoordinator {
    camera: Box<dyn CaptureSource>,
    webcam: Box<dyn CaptureSource>,
    file: Box<dyn CaptureSource>,
}

impl CaptureCoordinator {
    pub fn new(
        camera: Box<dyn CaptureSource>,
        webcam: Box<dyn CaptureSource>,
        file: Box<dyn CaptureSource>,
    ) -> Self {
        Self {
            camera,
            webcam,
            file,
        }
    }

    /// Real hardware sources configured from user settings
    ///
    /// With `file_path` set the file source reads that path instead of
    /// opening a dialog.
    pub fn from_config(config: &Config, file_path: Option<PathBuf>) -> Self {
        let camera = Box::new(NativeCamera::new(PhotoPipeline::new(config.jpeg_quality)));
        let webcam = Box::new(Webcam::from_config(config));
        let file: Box<dyn CaptureSource> = match file_path {
            Some(path) => Box::new(FileSource::new(PathPicker(Some(path)))),
            None => Box::new(FileSource::new(DialogPicker)),
        };
        Self::new(camera, webcam, file)
    }

    /// Acquire an image from the requested kind of source
    pub fn capture(&mut self, kind: SourceKind) -> CaptureResult<CapturedImage> {
        match kind {
            SourceKind::Camera => self.capture_via_camera(),
            SourceKind::Webcam => self.capture_via_webcam(),
            SourceKind::File => self.select_from_file(),
        }
    }

    /// Platform camera, falling back to the webcam when it is not supported
    pub fn capture_via_camera(&mut self) -> CaptureResult<CapturedImage> {
        if !self.camera.is_available() {
            info!("Platform camera not supported, using webcam");
            return self.capture_via_webcam();
        }

        match self.camera.capture() {
            Err(CaptureError::Unavailable(reason)) => {
                warn!(%reason, "Platform camera unavailable, using webcam");
                self.capture_via_webcam()
            }
            other => other,
        }
    }

    pub fn capture_via_webcam(&mut self) -> CaptureResult<CapturedImage> {
        if !self.webcam.is_available() {
            warn!("Webcam capture not supported on this platform");
            return Err(CaptureError::Unavailable(
                "webcam capture not supported".into(),
            ));
        }
        self.webcam.capture()
    }

    pub fn select_from_file(&mut self) -> CaptureResult<CapturedImage> {
        self.file.capture()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Source that returns a fixed result and counts calls
    struct Scripted {
        kind: SourceKind,
        available: bool,
        result: CaptureResult<CapturedImage>,
        calls: Rc<Cell<u32>>,
    }

    impl Scripted {
        fn boxed(
            kind: SourceKind,
            available: bool,
            result: CaptureResult<CapturedImage>,
        ) -> (Box<dyn CaptureSource>, Rc<Cell<u32>>) {
            let calls = Rc::new(Cell::new(0));
            let source = Self {
                kind,
                available,
                result,
                calls: calls.clone(),
            };
            (Box::new(source), calls)
        }
    }

    impl CaptureSource for Scripted {
        fn kind(&self) -> SourceKind {
            self.kind
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn capture(&mut self) -> CaptureResult<CapturedImage> {
            self.calls.set(self.calls.get() + 1);
            self.result.clone()
        }
    }

    fn jpeg(tag: &str) -> CapturedImage {
        CapturedImage::new(tag.as_bytes().to_vec(), "image/jpeg", None)
    }

    #[test]
    fn test_camera_used_when_available() {
        let (camera, camera_calls) = Scripted::boxed(SourceKind::Camera, true, Ok(jpeg("cam")));
        let (webcam, webcam_calls) = Scripted::boxed(SourceKind::Webcam, true, Ok(jpeg("web")));
        let (file, _) = Scripted::boxed(SourceKind::File, true, Err(CaptureError::Cancelled));
        let mut coordinator = CaptureCoordinator::new(camera, webcam, file);

        let image = coordinator.capture(SourceKind::Camera).unwrap();
        assert_eq!(image.bytes(), b"cam");
        assert_eq!(camera_calls.get(), 1);
        assert_eq!(webcam_calls.get(), 0);
    }

    #[test]
    fn test_unsupported_camera_falls_back_to_webcam() {
        let (camera, camera_calls) = Scripted::boxed(SourceKind::Camera, false, Ok(jpeg("cam")));
        let (webcam, _) = Scripted::boxed(SourceKind::Webcam, true, Ok(jpeg("web")));
        let (file, _) = Scripted::boxed(SourceKind::File, true, Err(CaptureError::Cancelled));
        let mut coordinator = CaptureCoordinator::new(camera, webcam, file);

        let image = coordinator.capture(SourceKind::Camera).unwrap();
        assert_eq!(image.bytes(), b"web");
        assert_eq!(camera_calls.get(), 0);
    }

    #[test]
    fn test_unavailable_error_falls_back_to_webcam() {
        let (camera, _) = Scripted::boxed(
            SourceKind::Camera,
            true,
            Err(CaptureError::Unavailable("no pipewiresrc".into())),
        );
        let (webcam, webcam_calls) = Scripted::boxed(SourceKind::Webcam, true, Ok(jpeg("web")));
        let (file, _) = Scripted::boxed(SourceKind::File, true, Err(CaptureError::Cancelled));
        let mut coordinator = CaptureCoordinator::new(camera, webcam, file);

        assert_eq!(coordinator.capture_via_camera().unwrap().bytes(), b"web");
        assert_eq!(webcam_calls.get(), 1);
    }

    #[test]
    fn test_other_camera_errors_do_not_fall_back() {
        let (camera, _) = Scripted::boxed(
            SourceKind::Camera,
            true,
            Err(CaptureError::PermissionDenied),
        );
        let (webcam, webcam_calls) = Scripted::boxed(SourceKind::Webcam, true, Ok(jpeg("web")));
        let (file, _) = Scripted::boxed(SourceKind::File, true, Err(CaptureError::Cancelled));
        let mut coordinator = CaptureCoordinator::new(camera, webcam, file);

        assert_eq!(
            coordinator.capture_via_camera().unwrap_err(),
            CaptureError::PermissionDenied
        );
        assert_eq!(webcam_calls.get(), 0);
    }

    #[test]
    fn test_unsupported_webcam_is_reported() {
        let (camera, _) = Scripted::boxed(SourceKind::Camera, false, Ok(jpeg("cam")));
        let (webcam, webcam_calls) = Scripted::boxed(SourceKind::Webcam, false, Ok(jpeg("web")));
        let (file, _) = Scripted::boxed(SourceKind::File, true, Err(CaptureError::Cancelled));
        let mut coordinator = CaptureCoordinator::new(camera, webcam, file);

        let err = coordinator.capture(SourceKind::Camera).unwrap_err();
        assert!(matches!(err, CaptureError::Unavailable(_)));
        assert_eq!(err.notice().unwrap().header(), Some("Webcam Not Supported"));
        assert_eq!(webcam_calls.get(), 0);
    }

    #[test]
    fn test_file_kind_uses_file_source() {
        let (camera, _) = Scripted::boxed(SourceKind::Camera, true, Ok(jpeg("cam")));
        let (webcam, _) = Scripted::boxed(SourceKind::Webcam, true, Ok(jpeg("web")));
        let (file, file_calls) = Scripted::boxed(
            SourceKind::File,
            true,
            Err(CaptureError::InvalidFileType("text/plain".into())),
        );
        let mut coordinator = CaptureCoordinator::new(camera, webcam, file);

        assert_eq!(
            coordinator.capture(SourceKind::File).unwrap_err(),
            CaptureError::InvalidFileType("text/plain".into())
        );
        assert_eq!(file_calls.get(), 1);
    }
}
