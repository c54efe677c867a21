// SPDX-License-Identifier: GPL-3.0-only

//! File picker capture source
//!
//! The MIME type is derived from the file name and checked before the file is
//! opened, so a non-image selection never touches the disk.

use super::types::{CapturedImage, SourceKind};
use super::CaptureSource;
use crate::constants::file_formats;
use crate::errors::{CaptureError, CaptureResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A file chosen by the user, not yet read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    pub path: PathBuf,
    pub mime_type: String,
}

impl FileSelection {
    pub fn new(path: impl Into<PathBuf>, mime_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Build a selection, guessing the MIME type from the extension
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mime_type = guess_mime_type(&path);
        Self { path, mime_type }
    }

    /// Final path component, used as the upload filename
    pub fn file_name(&self) -> Option<String> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

fn guess_mime_type(path: &Path) -> String {
    if let Ok(format) = image::ImageFormat::from_path(path) {
        return format.to_mime_type().to_string();
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "txt" | "log" | "md" => "text/plain",
        "pdf" => "application/pdf",
        "json" => "application/json",
        _ => file_formats::UNKNOWN_MIME_TYPE,
    }
    .to_string()
}

/// Asks the user for a file
pub trait FilePicker {
    /// `None` when the user dismissed the picker
    fn pick(&mut self) -> Option<FileSelection>;
}

/// Native file dialog filtered to image types
#[derive(Debug, Default, Clone, Copy)]
pub struct DialogPicker;

impl FilePicker for DialogPicker {
    fn pick(&mut self) -> Option<FileSelection> {
        rfd::FileDialog::new()
            .set_title("Select a photo")
            .add_filter("Images", file_formats::IMAGE_EXTENSIONS)
            .pick_file()
            .map(FileSelection::from_path)
    }
}

/// Picker with a predetermined answer, used for paths given on the command line
#[derive(Debug, Default, Clone)]
pub struct PathPicker(pub Option<PathBuf>);

impl FilePicker for PathPicker {
    fn pick(&mut self) -> Option<FileSelection> {
        self.0.take().map(FileSelection::from_path)
    }
}

/// Image files chosen through a picker
pub struct FileSource<P: FilePicker = DialogPicker> {
    picker: P,
}

impl<P: FilePicker> FileSource<P> {
    pub fn new(picker: P) -> Self {
        Self { picker }
    }

    /// Validate and read a selection
    pub fn load(selection: &FileSelection) -> CaptureResult<CapturedImage> {
        if !selection.is_image() {
            warn!(
                path = %selection.path.display(),
                mime = %selection.mime_type,
                "Rejected non-image selection"
            );
            return Err(CaptureError::InvalidFileType(selection.mime_type.clone()));
        }

        let bytes = std::fs::read(&selection.path).map_err(|e| {
            warn!(path = %selection.path.display(), error = %e, "Failed to read selection");
            CaptureError::FileRead(e.to_string())
        })?;

        info!(
            path = %selection.path.display(),
            mime = %selection.mime_type,
            size = bytes.len(),
            "Image file loaded"
        );
        Ok(CapturedImage::new(
            bytes,
            selection.mime_type.clone(),
            selection.file_name(),
        ))
    }
}

impl<P: FilePicker> CaptureSource for FileSource<P> {
    fn kind(&self) -> SourceKind {
        SourceKind::File
    }

    fn is_available(&self) -> bool {
        true
    }

    fn capture(&mut self) -> CaptureResult<CapturedImage> {
        let Some(selection) = self.picker.pick() else {
            debug!("File picker dismissed");
            return Err(CaptureError::Cancelled);
        };
        Self::load(&selection)
    }
}
