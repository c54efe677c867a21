// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::{app_info, api, encoding, webcam};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// User configuration
///
/// Read from `<config dir>/snapdiag/config.json`. Every field is optional in
/// the file; missing ones take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the classification service (no trailing slash)
    pub api_base_url: String,
    /// V4L2 node used by the webcam source
    pub webcam_device: String,
    /// Requested webcam width
    pub webcam_width: u32,
    /// Requested webcam height
    pub webcam_height: u32,
    /// JPEG quality for camera and webcam captures (1-100)
    pub jpeg_quality: u8,
    /// Frames the webcam may discard before it must deliver a decodable one
    pub max_warmup_frames: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: api::DEFAULT_BASE_URL.to_string(),
            webcam_device: webcam::DEFAULT_DEVICE.to_string(),
            webcam_width: webcam::DEFAULT_WIDTH,
            webcam_height: webcam::DEFAULT_HEIGHT,
            jpeg_quality: encoding::JPEG_QUALITY,
            max_warmup_frames: webcam::MAX_WARMUP_FRAMES,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| {
            dir.join(app_info::CONFIG_DIR_NAME)
                .join(app_info::CONFIG_FILE_NAME)
        })
    }

    /// Load the config from `path`, or from the default location
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => {
                    debug!("No config directory on this system, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_json(&text)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;

        info!(path = %path.display(), api = %config.api_base_url, "Loaded config");
        Ok(config)
    }

    /// Parse and normalize a JSON config document
    pub fn from_json(text: &str) -> Result<Self, String> {
        let config: Config = serde_json::from_str(text).map_err(|e| e.to_string())?;
        config.normalized()
    }

    /// Replace the service base URL (command-line override)
    pub fn with_api_base_url(mut self, url: &str) -> Result<Self, String> {
        self.api_base_url = url.to_string();
        self.normalized()
    }

    fn normalized(mut self) -> Result<Self, String> {
        let trimmed = self.api_base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(format!(
                "api_base_url must start with http:// or https:// (got {:?})",
                self.api_base_url
            ));
        }
        self.api_base_url = trimmed.to_string();

        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(format!(
                "jpeg_quality must be between 1 and 100 (got {})",
                self.jpeg_quality
            ));
        }
        if self.max_warmup_frames == 0 {
            return Err("max_warmup_frames must be at least 1".to_string());
        }

        Ok(self)
    }
}
