//! Layered run configuration.
//!
//! Each layer is a [`ConfigOverrides`] with every field optional. Layers
//! are merged first-wins (command line, which already folds in the
//! environment, then the JSON file) and whatever is still unset falls
//! back to the built-in defaults.
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::classification::infrastructure::face_preprocessor::ChannelOrder;
use crate::detection::infrastructure::haar_cascade_detector::CascadeParams;
use crate::shared::constants::{
    DEFAULT_BACKEND_URL, DEFAULT_CAMERA_DEVICE, DEFAULT_CAMERA_FORMAT, DEFAULT_CASCADE_PATH,
    DEFAULT_MIN_FACE_SIZE, DEFAULT_MIN_NEIGHBORS, DEFAULT_MODEL_PATH, DEFAULT_SCALE_FACTOR,
};
use crate::video::domain::frame_source::CaptureSource;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("backend URL must be an http(s) URL, got '{0}'")]
    BackendUrl(String),
    #[error("scale factor must be greater than 1.0, got {0}")]
    ScaleFactor(f64),
    #[error("min neighbors must be zero or more, got {0}")]
    MinNeighbors(i32),
    #[error("min face size must be at least 1 pixel, got {0}")]
    MinFaceSize(i32),
    #[error("timeout must be a positive number of seconds, got {0}")]
    Timeout(f64),
}

/// One configuration layer. Field names double as the JSON file keys.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub model: Option<PathBuf>,
    pub model_url: Option<String>,
    pub backend_url: Option<String>,
    pub cascade: Option<PathBuf>,
    pub device: Option<String>,
    pub input_format: Option<String>,
    pub input: Option<PathBuf>,
    pub channel_order: Option<ChannelOrder>,
    pub scale_factor: Option<f64>,
    pub min_neighbors: Option<i32>,
    pub min_face_size: Option<i32>,
    pub timeout_secs: Option<f64>,
    pub preview: Option<bool>,
}

impl ConfigOverrides {
    /// Reads a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fills every field unset here from `fallback`.
    pub fn or(self, fallback: ConfigOverrides) -> ConfigOverrides {
        ConfigOverrides {
            model: self.model.or(fallback.model),
            model_url: self.model_url.or(fallback.model_url),
            backend_url: self.backend_url.or(fallback.backend_url),
            cascade: self.cascade.or(fallback.cascade),
            device: self.device.or(fallback.device),
            input_format: self.input_format.or(fallback.input_format),
            input: self.input.or(fallback.input),
            channel_order: self.channel_order.or(fallback.channel_order),
            scale_factor: self.scale_factor.or(fallback.scale_factor),
            min_neighbors: self.min_neighbors.or(fallback.min_neighbors),
            min_face_size: self.min_face_size.or(fallback.min_face_size),
            timeout_secs: self.timeout_secs.or(fallback.timeout_secs),
            preview: self.preview.or(fallback.preview),
        }
    }
}

/// Fully resolved, validated settings for one run.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub model_path: PathBuf,
    pub model_url: Option<String>,
    pub backend_url: String,
    pub cascade_path: PathBuf,
    pub device: String,
    pub input_format: String,
    pub input: Option<PathBuf>,
    pub channel_order: ChannelOrder,
    pub cascade: CascadeParams,
    pub timeout: Option<Duration>,
    pub preview: bool,
}

impl Settings {
    /// Applies defaults to `overrides` and validates the result.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Settings, ConfigError> {
        let backend_url = overrides
            .backend_url
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        validate_url(&backend_url)?;

        let cascade = CascadeParams {
            scale_factor: overrides.scale_factor.unwrap_or(DEFAULT_SCALE_FACTOR),
            min_neighbors: overrides.min_neighbors.unwrap_or(DEFAULT_MIN_NEIGHBORS),
            min_size: overrides.min_face_size.unwrap_or(DEFAULT_MIN_FACE_SIZE),
        };
        // NaN fails the comparison and is rejected too.
        if !(cascade.scale_factor > 1.0) {
            return Err(ConfigError::ScaleFactor(cascade.scale_factor));
        }
        if cascade.min_neighbors < 0 {
            return Err(ConfigError::MinNeighbors(cascade.min_neighbors));
        }
        if cascade.min_size < 1 {
            return Err(ConfigError::MinFaceSize(cascade.min_size));
        }

        let timeout = match overrides.timeout_secs {
            Some(secs) if secs.is_finite() && secs > 0.0 => Some(Duration::from_secs_f64(secs)),
            Some(secs) => return Err(ConfigError::Timeout(secs)),
            None => None,
        };

        Ok(Settings {
            model_path: overrides
                .model
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
            model_url: overrides.model_url.filter(|url| !url.is_empty()),
            backend_url,
            cascade_path: overrides
                .cascade
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CASCADE_PATH)),
            device: overrides
                .device
                .unwrap_or_else(|| DEFAULT_CAMERA_DEVICE.to_string()),
            input_format: overrides
                .input_format
                .unwrap_or_else(|| DEFAULT_CAMERA_FORMAT.to_string()),
            input: overrides.input,
            channel_order: overrides.channel_order.unwrap_or_default(),
            cascade,
            timeout,
            preview: overrides.preview.unwrap_or(false),
        })
    }

    /// A video file when one is configured, otherwise the camera.
    pub fn capture_source(&self) -> CaptureSource {
        match &self.input {
            Some(path) => CaptureSource::File(path.clone()),
            None => CaptureSource::Camera {
                device: self.device.clone(),
                format: self.input_format.clone(),
            },
        }
    }
}

fn validate_url(url: &str) -> Result<(), ConfigError> {
    match reqwest::Url::parse(url) {
        Ok(parsed)
            if matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some() =>
        {
            Ok(())
        }
        _ => Err(ConfigError::BackendUrl(url.to_string())),
    }
}
