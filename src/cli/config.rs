//! TOML configuration file support.
//!
//! Settings that would otherwise be repeated on every invocation can live in
//! a config file:
//!
//! ```toml
//! # czimeta.toml
//! [planes]
//! timezone_hours = 9
//!
//! [annotations]
//! roi_key = "HardwareSetting|ParameterCollection|Frame"
//!
//! [reader]
//! group_files = false
//! ```
//!
//! Command-line flags take precedence over the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use czimeta::source::ReaderOptions;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "czimeta.toml";

/// Root configuration structure for czimeta.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Plane table settings.
    #[serde(default)]
    pub planes: PlanesConfig,

    /// Structured annotation settings.
    #[serde(default)]
    pub annotations: AnnotationsConfig,

    /// Options passed to the document source.
    #[serde(default)]
    pub reader: ReaderOptions,
}

/// Configuration for the planes command.
#[derive(Debug, Default, Deserialize)]
pub struct PlanesConfig {
    /// Acquisition timezone as whole hours east of UTC.
    pub timezone_hours: Option<i32>,
}

/// Configuration for the hardware command.
#[derive(Debug, Default, Deserialize)]
pub struct AnnotationsConfig {
    /// Annotation key holding the camera ROI.
    pub roi_key: Option<String>,
}

impl Config {
    /// Load from `path`, or from `czimeta.toml` in the working directory if
    /// it exists, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
