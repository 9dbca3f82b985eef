//! Configuration module for WaveSense
//!
//! Application configuration is a single TOML file in the platform data
//! directory under `dev.wavesense`:
//!
//! - **Linux**: `~/.local/share/dev.wavesense/config.toml`
//! - **macOS**: `~/Library/Application Support/dev.wavesense/config.toml`
//! - **Windows**: `%APPDATA%\dev.wavesense\config.toml`
//!
//! Every field has a default, so partial files are accepted.
//!
//! # Example
//!
//! ```toml
//! [render]
//! sample_cap = 200
//! surface_width = 1200.0
//!
//! [export]
//! hscale = 2
//! skin = "narrow"
//! title = "Waveform"
//!
//! [[classifier.rules]]
//! pattern = "data"
//! match = "prefix"
//! kind = "bus"
//! ```

use crate::classify::{ClassifierRule, SignalClassifier};
use crate::error::{Result, WaveError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.wavesense";

/// Configuration filename
pub const CONFIG_FILE: &str = "config.toml";

/// Log directory name inside the data directory
pub const LOG_DIR: &str = "logs";

/// Default number of leading samples shown at zoom level 1
pub const DEFAULT_SAMPLE_CAP: usize = 200;

/// Default surface width in pixels
pub const DEFAULT_SURFACE_WIDTH: f32 = 1200.0;

/// Narrowest surface the renderer accepts
pub const MIN_SURFACE_WIDTH: f32 = 200.0;

/// Default WaveJSON horizontal scale
pub const DEFAULT_HSCALE: u32 = 2;

/// Default WaveJSON skin
pub const DEFAULT_SKIN: &str = "narrow";

/// Default WaveJSON title
pub const DEFAULT_TITLE: &str = "Waveform";

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir()
        .ok_or_else(|| WaveError::Config("Could not determine app data directory".to_string()))?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            WaveError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(CONFIG_FILE))
}

/// Get the directory for rolling log files
pub fn log_dir() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(LOG_DIR))
}

// ==================== Sections ====================

/// The two numeric inputs read at render time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Visible sample cap at zoom level 1
    pub sample_cap: usize,
    /// Surface width in pixels
    pub surface_width: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_cap: DEFAULT_SAMPLE_CAP,
            surface_width: DEFAULT_SURFACE_WIDTH,
        }
    }
}

impl RenderConfig {
    /// Copy with the width raised to [`MIN_SURFACE_WIDTH`] and the cap to at least 1
    pub fn sanitized(&self) -> Self {
        Self {
            sample_cap: self.sample_cap.max(1),
            surface_width: if self.surface_width.is_finite() {
                self.surface_width.max(MIN_SURFACE_WIDTH)
            } else {
                DEFAULT_SURFACE_WIDTH
            },
        }
    }
}

/// WaveJSON export options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub hscale: u32,
    pub skin: String,
    pub title: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            hscale: DEFAULT_HSCALE,
            skin: DEFAULT_SKIN.to_string(),
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// Signal classification overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Ordered rules; empty means the built-in naming conventions
    pub rules: Vec<ClassifierRule>,
}

impl ClassifierConfig {
    /// Build the classifier these settings describe
    pub fn classifier(&self) -> SignalClassifier {
        SignalClassifier::from_rules_or_default(&self.rules)
    }
}

// ==================== App Config ====================

/// Persistent application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Version for future migration support
    pub version: u32,
    pub render: RenderConfig,
    pub export: ExportConfig,
    pub classifier: ClassifierConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            render: RenderConfig::default(),
            export: ExportConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location
    ///
    /// A missing file is not an error and yields defaults.
    pub fn load() -> Result<Self> {
        let path = config_path()
            .ok_or_else(|| WaveError::Config("Could not determine config path".to_string()))?;

        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            WaveError::Config(format!("Failed to read config {:?}: {}", path, e))
        })?;

        toml::from_str(&content)
            .map_err(|e| WaveError::Config(format!("Failed to parse config {:?}: {}", path, e)))
    }

    /// Load configuration, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(dir.join(CONFIG_FILE))
    }

    /// Save configuration to an explicit file
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| WaveError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| WaveError::Config(format!("Failed to write config {:?}: {}", path, e)))?;

        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }
}
