//! Error handling for WaveSense
//!
//! Parsing never fails (malformed dump content is normalized instead), so the
//! errors here cover the edges of the pipeline: reading documents, loading and
//! saving configuration, exporting WaveJSON, and loader thread communication.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for WaveSense operations
#[derive(Error, Debug)]
pub enum WaveError {
    /// A source document could not be retrieved
    #[error("Failed to load {path:?}: {message}")]
    Load { path: PathBuf, message: String },

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors while writing an export
    #[error("Export error: {0}")]
    Export(String),

    /// Errors related to channel communication with the loader
    #[error("Channel error: {0}")]
    Channel(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<WaveError>,
    },
}

impl WaveError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        WaveError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Build a load error for `path`
    pub fn load(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        WaveError::Load {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl From<serde_json::Error> for WaveError {
    fn from(err: serde_json::Error) -> Self {
        WaveError::Serialization(err.to_string())
    }
}

/// Result type alias for WaveSense operations
pub type Result<T> = std::result::Result<T, WaveError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
