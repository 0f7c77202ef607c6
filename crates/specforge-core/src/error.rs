//! Error handling for the Specforge build library.
//!
//! This module defines the main error type `Error` used throughout the
//! library, along with a convenient `Result` type alias. It uses `thiserror`
//! for easy error handling and implements conversions from common error types.

use thiserror::Error;

/// Result type for Specforge build operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Specforge build operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Typings generation error
    #[error("Generation error: {0}")]
    Generate(String),

    /// External generator tool error
    #[error("Tool error: {0}")]
    Tool(String),

    /// Filesystem watcher error
    #[error("Watcher error: {0}")]
    Watch(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new generation error
    pub fn generate<S: Into<String>>(msg: S) -> Self {
        Self::Generate(msg.into())
    }

    /// Create a new external tool error
    pub fn tool<S: Into<String>>(msg: S) -> Self {
        Self::Tool(msg.into())
    }
}

impl From<notify::Error> for Error {
    fn from(err: notify::Error) -> Self {
        Self::Watch(err.to_string())
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Config(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Config(s)
    }
}
