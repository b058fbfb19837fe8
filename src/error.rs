// file: src/error.rs
// version: 1.0.0
// guid: 25a219fb-39b6-4f5d-8efb-75f77ed6946c

//! Error types for the template importer

use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, ImportError>;

/// Error types for template import runs
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Missing dependencies: {0}")]
    DependencyError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("Command `{command}` failed (exit code {exit_code:?}): {stderr}")]
    ProcessError {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl ImportError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a new storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageError(msg.into())
    }

    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::NetworkError(msg.into())
    }

    /// Create a new image error
    pub fn image(msg: impl Into<String>) -> Self {
        Self::ImageError(msg.into())
    }

    /// Process exit code for an error that ends the run
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DependencyError(_) => 2,
            _ => 1,
        }
    }

    /// Whether the error aborts the whole run rather than a single template
    pub fn is_fatal_for_run(&self) -> bool {
        matches!(
            self,
            Self::DependencyError(_) | Self::ConfigError(_) | Self::StorageError(_)
        )
    }
}
