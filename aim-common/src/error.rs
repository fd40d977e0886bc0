use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AimError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("HTTP Request Error: {0}")]
    Http(#[from] Arc<reqwest::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Invalid version format: '{0}'")]
    InvalidVersionFormat(String),

    #[error("Can't get property '{property}' of the artifact '{artifact}'{}", version_suffix(.version))]
    PropertyValidation {
        artifact: String,
        version: Option<String>,
        property: String,
    },

    #[error("Repository unavailable at {url}: {reason}")]
    RepositoryUnavailable { url: String, reason: String },

    #[error("Access denied to the artifact '{artifact}' version '{version}': {reason}")]
    AccessDenied {
        artifact: String,
        version: String,
        reason: String,
    },

    #[error("Checksum mismatch for the artifact '{artifact}' version '{version}': expected {expected}, got {actual}")]
    IntegrityCheckFailed {
        artifact: String,
        version: String,
        expected: String,
        actual: String,
    },

    #[error("Not enough disk space. Required {required} bytes but available only {available} bytes")]
    InsufficientDiskSpace { required: u64, available: u64 },

    #[error("Can not install the artifact '{artifact}' version '{version}', because greater or equal version has already been installed.")]
    AlreadyInstalled { artifact: String, version: String },

    #[error("Binaries to install the artifact '{artifact}' version '{version}' not found")]
    BinaryNotFound { artifact: String, version: String },

    #[error("Invalid installation step {step} for the artifact '{artifact}': plan has {total} steps")]
    InvalidStep {
        artifact: String,
        step: u32,
        total: usize,
    },

    #[error("Invalid path '{}': {reason}", .path.display())]
    InvalidPath { path: PathBuf, reason: String },

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Failed to execute command: {0}")]
    CommandExec(String),

    #[error("Installation Error: {0}")]
    InstallError(String),

    #[error("Generic Error: {0}")]
    Generic(String),
}

fn version_suffix(version: &Option<String>) -> String {
    version
        .as_deref()
        .map(|v| format!(" version '{v}'"))
        .unwrap_or_default()
}

impl From<std::io::Error> for AimError {
    fn from(err: std::io::Error) -> Self {
        AimError::Io(Arc::new(err))
    }
}

impl From<reqwest::Error> for AimError {
    fn from(err: reqwest::Error) -> Self {
        AimError::Http(Arc::new(err))
    }
}

impl From<serde_json::Error> for AimError {
    fn from(err: serde_json::Error) -> Self {
        AimError::Json(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, AimError>;
