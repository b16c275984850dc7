use std::path::Path;

use thiserror::Error;

/// Failures of the local runtime: disk access and subscriber setup.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file {path}: {message}")]
    Session { path: String, message: String },
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

impl InfraError {
    pub fn session(path: &Path, message: impl Into<String>) -> Self {
        Self::Session {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}
