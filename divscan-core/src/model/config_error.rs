use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration: {field} {reason}")]
    Invalid { field: String, reason: String },

    #[error("failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: std::io::Error },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn invalid<F, R>(field: F, reason: R) -> Self
    where
        F: Into<String>,
        R: Into<String>,
    {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
