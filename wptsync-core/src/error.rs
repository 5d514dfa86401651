//! Error types for wptsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from loading, validating or saving a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file did not exist at the given path.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },

    /// Underlying I/O failure, annotated with the path it happened on.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parse error on load, with file path and line context from serde_json.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization error (save path).
    #[error("config serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A required field is empty.
    #[error("config: {field} must be provided")]
    MissingField { field: &'static str },

    /// `init` refuses to overwrite an existing config.
    #[error("config file {path} already exists")]
    AlreadyExists { path: PathBuf },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}
