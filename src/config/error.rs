use std::path::PathBuf;
use thiserror::Error;

/// Invalid `TASKSPLIT_*` settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Variable is set but does not parse as the expected type.
    #[error("{name}={value:?} is not valid: {reason}")]
    ParseError {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{name} out of range: {reason}")]
    OutOfRange { name: &'static str, reason: String },

    /// `TASKSPLIT_MODEL_DIR` points nowhere.
    #[error("model directory {path} does not exist")]
    PathNotFound { path: PathBuf },

    #[error("model directory {path} is a file")]
    NotADirectory { path: PathBuf },
}
