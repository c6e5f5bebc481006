use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum ThresholdError {
    #[error("unknown task type '{value}': expected 'union' or 'intersection'")]
    UnknownTaskType { value: String },

    #[error("invalid threshold policy: {reason}")]
    InvalidPolicy { reason: String },

    #[error("token counting failed: {0}")]
    Embedding(#[from] EmbeddingError),
}
