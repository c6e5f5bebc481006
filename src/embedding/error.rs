use std::path::PathBuf;
use thiserror::Error;

/// Failures of the embedding capability.
///
/// The verifier treats every variant as an external-service failure: it is
/// propagated unchanged and never replaced by a fallback vector.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Model directory (or one of its files) is missing.
    #[error("model files missing: {path}")]
    ModelNotFound { path: PathBuf },

    /// Weights, config or tokenizer could not be read or parsed.
    #[error("could not load BERT model: {reason}")]
    ModelLoadFailed { reason: String },

    /// Embedder settings are inconsistent (zero dimension, zero sequence length).
    #[error("embedder misconfigured: {reason}")]
    InvalidConfig { reason: String },

    #[error("tokenizer rejected input: {reason}")]
    TokenizationFailed { reason: String },

    /// Forward pass or tensor conversion failed.
    #[error("encoder forward pass failed: {reason}")]
    InferenceFailed { reason: String },

    /// Provider returned a vector of the wrong shape or with non-finite values.
    #[error("malformed embedding: {reason}")]
    MalformedEmbedding { reason: String },

    /// Remote or shared provider could not serve the request.
    #[error("embedding provider unavailable: {reason}")]
    Unavailable { reason: String },
}

impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        Self::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for EmbeddingError {
    fn from(err: std::io::Error) -> Self {
        Self::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}
