use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::threshold::ThresholdError;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("threshold computation failed: {0}")]
    Threshold(#[from] ThresholdError),
}

impl VerifyError {
    /// Returns `true` if the failure came from the embedding capability.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            VerifyError::Embedding(_) | VerifyError::Threshold(ThresholdError::Embedding(_))
        )
    }
}
