use std::sync::Arc;

use super::error::EmbeddingError;

/// Dense vector produced for one text. Call-scoped; never cached across calls.
pub type Embedding = Vec<f32>;

/// Text-embedding capability consumed by the threshold policy and the verifier.
///
/// Implementations must be deterministic: the same text always maps to the same
/// vector and the same token count.
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds a single text.
    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;

    /// Embeds several texts; the output is index-aligned with `texts`.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    /// Number of tokens the encoder sees for `text`, after truncation to
    /// [`max_seq_len`](EmbeddingProvider::max_seq_len).
    fn token_count(&self, text: &str) -> Result<usize, EmbeddingError>;

    /// Dimension of every vector returned by [`embed`](EmbeddingProvider::embed).
    fn embedding_dim(&self) -> usize;

    /// Max tokens considered per text.
    fn max_seq_len(&self) -> usize;
}

impl<T: EmbeddingProvider + ?Sized> EmbeddingProvider for Arc<T> {
    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        (**self).embed(text)
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        (**self).embed_batch(texts)
    }

    fn token_count(&self, text: &str) -> Result<usize, EmbeddingError> {
        (**self).token_count(text)
    }

    fn embedding_dim(&self) -> usize {
        (**self).embedding_dim()
    }

    fn max_seq_len(&self) -> usize {
        (**self).max_seq_len()
    }
}

impl<T: EmbeddingProvider + ?Sized> EmbeddingProvider for &T {
    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        (**self).embed(text)
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        (**self).embed_batch(texts)
    }

    fn token_count(&self, text: &str) -> Result<usize, EmbeddingError> {
        (**self).token_count(text)
    }

    fn embedding_dim(&self) -> usize {
        (**self).embedding_dim()
    }

    fn max_seq_len(&self) -> usize {
        (**self).max_seq_len()
    }
}

/// Rejects vectors of the wrong dimension or with non-finite components.
pub fn validate_embedding(embedding: &[f32], expected_dim: usize) -> Result<(), EmbeddingError> {
    if embedding.len() != expected_dim {
        return Err(EmbeddingError::MalformedEmbedding {
            reason: format!(
                "dimension mismatch: expected {}, got {}",
                expected_dim,
                embedding.len()
            ),
        });
    }

    if let Some(idx) = embedding.iter().position(|v| !v.is_finite()) {
        return Err(EmbeddingError::MalformedEmbedding {
            reason: format!("non-finite value at index {}", idx),
        });
    }

    Ok(())
}
