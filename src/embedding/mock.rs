use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::EmbeddingError;
use super::provider::{Embedding, EmbeddingProvider};

/// Table-driven embedding provider for tests.
///
/// Texts must be registered with [`with_embedding`](Self::with_embedding); unknown
/// texts fail with [`EmbeddingError::InferenceFailed`]. Token counts are whitespace
/// words plus two special tokens unless overridden.
#[derive(Debug, Default)]
pub struct MockEmbeddingProvider {
    embeddings: HashMap<String, Embedding>,
    token_counts: HashMap<String, usize>,
    embedding_dim: usize,
    max_seq_len: usize,
    failure: Option<String>,
    embed_calls: AtomicUsize,
}

impl MockEmbeddingProvider {
    pub fn new(embedding_dim: usize) -> Self {
        Self {
            embedding_dim,
            max_seq_len: crate::constants::DEFAULT_MAX_SEQ_LEN,
            ..Default::default()
        }
    }

    /// Provider whose every call fails with [`EmbeddingError::Unavailable`].
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::new(crate::constants::DEFAULT_EMBEDDING_DIM)
        }
    }

    pub fn with_embedding(mut self, text: impl Into<String>, embedding: Embedding) -> Self {
        self.embeddings.insert(text.into(), embedding);
        self
    }

    pub fn with_token_count(mut self, text: impl Into<String>, count: usize) -> Self {
        self.token_counts.insert(text.into(), count);
        self
    }

    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = max_seq_len;
        self
    }

    /// Number of texts embedded so far (batch calls count each text).
    pub fn embed_calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), EmbeddingError> {
        match &self.failure {
            Some(reason) => Err(EmbeddingError::Unavailable {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl EmbeddingProvider for MockEmbeddingProvider {
    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        self.check_failure()?;
        self.embed_calls.fetch_add(1, Ordering::SeqCst);

        self.embeddings
            .get(text)
            .cloned()
            .ok_or_else(|| EmbeddingError::InferenceFailed {
                reason: format!("no mock embedding registered for {:?}", text),
            })
    }

    fn token_count(&self, text: &str) -> Result<usize, EmbeddingError> {
        self.check_failure()?;

        let count = self
            .token_counts
            .get(text)
            .copied()
            .unwrap_or_else(|| text.split_whitespace().count() + 2);
        Ok(count.min(self.max_seq_len))
    }

    fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    fn max_seq_len(&self) -> usize {
        self.max_seq_len
    }
}
