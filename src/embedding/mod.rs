//! Embedding + model utilities.
//!
//! - [`EmbeddingProvider`] is the seam the threshold policy and verifier depend on.
//! - [`encoder`] provides the BERT-backed implementation (with a stub mode).
//! - [`cosine_similarity`] compares two embeddings.

/// BERT encoder with `[CLS]` pooling.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
/// BERT embedder (model + tokenizer, or stub).
pub mod encoder;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod provider;
mod similarity;
/// Tokenizer loading helpers.
pub mod utils;

pub use encoder::{
    BertEmbedder, BertEmbedderConfig, ENCODER_EMBEDDING_DIM, ENCODER_MAX_SEQ_LEN,
};
pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbeddingProvider;
pub use provider::{Embedding, EmbeddingProvider, validate_embedding};
pub use similarity::cosine_similarity;
