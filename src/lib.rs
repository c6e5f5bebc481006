//! Task-split verification library (used by the CLI and integration tests).
//!
//! # Public API Surface
//!
//! ## Verification
//! - [`SplitVerifier`], [`VerificationResult`], [`VerifyError`] - two-sided split decision
//! - [`ThresholdPolicy`], [`TaskType`], [`dynamic_threshold`] - length-adaptive thresholds
//!
//! ## Embedding
//! - [`EmbeddingProvider`] - the embedding seam (embed + token count)
//! - [`BertEmbedder`], [`BertEmbedderConfig`] - local BERT encoder with a stub mode
//! - [`cosine_similarity`] - vector comparison
//!
//! ## Lexical Similarity
//! - [`ngram_similarity`], [`ngram_sweep`], [`NGramMode`] - n-gram Jaccard index
//!
//! ## Application
//! - [`Config`], [`ConfigError`] - `TASKSPLIT_*` environment configuration
//! - [`ChatClient`], [`ChatSession`] - chat-completion client for the assistant UI
//!
//! ## Test/Mock Support
//! [`MockEmbeddingProvider`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod chat;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod ngram;
pub mod threshold;
pub mod verify;

pub use chat::{
    ChatClient, ChatConfig, ChatError, ChatRole, ChatSession, ChatTurn, GenerationParams,
    ImageAttachment,
};
pub use config::{Config, ConfigError};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbeddingProvider;
pub use embedding::{
    BertEmbedder, BertEmbedderConfig, Embedding, EmbeddingError, EmbeddingProvider,
    cosine_similarity,
};
pub use ngram::{NGramError, NGramMode, char_ngrams, ngram_similarity, ngram_sweep, word_ngrams};
pub use threshold::{TaskType, ThresholdError, ThresholdPolicy, dynamic_threshold};
pub use verify::{SplitVerifier, VerificationResult, VerifyError};
