//! BERT encoder (safetensors + tokenizer), pooled on the `[CLS]` position.
//!
//! Use [`BertEmbedderConfig::stub`] for tests and demos without model files. The stub
//! hashes lowercase words into signed buckets, so texts with the same vocabulary land
//! on the same vector and texts with disjoint vocabularies are close to orthogonal.

/// Encoder configuration.
pub mod config;


pub use config::{
    BertEmbedderConfig, ENCODER_EMBEDDING_DIM, ENCODER_MAX_SEQ_LEN, REQUIRED_MODEL_FILES,
};

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::bert::BertEncoder;
use crate::embedding::device::select_device;
use crate::embedding::error::EmbeddingError;
use crate::embedding::provider::{Embedding, EmbeddingProvider};
use crate::embedding::utils::load_tokenizer_with_truncation;

/// Special tokens BERT wraps around every sequence (`[CLS]`, `[SEP]`).
const SPECIAL_TOKENS: usize = 2;

enum EncoderBackend {
    Model {
        model: BertEncoder,
        tokenizer: Box<Tokenizer>,
        device: Device,
    },
    Stub,
}

/// Embedding provider backed by a local BERT model (supports stub mode).
pub struct BertEmbedder {
    backend: EncoderBackend,
    config: BertEmbedderConfig,
    embedding_dim: usize,
}

impl std::fmt::Debug for BertEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BertEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    EncoderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EncoderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("embedding_dim", &self.embedding_dim)
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl BertEmbedder {
    /// Loads the embedder from a config (stub mode is supported).
    pub fn load(config: BertEmbedderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        if config.testing_stub {
            warn!("Encoder running in STUB mode (lexical hashing, testing only)");
            return Ok(Self {
                backend: EncoderBackend::Stub,
                embedding_dim: config.embedding_dim,
                config,
            });
        }

        let device = select_device();
        debug!(?device, "Selected compute device for encoder");

        let model = BertEncoder::load(&config.model_dir, &device).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BERT model: {}", e),
            }
        })?;

        let tokenizer = load_tokenizer_with_truncation(&config.model_dir, config.max_seq_len)?;
        let embedding_dim = model.hidden_size();

        info!(
            model_dir = %config.model_dir.display(),
            embedding_dim,
            max_seq_len = config.max_seq_len,
            "BERT encoder loaded"
        );

        Ok(Self {
            backend: EncoderBackend::Model {
                model,
                tokenizer: Box::new(tokenizer),
                device,
            },
            embedding_dim,
            config,
        })
    }

    /// Shorthand for `load(BertEmbedderConfig::stub())`.
    pub fn stub() -> Result<Self, EmbeddingError> {
        Self::load(BertEmbedderConfig::stub())
    }

    fn embed_with_model(
        &self,
        text: &str,
        model: &BertEncoder,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<Embedding, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let ids = encoding.get_ids();
        if ids.is_empty() {
            return Ok(vec![0.0; self.embedding_dim]);
        }

        debug!(
            text_len = text.len(),
            token_count = ids.len(),
            "Generating embedding (BERT forward pass)"
        );

        let input_ids = Tensor::new(ids, device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(encoding.get_type_ids(), device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), device)?.unsqueeze(0)?;

        let cls = model
            .forward_cls(&input_ids, &type_ids, Some(&attention_mask))
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("BERT forward pass failed: {}", e),
            })?;

        let embedding = cls
            .squeeze(0)?
            .to_vec1::<f32>()
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("Failed to convert embedding to vec: {}", e),
            })?;

        Ok(embedding)
    }

    fn stub_words(&self, text: &str) -> Vec<String> {
        let budget = self.config.max_seq_len.saturating_sub(SPECIAL_TOKENS);
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .take(budget)
            .map(str::to_string)
            .collect()
    }

    fn embed_stub(&self, text: &str) -> Embedding {
        let mut embedding = vec![0.0f32; self.embedding_dim];

        for word in self.stub_words(text) {
            let hash = blake3::hash(word.as_bytes());
            let bytes = hash.as_bytes();

            let mut bucket_bytes = [0u8; 8];
            bucket_bytes.copy_from_slice(&bytes[..8]);
            let bucket = (u64::from_le_bytes(bucket_bytes) % self.embedding_dim as u64) as usize;
            let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };

            embedding[bucket] += sign;
        }

        debug!(text_len = text.len(), "Generated stub embedding");

        embedding
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EncoderBackend::Stub)
    }

    /// Returns `true` if a model is loaded.
    pub fn has_model(&self) -> bool {
        matches!(self.backend, EncoderBackend::Model { .. })
    }

    /// Returns the embedder configuration.
    pub fn config(&self) -> &BertEmbedderConfig {
        &self.config
    }
}

impl EmbeddingProvider for BertEmbedder {
    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        match &self.backend {
            EncoderBackend::Model {
                model,
                tokenizer,
                device,
            } => self.embed_with_model(text, model, tokenizer, device),
            EncoderBackend::Stub => Ok(self.embed_stub(text)),
        }
    }

    fn token_count(&self, text: &str) -> Result<usize, EmbeddingError> {
        let count = match &self.backend {
            EncoderBackend::Model { tokenizer, .. } => tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?
                .get_ids()
                .len(),
            EncoderBackend::Stub => self.stub_words(text).len() + SPECIAL_TOKENS,
        };

        Ok(count.min(self.config.max_seq_len))
    }

    fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    fn max_seq_len(&self) -> usize {
        self.config.max_seq_len
    }
}
