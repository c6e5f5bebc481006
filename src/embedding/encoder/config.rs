use std::path::PathBuf;

use crate::embedding::error::EmbeddingError;

/// Default embedding dimension (BERT-base hidden size).
pub const ENCODER_EMBEDDING_DIM: usize = crate::constants::DEFAULT_EMBEDDING_DIM;

/// Default max sequence length.
pub const ENCODER_MAX_SEQ_LEN: usize = crate::constants::DEFAULT_MAX_SEQ_LEN;

/// Files a model directory must contain.
pub const REQUIRED_MODEL_FILES: [&str; 3] = ["config.json", "model.safetensors", "tokenizer.json"];

#[derive(Debug, Clone)]
/// Configuration for [`BertEmbedder`](super::BertEmbedder).
pub struct BertEmbedderConfig {
    /// Directory holding `config.json`, `model.safetensors` and `tokenizer.json`.
    pub model_dir: PathBuf,
    /// Max tokens per text; longer inputs are truncated.
    pub max_seq_len: usize,
    /// Output dimension in stub mode (a loaded model reports its own hidden size).
    pub embedding_dim: usize,
    /// If true, run in deterministic stub mode (no model files required).
    pub testing_stub: bool,
}

impl Default for BertEmbedderConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::new(),
            max_seq_len: ENCODER_MAX_SEQ_LEN,
            embedding_dim: ENCODER_EMBEDDING_DIM,
            testing_stub: false,
        }
    }
}

impl BertEmbedderConfig {
    /// Env var used to locate the model directory.
    pub const ENV_MODEL_DIR: &'static str = "TASKSPLIT_MODEL_DIR";
    /// Env var overriding the max sequence length.
    pub const ENV_MAX_SEQ_LEN: &'static str = "TASKSPLIT_MAX_SEQ_LEN";

    /// Loads config from environment variables (missing model dir becomes an empty path).
    pub fn from_env() -> Result<Self, EmbeddingError> {
        let model_dir = std::env::var(Self::ENV_MODEL_DIR)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_default();

        let max_seq_len = match std::env::var(Self::ENV_MAX_SEQ_LEN) {
            Ok(value) => value
                .trim()
                .parse::<usize>()
                .map_err(|e| EmbeddingError::InvalidConfig {
                    reason: format!("{} '{}': {}", Self::ENV_MAX_SEQ_LEN, value, e),
                })?,
            Err(_) => ENCODER_MAX_SEQ_LEN,
        };

        Ok(Self {
            model_dir,
            max_seq_len,
            ..Default::default()
        })
    }

    /// Creates a config for a model directory.
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: model_dir.into(),
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; deterministic lexical embeddings).
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Default::default()
        }
    }

    /// Sets the max sequence length.
    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = max_seq_len;
        self
    }

    /// Validates required fields for non-stub mode.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be at least 1".to_string(),
            });
        }

        if self.testing_stub {
            if self.embedding_dim == 0 {
                return Err(EmbeddingError::InvalidConfig {
                    reason: "embedding_dim must be at least 1".to_string(),
                });
            }
            return Ok(());
        }

        if self.model_dir.as_os_str().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_dir is required (stubbing is disabled)".to_string(),
            });
        }

        if !self.model_dir.is_dir() {
            return Err(EmbeddingError::ModelNotFound {
                path: self.model_dir.clone(),
            });
        }

        if let Some(missing) = self.missing_files().into_iter().next() {
            return Err(EmbeddingError::ModelNotFound { path: missing });
        }

        Ok(())
    }

    /// Returns the required model files absent from `model_dir`.
    pub fn missing_files(&self) -> Vec<PathBuf> {
        REQUIRED_MODEL_FILES
            .iter()
            .map(|name| self.model_dir.join(name))
            .filter(|path| !path.is_file())
            .collect()
    }

    /// Returns `true` if every required model file exists.
    pub fn model_available(&self) -> bool {
        !self.model_dir.as_os_str().is_empty() && self.missing_files().is_empty()
    }
}
