//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `TASKSPLIT_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::chat::{
    ChatConfig, DEFAULT_CHAT_BASE_URL, DEFAULT_CHAT_MODEL, DEFAULT_CHAT_TIMEOUT_SECS,
};
use crate::constants::DEFAULT_MAX_SEQ_LEN;
use crate::embedding::BertEmbedderConfig;
use crate::threshold::ThresholdPolicy;

/// Application configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `TASKSPLIT_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// BERT model directory. `None` runs the embedder in stub mode.
    pub model_dir: Option<PathBuf>,

    /// Max tokens per text for embedding and threshold length. Default: `128`.
    pub max_seq_len: usize,

    /// Threshold parameters (bases, decay, floor).
    pub threshold_policy: ThresholdPolicy,

    /// Chat-completion base URL. Default: DashScope compatible mode.
    pub chat_base_url: String,

    /// Chat API key.
    pub chat_api_key: Option<String>,

    /// Chat model id. Default: `qwen-vl-plus`.
    pub chat_model: String,

    /// Chat request timeout in seconds. Default: `60`.
    pub chat_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_dir: None,
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            threshold_policy: ThresholdPolicy::default(),
            chat_base_url: DEFAULT_CHAT_BASE_URL.to_string(),
            chat_api_key: None,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            chat_timeout_secs: DEFAULT_CHAT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    const ENV_MODEL_DIR: &'static str = "TASKSPLIT_MODEL_DIR";
    const ENV_MAX_SEQ_LEN: &'static str = "TASKSPLIT_MAX_SEQ_LEN";
    const ENV_UNION_BASE: &'static str = "TASKSPLIT_UNION_BASE";
    const ENV_INTERSECTION_BASE: &'static str = "TASKSPLIT_INTERSECTION_BASE";
    const ENV_DECAY_FACTOR: &'static str = "TASKSPLIT_DECAY_FACTOR";
    const ENV_THRESHOLD_FLOOR: &'static str = "TASKSPLIT_THRESHOLD_FLOOR";
    const ENV_CHAT_BASE_URL: &'static str = "TASKSPLIT_CHAT_BASE_URL";
    const ENV_CHAT_API_KEY: &'static str = "TASKSPLIT_CHAT_API_KEY";
    const ENV_CHAT_MODEL: &'static str = "TASKSPLIT_CHAT_MODEL";
    const ENV_CHAT_TIMEOUT_SECS: &'static str = "TASKSPLIT_CHAT_TIMEOUT_SECS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let policy = defaults.threshold_policy;

        let max_seq_len = Self::parse_from_env(Self::ENV_MAX_SEQ_LEN, defaults.max_seq_len)?;

        let threshold_policy = ThresholdPolicy {
            union_base: Self::parse_from_env(Self::ENV_UNION_BASE, policy.union_base)?,
            intersection_base: Self::parse_from_env(
                Self::ENV_INTERSECTION_BASE,
                policy.intersection_base,
            )?,
            decay_factor: Self::parse_from_env(Self::ENV_DECAY_FACTOR, policy.decay_factor)?,
            floor: Self::parse_from_env(Self::ENV_THRESHOLD_FLOOR, policy.floor)?,
            max_tokens: max_seq_len,
        };

        let model_dir =
            Self::parse_optional_string_from_env(Self::ENV_MODEL_DIR).map(PathBuf::from);

        Ok(Self {
            model_dir,
            max_seq_len,
            threshold_policy,
            chat_base_url: Self::parse_optional_string_from_env(Self::ENV_CHAT_BASE_URL)
                .unwrap_or(defaults.chat_base_url),
            chat_api_key: Self::parse_optional_string_from_env(Self::ENV_CHAT_API_KEY),
            chat_model: Self::parse_optional_string_from_env(Self::ENV_CHAT_MODEL)
                .unwrap_or(defaults.chat_model),
            chat_timeout_secs: Self::parse_from_env(
                Self::ENV_CHAT_TIMEOUT_SECS,
                defaults.chat_timeout_secs,
            )?,
        })
    }

    /// Validates paths and ranges (does not load the model).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.model_dir {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if self.max_seq_len == 0 {
            return Err(ConfigError::OutOfRange {
                name: Self::ENV_MAX_SEQ_LEN,
                reason: "must be at least 1".to_string(),
            });
        }

        if self.chat_timeout_secs == 0 {
            return Err(ConfigError::OutOfRange {
                name: Self::ENV_CHAT_TIMEOUT_SECS,
                reason: "must be at least 1".to_string(),
            });
        }

        self.threshold_policy
            .validate()
            .map_err(|e| ConfigError::OutOfRange {
                name: "threshold policy",
                reason: e.to_string(),
            })
    }

    /// Embedder config for the configured model directory, or stub mode without one.
    pub fn embedder_config(&self) -> BertEmbedderConfig {
        let config = match &self.model_dir {
            Some(dir) => BertEmbedderConfig::new(dir.clone()),
            None => BertEmbedderConfig::stub(),
        };
        config.with_max_seq_len(self.max_seq_len)
    }

    /// Connection settings for the chat client.
    pub fn chat_config(&self) -> ChatConfig {
        ChatConfig {
            base_url: self.chat_base_url.clone(),
            api_key: self.chat_api_key.clone(),
            model: self.chat_model.clone(),
            timeout: Duration::from_secs(self.chat_timeout_secs),
        }
    }

    fn parse_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::ParseError {
                    name: var_name,
                    value: value.clone(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}
