//! Chat-completion client for the surrounding assistant application.
//!
//! Talks to an OpenAI-compatible `/chat/completions` endpoint (DashScope by default).
//! Verification does not depend on this module.

pub mod client;
pub mod error;
pub mod types;


pub use client::{
    ChatClient, ChatConfig, ChatSession, DEFAULT_CHAT_BASE_URL, DEFAULT_CHAT_MODEL,
    DEFAULT_CHAT_TIMEOUT_SECS, MULTIMODAL_MODEL_PREFIX,
};
pub use error::ChatError;
pub use types::{ChatRole, ChatTurn, GenerationParams, ImageAttachment, TurnContent};
