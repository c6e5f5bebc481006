use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

use super::error::ChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Image sent inline with a user turn.
pub struct ImageAttachment {
    /// MIME type, e.g. `image/jpeg`.
    pub mime_type: String,
    /// Raw encoded image bytes.
    pub data: Vec<u8>,
}

impl ImageAttachment {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Reads a `.jpg`, `.jpeg`, `.png` or `.webp` file.
    pub fn from_path(path: &Path) -> Result<Self, ChatError> {
        let mime_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .and_then(|ext| match ext.as_str() {
                "jpg" | "jpeg" => Some("image/jpeg"),
                "png" => Some("image/png"),
                "webp" => Some("image/webp"),
                _ => None,
            })
            .ok_or_else(|| ChatError::UnsupportedImage {
                path: path.to_path_buf(),
            })?;

        let data = std::fs::read(path)?;
        Ok(Self::new(mime_type, data))
    }

    /// `data:<mime>;base64,<payload>` URL.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnContent {
    Text(String),
    TextWithImage {
        text: String,
        image: ImageAttachment,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One entry of the conversation history.
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: TurnContent,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: TurnContent::Text(text.into()),
        }
    }

    pub fn user_with_image(text: impl Into<String>, image: ImageAttachment) -> Self {
        Self {
            role: ChatRole::User,
            content: TurnContent::TextWithImage {
                text: text.into(),
                image,
            },
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: TurnContent::Text(text.into()),
        }
    }

    pub fn text(&self) -> &str {
        match &self.content {
            TurnContent::Text(text) | TurnContent::TextWithImage { text, .. } => text,
        }
    }

    pub fn has_image(&self) -> bool {
        matches!(self.content, TurnContent::TextWithImage { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Sampling parameters forwarded to the completion endpoint.
pub struct GenerationParams {
    /// Default `0.7`, range `0.0..=2.0`.
    pub temperature: f32,
    /// Default `1024`, range `100..=4096`.
    pub max_tokens: u32,
    /// Default `0.95`, range `0.1..=1.0`.
    pub top_p: f32,
    /// Default `1.0`, range `0.1..=2.0`.
    pub repetition_penalty: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1024,
            top_p: 0.95,
            repetition_penalty: 1.0,
        }
    }
}

impl GenerationParams {
    pub fn validate(&self) -> Result<(), ChatError> {
        fn check(name: &str, value: f32, min: f32, max: f32) -> Result<(), ChatError> {
            if (min..=max).contains(&value) {
                Ok(())
            } else {
                Err(ChatError::InvalidParams {
                    reason: format!("{name} must be between {min} and {max}, got {value}"),
                })
            }
        }

        check("temperature", self.temperature, 0.0, 2.0)?;
        check("top_p", self.top_p, 0.1, 1.0)?;
        check("repetition_penalty", self.repetition_penalty, 0.1, 2.0)?;

        if !(100..=4096).contains(&self.max_tokens) {
            return Err(ChatError::InvalidParams {
                reason: format!(
                    "max_tokens must be between 100 and 4096, got {}",
                    self.max_tokens
                ),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<RequestMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub repetition_penalty: f32,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct RequestMessage {
    pub role: ChatRole,
    pub content: RequestContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum RequestContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageUrl {
    pub url: String,
}
