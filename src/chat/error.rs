use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat API key is not configured (set TASKSPLIT_CHAT_API_KEY)")]
    MissingApiKey,

    #[error("invalid generation parameter: {reason}")]
    InvalidParams { reason: String },

    #[error("unsupported image file: {path}")]
    UnsupportedImage { path: PathBuf },

    #[error("failed to read image: {0}")]
    ImageRead(#[from] std::io::Error),

    #[error("chat request timed out")]
    Timeout,

    #[error("chat transport error: {0}")]
    Transport(String),

    #[error("chat API request failed with HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("chat API returned an error: {message}")]
    Api { message: String },

    #[error("malformed chat response: {reason}")]
    MalformedResponse { reason: String },
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChatError::Timeout
        } else {
            ChatError::Transport(err.to_string())
        }
    }
}
