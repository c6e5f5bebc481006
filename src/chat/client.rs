use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::error::ChatError;
use super::types::{
    ChatRole, ChatTurn, CompletionRequest, ContentPart, GenerationParams, ImageAttachment,
    ImageUrl, RequestContent, RequestMessage, TurnContent,
};

/// DashScope OpenAI-compatible endpoint.
pub const DEFAULT_CHAT_BASE_URL: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";

/// Default model (vision-capable).
pub const DEFAULT_CHAT_MODEL: &str = "qwen-vl-plus";

/// Default request timeout.
pub const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 60;

/// Model-id prefix of models that accept inline images.
pub const MULTIMODAL_MODEL_PREFIX: &str = "qwen-vl";

/// Value written into freshly generated config files; never a usable key.
const PLACEHOLDER_API_KEY: &str = "your-api-key-here";

#[derive(Debug, Clone)]
/// Connection settings for [`ChatClient`].
pub struct ChatConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CHAT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_CHAT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_CHAT_TIMEOUT_SECS),
        }
    }
}

impl ChatConfig {
    /// Returns `true` if the model accepts inline images.
    pub fn is_multimodal(&self) -> bool {
        self.model.starts_with(MULTIMODAL_MODEL_PREFIX)
    }

    fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }
}

/// Minimal client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatClient {
    http: reqwest::Client,
    config: ChatConfig,
    api_key: String,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Result<Self, ChatError> {
        let api_key = config
            .usable_api_key()
            .ok_or(ChatError::MissingApiKey)?
            .to_string();

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            config,
            api_key,
        })
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Builds the JSON request: system prompt, then history in order.
    ///
    /// Image turns are dropped for models without image support.
    pub fn build_request_body(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
        params: &GenerationParams,
    ) -> Value {
        let multimodal = self.config.is_multimodal();

        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(RequestMessage {
            role: ChatRole::System,
            content: RequestContent::Text(system_prompt.to_string()),
        });

        for turn in history {
            match &turn.content {
                TurnContent::Text(text) => messages.push(RequestMessage {
                    role: turn.role,
                    content: RequestContent::Text(text.clone()),
                }),
                TurnContent::TextWithImage { text, image }
                    if multimodal && turn.role == ChatRole::User =>
                {
                    messages.push(RequestMessage {
                        role: turn.role,
                        content: image_parts(text, image),
                    })
                }
                TurnContent::TextWithImage { .. } => {
                    warn!(
                        model = %self.config.model,
                        "Dropping image turn: model does not accept images"
                    );
                }
            }
        }

        let request = CompletionRequest {
            model: &self.config.model,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            top_p: params.top_p,
            repetition_penalty: params.repetition_penalty,
            stream: false,
        };

        serde_json::to_value(&request).unwrap_or(Value::Null)
    }

    /// Sends one completion request and returns the assistant's text.
    pub async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
        params: &GenerationParams,
    ) -> Result<String, ChatError> {
        params.validate()?;
        let body = self.build_request_body(system_prompt, history, params);

        debug!(
            model = %self.config.model,
            turns = history.len(),
            "Sending chat completion request"
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Chat completion request failed");
            return Err(ChatError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ChatError::MalformedResponse {
                reason: e.to_string(),
            })?;

        let reply = parse_completion(&payload)?;
        info!(reply_len = reply.len(), "Chat completion received");
        Ok(reply)
    }
}

fn image_parts(text: &str, image: &ImageAttachment) -> RequestContent {
    RequestContent::Parts(vec![
        ContentPart::Text {
            text: text.to_string(),
        },
        ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: image.data_url(),
            },
        },
    ])
}

/// Extracts `choices[0].message.content`, surfacing an `error` object if present.
pub(crate) fn parse_completion(payload: &Value) -> Result<String, ChatError> {
    if let Some(error) = payload.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown Error")
            .to_string();
        return Err(ChatError::Api { message });
    }

    payload
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ChatError::MalformedResponse {
            reason: "missing choices[0].message.content".to_string(),
        })
}

/// Conversation state: a system prompt plus the running history.
#[derive(Debug, Clone)]
pub struct ChatSession {
    system_prompt: String,
    history: Vec<ChatTurn>,
}

impl ChatSession {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Appends the user turn, requests a completion, and appends the reply.
    ///
    /// On failure the user turn stays in the history and no reply is recorded.
    pub async fn send(
        &mut self,
        client: &ChatClient,
        prompt: &str,
        image: Option<ImageAttachment>,
        params: &GenerationParams,
    ) -> Result<String, ChatError> {
        let turn = match image {
            Some(image) if client.config().is_multimodal() => {
                ChatTurn::user_with_image(prompt, image)
            }
            _ => ChatTurn::user(prompt),
        };
        self.history.push(turn);

        let reply = client
            .complete(&self.system_prompt, &self.history, params)
            .await?;
        self.history.push(ChatTurn::assistant(reply.clone()));
        Ok(reply)
    }
}
