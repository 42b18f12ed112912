use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::{error_from_response, http_client, segments, ClientSettings, Provider};

/// Client for OpenAI-compatible chat completions APIs
///
/// OpenAI itself, DeepSeek and Grok all speak this protocol; only the
/// base URL, the key and the provider name differ.
pub struct OpenAI {
    /// Provider identifier used for cache keys and logs
    name: String,
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Base URL, e.g. `https://api.openai.com/v1`
    endpoint: String,
    /// Model bound at construction
    model: String,
    /// Sampling temperature
    temperature: f32,
    /// Completion token budget per request
    max_tokens: u32,
}

impl std::fmt::Debug for OpenAI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAI")
            .field("name", &self.name)
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

/// Chat completion request
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<ChatMessage>,

    /// Temperature for generation; reasoning models reject it
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    /// Legacy completion limit
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,

    /// Completion limit for reasoning models
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
}

/// Chat message format
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    #[serde(default)]
    pub content: Option<String>,

    /// Refusal text returned instead of content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal: Option<String>,
}

/// Token usage information
#[derive(Debug, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

/// One completion choice
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl ChatCompletionRequest {
    /// Create a new request for `model`
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
            max_completion_tokens: None,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: Some(content.into()),
            refusal: None,
        });
        self
    }

    /// Set sampling and length limits, honoring reasoning-model restrictions
    pub fn limits(mut self, temperature: f32, max_tokens: u32) -> Self {
        if is_reasoning_model(&self.model) {
            self.max_completion_tokens = Some(max_tokens);
        } else {
            self.temperature = Some(temperature);
            self.max_tokens = Some(max_tokens);
        }
        self
    }
}

/// gpt-5 and the o-series only accept the default temperature
fn is_reasoning_model(model: &str) -> bool {
    let model = model.to_lowercase();
    model.starts_with("gpt-5")
        || model.starts_with("o1")
        || model.starts_with("o3")
        || model.starts_with("o4")
}

impl OpenAI {
    /// Create a new client
    pub fn new(name: impl Into<String>, settings: ClientSettings) -> Result<Self, ProviderError> {
        Ok(Self {
            name: name.into(),
            client: http_client(settings.timeout)?,
            api_key: settings.api_key,
            endpoint: settings.endpoint,
            model: settings.model,
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }

    /// Chat completions endpoint for the configured base URL
    pub fn api_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }

    /// Complete a chat request
    pub async fn complete(&self, request: ChatCompletionRequest) -> Result<ChatCompletionResponse, ProviderError> {
        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(&self.name, response).await);
        }

        response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse {} response: {}", self.name, e)))
    }

    /// Extract the first choice's text, classifying filtered or refused output
    pub fn extract_text_from_response(response: &ChatCompletionResponse) -> Result<String, ProviderError> {
        let choice = response
            .choices
            .first()
            .ok_or_else(|| ProviderError::ParseError("No choices in response".to_string()))?;

        if choice.finish_reason.as_deref() == Some("content_filter") {
            return Err(ProviderError::ContentRejected(
                "Response stopped by content filter".to_string(),
            ));
        }
        if let Some(refusal) = &choice.message.refusal {
            return Err(ProviderError::ContentRejected(refusal.clone()));
        }

        choice
            .message
            .content
            .clone()
            .ok_or_else(|| ProviderError::ParseError("No content in response".to_string()))
    }
}

#[async_trait]
impl Provider for OpenAI {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn translate(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = ChatCompletionRequest::new(&self.model)
            .add_message(
                "system",
                segments::system_prompt(source_language, target_language, texts.len()),
            )
            .add_message("user", segments::encode_segments(texts))
            .limits(self.temperature, self.max_tokens);

        let response = self.complete(request).await?;

        if let Some(choice) = response.choices.first() {
            if choice.finish_reason.as_deref() == Some("length") {
                warn!("{} response hit the token limit ({})", self.name, self.max_tokens);
            }
        }
        if let Some(usage) = &response.usage {
            debug!(
                "{} usage: {} prompt tokens, {} completion tokens",
                self.name, usage.prompt_tokens, usage.completion_tokens
            );
        }

        let text = Self::extract_text_from_response(&response)?;
        segments::decode_segments(&text, texts.len())
    }
}
