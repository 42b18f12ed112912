/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported LLM providers:
 * - DeepSeek: OpenAI-compatible chat completions API
 * - OpenAI: OpenAI API integration
 * - Anthropic: Anthropic Messages API integration
 * - Grok: xAI's OpenAI-compatible API
 *
 * Every client translates a batch of strings in one request and maps its
 * vendor's failures onto `ProviderError`.
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;

pub mod anthropic;
pub mod mock;
pub mod openai;
pub mod segments;

use anthropic::Anthropic;
use openai::OpenAI;

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the translation coordinator.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Provider identifier, part of every cache key
    fn name(&self) -> &str;

    /// Model bound at construction, part of every cache key
    fn model(&self) -> &str;

    /// Translate a batch of strings
    ///
    /// # Arguments
    /// * `texts` - Strings to translate, in order
    /// * `source_language` - Source language code
    /// * `target_language` - Target language code
    ///
    /// # Returns
    /// * `Result<Vec<String>, ProviderError>` - One translation per input, same order
    async fn translate(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError>;
}

/// Settings shared by every HTTP client
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ClientSettings {
    /// Resolve the active provider's settings, failing if no key is available
    pub fn from_config(config: &TranslationConfig) -> Result<Self, ProviderError> {
        let api_key = config.get_api_key();
        if api_key.is_empty() {
            return Err(ProviderError::AuthenticationError(format!(
                "No API key configured for {}. Set {} or add it to the config file.",
                config.provider.display_name(),
                config.provider.api_key_env()
            )));
        }

        Ok(Self {
            api_key,
            endpoint: config.get_endpoint(),
            model: config.get_model(),
            timeout: Duration::from_secs(config.get_timeout_secs()),
            temperature: config.common.temperature,
            max_tokens: config.get_max_tokens(),
        })
    }
}

/// The configured provider, selected once at startup
#[derive(Debug)]
pub enum ProviderClient {
    DeepSeek(OpenAI),
    OpenAI(OpenAI),
    Anthropic(Anthropic),
    Grok(OpenAI),
}

impl ProviderClient {
    /// Build the client for the active provider
    pub fn from_config(config: &TranslationConfig) -> Result<Self, ProviderError> {
        let settings = ClientSettings::from_config(config)?;
        let provider = config.provider;
        let name = provider.to_lowercase_string();

        let client = match provider {
            TranslationProvider::DeepSeek => Self::DeepSeek(OpenAI::new(name, settings)?),
            TranslationProvider::OpenAI => Self::OpenAI(OpenAI::new(name, settings)?),
            TranslationProvider::Anthropic => Self::Anthropic(Anthropic::new(settings)?),
            TranslationProvider::Grok => Self::Grok(OpenAI::new(name, settings)?),
        };
        Ok(client)
    }

    fn inner(&self) -> &dyn Provider {
        match self {
            Self::DeepSeek(client) | Self::OpenAI(client) | Self::Grok(client) => client,
            Self::Anthropic(client) => client,
        }
    }
}

#[async_trait]
impl Provider for ProviderClient {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn model(&self) -> &str {
        self.inner().model()
    }

    async fn translate(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        self.inner()
            .translate(texts, source_language, target_language)
            .await
    }
}

/// Build an HTTP client with the per-request timeout applied
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::ConnectionError(format!("Failed to build HTTP client: {}", e)))
}

/// Turn a non-success response into a classified error
pub(crate) async fn error_from_response(provider: &str, response: reqwest::Response) -> ProviderError {
    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to get error response text".to_string());
    log::error!("{} API error ({}): {}", provider, status, error_text);
    ProviderError::from_status(status.as_u16(), error_text)
}
