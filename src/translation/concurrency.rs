/*!
 * Provider-specific concurrency tuning.
 *
 * This module provides default dispatch settings based on provider characteristics
 * such as rate limits, response times, and request size limits.
 */

use crate::app_config::TranslationProvider;

/// Provider-specific concurrency profile with tuned defaults
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    /// Maximum concurrent chunk requests
    pub max_concurrent_requests: usize,
    /// Suggested requests per minute (informational, logged at startup)
    pub target_rpm: Option<u32>,
    /// Recommended characters per chunk for this provider
    pub recommended_chunk_chars: usize,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl ProviderProfile {
    /// Get the default profile for a given provider
    pub fn for_provider(provider: TranslationProvider) -> Self {
        match provider {
            TranslationProvider::DeepSeek => Self {
                // DeepSeek is slow per request but lenient on rate limits
                max_concurrent_requests: 4,
                target_rpm: None,
                recommended_chunk_chars: 1000,
                timeout_secs: 120,
            },
            TranslationProvider::OpenAI => Self {
                // Reasoning models take a while to answer
                max_concurrent_requests: 4,
                target_rpm: Some(60),
                recommended_chunk_chars: 1000,
                timeout_secs: 120,
            },
            TranslationProvider::Anthropic => Self {
                // Anthropic has lower rate limits but larger context
                max_concurrent_requests: 3,
                target_rpm: Some(45),
                recommended_chunk_chars: 1500,
                timeout_secs: 90,
            },
            TranslationProvider::Grok => Self {
                max_concurrent_requests: 4,
                target_rpm: Some(60),
                recommended_chunk_chars: 1000,
                timeout_secs: 90,
            },
        }
    }
}
