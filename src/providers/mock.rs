/*!
 * Mock provider implementations for testing.
 *
 * `MockProvider` never touches the network. Its behavior is scripted with
 * `MockBehavior` and every batch it receives is recorded, so tests can
 * assert exactly which strings were sent and how often.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::{ErrorClass, ProviderError};
use crate::providers::{segments, Provider};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Upper-cases every string
    Uppercase,
    /// Prefixes every string with `[target_language]`
    Tagged,
    /// Answers with labeled segments in reverse order, decoded like a real response
    ReverseLabeled,
    /// Fails the first `failures` calls with a rate limit, then upper-cases
    FlakyFirst { failures: usize },
    /// Rejects any batch containing `needle`, upper-cases the rest
    RejectContaining(String),
    /// Always fails with an error of the given class
    Failing(ErrorClass),
    /// Always fails as if the API answered with this HTTP status
    Status(u16),
    /// Returns one string fewer than requested
    WrongCardinality,
    /// Sleeps on the first call only, then upper-cases
    SlowFirst { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Model reported for cache keys
    model: String,
    /// Every batch received, in call order
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            model: "mock-model".to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock provider that upper-cases its input
    pub fn uppercase() -> Self {
        Self::new(MockBehavior::Uppercase)
    }

    /// Report a different model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Number of `translate` calls so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Batches received so far
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }

    /// Total strings received across all calls
    pub fn strings_sent(&self) -> usize {
        self.calls.lock().iter().map(Vec::len).sum()
    }

    fn error_for(class: ErrorClass) -> ProviderError {
        match class {
            ErrorClass::Transient => ProviderError::ConnectionError("mock connection reset".to_string()),
            ErrorClass::Auth => ProviderError::AuthenticationError("mock key rejected".to_string()),
            ErrorClass::Content => ProviderError::ContentRejected("mock policy filter".to_string()),
            ErrorClass::Protocol => ProviderError::ParseError("mock garbage".to_string()),
        }
    }

    fn uppercase_all(texts: &[String]) -> Vec<String> {
        texts.iter().map(|text| text.to_uppercase()).collect()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn translate(
        &self,
        texts: &[String],
        _source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let call_index = {
            let mut calls = self.calls.lock();
            calls.push(texts.to_vec());
            calls.len() - 1
        };

        match &self.behavior {
            MockBehavior::Uppercase => Ok(Self::uppercase_all(texts)),
            MockBehavior::Tagged => Ok(texts
                .iter()
                .map(|text| format!("[{}] {}", target_language, text))
                .collect()),
            MockBehavior::ReverseLabeled => {
                let mut response = String::new();
                for (i, text) in texts.iter().enumerate().rev() {
                    response.push_str(&format!("<<SEG_{}>>\n{}\n", i, text.to_uppercase()));
                }
                response.push_str("<<END>>");
                segments::decode_segments(&response, texts.len())
            }
            MockBehavior::FlakyFirst { failures } => {
                if call_index < *failures {
                    Err(ProviderError::RateLimitExceeded("mock rate limit".to_string()))
                } else {
                    Ok(Self::uppercase_all(texts))
                }
            }
            MockBehavior::RejectContaining(needle) => {
                if texts.iter().any(|text| text.contains(needle.as_str())) {
                    Err(Self::error_for(ErrorClass::Content))
                } else {
                    Ok(Self::uppercase_all(texts))
                }
            }
            MockBehavior::Failing(class) => Err(Self::error_for(*class)),
            MockBehavior::Status(status_code) => Err(ProviderError::from_status(*status_code, "mock status")),
            MockBehavior::WrongCardinality => {
                let mut translated = Self::uppercase_all(texts);
                translated.pop();
                Ok(translated)
            }
            MockBehavior::SlowFirst { delay_ms } => {
                if call_index == 0 {
                    tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                }
                Ok(Self::uppercase_all(texts))
            }
        }
    }
}
