/*!
 * Batch translation with failure recovery.
 *
 * A chunk is first sent as one request. Depending on how that request
 * fails, the chunk is either split into single-string requests, marked
 * failed as a whole, or the failure is escalated to stop the run.
 */

use log::{error, warn};
use std::sync::Arc;

use crate::errors::{ErrorClass, ProviderError};
use crate::providers::Provider;

use super::model::FailureReason;
use super::retry::RetryPolicy;

/// Per-string outcome of a chunk
pub type BatchOutcome = Vec<Result<String, FailureReason>>;

/// Sends chunks to a provider with retry and per-unit isolation
#[derive(Debug)]
pub struct BatchTranslator<P: Provider> {
    provider: Arc<P>,
    retry: RetryPolicy,
    source_language: String,
    target_language: String,
}

impl<P: Provider> BatchTranslator<P> {
    /// Create a new batch translator
    pub fn new(
        provider: Arc<P>,
        retry: RetryPolicy,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            retry,
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }

    /// Translate a chunk, isolating content rejections to single strings
    ///
    /// Returns `Err` only for authentication failures, which stop the run.
    /// Every other failure is folded into the per-string outcomes.
    pub async fn translate_with_recovery(&self, texts: &[String]) -> Result<BatchOutcome, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let error = match self.translate_batch(texts).await {
            Ok(translations) => return Ok(translations.into_iter().map(Ok).collect()),
            Err(e) => e,
        };

        match error.class() {
            ErrorClass::Auth => Err(error),
            ErrorClass::Content if texts.len() > 1 => {
                warn!(
                    "Batch of {} strings rejected ({}), retrying strings individually",
                    texts.len(),
                    error
                );
                self.translate_individually(texts).await
            }
            class => {
                if class == ErrorClass::Protocol {
                    error!("Protocol violation from {}: {}", self.provider.name(), error);
                } else {
                    warn!("Batch of {} strings failed: {}", texts.len(), error);
                }
                let reason = FailureReason::from(&error);
                Ok(texts.iter().map(|_| Err(reason.clone())).collect())
            }
        }
    }

    async fn translate_individually(&self, texts: &[String]) -> Result<BatchOutcome, ProviderError> {
        let mut outcomes = Vec::with_capacity(texts.len());

        for text in texts {
            match self.translate_batch(std::slice::from_ref(text)).await {
                Ok(mut translations) => outcomes.push(Ok(translations.remove(0))),
                Err(e) if e.class() == ErrorClass::Auth => return Err(e),
                Err(e) => {
                    warn!("String could not be translated: {}", e);
                    outcomes.push(Err(FailureReason::from(&e)));
                }
            }
        }

        Ok(outcomes)
    }

    /// One request with transient retries and a cardinality check
    async fn translate_batch(&self, texts: &[String]) -> Result<Vec<String>, ProviderError> {
        let label = format!("{} request ({} strings)", self.provider.name(), texts.len());

        let translations = self
            .retry
            .run(&label, || {
                self.provider
                    .translate(texts, &self.source_language, &self.target_language)
            })
            .await?;

        if translations.len() != texts.len() {
            return Err(ProviderError::CardinalityMismatch {
                expected: texts.len(),
                actual: translations.len(),
            });
        }

        Ok(translations)
    }
}
