/*!
 * Translation coordinator.
 *
 * Turns an ordered list of text units into a complete `TranslationResult`:
 * normalize, answer what the cache knows, de-duplicate the rest, chunk the
 * unique strings, dispatch the chunks concurrently, fold successes back into
 * the cache and re-expand to one outcome per input unit.
 */

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use log::{debug, error, info, warn};

use crate::app_config::Config;
use crate::errors::{ErrorClass, ProviderError, TranslationError};
use crate::providers::Provider;

use super::batch::{BatchOutcome, BatchTranslator};
use super::cache::{normalize_text, CacheKey, TranslationCache};
use super::chunker::{Chunk, Chunker};
use super::model::{FailureReason, TextUnit, Translation, TranslationResult, TranslationStats, UnitOutcome};
use super::retry::RetryPolicy;

/// Settings for a translation pass
#[derive(Debug, Clone)]
pub struct CoordinatorOptions {
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
    /// Character budget per chunk
    pub max_chunk_size: usize,
    /// Chunks in flight at once
    pub max_workers: usize,
    /// Retry policy for transient failures
    pub retry: RetryPolicy,
}

impl CoordinatorOptions {
    pub fn new(source_language: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            source_language: source_language.into(),
            target_language: target_language.into(),
            max_chunk_size: 1000,
            max_workers: 4,
            retry: RetryPolicy::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            source_language: config.source_language.clone(),
            target_language: config.target_language.clone(),
            max_chunk_size: config.translation.get_max_chars_per_request(),
            max_workers: config.translation.optimal_concurrent_requests(),
            retry: RetryPolicy::from_config(&config.translation.common),
        }
    }

    pub fn max_chunk_size(mut self, max_chunk_size: usize) -> Self {
        self.max_chunk_size = max_chunk_size;
        self
    }

    pub fn max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Coordinates cache, chunker and provider for one language pair
#[derive(Debug)]
pub struct TranslationCoordinator<P: Provider> {
    provider: Arc<P>,
    cache: TranslationCache,
    options: CoordinatorOptions,
    batch: BatchTranslator<P>,
}

impl<P: Provider> TranslationCoordinator<P> {
    pub fn new(provider: Arc<P>, cache: TranslationCache, options: CoordinatorOptions) -> Self {
        let batch = BatchTranslator::new(
            provider.clone(),
            options.retry.clone(),
            options.source_language.clone(),
            options.target_language.clone(),
        );
        Self {
            provider,
            cache,
            options,
            batch,
        }
    }

    pub fn options(&self) -> &CoordinatorOptions {
        &self.options
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Translate `units`, returning one outcome per unit in input order
    pub async fn translate_units(&self, units: &[TextUnit]) -> Result<TranslationResult, TranslationError> {
        self.translate_units_with_progress(units, |_, _| {}).await
    }

    /// Like `translate_units`, calling `progress(done, total)` as chunks complete
    ///
    /// Fails only when the provider rejects the credentials; chunks not yet
    /// dispatched at that point are skipped.
    pub async fn translate_units_with_progress<F>(
        &self,
        units: &[TextUnit],
        progress: F,
    ) -> Result<TranslationResult, TranslationError>
    where
        F: Fn(usize, usize) + Sync,
    {
        let normalized: Vec<String> = units.iter().map(|unit| normalize_text(&unit.text)).collect();

        // Distinct non-empty strings in first-seen order
        let mut unique: Vec<&str> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for text in normalized.iter().filter(|text| !text.is_empty()) {
            if seen.insert(text.as_str()) {
                unique.push(text.as_str());
            }
        }

        let mut resolved: HashMap<String, Result<String, FailureReason>> = HashMap::new();
        let mut misses: Vec<String> = Vec::new();
        let keys = unique.iter().map(|text| self.cache_key(text)).collect();
        let cached = self.cache.lookup_many(keys).await;
        for (text, found) in unique.iter().zip(cached) {
            match found {
                Some(translation) => {
                    resolved.insert(text.to_string(), Ok(translation));
                }
                None => misses.push(text.to_string()),
            }
        }
        let cache_hits = resolved.len();

        let chunks = Chunker::new(self.options.max_chunk_size).chunk(&misses);
        info!(
            "Translating {} units: {} unique, {} cached, {} chunks ({} -> {}, {}/{})",
            units.len(),
            unique.len(),
            cache_hits,
            chunks.len(),
            self.options.source_language,
            self.options.target_language,
            self.provider.name(),
            self.provider.model()
        );

        let outcomes = self.dispatch(&misses, &chunks, &progress).await?;

        for (chunk, outcome) in outcomes {
            for (text, result) in misses[chunk.range.clone()].iter().zip(outcome) {
                resolved.insert(text.clone(), result);
            }
        }

        let mut failed_units = 0;
        let outcomes: Vec<UnitOutcome> = units
            .iter()
            .zip(&normalized)
            .map(|(unit, text)| {
                let translation = if text.is_empty() {
                    Translation::translated(unit.text.clone())
                } else {
                    match resolved.get(text) {
                        Some(Ok(translated)) => Translation::translated(translated.clone()),
                        Some(Err(reason)) => Translation::untranslated(reason.clone()),
                        None => Translation::untranslated(FailureReason::new(
                            ErrorClass::Protocol,
                            "No result recorded for this text",
                        )),
                    }
                };
                if !translation.is_translated() {
                    failed_units += 1;
                }
                UnitOutcome {
                    locator: unit.locator,
                    source_text: unit.text.clone(),
                    translation,
                }
            })
            .collect();

        if failed_units > 0 {
            warn!("{} of {} units left untranslated", failed_units, units.len());
        }

        Ok(TranslationResult {
            outcomes,
            stats: TranslationStats {
                total_units: units.len(),
                unique_texts: unique.len(),
                cache_hits,
                dispatched_chunks: chunks.len(),
                failed_units,
            },
        })
    }

    /// Send chunks with bounded concurrency, storing each success in the cache
    async fn dispatch<F>(
        &self,
        misses: &[String],
        chunks: &[Chunk],
        progress: &F,
    ) -> Result<Vec<(Chunk, BatchOutcome)>, TranslationError>
    where
        F: Fn(usize, usize) + Sync,
    {
        let total = chunks.len();
        let completed = AtomicUsize::new(0);
        let aborted = AtomicBool::new(false);

        type ChunkResult = (Chunk, Option<Result<BatchOutcome, ProviderError>>);

        let results: Vec<ChunkResult> = stream::iter(chunks.iter().cloned())
            .map(|chunk| {
                let completed = &completed;
                let aborted = &aborted;
                async move {
                    if aborted.load(Ordering::SeqCst) {
                        debug!("Skipping chunk {} after fatal error", chunk.index + 1);
                        return (chunk, None);
                    }

                    if chunk.oversized {
                        debug!(
                            "Chunk {} holds a single {}-char string over the {}-char budget",
                            chunk.index + 1,
                            chunk.char_count,
                            self.options.max_chunk_size
                        );
                    }

                    let texts = &misses[chunk.range.clone()];
                    let result = self.batch.translate_with_recovery(texts).await;

                    match &result {
                        Ok(outcome) => {
                            let entries: Vec<(CacheKey, String)> = texts
                                .iter()
                                .zip(outcome)
                                .filter_map(|(text, result)| {
                                    result
                                        .as_ref()
                                        .ok()
                                        .map(|translation| (self.cache_key(text), translation.clone()))
                                })
                                .collect();
                            self.cache.store_batch_async(entries).await;
                        }
                        Err(_) => aborted.store(true, Ordering::SeqCst),
                    }

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    progress(done, total);
                    (chunk, Some(result))
                }
            })
            .buffer_unordered(self.options.max_workers.max(1))
            .collect()
            .await;

        let mut outcomes = Vec::with_capacity(results.len());
        let mut fatal = None;
        for (chunk, result) in results {
            match result {
                Some(Ok(outcome)) => outcomes.push((chunk, outcome)),
                Some(Err(e)) => {
                    fatal.get_or_insert(e);
                }
                None => {}
            }
        }

        if let Some(e) = fatal {
            error!("Translation aborted: {}", e);
            return Err(TranslationError::Provider(e));
        }

        outcomes.sort_by_key(|(chunk, _)| chunk.index);
        Ok(outcomes)
    }

    fn cache_key(&self, text: &str) -> CacheKey {
        CacheKey::new(
            text,
            &self.options.source_language,
            &self.options.target_language,
            self.provider.name(),
            self.provider.model(),
        )
    }
}
