/*!
 * Translation caching functionality.
 *
 * This module provides caching mechanisms for translations to avoid
 * redundant API calls. Entries live in memory for the whole run and
 * can optionally read through to, and be written to, a SQLite store.
 */

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::{debug, warn};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;

use crate::database::models::CacheRecord;
use crate::database::Repository;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Invalid whitespace regex")
});

/// Trim and collapse whitespace runs to one space
pub fn normalize_text(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

/// Cache key combining normalized text, language pair, provider and model
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Normalized source text
    pub source_text: String,

    /// Source language code
    pub source_language: String,

    /// Target language code
    pub target_language: String,

    /// Provider identifier
    pub provider: String,

    /// Model identifier
    pub model: String,
}

impl CacheKey {
    /// Create a new cache key, normalizing the text and language codes
    pub fn new(
        source_text: &str,
        source_language: &str,
        target_language: &str,
        provider: &str,
        model: &str,
    ) -> Self {
        Self {
            source_text: normalize_text(source_text),
            source_language: source_language.trim().to_lowercase(),
            target_language: target_language.trim().to_lowercase(),
            provider: provider.to_string(),
            model: model.to_string(),
        }
    }

    fn to_record(&self, translation: &str) -> CacheRecord {
        CacheRecord::new(
            &self.source_text,
            &self.source_language,
            &self.target_language,
            translation,
            &self.provider,
            &self.model,
        )
    }
}

/// Translation cache for storing and retrieving translations
///
/// Clones share the same map and counters.
#[derive(Clone, Debug)]
pub struct TranslationCache {
    /// Internal cache storage
    cache: Arc<RwLock<HashMap<CacheKey, String>>>,

    /// Cache hit counter
    hits: Arc<AtomicUsize>,

    /// Cache miss counter
    misses: Arc<AtomicUsize>,

    /// Optional SQLite store shared by every clone
    store: Option<Repository>,

    /// Whether caching is enabled
    enabled: bool,
}

impl TranslationCache {
    /// Create a new in-memory translation cache
    pub fn new(enabled: bool) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(AtomicUsize::new(0)),
            misses: Arc::new(AtomicUsize::new(0)),
            store: None,
            enabled,
        }
    }

    /// Create a cache that reads through to a persistent store
    pub fn with_store(store: Repository) -> Self {
        Self {
            store: Some(store),
            ..Self::new(true)
        }
    }

    /// Get a translation from the cache
    pub fn lookup(&self, key: &CacheKey) -> Option<String> {
        if !self.enabled {
            return None;
        }

        if let Some(translation) = self.cache.read().get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(
                "Cache hit for '{}' ({} -> {})",
                truncate_text(&key.source_text, 30),
                key.source_language,
                key.target_language
            );
            return Some(translation.clone());
        }

        if let Some(translation) = self.lookup_persistent(key) {
            self.cache.write().insert(key.clone(), translation.clone());
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Some(translation);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(
            "Cache miss for '{}' ({} -> {})",
            truncate_text(&key.source_text, 30),
            key.source_language,
            key.target_language
        );
        None
    }

    fn lookup_persistent(&self, key: &CacheKey) -> Option<String> {
        let store = self.store.as_ref()?;
        match store.get_cached_translation(
            &key.source_text,
            &key.source_language,
            &key.target_language,
            &key.provider,
            &key.model,
        ) {
            Ok(found) => found,
            Err(e) => {
                warn!("Persistent cache lookup failed: {}", e);
                None
            }
        }
    }

    /// Store a translation in the cache
    pub fn store(&self, key: CacheKey, translation: &str) {
        self.store_batch(vec![(key, translation.to_string())]);
    }

    /// Store several translations at once
    ///
    /// The in-memory map is updated under one write lock and the persistent
    /// store, if any, in one transaction. Persistence errors are only logged.
    pub fn store_batch(&self, entries: Vec<(CacheKey, String)>) {
        if !self.enabled || entries.is_empty() {
            return;
        }

        if let Some(store) = &self.store {
            let records: Vec<CacheRecord> = entries
                .iter()
                .map(|(key, translation)| key.to_record(translation))
                .collect();
            if let Err(e) = store.cache_translations(&records) {
                warn!("Failed to persist {} cache entries: {}", records.len(), e);
            }
        }

        let count = entries.len();
        let mut cache = self.cache.write();
        for (key, translation) in entries {
            cache.insert(key, translation);
        }
        debug!("Cached {} translations", count);
    }

    /// Look up several keys from async code
    ///
    /// With a persistent store the lookups run on the blocking pool so a
    /// SQLite read never stalls the runtime.
    pub async fn lookup_many(&self, keys: Vec<CacheKey>) -> Vec<Option<String>> {
        if self.store.is_none() {
            return keys.iter().map(|key| self.lookup(key)).collect();
        }

        let cache = self.clone();
        let count = keys.len();
        match tokio::task::spawn_blocking(move || keys.iter().map(|key| cache.lookup(key)).collect()).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Persistent cache lookup task failed: {}", e);
                vec![None; count]
            }
        }
    }

    /// Store several translations from async code
    ///
    /// With a persistent store the commit runs on the blocking pool.
    pub async fn store_batch_async(&self, entries: Vec<(CacheKey, String)>) {
        if self.store.is_none() {
            self.store_batch(entries);
            return;
        }

        let cache = self.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || cache.store_batch(entries)).await {
            warn!("Persistent cache store task failed: {}", e);
        }
    }

    /// Get cache statistics as (hits, misses, hit rate)
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Clear the in-memory cache and counters
    pub fn clear(&self) {
        self.cache.write().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);

        debug!("Translation cache cleared");
    }

    /// Get the number of entries held in memory
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    /// Check if the cache is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Check if entries are persisted between runs
    pub fn is_persistent(&self) -> bool {
        self.store.is_some()
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Truncate text to a maximum number of characters with ellipsis
pub(crate) fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
