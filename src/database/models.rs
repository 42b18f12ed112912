/*!
 * Database entity models.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use serde::{Deserialize, Serialize};

/// Translation cache record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Database ID
    pub id: i64,
    /// SHA256 hash of the normalized source text
    pub source_text_hash: String,
    /// Normalized source text
    pub source_text: String,
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
    /// Translated text
    pub translated_text: String,
    /// Provider used for translation
    pub provider: String,
    /// Model used for translation
    pub model: String,
    /// Creation timestamp
    pub created_at: String,
    /// Number of cache hits
    pub hit_count: i64,
}

impl CacheRecord {
    /// Create a new cache record, hashing the source text
    pub fn new(
        source_text: &str,
        source_language: &str,
        target_language: &str,
        translated_text: &str,
        provider: &str,
        model: &str,
    ) -> Self {
        Self {
            id: 0, // Will be assigned by database
            source_text_hash: super::Repository::hash_text(source_text),
            source_text: source_text.to_string(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            translated_text: translated_text.to_string(),
            provider: provider.to_string(),
            model: model.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            hit_count: 0,
        }
    }
}
