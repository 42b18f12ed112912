/*!
 * Repository layer for database operations.
 *
 * This module provides a high-level API for the translation cache table,
 * abstracting away the SQL details and providing type-safe access.
 */

use anyhow::Result;
use log::debug;
use rusqlite::{params, OptionalExtension};
use sha2::{Digest, Sha256};
use std::path::Path;

use super::connection::DatabaseConnection;
use super::models::CacheRecord;

/// Repository for database operations
#[derive(Clone, Debug)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository backed by the given database file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = DatabaseConnection::new(path)?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Database file backing this repository
    pub fn path(&self) -> &Path {
        self.db.path()
    }

    // =========================================================================
    // Cache Operations
    // =========================================================================

    /// Compute SHA256 hash of text
    pub fn hash_text(text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Get a cached translation, bumping its hit count
    pub fn get_cached_translation(
        &self,
        source_text: &str,
        source_language: &str,
        target_language: &str,
        provider: &str,
        model: &str,
    ) -> Result<Option<String>> {
        let source_text_hash = Self::hash_text(source_text);

        self.db.execute(|conn| {
            let result: Option<(i64, String)> = conn
                .query_row(
                    r#"
                    SELECT id, translated_text
                    FROM translation_cache
                    WHERE source_text_hash = ?1
                      AND source_language = ?2
                      AND target_language = ?3
                      AND provider = ?4
                      AND model = ?5
                    "#,
                    params![source_text_hash, source_language, target_language, provider, model],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            if let Some((id, translated_text)) = result {
                conn.execute(
                    "UPDATE translation_cache SET hit_count = hit_count + 1 WHERE id = ?1",
                    [id],
                )?;
                debug!("Persistent cache hit for {}", &source_text_hash[..12]);
                Ok(Some(translated_text))
            } else {
                Ok(None)
            }
        })
    }

    /// Store a translation in the cache, overwriting a different earlier value
    pub fn cache_translation(&self, record: &CacheRecord) -> Result<()> {
        self.cache_translations(std::slice::from_ref(record))
    }

    /// Store several translations in one transaction
    pub fn cache_translations(&self, records: &[CacheRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        self.db.transaction(|tx| {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO translation_cache (
                    source_text_hash, source_text, source_language, target_language,
                    translated_text, provider, model, created_at, hit_count
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ON CONFLICT(source_text_hash, source_language, target_language, provider, model)
                DO UPDATE SET translated_text = excluded.translated_text
                "#,
            )?;

            for record in records {
                stmt.execute(params![
                    record.source_text_hash,
                    record.source_text,
                    record.source_language,
                    record.target_language,
                    record.translated_text,
                    record.provider,
                    record.model,
                    record.created_at,
                    record.hit_count,
                ])?;
            }

            debug!("Persisted {} cache entries", records.len());
            Ok(())
        })
    }

    /// Get cache statistics
    pub fn get_cache_stats(&self) -> Result<CacheStats> {
        self.db.execute(|conn| {
            let total_entries: i64 =
                conn.query_row("SELECT COUNT(*) FROM translation_cache", [], |row| row.get(0))?;

            let total_hits: i64 = conn.query_row(
                "SELECT COALESCE(SUM(hit_count), 0) FROM translation_cache",
                [],
                |row| row.get(0),
            )?;

            Ok(CacheStats {
                total_entries,
                total_hits,
            })
        })
    }

    /// Clear the translation cache
    pub fn clear_cache(&self) -> Result<i64> {
        self.db.execute(|conn| {
            let deleted = conn.execute("DELETE FROM translation_cache", [])?;
            Ok(deleted as i64)
        })
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Total number of cache entries
    pub total_entries: i64,
    /// Total number of cache hits
    pub total_hits: i64,
}
