/*!
 * Translation chunking and caching service.
 *
 * This module turns extracted text units into translations using the
 * configured provider. It is split into several submodules:
 *
 * - `model`: Text units, outcomes and the translation result
 * - `cache`: Caching mechanisms for translations
 * - `chunker`: Greedy grouping of strings under a character budget
 * - `retry`: Bounded exponential backoff for transient failures
 * - `batch`: Chunk dispatch with per-unit failure isolation
 * - `coordinator`: The end-to-end translation pass
 * - `concurrency`: Provider-specific dispatch defaults
 */

// Re-export main types for easier usage
pub use self::batch::BatchTranslator;
pub use self::cache::{CacheKey, TranslationCache};
pub use self::chunker::{Chunk, Chunker};
pub use self::coordinator::{CoordinatorOptions, TranslationCoordinator};
pub use self::model::{
    FailureReason, TextUnit, Translation, TranslationResult, TranslationStats, UnitLocator,
    UnitOutcome,
};
pub use self::retry::RetryPolicy;

// Submodules
pub mod batch;
pub mod cache;
pub mod chunker;
pub mod concurrency;
pub mod coordinator;
pub mod model;
pub mod retry;
