/*!
 * # ppt-translator - Presentation translation with LLM providers
 *
 * A Rust library for translating the text of PowerPoint decks while keeping
 * their formatting intact.
 *
 * ## Features
 *
 * - Extract paragraph text from `.pptx` slides and write translations back
 * - Translate using several AI providers:
 *   - DeepSeek
 *   - OpenAI API
 *   - Anthropic API
 *   - Grok (xAI)
 * - Chunking under a per-request character budget
 * - De-duplication through an in-memory cache, optionally persisted in SQLite
 * - Concurrent chunk dispatch with retries for transient failures
 * - ISO 639-1 and ISO 639-2 language code support, with region subtags
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `presentation`: PPTX archive reading and rewriting
 * - `translation`: The chunking-and-caching translation service:
 *   - `translation::coordinator`: End-to-end translation pass
 *   - `translation::chunker`: Request-sized grouping of strings
 *   - `translation::cache`: Caching mechanisms for translations
 *   - `translation::batch`: Per-chunk recovery
 * - `database`: SQLite persistence for the translation cache
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `providers`: Client implementations for the LLM providers
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod database;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod presentation;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunSummary};
pub use errors::{ErrorClass, PresentationError, ProviderError, TranslationError};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t};
pub use presentation::PptxDocument;
pub use providers::{Provider, ProviderClient};
pub use translation::{TextUnit, TranslationCoordinator, TranslationResult};
