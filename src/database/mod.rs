/*!
 * Database module for the persistent translation cache.
 *
 * Translations obtained in one run are stored in SQLite so that later runs
 * over the same decks skip paid provider calls.
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::DatabaseConnection;
pub use repository::{CacheStats, Repository};
