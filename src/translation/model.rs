/*!
 * Data model for a translation pass.
 *
 * A presentation is flattened into ordered `TextUnit`s. The coordinator
 * answers with a `TranslationResult` holding exactly one `UnitOutcome` per
 * input unit, in input order.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{ErrorClass, ProviderError};

/// Stable address of a text unit inside its document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitLocator {
    /// Slide index (0-based)
    pub section: usize,
    /// Paragraph index within the slide (0-based)
    pub position: usize,
}

impl UnitLocator {
    pub fn new(section: usize, position: usize) -> Self {
        Self { section, position }
    }
}

impl fmt::Display for UnitLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slide {} paragraph {}", self.section + 1, self.position + 1)
    }
}

/// A single extractable string and where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextUnit {
    pub locator: UnitLocator,
    pub text: String,
}

impl TextUnit {
    pub fn new(section: usize, position: usize, text: impl Into<String>) -> Self {
        Self {
            locator: UnitLocator::new(section, position),
            text: text.into(),
        }
    }
}

/// Why a unit was left untranslated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReason {
    pub class: ErrorClass,
    pub message: String,
}

impl FailureReason {
    pub fn new(class: ErrorClass, message: impl Into<String>) -> Self {
        Self {
            class,
            message: message.into(),
        }
    }
}

impl From<&ProviderError> for FailureReason {
    fn from(error: &ProviderError) -> Self {
        Self::new(error.class(), error.to_string())
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.class, self.message)
    }
}

/// Outcome for one unit: its translation or the untranslated sentinel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status")]
pub enum Translation {
    Translated { text: String },
    Untranslated { reason: FailureReason },
}

impl Translation {
    pub fn translated(text: impl Into<String>) -> Self {
        Self::Translated { text: text.into() }
    }

    pub fn untranslated(reason: FailureReason) -> Self {
        Self::Untranslated { reason }
    }

    /// Translated text, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Translated { text } => Some(text),
            Self::Untranslated { .. } => None,
        }
    }

    pub fn is_translated(&self) -> bool {
        matches!(self, Self::Translated { .. })
    }

    /// Failure reason, if the unit was not translated
    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            Self::Translated { .. } => None,
            Self::Untranslated { reason } => Some(reason),
        }
    }
}

/// Resolution of a single input unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOutcome {
    pub locator: UnitLocator,
    pub source_text: String,
    pub translation: Translation,
}

impl UnitOutcome {
    /// Text to write back: the translation, or the original when untranslated
    pub fn text_or_source(&self) -> &str {
        self.translation.text().unwrap_or(&self.source_text)
    }
}

/// Counters for a translation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationStats {
    /// Units supplied by the caller
    pub total_units: usize,
    /// Distinct non-empty normalized strings
    pub unique_texts: usize,
    /// Unique strings answered by the cache
    pub cache_hits: usize,
    /// Chunks sent to the provider
    pub dispatched_chunks: usize,
    /// Units left untranslated
    pub failed_units: usize,
}

/// Mapping from every input unit to its outcome, in input order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationResult {
    pub outcomes: Vec<UnitOutcome>,
    pub stats: TranslationStats,
}

impl TranslationResult {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Outcomes that ended untranslated
    pub fn failures(&self) -> impl Iterator<Item = &UnitOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.translation.is_translated())
    }

    /// Translated texts in input order, with `None` for failed units
    pub fn texts(&self) -> Vec<Option<&str>> {
        self.outcomes
            .iter()
            .map(|outcome| outcome.translation.text())
            .collect()
    }

    pub fn get(&self, locator: &UnitLocator) -> Option<&UnitOutcome> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.locator == *locator)
    }
}
