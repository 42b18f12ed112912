use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::database::Repository;
use crate::errors::{ErrorClass, PresentationError, TranslationError};
use crate::file_utils::FileManager;
use crate::presentation::PptxDocument;
use crate::providers::{Provider, ProviderClient};
use crate::translation::concurrency::ProviderProfile;
use crate::translation::{CoordinatorOptions, TranslationCache, TranslationCoordinator, TranslationStats};

// @module: Application controller for presentation translation

/// Totals for one run over a file or folder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files translated and written
    pub translated_files: usize,
    /// Files skipped (existing output or legacy format)
    pub skipped_files: usize,
    /// Files that failed
    pub failed_files: usize,
    /// Units left untranslated across all files
    pub untranslated_units: usize,
}

impl RunSummary {
    /// True when every file succeeded and every unit was translated
    pub fn is_success(&self) -> bool {
        self.failed_files == 0 && self.untranslated_units == 0
    }
}

/// What happened to a single input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Translated(TranslationStats),
    Skipped(String),
}

/// Main application controller for presentation translation
///
/// One provider client, one cache and one coordinator are built up front and
/// shared by every file of a batch.
pub struct Controller<P: Provider = ProviderClient> {
    // @field: App configuration
    config: Config,
    // @field: Shared coordinator
    coordinator: TranslationCoordinator<P>,
}

impl Controller<ProviderClient> {
    // @method: Create a controller from configuration, failing fast on missing credentials
    pub fn with_config(config: Config) -> Result<Self> {
        let client = ProviderClient::from_config(&config.translation).map_err(TranslationError::Provider)?;
        let cache = Self::build_cache(&config)?;
        Ok(Self::with_provider(config, Arc::new(client), cache))
    }
}

impl<P: Provider> Controller<P> {
    /// Create a controller around an already-built provider and cache
    pub fn with_provider(config: Config, provider: Arc<P>, cache: TranslationCache) -> Self {
        let options = CoordinatorOptions::from_config(&config);
        let coordinator = TranslationCoordinator::new(provider, cache, options);
        Self { config, coordinator }
    }

    /// In-memory cache, or one backed by the sqlite store when persistence is on
    pub fn build_cache(config: &Config) -> Result<TranslationCache> {
        if !config.cache.enabled {
            return Ok(TranslationCache::new(false));
        }
        if !config.cache.persistent {
            return Ok(TranslationCache::new(true));
        }

        let repository = match &config.cache.path {
            Some(path) => Repository::open(path),
            None => Repository::new_default(),
        }
        .context("Failed to open translation cache database")?;
        info!("Using persistent translation cache at {:?}", repository.path());
        Ok(TranslationCache::with_store(repository))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn coordinator(&self) -> &TranslationCoordinator<P> {
        &self.coordinator
    }

    /// Translate a presentation or every presentation under a directory
    ///
    /// A failing file is logged and the batch continues, except for
    /// authentication failures which stop the run.
    pub async fn run(&self, target: &Path, force_overwrite: bool, keep_intermediate: bool) -> Result<RunSummary> {
        let start_time = Instant::now();
        let files = FileManager::find_presentations(target)?;
        if files.is_empty() {
            warn!("No presentations found under {:?}", target);
            return Ok(RunSummary::default());
        }

        info!(
            "Translating {} presentation(s) from {} to {} with {} ({})",
            files.len(),
            crate::language_utils::display_name(&self.config.source_language),
            crate::language_utils::display_name(&self.config.target_language),
            self.coordinator.provider().name(),
            self.coordinator.provider().model()
        );
        if let Some(rpm) = ProviderProfile::for_provider(self.config.translation.provider).target_rpm {
            debug!(
                "{} suggests at most {} requests per minute",
                self.config.translation.provider.display_name(),
                rpm
            );
        }

        let mut summary = RunSummary::default();
        for (i, file) in files.iter().enumerate() {
            info!("[{}/{}] {}", i + 1, files.len(), file.display());

            match self.process_file(file, force_overwrite, keep_intermediate).await {
                Ok(FileStatus::Translated(stats)) => {
                    summary.translated_files += 1;
                    summary.untranslated_units += stats.failed_units;
                }
                Ok(FileStatus::Skipped(reason)) => {
                    warn!("Skipping {}: {}", file.display(), reason);
                    summary.skipped_files += 1;
                }
                Err(e) if Self::is_auth_failure(&e) => {
                    error!("Authentication failed, stopping: {}", e);
                    return Err(e);
                }
                Err(e) => {
                    error!("Failed to translate {}: {:#}", file.display(), e);
                    summary.failed_files += 1;
                }
            }
        }

        let (hits, misses, rate) = self.coordinator.cache().stats();
        debug!("Cache: {} hits, {} misses ({:.1}% hit rate)", hits, misses, rate * 100.0);

        info!(
            "Done in {}: {} translated, {} skipped, {} failed, {} untranslated unit(s)",
            Self::format_duration(start_time.elapsed()),
            summary.translated_files,
            summary.skipped_files,
            summary.failed_files,
            summary.untranslated_units
        );

        Ok(summary)
    }

    /// Translate one presentation and write `<stem>_translated.pptx` next to it
    pub async fn process_file(&self, input: &Path, force_overwrite: bool, keep_intermediate: bool) -> Result<FileStatus> {
        let output = FileManager::translated_output_path(input);
        if output.exists() && !force_overwrite {
            return Ok(FileStatus::Skipped(
                "translation already exists (use -f to force overwrite)".to_string(),
            ));
        }

        let document = match PptxDocument::open(input) {
            Ok(document) => document,
            Err(PresentationError::Unsupported(reason)) => return Ok(FileStatus::Skipped(reason)),
            Err(e) => return Err(e).with_context(|| format!("Failed to open {:?}", input)),
        };

        let units = document.text_units()?;
        info!("Found {} text units across {} slides", units.len(), document.slide_count());

        let progress_bar = Self::chunk_progress_bar();
        let started = Instant::now();
        let result = self
            .coordinator
            .translate_units_with_progress(&units, |done, total| {
                progress_bar.set_length(total as u64);
                progress_bar.set_position(done as u64);
            })
            .await;
        progress_bar.finish_and_clear();
        let result = result?;

        document
            .write_translated(&result, &output)
            .with_context(|| format!("Failed to write {:?}", output))?;

        if keep_intermediate {
            let intermediate = FileManager::intermediate_path(input);
            FileManager::write_json(&intermediate, &result)?;
            debug!("Wrote intermediate results to {:?}", intermediate);
        }

        let stats = &result.stats;
        info!(
            "Translated in {}: {} units, {} unique, {} cached, {} chunks, {} failed -> {}",
            Self::format_duration(started.elapsed()),
            stats.total_units,
            stats.unique_texts,
            stats.cache_hits,
            stats.dispatched_chunks,
            stats.failed_units,
            output.display()
        );
        for failure in result.failures() {
            if let Some(reason) = failure.translation.failure() {
                warn!("  untranslated {}: {}", failure.locator, reason);
            }
        }

        Ok(FileStatus::Translated(result.stats))
    }

    fn is_auth_failure(error: &anyhow::Error) -> bool {
        matches!(
            error.downcast_ref::<TranslationError>(),
            Some(TranslationError::Provider(e)) if e.class() == ErrorClass::Auth
        )
    }

    fn chunk_progress_bar() -> ProgressBar {
        let progress_bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%)"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
