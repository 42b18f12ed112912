// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info};
use std::io::Write;
use std::process::ExitCode;

use ppt_translator::Config;
use ppt_translator::app_config::{LogLevel, TranslationProvider};
use ppt_translator::app_controller::Controller;
use ppt_translator::file_utils::FileManager;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    #[value(name = "deepseek")]
    DeepSeek,
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
    Grok,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::DeepSeek => TranslationProvider::DeepSeek,
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
            CliTranslationProvider::Grok => TranslationProvider::Grok,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for ppt-translator
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Presentation file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<String>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Source language code (e.g., 'zh', 'en', 'zh-TW')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Maximum characters per request
    #[arg(long)]
    max_chunk_size: Option<usize>,

    /// Maximum concurrent requests
    #[arg(long)]
    max_workers: Option<usize>,

    /// Keep `<stem>_translation.json` with every unit's outcome
    #[arg(long)]
    keep_intermediate: bool,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Persist the translation cache in SQLite between runs
    #[arg(long, conflicts_with = "no_cache")]
    persistent_cache: bool,

    /// Disable the translation cache
    #[arg(long)]
    no_cache: bool,
}

/// ppt-translator - PowerPoint translation with LLM providers
///
/// Extracts the text of `.pptx` slides, translates it in cached, de-duplicated
/// chunks and writes `<name>_translated.pptx` with the original formatting.
#[derive(Parser, Debug)]
#[command(name = "ppt-translator")]
#[command(version)]
#[command(about = "Translate PowerPoint presentations with AI providers")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "ppt-translator extracts the text of PowerPoint slides and translates it with AI providers.

EXAMPLES:
    ppt-translator deck.pptx                        # Translate using default config
    ppt-translator -f deck.pptx                     # Force overwrite existing output
    ppt-translator -p openai -m gpt-5 deck.pptx     # Use specific provider and model
    ppt-translator -s zh -t en slides/              # Translate a whole directory
    ppt-translator --persistent-cache deck.pptx     # Reuse translations across runs
    ppt-translator completions bash > ppt.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    deepseek  - DeepSeek API (DEEPSEEK_API_KEY)
    openai    - OpenAI API (OPENAI_API_KEY)
    anthropic - Anthropic Claude API (ANTHROPIC_API_KEY)
    grok      - xAI Grok API (GROK_API_KEY)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    args: TranslateArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // The logger accepts everything; the effective level is set through max_level
    if CustomLogger::init(LevelFilter::Trace).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "ppt-translator", &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    match run_translate(cli.args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every file and every unit was translated
async fn run_translate(options: TranslateArgs) -> Result<bool> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let input_path = options
        .input_path
        .as_deref()
        .map(FileManager::clean_path)
        .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

    let mut config = Config::load_or_create(&options.config_path)?;
    apply_overrides(&mut config, &options);

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    config.validate().context("Configuration validation failed")?;

    if !input_path.exists() {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    let controller = Controller::with_config(config)?;
    let summary = controller
        .run(&input_path, options.force_overwrite, options.keep_intermediate)
        .await?;

    if !summary.is_success() {
        info!(
            "{} file(s) failed, {} unit(s) left untranslated",
            summary.failed_files, summary.untranslated_units
        );
    }
    Ok(summary.is_success())
}

// @modifies: Config with command-line overrides
fn apply_overrides(config: &mut Config, options: &TranslateArgs) {
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(model) = &options.model {
        config.translation.active_provider_config_mut().model = model.clone();
    }
    if let Some(max_chunk_size) = options.max_chunk_size {
        config.translation.active_provider_config_mut().max_chars_per_request = max_chunk_size;
    }
    if let Some(max_workers) = options.max_workers {
        config.translation.active_provider_config_mut().concurrent_requests = max_workers;
    }
    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }
    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if options.persistent_cache {
        config.cache.enabled = true;
        config.cache.persistent = true;
    }
    if options.no_cache {
        config.cache.enabled = false;
    }
}

