// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use crate::app_controller::Controller;

mod app_config;
mod app_controller;
mod caption_processor;
mod chunking;
mod document;
mod errors;
mod export;
mod file_utils;
mod language_utils;
mod normalizer;

/// CLI Wrapper for JoinPolicy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliJoinPolicy {
    Space,
    Newline,
}

impl From<CliJoinPolicy> for normalizer::JoinPolicy {
    fn from(cli_policy: CliJoinPolicy) -> Self {
        match cli_policy {
            CliJoinPolicy::Space => normalizer::JoinPolicy::Space,
            CliJoinPolicy::Newline => normalizer::JoinPolicy::Newline,
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

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Process caption files into knowledge exports (default command)
    #[command(alias = "process")]
    Process(ProcessArgs),

    /// Generate shell completions for capknow
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ProcessArgs {
    /// Input caption file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output directory for session exports
    #[arg(short, long, default_value = "knowledge")]
    output_dir: PathBuf,

    /// Force overwrite of existing exports
    #[arg(short, long)]
    force_overwrite: bool,

    /// Caption language code (e.g., 'en', 'es', 'de')
    #[arg(short, long)]
    language: Option<String>,

    /// How committed caption lines are joined
    #[arg(short, long, value_enum)]
    join_policy: Option<CliJoinPolicy>,

    /// Maximum characters per chunk
    #[arg(long)]
    max_chunk_chars: Option<usize>,

    /// Characters of overlap between consecutive chunks
    #[arg(long)]
    overlap_chars: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// CapKnow - Caption Knowledge Extractor
///
/// Turns downloaded auto-caption files into deduplicated prose and
/// retrieval-ready JSONL chunk exports.
#[derive(Parser, Debug)]
#[command(name = "capknow")]
#[command(author = "CapKnow Team")]
#[command(version = "1.0.0")]
#[command(about = "Caption cleanup and chunking for retrieval pipelines")]
#[command(long_about = "CapKnow parses downloaded caption files, collapses the rolling-caption
redundancy of auto-generated subtitles, and exports clean prose plus
overlapping chunks as JSONL records.

EXAMPLES:
    capknow captions/                           # Process a folder of .vtt files
    capknow video.en.vtt                        # Process a single caption file
    capknow -l de captions/                     # Select German caption tracks
    capknow --max-chunk-chars 800 captions/     # Smaller chunks
    capknow -f captions/                        # Force overwrite existing exports
    capknow --log-level debug captions/         # Verbose logging
    capknow completions bash > capknow.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input caption file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output directory for session exports
    #[arg(short, long, default_value = "knowledge")]
    output_dir: PathBuf,

    /// Force overwrite of existing exports
    #[arg(short, long)]
    force_overwrite: bool,

    /// Caption language code (e.g., 'en', 'es', 'de')
    #[arg(short, long)]
    language: Option<String>,

    /// How committed caption lines are joined
    #[arg(short, long, value_enum)]
    join_policy: Option<CliJoinPolicy>,

    /// Maximum characters per chunk
    #[arg(long)]
    max_chunk_chars: Option<usize>,

    /// Characters of overlap between consecutive chunks
    #[arg(long)]
    overlap_chars: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
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

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
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
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "capknow", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Process(args)) => run_process(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

            let process_args = ProcessArgs {
                input_path,
                output_dir: cli.output_dir,
                force_overwrite: cli.force_overwrite,
                language: cli.language,
                join_policy: cli.join_policy,
                max_chunk_chars: cli.max_chunk_chars,
                overlap_chars: cli.overlap_chars,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_process(process_args).await
        }
    }
}

async fn run_process(options: ProcessArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(config_log_level.to_level_filter());
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        config
            .save(config_path)
            .context(format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    // Override config with CLI options if provided
    if let Some(language) = &options.language {
        config.language = language.clone();
    }
    if let Some(join_policy) = &options.join_policy {
        config.merge.join_policy = join_policy.clone().into();
    }
    if let Some(max_chunk_chars) = options.max_chunk_chars {
        config.chunking.max_chunk_chars = max_chunk_chars;
    }
    if let Some(overlap_chars) = options.overlap_chars {
        config.chunking.overlap_chars = overlap_chars;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    // Create controller
    let controller = Controller::with_config(config)?;

    // Run the controller with the input file(s) and output directory
    if options.input_path.is_file() {
        controller
            .run(options.input_path.clone(), options.output_dir, options.force_overwrite)
            .await
    } else if options.input_path.is_dir() {
        controller
            .run_folder(options.input_path.clone(), options.output_dir, options.force_overwrite)
            .await
    } else {
        Err(anyhow!("Input path does not exist: {:?}", options.input_path))
    }
}
