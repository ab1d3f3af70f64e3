use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::chunking::split_document;
use crate::document::VideoMetadata;
use crate::export::{KnowledgeExporter, MASTER_EXPORT_FILENAME};
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::normalizer;

// @module: Application controller for caption processing

/// Caption file extensions recognized in folder mode
const CAPTION_EXTENSIONS: &[&str] = &["vtt", "srt"];

/// Main application controller for the caption-to-knowledge pipeline
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.language.is_empty()
    }

    /// Run the pipeline for a single caption file.
    ///
    /// The session directory is derived from the file stem and the configured
    /// language; exports land there next to the readable text file.
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !input_file.exists() {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }

        FileManager::ensure_dir(&output_dir)?;

        let stem = input_file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "captions".to_string());
        let base = FileManager::strip_language_suffix(&stem);
        let session_dir = self.session_dir(&output_dir, &base);

        if self.session_exists(&session_dir) && !force_overwrite {
            warn!("Skipping file, exports already exist in {:?} (use -f to force overwrite)", session_dir);
            return Ok(());
        }

        let mut exporter = KnowledgeExporter::new(&session_dir)?;
        let chunk_count = self.process_file(&input_file, &mut exporter)?;
        exporter.flush()?;

        info!(
            "Processed {:?} into {:?} ({} chunks) in {}",
            input_file.file_name().unwrap_or_default(),
            session_dir,
            chunk_count,
            Self::format_duration(start_time.elapsed())
        );

        Ok(())
    }

    /// Run the pipeline in folder mode, processing all caption files in a
    /// directory into one consolidated session.
    pub async fn run_folder(&self, input_dir: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !input_dir.exists() {
            return Err(anyhow::anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        // Find all caption files in the directory (recursive)
        let mut caption_files = Vec::new();
        for ext in CAPTION_EXTENSIONS {
            let mut files = FileManager::find_files(&input_dir, ext)?;
            caption_files.append(&mut files);
        }

        // Keep only files for the configured language (files without a
        // language suffix are kept - single-track downloads omit it)
        caption_files.retain(|path| match FileManager::caption_language_code(path) {
            Some(code) => language_utils::language_codes_match(&code, &self.config.language),
            None => true,
        });
        caption_files.sort();

        if caption_files.is_empty() {
            return Err(anyhow::anyhow!(
                "No caption files found for language '{}' in directory: {:?}",
                self.config.language,
                input_dir
            ));
        }

        let source_name = input_dir
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "knowledge".to_string());
        let session_dir = self.session_dir(&output_dir, &source_name);

        if self.session_exists(&session_dir) && !force_overwrite {
            warn!("Skipping folder, exports already exist in {:?} (use -f to force overwrite)", session_dir);
            return Ok(());
        }

        FileManager::ensure_dir(&output_dir)?;
        let mut exporter = KnowledgeExporter::new(&session_dir)?;

        // Create multi-progress instance for multiple file processing
        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(caption_files.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Processing captions");

        // Track success and failure counts
        let mut success_count = 0;
        let mut empty_count = 0;
        let mut error_count = 0;
        let mut total_chunks = 0;

        for caption_file in caption_files.iter() {
            let file_name = caption_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            match self.process_file(caption_file, &mut exporter) {
                Ok(0) => {
                    empty_count += 1;
                }
                Ok(chunk_count) => {
                    success_count += 1;
                    total_chunks += chunk_count;
                }
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    error_count += 1;
                }
            }

            folder_pb.inc(1);
        }

        exporter.flush()?;
        folder_pb.finish_with_message("Folder processing complete");

        let duration = start_time.elapsed();
        let summary_message = format!(
            "Folder processing completed: {} processed ({} chunks), {} empty, {} errors",
            success_count, total_chunks, empty_count, error_count
        );
        info!("{}", summary_message);

        // Append the summary to the session log for later inspection
        let session_log = session_dir.join("capknow.session.log");
        let log_line = format!(
            "{} {} - Duration: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            summary_message,
            Self::format_duration(duration)
        );
        if let Err(e) = FileManager::append_line(&session_log, &log_line) {
            warn!("Failed to write session log: {}", e);
        }

        Ok(())
    }

    /// Process one caption file: normalize, split and export.
    ///
    /// Returns the number of chunks exported; 0 means the stream held no
    /// usable text (which is not an error).
    fn process_file(&self, caption_file: &Path, exporter: &mut KnowledgeExporter) -> Result<usize> {
        let content = FileManager::read_to_string(caption_file)?;
        let metadata = self.load_metadata(caption_file);

        let document = normalizer::normalize(&content, &self.config.merge, metadata);

        if document.is_empty() {
            warn!("No usable caption text in {:?}", caption_file.file_name().unwrap_or_default());
            return Ok(0);
        }

        exporter.export_document(&document)?;

        let chunks = split_document(&document, &self.config.chunking)
            .context("Chunk splitting failed")?;
        exporter.export_chunks(&document, &chunks)?;

        debug!(
            "Processed {:?}: {} cues -> {} chars -> {} chunks",
            caption_file.file_name().unwrap_or_default(),
            document.source_cue_count,
            document.text.chars().count(),
            chunks.len()
        );

        Ok(chunks.len())
    }

    /// Load metadata for a caption file from its `.info.json` sidecar.
    ///
    /// The sidecar is written by the caption downloader next to the caption
    /// file, named after the title without the language suffix. A missing or
    /// unreadable sidecar degrades to title-from-filename metadata.
    fn load_metadata(&self, caption_file: &Path) -> VideoMetadata {
        let stem = caption_file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let base = FileManager::strip_language_suffix(&stem);

        let sidecar = caption_file
            .parent()
            .unwrap_or(Path::new("."))
            .join(format!("{}.info.json", base));

        let mut metadata = if FileManager::file_exists(&sidecar) {
            match FileManager::read_to_string(&sidecar)
                .and_then(|content| serde_json::from_str::<VideoMetadata>(&content).map_err(Into::into))
            {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!("Failed to read metadata sidecar {:?}: {}", sidecar, e);
                    VideoMetadata::default()
                }
            }
        } else {
            VideoMetadata::default()
        };

        if metadata.title.is_empty() {
            metadata.title = base;
        }
        if metadata.language.is_empty() {
            metadata.language = FileManager::caption_language_code(caption_file)
                .unwrap_or_else(|| self.config.language.clone());
        }

        metadata
    }

    /// Session directory for a source name and the configured language
    fn session_dir(&self, output_dir: &Path, source_name: &str) -> PathBuf {
        let slug = FileManager::sanitize_filename(source_name);
        output_dir.join(format!("{}_{}", slug, self.config.language))
    }

    /// Whether a session directory already holds exports
    fn session_exists(&self, session_dir: &Path) -> bool {
        session_dir.join(MASTER_EXPORT_FILENAME).exists()
    }

    /// Format a duration for summary messages
    fn format_duration(duration: std::time::Duration) -> String {
        let seconds = duration.as_secs();
        if seconds >= 60 {
            let minutes = seconds / 60;
            let seconds = seconds % 60;
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
