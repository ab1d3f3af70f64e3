use anyhow::{Result, Context};
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use regex::Regex;
use once_cell::sync::Lazy;

// @module: File and directory utilities

// @const: Characters not allowed in generated filenames
static UNSAFE_FILENAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\-]").unwrap());

// @const: Trailing caption language suffix (`.en`, `.en-US`, `.deu`)
static LANGUAGE_SUFFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.[a-z]{2,3}(-[a-zA-Z0-9]+)?$").unwrap()
});

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Find files with a specific extension in a directory (recursive)
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Append a single line to a file, creating it if needed
    pub fn append_line<P: AsRef<Path>>(path: P, line: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open file for append: {:?}", path.as_ref()))?;

        writeln!(file, "{}", line)
            .with_context(|| format!("Failed to append to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Sanitize a title into a filesystem- and identifier-safe slug.
    ///
    /// Everything outside `[A-Za-z0-9_-]` becomes an underscore and the
    /// result is capped at 100 characters, matching the export naming scheme.
    pub fn sanitize_filename(title: &str) -> String {
        let sanitized = UNSAFE_FILENAME_REGEX.replace_all(title, "_").into_owned();
        sanitized.chars().take(100).collect()
    }

    /// Strip a trailing caption language suffix from a file stem.
    ///
    /// Caption downloaders name files `<title>.<lang>.vtt`; the stem after
    /// removing `.vtt` still carries `.<lang>`, which must go before the
    /// metadata sidecar `<title>.info.json` can be located.
    pub fn strip_language_suffix(stem: &str) -> String {
        LANGUAGE_SUFFIX_REGEX.replace(stem, "").into_owned()
    }

    /// Extract the language code from a caption file path, when present
    pub fn caption_language_code(path: &Path) -> Option<String> {
        let stem = path.file_stem()?.to_string_lossy();
        LANGUAGE_SUFFIX_REGEX
            .find(&stem)
            .map(|m| m.as_str().trim_start_matches('.').to_string())
    }
}
