/*!
 * Common test utilities for the capknow test suite
 */

use std::fs;
use std::path::PathBuf;
use anyhow::Result;
use tempfile::TempDir;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A rolling auto-caption stream the way caption downloaders emit it:
/// per-word timing tags, alignment settings, and the display line re-sent in
/// a longer form as the sentence grows.
pub fn rolling_caption_stream() -> &'static str {
    r#"WEBVTT
Kind: captions
Language: de

00:00:00.320 --> 00:00:02.950 align:start position:0%
das<00:00:00.560><c> heutige</c>

00:00:02.950 --> 00:00:05.270 align:start position:0%
das heutige Video<00:00:03.350><c> wird</c>

00:00:05.270 --> 00:00:07.860 align:start position:0%
das heutige Video wird gut.

00:00:07.860 --> 00:00:09.500 align:start position:0%
Danke<00:00:08.110><c> f&#39;rs</c><00:00:08.500><c> Zuschauen</c>
"#
}

/// A manually-authored caption stream with no rolling redundancy
pub fn plain_caption_stream() -> &'static str {
    r#"WEBVTT

00:00:01.000 --> 00:00:04.000
Hello world.

00:00:05.000 --> 00:00:09.000
Goodbye now.
"#
}

/// Creates a sample caption file plus its metadata sidecar, returning the
/// caption file path
pub fn create_test_caption_with_sidecar(dir: &PathBuf, base: &str, lang: &str) -> Result<PathBuf> {
    let caption_path = create_test_file(dir, &format!("{}.{}.vtt", base, lang), rolling_caption_stream())?;

    let sidecar = format!(
        r#"{{"title": "{} Title", "webpage_url": "https://example.com/watch?v=abc123", "upload_date": "20240115", "uploader": "Test Channel", "language": "{}"}}"#,
        base, lang
    );
    create_test_file(dir, &format!("{}.info.json", base), &sidecar)?;

    Ok(caption_path)
}
