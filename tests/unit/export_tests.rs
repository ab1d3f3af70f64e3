/*!
 * Tests for JSONL and readable-text export
 */

use anyhow::Result;
use serde_json::Value;
use capknow::chunking::{split_document, ChunkOptions};
use capknow::document::{CleanDocument, VideoMetadata};
use capknow::export::{KnowledgeExporter, CHUNKS_EXPORT_FILENAME, MASTER_EXPORT_FILENAME};
use capknow::file_utils::FileManager;
use crate::common;

fn sample_document() -> CleanDocument {
    let metadata = VideoMetadata {
        title: "How to: Test".to_string(),
        url: "https://example.com/watch?v=abc".to_string(),
        upload_date: "20240115".to_string(),
        channel: "Test Channel".to_string(),
        language: "en".to_string(),
    };
    let text = "First sentence of the document. Second sentence of the document.".to_string();
    CleanDocument::new(text, 12, metadata)
}

/// Test readable rendering includes the metadata header and the prose
#[test]
fn test_render_readable_withFullMetadata_shouldIncludeHeader() {
    let rendered = KnowledgeExporter::render_readable(&sample_document());

    assert!(rendered.starts_with("TITLE: How to: Test\n"));
    assert!(rendered.contains("URL:   https://example.com/watch?v=abc\n"));
    assert!(rendered.contains("DATE:  20240115\n"));
    assert!(rendered.contains(&"-".repeat(60)));
    assert!(rendered.ends_with("Second sentence of the document.\n"));
}

/// Test readable rendering omits header lines for absent metadata
#[test]
fn test_render_readable_withSparseMetadata_shouldOmitEmptyFields() {
    let document = CleanDocument::new(
        "Some text.".to_string(),
        1,
        VideoMetadata::with_title("Bare"),
    );
    let rendered = KnowledgeExporter::render_readable(&document);

    assert!(rendered.starts_with("TITLE: Bare\n"));
    assert!(!rendered.contains("URL:"));
    assert!(!rendered.contains("DATE:"));
}

/// Test exporting a document writes the readable file and one master record
#[test]
fn test_export_document_shouldWriteReadableAndMasterRecord() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let session_dir = temp_dir.path().join("session");
    let document = sample_document();

    let mut exporter = KnowledgeExporter::new(&session_dir)?;
    exporter.export_document(&document)?;
    exporter.flush()?;

    // Readable file named after the sanitized title
    let readable = session_dir.join("How_to__Test.txt");
    assert!(FileManager::file_exists(&readable));

    // Exactly one self-contained JSON record per line
    let master = FileManager::read_to_string(session_dir.join(MASTER_EXPORT_FILENAME))?;
    let lines: Vec<&str> = master.lines().collect();
    assert_eq!(lines.len(), 1);

    let record: Value = serde_json::from_str(lines[0])?;
    assert_eq!(record["content"], document.text);
    assert_eq!(record["source_cue_count"], 12);
    assert_eq!(record["metadata"]["title"], "How to: Test");
    assert_eq!(record["metadata"]["uploader"], "Test Channel");
    Ok(())
}

/// Test exporting chunks writes one record per chunk, in emission order
#[test]
fn test_export_chunks_shouldWriteOneRecordPerChunkInOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let session_dir = temp_dir.path().join("session");
    let document = sample_document();

    let options = ChunkOptions {
        max_chunk_chars: 40,
        overlap_chars: 10,
    };
    let chunks = split_document(&document, &options)?;
    assert!(chunks.len() > 1);

    let mut exporter = KnowledgeExporter::new(&session_dir)?;
    exporter.export_chunks(&document, &chunks)?;
    exporter.flush()?;

    let export = FileManager::read_to_string(session_dir.join(CHUNKS_EXPORT_FILENAME))?;
    let lines: Vec<&str> = export.lines().collect();
    assert_eq!(lines.len(), chunks.len());

    for (i, line) in lines.iter().enumerate() {
        let record: Value = serde_json::from_str(line)?;
        assert_eq!(record["index"], i as u64);
        assert_eq!(record["chunk_id"], format!("How_to__Test_{}", i));
        assert_eq!(record["content"], chunks[i].text);
        assert_eq!(record["metadata"]["title"], "How to: Test");
    }
    Ok(())
}
