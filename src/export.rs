use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use log::debug;
use serde::Serialize;

use crate::chunking::Chunk;
use crate::document::{CleanDocument, VideoMetadata};
use crate::errors::ExportError;
use crate::file_utils::FileManager;

// @module: JSONL and readable-text export of documents and chunks

/// Consolidated full-document export filename
pub const MASTER_EXPORT_FILENAME: &str = "knowledge_master.jsonl";

/// Consolidated chunk export filename
pub const CHUNKS_EXPORT_FILENAME: &str = "knowledge_chunks.jsonl";

/// One full-document record in the master export
#[derive(Debug, Serialize)]
struct MasterRecord<'a> {
    content: &'a str,
    source_cue_count: usize,
    metadata: &'a VideoMetadata,
}

/// One chunk record in the chunk export.
///
/// Records are self-contained (each carries its own metadata) so the export
/// file can be consumed independently, one JSON object per line.
#[derive(Debug, Serialize)]
struct ChunkRecord<'a> {
    chunk_id: String,
    index: usize,
    char_overlap_with_previous: usize,
    content: &'a str,
    metadata: &'a VideoMetadata,
}

/// Writes per-video readable text files plus the two consolidated JSONL
/// exports for a session directory.
pub struct KnowledgeExporter {
    session_dir: PathBuf,
    master_writer: BufWriter<File>,
    chunks_writer: BufWriter<File>,
}

impl KnowledgeExporter {
    /// Open an exporter for a session directory, truncating previous exports
    pub fn new<P: AsRef<Path>>(session_dir: P) -> Result<Self, ExportError> {
        let session_dir = session_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&session_dir)?;

        let master_writer = BufWriter::new(File::create(session_dir.join(MASTER_EXPORT_FILENAME))?);
        let chunks_writer = BufWriter::new(File::create(session_dir.join(CHUNKS_EXPORT_FILENAME))?);

        Ok(KnowledgeExporter {
            session_dir,
            master_writer,
            chunks_writer,
        })
    }

    /// Path of the readable text file for a document
    pub fn readable_path(&self, document: &CleanDocument) -> PathBuf {
        let slug = FileManager::sanitize_filename(&document.metadata.title);
        self.session_dir.join(format!("{}.txt", slug))
    }

    /// Export one document: readable text file plus one master JSONL record
    pub fn export_document(&mut self, document: &CleanDocument) -> Result<(), ExportError> {
        let readable = Self::render_readable(document);
        std::fs::write(self.readable_path(document), readable)?;

        let record = MasterRecord {
            content: &document.text,
            source_cue_count: document.source_cue_count,
            metadata: &document.metadata,
        };
        let line = serde_json::to_string(&record)?;
        writeln!(self.master_writer, "{}", line)?;

        debug!("Exported document '{}'", document.metadata.title);
        Ok(())
    }

    /// Export the chunks of a document as JSONL records, in emission order
    pub fn export_chunks(&mut self, document: &CleanDocument, chunks: &[Chunk]) -> Result<(), ExportError> {
        let slug = FileManager::sanitize_filename(&document.metadata.title);

        for chunk in chunks {
            let record = ChunkRecord {
                chunk_id: format!("{}_{}", slug, chunk.index),
                index: chunk.index,
                char_overlap_with_previous: chunk.char_overlap_with_previous,
                content: &chunk.text,
                metadata: &chunk.metadata,
            };
            let line = serde_json::to_string(&record)?;
            writeln!(self.chunks_writer, "{}", line)?;
        }

        debug!(
            "Exported {} chunks for document '{}'",
            chunks.len(),
            document.metadata.title
        );
        Ok(())
    }

    /// Flush both consolidated exports to disk
    pub fn flush(&mut self) -> Result<(), ExportError> {
        self.master_writer.flush()?;
        self.chunks_writer.flush()?;
        Ok(())
    }

    /// Render a document as a human-readable text file with a metadata header
    pub fn render_readable(document: &CleanDocument) -> String {
        let mut output = String::new();
        output.push_str(&format!("TITLE: {}\n", document.metadata.title));
        if !document.metadata.url.is_empty() {
            output.push_str(&format!("URL:   {}\n", document.metadata.url));
        }
        if !document.metadata.upload_date.is_empty() {
            output.push_str(&format!("DATE:  {}\n", document.metadata.upload_date));
        }
        output.push_str(&"-".repeat(60));
        output.push_str("\n\n");
        output.push_str(&document.text);
        output.push('\n');
        output
    }
}
