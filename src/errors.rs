/*!
 * Error types for the capknow application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur while parsing a caption stream
#[derive(Error, Debug)]
pub enum CaptionError {
    /// Error when a timestamp cannot be parsed
    #[error("Invalid timestamp format: {0}")]
    InvalidTimestamp(String),

    /// Error when a cue has an inverted time range
    #[error("Invalid time range: end time {end_ms} < start time {start_ms}")]
    InvalidTimeRange {
        /// Cue start in milliseconds
        start_ms: u64,
        /// Cue end in milliseconds
        end_ms: u64,
    },
}

/// Errors that can occur while splitting a document into chunks
#[derive(Error, Debug)]
pub enum ChunkError {
    /// Error when the chunking options violate their preconditions
    #[error("Invalid chunk options: max_chunk_chars ({max_chunk_chars}) must be greater than overlap_chars ({overlap_chars}), and both must be positive")]
    InvalidOptions {
        /// Configured maximum characters per chunk
        max_chunk_chars: usize,
        /// Configured overlap between consecutive chunks
        overlap_chars: usize,
    },
}

/// Errors that can occur while writing export records
#[derive(Error, Debug)]
pub enum ExportError {
    /// Error from an underlying file operation
    #[error("Export I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error serializing a record to JSON
    #[error("Failed to serialize export record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from caption parsing
    #[error("Caption error: {0}")]
    Caption(#[from] CaptionError),

    /// Error from chunk splitting
    #[error("Chunk error: {0}")]
    Chunk(#[from] ChunkError),

    /// Error from export writing
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
