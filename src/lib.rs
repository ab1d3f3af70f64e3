/*!
 * # CapKnow - Caption Knowledge Extractor
 *
 * A Rust library for turning noisy auto-generated video captions into clean,
 * retrieval-ready knowledge exports.
 *
 * ## Features
 *
 * - Parse WebVTT/SRT caption streams into timed cues with markup stripped
 * - Collapse the word-by-word "rolling caption" redundancy of auto-captions
 *   via prefix-matching deduplication
 * - Split the cleaned prose into overlapping, sentence-respecting chunks
 *   with attached provenance metadata
 * - Export per-video readable text files plus consolidated JSONL records
 *   (one full document and one chunk per line)
 * - ISO 639-1 and ISO 639-2 language code support for track selection
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `caption_processor`: Caption stream parsing and markup stripping
 * - `normalizer`: Prefix-merge deduplication and document assembly
 * - `document`: Clean document and metadata model
 * - `chunking`: Overlapping chunk splitting
 * - `export`: JSONL and readable-text export
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod caption_processor;
pub mod chunking;
pub mod document;
pub mod errors;
pub mod export;
pub mod file_utils;
pub mod language_utils;
pub mod normalizer;

// Re-export main types for easier usage
pub use app_config::Config;
pub use caption_processor::{parse_caption_string, Cue};
pub use chunking::{split_document, Chunk, ChunkOptions};
pub use document::{CleanDocument, VideoMetadata};
pub use errors::{AppError, CaptionError, ChunkError, ExportError};
pub use export::KnowledgeExporter;
pub use language_utils::{get_language_name, language_codes_match};
pub use normalizer::{normalize, JoinPolicy, MergePolicy};
