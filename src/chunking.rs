use serde::{Deserialize, Serialize};
use log::debug;

use crate::document::{CleanDocument, VideoMetadata};
use crate::errors::ChunkError;

// @module: Overlapping, sentence-respecting chunk splitting

/// Options controlling the chunk split.
///
/// Sizes are counted in characters (not bytes), so multi-byte text never
/// splits inside a code point and the result is deterministic regardless of
/// encoding.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct ChunkOptions {
    /// Maximum characters per chunk
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,

    /// Characters of context repeated between consecutive chunks
    #[serde(default = "default_overlap_chars")]
    pub overlap_chars: usize,
}

fn default_max_chunk_chars() -> usize {
    1000
}

fn default_overlap_chars() -> usize {
    100
}

impl Default for ChunkOptions {
    fn default() -> Self {
        ChunkOptions {
            max_chunk_chars: default_max_chunk_chars(),
            overlap_chars: default_overlap_chars(),
        }
    }
}

impl ChunkOptions {
    // @validates: max_chunk_chars > overlap_chars > 0
    pub fn validate(&self) -> Result<(), ChunkError> {
        if self.overlap_chars == 0 || self.max_chunk_chars <= self.overlap_chars {
            return Err(ChunkError::InvalidOptions {
                max_chunk_chars: self.max_chunk_chars,
                overlap_chars: self.overlap_chars,
            });
        }
        Ok(())
    }
}

/// A bounded slice of a clean document, prepared for retrieval use
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// 0-based, order-significant position within the document
    pub index: usize,

    /// Chunk text, at most `max_chunk_chars` characters
    pub text: String,

    /// Characters shared with the previous chunk (0 for the first chunk)
    pub char_overlap_with_previous: usize,

    /// Metadata copied verbatim from the parent document
    pub metadata: VideoMetadata,
}

impl Chunk {
    /// The portion of this chunk not already covered by the previous chunk.
    ///
    /// Concatenating these spans in index order reconstructs the parent
    /// document text exactly.
    pub fn unique_span(&self) -> &str {
        let byte_offset = self
            .text
            .char_indices()
            .nth(self.char_overlap_with_previous)
            .map(|(offset, _)| offset)
            .unwrap_or(self.text.len());
        &self.text[byte_offset..]
    }
}

/// Split a clean document into overlapping, sentence-respecting chunks.
///
/// Chunks are cut at the last sentence boundary (end-of-sentence punctuation
/// followed by whitespace, or a newline) inside the current window, falling
/// back to a hard cut at the character limit when no boundary is usable. Each
/// chunk after the first starts `overlap_chars` before the previous cut, so
/// the overlap never compounds across more than one boundary. The split is
/// lossless: the non-overlapping spans concatenate to the input text.
pub fn split_document(document: &CleanDocument, options: &ChunkOptions) -> Result<Vec<Chunk>, ChunkError> {
    options.validate()?;

    let text = document.text.as_str();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let chars: Vec<char> = text.chars().collect();
    let total_chars = chars.len();

    // Byte offset of every char boundary, with the text length as sentinel
    let mut byte_offsets: Vec<usize> = text.char_indices().map(|(offset, _)| offset).collect();
    byte_offsets.push(text.len());

    if total_chars <= options.max_chunk_chars {
        return Ok(vec![Chunk {
            index: 0,
            text: text.to_string(),
            char_overlap_with_previous: 0,
            metadata: document.metadata.clone(),
        }]);
    }

    let mut chunks = Vec::new();
    let mut start = 0usize;
    let mut prev_end = 0usize;

    while start < total_chars {
        let target_end = (start + options.max_chunk_chars).min(total_chars);

        let end = if target_end < total_chars {
            // Cut positions at or below start + overlap would stall the scan,
            // so the boundary search stops above that floor.
            let floor = start + options.overlap_chars;
            find_sentence_cut(&chars, floor, target_end).unwrap_or(target_end)
        } else {
            target_end
        };

        let overlap = if chunks.is_empty() { 0 } else { prev_end - start };
        chunks.push(Chunk {
            index: chunks.len(),
            text: text[byte_offsets[start]..byte_offsets[end]].to_string(),
            char_overlap_with_previous: overlap,
            metadata: document.metadata.clone(),
        });

        if end >= total_chars {
            break;
        }

        prev_end = end;
        start = end - options.overlap_chars;
    }

    debug!(
        "Split {} chars into {} chunks (max {}, overlap {})",
        total_chars,
        chunks.len(),
        options.max_chunk_chars,
        options.overlap_chars
    );

    Ok(chunks)
}

/// Find the last sentence boundary cut in `(floor, target_end]`.
///
/// A cut at position `i` means the chunk covers chars `[start, i)`. Sentence
/// boundaries are end-of-sentence punctuation followed by whitespace (or the
/// end of the text) and newlines; the cut lands just after the boundary
/// character.
fn find_sentence_cut(chars: &[char], floor: usize, target_end: usize) -> Option<usize> {
    for position in (floor..target_end).rev() {
        let c = chars[position];
        let is_boundary = c == '\n'
            || (matches!(c, '.' | '!' | '?')
                && chars
                    .get(position + 1)
                    .map_or(true, |next| next.is_whitespace()));
        if is_boundary {
            return Some(position + 1);
        }
    }
    None
}
