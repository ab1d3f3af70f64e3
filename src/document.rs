use serde::{Deserialize, Serialize};

// @module: Document model for cleaned caption text

/// Video metadata attached to every document and chunk.
///
/// These fields come from the metadata sidecar written by the caption
/// downloader and are carried verbatim - the pipeline never derives or
/// validates them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Video title
    #[serde(default)]
    pub title: String,

    /// Canonical video URL
    #[serde(default, rename = "webpage_url", alias = "url")]
    pub url: String,

    /// Upload date as reported by the source (YYYYMMDD)
    #[serde(default, rename = "upload_date", alias = "date")]
    pub upload_date: String,

    /// Channel or uploader name
    #[serde(default, rename = "uploader", alias = "channel")]
    pub channel: String,

    /// Caption language code (ISO 639)
    #[serde(default)]
    pub language: String,
}

impl VideoMetadata {
    // @creates: Metadata with just a title, for tests and fallbacks
    pub fn with_title(title: &str) -> Self {
        VideoMetadata {
            title: title.to_string(),
            ..Default::default()
        }
    }
}

/// The fully deduplicated, markup-free prose for one video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanDocument {
    /// Deduplicated prose text
    pub text: String,

    /// Number of cues consumed to produce the text
    pub source_cue_count: usize,

    /// Opaque pass-through metadata
    pub metadata: VideoMetadata,
}

impl CleanDocument {
    /// Create a document from normalized text and its provenance
    pub fn new(text: String, source_cue_count: usize, metadata: VideoMetadata) -> Self {
        CleanDocument {
            text,
            source_cue_count,
            metadata,
        }
    }

    /// Whether the document carries any prose at all
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
