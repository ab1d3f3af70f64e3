use std::fmt;
use regex::Regex;
use once_cell::sync::Lazy;
use log::{warn, debug};

use crate::errors::CaptionError;

// @module: Caption stream parsing and markup stripping

// @const: Cue timing line regex (WebVTT `.` and SRT `,` millisecond separators)
static TIMING_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2,}):(\d{2}):(\d{2})[.,](\d{3})\s*-->\s*(\d{2,}):(\d{2}):(\d{2})[.,](\d{3})")
        .unwrap()
});

// @const: Inline markup regex (per-word timing tags, <c> styling, font tags)
static INLINE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Remove inline per-word timing annotations and styling markup from a text line.
///
/// This pass is purely lexical: everything between `<` and `>` is dropped and
/// no other visible character is altered.
pub fn strip_inline_tags(line: &str) -> String {
    INLINE_TAG_REGEX.replace_all(line, "").into_owned()
}

/// Decode the small set of HTML entities that caption downloaders emit.
///
/// `&amp;` is decoded last so that double-escaped entities do not round-trip
/// into live markup.
pub fn decode_entities(line: &str) -> String {
    line.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Check whether a line belongs to the stream header rather than a cue
pub fn is_stream_header(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("WEBVTT")
        || trimmed.starts_with("Kind:")
        || trimmed.starts_with("Language:")
        || trimmed.starts_with("NOTE")
        || trimmed.starts_with("STYLE")
        || trimmed.starts_with("REGION")
}

// @struct: Single caption cue
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Cue text, markup already removed
    pub text: String,
}

impl Cue {
    /// Creates a new cue - used by tests and external consumers
    #[allow(dead_code)]
    pub fn new(start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        Cue {
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    // @creates: Validated cue
    // @validates: Time range and non-empty text
    pub fn new_validated(start_time_ms: u64, end_time_ms: u64, text: String) -> Result<Self, CaptionError> {
        if end_time_ms < start_time_ms {
            return Err(CaptionError::InvalidTimeRange {
                start_ms: start_time_ms,
                end_ms: end_time_ms,
            });
        }

        Ok(Cue {
            start_time_ms,
            end_time_ms,
            text: text.trim().to_string(),
        })
    }

    /// Parse a caption timestamp (`HH:MM:SS.mmm` or `HH:MM:SS,mmm`) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64, CaptionError> {
        let parts: Vec<&str> = timestamp.split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(CaptionError::InvalidTimestamp(timestamp.to_string()));
        }

        let mut fields = [0u64; 4];
        for (i, part) in parts.iter().enumerate() {
            fields[i] = part
                .trim()
                .parse()
                .map_err(|_| CaptionError::InvalidTimestamp(timestamp.to_string()))?;
        }
        let [hours, minutes, seconds, millis] = fields;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(CaptionError::InvalidTimestamp(timestamp.to_string()));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Format a timestamp in milliseconds to WebVTT format (HH:MM:SS.mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{} --> {}",
            Self::format_timestamp(self.start_time_ms),
            Self::format_timestamp(self.end_time_ms)
        )?;
        writeln!(f, "{}", self.text)
    }
}

/// Parse a raw timed-caption stream into cues, in stream order.
///
/// Rolling auto-captions repeat the previous display line as the first line
/// of the next block, so each non-blank text line becomes its own cue (lines
/// from the same block share the block's timing). Header lines, digit-only
/// sequence numbers and blank lines are skipped. A block whose timing header
/// cannot be parsed is logged and skipped entirely; parsing never aborts the
/// stream.
pub fn parse_caption_string(content: &str) -> Vec<Cue> {
    let mut cues = Vec::new();

    // Timing window of the block currently being read. None outside a block
    // or inside a block that was declared malformed.
    let mut current_timing: Option<(u64, u64)> = None;
    let mut skipping_block = false;
    let mut line_count = 0;

    for line in content.lines() {
        line_count += 1;
        let trimmed = line.trim();

        // A blank line closes the current block
        if trimmed.is_empty() {
            current_timing = None;
            skipping_block = false;
            continue;
        }

        if is_stream_header(trimmed) {
            continue;
        }

        // Timing line starts a new block, malformed or not
        if trimmed.contains("-->") {
            match parse_timing_line(trimmed) {
                Some((start_ms, end_ms)) => {
                    current_timing = Some((start_ms, end_ms));
                    skipping_block = false;
                }
                None => {
                    warn!("Skipping block with unparsable timing header at line {}: {}", line_count, trimmed);
                    current_timing = None;
                    skipping_block = true;
                }
            }
            continue;
        }

        if skipping_block {
            continue;
        }

        // SRT-style sequence numbers carry no text
        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }

        let text = decode_entities(&strip_inline_tags(trimmed));
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        match current_timing {
            Some((start_ms, end_ms)) => match Cue::new_validated(start_ms, end_ms, text.to_string()) {
                Ok(cue) => cues.push(cue),
                Err(e) => warn!("Skipping invalid cue at line {}: {}", line_count, e),
            },
            None => {
                // Text outside any block - tolerated but not attributable
                debug!("Ignoring text at line {} outside any cue block: {}", line_count, text);
            }
        }
    }

    cues
}

/// Parse a timing line into a start/end millisecond pair
fn parse_timing_line(line: &str) -> Option<(u64, u64)> {
    let caps = TIMING_LINE_REGEX.captures(line)?;

    let field = |idx: usize| -> Option<u64> { caps.get(idx)?.as_str().parse().ok() };

    let start_ms = field(1)? * 3_600_000 + field(2)? * 60_000 + field(3)? * 1_000 + field(4)?;
    let end_ms = field(5)? * 3_600_000 + field(6)? * 60_000 + field(7)? * 1_000 + field(8)?;

    if end_ms < start_ms {
        return None;
    }

    Some((start_ms, end_ms))
}
