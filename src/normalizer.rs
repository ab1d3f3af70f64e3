use serde::{Deserialize, Serialize};
use anyhow::{anyhow, Result};
use log::debug;

use crate::caption_processor::{parse_caption_string, Cue};
use crate::document::{CleanDocument, VideoMetadata};

// @module: Prefix-merge deduplication of rolling auto-captions

/// How committed lines are joined into the final document text
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum JoinPolicy {
    // @policy: Join with a single space, flowing prose
    #[default]
    Space,
    // @policy: Join with newlines, one committed line per row
    Newline,
}

impl std::fmt::Display for JoinPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Space => write!(f, "space"),
            Self::Newline => write!(f, "newline"),
        }
    }
}

impl std::str::FromStr for JoinPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "space" => Ok(Self::Space),
            "newline" => Ok(Self::Newline),
            _ => Err(anyhow!("Invalid join policy: {}", s)),
        }
    }
}

/// Policy knobs for the merge step.
///
/// Prefix comparison is case-sensitive by default since auto-captions rarely
/// change case mid-sentence; `case_insensitive` switches the comparison (not
/// the committed output) to lowercase. `wrap_width` reflows the final text to
/// the given column count, replacing spaces with newlines only.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MergePolicy {
    /// Line join policy for assembly
    #[serde(default)]
    pub join_policy: JoinPolicy,

    /// Compare prefixes case-insensitively
    #[serde(default)]
    pub case_insensitive: bool,

    /// Wrap the assembled text at this column, when set
    #[serde(default = "default_wrap_width")]
    pub wrap_width: Option<usize>,
}

fn default_wrap_width() -> Option<usize> {
    Some(100)
}

impl Default for MergePolicy {
    fn default() -> Self {
        MergePolicy {
            join_policy: JoinPolicy::default(),
            case_insensitive: false,
            wrap_width: default_wrap_width(),
        }
    }
}

/// Collapse any run of whitespace into a single space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// State carried by the merge fold: the line still growing plus everything
/// already committed.
struct MergeState {
    accumulated: Option<Accumulated>,
    committed: Vec<String>,
}

/// A growing line together with its comparison key
struct Accumulated {
    original: String,
    key: String,
}

/// Collapse progressively-growing caption fragments into their longest form.
///
/// Rolling auto-captions build a sentence word by word, re-sending the line
/// each time it grows. For each incoming text, against the accumulated line:
/// a longer version (accumulated is its prefix) replaces it, a strict subset
/// or duplicate is discarded, and anything else means the sentence finished,
/// so the accumulated line is committed and the new text starts the next one.
/// Comparison happens on trimmed, whitespace-collapsed text; committed output
/// keeps the original casing and punctuation.
pub fn merge_cue_texts<I, S>(texts: I, case_insensitive: bool) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let comparison_key = |text: &str| {
        let collapsed = collapse_whitespace(text);
        if case_insensitive {
            collapsed.to_lowercase()
        } else {
            collapsed
        }
    };

    let final_state = texts.into_iter().fold(
        MergeState {
            accumulated: None,
            committed: Vec::new(),
        },
        |mut state, text| {
            let trimmed = text.as_ref().trim();
            if trimmed.is_empty() {
                return state;
            }

            let key = comparison_key(trimmed);

            match state.accumulated.take() {
                None => {
                    state.accumulated = Some(Accumulated {
                        original: trimmed.to_string(),
                        key,
                    });
                }
                Some(acc) => {
                    if key.starts_with(&acc.key) && key != acc.key {
                        // Evolve: the new text is a longer version of the same line
                        state.accumulated = Some(Accumulated {
                            original: trimmed.to_string(),
                            key,
                        });
                    } else if acc.key.starts_with(&key) {
                        // Discard: duplicate or strict subset of what we already hold
                        state.accumulated = Some(acc);
                    } else {
                        // Commit: the growing sentence is complete
                        state.committed.push(acc.original);
                        state.accumulated = Some(Accumulated {
                            original: trimmed.to_string(),
                            key,
                        });
                    }
                }
            }

            state
        },
    );

    let mut committed = final_state.committed;
    if let Some(acc) = final_state.accumulated {
        committed.push(acc.original);
    }

    committed
}

/// Greedy word wrap at `width` columns.
///
/// Only spaces are replaced with newlines; words longer than the width are
/// left intact on their own line.
pub fn wrap_text(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }

    let mut wrapped_lines = Vec::new();
    for line in text.lines() {
        let mut current = String::new();
        for word in line.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
            } else if current.chars().count() + 1 + word.chars().count() <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                wrapped_lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        wrapped_lines.push(current);
    }

    wrapped_lines.join("\n")
}

/// Normalize a raw caption stream into a clean document.
///
/// Parses the stream into cues, collapses the rolling-caption redundancy via
/// prefix-merging, then assembles the committed lines per the merge policy.
/// A stream with zero valid cues yields an empty document, not an error.
pub fn normalize(raw_caption_stream: &str, policy: &MergePolicy, metadata: VideoMetadata) -> CleanDocument {
    let cues = parse_caption_string(raw_caption_stream);
    normalize_cues(&cues, policy, metadata)
}

/// Normalize already-parsed cues into a clean document
pub fn normalize_cues(cues: &[Cue], policy: &MergePolicy, metadata: VideoMetadata) -> CleanDocument {
    let committed = merge_cue_texts(cues.iter().map(|cue| cue.text.as_str()), policy.case_insensitive);

    debug!("Merged {} cues into {} committed lines", cues.len(), committed.len());

    let mut text = match policy.join_policy {
        JoinPolicy::Space => collapse_whitespace(&committed.join(" ")),
        JoinPolicy::Newline => committed.join("\n"),
    };

    if let Some(width) = policy.wrap_width {
        if !text.is_empty() {
            text = wrap_text(&text, width);
        }
    }

    CleanDocument::new(text, cues.len(), metadata)
}
