/*!
 * Tests for prefix-merge deduplication and document assembly
 */

use capknow::document::VideoMetadata;
use capknow::normalizer::{
    collapse_whitespace, merge_cue_texts, normalize, wrap_text, JoinPolicy, MergePolicy,
};
use crate::common;

/// Test prefix evolution: progressively-growing fragments collapse into the
/// single longest fragment
#[test]
fn test_merge_withGrowingFragments_shouldKeepOnlyLongest() {
    let committed = merge_cue_texts(["das", "das heutige", "das heutige Video"], false);
    assert_eq!(committed, vec!["das heutige Video"]);
}

/// Test discard of subsets: a cue that is a prefix of the accumulated line
/// is dropped entirely
#[test]
fn test_merge_withSubsetCue_shouldDiscardIt() {
    let committed = merge_cue_texts(["das heutige Video", "das heutige"], false);
    assert_eq!(committed, vec!["das heutige Video"]);
}

/// Test that an exact duplicate is a discard, not a commit-then-restart
#[test]
fn test_merge_withExactDuplicate_shouldNotDuplicateOutput() {
    let committed = merge_cue_texts(["same line", "same line", "same line"], false);
    assert_eq!(committed, vec!["same line"]);
}

/// Test sentence break commit: unrelated cues become separate committed lines
/// in stream order
#[test]
fn test_merge_withUnrelatedCues_shouldCommitBoth() {
    let committed = merge_cue_texts(["Hello world.", "Goodbye now."], false);
    assert_eq!(committed, vec!["Hello world.", "Goodbye now."]);
}

/// Test idempotence: a stream with no prefix relationships passes through
/// unchanged
#[test]
fn test_merge_withAlreadyDeduplicatedLines_shouldReturnThemUnchanged() {
    let lines = ["First sentence.", "Second sentence.", "Third sentence."];
    let committed = merge_cue_texts(lines, false);
    assert_eq!(committed, lines.to_vec());
}

/// Test that empty and whitespace-only cues are skipped
#[test]
fn test_merge_withBlankCues_shouldSkipThem() {
    let committed = merge_cue_texts(["", "  ", "actual text", "\t"], false);
    assert_eq!(committed, vec!["actual text"]);
}

/// Test that comparison is whitespace-normalized but output preserves the
/// original text
#[test]
fn test_merge_withRaggedWhitespace_shouldCompareNormalized() {
    let committed = merge_cue_texts(["das  heutige", "das heutige Video"], false);
    assert_eq!(committed, vec!["das heutige Video"]);
}

/// Test case sensitivity: default comparison is case-sensitive
#[test]
fn test_merge_withCaseDifference_shouldTreatAsSeparateByDefault() {
    let committed = merge_cue_texts(["Das heutige", "das heutige Video"], false);
    assert_eq!(committed, vec!["Das heutige", "das heutige Video"]);
}

/// Test the case-insensitive variant evolves across case differences and
/// keeps the newest original casing
#[test]
fn test_merge_withCaseInsensitiveFlag_shouldEvolveAcrossCase() {
    let committed = merge_cue_texts(["Das heutige", "das heutige Video"], true);
    assert_eq!(committed, vec!["das heutige Video"]);
}

/// Test whitespace collapsing helper
#[test]
fn test_collapse_whitespace_withMixedRuns_shouldCollapse() {
    assert_eq!(collapse_whitespace("  a \t b\n c  "), "a b c");
    assert_eq!(collapse_whitespace(""), "");
}

/// Test greedy wrapping replaces spaces with newlines only
#[test]
fn test_wrap_text_withLongLine_shouldWrapAtWordBoundaries() {
    let text = "one two three four five";
    let wrapped = wrap_text(text, 9);
    assert_eq!(wrapped, "one two\nthree\nfour five");

    // Unwrapping restores the original words
    assert_eq!(wrapped.replace('\n', " "), text);
}

/// Test wrapping leaves overlong words intact
#[test]
fn test_wrap_text_withOverlongWord_shouldNotBreakWord() {
    let wrapped = wrap_text("tiny extraordinarily-long-word end", 8);
    assert!(wrapped.contains("extraordinarily-long-word"));
}

/// Test end-to-end normalization of a rolling caption stream
#[test]
fn test_normalize_withRollingStream_shouldProduceCleanProse() {
    let policy = MergePolicy::default();
    let metadata = VideoMetadata::with_title("Rolling");
    let document = normalize(common::rolling_caption_stream(), &policy, metadata);

    assert_eq!(document.text, "das heutige Video wird gut. Danke f'rs Zuschauen");
    assert_eq!(document.source_cue_count, 4);
    assert_eq!(document.metadata.title, "Rolling");
}

/// Test newline join policy keeps one committed line per row
#[test]
fn test_normalize_withNewlinePolicy_shouldJoinWithNewlines() {
    let policy = MergePolicy {
        join_policy: JoinPolicy::Newline,
        case_insensitive: false,
        wrap_width: None,
    };
    let document = normalize(common::plain_caption_stream(), &policy, VideoMetadata::default());

    assert_eq!(document.text, "Hello world.\nGoodbye now.");
}

/// Test that an empty stream yields an empty document, not an error
#[test]
fn test_normalize_withEmptyStream_shouldYieldEmptyDocument() {
    let policy = MergePolicy::default();
    let document = normalize("", &policy, VideoMetadata::default());

    assert!(document.is_empty());
    assert_eq!(document.source_cue_count, 0);
}

/// Test that the configured wrap width reflows long prose
#[test]
fn test_normalize_withWrapWidth_shouldReflowProse() {
    let policy = MergePolicy {
        join_policy: JoinPolicy::Space,
        case_insensitive: false,
        wrap_width: Some(20),
    };
    let stream = "WEBVTT\n\n00:00:01.000 --> 00:00:04.000\n\
        this is a fairly long single caption line that needs wrapping\n";
    let document = normalize(stream, &policy, VideoMetadata::default());

    for line in document.text.lines() {
        assert!(line.chars().count() <= 20, "line too long: {}", line);
    }
    assert_eq!(
        document.text.replace('\n', " "),
        "this is a fairly long single caption line that needs wrapping"
    );
}
