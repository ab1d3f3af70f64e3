/*!
 * Language utilities for ISO language code handling
 *
 * Caption tracks are tagged with ISO 639-1 codes, often with a region
 * suffix (`en-US`, `pt-BR`). These helpers validate codes, resolve display
 * names and compare codes across the 2-letter and 3-letter forms.
 */

use anyhow::{Result, anyhow};
use isolang::Language;

/// Strip a region suffix and lowercase a language tag (`en-US` -> `en`)
pub fn base_code(code: &str) -> String {
    code.trim()
        .split(&['-', '_'][..])
        .next()
        .unwrap_or("")
        .to_lowercase()
}

/// Resolve a language tag to an isolang Language
fn resolve(code: &str) -> Option<Language> {
    let base = base_code(code);
    match base.len() {
        2 => Language::from_639_1(&base),
        3 => Language::from_639_3(&base),
        _ => None,
    }
}

/// Validate that a language tag is a recognizable ISO 639 code
pub fn validate_language_code(code: &str) -> Result<()> {
    resolve(code)
        .map(|_| ())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Get the English name of a language from its ISO code
pub fn get_language_name(code: &str) -> Result<String> {
    resolve(code)
        .map(|language| language.to_name().to_string())
        .ok_or_else(|| anyhow!("Unknown language code: {}", code))
}

/// Check if two language tags refer to the same language.
///
/// Handles mixed 2-letter and 3-letter forms and ignores region suffixes, so
/// `en-US` matches `eng`. Unrecognized codes fall back to a literal base-code
/// comparison.
pub fn language_codes_match(a: &str, b: &str) -> bool {
    match (resolve(a), resolve(b)) {
        (Some(lang_a), Some(lang_b)) => lang_a == lang_b,
        _ => {
            let (base_a, base_b) = (base_code(a), base_code(b));
            !base_a.is_empty() && base_a == base_b
        }
    }
}
