//! Subtitle language registry.
//!
//! A fixed mapping from ISO 639-2 codes to human-readable track names.
//! The requested language is validated against this table before any
//! filesystem work happens, so a typo fails the run immediately instead
//! of after the merge jobs have been dispatched.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::{CoreError, CoreResult};

/// ISO 639-2 codes accepted for the `--language` track tag.
static LANGUAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("ara", "Arabic"),
        ("chi", "Chinese"),
        ("dut", "Dutch"),
        ("eng", "English"),
        ("fre", "French"),
        ("ger", "German"),
        ("ita", "Italian"),
        ("jpn", "Japanese"),
        ("kor", "Korean"),
        ("por", "Portuguese"),
        ("rus", "Russian"),
        ("spa", "Spanish"),
        ("und", "Undetermined"),
    ])
});

/// Resolves a language code to its display name.
///
/// Returns `CoreError::LanguageNotSupported` if the code is not a key in
/// the registry; no other code is accepted.
pub fn resolve(code: &str) -> CoreResult<&'static str> {
    LANGUAGES
        .get(code)
        .copied()
        .ok_or_else(|| CoreError::LanguageNotSupported(code.to_string()))
}

/// All supported codes in sorted order, for diagnostics.
pub fn supported_codes() -> Vec<&'static str> {
    let mut codes: Vec<&'static str> = LANGUAGES.keys().copied().collect();
    codes.sort_unstable();
    codes
}
