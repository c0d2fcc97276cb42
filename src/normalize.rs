//! Text normalization for authority matching
//!
//! Headings, aliases and queries all pass through [`normalize`] before they
//! are compared:
//! - Surrounding whitespace trimmed
//! - Unicode NFC composition (`u` + combining diaeresis equals `ü`)
//! - Full Unicode lowercase
//!
//! [`strip_punctuation`] derives the secondary variant registered next to
//! every normalized form, so that "Bach Johann Sebastian" still finds
//! "Bach, Johann Sebastian".

use unicode_normalization::UnicodeNormalization;

/// Punctuation removed when building the secondary variant
pub const DEFAULT_PUNCTUATION: &str = ",.;:!?'\"()[]<>";

/// True for empty or whitespace-only text.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Normalize text for comparison.
///
/// # Examples
///
/// ```
/// use authority_match::normalize::normalize;
///
/// assert_eq!(normalize("  BACH "), "bach");
/// assert_eq!(normalize("Mu\u{0308}ller"), normalize("Müller"));
/// ```
pub fn normalize(text: &str) -> String {
    let composed: String = text.trim().nfc().collect();
    composed.to_lowercase()
}

/// Replace each punctuation character with a space and collapse whitespace.
///
/// Input is expected to be normalized already.
pub fn strip_punctuation(normalized: &str, punctuation: &str) -> String {
    let replaced: String = normalized
        .chars()
        .map(|c| if punctuation.contains(c) { ' ' } else { c })
        .collect();

    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}
