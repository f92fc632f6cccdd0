//! Accent and case folding for comparing human-entered text.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercases, decomposes (NFD) and drops every combining mark.
///
/// Lowercasing runs first: some case mappings emit combining marks
/// (`İ` lowercases to `i` + U+0307), and those must be stripped as well.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Missing text folds to the empty string.
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

/// Substring test on an already-normalized needle. An empty needle matches anything.
pub fn contains_normalized(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || normalize(haystack).contains(needle)
}
