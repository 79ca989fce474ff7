//! Normalization of name text into lexical index keys.
//!
//! Matching is done on normalized keys only, so two spellings of the same
//! name compare equal once case, accents, separator punctuation, and
//! whitespace are folded away.

use unicode_normalization::UnicodeNormalization;

/// Characters treated as token separators in addition to whitespace.
const SEPARATORS: &[char] = &['.', ',', '-', '_', '\'', '’'];

/// Normalize free text into the form used as an index key.
///
/// Applies NFKD decomposition and drops combining marks, lowercases,
/// maps separator punctuation to spaces, then collapses runs of
/// whitespace. Normalizing an already-normalized string returns it
/// unchanged, and an input with no usable characters normalizes to the
/// empty string.
pub fn normalize_for_matching(text: &str) -> String {
    let folded: String = text
        .nfkd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect();
    let spaced: String = folded
        .to_lowercase()
        .chars()
        .map(|c| if SEPARATORS.contains(&c) { ' ' } else { c })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}
