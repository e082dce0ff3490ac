//! Label and key normalization for the match engine.
//!
//! Two distinct variants, intentionally kept apart:
//! - mapping-lookup normalization compares an incoming label against the
//!   verbatim `form_label` of stored mappings (equality check);
//! - fallback keyword normalization prepares profile keys and labels for
//!   the substring containment heuristic (no punctuation stripping).

use regex::Regex;
use std::sync::LazyLock;

/// Compiled regex for collapsing whitespace runs.
static RE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// Normalize a raw form label for mapping lookup.
///
/// Pipeline:
/// 1. Lowercase
/// 2. Strip the literal characters `*` and `:`
/// 3. Collapse whitespace runs to a single space
/// 4. Trim
///
/// `form_label` is stored verbatim from the page, so this is looser than
/// identifier normalization: `"Email*"`, `"email:"` and `"  Email  "`
/// all normalize to `"email"`.
pub fn normalize_label(label: &str) -> String {
    let lower = label.to_lowercase();
    let stripped: String = lower.chars().filter(|c| !matches!(c, '*' | ':')).collect();
    RE_WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Normalize a profile data key for keyword fallback matching.
///
/// Underscores become spaces and the result is lowercased, so the key
/// `mobile_number` matches label text containing `mobile number`.
pub fn normalize_key(key: &str) -> String {
    key.replace('_', " ").to_lowercase()
}

/// Normalize a raw label for the keyword fallback containment check.
///
/// Lowercase plus underscore→space so a label written `mobile_number`
/// still contains the normalized key `mobile number`. No punctuation
/// stripping: this side feeds a containment check, not an equality check.
pub fn normalize_fallback_label(label: &str) -> String {
    label.to_lowercase().replace('_', " ")
}

#[cfg(test)]
#[path = "tests/normalizer_tests.rs"]
mod tests;
