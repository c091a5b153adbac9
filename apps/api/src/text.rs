//! Tokenizing helpers shared by the extractor, the skill matcher and the ATS scorer.

use once_cell::sync::Lazy;
use regex::Regex;

/// Keeps tech tokens such as `c++`, `c#`, `node.js` intact.
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z0-9+#.]+").expect("token regex is valid"));

/// Single-character tokens that still carry meaning (languages).
const SHORT_TOKENS: &[&str] = &["c", "r", "j"];

/// Lowercases and collapses runs of whitespace into single spaces.
pub fn normalize_phrase(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits text into ordered lowercase tokens. Sentence punctuation at the edges
/// of a token is dropped, single-letter tokens are kept only for languages.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lower)
        .map(|m| m.as_str().trim_matches('.'))
        .filter(|t| !t.is_empty())
        .filter(|t| t.chars().count() > 1 || SHORT_TOKENS.contains(t))
        .map(String::from)
        .collect()
}

/// True when `needle` occurs as a contiguous run of whole tokens in `haystack`.
pub fn contains_phrase(haystack: &[String], needle: &[String]) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|window| window == needle)
}
