//! Search term handling: validation, filesystem-safe keys, and the results URL.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::ScrapeError;

const SEARCH_ENDPOINT: &str = "https://www.google.com/search";
/// Fixed parameters selecting the image vertical at a 1920x947 viewport.
const SEARCH_PARAMS: &str =
    "source=lnms&tbm=isch&sa=X&ved=2ahUKEwie44_AnqLpAhUhBWMBHUFGD90Q_AUoAXoECBUQAw&biw=1920&bih=947";

pub const MAX_TERM_CHARS: usize = 200;

const FORBIDDEN_TERM_CHARS: &[char] = &['<', '>', '"', '|', '\0', '\n', '\r', '\t'];

/// Unreserved characters and `/` stay literal; everything else is escaped.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Results page URL for `search_key`.
pub fn search_url(search_key: &str) -> String {
    let encoded = utf8_percent_encode(search_key, QUERY_ENCODE_SET);
    format!("{}?q={}&{}", SEARCH_ENDPOINT, encoded, SEARCH_PARAMS)
}

/// Collapses whitespace and rejects terms that are empty, too long, or carry
/// characters that break filenames or the query string.
pub fn validate_search_term(term: &str) -> Result<String, ScrapeError> {
    let cleaned = term.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return Err(ScrapeError::Configuration(
            "search term cannot be empty".to_string(),
        ));
    }
    if cleaned.chars().count() > MAX_TERM_CHARS {
        return Err(ScrapeError::Configuration(format!(
            "search term too long (max {} characters)",
            MAX_TERM_CHARS
        )));
    }
    if let Some(c) = cleaned.chars().find(|c| FORBIDDEN_TERM_CHARS.contains(c)) {
        return Err(ScrapeError::Configuration(format!(
            "search term contains invalid character {:?}",
            c
        )));
    }
    Ok(cleaned)
}

/// Key used for directory, file and manifest names. Never empty and never a
/// dot-only path component.
pub fn clean_search_key(term: &str) -> String {
    let replaced: String = term
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c => c,
        })
        .collect();
    let key = replaced.split_whitespace().collect::<Vec<_>>().join("_");
    if key.chars().all(|c| c == '.') {
        return "_".repeat(key.len().max(1));
    }
    key
}
