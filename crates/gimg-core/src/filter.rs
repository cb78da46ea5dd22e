//! Thumbnail / site-chrome filtering and order-preserving dedup.

use std::collections::HashSet;

use crate::config::ScrapeConfig;

/// Shorter candidates are usually thumbnails or sprite references.
pub const MIN_URL_LEN: usize = 50;

/// Marker present in every proxied thumbnail served by the results page.
pub const THUMBNAIL_PROXY_MARKER: &str = "encrypted-tbn";

/// Substring rules applied to candidate URLs. Patterns are matched
/// case-insensitively.
#[derive(Debug, Clone)]
pub struct FilterRules {
    thumbnail_patterns: Vec<String>,
    logo_patterns: Vec<String>,
    pub min_url_len: usize,
}

impl FilterRules {
    pub fn new(thumbnail_patterns: &[String], logo_patterns: &[String]) -> Self {
        let lower = |v: &[String]| {
            v.iter()
                .map(|p| p.to_ascii_lowercase())
                .filter(|p| !p.is_empty())
                .collect()
        };
        Self {
            thumbnail_patterns: lower(thumbnail_patterns),
            logo_patterns: lower(logo_patterns),
            min_url_len: MIN_URL_LEN,
        }
    }

    pub fn from_config(cfg: &ScrapeConfig) -> Self {
        Self::new(&cfg.thumbnail_patterns, &cfg.logo_patterns)
    }

    pub fn is_thumbnail(&self, url: &str) -> bool {
        contains_any(url, &self.thumbnail_patterns)
    }

    /// Proxy thumbnail or logo/favicon.
    pub fn is_site_chrome(&self, url: &str) -> bool {
        contains_any(url, &[THUMBNAIL_PROXY_MARKER]) || contains_any(url, &self.logo_patterns)
    }

    pub fn is_long_enough(&self, url: &str) -> bool {
        url.len() > self.min_url_len
    }

    /// Drops thumbnails and URLs too short to be full-resolution.
    pub fn filter_thumbnail_urls(&self, urls: Vec<String>) -> Vec<String> {
        urls.into_iter()
            .filter(|u| !self.is_thumbnail(u) && self.is_long_enough(u))
            .collect()
    }
}

impl Default for FilterRules {
    fn default() -> Self {
        Self::from_config(&ScrapeConfig::default())
    }
}

fn contains_any<S: AsRef<str>>(url: &str, patterns: &[S]) -> bool {
    let lowered = url.to_ascii_lowercase();
    patterns.iter().any(|p| lowered.contains(p.as_ref()))
}

/// Removes repeats, keeping the first occurrence of each URL.
pub fn dedup_preserving_order(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(urls.len());
    urls.into_iter().filter(|u| seen.insert(u.clone())).collect()
}

/// http(s) URL with a host.
pub fn is_fetchable_url(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long(url: &str) -> String {
        format!("{}?pad={}", url, "p".repeat(60))
    }

    #[test]
    fn thumbnail_patterns_match_case_insensitively() {
        let rules = FilterRules::default();
        assert!(rules.is_thumbnail("https://encrypted-tbn0.gstatic.com/images?q=tbn:abc"));
        assert!(rules.is_thumbnail("https://lh3.example.com/photo=S90"));
        assert!(rules.is_thumbnail("https://example.com/LOGO.png"));
        assert!(!rules.is_thumbnail("https://upload.example.org/wiki/Cat.jpg"));
    }

    #[test]
    fn site_chrome_ignores_size_markers() {
        let rules = FilterRules::default();
        assert!(rules.is_site_chrome("https://example.com/favicon.png"));
        assert!(rules.is_site_chrome("https://encrypted-tbn1.gstatic.com/x.jpg"));
        assert!(!rules.is_site_chrome("https://example.com/s90/full.jpg"));
    }

    #[test]
    fn filter_drops_thumbnails_and_short_urls() {
        let rules = FilterRules::default();
        let keep = long("https://upload.example.org/wiki/Cat.jpg");
        let urls = vec![
            keep.clone(),
            "https://x.org/a.jpg".to_string(),
            long("https://lh3.example.com/s100/a.jpg"),
        ];
        assert_eq!(rules.filter_thumbnail_urls(urls), vec![keep]);
    }

    #[test]
    fn custom_patterns_replace_defaults() {
        let rules = FilterRules::new(&["-small".to_string()], &[]);
        assert!(rules.is_thumbnail("https://example.com/cat-small.jpg"));
        assert!(!rules.is_thumbnail("https://example.com/logo.jpg"));
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let urls = vec!["b", "a", "b", "c", "a"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(dedup_preserving_order(urls), vec!["b", "a", "c"]);
    }

    #[test]
    fn fetchable_url_checks() {
        assert!(is_fetchable_url("https://example.com/x"));
        assert!(!is_fetchable_url("data:image/png;base64,AAAA"));
        assert!(!is_fetchable_url("ftp://example.com/a.jpg"));
        assert!(!is_fetchable_url("not a url"));
    }
}
