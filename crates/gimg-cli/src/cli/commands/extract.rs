//! `gimg extract` – offline candidate extraction from a saved results page.

use anyhow::{Context, Result};
use gimg_core::config::ScrapeConfig;
use gimg_core::extract::collect_candidates;
use gimg_core::filter::{dedup_preserving_order, FilterRules};
use gimg_core::url_model::decode_url;
use std::path::Path;

pub fn extract_urls(html: &str, cfg: &ScrapeConfig, limit: Option<usize>, strict: bool) -> Vec<String> {
    let rules = FilterRules::from_config(cfg);
    let mut urls = collect_candidates(html, &rules);
    if strict {
        urls = rules.filter_thumbnail_urls(urls);
    }
    let mut urls = dedup_preserving_order(urls.iter().map(|u| decode_url(u)).collect());
    if let Some(n) = limit {
        urls.truncate(n);
    }
    urls
}

pub fn run_extract(cfg: &ScrapeConfig, file: &Path, limit: Option<usize>, strict: bool) -> Result<()> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("read page: {}", file.display()))?;
    let urls = extract_urls(&html, cfg, limit, strict);
    tracing::info!(count = urls.len(), "extracted candidates from {}", file.display());
    for url in urls {
        println!("{}", url);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<meta content="https://cdn.example.com/og/cover.jpg">
        <p>https://static.example.com/backgrounds/2022/large/hero-image.jpg</p>
        <p>https://static.example.com/backgrounds/2022/large/second-image.png</p>"#;

    #[test]
    fn limit_truncates_longest_first() {
        let urls = extract_urls(PAGE, &ScrapeConfig::default(), Some(1), false);
        assert_eq!(
            urls,
            vec!["https://static.example.com/backgrounds/2022/large/second-image.png"]
        );
    }

    #[test]
    fn strict_drops_short_meta_urls() {
        let loose = extract_urls(PAGE, &ScrapeConfig::default(), None, false);
        assert!(loose.contains(&"https://cdn.example.com/og/cover.jpg".to_string()));
        let strict = extract_urls(PAGE, &ScrapeConfig::default(), None, true);
        assert_eq!(strict.len(), 2);
    }
}
