use std::collections::HashSet;
use std::path::PathBuf;

use crate::config::ScrapeConfig;
use crate::fetch::FetchOptions;
use crate::image_check::{ResolutionBounds, SaveFormat};
use crate::retry::RetryPolicy;
use crate::url_model::image_stem;

/// Everything one download batch needs.
#[derive(Debug, Clone)]
pub struct DownloadPlan {
    pub dir: PathBuf,
    /// Stem prefix for `<prefix>-<index>` names.
    pub prefix: String,
    pub keep_filenames: bool,
    pub workers: usize,
    pub max_missed: usize,
    pub bounds: ResolutionBounds,
    pub format: SaveFormat,
    pub fetch: FetchOptions,
    pub retry: RetryPolicy,
}

impl DownloadPlan {
    /// Plan with default settings.
    pub fn new(dir: PathBuf, prefix: &str) -> Self {
        Self::from_config(&ScrapeConfig::default(), dir, prefix)
    }

    pub fn from_config(cfg: &ScrapeConfig, dir: PathBuf, prefix: &str) -> Self {
        Self {
            dir,
            prefix: prefix.to_string(),
            keep_filenames: cfg.keep_filenames,
            workers: cfg.workers.max(1),
            max_missed: cfg.max_missed.max(1),
            bounds: cfg.bounds(),
            format: cfg.image_save_format,
            fetch: FetchOptions::from_config(cfg),
            retry: cfg.retry_policy(),
        }
    }
}

/// File stems (no extension) for each URL, decided before any download
/// starts so names do not depend on completion order.
///
/// Default names are `<prefix>-<index>`. With `keep_filenames` the URL's own
/// stem is used; a repeated stem gets a unique `-<index>` suffix, and URLs without a
/// usable stem fall back to the default name.
pub fn plan_stems(urls: &[String], prefix: &str, keep_filenames: bool) -> Vec<String> {
    let mut taken = HashSet::with_capacity(urls.len());
    urls.iter()
        .enumerate()
        .map(|(index, url)| {
            let fallback = format!("{}-{}", prefix, index);
            let stem = if keep_filenames {
                image_stem(url).unwrap_or_else(|| fallback.clone())
            } else {
                fallback.clone()
            };
            let stem = unique_stem(&taken, stem, index);
            taken.insert(stem.clone());
            stem
        })
        .collect()
}

/// `stem`, or `stem-<index>` (then `-1`, `-2`, ...) until no planned name
/// clashes.
fn unique_stem(taken: &HashSet<String>, stem: String, index: usize) -> String {
    if !taken.contains(&stem) {
        return stem;
    }
    let base = format!("{}-{}", stem, index);
    let mut candidate = base.clone();
    let mut n = 0;
    while taken.contains(&candidate) {
        n += 1;
        candidate = format!("{}-{}", base, n);
    }
    candidate
}
