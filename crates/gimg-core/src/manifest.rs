//! JSON record of the URLs selected for a search term.
//!
//! Written next to each scrape so a term can be downloaded again later
//! without a browser (`gimg download <manifest>`).

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ScrapeError;
use crate::query::clean_search_key;
use crate::storage::{ensure_dir, write_atomic};
use crate::url_model::decode_url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlManifest {
    pub search_key: String,
    /// RFC 3339, local time.
    pub timestamp: String,
    pub total_urls: usize,
    pub image_urls: Vec<String>,
}

impl UrlManifest {
    pub fn new(search_key: &str, urls: &[String], at: DateTime<Local>) -> Self {
        let image_urls: Vec<String> = urls.iter().map(|u| decode_url(u)).collect();
        Self {
            search_key: search_key.to_string(),
            timestamp: at.to_rfc3339(),
            total_urls: image_urls.len(),
            image_urls,
        }
    }

    /// `<clean key>_<YYYYmmdd_HHMMSS>.json`
    pub fn file_name(search_key: &str, at: DateTime<Local>) -> String {
        format!(
            "{}_{}.json",
            clean_search_key(search_key),
            at.format("%Y%m%d_%H%M%S")
        )
    }

    /// Writes a manifest for `urls` into `dir` and returns its path.
    pub fn save(dir: &Path, search_key: &str, urls: &[String]) -> Result<PathBuf, ScrapeError> {
        ensure_dir(dir)?;
        let now = Local::now();
        let manifest = Self::new(search_key, urls, now);
        let path = dir.join(Self::file_name(search_key, now));
        let json = serde_json::to_string_pretty(&manifest)
            .map_err(|e| ScrapeError::file_op("serialize manifest", &path, e))?;
        write_atomic(&path, json.as_bytes())
            .map_err(|e| ScrapeError::file_op("save", &path, format!("{:#}", e)))?;
        tracing::info!(urls = manifest.total_urls, "saved url manifest to {}", path.display());
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("read manifest: {}", path.display()))?;
        let manifest: Self = serde_json::from_str(&data)
            .with_context(|| format!("parse manifest: {}", path.display()))?;
        if manifest.total_urls != manifest.image_urls.len() {
            tracing::warn!(
                total_urls = manifest.total_urls,
                listed = manifest.image_urls.len(),
                "manifest count mismatch in {}",
                path.display()
            );
        }
        Ok(manifest)
    }
}
