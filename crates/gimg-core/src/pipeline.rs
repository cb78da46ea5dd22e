//! Per-term scrape: results page → candidate URLs → manifest → downloads.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::browser::{ChromeSession, ClickLimits, HttpPageSource, PageSource};
use crate::config::ScrapeConfig;
use crate::downloader::{download_images, DownloadEvent, DownloadPlan, DownloadReport};
use crate::error::ScrapeError;
use crate::extract::collect_candidates;
use crate::filter::{dedup_preserving_order, is_fetchable_url, FilterRules};
use crate::manifest::UrlManifest;
use crate::query::{clean_search_key, search_url, validate_search_term};
use crate::report::TermReport;
use crate::url_model::decode_url;

/// URLs selected for one term.
#[derive(Debug, Clone, Default)]
pub struct FoundUrls {
    pub urls: Vec<String>,
    /// `None` when nothing was found or the manifest could not be written.
    pub manifest_path: Option<PathBuf>,
}

/// Runs the scrape pipeline with one validated configuration. Cheap to share
/// across threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Scraper {
    config: ScrapeConfig,
    rules: FilterRules,
    progress_tx: Option<tokio::sync::mpsc::Sender<DownloadEvent>>,
}

impl Scraper {
    pub fn new(config: ScrapeConfig) -> Result<Self, ScrapeError> {
        config.validate()?;
        let rules = FilterRules::from_config(&config);
        Ok(Self {
            config,
            rules,
            progress_tx: None,
        })
    }

    /// Download events from every term are sent to `tx` (non-blocking).
    pub fn with_progress(mut self, tx: tokio::sync::mpsc::Sender<DownloadEvent>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Opens the results page for `search_key` and selects up to
    /// `number_of_images` full-resolution URLs. A non-empty selection is
    /// also written as a manifest.
    pub fn find_image_urls(
        &self,
        source: &mut dyn PageSource,
        search_key: &str,
    ) -> Result<FoundUrls, ScrapeError> {
        tracing::info!("gathering full-resolution image links for {:?}", search_key);
        let wanted = self.config.number_of_images;

        source
            .open(&search_url(search_key))
            .map_err(ScrapeError::browser)?;
        source.settle(Duration::from_millis(self.config.settle_ms));
        let html = source.html().map_err(ScrapeError::browser)?;
        if html.trim().is_empty() {
            return Err(ScrapeError::UrlExtraction(format!(
                "results page for {:?} is empty",
                search_key
            )));
        }
        let mut candidates = collect_candidates(&html, &self.rules);
        tracing::info!(
            "found {} potential full-resolution urls from page data",
            candidates.len()
        );

        if candidates.len() < wanted {
            tracing::info!("trying to extract more urls by clicking on images");
            for _ in 0..self.config.scroll_attempts {
                source.scroll_to_bottom().map_err(ScrapeError::browser)?;
            }
            let clicked = source
                .click_through(&ClickLimits::from_config(&self.config))
                .map_err(ScrapeError::browser)?;
            tracing::info!("added {} urls from clicking images", clicked.len());
            candidates.extend(clicked);
            candidates = dedup_preserving_order(candidates);
        }

        let urls = select_urls(candidates, wanted);
        for (i, url) in urls.iter().take(3).enumerate() {
            tracing::debug!("sample {}: {}", i + 1, url);
        }

        let manifest_path = if urls.is_empty() {
            None
        } else {
            match UrlManifest::save(&self.config.json_dir, search_key, &urls) {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::error!("failed to save url manifest: {}", e);
                    None
                }
            }
        };
        tracing::info!(
            "search completed for {:?}, found {} full-resolution image urls",
            search_key,
            urls.len()
        );
        Ok(FoundUrls {
            urls,
            manifest_path,
        })
    }

    /// Downloads `urls` into `photos_dir/<clean key>/`.
    pub fn save_images(
        &self,
        urls: &[String],
        search_key: &str,
    ) -> Result<DownloadReport, ScrapeError> {
        let key = clean_search_key(search_key);
        let plan = DownloadPlan::from_config(&self.config, self.config.photos_dir.join(&key), &key);
        download_images(urls, &plan, self.progress_tx.as_ref())
    }

    /// Full run for one term with the configured page source.
    pub fn scrape(&self, term: &str, dry_run: bool) -> Result<TermReport, ScrapeError> {
        let term = validate_search_term(term)?;
        if self.config.static_page {
            let mut source = HttpPageSource::new(&self.config);
            self.scrape_with(&mut source, &term, dry_run)
        } else {
            let mut source = ChromeSession::launch(&self.config).map_err(ScrapeError::browser)?;
            self.scrape_with(&mut source, &term, dry_run)
        }
    }

    /// Full run for one term against an already constructed page source.
    /// With `dry_run` only the URLs and manifest are produced.
    pub fn scrape_with(
        &self,
        source: &mut dyn PageSource,
        term: &str,
        dry_run: bool,
    ) -> Result<TermReport, ScrapeError> {
        let _span = tracing::info_span!("term", key = %term).entered();
        let started = Instant::now();
        let term = validate_search_term(term)?;
        let found = self.find_image_urls(source, &term)?;

        let mut report = TermReport::new(&term);
        report.urls_found = found.urls.len();
        report.manifest_path = found.manifest_path;
        if !dry_run {
            let downloads = self.save_images(&found.urls, &term)?;
            report.record_downloads(&downloads);
            report.log_summary();
        }
        report.elapsed = started.elapsed();
        Ok(report)
    }

    /// Downloads the URLs listed in a saved manifest; no browser involved.
    pub fn download_manifest(&self, path: &Path) -> Result<TermReport, ScrapeError> {
        let started = Instant::now();
        let manifest = UrlManifest::load(path)
            .map_err(|e| ScrapeError::file_op("read manifest", path, format!("{:#}", e)))?;
        let _span = tracing::info_span!("manifest", key = %manifest.search_key).entered();
        let urls: Vec<String> = manifest
            .image_urls
            .into_iter()
            .take(self.config.number_of_images)
            .collect();

        let mut report = TermReport::new(&manifest.search_key);
        report.urls_found = urls.len();
        report.manifest_path = Some(path.to_path_buf());
        let downloads = self.save_images(&urls, &manifest.search_key)?;
        report.record_downloads(&downloads);
        report.log_summary();
        report.elapsed = started.elapsed();
        Ok(report)
    }
}

/// Decode, dedup, keep fetchable URLs, truncate.
fn select_urls(candidates: Vec<String>, wanted: usize) -> Vec<String> {
    let decoded = candidates.iter().map(|u| decode_url(u)).collect();
    let mut urls: Vec<String> = dedup_preserving_order(decoded)
        .into_iter()
        .filter(|u| is_fetchable_url(u))
        .collect();
    urls.truncate(wanted);
    urls
}
