//! Per-term results and run totals.

use std::path::PathBuf;
use std::time::Duration;

use crate::downloader::DownloadReport;

/// Outcome of one search term.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermReport {
    pub search_key: String,
    pub urls_found: usize,
    pub downloaded: usize,
    /// Fetch, decode or write failures.
    pub failed: usize,
    pub duplicates: usize,
    pub rejected_resolution: usize,
    /// URLs never started because the miss limit was hit.
    pub not_attempted: usize,
    pub stopped_early: bool,
    pub manifest_path: Option<PathBuf>,
    pub elapsed: Duration,
    /// Set when the term failed as a whole (browser, config, setup).
    pub error: Option<String>,
}

impl TermReport {
    pub fn new(search_key: &str) -> Self {
        Self {
            search_key: search_key.to_string(),
            ..Self::default()
        }
    }

    pub fn failed_term(search_key: &str, error: impl std::fmt::Display) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::new(search_key)
        }
    }

    pub fn record_downloads(&mut self, downloads: &DownloadReport) {
        self.downloaded = downloads.saved();
        self.failed = downloads.failed();
        self.duplicates = downloads.duplicates();
        self.rejected_resolution = downloads.rejected_resolution();
        self.not_attempted = downloads.not_attempted;
        self.stopped_early = downloads.stopped_early;
    }

    /// Downloaded as a percentage of URLs found; 0 when nothing was found.
    pub fn success_rate(&self) -> f64 {
        rate(self.downloaded, self.urls_found)
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// Logs the per-term summary block.
    pub fn log_summary(&self) {
        tracing::info!("scraping summary for {:?}:", self.search_key);
        tracing::info!("  - URLs found: {}", self.urls_found);
        tracing::info!("  - Images downloaded: {}", self.downloaded);
        tracing::info!(
            "  - Failed downloads: {}",
            self.failed + self.rejected_resolution
        );
        if self.duplicates > 0 {
            tracing::info!("  - Duplicates skipped: {}", self.duplicates);
        }
        if self.stopped_early {
            tracing::info!("  - Stopped early, {} not attempted", self.not_attempted);
        }
        tracing::info!("  - Success rate: {:.1}%", self.success_rate());
    }
}

fn rate(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Sums over every term of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    pub terms: usize,
    pub failed_terms: usize,
    pub urls_found: usize,
    pub downloaded: usize,
    pub failed: usize,
    pub duplicates: usize,
    pub rejected_resolution: usize,
}

impl RunTotals {
    pub fn from_reports(reports: &[TermReport]) -> Self {
        reports.iter().fold(Self::default(), |mut t, r| {
            t.terms += 1;
            t.failed_terms += usize::from(r.is_failure());
            t.urls_found += r.urls_found;
            t.downloaded += r.downloaded;
            t.failed += r.failed;
            t.duplicates += r.duplicates;
            t.rejected_resolution += r.rejected_resolution;
            t
        })
    }

    pub fn success_rate(&self) -> f64 {
        rate(self.downloaded, self.urls_found)
    }
}
