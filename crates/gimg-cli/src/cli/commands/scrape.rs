//! `gimg scrape` – search, save manifests, download.

use anyhow::Result;
use gimg_core::config::ScrapeConfig;
use gimg_core::scheduler;
use gimg_core::{RunTotals, Scraper};
use std::sync::Arc;

use super::progress::spawn_progress_printer;
use super::summary::print_summary;

pub async fn run_scrape(
    cfg: ScrapeConfig,
    terms: Vec<String>,
    jobs: usize,
    dry_run: bool,
) -> Result<bool> {
    let (progress_tx, progress_handle) = spawn_progress_printer();
    let scraper = Arc::new(Scraper::new(cfg)?.with_progress(progress_tx));

    let reports = scheduler::run_terms_parallel(scraper, terms, jobs, dry_run).await;
    let _ = progress_handle.await;

    print_summary(&reports, dry_run);
    Ok(RunTotals::from_reports(&reports).failed_terms == 0)
}
