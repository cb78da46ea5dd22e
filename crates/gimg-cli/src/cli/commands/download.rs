//! `gimg download` – fetch the images listed in saved manifests.

use anyhow::Result;
use gimg_core::config::ScrapeConfig;
use gimg_core::scheduler;
use gimg_core::{RunTotals, Scraper};
use std::path::PathBuf;
use std::sync::Arc;

use super::progress::spawn_progress_printer;
use super::summary::print_summary;

pub async fn run_download(cfg: ScrapeConfig, manifests: Vec<PathBuf>, jobs: usize) -> Result<bool> {
    let (progress_tx, progress_handle) = spawn_progress_printer();
    let scraper = Arc::new(Scraper::new(cfg)?.with_progress(progress_tx));

    let reports = scheduler::run_manifests_parallel(scraper, manifests, jobs).await;
    let _ = progress_handle.await;

    print_summary(&reports, false);
    Ok(RunTotals::from_reports(&reports).failed_terms == 0)
}
