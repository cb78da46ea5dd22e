//! Concurrent image download with resolution checks and early stop.
//!
//! A fixed pool of worker threads pulls URLs from a shared queue. Each item
//! is fetched, probed, checked against the resolution bounds, deduplicated
//! by body hash, re-encoded if needed and written atomically. Results are
//! processed in completion order; after `max_missed` consecutive misses no
//! new items are started.

mod item;
mod plan;
mod run;

pub use plan::{plan_stems, DownloadPlan};
pub use run::MissCounter;

use std::path::PathBuf;

use crate::error::ScrapeError;
use crate::image_check::Resolution;
use crate::storage::ensure_dir;

/// What happened to one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved(PathBuf),
    /// Same bytes as an image already saved in this run.
    Duplicate,
    RejectedResolution(Resolution),
    Failed(String),
}

impl DownloadOutcome {
    /// Counts toward the consecutive-miss limit.
    pub fn is_miss(&self) -> bool {
        matches!(
            self,
            DownloadOutcome::Failed(_) | DownloadOutcome::RejectedResolution(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadItem {
    /// Position in the input list.
    pub index: usize,
    pub url: String,
    pub outcome: DownloadOutcome,
}

/// Progress messages sent while a batch runs.
#[derive(Debug, Clone)]
pub enum DownloadEvent {
    Finished(DownloadItem),
    StoppedEarly { consecutive_misses: usize },
}

#[derive(Debug, Clone, Default)]
pub struct DownloadReport {
    /// Attempted items, ordered by input index.
    pub items: Vec<DownloadItem>,
    /// URLs never started because the miss limit was hit.
    pub not_attempted: usize,
    pub stopped_early: bool,
}

impl DownloadReport {
    fn count(&self, f: impl Fn(&DownloadOutcome) -> bool) -> usize {
        self.items.iter().filter(|i| f(&i.outcome)).count()
    }

    pub fn saved(&self) -> usize {
        self.count(|o| matches!(o, DownloadOutcome::Saved(_)))
    }

    pub fn duplicates(&self) -> usize {
        self.count(|o| matches!(o, DownloadOutcome::Duplicate))
    }

    pub fn rejected_resolution(&self) -> usize {
        self.count(|o| matches!(o, DownloadOutcome::RejectedResolution(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DownloadOutcome::Failed(_)))
    }

    pub fn saved_paths(&self) -> Vec<&PathBuf> {
        self.items
            .iter()
            .filter_map(|i| match &i.outcome {
                DownloadOutcome::Saved(p) => Some(p),
                _ => None,
            })
            .collect()
    }
}

/// Downloads `urls` into `plan.dir`. Individual failures are recorded in the
/// report; only setup errors (the output directory) are returned as `Err`.
/// Blocking; call from `spawn_blocking` in async code.
pub fn download_images(
    urls: &[String],
    plan: &DownloadPlan,
    progress_tx: Option<&tokio::sync::mpsc::Sender<DownloadEvent>>,
) -> Result<DownloadReport, ScrapeError> {
    ensure_dir(&plan.dir)?;
    if urls.is_empty() {
        return Ok(DownloadReport::default());
    }
    tracing::info!(
        count = urls.len(),
        workers = plan.workers,
        "saving images to {}",
        plan.dir.display()
    );
    let stems = plan_stems(urls, &plan.prefix, plan.keep_filenames);
    let work = urls
        .iter()
        .cloned()
        .zip(stems)
        .enumerate()
        .map(|(index, (url, stem))| run::WorkItem { index, url, stem })
        .collect();
    Ok(run::run_pool(work, plan, progress_tx))
}
