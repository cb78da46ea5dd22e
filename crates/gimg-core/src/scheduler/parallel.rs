//! Run multiple terms concurrently.
//!
//! Keeps up to `max_concurrent` blocking scrapes running at once; when one
//! finishes, the next queued item is started until the queue is empty.

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::error::ScrapeError;
use crate::pipeline::Scraper;
use crate::report::TermReport;

/// Runs `work(item)` for every item with at most `max_concurrent` in flight.
/// A failing item becomes a failed `TermReport` labelled with `label(item)`;
/// it never cancels the others. Reports come back in input order.
pub async fn run_parallel<T, W, L>(
    items: Vec<T>,
    max_concurrent: usize,
    work: W,
    label: L,
) -> Vec<TermReport>
where
    T: Send + 'static,
    W: Fn(&T) -> Result<TermReport, ScrapeError> + Send + Sync + 'static,
    L: Fn(&T) -> String,
{
    let max_concurrent = max_concurrent.max(1);
    let work = Arc::new(work);
    let mut reports: Vec<TermReport> = items
        .iter()
        .map(|item| TermReport::failed_term(&label(item), "task did not complete"))
        .collect();
    let mut queue: VecDeque<(usize, T)> = items.into_iter().enumerate().collect();
    let mut join_set = tokio::task::JoinSet::new();

    loop {
        while join_set.len() < max_concurrent {
            let Some((index, item)) = queue.pop_front() else {
                break;
            };
            let work = Arc::clone(&work);
            join_set.spawn_blocking(move || {
                let started = Instant::now();
                let result = work(&item).map_err(|e| (e, started.elapsed()));
                (index, result)
            });
        }

        if join_set.is_empty() {
            break;
        }

        let Some(res) = join_set.join_next().await else {
            break;
        };
        match res {
            Ok((index, Ok(report))) => reports[index] = report,
            Ok((index, Err((e, elapsed)))) => {
                let key = reports[index].search_key.clone();
                tracing::error!("scraping failed for {:?}: {}", key, e);
                let mut failed = TermReport::failed_term(&key, &e);
                failed.elapsed = elapsed;
                reports[index] = failed;
            }
            Err(e) => tracing::error!("scrape task join: {}", e),
        }
    }

    reports
}

/// Scrapes each distinct term (first occurrence order kept).
pub async fn run_terms_parallel(
    scraper: Arc<Scraper>,
    terms: Vec<String>,
    max_concurrent: usize,
    dry_run: bool,
) -> Vec<TermReport> {
    let mut seen = HashSet::new();
    let terms: Vec<String> = terms
        .into_iter()
        .filter(|t| seen.insert(t.split_whitespace().collect::<Vec<_>>().join(" ")))
        .collect();
    run_parallel(
        terms,
        max_concurrent,
        move |term: &String| scraper.scrape(term, dry_run),
        |term| term.clone(),
    )
    .await
}

/// Downloads each manifest without a browser.
pub async fn run_manifests_parallel(
    scraper: Arc<Scraper>,
    manifests: Vec<PathBuf>,
    max_concurrent: usize,
) -> Vec<TermReport> {
    run_parallel(
        manifests,
        max_concurrent,
        move |path: &PathBuf| scraper.download_manifest(path),
        |path| path.display().to_string(),
    )
    .await
}
