//! Bounded worker pool over the download queue.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use super::item::{download_one, SeenHashes};
use super::{DownloadEvent, DownloadItem, DownloadOutcome, DownloadPlan, DownloadReport};

pub(super) struct WorkItem {
    pub index: usize,
    pub url: String,
    pub stem: String,
}

/// Consecutive misses in completion order. Saves reset it, duplicates leave
/// it alone.
#[derive(Debug, Clone, Copy)]
pub struct MissCounter {
    consecutive: usize,
    limit: usize,
}

impl MissCounter {
    pub fn new(limit: usize) -> Self {
        Self {
            consecutive: 0,
            limit: limit.max(1),
        }
    }

    /// Records one outcome; returns true once the limit is reached.
    pub fn record(&mut self, outcome: &DownloadOutcome) -> bool {
        match outcome {
            DownloadOutcome::Saved(_) => self.consecutive = 0,
            DownloadOutcome::Duplicate => {}
            DownloadOutcome::Failed(_) | DownloadOutcome::RejectedResolution(_) => {
                self.consecutive += 1
            }
        }
        self.tripped()
    }

    pub fn tripped(&self) -> bool {
        self.consecutive >= self.limit
    }

    pub fn consecutive(&self) -> usize {
        self.consecutive
    }
}

/// Runs `work` with `min(plan.workers, work.len())` threads. Results are
/// handled as they arrive; when the miss limit trips the queue is drained and
/// only in-flight items are still awaited.
pub(super) fn run_pool(
    work: Vec<WorkItem>,
    plan: &DownloadPlan,
    progress_tx: Option<&tokio::sync::mpsc::Sender<DownloadEvent>>,
) -> DownloadReport {
    let count = work.len();
    let queue: Arc<Mutex<VecDeque<WorkItem>>> = Arc::new(Mutex::new(work.into_iter().collect()));
    let stop = Arc::new(AtomicBool::new(false));
    let seen: Arc<SeenHashes> = Arc::new(Mutex::new(Default::default()));
    let (tx, rx) = mpsc::channel();
    let num_workers = plan.workers.max(1).min(count);
    let mut handles = Vec::with_capacity(num_workers);
    for _ in 0..num_workers {
        let queue = Arc::clone(&queue);
        let stop = Arc::clone(&stop);
        let seen = Arc::clone(&seen);
        let tx = tx.clone();
        let plan = plan.clone();
        handles.push(std::thread::spawn(move || loop {
            if stop.load(Ordering::Relaxed) {
                break;
            }
            let next = queue
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .pop_front();
            let Some(item) = next else {
                break;
            };
            let outcome = download_one(item.index, &item.url, &item.stem, &plan, &seen);
            let _ = tx.send(DownloadItem {
                index: item.index,
                url: item.url,
                outcome,
            });
        }));
    }
    drop(tx);

    let mut report = DownloadReport::default();
    let mut misses = MissCounter::new(plan.max_missed);
    let mut to_receive = count;
    while to_receive > 0 {
        let Ok(done) = rx.recv() else {
            tracing::error!("download worker channel closed early (worker may have panicked)");
            break;
        };
        to_receive -= 1;
        let tripped = misses.record(&done.outcome);
        if let Some(progress_tx) = progress_tx {
            let _ = progress_tx.try_send(DownloadEvent::Finished(done.clone()));
        }
        report.items.push(done);

        if tripped && !report.stopped_early {
            stop.store(true, Ordering::Relaxed);
            let drained = {
                let mut q = queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                let n = q.len();
                q.clear();
                n
            };
            to_receive = to_receive.saturating_sub(drained);
            report.not_attempted = drained;
            report.stopped_early = true;
            tracing::warn!(
                consecutive_misses = misses.consecutive(),
                skipped = drained,
                "too many consecutive misses, not starting further downloads"
            );
            if let Some(progress_tx) = progress_tx {
                let _ = progress_tx.try_send(DownloadEvent::StoppedEarly {
                    consecutive_misses: misses.consecutive(),
                });
            }
        }
    }
    for h in handles {
        if let Err(e) = h.join() {
            tracing::error!("download worker panicked: {:?}", e);
        }
    }
    report.items.sort_by_key(|i| i.index);
    report
}
