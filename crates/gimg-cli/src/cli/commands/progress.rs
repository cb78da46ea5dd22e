//! Prints saved files to stdout as downloads finish.

use gimg_core::downloader::{DownloadEvent, DownloadOutcome};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Returns the sender to hand to the scraper and the printer task, which ends
/// once every sender is dropped.
pub fn spawn_progress_printer() -> (mpsc::Sender<DownloadEvent>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<DownloadEvent>(64);
    let handle = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                DownloadEvent::Finished(item) => {
                    if let DownloadOutcome::Saved(path) = item.outcome {
                        println!("{}", path.display());
                    }
                }
                DownloadEvent::StoppedEarly { consecutive_misses } => {
                    eprintln!(
                        "  stopping after {} consecutive misses",
                        consecutive_misses
                    );
                }
            }
        }
    });
    (tx, handle)
}
