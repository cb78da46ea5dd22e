//! One URL: fetch, probe, check, dedup, encode, write.

use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::Mutex;

use super::{DownloadOutcome, DownloadPlan};
use crate::error::ScrapeError;
use crate::fetch::fetch;
use crate::filter::is_fetchable_url;
use crate::image_check::{encode_for_save, probe};
use crate::retry::run_with_retry;
use crate::storage::write_atomic;

/// Body digests saved so far in this batch.
pub(super) type SeenHashes = Mutex<HashSet<String>>;

fn failed(url: &str, reason: impl std::fmt::Display) -> DownloadOutcome {
    let err = ScrapeError::ImageDownload {
        url: url.to_string(),
        reason: reason.to_string(),
    };
    tracing::warn!("{}", err);
    DownloadOutcome::Failed(reason.to_string())
}

pub(super) fn download_one(
    index: usize,
    url: &str,
    stem: &str,
    plan: &DownloadPlan,
    seen: &SeenHashes,
) -> DownloadOutcome {
    if !is_fetchable_url(url) {
        return failed(url, "not an http(s) url");
    }
    let fetched = match run_with_retry(&plan.retry, || fetch(url, &plan.fetch)) {
        Ok(f) => f,
        Err(e) => return failed(url, e),
    };
    tracing::debug!(
        index,
        content_type = ?fetched.content_type,
        bytes = fetched.body.len(),
        "fetched {}",
        fetched.effective_url
    );
    let probed = match probe(&fetched.body) {
        Ok(p) => p,
        Err(e) => return failed(url, format!("{:#}", e)),
    };
    if let Err(e) = plan.bounds.check(probed.resolution) {
        tracing::info!(index, "skipping image: {}", e);
        return DownloadOutcome::RejectedResolution(probed.resolution);
    }

    let digest = hex::encode(Sha256::digest(&fetched.body));
    if !lock(seen).insert(digest.clone()) {
        tracing::info!(index, url = %url, "skipping image: same content already saved");
        return DownloadOutcome::Duplicate;
    }

    let saved = encode_for_save(&fetched.body, &probed, plan.format).and_then(|(bytes, ext)| {
        let path = plan.dir.join(format!("{}.{}", stem, ext));
        write_atomic(&path, &bytes)?;
        Ok(path)
    });
    match saved {
        Ok(path) => {
            tracing::info!(index, resolution = %probed.resolution, "image saved at {}", path.display());
            DownloadOutcome::Saved(path)
        }
        Err(e) => {
            // Nothing was written, so a later copy of these bytes may still be saved.
            lock(seen).remove(&digest);
            failed(url, format!("{:#}", e))
        }
    }
}

fn lock(seen: &SeenHashes) -> std::sync::MutexGuard<'_, HashSet<String>> {
    seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
