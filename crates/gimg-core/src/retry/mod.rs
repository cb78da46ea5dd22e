//! Retry and backoff policy for image fetches.
//!
//! Classifies fetch failures (timeouts, throttling, connection drops, 5xx)
//! and decides capped exponential backoff, so the downloader and the static
//! page source share one policy.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
