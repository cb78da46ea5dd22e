//! Runs several search terms (or manifests) concurrently.

mod parallel;

pub use parallel::{run_manifests_parallel, run_parallel, run_terms_parallel};
