//! Page sources: where the results-page HTML comes from.
//!
//! `ChromeSession` drives a real browser so script-rendered results and
//! click-through previews are available. `HttpPageSource` fetches the static
//! markup only. The pipeline talks to both through `PageSource`, which also
//! lets tests feed fixture pages.

mod chrome;
mod static_page;

pub use chrome::ChromeSession;
pub use static_page::HttpPageSource;

use anyhow::Result;
use std::time::Duration;

use crate::config::ScrapeConfig;
use crate::filter::{MIN_URL_LEN, THUMBNAIL_PROXY_MARKER};

/// Bounds for the click-through pass over result tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickLimits {
    /// Result containers to try at most.
    pub max_clicks: usize,
    /// Stop once this many preview URLs were gathered.
    pub wanted: usize,
    pub click_timeout: Duration,
    /// How long each preview selector may take to appear.
    pub probe_timeout: Duration,
}

impl ClickLimits {
    pub fn from_config(cfg: &ScrapeConfig) -> Self {
        Self {
            max_clicks: cfg.number_of_images.saturating_mul(2),
            wanted: cfg.number_of_images,
            click_timeout: Duration::from_millis(cfg.click_timeout_ms),
            probe_timeout: Duration::from_secs(2),
        }
    }
}

/// A rendered (or fetched) results page.
pub trait PageSource {
    fn open(&mut self, url: &str) -> Result<()>;

    /// Gives the page time to finish rendering.
    fn settle(&mut self, wait: Duration);

    /// Current document markup.
    fn html(&mut self) -> Result<String>;

    fn scroll_to_bottom(&mut self) -> Result<()>;

    /// Opens result previews one by one and returns the full-size URLs they
    /// show. Failures on individual tiles are skipped.
    fn click_through(&mut self, limits: &ClickLimits) -> Result<Vec<String>>;
}

/// Whether a preview `src` looks like a full-size image rather than the
/// proxied thumbnail.
pub fn is_preview_url(src: &str) -> bool {
    src.contains("http") && !src.contains(THUMBNAIL_PROXY_MARKER) && src.len() > MIN_URL_LEN
}
