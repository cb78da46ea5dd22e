//! Plain HTTP page source: no scripts run, so only the server-rendered
//! markup is seen and click-through finds nothing.

use anyhow::{anyhow, Context, Result};
use std::time::Duration;

use super::{ClickLimits, PageSource};
use crate::config::ScrapeConfig;
use crate::fetch::{fetch, FetchOptions};
use crate::retry::{run_with_retry, RetryPolicy};

/// Results pages are small; anything past this is not a results page.
const MAX_PAGE_BYTES: u64 = 16 * 1024 * 1024;

pub struct HttpPageSource {
    opts: FetchOptions,
    retry: RetryPolicy,
    html: Option<String>,
}

impl HttpPageSource {
    pub fn new(cfg: &ScrapeConfig) -> Self {
        Self {
            opts: FetchOptions {
                timeout: cfg.timeout().max(Duration::from_secs(15)),
                user_agent: cfg.user_agent.clone(),
                max_bytes: MAX_PAGE_BYTES,
            },
            retry: cfg.retry_policy(),
            html: None,
        }
    }
}

impl PageSource for HttpPageSource {
    fn open(&mut self, url: &str) -> Result<()> {
        let fetched = run_with_retry(&self.retry, || fetch(url, &self.opts))
            .with_context(|| format!("fetch results page {}", url))?;
        self.html = Some(String::from_utf8_lossy(&fetched.body).into_owned());
        Ok(())
    }

    fn settle(&mut self, _wait: Duration) {}

    fn html(&mut self) -> Result<String> {
        self.html
            .clone()
            .ok_or_else(|| anyhow!("no page opened"))
    }

    fn scroll_to_bottom(&mut self) -> Result<()> {
        Ok(())
    }

    fn click_through(&mut self, _limits: &ClickLimits) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}
