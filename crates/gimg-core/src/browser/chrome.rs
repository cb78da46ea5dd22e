//! Headless Chrome page source.

use anyhow::{anyhow, Result};
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::{is_preview_url, ClickLimits, PageSource};
use crate::config::ScrapeConfig;

const WINDOW_SIZE: (u32, u32) = (1920, 947);
const CONTAINER_SELECTOR: &str = "div[data-ved]:has(img)";
const PREVIEW_SELECTORS: &[&str] = &[
    r#"img[src*="http"]:not([src*="encrypted-tbn"])"#,
    r#"img[data-src*="http"]:not([data-src*="encrypted-tbn"])"#,
    ".n3VNCb",
    ".iPVvYb",
];
const AFTER_CLICK_PAUSE: Duration = Duration::from_millis(1000);
const AFTER_CLOSE_PAUSE: Duration = Duration::from_millis(500);

/// One browser process with one tab. The process is killed when the session
/// is dropped, including on error paths.
pub struct ChromeSession {
    // Kept alive for the tab; dropping it shuts Chrome down.
    _browser: Browser,
    tab: Arc<Tab>,
    scroll_pause: Duration,
}

impl ChromeSession {
    pub fn launch(cfg: &ScrapeConfig) -> Result<Self> {
        let options = LaunchOptions::default_builder()
            .headless(cfg.headless)
            .window_size(Some(WINDOW_SIZE))
            .build()
            .map_err(|e| anyhow!("chrome launch options: {}", e))?;
        let browser = Browser::new(options)?;
        let tab = browser.new_tab()?;
        tab.set_user_agent(&cfg.user_agent, None, None)?;
        tab.set_default_timeout(Duration::from_millis(cfg.click_timeout_ms.max(1)));
        tracing::debug!(headless = cfg.headless, "chrome session started");
        Ok(Self {
            _browser: browser,
            tab,
            scroll_pause: Duration::from_millis(cfg.scroll_pause_ms),
        })
    }

    fn preview_src(&self, limits: &ClickLimits) -> Option<String> {
        for selector in PREVIEW_SELECTORS {
            let Ok(img) = self
                .tab
                .wait_for_element_with_custom_timeout(selector, limits.probe_timeout)
            else {
                continue;
            };
            let src = match img.get_attribute_value("src") {
                Ok(Some(s)) => Some(s),
                _ => img.get_attribute_value("data-src").ok().flatten(),
            };
            if let Some(src) = src.filter(|s| is_preview_url(s)) {
                return Some(src);
            }
        }
        None
    }

    fn click_one(&self, container: &Element<'_>, limits: &ClickLimits) -> Result<Option<String>> {
        container.click()?;
        thread::sleep(AFTER_CLICK_PAUSE);
        let found = self.preview_src(limits);
        self.tab.press_key("Escape")?;
        thread::sleep(AFTER_CLOSE_PAUSE);
        Ok(found)
    }
}

impl PageSource for ChromeSession {
    fn open(&mut self, url: &str) -> Result<()> {
        self.tab.navigate_to(url)?.wait_until_navigated()?;
        Ok(())
    }

    fn settle(&mut self, wait: Duration) {
        thread::sleep(wait);
    }

    fn html(&mut self) -> Result<String> {
        self.tab.get_content()
    }

    fn scroll_to_bottom(&mut self) -> Result<()> {
        self.tab
            .evaluate("window.scrollTo(0, document.body.scrollHeight)", false)?;
        thread::sleep(self.scroll_pause);
        Ok(())
    }

    fn click_through(&mut self, limits: &ClickLimits) -> Result<Vec<String>> {
        self.tab.set_default_timeout(limits.click_timeout);
        let containers = match self.tab.find_elements(CONTAINER_SELECTOR) {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!("no result containers to click: {}", e);
                return Ok(Vec::new());
            }
        };

        let mut urls = Vec::new();
        for (index, container) in containers.iter().take(limits.max_clicks).enumerate() {
            if urls.len() >= limits.wanted {
                break;
            }
            match self.click_one(container, limits) {
                Ok(Some(url)) => {
                    tracing::debug!(index, "preview url {}", truncate_for_log(&url));
                    urls.push(url);
                }
                Ok(None) => {}
                Err(e) => tracing::debug!(index, "click-through skipped: {}", e),
            }
        }
        Ok(urls)
    }
}

fn truncate_for_log(url: &str) -> &str {
    match url.char_indices().nth(80) {
        Some((i, _)) => &url[..i],
        None => url,
    }
}
