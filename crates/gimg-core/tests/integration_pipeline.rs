//! Integration test: static results page served locally, full scrape into a
//! temp dir, then a re-download from the written manifest.

mod common;

use anyhow::Result;
use common::image_server::{self, png_bytes, Route};
use gimg_core::browser::{ClickLimits, HttpPageSource, PageSource};
use gimg_core::config::ScrapeConfig;
use gimg_core::manifest::UrlManifest;
use gimg_core::scheduler::run_manifests_parallel;
use gimg_core::Scraper;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

/// Static page source pinned to a local results page, whatever URL the
/// pipeline asks for.
struct LocalResults {
    inner: HttpPageSource,
    page_url: String,
    requested: Vec<String>,
}

impl PageSource for LocalResults {
    fn open(&mut self, url: &str) -> Result<()> {
        self.requested.push(url.to_string());
        self.inner.open(&self.page_url)
    }
    fn settle(&mut self, wait: Duration) {
        self.inner.settle(wait)
    }
    fn html(&mut self) -> Result<String> {
        self.inner.html()
    }
    fn scroll_to_bottom(&mut self) -> Result<()> {
        self.inner.scroll_to_bottom()
    }
    fn click_through(&mut self, limits: &ClickLimits) -> Result<Vec<String>> {
        self.inner.click_through(limits)
    }
}

const RED: &str = "/gallery/2021/full-resolution/red-rose-number-one.png";
const PINK: &str = "/gallery/2021/full-resolution/pink-rose-number-two.png";
const SMALL: &str = "/gallery/2021/full-resolution/small-rose-three.png";
const GONE: &str = "/gallery/2021/full-resolution/gone-rose-four.jpg";

fn results_page(base: &str) -> String {
    format!(
        r#"<html><head><title>roses</title></head><body>
<script>AF_initDataCallback({{data:[["{b}{red}",640,480],["{b}{pink}",320,240],["{b}{small}",8,8]]}});</script>
<div><img src="https://encrypted-tbn0.gstatic.com/images?q=tbn:abc123.jpg"></div>
<a href="{b}{gone}">gone</a>
</body></html>"#,
        b = base,
        red = RED,
        pink = PINK,
        small = SMALL,
        gone = GONE,
    )
}

fn config(root: &std::path::Path) -> ScrapeConfig {
    let mut cfg = ScrapeConfig::default();
    cfg.number_of_images = 10;
    cfg.min_resolution = "16x16".parse().unwrap();
    cfg.photos_dir = root.join("photos");
    cfg.json_dir = root.join("google_search");
    cfg.settle_ms = 0;
    cfg.static_page = true;
    cfg
}

#[test]
fn static_page_scrape_writes_manifest_and_images() {
    let server = image_server::start(vec![
        (RED, Route::png(40, 30)),
        (PINK, Route::ok("image/png", png_bytes(32, 24, [250, 180, 200]))),
        (SMALL, Route::ok("image/png", png_bytes(8, 8, [1, 1, 1]))),
    ]);
    // Page links point at the image server.
    let page_server =
        image_server::start(vec![("/search", Route::html(&results_page(&server.base)))]);

    let dir = tempdir().unwrap();
    let cfg = config(dir.path());
    let scraper = Scraper::new(cfg.clone()).unwrap();
    let mut source = LocalResults {
        inner: HttpPageSource::new(&cfg),
        page_url: page_server.url("/search"),
        requested: Vec::new(),
    };

    let report = scraper.scrape_with(&mut source, "red roses", false).unwrap();

    assert!(source.requested[0].contains("q=red%20roses&"));
    assert_eq!(report.search_key, "red roses");
    assert_eq!(report.urls_found, 4);
    assert_eq!(report.downloaded, 2);
    assert_eq!(report.rejected_resolution, 1);
    assert_eq!(report.failed, 1);
    assert!((report.success_rate() - 50.0).abs() < 1e-9);

    let manifest_path = report.manifest_path.clone().unwrap();
    let manifest = UrlManifest::load(&manifest_path).unwrap();
    assert_eq!(manifest.search_key, "red roses");
    assert_eq!(manifest.total_urls, 4);
    assert!(manifest
        .image_urls
        .iter()
        .all(|u| !u.contains("encrypted-tbn")));

    let photos = dir.path().join("photos").join("red_roses");
    let saved: Vec<_> = std::fs::read_dir(&photos)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(saved.len(), 2);
    assert!(saved.iter().all(|n| n.starts_with("red_roses-") && n.ends_with(".jpg")));
}

#[tokio::test]
async fn manifest_can_be_downloaded_again() {
    let server = image_server::start(vec![
        (RED, Route::png(40, 30)),
        (PINK, Route::ok("image/png", png_bytes(32, 24, [250, 180, 200]))),
    ]);
    let dir = tempdir().unwrap();
    let json_dir = dir.path().join("google_search");
    let manifest_path = UrlManifest::save(
        &json_dir,
        "pink roses",
        &[server.url(RED), server.url(PINK)],
    )
    .unwrap();

    let mut cfg = config(dir.path());
    cfg.photos_dir = dir.path().join("again");
    let scraper = Arc::new(Scraper::new(cfg).unwrap());
    let missing = dir.path().join("missing.json");
    let reports =
        run_manifests_parallel(scraper, vec![manifest_path.clone(), missing.clone()], 2).await;

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].search_key, "pink roses");
    assert_eq!(reports[0].downloaded, 2);
    assert_eq!(reports[0].manifest_path.as_deref(), Some(manifest_path.as_path()));
    assert!(dir.path().join("again").join("pink_roses").join("pink_roses-0.jpg").exists());
    assert!(reports[1].is_failure());
    assert_eq!(reports[1].search_key, missing.display().to_string());
}
