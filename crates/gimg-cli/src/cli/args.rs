//! Flags shared by `scrape` and `download`.

use clap::Args;
use gimg_core::config::ScrapeConfig;
use gimg_core::image_check::{Resolution, SaveFormat};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Args)]
pub struct DownloadArgs {
    /// Images to keep per term.
    #[arg(short = 'c', long = "count", value_name = "N")]
    pub count: Option<usize>,

    /// Stop a term after N consecutive failed or rejected images.
    #[arg(long, value_name = "N")]
    pub max_missed: Option<usize>,

    /// Concurrent downloads per term.
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Smallest accepted image, e.g. 800x600.
    #[arg(long, value_name = "WxH")]
    pub min_res: Option<Resolution>,

    /// Largest accepted image, e.g. 4000x4000.
    #[arg(long, value_name = "WxH")]
    pub max_res: Option<Resolution>,

    /// Save format: jpg, jpeg, png or original.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<SaveFormat>,

    /// Image root directory; each term gets a subdirectory.
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Name files after the URL instead of <term>-<index>.
    #[arg(long)]
    pub keep_filenames: bool,

    /// Per-image download timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<f64>,
}

impl DownloadArgs {
    /// Overrides config values with the flags that were given.
    pub fn apply(&self, cfg: &mut ScrapeConfig) {
        if let Some(n) = self.count {
            cfg.number_of_images = n;
        }
        if let Some(n) = self.max_missed {
            cfg.max_missed = n;
        }
        if let Some(n) = self.workers {
            cfg.workers = n;
        }
        if let Some(r) = self.min_res {
            cfg.min_resolution = r;
        }
        if let Some(r) = self.max_res {
            cfg.max_resolution = r;
        }
        if let Some(f) = self.format {
            cfg.image_save_format = f;
        }
        if let Some(dir) = &self.output {
            cfg.photos_dir = dir.clone();
        }
        if self.keep_filenames {
            cfg.keep_filenames = true;
        }
        if let Some(t) = self.timeout {
            cfg.timeout_secs = t;
        }
    }
}
