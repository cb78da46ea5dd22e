//! CLI for the gimg image search scraper.

mod args;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gimg_core::config::{self, ScrapeConfig};
use std::path::PathBuf;

pub use args::DownloadArgs;
use commands::{run_download, run_extract, run_scrape, show_config};

/// Top-level CLI for gimg.
#[derive(Debug, Parser)]
#[command(name = "gimg")]
#[command(about = "gimg: collect full-resolution images from an image search", long_about = None)]
pub struct Cli {
    /// Debug output on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this config file instead of ~/.config/gimg/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Search for each term, save its URL manifest and download the images.
    Scrape {
        /// Search terms (quote multi-word terms).
        #[arg(required = true)]
        terms: Vec<String>,

        #[command(flatten)]
        download: DownloadArgs,

        /// Scrape up to N terms concurrently.
        #[arg(long, default_value = "1", value_name = "N")]
        jobs: usize,

        /// Run Chrome with a visible window.
        #[arg(long)]
        show_browser: bool,

        /// Fetch the results page over plain HTTP instead of driving Chrome.
        #[arg(long = "static")]
        static_page: bool,

        /// Directory for URL manifests.
        #[arg(long, value_name = "DIR")]
        json_dir: Option<PathBuf>,

        /// Only collect URLs and write the manifest; download nothing.
        #[arg(long)]
        dry_run: bool,
    },

    /// Download the images listed in saved URL manifests.
    Download {
        /// Manifest JSON files written by `gimg scrape`.
        #[arg(required = true)]
        manifests: Vec<PathBuf>,

        #[command(flatten)]
        download: DownloadArgs,

        /// Process up to N manifests concurrently.
        #[arg(long, default_value = "1", value_name = "N")]
        jobs: usize,
    },

    /// Print candidate image URLs found in a saved results page.
    Extract {
        /// HTML file (e.g. saved from the browser).
        file: PathBuf,

        /// Print at most N URLs.
        #[arg(long, value_name = "N")]
        limit: Option<usize>,

        /// Also drop thumbnails and short URLs from every signal.
        #[arg(long)]
        strict: bool,
    },

    /// Show the config file path and effective settings.
    Config,
}

impl Cli {
    fn load_config(&self) -> Result<ScrapeConfig> {
        let cfg = match &self.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);
        Ok(cfg)
    }

    /// Dispatches the parsed command. `Ok(false)` means some term failed.
    pub async fn run(self) -> Result<bool> {
        let mut cfg = self.load_config()?;

        match self.command {
            CliCommand::Scrape {
                terms,
                download,
                jobs,
                show_browser,
                static_page,
                json_dir,
                dry_run,
            } => {
                download.apply(&mut cfg);
                if show_browser {
                    cfg.headless = false;
                }
                if static_page {
                    cfg.static_page = true;
                }
                if let Some(dir) = json_dir {
                    cfg.json_dir = dir;
                }
                run_scrape(cfg, terms, jobs, dry_run).await
            }
            CliCommand::Download {
                manifests,
                download,
                jobs,
            } => {
                download.apply(&mut cfg);
                run_download(cfg, manifests, jobs).await
            }
            CliCommand::Extract {
                file,
                limit,
                strict,
            } => {
                run_extract(&cfg, &file, limit, strict)?;
                Ok(true)
            }
            CliCommand::Config => {
                show_config(&cfg, self.config.as_deref())?;
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests;
