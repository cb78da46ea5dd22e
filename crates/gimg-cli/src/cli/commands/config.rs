//! `gimg config` – show where settings come from and their values.

use anyhow::Result;
use gimg_core::config::{self, ScrapeConfig};
use std::path::Path;

pub fn show_config(cfg: &ScrapeConfig, explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
