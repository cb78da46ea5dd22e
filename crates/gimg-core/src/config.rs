use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ScrapeError;
use crate::image_check::{Resolution, ResolutionBounds, SaveFormat};
use crate::retry::RetryPolicy;

/// Desktop Chrome UA; image hosts often refuse the curl default.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36";

pub const MAX_NUMBER_OF_IMAGES: usize = 1000;
pub const MAX_WORKERS: usize = 64;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per image (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            base_delay_secs: 0.25,
            max_delay_secs: 5,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(self.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

fn default_thumbnail_patterns() -> Vec<String> {
    [
        "encrypted-tbn",
        "logo",
        "favicon",
        "/s90/",
        "/s100/",
        "/s150/",
        "=s64",
        "=s90",
        "=s100",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_logo_patterns() -> Vec<String> {
    vec!["logo".to_string(), "favicon".to_string()]
}

/// Global configuration loaded from `~/.config/gimg/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Number of image URLs to keep per search term.
    pub number_of_images: usize,
    /// Consecutive download misses after which a term stops starting new downloads.
    pub max_missed: usize,
    /// Concurrent download workers per term.
    pub workers: usize,
    /// Run Chrome without a window.
    pub headless: bool,
    /// Fetch the results page over plain HTTP instead of driving Chrome.
    pub static_page: bool,
    pub min_resolution: Resolution,
    pub max_resolution: Resolution,
    /// Name files after the URL path instead of `<key>-<index>`.
    pub keep_filenames: bool,
    pub image_save_format: SaveFormat,
    /// Per-image download timeout in seconds.
    pub timeout_secs: f64,
    /// Bodies larger than this are rejected without decoding.
    pub max_image_bytes: u64,
    /// Wait after navigation before reading the page.
    pub settle_ms: u64,
    /// Scrolls performed before clicking through result tiles.
    pub scroll_attempts: u32,
    pub scroll_pause_ms: u64,
    pub click_timeout_ms: u64,
    /// Image root; each search term gets its own subdirectory.
    pub photos_dir: PathBuf,
    /// Directory for URL manifests.
    pub json_dir: PathBuf,
    /// Substrings marking thumbnail or proxy URLs.
    pub thumbnail_patterns: Vec<String>,
    /// Substrings marking site chrome (logos, favicons).
    pub logo_patterns: Vec<String>,
    pub user_agent: String,
    /// Optional retry policy; if missing, built-in defaults are used.
    pub retry: Option<RetryConfig>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            number_of_images: 10,
            max_missed: 10,
            workers: 4,
            headless: true,
            static_page: false,
            min_resolution: Resolution::new(0, 0),
            max_resolution: Resolution::new(9999, 9999),
            keep_filenames: false,
            image_save_format: SaveFormat::Jpg,
            timeout_secs: 5.0,
            max_image_bytes: 25 * 1024 * 1024,
            settle_ms: 3000,
            scroll_attempts: 3,
            scroll_pause_ms: 2000,
            click_timeout_ms: 3000,
            photos_dir: PathBuf::from("photos"),
            json_dir: PathBuf::from("google_search"),
            thumbnail_patterns: default_thumbnail_patterns(),
            logo_patterns: default_logo_patterns(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry: None,
        }
    }
}

impl ScrapeConfig {
    pub fn bounds(&self) -> ResolutionBounds {
        ResolutionBounds::new(self.min_resolution, self.max_resolution)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs.max(0.0))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().to_policy()
    }

    /// Rejects values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ScrapeError> {
        let bad = |msg: String| Err(ScrapeError::Configuration(msg));
        if !(1..=MAX_NUMBER_OF_IMAGES).contains(&self.number_of_images) {
            return bad(format!(
                "number_of_images must be between 1 and {}, got {}",
                MAX_NUMBER_OF_IMAGES, self.number_of_images
            ));
        }
        if !(1..=MAX_WORKERS).contains(&self.workers) {
            return bad(format!(
                "workers must be between 1 and {}, got {}",
                MAX_WORKERS, self.workers
            ));
        }
        if self.max_missed == 0 {
            return bad("max_missed must be at least 1".to_string());
        }
        if !(self.timeout_secs.is_finite() && self.timeout_secs > 0.0) {
            return bad(format!("timeout_secs must be positive, got {}", self.timeout_secs));
        }
        if self.min_resolution.width > self.max_resolution.width
            || self.min_resolution.height > self.max_resolution.height
        {
            return bad(format!(
                "min_resolution {} exceeds max_resolution {}",
                self.min_resolution, self.max_resolution
            ));
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("gimg")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ScrapeConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ScrapeConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<ScrapeConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: ScrapeConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = ScrapeConfig::default();
        assert_eq!(cfg.number_of_images, 10);
        assert_eq!(cfg.max_missed, 10);
        assert!(cfg.headless);
        assert!(!cfg.static_page);
        assert_eq!(cfg.max_resolution, Resolution::new(9999, 9999));
        assert_eq!(cfg.image_save_format, SaveFormat::Jpg);
        assert!(cfg.thumbnail_patterns.iter().any(|p| p == "encrypted-tbn"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = ScrapeConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        assert!(toml.contains("max_resolution = \"9999x9999\""));
        let parsed: ScrapeConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.number_of_images, cfg.number_of_images);
        assert_eq!(parsed.min_resolution, cfg.min_resolution);
        assert_eq!(parsed.thumbnail_patterns, cfg.thumbnail_patterns);
    }

    #[test]
    fn config_toml_partial_uses_defaults() {
        let toml = r#"
            number_of_images = 25
            min_resolution = "800x600"
            image_save_format = "png"
        "#;
        let cfg: ScrapeConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.number_of_images, 25);
        assert_eq!(cfg.min_resolution, Resolution::new(800, 600));
        assert_eq!(cfg.image_save_format, SaveFormat::Png);
        assert_eq!(cfg.workers, 4);
        assert!(cfg.retry.is_none());
    }

    #[test]
    fn config_toml_retry_section() {
        let toml = r#"
            [retry]
            max_attempts = 3
            base_delay_secs = 0.5
            max_delay_secs = 15
        "#;
        let cfg: ScrapeConfig = toml::from_str(toml).unwrap();
        let policy = cfg.retry_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_millis(500));
        assert_eq!(policy.max_delay, Duration::from_secs(15));
    }

    #[test]
    fn config_toml_rejects_bad_resolution() {
        let toml = r#"max_resolution = "big""#;
        assert!(toml::from_str::<ScrapeConfig>(toml).is_err());
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let mut cfg = ScrapeConfig::default();
        cfg.number_of_images = 0;
        assert!(matches!(cfg.validate(), Err(ScrapeError::Configuration(_))));

        let mut cfg = ScrapeConfig::default();
        cfg.workers = 65;
        assert!(cfg.validate().is_err());

        let mut cfg = ScrapeConfig::default();
        cfg.max_missed = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = ScrapeConfig::default();
        cfg.timeout_secs = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = ScrapeConfig::default();
        cfg.min_resolution = Resolution::new(2000, 10);
        cfg.max_resolution = Resolution::new(1920, 1080);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "workers = 8\nheadless = false\n").unwrap();
        let cfg = load_from_path(&path).unwrap();
        assert_eq!(cfg.workers, 8);
        assert!(!cfg.headless);
    }
}
