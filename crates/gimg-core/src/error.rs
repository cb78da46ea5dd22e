//! Public error type for the scrape pipeline.
//!
//! Modules use `anyhow` internally; `Scraper` converts failures into
//! `ScrapeError` at its boundary so callers can match on what went wrong.

use crate::image_check::{Resolution, ResolutionBounds};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// Launching, navigating or querying the page source failed.
    #[error("browser: {0}")]
    Browser(String),

    #[error("failed to download image from {url}: {reason}")]
    ImageDownload { url: String, reason: String },

    #[error("image resolution {actual} not within bounds [{}, {}]", .bounds.min, .bounds.max)]
    InvalidResolution {
        actual: Resolution,
        bounds: ResolutionBounds,
    },

    #[error("url extraction: {0}")]
    UrlExtraction(String),

    #[error("failed to {operation} {}: {reason}", .path.display())]
    FileOperation {
        operation: &'static str,
        path: PathBuf,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl ScrapeError {
    pub fn browser(err: impl std::fmt::Display) -> Self {
        ScrapeError::Browser(format!("{:#}", err))
    }

    pub fn file_op(operation: &'static str, path: &Path, err: impl std::fmt::Display) -> Self {
        ScrapeError::FileOperation {
            operation,
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_operation_message_names_path() {
        let e = ScrapeError::file_op("create dir", Path::new("/nope/photos"), "permission denied");
        assert_eq!(
            e.to_string(),
            "failed to create dir /nope/photos: permission denied"
        );
    }

    #[test]
    fn invalid_resolution_message() {
        let e = ScrapeError::InvalidResolution {
            actual: Resolution::new(100, 50),
            bounds: ResolutionBounds::new(Resolution::new(200, 200), Resolution::new(800, 600)),
        };
        assert_eq!(
            e.to_string(),
            "image resolution 100x50 not within bounds [200x200, 800x600]"
        );
    }
}
