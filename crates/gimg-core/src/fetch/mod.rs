//! Single-request HTTP GET into memory.
//!
//! Used for image bodies and for the static results page. Each call builds its
//! own curl `Easy` handle, so it is safe to call from many worker threads.

mod error;

pub use error::FetchError;

use std::str;
use std::time::Duration;

use crate::config::ScrapeConfig;

/// Per-request settings.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Total wall-clock limit for the request.
    pub timeout: Duration,
    pub user_agent: String,
    /// Abort once the body grows past this many bytes.
    pub max_bytes: u64,
}

impl FetchOptions {
    pub fn from_config(cfg: &ScrapeConfig) -> Self {
        Self {
            timeout: cfg.timeout(),
            user_agent: cfg.user_agent.clone(),
            max_bytes: cfg.max_image_bytes,
        }
    }
}

/// A completed 2xx response.
#[derive(Debug, Clone)]
pub struct Fetched {
    /// URL after redirects.
    pub effective_url: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// GETs `url`, following redirects, and returns the body.
/// Blocking; call from a worker thread or `spawn_blocking`.
pub fn fetch(url: &str, opts: &FetchOptions) -> Result<Fetched, FetchError> {
    let mut body: Vec<u8> = Vec::new();
    let mut content_type: Option<String> = None;
    let mut too_large = false;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.useragent(&opts.user_agent)?;
    easy.accept_encoding("")?;
    easy.connect_timeout(opts.timeout.min(Duration::from_secs(30)))?;
    easy.timeout(opts.timeout)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(line) = str::from_utf8(data) {
                if let Some((name, value)) = line.split_once(':') {
                    if name.trim().eq_ignore_ascii_case("content-type") {
                        content_type = Some(value.trim().to_string());
                    }
                }
            }
            true
        })?;
        transfer.write_function(|data| {
            if body.len() as u64 + data.len() as u64 > opts.max_bytes {
                too_large = true;
                return Ok(0); // abort transfer
            }
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()
    };
    if let Err(e) = performed {
        if e.is_write_error() && too_large {
            return Err(FetchError::TooLarge {
                limit: opts.max_bytes,
            });
        }
        return Err(FetchError::Curl(e));
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }
    let effective_url = easy
        .effective_url()?
        .map(str::to_string)
        .unwrap_or_else(|| url.to_string());

    Ok(Fetched {
        effective_url,
        content_type,
        body,
    })
}
