//! Fetch error type used for retry classification.

use std::fmt;

/// Error returned by a single GET. Kept separate from `anyhow` so the retry
/// policy can classify it before it is turned into a miss reason.
#[derive(Debug)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, etc.).
    Curl(curl::Error),
    /// Response had a non-2xx status.
    Http(u32),
    /// Body grew past the configured cap; transfer was aborted.
    TooLarge { limit: u64 },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Curl(e) => write!(f, "{}", e),
            FetchError::Http(code) => write!(f, "HTTP {}", code),
            FetchError::TooLarge { limit } => write!(f, "body exceeds {} bytes", limit),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Curl(e) => Some(e),
            FetchError::Http(_) | FetchError::TooLarge { .. } => None,
        }
    }
}

impl From<curl::Error> for FetchError {
    fn from(e: curl::Error) -> Self {
        FetchError::Curl(e)
    }
}
