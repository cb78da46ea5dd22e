pub mod config;
pub mod error;
pub mod logging;

pub mod browser;
pub mod downloader;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod image_check;
pub mod manifest;
pub mod pipeline;
pub mod query;
pub mod report;
pub mod retry;
pub mod scheduler;
pub mod storage;
pub mod url_model;

pub use error::ScrapeError;
pub use pipeline::Scraper;
pub use report::{RunTotals, TermReport};
