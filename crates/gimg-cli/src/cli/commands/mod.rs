//! CLI command handlers. Each command is in its own file.

mod config;
mod download;
mod extract;
mod progress;
mod scrape;
mod summary;

pub use config::show_config;
pub use download::run_download;
pub use extract::run_extract;
pub use scrape::run_scrape;
