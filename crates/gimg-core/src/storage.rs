//! File lifecycle for saved images and manifests.
//!
//! Bodies are written to `<name>.part`, fsynced, then renamed into place, so
//! a crash never leaves a truncated file under the final name.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ScrapeError;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `cat-1.jpg` → `cat-1.jpg.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Writes `data` to `final_path` via a synced temp file and a rename.
/// Replaces an existing file at `final_path`.
pub fn write_atomic(final_path: &Path, data: &[u8]) -> Result<()> {
    let tp = temp_path(final_path);
    let written = (|| -> Result<()> {
        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tp)
            .with_context(|| format!("failed to create temp file: {}", tp.display()))?;
        file.write_all(data).context("storage write failed")?;
        file.sync_all().context("storage sync failed")?;
        Ok(())
    })();
    if let Err(e) = written {
        let _ = std::fs::remove_file(&tp);
        return Err(e);
    }
    std::fs::rename(&tp, final_path).with_context(|| {
        format!("failed to rename {} to {}", tp.display(), final_path.display())
    })?;
    Ok(())
}

/// Creates `dir` and its parents. Logs when the directory is new.
pub fn ensure_dir(dir: &Path) -> Result<(), ScrapeError> {
    if dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|e| ScrapeError::file_op("create directory", dir, e))?;
    tracing::info!("created directory {}", dir.display());
    Ok(())
}
