//! Sitemap file writer
//!
//! Writes go to a sibling `<name>.tmp` file that is synced and then renamed
//! over the target, so readers never observe a half-written sitemap.

use crate::output::sitemap::render;
use crate::output::traits::{CrawlReport, OutputError, OutputHandler, OutputResult};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically replaces the file at `path` with `contents`
///
/// Missing parent directories are created. On failure the temporary file is
/// removed and the target is left untouched.
///
/// # Arguments
///
/// * `path` - Destination file
/// * `contents` - Bytes to write
///
/// # Returns
///
/// * `Ok(())` - The target now holds `contents`
/// * `Err(OutputError)` - Nothing was replaced
pub fn write_atomic(path: &Path, contents: &[u8]) -> OutputResult<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| OutputError::Write(format!("{} is not a file path", path.display())))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = OsString::from(file_name);
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let result = write_and_sync(&tmp_path, contents).and_then(|()| fs::rename(&tmp_path, path));

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(OutputError::Write(format!(
            "failed to write {}: {}",
            path.display(),
            e
        )));
    }

    Ok(())
}

fn write_and_sync(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

/// Writes the visited set of a report as a sitemap file
#[derive(Debug, Clone)]
pub struct SitemapFileOutput {
    path: PathBuf,
}

impl SitemapFileOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputHandler for SitemapFileOutput {
    fn write_report(&self, report: &CrawlReport) -> OutputResult<()> {
        let xml = render(&report.visited);
        write_atomic(&self.path, xml.as_bytes())?;

        tracing::info!(
            "Wrote {} URLs to {}",
            report.visited.len(),
            self.path.display()
        );
        Ok(())
    }
}
