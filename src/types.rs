//! Data structures for catalog operations.

use crate::error::CatalogError;
use crate::remove::RemoveOutcome;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What to do when a manifest row cannot be downloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadErrorPolicy {
    /// Stop the whole walk. No catalog is written.
    #[default]
    Abort,
    /// Record the failure and skip the remaining rows of the same manifest.
    SkipManifest,
    /// Record the failure and move on to the next row.
    Continue,
}

/// Configuration for building a catalog.
///
/// # Example
///
/// ```
/// use crcatalog::{CatalogConfig, DownloadErrorPolicy};
///
/// let config = CatalogConfig {
///     root: "mirror".into(),
///     on_download_error: DownloadErrorPolicy::Continue,
///     ..CatalogConfig::default()
/// };
/// assert_eq!(config.manifest_name, "list.txt");
/// ```
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Directory to walk for manifests (default: `.`).
    pub root: PathBuf,
    /// Exact file name of a manifest (default: `list.txt`).
    pub manifest_name: String,
    /// Catalog output path (default: `catalog.txt`).
    pub output: PathBuf,
    /// Directory that holds the per-row temporary downloads (default: `.`).
    pub temp_dir: PathBuf,
    /// Handling of failed downloads (default: abort).
    pub on_download_error: DownloadErrorPolicy,
    /// Draw a progress bar for each download.
    pub show_progress: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            manifest_name: crate::manifest::MANIFEST_FILE_NAME.to_string(),
            output: PathBuf::from(crate::catalog::CATALOG_FILE_NAME),
            temp_dir: PathBuf::from("."),
            on_download_error: DownloadErrorPolicy::Abort,
            show_progress: false,
        }
    }
}

/// One `name;url` line of a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    pub name: String,
    pub url: String,
}

/// One row of the output catalog.
///
/// Field order is the column order of `catalog.txt`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    /// Manifest directory relative to the walk root.
    pub directory: String,
    pub url: String,
    /// CRC32 as 8 uppercase hex digits.
    pub checksum: String,
}

/// A row whose download did not succeed.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DownloadFailure {
    pub name: String,
    pub directory: String,
    pub url: String,
    pub reason: String,
}

/// Result of handling a single manifest line.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// Downloaded, checksummed and cleaned up.
    Processed(CatalogEntry),
    /// Catalogued, but the temporary download could not be removed.
    DeleteWarning {
        entry: CatalogEntry,
        removal: RemoveOutcome,
    },
    /// The line did not have exactly two fields.
    SkippedMalformed { line: u64, fields: usize },
    /// The download failed.
    DownloadFailed(DownloadFailure),
}

/// Accumulated result of a walk.
#[derive(Serialize, Debug, Default, Clone)]
pub struct ProcessReport {
    /// Number of manifests opened.
    pub manifests: usize,
    /// Catalog entries in discovery order.
    pub entries: Vec<CatalogEntry>,
    pub skipped_malformed: usize,
    pub delete_warnings: usize,
    pub failed_downloads: Vec<DownloadFailure>,
}

impl ProcessReport {
    /// Folds one row outcome into the report.
    pub fn record(&mut self, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Processed(entry) => self.entries.push(entry),
            RowOutcome::DeleteWarning { entry, .. } => {
                self.delete_warnings += 1;
                self.entries.push(entry);
            }
            RowOutcome::SkippedMalformed { .. } => self.skipped_malformed += 1,
            RowOutcome::DownloadFailed(failure) => self.failed_downloads.push(failure),
        }
    }

    /// Persists the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<(), CatalogError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
