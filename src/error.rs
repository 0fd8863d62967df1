//! Error types for catalog operations.

use crate::types::DownloadFailure;
use std::io;
use thiserror::Error;

/// Errors that can occur while building a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// I/O error during local file operations.
    #[error(transparent)]
    IoError(#[from] io::Error),

    /// HTTP request error during download.
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

    /// Manifest parsing or catalog writing error.
    #[error(transparent)]
    CsvError(#[from] csv::Error),

    /// JSON serialization error.
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),

    /// The response body did not match its advertised length.
    #[error("Incomplete body from {url}: expected {expected} bytes, got {received} bytes")]
    IncompleteBody {
        url: String,
        expected: u64,
        received: u64,
    },

    /// A download failed and the run was aborted.
    #[error("Download of '{}' from {} failed: {}", .0.name, .0.url, .0.reason)]
    DownloadFailed(DownloadFailure),
}

impl CatalogError {
    /// Returns `true` for errors caused by the remote side of a download.
    ///
    /// These are reported per row and handled according to the configured
    /// [`DownloadErrorPolicy`](crate::DownloadErrorPolicy). Everything else is
    /// a local failure and propagates.
    pub fn is_download_failure(&self) -> bool {
        matches!(
            self,
            CatalogError::ReqwestError(_) | CatalogError::IncompleteBody { .. }
        )
    }
}
