//! Removal of temporary downloads.

use std::io;
use std::path::Path;
use tracing::{info, warn};

/// Result of deleting a file. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// The file was already gone.
    NotFound,
    /// Deletion failed for another OS-level reason.
    Failed(String),
}

impl RemoveOutcome {
    pub fn is_removed(&self) -> bool {
        matches!(self, RemoveOutcome::Removed)
    }
}

/// Deletes `path`, reporting instead of propagating any failure.
pub async fn remove_file(path: &Path) -> RemoveOutcome {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            info!("+- File '{}' has been successfully deleted.", path.display());
            RemoveOutcome::Removed
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("+- Error: The file '{}' does not exist.", path.display());
            RemoveOutcome::NotFound
        }
        Err(e) => {
            warn!("+- Error: {}", e);
            RemoveOutcome::Failed(e.to_string())
        }
    }
}
