//! crcatalog - Catalog CRC32 checksums of resources listed in manifest files
//!
//! This library walks a directory tree for `list.txt` manifests, each holding
//! `name;url` lines, downloads every listed resource to a temporary file,
//! computes its CRC32 and writes the results to a single `catalog.txt`.
//!
//! # Features
//!
//! - **Streaming Checksums**: Files are hashed in 8 KiB chunks
//! - **Scoped Temp Files**: Every download gets its own temp file, removed on every exit path
//! - **Error Policies**: Abort on the first failed download, or skip and keep going
//! - **Atomic Output**: The catalog replaces the previous one in a single rename
//!
//! # Example
//!
//! ```no_run
//! use crcatalog::{build_catalog, CatalogConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CatalogConfig::default();
//! let report = build_catalog(&config).await?;
//! println!("catalogued {} entries", report.entries.len());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod checksum;
pub mod download;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod remove;
pub mod types;

pub use catalog::{write_catalog, CATALOG_FILE_NAME};
pub use checksum::{crc32_file, format_checksum};
pub use error::CatalogError;
pub use manifest::MANIFEST_FILE_NAME;
pub use orchestrator::{build_catalog, process_directory};
pub use remove::RemoveOutcome;
pub use types::{
    CatalogConfig, CatalogEntry, DownloadErrorPolicy, DownloadFailure, ManifestRow,
    ProcessReport, RowOutcome,
};
