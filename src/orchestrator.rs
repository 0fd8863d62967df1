//! Main orchestration logic for building a catalog.

use crate::catalog::write_catalog;
use crate::checksum::{compute_file_crc32, format_checksum};
use crate::download::download_file;
use crate::error::CatalogError;
use crate::manifest::{find_manifests, read_manifest, relative_directory, ManifestLine};
use crate::remove::remove_file;
use crate::types::{
    CatalogConfig, CatalogEntry, DownloadErrorPolicy, DownloadFailure, ManifestRow,
    ProcessReport, RowOutcome,
};
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Walks `config.root`, downloads and checksums every manifest row, and
/// returns the accumulated report.
///
/// Rows are handled strictly one after another. Under
/// [`DownloadErrorPolicy::Abort`] the first failed download ends the walk
/// with [`CatalogError::DownloadFailed`]. Local I/O errors always propagate.
///
/// # Example
///
/// ```no_run
/// use crcatalog::{process_directory, CatalogConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = process_directory(&CatalogConfig::default()).await?;
/// println!("{} entries", report.entries.len());
/// # Ok(())
/// # }
/// ```
pub async fn process_directory(config: &CatalogConfig) -> Result<ProcessReport, CatalogError> {
    let client = reqwest::Client::new();
    let pb = if config.show_progress {
        let progress_bar = indicatif::ProgressBar::new(0);
        progress_bar.set_style(
            indicatif::ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar()),
        );
        progress_bar
    } else {
        indicatif::ProgressBar::hidden()
    };

    let mut report = ProcessReport::default();

    for manifest in find_manifests(&config.root, &config.manifest_name) {
        info!("+\n+ Processing {}", manifest.display());
        let lines = read_manifest(&manifest)?;
        report.manifests += 1;

        let dir = manifest.parent().unwrap_or(config.root.as_path());
        let ctx = RowContext {
            client: &client,
            temp_dir: &config.temp_dir,
            directory: relative_directory(&config.root, dir),
            pb: &pb,
        };

        for line in lines {
            let outcome = match line {
                ManifestLine::Row(row) => process_row(&ctx, &row).await?,
                ManifestLine::Malformed { line, fields } => {
                    debug!(
                        manifest = %manifest.display(),
                        line,
                        fields,
                        "Skipping manifest line without exactly two fields"
                    );
                    RowOutcome::SkippedMalformed { line, fields }
                }
            };

            let skip_rest = match (&outcome, config.on_download_error) {
                (RowOutcome::DownloadFailed(failure), DownloadErrorPolicy::Abort) => {
                    pb.finish_and_clear();
                    return Err(CatalogError::DownloadFailed(failure.clone()));
                }
                (RowOutcome::DownloadFailed(_), DownloadErrorPolicy::SkipManifest) => {
                    warn!("+- Skipping the rest of {}", manifest.display());
                    true
                }
                _ => false,
            };

            report.record(outcome);
            if skip_rest {
                break;
            }
        }
    }

    pb.finish_and_clear();
    Ok(report)
}

/// Runs [`process_directory`] and writes the catalog to `config.output`.
///
/// Nothing is written when the walk fails.
pub async fn build_catalog(config: &CatalogConfig) -> Result<ProcessReport, CatalogError> {
    let report = process_directory(config).await?;
    write_catalog(&config.output, &report.entries)?;

    if !report.failed_downloads.is_empty() {
        warn!(
            "+- {} download(s) failed and are missing from the catalog",
            report.failed_downloads.len()
        );
    }
    Ok(report)
}

/// Shared state for the rows of one manifest.
struct RowContext<'a> {
    client: &'a reqwest::Client,
    temp_dir: &'a Path,
    directory: String,
    pb: &'a indicatif::ProgressBar,
}

/// Download, checksum and clean up a single row.
async fn process_row(ctx: &RowContext<'_>, row: &ManifestRow) -> Result<RowOutcome, CatalogError> {
    info!("+- Downloading {} from {}", row.name, row.url);

    // Dropping the guard deletes the file on every early return.
    let temp_path = tempfile::Builder::new()
        .prefix("tmpfile")
        .suffix(".st")
        .tempfile_in(ctx.temp_dir)?
        .into_temp_path();

    ctx.pb.set_message(row.name.clone());
    match download_file(ctx.client, &row.url, &temp_path, ctx.pb).await {
        Ok(_) => info!("+- File '{}' downloaded successfully.", row.name),
        Err(e) if e.is_download_failure() => {
            error!("+- Error downloading the file: {}", e);
            return Ok(RowOutcome::DownloadFailed(DownloadFailure {
                name: row.name.clone(),
                directory: ctx.directory.clone(),
                url: row.url.clone(),
                reason: e.to_string(),
            }));
        }
        Err(e) => return Err(e),
    }

    let checksum = format_checksum(compute_file_crc32(&temp_path).await?);
    info!("+- CRC32: {}", checksum);

    Ok(finish_row(ctx, row, &temp_path, checksum).await)
}

/// Removes the downloaded file and builds the catalog entry. A failed
/// removal still yields the entry, flagged as a delete warning.
async fn finish_row(
    ctx: &RowContext<'_>,
    row: &ManifestRow,
    downloaded: &Path,
    checksum: String,
) -> RowOutcome {
    let removal = remove_file(downloaded).await;
    let entry = CatalogEntry {
        name: row.name.clone(),
        directory: ctx.directory.clone(),
        url: row.url.clone(),
        checksum,
    };

    if removal.is_removed() {
        RowOutcome::Processed(entry)
    } else {
        RowOutcome::DeleteWarning { entry, removal }
    }
}
