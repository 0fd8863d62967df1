use anyhow::Context;
use clap::{Parser, ValueEnum};
use crcatalog::{build_catalog, CatalogConfig, CatalogError, DownloadErrorPolicy};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "crcatalog")]
#[command(about = "Download resources listed in list.txt manifests and catalog their CRC32", long_about = None)]
#[command(version)]
struct Args {
    /// Directory to search for manifests
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Catalog output file
    #[arg(short, long, default_value = crcatalog::CATALOG_FILE_NAME)]
    output: PathBuf,

    /// Manifest file name to look for
    #[arg(long, default_value = crcatalog::MANIFEST_FILE_NAME)]
    manifest_name: String,

    /// Directory for temporary downloads
    #[arg(long, default_value = ".")]
    temp_dir: PathBuf,

    /// What to do when a download fails
    #[arg(long, value_enum, default_value_t = OnDownloadError::Abort)]
    on_download_error: OnDownloadError,

    /// Write a JSON run summary to this file
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OnDownloadError {
    /// Stop everything; no catalog is written
    Abort,
    /// Skip the rest of the affected manifest
    SkipManifest,
    /// Skip only the affected row
    Continue,
}

impl From<OnDownloadError> for DownloadErrorPolicy {
    fn from(value: OnDownloadError) -> Self {
        match value {
            OnDownloadError::Abort => DownloadErrorPolicy::Abort,
            OnDownloadError::SkipManifest => DownloadErrorPolicy::SkipManifest,
            OnDownloadError::Continue => DownloadErrorPolicy::Continue,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Initialize tracing
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("crcatalog={}", log_level))
        .init();

    let config = CatalogConfig {
        root: args.root,
        manifest_name: args.manifest_name,
        output: args.output,
        temp_dir: args.temp_dir,
        on_download_error: args.on_download_error.into(),
        show_progress: std::io::stderr().is_terminal(),
    };

    info!("Searching {} for {} manifests", config.root.display(), config.manifest_name);

    let report = match build_catalog(&config).await {
        Ok(report) => report,
        Err(CatalogError::DownloadFailed(failure)) => {
            error!("+- Error: {} ({})", failure.reason, failure.url);
            error!("+- Error: A file download failed. Exiting program.");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to build {}", config.output.display()))
        }
    };

    if let Some(summary) = args.summary {
        report
            .write_json(&summary)
            .with_context(|| format!("failed to write summary {}", summary.display()))?;
        info!("Wrote run summary to {}", summary.display());
    }

    info!(
        "+ Catalogued {} entries from {} manifest(s) ({} malformed line(s) skipped)",
        report.entries.len(),
        report.manifests,
        report.skipped_malformed
    );
    Ok(ExitCode::SUCCESS)
}
