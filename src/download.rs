//! Resource download functionality.

use crate::error::CatalogError;
use futures_util::StreamExt;
use std::path::Path;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, warn};

/// Downloads `url` and writes the body verbatim to `destination`.
///
/// The request is sent before the destination is touched, so an unreachable
/// URL or an error status leaves any existing file alone. Once the body
/// starts streaming the destination is created or truncated.
///
/// # Arguments
///
/// * `client` - HTTP client shared across the run
/// * `url` - The URL to download from
/// * `destination` - The local file to write
/// * `pb` - Progress bar updated with received bytes
///
/// # Returns
///
/// The number of bytes written. Errors for which
/// [`CatalogError::is_download_failure`] holds came from the remote side;
/// anything else is a local I/O problem.
pub async fn download_file(
    client: &reqwest::Client,
    url: &str,
    destination: &Path,
    pb: &indicatif::ProgressBar,
) -> Result<u64, CatalogError> {
    let response = client.get(url).send().await?.error_for_status()?;
    let content_length = response.content_length();

    start_progress(pb, content_length);

    let mut file = BufWriter::new(tokio::fs::File::create(destination).await?);
    let mut byte_stream = response.bytes_stream();
    let mut received = 0u64;

    while let Some(piece) = byte_stream.next().await {
        let chunk = piece?;
        file.write_all(&chunk).await?;
        received += chunk.len() as u64;
        pb.inc(chunk.len() as u64);
    }
    file.flush().await?;

    match content_length {
        Some(expected) if expected != received => {
            return Err(CatalogError::IncompleteBody {
                url: url.to_string(),
                expected,
                received,
            });
        }
        Some(_) => {}
        None => warn!(
            "Content-Length header was not present for {}. Cannot verify body size.",
            url
        ),
    }

    debug!("Wrote {} bytes from {} to {}", received, url, destination.display());
    Ok(received)
}

/// Rewinds `pb` for a new body, dropping any total left over from the last one.
fn start_progress(pb: &indicatif::ProgressBar, content_length: Option<u64>) {
    pb.reset();
    pb.set_length(content_length.unwrap_or(0));
}
