//! CRC32 computation over local files.

use crate::error::CatalogError;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Read size used when streaming a file through the checksum.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Computes the CRC32 of everything `reader` yields, in [`CHUNK_SIZE`] pieces.
pub fn crc32_reader<R: Read>(mut reader: R) -> io::Result<u32> {
    let mut hasher = crc32fast::Hasher::new();
    let mut buffer = [0u8; CHUNK_SIZE];

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..n]);
    }

    Ok(hasher.finalize())
}

/// Computes the CRC32 of a local file.
pub fn crc32_file(path: &Path) -> Result<u32, CatalogError> {
    let file = std::fs::File::open(path)?;
    Ok(crc32_reader(file)?)
}

/// Computes the CRC32 of a local file without blocking the async runtime.
pub async fn compute_file_crc32(path: &Path) -> Result<u32, CatalogError> {
    let path: PathBuf = path.to_path_buf();

    tokio::task::spawn_blocking(move || crc32_file(&path))
        .await
        .map_err(|e| CatalogError::IoError(io::Error::other(format!("Task join error: {}", e))))?
}

/// Renders a checksum the way the catalog stores it: 8 uppercase hex digits.
pub fn format_checksum(crc: u32) -> String {
    format!("{:08X}", crc)
}
