//! Catalog file output.

use crate::error::CatalogError;
use crate::manifest::DELIMITER;
use crate::types::CatalogEntry;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Default output file name.
pub const CATALOG_FILE_NAME: &str = "catalog.txt";

#[cfg(windows)]
const TERMINATOR: csv::Terminator = csv::Terminator::CRLF;
#[cfg(not(windows))]
const TERMINATOR: csv::Terminator = csv::Terminator::Any(b'\n');

/// Writes one fully quoted, `;`-separated row per entry to `writer`.
pub fn write_catalog_to<W: Write>(writer: W, entries: &[CatalogEntry]) -> Result<(), CatalogError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .quote_style(csv::QuoteStyle::Always)
        .terminator(TERMINATOR)
        .has_headers(false)
        .from_writer(writer);

    for entry in entries {
        csv_writer.serialize(entry)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the catalog to `path`, replacing any previous file in one step.
///
/// Rows go to a temporary file in the same directory, which is then renamed
/// over `path`. A failed write leaves the old catalog untouched. The new
/// file keeps the permissions of the one it replaces, or gets `0644` on Unix
/// when there was none.
pub fn write_catalog(path: &Path, entries: &[CatalogEntry]) -> Result<(), CatalogError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = tempfile::NamedTempFile::new_in(parent)?;
    write_catalog_to(staged.as_file_mut(), entries)?;
    staged.as_file().sync_all()?;

    let permissions = match fs::metadata(path) {
        Ok(existing) => Some(existing.permissions()),
        Err(_) => default_permissions(),
    };
    if let Some(permissions) = permissions {
        staged.as_file().set_permissions(permissions)?;
    }
    staged.persist(path).map_err(|e| e.error)?;

    info!("+ Wrote {} entries to {}", entries.len(), path.display());
    Ok(())
}

/// Mode for a freshly created catalog; temp files start out as `0600`.
#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, directory: &str, checksum: &str) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            directory: directory.to_string(),
            url: format!("http://example.com/{}", name),
            checksum: checksum.to_string(),
        }
    }

    fn eol() -> &'static str {
        if cfg!(windows) {
            "\r\n"
        } else {
            "\n"
        }
    }

    #[test]
    fn test_rows_are_fully_quoted() {
        let mut out = Vec::new();
        write_catalog_to(
            &mut out,
            &[
                entry("a.bin", "sub", "352441C2"),
                entry("say \"hi\"", "", "00000000"),
            ],
        )
        .unwrap();

        let expected = format!(
            "\"a.bin\";\"sub\";\"http://example.com/a.bin\";\"352441C2\"{eol}\
             \"say \"\"hi\"\"\";\"\";\"http://example.com/say \"\"hi\"\"\";\"00000000\"{eol}",
            eol = eol()
        );
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_write_replaces_existing_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CATALOG_FILE_NAME);
        std::fs::write(&path, "stale contents\n").unwrap();

        write_catalog(&path, &[entry("a.bin", "sub", "352441C2")]).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            format!(
                "\"a.bin\";\"sub\";\"http://example.com/a.bin\";\"352441C2\"{}",
                eol()
            )
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_empty_catalog_is_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CATALOG_FILE_NAME);

        write_catalog(&path, &[]).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join(CATALOG_FILE_NAME);

        let err = write_catalog(&path, &[]).unwrap_err();
        assert!(matches!(err, CatalogError::IoError(_)));
    }

    #[cfg(unix)]
    fn mode(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[cfg(unix)]
    #[test]
    fn test_new_catalog_is_world_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CATALOG_FILE_NAME);

        write_catalog(&path, &[entry("a.bin", "sub", "352441C2")]).unwrap();

        assert_eq!(mode(&path), 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_overwrite_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CATALOG_FILE_NAME);
        fs::write(&path, "old\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        write_catalog(&path, &[]).unwrap();

        assert_eq!(mode(&path), 0o640);
        assert_eq!(fs::read(&path).unwrap(), Vec::<u8>::new());
    }
}
