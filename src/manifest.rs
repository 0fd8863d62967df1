//! Manifest discovery and parsing.

use crate::error::CatalogError;
use crate::types::ManifestRow;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Name of the files that list resources to catalog.
pub const MANIFEST_FILE_NAME: &str = "list.txt";

/// Field separator of manifests and of the catalog.
pub const DELIMITER: u8 = b';';

/// A parsed manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestLine {
    Row(ManifestRow),
    /// A line without exactly two fields.
    Malformed { line: u64, fields: usize },
}

/// Finds every file called `file_name` under `root`, recursively.
///
/// Directories are visited in pre-order: the files of a directory come before
/// anything in its subdirectories, each in the order the file system lists
/// them. Hidden files never match. Unreadable directories are skipped with a
/// warning.
pub fn find_manifests(root: &Path, file_name: &str) -> Vec<PathBuf> {
    let mut manifests = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(
                    path = %dir.display(),
                    error = %error,
                    "Skipping unreadable directory while discovering manifests"
                );
                continue;
            }
        };

        let mut subdirs = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    warn!(error = %error, "Skipping unreadable directory entry");
                    continue;
                }
            };
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(error) => {
                    warn!(
                        path = %entry.path().display(),
                        error = %error,
                        "Skipping entry with unreadable file type"
                    );
                    continue;
                }
            };

            if file_type.is_dir() {
                subdirs.push(entry.path());
                continue;
            }

            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !name.starts_with('.') && name == file_name {
                manifests.push(entry.path());
            }
        }

        // Reversed so the first listed subdirectory is walked first.
        stack.extend(subdirs.into_iter().rev());
    }

    manifests
}

/// Parses `name;url` lines from a manifest.
///
/// There is no header row. Fields may be quoted with `"`. Blank lines produce
/// nothing; lines with any other field count than two come back as
/// [`ManifestLine::Malformed`].
pub fn parse_manifest<R: Read>(reader: R) -> Result<Vec<ManifestLine>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut lines = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if record.len() != 2 {
            lines.push(ManifestLine::Malformed {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                fields: record.len(),
            });
            continue;
        }
        lines.push(ManifestLine::Row(ManifestRow {
            name: record[0].to_string(),
            url: record[1].to_string(),
        }));
    }

    Ok(lines)
}

/// Opens and parses the manifest at `path`.
pub fn read_manifest(path: &Path) -> Result<Vec<ManifestLine>, CatalogError> {
    let file = fs::File::open(path)?;
    parse_manifest(file)
}

/// Directory of a manifest as it appears in the catalog: `dir` with the walk
/// root stripped. The root itself renders as an empty string.
pub fn relative_directory(root: &Path, dir: &Path) -> String {
    match dir.strip_prefix(root) {
        Ok(relative) => relative.to_string_lossy().into_owned(),
        Err(_) => dir.to_string_lossy().into_owned(),
    }
}
