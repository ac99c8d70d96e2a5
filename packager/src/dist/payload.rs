//! Payload collection: the bytes that go into an archive or build tree.
//!
//! Everything is read into memory before any output is written, so a
//! missing file aborts the run while the output directory is untouched.

use super::descriptor::DistributionDescriptor;
use crate::error::{PackagerError, Result};
use camino::Utf8Path;
use log::debug;
use std::collections::HashSet;
use std::fs;
use std::io;

/// A single file destined for an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// `/`-separated path inside the archive.
    pub path: String,
    /// File contents, copied verbatim.
    pub contents: Vec<u8>,
}

impl ArchiveEntry {
    /// Create an entry from a path and contents.
    #[must_use]
    pub fn new(path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Read package sources and artifacts for `descriptor`.
///
/// For each package, the `*.py` files directly inside its directory come
/// first (sorted by name), followed by the artifacts in declaration order.
/// An artifact that is also a package source is included once.
///
/// # Errors
///
/// - [`PackagerError::MissingPackageDirectory`] if a package directory does
///   not exist.
/// - [`PackagerError::MissingArtifact`] if an artifact file is absent.
/// - [`PackagerError::DuplicateEntry`] if two files share an archive path.
/// - [`PackagerError::Io`] for any other read failure.
pub fn collect_payload(
    descriptor: &DistributionDescriptor,
    source_root: &Utf8Path,
) -> Result<Vec<ArchiveEntry>> {
    let mut entries = Vec::new();
    for package in descriptor.packages() {
        let directory = source_root.join(package.directory());
        for file_name in python_sources(&directory).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => PackagerError::MissingPackageDirectory {
                name: package.clone(),
                path: directory.clone(),
            },
            _ => PackagerError::Io(err),
        })? {
            let contents = fs::read(directory.join(&file_name))?;
            entries.push(ArchiveEntry::new(
                format!("{}/{file_name}", package.archive_dir()),
                contents,
            ));
        }
    }

    let sources: HashSet<String> = entries.iter().map(|entry| entry.path.clone()).collect();
    for artifact in descriptor.artifacts().artifacts() {
        if sources.contains(&artifact.archive_path) {
            debug!("{} is already a package source", artifact.archive_path);
            continue;
        }
        let contents = fs::read(&artifact.source).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => PackagerError::MissingArtifact {
                path: artifact.source.clone(),
            },
            _ => PackagerError::Io(err),
        })?;
        entries.push(ArchiveEntry::new(artifact.archive_path.clone(), contents));
    }

    ensure_unique(&entries)?;
    debug!("collected {} payload file(s)", entries.len());
    Ok(entries)
}

/// List the `*.py` file names directly inside `directory`, sorted.
fn python_sources(directory: &Utf8Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in directory.read_dir_utf8()? {
        let entry = entry?;
        if entry.file_type()?.is_file() && entry.path().extension() == Some("py") {
            names.push(entry.file_name().to_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Reject payloads where two entries share an archive path.
pub(crate) fn ensure_unique(entries: &[ArchiveEntry]) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.path.as_str()) {
            return Err(PackagerError::DuplicateEntry {
                path: entry.path.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::manifest::MissingArtifactPolicy;
    use crate::test_support::{SourceTree, descriptor_for};

    #[test]
    fn ensure_unique_flags_collisions() {
        let entries = [
            ArchiveEntry::new("fmipp/__init__.py", "a"),
            ArchiveEntry::new("fmipp/__init__.py", "b"),
        ];
        let err = ensure_unique(&entries).expect_err("expected collision");
        assert!(matches!(err, PackagerError::DuplicateEntry { path } if path == "fmipp/__init__.py"));
    }

    #[test]
    fn ensure_unique_accepts_distinct_paths() {
        let entries = [
            ArchiveEntry::new("fmipp/__init__.py", "a"),
            ArchiveEntry::new("fmipp/export/__init__.py", "b"),
        ];
        assert!(ensure_unique(&entries).is_ok());
    }

    #[test]
    fn python_source_declared_as_data_is_collected_once() {
        let tree = SourceTree::with_packages();
        tree.write("fmipp/helper.py", "HELPER = 1\n");
        let descriptor =
            descriptor_for(&tree, &["helper.py"], MissingArtifactPolicy::Abort).expect("descriptor");

        let entries = collect_payload(&descriptor, &tree.root).expect("payload");

        let paths: Vec<&str> = entries.iter().map(|entry| entry.path.as_str()).collect();
        assert_eq!(
            paths,
            ["fmipp/__init__.py", "fmipp/helper.py", "fmipp/export/__init__.py"]
        );
    }
}
