//! Emission of platform-specific distribution archives.
//!
//! The whole payload is read before the output directory is touched. The
//! archive is then written to a temporary file beside its final location
//! and renamed into place, so a failed run never leaves a partial archive.

use super::descriptor::DistributionDescriptor;
use super::dist_info::{with_bundle_metadata, with_wheel_metadata};
use super::naming::{ArchiveFormat, ArchiveName};
use super::payload::{collect_payload, ensure_unique};
use super::writer::{ArchiveWriter, writer_for};
use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::fs;

/// Prefix of the temporary file an archive is assembled in.
const STAGING_PREFIX: &str = ".fmipp-bdist-";

/// Where to read from and write to when emitting an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitRequest {
    /// Root of the source tree that package directories are resolved in.
    pub source_root: Utf8PathBuf,
    /// Directory that receives the archive.
    pub output_dir: Utf8PathBuf,
    /// Archive format to produce.
    pub format: ArchiveFormat,
}

/// Result of a successful emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOutput {
    /// Path of the written archive.
    pub archive_path: Utf8PathBuf,
    /// Archive entry paths, in the order they were written.
    pub entries: Vec<String>,
}

/// Emit `descriptor` as an archive in `request.format`.
///
/// # Errors
///
/// Returns the payload errors of [`collect_payload`], or
/// [`PackagerError::Io`] / [`PackagerError::Zip`] when the archive cannot
/// be written. No archive exists at the output path after a failure.
pub fn emit_distribution(
    descriptor: &DistributionDescriptor,
    request: &EmitRequest,
) -> Result<EmitOutput> {
    let writer = writer_for(request.format);
    emit_with_writer(descriptor, request, writer.as_ref())
}

/// Emit `descriptor` using an explicit `writer`.
///
/// # Errors
///
/// As for [`emit_distribution`].
pub fn emit_with_writer(
    descriptor: &DistributionDescriptor,
    request: &EmitRequest,
    writer: &dyn ArchiveWriter,
) -> Result<EmitOutput> {
    let name = ArchiveName::for_descriptor(descriptor, request.format);
    let payload = collect_payload(descriptor, &request.source_root)?;
    let entries = match request.format {
        ArchiveFormat::Wheel => with_wheel_metadata(descriptor, &name, payload),
        ArchiveFormat::Gztar => with_bundle_metadata(descriptor, &name, payload),
    };
    ensure_unique(&entries)?;

    fs::create_dir_all(&request.output_dir)?;
    let archive_path = request.output_dir.join(name.filename());
    write_atomically(&archive_path, &request.output_dir, |file| {
        writer.write(file, &entries)
    })?;
    debug!("wrote {} entries to {archive_path}", entries.len());

    Ok(EmitOutput {
        archive_path,
        entries: entries.into_iter().map(|entry| entry.path).collect(),
    })
}

/// Run `fill` against a temporary file in `dir`, then rename it to `dest`.
///
/// The temporary file is removed when `fill` or the rename fails.
fn write_atomically<F>(dest: &Utf8Path, dir: &Utf8Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut fs::File) -> Result<()>,
{
    let mut staged = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempfile_in(dir)?;
    fill(staged.as_file_mut())?;
    staged.as_file().sync_all()?;
    set_archive_permissions(staged.as_file())?;
    staged
        .persist(dest)
        .map_err(|err| PackagerError::Io(err.error))?;
    Ok(())
}

/// Relax the owner-only mode `tempfile` creates files with.
#[cfg(unix)]
fn set_archive_permissions(file: &fs::File) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    file.set_permissions(fs::Permissions::from_mode(0o644))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_archive_permissions(_file: &fs::File) -> Result<()> {
    Ok(())
}

#[cfg(test)]
#[path = "emit_tests.rs"]
mod tests;
