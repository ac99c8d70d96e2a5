//! Archive writers.
//!
//! Writers serialise a fully-assembled entry list into an open file. They
//! never decide names or locations; [`super::emit`] owns the temporary file
//! and the final rename.
//!
//! Output is deterministic: entries keep their given order, timestamps are
//! fixed (1980-01-01 for zip, the Unix epoch for tar and gzip), and modes
//! and owners are constant.

use super::naming::ArchiveFormat;
use super::payload::ArchiveEntry;
use crate::error::Result;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::Write;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Permission bits recorded for every archived file.
const FILE_MODE: u32 = 0o644;

/// Trait for serialising archive entries, enabling test mocking.
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveWriter {
    /// Write `entries` into `output`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::PackagerError::Io`] or
    /// [`crate::error::PackagerError::Zip`] when writing fails.
    fn write(&self, output: &mut File, entries: &[ArchiveEntry]) -> Result<()>;
}

/// Return the writer for `format`.
#[must_use]
pub fn writer_for(format: ArchiveFormat) -> Box<dyn ArchiveWriter> {
    match format {
        ArchiveFormat::Wheel => Box::new(WheelWriter),
        ArchiveFormat::Gztar => Box::new(GztarWriter),
    }
}

/// Writes deflate-compressed zip archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct WheelWriter;

impl ArchiveWriter for WheelWriter {
    fn write(&self, output: &mut File, entries: &[ArchiveEntry]) -> Result<()> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default())
            .unix_permissions(FILE_MODE);
        let mut zip = ZipWriter::new(output);
        for entry in entries {
            zip.start_file(entry.path.as_str(), options)?;
            zip.write_all(&entry.contents)?;
        }
        zip.finish()?;
        Ok(())
    }
}

/// Writes gzip-compressed tarballs.
#[derive(Debug, Clone, Copy, Default)]
pub struct GztarWriter;

impl ArchiveWriter for GztarWriter {
    fn write(&self, output: &mut File, entries: &[ArchiveEntry]) -> Result<()> {
        let encoder = GzEncoder::new(output, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for entry in entries {
            let mut header = tar::Header::new_gnu();
            header.set_entry_type(tar::EntryType::Regular);
            header.set_size(entry.contents.len() as u64);
            header.set_mode(FILE_MODE);
            header.set_mtime(0);
            header.set_uid(0);
            header.set_gid(0);
            builder.append_data(&mut header, &entry.path, entry.contents.as_slice())?;
        }
        builder.into_inner()?.finish()?;
        Ok(())
    }
}
