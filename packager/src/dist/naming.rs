//! Archive naming for emitted distributions.
//!
//! Wheels follow `<name>-<version>-<python>-<abi>-<platform>.whl`; the
//! gztar bundle follows `<name>-<version>.<platform>.tar.gz`. In both, the
//! distribution name is lowercased with runs of `-`, `_`, and `.` collapsed
//! to a single `_`, and any `-` in the version becomes `_`, so neither
//! component introduces an extra `-` separator. A local version such as
//! `1.3+win` keeps its `+` and matches the `Version` field of `METADATA`.

use super::descriptor::DistributionDescriptor;
use std::fmt;

/// Output archive formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ArchiveFormat {
    /// A zip-based wheel with a `.dist-info` metadata directory.
    #[default]
    Wheel,
    /// A gzip-compressed tarball of the same payload.
    Gztar,
}

impl ArchiveFormat {
    /// Return the file extension, including the leading dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Wheel => ".whl",
            Self::Gztar => ".tar.gz",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Wheel => "wheel",
            Self::Gztar => "gztar",
        })
    }
}

/// The file name of an emitted archive.
///
/// # Examples
///
/// ```
/// use fmipp_packager::dist::naming::{ArchiveFormat, ArchiveName};
///
/// let name = ArchiveName::new("fmipp", "1.3", "py3-none-win_amd64", "win_amd64", ArchiveFormat::Wheel);
/// assert_eq!(name.to_string(), "fmipp-1.3-py3-none-win_amd64.whl");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveName {
    name: String,
    version: String,
    tag: String,
    platform: String,
    format: ArchiveFormat,
}

impl ArchiveName {
    /// Create a name from its raw components.
    #[must_use]
    pub fn new(
        name: &str,
        version: &str,
        tag: &str,
        platform: &str,
        format: ArchiveFormat,
    ) -> Self {
        Self {
            name: normalise_name(name),
            version: escape_version(version),
            tag: tag.to_owned(),
            platform: platform.to_owned(),
            format,
        }
    }

    /// Derive the archive name for `descriptor`.
    #[must_use]
    pub fn for_descriptor(descriptor: &DistributionDescriptor, format: ArchiveFormat) -> Self {
        let metadata = descriptor.metadata();
        let tag = descriptor.tag();
        Self::new(
            &metadata.name,
            &metadata.version,
            &tag.to_string(),
            tag.platform().as_str(),
            format,
        )
    }

    /// Return the `.dist-info` directory name for this distribution.
    #[must_use]
    pub fn dist_info_dir(&self) -> String {
        format!("{}-{}.dist-info", self.name, self.version)
    }

    /// Return the file name.
    #[must_use]
    pub fn filename(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ArchiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format {
            ArchiveFormat::Wheel => write!(
                f,
                "{}-{}-{}{}",
                self.name,
                self.version,
                self.tag,
                self.format.extension()
            ),
            ArchiveFormat::Gztar => write!(
                f,
                "{}-{}.{}{}",
                self.name,
                self.version,
                self.platform,
                self.format.extension()
            ),
        }
    }
}

fn normalise_name(name: &str) -> String {
    let mut normalised = String::with_capacity(name.len());
    let mut in_separator_run = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator_run {
                normalised.push('_');
            }
            in_separator_run = true;
        } else {
            normalised.push(c.to_ascii_lowercase());
            in_separator_run = false;
        }
    }
    normalised
}

fn escape_version(version: &str) -> String {
    version.replace('-', "_")
}
