//! Output formatting for the `check` subcommand and progress lines.
//!
//! The human summary and the JSON document describe the same resolved
//! descriptor. The long description is reported by size only.

use crate::dist::descriptor::DistributionDescriptor;
use crate::dist::manifest::{Artifact, ArtifactKind};
use crate::dist::naming::{ArchiveFormat, ArchiveName};
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// Write `message` and a newline to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Warning line for an artifact skipped under the `warn` policy.
#[must_use]
pub fn skipped_warning(artifact: &Artifact) -> String {
    format!(
        "warning: skipping missing artifact {} ({})",
        artifact.archive_path, artifact.source
    )
}

/// Format a resolved descriptor for human-readable output.
#[must_use]
pub fn format_human(descriptor: &DistributionDescriptor) -> String {
    let metadata = descriptor.metadata();
    let mut output = format!(
        "{} {} ({})\n",
        metadata.name,
        metadata.version,
        descriptor.tag()
    );

    if !metadata.description.is_empty() {
        output.push_str(&format!("  {}\n", metadata.description));
    }
    output.push_str(&format!(
        "Long description: {} byte(s)\n",
        metadata.long_description.len()
    ));

    output.push_str("Packages:\n");
    for package in descriptor.packages() {
        output.push_str(&format!("  - {package}\n"));
    }

    let manifest = descriptor.artifacts();
    output.push_str(&format!("Artifacts ({}):\n", manifest.len()));
    for artifact in manifest.artifacts() {
        output.push_str(&artifact_line(artifact));
    }

    if !manifest.skipped().is_empty() {
        output.push_str(&format!("Skipped ({}):\n", manifest.skipped().len()));
        for artifact in manifest.skipped() {
            output.push_str(&artifact_line(artifact));
        }
    }

    output.push_str(&format!(
        "Archives:\n  - {}\n  - {}",
        ArchiveName::for_descriptor(descriptor, ArchiveFormat::Wheel),
        ArchiveName::for_descriptor(descriptor, ArchiveFormat::Gztar),
    ));
    output
}

fn artifact_line(artifact: &Artifact) -> String {
    format!("  - {} [{}]\n", artifact.archive_path, artifact.kind)
}

/// Format a resolved descriptor as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`crate::error::PackagerError::Serialization`] if the document
/// cannot be serialised.
pub fn format_json(descriptor: &DistributionDescriptor) -> Result<String> {
    let json = DescriptorJson::from_descriptor(descriptor);
    Ok(serde_json::to_string_pretty(&json)?)
}

/// JSON-serialisable summary of a descriptor.
#[derive(Debug, Serialize)]
pub struct DescriptorJson {
    /// Distribution name.
    pub name: String,
    /// Distribution version.
    pub version: String,
    /// Compatibility tag, for example `py3-none-win_amd64`.
    pub tag: String,
    /// Always `false`.
    pub is_pure: bool,
    /// One-line summary.
    pub description: String,
    /// Size of the long description in bytes.
    pub long_description_bytes: usize,
    /// Project home page.
    pub url: String,
    /// Maintainer name.
    pub maintainer: String,
    /// Maintainer e-mail address.
    pub maintainer_email: String,
    /// Licence summary.
    pub license: String,
    /// Supported platforms.
    pub platforms: Vec<String>,
    /// Search keywords.
    pub keywords: Vec<String>,
    /// Trove classifiers.
    pub classifiers: Vec<String>,
    /// Logical packages.
    pub packages: Vec<String>,
    /// Artifacts that will be bundled.
    pub artifacts: Vec<ArtifactEntry>,
    /// Artifacts skipped because they were missing.
    pub skipped: Vec<ArtifactEntry>,
    /// Archive file names per format.
    pub archives: Vec<String>,
}

/// JSON entry for one artifact.
#[derive(Debug, Serialize)]
pub struct ArtifactEntry {
    /// Owning package.
    pub package: String,
    /// Location inside the archive.
    pub archive_path: String,
    /// Location in the source tree.
    pub source: String,
    /// Classification.
    pub kind: ArtifactKind,
}

impl From<&Artifact> for ArtifactEntry {
    fn from(artifact: &Artifact) -> Self {
        Self {
            package: artifact.package.to_string(),
            archive_path: artifact.archive_path.clone(),
            source: artifact.source.to_string(),
            kind: artifact.kind,
        }
    }
}

impl DescriptorJson {
    fn from_descriptor(descriptor: &DistributionDescriptor) -> Self {
        let metadata = descriptor.metadata();
        let manifest = descriptor.artifacts();
        Self {
            name: metadata.name.clone(),
            version: metadata.version.clone(),
            tag: descriptor.tag().to_string(),
            is_pure: descriptor.is_pure(),
            description: metadata.description.clone(),
            long_description_bytes: metadata.long_description.len(),
            url: metadata.url.clone(),
            maintainer: metadata.maintainer.clone(),
            maintainer_email: metadata.maintainer_email.clone(),
            license: metadata.license.clone(),
            platforms: metadata.platform_tags.clone(),
            keywords: metadata.keywords.clone(),
            classifiers: metadata.classifiers.clone(),
            packages: descriptor.packages().iter().map(ToString::to_string).collect(),
            artifacts: manifest.artifacts().iter().map(ArtifactEntry::from).collect(),
            skipped: manifest.skipped().iter().map(ArtifactEntry::from).collect(),
            archives: [ArchiveFormat::Wheel, ArchiveFormat::Gztar]
                .into_iter()
                .map(|format| ArchiveName::for_descriptor(descriptor, format).filename())
                .collect(),
        }
    }
}
