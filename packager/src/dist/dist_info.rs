//! Rendering of the `.dist-info` metadata files.
//!
//! `METADATA` follows core metadata version 2.1 with the long description
//! as the message body. `WHEEL` carries the purity marker and the
//! compatibility tag.

use super::descriptor::DistributionDescriptor;
use super::naming::ArchiveName;
use super::payload::ArchiveEntry;
use super::record::render_record;
use crate::metadata::PackageMetadata;

/// Name and version recorded in the `Generator` field of `WHEEL`.
const GENERATOR: &str = concat!(env!("CARGO_PKG_NAME"), " (", env!("CARGO_PKG_VERSION"), ")");

/// Continuation indent for multi-line header values.
const CONTINUATION: &str = "\n        ";

/// Render the core metadata file.
///
/// Empty optional fields are omitted.
///
/// # Examples
///
/// ```
/// use fmipp_packager::dist::dist_info::render_metadata;
/// use fmipp_packager::metadata::PackageMetadata;
///
/// let metadata = PackageMetadata {
///     name: "fmipp".to_owned(),
///     version: "1.3".to_owned(),
///     long_description: "Hello".to_owned(),
///     ..PackageMetadata::default()
/// };
/// let text = render_metadata(&metadata);
/// assert!(text.starts_with("Metadata-Version: 2.1\nName: fmipp\nVersion: 1.3\n"));
/// assert!(text.ends_with("\n\nHello"));
/// ```
#[must_use]
pub fn render_metadata(metadata: &PackageMetadata) -> String {
    let mut text = String::new();
    push_header(&mut text, "Metadata-Version", "2.1");
    push_header(&mut text, "Name", &metadata.name);
    push_header(&mut text, "Version", &metadata.version);
    push_header(&mut text, "Summary", &metadata.description);
    push_header(&mut text, "Home-page", &metadata.url);
    push_header(&mut text, "Maintainer", &metadata.maintainer);
    push_header(&mut text, "Maintainer-email", &metadata.maintainer_email);
    push_header(&mut text, "License", &metadata.license);
    push_header(&mut text, "Keywords", &metadata.keywords.join(","));
    for platform in &metadata.platform_tags {
        push_header(&mut text, "Platform", platform);
    }
    for classifier in &metadata.classifiers {
        push_header(&mut text, "Classifier", classifier);
    }
    text.push('\n');
    text.push_str(&metadata.long_description);
    text
}

/// Render the `WHEEL` file for `descriptor`.
#[must_use]
pub fn render_wheel(descriptor: &DistributionDescriptor) -> String {
    let purelib = if descriptor.is_pure() { "true" } else { "false" };
    format!(
        "Wheel-Version: 1.0\nGenerator: {GENERATOR}\nRoot-Is-Purelib: {purelib}\nTag: {}\n",
        descriptor.tag()
    )
}

/// Render `top_level.txt`, one importable package per line.
#[must_use]
pub fn render_top_level(descriptor: &DistributionDescriptor) -> String {
    descriptor
        .top_level_packages()
        .iter()
        .map(|name| format!("{name}\n"))
        .collect()
}

/// Append the full wheel metadata directory to `payload`.
///
/// `RECORD` is computed over every preceding entry and written last.
#[must_use]
pub fn with_wheel_metadata(
    descriptor: &DistributionDescriptor,
    name: &ArchiveName,
    mut payload: Vec<ArchiveEntry>,
) -> Vec<ArchiveEntry> {
    let dist_info = name.dist_info_dir();
    payload.push(ArchiveEntry::new(
        format!("{dist_info}/METADATA"),
        render_metadata(descriptor.metadata()),
    ));
    payload.push(ArchiveEntry::new(
        format!("{dist_info}/WHEEL"),
        render_wheel(descriptor),
    ));
    payload.push(ArchiveEntry::new(
        format!("{dist_info}/top_level.txt"),
        render_top_level(descriptor),
    ));
    let record_path = format!("{dist_info}/RECORD");
    let record = render_record(&payload, &record_path);
    payload.push(ArchiveEntry::new(record_path, record));
    payload
}

/// Append `METADATA` and `WHEEL` to `payload` for non-wheel bundles.
///
/// The purity marker travels with every archive format.
#[must_use]
pub fn with_bundle_metadata(
    descriptor: &DistributionDescriptor,
    name: &ArchiveName,
    mut payload: Vec<ArchiveEntry>,
) -> Vec<ArchiveEntry> {
    let dist_info = name.dist_info_dir();
    payload.push(ArchiveEntry::new(
        format!("{dist_info}/METADATA"),
        render_metadata(descriptor.metadata()),
    ));
    payload.push(ArchiveEntry::new(
        format!("{dist_info}/WHEEL"),
        render_wheel(descriptor),
    ));
    payload
}

fn push_header(text: &mut String, name: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    text.push_str(name);
    text.push_str(": ");
    text.push_str(&value.lines().collect::<Vec<_>>().join(CONTINUATION));
    text.push('\n');
}
