//! Package metadata and the long-description loader.
//!
//! [`PackageMetadata`] carries the public fields of a distribution. It is
//! assembled once from configuration, validated, and then rendered into the
//! archive's core metadata file.

use crate::error::{PackagerError, Result};
use camino::Utf8Path;
use log::debug;
use std::fs::File;
use std::io::Read;

/// Public metadata describing a distribution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageMetadata {
    /// Distribution name, for example `fmipp`.
    pub name: String,
    /// Free-form version string, for example `1.3`.
    pub version: String,
    /// One-line summary.
    pub description: String,
    /// Long description, loaded from an external document.
    pub long_description: String,
    /// Project home page.
    pub url: String,
    /// Maintainer name.
    pub maintainer: String,
    /// Maintainer e-mail address.
    pub maintainer_email: String,
    /// Licence summary.
    pub license: String,
    /// Platforms the distribution supports, without duplicates.
    pub platform_tags: Vec<String>,
    /// Search keywords, without duplicates.
    pub keywords: Vec<String>,
    /// Trove classifiers, in declaration order.
    pub classifiers: Vec<String>,
}

impl PackageMetadata {
    /// Check the invariants on `name` and `version`.
    ///
    /// The name must be non-empty, start and end with an ASCII alphanumeric,
    /// and otherwise contain only alphanumerics, `.`, `_`, and `-`. The
    /// version must be non-empty and use only alphanumerics, `.`, `+`, `!`,
    /// and `_`, since it becomes a component of the archive file name.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::InvalidMetadata`] naming the offending field.
    ///
    /// # Examples
    ///
    /// ```
    /// use fmipp_packager::metadata::PackageMetadata;
    ///
    /// let metadata = PackageMetadata {
    ///     name: "fmipp".to_owned(),
    ///     version: "1.3".to_owned(),
    ///     ..PackageMetadata::default()
    /// };
    /// assert!(metadata.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_version(&self.version)
    }

    /// Remove repeated platform tags and keywords, keeping first occurrences.
    #[must_use]
    pub fn deduplicated(mut self) -> Self {
        self.platform_tags = dedup_preserving_order(self.platform_tags);
        self.keywords = dedup_preserving_order(self.keywords);
        self
    }
}

/// Read the long description from `path`.
///
/// The file handle lives only for the duration of this call and is closed
/// on every exit path.
///
/// # Errors
///
/// Returns [`PackagerError::MissingDescriptionFile`] if the file is missing,
/// unreadable, or not valid UTF-8.
pub fn load_long_description(path: &Utf8Path) -> Result<String> {
    let describe = |source| PackagerError::MissingDescriptionFile {
        path: path.to_owned(),
        source,
    };
    let mut file = File::open(path).map_err(describe)?;
    let mut text = String::new();
    file.read_to_string(&mut text).map_err(describe)?;
    debug!("read {} byte long description from {path}", text.len());
    Ok(text)
}

fn validate_name(name: &str) -> Result<()> {
    let reject = |reason: &str| PackagerError::InvalidMetadata {
        field: "name",
        reason: reason.to_owned(),
    };
    let (Some(first), Some(last)) = (name.chars().next(), name.chars().last()) else {
        return Err(reject("must not be empty"));
    };
    if !first.is_ascii_alphanumeric() || !last.is_ascii_alphanumeric() {
        return Err(reject("must start and end with a letter or digit"));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(reject(&format!("unexpected character '{bad}'")));
    }
    Ok(())
}

fn validate_version(version: &str) -> Result<()> {
    let reject = |reason: &str| PackagerError::InvalidMetadata {
        field: "version",
        reason: reason.to_owned(),
    };
    if version.trim().is_empty() {
        return Err(reject("must not be empty"));
    }
    if version.chars().any(|c| c.is_whitespace() || c == '-') {
        return Err(reject("must not contain whitespace or '-'"));
    }
    if let Some(bad) = version
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '!' | '_')))
    {
        return Err(reject(&format!("unexpected character '{bad}'")));
    }
    Ok(())
}

fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
