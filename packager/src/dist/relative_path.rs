//! Declared artifact paths, relative to their package directory.
//!
//! Paths are normalised to `/` separators and rejected when they are
//! absolute or climb out of the package with `..`, so an archive entry can
//! never land outside the package it is attached to.

use super::error::{Result, ValueError};
use serde::Deserialize;
use std::fmt;

/// A validated, normalised relative path.
///
/// # Examples
///
/// ```
/// use fmipp_packager::dist::relative_path::RelativePath;
///
/// let path = RelativePath::try_from(r"lib\fmippim.dll").expect("valid path");
/// assert_eq!(path.as_str(), "lib/fmippim.dll");
/// assert_eq!(path.file_name(), "fmippim.dll");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct RelativePath(String);

impl RelativePath {
    /// Return the normalised path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the `/`-separated components.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Return the final component.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(self.0.as_str())
    }
}

impl TryFrom<&str> for RelativePath {
    type Error = ValueError;

    fn try_from(value: &str) -> Result<Self> {
        normalise(value).map(Self)
    }
}

impl TryFrom<String> for RelativePath {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self> {
        Self::try_from(value.as_str())
    }
}

impl From<RelativePath> for String {
    fn from(value: RelativePath) -> Self {
        value.0
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate `value` and return its normalised form.
///
/// Backslashes become `/`, empty and `.` components are dropped.
fn normalise(value: &str) -> Result<String> {
    let reject = |reason: &str| ValueError::InvalidArtifactPath {
        value: value.to_owned(),
        reason: reason.to_owned(),
    };

    let unified = value.replace('\\', "/");
    if unified.starts_with('/') || has_drive_prefix(&unified) {
        return Err(reject("path must be relative"));
    }

    let mut parts = Vec::new();
    for component in unified.split('/') {
        match component {
            "" | "." => {}
            ".." => return Err(reject("path must not contain `..`")),
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return Err(reject("path is empty"));
    }
    Ok(parts.join("/"))
}

/// Whether `value` starts with a Windows drive designator such as `C:`.
fn has_drive_prefix(value: &str) -> bool {
    let mut chars = value.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(letter), Some(':')) if letter.is_ascii_alphabetic()
    )
}
