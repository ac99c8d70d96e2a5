//! Logical package names such as `fmipp.export`.
//!
//! A package name is a dotted path of Python identifiers. It determines the
//! directory the package's sources live in, both in the source tree and in
//! the output archive.

use super::error::{Result, ValueError};
use camino::Utf8PathBuf;
use serde::Deserialize;
use std::fmt;

/// A validated dotted package name.
///
/// # Examples
///
/// ```
/// use fmipp_packager::dist::package_name::PackageName;
///
/// let name = PackageName::try_from("fmipp.export").expect("valid package name");
/// assert_eq!(name.archive_dir(), "fmipp/export");
/// assert_eq!(name.top_level(), "fmipp");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct PackageName(String);

impl PackageName {
    /// Return the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the dotted segments of the name.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Return the first segment, which is the importable top-level package.
    #[must_use]
    pub fn top_level(&self) -> &str {
        self.segments().next().unwrap_or(self.0.as_str())
    }

    /// Return the package directory inside an archive, `/`-separated.
    #[must_use]
    pub fn archive_dir(&self) -> String {
        self.segments().collect::<Vec<_>>().join("/")
    }

    /// Return the package directory relative to a source root.
    #[must_use]
    pub fn directory(&self) -> Utf8PathBuf {
        self.segments().collect()
    }
}

impl TryFrom<&str> for PackageName {
    type Error = ValueError;

    fn try_from(value: &str) -> Result<Self> {
        validate_package_name(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for PackageName {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self> {
        validate_package_name(&value)?;
        Ok(Self(value))
    }
}

impl From<PackageName> for String {
    fn from(value: PackageName) -> Self {
        value.0
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn validate_package_name(value: &str) -> Result<()> {
    let reject = |reason: &str| ValueError::InvalidPackageName {
        value: value.to_owned(),
        reason: reason.to_owned(),
    };

    if value.is_empty() {
        return Err(reject("name is empty"));
    }
    for segment in value.split('.') {
        let mut chars = segment.chars();
        match chars.next() {
            None => return Err(reject("empty segment between dots")),
            Some(first) if !(first.is_ascii_alphabetic() || first == '_') => {
                return Err(reject("segments must start with a letter or underscore"));
            }
            Some(_) => {}
        }
        if chars.any(|c| !(c.is_ascii_alphanumeric() || c == '_')) {
            return Err(reject("segments may only contain letters, digits, and underscores"));
        }
    }
    Ok(())
}
