//! Compatibility tags for platform-specific distributions.
//!
//! A wheel tag has three parts: python, ABI, and platform. Only platform
//! tags from a fixed supported set are accepted, and the architecture-free
//! `any` tag is never one of them: every bundle produced here carries
//! compiled code.

use super::error::{Result, ValueError};
use serde::Deserialize;
use std::fmt;

/// The platform tags a distribution may be built for.
const SUPPORTED_PLATFORMS: &[&str] = &[
    "win32",
    "win_amd64",
    "win_arm64",
    "linux_x86_64",
    "linux_aarch64",
    "manylinux2014_x86_64",
    "manylinux2014_aarch64",
    "macosx_10_9_x86_64",
    "macosx_11_0_arm64",
];

/// Python tag used when the configuration does not name one.
pub const DEFAULT_PYTHON_TAG: &str = "py3";

/// ABI tag used when the configuration does not name one.
pub const DEFAULT_ABI_TAG: &str = "none";

/// A validated platform tag from the supported set.
///
/// # Examples
///
/// ```
/// use fmipp_packager::dist::tag::PlatformTag;
///
/// let tag = PlatformTag::try_from("win_amd64").expect("supported platform");
/// assert_eq!(tag.as_str(), "win_amd64");
/// assert!(PlatformTag::try_from("any").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct PlatformTag(String);

impl PlatformTag {
    /// Return the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for PlatformTag {
    type Error = ValueError;

    fn try_from(value: &str) -> Result<Self> {
        if SUPPORTED_PLATFORMS.contains(&value) {
            Ok(Self(value.to_owned()))
        } else {
            Err(ValueError::UnsupportedPlatform {
                value: value.to_owned(),
                expected: SUPPORTED_PLATFORMS.join(", "),
            })
        }
    }
}

impl TryFrom<String> for PlatformTag {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self> {
        Self::try_from(value.as_str())
    }
}

impl From<PlatformTag> for String {
    fn from(value: PlatformTag) -> Self {
        value.0
    }
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The complete `<python>-<abi>-<platform>` compatibility tag.
///
/// # Examples
///
/// ```
/// use fmipp_packager::dist::tag::{PlatformTag, WheelTag};
///
/// let platform = PlatformTag::try_from("win_amd64").expect("supported platform");
/// let tag = WheelTag::new("py3", "none", platform).expect("valid tag");
/// assert_eq!(tag.to_string(), "py3-none-win_amd64");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelTag {
    python: String,
    abi: String,
    platform: PlatformTag,
}

impl WheelTag {
    /// Build a tag from its three components.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidTag`] when `python` or `abi` is empty or
    /// contains characters other than ASCII alphanumerics, `_`, and `.`.
    pub fn new(python: &str, abi: &str, platform: PlatformTag) -> Result<Self> {
        validate_token("python", python)?;
        validate_token("abi", abi)?;
        Ok(Self {
            python: python.to_owned(),
            abi: abi.to_owned(),
            platform,
        })
    }

    /// Return the python tag.
    #[must_use]
    pub fn python(&self) -> &str {
        &self.python
    }

    /// Return the ABI tag.
    #[must_use]
    pub fn abi(&self) -> &str {
        &self.abi
    }

    /// Return the platform tag.
    #[must_use]
    pub fn platform(&self) -> &PlatformTag {
        &self.platform
    }
}

impl fmt::Display for WheelTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.python, self.abi, self.platform)
    }
}

fn validate_token(kind: &'static str, value: &str) -> Result<()> {
    let reject = |reason: &str| ValueError::InvalidTag {
        kind,
        value: value.to_owned(),
        reason: reason.to_owned(),
    };
    if value.is_empty() {
        return Err(reject("tag is empty"));
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '.'))
    {
        return Err(reject(&format!("unexpected character '{bad}'")));
    }
    Ok(())
}
