//! Error types for distribution value validation.
//!
//! Each variant names the rejected input and the constraint it violated, so
//! configuration mistakes can be fixed without reading the source.

use thiserror::Error;

/// Errors arising from invalid distribution-related values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// A logical package name is empty or not a dotted identifier path.
    #[error("invalid package name \"{value}\": {reason}")]
    InvalidPackageName {
        /// The rejected package name.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// A python or ABI tag is empty or contains forbidden characters.
    #[error("invalid {kind} tag \"{value}\": {reason}")]
    InvalidTag {
        /// Which tag component was rejected (`python` or `abi`).
        kind: &'static str,
        /// The rejected tag.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// The platform tag is not in the supported set.
    #[error("unsupported platform tag \"{value}\"; expected one of: {expected}")]
    UnsupportedPlatform {
        /// The rejected platform tag.
        value: String,
        /// Comma-separated list of accepted platform tags.
        expected: String,
    },

    /// A declared artifact path is empty, absolute, or escapes its package.
    #[error("invalid artifact path \"{value}\": {reason}")]
    InvalidArtifactPath {
        /// The rejected path as declared.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },
}

/// Result type alias using [`ValueError`].
pub type Result<T> = std::result::Result<T, ValueError>;
