//! Error types for the distribution packager.
//!
//! Every variant names the failing path or field so the message printed by
//! the CLI is enough to fix the problem. Nothing is retried; errors
//! propagate to `main`, which reports them and exits non-zero.

use crate::dist::error::ValueError;
use crate::dist::package_name::PackageName;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving or emitting a distribution.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// The long-description document could not be opened or read.
    #[error("cannot read long description from {path}: {source}")]
    MissingDescriptionFile {
        /// Path of the description document.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A declared artifact was absent when its bytes were copied.
    #[error("artifact not found: {path}")]
    MissingArtifact {
        /// Absolute path of the missing file.
        path: Utf8PathBuf,
    },

    /// One or more declared artifacts were absent during resolution.
    #[error("{} declared artifact(s) not found: {}", .paths.len(), join_paths(.paths))]
    MissingArtifacts {
        /// Every missing path, in declaration order.
        paths: Vec<Utf8PathBuf>,
    },

    /// A required metadata field is empty or malformed.
    #[error("invalid metadata field `{field}`: {reason}")]
    InvalidMetadata {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the validation failure.
        reason: String,
    },

    /// The distribution declares no packages.
    #[error("no packages declared for the distribution")]
    EmptyPackageList,

    /// Package data refers to a package that is not declared.
    #[error("package data attached to undeclared package {name}")]
    UnknownPackage {
        /// The undeclared package.
        name: PackageName,
    },

    /// A declared package has no directory in the source tree.
    #[error("package directory for {name} not found at {path}")]
    MissingPackageDirectory {
        /// The declared package.
        name: PackageName,
        /// Where the directory was expected.
        path: Utf8PathBuf,
    },

    /// Two payload files map to the same archive path.
    #[error("duplicate archive entry {path}")]
    DuplicateEntry {
        /// The colliding archive path.
        path: String,
    },

    /// The configuration file does not exist.
    #[error("configuration file not found at {path}")]
    ConfigNotFound {
        /// Where the configuration was expected.
        path: Utf8PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("invalid configuration {path}: {reason}")]
    InvalidConfig {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Description of the parse error.
        reason: String,
    },

    /// A configured value failed validation.
    #[error(transparent)]
    InvalidValue(#[from] ValueError),

    /// A filesystem path was not valid UTF-8.
    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(std::path::PathBuf),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing the wheel archive failed.
    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Serialising the descriptor failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using [`PackagerError`].
pub type Result<T> = std::result::Result<T, PackagerError>;

fn join_paths(paths: &[Utf8PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
