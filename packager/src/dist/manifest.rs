//! Artifact manifest resolution.
//!
//! Turns the declared `(package, path)` pairs into resolved artifacts with
//! absolute source paths, archive paths, and a kind, applying the
//! configured [`MissingArtifactPolicy`] to files that are not on disk.

use super::package_name::PackageName;
use super::relative_path::RelativePath;
use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// What to do when a declared artifact is not present at resolution time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MissingArtifactPolicy {
    /// Check every path up front and fail listing all missing files.
    #[default]
    Abort,
    /// Skip missing files with a warning; missing licence files still fail.
    Warn,
    /// Trust the declared list; failures surface when bytes are copied.
    Defer,
}

impl fmt::Display for MissingArtifactPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Abort => "abort",
            Self::Warn => "warn",
            Self::Defer => "defer",
        };
        f.write_str(label)
    }
}

/// Broad classification of a bundled file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// A compiled Python extension module (`.pyd`).
    ExtensionModule,
    /// A dynamically linked library (`.dll`, `.so`, `.dylib`).
    SharedLibrary,
    /// A static library or import library (`.lib`, `.a`).
    StaticLibrary,
    /// A licence text. Always bundled verbatim, never skipped.
    License,
    /// Anything else.
    Other,
}

impl ArtifactKind {
    /// Classify a declared path by directory and extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use fmipp_packager::dist::manifest::ArtifactKind;
    /// use fmipp_packager::dist::relative_path::RelativePath;
    ///
    /// let path = RelativePath::try_from("licenses/SUNDIALS_LICENSE.txt").expect("valid");
    /// assert_eq!(ArtifactKind::classify(&path), ArtifactKind::License);
    /// ```
    #[must_use]
    pub fn classify(path: &RelativePath) -> Self {
        let file_name = path.file_name().to_ascii_uppercase();
        let in_licence_dir = path.components().any(|component| {
            component.eq_ignore_ascii_case("licenses") || component.eq_ignore_ascii_case("licences")
        });
        if in_licence_dir || ["LICENSE", "LICENCE", "COPYING"].iter().any(|m| file_name.contains(m))
        {
            return Self::License;
        }

        let extension = file_name.rsplit_once('.').map_or("", |(_, ext)| ext);
        match extension {
            "PYD" => Self::ExtensionModule,
            "DLL" | "SO" | "DYLIB" => Self::SharedLibrary,
            "LIB" | "A" => Self::StaticLibrary,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ExtensionModule => "extension-module",
            Self::SharedLibrary => "shared-library",
            Self::StaticLibrary => "static-library",
            Self::License => "license",
            Self::Other => "other",
        };
        f.write_str(label)
    }
}

/// A file declared as package data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredArtifact {
    /// The package the file is attached to.
    pub package: PackageName,
    /// Path relative to the package directory.
    pub path: RelativePath,
}

/// A declared artifact with its locations resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// The package the file is attached to.
    pub package: PackageName,
    /// Path relative to the package directory, as declared.
    pub declared: RelativePath,
    /// Absolute location in the source tree.
    pub source: Utf8PathBuf,
    /// `/`-separated location inside the archive.
    pub archive_path: String,
    /// Classification of the file.
    pub kind: ArtifactKind,
}

impl Artifact {
    /// Resolve `declared` against `source_root`.
    #[must_use]
    pub fn resolve(source_root: &Utf8Path, declared: &DeclaredArtifact) -> Self {
        let mut source = source_root.join(declared.package.directory());
        source.extend(declared.path.components());
        Self {
            package: declared.package.clone(),
            declared: declared.path.clone(),
            source,
            archive_path: format!("{}/{}", declared.package.archive_dir(), declared.path),
            kind: ArtifactKind::classify(&declared.path),
        }
    }
}

/// The ordered set of artifacts that will be bundled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactManifest {
    artifacts: Vec<Artifact>,
    skipped: Vec<Artifact>,
}

impl ArtifactManifest {
    /// Return the artifacts to bundle, in declaration order.
    #[must_use]
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Return artifacts dropped under [`MissingArtifactPolicy::Warn`].
    #[must_use]
    pub fn skipped(&self) -> &[Artifact] {
        &self.skipped
    }

    /// Number of artifacts to bundle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether there is nothing to bundle.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

/// Resolve declared artifacts against the source tree.
///
/// # Errors
///
/// - [`PackagerError::UnknownPackage`] if an artifact is attached to a
///   package that is not in `packages`.
/// - [`PackagerError::DuplicateEntry`] if two declarations resolve to the
///   same archive path.
/// - [`PackagerError::MissingArtifacts`] listing every missing path under
///   [`MissingArtifactPolicy::Abort`], or every missing licence file under
///   [`MissingArtifactPolicy::Warn`].
pub fn resolve_artifacts(
    source_root: &Utf8Path,
    packages: &[PackageName],
    declared: &[DeclaredArtifact],
    policy: MissingArtifactPolicy,
) -> Result<ArtifactManifest> {
    let mut seen = HashSet::new();
    let mut manifest = ArtifactManifest::default();
    let mut missing = Vec::new();

    for declaration in declared {
        if !packages.contains(&declaration.package) {
            return Err(PackagerError::UnknownPackage {
                name: declaration.package.clone(),
            });
        }
        let artifact = Artifact::resolve(source_root, declaration);
        if !seen.insert(artifact.archive_path.clone()) {
            return Err(PackagerError::DuplicateEntry {
                path: artifact.archive_path,
            });
        }

        if policy == MissingArtifactPolicy::Defer || artifact.source.is_file() {
            debug!("resolved {} ({})", artifact.archive_path, artifact.kind);
            manifest.artifacts.push(artifact);
        } else if policy == MissingArtifactPolicy::Warn && artifact.kind != ArtifactKind::License {
            warn!("skipping missing artifact {}", artifact.source);
            manifest.skipped.push(artifact);
        } else {
            missing.push(artifact.source);
        }
    }

    if missing.is_empty() {
        Ok(manifest)
    } else {
        Err(PackagerError::MissingArtifacts { paths: missing })
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
