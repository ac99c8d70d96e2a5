//! The distribution descriptor: everything needed to emit one archive.

use super::manifest::ArtifactManifest;
use super::package_name::PackageName;
use super::tag::WheelTag;
use crate::error::{PackagerError, Result};
use crate::metadata::PackageMetadata;

/// Metadata, packages, and artifacts for a single platform-specific bundle.
///
/// The descriptor is never pure: it always describes compiled,
/// architecture-specific code, so downstream installers must not treat it
/// as portable source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionDescriptor {
    metadata: PackageMetadata,
    artifacts: ArtifactManifest,
    packages: Vec<PackageName>,
    tag: WheelTag,
    is_pure: bool,
}

impl DistributionDescriptor {
    /// Return the package metadata.
    #[must_use]
    pub fn metadata(&self) -> &PackageMetadata {
        &self.metadata
    }

    /// Return the resolved artifacts.
    #[must_use]
    pub fn artifacts(&self) -> &ArtifactManifest {
        &self.artifacts
    }

    /// Return the logical packages, in declaration order.
    #[must_use]
    pub fn packages(&self) -> &[PackageName] {
        &self.packages
    }

    /// Return the compatibility tag.
    #[must_use]
    pub fn tag(&self) -> &WheelTag {
        &self.tag
    }

    /// Whether the payload is architecture-independent. Always `false`.
    #[must_use]
    pub fn is_pure(&self) -> bool {
        self.is_pure
    }

    /// Return the distinct top-level package names, sorted.
    #[must_use]
    pub fn top_level_packages(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.packages.iter().map(PackageName::top_level).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

/// Assemble a descriptor. Performs no I/O.
///
/// Repeated package names are collapsed, keeping the first occurrence.
///
/// # Errors
///
/// - [`PackagerError::InvalidMetadata`] if `name` or `version` is invalid.
/// - [`PackagerError::EmptyPackageList`] if `packages` is empty.
/// - [`PackagerError::UnknownPackage`] if an artifact belongs to a package
///   that is not in `packages`.
pub fn build_descriptor(
    metadata: PackageMetadata,
    artifacts: ArtifactManifest,
    packages: Vec<PackageName>,
    tag: WheelTag,
) -> Result<DistributionDescriptor> {
    metadata.validate()?;
    if packages.is_empty() {
        return Err(PackagerError::EmptyPackageList);
    }

    let mut unique: Vec<PackageName> = Vec::with_capacity(packages.len());
    for package in packages {
        if !unique.contains(&package) {
            unique.push(package);
        }
    }

    if let Some(stray) = artifacts
        .artifacts()
        .iter()
        .find(|artifact| !unique.contains(&artifact.package))
    {
        return Err(PackagerError::UnknownPackage {
            name: stray.package.clone(),
        });
    }

    Ok(DistributionDescriptor {
        metadata: metadata.deduplicated(),
        artifacts,
        packages: unique,
        tag,
        is_pure: false,
    })
}
