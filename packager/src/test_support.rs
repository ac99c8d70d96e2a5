//! Shared test utilities for the packager crate.

use crate::dist::descriptor::{DistributionDescriptor, build_descriptor};
use crate::dist::manifest::{DeclaredArtifact, MissingArtifactPolicy, resolve_artifacts};
use crate::dist::package_name::PackageName;
use crate::dist::relative_path::RelativePath;
use crate::dist::tag::{PlatformTag, WheelTag};
use crate::error::Result;
use crate::metadata::PackageMetadata;
use camino::Utf8PathBuf;
use std::fs;
use tempfile::TempDir;

/// The packages of the reference distribution.
pub const PACKAGES: [&str; 2] = ["fmipp", "fmipp.export"];

/// A scratch source tree that is removed when dropped.
pub struct SourceTree {
    _dir: TempDir,
    /// Root of the tree.
    pub root: Utf8PathBuf,
}

impl SourceTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp dir");
        Self { _dir: dir, root }
    }

    /// Create a tree with an `__init__.py` in each reference package.
    pub fn with_packages() -> Self {
        let tree = Self::new();
        tree.write("fmipp/__init__.py", "from fmipp.export import *\n");
        tree.write("fmipp/export/__init__.py", "");
        tree
    }

    /// Write `contents` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, contents: impl AsRef<[u8]>) -> Utf8PathBuf {
        let path = self.root.join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, contents).expect("write");
        path
    }

    /// The output directory used by emission tests.
    pub fn dist_dir(&self) -> Utf8PathBuf {
        self.root.join("dist")
    }
}

/// Reference metadata with `"Hello"` as the long description.
pub fn sample_metadata() -> PackageMetadata {
    PackageMetadata {
        name: "fmipp".to_owned(),
        version: "1.3".to_owned(),
        description: "FMI++ Python Interface for Windows".to_owned(),
        long_description: "Hello".to_owned(),
        platform_tags: vec!["Windows".to_owned()],
        ..PackageMetadata::default()
    }
}

/// The `py3-none-win_amd64` tag.
pub fn sample_tag() -> WheelTag {
    let platform = PlatformTag::try_from("win_amd64").expect("supported");
    WheelTag::new("py3", "none", platform).expect("valid tag")
}

/// Resolve `artifacts` (attached to `fmipp`) and build a descriptor.
pub fn descriptor_for(
    tree: &SourceTree,
    artifacts: &[&str],
    policy: MissingArtifactPolicy,
) -> Result<DistributionDescriptor> {
    descriptor_with(tree, sample_metadata(), artifacts, policy)
}

/// As [`descriptor_for`], with explicit metadata.
pub fn descriptor_with(
    tree: &SourceTree,
    metadata: PackageMetadata,
    artifacts: &[&str],
    policy: MissingArtifactPolicy,
) -> Result<DistributionDescriptor> {
    let packages: Vec<PackageName> = PACKAGES
        .iter()
        .map(|name| PackageName::try_from(*name).expect("valid"))
        .collect();
    let declared: Vec<DeclaredArtifact> = artifacts
        .iter()
        .map(|path| DeclaredArtifact {
            package: packages[0].clone(),
            path: RelativePath::try_from(*path).expect("valid path"),
        })
        .collect();
    let manifest = resolve_artifacts(&tree.root, &packages, &declared, policy)?;
    build_descriptor(metadata, manifest, packages, sample_tag())
}
