//! Staging of the build tree.
//!
//! Lays the package sources and artifacts out under `<build_dir>/lib`,
//! mirroring the archive layout without the metadata directory. The tree
//! is assembled in a temporary directory and swapped in whole.

use super::descriptor::DistributionDescriptor;
use super::payload::collect_payload;
use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use std::fs;

/// Name of the staged tree inside the build directory.
const LIB_DIR: &str = "lib";

/// A staged build tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedTree {
    /// The `lib` directory holding the staged files.
    pub lib_dir: Utf8PathBuf,
    /// Staged paths relative to `lib_dir`, in payload order.
    pub files: Vec<String>,
}

/// Stage the payload of `descriptor` into `<build_dir>/lib`.
///
/// Any previous `lib` directory is replaced.
///
/// # Errors
///
/// Returns the payload errors of [`collect_payload`] before anything is
/// written, or [`PackagerError::Io`] if the tree cannot be written.
pub fn stage_build(
    descriptor: &DistributionDescriptor,
    source_root: &Utf8Path,
    build_dir: &Utf8Path,
) -> Result<StagedTree> {
    let payload = collect_payload(descriptor, source_root)?;

    fs::create_dir_all(build_dir)?;
    let staging = tempfile::Builder::new()
        .prefix(".fmipp-build-")
        .tempdir_in(build_dir)?;
    let staging_root = Utf8PathBuf::from_path_buf(staging.path().to_path_buf())
        .map_err(PackagerError::NonUtf8Path)?;

    for entry in &payload {
        let mut destination = staging_root.clone();
        destination.extend(entry.path.split('/'));
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&destination, &entry.contents)?;
    }

    let lib_dir = build_dir.join(LIB_DIR);
    swap_into_place(&staging_root, &lib_dir, build_dir)?;
    debug!("staged {} file(s) into {lib_dir}", payload.len());

    Ok(StagedTree {
        lib_dir,
        files: payload.into_iter().map(|entry| entry.path).collect(),
    })
}

/// Rename `staged` to `lib_dir`, keeping any previous tree until the new
/// one is in place.
///
/// The previous tree is parked in a temporary directory inside
/// `build_dir`. It is moved back if the rename fails and deleted once the
/// rename succeeds.
fn swap_into_place(staged: &Utf8Path, lib_dir: &Utf8Path, build_dir: &Utf8Path) -> Result<()> {
    let previous = if lib_dir.exists() {
        let holder = tempfile::Builder::new()
            .prefix(".fmipp-previous-")
            .tempdir_in(build_dir)?;
        let parked = holder.path().join(LIB_DIR);
        fs::rename(lib_dir, &parked)?;
        Some((holder, parked))
    } else {
        None
    };

    if let Err(err) = fs::rename(staged, lib_dir) {
        if let Some((_, parked)) = &previous {
            if let Err(restore) = fs::rename(parked, lib_dir) {
                warn!("could not restore previous build tree from {}: {restore}", parked.display());
            }
        }
        return Err(err.into());
    }

    if let Some((holder, _)) = previous {
        holder.close()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::manifest::MissingArtifactPolicy;
    use crate::test_support::{SourceTree, descriptor_for};

    #[test]
    fn stages_sources_and_artifacts() {
        let tree = SourceTree::with_packages();
        tree.write("fmipp/lib/a.dll", "dll");
        let descriptor =
            descriptor_for(&tree, &["lib/a.dll"], MissingArtifactPolicy::Abort).expect("descriptor");
        let build_dir = tree.root.join("build");

        let staged = stage_build(&descriptor, &tree.root, &build_dir).expect("staged");

        assert_eq!(staged.lib_dir, build_dir.join("lib"));
        assert_eq!(
            staged.files,
            ["fmipp/__init__.py", "fmipp/export/__init__.py", "fmipp/lib/a.dll"]
        );
        let dll = fs::read(staged.lib_dir.join("fmipp").join("lib").join("a.dll")).expect("staged dll");
        assert_eq!(dll, b"dll");
    }

    #[test]
    fn restaging_replaces_stale_files() {
        let tree = SourceTree::with_packages();
        tree.write("fmipp/lib/a.dll", "dll");
        let build_dir = tree.root.join("build");
        let stale = build_dir.join("lib").join("fmipp").join("stale.pyd");
        fs::create_dir_all(stale.parent().expect("parent")).expect("mkdir");
        fs::write(&stale, "old").expect("write stale");

        let descriptor =
            descriptor_for(&tree, &["lib/a.dll"], MissingArtifactPolicy::Abort).expect("descriptor");
        stage_build(&descriptor, &tree.root, &build_dir).expect("staged");

        assert!(!stale.exists(), "previous tree must be replaced");
        let leftovers: Vec<_> = fs::read_dir(&build_dir)
            .expect("build dir")
            .map(|entry| {
                let name = entry.expect("entry").file_name();
                name.to_string_lossy().into_owned()
            })
            .collect();
        assert_eq!(leftovers, ["lib"]);
    }

    #[test]
    fn missing_artifact_writes_nothing() {
        let tree = SourceTree::with_packages();
        let descriptor =
            descriptor_for(&tree, &["lib/a.dll"], MissingArtifactPolicy::Defer).expect("descriptor");
        let build_dir = tree.root.join("build");

        let err = stage_build(&descriptor, &tree.root, &build_dir).expect_err("missing artifact");

        assert!(matches!(err, PackagerError::MissingArtifact { .. }));
        assert!(!build_dir.exists());
    }

    #[test]
    fn failed_swap_keeps_previous_tree() {
        let tree = SourceTree::new();
        let build_dir = tree.root.join("build");
        let previous = tree.write("build/lib/fmipp/_fmippim.pyd", "old");
        let lib_dir = build_dir.join("lib");

        let err = swap_into_place(&build_dir.join("never-staged"), &lib_dir, &build_dir)
            .expect_err("rename of a missing tree fails");

        assert!(matches!(err, PackagerError::Io(_)));
        assert_eq!(fs::read(&previous).expect("previous tree kept"), b"old");
        let entries: Vec<String> = fs::read_dir(&build_dir)
            .expect("build dir")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, ["lib"], "the parking directory is removed");
    }
}
