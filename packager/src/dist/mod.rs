//! Distribution model, manifest resolution, and archive emission.
//!
//! # Sub-modules
//!
//! - [`error`] - Validation errors for distribution values.
//! - [`package_name`] - Dotted logical package names (`PackageName`).
//! - [`relative_path`] - Declared artifact paths (`RelativePath`).
//! - [`tag`] - Compatibility tags (`PlatformTag`, `WheelTag`).
//! - [`manifest`] - Artifact resolution and the missing-artifact policy.
//! - [`descriptor`] - The `DistributionDescriptor` and its constructor.
//! - [`naming`] - Archive formats and file names.
//! - [`payload`] - Reading package sources and artifacts into memory.
//! - [`record`] - The wheel `RECORD` file.
//! - [`dist_info`] - `METADATA`, `WHEEL`, and `top_level.txt` rendering.
//! - [`writer`] - Zip and tar.gz archive writers.
//! - [`emit`] - Atomic archive emission.
//! - [`staging`] - The `build/lib` staging tree.

pub mod descriptor;
pub mod dist_info;
pub mod emit;
pub mod error;
pub mod manifest;
pub mod naming;
pub mod package_name;
pub mod payload;
pub mod record;
pub mod relative_path;
pub mod staging;
pub mod tag;
pub mod writer;
