//! FMI++ binary distribution packager.
//!
//! This crate bundles the prebuilt FMI++ native libraries, licence texts,
//! and Python package sources into a platform-specific distribution
//! archive. It is used by the `fmipp-bdist` CLI binary and can be driven
//! programmatically for testing or custom release workflows.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - The `dist.toml` configuration file
//! - [`dist`] - Distribution model, manifest resolution, and archive emission
//! - [`error`] - Crate-wide error type
//! - [`metadata`] - Package metadata and the long-description loader
//! - [`pipeline`] - Orchestration of the `check`, `build`, and `bdist` steps
//! - [`report`] - Human-readable and JSON summaries, progress output

pub mod cli;
pub mod config;
pub mod dist;
pub mod error;
pub mod metadata;
pub mod pipeline;
pub mod report;

#[cfg(test)]
mod test_support;
