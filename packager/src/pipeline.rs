//! Orchestration of the `check`, `build`, and `bdist` steps.
//!
//! Every step starts from [`prepare`], which performs all validation and
//! resolution before anything is written. Progress lines go to the injected
//! `stderr` writer unless the context is quiet; warnings are always shown.

use crate::config::DistConfig;
use crate::dist::descriptor::{DistributionDescriptor, build_descriptor};
use crate::dist::emit::{EmitOutput, EmitRequest, emit_distribution};
use crate::dist::manifest::{MissingArtifactPolicy, resolve_artifacts};
use crate::dist::naming::ArchiveFormat;
use crate::dist::staging::{StagedTree, stage_build};
use crate::error::Result;
use crate::metadata::load_long_description;
use crate::report::{format_human, format_json, skipped_warning, write_stderr_line};
use camino::{Utf8Path, Utf8PathBuf};
use std::io::Write;

/// Context for a pipeline run.
pub struct PipelineContext<'a> {
    /// Loaded configuration.
    pub config: &'a DistConfig,
    /// Effective missing-artifact policy.
    pub policy: MissingArtifactPolicy,
    /// Suppress progress output.
    pub quiet: bool,
}

impl<'a> PipelineContext<'a> {
    /// Create a context using the policy from `config`.
    #[must_use]
    pub fn new(config: &'a DistConfig) -> Self {
        Self {
            config,
            policy: config.distribution.missing_artifacts,
            quiet: false,
        }
    }
}

/// A validated descriptor and the tree it was resolved against.
#[derive(Debug, Clone)]
pub struct Prepared {
    /// The descriptor to emit or stage.
    pub descriptor: DistributionDescriptor,
    /// Root of the source tree.
    pub source_root: Utf8PathBuf,
}

/// Load, validate, and resolve everything needed for one distribution.
///
/// The long description is read first, so a missing document fails before
/// any artifact is inspected.
///
/// # Errors
///
/// Returns the first failure from loading the description, validating the
/// metadata, resolving artifacts, or building the tag and descriptor.
pub fn prepare(context: &PipelineContext<'_>, stderr: &mut dyn Write) -> Result<Prepared> {
    let config = context.config;
    let long_description = load_long_description(&config.long_description_path())?;
    let metadata = config.package_metadata(long_description);
    metadata.validate()?;

    let source_root = config.source_root();
    let manifest = resolve_artifacts(
        &source_root,
        &config.distribution.packages,
        &config.declared_artifacts(),
        context.policy,
    )?;
    for artifact in manifest.skipped() {
        write_stderr_line(stderr, skipped_warning(artifact));
    }

    let descriptor = build_descriptor(
        metadata,
        manifest,
        config.distribution.packages.clone(),
        config.wheel_tag()?,
    )?;
    Ok(Prepared {
        descriptor,
        source_root,
    })
}

/// Validate the configuration and print a summary to `stdout`.
///
/// # Errors
///
/// As for [`prepare`], plus serialisation failures when `json` is set.
pub fn run_check(
    context: &PipelineContext<'_>,
    json: bool,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    let prepared = prepare(context, stderr)?;
    let summary = if json {
        format_json(&prepared.descriptor)?
    } else {
        format_human(&prepared.descriptor)
    };
    writeln!(stdout, "{summary}")?;
    Ok(())
}

/// Stage the payload into `<build_dir>/lib`.
///
/// # Errors
///
/// As for [`prepare`] and [`stage_build`].
pub fn run_build(
    context: &PipelineContext<'_>,
    build_dir: &Utf8Path,
    stderr: &mut dyn Write,
) -> Result<StagedTree> {
    let prepared = prepare(context, stderr)?;
    if !context.quiet {
        write_stderr_line(stderr, format!("Staging build tree in {build_dir}..."));
    }

    let staged = stage_build(&prepared.descriptor, &prepared.source_root, build_dir)?;
    if !context.quiet {
        write_stderr_line(
            stderr,
            format!("Staged {} file(s) in {}", staged.files.len(), staged.lib_dir),
        );
    }
    Ok(staged)
}

/// Emit an archive in `format` into `dist_dir`.
///
/// # Errors
///
/// As for [`prepare`] and [`emit_distribution`].
pub fn run_bdist(
    context: &PipelineContext<'_>,
    format: ArchiveFormat,
    dist_dir: &Utf8Path,
    stderr: &mut dyn Write,
) -> Result<EmitOutput> {
    let prepared = prepare(context, stderr)?;
    if !context.quiet {
        let metadata = prepared.descriptor.metadata();
        write_stderr_line(
            stderr,
            format!(
                "Packaging {} {} as {format} for {}...",
                metadata.name,
                metadata.version,
                prepared.descriptor.tag().platform()
            ),
        );
    }

    let request = EmitRequest {
        source_root: prepared.source_root,
        output_dir: dist_dir.to_owned(),
        format,
    };
    let output = emit_distribution(&prepared.descriptor, &request)?;
    if !context.quiet {
        write_stderr_line(stderr, format!("Created {}", output.archive_path));
    }
    Ok(output)
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
