//! CLI argument definitions for the distribution packager.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use crate::config::DEFAULT_CONFIG_FILE;
use crate::dist::manifest::MissingArtifactPolicy;
use crate::dist::naming::ArchiveFormat;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Package the FMI++ Python interface as a binary distribution.
#[derive(Parser, Debug)]
#[command(name = "fmipp-bdist")]
#[command(version, about)]
#[command(long_about = concat!(
    "Package the FMI++ Python interface as a binary distribution.\n\n",
    "Reads dist.toml, loads the long description, checks the declared native ",
    "libraries and licence files, and writes a platform-specific archive. ",
    "Nothing is written unless every input is present.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Validate the configuration and list the artifacts:\n",
    "    $ fmipp-bdist check\n\n",
    "  Build a wheel into dist/:\n",
    "    $ fmipp-bdist bdist\n\n",
    "  Build a tar.gz bundle, skipping missing binaries:\n",
    "    $ fmipp-bdist bdist --format gztar --missing-artifacts warn\n\n",
    "  Stage the payload into build/lib:\n",
    "    $ fmipp-bdist --config pkg/dist.toml build",
))]
pub struct Cli {
    /// Path to the distribution configuration file.
    #[arg(
        short,
        long,
        value_name = "PATH",
        default_value = DEFAULT_CONFIG_FILE,
        global = true
    )]
    pub config: Utf8PathBuf,

    /// Suppress progress output (errors and warnings still shown).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Validate inputs and print a summary without writing anything.
    Check(CheckArgs),

    /// Stage the payload into the build directory.
    Build(BuildArgs),

    /// Write the distribution archive.
    Bdist(BdistArgs),
}

/// Missing-artifact policy override shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct PolicyArgs {
    /// Override the configured policy for missing artifacts.
    #[arg(long, value_name = "POLICY", value_enum)]
    pub missing_artifacts: Option<MissingArtifactPolicy>,
}

/// Arguments for the check command.
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Output in JSON format for scripting.
    #[arg(long)]
    pub json: bool,

    /// Policy override.
    #[command(flatten)]
    pub policy: PolicyArgs,
}

/// Arguments for the build command.
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Build directory [default: from configuration].
    #[arg(short, long, value_name = "DIR")]
    pub build_dir: Option<Utf8PathBuf>,

    /// Policy override.
    #[command(flatten)]
    pub policy: PolicyArgs,
}

/// Arguments for the bdist command.
#[derive(Args, Debug, Clone, Default)]
pub struct BdistArgs {
    /// Archive format.
    #[arg(short, long, value_enum, default_value_t = ArchiveFormat::Wheel)]
    pub format: ArchiveFormat,

    /// Output directory [default: from configuration].
    #[arg(short, long, value_name = "DIR")]
    pub dist_dir: Option<Utf8PathBuf>,

    /// Policy override.
    #[command(flatten)]
    pub policy: PolicyArgs,
}

impl Cli {
    /// Return the policy override given on the command line, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use clap::Parser;
    /// use fmipp_packager::cli::Cli;
    /// use fmipp_packager::dist::manifest::MissingArtifactPolicy;
    ///
    /// let cli = Cli::parse_from(["fmipp-bdist", "check", "--missing-artifacts", "defer"]);
    /// assert_eq!(cli.missing_artifacts(), Some(MissingArtifactPolicy::Defer));
    ///
    /// let cli = Cli::parse_from(["fmipp-bdist", "bdist"]);
    /// assert_eq!(cli.missing_artifacts(), None);
    /// ```
    #[must_use]
    pub fn missing_artifacts(&self) -> Option<MissingArtifactPolicy> {
        let policy = match &self.command {
            Command::Check(args) => &args.policy,
            Command::Build(args) => &args.policy,
            Command::Bdist(args) => &args.policy,
        };
        policy.missing_artifacts
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
