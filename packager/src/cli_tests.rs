//! Tests for CLI parsing and default behaviours.

use super::*;
use clap::CommandFactory;
use rstest::rstest;

#[test]
fn cli_parses_defaults() {
    let cli = Cli::parse_from(["fmipp-bdist", "bdist"]);
    assert_eq!(cli.config, Utf8PathBuf::from("dist.toml"));
    assert!(!cli.quiet);
    match cli.command {
        Command::Bdist(args) => {
            assert_eq!(args.format, ArchiveFormat::Wheel);
            assert!(args.dist_dir.is_none());
            assert!(args.policy.missing_artifacts.is_none());
        }
        other => panic!("expected Bdist command, got {other:?}"),
    }
}

#[test]
fn cli_requires_a_subcommand() {
    assert!(Cli::try_parse_from(["fmipp-bdist"]).is_err());
}

#[test]
fn cli_accepts_global_options_after_subcommand() {
    let cli = Cli::parse_from(["fmipp-bdist", "check", "--config", "pkg/dist.toml", "-q"]);
    assert_eq!(cli.config, Utf8PathBuf::from("pkg/dist.toml"));
    assert!(cli.quiet);
}

#[test]
fn cli_parses_check_with_json() {
    let cli = Cli::parse_from(["fmipp-bdist", "check", "--json"]);
    match cli.command {
        Command::Check(args) => assert!(args.json),
        other => panic!("expected Check command, got {other:?}"),
    }
}

#[test]
fn cli_parses_build_dir() {
    let cli = Cli::parse_from(["fmipp-bdist", "build", "--build-dir", "/tmp/build"]);
    match cli.command {
        Command::Build(args) => {
            assert_eq!(args.build_dir, Some(Utf8PathBuf::from("/tmp/build")));
        }
        other => panic!("expected Build command, got {other:?}"),
    }
}

#[test]
fn cli_parses_gztar_into_dist_dir() {
    let cli = Cli::parse_from(["fmipp-bdist", "bdist", "-f", "gztar", "-d", "out"]);
    match cli.command {
        Command::Bdist(args) => {
            assert_eq!(args.format, ArchiveFormat::Gztar);
            assert_eq!(args.dist_dir, Some(Utf8PathBuf::from("out")));
        }
        other => panic!("expected Bdist command, got {other:?}"),
    }
}

#[rstest]
#[case::check("check", "abort", MissingArtifactPolicy::Abort)]
#[case::build("build", "warn", MissingArtifactPolicy::Warn)]
#[case::bdist("bdist", "defer", MissingArtifactPolicy::Defer)]
fn every_subcommand_accepts_policy_override(
    #[case] subcommand: &str,
    #[case] value: &str,
    #[case] expected: MissingArtifactPolicy,
) {
    let cli = Cli::parse_from(["fmipp-bdist", subcommand, "--missing-artifacts", value]);
    assert_eq!(cli.missing_artifacts(), Some(expected));
}

#[rstest]
#[case::unknown_format(&["fmipp-bdist", "bdist", "--format", "zip"])]
#[case::unknown_policy(&["fmipp-bdist", "check", "--missing-artifacts", "ignore"])]
#[case::json_on_bdist(&["fmipp-bdist", "bdist", "--json"])]
fn cli_rejects_invalid_arguments(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}
