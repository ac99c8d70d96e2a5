//! FMI++ distribution packager CLI entrypoint.
//!
//! This binary loads `dist.toml`, validates the declared inputs, and either
//! reports on them, stages them into a build tree, or writes a
//! platform-specific distribution archive.

use clap::Parser;
use fmipp_packager::cli::{Cli, Command};
use fmipp_packager::config::DistConfig;
use fmipp_packager::error::Result;
use fmipp_packager::pipeline::{PipelineContext, run_bdist, run_build, run_check};
use fmipp_packager::report::write_stderr_line;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    let config = DistConfig::load(&cli.config)?;
    let context = PipelineContext {
        config: &config,
        policy: cli
            .missing_artifacts()
            .unwrap_or(config.distribution.missing_artifacts),
        quiet: cli.quiet,
    };

    match &cli.command {
        Command::Check(args) => run_check(&context, args.json, stdout, stderr),
        Command::Build(args) => {
            let build_dir = args.build_dir.clone().unwrap_or_else(|| config.build_dir());
            run_build(&context, &build_dir, stderr).map(|_| ())
        }
        Command::Bdist(args) => {
            let dist_dir = args.dist_dir.clone().unwrap_or_else(|| config.dist_dir());
            run_bdist(&context, args.format, &dist_dir, stderr).map(|_| ())
        }
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}
