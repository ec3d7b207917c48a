use anyhow::{Context, Result};
use changelint::{Outcome, ReportFormat, RunOptions};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "changelint")]
#[command(version, about = "check a changelog against the keep-a-changelog conventions", long_about = None)]
struct Cli {
    /// path to the changelog (defaults to CHANGELOG.md or the configured file name)
    changelog: Option<PathBuf>,

    /// project directory holding the changelog, changelint.toml and Cargo.toml
    #[arg(short = 'C', long = "dir", default_value = ".")]
    dir: PathBuf,

    /// canonical repository url used to check release links
    #[arg(short, long)]
    repository: Option<String>,

    /// configuration file, relative to the current directory (defaults to changelint.toml in the project directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// output format (json or human)
    #[arg(short, long, default_value = "human")]
    format: ReportFormat,

    /// do not print anything when the changelog is clean
    #[arg(short, long)]
    quiet: bool,

    /// enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "changelint=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // stdout stays unused, logs share stderr with the report
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn lint(cli: &Cli) -> Result<Outcome> {
    let mut options = RunOptions::new(&cli.dir)
        .quiet(cli.quiet)
        .format(cli.format);

    if let Some(path) = &cli.changelog {
        options = options.changelog(path);
    }
    if let Some(path) = &cli.config {
        options = options.config_file(path);
    }
    if let Some(repository) = &cli.repository {
        options = options.repository(repository);
    }

    let mut stderr = std::io::stderr().lock();
    changelint::run(&options, &mut stderr).context("failed to check changelog")
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match lint(&cli) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
