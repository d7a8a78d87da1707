// These Clippy lints are disabled because this is a CLI binary, not a library:
// - print_stdout/print_stderr: CLI tools are expected to print to stdout/stderr for user output.
// - exit: Calling `std::process::exit()` is standard for CLI apps to signal failure to the shell.
#![allow(clippy::print_stdout, clippy::print_stderr, clippy::exit)]

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, ValueEnum};
use querybundle::{FsBundleConfig, ImportDispatcher, ImportOptions, load_dir, output};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Plain-text summary.
    Human,
    /// Machine-readable JSON report.
    Json,
}

/// Import a saved-query export bundle from a directory.
#[derive(Debug, Parser)]
#[command(name = "querybundle", version, about)]
struct Cli {
    /// Directory containing the exported bundle.
    bundle_dir: PathBuf,

    /// Allow the import to replace entities that already exist.
    #[arg(long)]
    overwrite: bool,

    /// Output format for the import report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    output: OutputFormat,

    /// Increase log verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<bool> {
    let config = FsBundleConfig::new(&cli.bundle_dir);
    let bundle = load_dir(&config)
        .with_context(|| format!("failed to load bundle from {}", cli.bundle_dir.display()))?;

    let mut options = ImportOptions::default();
    options.overwrite = cli.overwrite;

    let dispatcher = ImportDispatcher::with_default_handlers(options);
    match dispatcher.run(&bundle) {
        Ok(report) => {
            let mut stdout = std::io::stdout().lock();
            match cli.output {
                OutputFormat::Human => output::write_human(&report, &mut stdout)?,
                OutputFormat::Json => output::write_json(&report, &mut stdout)?,
            }
            Ok(true)
        }
        Err(error) => {
            let mut stderr = std::io::stderr().lock();
            output::write_error_human(&error, &mut stderr)?;
            Ok(false)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(2);
        }
    }
}
