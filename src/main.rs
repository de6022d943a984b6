//! autovenv CLI entry point.

use std::process::ExitCode;

use autovenv::cli::{self, Cli};
use autovenv::ui::{ColorChoice, Output};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG, `--quiet` to ERROR
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
///
/// Logs go to stderr: stdout belongs to the user's program.
fn init_tracing(debug: bool, quiet: bool) {
    let filter = if debug {
        EnvFilter::new("autovenv=debug")
    } else if quiet {
        EnvFilter::new("autovenv=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("autovenv=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug, cli.quiet);

    tracing::debug!("autovenv starting with args: {:?}", cli);

    let out = Output::new(
        cli.quiet,
        ColorChoice::from_flags(cli.color, cli.no_color),
    );

    match cli::run(cli) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            out.error(&e.to_string());
            ExitCode::from(1)
        }
    }
}
