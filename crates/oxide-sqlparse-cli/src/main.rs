//! oxide-sqlparse CLI
//!
//! Exits with 0 when every statement parsed and 1 otherwise.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use oxide_sqlparse_cli::{Cli, run};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Reports own stdout; logs go to stderr
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let stdout = io::stdout();
    let all_ok = run(&cli, &mut stdout.lock())?;

    Ok(if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
