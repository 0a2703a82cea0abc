//! oxide-sqlparse CLI
//!
//! Parses SQL files statement by statement and reports every syntax error
//! with its location.

pub mod report;

use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{debug, info};

use oxide_sqlparse::SqlParser;

pub use report::{ErrorReport, FileReport, StatementReport};

/// Name shown for input read from stdin.
pub const STDIN_NAME: &str = "<stdin>";

/// Lint multi-statement SQL files.
#[derive(Debug, Parser)]
#[command(name = "oxide-sqlparse")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// SQL files to check. Reads stdin when none are given.
    pub files: Vec<PathBuf>,

    /// Stop each file at its first failing statement.
    #[arg(long, env = "OXIDE_SQLPARSE_STRICT")]
    pub strict: bool,

    /// Output format.
    #[arg(long, value_enum, env = "OXIDE_SQLPARSE_FORMAT", default_value_t = Format::Text)]
    pub format: Format,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Report rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One block per failed statement plus a summary line.
    Text,
    /// One JSON document per file.
    Json,
}

/// Checks every input named by `cli` and writes the reports to `out`.
///
/// Returns `true` when every statement of every input parsed.
///
/// # Errors
///
/// Returns an error if an input cannot be read or the output cannot be
/// written.
pub fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<bool> {
    let parser = SqlParser::new().raise_on_error(cli.strict);
    let mut all_ok = true;

    if cli.files.is_empty() {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("failed to read stdin")?;
        all_ok &= check(&parser, STDIN_NAME, &source, cli.format, out)?;
    } else {
        for path in &cli.files {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            all_ok &= check(&parser, &path.display().to_string(), &source, cli.format, out)?;
        }
    }

    Ok(all_ok)
}

/// Checks one input and writes its report.
///
/// # Errors
///
/// Returns an error if the report cannot be written, or if the parser
/// reports a dialect contract violation.
pub fn check(
    parser: &SqlParser,
    path: &str,
    source: &str,
    format: Format,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    debug!(path, bytes = source.len(), "Checking input");
    let report = FileReport::from_parse(path, parser.parse(source))?;
    info!(
        path,
        statements = report.statements.len(),
        failed = report.failed(),
        "Checked input"
    );

    match format {
        Format::Text => out.write_all(report.to_text().as_bytes())?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }

    Ok(report.is_ok())
}
