use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use similar::{ChangeTag, TextDiff};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rs_1brc_stream::{aggregate_path, format_records, render};

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    // stdout carries only the result line
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.to_config();

    let now = Instant::now();
    let table = aggregate_path(&config)
        .with_context(|| format!("failed to aggregate {}", config.input.display()))?;
    if config.profile {
        info!(elapsed = ?now.elapsed(), "aggregate");
    }

    let now = Instant::now();
    let line = render(&format_records(&table));
    if config.profile {
        info!(elapsed = ?now.elapsed(), "format");
    }

    let mut out = BufWriter::new(io::stdout().lock());
    out.write_all(line.as_bytes())?;
    out.flush()?;

    if let Some(expected) = &cli.expected {
        verify(&line, expected)?;
    }
    Ok(())
}

/// One record per line, so a diff points at the station that changed.
fn split_records(line: &str) -> String {
    line.replace(", ", ",\n")
}

fn verify(actual: &str, expected_path: &Path) -> Result<()> {
    let expected = fs::read_to_string(expected_path)
        .with_context(|| format!("failed to read {}", expected_path.display()))?;
    if expected == actual {
        info!(path = %expected_path.display(), "output matches");
        return Ok(());
    }

    let (expected, actual) = (split_records(&expected), split_records(actual));
    let diff = TextDiff::from_lines(&expected, &actual);
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => continue,
        };
        eprint!("{sign}{change}");
        if change.missing_newline() {
            eprintln!();
        }
    }
    bail!("output differs from {}", expected_path.display())
}
