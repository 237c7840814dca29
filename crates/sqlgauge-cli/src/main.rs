//! SQLGauge CLI - SQL query complexity scorer

use sqlgauge_cli::cli;
use sqlgauge_cli::input;
use sqlgauge_cli::output;

use anyhow::{Context, Result};
use clap::Parser;
use is_terminal::IsTerminal;
use sqlgauge_core::{assess_with_rules, RuleTable};
use std::fs;
use std::io;
use std::process::ExitCode;

use cli::{Args, OutputFormat};

/// Assessment failed (the input did not parse).
const EXIT_FAILURE: u8 = 1;
/// Configuration error (unreadable input, bad rules file).
const EXIT_CONFIG_ERROR: u8 = 66;

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(EXIT_FAILURE)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("sqlgauge: error: {e:#}");
            ExitCode::from(EXIT_CONFIG_ERROR)
        }
    }
}

fn run(args: Args) -> Result<bool> {
    let rules = load_rules(&args)?;

    let reading_stdin = args
        .input
        .as_deref()
        .map_or(true, |p| p.as_os_str() == "-");
    if reading_stdin && io::stdin().is_terminal() && !args.quiet {
        eprintln!("Running in interactive mode");
    }

    let source = input::read_input(args.input.as_deref())?;
    let sql = source.content.trim();

    if args.verbose && !args.quiet {
        eprintln!("{sql}");
    }

    let breakdown = match assess_with_rules(sql, &rules) {
        Ok(breakdown) => breakdown,
        Err(e) => {
            eprintln!("sqlgauge: error: {}: {e}", source.name);
            return Ok(true);
        }
    };

    let rendered = match args.format {
        OutputFormat::Text => {
            output::format_text(&breakdown, args.verbose, args.output.is_none())
        }
        OutputFormat::Json => output::format_json(&breakdown, args.compact)?,
    };

    match &args.output {
        Some(path) => {
            fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
        }
        None => println!("{rendered}"),
    }

    Ok(false)
}

/// Resolve the effective rule table: an explicit rules file wins over
/// the preset flag.
fn load_rules(args: &Args) -> Result<RuleTable> {
    if let Some(path) = &args.rules_file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules file: {}", path.display()))?;
        let table = serde_json::from_str(&text)
            .with_context(|| format!("Invalid rules file: {}", path.display()))?;
        return Ok(table);
    }
    Ok(args.rules.into())
}
