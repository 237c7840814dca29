//! CLI argument parsing using clap.

use clap::{Parser, ValueEnum};
use sqlgauge_core::RuleTable;
use std::path::PathBuf;

/// SQLGauge - SQL query complexity scorer
#[derive(Parser, Debug)]
#[command(name = "sqlgauge")]
#[command(about = "Score the structural complexity of a SQL query", long_about = None)]
#[command(version)]
pub struct Args {
    /// SQL file to assess ('-' or omitted reads from stdin)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Print the full category breakdown and echo the input to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: OutputFormat,

    /// Weight preset to score with
    #[arg(short, long, default_value = "default", value_enum)]
    pub rules: RulesArg,

    /// JSON file with weight overrides (takes precedence over --rules)
    #[arg(long, value_name = "FILE")]
    pub rules_file: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Suppress hints on stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Compact JSON output (no pretty-printing)
    #[arg(short, long)]
    pub compact: bool,
}

/// Output format selection.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON breakdown
    Json,
}

/// Built-in weight presets.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RulesArg {
    /// Every category weighs 1
    Default,
    /// Outer joins, functions and CASE weigh 2
    Strict,
    /// Joins and functions weigh 0
    Lenient,
}

impl From<RulesArg> for RuleTable {
    fn from(arg: RulesArg) -> Self {
        match arg {
            RulesArg::Default => RuleTable::default(),
            RulesArg::Strict => RuleTable::strict(),
            RulesArg::Lenient => RuleTable::lenient(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["sqlgauge"]);
        assert!(args.input.is_none());
        assert!(!args.verbose);
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.rules, RulesArg::Default);
    }

    #[test]
    fn test_preset_maps_to_table() {
        assert_eq!(RuleTable::from(RulesArg::Strict), RuleTable::strict());
        assert_eq!(RuleTable::from(RulesArg::Lenient), RuleTable::lenient());
        assert_eq!(RuleTable::from(RulesArg::Default), RuleTable::default());
    }

    #[test]
    fn test_parse_full_invocation() {
        let args = Args::parse_from([
            "sqlgauge",
            "query.sql",
            "--format",
            "json",
            "--rules",
            "strict",
            "--compact",
        ]);
        assert_eq!(args.input.as_deref().unwrap().to_str(), Some("query.sql"));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.rules, RulesArg::Strict);
        assert!(args.compact);
    }
}
