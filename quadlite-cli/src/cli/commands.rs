// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command definitions for QuadLite

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// How much of the compiler's reasoning to print. Rejected steps are
/// logged at `warn`, skipped names at `debug`.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    /// Steps that compiled to the empty iterator
    Warn,
    Info,
    /// Also names missing from the store
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        use log::LevelFilter;
        match self {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// QuadLite CLI - compile and run traversal chains
#[derive(Parser)]
#[command(name = "quadlite")]
#[command(about = "QuadLite - traversal chains compiled to graph iterators")]
#[command(version)]
pub struct Cli {
    /// Set log level (error, warn, info, debug, trace, off)
    #[arg(short = 'l', long = "log-level", global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Verbose mode (equivalent to --log-level debug)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Compiler configuration file (JSON)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Effective log level: `--log-level` wins over `--verbose`
    pub fn level_filter(&self) -> log::LevelFilter {
        match (self.log_level, self.verbose) {
            (Some(level), _) => level.to_level_filter(),
            (None, true) => log::LevelFilter::Debug,
            (None, false) => log::LevelFilter::Warn,
        }
    }
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show detailed version information
    Version,

    /// Compile a chain document and evaluate it against a set of quads
    Compile {
        /// Chain document (JSON)
        #[arg(long)]
        chain: PathBuf,

        /// Step to compile; defaults to the document's tip
        #[arg(long)]
        tip: Option<usize>,

        /// Quads to evaluate against (`.json` array or whitespace separated lines)
        #[arg(short, long)]
        quads: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,

        /// Show the compiled iterator tree
        #[arg(short, long)]
        explain: bool,
    },
}

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compile() {
        let cli = Cli::try_parse_from([
            "quadlite", "compile", "--chain", "q.json", "--quads", "data.nq", "--format", "json",
            "--explain", "-v",
        ])
        .unwrap();

        assert_eq!(cli.level_filter(), log::LevelFilter::Debug);
        match cli.command {
            Commands::Compile {
                chain,
                tip,
                quads,
                format,
                explain,
            } => {
                assert_eq!(chain, PathBuf::from("q.json"));
                assert_eq!(tip, None);
                assert_eq!(quads, Some(PathBuf::from("data.nq")));
                assert_eq!(format, OutputFormat::Json);
                assert!(explain);
            }
            Commands::Version => panic!("expected compile"),
        }
    }

    #[test]
    fn test_log_level_beats_verbose() {
        let cli = Cli::try_parse_from(["quadlite", "--log-level", "off", "-v", "version"]).unwrap();
        assert_eq!(cli.level_filter(), log::LevelFilter::Off);
    }

    #[test]
    fn test_unknown_format() {
        assert!("csv".parse::<OutputFormat>().is_err());
        assert_eq!("TABLE".parse::<OutputFormat>(), Ok(OutputFormat::Table));
    }
}
