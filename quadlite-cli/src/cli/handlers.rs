// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers for QuadLite

use colored::Colorize;
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::commands::OutputFormat;
use super::output::ResultFormatter;
use quadlite::config::ConfigError;
use quadlite::graph::StoreError;
use quadlite::gremlin::{ChainError, CompileError, StepId};
use quadlite::iterator::{Description, EvalError};
use quadlite::{Chain, Compiler, CompilerConfig, Evaluator, MemStore, QuadStore};

/// CLI errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Chain(#[from] ChainError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("Compilation failed: {0}")]
    Compile(#[from] CompileError),

    #[error("Evaluation failed: {0}")]
    Eval(#[from] EvalError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Step {0} is not part of the chain")]
    UnknownTip(usize),
}

/// One evaluated result, resolved to names
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
pub struct ResultEntry {
    pub result: String,
    pub tags: BTreeMap<String, String>,
}

/// Everything `compile` produces
#[derive(Debug, Clone, serde::Serialize)]
pub struct CompileReport {
    pub tip: StepId,
    pub steps: usize,
    pub quads: usize,
    pub tree: Description,
    pub results: Vec<ResultEntry>,
}

/// Load the compiler configuration, falling back to defaults
pub fn load_config(path: Option<&Path>) -> Result<CompilerConfig, CliError> {
    match path {
        Some(path) => {
            debug!("Loading compiler config from {:?}", path);
            Ok(CompilerConfig::from_file(path)?)
        }
        None => Ok(CompilerConfig::default()),
    }
}

/// Load quads from a JSON array (`.json`) or whitespace separated lines
pub fn load_store(path: Option<&Path>) -> Result<MemStore, CliError> {
    let mut store = MemStore::new();
    let Some(path) = path else {
        return Ok(store);
    };

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let added = if is_json {
        store.load_json(&std::fs::read_to_string(path)?)?
    } else {
        store.load_quads(BufReader::new(File::open(path)?))?
    };
    info!("Loaded {} quads from {:?}", added, path);
    Ok(store)
}

/// Compile and evaluate a chain document
pub fn run_compile(
    chain_path: &Path,
    tip: Option<usize>,
    quads_path: Option<&Path>,
    config: CompilerConfig,
) -> Result<CompileReport, CliError> {
    let (chain, document_tip) = Chain::from_reader(BufReader::new(File::open(chain_path)?))?;
    let tip = match tip {
        Some(index) if chain.get(StepId(index)).is_some() => StepId(index),
        Some(index) => return Err(CliError::UnknownTip(index)),
        None => document_tip,
    };

    let store = load_store(quads_path)?;
    let tree = Compiler::with_config(&store, config).compile(&chain, tip)?;

    let mut results: Vec<ResultEntry> = Evaluator::new(&store)
        .evaluate(&tree)?
        .iter()
        .map(|row| {
            let (result, tags) = row.resolve(&store);
            ResultEntry { result, tags }
        })
        .collect();
    results.sort();

    Ok(CompileReport {
        tip,
        steps: chain.len(),
        quads: store.size(),
        tree: tree.describe(&store),
        results,
    })
}

/// Handle the compile command
pub fn handle_compile(
    chain: PathBuf,
    tip: Option<usize>,
    quads: Option<PathBuf>,
    format: OutputFormat,
    explain: bool,
    config: CompilerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match run_compile(&chain, tip, quads.as_deref(), config) {
        Ok(report) => {
            println!("{}", ResultFormatter::format(&report, format, explain));
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            Err(e.into())
        }
    }
}

/// Handle the version command
pub fn handle_version() {
    println!(
        "{} {}",
        "QuadLite".bold().green(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const CHAIN: &str = r#"{
        "steps": [
            {"kind": {"type": "vertex", "args": ["alice"]}},
            {"kind": {"type": "tag", "args": ["start"]}, "prev": 0},
            {"kind": {"type": "out", "args": ["knows"]}, "prev": 1}
        ]
    }"#;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).expect("Failed to create fixture");
        file.write_all(contents.as_bytes())
            .expect("Failed to write fixture");
        path
    }

    #[test]
    fn test_run_compile_with_line_quads() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let chain = write(&dir, "chain.json", CHAIN);
        let quads = write(&dir, "social.nq", "alice knows bob .\nbob knows carol .\n");

        let report = run_compile(&chain, None, Some(&quads), CompilerConfig::default()).unwrap();
        assert_eq!(report.tip, StepId(2));
        assert_eq!(report.quads, 2);
        assert_eq!(report.tree.kind, "hasa");
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].result, "bob");
        assert_eq!(report.results[0].tags["start"], "alice");
    }

    #[test]
    fn test_run_compile_with_json_quads_and_tip() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let chain = write(&dir, "chain.json", CHAIN);
        let quads = write(
            &dir,
            "social.json",
            r#"[{"subject": "alice", "predicate": "knows", "object": "bob"}]"#,
        );

        let report = run_compile(&chain, Some(0), Some(&quads), CompilerConfig::default()).unwrap();
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].result, "alice");

        let err = run_compile(&chain, Some(9), Some(&quads), CompilerConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::UnknownTip(9)));
    }

    #[test]
    fn test_config_depth_is_applied() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let chain = write(&dir, "chain.json", CHAIN);
        let mut config_file = NamedTempFile::new().expect("Failed to create config");
        config_file.write_all(br#"{"max_depth": 1}"#).unwrap();

        let config = load_config(Some(config_file.path())).unwrap();
        let err = run_compile(&chain, None, None, config).unwrap_err();
        assert!(matches!(err, CliError::Compile(CompileError::DepthExceeded { limit: 1 })));
    }

    #[test]
    fn test_bad_quad_file_reports_line() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let chain = write(&dir, "chain.json", CHAIN);
        let quads = write(&dir, "broken.nq", "alice knows bob .\nnot a\n");

        let err = run_compile(&chain, None, Some(&quads), CompilerConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::Store(StoreError::Parse { line: 2, .. })));
    }
}
