// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! QuadLite command-line entry point

mod cli;

use clap::Parser;
use colored::Colorize;

use cli::{handle_compile, handle_version, load_config, Cli, Commands};

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.level_filter())
        .format_timestamp(None)
        .init();

    if let Err(e) = run(cli) {
        log::debug!("Command failed: {:?}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Version => {
            handle_version();
            Ok(())
        }
        Commands::Compile {
            chain,
            tip,
            quads,
            format,
            explain,
        } => {
            let config = load_config(cli.config.as_deref()).map_err(|e| {
                eprintln!("{}", format!("Error: {}", e).red());
                e
            })?;
            handle_compile(chain, tip, quads, format, explain, config)
        }
    }
}
