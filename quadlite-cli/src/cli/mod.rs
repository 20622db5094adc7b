// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for QuadLite
//!
//! Provides the command-line interface for compiling chain documents,
//! explaining the resulting iterator trees and evaluating them against quads.

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Commands};
pub use handlers::{handle_compile, handle_version, load_config};
