// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! QuadLite - a traversal query compiler for quad stores
//!
//! Query chains (`vertex("alice").out("knows").tag("friend")`) are lowered
//! into trees of primitive graph iterators. The trees are plain data: an
//! execution engine walks them against a [`QuadStore`]. A small reference
//! evaluator and an in-memory store are included for testing and for the
//! command line tool.

pub mod config;
pub mod graph;
pub mod gremlin;
pub mod iterator;
pub mod quad;

pub use config::{CompilerConfig, ConfigError};
pub use graph::{MemStore, QuadStore, StoreError, ValueId};
pub use gremlin::{build_iterator_tree, Chain, ChainBuilder, ChainError, CompileError, Compiler, StepId};
pub use iterator::{Evaluator, GraphIterator, IteratorKind};
pub use quad::{Direction, Quad};
