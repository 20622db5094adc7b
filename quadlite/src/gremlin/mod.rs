// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Gremlin-style query chains and their compiler
//!
//! This module provides:
//! - The chain model (an arena of typed traversal steps) and a builder
//! - Coercion of loosely typed step arguments
//! - Directional edge expansion
//! - The step compiler that lowers a chain into a [`GraphIterator`] tree
//!
//! [`GraphIterator`]: crate::iterator::GraphIterator

pub mod build_iterator;
pub mod chain;
pub mod error;
pub mod expand;
pub mod value;

pub use build_iterator::{build_iterator_tree, Compiler};
pub use chain::{ArgValue, Chain, ChainBuilder, ChainDocument, Path, Step, StepId, StepKind, StepType, NO_ARGS};
pub use error::{ChainError, CompileError};
