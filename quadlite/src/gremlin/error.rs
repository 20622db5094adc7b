// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Chain and compilation error types
//!
//! Mistakes inside a query (wrong argument counts, malformed values, nested
//! chains of the wrong shape) are not errors: they compile to the canonical
//! empty iterator. The types here cover structural defects of the chain
//! arena and internal failures of the compiler.

use thiserror::Error;

use super::chain::StepId;

/// Structural chain errors
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("Step {step:?} references unknown step {target:?}")]
    UnknownStep { step: StepId, target: StepId },

    #[error("Step {step:?} references step {target:?}, which does not precede it")]
    ForwardReference { step: StepId, target: StepId },

    #[error("Chain has no steps")]
    Empty,

    #[error("Invalid chain document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Compiler failures that indicate a defect rather than a bad query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Step {0:?} does not exist in the chain")]
    UnknownStep(StepId),

    #[error("Chain nesting exceeds the configured limit of {limit} steps")]
    DepthExceeded { limit: usize },
}
