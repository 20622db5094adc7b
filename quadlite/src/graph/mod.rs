// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Quad store collaborator interface
//!
//! This module provides:
//! - Interned value identifiers ([`ValueId`]) and quad identifiers ([`QuadId`])
//! - The [`QuadStore`] trait the compiler and evaluator call into
//! - [`MemStore`], an in-memory reference store

pub mod memstore;

pub use memstore::MemStore;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::iterator::{Fixed, GraphIterator};
use crate::quad::Direction;

/// Interned identifier of a node value inside a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueId(pub u64);

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a stored quad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuadId(pub usize);

/// Store errors (loading and parsing quads)
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read access to a quad store
///
/// Every node value is interned to a [`ValueId`]. Iterators produced by the
/// compiler refer to values by id only; resolving them back to names is done
/// through [`QuadStore::name_of`].
pub trait QuadStore {
    /// Intern lookup. `None` when the store has never seen `name`.
    fn value_of(&self, name: &str) -> Option<ValueId>;

    /// Reverse of [`QuadStore::value_of`]
    fn name_of(&self, id: ValueId) -> Option<&str>;

    /// Every known node value, predicates and labels included
    fn node_ids(&self) -> Vec<ValueId>;

    /// Quads holding `value` in the `direction` slot
    fn quads_with(&self, direction: Direction, value: ValueId) -> Vec<QuadId>;

    /// Value stored in the `direction` slot of `quad`
    fn quad_direction(&self, quad: QuadId, direction: Direction) -> Option<ValueId>;

    /// Number of stored quads
    fn size(&self) -> usize;

    /// Universal set of all known nodes
    fn nodes_all_iterator(&self) -> GraphIterator {
        GraphIterator::all()
    }

    /// Empty fixed set, to be filled with [`Fixed::add`]
    fn fixed_iterator(&self) -> Fixed {
        Fixed::new()
    }
}
