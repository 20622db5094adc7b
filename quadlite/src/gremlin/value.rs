// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Step argument coercion
//!
//! Turns the loosely typed [`ArgValue`]s handed over by the front end into
//! the shapes the compiler works with. Every function here returns `None`
//! for a value it cannot use; callers turn that into the canonical empty
//! iterator.

use log::debug;

use super::chain::{ArgValue, StepId};
use crate::graph::QuadStore;
use crate::iterator::{ComparisonValue, GraphIterator, Operator};

/// A coerced step argument
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    /// No value; stands for every node
    Absent,
    Scalar(String),
    List(Vec<String>),
    /// A nested chain to compile in isolation
    Chain(StepId),
}

/// Coerce a node-selecting argument.
///
/// Primitives become a single name. Arrays must hold primitives of one
/// kind (all strings, all numbers or all booleans); mixed, nested or null
/// elements fail.
pub fn coerce(value: &ArgValue) -> Option<Coerced> {
    match value {
        ArgValue::Null => Some(Coerced::Absent),
        ArgValue::Chain { chain } => Some(Coerced::Chain(*chain)),
        ArgValue::Array(values) => homogeneous_names(values).map(Coerced::List),
        primitive => scalar_name(primitive).map(Coerced::Scalar),
    }
}

fn scalar_name(value: &ArgValue) -> Option<String> {
    match value {
        ArgValue::String(s) => Some(s.clone()),
        ArgValue::Int(i) => Some(i.to_string()),
        ArgValue::Float(f) => Some(f.to_string()),
        ArgValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[derive(PartialEq)]
enum PrimitiveKind {
    String,
    Number,
    Bool,
}

fn primitive_kind(value: &ArgValue) -> Option<PrimitiveKind> {
    match value {
        ArgValue::String(_) => Some(PrimitiveKind::String),
        ArgValue::Int(_) | ArgValue::Float(_) => Some(PrimitiveKind::Number),
        ArgValue::Bool(_) => Some(PrimitiveKind::Bool),
        _ => None,
    }
}

fn homogeneous_names(values: &[ArgValue]) -> Option<Vec<String>> {
    let first = match values.first() {
        Some(value) => primitive_kind(value)?,
        None => return Some(Vec::new()),
    };
    values
        .iter()
        .map(|value| match primitive_kind(value) {
            Some(kind) if kind == first => scalar_name(value),
            _ => None,
        })
        .collect()
}

/// A string, or an array made only of strings
pub fn string_list(value: &ArgValue) -> Option<Vec<String>> {
    match value {
        ArgValue::String(s) => Some(vec![s.clone()]),
        ArgValue::Array(values) => values
            .iter()
            .map(|v| match v {
                ArgValue::String(s) => Some(s.clone()),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

/// Tag names: a string, or the string elements of an array. Anything else
/// names no tags.
pub fn tag_names(value: &ArgValue) -> Vec<String> {
    match value {
        ArgValue::String(s) => vec![s.clone()],
        ArgValue::Array(values) => values
            .iter()
            .filter_map(|v| match v {
                ArgValue::String(s) => Some(s.clone()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Integer view of a numeric argument; floats truncate toward zero
pub fn integer(value: &ArgValue) -> Option<i64> {
    match value {
        ArgValue::Int(i) => Some(*i),
        ArgValue::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        _ => None,
    }
}

/// Comparison operator from its numeric id
pub fn operator(value: &ArgValue) -> Option<Operator> {
    integer(value).and_then(Operator::from_id)
}

/// Comparison operand for `operator`.
///
/// Arrays made only of integers become an integer list; any other array
/// must be made only of strings. Floats truncate as scalars but never
/// inside an array. The result must have the shape the operator expects.
pub fn operand(value: &ArgValue, operator: Operator) -> Option<ComparisonValue> {
    let coerced = match value {
        ArgValue::Array(values) => match int_list(values) {
            Some(ints) => ComparisonValue::IntList(ints),
            None => ComparisonValue::StringList(string_list(value)?),
        },
        ArgValue::String(s) => ComparisonValue::String(s.clone()),
        other => ComparisonValue::Int(integer(other)?),
    };
    coerced.fits(operator).then_some(coerced)
}

fn int_list(values: &[ArgValue]) -> Option<Vec<i64>> {
    values
        .iter()
        .map(|v| match v {
            ArgValue::Int(i) => Some(*i),
            _ => None,
        })
        .collect()
}

/// Fixed set of the interned values of `names`.
///
/// Names the store has never seen contribute nothing.
pub fn fixed_of<S: AsRef<str>>(store: &dyn QuadStore, names: &[S]) -> GraphIterator {
    let mut fixed = store.fixed_iterator();
    for name in names {
        match store.value_of(name.as_ref()) {
            Some(id) => fixed.add(id),
            None => debug!("'{}' is not in the store, skipping", name.as_ref()),
        }
    }
    fixed.into()
}
