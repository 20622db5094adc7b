// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Reference evaluation of iterator trees
//!
//! This module walks a compiled [`GraphIterator`] tree against a
//! [`QuadStore`] and materializes its result rows: each row is the node
//! value that came out of the root together with every tag bound along the
//! way. It favours obviousness over speed; an execution engine is free to
//! evaluate the same tree lazily.

use log::trace;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use thiserror::Error;

use super::{GraphIterator, IteratorKind};
use crate::graph::{QuadId, QuadStore, ValueId};
use crate::quad::Direction;

/// Tag name to bound node value
pub type Tags = BTreeMap<String, ValueId>;

/// Evaluation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("{0} expects node values but its input yields quads")]
    ExpectedNodes(&'static str),

    #[error("{0} expects quads but its input yields node values")]
    ExpectedQuads(&'static str),

    #[error("Comparison over quads needs a links_to input to pick the compared slot")]
    UnscopedComparison,

    #[error("Value {0} is not known to the store")]
    UnknownValue(ValueId),
}

/// One result of a tree: the yielded node and its tag bindings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub value: ValueId,
    pub tags: Tags,
}

impl ResultRow {
    /// Resolve the row's value and tags to names
    pub fn resolve(&self, store: &dyn QuadStore) -> (String, BTreeMap<String, String>) {
        let name = |id: &ValueId| {
            store
                .name_of(*id)
                .map(str::to_string)
                .unwrap_or_else(|| id.to_string())
        };
        let tags = self
            .tags
            .iter()
            .map(|(tag, id)| (tag.clone(), name(id)))
            .collect();
        (name(&self.value), tags)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Target {
    Node(ValueId),
    Quad(QuadId),
}

#[derive(Debug, Clone)]
struct Row {
    target: Target,
    tags: Tags,
}

impl Row {
    fn node(&self, operator: &'static str) -> Result<ValueId, EvalError> {
        match self.target {
            Target::Node(value) => Ok(value),
            Target::Quad(_) => Err(EvalError::ExpectedNodes(operator)),
        }
    }

    fn quad(&self, operator: &'static str) -> Result<QuadId, EvalError> {
        match self.target {
            Target::Quad(quad) => Ok(quad),
            Target::Node(_) => Err(EvalError::ExpectedQuads(operator)),
        }
    }
}

/// Materializing evaluator over a quad store
pub struct Evaluator<'a> {
    store: &'a dyn QuadStore,
}

impl<'a> Evaluator<'a> {
    pub fn new(store: &'a dyn QuadStore) -> Self {
        Self { store }
    }

    /// Evaluate a tree and return every result row
    pub fn evaluate(&self, iterator: &GraphIterator) -> Result<Vec<ResultRow>, EvalError> {
        self.eval(iterator)?
            .into_iter()
            .map(|row| {
                Ok(ResultRow {
                    value: row.node("result")?,
                    tags: row.tags,
                })
            })
            .collect()
    }

    /// Distinct result values
    pub fn values(&self, iterator: &GraphIterator) -> Result<BTreeSet<ValueId>, EvalError> {
        Ok(self
            .evaluate(iterator)?
            .into_iter()
            .map(|row| row.value)
            .collect())
    }

    /// Distinct result names
    pub fn names(&self, iterator: &GraphIterator) -> Result<BTreeSet<String>, EvalError> {
        self.values(iterator)?
            .into_iter()
            .map(|id| {
                self.store
                    .name_of(id)
                    .map(str::to_string)
                    .ok_or(EvalError::UnknownValue(id))
            })
            .collect()
    }

    fn eval(&self, iterator: &GraphIterator) -> Result<Vec<Row>, EvalError> {
        let mut rows = match iterator.kind() {
            IteratorKind::Null => Vec::new(),
            IteratorKind::All => self
                .store
                .node_ids()
                .into_iter()
                .map(|value| Row {
                    target: Target::Node(value),
                    tags: Tags::new(),
                })
                .collect(),
            IteratorKind::Fixed(values) => values
                .iter()
                .map(|value| Row {
                    target: Target::Node(*value),
                    tags: Tags::new(),
                })
                .collect(),
            IteratorKind::LinksTo { primary, direction } => {
                self.execute_links_to(primary, *direction)?
            }
            IteratorKind::HasA { primary, direction } => self.execute_has_a(primary, *direction)?,
            IteratorKind::And(subs) => self.execute_and(subs)?,
            IteratorKind::Or(subs) => {
                let mut rows = Vec::new();
                for sub in subs {
                    rows.extend(self.eval(sub)?);
                }
                rows
            }
            IteratorKind::Not { primary, universe } => {
                let excluded: HashSet<Target> =
                    self.eval(primary)?.into_iter().map(|row| row.target).collect();
                self.eval(universe)?
                    .into_iter()
                    .filter(|row| !excluded.contains(&row.target))
                    .collect()
            }
            IteratorKind::Unique(primary) => {
                let mut seen = HashSet::new();
                self.eval(primary)?
                    .into_iter()
                    .filter(|row| seen.insert(row.target))
                    .collect()
            }
            IteratorKind::Comparison {
                primary,
                operator,
                operand,
            } => {
                let input = self.eval(primary)?;
                let mut rows = Vec::with_capacity(input.len());
                for row in input {
                    let candidate = match row.target {
                        Target::Node(value) => Some(value),
                        Target::Quad(quad) => {
                            let direction =
                                linked_direction(primary).ok_or(EvalError::UnscopedComparison)?;
                            self.store.quad_direction(quad, direction)
                        }
                    };
                    let Some(candidate) = candidate else {
                        continue;
                    };
                    let name = self
                        .store
                        .name_of(candidate)
                        .ok_or(EvalError::UnknownValue(candidate))?;
                    if operator.evaluate(name, operand) {
                        rows.push(row);
                    }
                }
                rows
            }
        };

        if !iterator.tagger().is_empty() {
            for row in rows.iter_mut() {
                let value = row.node("tagger")?;
                for tag in iterator.tagger().tags() {
                    row.tags.insert(tag.clone(), value);
                }
            }
        }

        trace!("{} yielded {} rows", iterator.kind().name(), rows.len());
        Ok(rows)
    }

    fn execute_links_to(
        &self,
        primary: &GraphIterator,
        direction: Direction,
    ) -> Result<Vec<Row>, EvalError> {
        let mut rows = Vec::new();
        for row in self.eval(primary)? {
            let value = row.node("links_to")?;
            for quad in self.store.quads_with(direction, value) {
                rows.push(Row {
                    target: Target::Quad(quad),
                    tags: row.tags.clone(),
                });
            }
        }
        Ok(rows)
    }

    fn execute_has_a(
        &self,
        primary: &GraphIterator,
        direction: Direction,
    ) -> Result<Vec<Row>, EvalError> {
        let mut rows = Vec::new();
        for row in self.eval(primary)? {
            let quad = row.quad("hasa")?;
            // Unlabelled quads have nothing in the label slot
            if let Some(value) = self.store.quad_direction(quad, direction) {
                rows.push(Row {
                    target: Target::Node(value),
                    tags: row.tags,
                });
            }
        }
        Ok(rows)
    }

    /// Intersection as a join on the yielded value: every pair of rows that
    /// agree on the value produces one row carrying both sides' tags.
    fn execute_and(&self, subs: &[GraphIterator]) -> Result<Vec<Row>, EvalError> {
        let Some((first, rest)) = subs.split_first() else {
            return Ok(Vec::new());
        };

        let mut acc = self.eval(first)?;
        for sub in rest {
            if acc.is_empty() {
                break;
            }
            let mut by_target: HashMap<Target, Vec<Row>> = HashMap::new();
            for row in self.eval(sub)? {
                by_target.entry(row.target).or_default().push(row);
            }

            let mut joined = Vec::new();
            for left in acc {
                if let Some(matches) = by_target.get(&left.target) {
                    for right in matches {
                        let mut tags = right.tags.clone();
                        tags.extend(left.tags.iter().map(|(k, v)| (k.clone(), *v)));
                        joined.push(Row {
                            target: left.target,
                            tags,
                        });
                    }
                }
            }
            acc = joined;
        }
        Ok(acc)
    }
}

/// Slot a quad-valued tree links on, used to pick the compared value
fn linked_direction(iterator: &GraphIterator) -> Option<Direction> {
    match iterator.kind() {
        IteratorKind::LinksTo { direction, .. } => Some(*direction),
        IteratorKind::And(subs) | IteratorKind::Or(subs) => {
            subs.first().and_then(linked_direction)
        }
        IteratorKind::Unique(primary) | IteratorKind::Comparison { primary, .. } => {
            linked_direction(primary)
        }
        _ => None,
    }
}
