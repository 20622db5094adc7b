// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Step compiler - lowers a query chain into an iterator tree
//!
//! Compilation recurses from the tip to the chain root, builds the root's
//! iterator and then wraps it step by step on the way back up. Each step only
//! ever sees the finished iterator for everything before it.
//!
//! Mistakes in the query lower to the canonical empty iterator for the step
//! where they occur (logged at warn level). Only arena defects and the
//! depth limit surface as [`CompileError`].

use log::{debug, warn};

use super::chain::{ArgValue, Chain, StepId, StepKind, StepType};
use super::error::CompileError;
use super::value::{self, fixed_of, Coerced};
use crate::config::CompilerConfig;
use crate::graph::QuadStore;
use crate::iterator::GraphIterator;
use crate::quad::Direction;

/// Compile the chain ending at `tip` against `store` with default settings
pub fn build_iterator_tree(
    chain: &Chain,
    tip: StepId,
    store: &dyn QuadStore,
) -> Result<GraphIterator, CompileError> {
    Compiler::new(store).compile(chain, tip)
}

/// Query chain compiler bound to one store
pub struct Compiler<'s> {
    store: &'s dyn QuadStore,
    config: CompilerConfig,
}

impl<'s> Compiler<'s> {
    pub fn new(store: &'s dyn QuadStore) -> Self {
        Self::with_config(store, CompilerConfig::default())
    }

    pub fn with_config(store: &'s dyn QuadStore, config: CompilerConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile the chain ending at `tip`.
    ///
    /// A chain that does not bottom out at a `vertex` step compiles to the
    /// canonical empty iterator.
    pub fn compile(&self, chain: &Chain, tip: StepId) -> Result<GraphIterator, CompileError> {
        let mut compilation = Compilation {
            chain,
            store: self.store,
            max_depth: self.config.max_depth,
            depth: 0,
        };
        let tree = compilation.build_iterator_tree(tip)?;
        debug!("Compiled chain at step {} into a {} tree", tip, tree.kind().name());
        Ok(tree)
    }
}

/// State of one compile call
pub(super) struct Compilation<'c> {
    pub(super) chain: &'c Chain,
    pub(super) store: &'c dyn QuadStore,
    max_depth: usize,
    depth: usize,
}

impl<'c> Compilation<'c> {
    /// Compile a standalone chain in isolation
    fn build_iterator_tree(&mut self, tip: StepId) -> Result<GraphIterator, CompileError> {
        if self.chain.get(tip).is_none() {
            return Err(CompileError::UnknownStep(tip));
        }
        if !self.chain.is_vertex_chain(tip) {
            warn!("Chain at step {} is not rooted at a vertex step", tip);
            return Ok(GraphIterator::null());
        }
        self.build(tip, GraphIterator::null())
    }

    /// Iterator for a value argument
    pub(super) fn iterator_from_value(
        &mut self,
        value: &ArgValue,
    ) -> Result<GraphIterator, CompileError> {
        match value::coerce(value) {
            Some(Coerced::Absent) => Ok(self.store.nodes_all_iterator()),
            Some(Coerced::Scalar(name)) => Ok(fixed_of(self.store, &[name])),
            Some(Coerced::List(names)) => Ok(fixed_of(self.store, &names)),
            Some(Coerced::Chain(tip)) => self.build_iterator_tree(tip),
            None => {
                warn!("Unsupported argument value {:?}", value);
                Ok(GraphIterator::null())
            }
        }
    }

    fn build(&mut self, id: StepId, base: GraphIterator) -> Result<GraphIterator, CompileError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(CompileError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        let result = self.build_step(id, base);
        self.depth -= 1;
        result
    }

    fn build_step(&mut self, id: StepId, base: GraphIterator) -> Result<GraphIterator, CompileError> {
        let chain = self.chain;
        let step = chain.get(id).ok_or(CompileError::UnknownStep(id))?;

        // A morphism hands the base through untouched
        let sub = match step.prev() {
            Some(prev) if step.step_type() != StepType::Morphism => self.build(prev, base)?,
            _ => base,
        };

        debug!("Lowering step {} ({})", id, step.step_type());

        let it = match &step.kind {
            StepKind::Vertex(names) => {
                if names.is_empty() {
                    self.store.nodes_all_iterator()
                } else {
                    fixed_of(self.store, names)
                }
            }
            StepKind::Morphism => sub,
            StepKind::Tag(tags) => {
                let mut it = sub;
                for tag in tags {
                    it.tagger_mut().add(tag.as_str());
                }
                it
            }
            StepKind::Save(args) => self.build_save(args, sub, false),
            StepKind::SaveR(args) => self.build_save(args, sub, true),
            StepKind::Is(names) => GraphIterator::and(vec![fixed_of(self.store, names), sub]),
            StepKind::Has(args) => self.build_has(args, sub),
            StepKind::Out(args) => self.build_in_out_iterator(args, sub, false)?,
            StepKind::In(args) => self.build_in_out_iterator(args, sub, true)?,
            StepKind::Both(args) => {
                let clone = sub.duplicate();
                let forward = self.build_in_out_iterator(args, sub, false)?;
                let reverse = self.build_in_out_iterator(args, clone, true)?;
                GraphIterator::or(vec![forward, reverse])
            }
            StepKind::OutPredicates => self.build_in_out_predicate_iterator(sub, false),
            StepKind::InPredicates => self.build_in_out_predicate_iterator(sub, true),
            StepKind::And(args) => match self.nested_vertex_chain(args, StepType::And)? {
                Some(tip) => GraphIterator::and(vec![sub, self.build_iterator_tree(tip)?]),
                None => GraphIterator::null(),
            },
            StepKind::Or(args) => match self.nested_vertex_chain(args, StepType::Or)? {
                Some(tip) => GraphIterator::or(vec![sub, self.build_iterator_tree(tip)?]),
                None => GraphIterator::null(),
            },
            StepKind::Except(args) => match self.nested_vertex_chain(args, StepType::Except)? {
                Some(tip) => {
                    let complement = self.build_iterator_tree(tip)?;
                    let not = GraphIterator::not(complement, self.store.nodes_all_iterator());
                    GraphIterator::and(vec![sub, not])
                }
                None => GraphIterator::null(),
            },
            StepKind::Back(back_chain) => {
                GraphIterator::and(vec![sub, self.build_iterator_tree(*back_chain)?])
            }
            StepKind::Follow(args) => match args.first().and_then(ArgValue::as_chain) {
                Some(morphism) => self.follow(morphism, sub, StepType::Follow)?,
                None => {
                    warn!("follow() expects a morphism argument");
                    GraphIterator::null()
                }
            },
            StepKind::FollowR(morphism) => self.follow(*morphism, sub, StepType::FollowR)?,
        };

        Ok(it)
    }

    /// `save`/`saver`: keep the values of `sub` that have a `predicate`
    /// edge and tag the node at its other end
    fn build_save(&self, args: &[String], sub: GraphIterator, reverse: bool) -> GraphIterator {
        let (predicate, tag) = match args {
            [predicate] => (predicate, predicate),
            [predicate, tag] => (predicate, tag),
            _ => {
                warn!("save() takes one or two arguments, got {}", args.len());
                return GraphIterator::null();
            }
        };

        let mut all = self.store.nodes_all_iterator();
        all.tagger_mut().add(tag.as_str());

        let (anchor, landing) = endpoints(reverse);
        let quads = GraphIterator::and(vec![
            GraphIterator::links_to(fixed_of(self.store, &[predicate]), Direction::Predicate),
            GraphIterator::links_to(all, landing),
        ]);
        GraphIterator::and(vec![GraphIterator::has_a(quads, anchor), sub])
    }

    /// `has(predicate, object)` and `has(predicate, operator, value)`
    fn build_has(&self, args: &[ArgValue], sub: GraphIterator) -> GraphIterator {
        let quads = match args {
            [predicate, object] => self.has_object(predicate, object),
            [predicate, operator, operand] => self.has_comparison(predicate, operator, operand),
            _ => {
                warn!("has() takes two or three arguments, got {}", args.len());
                return GraphIterator::null();
            }
        };

        match quads {
            Some(quads) => GraphIterator::and(vec![GraphIterator::has_a(quads, Direction::Subject), sub]),
            None => GraphIterator::null(),
        }
    }

    fn has_object(&self, predicate: &ArgValue, object: &ArgValue) -> Option<GraphIterator> {
        let (Some(predicates), Some(objects)) = (value::string_list(predicate), value::string_list(object))
        else {
            warn!("has() expects names, got {:?} and {:?}", predicate, object);
            return None;
        };

        Some(GraphIterator::and(vec![
            GraphIterator::links_to(fixed_of(self.store, &predicates), Direction::Predicate),
            GraphIterator::links_to(fixed_of(self.store, &objects), Direction::Object),
        ]))
    }

    fn has_comparison(
        &self,
        predicate: &ArgValue,
        operator: &ArgValue,
        operand: &ArgValue,
    ) -> Option<GraphIterator> {
        let Some(predicates) = value::string_list(predicate) else {
            warn!("has() expects predicate names, got {:?}", predicate);
            return None;
        };
        let Some(operator) = value::operator(operator) else {
            warn!("has() got an unknown comparison operator {:?}", operator);
            return None;
        };
        let Some(operand) = value::operand(operand, operator) else {
            warn!("has() operand {:?} does not fit operator {}", operand, operator);
            return None;
        };

        // Scoped to the predicate's quads by the enclosing intersection
        let objects = GraphIterator::links_to(self.store.nodes_all_iterator(), Direction::Object);
        Some(GraphIterator::and(vec![
            GraphIterator::links_to(fixed_of(self.store, &predicates), Direction::Predicate),
            GraphIterator::comparison(objects, operator, operand),
        ]))
    }

    /// Tip of the standalone chain an `and`/`or`/`except` step refers to
    fn nested_vertex_chain(
        &self,
        args: &[ArgValue],
        step: StepType,
    ) -> Result<Option<StepId>, CompileError> {
        let Some(tip) = args.first().and_then(ArgValue::as_chain) else {
            warn!("{}() expects a chain argument", step);
            return Ok(None);
        };
        if self.chain.get(tip).is_none() {
            return Err(CompileError::UnknownStep(tip));
        }
        if !self.chain.is_vertex_chain(tip) {
            warn!("{}() argument at step {} is not a vertex chain", step, tip);
            return Ok(None);
        }
        Ok(Some(tip))
    }

    /// Apply a morphism over `sub`
    fn follow(
        &mut self,
        morphism: StepId,
        sub: GraphIterator,
        step: StepType,
    ) -> Result<GraphIterator, CompileError> {
        if self.chain.get(morphism).is_none() {
            return Err(CompileError::UnknownStep(morphism));
        }
        if self.chain.is_vertex_chain(morphism) {
            warn!("{}() argument at step {} is a vertex chain, not a morphism", step, morphism);
            return Ok(GraphIterator::null());
        }
        self.build(morphism, sub)
    }
}

/// Slots an expansion anchors at and reads from: `(in, out)`.
///
/// Forward expansion anchors at the subject and reads the object; reverse
/// expansion swaps the two.
pub fn endpoints(reverse: bool) -> (Direction, Direction) {
    if reverse {
        (Direction::Object, Direction::Subject)
    } else {
        (Direction::Subject, Direction::Object)
    }
}
