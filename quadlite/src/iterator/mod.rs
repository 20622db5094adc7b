// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph iterator algebra
//!
//! The compiler lowers query chains into a tree of these primitive
//! iterators. A tree is plain owned data: building it performs no I/O and
//! holds no iteration state, so an external engine (or the reference
//! evaluator in [`eval`]) can walk it as often as it likes.
//!
//! Node-valued iterators: `Null`, `All`, `Fixed`, `HasA`.
//! Quad-valued iterators: `LinksTo`.
//! `And`, `Or`, `Not`, `Unique` and `Comparison` take the value kind of
//! their children.

pub mod eval;

pub use eval::{Evaluator, EvalError, ResultRow};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::graph::{QuadStore, ValueId};
use crate::quad::Direction;

/// Names under which an iterator reports the value it yields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tagger {
    tags: Vec<String>,
}

impl Tagger {
    /// Add a tag name. Adding the same name twice has no effect.
    pub fn add(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Comparison operators, numbered as the query language passes them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    /// Inclusive range, operand is a two element list `[low, high]`
    Between,
    /// Membership in the operand list
    In,
}

impl Operator {
    /// Map the numeric operator id used by `has(predicate, operator, value)`
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            0 => Some(Operator::LessThan),
            1 => Some(Operator::LessThanOrEqual),
            2 => Some(Operator::GreaterThan),
            3 => Some(Operator::GreaterThanOrEqual),
            4 => Some(Operator::Between),
            5 => Some(Operator::In),
            _ => None,
        }
    }

    pub fn id(self) -> i64 {
        match self {
            Operator::LessThan => 0,
            Operator::LessThanOrEqual => 1,
            Operator::GreaterThan => 2,
            Operator::GreaterThanOrEqual => 3,
            Operator::Between => 4,
            Operator::In => 5,
        }
    }

    /// Whether the operator compares against a list operand
    pub fn is_multi_value(self) -> bool {
        matches!(self, Operator::Between | Operator::In)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::Between => "between",
            Operator::In => "in",
        }
    }

    /// Test a candidate value name against `operand`.
    ///
    /// Integer operands compare numerically and reject candidates that do not
    /// parse as integers. String operands compare lexicographically.
    pub fn evaluate(self, candidate: &str, operand: &ComparisonValue) -> bool {
        match operand {
            ComparisonValue::Int(value) => match candidate.trim().parse::<i64>() {
                Ok(number) => self.compare_scalar(number.cmp(value)),
                Err(_) => false,
            },
            ComparisonValue::String(value) => self.compare_scalar(candidate.cmp(value.as_str())),
            ComparisonValue::IntList(values) => match candidate.trim().parse::<i64>() {
                Ok(number) => self.compare_list(&number, values),
                Err(_) => false,
            },
            ComparisonValue::StringList(values) => {
                let candidate = candidate.to_string();
                self.compare_list(&candidate, values)
            }
        }
    }

    fn compare_scalar(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering;

        match self {
            Operator::LessThan => ordering == Ordering::Less,
            Operator::LessThanOrEqual => ordering != Ordering::Greater,
            Operator::GreaterThan => ordering == Ordering::Greater,
            Operator::GreaterThanOrEqual => ordering != Ordering::Less,
            Operator::Between | Operator::In => false,
        }
    }

    fn compare_list<T: Ord>(self, candidate: &T, values: &[T]) -> bool {
        match self {
            Operator::Between => match values {
                [low, high] => low <= candidate && candidate <= high,
                _ => false,
            },
            Operator::In => values.contains(candidate),
            _ => false,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Operand of a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComparisonValue {
    Int(i64),
    String(String),
    IntList(Vec<i64>),
    StringList(Vec<String>),
}

impl ComparisonValue {
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            ComparisonValue::IntList(_) | ComparisonValue::StringList(_)
        )
    }

    fn list_len(&self) -> usize {
        match self {
            ComparisonValue::IntList(values) => values.len(),
            ComparisonValue::StringList(values) => values.len(),
            _ => 1,
        }
    }

    /// Whether this operand has the shape `operator` expects
    pub fn fits(&self, operator: Operator) -> bool {
        match operator {
            Operator::Between => self.is_list() && self.list_len() == 2,
            Operator::In => self.is_list() && self.list_len() > 0,
            _ => !self.is_list(),
        }
    }
}

impl fmt::Display for ComparisonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonValue::Int(v) => write!(f, "{}", v),
            ComparisonValue::String(v) => write!(f, "{:?}", v),
            ComparisonValue::IntList(v) => write!(f, "{:?}", v),
            ComparisonValue::StringList(v) => write!(f, "{:?}", v),
        }
    }
}

/// Mutable fixed-set iterator, filled value by value before use
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fixed {
    values: Vec<ValueId>,
}

impl Fixed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value; duplicates are kept once
    pub fn add(&mut self, value: ValueId) {
        if !self.values.contains(&value) {
            self.values.push(value);
        }
    }

    pub fn values(&self) -> &[ValueId] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Fixed> for GraphIterator {
    fn from(fixed: Fixed) -> Self {
        GraphIterator::new(IteratorKind::Fixed(fixed.values))
    }
}

/// Primitive iterator node kinds
#[derive(Debug, Clone, PartialEq)]
pub enum IteratorKind {
    /// Canonical empty iterator
    Null,
    /// Every node known to the store
    All,
    /// A fixed list of node values
    Fixed(Vec<ValueId>),
    /// Quads whose `direction` slot holds a value yielded by `primary`
    LinksTo {
        primary: Box<GraphIterator>,
        direction: Direction,
    },
    /// The `direction` slot of every quad yielded by `primary`
    HasA {
        primary: Box<GraphIterator>,
        direction: Direction,
    },
    /// Intersection
    And(Vec<GraphIterator>),
    /// Union
    Or(Vec<GraphIterator>),
    /// Everything in `universe` that `primary` does not yield
    Not {
        primary: Box<GraphIterator>,
        universe: Box<GraphIterator>,
    },
    /// `primary` with repeated values removed
    Unique(Box<GraphIterator>),
    /// `primary` filtered by `operator operand`
    Comparison {
        primary: Box<GraphIterator>,
        operator: Operator,
        operand: ComparisonValue,
    },
}

impl IteratorKind {
    pub fn name(&self) -> &'static str {
        match self {
            IteratorKind::Null => "null",
            IteratorKind::All => "all",
            IteratorKind::Fixed(_) => "fixed",
            IteratorKind::LinksTo { .. } => "links_to",
            IteratorKind::HasA { .. } => "hasa",
            IteratorKind::And(_) => "and",
            IteratorKind::Or(_) => "or",
            IteratorKind::Not { .. } => "not",
            IteratorKind::Unique(_) => "unique",
            IteratorKind::Comparison { .. } => "comparison",
        }
    }
}

/// A node of a compiled iterator tree together with its tagger
#[derive(Debug, Clone, PartialEq)]
pub struct GraphIterator {
    kind: IteratorKind,
    tagger: Tagger,
}

impl GraphIterator {
    pub fn new(kind: IteratorKind) -> Self {
        Self {
            kind,
            tagger: Tagger::default(),
        }
    }

    /// The canonical empty iterator
    pub fn null() -> Self {
        Self::new(IteratorKind::Null)
    }

    pub fn all() -> Self {
        Self::new(IteratorKind::All)
    }

    pub fn links_to(primary: GraphIterator, direction: Direction) -> Self {
        Self::new(IteratorKind::LinksTo {
            primary: Box::new(primary),
            direction,
        })
    }

    pub fn has_a(primary: GraphIterator, direction: Direction) -> Self {
        Self::new(IteratorKind::HasA {
            primary: Box::new(primary),
            direction,
        })
    }

    pub fn and(subs: Vec<GraphIterator>) -> Self {
        Self::new(IteratorKind::And(subs))
    }

    pub fn or(subs: Vec<GraphIterator>) -> Self {
        Self::new(IteratorKind::Or(subs))
    }

    pub fn not(primary: GraphIterator, universe: GraphIterator) -> Self {
        Self::new(IteratorKind::Not {
            primary: Box::new(primary),
            universe: Box::new(universe),
        })
    }

    pub fn unique(primary: GraphIterator) -> Self {
        Self::new(IteratorKind::Unique(Box::new(primary)))
    }

    pub fn comparison(primary: GraphIterator, operator: Operator, operand: ComparisonValue) -> Self {
        Self::new(IteratorKind::Comparison {
            primary: Box::new(primary),
            operator,
            operand,
        })
    }

    pub fn kind(&self) -> &IteratorKind {
        &self.kind
    }

    pub fn tagger(&self) -> &Tagger {
        &self.tagger
    }

    pub fn tagger_mut(&mut self) -> &mut Tagger {
        &mut self.tagger
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind, IteratorKind::Null)
    }

    /// An independent handle over the same configuration.
    ///
    /// The tree carries no cursor, so the two handles can be walked
    /// separately without coordinating.
    pub fn duplicate(&self) -> GraphIterator {
        self.clone()
    }

    /// Direct children, in evaluation order
    pub fn children(&self) -> Vec<&GraphIterator> {
        match &self.kind {
            IteratorKind::Null | IteratorKind::All | IteratorKind::Fixed(_) => Vec::new(),
            IteratorKind::LinksTo { primary, .. }
            | IteratorKind::HasA { primary, .. }
            | IteratorKind::Comparison { primary, .. } => vec![primary.as_ref()],
            IteratorKind::Unique(primary) => vec![primary.as_ref()],
            IteratorKind::And(subs) | IteratorKind::Or(subs) => subs.iter().collect(),
            IteratorKind::Not { primary, universe } => vec![primary.as_ref(), universe.as_ref()],
        }
    }

    /// Store-resolved, serializable description of the tree
    pub fn describe(&self, store: &dyn QuadStore) -> Description {
        self.describe_with(Some(store))
    }

    fn describe_with(&self, store: Option<&dyn QuadStore>) -> Description {
        let mut description = Description {
            kind: self.kind.name().to_string(),
            direction: None,
            values: Vec::new(),
            tags: self.tagger.tags().to_vec(),
            operator: None,
            operand: None,
            children: self
                .children()
                .into_iter()
                .map(|child| child.describe_with(store))
                .collect(),
        };

        match &self.kind {
            IteratorKind::Fixed(values) => {
                description.values = values
                    .iter()
                    .map(|id| match store.and_then(|s| s.name_of(*id)) {
                        Some(name) => name.to_string(),
                        None => id.to_string(),
                    })
                    .collect();
            }
            IteratorKind::LinksTo { direction, .. } | IteratorKind::HasA { direction, .. } => {
                description.direction = Some(*direction);
            }
            IteratorKind::Comparison {
                operator, operand, ..
            } => {
                description.operator = Some(operator.symbol().to_string());
                description.operand = Some(operand.clone());
            }
            _ => {}
        }

        description
    }
}

impl fmt::Display for GraphIterator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe_with(None))
    }
}

/// Explain output for one iterator node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Description {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operand: Option<ComparisonValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Description>,
}

impl Description {
    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}{}", "", self.kind, indent = depth * 2)?;
        if let Some(direction) = self.direction {
            write!(f, " {}", direction)?;
        }
        if !self.values.is_empty() {
            write!(f, " [{}]", self.values.join(", "))?;
        }
        if let (Some(operator), Some(operand)) = (&self.operator, &self.operand) {
            write!(f, " {} {}", operator, operand)?;
        }
        if !self.tags.is_empty() {
            write!(f, " tags={}", self.tags.join(","))?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
