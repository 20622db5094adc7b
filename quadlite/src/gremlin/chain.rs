// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query chain model
//!
//! A query is a singly linked list of traversal steps running from the tip
//! back to a root (`vertex` for a standalone query, `morphism` for a
//! reusable fragment). All steps of one query, including the steps of nested
//! chains passed to `and`/`or`/`except`/`follow`, live in one [`Chain`]
//! arena and refer to each other by [`StepId`].
//!
//! Every reference in a chain points to a step that precedes the referrer,
//! so walking `prev` or descending into nested chains always terminates.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;

use super::error::ChainError;

/// Index of a step inside its [`Chain`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(pub usize);

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Step type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepType {
    Vertex,
    Morphism,
    Tag,
    Save,
    SaveR,
    Is,
    Has,
    Out,
    In,
    Both,
    OutPredicates,
    InPredicates,
    And,
    Or,
    Except,
    Follow,
    FollowR,
    Back,
}

impl StepType {
    pub fn as_str(self) -> &'static str {
        match self {
            StepType::Vertex => "vertex",
            StepType::Morphism => "morphism",
            StepType::Tag => "tag",
            StepType::Save => "save",
            StepType::SaveR => "saver",
            StepType::Is => "is",
            StepType::Has => "has",
            StepType::Out => "out",
            StepType::In => "in",
            StepType::Both => "both",
            StepType::OutPredicates => "out_predicates",
            StepType::InPredicates => "in_predicates",
            StepType::And => "and",
            StepType::Or => "or",
            StepType::Except => "except",
            StepType::Follow => "follow",
            StepType::FollowR => "followr",
            StepType::Back => "back",
        }
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A step argument as the query front end hands it over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<ArgValue>),
    /// Reference to the tip of another chain in the same arena
    Chain { chain: StepId },
}

impl ArgValue {
    pub fn chain(tip: StepId) -> Self {
        ArgValue::Chain { chain: tip }
    }

    /// Chain tip referenced by this value, if it is a chain
    pub fn as_chain(&self) -> Option<StepId> {
        match self {
            ArgValue::Chain { chain } => Some(*chain),
            _ => None,
        }
    }

    /// Every chain reference reachable inside this value
    fn chain_refs(&self, out: &mut Vec<StepId>) {
        match self {
            ArgValue::Chain { chain } => out.push(*chain),
            ArgValue::Array(values) => values.iter().for_each(|v| v.chain_refs(out)),
            _ => {}
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::String(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::String(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Int(value)
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        ArgValue::Float(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

impl<T: Into<ArgValue>> From<Vec<T>> for ArgValue {
    fn from(values: Vec<T>) -> Self {
        ArgValue::Array(values.into_iter().map(Into::into).collect())
    }
}

impl From<StepId> for ArgValue {
    fn from(tip: StepId) -> Self {
        ArgValue::chain(tip)
    }
}

/// Empty argument list for value-argument steps
pub const NO_ARGS: [ArgValue; 0] = [];

/// Step kinds with their typed payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "args", rename_all = "snake_case")]
pub enum StepKind {
    Vertex(Vec<String>),
    Morphism,
    Tag(Vec<String>),
    Save(Vec<String>),
    #[serde(rename = "saver")]
    SaveR(Vec<String>),
    Is(Vec<String>),
    Has(Vec<ArgValue>),
    Out(Vec<ArgValue>),
    In(Vec<ArgValue>),
    Both(Vec<ArgValue>),
    OutPredicates,
    InPredicates,
    And(Vec<ArgValue>),
    Or(Vec<ArgValue>),
    Except(Vec<ArgValue>),
    Follow(Vec<ArgValue>),
    /// Carries the reversed morphism chain
    #[serde(rename = "followr")]
    FollowR(StepId),
    /// Carries the chain re-spliced at this point
    Back(StepId),
}

/// One node of a chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub kind: StepKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<StepId>,
}

impl Step {
    pub fn new(kind: StepKind, prev: Option<StepId>) -> Self {
        Self { kind, prev }
    }

    pub fn step_type(&self) -> StepType {
        match &self.kind {
            StepKind::Vertex(_) => StepType::Vertex,
            StepKind::Morphism => StepType::Morphism,
            StepKind::Tag(_) => StepType::Tag,
            StepKind::Save(_) => StepType::Save,
            StepKind::SaveR(_) => StepType::SaveR,
            StepKind::Is(_) => StepType::Is,
            StepKind::Has(_) => StepType::Has,
            StepKind::Out(_) => StepType::Out,
            StepKind::In(_) => StepType::In,
            StepKind::Both(_) => StepType::Both,
            StepKind::OutPredicates => StepType::OutPredicates,
            StepKind::InPredicates => StepType::InPredicates,
            StepKind::And(_) => StepType::And,
            StepKind::Or(_) => StepType::Or,
            StepKind::Except(_) => StepType::Except,
            StepKind::Follow(_) => StepType::Follow,
            StepKind::FollowR(_) => StepType::FollowR,
            StepKind::Back(_) => StepType::Back,
        }
    }

    /// Ordered string arguments; empty for steps that take values
    pub fn string_args(&self) -> &[String] {
        match &self.kind {
            StepKind::Vertex(args)
            | StepKind::Tag(args)
            | StepKind::Save(args)
            | StepKind::SaveR(args)
            | StepKind::Is(args) => args,
            _ => &[],
        }
    }

    /// Ordered value arguments; empty for steps that take strings
    pub fn value_args(&self) -> &[ArgValue] {
        match &self.kind {
            StepKind::Has(args)
            | StepKind::Out(args)
            | StepKind::In(args)
            | StepKind::Both(args)
            | StepKind::And(args)
            | StepKind::Or(args)
            | StepKind::Except(args)
            | StepKind::Follow(args) => args,
            _ => &[],
        }
    }

    pub fn prev(&self) -> Option<StepId> {
        self.prev
    }

    pub fn back_chain(&self) -> Option<StepId> {
        match self.kind {
            StepKind::Back(chain) => Some(chain),
            _ => None,
        }
    }

    pub fn followr_chain(&self) -> Option<StepId> {
        match self.kind {
            StepKind::FollowR(chain) => Some(chain),
            _ => None,
        }
    }

    /// Every step this one refers to, `prev` included
    fn references(&self) -> Vec<StepId> {
        let mut refs: Vec<StepId> = self.prev.into_iter().collect();
        refs.extend(self.back_chain());
        refs.extend(self.followr_chain());
        for value in self.value_args() {
            value.chain_refs(&mut refs);
        }
        refs
    }
}

/// Serialized form of a chain plus the tip to compile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainDocument {
    pub steps: Vec<Step>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<StepId>,
}

/// Immutable arena of steps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chain {
    steps: Vec<Step>,
}

impl Chain {
    /// Validate and wrap a list of steps
    pub fn from_steps(steps: Vec<Step>) -> Result<Self, ChainError> {
        for (index, step) in steps.iter().enumerate() {
            let id = StepId(index);
            for target in step.references() {
                if target.0 >= steps.len() {
                    return Err(ChainError::UnknownStep { step: id, target });
                }
                if target.0 >= index {
                    return Err(ChainError::ForwardReference { step: id, target });
                }
            }
        }
        Ok(Self { steps })
    }

    /// Parse a [`ChainDocument`]; the tip defaults to the last step
    pub fn from_json(json: &str) -> Result<(Chain, StepId), ChainError> {
        let document: ChainDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<(Chain, StepId), ChainError> {
        let document: ChainDocument = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    fn from_document(document: ChainDocument) -> Result<(Chain, StepId), ChainError> {
        if document.steps.is_empty() {
            return Err(ChainError::Empty);
        }
        let tip = document.tip.unwrap_or(StepId(document.steps.len() - 1));
        let chain = Self::from_steps(document.steps)?;
        if chain.get(tip).is_none() {
            return Err(ChainError::UnknownStep { step: tip, target: tip });
        }
        Ok((chain, tip))
    }

    pub fn to_json(&self, tip: StepId) -> Result<String, ChainError> {
        let document = ChainDocument {
            steps: self.steps.clone(),
            tip: Some(tip),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    pub fn get(&self, id: StepId) -> Option<&Step> {
        self.steps.get(id.0)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps from `tip` back to its root, tip first.
    ///
    /// Never yields more than `len()` steps, so a `prev` cycle in a
    /// hand-assembled arena cannot make it spin.
    pub fn walk(&self, tip: StepId) -> impl Iterator<Item = (StepId, &Step)> + '_ {
        let mut next = Some(tip);
        std::iter::from_fn(move || {
            let id = next?;
            let step = self.get(id)?;
            next = step.prev;
            Some((id, step))
        })
        .take(self.steps.len())
    }

    /// Whether the chain ending at `tip` bottoms out at a `vertex` step
    /// (a standalone query rather than a morphism)
    pub fn is_vertex_chain(&self, tip: StepId) -> bool {
        self.walk(tip)
            .any(|(_, step)| step.step_type() == StepType::Vertex)
    }
}

/// Fluent chain authoring
///
/// ```ignore
/// let mut builder = ChainBuilder::new();
/// let bob = builder.vertex(&["bob"]).id();
/// let tip = builder.vertex(&["alice"]).out(["knows"]).and(bob).id();
/// let chain = builder.build();
/// ```
#[derive(Debug, Default)]
pub struct ChainBuilder {
    steps: Vec<Step>,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a standalone query; no names means every node
    pub fn vertex(&mut self, names: &[&str]) -> Path<'_> {
        let tip = self.push(StepKind::Vertex(strings(names)), None);
        Path { builder: self, tip }
    }

    /// Start a reusable fragment
    pub fn morphism(&mut self) -> Path<'_> {
        let tip = self.push(StepKind::Morphism, None);
        Path { builder: self, tip }
    }

    /// Continue an existing chain from `tip`; `None` if no such step has
    /// been built yet
    pub fn at(&mut self, tip: StepId) -> Option<Path<'_>> {
        if self.step(tip).is_none() {
            warn!("at(): step {} does not exist", tip);
            return None;
        }
        Some(Path { builder: self, tip })
    }

    pub fn build(self) -> Chain {
        Chain { steps: self.steps }
    }

    fn push(&mut self, kind: StepKind, prev: Option<StepId>) -> StepId {
        self.steps.push(Step::new(kind, prev));
        StepId(self.steps.len() - 1)
    }

    fn step(&self, id: StepId) -> Option<&Step> {
        self.steps.get(id.0)
    }

    /// Reverse-traversal counterpart of a step, appended after `prev`.
    /// An unknown step appends nothing.
    fn push_reversed(&mut self, id: StepId, prev: StepId) -> StepId {
        let Some(step) = self.step(id) else {
            warn!("Cannot reverse unknown step {}", id);
            return prev;
        };
        let kind = match step.kind.clone() {
            StepKind::Out(args) => StepKind::In(args),
            StepKind::In(args) => StepKind::Out(args),
            StepKind::Follow(args) => match args.first().and_then(ArgValue::as_chain) {
                Some(morphism) => StepKind::FollowR(self.reverse_morphism(morphism)),
                None => StepKind::Follow(args),
            },
            StepKind::FollowR(reversed) => {
                StepKind::Follow(vec![ArgValue::chain(self.reverse_morphism(reversed))])
            }
            other => other,
        };
        self.push(kind, Some(prev))
    }

    /// Build the reversed copy of a morphism and return its tip
    fn reverse_morphism(&mut self, tip: StepId) -> StepId {
        let forward: Vec<StepId> = self.walk_ids(tip);
        let mut reversed = self.push(StepKind::Morphism, None);
        for id in forward {
            let root = self
                .step(id)
                .map_or(true, |step| matches!(step.kind, StepKind::Morphism | StepKind::Vertex(_)));
            if root {
                continue;
            }
            reversed = self.push_reversed(id, reversed);
        }
        reversed
    }

    fn walk_ids(&self, tip: StepId) -> Vec<StepId> {
        let mut ids = Vec::new();
        let mut next = Some(tip);
        while let Some(id) = next {
            let Some(step) = self.step(id) else { break };
            if ids.len() == self.steps.len() {
                break;
            }
            ids.push(id);
            next = step.prev;
        }
        ids
    }
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn values<I>(args: I) -> Vec<ArgValue>
where
    I: IntoIterator,
    I::Item: Into<ArgValue>,
{
    args.into_iter().map(Into::into).collect()
}

/// Cursor at the tip of a chain under construction
pub struct Path<'b> {
    builder: &'b mut ChainBuilder,
    tip: StepId,
}

impl<'b> Path<'b> {
    /// Tip of the chain built so far
    pub fn id(&self) -> StepId {
        self.tip
    }

    /// Append an arbitrary step
    pub fn step(self, kind: StepKind) -> Self {
        let tip = self.builder.push(kind, Some(self.tip));
        Path {
            builder: self.builder,
            tip,
        }
    }

    pub fn tag(self, names: &[&str]) -> Self {
        self.step(StepKind::Tag(strings(names)))
    }

    pub fn save(self, args: &[&str]) -> Self {
        self.step(StepKind::Save(strings(args)))
    }

    pub fn save_r(self, args: &[&str]) -> Self {
        self.step(StepKind::SaveR(strings(args)))
    }

    pub fn is(self, names: &[&str]) -> Self {
        self.step(StepKind::Is(strings(names)))
    }

    pub fn has<I>(self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ArgValue>,
    {
        self.step(StepKind::Has(values(args)))
    }

    pub fn out<I>(self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ArgValue>,
    {
        self.step(StepKind::Out(values(args)))
    }

    pub fn in_<I>(self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ArgValue>,
    {
        self.step(StepKind::In(values(args)))
    }

    pub fn both<I>(self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ArgValue>,
    {
        self.step(StepKind::Both(values(args)))
    }

    pub fn out_predicates(self) -> Self {
        self.step(StepKind::OutPredicates)
    }

    pub fn in_predicates(self) -> Self {
        self.step(StepKind::InPredicates)
    }

    pub fn and(self, other: StepId) -> Self {
        self.step(StepKind::And(vec![ArgValue::chain(other)]))
    }

    pub fn or(self, other: StepId) -> Self {
        self.step(StepKind::Or(vec![ArgValue::chain(other)]))
    }

    pub fn except(self, other: StepId) -> Self {
        self.step(StepKind::Except(vec![ArgValue::chain(other)]))
    }

    pub fn follow(self, morphism: StepId) -> Self {
        self.step(StepKind::Follow(vec![ArgValue::chain(morphism)]))
    }

    /// Apply a morphism backwards: its steps in reverse order with
    /// `out`/`in` swapped
    pub fn follow_r(self, morphism: StepId) -> Self {
        if self.builder.step(morphism).is_none() {
            // Left as is so compiling reports the unknown step
            warn!("follow_r(): step {} does not exist", morphism);
            return self.step(StepKind::FollowR(morphism));
        }
        let reversed = self.builder.reverse_morphism(morphism);
        self.step(StepKind::FollowR(reversed))
    }

    /// Return to the most recent step tagged `tag`, keeping only the
    /// values there that still reach the current position.
    ///
    /// The re-spliced chain starts at the current tip and walks every step
    /// taken since the tag in reverse. An unknown tag re-splices a bare
    /// morphism, which compiles to nothing.
    pub fn back(self, tag: &str) -> Self {
        let Path { builder, tip } = self;

        let path = builder.walk_ids(tip);
        let tagged = path.iter().position(|id| {
            builder.step(*id).is_some_and(|step| {
                step.step_type() == StepType::Tag && step.string_args().iter().any(|t| t == tag)
            })
        });

        let Some(position) = tagged else {
            warn!("back(): no step tagged '{}' before step {}", tag, tip);
            let morphism = builder.push(StepKind::Morphism, None);
            let back = builder.push(StepKind::Back(morphism), Some(tip));
            return Path { builder, tip: back };
        };

        let mut back_tip = tip;
        for id in &path[..position] {
            back_tip = builder.push_reversed(*id, back_tip);
        }
        let back = builder.push(StepKind::Back(back_tip), Some(path[position]));
        Path { builder, tip: back }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let mut builder = ChainBuilder::new();
        let tip = builder
            .vertex(&["alice"])
            .out(["knows", "edge"])
            .tag(&["friend"])
            .id();
        let chain = builder.build();

        let tag = chain.get(tip).unwrap();
        assert_eq!(tag.step_type(), StepType::Tag);
        assert_eq!(tag.string_args(), &["friend".to_string()]);
        assert!(tag.value_args().is_empty());

        let out = chain.get(tag.prev().unwrap()).unwrap();
        assert_eq!(out.step_type(), StepType::Out);
        assert_eq!(
            out.value_args(),
            &[ArgValue::from("knows"), ArgValue::from("edge")]
        );
        assert!(out.string_args().is_empty());

        let root = chain.get(out.prev().unwrap()).unwrap();
        assert_eq!(root.step_type(), StepType::Vertex);
        assert_eq!(root.prev(), None);
        assert_eq!(chain.walk(tip).count(), 3);
    }

    #[test]
    fn test_vertex_chain_detection() {
        let mut builder = ChainBuilder::new();
        let query = builder.vertex(&[]).out(["p"]).id();
        let fragment = builder.morphism().out(["p"]).id();
        let chain = builder.build();

        assert!(chain.is_vertex_chain(query));
        assert!(!chain.is_vertex_chain(fragment));
    }

    #[test]
    fn test_from_steps_rejects_forward_references() {
        let steps = vec![
            Step::new(StepKind::Vertex(vec![]), None),
            Step::new(StepKind::Out(vec![]), Some(StepId(2))),
            Step::new(StepKind::Out(vec![]), Some(StepId(1))),
        ];
        assert!(matches!(
            Chain::from_steps(steps),
            Err(ChainError::ForwardReference { .. })
        ));

        let dangling = vec![
            Step::new(StepKind::Vertex(vec![]), None),
            Step::new(StepKind::And(vec![ArgValue::chain(StepId(7))]), Some(StepId(0))),
        ];
        assert!(matches!(
            Chain::from_steps(dangling),
            Err(ChainError::UnknownStep { .. })
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let mut builder = ChainBuilder::new();
        let bob = builder.vertex(&["bob"]).id();
        let tip = builder
            .vertex(&["alice"])
            .has([ArgValue::from("age"), ArgValue::Int(2), ArgValue::Int(20)])
            .or(bob)
            .id();
        let chain = builder.build();

        let json = chain.to_json(tip).unwrap();
        let (parsed, parsed_tip) = Chain::from_json(&json).unwrap();
        assert_eq!(parsed, chain);
        assert_eq!(parsed_tip, tip);
    }

    #[test]
    fn test_json_format() {
        let json = r#"{
            "steps": [
                {"kind": {"type": "vertex", "args": ["alice"]}},
                {"kind": {"type": "out", "args": ["knows", null]}, "prev": 0},
                {"kind": {"type": "in_predicates"}, "prev": 1},
                {"kind": {"type": "saver", "args": ["knows"]}, "prev": 2}
            ]
        }"#;
        let (chain, tip) = Chain::from_json(json).unwrap();
        assert_eq!(tip, StepId(3));
        assert_eq!(chain.get(tip).unwrap().step_type(), StepType::SaveR);
        assert_eq!(
            chain.get(StepId(1)).unwrap().value_args()[1],
            ArgValue::Null
        );
        assert!(matches!(
            Chain::from_json(r#"{"steps": []}"#),
            Err(ChainError::Empty)
        ));
    }

    #[test]
    fn test_follow_r_reverses_morphism() {
        let mut builder = ChainBuilder::new();
        let morphism = builder.morphism().out(["a"]).in_(["b"]).id();
        let tip = builder.vertex(&["x"]).follow_r(morphism).id();
        let chain = builder.build();

        let reversed = chain.get(tip).unwrap().followr_chain().unwrap();
        let kinds: Vec<StepKind> = chain
            .walk(reversed)
            .map(|(_, step)| step.kind.clone())
            .collect();
        // Tip first: the morphism's first step comes last, inverted
        assert_eq!(
            kinds,
            vec![
                StepKind::In(vec!["a".into()]),
                StepKind::Out(vec!["b".into()]),
                StepKind::Morphism,
            ]
        );
    }

    #[test]
    fn test_back_respliced_chain() {
        let mut builder = ChainBuilder::new();
        let tip = builder
            .vertex(&["alice"])
            .tag(&["start"])
            .out(["knows"])
            .back("start")
            .id();
        let chain = builder.build();

        let back = chain.get(tip).unwrap();
        assert_eq!(back.step_type(), StepType::Back);
        // Repositioned at the tagged step
        assert_eq!(
            chain.get(back.prev().unwrap()).unwrap().step_type(),
            StepType::Tag
        );

        let back_chain = back.back_chain().unwrap();
        assert!(chain.is_vertex_chain(back_chain));
        let first = chain.get(back_chain).unwrap();
        assert_eq!(first.kind, StepKind::In(vec!["knows".into()]));
        assert!(Chain::from_steps(chain.steps().to_vec()).is_ok());
    }

    #[test]
    fn test_back_unknown_tag() {
        let mut builder = ChainBuilder::new();
        let tip = builder.vertex(&["alice"]).back("missing").id();
        let chain = builder.build();
        let back_chain = chain.get(tip).unwrap().back_chain().unwrap();
        assert!(!chain.is_vertex_chain(back_chain));
    }

    #[test]
    fn test_at_rejects_unbuilt_steps() {
        let mut builder = ChainBuilder::new();
        let root = builder.morphism().id();
        assert!(builder.at(StepId(1)).is_none());

        let tip = builder.at(root).unwrap().out(["p"]).id();
        let chain = builder.build();
        assert_eq!(chain.get(tip).unwrap().prev(), Some(root));
        assert!(Chain::from_steps(chain.steps().to_vec()).is_ok());
    }

    #[test]
    fn test_walk_stops_on_prev_cycle() {
        let chain = Chain {
            steps: vec![
                Step::new(StepKind::Morphism, None),
                Step::new(StepKind::Out(vec![]), Some(StepId(1))),
            ],
        };
        assert_eq!(chain.walk(StepId(1)).count(), 2);
        assert!(!chain.is_vertex_chain(StepId(1)));
    }

    #[test]
    fn test_follow_r_unknown_morphism() {
        let mut builder = ChainBuilder::new();
        let tip = builder.vertex(&["x"]).follow_r(StepId(9)).id();
        let chain = builder.build();
        assert_eq!(chain.get(tip).unwrap().followr_chain(), Some(StepId(9)));
        assert_eq!(chain.len(), 2);
    }
}
