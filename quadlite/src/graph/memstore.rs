// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory quad store
//!
//! Interns every subject, predicate, object and label into a [`ValueId`]
//! and keeps one posting list per `(direction, value)` pair. Value ids are
//! handed out in first-seen order starting at 1, so two stores loaded with
//! the same quads in the same order agree on every id.

use log::debug;
use std::collections::{HashMap, HashSet};
use std::io::BufRead;

use super::{QuadId, QuadStore, StoreError, ValueId};
use crate::quad::{Direction, Quad};

/// In-memory quad store with adjacency posting lists
#[derive(Debug, Default, Clone)]
pub struct MemStore {
    names: Vec<String>,
    ids: HashMap<String, ValueId>,
    quads: Vec<Quad>,
    quad_values: Vec<[Option<ValueId>; 4]>,
    seen: HashSet<Quad>,
    index: HashMap<(Direction, ValueId), Vec<QuadId>>,
}

impl MemStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `quads`
    pub fn from_quads<I>(quads: I) -> Self
    where
        I: IntoIterator<Item = Quad>,
    {
        let mut store = Self::new();
        for quad in quads {
            store.add_quad(quad);
        }
        store
    }

    /// Add a quad. Returns `false` if the identical quad was already present.
    pub fn add_quad(&mut self, quad: Quad) -> bool {
        if self.seen.contains(&quad) {
            debug!("Skipping duplicate quad {}", quad);
            return false;
        }

        let id = QuadId(self.quads.len());
        let mut values = [None; 4];
        for (slot, direction) in Direction::ALL.iter().enumerate() {
            if let Some(name) = quad.get(*direction) {
                let value = self.intern(name);
                values[slot] = Some(value);
                self.index.entry((*direction, value)).or_default().push(id);
            }
        }

        self.seen.insert(quad.clone());
        self.quads.push(quad);
        self.quad_values.push(values);
        true
    }

    /// Load whitespace separated quads (`subject predicate object [label] .`)
    pub fn load_quads<R: BufRead>(&mut self, reader: R) -> Result<usize, StoreError> {
        let mut added = 0;
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let parsed = Quad::parse_line(&line).map_err(|message| StoreError::Parse {
                line: number + 1,
                message,
            })?;
            if let Some(quad) = parsed {
                if self.add_quad(quad) {
                    added += 1;
                }
            }
        }
        debug!("Loaded {} quads", added);
        Ok(added)
    }

    /// Load quads from a JSON array of `{subject, predicate, object, label?}`
    pub fn load_json(&mut self, json: &str) -> Result<usize, StoreError> {
        let quads: Vec<Quad> = serde_json::from_str(json)?;
        Ok(quads.into_iter().filter(|q| self.add_quad(q.clone())).count())
    }

    /// All stored quads in insertion order
    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    /// Look up a stored quad
    pub fn quad(&self, id: QuadId) -> Option<&Quad> {
        self.quads.get(id.0)
    }

    fn intern(&mut self, name: &str) -> ValueId {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        self.names.push(name.to_string());
        let id = ValueId(self.names.len() as u64);
        self.ids.insert(name.to_string(), id);
        id
    }

    fn slot(direction: Direction) -> usize {
        match direction {
            Direction::Subject => 0,
            Direction::Predicate => 1,
            Direction::Object => 2,
            Direction::Label => 3,
        }
    }
}

impl QuadStore for MemStore {
    fn value_of(&self, name: &str) -> Option<ValueId> {
        self.ids.get(name).copied()
    }

    fn name_of(&self, id: ValueId) -> Option<&str> {
        let index = usize::try_from(id.0).ok()?.checked_sub(1)?;
        self.names.get(index).map(String::as_str)
    }

    fn node_ids(&self) -> Vec<ValueId> {
        (1..=self.names.len() as u64).map(ValueId).collect()
    }

    fn quads_with(&self, direction: Direction, value: ValueId) -> Vec<QuadId> {
        self.index
            .get(&(direction, value))
            .cloned()
            .unwrap_or_default()
    }

    fn quad_direction(&self, quad: QuadId, direction: Direction) -> Option<ValueId> {
        self.quad_values
            .get(quad.0)
            .and_then(|values| values[Self::slot(direction)])
    }

    fn size(&self) -> usize {
        self.quads.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn social() -> MemStore {
        MemStore::from_quads(vec![
            Quad::new("alice", "knows", "bob"),
            Quad::new("bob", "knows", "carol"),
        ])
    }

    #[test]
    fn test_interning_is_first_seen_order() {
        let store = social();
        assert_eq!(store.value_of("alice"), Some(ValueId(1)));
        assert_eq!(store.value_of("knows"), Some(ValueId(2)));
        assert_eq!(store.value_of("bob"), Some(ValueId(3)));
        assert_eq!(store.value_of("carol"), Some(ValueId(4)));
        assert_eq!(store.value_of("dave"), None);
        assert_eq!(store.name_of(ValueId(3)), Some("bob"));
        assert_eq!(store.name_of(ValueId(0)), None);
        assert_eq!(store.name_of(ValueId(99)), None);
    }

    #[test]
    fn test_nodes_include_predicates() {
        let store = social();
        assert_eq!(store.node_ids().len(), 4);
    }

    #[test]
    fn test_posting_lists() {
        let store = social();
        let bob = store.value_of("bob").unwrap();
        assert_eq!(store.quads_with(Direction::Object, bob), vec![QuadId(0)]);
        assert_eq!(store.quads_with(Direction::Subject, bob), vec![QuadId(1)]);
        assert_eq!(
            store.quad_direction(QuadId(1), Direction::Object),
            store.value_of("carol")
        );
        assert_eq!(store.quad_direction(QuadId(1), Direction::Label), None);
    }

    #[test]
    fn test_duplicate_quads_are_ignored() {
        let mut store = social();
        assert!(!store.add_quad(Quad::new("alice", "knows", "bob")));
        assert_eq!(store.size(), 2);
    }

    #[test]
    fn test_load_quads() {
        let mut store = MemStore::new();
        let text = "# people\nalice knows bob .\nbob knows carol graph1 .\n\n";
        let added = store.load_quads(text.as_bytes()).unwrap();
        assert_eq!(added, 2);
        assert_eq!(store.quad(QuadId(1)).unwrap().label.as_deref(), Some("graph1"));

        let err = store.load_quads("broken line".as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_load_json() {
        let mut store = MemStore::new();
        let added = store
            .load_json(r#"[{"subject":"a","predicate":"p","object":"b"},{"subject":"a","predicate":"p","object":"b"}]"#)
            .unwrap();
        assert_eq!(added, 1);
    }
}
