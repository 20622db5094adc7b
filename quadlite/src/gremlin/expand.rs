// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Directional expansion
//!
//! `out`, `in` and `both` follow edges away from the current values:
//!
//! ```text
//! HasA(out,
//!   And(LinksTo(predicates, predicate),
//!       LinksTo(base, in)))
//! ```
//!
//! `out_predicates` and `in_predicates` stop at the predicate slot and
//! report each predicate once.

use super::build_iterator::{endpoints, Compilation};
use super::chain::ArgValue;
use super::error::CompileError;
use super::value;
use crate::iterator::GraphIterator;
use crate::quad::Direction;

impl Compilation<'_> {
    /// Expand `base` along edges. The first argument selects predicates
    /// (all of them when absent); the second names tags reported for the
    /// matched predicate.
    pub(super) fn build_in_out_iterator(
        &mut self,
        args: &[ArgValue],
        base: GraphIterator,
        reverse: bool,
    ) -> Result<GraphIterator, CompileError> {
        let mut predicates = match args.first() {
            Some(predicate) => self.iterator_from_value(predicate)?,
            None => self.store.nodes_all_iterator(),
        };
        if let Some(tags) = args.get(1) {
            for tag in value::tag_names(tags) {
                predicates.tagger_mut().add(tag);
            }
        }
        Ok(in_out(base, predicates, reverse))
    }

    pub(super) fn build_in_out_predicate_iterator(
        &self,
        base: GraphIterator,
        reverse: bool,
    ) -> GraphIterator {
        in_out_predicates(base, reverse)
    }
}

/// Nodes one edge away from `base` through any predicate in `predicates`
pub fn in_out(base: GraphIterator, predicates: GraphIterator, reverse: bool) -> GraphIterator {
    let (anchor, far) = endpoints(reverse);
    let quads = GraphIterator::and(vec![
        GraphIterator::links_to(predicates, Direction::Predicate),
        GraphIterator::links_to(base, anchor),
    ]);
    GraphIterator::has_a(quads, far)
}

/// Distinct predicates on edges leaving (or, reversed, entering) `base`
pub fn in_out_predicates(base: GraphIterator, reverse: bool) -> GraphIterator {
    let (anchor, _) = endpoints(reverse);
    GraphIterator::unique(GraphIterator::has_a(
        GraphIterator::links_to(base, anchor),
        Direction::Predicate,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iterator::IteratorKind;

    fn mirror(direction: Direction) -> Direction {
        direction.reverse()
    }

    #[test]
    fn test_reverse_is_mirror_of_forward() {
        let forward = in_out(GraphIterator::all(), GraphIterator::all(), false);
        let reverse = in_out(GraphIterator::all(), GraphIterator::all(), true);

        let IteratorKind::HasA { direction: far, primary } = forward.kind() else {
            panic!("expected hasa");
        };
        let IteratorKind::HasA { direction: far_r, primary: primary_r } = reverse.kind() else {
            panic!("expected hasa");
        };
        assert_eq!(*far, Direction::Object);
        assert_eq!(*far_r, mirror(*far));

        let anchor = |tree: &GraphIterator| match tree.children()[1].kind() {
            IteratorKind::LinksTo { direction, .. } => *direction,
            _ => panic!("expected links_to"),
        };
        assert_eq!(anchor(primary), Direction::Subject);
        assert_eq!(anchor(primary_r), mirror(anchor(primary)));
    }

    #[test]
    fn test_predicate_expansion_is_unique() {
        let tree = in_out_predicates(GraphIterator::all(), true);
        let IteratorKind::Unique(inner) = tree.kind() else {
            panic!("expected unique");
        };
        assert!(matches!(
            inner.kind(),
            IteratorKind::HasA { direction: Direction::Predicate, .. }
        ));
        assert!(matches!(
            inner.children()[0].kind(),
            IteratorKind::LinksTo { direction: Direction::Object, .. }
        ));
    }
}
