//! Property tests for the move index math.
//!
//! The "move after target" adjustment is the classic off-by-one trap in
//! this engine, so the laws live here rather than in any one scenario:
//! the moved item always lands immediately before the item originally at
//! `to`, everything else keeps its relative order, and no-ops are
//! identities.

use proptest::prelude::*;

use crate::model::{apply_move, is_noop, splice_index};

proptest! {
    #[test]
    fn moved_item_lands_before_original_target(
        len in 2usize..24,
        seed_from in 0usize..1024,
        seed_to in 0usize..1024,
    ) {
        let from = seed_from % len;
        let to = seed_to % len;
        prop_assume!(!is_noop(from, to));

        let order: Vec<usize> = (0..len).collect();
        let moved = apply_move(&order, from, to);

        prop_assert_eq!(moved.len(), len);
        prop_assert_eq!(moved[splice_index(from, to)], from);

        // Everything but the moved item keeps its relative order.
        let rest: Vec<usize> = moved.iter().copied().filter(|&v| v != from).collect();
        let expect: Vec<usize> = (0..len).filter(|&v| v != from).collect();
        prop_assert_eq!(rest, expect);
    }

    #[test]
    fn noop_requests_are_identities(len in 1usize..24, seed in 0usize..1024) {
        let from = seed % len;
        let order: Vec<usize> = (0..len).collect();
        prop_assert_eq!(apply_move(&order, from, from), order.clone());
        prop_assert_eq!(apply_move(&order, from, from + 1), order);
    }

    #[test]
    fn splice_index_stays_in_bounds(
        len in 2usize..24,
        seed_from in 0usize..1024,
        seed_to in 0usize..1024,
    ) {
        let from = seed_from % len;
        let to = seed_to % len;
        prop_assume!(!is_noop(from, to));
        prop_assert!(splice_index(from, to) < len);
    }
}
