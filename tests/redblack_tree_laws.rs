#![cfg(feature = "persistent")]
//! Property-based tests for RedBlackTree.
//!
//! These tests check the tree against `BTreeSet` as a model and verify the
//! red-black invariants after arbitrary sequences of updates.

use persistent_fds::persistent::RedBlackTree;
use proptest::prelude::*;
use std::collections::BTreeSet;

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

/// An update: `true` inserts, `false` erases. A small key range makes
/// duplicates and hits on erase common.
fn arbitrary_operations(max_size: usize) -> impl Strategy<Value = Vec<(bool, i16)>> {
    prop::collection::vec((any::<bool>(), -64_i16..64), 0..max_size)
}

fn arbitrary_tree(max_size: usize) -> impl Strategy<Value = RedBlackTree<i32>> {
    prop::collection::vec(any::<i32>(), 0..max_size)
        .prop_map(|values| values.into_iter().collect::<RedBlackTree<i32>>())
}

// =============================================================================
// Model Laws
// =============================================================================

proptest! {
    /// Law: the tree holds exactly the values a `BTreeSet` would, in order,
    /// and stays a valid red-black tree after every update.
    #[test]
    fn prop_matches_btreeset_model(operations in arbitrary_operations(200)) {
        let mut tree = RedBlackTree::new();
        let mut model = BTreeSet::new();
        for (is_insert, key) in operations {
            if is_insert {
                let (next, position, inserted) = tree.insert(key);
                prop_assert_eq!(inserted, model.insert(key));
                prop_assert_eq!(*position, key);
                tree = next;
            } else {
                let (next, erased) = tree.erase(&key);
                prop_assert_eq!(erased, model.remove(&key));
                tree = next;
            }
            prop_assert!(tree.check_invariants().is_ok(), "{:?}", tree.check_invariants());
        }
        let expected: Vec<i16> = model.iter().copied().collect();
        prop_assert_eq!(tree.iter().copied().collect::<Vec<_>>(), expected);
        prop_assert_eq!(tree.len(), model.len());
        prop_assert_eq!(tree.first(), model.first());
        prop_assert_eq!(tree.last(), model.last());
    }

    /// Law: reverse iteration is the reverse of forward iteration.
    #[test]
    fn prop_reverse_iteration(tree in arbitrary_tree(100)) {
        let mut forward: Vec<i32> = tree.iter().copied().collect();
        forward.reverse();
        let backward: Vec<i32> = tree.iter().rev().copied().collect();
        prop_assert_eq!(forward, backward);
    }
}

// =============================================================================
// Insert / Find / Erase Laws
// =============================================================================

proptest! {
    /// Law: a value is found after it is inserted.
    #[test]
    fn prop_find_after_insert(tree in arbitrary_tree(50), value: i32) {
        let (updated, position, _) = tree.insert(value);
        prop_assert!(updated.contains(&value));
        prop_assert!(updated.find(&value).points_to(&position));
    }

    /// Law: a value is absent after it is erased.
    #[test]
    fn prop_absent_after_erase(tree in arbitrary_tree(50), value: i32) {
        let (with_value, _, _) = tree.insert(value);
        let (without, erased) = with_value.erase(&value);
        prop_assert!(erased);
        prop_assert!(!without.contains(&value));
        prop_assert!(without.check_invariants().is_ok());
    }

    /// Law: inserting an absent value and erasing it again gives back the
    /// original sequence.
    #[test]
    fn prop_insert_erase_round_trip(tree in arbitrary_tree(50), value: i32) {
        prop_assume!(!tree.contains(&value));
        let (with_value, _, inserted) = tree.insert(value);
        prop_assert!(inserted);
        let (restored, _) = with_value.erase(&value);
        prop_assert_eq!(restored, tree);
    }

    /// Law: inserting a present value is a no-op that shares the root.
    #[test]
    fn prop_insert_idempotent(tree in arbitrary_tree(50), value: i32) {
        let (once, _, _) = tree.insert(value);
        let (twice, _, inserted) = once.insert(value);
        prop_assert!(!inserted);
        prop_assert!(twice.ptr_eq(&once));
    }

    /// Law: erasing an absent value is a no-op that shares the root.
    #[test]
    fn prop_erase_absent_shares_root(tree in arbitrary_tree(50), value: i32) {
        prop_assume!(!tree.contains(&value));
        let (same, erased) = tree.erase(&value);
        prop_assert!(!erased);
        prop_assert!(same.ptr_eq(&tree));
    }
}

// =============================================================================
// Persistence Laws
// =============================================================================

proptest! {
    /// Law: updates never change an existing version.
    #[test]
    fn prop_updates_preserve_old_version(
        tree in arbitrary_tree(50),
        inserted in prop::collection::vec(any::<i32>(), 0..20),
        erased in prop::collection::vec(any::<i32>(), 0..20)
    ) {
        let before: Vec<i32> = tree.iter().copied().collect();
        let mut updated = tree.clone();
        for value in inserted {
            updated = updated.insert(value).0;
        }
        for value in &erased {
            updated = updated.erase(value).0;
        }
        prop_assert!(updated.check_invariants().is_ok());
        prop_assert_eq!(tree.iter().copied().collect::<Vec<_>>(), before);
        prop_assert!(tree.check_invariants().is_ok());
    }
}
