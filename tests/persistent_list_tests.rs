#![cfg(feature = "persistent")]
//! Unit and property tests for List.

use persistent_fds::persistent::List;
use proptest::prelude::*;
use rstest::rstest;
use std::collections::HashSet;

// =============================================================================
// Construction and access
// =============================================================================

#[rstest]
fn test_push_front_order() {
    let list = List::new().push_front(3).push_front(2).push_front(1);
    assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(list.front(), Some(&1));
    assert_eq!(list.len(), 3);
}

#[rstest]
fn test_from_iter_keeps_order() {
    let list: List<&str> = ["a", "b", "c"].into_iter().collect();
    assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec!["a", "b", "c"]);
}

#[rstest]
fn test_pop_front_walks_the_list() {
    let mut list: List<i32> = (1..=3).collect();
    let mut popped = Vec::new();
    while let Some((front, rest)) = list.pop_front().map(|(front, rest)| (*front, rest)) {
        popped.push(front);
        list = rest;
    }
    assert_eq!(popped, vec![1, 2, 3]);
    assert!(list.is_empty());
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(5)]
fn test_tail_length(#[case] size: usize) {
    let list: List<usize> = (0..size).collect();
    assert_eq!(list.tail().len(), size.saturating_sub(1));
}

// =============================================================================
// Sharing
// =============================================================================

#[rstest]
fn test_versions_are_independent() {
    let base: List<i32> = (1..=3).collect();
    let left = base.push_front(10);
    let right = base.push_front(20);
    assert_eq!(left.tail(), base);
    assert_eq!(right.tail(), base);
    assert_ne!(left, right);
    assert_eq!(base.len(), 3);
}

#[rstest]
fn test_equal_lists_hash_equal() {
    let mut set = HashSet::new();
    set.insert((1..=3).collect::<List<i32>>());
    assert!(set.contains(&(1..=3).collect::<List<i32>>()));
    assert!(!set.contains(&(1..=4).collect::<List<i32>>()));
}

// =============================================================================
// Laws
// =============================================================================

proptest! {
    /// Law: collecting a list and iterating it gives back the input.
    #[test]
    fn prop_iter_round_trip(values in prop::collection::vec(any::<i32>(), 0..100)) {
        let list: List<i32> = values.iter().copied().collect();
        prop_assert_eq!(list.len(), values.len());
        prop_assert_eq!(list.iter().copied().collect::<Vec<_>>(), values);
    }

    /// Law: `tail` undoes `push_front`.
    #[test]
    fn prop_tail_after_push_front(values in prop::collection::vec(any::<i32>(), 0..50), value: i32) {
        let list: List<i32> = values.into_iter().collect();
        let pushed = list.push_front(value);
        prop_assert_eq!(pushed.front(), Some(&value));
        prop_assert_eq!(pushed.tail(), list);
    }
}
