//! Integration tests for sharing persistent structures between threads.
//!
//! With the `arc` feature enabled reference counts are atomic, so one
//! version can be read and extended from many threads at once.

#![cfg(all(feature = "arc", feature = "persistent"))]

use persistent_fds::persistent::{List, RedBlackTree};
use rstest::rstest;
use std::sync::Arc;
use std::thread;

// =============================================================================
// RedBlackTree Integration Tests
// =============================================================================

#[rstest]
fn test_tree_cross_thread_structural_sharing() {
    let original: Arc<RedBlackTree<i32>> = Arc::new((0..100).map(|value| value * 10).collect());

    let handles: Vec<_> = (0..8)
        .map(|index| {
            let tree = Arc::clone(&original);
            thread::spawn(move || {
                let mut version = (*tree).clone();
                for offset in 1..=9 {
                    version = version.insert(index * 1000 + offset).0;
                }
                let (version, erased) = version.erase(&(index * 10));
                assert!(erased);
                assert!(version.check_invariants().is_ok());
                assert_eq!(tree.len(), 100);
                version
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("Thread panicked"))
        .collect();

    for (index, tree) in (0_i32..).zip(results.iter()) {
        assert_eq!(tree.len(), 100 + 9 - 1);
        assert!(!tree.contains(&(index * 10)));
        assert!(tree.contains(&(index * 1000 + 1)));
    }
    assert_eq!(original.len(), 100);
    assert!(original.check_invariants().is_ok());
}

#[rstest]
fn test_tree_versions_dropped_on_other_threads() {
    let tree: RedBlackTree<String> = (0..500).map(|value| value.to_string()).collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let version = tree.clone();
            thread::spawn(move || {
                let (smaller, _) = version.erase(&"250".to_string());
                drop(version);
                smaller.len()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("Thread panicked"), 499);
    }
    assert_eq!(tree.len(), 500);
}

// =============================================================================
// List Integration Tests
// =============================================================================

#[rstest]
fn test_list_cross_thread_structural_sharing() {
    let original = List::new().push_front(3).push_front(2).push_front(1);

    let handles: Vec<_> = (0..4)
        .map(|index| {
            let list = original.clone();
            thread::spawn(move || {
                let extended = list.push_front(index * 10);
                assert_eq!(extended.front(), Some(&(index * 10)));
                assert_eq!(extended.len(), 4);
                assert_eq!(list.len(), 3);
                extended
            })
        })
        .collect();

    for (index, handle) in (0_i32..).zip(handles) {
        let list = handle.join().expect("Thread panicked");
        assert_eq!(list.front(), Some(&(index * 10)));
        assert_eq!(list.tail(), original);
    }
}
