//! Persistent (immutable) data structures.
//!
//! Both structures share unchanged parts between versions through
//! intrusive reference counts:
//!
//! - [`List`]: persistent singly-linked list
//! - [`RedBlackTree`]: persistent ordered set (red-black tree)
//!
//! # Structural Sharing
//!
//! An update builds new nodes only where the new version differs and points
//! them at the old, untouched nodes. The old version stays valid and
//! unchanged for as long as anyone holds it.
//!
//! # Examples
//!
//! ## `List`
//!
//! ```rust
//! use persistent_fds::persistent::List;
//!
//! let list = List::new().push_front(3).push_front(2).push_front(1);
//! assert_eq!(list.front(), Some(&1));
//!
//! let extended = list.push_front(0);
//! assert_eq!(list.len(), 3);
//! assert_eq!(extended.len(), 4);
//! ```
//!
//! ## `RedBlackTree`
//!
//! ```rust
//! use persistent_fds::persistent::RedBlackTree;
//!
//! let tree: RedBlackTree<i32> = [5, 1, 3].into_iter().collect();
//! let (updated, _, inserted) = tree.insert(2);
//!
//! assert!(inserted);
//! assert_eq!(tree.len(), 3);
//! assert_eq!(updated.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 5]);
//! ```
//!
//! # Thread Safety
//!
//! With the `arc` feature (on by default) reference counts are atomic and
//! both structures are `Send + Sync` whenever their elements are. Without
//! it they are confined to a single thread.

mod list;
mod redblack;

pub use list::{List, ListIter};
pub use redblack::{
    Colour, Comparator, Cursor, InvariantViolation, Iter, Less, Position, RedBlackTree,
};
