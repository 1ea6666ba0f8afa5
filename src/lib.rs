//! # persistent-fds
//!
//! Persistent (immutable, structurally shared) functional data structures
//! built on two low-level primitives:
//!
//! - **Tagged pointers**: a raw pointer that keeps a small integer in the
//!   low bits left free by the pointee's alignment.
//! - **Intrusive reference counting**: the count lives inside the pointee,
//!   and [`SharedTaggedPointer`](pointer::SharedTaggedPointer) combines it
//!   with a tagged pointer into an owning handle.
//!
//! On top of these the crate provides:
//!
//! - [`RedBlackTree`](persistent::RedBlackTree): a persistent ordered set.
//!   Insertion uses Okasaki's balancing; deletion uses the double-black /
//!   negative-black scheme of Germane and Might. The colour of a node is
//!   stored in the tag bits of the edge that points at it.
//! - [`List`](persistent::List): a persistent cons list.
//!
//! ## Feature Flags
//!
//! - `persistent`: the list and the tree (default)
//! - `arc`: atomic reference counts, making structures `Send + Sync` (default)
//! - `tracing`: emit trace events through the `tracing` crate
//!
//! ## Example
//!
//! ```rust
//! use persistent_fds::persistent::RedBlackTree;
//!
//! let (tree, _, inserted) = RedBlackTree::new().insert(2);
//! assert!(inserted);
//!
//! let (bigger, _, _) = tree.insert(1);
//! assert_eq!(bigger.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
//!
//! // The previous version is untouched.
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![2]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// ```rust
/// use persistent_fds::prelude::*;
///
/// let (tree, _, _) = RedBlackTree::<i32>::new().insert(1);
/// assert!(tree.contains(&1));
/// ```
pub mod prelude {
    pub use crate::pointer::*;

    #[cfg(feature = "persistent")]
    pub use crate::persistent::*;
}

mod tracing_helpers;

pub mod pointer;

#[cfg(feature = "persistent")]
pub mod persistent;
