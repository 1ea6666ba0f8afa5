//! Persistent red-black tree.
//!
//! This module provides [`RedBlackTree`], an ordered set whose updates
//! return a new tree and leave the old one intact. Nodes are immutable and
//! shared between versions; an update copies only the `O(log n)` nodes on
//! its search path.
//!
//! The colour of a node is not stored in the node. It lives in the two
//! low bits of the pointer that leads to it (see
//! [`SharedTaggedPointer`](crate::pointer::SharedTaggedPointer)), so
//! repainting a subtree never needs to copy or mutate a shared node.
//!
//! # Time Complexity
//!
//! | Operation     | Complexity   |
//! |---------------|--------------|
//! | `new`         | O(1)         |
//! | `insert`      | O(log n)     |
//! | `erase`       | O(log n)     |
//! | `find`        | O(log n)     |
//! | `contains`    | O(log n)     |
//! | `first/last`  | O(log n)     |
//! | `len`         | O(n)         |
//! | `iter`        | O(1) + O(1) amortised per step |
//! | `clone`       | O(1)         |
//!
//! # Examples
//!
//! ```rust
//! use persistent_fds::persistent::RedBlackTree;
//!
//! let tree: RedBlackTree<i32> = [3, 1, 2].into_iter().collect();
//! let (smaller, erased) = tree.erase(&2);
//!
//! assert!(erased);
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
//! assert_eq!(smaller.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
//! ```

mod balance;
mod colour;
mod compare;
mod cursor;
mod delete;
mod insert;
mod node;
mod validate;

use std::fmt;

pub use colour::Colour;
pub use compare::{Comparator, Less};
pub use cursor::{Cursor, Iter, Position};
pub use validate::InvariantViolation;

use crate::tracing_helpers::{debug_log, trace_log};
use node::{Link, colour_of, make_black};

// =============================================================================
// RedBlackTree Definition
// =============================================================================

/// A persistent ordered set backed by a red-black tree.
///
/// Elements are kept in the order given by the comparator `C`, which
/// defaults to [`Less`] (the element type's [`Ord`]). Elements that compare
/// equivalent are stored once.
///
/// Updating operations take `&self` and return a new tree. Cloning a tree is
/// `O(1)`: both trees share every node.
///
/// # Examples
///
/// ```rust
/// use persistent_fds::persistent::RedBlackTree;
///
/// let empty = RedBlackTree::new();
/// let (one, _, _) = empty.insert("one");
/// let (two, _, _) = one.insert("two");
///
/// assert!(empty.is_empty());
/// assert!(one.contains(&"one") && !one.contains(&"two"));
/// assert!(two.contains(&"one") && two.contains(&"two"));
/// ```
pub struct RedBlackTree<T, C = Less> {
    root: Link<T>,
    compare: C,
}

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(RedBlackTree<i32>: Send, Sync);
#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(RedBlackTree<i32>: Send, Sync);

impl<T> RedBlackTree<T, Less> {
    /// Creates an empty tree ordered by [`Ord`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_fds::persistent::RedBlackTree;
    ///
    /// let tree: RedBlackTree<i32> = RedBlackTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(Less)
    }
}

impl<T, C> RedBlackTree<T, C> {
    /// Creates an empty tree ordered by `compare`.
    #[inline]
    #[must_use]
    pub const fn with_comparator(compare: C) -> Self {
        Self {
            root: Link::null(),
            compare,
        }
    }

    /// Returns the comparator.
    #[inline]
    #[must_use]
    pub const fn comparator(&self) -> &C {
        &self.compare
    }

    /// Returns `true` if the tree holds no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_null()
    }

    /// Counts the elements.
    ///
    /// The tree keeps no size field, so this walks every node.
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn len(&self) -> usize {
        self.fold(0, |count, _| count + 1)
    }

    /// Returns the smallest element.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.root.as_ref().map(|node| node.minimum().value())
    }

    /// Returns the largest element.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.root.as_ref().map(|node| node.maximum().value())
    }

    /// Returns a cursor at the smallest element (at the end if empty).
    #[must_use]
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::first(&self.root)
    }

    /// Returns a cursor at the end position.
    #[must_use]
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::end(&self.root)
    }

    /// Returns an in-order iterator over the elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_fds::persistent::RedBlackTree;
    ///
    /// let tree: RedBlackTree<i32> = [2, 3, 1].into_iter().collect();
    /// assert_eq!(tree.iter().rev().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.root)
    }

    /// Folds the elements in order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_fds::persistent::RedBlackTree;
    ///
    /// let tree: RedBlackTree<i32> = (1..=4).collect();
    /// assert_eq!(tree.fold(0, |sum, value| sum + value), 10);
    /// ```
    pub fn fold<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(B, &T) -> B,
    {
        fn walk<T, B, F: FnMut(B, &T) -> B>(link: &Link<T>, accumulator: B, function: &mut F) -> B {
            match link.as_ref() {
                None => accumulator,
                Some(node) => {
                    let accumulator = walk(node.left(), accumulator, function);
                    let accumulator = function(accumulator, node.value());
                    walk(node.right(), accumulator, function)
                }
            }
        }
        walk(&self.root, init, &mut function)
    }

    /// Returns `true` if both trees have the same root node.
    ///
    /// Trees that share a root are equal; the converse does not hold.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.root.ptr_eq(&other.root)
    }
}

impl<T, C: Comparator<T>> RedBlackTree<T, C> {
    /// Returns a cursor at the element equivalent to `value`, or at the end
    /// if there is none.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_fds::persistent::RedBlackTree;
    ///
    /// let tree: RedBlackTree<i32> = [10, 20, 30].into_iter().collect();
    /// let mut cursor = tree.find(&20);
    /// cursor.move_next();
    /// assert_eq!(cursor.get(), Some(&30));
    /// assert!(tree.find(&25).is_end());
    /// ```
    #[must_use]
    pub fn find(&self, value: &T) -> Cursor<'_, T> {
        Cursor::seek(&self.root, value, &self.compare)
    }

    /// Returns `true` if an element equivalent to `value` is present.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.root
            .as_ref()
            .and_then(|node| node.find(value, &self.compare))
            .is_some()
    }

    /// Verifies the red-black invariants and the element order.
    ///
    /// Returns the black height of the tree, counting the leaf level.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<usize, InvariantViolation> {
        validate::check(&self.root, &self.compare)
    }
}

impl<T: Clone, C: Comparator<T> + Clone> RedBlackTree<T, C> {
    /// Inserts `value`.
    ///
    /// Returns the new tree, a [`Position`] at the node holding the value,
    /// and whether the value was inserted. If an equivalent element was
    /// already present, the returned tree shares this tree's root and the
    /// position refers to the existing element.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_fds::persistent::RedBlackTree;
    ///
    /// let (tree, _, inserted) = RedBlackTree::new().insert(1);
    /// assert!(inserted);
    ///
    /// let (same, position, inserted) = tree.insert(1);
    /// assert!(!inserted);
    /// assert!(same.ptr_eq(&tree));
    /// assert_eq!(*position, 1);
    /// ```
    #[must_use]
    pub fn insert(&self, value: T) -> (Self, Position<T>, bool) {
        let outcome = insert::insert(&self.root, value, &self.compare);
        trace_log!(inserted = outcome.inserted, "red-black tree insert");
        let root = if outcome.inserted {
            make_black(outcome.subtree)
        } else {
            outcome.subtree
        };
        (
            self.with_root(root),
            Position::new(outcome.node),
            outcome.inserted,
        )
    }

    /// Removes the element equivalent to `value`.
    ///
    /// Returns the new tree and whether an element was removed. When nothing
    /// was removed, the returned tree shares this tree's root.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_fds::persistent::RedBlackTree;
    ///
    /// let tree: RedBlackTree<i32> = [1, 2, 3].into_iter().collect();
    /// let (smaller, erased) = tree.erase(&2);
    /// assert!(erased);
    /// assert!(!smaller.contains(&2));
    ///
    /// let (same, erased) = smaller.erase(&2);
    /// assert!(!erased);
    /// assert!(same.ptr_eq(&smaller));
    /// ```
    #[must_use]
    pub fn erase(&self, value: &T) -> (Self, bool) {
        match delete::find_delete(&self.root, value, &self.compare) {
            Some(root) => {
                if colour_of(&root) == Colour::DoubleBlack {
                    debug_log!("erase reduced the black height");
                }
                trace_log!(erased = true, "red-black tree erase");
                (self.with_root(make_black(root)), true)
            }
            None => {
                trace_log!(erased = false, "red-black tree erase");
                (self.clone(), false)
            }
        }
    }

    fn with_root(&self, root: Link<T>) -> Self {
        Self {
            root,
            compare: self.compare.clone(),
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<T, C: Clone> Clone for RedBlackTree<T, C> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            compare: self.compare.clone(),
        }
    }
}

impl<T, C: Default> Default for RedBlackTree<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T: Clone, C: Comparator<T> + Clone + Default> FromIterator<T> for RedBlackTree<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::default(), |tree, value| tree.insert(value).0)
    }
}

impl<'a, T, C> IntoIterator for &'a RedBlackTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq, C> PartialEq for RedBlackTree<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.iter().eq(other.iter())
    }
}

impl<T: Eq, C> Eq for RedBlackTree<T, C> {}

impl<T: fmt::Debug, C> fmt::Debug for RedBlackTree<T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}
