//! Bidirectional cursors and in-order iteration.
//!
//! Nodes have no parent links (a node may be shared by many trees), so a
//! cursor remembers the path from the root to its current node.

use std::fmt;
use std::iter::FusedIterator;
use std::ptr;

use smallvec::SmallVec;

use super::compare::Comparator;
use super::node::{Link, TreeNode};

/// Inline capacity of a cursor path. A red-black tree holding `n` elements
/// is at most `2 * log2(n + 1)` deep, so this covers millions of elements
/// without touching the heap.
const PATH_CAPACITY: usize = 48;

type Path<'a, T> = SmallVec<[&'a TreeNode<T>; PATH_CAPACITY]>;

// =============================================================================
// Position
// =============================================================================

/// An owning handle to the node an insertion produced or found.
///
/// A `Position` keeps its node alive independently of any tree, and can be
/// compared against cursors with [`Cursor::points_to`].
///
/// # Examples
///
/// ```rust
/// use persistent_fds::persistent::RedBlackTree;
///
/// let (tree, position, inserted) = RedBlackTree::new().insert(5);
/// assert!(inserted);
/// assert_eq!(*position, 5);
/// assert!(tree.find(&5).points_to(&position));
/// ```
pub struct Position<T> {
    node: Link<T>,
}

impl<T> Position<T> {
    pub(crate) fn new(node: Link<T>) -> Self {
        debug_assert!(!node.is_null(), "a position always refers to a node");
        Self { node }
    }

    /// Returns the element at this position.
    #[inline]
    #[must_use]
    pub fn get(&self) -> &T {
        self.node().value()
    }

    fn node(&self) -> &TreeNode<T> {
        &self.node
    }
}

impl<T> std::ops::Deref for Position<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T> Clone for Position<T> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Position<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("Position").field(self.get()).finish()
    }
}

// =============================================================================
// Cursor
// =============================================================================

/// A bidirectional position within one version of a tree.
///
/// A cursor is either at an element or at the *end* position, one past the
/// last element. Moving forward from the end stays at the end; moving
/// backward from the end goes to the last element. Moving backward from the
/// first element goes to the end, like the "ghost" element of
/// [`std::collections::linked_list::Cursor`].
///
/// Two cursors are equal when they are at the same node (or both at the
/// end).
pub struct Cursor<'a, T> {
    root: Option<&'a TreeNode<T>>,
    path: Path<'a, T>,
}

impl<'a, T> Cursor<'a, T> {
    /// A cursor at the end position.
    pub(crate) fn end(root: &'a Link<T>) -> Self {
        Self {
            root: root.as_ref(),
            path: SmallVec::new(),
        }
    }

    /// A cursor at the smallest element, or at the end of an empty tree.
    pub(crate) fn first(root: &'a Link<T>) -> Self {
        let mut cursor = Self::end(root);
        if let Some(node) = cursor.root {
            cursor.descend_left(node);
        }
        cursor
    }

    /// A cursor at the largest element, or at the end of an empty tree.
    pub(crate) fn last(root: &'a Link<T>) -> Self {
        let mut cursor = Self::end(root);
        if let Some(node) = cursor.root {
            cursor.descend_right(node);
        }
        cursor
    }

    /// A cursor at the element equivalent to `value`, or at the end.
    pub(crate) fn seek<C: Comparator<T>>(root: &'a Link<T>, value: &T, compare: &C) -> Self {
        let mut cursor = Self::end(root);
        let mut current = cursor.root;
        while let Some(node) = current {
            cursor.path.push(node);
            current = if compare.less(value, node.value()) {
                node.left().as_ref()
            } else if compare.less(node.value(), value) {
                node.right().as_ref()
            } else {
                return cursor;
            };
        }
        cursor.path.clear();
        cursor
    }

    fn descend_left(&mut self, mut node: &'a TreeNode<T>) {
        self.path.push(node);
        while let Some(left) = node.left().as_ref() {
            self.path.push(left);
            node = left;
        }
    }

    fn descend_right(&mut self, mut node: &'a TreeNode<T>) {
        self.path.push(node);
        while let Some(right) = node.right().as_ref() {
            self.path.push(right);
            node = right;
        }
    }

    fn current(&self) -> Option<&'a TreeNode<T>> {
        self.path.last().copied()
    }

    /// Returns the element under the cursor, or `None` at the end.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<&'a T> {
        self.current().map(TreeNode::value)
    }

    /// Returns `true` at the end position.
    #[inline]
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.path.is_empty()
    }

    /// Returns `true` if the cursor is at the node `position` refers to.
    #[must_use]
    pub fn points_to(&self, position: &Position<T>) -> bool {
        self.current()
            .is_some_and(|node| ptr::eq(node, position.node()))
    }

    /// Moves to the in-order successor.
    pub fn move_next(&mut self) {
        let Some(current) = self.current() else {
            return;
        };
        if let Some(right) = current.right().as_ref() {
            self.descend_left(right);
            return;
        }
        while let Some(child) = self.path.pop() {
            if self
                .path
                .last()
                .is_some_and(|parent| is_child(parent.left(), child))
            {
                return;
            }
        }
    }

    /// Moves to the in-order predecessor.
    pub fn move_prev(&mut self) {
        let Some(current) = self.current() else {
            if let Some(root) = self.root {
                self.descend_right(root);
            }
            return;
        };
        if let Some(left) = current.left().as_ref() {
            self.descend_right(left);
            return;
        }
        while let Some(child) = self.path.pop() {
            if self
                .path
                .last()
                .is_some_and(|parent| is_child(parent.right(), child))
            {
                return;
            }
        }
    }
}

fn is_child<T>(link: &Link<T>, node: &TreeNode<T>) -> bool {
    ptr::eq(link.as_ptr(), node)
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        Self {
            root: self.root,
            path: self.path.clone(),
        }
    }
}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        match (self.current(), other.current()) {
            (Some(left), Some(right)) => ptr::eq(left, right),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => formatter.debug_tuple("Cursor").field(value).finish(),
            None => formatter.write_str("Cursor(end)"),
        }
    }
}

// =============================================================================
// Iter
// =============================================================================

/// An in-order iterator over a tree's elements.
///
/// Created by [`RedBlackTree::iter`](super::RedBlackTree::iter).
pub struct Iter<'a, T> {
    front: Cursor<'a, T>,
    back: Cursor<'a, T>,
    finished: bool,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(root: &'a Link<T>) -> Self {
        Self {
            front: Cursor::first(root),
            back: Cursor::last(root),
            finished: root.is_null(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let value = self.front.get()?;
        if self.front == self.back {
            self.finished = true;
        } else {
            self.front.move_next();
        }
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            (1, None)
        }
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let value = self.back.get()?;
        if self.front == self.back {
            self.finished = true;
        } else {
            self.back.move_prev();
        }
        Some(value)
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            front: self.front.clone(),
            back: self.back.clone(),
            finished: self.finished,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
