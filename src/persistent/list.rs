//! Persistent (immutable) singly-linked list.
//!
//! This module provides [`List`], a cons list whose nodes are shared through
//! intrusive reference counts.
//!
//! # Overview
//!
//! - O(1) `push_front`, `front`, `pop_front` and `tail`
//! - O(1) `len` (cached)
//! - O(n) iteration
//!
//! Every operation returns a new list and leaves the original intact.
//!
//! # Examples
//!
//! ```rust
//! use persistent_fds::persistent::List;
//!
//! let list = List::new().push_front(3).push_front(2).push_front(1);
//! assert_eq!(list.front(), Some(&1));
//! assert_eq!(list.len(), 3);
//!
//! // The original list is preserved
//! let extended = list.push_front(0);
//! assert_eq!(list.len(), 3);
//! assert_eq!(extended.len(), 4);
//! ```
//!
//! # Structural Sharing
//!
//! ```text
//! list1: 1 -> 2 -> 3 -> nil
//! list2 = list1.push_front(0): 0 -> [1 -> 2 -> 3 -> nil]  // shares [1, 2, 3]
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::pointer::{RefCount, SharedTaggedPointer, impl_ref_counted};

type Link<T> = SharedTaggedPointer<ListNode<T>>;

struct ListNode<T> {
    count: RefCount,
    element: T,
    next: Link<T>,
}

impl_ref_counted!(ListNode<T>, count);

/// A persistent (immutable) singly-linked list.
///
/// # Time Complexity
///
/// | Operation    | Complexity |
/// |--------------|------------|
/// | `new`        | O(1)       |
/// | `push_front` | O(1)       |
/// | `front`      | O(1)       |
/// | `pop_front`  | O(1)       |
/// | `tail`       | O(1)       |
/// | `len`        | O(1)       |
///
/// # Examples
///
/// ```rust
/// use persistent_fds::persistent::List;
///
/// let list: List<i32> = (1..=3).collect();
/// let (front, rest) = list.pop_front().unwrap();
/// assert_eq!(*front, 1);
/// assert_eq!(rest.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
/// ```
pub struct List<T> {
    head: Link<T>,
    length: usize,
}

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(List<i32>: Send, Sync);

impl<T> List<T> {
    /// Creates a new empty list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_fds::persistent::List;
    ///
    /// let list: List<i32> = List::new();
    /// assert!(list.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            head: Link::null(),
            length: 0,
        }
    }

    /// Returns a new list with `element` in front of this one.
    ///
    /// The new list shares every node of `self`.
    #[inline]
    #[must_use]
    pub fn push_front(&self, element: T) -> Self {
        Self {
            head: Link::new(ListNode {
                count: RefCount::new(),
                element,
                next: self.head.clone(),
            }),
            length: self.length + 1,
        }
    }

    /// Returns the first element.
    #[inline]
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.head.as_ref().map(|node| &node.element)
    }

    /// Returns the list without its first element (empty if already empty).
    #[inline]
    #[must_use]
    pub fn tail(&self) -> Self {
        self.head.as_ref().map_or_else(Self::new, |node| Self {
            head: node.next.clone(),
            length: self.length - 1,
        })
    }

    /// Splits the list into its first element and the rest.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_fds::persistent::List;
    ///
    /// let list = List::new().push_front(2).push_front(1);
    /// let (front, rest) = list.pop_front().unwrap();
    /// assert_eq!(*front, 1);
    /// assert_eq!(rest.front(), Some(&2));
    /// assert!(List::<i32>::new().pop_front().is_none());
    /// ```
    #[must_use]
    pub fn pop_front(&self) -> Option<(&T, Self)> {
        self.head.as_ref().map(|node| {
            (
                &node.element,
                Self {
                    head: node.next.clone(),
                    length: self.length - 1,
                },
            )
        })
    }

    /// Returns `true` if the list has no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_null()
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns an iterator from front to back.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> ListIter<'_, T> {
        ListIter {
            current: self.head.as_ref(),
            remaining: self.length,
        }
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over references to elements of a [`List`].
pub struct ListIter<'a, T> {
    current: Option<&'a ListNode<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for ListIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.current.map(|node| {
            self.current = node.next.as_ref();
            self.remaining -= 1;
            &node.element
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for ListIter<'_, T> {}

impl<T> std::iter::FusedIterator for ListIter<'_, T> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        // Unlink uniquely owned nodes one by one so a long chain does not
        // recurse through the nodes' own drops.
        let mut link = std::mem::take(&mut self.head);
        while let Ok(node) = link.try_unwrap() {
            link = node.next;
        }
    }
}

impl<T> Clone for List<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            length: self.length,
        }
    }
}

impl<T> Default for List<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let elements: Vec<T> = iter.into_iter().collect();
        elements
            .into_iter()
            .rev()
            .fold(Self::new(), |list, element| list.push_front(element))
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = ListIter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for List<T> {}

impl<T: Hash> Hash for List<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_new_is_empty() {
        let list: List<i32> = List::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.front(), None);
        assert!(list.pop_front().is_none());
        assert!(list.tail().is_empty());
    }

    #[rstest]
    fn test_push_front_shares_tail() {
        let base = List::new().push_front(2);
        let extended = base.push_front(1);
        assert_eq!(base.head.reference_count(), 2);
        assert!(extended.tail().head.ptr_eq(&base.head));
    }

    #[rstest]
    fn test_iter_is_exact() {
        let list: List<i32> = (1..=4).collect();
        let mut iter = list.iter();
        assert_eq!(iter.len(), 4);
        iter.next();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.copied().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[rstest]
    fn test_drop_long_list_does_not_overflow_stack() {
        let list: List<u32> = (0..200_000).collect();
        assert_eq!(list.len(), 200_000);
        drop(list);
    }

    #[rstest]
    fn test_drop_keeps_shared_suffix() {
        let suffix: List<i32> = (2..=3).collect();
        let longer = suffix.push_front(1);
        drop(longer);
        assert_eq!(suffix.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(suffix.head.reference_count(), 1);
    }

    #[rstest]
    fn test_debug() {
        let list: List<i32> = (1..=3).collect();
        assert_eq!(format!("{list:?}"), "[1, 2, 3]");
    }
}
