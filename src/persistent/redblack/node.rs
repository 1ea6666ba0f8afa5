//! Tree nodes and the helpers that build and inspect links to them.
//!
//! A [`Link`] is a shared handle to a node whose tag bits hold the
//! [`Colour`] of the edge. Leaves are null links; they still carry a colour
//! (black unless deletion has made them double black).

use super::colour::Colour;
use super::compare::Comparator;
use crate::pointer::{RefCount, SharedTaggedPointer, impl_ref_counted};

/// A coloured edge to a node, or a coloured leaf when null.
pub(crate) type Link<T> = SharedTaggedPointer<TreeNode<T>>;

/// An immutable node of the tree.
///
/// Aligned to at least 4 bytes so links to it have two free tag bits.
#[repr(align(4))]
pub(crate) struct TreeNode<T> {
    count: RefCount,
    value: T,
    left: Link<T>,
    right: Link<T>,
}

static_assertions::const_assert!(std::mem::align_of::<TreeNode<u8>>() >= 4);

impl_ref_counted!(TreeNode<T>, count);

impl<T> TreeNode<T> {
    #[inline]
    pub(crate) const fn value(&self) -> &T {
        &self.value
    }

    #[inline]
    pub(crate) const fn left(&self) -> &Link<T> {
        &self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> &Link<T> {
        &self.right
    }

    /// Leftmost node of this subtree.
    pub(crate) fn minimum(&self) -> &Self {
        let mut current = self;
        while let Some(left) = current.left.as_ref() {
            current = left;
        }
        current
    }

    /// Rightmost node of this subtree.
    pub(crate) fn maximum(&self) -> &Self {
        let mut current = self;
        while let Some(right) = current.right.as_ref() {
            current = right;
        }
        current
    }

    /// Finds the node equivalent to `value` under `compare`.
    pub(crate) fn find<C: Comparator<T>>(&self, value: &T, compare: &C) -> Option<&Self> {
        let mut current = self;
        loop {
            let next = if compare.less(value, &current.value) {
                &current.left
            } else if compare.less(&current.value, value) {
                &current.right
            } else {
                return Some(current);
            };
            current = next.as_ref()?;
        }
    }
}

/// Allocates a node and returns a link of the given colour to it.
pub(crate) fn make_node<T>(value: T, colour: Colour, left: Link<T>, right: Link<T>) -> Link<T> {
    const { assert!(std::mem::align_of::<TreeNode<T>>() >= 4) };
    Link::new(TreeNode {
        count: RefCount::new(),
        value,
        left,
        right,
    })
    .with_tag(colour.tag())
}

/// A leaf carrying `colour`.
pub(crate) fn make_null<T>(colour: Colour) -> Link<T> {
    Link::null_with_tag(colour.tag())
}

#[inline]
pub(crate) fn colour_of<T>(link: &Link<T>) -> Colour {
    Colour::from_tag(link.tag())
}

/// `true` when the link holds no node, whatever its colour.
#[inline]
pub(crate) fn is_leaf<T>(link: &Link<T>) -> bool {
    link.is_null()
}

/// The node behind `link` if the edge is red.
#[inline]
pub(crate) fn red_node<T>(link: &Link<T>) -> Option<&TreeNode<T>> {
    if colour_of(link).is_red() {
        link.as_ref()
    } else {
        None
    }
}

/// The node behind `link` if the edge is black.
#[inline]
pub(crate) fn black_node<T>(link: &Link<T>) -> Option<&TreeNode<T>> {
    if colour_of(link).is_black() {
        link.as_ref()
    } else {
        None
    }
}

/// Another handle to the same node (or leaf) with a different colour.
///
/// Only the new handle changes; the node is shared and stays untouched.
#[inline]
pub(crate) fn recoloured<T>(link: &Link<T>, colour: Colour) -> Link<T> {
    link.clone().with_tag(colour.tag())
}

#[inline]
pub(crate) fn make_black<T>(link: Link<T>) -> Link<T> {
    link.with_tag(Colour::Black.tag())
}

#[inline]
pub(crate) fn make_red<T>(link: &Link<T>) -> Link<T> {
    recoloured(link, Colour::Red)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::redblack::compare::Less;
    use rstest::rstest;

    fn leaf() -> Link<i32> {
        make_null(Colour::Black)
    }

    #[rstest]
    #[case(Colour::Red)]
    #[case(Colour::Black)]
    #[case(Colour::DoubleBlack)]
    #[case(Colour::NegativeBlack)]
    fn test_make_null_carries_colour(#[case] colour: Colour) {
        let link: Link<i32> = make_null(colour);
        assert_eq!(colour_of(&link), colour);
        assert!(is_leaf(&link));
    }

    #[rstest]
    fn test_untagged_null_is_black_leaf() {
        let link: Link<i32> = Link::null();
        assert_eq!(colour_of(&link), Colour::Black);
        assert!(is_leaf(&link));
    }

    #[rstest]
    fn test_make_node_sets_colour_and_children() {
        let child = make_node(1, Colour::Red, leaf(), leaf());
        let node = make_node(2, Colour::Black, child.clone(), leaf());
        assert_eq!(colour_of(&node), Colour::Black);
        assert_eq!(node.value(), &2);
        assert!(node.left().ptr_eq(&child));
        assert!(is_leaf(node.right()));
        assert_eq!(child.reference_count(), 2);
    }

    #[rstest]
    fn test_recolouring_does_not_touch_shared_node() {
        let node = make_node(1, Colour::Red, leaf(), leaf());
        let black = make_black(node.clone());
        assert_eq!(colour_of(&node), Colour::Red);
        assert_eq!(colour_of(&black), Colour::Black);
        assert!(black.ptr_eq(&node));
        assert!(red_node(&node).is_some());
        assert!(red_node(&black).is_none());
        assert!(black_node(&black).is_some());
    }

    #[rstest]
    fn test_minimum_maximum_and_find() {
        let left = make_node(1, Colour::Black, leaf(), leaf());
        let right = make_node(3, Colour::Black, leaf(), make_node(4, Colour::Red, leaf(), leaf()));
        let root = make_node(2, Colour::Black, left, right);

        assert_eq!(root.minimum().value(), &1);
        assert_eq!(root.maximum().value(), &4);
        assert_eq!(root.find(&3, &Less).map(TreeNode::value), Some(&3));
        assert_eq!(root.find(&4, &Less).map(TreeNode::value), Some(&4));
        assert!(root.find(&5, &Less).is_none());
    }
}
