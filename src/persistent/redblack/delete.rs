//! Path-copying deletion with double-black bubbling.
//!
//! Removing a black node leaves a "double black" edge where a black level
//! went missing. [`bubble`] pushes that extra level up towards the root one
//! step at a time, and [`bubble_balance`](super::balance::bubble_balance)
//! resolves it as soon as a sibling can absorb it. A double black that
//! reaches the root is simply repainted black by the caller.

use super::balance::bubble_balance;
use super::colour::Colour;
use super::compare::Comparator;
use super::node::{Link, TreeNode, colour_of, make_null, recoloured};

/// Deletes the element equivalent to `value` below `link`.
///
/// Returns `None` when there is no such element. The root of the result may
/// be double black; the caller blackens it.
pub(crate) fn find_delete<T: Clone, C: Comparator<T>>(
    link: &Link<T>,
    value: &T,
    compare: &C,
) -> Option<Link<T>> {
    let node = link.as_ref()?;
    let colour = colour_of(link);

    if compare.less(value, node.value()) {
        let left = find_delete(node.left(), value, compare)?;
        Some(bubble(
            colour,
            node.value().clone(),
            left,
            node.right().clone(),
        ))
    } else if compare.less(node.value(), value) {
        let right = find_delete(node.right(), value, compare)?;
        Some(bubble(
            colour,
            node.value().clone(),
            node.left().clone(),
            right,
        ))
    } else {
        Some(remove_node(node, colour))
    }
}

/// Removes `node`, reached through an edge of `colour`, and returns what
/// replaces it.
pub(crate) fn remove_node<T: Clone>(node: &TreeNode<T>, colour: Colour) -> Link<T> {
    match (node.left().as_ref(), node.right().as_ref()) {
        (None, None) => make_null(colour + Colour::Black),
        (Some(_), None) => absorb(node.left(), colour),
        (None, Some(_)) => absorb(node.right(), colour),
        (Some(left), Some(_)) => {
            let (maximum, left) = remove_max(left, colour_of(node.left()));
            bubble(colour, maximum, left, node.right().clone())
        }
    }
}

/// A lone child takes its parent's place and its black level.
fn absorb<T>(child: &Link<T>, colour: Colour) -> Link<T> {
    recoloured(child, colour_of(child) + colour)
}

/// Removes the maximum of the subtree rooted at `node`.
///
/// Returns the removed value and the replacement subtree.
pub(crate) fn remove_max<T: Clone>(node: &TreeNode<T>, colour: Colour) -> (T, Link<T>) {
    match node.right().as_ref() {
        None => (node.value().clone(), remove_node(node, colour)),
        Some(right) => {
            let (maximum, right) = remove_max(right, colour_of(node.right()));
            let subtree = bubble(colour, node.value().clone(), node.left().clone(), right);
            (maximum, subtree)
        }
    }
}

/// Builds `T(colour: left, value, right)`, moving a double black from
/// either child up into the new node.
pub(crate) fn bubble<T: Clone>(colour: Colour, value: T, left: Link<T>, right: Link<T>) -> Link<T> {
    if colour_of(&left) == Colour::DoubleBlack || colour_of(&right) == Colour::DoubleBlack {
        let left_colour = colour_of(&left).redder();
        let right_colour = colour_of(&right).redder();
        bubble_balance(
            colour.blacker(),
            value,
            left.with_tag(left_colour.tag()),
            right.with_tag(right_colour.tag()),
        )
    } else {
        bubble_balance(colour, value, left, right)
    }
}

// =============================================================================
// Tests
// =============================================================================
