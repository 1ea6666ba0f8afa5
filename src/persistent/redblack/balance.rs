//! Rebalancing of freshly built subtrees.
//!
//! [`balance`] is Okasaki's insertion rebalance, extended to double-black
//! parents so that deletion can share it. The four red-red shapes below a
//! black (or double-black) parent all rebuild into the same subtree:
//!
//! ```text
//!         y            (colour - black)
//!       /   \
//!      x     z         both black
//!     / \   / \
//!    a   b c   d
//! ```
//!
//! Since nodes are immutable, rotation never moves a node; it allocates new
//! ones. A caller tracking a node through the rebuild passes it as
//! `tracked` and gets back the node that replaced it.

use super::colour::Colour;
use super::node::{Link, TreeNode, black_node, colour_of, make_node, make_red, red_node};

/// Redirects `tracked` to `new` when it is the node `old` was built from.
fn redirect<T>(tracked: Link<T>, old: &Link<T>, new: &Link<T>) -> Link<T> {
    if !tracked.is_null() && tracked.ptr_eq(old) {
        new.clone()
    } else {
        tracked
    }
}

/// Builds the subtree `T(y: top, T(x: a, b), T(z: c, d))` with black children.
fn rebuild<T>(
    top: Colour,
    (a, x, b): (Link<T>, T, Link<T>),
    y: T,
    (c, z, d): (Link<T>, T, Link<T>),
) -> (Link<T>, Link<T>, Link<T>) {
    let left = make_node(x, Colour::Black, a, b);
    let right = make_node(z, Colour::Black, c, d);
    let root = make_node(y, top, left.clone(), right.clone());
    (root, left, right)
}

/// Builds `T(colour: left, value, right)`, resolving a red-red violation
/// directly below a black or double-black `colour`.
///
/// `tracked` may be null; otherwise the returned link is the node that now
/// stands for it.
pub(crate) fn balance<T: Clone>(
    colour: Colour,
    value: T,
    left: Link<T>,
    right: Link<T>,
    tracked: Link<T>,
) -> (Link<T>, Link<T>) {
    if !matches!(colour, Colour::Black | Colour::DoubleBlack) {
        return (make_node(value, colour, left, right), tracked);
    }
    let top = colour.redder();

    if let Some(child) = red_node(&left) {
        if let Some(grandchild) = red_node(child.left()) {
            // left-left
            let (root, new_left, _) = rebuild(
                top,
                owned_parts(grandchild),
                child.value().clone(),
                (child.right().clone(), value, right),
            );
            let tracked = redirect(tracked, child.left(), &new_left);
            let tracked = redirect(tracked, &left, &root);
            return (root, tracked);
        }
        if let Some(grandchild) = red_node(child.right()) {
            // left-right
            let (root, new_left, _) = rebuild(
                top,
                (
                    child.left().clone(),
                    child.value().clone(),
                    grandchild.left().clone(),
                ),
                grandchild.value().clone(),
                (grandchild.right().clone(), value, right),
            );
            let tracked = redirect(tracked, child.right(), &root);
            let tracked = redirect(tracked, &left, &new_left);
            return (root, tracked);
        }
    }

    if let Some(child) = red_node(&right) {
        if let Some(grandchild) = red_node(child.left()) {
            // right-left
            let (root, _, new_right) = rebuild(
                top,
                (left, value, grandchild.left().clone()),
                grandchild.value().clone(),
                (
                    grandchild.right().clone(),
                    child.value().clone(),
                    child.right().clone(),
                ),
            );
            let tracked = redirect(tracked, child.left(), &root);
            let tracked = redirect(tracked, &right, &new_right);
            return (root, tracked);
        }
        if let Some(grandchild) = red_node(child.right()) {
            // right-right
            let (root, _, new_right) = rebuild(
                top,
                (left, value, child.left().clone()),
                child.value().clone(),
                owned_parts(grandchild),
            );
            let tracked = redirect(tracked, child.right(), &new_right);
            let tracked = redirect(tracked, &right, &root);
            return (root, tracked);
        }
    }

    (make_node(value, colour, left, right), tracked)
}

fn owned_parts<T: Clone>(node: &TreeNode<T>) -> (Link<T>, T, Link<T>) {
    (node.left().clone(), node.value().clone(), node.right().clone())
}

/// [`balance`] plus the negative-black cases that deletion can produce
/// below a double-black parent.
///
/// ```text
///   T(DB, a, x, T(NB, T(B, b, y, c), z, d))
///     => T(B, T(B, a, x, b), y, balance(B, c, z, redden(d)))
///
///   T(DB, T(NB, a, w, T(B, b, x, c)), y, d)
///     => T(B, balance(B, redden(a), w, b), x, T(B, c, y, d))
/// ```
pub(crate) fn bubble_balance<T: Clone>(
    colour: Colour,
    value: T,
    left: Link<T>,
    right: Link<T>,
) -> Link<T> {
    if colour == Colour::DoubleBlack {
        if colour_of(&right) == Colour::NegativeBlack
            && let Some(sibling) = right.as_ref()
            && let Some(near) = black_node(sibling.left())
        {
            debug_assert!(
                black_node(sibling.right()).is_some(),
                "a negative-black node has black children"
            );
            let new_left = make_node(value, Colour::Black, left, near.left().clone());
            let (new_right, _) = balance(
                Colour::Black,
                sibling.value().clone(),
                near.right().clone(),
                make_red(sibling.right()),
                Link::null(),
            );
            return make_node(near.value().clone(), Colour::Black, new_left, new_right);
        }
        if colour_of(&left) == Colour::NegativeBlack
            && let Some(sibling) = left.as_ref()
            && let Some(near) = black_node(sibling.right())
        {
            debug_assert!(
                black_node(sibling.left()).is_some(),
                "a negative-black node has black children"
            );
            let (new_left, _) = balance(
                Colour::Black,
                sibling.value().clone(),
                make_red(sibling.left()),
                near.left().clone(),
                Link::null(),
            );
            let new_right = make_node(value, Colour::Black, near.right().clone(), right);
            return make_node(near.value().clone(), Colour::Black, new_left, new_right);
        }
    }
    balance(colour, value, left, right, Link::null()).0
}

// =============================================================================
// Tests
// =============================================================================
