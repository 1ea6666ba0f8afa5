//! Structural invariant checking.

use std::error::Error;
use std::fmt;

use super::colour::Colour;
use super::compare::Comparator;
use super::cursor::Iter;
use super::node::{Link, colour_of, red_node};

/// A broken red-black tree invariant, reported by
/// [`RedBlackTree::check_invariants`](super::RedBlackTree::check_invariants).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The root edge is red.
    RedRoot,
    /// A double-black or negative-black edge survived an update.
    TransientColour(Colour),
    /// A leaf edge is red.
    RedLeaf,
    /// A red node has a red child.
    RedRed,
    /// The two subtrees of a node have different black heights.
    BlackHeight {
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
    /// An element does not order strictly after its in-order predecessor.
    Order,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedRoot => write!(formatter, "the root is red"),
            Self::TransientColour(colour) => {
                write!(formatter, "a {colour} edge remained after an update")
            }
            Self::RedLeaf => write!(formatter, "a leaf is red"),
            Self::RedRed => write!(formatter, "a red node has a red child"),
            Self::BlackHeight { left, right } => write!(
                formatter,
                "black heights differ: left subtree {left}, right subtree {right}"
            ),
            Self::Order => write!(formatter, "elements are not in strictly ascending order"),
        }
    }
}

impl Error for InvariantViolation {}

/// Checks every invariant of the tree under `root` and returns its black
/// height, counting the leaf level as one.
pub(crate) fn check<T, C: Comparator<T>>(
    root: &Link<T>,
    compare: &C,
) -> Result<usize, InvariantViolation> {
    match colour_of(root) {
        Colour::Black => {}
        Colour::Red => return Err(InvariantViolation::RedRoot),
        transient => return Err(InvariantViolation::TransientColour(transient)),
    }
    let height = black_height(root)?;

    let mut iter = Iter::new(root);
    if let Some(mut previous) = iter.next() {
        for value in iter {
            if !compare.less(previous, value) {
                return Err(InvariantViolation::Order);
            }
            previous = value;
        }
    }
    Ok(height)
}

fn black_height<T>(link: &Link<T>) -> Result<usize, InvariantViolation> {
    let colour = colour_of(link);
    if matches!(colour, Colour::DoubleBlack | Colour::NegativeBlack) {
        return Err(InvariantViolation::TransientColour(colour));
    }
    let Some(node) = link.as_ref() else {
        return if colour.is_red() {
            Err(InvariantViolation::RedLeaf)
        } else {
            Ok(1)
        };
    };
    if colour.is_red() && (red_node(node.left()).is_some() || red_node(node.right()).is_some()) {
        return Err(InvariantViolation::RedRed);
    }
    let left = black_height(node.left())?;
    let right = black_height(node.right())?;
    if left != right {
        return Err(InvariantViolation::BlackHeight { left, right });
    }
    Ok(left + usize::from(colour.is_black()))
}
