//! Path-copying insertion.

use super::balance::balance;
use super::colour::Colour;
use super::compare::Comparator;
use super::node::{Link, colour_of, make_node, make_null};

/// The outcome of inserting below one link.
pub(crate) struct Inserted<T> {
    /// The rebuilt subtree, or the original link when nothing changed.
    pub(crate) subtree: Link<T>,
    /// The node holding the inserted value, or the existing equivalent one.
    pub(crate) node: Link<T>,
    pub(crate) inserted: bool,
}

/// Inserts `value` below `link`, copying only the search path.
///
/// The root of the result may be red; the caller blackens it.
pub(crate) fn insert<T: Clone, C: Comparator<T>>(
    link: &Link<T>,
    value: T,
    compare: &C,
) -> Inserted<T> {
    let Some(node) = link.as_ref() else {
        let fresh = make_node(
            value,
            Colour::Red,
            make_null(Colour::Black),
            make_null(Colour::Black),
        );
        return Inserted {
            subtree: fresh.clone(),
            node: fresh,
            inserted: true,
        };
    };
    let colour = colour_of(link);

    if compare.less(&value, node.value()) {
        let below = insert(node.left(), value, compare);
        if !below.inserted {
            return unchanged(link, below.node);
        }
        let (subtree, tracked) = balance(
            colour,
            node.value().clone(),
            below.subtree,
            node.right().clone(),
            below.node,
        );
        Inserted {
            subtree,
            node: tracked,
            inserted: true,
        }
    } else if compare.less(node.value(), &value) {
        let below = insert(node.right(), value, compare);
        if !below.inserted {
            return unchanged(link, below.node);
        }
        let (subtree, tracked) = balance(
            colour,
            node.value().clone(),
            node.left().clone(),
            below.subtree,
            below.node,
        );
        Inserted {
            subtree,
            node: tracked,
            inserted: true,
        }
    } else {
        unchanged(link, link.clone())
    }
}

fn unchanged<T>(link: &Link<T>, node: Link<T>) -> Inserted<T> {
    Inserted {
        subtree: link.clone(),
        node,
        inserted: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::redblack::compare::Less;
    use crate::persistent::redblack::node::{TreeNode, make_black};
    use rstest::rstest;

    fn build(values: &[i32]) -> Link<i32> {
        values.iter().fold(Link::null(), |root, &value| {
            let Inserted { subtree, .. } = insert(&root, value, &Less);
            make_black(subtree)
        })
    }

    #[rstest]
    fn test_insert_into_leaf_makes_red_node() {
        let result = insert(&Link::null(), 7, &Less);
        assert!(result.inserted);
        assert_eq!(colour_of(&result.subtree), Colour::Red);
        assert!(result.node.ptr_eq(&result.subtree));
        assert_eq!(result.node.as_ref().map(TreeNode::value), Some(&7));
    }

    #[rstest]
    fn test_duplicate_returns_same_subtree_and_existing_node() {
        let root = build(&[2, 1, 3]);
        let result = insert(&root, 3, &Less);
        assert!(!result.inserted);
        assert!(result.subtree.ptr_eq(&root));
        assert_eq!(result.subtree.tag(), root.tag());
        assert_eq!(result.node.as_ref().map(TreeNode::value), Some(&3));
    }

    #[rstest]
    #[case(&[1, 2], 3)]
    #[case(&[3, 2], 1)]
    #[case(&[1, 3], 2)]
    #[case(&[5, 1, 9, 0, 3], 2)]
    fn test_node_tracks_inserted_value_through_rotations(
        #[case] existing: &[i32],
        #[case] last: i32,
    ) {
        let root = build(existing);
        let result = insert(&root, last, &Less);
        assert!(result.inserted);
        assert_eq!(result.node.as_ref().map(TreeNode::value), Some(&last));

        // The tracked node is reachable from the new root.
        let found = result
            .subtree
            .as_ref()
            .and_then(|node| node.find(&last, &Less))
            .map(std::ptr::from_ref);
        assert_eq!(found, result.node.as_ref().map(std::ptr::from_ref));
    }

    #[rstest]
    fn test_original_is_untouched() {
        let root = build(&[1, 2]);
        let result = insert(&root, 3, &Less);
        let original: Vec<i32> = collect(&root);
        assert_eq!(original, vec![1, 2]);
        assert_eq!(collect(&result.subtree), vec![1, 2, 3]);
    }

    fn collect(link: &Link<i32>) -> Vec<i32> {
        fn walk(link: &Link<i32>, out: &mut Vec<i32>) {
            if let Some(node) = link.as_ref() {
                walk(node.left(), out);
                out.push(*node.value());
                walk(node.right(), out);
            }
        }
        let mut out = Vec::new();
        walk(link, &mut out);
        out
    }
}
