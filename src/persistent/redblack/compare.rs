//! Strict weak orderings used to arrange tree elements.

/// A strict weak ordering on `T`.
///
/// Two values are *equivalent* when neither is less than the other; the
/// tree keeps at most one element per equivalence class.
///
/// Any `Fn(&T, &T) -> bool` closure is a comparator, which makes custom
/// orderings a one-liner:
///
/// ```rust
/// use persistent_fds::persistent::RedBlackTree;
///
/// let descending = RedBlackTree::with_comparator(|a: &i32, b: &i32| a > b);
/// let (tree, _, _) = descending.insert(1);
/// let (tree, _, _) = tree.insert(3);
/// let (tree, _, _) = tree.insert(2);
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
/// ```
pub trait Comparator<T: ?Sized> {
    /// Returns `true` if `left` orders strictly before `right`.
    fn less(&self, left: &T, right: &T) -> bool;

    /// Returns `true` if neither value orders before the other.
    #[inline]
    fn equivalent(&self, left: &T, right: &T) -> bool {
        !self.less(left, right) && !self.less(right, left)
    }
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn less(&self, left: &T, right: &T) -> bool {
        self(left, right)
    }
}

/// The natural ascending order of an [`Ord`] type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Less;

impl<T: Ord + ?Sized> Comparator<T> for Less {
    #[inline]
    fn less(&self, left: &T, right: &T) -> bool {
        left < right
    }
}
