#![allow(unsafe_code)]
//! Intrusive reference counting.
//!
//! The count lives inside the counted object: a type embeds a [`RefCount`]
//! and implements [`RefCounted`] to expose it. With the `arc` feature the
//! counter is atomic and counted objects may be shared between threads;
//! without it the counter is a plain [`Cell`](std::cell::Cell), which makes
//! the embedding type `!Sync`.

#[cfg(all(feature = "arc", loom))]
use loom::sync::atomic::{AtomicUsize, Ordering, fence};
#[cfg(all(feature = "arc", not(loom)))]
use std::sync::atomic::{AtomicUsize, Ordering, fence};

#[cfg(not(feature = "arc"))]
use std::cell::Cell;

use std::fmt;

/// Counts above this are treated as a leak in progress and abort the process.
const MAX_REFERENCE_COUNT: usize = isize::MAX as usize;

/// An intrusive reference counter.
///
/// A fresh counter starts at zero: the first owning handle created for the
/// object bumps it to one. Cloning a counted object yields a *new* object,
/// so `Clone` produces a fresh zero counter rather than copying the count.
pub struct RefCount {
    #[cfg(feature = "arc")]
    counter: AtomicUsize,
    #[cfg(not(feature = "arc"))]
    counter: Cell<usize>,
}

impl RefCount {
    /// Creates a counter at zero.
    #[cfg(all(feature = "arc", not(loom)))]
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counter: AtomicUsize::new(0),
        }
    }

    /// Creates a counter at zero.
    #[cfg(all(feature = "arc", loom))]
    #[must_use]
    pub fn new() -> Self {
        Self {
            counter: AtomicUsize::new(0),
        }
    }

    /// Creates a counter at zero.
    #[cfg(not(feature = "arc"))]
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counter: Cell::new(0),
        }
    }

    /// Increments the count and returns the new value.
    ///
    /// Aborts the process if the count would exceed `isize::MAX`.
    #[cfg(feature = "arc")]
    #[inline]
    pub fn increment(&self) -> usize {
        // A new reference can only be made from an existing one, which
        // already synchronises with the pointee.
        let previous = self.counter.fetch_add(1, Ordering::Relaxed);
        if previous >= MAX_REFERENCE_COUNT {
            std::process::abort();
        }
        previous + 1
    }

    /// Decrements the count and returns the new value.
    ///
    /// When this returns zero, every access made through other references
    /// happens-before the return, so the caller may destroy the object.
    #[cfg(feature = "arc")]
    #[inline]
    pub fn decrement(&self) -> usize {
        let previous = self.counter.fetch_sub(1, Ordering::Release);
        debug_assert!(previous > 0, "reference count underflow");
        if previous == 1 {
            fence(Ordering::Acquire);
        }
        previous - 1
    }

    /// Returns the current count.
    #[cfg(feature = "arc")]
    #[inline]
    pub fn get(&self) -> usize {
        self.counter.load(Ordering::Acquire)
    }

    /// Increments the count and returns the new value.
    ///
    /// Aborts the process if the count would exceed `isize::MAX`.
    #[cfg(not(feature = "arc"))]
    #[inline]
    pub fn increment(&self) -> usize {
        let previous = self.counter.get();
        if previous >= MAX_REFERENCE_COUNT {
            std::process::abort();
        }
        self.counter.set(previous + 1);
        previous + 1
    }

    /// Decrements the count and returns the new value.
    #[cfg(not(feature = "arc"))]
    #[inline]
    pub fn decrement(&self) -> usize {
        let previous = self.counter.get();
        debug_assert!(previous > 0, "reference count underflow");
        self.counter.set(previous - 1);
        previous - 1
    }

    /// Returns the current count.
    #[cfg(not(feature = "arc"))]
    #[inline]
    pub fn get(&self) -> usize {
        self.counter.get()
    }
}

impl Default for RefCount {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RefCount {
    #[inline]
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl fmt::Debug for RefCount {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("RefCount").field(&self.get()).finish()
    }
}

/// An object that carries its own reference count.
///
/// [`SharedTaggedPointer`](super::SharedTaggedPointer) calls
/// [`add_reference`](Self::add_reference) when a handle is created or
/// cloned and [`remove_reference`](Self::remove_reference) when a handle is
/// dropped, freeing the object once the latter returns zero.
///
/// # Safety
///
/// `ref_count` must return the same counter for the whole lifetime of the
/// object, and nothing but owning handles may change that counter. A wrong
/// count frees the object while handles to it still exist.
pub unsafe trait RefCounted {
    /// Returns the embedded counter.
    fn ref_count(&self) -> &RefCount;

    /// Adds a reference and returns the new count.
    #[inline]
    fn add_reference(&self) -> usize {
        self.ref_count().increment()
    }

    /// Removes a reference and returns the new count.
    #[inline]
    fn remove_reference(&self) -> usize {
        self.ref_count().decrement()
    }

    /// Returns the number of owning handles currently referencing the object.
    #[inline]
    fn reference_count(&self) -> usize {
        self.ref_count().get()
    }
}

/// Implements [`RefCounted`] for a type by forwarding to one of its
/// [`RefCount`] fields.
///
/// The field is the only counter the type exposes and nothing else touches
/// it, which is what the trait's safety contract asks for.
macro_rules! impl_ref_counted {
    ($node:ident < $($param:ident),+ >, $field:ident) => {
        // SAFETY: `$field` is a `RefCount` owned by the value for its whole
        // lifetime and is only changed through owning handles.
        #[allow(unsafe_code)]
        unsafe impl<$($param),+> $crate::pointer::RefCounted for $node<$($param),+> {
            #[inline]
            fn ref_count(&self) -> &$crate::pointer::RefCount {
                &self.$field
            }
        }
    };
    ($node:ident, $field:ident) => {
        // SAFETY: as above.
        #[allow(unsafe_code)]
        unsafe impl $crate::pointer::RefCounted for $node {
            #[inline]
            fn ref_count(&self) -> &$crate::pointer::RefCount {
                &self.$field
            }
        }
    };
}

pub(crate) use impl_ref_counted;

// =============================================================================
// Tests
// =============================================================================

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;
    use rstest::rstest;

    struct Counted {
        count: RefCount,
    }

    impl_ref_counted!(Counted, count);

    struct Pair<A, B> {
        count: RefCount,
        first: A,
        second: B,
    }

    impl_ref_counted!(Pair<A, B>, count);

    #[rstest]
    fn test_new_count_is_zero() {
        assert_eq!(RefCount::new().get(), 0);
        assert_eq!(RefCount::default().get(), 0);
    }

    #[rstest]
    fn test_increment_and_decrement_return_new_count() {
        let count = RefCount::new();
        assert_eq!(count.increment(), 1);
        assert_eq!(count.increment(), 2);
        assert_eq!(count.decrement(), 1);
        assert_eq!(count.decrement(), 0);
    }

    #[rstest]
    fn test_clone_starts_fresh() {
        let count = RefCount::new();
        count.increment();
        count.increment();
        assert_eq!(count.clone().get(), 0);
        assert_eq!(count.get(), 2);
    }

    #[rstest]
    fn test_trait_forwards_to_counter() {
        let counted = Counted {
            count: RefCount::new(),
        };
        assert_eq!(counted.add_reference(), 1);
        assert_eq!(counted.add_reference(), 2);
        assert_eq!(counted.reference_count(), 2);
        assert_eq!(counted.remove_reference(), 1);
    }

    #[rstest]
    fn test_generic_impl_forwards_to_field() {
        let pair = Pair {
            count: RefCount::new(),
            first: 1_u8,
            second: "two",
        };
        assert_eq!(pair.add_reference(), 1);
        assert_eq!(pair.reference_count(), 1);
        assert_eq!(pair.remove_reference(), 0);
        assert_eq!((pair.first, pair.second), (1, "two"));
    }

    #[rstest]
    fn test_debug_shows_count() {
        let count = RefCount::new();
        count.increment();
        assert_eq!(format!("{count:?}"), "RefCount(1)");
    }
}
