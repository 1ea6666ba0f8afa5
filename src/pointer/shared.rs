#![allow(unsafe_code)]
//! An owning, intrusively reference-counted tagged pointer.
//!
//! # Safety
//!
//! A non-null [`SharedTaggedPointer`] always holds one reference on its
//! pointee, recorded in the pointee's [`RefCount`](super::RefCount). The
//! pointee was allocated through `Box`, and is freed through `Box` by the
//! handle whose drop brings the count to zero. Pointees are only ever
//! reached through `&T`: no handle hands out `&mut T` unless it is the sole
//! owner ([`try_unwrap`](SharedTaggedPointer::try_unwrap)).

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

use super::refcount::RefCounted;
use super::tagged::{TagError, TaggedPointer};
use crate::tracing_helpers::trace_log;

/// A shared handle to a reference-counted `T` with a tag in its spare bits.
///
/// Each handle carries its own tag: retagging a handle never affects other
/// handles to the same object, nor the object itself.
///
/// Equality compares the whole bit pattern, so handles to the same object
/// with different tags are not equal; [`ptr_eq`](Self::ptr_eq) compares
/// identity only.
pub struct SharedTaggedPointer<T: RefCounted> {
    pointer: TaggedPointer<T>,
    owns: PhantomData<T>,
}

// SAFETY: handles on several threads may drop the pointee from any of them
// (needs `T: Send`) and give out `&T` concurrently (needs `T: Sync`). The
// count itself is only thread-safe when `T: Sync`, which a non-atomic
// `RefCount` rules out.
unsafe impl<T: RefCounted + Send + Sync> Send for SharedTaggedPointer<T> {}
// SAFETY: see above.
unsafe impl<T: RefCounted + Send + Sync> Sync for SharedTaggedPointer<T> {}

impl<T: RefCounted> SharedTaggedPointer<T> {
    /// Allocates `value` and returns the first handle to it, with tag `0`.
    #[inline]
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::from_box(Box::new(value))
    }

    /// Takes ownership of a boxed value.
    ///
    /// The value's count is expected to be zero; the returned handle is its
    /// first owner.
    #[must_use]
    pub fn from_box(value: Box<T>) -> Self {
        debug_assert_eq!(value.reference_count(), 0, "boxed value is already owned");
        // SAFETY: the pointer comes straight from `Box::into_raw`.
        unsafe { Self::from_raw(Box::into_raw(value)) }
    }

    /// Adopts a raw pointer, adding one reference to its pointee.
    ///
    /// # Safety
    ///
    /// `pointer` must be null or point to a live `T` allocated through
    /// `Box`, whose reference count accounts for every other live handle.
    #[must_use]
    pub unsafe fn from_raw(pointer: *mut T) -> Self {
        let pointer = TaggedPointer::new(pointer);
        // SAFETY: upheld by the caller.
        if let Some(pointee) = unsafe { pointer.as_ref() } {
            pointee.add_reference();
        }
        Self {
            pointer,
            owns: PhantomData,
        }
    }

    /// Creates a null handle with tag `0`.
    #[inline]
    #[must_use]
    pub const fn null() -> Self {
        Self {
            pointer: TaggedPointer::null(),
            owns: PhantomData,
        }
    }

    /// Creates a null handle carrying `tag`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `tag` does not fit the alignment of `T`.
    #[inline]
    #[must_use]
    pub fn null_with_tag(tag: usize) -> Self {
        Self {
            pointer: TaggedPointer::null_with_tag(tag),
            owns: PhantomData,
        }
    }

    /// Returns the tag carried by this handle.
    #[inline]
    #[must_use]
    pub fn tag(&self) -> usize {
        self.pointer.tag()
    }

    /// Replaces the tag carried by this handle.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `tag` does not fit the alignment of `T`.
    #[inline]
    pub fn set_tag(&mut self, tag: usize) {
        self.pointer.set_tag(tag);
    }

    /// Replaces the tag after checking that it fits.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::InvalidTag`] if `tag` does not fit the alignment of `T`.
    #[inline]
    pub fn try_set_tag(&mut self, tag: usize) -> Result<(), TagError> {
        self.pointer.try_set_tag(tag)
    }

    /// Returns this handle carrying `tag` instead.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `tag` does not fit the alignment of `T`.
    #[inline]
    #[must_use]
    pub fn with_tag(mut self, tag: usize) -> Self {
        self.set_tag(tag);
        self
    }

    /// Returns `true` if this handle points nowhere, whatever its tag.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.pointer.is_null()
    }

    /// Returns the pointee, or `None` for a null handle.
    #[inline]
    #[must_use]
    pub fn as_ref(&self) -> Option<&T> {
        // SAFETY: a non-null handle keeps its pointee alive for as long as
        // the handle is borrowed, and pointees are never mutably aliased.
        unsafe { self.pointer.as_ref() }
    }

    /// Returns the untagged address of the pointee (null for a null handle).
    #[inline]
    #[must_use]
    pub fn as_ptr(&self) -> *const T {
        self.pointer.get().cast_const()
    }

    /// Returns `true` if both handles point to the same object (or are both
    /// null), ignoring tags.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.pointer.same_address(other.pointer)
    }

    /// Returns the number of handles sharing the pointee, or `0` when null.
    #[inline]
    #[must_use]
    pub fn reference_count(&self) -> usize {
        self.as_ref().map_or(0, RefCounted::reference_count)
    }

    /// Moves the pointee out if this is the only handle to it.
    ///
    /// # Errors
    ///
    /// Returns the handle unchanged if it is null or shared.
    pub fn try_unwrap(self) -> Result<T, Self> {
        let unique = self
            .as_ref()
            .is_some_and(|pointee| pointee.reference_count() == 1);
        if !unique {
            return Err(self);
        }
        let raw = self.pointer.get();
        std::mem::forget(self);
        // SAFETY: the count was one, so this handle was the only owner and
        // no other handle can appear; the allocation came from `Box`.
        let boxed = unsafe { Box::from_raw(raw) };
        boxed.remove_reference();
        Ok(*boxed)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T: RefCounted> Clone for SharedTaggedPointer<T> {
    #[inline]
    fn clone(&self) -> Self {
        if let Some(pointee) = self.as_ref() {
            pointee.add_reference();
        }
        Self {
            pointer: self.pointer,
            owns: PhantomData,
        }
    }
}

impl<T: RefCounted> Drop for SharedTaggedPointer<T> {
    fn drop(&mut self) {
        let Some(pointee) = self.as_ref() else {
            return;
        };
        if pointee.remove_reference() == 0 {
            trace_log!(address = ?self.pointer.get(), "freeing shared pointee");
            // SAFETY: the count reached zero, so no other handle exists;
            // the allocation came from `Box`.
            unsafe { drop(Box::from_raw(self.pointer.get())) };
        }
    }
}

impl<T: RefCounted> Default for SharedTaggedPointer<T> {
    #[inline]
    fn default() -> Self {
        Self::null()
    }
}

impl<T: RefCounted> Deref for SharedTaggedPointer<T> {
    type Target = T;

    /// # Panics
    ///
    /// Panics if the handle is null.
    #[inline]
    fn deref(&self) -> &T {
        match self.as_ref() {
            Some(pointee) => pointee,
            None => panic!("dereferenced a null SharedTaggedPointer"),
        }
    }
}

impl<T: RefCounted> PartialEq for SharedTaggedPointer<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.pointer == other.pointer
    }
}

impl<T: RefCounted> Eq for SharedTaggedPointer<T> {}

impl<T: RefCounted> fmt::Debug for SharedTaggedPointer<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SharedTaggedPointer")
            .field("address", &self.as_ptr())
            .field("tag", &self.tag())
            .field("references", &self.reference_count())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
