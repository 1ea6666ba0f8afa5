#![allow(unsafe_code)]
//! A raw pointer with a small integer packed into its alignment bits.
//!
//! Every pointer to a `T` is a multiple of `align_of::<T>()`, so its
//! `log2(align_of::<T>())` low bits are always zero. [`TaggedPointer`] stores
//! a tag in those bits and masks them off again before the pointer is used.
//!
//! # Safety
//!
//! The pointer keeps its provenance: tag bits are applied with
//! [`pointer::map_addr`](https://doc.rust-lang.org/std/primitive.pointer.html#method.map_addr)
//! and removed the same way, so the untagged pointer handed out by
//! [`TaggedPointer::get`] is the one originally stored.
//!
//! A null pointer may still carry a tag. It never points anywhere:
//! [`TaggedPointer::get`] returns null for it regardless of the tag.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem::align_of;
use std::ptr;

/// Error returned when a tag does not fit in the pointee's alignment bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagError {
    /// The tag is not strictly below the alignment of the pointee.
    InvalidTag {
        /// The rejected tag.
        tag: usize,
        /// Number of distinct tags the pointer can carry (the pointee's alignment).
        capacity: usize,
    },
}

impl fmt::Display for TagError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTag { tag, capacity } => write!(
                formatter,
                "tag {tag} does not fit: the pointee's alignment leaves room for {capacity} tag values"
            ),
        }
    }
}

impl std::error::Error for TagError {}

/// A raw pointer to `T` with a tag stored in its low bits.
///
/// Equality compares the whole bit pattern: two pointers to the same object
/// carrying different tags are *not* equal. Use
/// [`same_address`](Self::same_address) to compare identity only.
///
/// # Examples
///
/// ```rust
/// # #![allow(unsafe_code)]
/// use persistent_fds::pointer::TaggedPointer;
///
/// let raw = Box::into_raw(Box::new(5_u32));
/// let mut pointer = TaggedPointer::new(raw);
/// pointer.set_tag(3);
///
/// assert_eq!(pointer.tag(), 3);
/// assert_eq!(pointer.get(), raw);
/// assert!(pointer != TaggedPointer::new(raw));
/// assert!(pointer.same_address(TaggedPointer::new(raw)));
///
/// # unsafe { drop(Box::from_raw(pointer.get())) };
/// ```
pub struct TaggedPointer<T> {
    raw: *mut T,
}

impl<T> TaggedPointer<T> {
    /// Number of distinct tag values a pointer to `T` can carry.
    pub const TAG_CAPACITY: usize = align_of::<T>();

    /// Mask selecting the tag bits of the address.
    pub const TAG_MASK: usize = align_of::<T>() - 1;

    /// Creates a null pointer with tag `0`.
    #[inline]
    #[must_use]
    pub const fn null() -> Self {
        Self {
            raw: ptr::null_mut(),
        }
    }

    /// Wraps `pointer` with tag `0`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `pointer` is not aligned for `T`.
    #[inline]
    #[must_use]
    pub fn new(pointer: *mut T) -> Self {
        debug_assert_eq!(
            pointer.addr() & Self::TAG_MASK,
            0,
            "pointer is not aligned for its pointee"
        );
        Self { raw: pointer }
    }

    /// Creates a null pointer carrying `tag`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `tag >= TAG_CAPACITY`.
    #[inline]
    #[must_use]
    pub fn null_with_tag(tag: usize) -> Self {
        Self::null().with_tag(tag)
    }

    /// Returns the pointer with the tag bits cleared. May be null.
    #[inline]
    #[must_use]
    pub fn get(self) -> *mut T {
        self.raw.map_addr(|address| address & !Self::TAG_MASK)
    }

    /// Returns the tag.
    #[inline]
    #[must_use]
    pub fn tag(self) -> usize {
        self.raw.addr() & Self::TAG_MASK
    }

    /// Replaces the tag, leaving the pointer untouched.
    ///
    /// The caller is responsible for `tag < TAG_CAPACITY`. Release builds
    /// keep only the bits that fit; use [`try_set_tag`](Self::try_set_tag)
    /// to have the value validated instead.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `tag >= TAG_CAPACITY`.
    #[inline]
    pub fn set_tag(&mut self, tag: usize) {
        debug_assert!(
            tag < Self::TAG_CAPACITY,
            "tag {tag} exceeds the {} values allowed by the pointee's alignment",
            Self::TAG_CAPACITY
        );
        self.raw = self
            .raw
            .map_addr(|address| (address & !Self::TAG_MASK) | (tag & Self::TAG_MASK));
    }

    /// Replaces the tag after checking that it fits.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::InvalidTag`] if `tag >= TAG_CAPACITY`; the pointer
    /// is left unchanged.
    pub fn try_set_tag(&mut self, tag: usize) -> Result<(), TagError> {
        if tag >= Self::TAG_CAPACITY {
            return Err(TagError::InvalidTag {
                tag,
                capacity: Self::TAG_CAPACITY,
            });
        }
        self.set_tag(tag);
        Ok(())
    }

    /// Returns a copy of this pointer carrying `tag`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `tag >= TAG_CAPACITY`.
    #[inline]
    #[must_use]
    pub fn with_tag(mut self, tag: usize) -> Self {
        self.set_tag(tag);
        self
    }

    /// Returns `true` if the untagged pointer is null, whatever the tag.
    #[inline]
    #[must_use]
    pub fn is_null(self) -> bool {
        self.get().is_null()
    }

    /// Returns `true` if both pointers address the same object, ignoring tags.
    #[inline]
    #[must_use]
    pub fn same_address(self, other: Self) -> bool {
        ptr::eq(self.get(), other.get())
    }

    /// Returns a shared reference to the pointee, or `None` if null.
    ///
    /// # Safety
    ///
    /// When non-null, the pointer must point to a live `T` for the whole of
    /// `'a`, and no mutable reference to it may exist during that time.
    #[inline]
    #[must_use]
    pub unsafe fn as_ref<'a>(self) -> Option<&'a T> {
        // SAFETY: upheld by the caller.
        unsafe { self.get().as_ref() }
    }

    /// Returns a mutable reference to the pointee, or `None` if null.
    ///
    /// # Safety
    ///
    /// When non-null, the pointer must point to a live `T` for the whole of
    /// `'a`, and no other reference to it may exist during that time.
    #[inline]
    #[must_use]
    pub unsafe fn as_mut<'a>(self) -> Option<&'a mut T> {
        // SAFETY: upheld by the caller.
        unsafe { self.get().as_mut() }
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Clone for TaggedPointer<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TaggedPointer<T> {}

impl<T> Default for TaggedPointer<T> {
    #[inline]
    fn default() -> Self {
        Self::null()
    }
}

impl<T> PartialEq for TaggedPointer<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.raw.addr() == other.raw.addr()
    }
}

impl<T> Eq for TaggedPointer<T> {}

impl<T> Hash for TaggedPointer<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.addr().hash(state);
    }
}

impl<T> fmt::Debug for TaggedPointer<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("TaggedPointer")
            .field("address", &self.get())
            .field("tag", &self.tag())
            .finish()
    }
}

impl<T> From<*mut T> for TaggedPointer<T> {
    #[inline]
    fn from(pointer: *mut T) -> Self {
        Self::new(pointer)
    }
}

// =============================================================================
// Tests
// =============================================================================
