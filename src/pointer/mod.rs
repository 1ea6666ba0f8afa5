//! Low-level pointer primitives.
//!
//! - [`TaggedPointer`]: a raw pointer carrying a small integer in the
//!   alignment bits of its address.
//! - [`RefCounted`] / [`RefCount`]: intrusive reference counting, the count
//!   being stored inside the pointee.
//! - [`SharedTaggedPointer`]: an owning, reference-counted handle built from
//!   the two above. Every copy of the handle carries its own tag.
//!
//! # Alignment precondition
//!
//! A pointer to `T` can only carry tags strictly below `align_of::<T>()`.
//! Types meant to carry a 2-bit tag should be declared with
//! `#[repr(align(4))]` (or be naturally aligned to at least 4 bytes).
//!
//! # Examples
//!
//! ```rust
//! # #![allow(unsafe_code)]
//! use persistent_fds::pointer::{RefCount, RefCounted, SharedTaggedPointer};
//!
//! #[repr(align(4))]
//! struct Counted {
//!     count: RefCount,
//!     value: i32,
//! }
//!
//! // SAFETY: every call forwards to the single embedded counter.
//! unsafe impl RefCounted for Counted {
//!     fn ref_count(&self) -> &RefCount {
//!         &self.count
//!     }
//! }
//!
//! let mut pointer = SharedTaggedPointer::new(Counted { count: RefCount::new(), value: 5 });
//! pointer.set_tag(2);
//!
//! let copy = pointer.clone();
//! assert_eq!(copy.tag(), 2);
//! assert_eq!(copy.value, 5);
//! assert_eq!(pointer.reference_count(), 2);
//! ```

mod refcount;
mod shared;
mod tagged;

pub(crate) use refcount::impl_ref_counted;
pub use refcount::RefCount;
pub use refcount::RefCounted;
pub use shared::SharedTaggedPointer;
pub use tagged::TagError;
pub use tagged::TaggedPointer;
