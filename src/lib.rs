//! # Dynamic Array
//!
//! The `dyn_array` crate provides a `#[no_std]` growable array, `DynArray`, for code that
//! cares about where its memory goes. Instead of keeping the length and capacity next to the
//! pointer like `std::Vec`, `DynArray` stores them in a small header at the front of its own
//! allocation, right before the first element. The array value on the stack is then just a
//! pointer to the elements.
//!
//! The header holds four words: the element stride, the element count, the byte count
//! (always `count * stride`), and the capacity. `DynArray::header()` exposes it, and for a
//! pointer obtained with `DynArray::into_raw_parts()` the same header can be read back with
//! `DynArray::header_of()`.
//!
//! Capacity starts half again above the requested count and grows by a factor of 1.5 when it
//! runs out. It never drops below one slot. Resizing below the current length drops the
//! elements that no longer fit.
//!
//! Running out of memory or misusing an index is fatal by default. Every such operation also
//! has a `try_` form returning a `DynArrErr`, and the index based ones have `unsafe`
//! unchecked forms whose bounds are only checked in debug builds.
//!
//! Since the allocator API is not stable yet, memory comes from any type implementing the
//! `AltAllocator` trait.
//!
//! # Feature Flags
//! * `std_alloc` - Enables `Global`, a wrapper implementing `AltAllocator` with the standard
//! allocator, along with `DynArray::new()` and `DynArray::with_capacity()`.
//!
//! * `experimental_allocator` - Uses the unstable `Allocator` trait for custom memory
//! allocators. Together with `std_alloc` this re-exports `Global` from the `std` crate instead
//! of the wrapper defined here.
//!
//! * `alloc_api2` - Any allocator implementing the `allocator-api2` crate's `Allocator` trait
//! can be used.
//!
//! * `checked_release` - Keeps the bounds checks of the `unsafe` unchecked operations even when
//! `debug_assertions` are off. Without it (or the `release-checked` profile), breaking their
//! preconditions in a release build is undefined behavior.
//!
//! * `log` - Emits `trace` records through the `log` crate whenever a block is allocated,
//! moved, or released.

#![no_std]
#![cfg_attr(feature = "experimental_allocator", feature(allocator_api))]

#[cfg(any(feature = "std_alloc", test))]
extern crate std;

#[macro_use]
mod macros;

pub mod alloc;
mod dyn_array;
pub mod types;

pub use dyn_array::DynArray;
pub use dyn_array::Header;
