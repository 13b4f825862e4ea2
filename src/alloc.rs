//! Allocator plumbing used by `DynArray`. The important pieces are the
//! `AltAllocator` trait and the `AllocError` type.
//!
//! With the `experimental_allocator` feature every type implementing the
//! nightly `Allocator` trait is an `AltAllocator`. With `alloc_api2` the same
//! holds for the `allocator-api2` crate's `Allocator` trait.
//!
//! The `std_alloc` feature adds `Global`, a thin wrapper over the standard
//! global allocator (or the nightly `Global` itself when
//! `experimental_allocator` is also enabled).

#[cfg(all(feature = "alloc_api2", not(feature = "experimental_allocator")))]
mod alloc_api2;
#[cfg(feature = "experimental_allocator")]
mod alloc_unstable;
mod alt_alloc;
#[cfg(feature = "std_alloc")]
mod std_alloc;

#[cfg(feature = "experimental_allocator")]
pub use core::alloc::AllocError;

#[cfg(not(feature = "experimental_allocator"))]
pub use alloc_error::AllocError;
pub use alt_alloc::AltAllocator;
#[cfg(feature = "std_alloc")]
pub use std_alloc::Global;

#[cfg(not(feature = "experimental_allocator"))]
mod alloc_error {
    use core::error::Error;
    use core::fmt;

    /// Returned by an `AltAllocator` when it could not hand out memory.
    ///
    /// With the `experimental_allocator` feature this is the allocator API's
    /// own `AllocError` instead.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct AllocError;

    impl Error for AllocError {}

    impl fmt::Display for AllocError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("The allocator could not provide the requested block.")
        }
    }
}
