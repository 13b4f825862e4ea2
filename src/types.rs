//! Error types returned by the fallible `DynArray` operations.

mod errors;

pub use errors::*;
