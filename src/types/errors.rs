use core::error::Error;
use core::fmt;

/// What went wrong during a `DynArray` operation.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The requested element count does not fit in a `usize`.
    CapacityOverflow = 1,
    /// The block size in bytes does not fit in a `usize`.
    UsizeOverflow,
    LayoutFailure,
    AllocFailure,
    /// An index or span reached past the stored elements.
    IndexOutOfBounds,
}

/// A type alias for `Result<T, DynArrErr>`
pub type DynArrResult<T> = Result<T, DynArrErr>;

/// Returned by the fallible `try_*` operations of a `DynArray`.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DynArrErr(ErrorKind);

impl DynArrErr {
    pub(crate) const fn new(kind: ErrorKind) -> Self {
        return Self(kind);
    }
    pub const fn kind(self) -> ErrorKind {
        return self.0;
    }
}

impl From<ErrorKind> for DynArrErr {
    fn from(kind: ErrorKind) -> Self {
        return Self::new(kind);
    }
}

impl Error for DynArrErr {}

impl fmt::Display for DynArrErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            ErrorKind::CapacityOverflow => f.write_str("Element count overflowed."),
            ErrorKind::UsizeOverflow => f.write_str("Block size overflowed usize."),
            ErrorKind::LayoutFailure => f.write_str("Failed to create layout."),
            ErrorKind::AllocFailure => f.write_str("no memory to allocate array block."),
            ErrorKind::IndexOutOfBounds => f.write_str("array index out of bounds."),
        }
    }
}
