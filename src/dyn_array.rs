mod array;
mod header;

pub use array::DynArray;
pub use header::Header;
