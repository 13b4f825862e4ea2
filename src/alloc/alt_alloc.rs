use core::alloc::Layout;
use core::ptr::NonNull;

use super::AllocError;

/// Source of the blocks a `DynArray` lives in.
///
/// A block is one allocation holding the array's `Header` followed by its
/// element slots. Its layout is `HEADER_OFFSET + capacity * stride` bytes
/// aligned to the larger of the header's and the element's alignment, and
/// that alignment never changes over the life of an array; only the size
/// does. The array keeps no pointer to the start of the block, it finds it
/// by stepping back from the payload, so every method here works in terms of
/// the block start and the array redoes the offset afterwards.
///
/// The trait has the shape of the unstable `Allocator` API so that any
/// allocator already written against it (or against `allocator-api2`) can
/// be bridged in, and implementors must uphold the same safety rules:
/// <https://doc.rust-lang.org/std/alloc/trait.Allocator.html>
pub unsafe trait AltAllocator {
    /// Hands out a fresh block for `layout`. The contents are uninitialized;
    /// the array writes the header itself.
    ///
    /// Returns an `AllocError` if the block cannot be provided, which the
    /// array reports as `ErrorKind::AllocFailure`.
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError>;

    /// Releases the block starting at `ptr`.
    ///
    /// Called once per block when the array is dropped. `layout` is rebuilt
    /// from the capacity recorded in the header, so it is always the layout
    /// of the most recent `allocate`, `grow` or `shrink` for this block.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Moves the block starting at `old_ptr` into one with more element
    /// slots.
    ///
    /// The first `old_layout.size()` bytes must come across unchanged: they
    /// hold the header and every live element, and the array reads them
    /// back at the same offsets from the returned pointer. On failure the
    /// old block is untouched and the array carries on with it. On success
    /// the old pointer is dead.
    ///
    /// The provided version allocates, copies and frees. Allocators that can
    /// extend in place should override it.
    unsafe fn grow(
        &self,
        old_ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        let new = self.allocate(new_layout)?;
        let ptr = new.cast::<u8>();

        unsafe { ptr.copy_from_nonoverlapping(old_ptr, old_layout.size()) };
        unsafe { self.deallocate(old_ptr, old_layout) };
        return Ok(new);
    }

    /// Moves the block starting at `old_ptr` into one with fewer element
    /// slots, keeping the first `new_layout.size()` bytes.
    ///
    /// The array only shrinks after dropping the elements past the new
    /// capacity, so the kept prefix always covers the header and every
    /// live element. Failure and success behave like `grow`.
    unsafe fn shrink(
        &self,
        old_ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        let new = self.allocate(new_layout)?;
        let ptr = new.cast::<u8>();

        unsafe { ptr.copy_from_nonoverlapping(old_ptr, new_layout.size()) };
        unsafe { self.deallocate(old_ptr, old_layout) };
        return Ok(new);
    }

    /// Moves the block to the size of `new_layout`, calling `grow` or
    /// `shrink` as needed. This is the only path `DynArray` uses to change
    /// capacity.
    ///
    /// A resize to the same capacity leaves the block where it is.
    unsafe fn reallocate(
        &self,
        old_ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        let old_sz = old_layout.size();
        let new_sz = new_layout.size();
        if new_sz == old_sz {
            return Ok(NonNull::slice_from_raw_parts(old_ptr, old_sz));
        }
        if new_sz > old_sz {
            return unsafe { self.grow(old_ptr, old_layout, new_layout) };
        }
        return unsafe { self.shrink(old_ptr, old_layout, new_layout) };
    }
}

// Lets several arrays draw blocks from one allocator they don't own. With a
// bridge enabled `&A` already gets this through the bridge's blanket impl.
#[cfg(not(any(feature = "experimental_allocator", feature = "alloc_api2")))]
unsafe impl<A> AltAllocator for &A
where
    A: AltAllocator,
{
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        return (**self).allocate(layout);
    }
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { (**self).deallocate(ptr, layout) };
    }
    unsafe fn grow(
        &self,
        old_ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        return unsafe { (**self).grow(old_ptr, old_layout, new_layout) };
    }
    unsafe fn shrink(
        &self,
        old_ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        return unsafe { (**self).shrink(old_ptr, old_layout, new_layout) };
    }
}
