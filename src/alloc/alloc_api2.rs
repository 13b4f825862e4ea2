use core::alloc::Layout;
use core::ptr::NonNull;

use allocator_api2::alloc::Allocator as Alloc2;

use super::AllocError;
use super::AltAllocator;

/// Any `allocator-api2` allocator can back a `DynArray`. Blocks are
/// requested with the same layouts as through the trait directly, and
/// `grow`/`shrink` go to the allocator's own versions so in-place resizing
/// still moves the header along with the payload.
///
/// `allocator-api2` has its own `AllocError`, so results are mapped onto
/// this crate's.
unsafe impl<A: Alloc2> AltAllocator for A {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        let Ok(mem) = <Self as Alloc2>::allocate(self, layout) else {
            return Err(AllocError);
        };
        return Ok(mem);
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { <Self as Alloc2>::deallocate(self, ptr, layout) };
    }

    #[inline]
    unsafe fn grow(
        &self,
        old_ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        let Ok(mem) = (unsafe { <Self as Alloc2>::grow(self, old_ptr, old_layout, new_layout) }) else {
            return Err(AllocError);
        };
        return Ok(mem);
    }

    #[inline]
    unsafe fn shrink(
        &self,
        old_ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        let Ok(mem) = (unsafe { <Self as Alloc2>::shrink(self, old_ptr, old_layout, new_layout) }) else {
            return Err(AllocError);
        };
        return Ok(mem);
    }
}
