pub use alloc_def::Global;

#[cfg(feature = "experimental_allocator")]
mod alloc_def {
    /// Re-export the std Global implementation of allocator APIs.
    pub use std::alloc::Global;
}

#[cfg(not(feature = "experimental_allocator"))]
mod alloc_def {
    use core::ptr::NonNull;
    use std::alloc;
    use std::alloc::Layout;

    use crate::alloc::AllocError;
    use crate::alloc::AltAllocator;

    /// Serves array blocks from the std global allocator. Both `grow` and
    /// `shrink` go through `realloc`, so a block that can be resized in place
    /// keeps its header without a copy.
    ///
    /// Named `Global` so that code keeps compiling once the allocator API is
    /// stable and this becomes a re-export.
    #[derive(Debug, Default, Copy, Clone)]
    pub struct Global;

    unsafe impl AltAllocator for Global {
        fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
            // A header-prefixed block is never empty, but `alloc::alloc()`
            // forbids zero sized layouts so refuse them anyway.
            if layout.size() == 0 {
                return Err(AllocError);
            };
            let ptr = unsafe { alloc::alloc(layout) };
            let Some(ptr) = NonNull::new(ptr) else {
                return Err(AllocError);
            };
            return Ok(NonNull::slice_from_raw_parts(ptr, layout.size()));
        }

        unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
            unsafe { alloc::dealloc(ptr.as_ptr(), layout) };
        }

        unsafe fn grow(
            &self,
            old_ptr: NonNull<u8>,
            old_layout: Layout,
            new_layout: Layout,
        ) -> Result<NonNull<[u8]>, AllocError> {
            return unsafe { realloc(old_ptr, old_layout, new_layout) };
        }

        unsafe fn shrink(
            &self,
            old_ptr: NonNull<u8>,
            old_layout: Layout,
            new_layout: Layout,
        ) -> Result<NonNull<[u8]>, AllocError> {
            return unsafe { realloc(old_ptr, old_layout, new_layout) };
        }
    }

    // `alloc::realloc()` keeps the old alignment, so both layouts must agree.
    unsafe fn realloc(
        old_ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        if new_layout.size() == 0 || new_layout.align() != old_layout.align() {
            return Err(AllocError);
        }
        let new = unsafe { alloc::realloc(old_ptr.as_ptr(), old_layout, new_layout.size()) };
        let Some(new) = NonNull::new(new) else {
            return Err(AllocError);
        };
        return Ok(NonNull::slice_from_raw_parts(new, new_layout.size()));
    }
}
