use core::alloc::Layout;
use core::mem::ManuallyDrop;
use core::mem::align_of;
use core::mem::size_of;
use core::ptr;
use core::ptr::NonNull;

use crate::alloc::AltAllocator;
use crate::types::DynArrResult;
use crate::types::ErrorKind;

/// Bookkeeping stored in the same allocation as the elements, ending exactly
/// where the first element starts.
///
/// The four words are laid out in this order and never move relative to the
/// payload, so the header of an array can always be found from the address
/// of its first element.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub struct Header {
    stride:   usize,
    count:    usize,
    bytes:    usize,
    capacity: usize,
}

impl Header {
    /// Size in bytes of one element.
    #[inline]
    pub const fn stride(&self) -> usize {
        return self.stride;
    }

    /// Number of elements currently stored.
    #[inline]
    pub const fn count(&self) -> usize {
        return self.count;
    }

    /// Always `count * stride`.
    #[inline]
    pub const fn bytes(&self) -> usize {
        return self.bytes;
    }

    /// Number of element slots the allocation has room for.
    #[inline]
    pub const fn capacity(&self) -> usize {
        return self.capacity;
    }

    // `bytes` is only ever written here so it cannot drift from `count`.
    #[inline]
    pub(crate) const fn set_count(&mut self, count: usize) {
        self.count = count;
        self.bytes = count * self.stride;
    }
}

const fn max_align(a: usize, b: usize) -> usize {
    if a > b {
        return a;
    }
    return b;
}

/// Owns the header+payload allocation of a `DynArray`.
///
/// `ptr` points at the first element slot. The header sits right before it
/// and the start of the allocation is `HEADER_OFFSET` bytes before it. This
/// type knows nothing about which slots are initialized; dropping it only
/// releases the memory.
pub(crate) struct RawBlock<T, A: AltAllocator> {
    ptr:   NonNull<T>,
    alloc: A,
}

impl<T, A: AltAllocator> RawBlock<T, A> {
    const ALIGN: usize = max_align(align_of::<Header>(), align_of::<T>());
    /// Distance from the start of the allocation to the first element. Any
    /// padding needed by a strictly aligned `T` goes in front of the header.
    const HEADER_OFFSET: usize = size_of::<Header>().next_multiple_of(Self::ALIGN);
    const STRIDE: usize = size_of::<T>();

    fn block_layout(capacity: usize) -> DynArrResult<Layout> {
        let Some(payload) = capacity.checked_mul(Self::STRIDE) else {
            return Err(ErrorKind::UsizeOverflow.into());
        };
        let Some(size) = payload.checked_add(Self::HEADER_OFFSET) else {
            return Err(ErrorKind::UsizeOverflow.into());
        };
        let Ok(layout) = Layout::from_size_align(size, Self::ALIGN) else {
            return Err(ErrorKind::LayoutFailure.into());
        };
        return Ok(layout);
    }

    // Safety: the block was allocated with exactly this layout, which was
    // already validated by `block_layout`.
    fn current_layout(&self) -> Layout {
        let size = Self::HEADER_OFFSET + self.header().capacity * Self::STRIDE;
        return unsafe { Layout::from_size_align_unchecked(size, Self::ALIGN) };
    }

    /// Allocates a block with room for `capacity` elements and writes an
    /// empty header in front of the payload.
    ///
    /// `T` must not be zero sized and `capacity` must be at least one.
    pub(crate) fn allocate(alloc: A, capacity: usize) -> DynArrResult<Self> {
        runtime_debug_assert!(Self::STRIDE != 0, "cannot create array with stride of 0");
        runtime_debug_assert!(capacity != 0, "block capacity must be at least one");

        let layout = Self::block_layout(capacity)?;
        let Ok(mem) = alloc.allocate(layout) else {
            return Err(ErrorKind::AllocFailure.into());
        };

        let base = mem.cast::<u8>();
        let ptr = unsafe { base.add(Self::HEADER_OFFSET) }.cast::<T>();
        let header = Header {
            stride:   Self::STRIDE,
            count:    0,
            bytes:    0,
            capacity: capacity,
        };
        unsafe { Self::header_ptr(ptr).write(header) };

        trace_block!("allocated block at {:p} with capacity {}", ptr, capacity);
        return Ok(Self {
            ptr:   ptr,
            alloc: alloc,
        });
    }

    /// Where the header of the payload at `ptr` lives.
    ///
    /// `ptr` must be the payload pointer of a live block.
    #[inline(always)]
    pub(crate) unsafe fn header_ptr(ptr: NonNull<T>) -> NonNull<Header> {
        return unsafe { ptr.cast::<u8>().sub(size_of::<Header>()) }.cast::<Header>();
    }

    #[inline(always)]
    fn base(&self) -> NonNull<u8> {
        return unsafe { self.ptr.cast::<u8>().sub(Self::HEADER_OFFSET) };
    }

    #[inline]
    pub(crate) fn header(&self) -> &Header {
        return unsafe { Self::header_ptr(self.ptr).as_ref() };
    }

    #[inline]
    pub(crate) fn header_mut(&mut self) -> &mut Header {
        return unsafe { Self::header_ptr(self.ptr).as_mut() };
    }

    #[inline(always)]
    pub(crate) const fn ptr(&self) -> NonNull<T> {
        return self.ptr;
    }

    #[inline(always)]
    pub(crate) const fn allocator(&self) -> &A {
        return &self.alloc;
    }

    /// Moves the block to one with room for `new_capacity` elements and
    /// records the new capacity in the header.
    ///
    /// The header travels with the block. Slots past `new_capacity` are
    /// cut off, so the caller must have dropped any live elements there and
    /// lowered the count first. On failure the block is unchanged.
    #[cfg_attr(not(feature = "log"), allow(unused_variables))]
    pub(crate) fn reallocate(&mut self, new_capacity: usize) -> DynArrResult<()> {
        runtime_debug_assert!(new_capacity != 0, "block capacity must be at least one");
        runtime_debug_assert!(
            new_capacity >= self.header().count,
            "block cannot cut off live elements"
        );

        let old_capacity = self.header().capacity;
        let old_layout = self.current_layout();
        let new_layout = Self::block_layout(new_capacity)?;

        let Ok(mem) = (unsafe { self.alloc.reallocate(self.base(), old_layout, new_layout) }) else {
            return Err(ErrorKind::AllocFailure.into());
        };

        let old_ptr = self.ptr;
        self.ptr = unsafe { mem.cast::<u8>().add(Self::HEADER_OFFSET) }.cast::<T>();
        self.header_mut().capacity = new_capacity;

        trace_block!(
            "resized block {:p} -> {:p}, capacity {} -> {}",
            old_ptr,
            self.ptr,
            old_capacity,
            new_capacity
        );
        return Ok(());
    }

    /// Gives up ownership of the block without freeing it.
    pub(crate) fn into_raw(self) -> (NonNull<T>, A) {
        let me = ManuallyDrop::new(self);
        let alloc = unsafe { ptr::read(&me.alloc) };
        return (me.ptr, alloc);
    }

    /// Takes back a block given up with `into_raw`.
    ///
    /// `ptr` must come from `into_raw` for a block of the same `T`, and
    /// `alloc` must be able to free it.
    pub(crate) const unsafe fn from_raw(ptr: NonNull<T>, alloc: A) -> Self {
        return Self {
            ptr:   ptr,
            alloc: alloc,
        };
    }
}

impl<T, A: AltAllocator> Drop for RawBlock<T, A> {
    fn drop(&mut self) {
        let layout = self.current_layout();
        trace_block!("releasing block at {:p} ({} bytes)", self.ptr, layout.size());
        unsafe { self.alloc.deallocate(self.base(), layout) };
    }
}
