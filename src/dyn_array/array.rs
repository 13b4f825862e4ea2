use core::cmp;
use core::fmt;
use core::marker::PhantomData;
use core::mem::ManuallyDrop;
use core::mem::size_of;
use core::ops;
use core::ptr;
use core::ptr::NonNull;
use core::slice;

use super::header::Header;
use super::header::RawBlock;
use crate::alloc::AltAllocator;
use crate::macros::unwrap_fatal;
use crate::types::DynArrErr;
use crate::types::DynArrResult;
use crate::types::ErrorKind;

/// Next capacity once `capacity` slots are used up. Scales by 1.5 but always
/// adds at least one slot, so a capacity of one still grows.
pub(super) const fn grow_capacity(capacity: usize) -> Option<usize> {
    let step = capacity / 2;
    if step == 0 {
        return capacity.checked_add(1);
    }
    return capacity.checked_add(step);
}

/// A growable, contiguous array whose length and capacity live in a header
/// placed in front of the elements, inside the same allocation.
///
/// The array itself is one pointer to the first element (plus the allocator,
/// which is usually zero sized), so it costs a single word on the stack.
///
/// Capacity is never zero. Operations that change the capacity may move the
/// whole block; they take `&mut self` so no other handle to the old block can
/// exist.
///
/// Misuse of the safe operations (such as an out of range index) aborts the
/// process, as does running out of memory. The `try_*` forms return a
/// `DynArrErr` instead. The `unsafe` unchecked forms leave the bounds to the
/// caller and only check them when `debug_assertions` or the
/// `checked_release` feature are on.
pub struct DynArray<T, A: AltAllocator> {
    block: RawBlock<T, A>,
    _ph:   PhantomData<T>,
}

unsafe impl<T: Send, A: AltAllocator + Send> Send for DynArray<T, A> {}
unsafe impl<T: Sync, A: AltAllocator + Sync> Sync for DynArray<T, A> {}

impl<T, A: AltAllocator> DynArray<T, A> {
    const SIZE: usize = size_of::<T>();

    /// Creates an empty array with room for `count` elements, or one element
    /// if `count` is zero, plus half again as many.
    ///
    /// Panics if `T` is zero sized.
    pub fn try_with_capacity_in(alloc: A, count: usize) -> DynArrResult<Self> {
        runtime_assert!(Self::SIZE != 0, "cannot create array with stride of 0");

        let count = cmp::max(count, 1);
        let Some(capacity) = count.checked_add(count / 2) else {
            return Err(DynArrErr::new(ErrorKind::CapacityOverflow));
        };
        let block = RawBlock::allocate(alloc, capacity)?;
        return Ok(Self {
            block: block,
            _ph:   PhantomData,
        });
    }

    /// Like `try_with_capacity_in` but running out of memory is fatal.
    #[track_caller]
    pub fn with_capacity_in(alloc: A, count: usize) -> Self {
        return unwrap_fatal(Self::try_with_capacity_in(alloc, count));
    }

    /// Creates an empty array with a capacity of one.
    #[track_caller]
    pub fn new_in(alloc: A) -> Self {
        return Self::with_capacity_in(alloc, 1);
    }

    /// Creates an array already holding `count` default values, or one if
    /// `count` is zero.
    #[track_caller]
    pub fn with_count_in(alloc: A, count: usize) -> Self
    where
        T: Default,
    {
        let count = cmp::max(count, 1);
        let mut arr = Self::with_capacity_in(alloc, count);
        for _ in 0..count {
            arr.push(T::default());
        }
        return arr;
    }

    /// The header in front of the elements.
    #[inline]
    pub fn header(&self) -> &Header {
        return self.block.header();
    }

    /// Size in bytes of a single element.
    #[inline]
    pub fn stride(&self) -> usize {
        return self.header().stride();
    }

    #[inline]
    pub fn len(&self) -> usize {
        return self.header().count();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.len() == 0;
    }

    /// Bytes taken by the stored elements, `len() * stride()`.
    #[inline]
    pub fn bytes(&self) -> usize {
        return self.header().bytes();
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        return self.header().capacity();
    }

    #[inline]
    pub fn allocator(&self) -> &A {
        return self.block.allocator();
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len()) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len()) }
    }

    /// Pointer to the first element. The header is right before it.
    ///
    /// Only valid until the next operation that can change the capacity.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        return self.block.ptr().as_ptr();
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        return self.block.ptr().as_ptr();
    }

    /// Changes the capacity to exactly `new_capacity` slots, or one slot if
    /// it is zero. The block may move.
    ///
    /// Shrinking below `len()` drops the elements past the new capacity.
    /// That truncation stays in effect even if the reallocation then fails.
    pub fn try_resize(&mut self, new_capacity: usize) -> DynArrResult<()> {
        let new_capacity = cmp::max(new_capacity, 1);
        if new_capacity < self.len() {
            self.truncate(new_capacity);
        }
        return self.block.reallocate(new_capacity);
    }

    #[track_caller]
    pub fn resize(&mut self, new_capacity: usize) {
        unwrap_fatal(self.try_resize(new_capacity));
    }

    /// Trims the capacity down to `len()`, never below one.
    pub fn try_shrink(&mut self) -> DynArrResult<()> {
        return self.try_resize(self.len());
    }

    #[track_caller]
    pub fn shrink(&mut self) {
        unwrap_fatal(self.try_shrink());
    }

    /// Sets the capacity to `len() + extra`.
    ///
    /// This is an exact resize, so a capacity above `len() + extra` is
    /// trimmed down to it.
    pub fn try_reserve(&mut self, extra: usize) -> DynArrResult<()> {
        let Some(capacity) = self.len().checked_add(extra) else {
            return Err(DynArrErr::new(ErrorKind::CapacityOverflow));
        };
        return self.try_resize(capacity);
    }

    #[track_caller]
    pub fn reserve(&mut self, extra: usize) {
        unwrap_fatal(self.try_reserve(extra));
    }

    pub fn try_push(&mut self, item: T) -> DynArrResult<()> {
        let len = self.len();
        self.grow_for(1)?;

        unsafe { ptr::write(self.as_mut_ptr().add(len), item) };
        self.block.header_mut().set_count(len + 1);
        return Ok(());
    }

    /// Appends `item`, growing the capacity by half when it is used up.
    #[track_caller]
    pub fn push(&mut self, item: T) {
        unwrap_fatal(self.try_push(item));
    }

    /// Removes the last element. Capacity is left alone.
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        return Some(unsafe { self.pop_unchecked() });
    }

    /// # Safety
    /// The array must not be empty.
    #[track_caller]
    pub unsafe fn pop_unchecked(&mut self) -> T {
        runtime_debug_assert!(!self.is_empty(), "cannot pop from an empty array");

        let len = self.len().wrapping_sub(1);
        self.block.header_mut().set_count(len);
        return unsafe { ptr::read(self.as_ptr().add(len)) };
    }

    /// Inserts `item` at `index`, moving everything from `index` on up by one.
    /// `index == len()` appends.
    pub fn try_insert(&mut self, index: usize, item: T) -> DynArrResult<()> {
        if index > self.len() {
            return Err(DynArrErr::new(ErrorKind::IndexOutOfBounds));
        }
        self.grow_for(1)?;
        unsafe { self.write_at(index, item) };
        return Ok(());
    }

    #[track_caller]
    pub fn insert(&mut self, index: usize, item: T) {
        unwrap_fatal(self.try_insert(index, item));
    }

    /// # Safety
    /// `index` must be at most `len()`. Running out of memory is still fatal.
    #[track_caller]
    pub unsafe fn insert_unchecked(&mut self, index: usize, item: T) {
        runtime_debug_assert!(index <= self.len(), "array index out of bounds");

        unwrap_fatal(self.grow_for(1));
        unsafe { self.write_at(index, item) };
    }

    /// Copies `items` in at `index`, moving everything from `index` on up by
    /// `items.len()`.
    pub fn try_insert_slice(&mut self, index: usize, items: &[T]) -> DynArrResult<()>
    where
        T: Copy,
    {
        let len = self.len();
        if index > len {
            return Err(DynArrErr::new(ErrorKind::IndexOutOfBounds));
        }
        let amount = items.len();
        self.grow_for(amount)?;

        unsafe {
            self.shift_up(index, amount, len);
            ptr::copy_nonoverlapping(items.as_ptr(), self.as_mut_ptr().add(index), amount);
        }
        self.block.header_mut().set_count(len + amount);
        return Ok(());
    }

    #[track_caller]
    pub fn insert_slice(&mut self, index: usize, items: &[T])
    where
        T: Copy,
    {
        unwrap_fatal(self.try_insert_slice(index, items));
    }

    /// Removes and returns the element at `index`, moving everything after it
    /// down by one. Capacity is left alone.
    pub fn try_remove(&mut self, index: usize) -> DynArrResult<T> {
        if index >= self.len() {
            return Err(DynArrErr::new(ErrorKind::IndexOutOfBounds));
        }
        return Ok(unsafe { self.remove_unchecked(index) });
    }

    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        return unwrap_fatal(self.try_remove(index));
    }

    /// # Safety
    /// `index` must be less than `len()`.
    #[track_caller]
    pub unsafe fn remove_unchecked(&mut self, index: usize) -> T {
        let len = self.len();
        runtime_debug_assert!(index < len, "array index out of bounds");

        unsafe {
            let item = ptr::read(self.as_ptr().add(index));
            self.shift_down(index, 1, len);
            return item;
        }
    }

    /// Drops `amount` elements starting at `index` and closes the gap.
    ///
    /// `index` has to point at a stored element even when `amount` is zero.
    pub fn try_remove_span(&mut self, index: usize, amount: usize) -> DynArrResult<()> {
        let len = self.len();
        if index >= len {
            return Err(DynArrErr::new(ErrorKind::IndexOutOfBounds));
        }
        let Some(end) = index.checked_add(amount) else {
            return Err(DynArrErr::new(ErrorKind::IndexOutOfBounds));
        };
        if end > len {
            return Err(DynArrErr::new(ErrorKind::IndexOutOfBounds));
        }
        unsafe { self.remove_span_unchecked(index, amount) };
        return Ok(());
    }

    #[track_caller]
    pub fn remove_span(&mut self, index: usize, amount: usize) {
        unwrap_fatal(self.try_remove_span(index, amount));
    }

    /// # Safety
    /// `index` must be less than `len()` and `index + amount` at most `len()`.
    #[track_caller]
    pub unsafe fn remove_span_unchecked(&mut self, index: usize, amount: usize) {
        let len = self.len();
        runtime_debug_assert!(index < len, "array index out of bounds");
        runtime_debug_assert!(
            index.checked_add(amount).is_some_and(|end| end <= len),
            "array span out of bounds"
        );

        // If a destructor panics the tail leaks instead of being dropped twice.
        self.block.header_mut().set_count(index);
        unsafe {
            let span = ptr::slice_from_raw_parts_mut(self.as_mut_ptr().add(index), amount);
            ptr::drop_in_place(span);
            self.shift_down(index, amount, len);
        }
    }

    /// Hands the block over to the caller as a pointer to the first element
    /// and the allocator that owns it. Nothing is dropped or freed.
    ///
    /// The pointer identifies the array: `header_of` reads its bookkeeping
    /// and `from_raw_parts_in` turns it back into a `DynArray`.
    pub fn into_raw_parts(self) -> (NonNull<T>, A) {
        return self.into_block().into_raw();
    }

    /// # Safety
    /// `ptr` must come from `into_raw_parts` on a `DynArray<T, A>` and `alloc`
    /// must be the allocator returned with it. Ownership moves back into the
    /// returned array, so `ptr` must not be used afterwards.
    pub unsafe fn from_raw_parts_in(ptr: NonNull<T>, alloc: A) -> Self {
        return Self {
            block: unsafe { RawBlock::from_raw(ptr, alloc) },
            _ph:   PhantomData,
        };
    }

    /// Reads the header of the array whose first element is at `ptr`.
    ///
    /// # Safety
    /// `ptr` must come from `into_raw_parts` and its array must still be
    /// alive (not yet rebuilt and dropped) for the whole of `'a`.
    pub unsafe fn header_of<'a>(ptr: NonNull<T>) -> &'a Header {
        return unsafe { RawBlock::<T, A>::header_ptr(ptr).as_ref() };
    }

    // Drops the elements past `len` and lowers the count first, so a
    // panicking destructor leaks the rest rather than double dropping.
    fn truncate(&mut self, len: usize) {
        let old_len = self.len();
        if len >= old_len {
            return;
        }
        self.block.header_mut().set_count(len);
        unsafe {
            let tail = ptr::slice_from_raw_parts_mut(self.as_mut_ptr().add(len), old_len - len);
            ptr::drop_in_place(tail);
        }
    }

    /// Grows by steps of 1.5 until `additional` more elements fit.
    fn grow_for(&mut self, additional: usize) -> DynArrResult<()> {
        let Some(needed) = self.len().checked_add(additional) else {
            return Err(DynArrErr::new(ErrorKind::CapacityOverflow));
        };
        let mut capacity = self.capacity();
        if needed <= capacity {
            return Ok(());
        }
        while capacity < needed {
            let Some(next) = grow_capacity(capacity) else {
                return Err(DynArrErr::new(ErrorKind::CapacityOverflow));
            };
            capacity = next;
        }
        return self.block.reallocate(capacity);
    }

    // Needs a free slot and `index <= len()`.
    unsafe fn write_at(&mut self, index: usize, item: T) {
        let len = self.len();
        unsafe {
            self.shift_up(index, 1, len);
            ptr::write(self.as_mut_ptr().add(index), item);
        }
        self.block.header_mut().set_count(len + 1);
    }

    // Moves `[index, len)` up by `amount` slots. The count is not touched and
    // the slots `[index, index + amount)` are left logically uninitialized.
    unsafe fn shift_up(&mut self, index: usize, amount: usize, len: usize) {
        unsafe {
            let src = self.as_mut_ptr().add(index);
            ptr::copy(src, src.add(amount), len - index);
        }
    }

    // Moves `[index + amount, len)` down onto `index` and sets the count to
    // `len - amount`. The elements in `[index, index + amount)` must already
    // be moved out or dropped.
    unsafe fn shift_down(&mut self, index: usize, amount: usize, len: usize) {
        unsafe {
            let dst = self.as_mut_ptr().add(index);
            ptr::copy(dst.add(amount), dst, len - index - amount);
        }
        self.block.header_mut().set_count(len - amount);
    }

    fn into_block(self) -> RawBlock<T, A> {
        let me = ManuallyDrop::new(self);
        return unsafe { ptr::read(&me.block) };
    }
}

impl<T, A: AltAllocator> Drop for DynArray<T, A> {
    fn drop(&mut self) {
        // The block frees the memory once the elements are gone.
        unsafe { ptr::drop_in_place(self.as_mut_slice()) };
    }
}

impl<T, A: AltAllocator> ops::Deref for DynArray<T, A> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        return self.as_slice();
    }
}

impl<T, A: AltAllocator> ops::DerefMut for DynArray<T, A> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        return self.as_mut_slice();
    }
}

impl<T: fmt::Debug, A: AltAllocator> fmt::Debug for DynArray<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.debug_list().entries(self.as_slice()).finish();
    }
}

impl<T, A: AltAllocator> Extend<T> for DynArray<T, A> {
    #[track_caller]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

#[cfg(feature = "std_alloc")]
mod global {
    use super::DynArray;
    use crate::alloc::Global;
    use crate::types::DynArrResult;

    impl<T> DynArray<T, Global> {
        #[track_caller]
        pub fn new() -> Self {
            return Self::new_in(Global);
        }

        #[track_caller]
        pub fn with_capacity(count: usize) -> Self {
            return Self::with_capacity_in(Global, count);
        }

        pub fn try_with_capacity(count: usize) -> DynArrResult<Self> {
            return Self::try_with_capacity_in(Global, count);
        }
    }

    impl<T> Default for DynArray<T, Global> {
        fn default() -> Self {
            return Self::new();
        }
    }
}
