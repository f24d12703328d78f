//! Untyped storage for a fixed number of element slots.
//!
//! [`RawMemory`] owns an allocation sized for `capacity` values of `T` and
//! nothing more. It never constructs, reads or drops elements: which slots
//! hold live values is tracked entirely by the owner (see
//! [`GrowVec`](crate::GrowVec)). All `unsafe` in this crate sits either
//! here or in `vector.rs`.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};

use crate::error::AllocError;

/// An owned, uninitialised buffer with room for `capacity` values of `T`.
///
/// The buffer is allocated once at construction and never reallocated in
/// place. Growing means allocating a second `RawMemory` and relocating into
/// it. Dropping releases the storage without running any element
/// destructors.
///
/// `RawMemory` can be moved (`std::mem::take` leaves the source empty) and
/// swapped, but not cloned: duplicating raw storage without knowing which
/// slots are live is meaningless.
pub struct RawMemory<T> {
    /// Start of the buffer. Dangling when nothing is allocated.
    ptr: NonNull<T>,
    /// Number of element slots the buffer can hold.
    capacity: usize,
    _owns: PhantomData<T>,
}

// SAFETY: `RawMemory` is the unique owner of its buffer, exactly like a
// `Box<[MaybeUninit<T>]>`, so it inherits `T`'s thread-safety.
unsafe impl<T: Send> Send for RawMemory<T> {}
// SAFETY: shared access only hands out `*const T`; see `Send` above.
unsafe impl<T: Sync> Sync for RawMemory<T> {}

impl<T> RawMemory<T> {
    /// An empty buffer. Does not allocate.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _owns: PhantomData,
        }
    }

    /// Allocate room for `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow. Allocator exhaustion is routed through
    /// [`std::alloc::handle_alloc_error`]. Use
    /// [`try_with_capacity`](Self::try_with_capacity) to observe either
    /// failure as an [`AllocError`].
    pub fn with_capacity(capacity: usize) -> Self {
        Self::try_with_capacity(capacity).unwrap_or_else(|err| err.escalate())
    }

    /// Allocate room for `capacity` elements, reporting failure.
    ///
    /// A zero capacity yields an empty buffer without calling the allocator.
    /// Zero-sized element types never need storage, so their capacity is
    /// recorded without an allocation either.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
        if capacity == 0 {
            return Ok(Self::new());
        }
        let layout = Self::layout(capacity)?;
        if layout.size() == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                capacity,
                _owns: PhantomData,
            });
        }
        // SAFETY: `layout` has a non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        match NonNull::new(raw.cast::<T>()) {
            Some(ptr) => Ok(Self {
                ptr,
                capacity,
                _owns: PhantomData,
            }),
            None => {
                log::debug!(
                    "allocator refused {} bytes for {capacity} slots",
                    layout.size()
                );
                Err(AllocError::OutOfMemory { layout })
            }
        }
    }

    fn layout(capacity: usize) -> Result<Layout, AllocError> {
        Layout::array::<T>(capacity).map_err(|_| AllocError::CapacityOverflow {
            requested: capacity,
        })
    }

    /// Number of element slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the buffer has no slots.
    pub fn is_empty(&self) -> bool {
        self.capacity == 0
    }

    /// Start of the buffer.
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Mutable start of the buffer.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Address of slot `offset`.
    ///
    /// `offset == capacity` (one past the end) is allowed. Larger offsets
    /// are a contract violation caught by a debug assertion.
    pub fn slot(&self, offset: usize) -> *const T {
        debug_assert!(
            offset <= self.capacity,
            "slot {offset} out of bounds for capacity {}",
            self.capacity
        );
        self.ptr.as_ptr().wrapping_add(offset)
    }

    /// Mutable address of slot `offset`. Same contract as [`slot`](Self::slot).
    pub fn slot_mut(&mut self, offset: usize) -> *mut T {
        debug_assert!(
            offset <= self.capacity,
            "slot {offset} out of bounds for capacity {}",
            self.capacity
        );
        self.ptr.as_ptr().wrapping_add(offset)
    }

    /// Exchange buffers with `other` in constant time.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }

    /// Release the storage and become empty.
    ///
    /// Safe to call repeatedly. Slot contents are never inspected, so any
    /// live values still in the buffer are leaked, not dropped.
    pub fn deallocate(&mut self) {
        let capacity = mem::replace(&mut self.capacity, 0);
        let ptr = mem::replace(&mut self.ptr, NonNull::dangling());
        if capacity == 0 {
            return;
        }
        if let Ok(layout) = Self::layout(capacity) {
            if layout.size() != 0 {
                // SAFETY: `ptr` came from `alloc::alloc` with this exact
                // layout and has not been freed (capacity was non-zero).
                unsafe { alloc::dealloc(ptr.as_ptr().cast(), layout) }
            }
        }
    }
}

impl<T> Default for RawMemory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawMemory<T> {
    fn drop(&mut self) {
        self.deallocate();
    }
}

impl<T> fmt::Debug for RawMemory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawMemory")
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish()
    }
}

/// Move `count` live values from `src` into uninitialised slots at `dst`.
///
/// A Rust move is a bitwise copy that cannot fail, so relocation is always
/// by move and never needs a cloning fallback. Afterwards the source slots
/// are logically uninitialised and must not be dropped.
///
/// # Safety
///
/// `src..src + count` must hold live values and `dst..dst + count` must be
/// writable slots that do not overlap them.
pub(crate) unsafe fn relocate<T>(src: *const T, dst: *mut T, count: usize) {
    // SAFETY: upheld by the caller.
    unsafe { ptr::copy_nonoverlapping(src, dst, count) }
}
