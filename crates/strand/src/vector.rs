//! The growable vector and its owning iterator.
//!
//! [`GrowVec`] pairs one [`RawMemory`] with a live-element count. Slots
//! `[0, len)` hold live values in order; slots `[len, capacity)` are
//! uninitialised. Every operation below preserves that split, including
//! when an element constructor, `clone` or `clone_from` panics part-way.
//!
//! # Failure guarantees
//!
//! | Operation | On panic |
//! |---|---|
//! | `reserve`, growing `emplace_back_with` / `emplace_with` | strong: vector unchanged |
//! | `clone_from` that needs more capacity | strong |
//! | in-place `clone_from`, non-growing `emplace_with`, `resize` | basic: valid, possibly partial |
//! | `clone`, `with_len` | the new vector is discarded, the source untouched |
//!
//! Growth paths are strong because the new element is constructed into the
//! fresh buffer before anything is relocated, and relocation (a bitwise
//! move) cannot fail.

#![allow(unsafe_code)]

use std::fmt;
use std::iter::FusedIterator;
use std::mem::{self, ManuallyDrop};
use std::ops::{Deref, DerefMut};
use std::ptr;
use std::slice;

use crate::error::AllocError;
use crate::raw::{relocate, RawMemory};

/// A contiguous, growable sequence built on [`RawMemory`].
///
/// Appending grows capacity by doubling (`max(1, 2 * capacity)`), giving
/// amortized O(1) [`push_back`](Self::push_back). [`reserve`](Self::reserve)
/// grows to exactly the requested capacity. The live range derefs to
/// `[T]`, so indexing, iteration and every read-only slice method work
/// directly on a `GrowVec`.
///
/// Capacity-changing operations move the elements to a new buffer. The
/// borrow checker rejects any reference held across them.
pub struct GrowVec<T> {
    data: RawMemory<T>,
    len: usize,
}

impl<T> GrowVec<T> {
    /// An empty vector with capacity 0. Does not allocate.
    pub const fn new() -> Self {
        Self {
            data: RawMemory::new(),
            len: 0,
        }
    }

    /// An empty vector with room for exactly `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow; see [`RawMemory::with_capacity`].
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: RawMemory::with_capacity(capacity),
            len: 0,
        }
    }

    /// Fallible form of [`with_capacity`](Self::with_capacity).
    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
        Ok(Self {
            data: RawMemory::try_with_capacity(capacity)?,
            len: 0,
        })
    }

    /// A vector of `len` default elements, with capacity `len`.
    ///
    /// If `T::default()` panics, the elements built so far are dropped and
    /// the storage released before the panic propagates.
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        let mut vec = Self::with_capacity(len);
        for _ in 0..len {
            // SAFETY: capacity is `len` and fewer than `len` slots are live.
            unsafe { vec.write_next(T::default()) };
        }
        vec
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no live elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of element slots in the current buffer.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Start of the buffer. Dangling (but aligned) when capacity is 0.
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    /// The live elements.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[0, len)` are live and the pointer is non-null and
        // aligned even when nothing is allocated.
        unsafe { slice::from_raw_parts(self.data.as_ptr(), self.len) }
    }

    /// The live elements, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: see `as_slice`; `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.data.as_mut_ptr(), self.len) }
    }

    /// Exchange contents (storage and length) with `other` in constant time.
    ///
    /// This is also the vector's move-assignment: `other` receives this
    /// vector's previous contents.
    pub fn swap(&mut self, other: &mut Self) {
        self.data.swap(&mut other.data);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Ensure capacity is at least `new_capacity`.
    ///
    /// A no-op when the capacity already suffices, in which case element
    /// addresses stay put. Otherwise allocates exactly `new_capacity` slots
    /// and relocates every element to the same index.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow; allocator exhaustion goes through
    /// [`std::alloc::handle_alloc_error`].
    pub fn reserve(&mut self, new_capacity: usize) {
        self.try_reserve(new_capacity)
            .unwrap_or_else(|err| err.escalate());
    }

    /// Fallible form of [`reserve`](Self::reserve). On error the vector is
    /// unchanged.
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<(), AllocError> {
        if new_capacity <= self.capacity() {
            return Ok(());
        }
        let mut fresh = RawMemory::try_with_capacity(new_capacity)?;
        // SAFETY: `[0, len)` are live in the old buffer and `fresh` is a
        // separate allocation with at least `len` slots.
        unsafe { relocate(self.data.as_ptr(), fresh.as_mut_ptr(), self.len) };
        self.adopt(fresh);
        Ok(())
    }

    /// Set the length to `new_len`, default-constructing or dropping
    /// elements at the end.
    ///
    /// Shrinking keeps the capacity. Growing reserves exactly `new_len` if
    /// the capacity is insufficient. If `T::default()` panics, the elements
    /// constructed so far stay in the vector.
    pub fn resize(&mut self, new_len: usize)
    where
        T: Default,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }
        self.reserve(new_len);
        while self.len < new_len {
            // SAFETY: capacity >= new_len > len.
            unsafe { self.write_next(T::default()) };
        }
    }

    /// Drop every element from `new_len` on. No-op if `new_len >= len`.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let tail = ptr::slice_from_raw_parts_mut(self.data.slot_mut(new_len), self.len - new_len);
        // Shrink first so a panicking `Drop` can't lead to a double drop.
        self.len = new_len;
        // SAFETY: `tail` covers slots that were live and are no longer
        // counted by `len`.
        unsafe { ptr::drop_in_place(tail) };
    }

    /// Drop every element, keeping the capacity.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Append a value built by `make`, returning a reference to it.
    ///
    /// When the vector is full, a buffer of `max(1, 2 * capacity)` slots is
    /// allocated and `make` runs with its result written straight into the
    /// new buffer before any element is relocated. If `make` panics, the
    /// new buffer is released and the vector is left exactly as it was.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow, or if `make` panics.
    pub fn emplace_back_with<F>(&mut self, make: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        match self.try_emplace_back_with(make) {
            Ok(slot) => slot,
            Err(err) => err.escalate(),
        }
    }

    /// Fallible form of [`emplace_back_with`](Self::emplace_back_with).
    ///
    /// `make` is not called when storage can't be obtained.
    pub fn try_emplace_back_with<F>(&mut self, make: F) -> Result<&mut T, AllocError>
    where
        F: FnOnce() -> T,
    {
        let index = self.len;
        if index == self.capacity() {
            let mut fresh = RawMemory::<T>::try_with_capacity(self.grown_capacity()?)?;
            let slot = fresh.slot_mut(index);
            // SAFETY: `fresh` has more than `index` slots, all uninitialised.
            // The old buffer is only read after `make` has succeeded.
            unsafe {
                slot.write(make());
                relocate(self.data.as_ptr(), fresh.as_mut_ptr(), index);
            }
            self.adopt(fresh);
        } else {
            // SAFETY: `index < capacity` and the slot is uninitialised.
            unsafe { self.data.slot_mut(index).write(make()) };
        }
        self.len = index + 1;
        // SAFETY: slot `index` was just initialised.
        Ok(unsafe { &mut *self.data.slot_mut(index) })
    }

    /// Append `value`.
    pub fn push_back(&mut self, value: T) {
        self.emplace_back_with(|| value);
    }

    /// Fallible form of [`push_back`](Self::push_back). On error `value` is
    /// dropped and the vector is unchanged.
    pub fn try_push_back(&mut self, value: T) -> Result<(), AllocError> {
        self.try_emplace_back_with(|| value).map(|_| ())
    }

    /// Insert a value built by `make` at `index`, shifting later elements
    /// right. Returns `index`.
    ///
    /// `index == len` appends. Without growth, `make` runs before anything
    /// moves, then the tail shifts one slot to open the gap. With growth,
    /// the value is built at `index` in the new buffer and the two halves
    /// are relocated around it, so a panicking `make` leaves the vector
    /// unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`, on capacity overflow, or if `make` panics.
    pub fn emplace_with<F>(&mut self, index: usize, make: F) -> usize
    where
        F: FnOnce() -> T,
    {
        self.try_emplace_with(index, make)
            .unwrap_or_else(|err| err.escalate())
    }

    /// Fallible form of [`emplace_with`](Self::emplace_with).
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn try_emplace_with<F>(&mut self, index: usize, make: F) -> Result<usize, AllocError>
    where
        F: FnOnce() -> T,
    {
        let len = self.len;
        assert!(
            index <= len,
            "insertion index (is {index}) should be <= len (is {len})"
        );
        if index == len {
            self.try_emplace_back_with(make)?;
            return Ok(index);
        }

        if len == self.capacity() {
            let mut fresh = RawMemory::<T>::try_with_capacity(self.grown_capacity()?)?;
            let gap = fresh.slot_mut(index);
            // SAFETY: `fresh` has at least `len + 1` uninitialised slots;
            // `[0, index)` and `[index, len)` land on either side of the gap.
            unsafe {
                gap.write(make());
                relocate(self.data.as_ptr(), fresh.as_mut_ptr(), index);
                relocate(self.data.slot(index), fresh.slot_mut(index + 1), len - index);
            }
            self.adopt(fresh);
        } else {
            let value = make();
            // SAFETY: `len < capacity`, so shifting `[index, len)` right by
            // one stays in bounds; the gap is then overwritten without
            // dropping its stale bits.
            unsafe {
                let gap = self.data.slot_mut(index);
                ptr::copy(gap, gap.add(1), len - index);
                gap.write(value);
            }
        }
        self.len = len + 1;
        Ok(index)
    }

    /// Insert `value` at `index`, shifting later elements right. Returns
    /// `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) -> usize {
        self.emplace_with(index, || value)
    }

    /// Fallible form of [`insert`](Self::insert).
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<usize, AllocError> {
        self.try_emplace_with(index, || value)
    }

    /// Drop the last element.
    ///
    /// # Panics
    ///
    /// Panics if the vector is empty.
    pub fn pop_back(&mut self) {
        assert!(self.len > 0, "pop_back on an empty GrowVec");
        self.truncate(self.len - 1);
    }

    /// Remove and return the last element, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot `len` was live and is no longer counted.
        Some(unsafe { self.data.slot(self.len).read() })
    }

    /// Remove and return the element at `index`, shifting later elements
    /// left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        let len = self.len;
        assert!(
            index < len,
            "removal index (is {index}) should be < len (is {len})"
        );
        // SAFETY: `index < len`. The value is read out before the tail
        // `[index + 1, len)` slides over its slot.
        unsafe {
            let hole = self.data.slot_mut(index);
            let removed = hole.read();
            ptr::copy(hole.add(1), hole, len - index - 1);
            self.len = len - 1;
            removed
        }
    }

    /// Drop the element at `index`, shifting later elements left.
    ///
    /// Returns `index`, which now holds the element that followed the
    /// erased one (or equals `len` if the last element was erased).
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn erase(&mut self, index: usize) -> usize {
        drop(self.remove(index));
        index
    }

    /// Capacity after one doubling step.
    fn grown_capacity(&self) -> Result<usize, AllocError> {
        match self.capacity() {
            0 => Ok(1),
            cap => cap
                .checked_mul(2)
                .ok_or(AllocError::CapacityOverflow {
                    requested: cap.saturating_mul(2),
                }),
        }
    }

    /// Make room for `additional` more elements, at least doubling when the
    /// buffer has to change so repeated small requests stay amortized.
    fn reserve_amortized(&mut self, additional: usize) {
        let needed = self.len.saturating_add(additional);
        if needed <= self.capacity() {
            return;
        }
        let target = self
            .grown_capacity()
            .map_or(needed, |grown| grown.max(needed));
        self.reserve(target);
    }

    /// Switch to `fresh`, whose live range has already been populated.
    /// The old buffer is released without dropping anything in it.
    fn adopt(&mut self, mut fresh: RawMemory<T>) {
        log::trace!(
            "relocated {} elements: capacity {} -> {}",
            self.len,
            self.capacity(),
            fresh.capacity()
        );
        self.data.swap(&mut fresh);
    }

    /// Write `value` into slot `len` and count it.
    ///
    /// # Safety
    ///
    /// `len < capacity`.
    unsafe fn write_next(&mut self, value: T) {
        // SAFETY: upheld by the caller.
        unsafe { self.data.slot_mut(self.len).write(value) };
        self.len += 1;
    }
}

impl<T> Drop for GrowVec<T> {
    fn drop(&mut self) {
        // SAFETY: `[0, len)` are live. `RawMemory` frees the buffer after.
        unsafe { ptr::drop_in_place(self.as_mut_slice() as *mut [T]) }
    }
}

impl<T> Default for GrowVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for GrowVec<T> {
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity(self.len);
        for item in self.iter() {
            // SAFETY: `copy` has exactly `self.len` slots and receives at
            // most that many values.
            unsafe { copy.write_next(item.clone()) };
        }
        copy
    }

    /// Copy-assignment.
    ///
    /// If `source` does not fit in the current capacity, a full clone is
    /// built and swapped in, so a panicking clone leaves `self` untouched.
    /// Otherwise the shared prefix is assigned element by element with
    /// `clone_from`, then the tail is cloned in or dropped. A panic on that
    /// path leaves `self` valid but partially assigned.
    fn clone_from(&mut self, source: &Self) {
        if source.len > self.capacity() {
            let mut copy = source.clone();
            self.swap(&mut copy);
            return;
        }
        let shared = self.len.min(source.len);
        self.as_mut_slice()[..shared].clone_from_slice(&source[..shared]);
        if source.len < self.len {
            self.truncate(source.len);
        } else {
            for item in &source[shared..] {
                // SAFETY: `source.len <= capacity`, and this loop stops once
                // `len == source.len`.
                unsafe { self.write_next(item.clone()) };
            }
        }
    }
}

impl<T> Deref for GrowVec<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for GrowVec<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug> fmt::Debug for GrowVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

impl<T: PartialEq<U>, U> PartialEq<GrowVec<U>> for GrowVec<T> {
    fn eq(&self, other: &GrowVec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for GrowVec<T> {}

impl<T: PartialEq<U>, U> PartialEq<[U]> for GrowVec<T> {
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<[U; N]> for GrowVec<T> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T> Extend<T> for GrowVec<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve_amortized(lower);
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<T> FromIterator<T> for GrowVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = Self::new();
        vec.extend(iter);
        vec
    }
}

impl<'a, T> IntoIterator for &'a GrowVec<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut GrowVec<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> IntoIterator for GrowVec<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let mut this = ManuallyDrop::new(self);
        let data = mem::take(&mut this.data);
        IntoIter {
            data,
            front: 0,
            back: this.len,
        }
    }
}

/// Owning iterator over a [`GrowVec`], created by `into_iter`.
///
/// Holds the vector's buffer; slots `[front, back)` are still live.
/// Elements not yielded are dropped with the iterator.
pub struct IntoIter<T> {
    data: RawMemory<T>,
    front: usize,
    back: usize,
}

impl<T> IntoIter<T> {
    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[front, back)` are live.
        unsafe { slice::from_raw_parts(self.data.slot(self.front), self.back - self.front) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        // SAFETY: `front < back`, so the slot is live; advancing `front`
        // hands ownership to the caller.
        let item = unsafe { self.data.slot(self.front).read() };
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: slot `back` was live and is no longer in range.
        Some(unsafe { self.data.slot(self.back).read() })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let remaining =
            ptr::slice_from_raw_parts_mut(self.data.slot_mut(self.front), self.back - self.front);
        self.front = self.back;
        // SAFETY: the remaining range is live and now out of range.
        unsafe { ptr::drop_in_place(remaining) };
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}
