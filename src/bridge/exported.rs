//! Scoped access to caller-owned buffers.
//!
//! Every buffer the caller passes in is acquired through a per-call
//! [`CallScope`].  An acquisition returns a guard that dereferences to a
//! slice and records its release in the scope when dropped, so the
//! number of acquisitions and releases can be checked on every exit path.

use super::MarshalError;
use std::cell::Cell;
use std::ops::{Deref, DerefMut};

/// Read-only array passed across the C ABI.
///
/// A null `data` pointer with `len == 0` is the empty array.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ArrayHandle<T> {
    pub data: *const T,
    pub len: usize,
}

impl<T> ArrayHandle<T> {
    pub fn from_slice(s: &[T]) -> Self {
        Self {
            data: s.as_ptr(),
            len: s.len(),
        }
    }

    pub fn empty() -> Self {
        Self {
            data: std::ptr::null(),
            len: 0,
        }
    }
}

/// Writable array passed across the C ABI.
#[repr(C)]
#[derive(Debug)]
pub struct ArrayHandleMut<T> {
    pub data: *mut T,
    pub len: usize,
}

impl<T> ArrayHandleMut<T> {
    pub fn from_slice(s: &mut [T]) -> Self {
        Self {
            data: s.as_mut_ptr(),
            len: s.len(),
        }
    }
}

/// Ledger of the buffers acquired during one call.
#[derive(Debug, Default)]
pub struct CallScope {
    acquired: Cell<usize>,
    released: Cell<usize>,
}

impl CallScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquired(&self) -> usize {
        self.acquired.get()
    }

    pub fn released(&self) -> usize {
        self.released.get()
    }

    /// True when every acquired buffer has been released.
    pub fn is_balanced(&self) -> bool {
        self.acquired() == self.released()
    }

    fn record_acquire(&self, what: &'static str, len: usize) {
        self.acquired.set(self.acquired.get() + 1);
        log::debug!("acquired {what} ({len} elements)");
    }

    fn record_release(&self, what: &'static str) {
        self.released.set(self.released.get() + 1);
        log::debug!("released {what}");
    }

    /// Acquires a buffer that is already a Rust slice.
    pub fn borrow<'s, T>(&'s self, what: &'static str, data: &'s [T]) -> Exported<'s, T> {
        self.record_acquire(what, data.len());
        Exported {
            data,
            what,
            scope: self,
        }
    }

    /// Acquires a writable buffer that is already a Rust slice.
    pub fn borrow_mut<'s, T>(&'s self, what: &'static str, data: &'s mut [T]) -> ExportedMut<'s, T> {
        self.record_acquire(what, data.len());
        ExportedMut {
            data,
            what,
            scope: self,
        }
    }

    /// Acquires a foreign read-only buffer.
    ///
    /// # Safety
    /// A non-null `handle.data` must point to `handle.len` initialised
    /// values that stay valid and unmodified for the lifetime `'s`.
    pub unsafe fn acquire<'s, T>(
        &'s self,
        what: &'static str,
        handle: &ArrayHandle<T>,
    ) -> Result<Exported<'s, T>, MarshalError> {
        let data: &'s [T] = match (handle.data.is_null(), handle.len) {
            (true, 0) => &[],
            (true, len) => return Err(MarshalError::NullBuffer { what, len }),
            (false, len) => std::slice::from_raw_parts(handle.data, len),
        };
        Ok(self.borrow(what, data))
    }

    /// Acquires a foreign writable buffer.
    ///
    /// # Safety
    /// A non-null `handle.data` must point to `handle.len` initialised
    /// values that are valid for writes and not aliased for the
    /// lifetime `'s`.
    pub unsafe fn acquire_mut<'s, T>(
        &'s self,
        what: &'static str,
        handle: &mut ArrayHandleMut<T>,
    ) -> Result<ExportedMut<'s, T>, MarshalError> {
        let data: &'s mut [T] = match (handle.data.is_null(), handle.len) {
            (true, 0) => &mut [],
            (true, len) => return Err(MarshalError::NullBuffer { what, len }),
            (false, len) => std::slice::from_raw_parts_mut(handle.data, len),
        };
        Ok(self.borrow_mut(what, data))
    }
}

/// Read-only guard over a caller-owned buffer.
#[derive(Debug)]
pub struct Exported<'s, T> {
    data: &'s [T],
    what: &'static str,
    scope: &'s CallScope,
}

impl<T> Deref for Exported<'_, T> {
    type Target = [T];
    fn deref(&self) -> &[T] {
        self.data
    }
}

impl<T> Drop for Exported<'_, T> {
    fn drop(&mut self) {
        self.scope.record_release(self.what);
    }
}

/// Writable guard over a caller-owned buffer.
#[derive(Debug)]
pub struct ExportedMut<'s, T> {
    data: &'s mut [T],
    what: &'static str,
    scope: &'s CallScope,
}

impl<T> Deref for ExportedMut<'_, T> {
    type Target = [T];
    fn deref(&self) -> &[T] {
        self.data
    }
}

impl<T> DerefMut for ExportedMut<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.data
    }
}

impl<T> Drop for ExportedMut<'_, T> {
    fn drop(&mut self) {
        self.scope.record_release(self.what);
    }
}
