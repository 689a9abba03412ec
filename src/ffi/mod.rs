//! C ABI for managed-runtime callers.
//!
//! The library exports [`qpbridge_solve`], which takes every array as an
//! [`ArrayHandle`](crate::bridge::ArrayHandle) and returns the integer
//! status described in [`bridge`](crate::bridge).  The handles are
//! plain `#[repr(C)]` structs, so a caller on the JVM, the CLR or any
//! C-compatible runtime only needs to lay out two fields per array.

pub(crate) mod interface;

pub use interface::*;
