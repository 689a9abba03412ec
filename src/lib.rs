//! __qpbridge__ exposes a native convex quadratic program solver to
//! callers in managed runtimes.  It solves
//!
//! $$
//! \begin{array}{rl}
//! \text{minimize} & \frac{1}{2}x^T P x + q^T x\\\\\[2ex\]
//!  \text{subject to} & l \le Ax \le u
//!  \end{array}
//! $$
//!
//! with decision variables $x \in \mathbb{R}^n$, a positive semidefinite
//! $P \in \mathbb{R}^{n \times n}$ given by its upper triangle,
//! $A \in \mathbb{R}^{m \times n}$ and bounds $l, u \in \mathbb{R}^m$
//! that may be infinite.
//!
//! Callers pass flat arrays: dense vectors for $q$, $l$ and $u$, and
//! 0-based coordinate triplets for $P$ and $A$.  The [`bridge`] turns
//! these into compressed sparse column matrices and a settings record,
//! runs the solver through a session that releases every resource on
//! every path, and reports a single integer status.  Solutions are
//! copied into caller-owned output buffers.
//!
//! ## Features
//!
//! * __C ABI__ (feature `ffi`, on by default): the exported function
//!   `qpbridge_solve` takes `#[repr(C)]` array handles, for use from the
//!   JVM, the CLR or any C-compatible runtime.
//!
//! * __Python__ (feature `python`): `qpbridge.solve(...)` returning
//!   `(status, primal, dual)`.
//!
//! * __Call capture__ (feature `serde`, on by default): a call can be
//!   saved as JSON and replayed offline.
//!
//! The solver backend is an operator splitting (ADMM) method with
//! Ruiz equilibration, adaptive step size, infeasibility detection and
//! solution polishing.  See [`solver`].
//!
//! # License
//!
//! Licensed under Apache License, Version 2.0.

//Rust hates greek characters
#![allow(confusable_idents)]

pub(crate) const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod algebra;
pub mod bridge;
pub mod io;
pub mod ldl;
pub mod solver;
pub(crate) mod stdio;
pub(crate) mod timers;

#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(feature = "python")]
pub mod python;

/// Version of the library.
pub fn version() -> &'static str {
    VERSION
}
