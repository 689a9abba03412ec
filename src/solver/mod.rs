//! Operator splitting (ADMM) solver for convex quadratic programs.
//!
//! Solves problems of the form
//! ```text
//! minimize    ½xᵀPx + qᵀx
//! subject to  l ≤ Ax ≤ u
//! ```
//! with `P` positive semidefinite and supplied by its upper triangle.
//! Bounds may be infinite.  Infinite or very large bounds are clipped to
//! [`BOUND_INFINITY`].
//!
//! The solver is used by the [bridge](crate::bridge) through the
//! [`QpBackend`](crate::bridge::QpBackend) trait, but can also be
//! driven directly:
//!
//! ```no_run
//! use qpbridge::algebra::CscMatrix;
//! use qpbridge::solver::*;
//!
//! let P = CscMatrix::new(2, 2, vec![0, 1, 2], vec![0, 1], vec![4., 2.]);
//! let q = [1., 1.];
//! let A = CscMatrix::new(1, 2, vec![0, 1, 2], vec![0, 0], vec![1., 1.]);
//! let (l, u) = ([1.], [1.]);
//!
//! let settings = AdmmSettingsBuilder::default().verbose(false).build().unwrap();
//! let mut solver = AdmmSolver::new(&P, &q, &A, &l, &u, settings).unwrap();
//! solver.solve().unwrap();
//! assert_eq!(solver.solution.status, SolverStatus::Solved);
//! ```

#![allow(non_snake_case)]

/// Bound magnitude treated as infinite.  Larger bounds are clipped to it.
pub const BOUND_INFINITY: f64 = 1e20;

mod equilibration;
mod error;
mod info;
mod info_print;
mod kktsystem;
mod polish;
mod problemdata;
mod residuals;
mod settings;
mod solution;
#[allow(clippy::module_inception)]
mod solver;
mod status;
mod variables;

pub use error::*;
pub use info::*;
pub use settings::*;
pub use solution::*;
pub use solver::*;
pub use status::*;

pub(crate) use equilibration::*;
pub(crate) use kktsystem::*;
pub(crate) use problemdata::*;
pub(crate) use residuals::*;
pub(crate) use variables::*;

// step size and scaling limits
pub(crate) const RHO_MIN: f64 = 1e-6;
pub(crate) const RHO_MAX: f64 = 1e6;
pub(crate) const RHO_TOL: f64 = 1e-4;
pub(crate) const RHO_EQ_OVER_RHO_INEQ: f64 = 1e3;
pub(crate) const MIN_SCALING: f64 = 1e-4;
pub(crate) const MAX_SCALING: f64 = 1e4;
pub(crate) const DIVISION_TOL: f64 = 1e-30;
