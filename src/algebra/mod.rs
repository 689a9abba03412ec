//! Linear algebra types and operations used by the bridge and the solver.
//!
//! Sparse data is held in compressed sparse column format
//! ([`CscMatrix`]), built from coordinate input ([`TripletMatrix`]).
//! Dense vectors are plain slices, with operations provided through the
//! [`VectorOps`] trait.  Matrix products and scalings come from
//! [`MatrixVectorMultiply`], [`SymMatrixVectorMultiply`] and [`MatrixMath`].

mod csc;
mod dense;
mod error_types;
mod floats;
mod matrix_types;

pub use csc::*;
pub use dense::*;
pub use error_types::*;
pub use floats::*;
pub use matrix_types::*;
