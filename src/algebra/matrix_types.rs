#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// All internal matrix representations in the solver and the
// bridge are in standard compressed sparse column format.

/// Sparse matrix in standard Compressed Sparse Column (CSC) format
///
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CscMatrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// CSC format column pointer.
    ///
    /// Ths field should have length `n+1`. The last entry corresponds
    /// to the the number of nonzeros and should agree with the lengths
    /// of the `rowval` and `nzval` fields.
    pub colptr: Vec<usize>,
    /// vector of row indices
    pub rowval: Vec<usize>,
    /// vector of non-zero matrix elements
    pub nzval: Vec<T>,
}

/// Sparse matrix in coordinate (triplet) form.
///
/// A transient view over three caller-owned sequences of equal length plus
/// explicit dimensions.  Indices are signed so that values arriving from
/// a foreign caller can be checked before use.  The number of entries is
/// recorded explicitly and does not depend on any capacity reported by the
/// underlying storage.
#[derive(Debug, Clone, Copy)]
pub struct TripletMatrix<'a, T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// number of stored entries
    pub nnz: usize,
    /// row index of each entry
    pub rows: &'a [i64],
    /// column index of each entry
    pub cols: &'a [i64],
    /// value of each entry
    pub vals: &'a [T],
}

/// Matrix orientation marker
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum MatrixShape {
    /// Normal matrix orientation
    N,
    /// Transposed matrix orientation
    T,
}

/// Adjoint of a matrix
#[derive(Debug, Clone, Copy)]
pub struct Adjoint<'a, M> {
    pub src: &'a M,
}

/// Symmetric view of a matrix whose upper triangle is stored
#[derive(Debug, Clone, Copy)]
pub struct Symmetric<'a, M> {
    pub src: &'a M,
}

/// Dimension queries for matrix types
pub trait ShapedMatrix {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn shape(&self) -> MatrixShape;
    fn size(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }
    fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }
}

impl<M> ShapedMatrix for Adjoint<'_, M>
where
    M: ShapedMatrix,
{
    fn nrows(&self) -> usize {
        self.src.ncols()
    }
    fn ncols(&self) -> usize {
        self.src.nrows()
    }
    fn shape(&self) -> MatrixShape {
        MatrixShape::T
    }
}

impl<M> ShapedMatrix for Symmetric<'_, M>
where
    M: ShapedMatrix,
{
    fn nrows(&self) -> usize {
        self.src.nrows()
    }
    fn ncols(&self) -> usize {
        self.src.ncols()
    }
    fn shape(&self) -> MatrixShape {
        MatrixShape::N
    }
}
