use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error type returned by sparse matrix assembly operations.
pub enum SparseFormatError {
    /// Matrix dimension fields and/or array lengths are incompatible
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    /// Data is not sorted by row index within each column
    #[error("Data is not sorted by row index within each column")]
    BadRowOrdering,
    #[error("Row value exceeds the matrix row dimension")]
    /// Row value exceeds the matrix row dimension
    BadRowval,
    #[error("Bad column pointer values")]
    /// Matrix column pointer values are defective
    BadColptr,
    /// Storage for the matrix could not be allocated
    #[error("allocation of {0} entries failed")]
    AllocationFailed(usize),
    /// A triplet entry lies outside the declared matrix dimensions
    #[error("entry {position} at ({row}, {col}) lies outside a {nrow} x {ncol} matrix")]
    BadTripletIndex {
        position: usize,
        row: i64,
        col: i64,
        nrow: usize,
        ncol: usize,
    },
}
