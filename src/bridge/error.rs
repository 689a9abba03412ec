use thiserror::Error;

/// Error type returned while moving data across the bridge.
///
/// Every variant collapses to status `-1` at the boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarshalError {
    /// A triplet entry lies outside the declared matrix dimensions
    #[error("{matrix}: entry {position} at ({row}, {col}) lies outside a {nrow} x {ncol} matrix")]
    InvalidIndex {
        matrix: &'static str,
        position: usize,
        row: i64,
        col: i64,
        nrow: usize,
        ncol: usize,
    },
    /// Two sequences that must agree in length do not
    #[error("{what}: expected length {expected}, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{what} must be non-negative, found {value}")]
    NegativeDimension { what: &'static str, value: i64 },
    /// A null data pointer with a non-zero length
    #[error("{what}: null buffer with length {len}")]
    NullBuffer { what: &'static str, len: usize },
    #[error(
        "numeric width mismatch: backend uses {found_index}/{found_float} byte \
         indices/floats, caller expects {expected_index}/{expected_float}"
    )]
    WidthMismatch {
        expected_index: usize,
        expected_float: usize,
        found_index: usize,
        found_float: usize,
    },
    #[error("{what}: allocation of {count} entries failed")]
    Allocation { what: &'static str, count: usize },
}
