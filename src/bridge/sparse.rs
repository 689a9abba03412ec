//! Triplet to compressed sparse column conversion for foreign input.

use super::MarshalError;
use crate::algebra::{CscMatrix, SparseFormatError, TripletMatrix};

/// Entries with magnitude at or below this are not stored.
pub const NONZERO_THRESHOLD: f64 = 1e-15;

/// Converts a dimension received from the caller.
pub(crate) fn dimension(what: &'static str, value: i64) -> Result<usize, MarshalError> {
    usize::try_from(value).map_err(|_| MarshalError::NegativeDimension { what, value })
}

/// Builds an `nrow x ncol` matrix from 0-based triplets.
///
/// The three sequences must have equal length, and every index must lie
/// within the matrix.  Entries are grouped by column in input order and
/// duplicates are kept.  Entries no larger than [`NONZERO_THRESHOLD`] in
/// magnitude are dropped.  The result never aliases the input sequences.
///
/// `matrix` names the matrix in any error returned.
pub fn build(
    matrix: &'static str,
    nrow: usize,
    ncol: usize,
    rows: &[i64],
    cols: &[i64],
    vals: &[f64],
) -> Result<CscMatrix<f64>, MarshalError> {
    for (idx, what) in [(rows, "row indices"), (cols, "column indices")] {
        if idx.len() != vals.len() {
            return Err(MarshalError::LengthMismatch {
                what,
                expected: vals.len(),
                found: idx.len(),
            });
        }
    }

    let triplets = TripletMatrix::new(nrow, ncol, rows, cols, vals).map_err(|_| {
        MarshalError::LengthMismatch {
            what: matrix,
            expected: vals.len(),
            found: rows.len().min(cols.len()),
        }
    })?;

    let mut mat = CscMatrix::from_triplets(triplets).map_err(|e| match e {
        SparseFormatError::BadTripletIndex {
            position,
            row,
            col,
            nrow,
            ncol,
        } => MarshalError::InvalidIndex {
            matrix,
            position,
            row,
            col,
            nrow,
            ncol,
        },
        _ => MarshalError::Allocation {
            what: matrix,
            count: vals.len(),
        },
    })?;

    let dropped = mat.dropzeros(NONZERO_THRESHOLD);
    log::debug!(
        "{matrix}: built {nrow} x {ncol} matrix with {} entries ({dropped} dropped)",
        mat.nnz()
    );
    Ok(mat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_empty() {
        let mat = build("A", 2, 3, &[], &[], &[]).unwrap();
        assert_eq!(mat.colptr, vec![0, 0, 0, 0]);
        assert!(mat.rowval.is_empty() && mat.nzval.is_empty());
    }

    #[test]
    fn test_build_round_trip() {
        let rows = [1, 0, 2, 0, 1];
        let cols = [0, 2, 1, 0, 0];
        let vals = [1., 2., 3., 4., 5.];
        let mat = build("A", 3, 3, &rows, &cols, &vals).unwrap();
        assert!(mat.check_format().is_ok());

        let mut input: Vec<_> = (0..5).map(|k| (rows[k] as usize, cols[k] as usize, vals[k])).collect();
        let mut output: Vec<_> = mat.triplets().collect();
        let key = |a: &(usize, usize, f64), b: &(usize, usize, f64)| a.partial_cmp(b).unwrap();
        input.sort_by(key);
        output.sort_by(key);
        assert_eq!(input, output);
    }

    #[test]
    fn test_build_duplicates_kept() {
        let mat = build("P", 1, 1, &[0, 0], &[0, 0], &[1., 2.]).unwrap();
        assert_eq!(mat.nnz(), 2);
        assert_eq!(mat.nzval, vec![1., 2.]);
    }

    #[test]
    fn test_build_drops_tiny_entries() {
        let rows = [0, 1, 0, 1, 0];
        let cols = [0, 0, 1, 1, 1];
        let vals = [0., 2., 1e-16, -1e-15, -3.];
        let mat = build("A", 2, 2, &rows, &cols, &vals).unwrap();

        assert!(mat.check_format().is_ok());
        assert_eq!(mat.colptr, vec![0, 1, 2]);
        assert_eq!(mat.rowval, vec![1, 0]);
        assert_eq!(mat.nzval, vec![2., -3.]);

        // just above the threshold survives
        let mat = build("A", 1, 1, &[0], &[0], &[2e-15]).unwrap();
        assert_eq!(mat.nnz(), 1);

        // invalid values are left for the solver to reject
        let mat = build("A", 1, 1, &[0], &[0], &[f64::NAN]).unwrap();
        assert_eq!(mat.nnz(), 1);
    }

    #[test]
    fn test_build_errors() {
        assert_eq!(
            build("A", 2, 2, &[0, 1], &[0], &[1., 2.]),
            Err(MarshalError::LengthMismatch {
                what: "column indices",
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            build("A", 2, 2, &[0, -1], &[0, 0], &[1., 2.]),
            Err(MarshalError::InvalidIndex {
                matrix: "A",
                position: 1,
                row: -1,
                col: 0,
                nrow: 2,
                ncol: 2
            })
        );
        assert!(matches!(
            build("A", 2, 2, &[0], &[2], &[1.]),
            Err(MarshalError::InvalidIndex { col: 2, .. })
        ));
    }

    #[test]
    fn test_dimension() {
        assert_eq!(dimension("n", 3), Ok(3));
        assert_eq!(
            dimension("n", -1),
            Err(MarshalError::NegativeDimension { what: "n", value: -1 })
        );
    }
}
