//---------------------------------------------------------
// coordinate (triplet) input and its conversion to CSC
//---------------------------------------------------------

use crate::algebra::{CscMatrix, FloatT, SparseFormatError, TripletMatrix};

impl<'a, T> TripletMatrix<'a, T>
where
    T: FloatT,
{
    /// Wraps three equal-length sequences as an `m x n` triplet matrix.
    ///
    /// The entry count is taken from `vals` and recorded explicitly.
    pub fn new(
        m: usize,
        n: usize,
        rows: &'a [i64],
        cols: &'a [i64],
        vals: &'a [T],
    ) -> Result<Self, SparseFormatError> {
        let nnz = vals.len();
        if rows.len() != nnz || cols.len() != nnz {
            return Err(SparseFormatError::IncompatibleDimension);
        }
        Ok(Self {
            m,
            n,
            nnz,
            rows,
            cols,
            vals,
        })
    }

    /// Checks every entry against the matrix dimensions, returning
    /// the first offending entry.
    pub fn check_bounds(&self) -> Result<(), SparseFormatError> {
        let in_range = |idx: i64, dim: usize| idx >= 0 && (idx as u64) < dim as u64;

        for k in 0..self.nnz {
            let (row, col) = (self.rows[k], self.cols[k]);
            if !in_range(row, self.m) || !in_range(col, self.n) {
                return Err(SparseFormatError::BadTripletIndex {
                    position: k,
                    row,
                    col,
                    nrow: self.m,
                    ncol: self.n,
                });
            }
        }
        Ok(())
    }
}

impl<T> CscMatrix<T>
where
    T: FloatT,
{
    /// Builds a CSC matrix from triplet data.
    ///
    /// Entries are placed with a stable counting sort on the column
    /// index, so within each column they keep their input order and
    /// are not sorted by row.  Duplicate coordinates are kept as
    /// separate stored entries.  The result owns newly allocated
    /// storage and never aliases the input sequences.
    ///
    /// An empty triplet set gives a valid matrix with all column
    /// pointers equal to zero.
    pub fn from_triplets(triplets: TripletMatrix<'_, T>) -> Result<Self, SparseFormatError> {
        triplets.check_bounds()?;

        let (m, n, nnz) = (triplets.m, triplets.n, triplets.nnz);
        let mut A = CscMatrix::try_spalloc(m, n, nnz)?;

        // count entries per column, shifted by one
        A.colptr[n] = 0;
        for &col in &triplets.cols[..nnz] {
            A.colptr[col as usize + 1] += 1;
        }

        // running sum gives the start of each column
        for col in 0..n {
            A.colptr[col + 1] += A.colptr[col];
        }

        // scatter, using `next` as the fill location in each column
        let mut next = A.colptr[0..n].to_vec();
        for k in 0..nnz {
            let col = triplets.cols[k] as usize;
            let dest = next[col];
            A.rowval[dest] = triplets.rows[k] as usize;
            A.nzval[dest] = triplets.vals[k];
            next[col] += 1;
        }

        debug_assert_eq!(A.colptr[n], nnz);
        Ok(A)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triplets_empty() {
        let t = TripletMatrix::<f64>::new(3, 4, &[], &[], &[]).unwrap();
        let A = CscMatrix::from_triplets(t).unwrap();
        assert_eq!(A.colptr, vec![0; 5]);
        assert!(A.rowval.is_empty());
        assert!(A.nzval.is_empty());
        assert_eq!(A.nnz(), 0);
    }

    #[test]
    fn test_triplets_stable_by_column() {
        // out of order columns, and column 1 rows given as 2 then 0
        let rows = [2, 1, 0, 0];
        let cols = [1, 0, 1, 2];
        let vals = [3., 1., 4., 5.];
        let t = TripletMatrix::new(3, 3, &rows, &cols, &vals).unwrap();
        let A = CscMatrix::from_triplets(t).unwrap();

        assert_eq!(A.colptr, vec![0, 1, 3, 4]);
        assert_eq!(A.rowval, vec![1, 2, 0, 0]);
        assert_eq!(A.nzval, vec![1., 3., 4., 5.]);
        assert!(A.check_format().is_ok());
    }

    #[test]
    fn test_triplets_bad_index() {
        let rows = [0, 3];
        let cols = [0, 0];
        let vals = [1., 2.];
        let t = TripletMatrix::new(3, 1, &rows, &cols, &vals).unwrap();
        assert_eq!(
            CscMatrix::from_triplets(t),
            Err(SparseFormatError::BadTripletIndex {
                position: 1,
                row: 3,
                col: 0,
                nrow: 3,
                ncol: 1
            })
        );

        let t = TripletMatrix::new(3, 1, &[0], &[-1], &[1.]).unwrap();
        assert!(CscMatrix::from_triplets(t).is_err());
    }

    #[test]
    fn test_triplets_length_mismatch() {
        assert!(TripletMatrix::new(2, 2, &[0, 1], &[0], &[1., 2.]).is_err());
    }
}
