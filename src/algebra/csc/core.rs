#![allow(non_snake_case)]

use crate::algebra::{
    Adjoint, CscMatrix, FloatT, MatrixShape, ShapedMatrix, SparseFormatError, Symmetric,
};
use std::iter::zip;

/// Sparse matrix in standard Compressed Sparse Column (CSC) format
///
/// __Example usage__ : To construct the 3 x 3 matrix
/// ```text
/// A = [1.  3.  5.]
///     [2.  0.  6.]
///     [0.  4.  7.]
/// ```
///
/// ```no_run
/// use qpbridge::algebra::CscMatrix;
///
/// let A : CscMatrix<f64> = CscMatrix::new(
///    3,                                // m
///    3,                                // n
///    vec![0, 2, 4, 7],                 //colptr
///    vec![0, 1, 0, 2, 0, 1, 2],        //rowval
///    vec![1., 2., 3., 4., 5., 6., 7.], //nzval
///  );
///
/// // optional correctness check
/// assert!(A.check_format().is_ok());
///
/// ```
///
impl<T> CscMatrix<T>
where
    T: FloatT,
{
    /// `CscMatrix` constructor.
    ///
    /// # Panics
    /// Makes rudimentary dimensional compatibility checks and panics on
    /// failure.   This constructor does __not__ ensure that rows indices
    /// are all in bounds.  Use [`check_format`](CscMatrix::check_format)
    /// for a full check.
    pub fn new(m: usize, n: usize, colptr: Vec<usize>, rowval: Vec<usize>, nzval: Vec<T>) -> Self {
        assert_eq!(rowval.len(), nzval.len());
        assert_eq!(colptr.len(), n + 1);
        assert_eq!(colptr[n], rowval.len());
        CscMatrix {
            m,
            n,
            colptr,
            rowval,
            nzval,
        }
    }

    /// allocate space for a sparse matrix with `nnz` elements
    ///
    /// To make an m x n matrix of zeros, use
    /// ```no_run
    /// use qpbridge::algebra::CscMatrix;
    /// let A : CscMatrix<f64> = CscMatrix::spalloc(3, 4, 0);
    /// ```
    pub fn spalloc(m: usize, n: usize, nnz: usize) -> Self {
        let mut colptr = vec![0; n + 1];
        let rowval = vec![0; nnz];
        let nzval = vec![T::zero(); nnz];
        colptr[n] = nnz;

        CscMatrix::new(m, n, colptr, rowval, nzval)
    }

    /// Same as [`spalloc`](CscMatrix::spalloc), but reports allocation
    /// failure instead of aborting.
    pub fn try_spalloc(m: usize, n: usize, nnz: usize) -> Result<Self, SparseFormatError> {
        let failed = |_| SparseFormatError::AllocationFailed(nnz);
        let ncolptr = n.checked_add(1).ok_or(SparseFormatError::AllocationFailed(n))?;

        let mut colptr = Vec::new();
        colptr.try_reserve_exact(ncolptr).map_err(|_| SparseFormatError::AllocationFailed(n))?;
        let mut rowval = Vec::new();
        rowval.try_reserve_exact(nnz).map_err(failed)?;
        let mut nzval = Vec::new();
        nzval.try_reserve_exact(nnz).map_err(failed)?;

        colptr.resize(ncolptr, 0);
        rowval.resize(nnz, 0);
        nzval.resize(nnz, T::zero());
        colptr[n] = nnz;

        Ok(CscMatrix::new(m, n, colptr, rowval, nzval))
    }

    /// Sparse m x n matrix with no stored entries
    pub fn zeros(m: usize, n: usize) -> Self {
        Self::spalloc(m, n, 0)
    }

    /// Identity matrix of size `n`
    pub fn identity(n: usize) -> Self {
        let colptr = (0usize..=n).collect();
        let rowval = (0usize..n).collect();
        let nzval = vec![T::one(); n];

        CscMatrix::new(n, n, colptr, rowval, nzval)
    }

    /// number of nonzeros
    pub fn nnz(&self) -> usize {
        self.colptr[self.n]
    }

    /// transpose
    pub fn t(&self) -> Adjoint<'_, Self> {
        Adjoint { src: self }
    }

    /// symmetric view
    pub fn sym(&self) -> Symmetric<'_, Self> {
        debug_assert!(self.is_triu());
        Symmetric { src: self }
    }

    /// Check that matrix data is correctly formatted.
    ///
    /// Row indices within a column are only required to be in bounds,
    /// not sorted.  Use [`check_format_sorted`](CscMatrix::check_format_sorted)
    /// when strictly increasing rows are also required.
    pub fn check_format(&self) -> Result<(), SparseFormatError> {
        if self.rowval.len() != self.nzval.len() {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        if self.colptr.is_empty()
            || (self.colptr.len() - 1) != self.n
            || self.colptr[self.n] != self.rowval.len()
        {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        //check for colptr monotonicity
        if self.colptr[0] != 0 || self.colptr.windows(2).any(|c| c[0] > c[1]) {
            return Err(SparseFormatError::BadColptr);
        }

        //check for row values out of bounds
        if !self.rowval.iter().all(|r| r < &self.m) {
            return Err(SparseFormatError::BadRowval);
        }

        Ok(())
    }

    /// As [`check_format`](CscMatrix::check_format), but also requires
    /// strictly increasing row indices within each column.
    pub fn check_format_sorted(&self) -> Result<(), SparseFormatError> {
        self.check_format()?;
        for col in 0..self.n {
            let rng = self.colptr[col]..self.colptr[col + 1];
            if self.rowval[rng].windows(2).any(|c| c[0] >= c[1]) {
                return Err(SparseFormatError::BadRowOrdering);
            }
        }
        Ok(())
    }

    /// Iterate over all stored entries as `(row, col, value)` in storage order.
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        (0..self.n).flat_map(move |col| {
            let rng = self.colptr[col]..self.colptr[col + 1];
            zip(&self.rowval[rng.clone()], &self.nzval[rng]).map(move |(&r, &v)| (r, col, v))
        })
    }

    /// Returns a copy with rows sorted within each column and
    /// duplicate entries summed together.
    pub fn canonicalize(&self) -> Self {
        let mut colptr = vec![0; self.n + 1];
        let mut rowval = Vec::with_capacity(self.nnz());
        let mut nzval = Vec::with_capacity(self.nnz());

        let mut scratch: Vec<(usize, T)> = Vec::new();
        for col in 0..self.n {
            let rng = self.colptr[col]..self.colptr[col + 1];
            scratch.clear();
            scratch.extend(zip(&self.rowval[rng.clone()], &self.nzval[rng]).map(|(&r, &v)| (r, v)));
            // stable, so duplicates are summed in input order
            scratch.sort_by_key(|&(r, _)| r);

            for &(row, val) in scratch.iter() {
                let repeated = rowval.len() > colptr[col] && rowval.last() == Some(&row);
                match nzval.last_mut() {
                    Some(last) if repeated => *last += val,
                    _ => {
                        rowval.push(row);
                        nzval.push(val);
                    }
                }
            }
            colptr[col + 1] = rowval.len();
        }

        CscMatrix::new(self.m, self.n, colptr, rowval, nzval)
    }

    /// Drops stored entries whose magnitude is at most `threshold`.
    /// NaN entries are kept.  Returns the number of entries removed.
    pub fn dropzeros(&mut self, threshold: T) -> usize {
        let mut writeidx = 0;
        let mut readidx = 0;

        for col in 0..self.n {
            let stop = self.colptr[col + 1];
            while readidx < stop {
                let (row, val) = (self.rowval[readidx], self.nzval[readidx]);
                if !(val.abs() <= threshold) {
                    self.rowval[writeidx] = row;
                    self.nzval[writeidx] = val;
                    writeidx += 1;
                }
                readidx += 1;
            }
            self.colptr[col + 1] = writeidx;
        }
        let dropped = self.rowval.len() - writeidx;
        self.rowval.truncate(writeidx);
        self.nzval.truncate(writeidx);
        dropped
    }

    /// Select a subset of the rows of a sparse matrix
    ///
    /// # Panics
    /// Panics if row dimensions are incompatible
    pub fn select_rows(&self, rowidx: &[bool]) -> Self {
        //first check for compatible row dimensions
        assert_eq!(rowidx.len(), self.m);

        //count the number of rows in the reduced matrix and build an
        //index from the logical rowidx to the reduced row number
        let mut rridx = vec![0; self.m];
        let mut mred = 0;
        for (r, is_used) in zip(&mut rridx, rowidx) {
            if *is_used {
                *r = mred;
                mred += 1;
            }
        }

        // count the nonzeros in Ared
        let nzred = self.rowval.iter().filter(|&r| rowidx[*r]).count();

        // Allocate a reduced size A
        let mut Ared = CscMatrix::spalloc(mred, self.n, nzred);

        //populate new matrix
        let mut ptrred = 0;
        for col in 0..self.n {
            Ared.colptr[col] = ptrred;
            for ptr in self.colptr[col]..self.colptr[col + 1] {
                let thisrow = self.rowval[ptr];
                if rowidx[thisrow] {
                    Ared.rowval[ptrred] = rridx[thisrow];
                    Ared.nzval[ptrred] = self.nzval[ptr];
                    ptrred += 1;
                }
            }
        }
        Ared.colptr[Ared.n] = ptrred;

        Ared
    }

    /// True if the matrix is upper triangular
    pub fn is_triu(&self) -> bool {
        // check lower triangle for any structural entries, regardless
        // of the values that may be assigned to them
        for col in 0..self.ncols() {
            let rows = &self.rowval[self.colptr[col]..self.colptr[col + 1]];
            if rows.iter().any(|&row| row > col) {
                return false;
            }
        }
        true
    }

    /// Returns the value at the given (row,col) index as an Option,
    /// summing duplicates if present.  Returns None if the given index
    /// is not a structural nonzero.
    ///
    /// # Panics
    /// Panics if the given index is out of bounds.
    pub fn get_entry(&self, idx: (usize, usize)) -> Option<T> {
        let (row, col) = idx;
        assert!(row < self.nrows() && col < self.ncols());

        let first = self.colptr[col];
        let last = self.colptr[col + 1];

        zip(&self.rowval[first..last], &self.nzval[first..last])
            .filter(|(&r, _)| r == row)
            .map(|(_, &v)| v)
            .reduce(|a, b| a + b)
    }
}

impl<T> ShapedMatrix for CscMatrix<T> {
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
    fn shape(&self) -> MatrixShape {
        MatrixShape::N
    }
}

#[test]
fn test_csc_get_entry() {
    // A =
    //[ ⋅   4.0    ⋅    ⋅   12.0]
    //[1.0  5.0    ⋅    ⋅     ⋅ ]
    //[ ⋅   6.0    ⋅    ⋅   13.0]
    //[2.0  7.0  10.0   ⋅     ⋅ ]
    //[ ⋅   8.0  11.0   ⋅   14.0]
    //[3.0  9.0    ⋅    ⋅     ⋅ ]

    let A = CscMatrix::new(
        6,                                                                 // m
        5,                                                                 // n
        vec![0, 3, 9, 11, 11, 14],                                         // colptr
        vec![1, 3, 5, 0, 1, 2, 3, 4, 5, 3, 4, 0, 2, 4],                    // rowval
        vec![1., 2., 3., 4., 5., 6., 7., 8., 9., 10., 11., 12., 13., 14.], // nzval
    );

    assert_eq!(A.get_entry((1, 0)), Some(1.));
    assert_eq!(A.get_entry((5, 1)), Some(9.));
    assert_eq!(A.get_entry((4, 4)), Some(14.));
    assert!(A.get_entry((0, 0)).is_none());
    assert!(A.get_entry((2, 3)).is_none());
}

#[test]
fn test_csc_canonicalize() {
    // column 0 holds rows [2, 0, 2], column 1 holds row 1
    let A = CscMatrix::new(
        3,
        2,
        vec![0, 3, 4],
        vec![2, 0, 2, 1],
        vec![1., 5., 2., 7.],
    );
    assert!(A.check_format().is_ok());
    assert!(A.check_format_sorted().is_err());

    let C = A.canonicalize();
    assert_eq!(C.colptr, vec![0, 2, 3]);
    assert_eq!(C.rowval, vec![0, 2, 1]);
    assert_eq!(C.nzval, vec![5., 3., 7.]);
    assert!(C.check_format_sorted().is_ok());
}

#[test]
fn test_csc_dropzeros() {
    let mut A = CscMatrix::new(
        2,
        2,
        vec![0, 2, 4],
        vec![0, 1, 0, 1],
        vec![1e-16, 2., -1e-20, 4.],
    );
    assert_eq!(A.dropzeros(1e-15), 2);
    assert_eq!(A.colptr, vec![0, 1, 2]);
    assert_eq!(A.rowval, vec![1, 1]);
    assert_eq!(A.nzval, vec![2., 4.]);
}

#[test]
fn test_csc_select_rows() {
    let A = CscMatrix::new(
        3,
        2,
        vec![0, 2, 4],
        vec![0, 2, 1, 2],
        vec![1., 2., 3., 4.],
    );
    let R = A.select_rows(&[true, false, true]);
    assert_eq!(R.m, 2);
    assert_eq!(R.colptr, vec![0, 2, 3]);
    assert_eq!(R.rowval, vec![0, 1, 1]);
    assert_eq!(R.nzval, vec![1., 2., 4.]);
}
