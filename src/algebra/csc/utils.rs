//---------------------------------------------------------
// low-level internal utilities for counting / filling entries
// in block partitioned sparse matrices.
//---------------------------------------------------------

#![allow(non_snake_case)]

use crate::algebra::{CscMatrix, FloatT, MatrixShape};
use std::iter::zip;

impl<T> CscMatrix<T>
where
    T: FloatT,
{
    // increment the self.colptr by the number of nonzeros
    // in a square diagonal matrix placed on the diagonal.
    pub(crate) fn colcount_diag(&mut self, initcol: usize, blockcols: usize) {
        let cols = self.colptr[initcol..(initcol + blockcols)].iter_mut();
        cols.for_each(|x| *x += 1);
    }

    // same as colcount_diag, but counts places where the input
    // matrix M has a missing diagonal entry.  M must be square
    // and TRIU, but need not be sorted within its columns
    pub(crate) fn colcount_missing_diag(&mut self, M: &CscMatrix<T>, initcol: usize) {
        assert_eq!(M.colptr.len(), M.n + 1);
        assert!(self.colptr.len() >= M.n + initcol);

        for i in 0..M.n {
            if !M.has_diagonal_entry(i) {
                self.colptr[i + initcol] += 1;
            }
        }
    }

    // increment the self.colptr by the number of nonzeros in M
    pub(crate) fn colcount_block(&mut self, M: &CscMatrix<T>, initcol: usize, shape: MatrixShape) {
        match shape {
            MatrixShape::T => {
                for row in M.rowval.iter() {
                    self.colptr[initcol + row] += 1;
                }
            }
            MatrixShape::N => {
                // just add the column count
                for i in 0..M.n {
                    self.colptr[initcol + i] += M.colptr[i + 1] - M.colptr[i];
                }
            }
        }
    }

    // populate values from M using the self.colptr as indicator of
    // next fill location in each column.
    pub(crate) fn fill_block(
        &mut self,
        M: &CscMatrix<T>,
        MtoKKT: &mut [usize],
        initrow: usize,
        initcol: usize,
        shape: MatrixShape,
    ) {
        for i in 0..M.n {
            let (start, stop) = (M.colptr[i], M.colptr[i + 1]);
            let entries = zip(&M.rowval[start..stop], &M.nzval[start..stop]);

            for (j, (&Mrow, &Mval)) in (start..stop).zip(entries) {
                let (col, row) = match shape {
                    MatrixShape::T => (Mrow + initcol, i + initrow),
                    MatrixShape::N => (i + initcol, Mrow + initrow),
                };

                let dest = self.colptr[col];
                self.rowval[dest] = row;
                self.nzval[dest] = Mval;
                self.colptr[col] += 1;
                MtoKKT[j] = dest;
            }
        }
    }

    // Populate the diagonal with 0s using the K.colptr as indicator of
    // next fill location in each column
    pub(crate) fn fill_diag(&mut self, diagtoKKT: &mut [usize], offset: usize, blockdim: usize) {
        for (i, col) in (offset..(offset + blockdim)).enumerate() {
            let dest = self.colptr[col];
            self.rowval[dest] = col;
            self.nzval[dest] = T::zero(); //structural zero
            self.colptr[col] += 1;
            diagtoKKT[i] = dest;
        }
    }

    // same as fill_diag, but only places zero entries where
    // the input matrix M has a missing diagonal entry.
    pub(crate) fn fill_missing_diag(&mut self, M: &CscMatrix<T>, initcol: usize) {
        for i in 0..M.n {
            if !M.has_diagonal_entry(i) {
                let col = i + initcol;
                let dest = self.colptr[col];
                self.rowval[dest] = col;
                self.nzval[dest] = T::zero(); //structural zero
                self.colptr[col] += 1;
            }
        }
    }

    pub(crate) fn colcount_to_colptr(&mut self) {
        let mut currentptr = 0;
        for p in &mut self.colptr {
            let count = *p;
            *p = currentptr;
            currentptr += count;
        }
    }

    pub(crate) fn backshift_colptrs(&mut self) {
        self.colptr.rotate_right(1);
        self.colptr[0] = 0;
    }

    // storage index of the (col,col) entry of each column in
    // the range, or None for any column without one
    pub(crate) fn diagonal_positions(&self, cols: std::ops::Range<usize>) -> Option<Vec<usize>> {
        cols.map(|col| {
            (self.colptr[col]..self.colptr[col + 1]).find(|&p| self.rowval[p] == col)
        })
        .collect()
    }

    fn has_diagonal_entry(&self, col: usize) -> bool {
        self.rowval[self.colptr[col]..self.colptr[col + 1]].contains(&col)
    }
}

#[test]
fn test_block_fill() {
    // assemble [M  0; 0 I] with M missing its (1,1) entry
    let M = CscMatrix::new(2, 2, vec![0, 1, 2], vec![0, 0], vec![3., 4.]);
    let mut K = CscMatrix::<f64>::spalloc(4, 4, 5);
    K.colptr.fill(0);

    K.colcount_block(&M, 0, MatrixShape::N);
    K.colcount_missing_diag(&M, 0);
    K.colcount_diag(2, 2);
    K.colcount_to_colptr();

    let mut MtoKKT = vec![0; 2];
    let mut diag = vec![0; 2];
    K.fill_block(&M, &mut MtoKKT, 0, 0, MatrixShape::N);
    K.fill_missing_diag(&M, 0);
    K.fill_diag(&mut diag, 2, 2);
    K.backshift_colptrs();

    assert_eq!(K.colptr, vec![0, 1, 3, 4, 5]);
    assert_eq!(K.rowval, vec![0, 0, 1, 2, 3]);
    assert_eq!(MtoKKT, vec![0, 1]);
    assert_eq!(diag, vec![3, 4]);
    assert_eq!(K.diagonal_positions(0..4), Some(vec![0, 2, 3, 4]));
    assert!(M.diagonal_positions(0..2).is_none());
}
