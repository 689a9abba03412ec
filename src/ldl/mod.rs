//! Sparse $LDL^T$ factorisation for quasidefinite systems.
//!
//! Used by the ADMM backend to factor its KKT system and the reduced
//! system solved when polishing.  The input is the upper triangle of a
//! symmetric matrix.  Factoring splits into a symbolic phase (fill
//! reducing ordering, elimination tree, column counts of $L$) done once,
//! and a numeric phase that can be repeated after entries change.

#![allow(non_snake_case)]

mod numeric;
mod symbolic;

use crate::algebra::*;
use numeric::Workspace;
use thiserror::Error;

/// Failures of [`LdlFactors`] construction and refactorisation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LdlError {
    #[error("Matrix is not square")]
    NotSquare,
    #[error("Matrix has a column without a diagonal entry")]
    MissingDiagonal,
    #[error("Matrix is not upper triangular")]
    NotUpperTriangular,
    #[error("Zero pivot in column {0}")]
    ZeroPivot(usize),
    #[error("Invalid permutation vector")]
    InvalidPermutation,
    #[error("Fill reducing ordering failed")]
    OrderingFailed,
}

/// Elimination order used by [`LdlFactors::with_ordering`].
#[derive(Debug, Clone, PartialEq)]
pub enum Ordering {
    /// Approximate minimum degree, with a multiplier on its dense row
    /// threshold.
    Amd { dense_scale: f64 },
    /// Caller supplied permutation.  Position `k` eliminates index `perm[k]`.
    Given(Vec<usize>),
}

impl Default for Ordering {
    fn default() -> Self {
        Ordering::Amd { dense_scale: 1.5 }
    }
}

/// $PAP^T = LDL^T$ for a symmetric quasidefinite matrix $A$.
#[derive(Debug)]
pub struct LdlFactors<T = f64> {
    perm: Vec<usize>,
    parent: Vec<Option<usize>>,
    // PAPᵀ, upper triangle, and where each input entry landed in it
    upper: CscMatrix<T>,
    landing: Vec<usize>,
    L: CscMatrix<T>,
    d: Vec<T>,
    dinv: Vec<T>,
    positive: usize,
    work: Workspace<T>,
}

impl<T: FloatT> LdlFactors<T> {
    /// Factors `A` under an AMD ordering.
    pub fn new(A: &CscMatrix<T>) -> Result<Self, LdlError> {
        Self::with_ordering(A, Ordering::default())
    }

    pub fn with_ordering(A: &CscMatrix<T>, ordering: Ordering) -> Result<Self, LdlError> {
        symbolic::check_pattern(A)?;
        let n = A.n;

        let perm = match ordering {
            _ if n == 0 => Vec::new(),
            Ordering::Given(perm) => perm,
            Ordering::Amd { dense_scale } => symbolic::amd_ordering(A, dense_scale)?,
        };
        let iperm = symbolic::inverse(&perm, n)?;

        let (upper, landing) = symbolic::permute_upper(A, &iperm);
        let (parent, counts) = symbolic::elimination_tree(&upper);

        let mut colptr = Vec::with_capacity(n + 1);
        let mut total = 0;
        colptr.push(total);
        for c in counts {
            total += c;
            colptr.push(total);
        }
        let nnzL = colptr[n];
        let L = CscMatrix::new(n, n, colptr, vec![0; nnzL], vec![T::zero(); nnzL]);

        let mut factors = Self {
            perm,
            parent,
            upper,
            landing,
            L,
            d: vec![T::zero(); n],
            dinv: vec![T::zero(); n],
            positive: 0,
            work: Workspace::new(n),
        };
        factors.refactor()?;
        Ok(factors)
    }

    /// Dimension of the factored matrix.
    pub fn dim(&self) -> usize {
        self.d.len()
    }

    /// Number of strictly positive pivots in the last factorisation.
    pub fn positive_pivots(&self) -> usize {
        self.positive
    }

    /// Overwrites input entries, addressed by their storage position in
    /// the matrix given at construction.  Takes effect at the next
    /// [`refactor`](LdlFactors::refactor).
    pub fn set_entries(&mut self, positions: &[usize], values: &[T]) {
        assert_eq!(positions.len(), values.len());
        for (&p, &v) in positions.iter().zip(values) {
            self.upper.nzval[self.landing[p]] = v;
        }
    }

    /// Numeric factorisation on the existing symbolic analysis.
    pub fn refactor(&mut self) -> Result<(), LdlError> {
        self.positive = numeric::factor(
            &self.upper,
            &self.parent,
            &mut self.L,
            &mut self.d,
            &mut self.dinv,
            &mut self.work,
        )?;
        Ok(())
    }

    /// Solves $Ax = b$, overwriting `b` with `x`.
    pub fn solve(&mut self, b: &mut [T]) {
        assert_eq!(b.len(), self.dim());

        let x = &mut self.work.y;
        for (xk, &p) in x.iter_mut().zip(&self.perm) {
            *xk = b[p];
        }
        numeric::solve_in_place(&self.L, &self.dinv, x);
        for (&xk, &p) in x.iter().zip(&self.perm) {
            b[p] = xk;
        }
    }
}
