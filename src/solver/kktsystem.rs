use crate::algebra::*;
use crate::ldl::{LdlError, LdlFactors};
use crate::solver::SetupError;

/// Assembles the upper triangle of the quasidefinite matrix
/// ```text
/// [ P + shift*I    Aᵀ        ]
/// [ A              -diag(d)  ]
/// ```
/// Returns the matrix and the storage positions of the `-diag(d)`
/// entries, so that they can be updated in place later.
pub(crate) fn assemble_kkt<T: FloatT>(
    P: &CscMatrix<T>,
    A: &CscMatrix<T>,
    shift: T,
    d: &[T],
) -> (CscMatrix<T>, Vec<usize>) {
    let (m, n) = A.size();
    assert_eq!(P.size(), (n, n));
    assert_eq!(d.len(), m);

    // upper bound on the entry count.  Missing P diagonals
    // are counted first so the bound is exact.
    let mut K = CscMatrix::spalloc(n + m, n + m, 0);
    K.colptr.fill(0);
    K.colcount_block(P, 0, MatrixShape::N);
    K.colcount_missing_diag(P, 0);
    K.colcount_block(A, n, MatrixShape::T);
    K.colcount_diag(n, m);
    K.colcount_to_colptr();

    let nnzK = K.colptr[n + m];
    K.rowval = vec![0; nnzK];
    K.nzval = vec![T::zero(); nnzK];

    let mut PtoKKT = vec![0; P.nnz()];
    let mut AtoKKT = vec![0; A.nnz()];
    let mut dtoKKT = vec![0; m];

    K.fill_block(P, &mut PtoKKT, 0, 0, MatrixShape::N);
    K.fill_missing_diag(P, 0);
    K.fill_block(A, &mut AtoKKT, 0, n, MatrixShape::T);
    K.fill_diag(&mut dtoKKT, n, m);
    K.backshift_colptrs();

    // every leading column now has a diagonal
    if let Some(diag) = K.diagonal_positions(0..n) {
        diag.into_iter().for_each(|p| K.nzval[p] += shift);
    }
    for (&p, &di) in std::iter::zip(&dtoKKT, d) {
        K.nzval[p] = -di;
    }

    (K, dtoKKT)
}

/// Factored KKT system for the ADMM x/z update,
/// `[P+σI  Aᵀ; A  -diag(1/ρ)]`.
#[derive(Debug)]
pub(crate) struct KktSystem<T> {
    factors: LdlFactors<T>,
    rho_inv_positions: Vec<usize>,
    values: Vec<T>,
    pub sol: Vec<T>,
}

impl<T> KktSystem<T>
where
    T: FloatT,
{
    pub fn new(
        P: &CscMatrix<T>,
        A: &CscMatrix<T>,
        sigma: T,
        rho_inv_vec: &[T],
    ) -> Result<Self, SetupError> {
        let n = P.n;
        let (K, rho_inv_positions) = assemble_kkt(P, A, sigma, rho_inv_vec);
        let factors = LdlFactors::new(&K)?;

        // P + σI must be positive definite
        if factors.positive_pivots() != n {
            return Err(SetupError::NonConvex);
        }

        Ok(Self {
            factors,
            rho_inv_positions,
            values: vec![T::zero(); rho_inv_vec.len()],
            sol: vec![T::zero(); K.n],
        })
    }

    /// Replaces the lower right diagonal by `-rho_inv_vec` and refactors.
    pub fn update_rho_inv(&mut self, rho_inv_vec: &[T]) -> Result<(), LdlError> {
        self.values.map_from(|v| -v, rho_inv_vec);
        self.factors
            .set_entries(&self.rho_inv_positions, &self.values);
        self.factors.refactor()
    }

    /// Solves with the right hand side held in `self.sol`, in place.
    pub fn solve_in_place(&mut self) {
        self.factors.solve(&mut self.sol);
    }
}

#[test]
fn test_assemble_kkt() {
    // P = [2 1; 0 0] (no (1,1) entry), A = [1 0; 3 4]
    let P = CscMatrix::new(2, 2, vec![0, 1, 2], vec![0, 0], vec![2., 1.]);
    let A = CscMatrix::new(2, 2, vec![0, 2, 3], vec![0, 1, 1], vec![1., 3., 4.]);
    let (K, dpos) = assemble_kkt(&P, &A, 0.5, &[10., 20.]);

    assert!(K.check_format().is_ok());
    assert!(K.is_triu());
    assert_eq!(K.get_entry((0, 0)), Some(2.5));
    assert_eq!(K.get_entry((0, 1)), Some(1.));
    assert_eq!(K.get_entry((1, 1)), Some(0.5));
    assert_eq!(K.get_entry((0, 2)), Some(1.));
    assert_eq!(K.get_entry((0, 3)), Some(3.));
    assert_eq!(K.get_entry((1, 3)), Some(4.));
    assert_eq!(K.get_entry((2, 2)), Some(-10.));
    assert_eq!(K.get_entry((3, 3)), Some(-20.));
    assert_eq!(K.get_entry((1, 2)), None);
    assert_eq!(K.nzval[dpos[1]], -20.);
    assert_eq!(K.nnz(), 8);
}

#[test]
fn test_kkt_nonconvex() {
    // P = [-1]
    let P = CscMatrix::new(1, 1, vec![0, 1], vec![0], vec![-1.]);
    let A = CscMatrix::<f64>::zeros(0, 1);
    assert_eq!(
        KktSystem::new(&P, &A, 1e-6, &[]).err(),
        Some(SetupError::NonConvex)
    );
}
