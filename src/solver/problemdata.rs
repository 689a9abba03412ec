use crate::algebra::*;
use crate::solver::{SetupError, BOUND_INFINITY};

/// Problem data held by the solver, in scaled form after
/// [`equilibrate`](crate::solver::equilibrate).
#[derive(Debug)]
pub(crate) struct ProblemData<T> {
    pub P: CscMatrix<T>,
    pub q: Vec<T>,
    pub A: CscMatrix<T>,
    pub l: Vec<T>,
    pub u: Vec<T>,
    pub n: usize,
    pub m: usize,
    // some l[i] > u[i] in the caller's data
    pub crossed_bounds: bool,
}

impl<T> ProblemData<T>
where
    T: FloatT,
{
    pub fn new(
        P: &CscMatrix<T>,
        q: &[T],
        A: &CscMatrix<T>,
        l: &[T],
        u: &[T],
    ) -> Result<Self, SetupError> {
        check_dimensions(P, q, A, l, u)?;
        check_values(P, q, A, l, u)?;

        let P = P.canonicalize();
        let A = A.canonicalize();

        if !P.is_triu() {
            return Err(SetupError::InvalidData("P must be upper triangular"));
        }

        let crossed_bounds = std::iter::zip(l, u).any(|(l, u)| l > u);

        // clip infinite and very large bounds
        let inf: T = BOUND_INFINITY.as_T();
        let l = l.iter().map(|&v| T::max(v, -inf)).collect();
        let u = u.iter().map(|&v| T::min(v, inf)).collect();

        let (m, n) = A.size();

        Ok(Self {
            P,
            q: q.to_vec(),
            A,
            l,
            u,
            n,
            m,
            crossed_bounds,
        })
    }
}

fn check_dimensions<T: FloatT>(
    P: &CscMatrix<T>,
    q: &[T],
    A: &CscMatrix<T>,
    l: &[T],
    u: &[T],
) -> Result<(), SetupError> {
    let n = q.len();
    let m = l.len();

    if P.size() != (n, n) {
        return Err(SetupError::Dimension("P must be square with q.len() columns"));
    }
    if A.size() != (m, n) {
        return Err(SetupError::Dimension("A must be l.len() x q.len()"));
    }
    if u.len() != m {
        return Err(SetupError::Dimension("l and u must have the same length"));
    }
    if P.check_format().is_err() || A.check_format().is_err() {
        return Err(SetupError::InvalidData("badly formatted sparse matrix"));
    }
    Ok(())
}

fn check_values<T: FloatT>(
    P: &CscMatrix<T>,
    q: &[T],
    A: &CscMatrix<T>,
    l: &[T],
    u: &[T],
) -> Result<(), SetupError> {
    if !P.nzval.is_finite() || !A.nzval.is_finite() || !q.is_finite() {
        return Err(SetupError::InvalidData("non-finite objective or constraint data"));
    }
    if l.iter().chain(u).any(|v| v.is_nan()) {
        return Err(SetupError::InvalidData("NaN bound"));
    }
    Ok(())
}
