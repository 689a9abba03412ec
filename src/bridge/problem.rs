#![allow(non_snake_case)]

use super::{sparse, Exported, MarshalError};
use crate::algebra::CscMatrix;

/// Triplet arrays for one matrix, as acquired from the caller.
#[derive(Debug)]
pub struct TripletGuards<'s> {
    pub rows: Exported<'s, i64>,
    pub cols: Exported<'s, i64>,
    pub vals: Exported<'s, f64>,
}

impl TripletGuards<'_> {
    // consumes the guards, releasing them once the matrix is built
    fn into_matrix(
        self,
        matrix: &'static str,
        nrow: usize,
        ncol: usize,
    ) -> Result<CscMatrix<f64>, MarshalError> {
        sparse::build(matrix, nrow, ncol, &self.rows, &self.cols, &self.vals)
    }
}

/// A QP instance ready for the solver.
///
/// The two matrices are owned.  The dense vectors stay borrowed from
/// the caller and are released when the instance is dropped.
#[derive(Debug)]
pub struct ProblemInstance<'s> {
    pub n: usize,
    pub m: usize,
    /// quadratic objective, `n x n`, upper triangle
    pub P: CscMatrix<f64>,
    pub q: Exported<'s, f64>,
    /// constraint matrix, `m x n`
    pub A: CscMatrix<f64>,
    pub l: Exported<'s, f64>,
    pub u: Exported<'s, f64>,
}

fn check_len(what: &'static str, v: &[f64], expected: usize) -> Result<(), MarshalError> {
    if v.len() == expected {
        Ok(())
    } else {
        Err(MarshalError::LengthMismatch {
            what,
            expected,
            found: v.len(),
        })
    }
}

/// Builds a problem instance from caller data.
///
/// The triplet guards are released as soon as their matrices are built.
pub fn assemble<'s>(
    num_variables: i64,
    num_constraints: i64,
    q: Exported<'s, f64>,
    P: TripletGuards<'s>,
    A: TripletGuards<'s>,
    l: Exported<'s, f64>,
    u: Exported<'s, f64>,
) -> Result<ProblemInstance<'s>, MarshalError> {
    let n = sparse::dimension("number of variables", num_variables)?;
    let m = sparse::dimension("number of constraints", num_constraints)?;

    check_len("linear objective", &q, n)?;
    check_len("lower bounds", &l, m)?;
    check_len("upper bounds", &u, m)?;

    let P = P.into_matrix("quadratic objective", n, n)?;
    let A = A.into_matrix("constraint matrix", m, n)?;

    log::debug!("assembled problem with {n} variables and {m} constraints");

    Ok(ProblemInstance { n, m, P, q, A, l, u })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::CallScope;

    fn triplets<'s>(
        scope: &'s CallScope,
        rows: &'s [i64],
        cols: &'s [i64],
        vals: &'s [f64],
    ) -> TripletGuards<'s> {
        TripletGuards {
            rows: scope.borrow("rows", rows),
            cols: scope.borrow("cols", cols),
            vals: scope.borrow("vals", vals),
        }
    }

    #[test]
    fn test_assemble() {
        let scope = CallScope::new();
        {
            let problem = assemble(
                2,
                1,
                scope.borrow("q", &[1., 1.]),
                triplets(&scope, &[0, 0, 1], &[0, 1, 1], &[4., 1., 2.]),
                triplets(&scope, &[0, 0], &[0, 1], &[1., 1.]),
                scope.borrow("l", &[1.]),
                scope.borrow("u", &[1.]),
            )
            .unwrap();

            assert_eq!((problem.n, problem.m), (2, 1));
            assert_eq!(problem.P.colptr, vec![0, 1, 3]);
            assert_eq!(problem.A.nnz(), 2);
            assert_eq!(&*problem.q, &[1., 1.]);

            // only q, l and u are still held
            assert_eq!(scope.acquired() - scope.released(), 3);
        }
        assert!(scope.is_balanced());
    }

    #[test]
    fn test_assemble_errors() {
        let scope = CallScope::new();

        let err = assemble(
            -1,
            0,
            scope.borrow("q", &[]),
            triplets(&scope, &[], &[], &[]),
            triplets(&scope, &[], &[], &[]),
            scope.borrow("l", &[]),
            scope.borrow("u", &[]),
        );
        assert!(matches!(err, Err(MarshalError::NegativeDimension { value: -1, .. })));

        let err = assemble(
            1,
            1,
            scope.borrow("q", &[0.]),
            triplets(&scope, &[], &[], &[]),
            triplets(&scope, &[0], &[3], &[1.]),
            scope.borrow("l", &[0.]),
            scope.borrow("u", &[1.]),
        );
        assert!(matches!(err, Err(MarshalError::InvalidIndex { col: 3, .. })));

        let err = assemble(
            1,
            2,
            scope.borrow("q", &[0.]),
            triplets(&scope, &[], &[], &[]),
            triplets(&scope, &[], &[], &[]),
            scope.borrow("l", &[0.]),
            scope.borrow("u", &[1., 2.]),
        );
        assert_eq!(
            err.err(),
            Some(MarshalError::LengthMismatch {
                what: "lower bounds",
                expected: 2,
                found: 1
            })
        );

        assert!(scope.is_balanced());
    }
}
