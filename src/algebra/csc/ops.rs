use crate::algebra::*;

/// `y = a*M*x + b*y`
pub trait MatrixVectorMultiply {
    type T: FloatT;

    fn gemv(&self, y: &mut [Self::T], x: &[Self::T], a: Self::T, b: Self::T);
}

/// `y = a*M*x + b*y` for a symmetric `M` stored as its upper triangle
pub trait SymMatrixVectorMultiply {
    type T: FloatT;

    fn symv(&self, y: &mut [Self::T], x: &[Self::T], a: Self::T, b: Self::T);
}

/// Norms and diagonal scalings, as needed for equilibration.
pub trait MatrixMath {
    type T: FloatT;

    /// `norms[j]` becomes the largest magnitude in column `j`.
    fn col_norms(&self, norms: &mut [Self::T]);

    /// As [`col_norms`](MatrixMath::col_norms) for the symmetric matrix
    /// whose upper triangle is stored.
    fn col_norms_sym(&self, norms: &mut [Self::T]);

    /// `norms[i]` becomes the largest magnitude in row `i`.
    fn row_norms(&self, norms: &mut [Self::T]);

    fn scale(&mut self, c: Self::T);

    /// `M = diag(l) * M * diag(r)`
    fn lrscale(&mut self, l: &[Self::T], r: &[Self::T]);
}

impl<T> CscMatrix<T> {
    /// Row indices and values stored in column `j`.
    pub(crate) fn column(&self, j: usize) -> (&[usize], &[T]) {
        let rng = self.colptr[j]..self.colptr[j + 1];
        (&self.rowval[rng.clone()], &self.nzval[rng])
    }
}

// y = b*y, never reading y when b is zero
fn prescale<T: FloatT>(y: &mut [T], b: T) {
    if b == T::zero() {
        y.fill(T::zero());
    } else if b != T::one() {
        y.scale(b);
    }
}

impl<T: FloatT> MatrixVectorMultiply for CscMatrix<T> {
    type T = T;

    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        assert_eq!(x.len(), self.n);
        assert_eq!(y.len(), self.m);
        prescale(y, b);

        for (j, &xj) in x.iter().enumerate() {
            let (rows, vals) = self.column(j);
            for (&i, &v) in rows.iter().zip(vals) {
                y[i] += a * v * xj;
            }
        }
    }
}

impl<T: FloatT> MatrixVectorMultiply for Adjoint<'_, CscMatrix<T>> {
    type T = T;

    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        let M = self.src;
        assert_eq!(x.len(), M.m);
        assert_eq!(y.len(), M.n);
        prescale(y, b);

        for (j, yj) in y.iter_mut().enumerate() {
            let (rows, vals) = M.column(j);
            let colx = rows
                .iter()
                .zip(vals)
                .fold(T::zero(), |acc, (&i, &v)| acc + v * x[i]);
            *yj += a * colx;
        }
    }
}

impl<T: FloatT> SymMatrixVectorMultiply for Symmetric<'_, CscMatrix<T>> {
    type T = T;

    fn symv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        let M = self.src;
        assert_eq!(M.m, M.n);
        assert_eq!(x.len(), M.n);
        assert_eq!(y.len(), M.n);
        prescale(y, b);

        for (j, &xj) in x.iter().enumerate() {
            let (rows, vals) = M.column(j);
            for (&i, &v) in rows.iter().zip(vals) {
                y[i] += a * v * xj;
                // mirrored entry, once
                if i != j {
                    y[j] += a * v * x[i];
                }
            }
        }
    }
}

impl<T: FloatT> MatrixMath for CscMatrix<T> {
    type T = T;

    fn col_norms(&self, norms: &mut [T]) {
        assert_eq!(norms.len(), self.n);
        for (j, nj) in norms.iter_mut().enumerate() {
            *nj = self.column(j).1.norm_inf();
        }
    }

    fn col_norms_sym(&self, norms: &mut [T]) {
        assert_eq!(norms.len(), self.n);
        norms.fill(T::zero());

        for j in 0..self.n {
            let (rows, vals) = self.column(j);
            for (&i, &v) in rows.iter().zip(vals) {
                let v = v.abs();
                norms[j] = T::max(norms[j], v);
                norms[i] = T::max(norms[i], v);
            }
        }
    }

    fn row_norms(&self, norms: &mut [T]) {
        assert_eq!(norms.len(), self.m);
        norms.fill(T::zero());

        for (&i, &v) in self.rowval.iter().zip(&self.nzval) {
            norms[i] = T::max(norms[i], v.abs());
        }
    }

    fn scale(&mut self, c: T) {
        self.nzval.scale(c);
    }

    fn lrscale(&mut self, l: &[T], r: &[T]) {
        assert_eq!(l.len(), self.m);
        assert_eq!(r.len(), self.n);

        for (j, &rj) in r.iter().enumerate() {
            for k in self.colptr[j]..self.colptr[j + 1] {
                self.nzval[k] *= l[self.rowval[k]] * rj;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A = [1 0; 3 4; 0 -2]
    fn tall() -> CscMatrix<f64> {
        CscMatrix::new(3, 2, vec![0, 2, 4], vec![0, 1, 1, 2], vec![1., 3., 4., -2.])
    }

    // upper triangle of [2 -1 0; -1 5 3; 0 3 1]
    fn sym_upper() -> CscMatrix<f64> {
        CscMatrix::new(3, 3, vec![0, 1, 3, 5], vec![0, 0, 1, 1, 2], vec![2., -1., 5., 3., 1.])
    }

    #[test]
    fn test_gemv() {
        let A = tall();
        let mut y = vec![1., 1., 1.];
        A.gemv(&mut y, &[2., -1.], 1., 0.);
        assert_eq!(y, vec![2., 2., 2.]);

        // accumulate into y with a negative multiplier
        A.gemv(&mut y, &[1., 1.], -1., 1.);
        assert_eq!(y, vec![1., -5., 4.]);
    }

    #[test]
    fn test_gemv_transpose() {
        let A = tall();
        let mut y = vec![f64::NAN; 2];
        // b = 0 discards whatever y held
        A.t().gemv(&mut y, &[1., 1., 1.], 1., 0.);
        assert_eq!(y, vec![4., 2.]);

        A.t().gemv(&mut y, &[0., 1., 0.], 2., 0.5);
        assert_eq!(y, vec![8., 9.]);
    }

    #[test]
    fn test_symv() {
        let P = sym_upper();
        let mut y = vec![0.; 3];
        P.sym().symv(&mut y, &[1., 1., 1.], 1., 0.);
        assert_eq!(y, vec![1., 7., 4.]);

        // residual form used by iterative refinement: y = rhs - P x
        let mut r = vec![1., 7., 5.];
        P.sym().symv(&mut r, &[1., 1., 1.], -1., 1.);
        assert_eq!(r, vec![0., 0., 1.]);
    }

    #[test]
    fn test_norms() {
        let A = tall();
        let mut cols = vec![0.; 2];
        let mut rows = vec![0.; 3];
        A.col_norms(&mut cols);
        A.row_norms(&mut rows);
        assert_eq!(cols, vec![3., 4.]);
        assert_eq!(rows, vec![1., 4., 2.]);

        let mut sym = vec![0.; 3];
        sym_upper().col_norms_sym(&mut sym);
        assert_eq!(sym, vec![2., 5., 3.]);
    }

    #[test]
    fn test_scalings() {
        let mut A = tall();
        A.lrscale(&[1., 0.5, 2.], &[2., -1.]);
        assert_eq!(A.nzval, vec![2., 3., -2., 4.]);

        A.scale(0.5);
        assert_eq!(A.nzval, vec![1., 1.5, -1., 2.]);
    }
}
