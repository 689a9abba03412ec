use super::LdlError;
use crate::algebra::*;

#[derive(Debug)]
pub(super) struct Workspace<T> {
    // nodes of the current row's pattern
    marked: Vec<bool>,
    stack: Vec<usize>,
    // next free slot in each column of L
    next: Vec<usize>,
    // dense scratch, all zero between uses
    pub(super) y: Vec<T>,
}

impl<T: FloatT> Workspace<T> {
    pub(super) fn new(n: usize) -> Self {
        Self {
            marked: vec![false; n],
            stack: vec![0; n],
            next: vec![0; n],
            y: vec![T::zero(); n],
        }
    }
}

/// Up-looking numeric factorisation of the upper triangle `upper`.
/// Row `k` of $L$ is found by a sparse triangular solve whose pattern
/// is the union of elimination tree paths from the entries of column
/// `k` of `upper`.  Returns the number of positive pivots.
pub(super) fn factor<T: FloatT>(
    upper: &CscMatrix<T>,
    parent: &[Option<usize>],
    L: &mut CscMatrix<T>,
    d: &mut [T],
    dinv: &mut [T],
    work: &mut Workspace<T>,
) -> Result<usize, LdlError> {
    let n = d.len();
    let Workspace {
        marked,
        stack,
        next,
        y,
    } = work;

    marked.fill(false);
    y.fill(T::zero());
    next.copy_from_slice(&L.colptr[..n]);

    let mut positive = 0;

    for k in 0..n {
        d[k] = T::zero();
        let mut top = n;

        for idx in upper.colptr[k]..upper.colptr[k + 1] {
            let row = upper.rowval[idx];
            if row == k {
                d[k] += upper.nzval[idx];
                continue;
            }
            y[row] += upper.nzval[idx];

            // climb until the tree path meets the pattern found so far
            let mut len = 0;
            let mut node = Some(row);
            while let Some(i) = node {
                if marked[i] {
                    break;
                }
                marked[i] = true;
                stack[len] = i;
                len += 1;
                node = parent[i].filter(|&p| p < k);
            }
            // prepend the path so that descendants come first
            while len > 0 {
                len -= 1;
                top -= 1;
                stack[top] = stack[len];
            }
        }

        for t in top..n {
            let j = stack[t];
            let yj = y[j];
            let end = next[j];

            for p in L.colptr[j]..end {
                y[L.rowval[p]] -= L.nzval[p] * yj;
            }

            let lkj = yj * dinv[j];
            d[k] -= yj * lkj;
            L.rowval[end] = k;
            L.nzval[end] = lkj;
            next[j] += 1;

            y[j] = T::zero();
            marked[j] = false;
        }

        if d[k] == T::zero() {
            return Err(LdlError::ZeroPivot(k));
        }
        if d[k] > T::zero() {
            positive += 1;
        }
        dinv[k] = T::recip(d[k]);
    }

    Ok(positive)
}

/// Solves $(I+L)D(I+L)^T x = b$ in place.
pub(super) fn solve_in_place<T: FloatT>(L: &CscMatrix<T>, dinv: &[T], x: &mut [T]) {
    let n = x.len();

    for j in 0..n {
        let xj = x[j];
        for p in L.colptr[j]..L.colptr[j + 1] {
            x[L.rowval[p]] -= L.nzval[p] * xj;
        }
    }

    for (xj, &dj) in x.iter_mut().zip(dinv) {
        *xj *= dj;
    }

    for j in (0..n).rev() {
        let mut xj = x[j];
        for p in L.colptr[j]..L.colptr[j + 1] {
            xj -= L.nzval[p] * x[L.rowval[p]];
        }
        x[j] = xj;
    }
}
