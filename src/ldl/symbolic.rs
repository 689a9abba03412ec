use super::LdlError;
use crate::algebra::*;

pub(super) fn check_pattern<T: FloatT>(A: &CscMatrix<T>) -> Result<(), LdlError> {
    if A.m != A.n {
        return Err(LdlError::NotSquare);
    }
    if !A.is_triu() {
        return Err(LdlError::NotUpperTriangular);
    }
    // every pivot must be structurally present
    for col in 0..A.n {
        let rows = &A.rowval[A.colptr[col]..A.colptr[col + 1]];
        if !rows.contains(&col) {
            return Err(LdlError::MissingDiagonal);
        }
    }
    Ok(())
}

pub(super) fn amd_ordering<T: FloatT>(
    A: &CscMatrix<T>,
    dense_scale: f64,
) -> Result<Vec<usize>, LdlError> {
    let mut control = amd::Control::default();
    control.dense *= dense_scale;
    let (perm, _, _) =
        amd::order(A.n, &A.colptr, &A.rowval, &control).map_err(|_| LdlError::OrderingFailed)?;
    Ok(perm)
}

/// Inverse of a permutation of `0..n`, rejecting anything else.
pub(super) fn inverse(perm: &[usize], n: usize) -> Result<Vec<usize>, LdlError> {
    if perm.len() != n {
        return Err(LdlError::InvalidPermutation);
    }
    let mut iperm = vec![None; n];
    for (k, &p) in perm.iter().enumerate() {
        if p >= n || iperm[p].is_some() {
            return Err(LdlError::InvalidPermutation);
        }
        iperm[p] = Some(k);
    }
    Ok(iperm.into_iter().flatten().collect())
}

/// Upper triangle of $PAP^T$ where `iperm[i]` is the new position of
/// index `i`.  Also returns the storage position each entry of `A`
/// moved to.  Rows within a column keep input order.
pub(super) fn permute_upper<T: FloatT>(
    A: &CscMatrix<T>,
    iperm: &[usize],
) -> (CscMatrix<T>, Vec<usize>) {
    let n = A.n;
    let nnz = A.nnz();

    // destination (row, col) of every stored entry, in storage order
    let moved: Vec<(usize, usize)> = A
        .triplets()
        .map(|(row, col, _)| {
            let (r, c) = (iperm[row], iperm[col]);
            (r.min(c), r.max(c))
        })
        .collect();

    let mut colptr = vec![0; n + 1];
    for &(_, c) in &moved {
        colptr[c + 1] += 1;
    }
    for c in 0..n {
        colptr[c + 1] += colptr[c];
    }

    let mut next = colptr[..n].to_vec();
    let mut rowval = vec![0; nnz];
    let mut nzval = vec![T::zero(); nnz];
    let mut landing = vec![0; nnz];

    for (idx, &(r, c)) in moved.iter().enumerate() {
        let dest = next[c];
        next[c] += 1;
        rowval[dest] = r;
        nzval[dest] = A.nzval[idx];
        landing[idx] = dest;
    }

    (CscMatrix::new(n, n, colptr, rowval, nzval), landing)
}

/// Elimination tree of an upper triangular pattern, together with the
/// number of strictly lower entries in each column of $L$.
pub(super) fn elimination_tree<T>(upper: &CscMatrix<T>) -> (Vec<Option<usize>>, Vec<usize>) {
    let n = upper.n;
    let mut parent = vec![None; n];
    let mut counts = vec![0; n];
    // last row of L in which each column was seen
    let mut seen = vec![usize::MAX; n];

    for k in 0..n {
        seen[k] = k;
        for &row in &upper.rowval[upper.colptr[k]..upper.colptr[k + 1]] {
            let mut i = row;
            while seen[i] != k {
                let up = *parent[i].get_or_insert(k);
                counts[i] += 1;
                seen[i] = k;
                i = up;
            }
        }
    }
    (parent, counts)
}
