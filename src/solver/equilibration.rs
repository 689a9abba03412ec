use crate::algebra::*;
use crate::solver::{AdmmSettings, ProblemData, MAX_SCALING, MIN_SCALING};

/// Ruiz scaling of the problem data.
///
/// The scaled problem has `P̄ = cDPD`, `q̄ = cDq`, `Ā = EAD`, `l̄ = El`
/// and `ū = Eu`.  Unscaled iterates are recovered as `x = Dx̄`,
/// `z = E⁻¹z̄` and `y = Eȳ/c`.
#[derive(Debug, Clone)]
pub(crate) struct EquilibrationData<T> {
    pub d: Vec<T>,
    pub dinv: Vec<T>,
    pub e: Vec<T>,
    pub einv: Vec<T>,
    pub c: T,
    pub cinv: T,
}

impl<T> EquilibrationData<T>
where
    T: FloatT,
{
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            d: vec![T::one(); n],
            dinv: vec![T::one(); n],
            e: vec![T::one(); m],
            einv: vec![T::one(); m],
            c: T::one(),
            cinv: T::one(),
        }
    }
}

// scalings that are very small or large are replaced
fn limit_scaling<T: FloatT>(v: T) -> T {
    let (minscale, maxscale) = (MIN_SCALING.as_T(), MAX_SCALING.as_T());
    if v < minscale {
        T::one()
    } else if v > maxscale {
        maxscale
    } else {
        v
    }
}

/// Scales `data` in place and returns the scaling used.
pub(crate) fn equilibrate<T: FloatT>(
    data: &mut ProblemData<T>,
    settings: &AdmmSettings<T>,
) -> EquilibrationData<T> {
    let (n, m) = (data.n, data.m);
    let mut eq = EquilibrationData::new(n, m);

    let mut d_temp = vec![T::one(); n];
    let mut e_temp = vec![T::one(); m];
    let mut col_norms_A = vec![T::zero(); n];

    for _ in 0..settings.scaling {
        // column norms of the KKT upper left blocks
        data.P.col_norms_sym(&mut d_temp);
        data.A.col_norms(&mut col_norms_A);
        for (d, a) in d_temp.iter_mut().zip(&col_norms_A) {
            *d = T::recip(T::sqrt(limit_scaling(T::max(*d, *a))));
        }

        data.A.row_norms(&mut e_temp);
        e_temp.map_in_place(|v| T::recip(T::sqrt(limit_scaling(v))));

        data.P.lrscale(&d_temp, &d_temp);
        data.A.lrscale(&e_temp, &d_temp);
        data.q.hadamard(&d_temp);

        eq.d.hadamard(&d_temp);
        eq.e.hadamard(&e_temp);

        // cost scaling
        data.P.col_norms_sym(&mut d_temp);
        let mean_col_norm_P = d_temp.mean();
        let inf_norm_q = limit_scaling(data.q.norm_inf());
        let c_temp = T::recip(limit_scaling(T::max(mean_col_norm_P, inf_norm_q)));

        data.P.scale(c_temp);
        data.q.scale(c_temp);
        eq.c *= c_temp;
    }

    eq.dinv.map_from(T::recip, &eq.d);
    eq.einv.map_from(T::recip, &eq.e);
    eq.cinv = T::recip(eq.c);

    data.l.hadamard(&eq.e);
    data.u.hadamard(&eq.e);

    eq
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_scaling() {
        assert_eq!(limit_scaling(1e-5), 1.0);
        assert_eq!(limit_scaling(1e5), 1e4);
        assert_eq!(limit_scaling(2.0), 2.0);
    }

    #[test]
    fn test_equilibrate_recovers_data() {
        let P: CscMatrix<f64> =
            CscMatrix::new(2, 2, vec![0, 1, 3], vec![0, 0, 1], vec![40., 1., 0.02]);
        let A: CscMatrix<f64> = CscMatrix::new(1, 2, vec![0, 1, 2], vec![0, 0], vec![3., 500.]);
        let q = [1., -200.];
        let (l, u) = ([-1.], [7.]);

        let mut data = ProblemData::new(&P, &q, &A, &l, &u).unwrap();
        let settings = AdmmSettings::default();
        let eq = equilibrate(&mut data, &settings);

        // P = c⁻¹ D⁻¹ P̄ D⁻¹ entrywise
        for (row, col, v) in data.P.triplets() {
            let orig = eq.cinv * eq.dinv[row] * v * eq.dinv[col];
            assert!((orig - P.get_entry((row, col)).unwrap()).abs() < 1e-9);
        }
        for (row, col, v) in data.A.triplets() {
            let orig = eq.einv[row] * v * eq.dinv[col];
            assert!((orig - A.get_entry((row, col)).unwrap()).abs() < 1e-9);
        }
        assert!((data.u[0] * eq.einv[0] - 7.).abs() < 1e-12);
        assert!((data.q[1] * eq.cinv * eq.dinv[1] + 200.).abs() < 1e-9);
    }
}
