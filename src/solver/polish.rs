use crate::algebra::*;
use crate::ldl::LdlFactors;
use crate::solver::*;
use itertools::izip;

// Guess of the active constraints at the current iterate.
struct ActiveSet {
    // true for rows whose lower bound is active
    lower: Vec<bool>,
    active: Vec<bool>,
}

impl ActiveSet {
    fn new<T: FloatT>(data: &ProblemData<T>, variables: &Variables<T>) -> Self {
        let mut lower = vec![false; data.m];
        let mut active = vec![false; data.m];

        for (lo, act, &z, &y, &l, &u) in izip!(
            &mut lower,
            &mut active,
            &variables.z,
            &variables.y,
            &data.l,
            &data.u
        ) {
            *lo = z - l < -y;
            *act = *lo || u - z < y;
        }
        Self { lower, active }
    }

    fn count(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }
}

/// Attempts to improve the solution by solving the equality constrained
/// QP over the guessed active set.  The variables and `info` are updated
/// only if the polished point has smaller residuals.
pub(crate) fn polish<T: FloatT>(
    data: &ProblemData<T>,
    eq: &EquilibrationData<T>,
    settings: &AdmmSettings<T>,
    variables: &mut Variables<T>,
    residuals: &mut Residuals<T>,
    info: &mut AdmmInfo<T>,
) -> PolishStatus {
    let (n, m) = (data.n, data.m);
    let set = ActiveSet::new(data, variables);
    let mred = set.count();

    let Ared = data.A.select_rows(&set.active);
    let b_red: Vec<T> = izip!(&set.active, &set.lower, &data.l, &data.u)
        .filter(|&(&act, ..)| act)
        .map(|(_, &lo, &l, &u)| if lo { l } else { u })
        .collect();

    let delta = settings.delta;
    let (K, _) = assemble_kkt(&data.P, &Ared, delta, &vec![delta; mred]);
    let mut factors = match LdlFactors::new(&K) {
        Ok(f) => f,
        Err(e) => {
            log::debug!("polish factorisation failed: {e}");
            return PolishStatus::Unsuccessful;
        }
    };

    // rhs = [-q; b_red]
    let mut rhs = vec![T::zero(); n + mred];
    rhs[..n].map_from(|q| -q, &data.q);
    rhs[n..].copy_from(&b_red);

    let mut sol = rhs.clone();
    factors.solve(&mut sol);

    // iterative refinement against the unregularized system
    // [P Aredᵀ; Ared 0]
    let mut resid = vec![T::zero(); n + mred];
    for _ in 0..settings.polish_refine_iter {
        resid.copy_from(&rhs);
        let (sol_x, sol_y) = sol.split_at(n);
        let (res_x, res_y) = resid.split_at_mut(n);
        data.P.sym().symv(res_x, sol_x, -T::one(), T::one());
        Ared.t().gemv(res_x, sol_y, -T::one(), T::one());
        Ared.gemv(res_y, sol_x, -T::one(), T::one());

        factors.solve(&mut resid);
        sol.axpby(T::one(), &resid, T::one());
    }

    let x_pol = sol[..n].to_vec();
    let mut z_pol = vec![T::zero(); m];
    data.A.gemv(&mut z_pol, &x_pol, T::one(), T::zero());
    for (z, &l, &u) in izip!(&mut z_pol, &data.l, &data.u) {
        *z = T::min(T::max(*z, l), u);
    }

    let mut y_pol = vec![T::zero(); m];
    let active_rows = set.active.iter().enumerate().filter(|&(_, &a)| a);
    for ((i, _), &yi) in active_rows.zip(&sol[n..]) {
        y_pol[i] = yi;
    }

    let (p0, d0) = (info.prim_res, info.dual_res);
    residuals.update(data, eq, &x_pol, &z_pol, &y_pol);
    let (p, d) = (residuals.prim_res, residuals.dual_res);

    let tiny: T = (1e-10).as_T();
    let improved = (p < p0 && d < d0) || (p < p0 && d0 < tiny) || (d < d0 && p0 < tiny);

    if improved {
        variables.x.copy_from(&x_pol);
        variables.z.copy_from(&z_pol);
        variables.y.copy_from(&y_pol);
        info.update(residuals);
        PolishStatus::Successful
    } else {
        PolishStatus::Unsuccessful
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_set() {
        // rows: lower active, upper active, inactive
        let P = CscMatrix::identity(1);
        let A = CscMatrix::new(3, 1, vec![0, 3], vec![0, 1, 2], vec![1., 1., 1.]);
        let data = ProblemData::new(&P, &[0.], &A, &[0., -1., -5.], &[1., 2., 5.]).unwrap();

        let mut variables = Variables::new(1, 3);
        variables.z.copy_from(&[0., 2., 0.]);
        variables.y.copy_from(&[-1., 1., 0.]);

        let set = ActiveSet::new(&data, &variables);
        assert_eq!(set.lower, vec![true, false, false]);
        assert_eq!(set.active, vec![true, true, false]);
        assert_eq!(set.count(), 2);
    }
}
