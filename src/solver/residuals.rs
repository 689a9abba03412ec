use crate::algebra::*;
use crate::solver::*;
use itertools::izip;

/// Residuals and infeasibility checks for the ADMM iterates.
///
/// `prim_res` and `dual_res` are in terms of the unscaled problem.
/// The `*_scaled` norms are kept for the step size estimate.
#[derive(Debug)]
pub(crate) struct Residuals<T> {
    Ax: Vec<T>,
    Px: Vec<T>,
    Aty: Vec<T>,
    work_n: Vec<T>,
    work_m: Vec<T>,

    pub prim_res: T,
    pub dual_res: T,
    pub obj_val: T,

    // max(‖Ax‖,‖z‖) and max(‖Px‖,‖Aᵀy‖,‖q‖), unscaled
    prim_norm: T,
    dual_norm: T,

    prim_res_scaled: T,
    dual_res_scaled: T,
    prim_norm_scaled: T,
    dual_norm_scaled: T,
}

impl<T> Residuals<T>
where
    T: FloatT,
{
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            Ax: vec![T::zero(); m],
            Px: vec![T::zero(); n],
            Aty: vec![T::zero(); n],
            work_n: vec![T::zero(); n],
            work_m: vec![T::zero(); m],
            prim_res: T::infinity(),
            dual_res: T::infinity(),
            obj_val: T::nan(),
            prim_norm: T::zero(),
            dual_norm: T::zero(),
            prim_res_scaled: T::infinity(),
            dual_res_scaled: T::infinity(),
            prim_norm_scaled: T::zero(),
            dual_norm_scaled: T::zero(),
        }
    }

    /// Evaluates residuals and objective at the scaled point (x, z, y).
    pub fn update(
        &mut self,
        data: &ProblemData<T>,
        eq: &EquilibrationData<T>,
        x: &[T],
        z: &[T],
        y: &[T],
    ) {
        data.A.gemv(&mut self.Ax, x, T::one(), T::zero());
        data.P.sym().symv(&mut self.Px, x, T::one(), T::zero());
        data.A.t().gemv(&mut self.Aty, y, T::one(), T::zero());

        // primal: Ax - z
        self.work_m.waxpby(T::one(), &self.Ax, -T::one(), z);
        self.prim_res_scaled = self.work_m.norm_inf();
        self.prim_res = self.work_m.norm_inf_scaled(&eq.einv);
        self.prim_norm_scaled = T::max(self.Ax.norm_inf(), z.norm_inf());
        self.prim_norm = T::max(
            self.Ax.norm_inf_scaled(&eq.einv),
            z.norm_inf_scaled(&eq.einv),
        );

        // dual: Px + q + Aᵀy
        for (w, &px, &q, &aty) in izip!(&mut self.work_n, &self.Px, &data.q, &self.Aty) {
            *w = px + q + aty;
        }
        self.dual_res_scaled = self.work_n.norm_inf();
        self.dual_res = eq.cinv * self.work_n.norm_inf_scaled(&eq.dinv);
        self.dual_norm_scaled = T::max(
            T::max(self.Px.norm_inf(), self.Aty.norm_inf()),
            data.q.norm_inf(),
        );
        self.dual_norm = eq.cinv
            * T::max(
                T::max(
                    self.Px.norm_inf_scaled(&eq.dinv),
                    self.Aty.norm_inf_scaled(&eq.dinv),
                ),
                data.q.norm_inf_scaled(&eq.dinv),
            );

        let half: T = (0.5).as_T();
        self.obj_val = eq.cinv * (half * x.dot(&self.Px) + data.q.dot(x));
    }

    /// Convergence tolerances (primal, dual) at the last update.
    pub fn tolerances(&self, eps_abs: T, eps_rel: T) -> (T, T) {
        (
            eps_abs + eps_rel * self.prim_norm,
            eps_abs + eps_rel * self.dual_norm,
        )
    }

    /// Step size balancing the relative primal and dual residuals.
    pub fn rho_estimate(&self, rho: T) -> T {
        let tol: T = DIVISION_TOL.as_T();
        let prim = self.prim_res_scaled / (self.prim_norm_scaled + tol);
        let dual = self.dual_res_scaled / (self.dual_norm_scaled + tol);
        let estimate = rho * T::sqrt(prim / (dual + tol));
        T::min(T::max(estimate, RHO_MIN.as_T()), RHO_MAX.as_T())
    }

    /// Tests whether `delta_y` certifies primal infeasibility.
    pub fn is_primal_infeasible(
        &mut self,
        data: &ProblemData<T>,
        eq: &EquilibrationData<T>,
        delta_y: &[T],
        eps: T,
    ) -> bool {
        let inf: T = (BOUND_INFINITY * MIN_SCALING).as_T();
        let dy = &mut self.work_m;
        dy.copy_from(delta_y);

        // project onto the polar of the recession cone of [l,u]
        for (dy, &l, &u) in izip!(dy.iter_mut(), &data.l, &data.u) {
            match (l < -inf, u > inf) {
                (true, true) => *dy = T::zero(),
                (false, true) => *dy = T::min(*dy, T::zero()),
                (true, false) => *dy = T::max(*dy, T::zero()),
                (false, false) => {}
            }
        }

        let norm = dy.norm_inf_scaled(&eq.e);
        if norm <= DIVISION_TOL.as_T() {
            return false;
        }

        let lhs = izip!(dy.iter(), &data.l, &data.u).fold(T::zero(), |acc, (&dy, &l, &u)| {
            acc + u * T::max(dy, T::zero()) + l * T::min(dy, T::zero())
        });
        if lhs >= -eps * norm {
            return false;
        }

        data.A.t().gemv(&mut self.work_n, dy, T::one(), T::zero());
        self.work_n.norm_inf_scaled(&eq.dinv) < eps * norm
    }

    /// Tests whether `delta_x` certifies dual infeasibility.
    pub fn is_dual_infeasible(
        &mut self,
        data: &ProblemData<T>,
        eq: &EquilibrationData<T>,
        delta_x: &[T],
        eps: T,
    ) -> bool {
        let inf: T = (BOUND_INFINITY * MIN_SCALING).as_T();

        let norm = delta_x.norm_inf_scaled(&eq.d);
        if norm <= DIVISION_TOL.as_T() {
            return false;
        }

        if data.q.dot(delta_x) >= -eq.c * eps * norm {
            return false;
        }

        data.P.sym().symv(&mut self.work_n, delta_x, T::one(), T::zero());
        if self.work_n.norm_inf_scaled(&eq.dinv) >= eq.c * eps * norm {
            return false;
        }

        data.A.gemv(&mut self.work_m, delta_x, T::one(), T::zero());
        self.work_m.hadamard(&eq.einv);

        izip!(&self.work_m, &data.l, &data.u).all(|(&adx, &l, &u)| {
            let up_ok = u > inf || adx <= eps * norm;
            let low_ok = l < -inf || adx >= -eps * norm;
            up_ok && low_ok
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infeasible_data() -> (ProblemData<f64>, EquilibrationData<f64>) {
        // x >= 1 and x <= -1, stacked as two rows
        let P = CscMatrix::zeros(1, 1);
        let A = CscMatrix::new(2, 1, vec![0, 2], vec![0, 1], vec![1., 1.]);
        let inf = BOUND_INFINITY;
        let data = ProblemData::new(&P, &[0.], &A, &[1., -inf], &[inf, -1.]).unwrap();
        (data, EquilibrationData::new(1, 2))
    }

    #[test]
    fn test_primal_infeasibility_certificate() {
        let (data, eq) = infeasible_data();
        let mut res = Residuals::new(1, 2);

        // y = (-1, 1): Aᵀy = 0 and uᵀy⁺ + lᵀy⁻ = -1 - 1 < 0
        assert!(res.is_primal_infeasible(&data, &eq, &[-1., 1.], 1e-4));
        // wrong signs are projected away
        assert!(!res.is_primal_infeasible(&data, &eq, &[1., -1.], 1e-4));
    }

    #[test]
    fn test_dual_infeasibility_certificate() {
        // minimize -x with x >= 0
        let P = CscMatrix::zeros(1, 1);
        let A = CscMatrix::new(1, 1, vec![0, 1], vec![0], vec![1.]);
        let data = ProblemData::new(&P, &[-1.], &A, &[0.], &[BOUND_INFINITY]).unwrap();
        let eq = EquilibrationData::new(1, 1);
        let mut res = Residuals::new(1, 1);

        assert!(res.is_dual_infeasible(&data, &eq, &[1.], 1e-4));
        assert!(!res.is_dual_infeasible(&data, &eq, &[-1.], 1e-4));
    }

    #[test]
    fn test_residuals_at_solution() {
        // minimize x with 0 <= x <= 10, solution x = 0, y = -1
        let P = CscMatrix::<f64>::zeros(1, 1);
        let A = CscMatrix::new(1, 1, vec![0, 1], vec![0], vec![1.]);
        let data = ProblemData::new(&P, &[1.], &A, &[0.], &[10.]).unwrap();
        let eq = EquilibrationData::new(1, 1);
        let mut res = Residuals::new(1, 1);

        res.update(&data, &eq, &[0.], &[0.], &[-1.]);
        assert_eq!(res.prim_res, 0.);
        assert_eq!(res.dual_res, 0.);
        assert_eq!(res.obj_val, 0.);

        let (eps_prim, eps_dual) = res.tolerances(1e-3, 1e-3);
        assert_eq!(eps_prim, 1e-3);
        assert!((eps_dual - 2e-3).abs() < 1e-15);
    }
}
