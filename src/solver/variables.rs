use crate::algebra::*;
use crate::solver::*;
use itertools::izip;

/// Classification of a constraint row, which fixes its step size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintType {
    /// both bounds infinite
    Loose,
    Inequality,
    /// bounds equal to within `RHO_TOL`
    Equality,
}

/// ADMM iterates in scaled form.
#[derive(Debug)]
pub(crate) struct Variables<T> {
    pub x: Vec<T>,
    pub z: Vec<T>,
    pub y: Vec<T>,
    pub x_prev: Vec<T>,
    pub z_prev: Vec<T>,
    pub xtilde: Vec<T>,
    pub ztilde: Vec<T>,
    pub delta_x: Vec<T>,
    pub delta_y: Vec<T>,
    pub rho: T,
    pub rho_vec: Vec<T>,
    pub rho_inv_vec: Vec<T>,
    pub constr_type: Vec<ConstraintType>,
}

impl<T> Variables<T>
where
    T: FloatT,
{
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            x: vec![T::zero(); n],
            z: vec![T::zero(); m],
            y: vec![T::zero(); m],
            x_prev: vec![T::zero(); n],
            z_prev: vec![T::zero(); m],
            xtilde: vec![T::zero(); n],
            ztilde: vec![T::zero(); m],
            delta_x: vec![T::zero(); n],
            delta_y: vec![T::zero(); m],
            rho: T::one(),
            rho_vec: vec![T::one(); m],
            rho_inv_vec: vec![T::one(); m],
            constr_type: vec![ConstraintType::Inequality; m],
        }
    }

    pub fn set_constraint_types(&mut self, l: &[T], u: &[T]) {
        let inf: T = (BOUND_INFINITY * MIN_SCALING).as_T();
        let rho_tol: T = RHO_TOL.as_T();

        for (ctype, &l, &u) in izip!(&mut self.constr_type, l, u) {
            *ctype = if l < -inf && u > inf {
                ConstraintType::Loose
            } else if u - l < rho_tol {
                ConstraintType::Equality
            } else {
                ConstraintType::Inequality
            };
        }
    }

    /// Sets the step size for every row from the base value `rho`.
    pub fn set_rho_vec(&mut self, rho: T) {
        let rho_min: T = RHO_MIN.as_T();
        let rho_max: T = RHO_MAX.as_T();
        let eq_ratio: T = RHO_EQ_OVER_RHO_INEQ.as_T();
        self.rho = T::min(T::max(rho, rho_min), rho_max);

        for (r, rinv, ctype) in izip!(&mut self.rho_vec, &mut self.rho_inv_vec, &self.constr_type)
        {
            *r = match ctype {
                ConstraintType::Loose => rho_min,
                ConstraintType::Equality => eq_ratio * self.rho,
                ConstraintType::Inequality => self.rho,
            };
            *rinv = T::recip(*r);
        }
    }

    pub fn swap_prev(&mut self) {
        std::mem::swap(&mut self.x, &mut self.x_prev);
        std::mem::swap(&mut self.z, &mut self.z_prev);
    }

    /// Solves the KKT system for (x̃, z̃).
    pub fn update_xz_tilde(&mut self, data: &ProblemData<T>, kkt: &mut KktSystem<T>, sigma: T) {
        let n = data.n;
        let (rhs_x, rhs_z) = kkt.sol.split_at_mut(n);

        for (r, &x, &q) in izip!(rhs_x.iter_mut(), &self.x_prev, &data.q) {
            *r = sigma * x - q;
        }
        for (r, &z, &y, &rinv) in izip!(rhs_z.iter_mut(), &self.z_prev, &self.y, &self.rho_inv_vec) {
            *r = z - rinv * y;
        }

        kkt.solve_in_place();

        let (sol_x, sol_nu) = kkt.sol.split_at(n);
        self.xtilde.copy_from(sol_x);
        for (zt, &z, &nu, &y, &rinv) in izip!(
            &mut self.ztilde,
            &self.z_prev,
            sol_nu,
            &self.y,
            &self.rho_inv_vec
        ) {
            *zt = z + rinv * (nu - y);
        }
    }

    /// Relaxed x update, recording the step in `delta_x`.
    pub fn update_x(&mut self, alpha: T) {
        let beta = T::one() - alpha;
        for (x, dx, &xt, &xp) in izip!(&mut self.x, &mut self.delta_x, &self.xtilde, &self.x_prev) {
            *x = alpha * xt + beta * xp;
            *dx = *x - xp;
        }
    }

    /// Relaxed z update, projected onto [l,u].
    pub fn update_z(&mut self, data: &ProblemData<T>, alpha: T) {
        let beta = T::one() - alpha;
        for (z, &zt, &zp, &y, &rinv, &l, &u) in izip!(
            &mut self.z,
            &self.ztilde,
            &self.z_prev,
            &self.y,
            &self.rho_inv_vec,
            &data.l,
            &data.u
        ) {
            let v = alpha * zt + beta * zp + rinv * y;
            *z = T::min(T::max(v, l), u);
        }
    }

    /// Dual update, recording the step in `delta_y`.
    pub fn update_y(&mut self, alpha: T) {
        let beta = T::one() - alpha;
        for (y, dy, &zt, &zp, &z, &rho) in izip!(
            &mut self.y,
            &mut self.delta_y,
            &self.ztilde,
            &self.z_prev,
            &self.z,
            &self.rho_vec
        ) {
            *dy = rho * (alpha * zt + beta * zp - z);
            *y += *dy;
        }
    }
}

#[test]
fn test_rho_vec() {
    let mut v = Variables::<f64>::new(1, 3);
    let inf = BOUND_INFINITY;
    v.set_constraint_types(&[-inf, 1., 0.], &[inf, 1., 5.]);
    assert_eq!(
        v.constr_type,
        vec![
            ConstraintType::Loose,
            ConstraintType::Equality,
            ConstraintType::Inequality
        ]
    );

    v.set_rho_vec(0.1);
    assert_eq!(v.rho_vec[0], RHO_MIN);
    assert!((v.rho_vec[1] - 100.).abs() < 1e-12);
    assert_eq!(v.rho_vec[2], 0.1);
    assert_eq!(v.rho_inv_vec[2], 10.);
}
