use crate::algebra::*;
use crate::solver::*;

/// Solution returned by [`AdmmSolver`].
///
/// `x` and `y` hold the unscaled primal and dual iterates when the status
/// carries a solution, and NaN otherwise.  Infeasible outcomes carry a
/// certificate instead.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AdmmSolution<T> {
    /// primal solution
    pub x: Vec<T>,
    /// dual solution, one entry per constraint row
    pub y: Vec<T>,
    /// certificate of primal infeasibility, if found
    pub prim_inf_cert: Option<Vec<T>>,
    /// certificate of dual infeasibility, if found
    pub dual_inf_cert: Option<Vec<T>>,
    /// final solver status
    pub status: SolverStatus,
    /// primal objective value
    pub obj_val: T,
    /// number of iterations
    pub iterations: u32,
    /// total run time in seconds
    pub solve_time: f64,
}

impl<T> AdmmSolution<T>
where
    T: FloatT,
{
    /// Create a new `AdmmSolution` object
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            x: vec![T::nan(); n],
            y: vec![T::nan(); m],
            prim_inf_cert: None,
            dual_inf_cert: None,
            status: SolverStatus::Unsolved,
            obj_val: T::nan(),
            iterations: 0,
            solve_time: 0f64,
        }
    }

    pub(crate) fn post_process(
        &mut self,
        variables: &Variables<T>,
        eq: &EquilibrationData<T>,
        info: &AdmmInfo<T>,
    ) {
        self.status = info.status;
        self.iterations = info.iterations;
        self.solve_time = info.solve_time;
        self.prim_inf_cert = None;
        self.dual_inf_cert = None;

        if info.status.has_solution() {
            // x = Dx̄, y = Eȳ/c
            self.x.copy_from(&variables.x).hadamard(&eq.d);
            self.y.copy_from(&variables.y).hadamard(&eq.e).scale(eq.cinv);
            self.obj_val = info.obj_val;
            return;
        }

        self.x.set(T::nan());
        self.y.set(T::nan());

        match info.status {
            SolverStatus::PrimalInfeasible | SolverStatus::PrimalInfeasibleInaccurate => {
                let mut cert = variables.delta_y.clone();
                cert.hadamard(&eq.e).scale(eq.cinv);
                self.prim_inf_cert = Some(cert);
                self.obj_val = T::infinity();
            }
            SolverStatus::DualInfeasible | SolverStatus::DualInfeasibleInaccurate => {
                let mut cert = variables.delta_x.clone();
                cert.hadamard(&eq.d);
                self.dual_inf_cert = Some(cert);
                self.obj_val = -T::infinity();
            }
            _ => self.obj_val = T::nan(),
        }
    }
}
