use crate::algebra::*;
use crate::io::PrintTarget;
use crate::solver::*;
use crate::timers::*;

/// Progress and timing information for an [`AdmmSolver`] run.
#[derive(Default, Debug)]
pub struct AdmmInfo<T> {
    pub iterations: u32,
    pub status: SolverStatus,
    pub status_polish: PolishStatus,
    pub obj_val: T,
    pub prim_res: T,
    pub dual_res: T,
    pub rho_estimate: T,
    pub rho_updates: u32,

    pub setup_time: f64,
    pub solve_time: f64,
    pub polish_time: f64,
    pub run_time: f64,

    pub(crate) stream: PrintTarget,
}

impl<T> AdmmInfo<T>
where
    T: FloatT,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reset(&mut self, timers: &mut Timers) {
        self.status = SolverStatus::Unsolved;
        self.status_polish = PolishStatus::NotPerformed;
        self.iterations = 0;
        self.rho_updates = 0;
        self.obj_val = T::nan();
        self.prim_res = T::infinity();
        self.dual_res = T::infinity();
        self.solve_time = 0f64;
        self.polish_time = 0f64;

        timers.reset_timer("solve");
        timers.reset_timer("polish");
    }

    pub(crate) fn update(&mut self, residuals: &Residuals<T>) {
        self.obj_val = residuals.obj_val;
        self.prim_res = residuals.prim_res;
        self.dual_res = residuals.dual_res;
    }

    pub(crate) fn finalize(&mut self, timers: &Timers) {
        self.setup_time = timers.elapsed("setup").as_secs_f64();
        self.solve_time = timers.elapsed("solve").as_secs_f64();
        self.polish_time = timers.elapsed("polish").as_secs_f64();
        self.run_time = timers.total_time().as_secs_f64();
    }
}
