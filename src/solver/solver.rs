use crate::algebra::*;
use crate::io::ConfigurablePrintTarget;
use crate::solver::polish::polish;
use crate::solver::*;
use crate::timers::*;
use std::io::Write;

/// ADMM solver for a single quadratic program.
///
/// The problem data is scaled and the KKT matrix factored once in
/// [`new`](AdmmSolver::new).  [`solve`](AdmmSolver::solve) runs the
/// iteration and fills in [`solution`](AdmmSolver::solution) and
/// [`info`](AdmmSolver::info).
pub struct AdmmSolver<T: FloatT = f64> {
    data: ProblemData<T>,
    equilibration: EquilibrationData<T>,
    variables: Variables<T>,
    residuals: Residuals<T>,
    kktsystem: KktSystem<T>,
    pub info: AdmmInfo<T>,
    pub solution: AdmmSolution<T>,
    pub settings: AdmmSettings<T>,
    timers: Timers,
}

impl<T> AdmmSolver<T>
where
    T: FloatT,
{
    /// Validates and scales the problem, then factors the KKT system.
    ///
    /// `P` must be upper triangular.  Bounds beyond ±[`BOUND_INFINITY`]
    /// are treated as unbounded.
    pub fn new(
        P: &CscMatrix<T>,
        q: &[T],
        A: &CscMatrix<T>,
        l: &[T],
        u: &[T],
        settings: AdmmSettings<T>,
    ) -> Result<Self, SetupError> {
        settings.validate()?;

        let mut timers = Timers::default();
        timers.reset_timer("setup");
        timers.start("setup");

        let mut data = ProblemData::new(P, q, A, l, u)?;
        let (n, m) = (data.n, data.m);
        let equilibration = equilibrate(&mut data, &settings);

        let mut variables = Variables::new(n, m);
        variables.set_constraint_types(&data.l, &data.u);
        variables.set_rho_vec(settings.rho);

        let kktsystem = KktSystem::new(&data.P, &data.A, settings.sigma, &variables.rho_inv_vec)?;

        timers.stop("setup");
        log::debug!(
            "ADMM setup done: n = {n}, m = {m}, nnz(P) = {}, nnz(A) = {}",
            data.P.nnz(),
            data.A.nnz()
        );

        Ok(Self {
            data,
            equilibration,
            variables,
            residuals: Residuals::new(n, m),
            kktsystem,
            info: AdmmInfo::new(),
            solution: AdmmSolution::new(n, m),
            settings,
            timers,
        })
    }

    /// Runs the solver.
    ///
    /// Any run that completes returns `Ok`, including infeasible
    /// outcomes and those stopped by an iteration or time limit.  The
    /// outcome is reported in `solution.status`.
    pub fn solve(&mut self) -> Result<(), SolveError> {
        self.info.reset(&mut self.timers);

        print_or_warn(
            self.info
                .print_configuration(&self.settings, &self.data),
        );
        print_or_warn(self.info.print_status_header(&self.settings));

        let result = if self.data.crossed_bounds {
            log::debug!("lower bound exceeds upper bound, skipping iteration");
            self.info.status = SolverStatus::PrimalInfeasible;
            Ok(())
        } else {
            self.timers.start("solve");
            let result = self.iterate();
            self.timers.stop("solve");
            result
        };

        if result.is_ok() && self.settings.polish && self.info.status == SolverStatus::Solved {
            timeit! {self.timers => "polish";
                self.info.status_polish = polish(
                    &self.data,
                    &self.equilibration,
                    &self.settings,
                    &mut self.variables,
                    &mut self.residuals,
                    &mut self.info,
                );
            }
            log::debug!("polish: {:?}", self.info.status_polish);
        }

        self.info.finalize(&self.timers);
        self.solution
            .post_process(&self.variables, &self.equilibration, &self.info);
        if self.data.crossed_bounds {
            // no certificate, the bounds alone are inconsistent
            self.solution.prim_inf_cert = None;
        }

        print_or_warn(self.info.print_footer(&self.settings));

        if let Err(ref e) = result {
            log::debug!("solve aborted: {e}");
        }
        result
    }

    fn iterate(&mut self) -> Result<(), SolveError> {
        let alpha = self.settings.alpha;
        let sigma = self.settings.sigma;
        let max_iter = self.settings.max_iter;
        let check_every = self.settings.check_termination;
        let adapt_every = match self.settings.adaptive_rho {
            true => self.settings.adaptive_rho_interval,
            false => 0,
        };

        for iter in 1..=max_iter {
            self.variables.swap_prev();
            self.variables
                .update_xz_tilde(&self.data, &mut self.kktsystem, sigma);
            self.variables.update_x(alpha);
            self.variables.update_z(&self.data, alpha);
            self.variables.update_y(alpha);
            self.info.iterations = iter;

            let check = check_every > 0 && iter % check_every == 0;
            let adapt = adapt_every > 0 && iter % adapt_every == 0;

            if check || adapt {
                self.update_residuals();
            }

            if check {
                self.print_status();
                if self.check_termination(false) {
                    return Ok(());
                }
            }

            if adapt {
                self.adapt_rho()?;
            }

            if self.time_limit_reached() {
                self.info.status = SolverStatus::TimeLimit;
                return Ok(());
            }
        }

        // iteration limit reached.  Accept a reduced accuracy result if
        // there is one.
        self.update_residuals();
        if check_every == 0 || max_iter % check_every != 0 {
            self.print_status();
        }
        if !self.check_termination(false) && !self.check_termination(true) {
            self.info.status = SolverStatus::MaxIterations;
        }
        Ok(())
    }

    fn update_residuals(&mut self) {
        self.residuals.update(
            &self.data,
            &self.equilibration,
            &self.variables.x,
            &self.variables.z,
            &self.variables.y,
        );
        self.info.update(&self.residuals);
    }

    // Sets info.status and returns true if the iterate satisfies the
    // optimality or infeasibility criteria.  The approximate check
    // uses tolerances ten times looser.
    fn check_termination(&mut self, approximate: bool) -> bool {
        let scale: T = if approximate { (10.).as_T() } else { T::one() };
        let set = &self.settings;

        let (eps_prim, eps_dual) = self
            .residuals
            .tolerances(set.eps_abs * scale, set.eps_rel * scale);

        let prim_ok = self.data.m == 0 || self.residuals.prim_res < eps_prim;
        let dual_ok = self.residuals.dual_res < eps_dual;

        let status = if prim_ok && dual_ok {
            SolverStatus::Solved
        } else if !prim_ok
            && self.residuals.is_primal_infeasible(
                &self.data,
                &self.equilibration,
                &self.variables.delta_y,
                set.eps_prim_inf * scale,
            )
        {
            SolverStatus::PrimalInfeasible
        } else if !dual_ok
            && self.residuals.is_dual_infeasible(
                &self.data,
                &self.equilibration,
                &self.variables.delta_x,
                set.eps_dual_inf * scale,
            )
        {
            SolverStatus::DualInfeasible
        } else {
            return false;
        };

        self.info.status = match (approximate, status) {
            (true, SolverStatus::Solved) => SolverStatus::SolvedInaccurate,
            (true, SolverStatus::PrimalInfeasible) => SolverStatus::PrimalInfeasibleInaccurate,
            (true, SolverStatus::DualInfeasible) => SolverStatus::DualInfeasibleInaccurate,
            (_, status) => status,
        };
        true
    }

    fn adapt_rho(&mut self) -> Result<(), SolveError> {
        let rho = self.variables.rho;
        let new_rho = self.residuals.rho_estimate(rho);
        self.info.rho_estimate = new_rho;

        let tol = self.settings.adaptive_rho_tolerance;
        if new_rho > rho * tol || new_rho < rho / tol {
            self.variables.set_rho_vec(new_rho);
            self.kktsystem
                .update_rho_inv(&self.variables.rho_inv_vec)?;
            self.info.rho_updates += 1;
            log::debug!(
                "rho updated to {:e} at iteration {}",
                self.variables.rho,
                self.info.iterations
            );
        }
        Ok(())
    }

    fn time_limit_reached(&self) -> bool {
        let limit = self.settings.time_limit;
        let elapsed = self.timers.elapsed("setup") + self.timers.elapsed("solve");
        limit > 0.0 && elapsed.as_secs_f64() > limit
    }

    fn print_status(&mut self) {
        print_or_warn(self.info.print_status(
            &self.settings,
            self.variables.rho,
            self.timers.elapsed("solve"),
        ));
    }
}

// progress output never aborts a solve
fn print_or_warn(result: std::io::Result<()>) {
    if let Err(e) = result {
        log::warn!("failed to write solver output: {e}");
    }
}

impl<T> ConfigurablePrintTarget for AdmmSolver<T>
where
    T: FloatT,
{
    fn print_to_stdout(&mut self) {
        self.info.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.info.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send>) {
        self.info.print_to_stream(stream)
    }
    fn print_to_buffer(&mut self) {
        self.info.print_to_buffer()
    }
    fn print_to_sink(&mut self) {
        self.info.print_to_sink()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.info.get_print_buffer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> AdmmSettings<f64> {
        AdmmSettingsBuilder::default()
            .verbose(false)
            .build()
            .unwrap()
    }

    #[test]
    fn test_crossed_bounds() {
        let P = CscMatrix::identity(1);
        let A = CscMatrix::identity(1);
        let mut solver = AdmmSolver::new(&P, &[0.], &A, &[5.], &[1.], quiet()).unwrap();
        solver.solve().unwrap();

        assert_eq!(solver.solution.status, SolverStatus::PrimalInfeasible);
        assert_eq!(solver.solution.iterations, 0);
        assert!(solver.solution.x[0].is_nan());
        assert!(solver.solution.prim_inf_cert.is_none());
    }

    #[test]
    fn test_nonconvex_setup() {
        let P = CscMatrix::new(1, 1, vec![0, 1], vec![0], vec![-1.]);
        let A = CscMatrix::identity(1);
        let result = AdmmSolver::new(&P, &[0.], &A, &[0.], &[1.], quiet());
        assert!(matches!(result, Err(SetupError::NonConvex)));
    }

    #[test]
    fn test_bad_settings() {
        let P = CscMatrix::identity(1);
        let A = CscMatrix::identity(1);
        let mut settings = quiet();
        settings.alpha = 3.0;
        let result = AdmmSolver::new(&P, &[0.], &A, &[0.], &[1.], settings);
        assert_eq!(
            result.err().map(|e| e.exit_code()),
            Some(2)
        );
    }

    #[test]
    fn test_max_iterations() {
        let P = CscMatrix::new(2, 2, vec![0, 1, 2], vec![0, 1], vec![4., 2.]);
        let A = CscMatrix::new(1, 2, vec![0, 1, 2], vec![0, 0], vec![1., 1.]);
        let mut settings = quiet();
        settings.max_iter = 1;
        settings.check_termination = 0;
        settings.eps_abs = 1e-12;
        settings.eps_rel = 1e-12;

        let mut solver = AdmmSolver::new(&P, &[1., 1.], &A, &[1.], &[1.], settings).unwrap();
        solver.solve().unwrap();

        assert_eq!(solver.solution.status, SolverStatus::MaxIterations);
        assert_eq!(solver.solution.iterations, 1);
        assert!(solver.solution.x.iter().all(|v| v.is_finite()));
    }
}
