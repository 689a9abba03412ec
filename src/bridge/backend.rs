use super::ProblemInstance;
use crate::io::ConfigurablePrintTarget;
use crate::solver::{AdmmSettings, AdmmSolver};
use std::io::Write;

/// Byte widths of the index and floating point types a backend uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericWidths {
    pub index: usize,
    pub float: usize,
}

impl NumericWidths {
    /// The widths callers of this crate pass data in.
    pub const EXPECTED: NumericWidths = NumericWidths {
        index: std::mem::size_of::<i64>(),
        float: std::mem::size_of::<f64>(),
    };
}

/// A solver workspace created by [`QpBackend::setup`].
///
/// Dropping the workspace releases everything the backend allocated.
pub trait SolverWorkspace {
    /// Runs the solver once.  Returns 0 when the run completed, whatever
    /// its outcome, and a non-zero exit flag otherwise.
    fn solve(&mut self) -> i32;

    /// Internal status code of the last run.
    fn status_val(&self) -> i32;

    /// Primal and dual vectors, if the last run produced a solution.
    fn solution(&self) -> Option<(&[f64], &[f64])>;
}

/// A QP solver that the bridge can drive.
pub trait QpBackend {
    type Workspace: SolverWorkspace;

    /// Widths the backend was built with, checked before any call.
    fn numeric_widths(&self) -> NumericWidths;

    /// Builds a workspace for one problem.  A non-zero setup flag is
    /// returned on failure.  Progress output goes to `log` when given.
    fn setup(
        &self,
        problem: &ProblemInstance<'_>,
        settings: &AdmmSettings<f64>,
        log: Option<Box<dyn Write + Send>>,
    ) -> Result<Self::Workspace, i32>;
}

/// The in-tree ADMM solver as a bridge backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct AdmmBackend;

/// Workspace of the [`AdmmBackend`].
pub struct AdmmWorkspace {
    solver: AdmmSolver<f64>,
}

impl AdmmWorkspace {
    pub fn solver(&self) -> &AdmmSolver<f64> {
        &self.solver
    }
}

impl QpBackend for AdmmBackend {
    type Workspace = AdmmWorkspace;

    fn numeric_widths(&self) -> NumericWidths {
        NumericWidths {
            index: std::mem::size_of::<i64>(),
            float: std::mem::size_of::<f64>(),
        }
    }

    fn setup(
        &self,
        problem: &ProblemInstance<'_>,
        settings: &AdmmSettings<f64>,
        log: Option<Box<dyn Write + Send>>,
    ) -> Result<AdmmWorkspace, i32> {
        let mut solver = AdmmSolver::new(
            &problem.P,
            &problem.q,
            &problem.A,
            &problem.l,
            &problem.u,
            settings.clone(),
        )
        .map_err(|e| {
            log::error!("solver setup failed: {e}");
            e.exit_code()
        })?;

        if let Some(stream) = log {
            solver.print_to_stream(stream);
        }
        Ok(AdmmWorkspace { solver })
    }
}

impl SolverWorkspace for AdmmWorkspace {
    fn solve(&mut self) -> i32 {
        match self.solver.solve() {
            Ok(()) => 0,
            Err(e) => {
                log::error!("solver failed: {e}");
                e.exit_code()
            }
        }
    }

    fn status_val(&self) -> i32 {
        self.solver.solution.status.code()
    }

    fn solution(&self) -> Option<(&[f64], &[f64])> {
        let solution = &self.solver.solution;
        solution
            .status
            .has_solution()
            .then_some((&solution.x[..], &solution.y[..]))
    }
}
