use super::{DiagnosticLog, NumericWidths, ProblemInstance, QpBackend, SolverWorkspace};
use crate::solver::{AdmmSettings, SETUP_ERROR_CODE};
use std::io::Write;

/// Lifecycle state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Configured,
    Ready,
    Solved,
    Failed,
    Released,
}

/// Steps recorded while a session runs, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionEvent {
    LogOpened,
    WorkspaceReady,
    SetupFailed(i32),
    Solved(i32),
    SolveFailed(i32),
    WorkspaceReleased,
    SettingsReleased,
    ProblemReleased,
    LogClosed,
}

/// Outcome of [`Session::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub status: i32,
    pub trace: Vec<SessionEvent>,
}

/// Drives one problem through a [`QpBackend`].
///
/// A session owns the problem, the settings and the diagnostic log for
/// the duration of [`run`](Session::run), and releases them in a fixed
/// order on every path.
pub struct Session<'b, B: QpBackend> {
    backend: &'b B,
    state: SessionState,
    trace: Vec<SessionEvent>,
}

impl<'b, B: QpBackend> Session<'b, B> {
    pub fn new(backend: &'b B) -> Self {
        Self {
            backend,
            state: SessionState::Uninitialized,
            trace: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    fn transition(&mut self, to: SessionState) {
        log::debug!("session: {:?} -> {:?}", self.state, to);
        self.state = to;
    }

    fn record(&mut self, event: SessionEvent) {
        log::debug!("session event: {event:?}");
        self.trace.push(event);
    }

    /// Solves `problem`, writing the solution into `primal` and `dual`.
    ///
    /// Returns -1 on a precondition or setup failure.  Otherwise it
    /// returns the backend's status code when the solver ran to
    /// completion, or its raw exit flag if it did not.  The output
    /// buffers are written only when the backend reports a solution.
    ///
    /// A non-empty `log_path` sends the backend's progress output to
    /// that file for the duration of the call.
    pub fn run(
        &mut self,
        problem: ProblemInstance<'_>,
        settings: AdmmSettings<f64>,
        log_path: &str,
        primal: &mut [f64],
        dual: &mut [f64],
    ) -> SessionReport {
        self.trace.clear();
        self.transition(SessionState::Configured);

        let mut diag = None;
        let status = if self.check_preconditions(&problem, primal, dual) {
            let opened = DiagnosticLog::open(log_path);
            if opened.is_open() {
                self.record(SessionEvent::LogOpened);
            }
            let status = self.setup_and_solve(&problem, &settings, opened.writer(), primal, dual);
            diag = Some(opened);
            status
        } else {
            self.transition(SessionState::Failed);
            SETUP_ERROR_CODE
        };

        drop(settings);
        self.record(SessionEvent::SettingsReleased);
        drop(problem);
        self.record(SessionEvent::ProblemReleased);

        if let Some(diag) = diag.filter(DiagnosticLog::is_open) {
            if let Err(e) = diag.close() {
                log::warn!("failed to close diagnostic log: {e}");
            }
            self.record(SessionEvent::LogClosed);
        }

        self.transition(SessionState::Released);
        SessionReport {
            status,
            trace: std::mem::take(&mut self.trace),
        }
    }

    fn check_preconditions(
        &self,
        problem: &ProblemInstance<'_>,
        primal: &[f64],
        dual: &[f64],
    ) -> bool {
        let widths = self.backend.numeric_widths();
        if widths != NumericWidths::EXPECTED {
            log::error!(
                "backend widths {widths:?} differ from expected {:?}",
                NumericWidths::EXPECTED
            );
            return false;
        }
        if primal.len() != problem.n || dual.len() != problem.m {
            log::error!(
                "output buffers of length {}/{} for a problem of size {}/{}",
                primal.len(),
                dual.len(),
                problem.n,
                problem.m
            );
            return false;
        }
        true
    }

    // setup, solve and release of the backend workspace
    fn setup_and_solve(
        &mut self,
        problem: &ProblemInstance<'_>,
        settings: &AdmmSettings<f64>,
        log: Option<Box<dyn Write + Send>>,
        primal: &mut [f64],
        dual: &mut [f64],
    ) -> i32 {
        let mut workspace = match self.backend.setup(problem, settings, log) {
            Ok(workspace) => workspace,
            Err(code) => {
                self.transition(SessionState::Failed);
                self.record(SessionEvent::SetupFailed(code));
                return SETUP_ERROR_CODE;
            }
        };
        self.transition(SessionState::Ready);
        self.record(SessionEvent::WorkspaceReady);

        let exitflag = workspace.solve();
        let status = if exitflag == 0 {
            if let Some((x, y)) = workspace.solution() {
                primal.copy_from_slice(x);
                dual.copy_from_slice(y);
            }
            let status = workspace.status_val();
            self.transition(SessionState::Solved);
            self.record(SessionEvent::Solved(status));
            status
        } else {
            self.transition(SessionState::Failed);
            self.record(SessionEvent::SolveFailed(exitflag));
            exitflag
        };

        drop(workspace);
        self.record(SessionEvent::WorkspaceReleased);
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{CallScope, TripletGuards};
    use std::cell::Cell;

    // backend with scripted results
    struct MockBackend {
        widths: NumericWidths,
        setup: Result<(), i32>,
        exitflag: i32,
        status: i32,
        has_solution: bool,
        solves: Cell<u32>,
    }

    impl Default for MockBackend {
        fn default() -> Self {
            Self {
                widths: NumericWidths::EXPECTED,
                setup: Ok(()),
                exitflag: 0,
                status: 1,
                has_solution: true,
                solves: Cell::new(0),
            }
        }
    }

    struct MockWorkspace<'a> {
        backend: &'a MockBackend,
        x: Vec<f64>,
        y: Vec<f64>,
    }

    impl SolverWorkspace for MockWorkspace<'_> {
        fn solve(&mut self) -> i32 {
            self.backend.solves.set(self.backend.solves.get() + 1);
            self.backend.exitflag
        }
        fn status_val(&self) -> i32 {
            self.backend.status
        }
        fn solution(&self) -> Option<(&[f64], &[f64])> {
            self.backend.has_solution.then_some((&self.x[..], &self.y[..]))
        }
    }

    impl<'a> QpBackend for &'a MockBackend {
        type Workspace = MockWorkspace<'a>;

        fn numeric_widths(&self) -> NumericWidths {
            self.widths
        }

        fn setup(
            &self,
            problem: &ProblemInstance<'_>,
            _settings: &AdmmSettings<f64>,
            _log: Option<Box<dyn Write + Send>>,
        ) -> Result<MockWorkspace<'a>, i32> {
            self.setup?;
            Ok(MockWorkspace {
                backend: *self,
                x: vec![7.; problem.n],
                y: vec![8.; problem.m],
            })
        }
    }

    fn problem(scope: &CallScope) -> ProblemInstance<'_> {
        let empty = || TripletGuards {
            rows: scope.borrow("rows", &[]),
            cols: scope.borrow("cols", &[]),
            vals: scope.borrow("vals", &[]),
        };
        crate::bridge::assemble(
            1,
            1,
            scope.borrow("q", &[1.]),
            empty(),
            empty(),
            scope.borrow("l", &[0.]),
            scope.borrow("u", &[1.]),
        )
        .unwrap()
    }

    fn run(backend: &MockBackend, log_path: &str) -> (SessionReport, [f64; 2]) {
        let scope = CallScope::new();
        let (mut x, mut y) = ([0.], [0.]);
        let mut session = Session::new(&backend);
        let report = session.run(problem(&scope), Default::default(), log_path, &mut x, &mut y);
        assert_eq!(session.state(), SessionState::Released);
        assert!(scope.is_balanced());
        (report, [x[0], y[0]])
    }

    #[test]
    fn test_session_solved() {
        let backend = MockBackend::default();
        let (report, out) = run(&backend, "");

        assert_eq!(report.status, 1);
        assert_eq!(out, [7., 8.]);
        assert_eq!(
            report.trace,
            vec![
                SessionEvent::WorkspaceReady,
                SessionEvent::Solved(1),
                SessionEvent::WorkspaceReleased,
                SessionEvent::SettingsReleased,
                SessionEvent::ProblemReleased,
            ]
        );
    }

    #[test]
    fn test_session_teardown_with_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.log");
        let backend = MockBackend {
            status: -3,
            has_solution: false,
            ..Default::default()
        };
        let (report, out) = run(&backend, path.to_str().unwrap());

        assert_eq!(report.status, -3);
        assert_eq!(out, [0., 0.]);
        assert_eq!(report.trace.first(), Some(&SessionEvent::LogOpened));
        assert_eq!(
            report.trace[report.trace.len() - 4..],
            [
                SessionEvent::WorkspaceReleased,
                SessionEvent::SettingsReleased,
                SessionEvent::ProblemReleased,
                SessionEvent::LogClosed,
            ]
        );
        assert!(path.exists());
    }

    #[test]
    fn test_session_setup_failure() {
        let backend = MockBackend {
            setup: Err(5),
            ..Default::default()
        };
        let (report, out) = run(&backend, "");

        assert_eq!(report.status, -1);
        assert_eq!(out, [0., 0.]);
        assert_eq!(backend.solves.get(), 0);
        assert_eq!(
            report.trace,
            vec![
                SessionEvent::SetupFailed(5),
                SessionEvent::SettingsReleased,
                SessionEvent::ProblemReleased,
            ]
        );
    }

    #[test]
    fn test_session_solve_failure() {
        let backend = MockBackend {
            exitflag: 6,
            ..Default::default()
        };
        let (report, out) = run(&backend, "");

        assert_eq!(report.status, 6);
        assert_eq!(out, [0., 0.]);
        assert!(report.trace.contains(&SessionEvent::SolveFailed(6)));
    }

    #[test]
    fn test_session_width_mismatch() {
        let backend = MockBackend {
            widths: NumericWidths { index: 4, float: 8 },
            ..Default::default()
        };
        let (report, out) = run(&backend, "");

        assert_eq!(report.status, -1);
        assert_eq!(out, [0., 0.]);
        assert_eq!(backend.solves.get(), 0);
        assert!(!report.trace.contains(&SessionEvent::WorkspaceReady));
    }
}
