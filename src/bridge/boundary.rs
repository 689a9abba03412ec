//! The single entry point of the bridge.
//!
//! A call passes through three steps, in order: the [assembler](super::assemble)
//! builds the problem, the [resolver](super::resolve) builds the settings,
//! and a [`Session`] runs the backend.  Every caller buffer is held by a
//! guard from a per-call [`CallScope`], so all of them are released
//! whichever step fails.

#![allow(non_snake_case)]

use super::*;
use crate::stdio;
use crate::solver::SETUP_ERROR_CODE;
use std::borrow::Cow;
use std::io::Write;

/// Triplet arrays for one sparse matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct TripletSlices<'a> {
    pub rows: &'a [i64],
    pub cols: &'a [i64],
    pub vals: &'a [f64],
}

/// Arguments of one solve call, as plain slices.
#[derive(Debug, Clone, Copy)]
pub struct QpCall<'a, N = &'a str> {
    pub num_variables: i64,
    pub num_constraints: i64,
    /// empty for no diagnostic log
    pub log_path: &'a str,
    pub linear_objective: &'a [f64],
    pub quadratic_objective: TripletSlices<'a>,
    pub constraints: TripletSlices<'a>,
    pub lower_bounds: &'a [f64],
    pub upper_bounds: &'a [f64],
    pub setting_names: &'a [N],
    pub setting_values: &'a [f64],
}

/// Status of a call along with its bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryReport {
    pub status: i32,
    /// absent if the call failed before a session started
    pub session: Option<SessionReport>,
    pub acquired: usize,
    pub released: usize,
}

// A call with every caller buffer held by a guard.
pub(crate) struct GuardedCall<'s, N> {
    pub num_variables: i64,
    pub num_constraints: i64,
    pub log_path: Cow<'s, str>,
    pub q: Exported<'s, f64>,
    pub P: TripletGuards<'s>,
    pub A: TripletGuards<'s>,
    pub l: Exported<'s, f64>,
    pub u: Exported<'s, f64>,
    pub setting_names: Exported<'s, N>,
    pub setting_values: Exported<'s, f64>,
    pub primal: ExportedMut<'s, f64>,
    pub dual: ExportedMut<'s, f64>,
}

/// Solves one QP with `backend`.
///
/// Returns -1 on any marshaling or setup failure, and otherwise the
/// status reported by the session.  `primal` and `dual` are written
/// only when the backend reports a solution.
pub fn solve<B, N>(backend: &B, call: &QpCall<'_, N>, primal: &mut [f64], dual: &mut [f64]) -> i32
where
    B: QpBackend,
    N: AsRef<str>,
{
    solve_traced(backend, call, primal, dual).status
}

/// Same as [`solve`], also returning the session trace and the buffer
/// acquisition counts.
pub fn solve_traced<B, N>(
    backend: &B,
    call: &QpCall<'_, N>,
    primal: &mut [f64],
    dual: &mut [f64],
) -> BoundaryReport
where
    B: QpBackend,
    N: AsRef<str>,
{
    if let Err(e) = check_widths(backend) {
        return BoundaryReport {
            status: fail(&e),
            session: None,
            acquired: 0,
            released: 0,
        };
    }

    let scope = CallScope::new();
    log::debug!(
        "solve call: n = {}, m = {}, nnz(P) = {}, nnz(A) = {}",
        call.num_variables,
        call.num_constraints,
        call.quadratic_objective.vals.len(),
        call.constraints.vals.len()
    );

    let guarded = GuardedCall {
        num_variables: call.num_variables,
        num_constraints: call.num_constraints,
        log_path: Cow::Borrowed(call.log_path),
        q: scope.borrow("linear objective", call.linear_objective),
        P: borrow_triplets(&scope, &call.quadratic_objective),
        A: borrow_triplets(&scope, &call.constraints),
        l: scope.borrow("lower bounds", call.lower_bounds),
        u: scope.borrow("upper bounds", call.upper_bounds),
        setting_names: scope.borrow("setting names", call.setting_names),
        setting_values: scope.borrow("setting values", call.setting_values),
        primal: scope.borrow_mut("primal output", primal),
        dual: scope.borrow_mut("dual output", dual),
    };
    let (status, session) = dispatch(backend, guarded);

    BoundaryReport {
        status,
        session,
        acquired: scope.acquired(),
        released: scope.released(),
    }
}

fn borrow_triplets<'s>(scope: &'s CallScope, t: &TripletSlices<'s>) -> TripletGuards<'s> {
    TripletGuards {
        rows: scope.borrow("triplet rows", t.rows),
        cols: scope.borrow("triplet columns", t.cols),
        vals: scope.borrow("triplet values", t.vals),
    }
}

/// Fails with `WidthMismatch` unless `backend` uses the widths callers
/// pass data in.
pub fn check_widths<B: QpBackend>(backend: &B) -> Result<(), MarshalError> {
    let found = backend.numeric_widths();
    let expected = NumericWidths::EXPECTED;
    if found == expected {
        Ok(())
    } else {
        Err(MarshalError::WidthMismatch {
            expected_index: expected.index,
            expected_float: expected.float,
            found_index: found.index,
            found_float: found.float,
        })
    }
}

/// Reports a marshaling failure and returns the failure status.
pub(crate) fn fail(e: &MarshalError) -> i32 {
    log::error!("{e}");
    let _ = writeln!(stdio::stderr(), "qpbridge: {e}");
    SETUP_ERROR_CODE
}

// assembler, then resolver, then session
pub(crate) fn dispatch<B, N>(backend: &B, call: GuardedCall<'_, N>) -> (i32, Option<SessionReport>)
where
    B: QpBackend,
    N: AsRef<str>,
{
    let GuardedCall {
        num_variables,
        num_constraints,
        log_path,
        q,
        P,
        A,
        l,
        u,
        setting_names,
        setting_values,
        mut primal,
        mut dual,
    } = call;

    let problem = match assemble(num_variables, num_constraints, q, P, A, l, u) {
        Ok(problem) => problem,
        Err(e) => return (fail(&e), None),
    };

    let settings = match resolve(&*setting_names, &setting_values) {
        Ok(settings) => settings,
        Err(e) => return (fail(&e), None),
    };
    drop((setting_names, setting_values));

    if primal.len() != problem.n || dual.len() != problem.m {
        let (what, expected, found) = if primal.len() != problem.n {
            ("primal output", problem.n, primal.len())
        } else {
            ("dual output", problem.m, dual.len())
        };
        return (fail(&MarshalError::LengthMismatch { what, expected, found }), None);
    }

    let report = Session::new(backend).run(problem, settings, &log_path, &mut primal, &mut dual);
    (report.status, Some(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::AdmmSettings;

    // reports 32-bit indices and must never be set up
    struct NarrowBackend;

    impl QpBackend for NarrowBackend {
        type Workspace = AdmmWorkspace;

        fn numeric_widths(&self) -> NumericWidths {
            NumericWidths { index: 4, float: 8 }
        }

        fn setup(
            &self,
            _problem: &ProblemInstance<'_>,
            _settings: &AdmmSettings<f64>,
            _log: Option<Box<dyn Write + Send>>,
        ) -> Result<AdmmWorkspace, i32> {
            unreachable!("setup after a width mismatch")
        }
    }

    fn trivial_call() -> QpCall<'static> {
        QpCall {
            num_variables: 1,
            num_constraints: 1,
            log_path: "",
            linear_objective: &[1.0],
            quadratic_objective: TripletSlices::default(),
            constraints: TripletSlices {
                rows: &[0],
                cols: &[0],
                vals: &[1.0],
            },
            lower_bounds: &[0.0],
            upper_bounds: &[10.0],
            setting_names: &[],
            setting_values: &[],
        }
    }

    #[test]
    fn test_width_mismatch() {
        let (mut x, mut y) = ([7.], [7.]);
        let report = solve_traced(&NarrowBackend, &trivial_call(), &mut x, &mut y);

        assert_eq!(report.status, -1);
        assert!(report.session.is_none());
        assert_eq!(report.acquired, 0);
        assert_eq!((x, y), ([7.], [7.]));

        assert_eq!(
            check_widths(&NarrowBackend),
            Err(MarshalError::WidthMismatch {
                expected_index: 8,
                expected_float: 8,
                found_index: 4,
                found_float: 8,
            })
        );
        assert!(check_widths(&AdmmBackend).is_ok());
    }

    #[test]
    fn test_resolver_failure_releases_problem() {
        let mut call = trivial_call();
        call.setting_values = &[1.0];
        let (mut x, mut y) = ([7.], [7.]);

        let report = solve_traced(&AdmmBackend, &call, &mut x, &mut y);

        assert_eq!(report.status, -1);
        assert!(report.acquired > 0);
        assert_eq!(report.acquired, report.released);
        assert_eq!((x, y), ([7.], [7.]));
    }
}
