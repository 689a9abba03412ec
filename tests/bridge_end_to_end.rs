#![allow(non_snake_case)]

use qpbridge::bridge::*;

// minimise x subject to 0 <= x <= 10, no curvature
fn trivial_call<'a>(names: &'a [&'a str], values: &'a [f64]) -> QpCall<'a> {
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
        setting_names: names,
        setting_values: values,
    }
}

// P = [4. 1;1 2], A = [1. 1;1 0; 0 1]
const P_ROWS: [i64; 3] = [0, 0, 1];
const P_COLS: [i64; 3] = [0, 1, 1];
const P_VALS: [f64; 3] = [4., 1., 2.];
const A_ROWS: [i64; 4] = [0, 0, 1, 2];
const A_COLS: [i64; 4] = [0, 1, 0, 1];
const A_VALS: [f64; 4] = [1., 1., 1., 1.];

fn basic_qp_call<'a>(l: &'a [f64], u: &'a [f64]) -> QpCall<'a> {
    QpCall {
        num_variables: 2,
        num_constraints: 3,
        log_path: "",
        linear_objective: &[1., 1.],
        quadratic_objective: TripletSlices {
            rows: &P_ROWS,
            cols: &P_COLS,
            vals: &P_VALS,
        },
        constraints: TripletSlices {
            rows: &A_ROWS,
            cols: &A_COLS,
            vals: &A_VALS,
        },
        lower_bounds: l,
        upper_bounds: u,
        setting_names: &[],
        setting_values: &[],
    }
}

fn close(a: &[f64], b: &[f64], tol: f64) -> bool {
    a.len() == b.len() && std::iter::zip(a, b).all(|(x, y)| (x - y).abs() <= tol)
}

#[test]
fn test_trivial_qp() {
    let call = trivial_call(&[], &[]);
    let (mut x, mut y) = ([f64::NAN], [f64::NAN]);

    let status = solve(&AdmmBackend, &call, &mut x, &mut y);

    assert_eq!(status, 1);
    assert!(x[0].abs() < 1e-3);
    assert!((y[0] + 1.0).abs() < 1e-3);
}

#[test]
fn test_basic_qp() {
    let call = basic_qp_call(&[1., 0., 0.], &[1., 0.7, 0.7]);
    let (mut x, mut y) = ([0.; 2], [0.; 3]);

    let status = solve(&AdmmBackend, &call, &mut x, &mut y);

    assert_eq!(status, 1);
    assert!(close(&x, &[0.3, 0.7], 1e-3));
    assert!(close(&y, &[-2.9, 0., 0.2], 1e-3));
}

#[test]
fn test_duplicate_triplets_sum() {
    // the off-diagonal entry of P split in two
    let rows = [0, 0, 0, 1];
    let cols = [0, 1, 1, 1];
    let vals = [4., 0.25, 0.75, 2.];
    let mut call = basic_qp_call(&[1., 0., 0.], &[1., 0.7, 0.7]);
    call.quadratic_objective = TripletSlices {
        rows: &rows,
        cols: &cols,
        vals: &vals,
    };
    let (mut x, mut y) = ([0.; 2], [0.; 3]);

    assert_eq!(solve(&AdmmBackend, &call, &mut x, &mut y), 1);
    assert!(close(&x, &[0.3, 0.7], 1e-3));
}

#[test]
fn test_crossed_bounds_leave_outputs() {
    let call = basic_qp_call(&[5., 0., 0.], &[1., 0.7, 0.7]);
    let (mut x, mut y) = ([7.; 2], [7.; 3]);

    let status = solve(&AdmmBackend, &call, &mut x, &mut y);

    assert_eq!(status, -3);
    assert_eq!(x, [7.; 2]);
    assert_eq!(y, [7.; 3]);
}

#[test]
fn test_repeat_calls_agree() {
    let call = basic_qp_call(&[1., 0., 0.], &[1., 0.7, 0.7]);
    let (mut x1, mut y1) = ([0.; 2], [0.; 3]);
    let (mut x2, mut y2) = ([0.; 2], [0.; 3]);

    let s1 = solve(&AdmmBackend, &call, &mut x1, &mut y1);
    let s2 = solve(&AdmmBackend, &call, &mut x2, &mut y2);

    assert_eq!(s1, s2);
    assert_eq!(x1, x2);
    assert_eq!(y1, y2);
}

#[test]
fn test_lower_bound_respected_on_repeat() {
    // minimise x subject to 2 <= x <= 10
    let mut call = trivial_call(&[], &[]);
    call.lower_bounds = &[2.0];

    let (mut x1, mut y1) = ([f64::NAN], [f64::NAN]);
    let (mut x2, mut y2) = ([f64::NAN], [f64::NAN]);
    assert_eq!(solve(&AdmmBackend, &call, &mut x1, &mut y1), 1);
    assert_eq!(solve(&AdmmBackend, &call, &mut x2, &mut y2), 1);

    assert!((x1[0] - 2.0).abs() < 1e-3);
    assert_eq!(x1, x2);
    assert_eq!(y1, y2);
}

#[test]
fn test_unknown_setting_is_ignored() {
    let names = ["FOO", "EPS_ABS"];
    let values = [3.0, 1e-5];
    let call = trivial_call(&names, &values);
    let (mut x, mut y) = ([f64::NAN], [f64::NAN]);

    assert_eq!(solve(&AdmmBackend, &call, &mut x, &mut y), 1);
}

#[test]
fn test_settings_reach_backend() {
    let names = ["MAX_ITER", "POLISH", "EPS_ABS", "EPS_REL"];
    let values = [1.0, 0.0, 1e-12, 1e-12];
    let call = basic_qp_call(&[1., 0., 0.], &[1., 0.7, 0.7]);
    let call = QpCall {
        setting_names: &names,
        setting_values: &values,
        ..call
    };
    let (mut x, mut y) = ([0.; 2], [0.; 3]);

    assert_eq!(solve(&AdmmBackend, &call, &mut x, &mut y), -2);
}

#[test]
fn test_marshal_failures() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (mut x, mut y) = ([7.], [7.]);

    // index out of range
    let mut call = trivial_call(&[], &[]);
    call.constraints.rows = &[1];
    assert_eq!(solve(&AdmmBackend, &call, &mut x, &mut y), -1);

    // ragged triplets
    let mut call = trivial_call(&[], &[]);
    call.constraints.cols = &[0, 0];
    assert_eq!(solve(&AdmmBackend, &call, &mut x, &mut y), -1);

    // negative dimension
    let mut call = trivial_call(&[], &[]);
    call.num_variables = -1;
    assert_eq!(solve(&AdmmBackend, &call, &mut x, &mut y), -1);

    // names without values
    let call = trivial_call(&["RHO"], &[]);
    assert_eq!(solve(&AdmmBackend, &call, &mut x, &mut y), -1);

    // bounds of the wrong length
    let mut call = trivial_call(&[], &[]);
    call.lower_bounds = &[0., 0.];
    assert_eq!(solve(&AdmmBackend, &call, &mut x, &mut y), -1);

    assert_eq!((x, y), ([7.], [7.]));
}

#[test]
fn test_output_length_checked() {
    let call = trivial_call(&[], &[]);
    let (mut x, mut y) = ([7.; 2], [7.]);
    assert_eq!(solve(&AdmmBackend, &call, &mut x, &mut y), -1);
    assert_eq!(x, [7.; 2]);
}

#[test]
fn test_nonconvex_is_setup_failure() {
    let _ = env_logger::builder().is_test(true).try_init();
    let rows = [0];
    let cols = [0];
    let vals = [-1.];
    let mut call = trivial_call(&[], &[]);
    call.quadratic_objective = TripletSlices {
        rows: &rows,
        cols: &cols,
        vals: &vals,
    };
    let (mut x, mut y) = ([7.], [7.]);

    let report = solve_traced(&AdmmBackend, &call, &mut x, &mut y);

    assert_eq!(report.status, -1);
    let trace = report.session.unwrap().trace;
    assert!(trace.contains(&SessionEvent::SetupFailed(5)));
    assert_eq!(x, [7.]);
}

#[test]
fn test_buffers_balanced() {
    let call = basic_qp_call(&[1., 0., 0.], &[1., 0.7, 0.7]);
    let (mut x, mut y) = ([0.; 2], [0.; 3]);

    let report = solve_traced(&AdmmBackend, &call, &mut x, &mut y);
    assert_eq!(report.status, 1);
    assert!(report.acquired > 0);
    assert_eq!(report.acquired, report.released);

    let mut bad = basic_qp_call(&[1., 0., 0.], &[1., 0.7, 0.7]);
    bad.constraints.vals = &[1.];
    let report = solve_traced(&AdmmBackend, &bad, &mut x, &mut y);
    assert_eq!(report.status, -1);
    assert!(report.session.is_none());
    assert_eq!(report.acquired, report.released);
}

#[test]
fn test_session_trace_order() {
    let call = trivial_call(&[], &[]);
    let (mut x, mut y) = ([0.], [0.]);

    let report = solve_traced(&AdmmBackend, &call, &mut x, &mut y);
    let trace = report.session.unwrap().trace;

    assert_eq!(
        trace,
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
fn test_diagnostic_log() {
    use std::io::Read;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("solve.log");
    let path_str = path.to_str().unwrap();

    let mut call = trivial_call(&[], &[]);
    call.log_path = path_str;
    let (mut x, mut y) = ([0.], [0.]);

    let report = solve_traced(&AdmmBackend, &call, &mut x, &mut y);
    assert_eq!(report.status, 1);

    let trace = report.session.unwrap().trace;
    assert_eq!(trace.first(), Some(&SessionEvent::LogOpened));
    assert_eq!(trace.last(), Some(&SessionEvent::LogClosed));

    let mut contents = String::new();
    std::fs::File::open(&path)
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert!(contents.contains("qpbridge"));
}
