#![allow(non_snake_case)]

use crate::bridge::{self, AdmmBackend, QpCall, TripletSlices};
use crate::solver::SolverStatus;
use pyo3::prelude::*;

/// Solves one QP.  Returns `(status, primal, dual)`; the outputs hold
/// NaN wherever no solution was copied.
#[pyfunction(
    name = "solve",
    signature = (
        num_variables,
        num_constraints,
        linear_objective,
        quad_rows,
        quad_cols,
        quad_vals,
        con_rows,
        con_cols,
        con_vals,
        lower_bounds,
        upper_bounds,
        setting_names = Vec::new(),
        setting_values = Vec::new(),
        log_path = String::new(),
    )
)]
#[allow(clippy::too_many_arguments)]
fn solve_py(
    num_variables: i64,
    num_constraints: i64,
    linear_objective: Vec<f64>,
    quad_rows: Vec<i64>,
    quad_cols: Vec<i64>,
    quad_vals: Vec<f64>,
    con_rows: Vec<i64>,
    con_cols: Vec<i64>,
    con_vals: Vec<f64>,
    lower_bounds: Vec<f64>,
    upper_bounds: Vec<f64>,
    setting_names: Vec<String>,
    setting_values: Vec<f64>,
    log_path: String,
) -> (i32, Vec<f64>, Vec<f64>) {
    let call = QpCall {
        num_variables,
        num_constraints,
        log_path: &log_path,
        linear_objective: &linear_objective,
        quadratic_objective: TripletSlices {
            rows: &quad_rows,
            cols: &quad_cols,
            vals: &quad_vals,
        },
        constraints: TripletSlices {
            rows: &con_rows,
            cols: &con_cols,
            vals: &con_vals,
        },
        lower_bounds: &lower_bounds,
        upper_bounds: &upper_bounds,
        setting_names: &setting_names,
        setting_values: &setting_values,
    };

    let mut primal = vec![f64::NAN; usize::try_from(num_variables).unwrap_or(0)];
    let mut dual = vec![f64::NAN; usize::try_from(num_constraints).unwrap_or(0)];
    let status = bridge::solve(&AdmmBackend, &call, &mut primal, &mut dual);

    (status, primal, dual)
}

#[pymodule]
fn qpbridge(_py: Python, m: &Bound<PyModule>) -> PyResult<()> {
    //module version
    m.add("__version__", crate::VERSION)?;

    // status codes visible to python callers
    for (name, code) in SolverStatus::managed_constants() {
        m.add(name, code)?;
    }
    let names: Vec<&str> = bridge::SettingName::ALL.iter().map(|s| s.as_str()).collect();
    m.add("SETTING_NAMES", names)?;
    m.add("INFINITY", crate::solver::BOUND_INFINITY)?;

    m.add_function(wrap_pyfunction!(solve_py, m)?)?;

    Ok(())
}
