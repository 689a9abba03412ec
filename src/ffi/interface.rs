#![allow(non_snake_case)]

use crate::bridge::*;
use crate::solver;
use libc::c_char;
use std::borrow::Cow;
use std::ffi::CStr;
use std::panic::{catch_unwind, AssertUnwindSafe};

// caller arguments, gathered so that they can be acquired in one place
struct ForeignCall<'a> {
    num_variables: i64,
    num_constraints: i64,
    log_path: *const c_char,
    q: &'a ArrayHandle<f64>,
    P: [&'a ArrayHandle<i64>; 2],
    Pv: &'a ArrayHandle<f64>,
    A: [&'a ArrayHandle<i64>; 2],
    Av: &'a ArrayHandle<f64>,
    l: &'a ArrayHandle<f64>,
    u: &'a ArrayHandle<f64>,
    primal: &'a mut ArrayHandleMut<f64>,
    dual: &'a mut ArrayHandleMut<f64>,
    setting_names: &'a ArrayHandle<*const c_char>,
    setting_values: &'a ArrayHandle<f64>,
}

/// Solves one QP with the in-tree backend.
///
/// Returns `-1` for any failure before the backend ran, including a
/// panic inside the library, and otherwise the backend's status code.
///
/// # Safety
/// Every handle must describe a buffer that is valid for `len` elements
/// for the duration of the call, or have a null `data` pointer.  The
/// output buffers must not alias any input.  `log_path` and every
/// setting name must be null or point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn qpbridge_solve(
    num_variables: i64,
    num_constraints: i64,
    log_path: *const c_char,
    linear_objective: &ArrayHandle<f64>,
    quad_rows: &ArrayHandle<i64>,
    quad_cols: &ArrayHandle<i64>,
    quad_vals: &ArrayHandle<f64>,
    con_rows: &ArrayHandle<i64>,
    con_cols: &ArrayHandle<i64>,
    con_vals: &ArrayHandle<f64>,
    lower_bounds: &ArrayHandle<f64>,
    upper_bounds: &ArrayHandle<f64>,
    primal_out: &mut ArrayHandleMut<f64>,
    dual_out: &mut ArrayHandleMut<f64>,
    setting_names: &ArrayHandle<*const c_char>,
    setting_values: &ArrayHandle<f64>,
) -> i32 {
    let mut call = ForeignCall {
        num_variables,
        num_constraints,
        log_path,
        q: linear_objective,
        P: [quad_rows, quad_cols],
        Pv: quad_vals,
        A: [con_rows, con_cols],
        Av: con_vals,
        l: lower_bounds,
        u: upper_bounds,
        primal: primal_out,
        dual: dual_out,
        setting_names,
        setting_values,
    };

    catch_unwind(AssertUnwindSafe(|| solve_foreign(&AdmmBackend, &mut call))).unwrap_or_else(
        |_| {
            log::error!("panic while solving, returning -1");
            -1
        },
    )
}

/// Bound magnitude above which bounds are treated as infinite.
#[no_mangle]
pub extern "C" fn qpbridge_get_infinity() -> f64 {
    solver::BOUND_INFINITY
}

unsafe fn solve_foreign<B: QpBackend>(backend: &B, call: &mut ForeignCall<'_>) -> i32 {
    if let Err(e) = check_widths(backend) {
        return fail(&e);
    }

    let scope = CallScope::new();
    let status = match acquire_and_dispatch(backend, &scope, call) {
        Ok(status) => status,
        Err(e) => fail(&e),
    };
    debug_assert!(scope.is_balanced());
    status
}

unsafe fn acquire_and_dispatch<B: QpBackend>(
    backend: &B,
    scope: &CallScope,
    call: &mut ForeignCall<'_>,
) -> Result<i32, MarshalError> {
    // the name strings are copied out before the pointer array is released
    let names: Vec<Cow<'_, str>> = {
        let raw = scope.acquire("setting names", call.setting_names)?;
        raw.iter().map(|&p| c_str_or(p, "(null)")).collect()
    };

    let guarded = GuardedCall {
        num_variables: call.num_variables,
        num_constraints: call.num_constraints,
        log_path: c_str_or(call.log_path, ""),
        q: scope.acquire("linear objective", call.q)?,
        P: TripletGuards {
            rows: scope.acquire("triplet rows", call.P[0])?,
            cols: scope.acquire("triplet columns", call.P[1])?,
            vals: scope.acquire("triplet values", call.Pv)?,
        },
        A: TripletGuards {
            rows: scope.acquire("triplet rows", call.A[0])?,
            cols: scope.acquire("triplet columns", call.A[1])?,
            vals: scope.acquire("triplet values", call.Av)?,
        },
        l: scope.acquire("lower bounds", call.l)?,
        u: scope.acquire("upper bounds", call.u)?,
        setting_names: scope.borrow("setting name strings", &names),
        setting_values: scope.acquire("setting values", call.setting_values)?,
        primal: scope.acquire_mut("primal output", call.primal)?,
        dual: scope.acquire_mut("dual output", call.dual)?,
    };

    Ok(dispatch(backend, guarded).0)
}

unsafe fn c_str_or<'a>(p: *const c_char, null: &'static str) -> Cow<'a, str> {
    if p.is_null() {
        Cow::Borrowed(null)
    } else {
        CStr::from_ptr(p).to_string_lossy()
    }
}
