//! qpbridge Python interface.
//!
//! This module implements a Python wrapper for the bridge using
//! [PyO3](https://pyo3.rs/).   To build these wrappers from `cargo`, compile the crate with
//! `--features python`.   This module has no public API.
//!
//! From Python the bridge is a single function,
//! `qpbridge.solve(...) -> (status, primal, dual)`, taking the same
//! arrays as the C entry point.
//!

pub(crate) mod io;
mod module_py;

// NB : Nothing is actually public here, but the python module itself
// is made public so that we can force the docstring above to appear
// in the API documentation.
