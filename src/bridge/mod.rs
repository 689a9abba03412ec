//! Marshaling layer between foreign callers and the QP backend.
//!
//! A call arrives as flat arrays: a linear objective, the quadratic
//! objective and constraint matrices as 0-based coordinate triplets,
//! the constraint bounds, two output buffers and a list of named
//! settings.  The bridge
//!
//! * builds the sparse matrices ([`build`]),
//! * resolves the named settings over their defaults ([`resolve`]),
//! * assembles a [`ProblemInstance`] ([`assemble`]), and
//! * runs the backend in a [`Session`] that releases every resource on
//!   every exit path.
//!
//! [`solve`] ties these together and returns a single integer status:
//! `-1` for any failure before the backend ran, and otherwise the
//! backend's status code.
//!
//! ```no_run
//! use qpbridge::bridge::*;
//!
//! let call = QpCall {
//!     num_variables: 1,
//!     num_constraints: 1,
//!     log_path: "",
//!     linear_objective: &[1.0],
//!     quadratic_objective: TripletSlices::default(),
//!     constraints: TripletSlices { rows: &[0], cols: &[0], vals: &[1.0] },
//!     lower_bounds: &[0.0],
//!     upper_bounds: &[10.0],
//!     setting_names: &["EPS_ABS"],
//!     setting_values: &[1e-6],
//! };
//! let (mut x, mut y) = ([f64::NAN], [f64::NAN]);
//! let status = solve(&AdmmBackend, &call, &mut x, &mut y);
//! assert_eq!(status, 1);
//! ```

mod backend;
mod boundary;
mod diaglog;
mod error;
mod exported;
mod problem;
#[cfg(feature = "serde")]
mod record;
mod session;
mod settings;
mod sparse;

pub use backend::*;
pub use boundary::*;
pub use diaglog::*;
pub use error::*;
pub use exported::*;
pub use problem::*;
#[cfg(feature = "serde")]
pub use record::*;
pub use session::*;
pub use settings::*;
pub use sparse::{build, NONZERO_THRESHOLD};
