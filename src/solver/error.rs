use crate::ldl::LdlError;
use crate::solver::SettingsError;
use thiserror::Error;

/// Error type returned by [`AdmmSolver::new`](crate::solver::AdmmSolver::new)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("Incompatible problem dimensions: {0}")]
    Dimension(&'static str),
    #[error("Invalid problem data: {0}")]
    InvalidData(&'static str),
    #[error("Invalid settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("Problem is non-convex")]
    NonConvex,
    #[error("KKT factorisation failed: {0}")]
    LinearSolver(#[from] LdlError),
}

impl SetupError {
    /// Non-zero setup flag reported to the bridge.
    pub fn exit_code(&self) -> i32 {
        match self {
            SetupError::Dimension(_) | SetupError::InvalidData(_) => 1,
            SetupError::Settings(_) => 2,
            SetupError::LinearSolver(_) => 4,
            SetupError::NonConvex => 5,
        }
    }
}

/// Error type returned by [`AdmmSolver::solve`](crate::solver::AdmmSolver::solve)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("KKT refactorisation failed: {0}")]
    Refactor(#[from] LdlError),
}

impl SolveError {
    /// Non-zero exit flag reported to the bridge.
    pub fn exit_code(&self) -> i32 {
        match self {
            SolveError::Refactor(_) => 6,
        }
    }
}
