/// Status reported across the bridge when marshaling or setup fails.
/// It is never a [`SolverStatus`] since no solver ran.
pub const SETUP_ERROR_CODE: i32 = -1;

/// Status of solver at termination

#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverStatus {
    /// Problem is not solved (solver hasn't run).
    #[default]
    Unsolved,
    /// Solver terminated with a solution.
    Solved,
    /// Solver terminated with a solution (reduced accuracy).
    SolvedInaccurate,
    /// Problem is primal infeasible.
    PrimalInfeasible,
    /// Problem is primal infeasible (reduced accuracy).
    PrimalInfeasibleInaccurate,
    /// Problem is dual infeasible.
    DualInfeasible,
    /// Problem is dual infeasible (reduced accuracy).
    DualInfeasibleInaccurate,
    /// Iteration limit reached before solution or infeasibility certificate found.
    MaxIterations,
    /// Time limit reached before solution or infeasibility certificate found.
    TimeLimit,
    /// Solve was interrupted.
    Interrupted,
    /// Problem data is non-convex.
    NonConvex,
}

impl SolverStatus {
    pub const ALL: [SolverStatus; 11] = [
        SolverStatus::Solved,
        SolverStatus::SolvedInaccurate,
        SolverStatus::PrimalInfeasibleInaccurate,
        SolverStatus::DualInfeasibleInaccurate,
        SolverStatus::MaxIterations,
        SolverStatus::PrimalInfeasible,
        SolverStatus::DualInfeasible,
        SolverStatus::Interrupted,
        SolverStatus::TimeLimit,
        SolverStatus::NonConvex,
        SolverStatus::Unsolved,
    ];

    /// Name the managed runtimes use for this status.
    pub fn managed_name(&self) -> &'static str {
        match self {
            SolverStatus::Solved => "SOLVED",
            SolverStatus::SolvedInaccurate => "SOLVED_INACCURATE",
            SolverStatus::PrimalInfeasibleInaccurate => "PRIMAL_INFEASIBLE_INACCURATE",
            SolverStatus::DualInfeasibleInaccurate => "DUAL_INFEASIBLE_INACCURATE",
            SolverStatus::MaxIterations => "MAX_ITER_REACHED",
            SolverStatus::PrimalInfeasible => "PRIMAL_INFEASIBLE",
            SolverStatus::DualInfeasible => "DUAL_INFEASIBLE",
            SolverStatus::Interrupted => "SIGINT",
            SolverStatus::TimeLimit => "TIME_LIMIT_REACHED",
            SolverStatus::NonConvex => "NON_CVX",
            SolverStatus::Unsolved => "UNSOLVED",
        }
    }

    /// Every (name, code) pair a caller can receive, including the
    /// setup failure code.
    pub fn managed_constants() -> impl Iterator<Item = (&'static str, i32)> {
        std::iter::once(("SETUP_ERROR", SETUP_ERROR_CODE))
            .chain(Self::ALL.iter().map(|s| (s.managed_name(), s.code())))
    }

    /// Status code as reported across the bridge boundary.
    pub fn code(&self) -> i32 {
        match self {
            SolverStatus::Solved => 1,
            SolverStatus::SolvedInaccurate => 2,
            SolverStatus::PrimalInfeasibleInaccurate => 3,
            SolverStatus::DualInfeasibleInaccurate => 4,
            SolverStatus::MaxIterations => -2,
            SolverStatus::PrimalInfeasible => -3,
            SolverStatus::DualInfeasible => -4,
            SolverStatus::Interrupted => -5,
            SolverStatus::TimeLimit => -6,
            SolverStatus::NonConvex => -7,
            SolverStatus::Unsolved => -10,
        }
    }

    /// Inverse of [`code`](SolverStatus::code).
    pub fn from_code(code: i32) -> Option<SolverStatus> {
        let status = match code {
            1 => SolverStatus::Solved,
            2 => SolverStatus::SolvedInaccurate,
            3 => SolverStatus::PrimalInfeasibleInaccurate,
            4 => SolverStatus::DualInfeasibleInaccurate,
            -2 => SolverStatus::MaxIterations,
            -3 => SolverStatus::PrimalInfeasible,
            -4 => SolverStatus::DualInfeasible,
            -5 => SolverStatus::Interrupted,
            -6 => SolverStatus::TimeLimit,
            -7 => SolverStatus::NonConvex,
            -10 => SolverStatus::Unsolved,
            _ => return None,
        };
        Some(status)
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(
            *self,
            SolverStatus::PrimalInfeasible
                | SolverStatus::PrimalInfeasibleInaccurate
                | SolverStatus::DualInfeasible
                | SolverStatus::DualInfeasibleInaccurate
        )
    }

    /// true if the final iterate is reported as a primal/dual solution
    pub fn has_solution(&self) -> bool {
        !self.is_infeasible() && !matches!(*self, SolverStatus::Unsolved | SolverStatus::NonConvex)
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Outcome of solution polishing
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PolishStatus {
    #[default]
    NotPerformed,
    Successful,
    Unsuccessful,
}

impl std::fmt::Display for PolishStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[test]
fn test_status_codes() {
    for status in SolverStatus::ALL {
        assert_eq!(SolverStatus::from_code(status.code()), Some(status));
    }
    assert_eq!(SolverStatus::from_code(SETUP_ERROR_CODE), None);
    assert_eq!(SolverStatus::from_code(0), None);

    assert!(SolverStatus::MaxIterations.has_solution());
    assert!(!SolverStatus::PrimalInfeasible.has_solution());
    assert_eq!(SolverStatus::Solved.to_string(), "Solved");
}

#[test]
fn test_managed_constants() {
    let constants: Vec<(&str, i32)> = SolverStatus::managed_constants().collect();

    assert_eq!(constants.len(), 12);
    assert!(constants.contains(&("SETUP_ERROR", -1)));
    assert!(constants.contains(&("NON_CVX", -7)));
    assert!(constants.contains(&("SIGINT", -5)));
    assert!(constants.contains(&("UNSOLVED", -10)));
    assert!(!constants.iter().any(|(name, _)| *name == "NON_CONVEX"));

    // names and codes are both unique
    for (i, (name, code)) in constants.iter().enumerate() {
        for (other_name, other_code) in &constants[i + 1..] {
            assert_ne!(name, other_name);
            assert_ne!(code, other_code);
        }
    }
}
