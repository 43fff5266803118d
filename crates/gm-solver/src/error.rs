//! Solver error taxonomy (C2).

use thiserror::Error;

/// Errors raised by the solver abstraction.
#[derive(Error, Debug)]
pub enum SolverError {
    /// Back-end initialization failed: missing license, missing native
    /// library, or an unreachable solver executable. Reported as a hard
    /// error before any job runs.
    #[error("solver '{backend}' failed to initialize: {reason}")]
    Initialization { backend: &'static str, reason: String },

    /// The program could not be translated into the back-end's native
    /// model (unsupported construct, e.g. a quadratic term sent to a
    /// linear-only back-end).
    #[error("solver '{backend}' could not load the program: {reason}")]
    Load { backend: &'static str, reason: String },

    /// A per-solve failure other than infeasibility or time-out. Fatal to
    /// the matching job that raised it, but not to the batch.
    #[error("solver '{backend}' failed to solve: {reason}")]
    Solve { backend: &'static str, reason: String },

    /// Reading back the assignment after a solve failed (unexpected
    /// missing variable, malformed solver output).
    #[error("solver '{backend}' failed to read the assignment: {reason}")]
    ReadAssignment { backend: &'static str, reason: String },
}

pub type SolverResult<T> = Result<T, SolverError>;
