//! [`SolverBackend`]: the four-operation contract (C2) each plugin
//! implements to lower a [`gm_program::Program`] onto a native MIP solver.

use crate::error::SolverResult;
use gm_program::{Program, VariableId};
use std::collections::HashMap;

/// Outcome of a solve call, per spec.md §4.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    /// Proven optimal.
    Optimal,
    /// Best incumbent found before the time limit; not proven optimal.
    Suboptimal,
    /// Proven infeasible.
    Infeasible,
    /// No incumbent found before the time limit.
    TimedOut,
}

impl SolverStatus {
    pub fn has_assignment(self) -> bool {
        matches!(self, SolverStatus::Optimal | SolverStatus::Suboptimal)
    }
}

/// Per-solve parameters (C2 `Configure`).
#[derive(Debug, Clone, Copy)]
pub struct SolveConfig {
    pub time_limit_seconds: f64,
    pub thread_count: usize,
    /// Upper-bound hint fed to the solver as a cutoff, if the back-end
    /// supports one; `None` disables it.
    pub upper_bound_hint: Option<f64>,
    pub verbose: bool,
}

impl Default for SolveConfig {
    fn default() -> Self {
        SolveConfig {
            time_limit_seconds: 60.0,
            thread_count: 1,
            upper_bound_hint: None,
            verbose: false,
        }
    }
}

/// A plugin lowering [`Program`] onto one native MIP solver.
///
/// Implementations are expected to be internally mutable (a loaded model
/// handle behind a lock or owned instance); [`load`](SolverBackend::load)
/// must translate variables with bounds and types first, then constraints,
/// then the objective, and must preserve variable identifiers so
/// [`read_assignment`](SolverBackend::read_assignment) can read them back.
pub trait SolverBackend: Send + Sync {
    /// Human-readable back-end name, used in error messages and logging.
    fn name(&self) -> &'static str;

    /// Translates `program` into the solver's native model.
    fn load(&self, program: &Program) -> SolverResult<()>;

    /// Sets per-solve parameters.
    fn configure(&self, config: SolveConfig) -> SolverResult<()>;

    /// Runs branch-and-cut to optimality or until the time limit.
    fn solve(&self) -> SolverResult<SolverStatus>;

    /// Reads variable values after a non-infeasible solve. Binary variables
    /// are rounded using a ½-threshold by the caller, not the back-end,
    /// since the raw relaxation value is useful for diagnostics.
    fn read_assignment(&self) -> SolverResult<HashMap<VariableId, f64>>;
}

/// Rounds a binary variable's raw solver value using a ½-threshold, per
/// spec.md §4.2.
pub fn round_binary(value: f64) -> bool {
    value >= 0.5
}
