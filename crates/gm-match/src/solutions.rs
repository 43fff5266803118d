//! Multi-solution loop (C5): repeatedly solve, record, cut, re-solve, per
//! spec.md §4.5. State machine: `Empty -> Solving -> Solved -> CutApplied
//! -> Solving -> ...` terminating in `Exhausted` or `LimitReached`.

use crate::cut::{compute_cut, CutStrategy};
use gm_formulate::Formulation;
use gm_program::{Program, VariableId};
use gm_solver::{SolveConfig, SolverBackend, SolverError, SolverStatus};
use std::collections::HashMap;

/// State of the multi-solution loop. Exposed mainly for logging and tests;
/// callers consume [`MultiSolutionLoop::run`]'s returned solutions instead
/// of polling state directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Empty,
    Solving,
    Solved,
    CutApplied,
    Exhausted,
    LimitReached,
}

/// One recorded incumbent: its objective value, full variable assignment,
/// and the solver status it was found under.
#[derive(Debug, Clone)]
pub struct Solution {
    pub objective: f64,
    pub assignment: HashMap<VariableId, f64>,
    pub status: SolverStatus,
}

/// Evaluates `program`'s objective at `assignment`.
pub fn evaluate_objective(program: &Program, assignment: &HashMap<VariableId, f64>) -> f64 {
    let objective = program.objective();
    let mut total = objective.linear.constant;
    for (var, coeff) in objective.linear.terms() {
        total += coeff * assignment.get(&var).copied().unwrap_or(0.0);
    }
    for ((u, v), coeff) in objective.quad_terms() {
        let u_val = assignment.get(&u).copied().unwrap_or(0.0);
        let v_val = assignment.get(&v).copied().unwrap_or(0.0);
        total += coeff * u_val * v_val;
    }
    total
}

/// Drives the solve/record/cut loop for one formulation against one solver
/// instance, up to a requested number of distinct solutions.
pub struct MultiSolutionLoop<'a> {
    solver: &'a dyn SolverBackend,
    program: Program,
    formulation: &'a Formulation,
    strategy: CutStrategy,
    limit: usize,
}

impl<'a> MultiSolutionLoop<'a> {
    pub fn new(
        solver: &'a dyn SolverBackend,
        formulation: &'a Formulation,
        strategy: CutStrategy,
        limit: usize,
    ) -> Self {
        MultiSolutionLoop {
            solver,
            program: formulation.program.clone(),
            formulation,
            strategy,
            limit: limit.max(1),
        }
    }

    /// Runs the loop under `config`, returning every recorded incumbent in
    /// the order found. An empty result means the very first solve was
    /// infeasible.
    pub fn run(mut self, config: SolveConfig) -> Result<Vec<Solution>, SolverError> {
        let mut state = LoopState::Empty;
        let mut solutions = Vec::new();

        loop {
            state = LoopState::Solving;
            tracing::debug!(state = ?state, "multi-solution loop solving");
            self.solver.load(&self.program)?;
            self.solver.configure(config)?;
            let status = self.solver.solve()?;

            if !status.has_assignment() {
                state = LoopState::Exhausted;
                tracing::debug!(state = ?state, solutions = solutions.len(), "no further assignment");
                break;
            }

            let assignment = self.solver.read_assignment()?;
            let objective = evaluate_objective(&self.program, &assignment);
            solutions.push(Solution {
                objective,
                assignment: assignment.clone(),
                status,
            });
            state = LoopState::Solved;
            tracing::debug!(state = ?state, objective, "incumbent recorded");

            if solutions.len() >= self.limit {
                state = LoopState::LimitReached;
                tracing::debug!(state = ?state, count = solutions.len(), "solution limit reached");
                break;
            }

            let cuts = compute_cut(self.formulation, &assignment, self.strategy);
            if cuts.is_empty() {
                state = LoopState::Exhausted;
                tracing::debug!(state = ?state, "no matched pair to cut, stopping");
                break;
            }
            for (expr, relation, rhs) in cuts {
                self.program.add_linear_constraint(expr, relation, rhs);
            }
            state = LoopState::CutApplied;
            tracing::debug!(state = ?state, "cut applied, re-solving");
        }

        Ok(solutions)
    }
}
