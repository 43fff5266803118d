//! Matcher orchestrator (C6): glues the cost model (C3), formulation engine
//! (C4), solver abstraction (C2), and multi-solution loop (C5) together for
//! one (query, target) pair, per spec.md §4.6.

use crate::cut::CutStrategy;
use crate::solutions::{MultiSolutionLoop, Solution};
use gm_core::cost::build_cost_tables;
use gm_core::graph::Graph;
use gm_core::problem::{Problem, ProblemKind};
use gm_core::weights::WeightsConfig;
use gm_formulate::{formulate, FormulationConfig, FormulationRequest};
use gm_program::VariableId;
use gm_solver::{SolveConfig, SolverBackend, SolverError};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Everything the orchestrator needs to run one pair to completion.
pub struct MatchRequest<'a> {
    pub kind: ProblemKind,
    pub query: Arc<Graph>,
    pub target: Arc<Graph>,
    pub weights: &'a WeightsConfig,
    pub formulation_request: FormulationRequest,
    pub formulation_config: FormulationConfig,
    pub solve_config: SolveConfig,
    pub cut_strategy: CutStrategy,
    pub solution_count: usize,
    pub solver: &'a dyn SolverBackend,
}

/// The best objective and assignment found for a pair, plus every
/// incumbent the multi-solution loop recorded along the way.
#[derive(Debug, Clone)]
pub struct MatchReport {
    pub objective: f64,
    pub assignment: HashMap<VariableId, f64>,
    pub solutions: Vec<Solution>,
}

/// Failure at any C6 step. Per spec.md §4.6, a matching job that fails is
/// surfaced to the job pool as a not-a-number objective with this error
/// attached, and is not retried.
#[derive(Error, Debug)]
pub enum MatchError {
    #[error(transparent)]
    Formulation(#[from] gm_formulate::FormulationError),
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error("multi-solution loop produced no incumbent (infeasible on first solve)")]
    Infeasible,
}

/// Runs C3 -> C4 -> C2 -> C5 for one pair and reports the best objective
/// and matching found.
pub fn run_match(request: MatchRequest<'_>) -> Result<MatchReport, MatchError> {
    let _span = tracing::info_span!("matcher.pair", kind = ?request.kind).entered();
    let costs = build_cost_tables(&request.query, &request.target, request.weights);
    let problem = Problem::new(request.kind, request.query, request.target, costs);

    let formulation = formulate(&problem, &request.formulation_config, request.formulation_request)?;

    let loop_ = MultiSolutionLoop::new(
        request.solver,
        &formulation,
        request.cut_strategy,
        request.solution_count,
    );
    let solutions = loop_.run(request.solve_config)?;

    let best = solutions
        .iter()
        .min_by(|a, b| a.objective.partial_cmp(&b.objective).unwrap())
        .ok_or(MatchError::Infeasible)?;

    Ok(MatchReport {
        objective: best.objective,
        assignment: best.assignment.clone(),
        solutions,
    })
}
