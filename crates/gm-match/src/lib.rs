//! Matching layer: the multi-solution loop (C5) and matcher orchestrator
//! (C6) that sit on top of the formulation engine and solver abstraction to
//! solve one (query, target) pair end to end.

pub mod cut;
pub mod matcher;
pub mod solutions;

pub use cut::{compute_cut, Cut, CutStrategy};
pub use matcher::{run_match, MatchError, MatchReport, MatchRequest};
pub use solutions::{evaluate_objective, LoopState, MultiSolutionLoop, Solution};
