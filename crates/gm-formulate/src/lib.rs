//! Formulation engine (C4): turns a [`Problem`](gm_core::problem::Problem)
//! into a solver-neutral [`Program`](gm_program::Program) under one of four
//! formulations — F1 linear GED, F2 quadratic GED, F3 bipartite GED, F4
//! subgraph matching — selected by [`FormulationRequest`].
//!
//! ## Quick start
//!
//! ```ignore
//! use gm_formulate::{formulate, FormulationConfig, FormulationRequest};
//! use gm_formulate::GedFormulation;
//!
//! let formulation = formulate(
//!     &problem,
//!     &FormulationConfig::default(),
//!     FormulationRequest::Ged(GedFormulation::Linear),
//! )?;
//! ```

pub mod candidates;
pub mod config;
pub mod error;
pub mod ged_bipartite;
pub mod ged_linear;
pub mod ged_quadratic;
pub mod model;
pub mod subgraph;

pub use config::{FormulationConfig, GedFormulation, Tolerance};
pub use error::{FormulationError, FormulationResult};
pub use model::Formulation;

use gm_core::problem::{Problem, ProblemKind};

/// Which formulation to build. GED formulations only apply to
/// [`ProblemKind::Ged`] problems, and subgraph tolerance only to
/// [`ProblemKind::Sub`] problems; `formulate` rejects a mismatch.
#[derive(Debug, Clone, Copy)]
pub enum FormulationRequest {
    Ged(GedFormulation),
    Sub(Tolerance),
}

impl std::fmt::Display for FormulationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Builds the requested formulation for `problem`.
pub fn formulate(
    problem: &Problem,
    config: &FormulationConfig,
    request: FormulationRequest,
) -> FormulationResult<Formulation> {
    match (problem.kind, request) {
        (ProblemKind::Ged, FormulationRequest::Ged(GedFormulation::Linear)) => {
            Ok(ged_linear::build(problem, config))
        }
        (ProblemKind::Ged, FormulationRequest::Ged(GedFormulation::Quadratic)) => {
            Ok(ged_quadratic::build(problem, config))
        }
        (ProblemKind::Ged, FormulationRequest::Ged(GedFormulation::Bipartite)) => {
            Ok(ged_bipartite::build(problem))
        }
        (ProblemKind::Sub, FormulationRequest::Sub(tolerance)) => {
            Ok(subgraph::build(problem, config, tolerance))
        }
        (kind, request) => Err(FormulationError::configuration(format!(
            "{request:?} formulation does not apply to a {kind:?} problem"
        ))),
    }
}
