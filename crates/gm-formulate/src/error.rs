//! Formulation engine errors (C4).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormulationError {
    /// Invalid configuration: an out-of-range knob, or a formulation/
    /// tolerance combination requested for the wrong problem kind.
    #[error("formulation configuration error: {0}")]
    Configuration(String),

    /// The instance could not be formulated at all (e.g. a query graph
    /// with a vertex that has no admissible substitution after cost
    /// filtering and no creation fallback).
    #[error("formulation error: {0}")]
    Infeasible(String),
}

pub type FormulationResult<T> = Result<T, FormulationError>;

impl FormulationError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        FormulationError::Configuration(msg.into())
    }

    pub fn infeasible(msg: impl Into<String>) -> Self {
        FormulationError::Infeasible(msg.into())
    }
}
