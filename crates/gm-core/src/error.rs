//! Error types for the graph and weights-configuration data model.
//!
//! [`GmError`] covers the two error kinds owned by this crate: input errors
//! (malformed graphs, attributes referenced by weights but absent from a
//! graph) and configuration errors (invalid option combinations). Both are
//! fatal before any pair is solved. `FormulationError` and `SolverError`
//! live closer to where they are raised, in `gm-formulate` and `gm-solver`.

use thiserror::Error;

/// Errors raised while building or validating the graph/weights data model.
#[derive(Error, Debug)]
pub enum GmError {
    /// Missing file, malformed graph, inconsistent directedness, or an
    /// attribute referenced by the weights configuration absent in a graph.
    #[error("input error: {0}")]
    Input(String),

    /// Invalid option combination (e.g. too few positional arguments, or a
    /// tolerance/formulation requested for the wrong problem kind).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// I/O failure while loading a graph or weights file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results in this crate.
pub type GmResult<T> = Result<T, GmError>;

impl GmError {
    pub fn input(msg: impl Into<String>) -> Self {
        GmError::Input(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        GmError::Configuration(msg.into())
    }
}
