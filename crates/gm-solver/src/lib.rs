//! Solver abstraction (C2): a uniform `load/configure/solve/read_assignment`
//! contract onto CPLEX, Gurobi, and GLPK, with static (not dynamic) back-end
//! registration.
//!
//! Each back-end lives behind its own Cargo feature (`gurobi`, `glpk`,
//! `cplex`), keeping native-library-dependent code opt-in.

pub mod backend;
pub mod error;
pub mod registry;

#[cfg(feature = "cplex")]
pub mod cplex;
#[cfg(feature = "glpk")]
pub mod glpk;
#[cfg(feature = "gurobi")]
pub mod gurobi;

pub use backend::{SolveConfig, SolverBackend, SolverStatus};
pub use error::{SolverError, SolverResult};
pub use registry::SolverKind;
