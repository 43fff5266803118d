//! Core data model shared across the matching toolkit: attributed graphs,
//! attribute-weight configuration, the cost model that turns weights into
//! per-pair cost tables, and the [`problem::Problem`] value object that
//! formulation and solver crates consume.
//!
//! ## Quick start
//!
//! ```
//! use gm_core::cost::build_cost_tables;
//! use gm_core::graph::{AttributeValue, Graph};
//! use gm_core::weights::{WeightKind, WeightTable, WeightsConfig};
//!
//! let mut query = Graph::new(false);
//! let a = query.add_vertex();
//! query.set_vertex_attr(a, "label", AttributeValue::Symbol("x".into()));
//!
//! let mut target = Graph::new(false);
//! let b = target.add_vertex();
//! target.set_vertex_attr(b, "label", AttributeValue::Symbol("x".into()));
//!
//! let mut weights = WeightsConfig::new();
//! weights.vertex_substitution = WeightTable::new(0.0);
//! weights.vertex_substitution.set("label", WeightKind::SymbolEquality, 1.0);
//!
//! let tables = build_cost_tables(&query, &target, &weights);
//! assert_eq!(*tables.vertex_sub.get(&(a, b)).unwrap(), 0.0);
//! ```

pub mod cost;
pub mod error;
pub mod graph;
pub mod problem;
pub mod weights;

pub use error::{GmError, GmResult};
pub use graph::Graph;
pub use problem::{Problem, ProblemKind};
pub use weights::WeightsConfig;
