//! [`Problem`]: the value object carrying a matching instance's kind, graphs
//! and cost tables (spec.md §3).

use crate::cost::CostTables;
use crate::graph::Graph;
use std::sync::Arc;

/// Which family of matching problem is being solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemKind {
    Ged,
    Sub,
}

/// A matching instance: kind, query/target graph references, and the cost
/// tables built by the cost model (C3). Graphs are reference-counted since
/// the job pool (C7) fans the same graph out across many pairs.
#[derive(Debug, Clone)]
pub struct Problem {
    pub kind: ProblemKind,
    pub query: Arc<Graph>,
    pub target: Arc<Graph>,
    pub costs: CostTables,
}

impl Problem {
    pub fn new(kind: ProblemKind, query: Arc<Graph>, target: Arc<Graph>, costs: CostTables) -> Self {
        Problem {
            kind,
            query,
            target,
            costs,
        }
    }
}
