//! The output every formulation builder produces: a [`Program`] plus the
//! variable maps needed to read a solution back into matched vertex/edge
//! pairs (C5/C6 need these to build cuts and report matchings).

use gm_core::cost::EdgeKey;
use gm_core::graph::VertexIndex;
use gm_program::{Program, VariableId};
use std::collections::HashMap;

/// A built program together with the variable maps that give it meaning.
pub struct Formulation {
    pub program: Program,
    /// `(query vertex, target vertex) -> x[i,k]` variable id.
    pub vertex_vars: HashMap<(VertexIndex, VertexIndex), VariableId>,
    /// `(query edge, target edge) -> y[ij,kl]` variable id. Empty for F2
    /// (quadratic), which has no explicit edge variable — edge substitution
    /// there is coupled into the vertex variables' quadratic terms instead.
    pub edge_vars: HashMap<(EdgeKey, EdgeKey), VariableId>,
}
