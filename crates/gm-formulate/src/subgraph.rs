//! F4: subgraph matching. Every query vertex must be injectively mapped
//! into a target vertex (no deletion term: the query is never shrunk),
//! with query edges preserved under one of three [`Tolerance`] levels and,
//! optionally, an induced-subgraph constraint forbidding extra target edges.

use crate::candidates::{trivial_upper_bound, vertex_pair_admissible};
use crate::config::{FormulationConfig, Tolerance};
use crate::model::Formulation;
use gm_core::graph::Graph;
use gm_core::problem::Problem;
use gm_program::{LinearExpr, Program, Relation, Sense};
use std::collections::HashMap;

const EPSILON: f64 = 1e-6;

fn edge_matches(query: &Graph, target: &Graph, i: usize, j: usize, k: usize, l: usize, tolerance: Tolerance) -> bool {
    let Some(qedge) = query.find_edge(i, j) else {
        return true; // no query edge here: nothing to preserve
    };
    let _ = qedge;
    match tolerance {
        Tolerance::Topology => true, // absence is penalized, not forbidden
        Tolerance::Exact | Tolerance::Label => target.find_edge(k, l).is_some(),
    }
}

/// Builds the F4 subgraph matching program for `problem` under `config` and
/// `tolerance`.
pub fn build(problem: &Problem, config: &FormulationConfig, tolerance: Tolerance) -> Formulation {
    let costs = &problem.costs;
    let trivial = trivial_upper_bound(costs);
    let query = &problem.query;
    let target = &problem.target;

    let mut program = Program::new_linear(Sense::Min);
    let mut vertex_vars = HashMap::new();

    for qv in query.vertices() {
        for tv in target.vertices() {
            let cost = *costs.vertex_sub.get(&(qv.index, tv.index)).unwrap_or(&0.0);
            if tolerance == Tolerance::Exact && cost > EPSILON {
                continue;
            }
            if !vertex_pair_admissible(cost, config.upperbound, trivial) {
                continue;
            }
            let id = program.add_binary(format!("x_{}_{}", qv.index, tv.index));
            vertex_vars.insert((qv.index, tv.index), id);
        }
    }

    let mut objective = LinearExpr::new();
    for (&(qi, tk), &var) in vertex_vars.iter() {
        let cost = *costs.vertex_sub.get(&(qi, tk)).unwrap_or(&0.0);
        objective.add_term(var, cost);
    }

    // injective embedding: every query vertex matched exactly once, every
    // target vertex used at most once.
    for qv in query.vertices() {
        let vars = target
            .vertices()
            .filter_map(|tv| vertex_vars.get(&(qv.index, tv.index)).copied());
        program.add_linear_constraint(LinearExpr::sum(vars), Relation::Eq, 1.0);
    }
    for tv in target.vertices() {
        let vars = query
            .vertices()
            .filter_map(|qv| vertex_vars.get(&(qv.index, tv.index)).copied());
        let expr = LinearExpr::sum(vars);
        if !expr.is_empty() {
            program.add_linear_constraint(expr, Relation::Le, 1.0);
        }
    }

    // edge preservation: for every query edge (i,j) and candidate target
    // pair (k,l), either the edge structure is compatible under `tolerance`
    // or the two vertex assignments cannot both hold.
    for qe in query.edges() {
        let (i, j) = (qe.origin, qe.target);
        for tk in target.vertices() {
            for tl in target.vertices() {
                if tk.index == tl.index {
                    continue;
                }
                let (Some(&x_ik), Some(&x_jl)) =
                    (vertex_vars.get(&(i, tk.index)), vertex_vars.get(&(j, tl.index)))
                else {
                    continue;
                };
                if edge_matches(query, target, i, j, tk.index, tl.index, tolerance) {
                    if tolerance == Tolerance::Label {
                        let sub = *costs.edge_sub.get(&((i, j), (tk.index, tl.index))).unwrap_or(&0.0);
                        if sub > EPSILON {
                            // Conjunction-linearize "both endpoints matched": a
                            // continuous charge forced to sub whenever x_ik and
                            // x_jl are both 1, and free to sit at 0 otherwise,
                            // the same trick the topology penalty below uses.
                            let charge = program.add_continuous(
                                format!("e_{}_{}_{}_{}", i, j, tk.index, tl.index),
                                0.0,
                                sub,
                            );
                            let mut expr = LinearExpr::term(charge, 1.0);
                            expr.add_term(x_ik, -sub);
                            expr.add_term(x_jl, -sub);
                            program.add_linear_constraint(expr, Relation::Ge, -sub);
                            objective.add_term(charge, 1.0);
                        }
                    }
                    continue;
                }
                if tolerance == Tolerance::Topology {
                    let cap = *costs.edge_delete.get(&(i, j)).unwrap_or(&0.0);
                    if cap <= EPSILON {
                        continue;
                    }
                    let penalty = program.add_continuous(
                        format!("p_{}_{}_{}_{}", i, j, tk.index, tl.index),
                        0.0,
                        cap,
                    );
                    let mut expr = LinearExpr::term(penalty, 1.0);
                    expr.add_term(x_ik, -cap);
                    expr.add_term(x_jl, -cap);
                    program.add_linear_constraint(expr, Relation::Ge, -cap);
                    objective.add_term(penalty, 1.0);
                } else {
                    let mut expr = LinearExpr::term(x_ik, 1.0);
                    expr.add_term(x_jl, 1.0);
                    program.add_linear_constraint(expr, Relation::Le, 1.0);
                }
            }
        }
    }

    // induced mode: extra target edges between matched vertices with no
    // corresponding query edge are forbidden rather than merely unscored.
    if config.induced {
        for te in target.edges() {
            let (k, l) = (te.origin, te.target);
            for qv_i in query.vertices() {
                for qv_j in query.vertices() {
                    if qv_i.index == qv_j.index || query.find_edge(qv_i.index, qv_j.index).is_some() {
                        continue;
                    }
                    let (Some(&x_ik), Some(&x_jl)) = (
                        vertex_vars.get(&(qv_i.index, k)),
                        vertex_vars.get(&(qv_j.index, l)),
                    ) else {
                        continue;
                    };
                    let mut expr = LinearExpr::term(x_ik, 1.0);
                    expr.add_term(x_jl, 1.0);
                    program.add_linear_constraint(expr, Relation::Le, 1.0);
                }
            }
        }
    }

    program.set_objective(objective);

    Formulation {
        program,
        vertex_vars,
        edge_vars: HashMap::new(),
    }
}
