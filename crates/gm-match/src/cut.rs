//! Cut strategies for the multi-solution loop (C5), per spec.md §4.5.

use gm_formulate::Formulation;
use gm_program::{LinearExpr, Relation, VariableId};
use gm_solver::backend::round_binary;
use std::collections::{HashMap, HashSet};

/// Which cut strategy to apply after recording an incumbent solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutStrategy {
    /// Forbid the exact incumbent solution only.
    Solution,
    /// Forbid any future solution containing one of the incumbent's matched
    /// pairs.
    Matching,
    /// Forbid any future solution that matches a query or target vertex
    /// that was matched to anything in the incumbent.
    Elements,
}

/// One linear constraint to be registered on the program: `(expr, relation, rhs)`.
pub type Cut = (LinearExpr, Relation, f64);

fn matched_vertex_vars(formulation: &Formulation, assignment: &HashMap<VariableId, f64>) -> Vec<(usize, usize, VariableId)> {
    formulation
        .vertex_vars
        .iter()
        .filter(|&(_, &var)| round_binary(assignment.get(&var).copied().unwrap_or(0.0)))
        .map(|(&(qi, tk), &var)| (qi, tk, var))
        .collect()
}

/// Builds the cuts to append after an incumbent solution, per `strategy`.
pub fn compute_cut(formulation: &Formulation, assignment: &HashMap<VariableId, f64>, strategy: CutStrategy) -> Vec<Cut> {
    let matched = matched_vertex_vars(formulation, assignment);
    if matched.is_empty() {
        return Vec::new();
    }

    match strategy {
        CutStrategy::Solution => {
            let expr = LinearExpr::sum(matched.iter().map(|&(_, _, v)| v));
            vec![(expr, Relation::Le, (matched.len() - 1) as f64)]
        }
        CutStrategy::Matching => matched
            .iter()
            .map(|&(_, _, v)| (LinearExpr::term(v, 1.0), Relation::Eq, 0.0))
            .collect(),
        CutStrategy::Elements => {
            let mut query_vertices = HashSet::new();
            let mut target_vertices = HashSet::new();
            for &(qi, tk, _) in &matched {
                query_vertices.insert(qi);
                target_vertices.insert(tk);
            }
            let mut cuts = Vec::new();
            for qi in query_vertices {
                let vars = formulation
                    .vertex_vars
                    .iter()
                    .filter(|&(&(i, _), _)| i == qi)
                    .map(|(_, &v)| v);
                cuts.push((LinearExpr::sum(vars), Relation::Eq, 0.0));
            }
            for tk in target_vertices {
                let vars = formulation
                    .vertex_vars
                    .iter()
                    .filter(|&(&(_, k), _)| k == tk)
                    .map(|(_, &v)| v);
                cuts.push((LinearExpr::sum(vars), Relation::Eq, 0.0));
            }
            cuts
        }
    }
}
