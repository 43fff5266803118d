//! F1: linear graph edit distance. The reference formulation — explicit
//! edge-mapping variables, linear objective.

use crate::candidates::{trivial_upper_bound, vertex_pair_admissible};
use crate::config::FormulationConfig;
use crate::model::Formulation;
use gm_core::problem::Problem;
use gm_program::{LinearExpr, Program, Relation, Sense};
use std::collections::HashMap;

/// Builds the F1 linear GED program for `problem` under `config`.
pub fn build(problem: &Problem, config: &FormulationConfig) -> Formulation {
    let costs = &problem.costs;
    let trivial = trivial_upper_bound(costs);

    let mut program = Program::new_linear(Sense::Min);
    let mut vertex_vars = HashMap::new();

    for qv in problem.query.vertices() {
        for tv in problem.target.vertices() {
            let cost = *costs.vertex_sub.get(&(qv.index, tv.index)).unwrap_or(&0.0);
            if !vertex_pair_admissible(cost, config.upperbound, trivial) {
                continue;
            }
            let id = program.add_binary(format!("x_{}_{}", qv.index, tv.index));
            vertex_vars.insert((qv.index, tv.index), id);
        }
    }

    let mut edge_vars = HashMap::new();
    for qe in problem.query.edges() {
        let qkey = (qe.origin, qe.target);
        for te in problem.target.edges() {
            let tkey = (te.origin, te.target);
            let has_endpoints = vertex_vars.contains_key(&(qe.origin, te.origin))
                && vertex_vars.contains_key(&(qe.target, te.target));
            if !has_endpoints {
                continue;
            }
            if !costs.edge_sub.contains_key(&(qkey, tkey)) {
                continue;
            }
            let id = program.add_binary(format!(
                "y_{}_{}_{}_{}",
                qkey.0, qkey.1, tkey.0, tkey.1
            ));
            edge_vars.insert((qkey, tkey), id);
        }
    }

    let mut objective = LinearExpr::new();
    let mut constant = 0.0;

    for (&(qi, tk), &var) in vertex_vars.iter() {
        let sub = *costs.vertex_sub.get(&(qi, tk)).unwrap_or(&0.0);
        let del = *costs.vertex_delete.get(&qi).unwrap_or(&0.0);
        let create = *costs.vertex_create.get(&tk).unwrap_or(&0.0);
        objective.add_term(var, sub - del - create);
    }
    for &del in costs.vertex_delete.values() {
        constant += del;
    }
    for &create in costs.vertex_create.values() {
        constant += create;
    }

    for (&(qkey, tkey), &var) in edge_vars.iter() {
        let sub = *costs.edge_sub.get(&(qkey, tkey)).unwrap_or(&0.0);
        let del = *costs.edge_delete.get(&qkey).unwrap_or(&0.0);
        let create = *costs.edge_create.get(&tkey).unwrap_or(&0.0);
        objective.add_term(var, sub - del - create);
    }
    for &del in costs.edge_delete.values() {
        constant += del;
    }
    for &create in costs.edge_create.values() {
        constant += create;
    }
    objective.add_constant(constant);
    program.set_objective(objective);

    for qv in problem.query.vertices() {
        let vars = problem
            .target
            .vertices()
            .filter_map(|tv| vertex_vars.get(&(qv.index, tv.index)).copied());
        let expr = LinearExpr::sum(vars);
        if !expr.is_empty() {
            program.add_linear_constraint(expr, Relation::Le, 1.0);
        }
    }
    for tv in problem.target.vertices() {
        let vars = problem
            .query
            .vertices()
            .filter_map(|qv| vertex_vars.get(&(qv.index, tv.index)).copied());
        let expr = LinearExpr::sum(vars);
        if !expr.is_empty() {
            program.add_linear_constraint(expr, Relation::Le, 1.0);
        }
    }

    for (&(qkey, tkey), &y) in edge_vars.iter() {
        if let Some(&x_origin) = vertex_vars.get(&(qkey.0, tkey.0)) {
            let mut expr = LinearExpr::term(y, 1.0);
            expr.add_term(x_origin, -1.0);
            program.add_linear_constraint(expr, Relation::Le, 0.0);
        }
        if let Some(&x_target) = vertex_vars.get(&(qkey.1, tkey.1)) {
            let mut expr = LinearExpr::term(y, 1.0);
            expr.add_term(x_target, -1.0);
            program.add_linear_constraint(expr, Relation::Le, 0.0);
        }
    }

    for qe in problem.query.edges() {
        let qkey = (qe.origin, qe.target);
        let vars = problem.target.edges().filter_map(|te| {
            let tkey = (te.origin, te.target);
            edge_vars.get(&(qkey, tkey)).copied()
        });
        let expr = LinearExpr::sum(vars);
        if !expr.is_empty() {
            program.add_linear_constraint(expr, Relation::Le, 1.0);
        }
    }
    for te in problem.target.edges() {
        let tkey = (te.origin, te.target);
        let vars = problem.query.edges().filter_map(|qe| {
            let qkey = (qe.origin, qe.target);
            edge_vars.get(&(qkey, tkey)).copied()
        });
        let expr = LinearExpr::sum(vars);
        if !expr.is_empty() {
            program.add_linear_constraint(expr, Relation::Le, 1.0);
        }
    }

    Formulation {
        program,
        vertex_vars,
        edge_vars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gm_core::cost::build_cost_tables;
    use gm_core::graph::{AttributeValue, Graph};
    use gm_core::problem::ProblemKind;
    use gm_core::weights::{WeightKind, WeightTable, WeightsConfig};
    use std::sync::Arc;

    fn single_edge_graph(label_a: &str, label_b: &str) -> Graph {
        let mut g = Graph::new(false);
        let a = g.add_vertex();
        let b = g.add_vertex();
        g.set_vertex_attr(a, "label", AttributeValue::Symbol(label_a.into()));
        g.set_vertex_attr(b, "label", AttributeValue::Symbol(label_b.into()));
        g.add_edge(a, b);
        g
    }

    fn weights() -> WeightsConfig {
        let mut w = WeightsConfig::new();
        w.vertex_substitution = WeightTable::new(0.0);
        w.vertex_substitution.set("label", WeightKind::SymbolEquality, 1.0);
        w.vertex_creation = WeightTable::new(1.0);
        w.edge_creation = WeightTable::new(1.0);
        w
    }

    #[test]
    fn identical_graphs_admit_zero_cost_matching() {
        let query = single_edge_graph("a", "b");
        let target = single_edge_graph("a", "b");
        let weights = weights();
        let costs = build_cost_tables(&query, &target, &weights);
        let problem = Problem::new(ProblemKind::Ged, Arc::new(query), Arc::new(target), costs);
        let formulation = build(&problem, &FormulationConfig::default());
        assert_eq!(formulation.vertex_vars.len(), 4);
        assert_eq!(formulation.edge_vars.len(), 1);
        assert!(!formulation.program.linear_constraints().is_empty());
    }

    #[test]
    fn upperbound_filtering_drops_expensive_pairs() {
        let query = single_edge_graph("a", "b");
        let target = single_edge_graph("x", "y");
        let weights = weights();
        let costs = build_cost_tables(&query, &target, &weights);
        let problem = Problem::new(ProblemKind::Ged, Arc::new(query), Arc::new(target), costs);
        let config = FormulationConfig::new(0.0, false).unwrap();
        let formulation = build(&problem, &config);
        assert!(formulation.vertex_vars.is_empty());
    }
}
