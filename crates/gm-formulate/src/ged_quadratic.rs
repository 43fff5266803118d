//! F2: quadratic graph edit distance. Same vertex-mapping variables as F1,
//! but edge cost is carried by the quadratic term `x[i,k] * x[j,l]` instead
//! of an explicit edge-mapping variable; edge consistency becomes implicit
//! in the quadratic product.

use crate::candidates::{trivial_upper_bound, vertex_pair_admissible};
use crate::config::FormulationConfig;
use crate::model::Formulation;
use gm_core::problem::Problem;
use gm_program::{LinearExpr, Program, QuadExpr, Relation, Sense};
use std::collections::HashMap;

/// Builds the F2 quadratic GED program for `problem` under `config`.
pub fn build(problem: &Problem, config: &FormulationConfig) -> Formulation {
    let costs = &problem.costs;
    let trivial = trivial_upper_bound(costs);

    let mut program = Program::new_quadratic(Sense::Min);
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

    let mut objective = QuadExpr::new();
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

    for qe in problem.query.edges() {
        let qkey = (qe.origin, qe.target);
        for te in problem.target.edges() {
            let tkey = (te.origin, te.target);
            let Some(&x_origin) = vertex_vars.get(&(qe.origin, te.origin)) else {
                continue;
            };
            let Some(&x_target) = vertex_vars.get(&(qe.target, te.target)) else {
                continue;
            };
            let Some(&sub) = costs.edge_sub.get(&(qkey, tkey)) else {
                continue;
            };
            let del = *costs.edge_delete.get(&qkey).unwrap_or(&0.0);
            let create = *costs.edge_create.get(&tkey).unwrap_or(&0.0);
            objective.add_quad_term(x_origin, x_target, sub - del - create);
        }
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

    Formulation {
        program,
        vertex_vars,
        edge_vars: HashMap::new(),
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

    #[test]
    fn quadratic_formulation_has_no_edge_variables() {
        let mut query = Graph::new(false);
        let a = query.add_vertex();
        let b = query.add_vertex();
        query.set_vertex_attr(a, "label", AttributeValue::Symbol("a".into()));
        query.set_vertex_attr(b, "label", AttributeValue::Symbol("b".into()));
        query.add_edge(a, b);

        let mut target = Graph::new(false);
        let x = target.add_vertex();
        let y = target.add_vertex();
        target.set_vertex_attr(x, "label", AttributeValue::Symbol("a".into()));
        target.set_vertex_attr(y, "label", AttributeValue::Symbol("b".into()));
        target.add_edge(x, y);

        let mut weights = WeightsConfig::new();
        weights.vertex_substitution = WeightTable::new(0.0);
        weights.vertex_substitution.set("label", WeightKind::SymbolEquality, 1.0);
        let costs = build_cost_tables(&query, &target, &weights);
        let problem = Problem::new(ProblemKind::Ged, Arc::new(query), Arc::new(target), costs);

        let formulation = build(&problem, &FormulationConfig::default());
        assert!(formulation.edge_vars.is_empty());
        assert!(!formulation.program.is_linear());
    }
}
