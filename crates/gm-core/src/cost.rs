//! Cost model (C3): applies a [`WeightsConfig`] to query/target graphs to
//! produce substitution and creation cost tables for vertices and edges.
//!
//! All costs are rounded to `PRECISION` digits (ε = 10⁻⁶) to avoid solver
//! tie-breaking artifacts, matching the reference implementation's
//! `roundAtPrecision` (see `DESIGN.md`).

use crate::graph::{AttributeValue, Graph, VertexIndex};
use crate::weights::{WeightKind, WeightTable, WeightsConfig};
use std::collections::HashMap;

/// Number of significant decimal digits costs are rounded to.
pub const PRECISION_DIGITS: i32 = 6;

/// Rounds `value` to [`PRECISION_DIGITS`] decimal digits.
pub fn round_at_precision(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(PRECISION_DIGITS);
    (value * scale).round() / scale
}

/// An unordered pair of edge endpoints, used as a lookup key in the
/// candidate edge-substitution table.
pub type EdgeKey = (usize, usize);

/// Cost tables for one matching instance, built by [`build_cost_tables`].
#[derive(Debug, Clone, Default)]
pub struct CostTables {
    /// `Cv[i][k]`: cost of substituting query vertex `i` by target vertex `k`.
    pub vertex_sub: HashMap<(VertexIndex, VertexIndex), f64>,
    /// `Cv+[i]`: deletion cost for an unmatched query vertex.
    pub vertex_delete: HashMap<VertexIndex, f64>,
    /// `Cv-[k]`: creation cost for an unmatched target vertex.
    pub vertex_create: HashMap<VertexIndex, f64>,
    /// `Ce[(i,j)][(k,l)]`: cost of substituting query edge (i,j) by target edge (k,l).
    pub edge_sub: HashMap<(EdgeKey, EdgeKey), f64>,
    /// `Ce+[(i,j)]`: deletion cost for an unmatched query edge.
    pub edge_delete: HashMap<EdgeKey, f64>,
    /// `Ce-[(k,l)]`: creation cost for an unmatched target edge.
    pub edge_create: HashMap<EdgeKey, f64>,
}

fn attribute_term(
    table: &WeightTable,
    name: &str,
    a: Option<&AttributeValue>,
    b: Option<&AttributeValue>,
    missing_numeric_default: f64,
) -> f64 {
    let Some(weight) = table.get(name) else {
        return 0.0;
    };
    match (weight.kind, a, b) {
        (WeightKind::SymbolEquality, Some(x), Some(y)) => {
            let equal = x.as_symbol() == y.as_symbol();
            weight.weight * if equal { 0.0 } else { 1.0 }
        }
        (WeightKind::SymbolEquality, _, _) => weight.weight, // missing symbol counts as inequality
        (WeightKind::NumericDifference, Some(x), Some(y)) => {
            match (x.as_numeric(), y.as_numeric()) {
                (Some(xv), Some(yv)) => weight.weight * (xv - yv).abs(),
                _ => weight.weight * missing_numeric_default,
            }
        }
        (WeightKind::NumericDifference, _, _) => weight.weight * missing_numeric_default,
        (WeightKind::Constant, _, _) => 0.0, // constant handled separately via table.constant()
    }
}

/// Substitution cost between two attribute maps under `table`.
fn substitution_cost(
    table: &WeightTable,
    a: &HashMap<String, AttributeValue>,
    b: &HashMap<String, AttributeValue>,
    missing_numeric_default: f64,
) -> f64 {
    let mut total = table.constant();
    for (name, _) in table.attributes() {
        total += attribute_term(table, name, a.get(name), b.get(name), missing_numeric_default);
    }
    round_at_precision(total)
}

/// Creation/deletion cost for a single element (vertex or edge) under `table`,
/// applied symmetrically (spec.md §4.3: "Creation/deletion costs use the
/// creation table symmetrically").
fn creation_cost(table: &WeightTable, attrs: &HashMap<String, AttributeValue>) -> f64 {
    let mut total = table.constant();
    for (name, weight) in table.attributes() {
        total += match (weight.kind, attrs.get(name)) {
            (WeightKind::SymbolEquality, _) => weight.weight,
            (WeightKind::NumericDifference, Some(v)) => {
                weight.weight * v.as_numeric().unwrap_or(0.0).abs()
            }
            (WeightKind::NumericDifference, None) => 0.0,
            (WeightKind::Constant, _) => 0.0,
        };
    }
    round_at_precision(total)
}

/// Builds [`CostTables`] for matching `query` against `target` under `weights`.
///
/// Edge substitution costs are only computed for edge pairs whose direction
/// matches (directed graphs); for undirected graphs both orientations are
/// considered equivalent since [`Graph::find_edge`](crate::graph::Graph::find_edge)
/// already treats them symmetrically.
pub fn build_cost_tables(query: &Graph, target: &Graph, weights: &WeightsConfig) -> CostTables {
    let mut tables = CostTables::default();

    for qv in query.vertices() {
        for tv in target.vertices() {
            let cost = substitution_cost(
                &weights.vertex_substitution,
                &qv.attributes,
                &tv.attributes,
                weights.missing_numeric_default,
            );
            tables.vertex_sub.insert((qv.index, tv.index), cost);
        }
        tables
            .vertex_delete
            .insert(qv.index, creation_cost(&weights.vertex_creation, &qv.attributes));
    }
    for tv in target.vertices() {
        tables
            .vertex_create
            .insert(tv.index, creation_cost(&weights.vertex_creation, &tv.attributes));
    }

    for qe in query.edges() {
        let qkey = (qe.origin, qe.target);
        for te in target.edges() {
            let tkey = (te.origin, te.target);
            let cost = substitution_cost(
                &weights.edge_substitution,
                &qe.attributes,
                &te.attributes,
                weights.missing_numeric_default,
            );
            tables.edge_sub.insert((qkey, tkey), cost);
        }
        tables
            .edge_delete
            .insert(qkey, creation_cost(&weights.edge_creation, &qe.attributes));
    }
    for te in target.edges() {
        let tkey = (te.origin, te.target);
        tables
            .edge_create
            .insert(tkey, creation_cost(&weights.edge_creation, &te.attributes));
    }

    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AttributeValue;

    fn labeled_vertex(g: &mut Graph, label: &str) -> VertexIndex {
        let v = g.add_vertex();
        g.set_vertex_attr(v, "label", AttributeValue::Symbol(label.into()));
        v
    }

    fn weights_with_label(sub_const: f64, create_const: f64) -> WeightsConfig {
        let mut w = WeightsConfig::new();
        w.vertex_substitution = WeightTable::new(sub_const);
        w.vertex_substitution
            .set("label", WeightKind::SymbolEquality, 1.0);
        w.vertex_creation = WeightTable::new(create_const);
        w
    }

    #[test]
    fn identical_labels_have_zero_substitution_cost() {
        let mut g1 = Graph::new(false);
        let a = labeled_vertex(&mut g1, "a");
        let mut g2 = Graph::new(false);
        let b = labeled_vertex(&mut g2, "a");
        let weights = weights_with_label(0.0, 1.0);
        let tables = build_cost_tables(&g1, &g2, &weights);
        assert_eq!(*tables.vertex_sub.get(&(a, b)).unwrap(), 0.0);
    }

    #[test]
    fn mismatched_labels_cost_the_attribute_weight() {
        let mut g1 = Graph::new(false);
        let a = labeled_vertex(&mut g1, "a");
        let mut g2 = Graph::new(false);
        let b = labeled_vertex(&mut g2, "b");
        let weights = weights_with_label(0.0, 1.0);
        let tables = build_cost_tables(&g1, &g2, &weights);
        assert_eq!(*tables.vertex_sub.get(&(a, b)).unwrap(), 1.0);
    }

    #[test]
    fn rounding_clamps_tiny_numerical_noise() {
        assert_eq!(round_at_precision(0.100000049), 0.1);
        assert_eq!(round_at_precision(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn missing_numeric_attribute_uses_configured_default() {
        let mut g1 = Graph::new(false);
        let a = g1.add_vertex();
        g1.set_vertex_attr(a, "weight", AttributeValue::Numeric(3.0));
        let mut g2 = Graph::new(false);
        let b = g2.add_vertex(); // no "weight" attribute

        let mut weights = WeightsConfig::new();
        weights.vertex_substitution = WeightTable::new(0.0);
        weights
            .vertex_substitution
            .set("weight", WeightKind::NumericDifference, 2.0);
        weights.missing_numeric_default = 5.0;

        let tables = build_cost_tables(&g1, &g2, &weights);
        assert_eq!(*tables.vertex_sub.get(&(a, b)).unwrap(), 10.0);
    }
}
