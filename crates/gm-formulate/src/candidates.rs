//! Cost filtering: which substitution pairs are admissible, and the trivial
//! upper-bound estimate the `upperbound` configuration knob is a fraction
//! of.
//!
//! The trivial estimate is the cost of the "delete everything from the
//! query, create everything in the target" transformation — a valid upper
//! bound on any optimal GED or subgraph-matching cost, cheap to compute
//! up front, and independent of which formulation ultimately runs.

use gm_core::cost::CostTables;

/// The trivial (substitution-free) upper bound on the matching cost.
pub fn trivial_upper_bound(costs: &CostTables) -> f64 {
    let vertex: f64 = costs.vertex_delete.values().sum::<f64>() + costs.vertex_create.values().sum::<f64>();
    let edge: f64 = costs.edge_delete.values().sum::<f64>() + costs.edge_create.values().sum::<f64>();
    vertex + edge
}

/// Whether a vertex substitution pair survives cost filtering at `upperbound`
/// (a fraction of [`trivial_upper_bound`]). `upperbound == 1.0` always
/// admits every pair.
pub fn vertex_pair_admissible(cost: f64, upperbound: f64, trivial: f64) -> bool {
    upperbound >= 1.0 || cost <= upperbound * trivial
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn costs_with(vertex_delete: f64, vertex_create: f64) -> CostTables {
        let mut tables = CostTables::default();
        tables.vertex_delete = HashMap::from([(0, vertex_delete)]);
        tables.vertex_create = HashMap::from([(0, vertex_create)]);
        tables
    }

    #[test]
    fn trivial_bound_sums_creation_and_deletion() {
        let tables = costs_with(2.0, 3.0);
        assert_eq!(trivial_upper_bound(&tables), 5.0);
    }

    #[test]
    fn upperbound_one_admits_everything() {
        assert!(vertex_pair_admissible(1_000_000.0, 1.0, 1.0));
    }

    #[test]
    fn cost_above_fraction_is_excluded() {
        assert!(!vertex_pair_admissible(6.0, 0.5, 10.0));
        assert!(vertex_pair_admissible(4.0, 0.5, 10.0));
    }

    proptest::proptest! {
        /// Raising `upperbound` can only admit more pairs, never fewer:
        /// the fraction of the trivial bound it carves out only grows.
        #[test]
        fn admissibility_is_monotonic_in_upperbound(
            cost in 0.0f64..100.0,
            trivial in 0.01f64..100.0,
            lo in 0.0f64..0.9,
            delta in 0.0f64..0.5,
        ) {
            let hi = lo + delta;
            if vertex_pair_admissible(cost, lo, trivial) {
                proptest::prop_assert!(vertex_pair_admissible(cost, hi, trivial));
            }
        }
    }
}
