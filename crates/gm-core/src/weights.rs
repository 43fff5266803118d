//! Weights configuration: attribute-weight tables consumed by the cost
//! model (`gm_core::cost`) to build substitution and creation costs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The kind of contribution an attribute makes to a substitution cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeightKind {
    /// `weight * |x - y|` for numeric attributes.
    NumericDifference,
    /// `weight * (0 if equal else 1)` for symbolic attributes.
    SymbolEquality,
    /// A base cost contributed unconditionally (the distinguished constant entry).
    Constant,
}

/// `(kind, weight)` for one attribute entry in a weight table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributeWeight {
    pub kind: WeightKind,
    pub weight: f64,
}

/// One table mapping attribute name -> weight. Always contains the
/// distinguished `"_const_"` entry contributing a base cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightTable {
    entries: HashMap<String, AttributeWeight>,
}

/// Name of the distinguished constant entry, per spec.md §3.
pub const CONSTANT_KEY: &str = "_const_";

impl WeightTable {
    pub fn new(constant: f64) -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            CONSTANT_KEY.to_string(),
            AttributeWeight {
                kind: WeightKind::Constant,
                weight: constant,
            },
        );
        WeightTable { entries }
    }

    pub fn set(&mut self, attribute: impl Into<String>, kind: WeightKind, weight: f64) {
        self.entries.insert(attribute.into(), AttributeWeight { kind, weight });
    }

    pub fn get(&self, attribute: &str) -> Option<&AttributeWeight> {
        self.entries.get(attribute)
    }

    pub fn constant(&self) -> f64 {
        self.entries
            .get(CONSTANT_KEY)
            .map(|w| w.weight)
            .unwrap_or(0.0)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeWeight)> {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != CONSTANT_KEY)
            .map(|(k, v)| (k.as_str(), v))
    }
}

/// A pair of attribute-weight tables (substitution, creation), for vertices
/// and edges, per spec.md §3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightsConfig {
    pub vertex_substitution: WeightTable,
    pub vertex_creation: WeightTable,
    pub edge_substitution: WeightTable,
    pub edge_creation: WeightTable,
    /// Default contribution for a numeric attribute present on one side of
    /// a substitution pair but absent on the other (edge case in spec.md §4.3).
    pub missing_numeric_default: f64,
}

impl WeightsConfig {
    pub fn new() -> Self {
        WeightsConfig {
            vertex_substitution: WeightTable::new(0.0),
            vertex_creation: WeightTable::new(1.0),
            edge_substitution: WeightTable::new(0.0),
            edge_creation: WeightTable::new(1.0),
            missing_numeric_default: 1.0,
        }
    }
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_entry_always_present() {
        let table = WeightTable::new(0.5);
        assert_eq!(table.constant(), 0.5);
        assert!(table.attributes().next().is_none());
    }

    #[test]
    fn set_attribute_excludes_it_from_constant() {
        let mut table = WeightTable::new(1.0);
        table.set("label", WeightKind::SymbolEquality, 2.0);
        let attrs: Vec<_> = table.attributes().collect();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].0, "label");
        assert_eq!(attrs[0].1.weight, 2.0);
    }

    proptest::proptest! {
        /// A table's constant entry survives a JSON round trip for any
        /// constant value, the way a `WeightsConfig` loaded from a config
        /// file must.
        #[test]
        fn constant_survives_json_round_trip(constant in -1000.0f64..1000.0) {
            let table = WeightTable::new(constant);
            let json = serde_json::to_string(&table).unwrap();
            let restored: WeightTable = serde_json::from_str(&json).unwrap();
            proptest::prop_assert!((restored.constant() - constant).abs() < 1e-9);
        }
    }
}
