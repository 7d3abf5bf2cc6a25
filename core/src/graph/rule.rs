//! Derivation rules and the graph that holds them
//!
//! A rule is a flat record "knowing all sources lets you derive the target
//! in `cost` reasoning steps". Rules never point at shapes or edges
//! directly; everything goes through id-keyed lookups, so the graph has no
//! reference cycles and serializes cleanly.

use super::quantity::{Quantity, QuantityId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One directed derivation rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivationRule {
    /// All sources must be known before the rule fires
    pub sources: Vec<QuantityId>,
    pub target: QuantityId,

    /// Reasoning steps this derivation costs the student; 0 for identities
    /// that require no work (opposite rectangle sides, seam aliases)
    pub cost: u32,

    /// Explainability tag, never used for computation
    pub rationale: String,
}

impl DerivationRule {
    pub fn new(sources: Vec<QuantityId>, target: QuantityId, cost: u32, rationale: &str) -> Self {
        Self {
            sources,
            target,
            cost,
            rationale: rationale.to_string(),
        }
    }
}

/// The full derivation graph of one figure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DerivationGraph {
    pub quantities: FxHashMap<QuantityId, Quantity>,
    pub rules: Vec<DerivationRule>,

    /// Quantities the student must be able to reach; by default just the
    /// total-area quantity
    pub targets: Vec<QuantityId>,
}

impl DerivationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_quantity(&mut self, quantity: Quantity) {
        self.quantities.insert(quantity.id, quantity);
    }

    pub fn add_rule(&mut self, rule: DerivationRule) {
        self.rules.push(rule);
    }

    pub fn add_target(&mut self, id: QuantityId) {
        if !self.targets.contains(&id) {
            self.targets.push(id);
        }
    }

    pub fn quantity(&self, id: QuantityId) -> Option<&Quantity> {
        self.quantities.get(&id)
    }

    /// All quantity ids sorted, for deterministic scans
    pub fn quantity_ids(&self) -> Vec<QuantityId> {
        let mut ids: Vec<QuantityId> = self.quantities.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Ids of all measurable quantities, sorted
    pub fn measurable_ids(&self) -> Vec<QuantityId> {
        let mut ids: Vec<QuantityId> = self
            .quantities
            .values()
            .filter(|q| q.measurable)
            .map(|q| q.id)
            .collect();
        ids.sort();
        ids
    }

    pub fn num_quantities(&self) -> usize {
        self.quantities.len()
    }

    pub fn num_rules(&self) -> usize {
        self.rules.len()
    }
}

#[cfg(test)]
mod tests {
    use super::super::quantity::{Quantity, QuantityKind, QuantityRef};
    use super::*;
    use crate::figure::EdgeId;

    fn length_quantity(id: u32, value: f64, measurable: bool) -> Quantity {
        Quantity::new(
            QuantityId(id),
            QuantityKind::Length,
            value,
            QuantityRef::Edge(EdgeId(id)),
            measurable,
        )
    }

    #[test]
    fn test_graph_accumulates() {
        let mut graph = DerivationGraph::new();
        graph.add_quantity(length_quantity(0, 3.0, true));
        graph.add_quantity(length_quantity(1, 3.0, false));
        graph.add_rule(DerivationRule::new(
            vec![QuantityId(0)],
            QuantityId(1),
            0,
            "opposite sides of a rectangle are equal",
        ));
        graph.add_target(QuantityId(1));

        assert_eq!(graph.num_quantities(), 2);
        assert_eq!(graph.num_rules(), 1);
        assert_eq!(graph.targets, vec![QuantityId(1)]);
    }

    #[test]
    fn test_target_deduplicated() {
        let mut graph = DerivationGraph::new();
        graph.add_target(QuantityId(5));
        graph.add_target(QuantityId(5));

        assert_eq!(graph.targets.len(), 1);
    }

    #[test]
    fn test_measurable_ids_sorted() {
        let mut graph = DerivationGraph::new();
        graph.add_quantity(length_quantity(2, 1.0, true));
        graph.add_quantity(length_quantity(0, 1.0, true));
        graph.add_quantity(length_quantity(1, 1.0, false));

        assert_eq!(graph.measurable_ids(), vec![QuantityId(0), QuantityId(2)]);
    }
}
