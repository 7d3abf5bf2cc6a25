//! Derivation traces and solutions
//!
//! A trace records, in firing order, every rule application the fixpoint
//! propagation performed. Hosts render it as a worked solution; it is also
//! JSON-exportable for grading pipelines.

use crate::graph::QuantityId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur exporting a trace or figure description
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// A single rule application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivationStep {
    /// Quantities the rule consumed
    pub sources: Vec<QuantityId>,

    /// Quantity the rule produced
    pub target: QuantityId,

    /// Reasoning steps charged for this application
    pub cost: u32,

    /// Human-readable justification
    pub rationale: String,
}

/// Ordered record of one propagation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivationTrace {
    pub steps: Vec<DerivationStep>,
}

impl DerivationTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: DerivationStep) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps that produced a given quantity
    pub fn steps_producing(&self, target: QuantityId) -> Vec<&DerivationStep> {
        self.steps.iter().filter(|s| s.target == target).collect()
    }

    /// Total reasoning-step cost over the whole trace
    pub fn total_cost(&self) -> u32 {
        self.steps.iter().map(|s| s.cost).sum()
    }

    pub fn to_json(&self) -> ExportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> ExportResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Depth assigned to one target quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDepth {
    pub target: QuantityId,
    pub depth: u32,
}

/// Outcome of solving a derivation graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// Whether every target is reachable from the chosen sources
    pub solved: bool,

    /// Locally irreducible set of measurable source quantities
    pub sources: Vec<QuantityId>,

    /// Maximum derivation depth over all targets
    pub max_depth: u32,

    /// Depth per target
    pub target_depths: Vec<TargetDepth>,

    /// Full propagation trace from the sources
    pub trace: DerivationTrace,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(src: u32, tgt: u32, cost: u32) -> DerivationStep {
        DerivationStep {
            sources: vec![QuantityId(src)],
            target: QuantityId(tgt),
            cost,
            rationale: "test".to_string(),
        }
    }

    #[test]
    fn test_trace_accumulates() {
        let mut trace = DerivationTrace::new();
        assert!(trace.is_empty());

        trace.push(step(0, 1, 1));
        trace.push(step(1, 2, 0));

        assert_eq!(trace.len(), 2);
        assert_eq!(trace.total_cost(), 1);
    }

    #[test]
    fn test_steps_producing() {
        let mut trace = DerivationTrace::new();
        trace.push(step(0, 2, 1));
        trace.push(step(1, 2, 1));
        trace.push(step(2, 3, 1));

        assert_eq!(trace.steps_producing(QuantityId(2)).len(), 2);
        assert_eq!(trace.steps_producing(QuantityId(9)).len(), 0);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut trace = DerivationTrace::new();
        trace.push(step(0, 1, 1));

        let json = trace.to_json().unwrap();
        let restored = DerivationTrace::from_json(&json).unwrap();

        assert_eq!(trace, restored);
    }
}
