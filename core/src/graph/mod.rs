//! Derivation-graph IR: quantities, rules, and the figure-to-graph builder

pub mod builder;
pub mod quantity;
pub mod rule;

pub use builder::DerivationGraphBuilder;
pub use quantity::{Quantity, QuantityId, QuantityKind, QuantityRef};
pub use rule::{DerivationGraph, DerivationRule};
