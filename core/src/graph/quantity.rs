//! Numeric quantities of a figure
//!
//! A quantity is one measurable-or-derivable number: the length of a
//! straight edge, the radius or diameter of an arc, the area of a shape, or
//! the figure's total area. Quantities are graph nodes; derivation rules
//! connect them.

use crate::figure::{EdgeId, ShapeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Newtype wrapper for quantity identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuantityId(pub u32);

impl fmt::Display for QuantityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// What kind of number a quantity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityKind {
    Length,
    Radius,
    Diameter,
    Area,
}

/// What figure element a quantity describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityRef {
    Edge(EdgeId),
    Shape(ShapeId),
    /// The whole figure (total area)
    Figure,
}

/// A single graph node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub id: QuantityId,
    pub kind: QuantityKind,

    /// True value, known at build time from the geometry
    pub value: f64,

    /// Back-reference to the edge or shape this quantity describes
    pub subject: QuantityRef,

    /// Only quantities tied to a visible edge or arc may be handed to the
    /// student as a given measurement
    pub measurable: bool,
}

impl Quantity {
    pub fn new(
        id: QuantityId,
        kind: QuantityKind,
        value: f64,
        subject: QuantityRef,
        measurable: bool,
    ) -> Self {
        Self {
            id,
            kind,
            value,
            subject,
            measurable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_display() {
        assert_eq!(QuantityId(3).to_string(), "q3");
    }

    #[test]
    fn test_quantity_construction() {
        let q = Quantity::new(
            QuantityId(0),
            QuantityKind::Length,
            4.0,
            QuantityRef::Edge(EdgeId(2)),
            true,
        );

        assert_eq!(q.kind, QuantityKind::Length);
        assert!(q.measurable);
        assert_eq!(q.subject, QuantityRef::Edge(EdgeId(2)));
    }
}
