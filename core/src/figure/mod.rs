//! Geometric IR: points, edges, primitive shapes, and figure composition

pub mod compose;
pub mod edge;
pub mod point;
pub mod shape;

pub use compose::CompositeFigure;
pub use edge::{Edge, EdgeGeometry, EdgeId, ShapeId};
pub use point::Point2D;
pub use shape::{Shape, ShapeKind, PI_APPROX};

/// Length tolerance for edge matching and seam checks
pub const EPSILON: f64 = 0.01;

/// Tolerance for the total-area consistency check
pub const AREA_TOLERANCE: f64 = 0.1;

/// Per-generation id counters for shapes and edges
///
/// Scoped to a single generation call; a fresh `FigureIds` starts every
/// request so ids are reproducible and no state crosses requests.
#[derive(Debug, Clone, Default)]
pub struct FigureIds {
    next_shape: u32,
    next_edge: u32,
}

impl FigureIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_shape(&mut self) -> ShapeId {
        let id = ShapeId(self.next_shape);
        self.next_shape += 1;
        id
    }

    pub fn next_edge(&mut self) -> EdgeId {
        let id = EdgeId(self.next_edge);
        self.next_edge += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let mut ids = FigureIds::new();

        assert_eq!(ids.next_shape(), ShapeId(0));
        assert_eq!(ids.next_shape(), ShapeId(1));
        assert_eq!(ids.next_edge(), EdgeId(0));
        assert_eq!(ids.next_edge(), EdgeId(1));
    }
}
