//! Edges of a composite figure
//!
//! An edge is either a straight segment or a circular arc. Every edge
//! carries a visibility flag (invisible edges are seams between attached
//! shapes) and the set of shapes that own it. The owner set always has
//! exactly one element for a boundary edge and exactly two for a seam.

use super::point::Point2D;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Newtype wrapper for edge identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Newtype wrapper for shape identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub u32);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Geometric payload of an edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EdgeGeometry {
    /// Straight segment between two endpoints
    Segment { start: Point2D, end: Point2D },

    /// Circular arc; angles in radians, swept counter-clockwise from
    /// `start_angle` to `end_angle` when `ccw` is true
    Arc {
        center: Point2D,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        ccw: bool,
    },
}

/// A single edge of the figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub geometry: EdgeGeometry,

    /// False means this edge is a seam between two attached shapes and is
    /// never drawn or measured directly
    pub visible: bool,

    /// Shapes that own this edge; len is 1 (boundary) or 2 (seam)
    pub owners: Vec<ShapeId>,
}

impl Edge {
    /// Create a visible straight edge owned by one shape
    pub fn segment(id: EdgeId, owner: ShapeId, start: Point2D, end: Point2D) -> Self {
        Self {
            id,
            geometry: EdgeGeometry::Segment { start, end },
            visible: true,
            owners: vec![owner],
        }
    }

    /// Create a visible arc edge owned by one shape
    pub fn arc(
        id: EdgeId,
        owner: ShapeId,
        center: Point2D,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Self {
        Self {
            id,
            geometry: EdgeGeometry::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                ccw: true,
            },
            visible: true,
            owners: vec![owner],
        }
    }

    pub fn is_segment(&self) -> bool {
        matches!(self.geometry, EdgeGeometry::Segment { .. })
    }

    pub fn is_arc(&self) -> bool {
        matches!(self.geometry, EdgeGeometry::Arc { .. })
    }

    /// Segment endpoints, if this is a segment
    pub fn endpoints(&self) -> Option<(Point2D, Point2D)> {
        match self.geometry {
            EdgeGeometry::Segment { start, end } => Some((start, end)),
            EdgeGeometry::Arc { .. } => None,
        }
    }

    /// Length of a segment, or arc radius for an arc (the measurable scalar
    /// either way)
    pub fn scalar(&self) -> f64 {
        match self.geometry {
            EdgeGeometry::Segment { start, end } => start.distance(&end),
            EdgeGeometry::Arc { radius, .. } => radius,
        }
    }

    /// Length of the segment; 0 for arcs
    pub fn length(&self) -> f64 {
        match self.geometry {
            EdgeGeometry::Segment { start, end } => start.distance(&end),
            EdgeGeometry::Arc { .. } => 0.0,
        }
    }

    /// Midpoint of a segment, or the point on the arc at its angular middle
    pub fn midpoint(&self) -> Point2D {
        match self.geometry {
            EdgeGeometry::Segment { start, end } => {
                Point2D::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0)
            }
            EdgeGeometry::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                ..
            } => {
                let mid = (start_angle + end_angle) / 2.0;
                center.add(&Point2D::new(mid.cos(), mid.sin()).scale(radius))
            }
        }
    }

    /// Apply a rigid transform: rotate by `angle` about the origin, then
    /// translate by `offset`
    pub fn transform(&mut self, angle: f64, offset: Point2D) {
        match &mut self.geometry {
            EdgeGeometry::Segment { start, end } => {
                *start = start.rotate(angle).add(&offset);
                *end = end.rotate(angle).add(&offset);
            }
            EdgeGeometry::Arc {
                center,
                start_angle,
                end_angle,
                ..
            } => {
                *center = center.rotate(angle).add(&offset);
                *start_angle += angle;
                *end_angle += angle;
            }
        }
    }

    /// Mark this edge as a seam shared with `other_owner`
    ///
    /// The owner set grows to exactly two shapes and the edge becomes
    /// invisible.
    pub fn into_seam(&mut self, other_owner: ShapeId) {
        self.visible = false;
        if !self.owners.contains(&other_owner) {
            self.owners.push(other_owner);
        }
        debug_assert!(self.owners.len() == 2, "seam must have exactly two owners");
    }

    /// True if this edge spans the same physical segment as `other`, in
    /// either orientation, within `epsilon`
    pub fn same_span(&self, other: &Edge, epsilon: f64) -> bool {
        match (self.endpoints(), other.endpoints()) {
            (Some((a1, a2)), Some((b1, b2))) => {
                (a1.approx_eq(&b1, epsilon) && a2.approx_eq(&b2, epsilon))
                    || (a1.approx_eq(&b2, epsilon) && a2.approx_eq(&b1, epsilon))
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(id: u32, x0: f64, y0: f64, x1: f64, y1: f64) -> Edge {
        Edge::segment(
            EdgeId(id),
            ShapeId(0),
            Point2D::new(x0, y0),
            Point2D::new(x1, y1),
        )
    }

    #[test]
    fn test_segment_length() {
        let e = seg(0, 0.0, 0.0, 3.0, 4.0);
        assert!((e.length() - 5.0).abs() < 1e-10);
        assert!((e.scalar() - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_arc_scalar_is_radius() {
        let e = Edge::arc(
            EdgeId(0),
            ShapeId(0),
            Point2D::new(1.0, 0.0),
            2.5,
            0.0,
            std::f64::consts::PI,
        );
        assert_eq!(e.scalar(), 2.5);
        assert!(e.is_arc());
    }

    #[test]
    fn test_transform_segment() {
        let mut e = seg(0, 0.0, 0.0, 2.0, 0.0);
        e.transform(std::f64::consts::FRAC_PI_2, Point2D::new(1.0, 1.0));

        let (start, end) = e.endpoints().unwrap();
        assert!(start.approx_eq(&Point2D::new(1.0, 1.0), 1e-10));
        assert!(end.approx_eq(&Point2D::new(1.0, 3.0), 1e-10));
    }

    #[test]
    fn test_transform_arc_shifts_angles() {
        let mut e = Edge::arc(
            EdgeId(0),
            ShapeId(0),
            Point2D::new(1.0, 0.0),
            1.0,
            0.0,
            std::f64::consts::PI,
        );
        e.transform(std::f64::consts::FRAC_PI_2, Point2D::new(0.0, 0.0));

        if let EdgeGeometry::Arc {
            center,
            start_angle,
            ..
        } = e.geometry
        {
            assert!(center.approx_eq(&Point2D::new(0.0, 1.0), 1e-10));
            assert!((start_angle - std::f64::consts::FRAC_PI_2).abs() < 1e-10);
        } else {
            panic!("expected arc");
        }
    }

    #[test]
    fn test_into_seam() {
        let mut e = seg(0, 0.0, 0.0, 1.0, 0.0);
        e.into_seam(ShapeId(1));

        assert!(!e.visible);
        assert_eq!(e.owners, vec![ShapeId(0), ShapeId(1)]);
    }

    #[test]
    fn test_same_span_either_orientation() {
        let a = seg(0, 0.0, 0.0, 2.0, 0.0);
        let b = seg(1, 2.0, 0.0, 0.0, 0.0);
        let c = seg(2, 0.0, 0.0, 2.0, 1.0);

        assert!(a.same_span(&b, 0.01));
        assert!(!a.same_span(&c, 0.01));
    }
}
