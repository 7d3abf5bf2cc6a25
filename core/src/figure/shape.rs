//! Primitive shape library
//!
//! Four parametric shapes: rectangle, right triangle, semicircle, quarter
//! circle. Each factory builds the shape in a local frame with its anchor at
//! the origin and returns the shape record plus its edges. Area formulas use
//! π ≈ 3 so generated answers stay mental-arithmetic friendly.

use super::edge::{Edge, EdgeId, ShapeId};
use super::point::Point2D;
use super::FigureIds;
use serde::{Deserialize, Serialize};

/// π fixed to 3 for all circular areas
pub const PI_APPROX: f64 = 3.0;

/// Tagged shape variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Rectangle,
    RightTriangle,
    Semicircle,
    QuarterCircle,
}

impl ShapeKind {
    /// Circular shapes may not attach to each other (the seam would be
    /// visually ambiguous)
    pub fn is_circular(&self) -> bool {
        matches!(self, ShapeKind::Semicircle | ShapeKind::QuarterCircle)
    }
}

/// A primitive shape inside a composite figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub kind: ShapeKind,

    /// Edge ids in boundary order
    pub edge_ids: Vec<EdgeId>,

    /// Area computed at construction from the shape's own dimensions
    pub area: f64,
}

/// Build a rectangle of width `w` and height `h`
///
/// Edges in boundary order: bottom, right, top, left. Opposite pairs are
/// (0, 2) and (1, 3).
pub fn rectangle(ids: &mut FigureIds, w: f64, h: f64) -> (Shape, Vec<Edge>) {
    let shape_id = ids.next_shape();
    let corners = [
        Point2D::new(0.0, 0.0),
        Point2D::new(w, 0.0),
        Point2D::new(w, h),
        Point2D::new(0.0, h),
    ];

    let edges: Vec<Edge> = (0..4)
        .map(|i| {
            Edge::segment(
                ids.next_edge(),
                shape_id,
                corners[i],
                corners[(i + 1) % 4],
            )
        })
        .collect();

    let shape = Shape {
        id: shape_id,
        kind: ShapeKind::Rectangle,
        edge_ids: edges.iter().map(|e| e.id).collect(),
        area: w * h,
    };

    (shape, edges)
}

/// Build a right triangle with legs `base` (along x) and `height` (along y)
///
/// The right angle sits at the origin. Edges in boundary order: base leg,
/// hypotenuse, vertical leg.
pub fn right_triangle(ids: &mut FigureIds, base: f64, height: f64) -> (Shape, Vec<Edge>) {
    let shape_id = ids.next_shape();
    let corners = [
        Point2D::new(0.0, 0.0),
        Point2D::new(base, 0.0),
        Point2D::new(0.0, height),
    ];

    let edges: Vec<Edge> = (0..3)
        .map(|i| {
            Edge::segment(
                ids.next_edge(),
                shape_id,
                corners[i],
                corners[(i + 1) % 3],
            )
        })
        .collect();

    let shape = Shape {
        id: shape_id,
        kind: ShapeKind::RightTriangle,
        edge_ids: edges.iter().map(|e| e.id).collect(),
        area: base * height / 2.0,
    };

    (shape, edges)
}

/// Build a semicircle of radius `r`
///
/// The flat edge (the diameter) runs from the origin to (2r, 0); the arc
/// bulges upward.
pub fn semicircle(ids: &mut FigureIds, r: f64) -> (Shape, Vec<Edge>) {
    let shape_id = ids.next_shape();

    let flat = Edge::segment(
        ids.next_edge(),
        shape_id,
        Point2D::new(0.0, 0.0),
        Point2D::new(2.0 * r, 0.0),
    );
    let arc = Edge::arc(
        ids.next_edge(),
        shape_id,
        Point2D::new(r, 0.0),
        r,
        0.0,
        std::f64::consts::PI,
    );

    let shape = Shape {
        id: shape_id,
        kind: ShapeKind::Semicircle,
        edge_ids: vec![flat.id, arc.id],
        area: PI_APPROX * r * r / 2.0,
    };

    (shape, vec![flat, arc])
}

/// Build a quarter circle of radius `r`
///
/// Both straight edges have length `r` and meet at the origin; the arc
/// closes the boundary.
pub fn quarter_circle(ids: &mut FigureIds, r: f64) -> (Shape, Vec<Edge>) {
    let shape_id = ids.next_shape();

    let bottom = Edge::segment(
        ids.next_edge(),
        shape_id,
        Point2D::new(0.0, 0.0),
        Point2D::new(r, 0.0),
    );
    let arc = Edge::arc(
        ids.next_edge(),
        shape_id,
        Point2D::new(0.0, 0.0),
        r,
        0.0,
        std::f64::consts::FRAC_PI_2,
    );
    let side = Edge::segment(
        ids.next_edge(),
        shape_id,
        Point2D::new(0.0, r),
        Point2D::new(0.0, 0.0),
    );

    let shape = Shape {
        id: shape_id,
        kind: ShapeKind::QuarterCircle,
        edge_ids: vec![bottom.id, arc.id, side.id],
        area: PI_APPROX * r * r / 4.0,
    };

    (shape, vec![bottom, arc, side])
}
