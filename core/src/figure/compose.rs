//! Figure composition
//!
//! A `CompositeFigure` starts from one base shape and grows by attaching
//! further shapes along matching-length straight edges. A successful
//! attachment turns the matched edge pair into an invisible seam owned by
//! both shapes.

use super::edge::{Edge, EdgeId, ShapeId};
use super::point::{ops, Point2D};
use super::shape::Shape;
use super::{AREA_TOLERANCE, EPSILON};
use crate::measure::Measurement;
use crate::rng::RandomSource;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A figure assembled from primitive shapes glued edge-to-edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeFigure {
    pub shapes: Vec<Shape>,
    pub edges: FxHashMap<EdgeId, Edge>,

    /// Measurements assigned by the selector; empty until then
    pub measurements: Vec<Measurement>,

    /// Sum of constituent shape areas, maintained on attach
    pub total_area: f64,
}

impl CompositeFigure {
    /// Create a figure from its base shape
    pub fn new(base: Shape, edges: Vec<Edge>) -> Self {
        let total_area = base.area;
        let mut edge_map = FxHashMap::default();
        for edge in edges {
            edge_map.insert(edge.id, edge);
        }

        Self {
            shapes: vec![base],
            edges: edge_map,
            measurements: Vec::new(),
            total_area,
        }
    }

    /// All edges sorted by id
    ///
    /// Iteration over the id-keyed map is not ordered; every scan that
    /// affects output goes through this to keep generation deterministic.
    pub fn edges_in_order(&self) -> Vec<&Edge> {
        let mut edges: Vec<&Edge> = self.edges.values().collect();
        edges.sort_by_key(|e| e.id);
        edges
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Straight seam edges (invisible, two owners)
    pub fn seam_edges(&self) -> Vec<&Edge> {
        self.edges_in_order()
            .into_iter()
            .filter(|e| !e.visible && e.is_segment())
            .collect()
    }

    /// Attach `new_shape` to the figure along some matching-length visible
    /// straight edge
    ///
    /// Candidate edges of the new shape are tried in shuffled order; figure
    /// edges in id order. Circular shapes never seam against other circular
    /// shapes. Returns false when no compatible edge exists — the figure is
    /// left untouched and the caller proceeds with fewer shapes.
    pub fn attach<R: RandomSource>(
        &mut self,
        new_shape: Shape,
        mut new_edges: Vec<Edge>,
        rng: &mut R,
    ) -> bool {
        let mut candidates: Vec<usize> = new_edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_segment())
            .map(|(i, _)| i)
            .collect();
        rng.shuffle(&mut candidates);

        for idx in candidates {
            let Some((new_start, new_end)) = new_edges[idx].endpoints() else {
                continue;
            };
            let new_len = new_start.distance(&new_end);

            let target = self.edges_in_order().into_iter().find_map(|fig_edge| {
                if !fig_edge.visible || !fig_edge.is_segment() {
                    return None;
                }
                // No circular-to-circular seams
                if new_shape.kind.is_circular() {
                    let owner_kind = self.shape(fig_edge.owners[0]).map(|s| s.kind);
                    if owner_kind.is_some_and(|k| k.is_circular()) {
                        return None;
                    }
                }
                if (fig_edge.length() - new_len).abs() > EPSILON {
                    return None;
                }
                let (fs, fe) = fig_edge.endpoints()?;
                Some((fig_edge.id, fig_edge.owners[0], fs, fe))
            });

            let Some((fig_edge_id, fig_owner, fig_start, fig_end)) = target else {
                continue;
            };

            // Rotate the new shape so its candidate edge runs anti-parallel
            // to the target edge, then translate so the endpoints coincide
            // (new start on figure end, new end on figure start).
            let dir_new = new_start.to(&new_end);
            let dir_fig = fig_start.to(&fig_end);
            let angle = dir_fig.scale(-1.0).angle() - dir_new.angle();
            let offset = fig_end.add(&new_start.rotate(angle).scale(-1.0));

            for edge in new_edges.iter_mut() {
                edge.transform(angle, offset);
            }

            debug_assert!(match new_edges[idx].endpoints() {
                Some((ns, ne)) =>
                    ns.approx_eq(&fig_end, EPSILON)
                        && ne.approx_eq(&fig_start, EPSILON)
                        && ops::are_anti_parallel(ns.to(&ne), fig_start.to(&fig_end), EPSILON),
                None => false,
            });

            // Matched pair becomes a seam with merged owner sets
            new_edges[idx].into_seam(fig_owner);
            if let Some(fig_edge) = self.edges.get_mut(&fig_edge_id) {
                fig_edge.into_seam(new_shape.id);
            }

            self.total_area += new_shape.area;
            for edge in new_edges {
                self.edges.insert(edge.id, edge);
            }
            self.shapes.push(new_shape);
            return true;
        }

        debug!(shape = %new_shape.id, kind = ?new_shape.kind, "no compatible edge, attachment skipped");
        false
    }

    /// Check that the running total matches the sum of shape areas
    pub fn area_consistent(&self) -> bool {
        let sum: f64 = self.shapes.iter().map(|s| s.area).sum();
        (sum - self.total_area).abs() <= AREA_TOLERANCE
    }

    /// Center of the figure's bounding box, for label placement
    pub fn centroid(&self) -> Point2D {
        let mut min = Point2D::new(f64::MAX, f64::MAX);
        let mut max = Point2D::new(f64::MIN, f64::MIN);
        for edge in self.edges.values() {
            if let Some((a, b)) = edge.endpoints() {
                for p in [a, b] {
                    min.x = min.x.min(p.x);
                    min.y = min.y.min(p.y);
                    max.x = max.x.max(p.x);
                    max.y = max.y.max(p.y);
                }
            }
        }
        Point2D::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::shape::{rectangle, right_triangle, semicircle};
    use crate::figure::FigureIds;
    use crate::rng::SeededRng;

    fn two_rect_l_shape() -> CompositeFigure {
        let mut ids = FigureIds::new();
        let mut rng = SeededRng::new(7);

        let (base, base_edges) = rectangle(&mut ids, 6.0, 4.0);
        let mut figure = CompositeFigure::new(base, base_edges);

        // Second rectangle shares the 4-long side
        let (shape, edges) = rectangle(&mut ids, 4.0, 3.0);
        assert!(figure.attach(shape, edges, &mut rng));
        figure
    }

    #[test]
    fn test_attach_marks_seam_invisible() {
        let figure = two_rect_l_shape();

        let seams = figure.seam_edges();
        assert_eq!(seams.len(), 2, "both halves of the matched pair are seams");
        for seam in &seams {
            assert!(!seam.visible);
            assert_eq!(seam.owners.len(), 2);
        }
    }

    #[test]
    fn test_attach_seam_endpoints_coincide() {
        let figure = two_rect_l_shape();
        let seams = figure.seam_edges();

        assert!(seams[0].same_span(seams[1], EPSILON));
    }

    #[test]
    fn test_attach_accumulates_area() {
        let figure = two_rect_l_shape();

        assert!((figure.total_area - 36.0).abs() < 1e-10);
        assert!(figure.area_consistent());
    }

    #[test]
    fn test_attach_miss_is_nonfatal() {
        let mut ids = FigureIds::new();
        let mut rng = SeededRng::new(7);

        let (base, base_edges) = rectangle(&mut ids, 6.0, 4.0);
        let mut figure = CompositeFigure::new(base, base_edges);

        // No edge of length 99 exists
        let (shape, edges) = right_triangle(&mut ids, 99.0, 99.0);
        assert!(!figure.attach(shape, edges, &mut rng));

        assert_eq!(figure.shapes.len(), 1);
        assert!((figure.total_area - 24.0).abs() < 1e-10);
    }

    #[test]
    fn test_no_circular_to_circular_attachment() {
        let mut ids = FigureIds::new();
        let mut rng = SeededRng::new(7);

        let (base, base_edges) = semicircle(&mut ids, 3.0);
        let mut figure = CompositeFigure::new(base, base_edges);

        // Flat edges match in length (both 6), but semicircle-on-semicircle
        // is disallowed
        let (shape, edges) = semicircle(&mut ids, 3.0);
        assert!(!figure.attach(shape, edges, &mut rng));
    }

    #[test]
    fn test_attach_triangle_to_rectangle() {
        let mut ids = FigureIds::new();
        let mut rng = SeededRng::new(11);

        let (base, base_edges) = rectangle(&mut ids, 5.0, 4.0);
        let mut figure = CompositeFigure::new(base, base_edges);

        let (shape, edges) = right_triangle(&mut ids, 4.0, 3.0);
        assert!(figure.attach(shape, edges, &mut rng));

        assert_eq!(figure.shapes.len(), 2);
        assert!((figure.total_area - 26.0).abs() < 1e-10);
        assert!(figure.area_consistent());
    }
}
