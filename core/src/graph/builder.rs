//! Figure → derivation graph translation
//!
//! Walks a finished `CompositeFigure` and emits one quantity per measurable
//! edge/radius/area plus the derivation rules encoding the geometric
//! identities that relate them. Rule registration is grouped per identity
//! family, one block per shape kind and one per cross-shape identity.

use super::quantity::{Quantity, QuantityId, QuantityKind, QuantityRef};
use super::rule::{DerivationGraph, DerivationRule};
use crate::figure::point::ops;
use crate::figure::{CompositeFigure, Edge, EdgeId, ShapeId, ShapeKind, EPSILON};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Builds the derivation graph for one composite figure
pub struct DerivationGraphBuilder<'a> {
    figure: &'a CompositeFigure,
    shape_targets: bool,

    next_quantity: u32,
    graph: DerivationGraph,

    /// Straight edge id → its length quantity
    lengths: FxHashMap<EdgeId, QuantityId>,
    /// Arc edge id → its radius quantity
    radii: FxHashMap<EdgeId, QuantityId>,
}

impl<'a> DerivationGraphBuilder<'a> {
    pub fn new(figure: &'a CompositeFigure) -> Self {
        Self {
            figure,
            shape_targets: false,
            next_quantity: 0,
            graph: DerivationGraph::new(),
            lengths: FxHashMap::default(),
            radii: FxHashMap::default(),
        }
    }

    /// Also register each shape's area as a target, for step-by-step grading
    pub fn with_shape_targets(mut self) -> Self {
        self.shape_targets = true;
        self
    }

    /// Emit the complete graph
    pub fn build(mut self) -> DerivationGraph {
        self.emit_edge_quantities();

        let shapes: Vec<(ShapeId, ShapeKind)> =
            self.figure.shapes.iter().map(|s| (s.id, s.kind)).collect();
        let mut shape_areas = Vec::new();
        for (shape_id, kind) in shapes {
            let area_id = match kind {
                ShapeKind::Rectangle => self.emit_rectangle(shape_id),
                ShapeKind::RightTriangle => self.emit_right_triangle(shape_id),
                ShapeKind::Semicircle => self.emit_semicircle(shape_id),
                ShapeKind::QuarterCircle => self.emit_quarter_circle(shape_id),
            };
            shape_areas.push(area_id);
        }

        self.emit_seam_pairs();
        self.emit_collinear_sums();

        // Single multi-source rule: total area from all shape areas
        let total = self.new_quantity(
            QuantityKind::Area,
            self.figure.total_area,
            QuantityRef::Figure,
            false,
        );
        self.graph.add_rule(DerivationRule::new(
            shape_areas.clone(),
            total,
            1,
            "total area is the sum of the part areas",
        ));

        self.graph.add_target(total);
        if self.shape_targets {
            for id in shape_areas {
                self.graph.add_target(id);
            }
        }

        debug!(
            quantities = self.graph.num_quantities(),
            rules = self.graph.num_rules(),
            "derivation graph built"
        );
        self.graph
    }

    fn new_quantity(
        &mut self,
        kind: QuantityKind,
        value: f64,
        subject: QuantityRef,
        measurable: bool,
    ) -> QuantityId {
        let id = QuantityId(self.next_quantity);
        self.next_quantity += 1;
        self.graph
            .add_quantity(Quantity::new(id, kind, value, subject, measurable));
        id
    }

    /// One length quantity per straight edge; radius plus paired diameter
    /// per arc
    fn emit_edge_quantities(&mut self) {
        for edge in self.figure.edges_in_order() {
            if edge.is_segment() {
                let id = self.new_quantity(
                    QuantityKind::Length,
                    edge.length(),
                    QuantityRef::Edge(edge.id),
                    edge.visible,
                );
                self.lengths.insert(edge.id, id);
            } else {
                let r = edge.scalar();
                let radius = self.new_quantity(
                    QuantityKind::Radius,
                    r,
                    QuantityRef::Edge(edge.id),
                    edge.visible,
                );
                let diameter = self.new_quantity(
                    QuantityKind::Diameter,
                    2.0 * r,
                    QuantityRef::Edge(edge.id),
                    false,
                );
                self.radii.insert(edge.id, radius);

                self.graph.add_rule(DerivationRule::new(
                    vec![radius],
                    diameter,
                    1,
                    "diameter is twice the radius",
                ));
                self.graph.add_rule(DerivationRule::new(
                    vec![diameter],
                    radius,
                    1,
                    "radius is half the diameter",
                ));
            }
        }
    }

    fn shape_area_quantity(&mut self, shape_id: ShapeId, area: f64) -> QuantityId {
        self.new_quantity(QuantityKind::Area, area, QuantityRef::Shape(shape_id), false)
    }

    /// Length quantities of a shape's straight edges, in boundary order
    fn shape_lengths(&self, shape_id: ShapeId) -> Vec<(EdgeId, QuantityId, f64)> {
        let shape = match self.figure.shape(shape_id) {
            Some(s) => s,
            None => return Vec::new(),
        };
        shape
            .edge_ids
            .iter()
            .filter_map(|eid| {
                let edge = self.figure.edge(*eid)?;
                if !edge.is_segment() {
                    return None;
                }
                let qid = *self.lengths.get(eid)?;
                Some((*eid, qid, edge.length()))
            })
            .collect()
    }

    /// Radius quantity of a shape's arc edge, if any
    fn shape_radius(&self, shape_id: ShapeId) -> Option<QuantityId> {
        let shape = self.figure.shape(shape_id)?;
        shape
            .edge_ids
            .iter()
            .find_map(|eid| self.radii.get(eid).copied())
    }

    /// Rectangle: opposite sides derive each other for free; any adjacent
    /// pair gives the area
    fn emit_rectangle(&mut self, shape_id: ShapeId) -> QuantityId {
        let sides = self.shape_lengths(shape_id);
        let area = self
            .figure
            .shape(shape_id)
            .map(|s| s.area)
            .unwrap_or_default();
        let area_id = self.shape_area_quantity(shape_id, area);

        if sides.len() != 4 {
            return area_id;
        }

        // Boundary order: opposite pairs are (0,2) and (1,3)
        for (a, b) in [(0, 2), (1, 3)] {
            self.graph.add_rule(DerivationRule::new(
                vec![sides[a].1],
                sides[b].1,
                0,
                "opposite sides of a rectangle are equal",
            ));
            self.graph.add_rule(DerivationRule::new(
                vec![sides[b].1],
                sides[a].1,
                0,
                "opposite sides of a rectangle are equal",
            ));
        }

        // Adjacent (perpendicular) pairs each give the area
        for i in 0..4 {
            let j = (i + 1) % 4;
            self.graph.add_rule(DerivationRule::new(
                vec![sides[i].1, sides[j].1],
                area_id,
                1,
                "rectangle area is width times height",
            ));
        }

        area_id
    }

    /// Right triangle: legs are the two shortest sides; Pythagoras connects
    /// any two sides to the third
    fn emit_right_triangle(&mut self, shape_id: ShapeId) -> QuantityId {
        let mut sides = self.shape_lengths(shape_id);
        let area = self
            .figure
            .shape(shape_id)
            .map(|s| s.area)
            .unwrap_or_default();
        let area_id = self.shape_area_quantity(shape_id, area);

        if sides.len() != 3 {
            return area_id;
        }

        // Two shortest are the legs, the longest is the hypotenuse
        sides.sort_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal));
        let (leg_a, leg_b, hyp) = (sides[0].1, sides[1].1, sides[2].1);

        self.graph.add_rule(DerivationRule::new(
            vec![leg_a, leg_b],
            area_id,
            1,
            "right-triangle area is half the product of the legs",
        ));

        self.graph.add_rule(DerivationRule::new(
            vec![leg_a, leg_b],
            hyp,
            1,
            "hypotenuse from the Pythagorean theorem",
        ));
        self.graph.add_rule(DerivationRule::new(
            vec![leg_a, hyp],
            leg_b,
            1,
            "leg from the Pythagorean theorem",
        ));
        self.graph.add_rule(DerivationRule::new(
            vec![leg_b, hyp],
            leg_a,
            1,
            "leg from the Pythagorean theorem",
        ));

        area_id
    }

    /// Semicircle: the flat edge is the diameter; the radius gives the area
    fn emit_semicircle(&mut self, shape_id: ShapeId) -> QuantityId {
        let sides = self.shape_lengths(shape_id);
        let area = self
            .figure
            .shape(shape_id)
            .map(|s| s.area)
            .unwrap_or_default();
        let area_id = self.shape_area_quantity(shape_id, area);

        let (Some(&(_, flat, _)), Some(radius)) = (sides.first(), self.shape_radius(shape_id))
        else {
            return area_id;
        };

        self.graph.add_rule(DerivationRule::new(
            vec![flat],
            radius,
            1,
            "radius is half the flat edge",
        ));
        self.graph.add_rule(DerivationRule::new(
            vec![radius],
            flat,
            1,
            "flat edge is twice the radius",
        ));
        self.graph.add_rule(DerivationRule::new(
            vec![radius],
            area_id,
            1,
            "semicircle area is (3 r^2) / 2",
        ));

        area_id
    }

    /// Quarter circle: both straight edges equal the radius, all three
    /// interchange for free
    fn emit_quarter_circle(&mut self, shape_id: ShapeId) -> QuantityId {
        let sides = self.shape_lengths(shape_id);
        let area = self
            .figure
            .shape(shape_id)
            .map(|s| s.area)
            .unwrap_or_default();
        let area_id = self.shape_area_quantity(shape_id, area);

        let Some(radius) = self.shape_radius(shape_id) else {
            return area_id;
        };

        let mut ring: Vec<QuantityId> = sides.iter().map(|(_, q, _)| *q).collect();
        ring.push(radius);

        for i in 0..ring.len() {
            for j in 0..ring.len() {
                if i != j {
                    self.graph.add_rule(DerivationRule::new(
                        vec![ring[i]],
                        ring[j],
                        0,
                        "quarter-circle straight edges equal the radius",
                    ));
                }
            }
        }

        self.graph.add_rule(DerivationRule::new(
            vec![radius],
            area_id,
            1,
            "quarter-circle area is (3 r^2) / 4",
        ));

        area_id
    }

    /// Seam edges from different shapes occupying the same span are the
    /// same physical edge; deriving one from the other is free
    fn emit_seam_pairs(&mut self) {
        let seams: Vec<&Edge> = self.figure.seam_edges();

        for i in 0..seams.len() {
            for j in (i + 1)..seams.len() {
                let (a, b) = (seams[i], seams[j]);
                if !a.same_span(b, EPSILON) {
                    continue;
                }
                let (Some(&qa), Some(&qb)) = (self.lengths.get(&a.id), self.lengths.get(&b.id))
                else {
                    continue;
                };
                self.graph.add_rule(DerivationRule::new(
                    vec![qa],
                    qb,
                    0,
                    "both shapes share the seam edge",
                ));
                self.graph.add_rule(DerivationRule::new(
                    vec![qb],
                    qa,
                    0,
                    "both shapes share the seam edge",
                ));
            }
        }
    }

    /// Two connected collinear edges that together span a third edge yield
    /// sum and difference rules
    fn emit_collinear_sums(&mut self) {
        let segments: Vec<&Edge> = self
            .figure
            .edges_in_order()
            .into_iter()
            .filter(|e| e.is_segment())
            .collect();

        for i in 0..segments.len() {
            for j in (i + 1)..segments.len() {
                let (a, b) = (segments[i], segments[j]);
                let (Some((a1, a2)), Some((b1, b2))) = (a.endpoints(), b.endpoints()) else {
                    continue;
                };

                // Exactly one shared endpoint, remaining two are the outer span
                let pairs = [
                    (a1, a2, b1, b2),
                    (a1, a2, b2, b1),
                    (a2, a1, b1, b2),
                    (a2, a1, b2, b1),
                ];
                let joined = pairs.iter().find_map(|&(ao, aj, bj, bo)| {
                    if aj.approx_eq(&bj, EPSILON) && !ao.approx_eq(&bo, EPSILON) {
                        Some((ao, aj, bo))
                    } else {
                        None
                    }
                });
                let Some((outer_a, joint, outer_b)) = joined else {
                    continue;
                };
                if !ops::are_collinear(outer_a, joint, outer_b, EPSILON) {
                    continue;
                }

                for c in &segments {
                    if c.id == a.id || c.id == b.id {
                        continue;
                    }
                    let Some((c1, c2)) = c.endpoints() else {
                        continue;
                    };
                    let spans = (c1.approx_eq(&outer_a, EPSILON) && c2.approx_eq(&outer_b, EPSILON))
                        || (c1.approx_eq(&outer_b, EPSILON) && c2.approx_eq(&outer_a, EPSILON));
                    if !spans {
                        continue;
                    }

                    let (Some(&qa), Some(&qb), Some(&qc)) = (
                        self.lengths.get(&a.id),
                        self.lengths.get(&b.id),
                        self.lengths.get(&c.id),
                    ) else {
                        continue;
                    };

                    self.graph.add_rule(DerivationRule::new(
                        vec![qa, qb],
                        qc,
                        1,
                        "the two parts add up to the whole edge",
                    ));
                    self.graph.add_rule(DerivationRule::new(
                        vec![qc, qa],
                        qb,
                        1,
                        "the whole edge minus one part leaves the other",
                    ));
                    self.graph.add_rule(DerivationRule::new(
                        vec![qc, qb],
                        qa,
                        1,
                        "the whole edge minus one part leaves the other",
                    ));
                }
            }
        }
    }
}
