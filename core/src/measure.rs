//! Measurement selection and placement
//!
//! Converts a solved derivation graph into the measurements actually shown
//! to the student. The difficulty maps to a target derivation depth; when
//! the figure's natural depth overshoots, extra measurable quantities are
//! revealed one at a time until the depth fits. Selected quantities become
//! placed annotations: a perpendicular-offset label at the midpoint of a
//! straight edge, or a radial leader for an arc radius.

use crate::config::Difficulty;
use crate::figure::{CompositeFigure, EdgeGeometry, Point2D};
use crate::graph::{DerivationGraph, QuantityId, QuantityKind, QuantityRef};
use crate::solve::{self, Solution, ITERATION_CAP};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Perpendicular offset of a length label from its edge
const LABEL_OFFSET: f64 = 0.5;

/// A measurement annotation handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Quantity this measurement reveals
    pub quantity: QuantityId,

    pub value: f64,

    /// Display text, e.g. `6` or `r = 5`
    pub label: String,

    /// Label anchor position
    pub position: Point2D,

    /// Label rotation in radians, kept within ±90° so text reads upright
    pub rotation: f64,
}

/// What the selector ended up doing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementOutcome {
    /// Final source set, in id order
    pub sources: Vec<QuantityId>,

    /// Depth achieved with that source set
    pub achieved_depth: u32,

    /// True when the graph path failed and the legacy procedure ran
    pub used_fallback: bool,
}

/// Choose and place measurements for the figure
///
/// The graph-based path starts from the solution's minimum source set and
/// widens it until the difficulty's target depth is met. The legacy
/// direct procedure runs only when the graph reports failure.
pub fn apply_measurements(
    figure: &mut CompositeFigure,
    graph: &DerivationGraph,
    solution: &Solution,
    difficulty: Difficulty,
) -> MeasurementOutcome {
    let outcome = if solution.solved {
        let sources = adjust_depth(graph, solution, difficulty);
        let achieved_depth = solve::derivation_depth(graph, &sources).unwrap_or(0);
        MeasurementOutcome {
            sources,
            achieved_depth,
            used_fallback: false,
        }
    } else {
        warn!("graph path reported failure; using legacy measurement selection");
        let sources = legacy_select(figure, graph);
        MeasurementOutcome {
            sources,
            achieved_depth: 0,
            used_fallback: true,
        }
    };

    let placed: Vec<Measurement> = outcome
        .sources
        .iter()
        .filter_map(|id| place_measurement(figure, graph, *id))
        .collect();
    figure.measurements = placed;

    outcome
}

/// Widen the minimum source set until the target depth is met
fn adjust_depth(
    graph: &DerivationGraph,
    solution: &Solution,
    difficulty: Difficulty,
) -> Vec<QuantityId> {
    let mut sources = solution.sources.clone();
    let Some(target) = difficulty.target_depth() else {
        return sources;
    };
    if solution.max_depth <= target {
        return sources;
    }

    // Too hard: reveal extra measurements, never remove required ones.
    let chosen: FxHashSet<QuantityId> = sources.iter().copied().collect();
    let extras: Vec<QuantityId> = graph
        .measurable_ids()
        .into_iter()
        .filter(|id| !chosen.contains(id))
        .collect();

    let mut iterations = 0usize;
    for extra in extras {
        if iterations >= ITERATION_CAP {
            warn!(
                cap = ITERATION_CAP,
                "depth-adjustment cap reached; returning best effort"
            );
            break;
        }
        iterations += 1;

        sources.push(extra);
        let depth = solve::derivation_depth(graph, &sources).unwrap_or(u32::MAX);
        debug!(added = %extra, depth, target, "measurement added to reduce depth");
        if depth <= target {
            break;
        }
    }

    sources.sort();
    sources
}

/// Legacy direct selection: add measurable quantities until every shape's
/// area is directly computable, then prune additions that turned out
/// redundant
///
/// Works straight off the figure, no derivation graph. Kept as a defensive
/// path; with a correctly built graph it never runs.
fn legacy_select(figure: &CompositeFigure, graph: &DerivationGraph) -> Vec<QuantityId> {
    let all = graph.measurable_ids();
    let mut chosen: Vec<QuantityId> = Vec::new();

    for id in &all {
        if figure_directly_solvable(figure, graph, &chosen) {
            break;
        }
        chosen.push(*id);
    }

    // Prune in reverse insertion order
    let mut pruned = chosen.clone();
    for id in chosen.iter().rev() {
        let tentative: Vec<QuantityId> = pruned.iter().copied().filter(|q| q != id).collect();
        if figure_directly_solvable(figure, graph, &tentative) {
            pruned = tentative;
        }
    }

    if !figure_directly_solvable(figure, graph, &pruned) {
        warn!("legacy selection could not make figure solvable; offering all measurables");
        return all;
    }
    pruned
}

/// Direct per-shape solvability: every shape must have enough given edge
/// scalars to compute its area without cross-shape reasoning
fn figure_directly_solvable(
    figure: &CompositeFigure,
    graph: &DerivationGraph,
    sources: &[QuantityId],
) -> bool {
    let given: FxHashSet<crate::figure::EdgeId> = sources
        .iter()
        .filter_map(|id| match graph.quantity(*id)?.subject {
            QuantityRef::Edge(eid) => Some(eid),
            _ => None,
        })
        .collect();

    figure.shapes.iter().all(|shape| {
        let known = |i: usize| {
            shape
                .edge_ids
                .get(i)
                .map(|eid| given.contains(eid))
                .unwrap_or(false)
        };
        match shape.kind {
            crate::figure::ShapeKind::Rectangle => {
                // One of each opposite pair; boundary order (0,2) and (1,3)
                (known(0) || known(2)) && (known(1) || known(3))
            }
            crate::figure::ShapeKind::RightTriangle => {
                let count = (0..3).filter(|i| known(*i)).count();
                count >= 2
            }
            crate::figure::ShapeKind::Semicircle => known(0) || known(1),
            crate::figure::ShapeKind::QuarterCircle => known(0) || known(1) || known(2),
        }
    })
}

/// Convert one source quantity into a placed annotation
fn place_measurement(
    figure: &CompositeFigure,
    graph: &DerivationGraph,
    id: QuantityId,
) -> Option<Measurement> {
    let quantity = graph.quantity(id)?;
    let QuantityRef::Edge(edge_id) = quantity.subject else {
        return None;
    };
    let edge = figure.edge(edge_id)?;

    match (&edge.geometry, quantity.kind) {
        (EdgeGeometry::Segment { start, end }, QuantityKind::Length) => {
            let mid = edge.midpoint();
            let dir = start.to(end);
            let len = dir.norm();
            if len == 0.0 {
                return None;
            }
            // Unit normal pointing away from the figure's center
            let normal = Point2D::new(-dir.y / len, dir.x / len);
            let centroid = figure.centroid();
            let outward = if mid.add(&normal.scale(LABEL_OFFSET)).distance(&centroid)
                >= mid.add(&normal.scale(-LABEL_OFFSET)).distance(&centroid)
            {
                normal
            } else {
                normal.scale(-1.0)
            };

            let mut rotation = dir.angle();
            if rotation > std::f64::consts::FRAC_PI_2 {
                rotation -= std::f64::consts::PI;
            } else if rotation <= -std::f64::consts::FRAC_PI_2 {
                rotation += std::f64::consts::PI;
            }

            Some(Measurement {
                quantity: id,
                value: quantity.value,
                label: format_value(quantity.value),
                position: mid.add(&outward.scale(LABEL_OFFSET)),
                rotation,
            })
        }
        (EdgeGeometry::Arc { center, .. }, QuantityKind::Radius) => {
            // Radial leader: label halfway between center and the arc middle
            let arc_mid = edge.midpoint();
            let dir = center.to(&arc_mid);
            let half = center.add(&dir.scale(0.5));

            Some(Measurement {
                quantity: id,
                value: quantity.value,
                label: format!("r = {}", format_value(quantity.value)),
                position: half,
                rotation: 0.0,
            })
        }
        _ => None,
    }
}

/// Trim a value for display: integers lose the decimal point, everything
/// else keeps at most two decimals
pub fn format_value(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if (rounded - rounded.round()).abs() < 1e-9 {
        format!("{}", rounded.round() as i64)
    } else {
        let s = format!("{rounded:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::shape::{rectangle, semicircle};
    use crate::figure::FigureIds;
    use crate::graph::DerivationGraphBuilder;

    fn rect_figure() -> CompositeFigure {
        let mut ids = FigureIds::new();
        let (base, edges) = rectangle(&mut ids, 6.0, 4.0);
        CompositeFigure::new(base, edges)
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(6.0), "6");
        assert_eq!(format_value(37.5), "37.5");
        assert_eq!(format_value(0.125), "0.13");
        assert_eq!(format_value(10.10), "10.1");
    }

    #[test]
    fn test_apply_measurements_rectangle() {
        let mut figure = rect_figure();
        let graph = DerivationGraphBuilder::new(&figure).build();
        let solution = solve::solve(&graph);

        let outcome = apply_measurements(&mut figure, &graph, &solution, Difficulty::Hard);

        assert!(!outcome.used_fallback);
        // One of each opposite pair suffices
        assert_eq!(outcome.sources.len(), 2);
        assert_eq!(figure.measurements.len(), 2);
    }

    #[test]
    fn test_easy_never_exceeds_target_depth() {
        let mut figure = rect_figure();
        let graph = DerivationGraphBuilder::new(&figure).build();
        let solution = solve::solve(&graph);

        let outcome = apply_measurements(&mut figure, &graph, &solution, Difficulty::Easy);

        assert!(outcome.achieved_depth <= 2);
    }

    #[test]
    fn test_radius_measurement_has_leader_label() {
        let mut ids = FigureIds::new();
        let (base, edges) = semicircle(&mut ids, 5.0);
        let mut figure = CompositeFigure::new(base, edges);
        let graph = DerivationGraphBuilder::new(&figure).build();
        let solution = solve::solve(&graph);

        apply_measurements(&mut figure, &graph, &solution, Difficulty::Hard);

        assert_eq!(figure.measurements.len(), 1);
        let m = &figure.measurements[0];
        assert!(m.label == "r = 5" || m.label == "10", "radius leader or flat edge");
    }

    #[test]
    fn test_legacy_select_covers_all_shapes() {
        let figure = rect_figure();
        let graph = DerivationGraphBuilder::new(&figure).build();

        let chosen = legacy_select(&figure, &graph);
        assert!(figure_directly_solvable(&figure, &graph, &chosen));
        assert!(chosen.len() >= 2);
    }

    #[test]
    fn test_measurement_label_offset_from_edge() {
        let mut figure = rect_figure();
        let graph = DerivationGraphBuilder::new(&figure).build();
        let solution = solve::solve(&graph);
        apply_measurements(&mut figure, &graph, &solution, Difficulty::Hard);

        for m in &figure.measurements {
            let edge_mids: Vec<Point2D> = figure
                .edges_in_order()
                .iter()
                .map(|e| e.midpoint())
                .collect();
            // Label sits off the edge midpoint, not on it
            assert!(edge_mids
                .iter()
                .all(|mid| m.position.distance(mid) > 1e-9));
        }
    }
}
