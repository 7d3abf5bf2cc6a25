//! One generation request, start to finish
//!
//! The pipeline is strictly forward: compose the figure, build the
//! derivation graph, solve it, assign measurements, describe the result.
//! Nothing feeds back into an earlier stage, every id counter lives in this
//! call, and all randomness comes from the one seeded source, so the same
//! config reproduces the same problem byte for byte.

use crate::config::{Difficulty, GenConfig};
use crate::figure::shape::{self, ShapeKind};
use crate::figure::{CompositeFigure, Edge, FigureIds, Shape, AREA_TOLERANCE};
use crate::graph::{DerivationGraph, DerivationGraphBuilder};
use crate::measure::{self, Measurement, MeasurementOutcome};
use crate::rng::{RandomSource, SeededRng};
use crate::solve::{self, ExportResult, Solution};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Everything the renderer and grader need for one problem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigureDescription {
    pub shapes: Vec<Shape>,

    /// Edges in id order, with visibility flags and full geometry
    pub edges: Vec<Edge>,

    pub measurements: Vec<Measurement>,

    pub total_area: f64,

    /// Exact numeric answer string
    pub answer: String,

    /// Tolerant alternative answer forms (rounded, unit-suffixed)
    pub answer_alternatives: Vec<String>,

    pub difficulty: Difficulty,
    pub seed: u64,

    /// Derivation depth the chosen measurements achieve
    pub derivation_depth: u32,
}

impl FigureDescription {
    pub fn to_json(&self) -> ExportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> ExportResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Full output of one generation: every intermediate stage plus the final
/// renderable description
#[derive(Debug, Clone)]
pub struct GeneratedProblem {
    pub figure: CompositeFigure,
    pub graph: DerivationGraph,
    pub solution: Solution,
    pub outcome: MeasurementOutcome,
    pub description: FigureDescription,
}

/// Generate one composite-figure area problem
pub fn generate(config: GenConfig) -> GeneratedProblem {
    let mut rng = SeededRng::new(config.seed);
    let mut ids = FigureIds::new();

    // Compose
    let base_kind = pick_kind(&mut rng);
    let (base, base_edges) = build_shape(&mut ids, &mut rng, base_kind, None);
    let mut figure = CompositeFigure::new(base, base_edges);

    for _ in 0..config.difficulty.attachments() {
        let visible_lengths: Vec<f64> = figure
            .edges_in_order()
            .iter()
            .filter(|e| e.visible && e.is_segment())
            .map(|e| e.length())
            .collect();
        let Some(&target_len) = rng.pick(&visible_lengths) else {
            break;
        };

        let kind = pick_kind(&mut rng);
        let (new_shape, new_edges) = build_shape(&mut ids, &mut rng, kind, Some(target_len));
        // A miss is non-fatal; the figure just ends up smaller
        figure.attach(new_shape, new_edges, &mut rng);
    }
    debug!(shapes = figure.shapes.len(), seed = config.seed, "figure composed");

    if !figure.area_consistent() {
        let sum: f64 = figure.shapes.iter().map(|s| s.area).sum();
        warn!(
            total = figure.total_area,
            sum,
            tolerance = AREA_TOLERANCE,
            "total area drifted from the shape-area sum"
        );
    }

    // Build and solve the graph
    let graph = DerivationGraphBuilder::new(&figure).build();
    let solution = solve::solve(&graph);
    debug!(
        solved = solution.solved,
        depth = solution.max_depth,
        sources = solution.sources.len(),
        "graph solved"
    );

    // Assign measurements
    let outcome = measure::apply_measurements(&mut figure, &graph, &solution, config.difficulty);

    let description = describe(&figure, &outcome, config);
    GeneratedProblem {
        figure,
        graph,
        solution,
        outcome,
        description,
    }
}

fn pick_kind<R: RandomSource>(rng: &mut R) -> ShapeKind {
    const KINDS: [ShapeKind; 4] = [
        ShapeKind::Rectangle,
        ShapeKind::RightTriangle,
        ShapeKind::Semicircle,
        ShapeKind::QuarterCircle,
    ];
    rng.pick(&KINDS).copied().unwrap_or(ShapeKind::Rectangle)
}

/// Build a shape with small integer dimensions; when `match_len` is given,
/// one dimension is taken from it so an attachment edge exists
fn build_shape<R: RandomSource>(
    ids: &mut FigureIds,
    rng: &mut R,
    kind: ShapeKind,
    match_len: Option<f64>,
) -> (Shape, Vec<Edge>) {
    match kind {
        ShapeKind::Rectangle => {
            let w = match_len.unwrap_or_else(|| rng.int(2, 9) as f64);
            let h = rng.int(2, 9) as f64;
            shape::rectangle(ids, w, h)
        }
        ShapeKind::RightTriangle => {
            let base = match_len.unwrap_or_else(|| rng.int(2, 9) as f64);
            let height = rng.int(2, 9) as f64;
            shape::right_triangle(ids, base, height)
        }
        ShapeKind::Semicircle => {
            // Flat edge must equal the matched length
            let r = match_len.map(|l| l / 2.0).unwrap_or_else(|| rng.int(2, 6) as f64);
            shape::semicircle(ids, r)
        }
        ShapeKind::QuarterCircle => {
            let r = match_len.unwrap_or_else(|| rng.int(2, 6) as f64);
            shape::quarter_circle(ids, r)
        }
    }
}

fn describe(
    figure: &CompositeFigure,
    outcome: &MeasurementOutcome,
    config: GenConfig,
) -> FigureDescription {
    let total = figure.total_area;
    let answer = measure::format_value(total);
    let mut alternatives = vec![
        format!("{}", total.round() as i64),
        format!("{answer} cm²"),
        format!("{} cm²", total.round() as i64),
    ];
    alternatives.retain(|a| *a != answer);
    alternatives.dedup();

    FigureDescription {
        shapes: figure.shapes.clone(),
        edges: figure.edges_in_order().into_iter().cloned().collect(),
        measurements: figure.measurements.clone(),
        total_area: total,
        answer,
        answer_alternatives: alternatives,
        difficulty: config.difficulty,
        seed: config.seed,
        derivation_depth: outcome.achieved_depth,
    }
}
