//! compfig-core
//!
//! Procedural generator for composite-figure area problems. A figure is
//! assembled from primitive shapes glued edge-to-edge, translated into a
//! graph of quantities and derivation rules, and solved for a minimal,
//! depth-controlled set of measurements to reveal to the student.

pub mod config;
pub mod figure;   // Geometric IR (points, edges, shapes, composition)
pub mod generate; // One-call generation pipeline
pub mod graph;    // Quantities, derivation rules, figure-to-graph builder
pub mod measure;  // Difficulty-aware measurement selection and placement
pub mod rng;      // Seeded, substitutable randomness
pub mod solve;    // Fixpoint propagation, source minimization, depth

pub use config::{Difficulty, GenConfig};
pub use figure::{CompositeFigure, Edge, EdgeGeometry, EdgeId, Point2D, Shape, ShapeId, ShapeKind};
pub use generate::{generate, FigureDescription, GeneratedProblem};
pub use graph::{DerivationGraph, DerivationGraphBuilder, Quantity, QuantityId, QuantityKind};
pub use measure::{apply_measurements, Measurement, MeasurementOutcome};
pub use rng::{RandomSource, SeededRng};
pub use solve::{
    can_reach_targets, derivation_depth, find_minimum_sources, propagate, solve, Solution,
};
