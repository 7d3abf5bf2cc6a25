//! Graph solving
//!
//! Fixpoint propagation over the rule graph, greedy minimum-source-set
//! reduction, and derivation-depth computation. Termination of every loop
//! here is structural: the known-set only grows and is bounded by the
//! quantity count, and the reduction pass is capped.

pub mod trace;

pub use trace::{DerivationStep, DerivationTrace, ExportError, ExportResult, Solution, TargetDepth};

use crate::graph::{DerivationGraph, QuantityId};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

/// Cap on the greedy reduction pass; exceeding it degrades to best effort
pub const ITERATION_CAP: usize = 20;

/// Propagate from a known set to its fixpoint
///
/// Whenever every source of a rule is known and its target is not, the
/// target becomes known and the application is recorded. Returns the full
/// derived set (including the initial known set) and the ordered trace.
pub fn propagate(
    graph: &DerivationGraph,
    known: &[QuantityId],
) -> (FxHashSet<QuantityId>, DerivationTrace) {
    let mut derived: FxHashSet<QuantityId> = known.iter().copied().collect();
    let mut trace = DerivationTrace::new();

    loop {
        let mut changed = false;
        for rule in &graph.rules {
            if derived.contains(&rule.target) {
                continue;
            }
            if rule.sources.iter().all(|s| derived.contains(s)) {
                derived.insert(rule.target);
                trace.push(DerivationStep {
                    sources: rule.sources.clone(),
                    target: rule.target,
                    cost: rule.cost,
                    rationale: rule.rationale.clone(),
                });
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    (derived, trace)
}

/// True iff propagation from `sources` covers every target quantity
pub fn can_reach_targets(graph: &DerivationGraph, sources: &[QuantityId]) -> bool {
    let (derived, _) = propagate(graph, sources);
    graph.targets.iter().all(|t| derived.contains(t))
}

/// Greedy reduction to a locally irreducible source set
///
/// Starts from every measurable quantity and drops, one at a time in id
/// order, any quantity whose removal keeps all targets reachable. The
/// result is locally irreducible, not guaranteed globally minimal.
pub fn find_minimum_sources(graph: &DerivationGraph) -> Vec<QuantityId> {
    let all = graph.measurable_ids();

    if !can_reach_targets(graph, &all) {
        // Builder defect: even the full measurable set cannot reach the
        // targets. Degrade to offering everything.
        warn!(
            measurables = all.len(),
            targets = graph.targets.len(),
            "targets unreachable from all measurable quantities; returning full set"
        );
        return all;
    }

    let mut kept = all.clone();
    for (attempts, candidate) in all.iter().enumerate() {
        if attempts >= ITERATION_CAP {
            warn!(
                cap = ITERATION_CAP,
                remaining = all.len() - attempts,
                "minimization iteration cap reached; keeping remaining sources"
            );
            break;
        }
        let tentative: Vec<QuantityId> = kept.iter().copied().filter(|q| q != candidate).collect();
        if can_reach_targets(graph, &tentative) {
            kept = tentative;
        }
    }

    debug!(from = all.len(), to = kept.len(), "source set reduced");
    kept
}

/// Depth assignment fixpoint: sources start at 0; a rule whose sources all
/// have depths assigns its target `max(source depths) + cost` on first reach
fn assign_depths(graph: &DerivationGraph, sources: &[QuantityId]) -> FxHashMap<QuantityId, u32> {
    let mut depths: FxHashMap<QuantityId, u32> = FxHashMap::default();
    for id in sources {
        depths.insert(*id, 0);
    }

    loop {
        let mut changed = false;
        for rule in &graph.rules {
            if depths.contains_key(&rule.target) {
                continue;
            }
            let source_max = rule
                .sources
                .iter()
                .try_fold(0u32, |acc, s| depths.get(s).map(|d| acc.max(*d)));
            if let Some(base) = source_max {
                depths.insert(rule.target, base + rule.cost);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    depths
}

/// Maximum derivation depth over all targets, from the given sources
///
/// Returns None if some target never receives a depth.
pub fn derivation_depth(graph: &DerivationGraph, sources: &[QuantityId]) -> Option<u32> {
    let depths = assign_depths(graph, sources);
    graph
        .targets
        .iter()
        .map(|t| depths.get(t).copied())
        .try_fold(0u32, |acc, d| d.map(|d| acc.max(d)))
}

/// Minimum sources, full propagation trace, and max depth in one call
pub fn solve(graph: &DerivationGraph) -> Solution {
    let sources = find_minimum_sources(graph);
    let (derived, trace) = propagate(graph, &sources);
    let solved = graph.targets.iter().all(|t| derived.contains(t));

    let depths = assign_depths(graph, &sources);
    let target_depths: Vec<TargetDepth> = graph
        .targets
        .iter()
        .map(|t| TargetDepth {
            target: *t,
            depth: depths.get(t).copied().unwrap_or(0),
        })
        .collect();

    let max_depth = match derivation_depth(graph, &sources) {
        Some(d) => d,
        None => {
            warn!("derivation depth undefined; some target is unreachable");
            0
        }
    };

    Solution {
        solved,
        sources,
        max_depth,
        target_depths,
        trace,
    }
}
