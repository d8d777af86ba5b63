//! Bounded-depth infection propagation.
//!
//! # Overview
//!
//! Starting from the ground-truth-infected users (iteration 0), each
//! iteration k+1 is the set of direct successors of iteration k that were
//! not already labeled. The expansion stops at a configurable depth
//! ([`DEFAULT_DEPTH`] = 2), yielding a hop-distance label per reached
//! node; nodes beyond the bound stay unlabeled.
//!
//! # Two derived sets, kept separate
//!
//! The bounded labeling feeds the spread export. The **secondary-infected
//! set** used for the reproduction-number estimate is the strictly 1-hop
//! notion: direct successors of the initially-infected set, minus that
//! set. [`secondary_infected`] computes it independently of the labeling
//! depth — widening it to two hops would change what R0 means.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::graph::NodeIndex;
use petgraph::visit::IntoNodeIdentifiers;
use tracing::instrument;

use crate::graph::build::ContactGraph;

/// Default propagation bound: two hops from the initially-infected set.
pub const DEFAULT_DEPTH: u32 = 2;

/// Ids of ground-truth-infected users — iteration 0.
#[must_use]
pub fn initially_infected(cg: &ContactGraph) -> BTreeSet<String> {
    cg.infected_ids().into_iter().collect()
}

/// Label nodes with their infection iteration, up to `max_depth` hops.
///
/// Iteration 0 is exactly the ground-truth-infected set; iteration k+1 is
/// the one-hop successor frontier of iteration k minus everything already
/// labeled. Returns a fresh mapping; the graph is not touched.
#[must_use]
#[instrument(skip(cg), fields(nodes = cg.node_count()))]
pub fn infection_iterations(cg: &ContactGraph, max_depth: u32) -> BTreeMap<String, u32> {
    let mut labels: BTreeMap<String, u32> = BTreeMap::new();

    let mut frontier: Vec<NodeIndex> = cg
        .graph
        .node_identifiers()
        .filter(|&idx| cg.graph[idx].infected)
        .collect();
    for &idx in &frontier {
        labels.insert(cg.graph[idx].id.clone(), 0);
    }

    for depth in 1..=max_depth {
        let mut next: Vec<NodeIndex> = Vec::new();

        for &node in &frontier {
            for successor in cg.successors(node) {
                let id = &cg.graph[successor].id;
                if !labels.contains_key(id) {
                    labels.insert(id.clone(), depth);
                    next.push(successor);
                }
            }
        }

        if next.is_empty() {
            break;
        }
        frontier = next;
    }

    labels
}

/// The strictly 1-hop secondary-infected set: direct successors of
/// initially-infected users, excluding users already initially infected.
///
/// This is the numerator of the reproduction-number estimate.
#[must_use]
pub fn secondary_infected(cg: &ContactGraph) -> BTreeSet<String> {
    let initial: Vec<NodeIndex> = cg
        .graph
        .node_identifiers()
        .filter(|&idx| cg.graph[idx].infected)
        .collect();

    let mut secondary = BTreeSet::new();
    for &node in &initial {
        for successor in cg.successors(node) {
            let target = &cg.graph[successor];
            if !target.infected {
                secondary.insert(target.id.clone());
            }
        }
    }
    secondary
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
