//! Super-spreader ranking.
//!
//! Combines the two centrality measures into a deterministic total order:
//! betweenness descending, ties broken by out-degree descending, remaining
//! ties by user id ascending. The id tie-break makes re-runs reproduce the
//! identical sequence even when many nodes share identical scores (common
//! in sparse contact logs).

use serde::Serialize;
use tracing::instrument;

use crate::graph::build::ContactGraph;
use crate::metrics::betweenness::betweenness_centrality;
use crate::metrics::degree::out_degree_centrality;

/// Number of ranked users selected as super-spreaders by default.
pub const DEFAULT_TOP_K: usize = 20;

/// One ranked row: a user and their centrality scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuperSpreader {
    pub id: String,
    pub label: String,
    pub out_degree: f64,
    pub betweenness: f64,
}

/// Rank all users and keep the first `top_k`.
///
/// Passing `top_k >= node_count` returns the full ranking (the selection
/// simply runs out of rows, matching the small-dataset behavior).
#[must_use]
#[instrument(skip(cg), fields(nodes = cg.node_count()))]
pub fn rank_super_spreaders(cg: &ContactGraph, top_k: usize) -> Vec<SuperSpreader> {
    let out_degree = out_degree_centrality(cg);
    let betweenness = betweenness_centrality(cg);

    let mut rows: Vec<SuperSpreader> = cg
        .graph
        .node_weights()
        .map(|node| SuperSpreader {
            id: node.id.clone(),
            label: node.label.clone(),
            out_degree: out_degree.get(&node.id).copied().unwrap_or(0.0),
            betweenness: betweenness.get(&node.id).copied().unwrap_or(0.0),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.betweenness
            .total_cmp(&a.betweenness)
            .then_with(|| b.out_degree.total_cmp(&a.out_degree))
            .then_with(|| a.id.cmp(&b.id))
    });
    rows.truncate(top_k);
    rows
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
