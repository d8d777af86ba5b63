//! Out-degree centrality.
//!
//! The fraction of the rest of the population a user reported contact
//! with: `distinct successors / (N - 1)`. Scores lie in `[0, 1]`; a node
//! with no outgoing contacts scores 0.

use std::collections::HashMap;

use petgraph::visit::IntoNodeIdentifiers;
use petgraph::Direction;

use crate::graph::build::ContactGraph;

/// Compute out-degree centrality for every user.
///
/// Returns 0.0 for every node when the graph has one node or fewer (no
/// other users to contact).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn out_degree_centrality(cg: &ContactGraph) -> HashMap<String, f64> {
    let n = cg.graph.node_count();
    let mut scores = HashMap::with_capacity(n);

    for idx in cg.graph.node_identifiers() {
        let score = if n <= 1 {
            0.0
        } else {
            let successors = cg
                .graph
                .neighbors_directed(idx, Direction::Outgoing)
                .count();
            successors as f64 / (n - 1) as f64
        };
        scores.insert(cg.graph[idx].id.clone(), score);
    }

    scores
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
