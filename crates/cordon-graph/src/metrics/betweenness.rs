//! Betweenness centrality via Brandes' algorithm.
//!
//! # Overview
//!
//! Betweenness measures how often a user lies on shortest contact chains
//! between other pairs of users. High-betweenness users are the bridges an
//! infection must cross to move between parts of the network — prime
//! super-spreader candidates.
//!
//! # Algorithm
//!
//! Brandes (2001) for unweighted directed graphs:
//!
//! 1. For each source node `s`, run BFS to compute shortest-path counts
//!    and distances.
//! 2. Accumulate dependency scores in reverse BFS order (farthest nodes
//!    first).
//! 3. Sum the dependency scores across all source nodes.
//!
//! Complexity: O(V * E).
//!
//! # Output
//!
//! A `HashMap<String, f64>` from user id to score, normalized by
//! `(n-1)*(n-2)` so values lie in `[0, 1]`. Graphs with two nodes or
//! fewer have no intermediate positions: every score is 0. Pairs with no
//! connecting path contribute nothing, so disconnected graphs are handled
//! without special cases.

use std::collections::{HashMap, VecDeque};

use petgraph::graph::NodeIndex;
use petgraph::visit::{IntoNodeIdentifiers, NodeIndexable};
use petgraph::Direction;
use tracing::instrument;

use crate::graph::build::ContactGraph;

/// Compute normalized betweenness centrality for every user.
#[must_use]
#[instrument(skip(cg), fields(nodes = cg.node_count()))]
#[allow(clippy::cast_precision_loss)]
pub fn betweenness_centrality(cg: &ContactGraph) -> HashMap<String, f64> {
    let g = &cg.graph;
    let n = g.node_count();

    if n == 0 {
        return HashMap::new();
    }

    // Node-indexed betweenness accumulator.
    let mut cb: Vec<f64> = vec![0.0; n];

    for s in g.node_identifiers() {
        let si = g.to_index(s);

        // Stack: nodes in order of discovery (farthest popped first).
        let mut stack: Vec<NodeIndex> = Vec::with_capacity(n);

        // predecessors[w] = nodes that immediately precede w on shortest
        // paths from s.
        let mut predecessors: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];

        // sigma[t]: number of shortest paths from s to t.
        let mut sigma: Vec<f64> = vec![0.0; n];
        sigma[si] = 1.0;

        // dist[t]: distance from s to t (-1 = unvisited).
        let mut dist: Vec<i64> = vec![-1; n];
        dist[si] = 0;

        let mut queue: VecDeque<NodeIndex> = VecDeque::new();
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            let vi = g.to_index(v);
            stack.push(v);

            for w in g.neighbors_directed(v, Direction::Outgoing) {
                let wi = g.to_index(w);

                // First visit to w?
                if dist[wi] < 0 {
                    dist[wi] = dist[vi] + 1;
                    queue.push_back(w);
                }

                // Shortest path to w via v?
                if dist[wi] == dist[vi] + 1 {
                    sigma[wi] += sigma[vi];
                    predecessors[wi].push(v);
                }
            }
        }

        // Accumulate dependencies in reverse BFS order.
        let mut delta: Vec<f64> = vec![0.0; n];

        while let Some(w) = stack.pop() {
            let wi = g.to_index(w);

            for &v in &predecessors[wi] {
                let vi = g.to_index(v);
                if sigma[wi] > 0.0 {
                    delta[vi] += (sigma[vi] / sigma[wi]) * (1.0 + delta[wi]);
                }
            }

            if wi != si {
                cb[wi] += delta[wi];
            }
        }
    }

    // Directed normalization: (n-1)(n-2) ordered pairs can route through
    // a given node. With n <= 2 there are no intermediate positions.
    let scale = if n > 2 {
        1.0 / ((n - 1) * (n - 2)) as f64
    } else {
        0.0
    };

    g.node_identifiers()
        .map(|idx| (g[idx].id.clone(), cb[g.to_index(idx)] * scale))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_support::build_graph;

    #[test]
    fn empty_graph_returns_empty() {
        let cg = build_graph(&[], &[]);
        assert!(betweenness_centrality(&cg).is_empty());
    }

    #[test]
    fn single_node_zero_betweenness() {
        let cg = build_graph(&["a"], &[]);
        let bc = betweenness_centrality(&cg);
        assert_eq!(bc.get("a"), Some(&0.0));
    }

    #[test]
    fn two_nodes_all_zero() {
        let cg = build_graph(&["a", "b"], &[("a", "b"), ("b", "a")]);
        let bc = betweenness_centrality(&cg);
        assert!((bc["a"] - 0.0).abs() < f64::EPSILON);
        assert!((bc["b"] - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn linear_chain_middle_node() {
        // a → b → c: b carries the single a→c shortest path.
        // Raw score 1.0, normalized by (3-1)(3-2) = 2 → 0.5.
        let cg = build_graph(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        let bc = betweenness_centrality(&cg);

        assert!((bc["a"] - 0.0).abs() < 1e-10, "a is a source/leaf");
        assert!((bc["b"] - 0.5).abs() < 1e-10, "b bridges a→c: got {}", bc["b"]);
        assert!((bc["c"] - 0.0).abs() < 1e-10, "c is a sink/leaf");
    }

    #[test]
    fn diamond_split_paths() {
        // a → b → d and a → c → d: b and c each carry half of the one
        // a→d pair. Raw 0.5, normalized by (4-1)(4-2) = 6 → 1/12.
        let cg = build_graph(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        );
        let bc = betweenness_centrality(&cg);

        assert!((bc["a"] - 0.0).abs() < 1e-10);
        assert!((bc["b"] - 0.5 / 6.0).abs() < 1e-10, "got {}", bc["b"]);
        assert!((bc["c"] - 0.5 / 6.0).abs() < 1e-10, "got {}", bc["c"]);
        assert!((bc["d"] - 0.0).abs() < 1e-10);
    }

    #[test]
    fn chain_of_four() {
        // a → b → c → d. Raw: b on a→c and a→d (2.0); c on a→d and b→d
        // (2.0). Normalized by (4-1)(4-2) = 6 → 1/3 each.
        let cg = build_graph(&["a", "b", "c", "d"], &[("a", "b"), ("b", "c"), ("c", "d")]);
        let bc = betweenness_centrality(&cg);

        assert!((bc["b"] - 2.0 / 6.0).abs() < 1e-10, "got {}", bc["b"]);
        assert!((bc["c"] - 2.0 / 6.0).abs() < 1e-10, "got {}", bc["c"]);
    }

    #[test]
    fn disconnected_components_no_cross_scores() {
        let cg = build_graph(&["a", "b", "c", "d"], &[("a", "b"), ("c", "d")]);
        let bc = betweenness_centrality(&cg);

        for id in ["a", "b", "c", "d"] {
            assert!((bc[id] - 0.0).abs() < 1e-10, "{id} must score 0");
        }
    }

    #[test]
    fn scores_stay_in_unit_interval() {
        let cg = build_graph(
            &["a", "b", "c", "d", "e"],
            &[
                ("a", "b"),
                ("b", "c"),
                ("c", "d"),
                ("d", "e"),
                ("e", "a"),
                ("b", "d"),
            ],
        );
        for score in betweenness_centrality(&cg).values() {
            assert!((0.0..=1.0).contains(score), "score out of range: {score}");
        }
    }
}
