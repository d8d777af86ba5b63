//! Structural statistics for the transmission graph.
//!
//! # Statistics Provided
//!
//! - **node_count / edge_count**: totals for the constructed graph.
//! - **infected_count**: nodes carrying the ground-truth `infected` flag.
//! - **density**: `edge_count / (node_count * (node_count - 1))` for a
//!   directed graph; 0.0 for graphs with fewer than 2 nodes.
//! - **average_path_length**: mean shortest-path length over all ordered
//!   node pairs, on unweighted directed edges. NaN when the graph is not
//!   strongly connected (some pair has no path) or empty; 0.0 for a
//!   single node. Degrades, never panics.
//! - **clustering_coefficient**: average local clustering coefficient on
//!   the undirected projection (an edge exists undirected if it exists in
//!   either direction); 0.0 for the empty graph.
//! - **weakly_connected_component_count**: disjoint subgraphs when edge
//!   direction is ignored.
//! - **isolated_node_count**: users with no contacts in either direction.
//! - **max_in_degree / max_out_degree**: highest in/out degree over all
//!   nodes.

use std::collections::VecDeque;

use petgraph::algo::connected_components;
use petgraph::visit::IntoNodeIdentifiers;
use petgraph::Direction;

use crate::graph::build::ContactGraph;

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

/// Summary statistics for a transmission graph.
///
/// Computed from a [`ContactGraph`] by [`GraphStats::from_graph`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct GraphStats {
    /// Number of users (nodes) in the graph.
    pub node_count: usize,
    /// Number of distinct directed contact pairs (edges).
    pub edge_count: usize,
    /// Number of ground-truth-infected users.
    pub infected_count: usize,
    /// Graph density: `edge_count / (node_count * (node_count - 1))`.
    pub density: f64,
    /// Mean shortest-path length over all ordered reachable pairs; NaN
    /// when the graph is not strongly connected.
    pub average_path_length: f64,
    /// Average local clustering coefficient of the undirected projection.
    pub clustering_coefficient: f64,
    /// Number of weakly connected components (disjoint subgraphs).
    pub weakly_connected_component_count: usize,
    /// Number of nodes with no in-edges and no out-edges.
    pub isolated_node_count: usize,
    /// Maximum in-degree (most incoming contact edges on one node).
    pub max_in_degree: usize,
    /// Maximum out-degree (most outgoing contact edges from one node).
    pub max_out_degree: usize,
}

impl GraphStats {
    /// Compute statistics from a [`ContactGraph`].
    #[must_use]
    pub fn from_graph(cg: &ContactGraph) -> Self {
        let node_count = cg.node_count();
        let edge_count = cg.edge_count();

        let infected_count = cg.graph.node_weights().filter(|n| n.infected).count();

        let isolated_node_count = cg
            .graph
            .node_identifiers()
            .filter(|&idx| {
                cg.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
                    && cg
                        .graph
                        .neighbors_directed(idx, Direction::Outgoing)
                        .next()
                        .is_none()
            })
            .count();

        let max_in_degree = cg
            .graph
            .node_identifiers()
            .map(|idx| cg.graph.neighbors_directed(idx, Direction::Incoming).count())
            .max()
            .unwrap_or(0);

        let max_out_degree = cg
            .graph
            .node_identifiers()
            .map(|idx| cg.graph.neighbors_directed(idx, Direction::Outgoing).count())
            .max()
            .unwrap_or(0);

        Self {
            node_count,
            edge_count,
            infected_count,
            density: compute_density(node_count, edge_count),
            average_path_length: average_path_length(cg),
            clustering_coefficient: average_clustering(cg),
            weakly_connected_component_count: connected_components(&cg.graph),
            isolated_node_count,
            max_in_degree,
            max_out_degree,
        }
    }

    /// Return `true` if the graph has no contact edges.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.edge_count == 0
    }
}

// ---------------------------------------------------------------------------
// Internal helpers (cast precision suppressed at function scope)
// ---------------------------------------------------------------------------

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64;
    edge_count as f64 / max_edges
}

/// Mean shortest-path length over all ordered pairs, via BFS from every
/// source. Any unreachable pair makes the mean undefined — NaN, not an
/// error — so callers can report it without guarding.
#[allow(clippy::cast_precision_loss)]
fn average_path_length(cg: &ContactGraph) -> f64 {
    let n = cg.graph.node_count();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return 0.0;
    }

    let mut total: u64 = 0;

    for source in cg.graph.node_identifiers() {
        let mut dist = vec![u64::MAX; n];
        dist[source.index()] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(source);

        let mut reached = 1usize;
        while let Some(v) = queue.pop_front() {
            for w in cg.graph.neighbors_directed(v, Direction::Outgoing) {
                if dist[w.index()] == u64::MAX {
                    dist[w.index()] = dist[v.index()] + 1;
                    total += dist[w.index()];
                    reached += 1;
                    queue.push_back(w);
                }
            }
        }

        if reached < n {
            return f64::NAN;
        }
    }

    total as f64 / (n * (n - 1)) as f64
}

/// Average local clustering coefficient on the undirected projection.
#[allow(clippy::cast_precision_loss)]
fn average_clustering(cg: &ContactGraph) -> f64 {
    let n = cg.graph.node_count();
    if n == 0 {
        return 0.0;
    }

    // Undirected neighbor sets, self-loops excluded.
    let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); n];
    for idx in cg.graph.node_identifiers() {
        let i = idx.index();
        let mut set: Vec<usize> = cg
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .chain(cg.graph.neighbors_directed(idx, Direction::Incoming))
            .map(petgraph::graph::NodeIndex::index)
            .filter(|&j| j != i)
            .collect();
        set.sort_unstable();
        set.dedup();
        neighbors[i] = set;
    }

    let mut sum = 0.0;
    for set in &neighbors {
        let k = set.len();
        if k < 2 {
            continue;
        }

        let mut links = 0usize;
        for (pos, &u) in set.iter().enumerate() {
            for &w in &set[pos + 1..] {
                if neighbors[u].binary_search(&w).is_ok() {
                    links += 1;
                }
            }
        }

        sum += (2 * links) as f64 / (k * (k - 1)) as f64;
    }

    sum / n as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_support::build_graph;

    #[test]
    fn empty_graph_stats() {
        let cg = build_graph(&[], &[]);
        let stats = GraphStats::from_graph(&cg);

        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.edge_count, 0);
        assert!((stats.density - 0.0).abs() < f64::EPSILON);
        assert!(stats.average_path_length.is_nan());
        assert!((stats.clustering_coefficient - 0.0).abs() < f64::EPSILON);
        assert_eq!(stats.weakly_connected_component_count, 0);
        assert!(stats.is_flat());
    }

    #[test]
    fn single_node_stats() {
        let cg = build_graph(&["a"], &[]);
        let stats = GraphStats::from_graph(&cg);

        assert_eq!(stats.node_count, 1);
        assert!((stats.density - 0.0).abs() < f64::EPSILON);
        assert!((stats.average_path_length - 0.0).abs() < f64::EPSILON);
        assert_eq!(stats.isolated_node_count, 1);
    }

    #[test]
    fn density_two_nodes_one_edge() {
        let cg = build_graph(&["a", "b"], &[("a", "b")]);
        let stats = GraphStats::from_graph(&cg);
        assert!((stats.density - 0.5).abs() < 1e-10);
    }

    #[test]
    fn no_contacts_gives_nan_path_length_and_zero_clustering() {
        let cg = build_graph(&["a", "b", "c"], &[]);
        let stats = GraphStats::from_graph(&cg);

        assert!((stats.density - 0.0).abs() < f64::EPSILON);
        assert!(stats.average_path_length.is_nan());
        assert!((stats.clustering_coefficient - 0.0).abs() < f64::EPSILON);
        assert_eq!(stats.isolated_node_count, 3);
        assert_eq!(stats.weakly_connected_component_count, 3);
    }

    #[test]
    fn directed_cycle_is_strongly_connected() {
        // a → b → c → a: every ordered pair reachable.
        // Distances: 1 + 2 per source, 3 sources → 9 / 6 = 1.5.
        let cg = build_graph(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        let stats = GraphStats::from_graph(&cg);

        assert!((stats.average_path_length - 1.5).abs() < 1e-10);
    }

    #[test]
    fn chain_is_not_strongly_connected() {
        // a → b → c: c cannot reach a.
        let cg = build_graph(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        let stats = GraphStats::from_graph(&cg);

        assert!(stats.average_path_length.is_nan());
    }

    #[test]
    fn two_node_mutual_pair_path_length_one() {
        let cg = build_graph(&["a", "b"], &[("a", "b"), ("b", "a")]);
        let stats = GraphStats::from_graph(&cg);

        assert!((stats.average_path_length - 1.0).abs() < 1e-10);
        assert!((stats.density - 1.0).abs() < 1e-10);
    }

    #[test]
    fn triangle_clustering_is_one() {
        // Undirected projection of a directed triangle is a complete
        // 3-clique: every node's neighborhood is fully linked.
        let cg = build_graph(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        let stats = GraphStats::from_graph(&cg);

        assert!((stats.clustering_coefficient - 1.0).abs() < 1e-10);
    }

    #[test]
    fn star_clustering_is_zero() {
        // Hub with three leaves: no links among any neighborhood.
        let cg = build_graph(
            &["hub", "x", "y", "z"],
            &[("hub", "x"), ("hub", "y"), ("hub", "z")],
        );
        let stats = GraphStats::from_graph(&cg);

        assert!((stats.clustering_coefficient - 0.0).abs() < f64::EPSILON);
        assert_eq!(stats.max_out_degree, 3);
        assert_eq!(stats.max_in_degree, 1);
    }

    #[test]
    fn partial_triangle_clustering() {
        // Undirected projection: a-b, a-c, b-c, a-d. Node a has neighbors
        // {b, c, d}: 1 link of 3 possible → 1/3. b and c: 1 of 1 → 1.0.
        // d has a single neighbor → 0. Average = (1/3 + 1 + 1 + 0) / 4.
        let cg = build_graph(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("a", "c"), ("b", "c"), ("a", "d")],
        );
        let stats = GraphStats::from_graph(&cg);

        let expected = (1.0 / 3.0 + 1.0 + 1.0) / 4.0;
        assert!(
            (stats.clustering_coefficient - expected).abs() < 1e-10,
            "got {}",
            stats.clustering_coefficient
        );
    }

    #[test]
    fn infected_count_from_flags() {
        let cg = crate::graph::test_support::build_graph_infected(
            &[("a", true), ("b", false), ("c", true)],
            &[],
        );
        let stats = GraphStats::from_graph(&cg);
        assert_eq!(stats.infected_count, 2);
    }
}
