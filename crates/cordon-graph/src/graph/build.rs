//! Graph construction from user and contact records.
//!
//! # Overview
//!
//! This module turns the loaded record tables into a [`petgraph`] directed
//! graph suitable for the analytic stages (centrality metrics, infection
//! propagation, evaluation).
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "A reported contact with B". Transmission is
//! modeled along that direction: infection propagates from a node to its
//! successors.
//!
//! ## Duplicate Contact Pairs
//!
//! At most one edge exists per ordered `(reporting, contacted)` pair. When
//! the contact table carries several events for the same pair, the edge
//! attributes reflect the LAST event in input order — a deliberate
//! last-write-wins merge, not an aggregate. Callers must not assume every
//! event survives in the edge attributes.
//!
//! ## Unknown Users
//!
//! A contact event referencing a user id absent from the user table is
//! rejected with [`BuildError::UnknownUser`]. No bare nodes are invented:
//! the node set is exactly the user table, and the evaluation metrics
//! depend on that count.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use chrono::NaiveDateTime;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use tracing::instrument;

use cordon_core::error::ErrorCode;
use cordon_core::model::{ContactEvent, User};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while assembling the transmission graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// A contact event referenced a user id missing from the user table.
    #[error(
        "contact event {index}: unknown user `{user_id}` (pair `{reporting}` → `{contacted}`)"
    )]
    UnknownUser {
        /// Zero-based index of the offending event in the contact table.
        index: usize,
        /// The id that failed to resolve.
        user_id: String,
        reporting: String,
        contacted: String,
    },
}

impl BuildError {
    /// The machine-readable code for this failure.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnknownUser { .. } => ErrorCode::UnknownUser,
        }
    }
}

// ---------------------------------------------------------------------------
// Node and edge weights
// ---------------------------------------------------------------------------

/// Node weight: one registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactNode {
    pub id: String,
    /// Display label (`"{first} {last}"`).
    pub label: String,
    /// Ground-truth diagnosis flag.
    pub infected: bool,
}

/// Edge weight: attributes of the surviving contact event for this pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactEdge {
    /// `(end − start)` in minutes; negative for reversed intervals (kept,
    /// flagged at load time).
    pub duration_minutes: f64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

// ---------------------------------------------------------------------------
// ContactGraph
// ---------------------------------------------------------------------------

/// The directed transmission graph.
///
/// Nodes are users; an edge `A → B` records that A reported contact with B.
/// The graph is read-only after construction: every downstream stage is a
/// pure consumer.
#[derive(Debug)]
pub struct ContactGraph {
    /// Directed graph: node weights carry the infection flag and label.
    pub graph: DiGraph<ContactNode, ContactEdge>,
    /// Mapping from user id to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
    /// BLAKE3 fingerprint of the sorted edge-pair set.
    pub content_hash: String,
}

impl ContactGraph {
    /// Build a [`ContactGraph`] from the loaded record tables.
    ///
    /// Nodes are added in user-table order; edges in contact-table order,
    /// with later events for the same ordered pair overwriting earlier edge
    /// attributes (last-write-wins).
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnknownUser`] for the first contact event whose
    /// endpoints are not both present in the user table.
    #[instrument(skip(users, contacts), fields(users = users.len(), contacts = contacts.len()))]
    pub fn from_records(users: &[User], contacts: &[ContactEvent]) -> Result<Self, BuildError> {
        let mut graph = DiGraph::<ContactNode, ContactEdge>::new();
        let mut node_map: HashMap<String, NodeIndex> = HashMap::with_capacity(users.len());

        for user in users {
            let idx = graph.add_node(ContactNode {
                id: user.id.clone(),
                label: user.display_label(),
                infected: user.infected,
            });
            node_map.insert(user.id.clone(), idx);
        }

        for (index, event) in contacts.iter().enumerate() {
            let from = resolve(&node_map, &event.reporting_user, index, event)?;
            let to = resolve(&node_map, &event.contact_user, index, event)?;

            // update_edge replaces the weight when the edge already exists:
            // this is the last-write-wins merge for repeated contact pairs.
            graph.update_edge(
                from,
                to,
                ContactEdge {
                    duration_minutes: event.duration_minutes(),
                    start: event.contact_start,
                    end: event.contact_end,
                },
            );
        }

        let content_hash = compute_edge_hash(&graph);

        Ok(Self {
            graph,
            node_map,
            content_hash,
        })
    }

    /// Return the number of users (nodes) in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of distinct directed contact pairs (edges).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up the `NodeIndex` for a user id.
    #[must_use]
    pub fn node_index(&self, user_id: &str) -> Option<NodeIndex> {
        self.node_map.get(user_id).copied()
    }

    /// Return the node weight for an index.
    #[must_use]
    pub fn node(&self, idx: NodeIndex) -> Option<&ContactNode> {
        self.graph.node_weight(idx)
    }

    /// Iterate the direct successors (outgoing contacts) of a node.
    pub fn successors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(idx, Direction::Outgoing)
    }

    /// Ids of ground-truth-infected users, ascending.
    #[must_use]
    pub fn infected_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .graph
            .node_weights()
            .filter(|node| node.infected)
            .map(|node| node.id.clone())
            .collect();
        ids.sort_unstable();
        ids
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn resolve(
    node_map: &HashMap<String, NodeIndex>,
    user_id: &str,
    index: usize,
    event: &ContactEvent,
) -> Result<NodeIndex, BuildError> {
    node_map
        .get(user_id)
        .copied()
        .ok_or_else(|| BuildError::UnknownUser {
            index,
            user_id: user_id.to_string(),
            reporting: event.reporting_user.clone(),
            contacted: event.contact_user.clone(),
        })
}

/// Compute a BLAKE3 hash of the sorted edge-pair list.
fn compute_edge_hash(graph: &DiGraph<ContactNode, ContactEdge>) -> String {
    let mut pairs: Vec<(&str, &str)> = graph
        .edge_indices()
        .filter_map(|edge| graph.edge_endpoints(edge))
        .map(|(from, to)| (graph[from].id.as_str(), graph[to].id.as_str()))
        .collect();
    pairs.sort_unstable();

    let mut hasher = blake3::Hasher::new();
    for (from, to) in pairs {
        hasher.update(from.as_bytes());
        hasher.update(b"\x00");
        hasher.update(to.as_bytes());
        hasher.update(b"\x00");
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn user(id: &str, infected: bool) -> User {
        User {
            id: id.to_string(),
            first_name: id.to_uppercase(),
            last_name: "Test".to_string(),
            infected,
            date_diagnosis: None,
        }
    }

    fn contact(from: &str, to: &str, start_minute: u32, end_minute: u32) -> ContactEvent {
        let day = NaiveDate::from_ymd_opt(2021, 3, 5).expect("valid date");
        ContactEvent {
            reporting_user: from.to_string(),
            contact_user: to.to_string(),
            contact_start: day.and_hms_opt(10, start_minute, 0).expect("valid time"),
            contact_end: day.and_hms_opt(10, end_minute, 0).expect("valid time"),
        }
    }

    #[test]
    fn users_without_contacts_are_nodes_only() {
        let users = vec![user("a", false), user("b", true)];
        let graph = ContactGraph::from_records(&users, &[]).expect("build graph");

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.node_index("a").is_some());
        assert_eq!(graph.infected_ids(), vec!["b".to_string()]);
    }

    #[test]
    fn edge_direction_is_reporting_to_contacted() {
        let users = vec![user("a", false), user("b", false)];
        let contacts = vec![contact("a", "b", 0, 30)];
        let graph = ContactGraph::from_records(&users, &contacts).expect("build graph");

        let a = graph.node_index("a").expect("a");
        let b = graph.node_index("b").expect("b");
        assert!(graph.graph.contains_edge(a, b), "expected a → b");
        assert!(!graph.graph.contains_edge(b, a), "no reverse edge");
    }

    #[test]
    fn repeated_pair_keeps_last_event_attributes() {
        let users = vec![user("a", false), user("b", false)];
        let contacts = vec![contact("a", "b", 0, 30), contact("a", "b", 40, 55)];
        let graph = ContactGraph::from_records(&users, &contacts).expect("build graph");

        assert_eq!(graph.edge_count(), 1, "one edge per ordered pair");

        let a = graph.node_index("a").expect("a");
        let b = graph.node_index("b").expect("b");
        let edge = graph.graph.find_edge(a, b).expect("edge a → b");
        let weight = &graph.graph[edge];
        assert!(
            (weight.duration_minutes - 15.0).abs() < f64::EPSILON,
            "attributes reflect the last event, got {}",
            weight.duration_minutes
        );
    }

    #[test]
    fn opposite_directions_are_distinct_edges() {
        let users = vec![user("a", false), user("b", false)];
        let contacts = vec![contact("a", "b", 0, 10), contact("b", "a", 20, 30)];
        let graph = ContactGraph::from_records(&users, &contacts).expect("build graph");

        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn unknown_user_rejected_with_event_index() {
        let users = vec![user("a", false)];
        let contacts = vec![contact("a", "ghost", 0, 10)];
        let err = ContactGraph::from_records(&users, &contacts).expect_err("unknown user");

        assert_eq!(err.error_code().code(), "E2101");
        match err {
            BuildError::UnknownUser { index, user_id, .. } => {
                assert_eq!(index, 0);
                assert_eq!(user_id, "ghost");
            }
        }
    }

    #[test]
    fn content_hash_changes_with_edges() {
        let users = vec![user("a", false), user("b", false)];

        let empty = ContactGraph::from_records(&users, &[]).expect("build graph");
        let with_edge = ContactGraph::from_records(&users, &[contact("a", "b", 0, 10)])
            .expect("build graph");

        assert!(empty.content_hash.starts_with("blake3:"));
        assert_ne!(empty.content_hash, with_edge.content_hash);
    }

    #[test]
    fn content_hash_ignores_contact_order() {
        let users = vec![user("a", false), user("b", false), user("c", false)];
        let forward = vec![contact("a", "b", 0, 10), contact("b", "c", 20, 30)];
        let reversed = vec![contact("b", "c", 20, 30), contact("a", "b", 0, 10)];

        let lhs = ContactGraph::from_records(&users, &forward).expect("build graph");
        let rhs = ContactGraph::from_records(&users, &reversed).expect("build graph");
        assert_eq!(lhs.content_hash, rhs.content_hash);
    }

    #[test]
    fn self_contact_is_a_self_loop() {
        let users = vec![user("a", false)];
        let contacts = vec![contact("a", "a", 0, 5)];
        let graph = ContactGraph::from_records(&users, &contacts).expect("build graph");

        assert_eq!(graph.edge_count(), 1);
        let a = graph.node_index("a").expect("a");
        assert!(graph.graph.contains_edge(a, a));
    }
}
