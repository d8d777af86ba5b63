//! Transmission graph module.
//!
//! # Overview
//!
//! This module constructs a petgraph-based directed contact graph from the
//! loaded user and contact tables. The graph feeds every analytic stage:
//! centrality metrics, infection propagation, and the evaluation engine.
//!
//! ## Pipeline
//!
//! ```text
//! Vec<User> + Vec<ContactEvent>
//!        ↓  build::ContactGraph::from_records()
//! ContactGraph (DiGraph, one edge per ordered contact pair)
//!        ↓  stats::GraphStats::from_graph()
//! GraphStats (density, path length, clustering, …)
//! ```
//!
//! ## Determinism
//!
//! [`ContactGraph::content_hash`] is a BLAKE3 hash of the sorted edge-pair
//! set — a stable fingerprint of the contact topology that can be recorded
//! alongside output artifacts to tie them to their input.

pub mod build;
pub mod stats;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export primary types at module level for convenience.
pub use build::{ContactEdge, ContactGraph, ContactNode};
pub use stats::GraphStats;
