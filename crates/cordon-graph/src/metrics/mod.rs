//! Centrality metrics over the transmission graph.
//!
//! # Overview
//!
//! Two per-node influence measures feed the super-spreader ranking:
//!
//! - **Out-degree centrality** (`degree`): How many distinct people does
//!   this user report contact with, relative to the population?
//! - **Betweenness centrality** (`betweenness`): How often does this user
//!   sit on shortest contact chains between other pairs — a bridge the
//!   infection must cross?
//!
//! `ranking` combines both into the deterministic super-spreader order:
//! betweenness descending, out-degree descending, then user id ascending.
//!
//! All metrics take a [`crate::graph::ContactGraph`] reference and return
//! scores indexed by user id. The graph is never mutated.

pub mod betweenness;
pub mod degree;
pub mod ranking;

pub use ranking::{rank_super_spreaders, SuperSpreader, DEFAULT_TOP_K};
