#![forbid(unsafe_code)]
//! cordon-graph library: the graph-analytic core.
//!
//! Construction of the directed transmission graph, centrality-based
//! super-spreader ranking, bounded-depth infection propagation, and the
//! evaluation-metric table. Every stage is a pure function of the immutable
//! [`graph::ContactGraph`].
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums per module.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod evaluate;
pub mod graph;
pub mod metrics;
pub mod spread;
