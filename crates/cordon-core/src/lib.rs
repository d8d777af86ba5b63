#![forbid(unsafe_code)]
//! cordon-core library: user/contact record model and CSV ingestion.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums per module; callers compose them
//!   with `anyhow::Result` at pipeline boundaries.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod error;
pub mod model;
pub mod records;
