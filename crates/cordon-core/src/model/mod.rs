//! Immutable record types for a single analysis run.
//!
//! Users and contact events are loaded once (see [`crate::records`]) and
//! treated as read-only inputs by every downstream component. Derived
//! entities (the transmission graph, rankings, labels) hold no identity
//! across runs.

pub mod contact;
pub mod user;

pub use contact::ContactEvent;
pub use user::User;
