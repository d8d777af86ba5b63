//! Subcommand handlers for the `cdn` binary.
//!
//! Every handler follows the same shape: load the two input tables, build
//! the transmission graph, run the relevant analytic stage, and hand the
//! payload to the shared output layer.

pub mod analyze;
pub mod rank;
pub mod spread;
pub mod stats;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;

use cordon_core::model::User;
use cordon_core::records::{self, LoadReport};
use cordon_graph::graph::build::ContactGraph;

/// Input tables shared by every subcommand.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Path to the user table (users.csv).
    #[arg(long, value_name = "PATH")]
    pub users: PathBuf,

    /// Path to the contact table (contacts.csv).
    #[arg(long, value_name = "PATH")]
    pub contacts: PathBuf,
}

/// Load both tables and build the transmission graph.
///
/// The returned [`LoadReport`] carries the negative-duration count so
/// callers can surface the data-quality condition.
pub fn load_graph(input: &InputArgs) -> Result<(Vec<User>, ContactGraph, LoadReport)> {
    let users = records::load_users(&input.users)
        .with_context(|| format!("failed to load user table {}", input.users.display()))?;
    let (contacts, report) = records::load_contacts(&input.contacts)
        .with_context(|| format!("failed to load contact table {}", input.contacts.display()))?;
    let graph = ContactGraph::from_records(&users, &contacts)
        .context("failed to build transmission graph")?;
    Ok((users, graph, report))
}
