//! Shared graph fixtures for unit tests.

use chrono::NaiveDate;

use cordon_core::model::{ContactEvent, User};

use crate::graph::build::ContactGraph;

/// Build a graph from node ids (all non-infected) and directed edges.
pub fn build_graph(nodes: &[&str], edges: &[(&str, &str)]) -> ContactGraph {
    let flagged: Vec<(&str, bool)> = nodes.iter().map(|id| (*id, false)).collect();
    build_graph_infected(&flagged, edges)
}

/// Build a graph from `(id, infected)` nodes and directed edges.
///
/// Every edge endpoint must appear in `nodes` — fixtures mirror the
/// builder's unknown-user rejection.
pub fn build_graph_infected(nodes: &[(&str, bool)], edges: &[(&str, &str)]) -> ContactGraph {
    let users: Vec<User> = nodes
        .iter()
        .map(|(id, infected)| User {
            id: (*id).to_string(),
            first_name: (*id).to_uppercase(),
            last_name: "Test".to_string(),
            infected: *infected,
            date_diagnosis: None,
        })
        .collect();

    let day = NaiveDate::from_ymd_opt(2021, 3, 5).expect("valid date");
    let contacts: Vec<ContactEvent> = edges
        .iter()
        .map(|(from, to)| ContactEvent {
            reporting_user: (*from).to_string(),
            contact_user: (*to).to_string(),
            contact_start: day.and_hms_opt(10, 0, 0).expect("valid time"),
            contact_end: day.and_hms_opt(10, 30, 0).expect("valid time"),
        })
        .collect();

    ContactGraph::from_records(&users, &contacts).expect("valid fixture")
}
