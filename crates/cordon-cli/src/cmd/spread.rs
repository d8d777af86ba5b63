//! `cdn spread` — infection-iteration labels.

use std::io::Write;

use clap::Args;
use serde::Serialize;

use cordon_graph::graph::build::ContactGraph;
use cordon_graph::spread::{infection_iterations, DEFAULT_DEPTH};

use crate::cmd::{load_graph, InputArgs};
use crate::output::{pretty_section, render, OutputMode};

/// Arguments for `cdn spread`.
#[derive(Args, Debug)]
pub struct SpreadArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Propagation bound in hops from the initially-infected set.
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    pub depth: u32,
}

/// Report payload for `cdn spread`.
#[derive(Debug, Serialize)]
pub struct SpreadReport {
    pub depth: u32,
    pub labeled: usize,
    pub rows: Vec<SpreadRow>,
}

/// One labeled node: a user reached within the propagation bound.
#[derive(Debug, Serialize)]
pub struct SpreadRow {
    pub id: String,
    pub label: String,
    pub iteration: u32,
}

/// Execute `cdn spread`.
pub fn run_spread(args: &SpreadArgs, output: OutputMode) -> anyhow::Result<()> {
    let (_users, graph, _report) = load_graph(&args.input)?;
    let labels = infection_iterations(&graph, args.depth);

    let mut rows: Vec<SpreadRow> = labels
        .iter()
        .map(|(id, &iteration)| SpreadRow {
            id: id.clone(),
            label: node_label(&graph, id),
            iteration,
        })
        .collect();
    rows.sort_by(|a, b| a.iteration.cmp(&b.iteration).then_with(|| a.id.cmp(&b.id)));

    let report = SpreadReport {
        depth: args.depth,
        labeled: rows.len(),
        rows,
    };
    render(output, &report, render_spread_text, render_spread_pretty)
}

fn node_label(graph: &ContactGraph, id: &str) -> String {
    graph
        .node_index(id)
        .and_then(|idx| graph.node(idx))
        .map(|node| node.label.clone())
        .unwrap_or_default()
}

fn render_spread_text(report: &SpreadReport, w: &mut dyn Write) -> std::io::Result<()> {
    for row in &report.rows {
        writeln!(w, "{}\t{}\t{}", row.iteration, row.id, row.label)?;
    }
    Ok(())
}

fn render_spread_pretty(report: &SpreadReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(
        w,
        &format!("Infection iterations (depth {})", report.depth),
    )?;
    if report.rows.is_empty() {
        return writeln!(w, "no infected users in the ground truth");
    }

    let mut current: Option<u32> = None;
    for row in &report.rows {
        if current != Some(row.iteration) {
            writeln!(w, "iteration {}:", row.iteration)?;
            current = Some(row.iteration);
        }
        writeln!(w, "  {}  {}", row.id, row.label)?;
    }
    writeln!(w, "\n{} users labeled", report.labeled)
}
