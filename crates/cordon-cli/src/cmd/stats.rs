//! `cdn stats` — transmission-graph statistics.

use std::io::Write;

use clap::Args;

use cordon_graph::graph::stats::GraphStats;

use crate::cmd::{load_graph, InputArgs};
use crate::output::{pretty_kv, pretty_section, render, OutputMode};

/// Arguments for `cdn stats`.
#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Execute `cdn stats`.
pub fn run_stats(args: &StatsArgs, output: OutputMode) -> anyhow::Result<()> {
    let (_users, graph, _report) = load_graph(&args.input)?;
    let stats = GraphStats::from_graph(&graph);
    render(output, &stats, render_stats_text, render_stats_pretty)
}

fn render_stats_text(stats: &GraphStats, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "nodes  {}", stats.node_count)?;
    writeln!(w, "edges  {}", stats.edge_count)?;
    writeln!(w, "infected  {}", stats.infected_count)?;
    writeln!(w, "density  {:.6}", stats.density)?;
    writeln!(w, "avg_path_length  {:.6}", stats.average_path_length)?;
    writeln!(w, "clustering  {:.6}", stats.clustering_coefficient)?;
    writeln!(w, "components  {}", stats.weakly_connected_component_count)?;
    writeln!(w, "isolated  {}", stats.isolated_node_count)?;
    writeln!(w, "max_in_degree  {}", stats.max_in_degree)?;
    writeln!(w, "max_out_degree  {}", stats.max_out_degree)
}

fn render_stats_pretty(stats: &GraphStats, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Transmission graph")?;
    pretty_kv(w, "Nodes", stats.node_count.to_string())?;
    pretty_kv(w, "Edges", stats.edge_count.to_string())?;
    pretty_kv(w, "Infected users", stats.infected_count.to_string())?;
    pretty_kv(w, "Density", format!("{:.6}", stats.density))?;
    pretty_kv(
        w,
        "Average path length",
        format!("{:.6}", stats.average_path_length),
    )?;
    pretty_kv(
        w,
        "Clustering coefficient",
        format!("{:.6}", stats.clustering_coefficient),
    )?;
    pretty_kv(
        w,
        "Weak components",
        stats.weakly_connected_component_count.to_string(),
    )?;
    pretty_kv(w, "Isolated users", stats.isolated_node_count.to_string())?;
    pretty_kv(w, "Max in-degree", stats.max_in_degree.to_string())?;
    pretty_kv(w, "Max out-degree", stats.max_out_degree.to_string())
}
