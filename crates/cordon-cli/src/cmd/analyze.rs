//! `cdn analyze` — the full pipeline, with CSV artifacts.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use cordon_graph::evaluate::{evaluate, EvaluationReport};
use cordon_graph::metrics::ranking::{rank_super_spreaders, DEFAULT_TOP_K};
use cordon_graph::spread::{
    infection_iterations, initially_infected, secondary_infected, DEFAULT_DEPTH,
};

use crate::cmd::{load_graph, InputArgs};
use crate::export;
use crate::output::{pretty_kv, pretty_section, render, OutputMode};

/// Arguments for `cdn analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Directory for the four CSV artifacts (created if missing).
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Number of ranked users flagged as super-spreaders.
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,

    /// Propagation bound in hops for the spread labeling.
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    pub depth: u32,
}

/// Report payload for `cdn analyze`.
#[derive(Debug, Serialize)]
pub struct AnalyzeSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub content_hash: String,
    pub negative_duration_count: usize,
    pub initially_infected: usize,
    pub secondary_infected: usize,
    pub labeled_nodes: usize,
    pub out_dir: String,
    pub metrics: EvaluationReport,
}

/// Execute `cdn analyze`.
pub fn run_analyze(args: &AnalyzeArgs, output: OutputMode, quiet: bool) -> anyhow::Result<()> {
    let (users, graph, load_report) = load_graph(&args.input)?;

    if load_report.negative_duration_count > 0 {
        warn!(
            count = load_report.negative_duration_count,
            "contact events with negative duration were kept — check the contact log"
        );
    }

    let spreaders = rank_super_spreaders(&graph, args.top_k);
    let labels = infection_iterations(&graph, args.depth);
    let initial = initially_infected(&graph);
    let secondary = secondary_infected(&graph);
    let metrics = evaluate(&graph, &spreaders, &initial, &secondary);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create output directory {}", args.out_dir.display()))?;

    export::write_initially_infected(
        &args.out_dir.join("initially_infected_users.csv"),
        &users,
    )?;
    export::write_super_spreaders(&args.out_dir.join("super_spreaders.csv"), &spreaders)?;
    export::write_secondary_infected(
        &args.out_dir.join("secondary_infected_users.csv"),
        &users,
        &secondary,
    )?;
    export::write_metrics(&args.out_dir.join("evaluation_metrics.csv"), &metrics)?;

    info!(
        out_dir = %args.out_dir.display(),
        artifacts = export::ARTIFACT_FILES.len(),
        "analysis artifacts written"
    );

    if quiet {
        return Ok(());
    }

    let summary = AnalyzeSummary {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        content_hash: graph.content_hash.clone(),
        negative_duration_count: load_report.negative_duration_count,
        initially_infected: initial.len(),
        secondary_infected: secondary.len(),
        labeled_nodes: labels.len(),
        out_dir: args.out_dir.display().to_string(),
        metrics,
    };
    render(output, &summary, render_summary_text, render_summary_pretty)
}

fn render_summary_text(summary: &AnalyzeSummary, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "nodes  {}", summary.node_count)?;
    writeln!(w, "edges  {}", summary.edge_count)?;
    writeln!(w, "initially_infected  {}", summary.initially_infected)?;
    writeln!(w, "secondary_infected  {}", summary.secondary_infected)?;
    writeln!(w, "labeled_nodes  {}", summary.labeled_nodes)?;
    if summary.negative_duration_count > 0 {
        writeln!(w, "negative_duration  {}", summary.negative_duration_count)?;
    }
    for (metric, value) in summary.metrics.rows() {
        writeln!(w, "{metric}  {value:.6}")?;
    }
    writeln!(w, "out_dir  {}", summary.out_dir)
}

fn render_summary_pretty(summary: &AnalyzeSummary, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Transmission graph")?;
    pretty_kv(w, "Nodes", summary.node_count.to_string())?;
    pretty_kv(w, "Edges", summary.edge_count.to_string())?;
    pretty_kv(w, "Topology fingerprint", &summary.content_hash)?;
    pretty_kv(
        w,
        "Initially infected",
        summary.initially_infected.to_string(),
    )?;
    pretty_kv(
        w,
        "Secondary infected (1-hop)",
        summary.secondary_infected.to_string(),
    )?;
    pretty_kv(w, "Labeled nodes", summary.labeled_nodes.to_string())?;
    if summary.negative_duration_count > 0 {
        pretty_kv(
            w,
            "Negative-duration events",
            summary.negative_duration_count.to_string(),
        )?;
    }

    writeln!(w)?;
    pretty_section(w, "Evaluation metrics")?;
    for (metric, value) in summary.metrics.rows() {
        pretty_kv(w, metric, format!("{value:.6}"))?;
    }

    writeln!(w)?;
    writeln!(w, "artifacts written to {}", summary.out_dir)
}
