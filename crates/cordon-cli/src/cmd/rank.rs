//! `cdn rank` — the super-spreader ranking table.

use std::io::Write;

use clap::Args;

use cordon_graph::metrics::ranking::{rank_super_spreaders, SuperSpreader, DEFAULT_TOP_K};

use crate::cmd::{load_graph, InputArgs};
use crate::output::{pretty_section, render, OutputMode};

/// Arguments for `cdn rank`.
#[derive(Args, Debug)]
pub struct RankArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Number of ranked users flagged as super-spreaders.
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,
}

/// Execute `cdn rank`.
pub fn run_rank(args: &RankArgs, output: OutputMode) -> anyhow::Result<()> {
    let (_users, graph, _report) = load_graph(&args.input)?;
    let rows = rank_super_spreaders(&graph, args.top_k);
    render(
        output,
        &rows,
        |rows, w| render_rank_text(rows, w),
        |rows, w| render_rank_pretty(rows, w),
    )
}

fn render_rank_text(rows: &[SuperSpreader], w: &mut dyn Write) -> std::io::Result<()> {
    for row in rows {
        writeln!(
            w,
            "{}\t{}\t{:.6}\t{:.6}",
            row.id, row.label, row.out_degree, row.betweenness
        )?;
    }
    Ok(())
}

fn render_rank_pretty(rows: &[SuperSpreader], w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Super-spreaders (betweenness, then out-degree)")?;
    if rows.is_empty() {
        return writeln!(w, "no users to rank");
    }

    writeln!(
        w,
        "{:<4} {:<12} {:<24} {:>10} {:>12}",
        "#", "Id", "Label", "OutDegree", "Betweenness"
    )?;
    for (position, row) in rows.iter().enumerate() {
        writeln!(
            w,
            "{:<4} {:<12} {:<24} {:>10.6} {:>12.6}",
            position + 1,
            row.id,
            row.label,
            row.out_degree,
            row.betweenness
        )?;
    }
    Ok(())
}
