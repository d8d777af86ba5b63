#![forbid(unsafe_code)]

mod cmd;
mod export;
mod output;

use std::env;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cordon_core::records::LoadError;
use cordon_graph::graph::build::BuildError;
use output::{render_error, resolve_output_mode, CliError, OutputMode};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "cordon: contact-tracing transmission graph analyzer",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format (default: pretty on a TTY, text when piped).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (alias for --format json).
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags, environment, and TTY state.
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Run the full analysis and write the CSV artifacts",
        long_about = "Build the transmission graph, rank super-spreaders, propagate \
                      infection labels, evaluate the ranking, and write the four CSV artifacts.",
        after_help = "EXAMPLES:\n    # Full analysis into ./report\n    cdn analyze --users users.csv --contacts contacts.csv --out-dir report\n\n    # Wider selection, deeper labeling\n    cdn analyze --users users.csv --contacts contacts.csv --top-k 50 --depth 3\n\n    # Emit machine-readable output\n    cdn analyze --users users.csv --contacts contacts.csv --json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        about = "Show transmission-graph statistics",
        after_help = "EXAMPLES:\n    # Structural statistics\n    cdn stats --users users.csv --contacts contacts.csv\n\n    # Emit machine-readable output\n    cdn stats --users users.csv --contacts contacts.csv --json"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        about = "Show the super-spreader ranking",
        after_help = "EXAMPLES:\n    # Top 20 by betweenness, then out-degree\n    cdn rank --users users.csv --contacts contacts.csv\n\n    # Full ranking\n    cdn rank --users users.csv --contacts contacts.csv --top-k 1000000"
    )]
    Rank(cmd::rank::RankArgs),

    #[command(
        about = "Show infection-iteration labels",
        after_help = "EXAMPLES:\n    # Two-hop labeling from the infected set\n    cdn spread --users users.csv --contacts contacts.csv\n\n    # Deeper propagation\n    cdn spread --users users.csv --contacts contacts.csv --depth 4"
    )]
    Spread(cmd::spread::SpreadArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CORDON_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "cordon=debug,info"
        } else {
            "cordon=info,warn"
        })
    });

    let format = env::var("CORDON_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

/// Map typed pipeline errors to structured CLI errors with codes and hints.
fn structured_error(err: &anyhow::Error) -> CliError {
    if let Some(load) = err.root_cause().downcast_ref::<LoadError>() {
        let code = load.error_code();
        return CliError::with_details(
            load.to_string(),
            code.hint().unwrap_or(code.message()),
            code.code(),
        );
    }
    if let Some(build) = err.root_cause().downcast_ref::<BuildError>() {
        let code = build.error_code();
        return CliError::with_details(
            build.to_string(),
            code.hint().unwrap_or(code.message()),
            code.code(),
        );
    }
    CliError::new(format!("{err:#}"))
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let output = cli.output_mode();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let result = match cli.command {
        Commands::Analyze(ref args) => cmd::analyze::run_analyze(args, output, cli.quiet),
        Commands::Stats(ref args) => cmd::stats::run_stats(args, output),
        Commands::Rank(ref args) => cmd::rank::run_rank(args, output),
        Commands::Spread(ref args) => cmd::spread::run_spread(args, output),
    };

    if let Err(err) = result {
        // Rendering the error is best-effort; the exit code carries the failure.
        let _ = render_error(output, &structured_error(&err));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_sets_output_mode() {
        let cli = Cli::parse_from([
            "cdn", "--json", "stats", "--users", "u.csv", "--contacts", "c.csv",
        ]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from([
            "cdn", "stats", "--users", "u.csv", "--contacts", "c.csv", "--json",
        ]);
        assert!(cli.json);
    }

    #[test]
    fn format_flag_parses() {
        let cli = Cli::parse_from([
            "cdn",
            "--format",
            "json",
            "rank",
            "--users",
            "u.csv",
            "--contacts",
            "c.csv",
        ]);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn quiet_flag_parsed() {
        let cli = Cli::parse_from([
            "cdn", "-q", "analyze", "--users", "u.csv", "--contacts", "c.csv",
        ]);
        assert!(cli.quiet);
    }

    #[test]
    fn analyze_defaults() {
        let cli = Cli::parse_from([
            "cdn", "analyze", "--users", "u.csv", "--contacts", "c.csv",
        ]);
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.top_k, 20);
                assert_eq!(args.depth, 2);
                assert_eq!(args.out_dir, std::path::PathBuf::from("."));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn spread_depth_override() {
        let cli = Cli::parse_from([
            "cdn", "spread", "--users", "u.csv", "--contacts", "c.csv", "--depth", "4",
        ]);
        match cli.command {
            Commands::Spread(args) => assert_eq!(args.depth, 4),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn structured_error_surfaces_load_code() {
        let err = anyhow::Error::new(LoadError::MissingField {
            row: 7,
            field: "user_id",
        });
        let cli_error = structured_error(&err);
        assert_eq!(cli_error.error_code.as_deref(), Some("E1101"));
        assert!(cli_error.message.contains("row 7"));
    }

    #[test]
    fn structured_error_passes_through_generic() {
        let err = anyhow::anyhow!("something else");
        let cli_error = structured_error(&err);
        assert!(cli_error.error_code.is_none());
    }
}
