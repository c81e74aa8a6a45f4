#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use centra_core::config::{self, AnalysisConfig};
use centra_core::timing;
use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "centra",
    author,
    version,
    about = "centra: centrality rankings for undirected edge-list graphs",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit command timing report to stderr.
    #[arg(long, global = true)]
    timing: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Configuration file (default: ./centra.toml if present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    const fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }

    fn load_config(&self) -> anyhow::Result<AnalysisConfig> {
        match self.config {
            Some(ref path) => config::load_config(path)
                .with_context(|| format!("loading {}", path.display())),
            None => {
                let cwd = env::current_dir()?;
                Ok(config::discover_config(&cwd)?)
            }
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Analysis",
        about = "Compute centrality rankings",
        long_about = "Load an edge list once, run closeness, betweenness and/or PageRank, and write one ranking file per measure.",
        after_help = "EXAMPLES:\n    # All three measures into ./centralities\n    centra rank facebook.elist\n\n    # Personalized PageRank biased toward ids divisible by 4\n    centra rank amazon.elist -m pagerank --prefer-modulo 4\n\n    # Space-separated input, custom output directory\n    centra rank graph.txt --separator space --out-dir out"
    )]
    Rank(cmd::rank::RankArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Summarize graph structure",
        long_about = "Print node and edge counts, degrees, sampled diameters, components and clustering.",
        after_help = "EXAMPLES:\n    # Default samples (10, 100, 1000 BFS sources)\n    centra stats facebook.elist\n\n    # Count degree-7 nodes with a fixed seed\n    centra stats facebook.elist --degree 7 --seed 42\n\n    # Emit machine-readable output\n    centra stats facebook.elist --json"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        next_help_heading = "Checks",
        about = "Compare two rankings",
        long_about = "Report how many of the top entries two ranking files share.",
        after_help = "EXAMPLES:\n    # Compare the top 100 against a reference ranking\n    centra overlap centralities/pagerank.txt reference/pagerank.txt\n\n    # Compare the top 20\n    centra overlap ours.txt theirs.txt --top 20"
    )]
    Overlap(cmd::overlap::OverlapArgs),

    #[command(
        next_help_heading = "Data",
        about = "Extract an induced subgraph",
        long_about = "Keep the nodes whose id matches `id mod M == R` (or the others with --exclude) and the edges between them.",
        after_help = "EXAMPLES:\n    # Nodes divisible by 4\n    centra subgraph com-amazon.ungraph.txt amazon.elist --modulo 4\n\n    # Drop nodes divisible by 5 from a space-separated file\n    centra subgraph facebook_combined.txt facebook.elist --modulo 5 --exclude -s space"
    )]
    Subgraph(cmd::subgraph::SubgraphArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completions",
        long_about = "Generate a shell completion script for centra.",
        after_help = "EXAMPLES:\n    # Bash\n    centra completions bash > ~/.local/share/bash-completion/completions/centra\n\n    # Fish, straight to a file\n    centra completions fish -o ~/.config/fish/completions/centra.fish"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("CENTRA_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "centra=debug,info"
        } else if verbose {
            "centra=info,warn"
        } else {
            "warn"
        })
    });

    let format = env::var("CENTRA_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let timing_enabled = cli.timing || timing::timing_enabled_from_env();
    timing::set_timing_enabled(timing_enabled);
    timing::clear_timings();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();

    let command_result = match cli.command {
        Commands::Completions(ref args) => timing::timed("cmd.completions", || {
            let mut command = Cli::command();
            cmd::completions::run_completions(args, &mut command)
        }),
        Commands::Overlap(ref args) => {
            timing::timed("cmd.overlap", || cmd::overlap::run_overlap(args, output))
        }
        ref command => cli.load_config().and_then(|config| match command {
            Commands::Rank(args) => {
                timing::timed("cmd.rank", || cmd::rank::run_rank(args, &config, output))
            }
            Commands::Stats(args) => {
                timing::timed("cmd.stats", || cmd::stats::run_stats(args, &config, output))
            }
            Commands::Subgraph(args) => timing::timed("cmd.subgraph", || {
                cmd::subgraph::run_subgraph(args, &config, output)
            }),
            Commands::Overlap(_) | Commands::Completions(_) => Ok(()),
        }),
    };

    if timing_enabled {
        let report = timing::collect_report();
        if report.is_empty() {
            eprintln!("timing report: no samples recorded");
        } else {
            eprintln!("timing report:");
            eprintln!("{}", report.display_table());
            eprintln!("timing report (json):");
            eprintln!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if let Err(ref err) = command_result {
        output::render_error(output, &CliError::from(err))?;
        std::process::exit(1);
    }
    Ok(())
}
