use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use centra_core::config::AnalysisConfig;
use centra_core::{Graph, Separator, timing};
use centra_rank::structure::{Spread, StructureReport, structure_report};
use clap::Args;
use serde::Serialize;

use crate::output::{OutputMode, pretty_kv, render};

/// Arguments for `centra stats`.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Edge-list file to load.
    pub input: PathBuf,

    /// Column separator: tab, space, whitespace or a single character.
    #[arg(short, long)]
    pub separator: Option<Separator>,

    /// Seed for diameter sampling (default: `random_seed` from config).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Also report how many nodes have exactly this degree.
    #[arg(long, value_name = "K")]
    pub degree: Option<usize>,

    /// BFS source sample sizes for the diameter estimates.
    #[arg(long, value_delimiter = ',', default_value = "10,100,1000")]
    pub samples: Vec<usize>,
}

#[derive(Debug, Serialize)]
struct StatsOutput {
    input: PathBuf,
    seed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    degree_count: Option<DegreeCount>,
    #[serde(flatten)]
    report: StructureReport,
}

#[derive(Debug, Serialize)]
struct DegreeCount {
    degree: usize,
    nodes: usize,
}

/// Print the structural summary of a graph.
///
/// # Errors
///
/// Returns an error if the graph cannot be loaded.
pub fn run_stats(args: &StatsArgs, config: &AnalysisConfig, output: OutputMode) -> Result<()> {
    let mut format = config.input.format();
    if let Some(separator) = args.separator {
        format.separator = separator;
    }
    let seed = args.seed.unwrap_or(config.random_seed);

    let graph = timing::timed("graph.load", || Graph::from_edge_list(&args.input, &format))?;
    let report = timing::timed("stats.report", || {
        structure_report(&graph, &args.samples, seed)
    });

    let stats = StatsOutput {
        input: args.input.clone(),
        seed,
        degree_count: args.degree.map(|degree| DegreeCount {
            degree,
            nodes: report.nodes_with_degree(degree),
        }),
        report,
    };

    render(output, &stats, render_stats_human)
}

fn render_stats_human(stats: &StatsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let r = &stats.report;
    pretty_kv(w, "Nodes", r.node_count.to_string())?;
    pretty_kv(w, "Edges", r.edge_count.to_string())?;
    if let Some(ref dc) = stats.degree_count {
        pretty_kv(w, &format!("Nodes with degree {}", dc.degree), dc.nodes.to_string())?;
    }
    let ids: Vec<String> = r.max_degree_nodes.iter().map(ToString::to_string).collect();
    pretty_kv(
        w,
        "Max degree",
        format!("{} (nodes: {})", r.max_degree, ids.join(",")),
    )?;

    for d in &r.diameters {
        pretty_kv(
            w,
            &format!("Diameter ({} samples)", d.sample_size),
            format!("full {}, effective {:.4}", d.full, d.effective),
        )?;
    }
    write_spread(w, "Full diameter mean/var", r.full_diameter)?;
    write_spread(w, "Effective diameter mean/var", r.effective_diameter)?;

    pretty_kv(w, "Connected components", r.component_count.to_string())?;
    pretty_kv(
        w,
        "Largest component fraction",
        format!("{:.4}", r.largest_component_fraction),
    )?;
    pretty_kv(w, "Average clustering", format!("{:.4}", r.average_clustering))?;
    pretty_kv(w, "Triangles", r.triangle_count.to_string())?;
    Ok(())
}

fn write_spread(w: &mut dyn Write, key: &str, spread: Option<Spread>) -> std::io::Result<()> {
    match spread {
        Some(s) => pretty_kv(w, key, format!("{:.4},{:.4}", s.mean, s.variance)),
        None => Ok(()),
    }
}
