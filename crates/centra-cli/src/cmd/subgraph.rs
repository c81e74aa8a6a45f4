use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use centra_core::config::AnalysisConfig;
use centra_core::edgelist::write_edge_list;
use centra_core::{Graph, NodeId, Separator, timing};
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::output::{OutputMode, pretty_kv, render};

/// Arguments for `centra subgraph`.
#[derive(Args, Debug)]
pub struct SubgraphArgs {
    /// Edge-list file to sample from.
    pub input: PathBuf,

    /// Edge-list file to write.
    pub output: PathBuf,

    /// Select nodes by `id mod M`.
    #[arg(long, value_name = "M")]
    pub modulo: NodeId,

    /// Residue selected by the modulus.
    #[arg(long, value_name = "R", default_value_t = 0)]
    pub remainder: NodeId,

    /// Keep the nodes that do NOT match instead.
    #[arg(long)]
    pub exclude: bool,

    /// Column separator of the input: tab, space, whitespace or a single character.
    #[arg(short, long)]
    pub separator: Option<Separator>,

    /// Separator written to the output (default: the input separator).
    #[arg(long)]
    pub output_separator: Option<Separator>,
}

impl SubgraphArgs {
    /// The modulus must be positive and the remainder one of its residues,
    /// otherwise no node could ever be selected.
    fn validate(&self) -> Result<()> {
        if self.modulo <= 0 {
            bail!("--modulo must be positive, got {}", self.modulo);
        }
        if !(0..self.modulo).contains(&self.remainder) {
            bail!(
                "--remainder must be in 0..{}, got {}",
                self.modulo,
                self.remainder
            );
        }
        Ok(())
    }

    fn keeps(&self, id: NodeId) -> bool {
        (id.rem_euclid(self.modulo) == self.remainder) != self.exclude
    }
}

#[derive(Debug, Serialize)]
struct SubgraphSummary {
    input: PathBuf,
    output: PathBuf,
    nodes: usize,
    edges: usize,
    source_nodes: usize,
    source_edges: usize,
}

/// Write the subgraph induced by the nodes selected with `--modulo`.
///
/// Selected nodes are kept even when none of their edges survive.
///
/// # Errors
///
/// Returns an error if the modulus is not positive, the remainder is not in
/// `0..modulo`, the input cannot be loaded, or the output cannot be written.
pub fn run_subgraph(args: &SubgraphArgs, config: &AnalysisConfig, output: OutputMode) -> Result<()> {
    args.validate()?;

    let mut format = config.input.format();
    if let Some(separator) = args.separator {
        format.separator = separator;
    }
    let graph = timing::timed("graph.load", || Graph::from_edge_list(&args.input, &format))?;
    let sub = timing::timed("subgraph.induce", || graph.induced(|id| args.keeps(id)));

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    write_edge_list(
        BufWriter::new(file),
        &sub,
        args.output_separator.unwrap_or(format.separator),
    )
    .with_context(|| format!("writing {}", args.output.display()))?;

    info!(
        nodes = sub.node_count(),
        edges = sub.edge_count(),
        "subgraph written"
    );

    let summary = SubgraphSummary {
        input: args.input.clone(),
        output: args.output.clone(),
        nodes: sub.node_count(),
        edges: sub.edge_count(),
        source_nodes: graph.node_count(),
        source_edges: graph.edge_count(),
    };
    render(output, &summary, render_subgraph_human)
}

fn render_subgraph_human(s: &SubgraphSummary, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_kv(w, "Wrote", s.output.display().to_string())?;
    pretty_kv(
        w,
        "Nodes",
        format!("{} (of {})", s.nodes, s.source_nodes),
    )?;
    pretty_kv(
        w,
        "Edges",
        format!("{} (of {})", s.edges, s.source_edges),
    )
}
