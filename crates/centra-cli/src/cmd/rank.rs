use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use centra_core::config::{AnalysisConfig, PageRankSettings};
use centra_core::{Graph, NodeId, Separator, timing};
use centra_rank::betweenness::betweenness_centrality;
use centra_rank::closeness::closeness_centrality;
use centra_rank::pagerank::pagerank;
use centra_rank::sink::{rank, write_ranking_file};
use centra_rank::{Measure, PageRankConfig, Personalization, Termination};
use clap::{Args, ValueEnum};
use serde::Serialize;
use tracing::info;

use crate::output::{OutputMode, pretty_kv, render};

/// Measures selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MeasureChoice {
    Closeness,
    Betweenness,
    Pagerank,
    All,
}

impl MeasureChoice {
    const fn measures(self) -> &'static [Measure] {
        match self {
            Self::Closeness => &[Measure::Closeness],
            Self::Betweenness => &[Measure::Betweenness],
            Self::Pagerank => &[Measure::PageRank],
            Self::All => &Measure::ALL,
        }
    }
}

/// Arguments for `centra rank`.
#[derive(Args, Debug)]
pub struct RankArgs {
    /// Edge-list file to load.
    pub input: PathBuf,

    /// Measure to compute; repeat for several.
    #[arg(short, long, value_enum, default_value = "all")]
    pub measure: Vec<MeasureChoice>,

    /// Column separator: tab, space, whitespace or a single character.
    #[arg(short, long)]
    pub separator: Option<Separator>,

    /// Directory the ranking files are written to.
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// PageRank damping factor.
    #[arg(long)]
    pub alpha: Option<f64>,

    /// PageRank iteration cap.
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// PageRank per-node convergence tolerance.
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Bias PageRank toward nodes whose id is a multiple of M.
    #[arg(long, value_name = "M")]
    pub prefer_modulo: Option<NodeId>,

    /// Bias PageRank toward these node ids.
    #[arg(long, value_name = "ID", num_args = 1..)]
    pub prefer: Vec<NodeId>,
}

impl RankArgs {
    fn selected(&self) -> BTreeSet<Measure> {
        self.measure
            .iter()
            .flat_map(|choice| choice.measures().iter().copied())
            .collect()
    }

    /// Config file values with command-line overrides applied.
    fn pagerank_settings(&self, config: &AnalysisConfig) -> PageRankSettings {
        let mut settings = config.pagerank.clone();
        if let Some(alpha) = self.alpha {
            settings.alpha = alpha;
        }
        if let Some(max_iterations) = self.max_iterations {
            settings.max_iterations = max_iterations;
        }
        if let Some(tolerance) = self.tolerance {
            settings.tolerance = tolerance;
        }
        if self.prefer_modulo.is_some() {
            settings.preference_modulo = self.prefer_modulo;
        }
        if !self.prefer.is_empty() {
            settings.preference.clone_from(&self.prefer);
        }
        settings
    }
}

#[derive(Debug, Serialize)]
struct RankSummary {
    input: PathBuf,
    nodes: usize,
    edges: usize,
    outputs: Vec<MeasureOutput>,
}

#[derive(Debug, Serialize)]
struct MeasureOutput {
    measure: Measure,
    file: PathBuf,
    /// Highest-ranked node and its score.
    top: Option<(NodeId, f64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagerank: Option<PageRankRun>,
}

#[derive(Debug, Serialize)]
struct PageRankRun {
    iterations: usize,
    termination: Termination,
    last_error: f64,
    preferred_nodes: Option<usize>,
}

/// Load the graph once, run the selected engines and write one ranking per
/// measure.
///
/// # Errors
///
/// Returns an error if the graph cannot be loaded, a PageRank parameter is
/// invalid, or a ranking file cannot be written.
pub fn run_rank(args: &RankArgs, config: &AnalysisConfig, output: OutputMode) -> Result<()> {
    let mut format = config.input.format();
    if let Some(separator) = args.separator {
        format.separator = separator;
    }
    let out_dir = args.out_dir.clone().unwrap_or_else(|| config.output.dir.clone());

    let graph = timing::timed("graph.load", || Graph::from_edge_list(&args.input, &format))?;

    let mut outputs = Vec::new();
    for measure in args.selected() {
        let mut pagerank_run = None;
        let scores = match measure {
            Measure::Closeness => {
                timing::timed("engine.closeness", || closeness_centrality(&graph))
            }
            Measure::Betweenness => {
                timing::timed("engine.betweenness", || betweenness_centrality(&graph))
            }
            Measure::PageRank => {
                let settings = args.pagerank_settings(config);
                let personalization = Personalization::from_settings(&graph, &settings)?;
                let result = timing::timed("engine.pagerank", || {
                    pagerank(&graph, &PageRankConfig::from(&settings), &personalization)
                })?;
                pagerank_run = Some(PageRankRun {
                    iterations: result.iterations,
                    termination: result.termination,
                    last_error: result.last_error,
                    preferred_nodes: match personalization {
                        Personalization::Uniform => None,
                        Personalization::Preference(ref ids) => Some(ids.len()),
                    },
                });
                result.scores
            }
        };

        let file = out_dir.join(measure.file_name());
        timing::timed("sink.write", || write_ranking_file(&file, &scores))
            .with_context(|| format!("writing {measure} ranking"))?;
        info!(%measure, file = %file.display(), "ranking written");

        outputs.push(MeasureOutput {
            measure,
            top: rank(&scores).first().copied(),
            file,
            pagerank: pagerank_run,
        });
    }

    let summary = RankSummary {
        input: args.input.clone(),
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        outputs,
    };

    render(output, &summary, render_summary_human)
}

fn render_summary_human(summary: &RankSummary, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_kv(
        w,
        "Graph",
        format!(
            "{} ({} nodes, {} edges)",
            summary.input.display(),
            summary.nodes,
            summary.edges
        ),
    )?;
    for out in &summary.outputs {
        let line = match out.top {
            Some((id, score)) => format!("{} (top: {id} {score:.6})", out.file.display()),
            None => out.file.display().to_string(),
        };
        pretty_kv(w, out.measure.as_str(), line)?;
        if let Some(ref pr) = out.pagerank {
            let state = match pr.termination {
                Termination::Converged => "converged",
                Termination::MaxIterationsReached => "did not converge",
            };
            pretty_kv(
                w,
                "  iterations",
                format!("{} ({state}, error {:.3e})", pr.iterations, pr.last_error),
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: RankArgs,
    }

    fn parse(argv: &[&str]) -> RankArgs {
        Harness::parse_from(std::iter::once("rank").chain(argv.iter().copied())).args
    }

    #[test]
    fn default_selects_all_measures() {
        let args = parse(&["graph.txt"]);
        assert_eq!(args.selected().len(), 3);
    }

    #[test]
    fn repeated_measures_are_deduplicated() {
        let args = parse(&["graph.txt", "-m", "pagerank", "-m", "closeness", "-m", "pagerank"]);
        assert_eq!(
            args.selected().into_iter().collect::<Vec<_>>(),
            vec![Measure::Closeness, Measure::PageRank]
        );
    }

    #[test]
    fn flags_override_config() {
        let args = parse(&[
            "graph.txt",
            "--alpha",
            "0.5",
            "--prefer-modulo",
            "4",
            "--prefer",
            "1",
            "2",
        ]);
        let settings = args.pagerank_settings(&AnalysisConfig::default());
        assert!((settings.alpha - 0.5).abs() < f64::EPSILON);
        assert_eq!(settings.max_iterations, 128);
        assert_eq!(settings.preference_modulo, Some(4));
        assert_eq!(settings.preference, vec![1, 2]);
    }

    #[test]
    fn separator_parses_names() {
        let args = parse(&["graph.txt", "--separator", "space"]);
        assert_eq!(args.separator, Some(Separator::Space));
    }
}
