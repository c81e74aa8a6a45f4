use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use centra_core::NodeId;
use centra_rank::overlap::{OverlapReport, compare};
use centra_rank::sink::read_ranking_file;
use clap::Args;
use serde::Serialize;

use crate::output::{OutputMode, pretty_kv, render};

/// Arguments for `centra overlap`.
#[derive(Args, Debug)]
pub struct OverlapArgs {
    /// Ranking file produced by `centra rank`.
    pub ours: PathBuf,

    /// Reference ranking from another implementation.
    pub theirs: PathBuf,

    /// Number of leading entries compared.
    #[arg(short = 'k', long, default_value_t = 100)]
    pub top: usize,
}

#[derive(Debug, Serialize)]
struct OverlapOutput {
    ours: PathBuf,
    theirs: PathBuf,
    overlap: usize,
    jaccard: f64,
    only_ours: Vec<NodeId>,
    only_theirs: Vec<NodeId>,
    #[serde(skip)]
    report: OverlapReport,
}

/// Compare the top entries of two ranking files.
///
/// # Errors
///
/// Returns an error if either file is missing or malformed.
pub fn run_overlap(args: &OverlapArgs, output: OutputMode) -> Result<()> {
    let ours = read_ranking_file(&args.ours)
        .with_context(|| format!("reading {}", args.ours.display()))?;
    let theirs = read_ranking_file(&args.theirs)
        .with_context(|| format!("reading {}", args.theirs.display()))?;

    let report = compare(&ours, &theirs, args.top);
    let out = OverlapOutput {
        ours: args.ours.clone(),
        theirs: args.theirs.clone(),
        overlap: report.overlap_count(),
        jaccard: report.jaccard(),
        only_ours: report.only_ours().into_iter().collect(),
        only_theirs: report.only_theirs().into_iter().collect(),
        report,
    };

    render(output, &out, render_overlap_human)
}

fn render_overlap_human(out: &OverlapOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_kv(
        w,
        &format!("Top-{} overlap", out.report.k),
        format!("{}/{}", out.overlap, out.report.ours.len().max(out.report.theirs.len())),
    )?;
    pretty_kv(w, "Jaccard", format!("{:.4}", out.jaccard))?;
    if !out.only_ours.is_empty() {
        pretty_kv(w, "Only in ours", join_ids(&out.only_ours))?;
    }
    if !out.only_theirs.is_empty() {
        pretty_kv(w, "Only in theirs", join_ids(&out.only_theirs))?;
    }
    Ok(())
}

fn join_ids(ids: &[NodeId]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}
