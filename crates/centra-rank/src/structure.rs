//! Structural summary of a graph.
//!
//! # Statistics Provided
//!
//! - **Degrees**: histogram, maximum degree and the nodes attaining it.
//! - **Components**: count of connected components and the fraction of
//!   nodes in the largest one.
//! - **Triangles**: closed triads per node and in total, local clustering
//!   coefficient `t(u) / (k(u) * (k(u) - 1) / 2)` and its average over all
//!   nodes. Nodes of degree below two have coefficient 0.
//! - **Diameter**: approximate full and effective diameter from BFS over a
//!   random sample of source nodes. The effective diameter is the 90th
//!   percentile of sampled hop distances, linearly interpolated between
//!   whole hops.
//!
//! Self-loops are ignored for triangles and clustering. Sampling draws from
//! a caller-supplied RNG, so a fixed seed reproduces a report exactly.

use std::collections::BTreeMap;

use centra_core::{Graph, NodeId};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::bfs::Bfs;

const EFFECTIVE_QUANTILE: f64 = 0.9;

// ---------------------------------------------------------------------------
// Degrees
// ---------------------------------------------------------------------------

/// Number of nodes per degree.
#[must_use]
pub fn degree_histogram(graph: &Graph) -> BTreeMap<usize, usize> {
    let mut hist = BTreeMap::new();
    for idx in 0..graph.node_count() {
        *hist.entry(graph.degree_at(idx)).or_insert(0) += 1;
    }
    hist
}

/// Number of nodes with exactly `degree` neighbors.
#[must_use]
pub fn nodes_with_degree(graph: &Graph, degree: usize) -> usize {
    (0..graph.node_count())
        .filter(|&idx| graph.degree_at(idx) == degree)
        .count()
}

/// Maximum degree and the ids attaining it, in node order.
/// `(0, [])` for an empty graph.
#[must_use]
pub fn max_degree_nodes(graph: &Graph) -> (usize, Vec<NodeId>) {
    let max = (0..graph.node_count())
        .map(|idx| graph.degree_at(idx))
        .max()
        .unwrap_or(0);
    let ids = (0..graph.node_count())
        .filter(|&idx| graph.degree_at(idx) == max)
        .map(|idx| graph.id_of(idx))
        .collect();
    (max, ids)
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// Sizes of the connected components, largest first.
#[must_use]
pub fn component_sizes(graph: &Graph) -> Vec<usize> {
    let n = graph.node_count();
    let mut seen = vec![false; n];
    let mut sizes = Vec::new();

    for start in 0..n {
        if seen[start] {
            continue;
        }
        let mut size = 0;
        for (v, _) in Bfs::new(graph, start) {
            seen[v] = true;
            size += 1;
        }
        sizes.push(size);
    }

    sizes.sort_unstable_by(|a, b| b.cmp(a));
    sizes
}

// ---------------------------------------------------------------------------
// Triangles and clustering
// ---------------------------------------------------------------------------

/// Triangles through every node, by dense index.
#[must_use]
pub fn triangles_per_node(graph: &Graph) -> Vec<usize> {
    (0..graph.node_count())
        .into_par_iter()
        .map(|u| triangles_at(graph, u))
        .collect()
}

fn triangles_at(graph: &Graph, u: usize) -> usize {
    let nbrs = graph.neighbor_indices(u);
    let mut closed = 0;
    for (i, &v) in nbrs.iter().enumerate() {
        if v == u {
            continue;
        }
        for &w in &nbrs[i + 1..] {
            if w != u && graph.neighbor_indices(v).binary_search(&w).is_ok() {
                closed += 1;
            }
        }
    }
    closed
}

/// Proper (non-loop) degree of `u`.
fn simple_degree(graph: &Graph, u: usize) -> usize {
    let nbrs = graph.neighbor_indices(u);
    nbrs.len() - usize::from(nbrs.binary_search(&u).is_ok())
}

/// Total number of triangles in the graph.
#[must_use]
pub fn triangle_count(graph: &Graph) -> usize {
    triangles_per_node(graph).iter().sum::<usize>() / 3
}

/// Local clustering coefficient of every node, by dense index.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn local_clustering(graph: &Graph) -> Vec<f64> {
    triangles_per_node(graph)
        .into_iter()
        .enumerate()
        .map(|(u, t)| {
            let k = simple_degree(graph, u);
            if k < 2 {
                0.0
            } else {
                2.0 * t as f64 / (k * (k - 1)) as f64
            }
        })
        .collect()
}

/// Mean local clustering coefficient; `0.0` for an empty graph.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_clustering(graph: &Graph) -> f64 {
    let local = local_clustering(graph);
    if local.is_empty() {
        0.0
    } else {
        local.iter().sum::<f64>() / local.len() as f64
    }
}

// ---------------------------------------------------------------------------
// Diameter
// ---------------------------------------------------------------------------

/// Diameter estimate from one sample of BFS sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiameterEstimate {
    /// Requested number of sources; fewer are used if the graph is smaller.
    pub sample_size: usize,
    /// Longest hop distance seen.
    pub full: usize,
    /// Interpolated 90th percentile of the hop distances seen.
    pub effective: f64,
}

/// Estimate the diameter from BFS over `sample_size` distinct random sources.
#[must_use]
pub fn estimate_diameter<R: Rng + ?Sized>(
    graph: &Graph,
    sample_size: usize,
    rng: &mut R,
) -> DiameterEstimate {
    let n = graph.node_count();
    let sources = rand::seq::index::sample(rng, n, sample_size.min(n)).into_vec();

    // hops[d] = number of sampled (source, target) pairs at distance d >= 1
    let hops = sources
        .par_iter()
        .map(|&s| {
            let mut local: Vec<u64> = Vec::new();
            for (_, d) in Bfs::new(graph, s).filter(|&(_, d)| d > 0) {
                if local.len() <= d {
                    local.resize(d + 1, 0);
                }
                local[d] += 1;
            }
            local
        })
        .reduce(Vec::new, |mut a, b| {
            if a.len() < b.len() {
                a.resize(b.len(), 0);
            }
            a.iter_mut().zip(b).for_each(|(x, y)| *x += y);
            a
        });

    DiameterEstimate {
        sample_size,
        full: hops.len().saturating_sub(1),
        effective: interpolated_quantile(&hops, EFFECTIVE_QUANTILE),
    }
}

/// Smallest fractional hop count by which `q` of all pairs are reached,
/// interpolating linearly inside the hop where the quantile falls.
#[allow(clippy::cast_precision_loss)]
fn interpolated_quantile(hops: &[u64], q: f64) -> f64 {
    let total: u64 = hops.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let target = q * total as f64;

    let mut below = 0.0;
    for (d, &count) in hops.iter().enumerate() {
        let upto = below + count as f64;
        if upto >= target && count > 0 {
            return (d - 1) as f64 + (target - below) / count as f64;
        }
        below = upto;
    }
    hops.len().saturating_sub(1) as f64
}

/// Mean and population variance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spread {
    pub mean: f64,
    pub variance: f64,
}

impl Spread {
    /// `None` for an empty input.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self { mean, variance })
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Everything `centra stats` prints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureReport {
    pub node_count: usize,
    pub edge_count: usize,
    pub degree_histogram: BTreeMap<usize, usize>,
    pub max_degree: usize,
    pub max_degree_nodes: Vec<NodeId>,
    pub component_count: usize,
    /// Fraction of nodes in the largest component; `0.0` when empty.
    pub largest_component_fraction: f64,
    pub triangle_count: usize,
    pub average_clustering: f64,
    pub diameters: Vec<DiameterEstimate>,
    pub full_diameter: Option<Spread>,
    pub effective_diameter: Option<Spread>,
}

impl StructureReport {
    #[must_use]
    pub fn nodes_with_degree(&self, degree: usize) -> usize {
        self.degree_histogram.get(&degree).copied().unwrap_or(0)
    }
}

/// Compute a [`StructureReport`], sampling diameters once per entry of
/// `sample_sizes` from a single RNG seeded with `seed`.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn structure_report(graph: &Graph, sample_sizes: &[usize], seed: u64) -> StructureReport {
    let mut rng = StdRng::seed_from_u64(seed);

    let (max_degree, max_degree_nodes) = max_degree_nodes(graph);
    let components = component_sizes(graph);
    #[allow(clippy::cast_precision_loss)]
    let largest_component_fraction = components
        .first()
        .map_or(0.0, |&largest| largest as f64 / graph.node_count() as f64);

    let diameters: Vec<DiameterEstimate> = sample_sizes
        .iter()
        .map(|&k| {
            let estimate = estimate_diameter(graph, k, &mut rng);
            debug!(
                sample_size = k,
                full = estimate.full,
                effective = estimate.effective,
                "diameter sampled"
            );
            estimate
        })
        .collect();
    #[allow(clippy::cast_precision_loss)]
    let full: Vec<f64> = diameters.iter().map(|d| d.full as f64).collect();
    let effective: Vec<f64> = diameters.iter().map(|d| d.effective).collect();

    StructureReport {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        degree_histogram: degree_histogram(graph),
        max_degree,
        max_degree_nodes,
        component_count: components.len(),
        largest_component_fraction,
        triangle_count: triangle_count(graph),
        average_clustering: average_clustering(graph),
        full_diameter: Spread::of(&full),
        effective_diameter: Spread::of(&effective),
        diameters,
    }
}
