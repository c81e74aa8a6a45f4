//! Personalized ("biased") PageRank by power iteration.
//!
//! # Overview
//!
//! The update, for every node `u` of the undirected graph:
//!
//! ```text
//! PR'(u) = alpha * Σ_{v ∈ N(u)} PR(v) / deg(v) + (1 - alpha) * d(u)
//! ```
//!
//! where `d` is the teleport (personalization) vector: `1/|P|` on each node
//! of a preference set `P` and `0` elsewhere, or `1/n` everywhere when no
//! preference set is given, which is standard PageRank.
//!
//! After each sweep the vector is L1-normalized to sum to one. Iteration
//! stops once `Σ |PR' - PR| < n * tolerance` ([`Termination::Converged`])
//! or after `max_iterations` sweeps ([`Termination::MaxIterationsReached`]).
//!
//! Nodes without edges pass no mass on; the renormalization redistributes
//! what they lose.
//!
//! # Parallelism
//!
//! Iterations are sequential. Within one iteration every node reads only
//! the previous vector, so the per-node updates run on rayon.

use std::collections::BTreeSet;
use std::time::Instant;

use centra_core::config::PageRankSettings;
use centra_core::{Graph, NodeId};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::error::RankError;
use crate::scores::{Scores, scores_from_dense};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Power-iteration parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRankConfig {
    /// Damping factor: probability of following an edge rather than
    /// teleporting. Default: 0.85.
    pub alpha: f64,
    /// Maximum number of sweeps. Default: 128.
    pub max_iterations: usize,
    /// Per-node convergence tolerance; the L1 threshold is `n * tolerance`.
    /// Default: 1e-9.
    pub tolerance: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            alpha: 0.85,
            max_iterations: 128,
            tolerance: 1e-9,
        }
    }
}

impl PageRankConfig {
    /// Check parameter ranges.
    ///
    /// `alpha` is accepted in `[0, 1)`; `alpha = 0` returns the teleport
    /// vector itself.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::InvalidParameter`] for an out-of-range value.
    pub fn validate(&self) -> Result<(), RankError> {
        if !(0.0..1.0).contains(&self.alpha) {
            return Err(RankError::InvalidParameter {
                name: "alpha",
                reason: format!("must be in [0, 1), got {}", self.alpha),
            });
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(RankError::InvalidParameter {
                name: "tolerance",
                reason: format!("must be positive and finite, got {}", self.tolerance),
            });
        }
        Ok(())
    }
}

impl From<&PageRankSettings> for PageRankConfig {
    fn from(settings: &PageRankSettings) -> Self {
        Self {
            alpha: settings.alpha,
            max_iterations: settings.max_iterations,
            tolerance: settings.tolerance,
        }
    }
}

// ---------------------------------------------------------------------------
// Personalization
// ---------------------------------------------------------------------------

/// Where teleportation mass goes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Personalization {
    /// `1/n` on every node.
    #[default]
    Uniform,
    /// `1/|P|` on each node of the preference set, `0` elsewhere.
    /// Duplicates are ignored; an empty set falls back to uniform.
    Preference(Vec<NodeId>),
}

impl Personalization {
    /// Prefer every node whose id is a multiple of `modulus`.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::InvalidParameter`] if `modulus` is not positive.
    pub fn modulo(graph: &Graph, modulus: NodeId) -> Result<Self, RankError> {
        multiples_of(graph, modulus).map(Self::Preference)
    }

    /// Preference set named by `settings`: the explicit list together with
    /// the multiples of `preference_modulo`, deduplicated and in ascending
    /// id order. Uniform if both are unset.
    ///
    /// # Errors
    ///
    /// As [`Personalization::modulo`].
    pub fn from_settings(graph: &Graph, settings: &PageRankSettings) -> Result<Self, RankError> {
        let mut preferred: BTreeSet<NodeId> = settings.preference.iter().copied().collect();
        match settings.preference_modulo {
            Some(modulus) => preferred.extend(multiples_of(graph, modulus)?),
            None if preferred.is_empty() => return Ok(Self::Uniform),
            None => {}
        }
        Ok(Self::Preference(preferred.into_iter().collect()))
    }

    /// Teleport vector over dense indices; sums to one for a non-empty graph.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::UnknownPreferenceNode`] if a preferred id is
    /// not in the graph.
    #[allow(clippy::cast_precision_loss)]
    pub fn teleport_vector(&self, graph: &Graph) -> Result<Vec<f64>, RankError> {
        let n = graph.node_count();
        let preferred = match self {
            Self::Preference(ids) if !ids.is_empty() => ids
                .iter()
                .map(|&id| {
                    graph
                        .index_of(id)
                        .ok_or(RankError::UnknownPreferenceNode(id))
                })
                .collect::<Result<BTreeSet<usize>, _>>()?,
            _ => return Ok(vec![1.0 / n as f64; n]),
        };

        let mass = 1.0 / preferred.len() as f64;
        let mut d = vec![0.0; n];
        for idx in preferred {
            d[idx] = mass;
        }
        Ok(d)
    }
}

fn multiples_of(graph: &Graph, modulus: NodeId) -> Result<Vec<NodeId>, RankError> {
    if modulus <= 0 {
        return Err(RankError::InvalidParameter {
            name: "preference modulus",
            reason: format!("must be positive, got {modulus}"),
        });
    }
    Ok(graph.nodes().filter(|id| id % modulus == 0).collect())
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// How the power iteration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The L1 change dropped below `n * tolerance`.
    Converged,
    /// `max_iterations` sweeps ran without converging.
    MaxIterationsReached,
}

/// Result of a PageRank computation.
#[derive(Debug, Clone)]
pub struct PageRankResult {
    /// Scores summing to one.
    pub scores: Scores,
    /// 1-based sweep at which convergence was detected, or
    /// `max_iterations` when it was not.
    pub iterations: usize,
    pub termination: Termination,
    /// L1 change of the last sweep (`0.0` if none ran).
    pub last_error: f64,
}

impl PageRankResult {
    #[must_use]
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}

// ---------------------------------------------------------------------------
// Power iteration
// ---------------------------------------------------------------------------

/// Compute personalized PageRank.
///
/// # Errors
///
/// - [`RankError::InvalidParameter`] if `config` is out of range.
/// - [`RankError::UnknownPreferenceNode`] if the preference set names a
///   node that is not in the graph.
#[instrument(skip(graph, config, personalization), fields(nodes = graph.node_count()))]
pub fn pagerank(
    graph: &Graph,
    config: &PageRankConfig,
    personalization: &Personalization,
) -> Result<PageRankResult, RankError> {
    config.validate()?;
    let started = Instant::now();
    let n = graph.node_count();

    let d = personalization.teleport_vector(graph)?;

    if n == 0 {
        return Ok(PageRankResult {
            scores: Scores::new(),
            iterations: 0,
            termination: Termination::Converged,
            last_error: 0.0,
        });
    }

    #[allow(clippy::cast_precision_loss)]
    let threshold = n as f64 * config.tolerance;
    let alpha = config.alpha;

    #[allow(clippy::cast_precision_loss)]
    let inv_degree: Vec<f64> = (0..n)
        .map(|v| match graph.degree_at(v) {
            0 => 0.0,
            deg => 1.0 / deg as f64,
        })
        .collect();

    let mut rank = d.clone();
    let mut next = vec![0.0_f64; n];
    let mut iterations = config.max_iterations;
    let mut termination = Termination::MaxIterationsReached;
    let mut last_error = 0.0;

    for iteration in 1..=config.max_iterations {
        next.par_iter_mut().enumerate().for_each(|(u, slot)| {
            let inflow: f64 = graph
                .neighbor_indices(u)
                .iter()
                .map(|&v| rank[v] * inv_degree[v])
                .sum();
            *slot = alpha.mul_add(inflow, (1.0 - alpha) * d[u]);
        });

        let total: f64 = next.iter().sum();
        if total > 0.0 {
            next.iter_mut().for_each(|x| *x /= total);
        }

        last_error = rank
            .iter()
            .zip(&next)
            .map(|(old, new)| (new - old).abs())
            .sum();
        std::mem::swap(&mut rank, &mut next);

        debug!(iteration, error = last_error, "pagerank sweep");

        if last_error < threshold {
            iterations = iteration;
            termination = Termination::Converged;
            break;
        }
    }

    info!(
        iterations,
        ?termination,
        elapsed_ms = started.elapsed().as_millis(),
        "pagerank computed"
    );

    Ok(PageRankResult {
        scores: scores_from_dense(graph, &rank),
        iterations,
        termination,
        last_error,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
