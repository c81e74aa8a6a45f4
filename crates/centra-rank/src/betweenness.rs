//! Betweenness centrality via Brandes' algorithm.
//!
//! # Algorithm
//!
//! For each source node `s`:
//!
//! 1. BFS from `s`, recording discovery order, the shortest-path parents of
//!    every reached node and `sigma[w]`, the number of shortest `s → w` paths.
//! 2. Walk the discovery order backwards (farthest nodes first) and push
//!    dependency to parents: `delta[v] += sigma[v] * (1 + delta[w]) / sigma[w]`.
//! 3. Add `delta[w]` to the accumulator of every `w != s`.
//!
//! Sources are independent: each pass uses private scratch buffers and the
//! per-thread accumulators are summed at the end.
//!
//! # Normalization
//!
//! Accumulators are scaled by `1 / ((n - 1) * (n - 2))`. Every unordered
//! pair is visited from both ends, so no extra factor of two is applied.
//! With `n < 3` no node can lie strictly between two others and every
//! score is `0.0`.

use std::collections::VecDeque;
use std::time::Instant;

use centra_core::Graph;
use rayon::prelude::*;
use tracing::{info, instrument};

use crate::scores::{Scores, scores_from_dense};

const UNSEEN: usize = usize::MAX;

/// Normalized betweenness centrality of every node.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn betweenness_centrality(graph: &Graph) -> Scores {
    let started = Instant::now();
    let n = graph.node_count();

    let mut cb = raw_betweenness(graph);

    if n < 3 {
        cb.iter_mut().for_each(|x| *x = 0.0);
    } else {
        #[allow(clippy::cast_precision_loss)]
        let scale = 1.0 / ((n - 1) as f64 * (n - 2) as f64);
        cb.iter_mut().for_each(|x| *x *= scale);
    }

    info!(
        elapsed_ms = started.elapsed().as_millis(),
        "betweenness centrality computed"
    );
    scores_from_dense(graph, &cb)
}

/// Unnormalized accumulators, indexed by dense node index.
///
/// Each value counts ordered `(s, t)` pairs, weighted by the fraction of
/// shortest `s → t` paths passing through the node.
#[must_use]
pub fn raw_betweenness(graph: &Graph) -> Vec<f64> {
    let n = graph.node_count();

    (0..n)
        .into_par_iter()
        .fold(
            || (Brandes::new(n), vec![0.0_f64; n]),
            |(mut pass, mut acc), s| {
                pass.accumulate(graph, s, &mut acc);
                (pass, acc)
            },
        )
        .map(|(_, acc)| acc)
        .reduce(
            || vec![0.0_f64; n],
            |mut a, b| {
                a.iter_mut().zip(b).for_each(|(x, y)| *x += y);
                a
            },
        )
}

/// Scratch state for one single-source pass, reused across sources.
struct Brandes {
    order: Vec<usize>,
    parents: Vec<Vec<usize>>,
    sigma: Vec<f64>,
    dist: Vec<usize>,
    delta: Vec<f64>,
    queue: VecDeque<usize>,
}

impl Brandes {
    fn new(n: usize) -> Self {
        Self {
            order: Vec::with_capacity(n),
            parents: vec![Vec::new(); n],
            sigma: vec![0.0; n],
            dist: vec![UNSEEN; n],
            delta: vec![0.0; n],
            queue: VecDeque::new(),
        }
    }

    fn accumulate(&mut self, graph: &Graph, s: usize, acc: &mut [f64]) {
        self.sigma[s] = 1.0;
        self.dist[s] = 0;
        self.queue.push_back(s);

        while let Some(v) = self.queue.pop_front() {
            self.order.push(v);
            let next = self.dist[v] + 1;

            for &w in graph.neighbor_indices(v) {
                if self.dist[w] == UNSEEN {
                    self.dist[w] = next;
                    self.queue.push_back(w);
                }
                if self.dist[w] == next {
                    self.sigma[w] += self.sigma[v];
                    self.parents[w].push(v);
                }
            }
        }

        for &w in self.order.iter().rev() {
            let coeff = (1.0 + self.delta[w]) / self.sigma[w];
            for &v in &self.parents[w] {
                self.delta[v] += self.sigma[v] * coeff;
            }
            if w != s {
                acc[w] += self.delta[w];
            }
        }

        // Only touched entries need resetting.
        for &w in &self.order {
            self.parents[w].clear();
            self.sigma[w] = 0.0;
            self.dist[w] = UNSEEN;
            self.delta[w] = 0.0;
        }
        self.order.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
