//! Closeness centrality.
//!
//! For each node `s`, a BFS restricted to the component of `s` gives
//!
//! ```text
//! closeness(s) = (reached(s) - 1) / Σ dist(s, t)   over reached t
//! ```
//!
//! Nodes outside the component are left out of the sum rather than counted
//! at infinite distance, so scores from different components are not
//! comparable by magnitude. A node that reaches nothing scores `0.0`.

use std::time::Instant;

use centra_core::{Graph, GraphError, NodeId};
use rayon::prelude::*;
use tracing::{info, instrument};

use crate::bfs::Bfs;
use crate::scores::{Scores, scores_from_dense};

/// Closeness centrality of every node.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn closeness_centrality(graph: &Graph) -> Scores {
    let started = Instant::now();

    let values: Vec<f64> = (0..graph.node_count())
        .into_par_iter()
        .map(|s| closeness_at(graph, s))
        .collect();

    info!(
        elapsed_ms = started.elapsed().as_millis(),
        "closeness centrality computed"
    );
    scores_from_dense(graph, &values)
}

/// Closeness centrality of a single node.
///
/// # Errors
///
/// Returns [`GraphError::NodeNotFound`] if `id` is not in the graph.
pub fn closeness(graph: &Graph, id: NodeId) -> Result<f64, GraphError> {
    graph
        .index_of(id)
        .map(|idx| closeness_at(graph, idx))
        .ok_or(GraphError::NodeNotFound(id))
}

#[allow(clippy::cast_precision_loss)]
fn closeness_at(graph: &Graph, source: usize) -> f64 {
    let (reached, total) = Bfs::new(graph, source)
        .fold((0_usize, 0_usize), |(reached, total), (_, d)| {
            (reached + 1, total + d)
        });

    if total == 0 {
        0.0
    } else {
        (reached - 1) as f64 / total as f64
    }
}
