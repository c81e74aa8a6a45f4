//! Single-source breadth-first search over a [`Graph`].
//!
//! [`Bfs`] is a lazy, one-shot traversal yielding `(index, distance)` pairs
//! in discovery order; it cannot be restarted. [`distances`] is the eager
//! id-level variant.

use std::collections::{HashMap, VecDeque};

use centra_core::{Graph, GraphError, NodeId};

const UNSEEN: usize = usize::MAX;

/// Lazy BFS from one source, over dense node indices.
#[derive(Debug)]
pub struct Bfs<'g> {
    graph: &'g Graph,
    dist: Vec<usize>,
    queue: VecDeque<usize>,
}

impl<'g> Bfs<'g> {
    /// Start a traversal at dense index `source`.
    ///
    /// # Panics
    ///
    /// Panics if `source >= graph.node_count()`.
    #[must_use]
    pub fn new(graph: &'g Graph, source: usize) -> Self {
        let mut dist = vec![UNSEEN; graph.node_count()];
        dist[source] = 0;
        Self {
            graph,
            dist,
            queue: VecDeque::from([source]),
        }
    }
}

impl Iterator for Bfs<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let v = self.queue.pop_front()?;
        let d = self.dist[v];
        for &w in self.graph.neighbor_indices(v) {
            if self.dist[w] == UNSEEN {
                self.dist[w] = d + 1;
                self.queue.push_back(w);
            }
        }
        Some((v, d))
    }
}

/// Hop distance from `source` to every node reachable from it, `source`
/// itself included at distance 0.
///
/// # Errors
///
/// Returns [`GraphError::NodeNotFound`] if `source` is not in the graph.
pub fn distances(graph: &Graph, source: NodeId) -> Result<HashMap<NodeId, usize>, GraphError> {
    let idx = graph
        .index_of(source)
        .ok_or(GraphError::NodeNotFound(source))?;
    Ok(Bfs::new(graph, idx)
        .map(|(v, d)| (graph.id_of(v), d))
        .collect())
}
