//! Immutable undirected graph over integer node ids.
//!
//! # Overview
//!
//! [`Graph`] is built once (usually from an edge list, see
//! [`crate::edgelist`]) and never mutated afterwards, so every centrality
//! engine can share it by reference, across threads included.
//!
//! ## Representation
//!
//! Node ids are mapped to dense indices `0..n` in first-encounter order.
//! Adjacency is stored in compressed sparse row form: the neighbors of the
//! node at index `i` are `targets[offsets[i]..offsets[i + 1]]`. Engines work
//! on dense indices; the id-level API ([`Graph::neighbors`],
//! [`Graph::degree`]) is for callers holding external node ids.
//!
//! ## Invariants
//!
//! - Adjacency is symmetric: `v` is a neighbor of `u` iff `u` is a neighbor
//!   of `v`.
//! - Parallel edges collapse into one. A self-loop is stored once in the
//!   node's own neighbor list.

use std::collections::{HashMap, HashSet};

use crate::error::GraphError;

/// Integer node identifier as it appears in the edge list.
pub type NodeId = i64;

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// An undirected, unweighted, immutable graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    ids: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
    offsets: Vec<usize>,
    targets: Vec<usize>,
    edge_count: usize,
}

impl Default for Graph {
    fn default() -> Self {
        GraphBuilder::new().build()
    }
}

impl Graph {
    /// Build a graph from an iterator of undirected edges.
    pub fn from_edges(edges: impl IntoIterator<Item = (NodeId, NodeId)>) -> Self {
        let mut builder = GraphBuilder::new();
        for (u, v) in edges {
            builder.add_edge(u, v);
        }
        builder.build()
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    /// Number of distinct undirected edges (self-loops count once).
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns `true` when the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Node ids in first-encounter order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        self.ids.iter().copied()
    }

    /// Returns `true` if `id` is a node of this graph.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Dense index of `id`, if present.
    #[must_use]
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Node id stored at dense index `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= node_count()`.
    #[must_use]
    pub fn id_of(&self, idx: usize) -> NodeId {
        self.ids[idx]
    }

    /// Neighbor indices of the node at dense index `idx`, ascending.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= node_count()`.
    #[must_use]
    pub fn neighbor_indices(&self, idx: usize) -> &[usize] {
        &self.targets[self.offsets[idx]..self.offsets[idx + 1]]
    }

    /// Degree of the node at dense index `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= node_count()`.
    #[must_use]
    pub fn degree_at(&self, idx: usize) -> usize {
        self.offsets[idx + 1] - self.offsets[idx]
    }

    /// Degree of node `id` (size of its neighbor set).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] if `id` is not in the graph.
    pub fn degree(&self, id: NodeId) -> Result<usize, GraphError> {
        self.require(id).map(|idx| self.degree_at(idx))
    }

    /// Neighbors of node `id`. Empty for a node without edges.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] if `id` is not in the graph.
    pub fn neighbors(
        &self,
        id: NodeId,
    ) -> Result<impl ExactSizeIterator<Item = NodeId> + '_, GraphError> {
        let idx = self.require(id)?;
        Ok(self.neighbor_indices(idx).iter().map(|&n| self.ids[n]))
    }

    /// Largest node id, or `None` for an empty graph.
    #[must_use]
    pub fn max_node_id(&self) -> Option<NodeId> {
        self.ids.iter().copied().max()
    }

    /// Every undirected edge exactly once, as `(u, v)` with `index(u) <= index(v)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        (0..self.node_count()).flat_map(move |a| {
            self.neighbor_indices(a)
                .iter()
                .filter(move |&&b| a <= b)
                .map(move |&b| (self.ids[a], self.ids[b]))
        })
    }

    /// Induced subgraph on the nodes whose id satisfies `keep`.
    ///
    /// Kept nodes without surviving edges remain as isolated nodes. Node
    /// order follows this graph's order.
    #[must_use]
    pub fn induced(&self, keep: impl Fn(NodeId) -> bool) -> Self {
        let mut builder = GraphBuilder::new();
        for id in self.nodes().filter(|&id| keep(id)) {
            builder.add_node(id);
        }
        for (u, v) in self.edges() {
            if keep(u) && keep(v) {
                builder.add_edge(u, v);
            }
        }
        builder.build()
    }

    fn require(&self, id: NodeId) -> Result<usize, GraphError> {
        self.index_of(id).ok_or(GraphError::NodeNotFound(id))
    }
}

// ---------------------------------------------------------------------------
// GraphBuilder
// ---------------------------------------------------------------------------

/// Incremental builder for [`Graph`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    ids: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
    adjacency: Vec<Vec<usize>>,
    seen: HashSet<(usize, usize)>,
}

impl GraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if it is not present yet and return its dense index.
    pub fn add_node(&mut self, id: NodeId) -> usize {
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.ids.len();
        self.ids.push(id);
        self.index.insert(id, idx);
        self.adjacency.push(Vec::new());
        idx
    }

    /// Add the undirected edge `u - v`, adding missing endpoints.
    ///
    /// Duplicate edges (in either orientation) are ignored.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) {
        let a = self.add_node(u);
        let b = self.add_node(v);
        if !self.seen.insert((a.min(b), a.max(b))) {
            return;
        }
        self.adjacency[a].push(b);
        if a != b {
            self.adjacency[b].push(a);
        }
    }

    /// Number of nodes added so far.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    /// Freeze into an immutable [`Graph`].
    #[must_use]
    pub fn build(self) -> Graph {
        let mut offsets = Vec::with_capacity(self.ids.len() + 1);
        let mut targets = Vec::with_capacity(self.adjacency.iter().map(Vec::len).sum());
        offsets.push(0);
        for mut neighbors in self.adjacency {
            neighbors.sort_unstable();
            targets.extend(neighbors);
            offsets.push(targets.len());
        }

        Graph {
            ids: self.ids,
            index: self.index,
            offsets,
            targets,
            edge_count: self.seen.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut v: Vec<NodeId>) -> Vec<NodeId> {
        v.sort_unstable();
        v
    }

    #[test]
    fn empty_graph() {
        let g = Graph::default();
        assert!(g.is_empty());
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.max_node_id(), None);
    }

    #[test]
    fn adjacency_is_symmetric() {
        let g = Graph::from_edges([(1, 2), (2, 3), (3, 1), (3, 4)]);
        for u in g.nodes() {
            for v in g.neighbors(u).expect("node exists") {
                assert!(
                    g.neighbors(v).expect("node exists").any(|w| w == u),
                    "{u} missing from neighbors of {v}"
                );
            }
        }
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn parallel_edges_collapse() {
        let g = Graph::from_edges([(1, 2), (2, 1), (1, 2)]);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.degree(1).expect("node 1"), 1);
        assert_eq!(g.degree(2).expect("node 2"), 1);
    }

    #[test]
    fn self_loop_stored_once() {
        let g = Graph::from_edges([(1, 1), (1, 2)]);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(sorted(g.neighbors(1).expect("node 1").collect()), vec![1, 2]);
        assert_eq!(g.degree(1).expect("node 1"), 2);
    }

    #[test]
    fn nodes_keep_first_encounter_order() {
        let g = Graph::from_edges([(5, 3), (3, 9), (1, 5)]);
        assert_eq!(g.nodes().collect::<Vec<_>>(), vec![5, 3, 9, 1]);
        assert_eq!(g.index_of(9), Some(2));
        assert_eq!(g.id_of(3), 1);
    }

    #[test]
    fn isolated_node_has_empty_neighbors() {
        let mut b = GraphBuilder::new();
        b.add_edge(1, 2);
        b.add_node(5);
        let g = b.build();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.degree(5).expect("node 5"), 0);
        assert_eq!(g.neighbors(5).expect("node 5").count(), 0);
    }

    #[test]
    fn unknown_node_is_an_error() {
        let g = Graph::from_edges([(1, 2)]);
        assert!(matches!(g.degree(42), Err(GraphError::NodeNotFound(42))));
        assert!(g.neighbors(42).is_err());
        assert!(!g.contains(42));
    }

    #[test]
    fn edges_lists_each_edge_once() {
        let g = Graph::from_edges([(1, 2), (2, 3), (3, 3)]);
        let mut edges: Vec<_> = g.edges().collect();
        edges.sort_unstable();
        assert_eq!(edges, vec![(1, 2), (2, 3), (3, 3)]);
    }

    #[test]
    fn max_node_id_ignores_order() {
        let g = Graph::from_edges([(7, 100), (-3, 7)]);
        assert_eq!(g.max_node_id(), Some(100));
    }

    #[test]
    fn induced_subgraph_keeps_matching_nodes_and_edges() {
        let g = Graph::from_edges([(4, 8), (8, 3), (3, 12), (12, 4), (16, 5)]);
        let sub = g.induced(|id| id % 4 == 0);

        assert_eq!(sorted(sub.nodes().collect()), vec![4, 8, 12, 16]);
        assert_eq!(sub.edge_count(), 2);
        assert_eq!(sub.degree(16).expect("node 16"), 0);
        assert!(!sub.contains(3));
    }
}
