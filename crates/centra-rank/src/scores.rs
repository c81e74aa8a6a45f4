//! Per-node score mappings and the measures that produce them.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use centra_core::{Graph, NodeId};
use serde::Serialize;

/// A centrality result: node id → score.
pub type Scores = HashMap<NodeId, f64>;

/// Pair dense-index values with their node ids.
///
/// `values[i]` must be the score of the node at dense index `i`.
#[must_use]
pub fn scores_from_dense(graph: &Graph, values: &[f64]) -> Scores {
    debug_assert_eq!(values.len(), graph.node_count());
    graph.nodes().zip(values.iter().copied()).collect()
}

/// The three centrality measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    Closeness,
    Betweenness,
    PageRank,
}

impl Measure {
    pub const ALL: [Self; 3] = [Self::Closeness, Self::Betweenness, Self::PageRank];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closeness => "closeness",
            Self::Betweenness => "betweenness",
            Self::PageRank => "pagerank",
        }
    }

    /// Ranking file name written for this measure.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Closeness => "closeness.txt",
            Self::Betweenness => "betweenness.txt",
            Self::PageRank => "pagerank.txt",
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Measure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "closeness" | "cc" => Ok(Self::Closeness),
            "betweenness" | "bc" => Ok(Self::Betweenness),
            "pagerank" | "pr" => Ok(Self::PageRank),
            other => Err(format!("unknown measure {other:?}")),
        }
    }
}
