pub mod completions;
pub mod overlap;
pub mod rank;
pub mod stats;
pub mod subgraph;
