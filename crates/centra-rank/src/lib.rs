#![forbid(unsafe_code)]
//! centra-rank library.
//!
//! Centrality engines over a [`centra_core::Graph`]:
//!
//! - [`closeness::closeness_centrality`]: per-component closeness.
//! - [`betweenness::betweenness_centrality`]: Brandes, normalized.
//! - [`pagerank::pagerank`]: personalized PageRank by power iteration.
//!
//! Each engine returns a fresh [`Scores`] map; [`sink`] writes it as a
//! ranking file and [`overlap`] compares two rankings. [`structure`]
//! summarizes the graph itself.
//!
//! # Conventions
//!
//! - **Errors**: [`RankError`] at the library boundary, mapped to an
//!   [`centra_core::ErrorCode`].
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **Parallelism**: per-source work runs on the global rayon pool.

pub mod betweenness;
pub mod bfs;
pub mod closeness;
pub mod error;
pub mod overlap;
pub mod pagerank;
pub mod scores;
pub mod sink;
pub mod structure;

pub use error::RankError;
pub use pagerank::{PageRankConfig, PageRankResult, Personalization, Termination};
pub use scores::{Measure, Scores};
