#![forbid(unsafe_code)]
//! centra-core library.
//!
//! The in-memory [`graph::Graph`] every centrality engine reads from, the
//! edge-list format it is loaded from, and the configuration, error-code
//! and timing plumbing shared with the CLI.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums at the library boundary, each mapping to
//!   an [`error::ErrorCode`]; `anyhow::Result` in binaries.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod edgelist;
pub mod error;
pub mod graph;
pub mod timing;

pub use edgelist::{EdgeListFormat, Separator};
pub use error::{ErrorCode, GraphError};
pub use graph::{Graph, GraphBuilder, NodeId};
