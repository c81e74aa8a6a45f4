use std::io;
use std::path::PathBuf;

use centra_core::{ErrorCode, GraphError, NodeId};

/// Errors raised by the engines and the ranking file I/O.
#[derive(Debug, thiserror::Error)]
pub enum RankError {
    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("preference node {0} is not in the graph")]
    UnknownPreferenceNode(NodeId),

    #[error("malformed ranking at line {line}: {reason}")]
    MalformedRanking { line: usize, reason: String },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl RankError {
    /// Machine-readable code for this error.
    ///
    /// A read error is `InputNotFound` only when the file is missing; other
    /// read failures are unexpected.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidParameter { .. } => ErrorCode::InvalidParameter,
            Self::UnknownPreferenceNode(_) => ErrorCode::NodeNotFound,
            Self::MalformedRanking { .. } => ErrorCode::MalformedRanking,
            Self::Read { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                ErrorCode::InputNotFound
            }
            Self::Read { .. } => ErrorCode::InternalUnexpected,
            Self::Write { .. } => ErrorCode::OutputWriteFailed,
            Self::Graph(inner) => inner.code(),
        }
    }
}
