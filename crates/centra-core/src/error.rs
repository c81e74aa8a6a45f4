use std::fmt;
use std::path::PathBuf;

use crate::graph::NodeId;

/// Errors raised while building or querying a [`crate::graph::Graph`].
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The edge-list file does not exist.
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Reading the edge-list file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line could not be parsed into two integer node ids.
    #[error("malformed edge list at line {line}: {reason} (content: {content:?})")]
    MalformedLine {
        line: usize,
        content: String,
        reason: String,
    },

    /// A lookup referenced a node that is not part of the graph.
    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),
}

impl GraphError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InputNotFound(_) => ErrorCode::InputNotFound,
            Self::Io { .. } => ErrorCode::InternalUnexpected,
            Self::MalformedLine { .. } => ErrorCode::MalformedInput,
            Self::NodeNotFound(_) => ErrorCode::NodeNotFound,
        }
    }
}

/// Machine-readable error codes surfaced by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InputNotFound,
    MalformedInput,
    ConfigParseError,
    NodeNotFound,
    InvalidParameter,
    MalformedRanking,
    OutputWriteFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InputNotFound => "E1001",
            Self::MalformedInput => "E1002",
            Self::ConfigParseError => "E1003",
            Self::NodeNotFound => "E2001",
            Self::InvalidParameter => "E2002",
            Self::MalformedRanking => "E2003",
            Self::OutputWriteFailed => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InputNotFound => "Input edge list not found",
            Self::MalformedInput => "Malformed edge list",
            Self::ConfigParseError => "Config file parse error",
            Self::NodeNotFound => "Node not found",
            Self::InvalidParameter => "Invalid algorithm parameter",
            Self::MalformedRanking => "Malformed ranking file",
            Self::OutputWriteFailed => "Output write failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InputNotFound => Some("Check the edge-list path and retry."),
            Self::MalformedInput => {
                Some("Each line needs two integer columns; check --separator.")
            }
            Self::ConfigParseError => Some("Fix syntax in centra.toml and retry."),
            Self::NodeNotFound => None,
            Self::InvalidParameter => {
                Some("Use 0 <= alpha < 1 and a positive, finite tolerance.")
            }
            Self::MalformedRanking => {
                Some("Ranking lines must be `<node id>\\t<score>`.")
            }
            Self::OutputWriteFailed => Some("Check disk space and write permissions."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, GraphError};
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::InputNotFound,
            ErrorCode::MalformedInput,
            ErrorCode::ConfigParseError,
            ErrorCode::NodeNotFound,
            ErrorCode::InvalidParameter,
            ErrorCode::MalformedRanking,
            ErrorCode::OutputWriteFailed,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::MalformedInput.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn graph_errors_map_to_codes() {
        assert_eq!(
            GraphError::NodeNotFound(7).code(),
            ErrorCode::NodeNotFound
        );
        let err = GraphError::MalformedLine {
            line: 3,
            content: "a b".into(),
            reason: "x".into(),
        };
        assert_eq!(err.code(), ErrorCode::MalformedInput);
        assert!(err.to_string().contains("line 3"));
    }
}
