//! Edge-list text format.
//!
//! One edge per line, two integer node-id columns separated by a
//! configurable [`Separator`]. Extra columns are ignored, lines starting
//! with `#` are comments (SNAP dataset headers) and a line holding a single
//! field declares a node without edges.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::GraphError;
use crate::graph::{Graph, GraphBuilder, NodeId};

// ---------------------------------------------------------------------------
// Separator
// ---------------------------------------------------------------------------

/// Column separator of an edge-list file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Separator {
    /// A single tab character.
    #[default]
    Tab,
    /// A single space character.
    Space,
    /// Any run of ASCII whitespace.
    Whitespace,
    /// Any other single character, e.g. `,`.
    Char(char),
}

impl Separator {
    /// Split `line` into its non-empty fields.
    fn fields(self, line: &str) -> Vec<&str> {
        match self {
            Self::Whitespace => line.split_ascii_whitespace().collect(),
            other => line
                .split(other.as_char())
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .collect(),
        }
    }

    /// The character written between columns.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Tab => '\t',
            Self::Space | Self::Whitespace => ' ',
            Self::Char(c) => c,
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tab => f.write_str("tab"),
            Self::Space => f.write_str("space"),
            Self::Whitespace => f.write_str("whitespace"),
            Self::Char(c) => write!(f, "{c}"),
        }
    }
}

impl FromStr for Separator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tab" | "\t" | "\\t" => Ok(Self::Tab),
            "space" | " " => Ok(Self::Space),
            "whitespace" | "ws" => Ok(Self::Whitespace),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Self::Char(c)),
                    _ => Err(format!(
                        "invalid separator {s:?}: use tab, space, whitespace or a single character"
                    )),
                }
            }
        }
    }
}

impl TryFrom<String> for Separator {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Separator> for String {
    fn from(value: Separator) -> Self {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// EdgeListFormat
// ---------------------------------------------------------------------------

/// Column layout of an edge-list file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeListFormat {
    pub separator: Separator,
    /// Zero-based column holding the source node id.
    pub source_column: usize,
    /// Zero-based column holding the target node id.
    pub target_column: usize,
}

impl Default for EdgeListFormat {
    fn default() -> Self {
        Self {
            separator: Separator::Tab,
            source_column: 0,
            target_column: 1,
        }
    }
}

impl EdgeListFormat {
    /// Default columns with the given separator.
    #[must_use]
    pub fn with_separator(separator: Separator) -> Self {
        Self {
            separator,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

impl Graph {
    /// Load an edge list from `path` with the default column layout.
    ///
    /// # Errors
    ///
    /// See [`Graph::from_edge_list`].
    pub fn load(path: impl AsRef<Path>, separator: Separator) -> Result<Self, GraphError> {
        Self::from_edge_list(path, &EdgeListFormat::with_separator(separator))
    }

    /// Load an edge list from `path`.
    ///
    /// The whole load aborts on the first malformed line; no partial graph
    /// is returned.
    ///
    /// # Errors
    ///
    /// - [`GraphError::InputNotFound`] if `path` does not exist.
    /// - [`GraphError::Io`] if the file cannot be read.
    /// - [`GraphError::MalformedLine`] if a line does not hold integer ids.
    #[instrument(skip(path, format), fields(path = %path.as_ref().display()))]
    pub fn from_edge_list(
        path: impl AsRef<Path>,
        format: &EdgeListFormat,
    ) -> Result<Self, GraphError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GraphError::InputNotFound(path.to_path_buf()));
        }

        let file = File::open(path).map_err(|source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let graph = parse(BufReader::new(file), format, path)?;

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "loaded edge list"
        );
        Ok(graph)
    }
}

/// Parse an edge list from any buffered reader.
///
/// # Errors
///
/// Returns [`GraphError::Io`] on read failure and
/// [`GraphError::MalformedLine`] on the first unparsable line.
pub fn read_edge_list(reader: impl BufRead, format: &EdgeListFormat) -> Result<Graph, GraphError> {
    parse(reader, format, Path::new("-"))
}

fn parse(
    reader: impl BufRead,
    format: &EdgeListFormat,
    origin: &Path,
) -> Result<Graph, GraphError> {
    let mut builder = GraphBuilder::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| GraphError::Io {
            path: PathBuf::from(origin),
            source,
        })?;
        let line_no = line_no + 1;
        let content = line.trim_end_matches('\r');
        let trimmed = content.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields = format.separator.fields(content);
        if let [single] = fields.as_slice() {
            let id = parse_id(single, line_no, content, 0)?;
            builder.add_node(id);
            continue;
        }

        let source = column(&fields, format.source_column, line_no, content)?;
        let target = column(&fields, format.target_column, line_no, content)?;
        builder.add_edge(source, target);
    }

    Ok(builder.build())
}

fn column(fields: &[&str], col: usize, line: usize, content: &str) -> Result<NodeId, GraphError> {
    let field = fields.get(col).ok_or_else(|| GraphError::MalformedLine {
        line,
        content: content.to_string(),
        reason: format!("missing column {col}"),
    })?;
    parse_id(field, line, content, col)
}

fn parse_id(field: &str, line: usize, content: &str, col: usize) -> Result<NodeId, GraphError> {
    field.parse::<NodeId>().map_err(|_| GraphError::MalformedLine {
        line,
        content: content.to_string(),
        reason: format!("column {col} is not an integer: {field:?}"),
    })
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Write `graph` as an edge list: one line per edge, then one line per
/// isolated node. Loading the output reproduces the graph.
///
/// # Errors
///
/// Propagates write errors from `writer`.
pub fn write_edge_list(
    mut writer: impl Write,
    graph: &Graph,
    separator: Separator,
) -> io::Result<()> {
    let sep = separator.as_char();
    for (u, v) in graph.edges() {
        writeln!(writer, "{u}{sep}{v}")?;
    }
    for idx in (0..graph.node_count()).filter(|&idx| graph.degree_at(idx) == 0) {
        writeln!(writer, "{}", graph.id_of(idx))?;
    }
    writer.flush()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(text: &str, separator: Separator) -> Result<Graph, GraphError> {
        read_edge_list(text.as_bytes(), &EdgeListFormat::with_separator(separator))
    }

    #[test]
    fn tab_separated_edges() {
        let g = parse_str("1\t2\n2\t3\n", Separator::Tab).expect("valid input");
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn space_separated_with_extra_columns() {
        let g = parse_str("1 2 0.5 x\n2 3 1.0 y\n", Separator::Space).expect("valid input");
        assert_eq!(g.edge_count(), 2);
        assert!(g.contains(3));
    }

    #[test]
    fn comments_blank_lines_and_crlf_are_skipped() {
        let text = "# Undirected graph\r\n# Nodes: 3\r\n\r\n1\t2\r\n2\t3\r\n";
        let g = parse_str(text, Separator::Tab).expect("valid input");
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn single_field_line_is_isolated_node() {
        let g = parse_str("1 2\n5\n", Separator::Space).expect("valid input");
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.degree(5).expect("node 5"), 0);
    }

    #[test]
    fn non_integer_column_fails_whole_load() {
        let err = parse_str("1\t2\n3\tx\n", Separator::Tab).expect_err("must fail");
        match err {
            GraphError::MalformedLine { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("column 1"), "reason: {reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn wrong_separator_is_malformed() {
        // "1 2" with a tab separator is one field that is not an integer.
        let err = parse_str("1 2\n", Separator::Tab).expect_err("must fail");
        assert!(matches!(err, GraphError::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn missing_target_column_with_custom_layout() {
        let format = EdgeListFormat {
            separator: Separator::Whitespace,
            source_column: 0,
            target_column: 2,
        };
        let err = read_edge_list("1 2\n".as_bytes(), &format).expect_err("must fail");
        match err {
            GraphError::MalformedLine { reason, .. } => assert!(reason.contains("missing column 2")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn custom_columns_select_ids() {
        let format = EdgeListFormat {
            separator: Separator::Char(','),
            source_column: 1,
            target_column: 2,
        };
        let g = read_edge_list("e1,10,20\ne2,20,30\n".as_bytes(), &format).expect("valid input");
        assert_eq!(g.nodes().collect::<Vec<_>>(), vec![10, 20, 30]);
    }

    #[test]
    fn whitespace_separator_accepts_runs() {
        let g = parse_str("1   2\n2 \t 3\n", Separator::Whitespace).expect("valid input");
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = Graph::load("/definitely/not/here.elist", Separator::Tab).expect_err("must fail");
        assert!(matches!(err, GraphError::InputNotFound(_)));
    }

    #[test]
    fn separator_parses_names_and_chars() {
        assert_eq!("tab".parse::<Separator>(), Ok(Separator::Tab));
        assert_eq!("SPACE".parse::<Separator>(), Ok(Separator::Space));
        assert_eq!("whitespace".parse::<Separator>(), Ok(Separator::Whitespace));
        assert_eq!(",".parse::<Separator>(), Ok(Separator::Char(',')));
        assert!("::".parse::<Separator>().is_err());
    }

    #[test]
    fn written_edge_list_reloads_identically() {
        let mut b = GraphBuilder::new();
        b.add_edge(1, 2);
        b.add_edge(2, 3);
        b.add_node(9);
        let g = b.build();

        let mut buf = Vec::new();
        write_edge_list(&mut buf, &g, Separator::Tab).expect("write to vec");
        let reloaded = parse_str(std::str::from_utf8(&buf).expect("utf8"), Separator::Tab)
            .expect("reload");

        assert_eq!(reloaded.node_count(), 4);
        assert_eq!(reloaded.edge_count(), 2);
        assert_eq!(reloaded.degree(9).expect("node 9"), 0);
    }
}
