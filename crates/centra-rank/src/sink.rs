//! Ranking files: one `"<id>\t<score>"` line per node, best first.
//!
//! Ids are left-aligned and padded to four columns; scores are written with
//! six decimals. Readers downstream take the first `k` lines as the top-`k`
//! set and may slice the id out of the first four characters, so both line
//! order and padding are part of the format.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use centra_core::NodeId;
use tracing::{debug, instrument};

use crate::error::RankError;
use crate::scores::Scores;

/// Scores sorted descending; equal scores are ordered by ascending node id.
#[must_use]
pub fn rank(scores: &Scores) -> Vec<(NodeId, f64)> {
    let mut ranked: Vec<(NodeId, f64)> = scores.iter().map(|(&id, &s)| (id, s)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
}

/// One ranking line, without the trailing newline.
#[must_use]
pub fn format_line(id: NodeId, score: f64) -> String {
    format!("{id:<4}\t{score:.6}")
}

/// Write `scores` as a ranking.
///
/// # Errors
///
/// Propagates any I/O error from `writer`.
pub fn write_ranking(mut writer: impl Write, scores: &Scores) -> io::Result<()> {
    for (id, score) in rank(scores) {
        writeln!(writer, "{}", format_line(id, score))?;
    }
    writer.flush()
}

/// Write `scores` to `path`, creating the parent directory if needed.
///
/// # Errors
///
/// Returns [`RankError::Write`] if the directory or file cannot be created
/// or written.
#[instrument(skip(scores), fields(path = %path.display(), nodes = scores.len()))]
pub fn write_ranking_file(path: &Path, scores: &Scores) -> Result<(), RankError> {
    let wrap = |source: io::Error| RankError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(wrap)?;
    }
    let file = File::create(path).map_err(wrap)?;
    write_ranking(BufWriter::new(file), scores).map_err(wrap)?;

    debug!("ranking written");
    Ok(())
}

/// Parse a ranking back into `(id, score)` pairs, in file order.
///
/// The id is the whole first token, whatever its width; blank lines are
/// skipped.
///
/// # Errors
///
/// Returns [`RankError::MalformedRanking`] for a line without an integer id
/// followed by a numeric score, and [`RankError::Read`] on I/O failure.
pub fn read_ranking(reader: impl BufRead) -> Result<Vec<(NodeId, f64)>, RankError> {
    let mut ranked = Vec::new();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| RankError::Read {
            path: "<reader>".into(),
            source,
        })?;
        let mut tokens = line.split_whitespace();
        let Some(id_token) = tokens.next() else {
            continue;
        };

        let malformed = |reason: String| RankError::MalformedRanking {
            line: lineno + 1,
            reason,
        };
        let id = id_token
            .parse::<NodeId>()
            .map_err(|e| malformed(format!("node id {id_token:?}: {e}")))?;
        let score_token = tokens
            .next()
            .ok_or_else(|| malformed("missing score".to_string()))?;
        let score = score_token
            .parse::<f64>()
            .map_err(|e| malformed(format!("score {score_token:?}: {e}")))?;

        ranked.push((id, score));
    }

    Ok(ranked)
}

/// Read a ranking file.
///
/// # Errors
///
/// Returns [`RankError::Read`] if the file cannot be opened, otherwise as
/// [`read_ranking`].
pub fn read_ranking_file(path: &Path) -> Result<Vec<(NodeId, f64)>, RankError> {
    let file = File::open(path).map_err(|source| RankError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    read_ranking(BufReader::new(file)).map_err(|err| match err {
        RankError::Read { source, .. } => RankError::Read {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}
