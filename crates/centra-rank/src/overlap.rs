//! Top-`k` agreement between two rankings.
//!
//! Used to check a ranking file against one produced by an independent
//! implementation: both are cut to their first `k` entries and the id sets
//! are intersected.

use std::collections::BTreeSet;

use centra_core::NodeId;
use serde::Serialize;

/// Ids of the first `k` entries of an already-sorted ranking.
#[must_use]
pub fn top_k(ranked: &[(NodeId, f64)], k: usize) -> BTreeSet<NodeId> {
    ranked.iter().take(k).map(|(id, _)| *id).collect()
}

/// Result of comparing two top-`k` sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlapReport {
    pub k: usize,
    pub ours: BTreeSet<NodeId>,
    pub theirs: BTreeSet<NodeId>,
    pub common: BTreeSet<NodeId>,
}

impl OverlapReport {
    #[must_use]
    pub fn overlap_count(&self) -> usize {
        self.common.len()
    }

    /// `|ours ∩ theirs| / |ours ∪ theirs|`; `1.0` when both sets are empty.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn jaccard(&self) -> f64 {
        let union = self.ours.union(&self.theirs).count();
        if union == 0 {
            1.0
        } else {
            self.common.len() as f64 / union as f64
        }
    }

    /// Ids in our top-`k` but not theirs.
    #[must_use]
    pub fn only_ours(&self) -> BTreeSet<NodeId> {
        self.ours.difference(&self.theirs).copied().collect()
    }

    /// Ids in their top-`k` but not ours.
    #[must_use]
    pub fn only_theirs(&self) -> BTreeSet<NodeId> {
        self.theirs.difference(&self.ours).copied().collect()
    }
}

/// Compare the top-`k` of two sorted rankings.
#[must_use]
pub fn compare(ours: &[(NodeId, f64)], theirs: &[(NodeId, f64)], k: usize) -> OverlapReport {
    let ours = top_k(ours, k);
    let theirs = top_k(theirs, k);
    let common = ours.intersection(&theirs).copied().collect();
    OverlapReport {
        k,
        ours,
        theirs,
        common,
    }
}
