//! Property tests for engine invariants on random graphs.
//!
//! - PageRank mass is one at any iteration cap and for any preference set.
//! - Betweenness is invariant under relabeling node ids.
//! - Closeness and normalized betweenness lie in `[0, 1]`.
//! - Rankings are sorted and survive a write/read cycle.

use std::collections::BTreeSet;

use centra_core::{Graph, NodeId};
use centra_rank::betweenness::betweenness_centrality;
use centra_rank::closeness::closeness_centrality;
use centra_rank::pagerank::{PageRankConfig, Personalization, pagerank};
use centra_rank::sink::{rank, read_ranking, write_ranking};
use proptest::prelude::*;

fn arb_edges() -> impl Strategy<Value = Vec<(NodeId, NodeId)>> {
    prop::collection::vec((0_i64..24, 0_i64..24), 0..60)
}

fn relabel(id: NodeId) -> NodeId {
    id * 7 + 1000
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn pagerank_sums_to_one(
        edges in arb_edges(),
        max_iterations in 0_usize..6,
        alpha in 0.05_f64..0.95,
    ) {
        let g = Graph::from_edges(edges);
        let config = PageRankConfig { alpha, max_iterations, ..PageRankConfig::default() };
        let r = pagerank(&g, &config, &Personalization::Uniform).expect("valid input");
        if !g.is_empty() {
            let total: f64 = r.scores.values().sum();
            prop_assert!((total - 1.0).abs() < 1e-9, "total {}", total);
        }
        prop_assert!(r.iterations <= max_iterations);
    }

    #[test]
    fn personalized_pagerank_sums_to_one(edges in arb_edges(), pick in 1_usize..5) {
        let g = Graph::from_edges(edges);
        let preferred: Vec<NodeId> = g.nodes().step_by(pick).collect();
        let r = pagerank(&g, &PageRankConfig::default(), &Personalization::Preference(preferred))
            .expect("preferred nodes exist");
        if !g.is_empty() {
            let total: f64 = r.scores.values().sum();
            prop_assert!((total - 1.0).abs() < 1e-9, "total {}", total);
        }
    }

    #[test]
    fn betweenness_is_relabeling_invariant(edges in arb_edges()) {
        let g = Graph::from_edges(edges.iter().copied());
        let h = Graph::from_edges(edges.iter().map(|&(u, v)| (relabel(u), relabel(v))));
        let bg = betweenness_centrality(&g);
        let bh = betweenness_centrality(&h);
        for (id, score) in &bg {
            prop_assert!((score - bh[&relabel(*id)]).abs() < 1e-9);
        }
    }

    #[test]
    fn scores_are_bounded(edges in arb_edges()) {
        let g = Graph::from_edges(edges);
        for score in closeness_centrality(&g).values() {
            prop_assert!((0.0..=1.0 + 1e-12).contains(score));
        }
        for score in betweenness_centrality(&g).values() {
            prop_assert!((0.0..=1.0 + 1e-12).contains(score));
        }
    }

    #[test]
    fn ranking_order_and_round_trip(edges in arb_edges()) {
        let g = Graph::from_edges(edges);
        let scores = closeness_centrality(&g);
        let ranked = rank(&scores);
        prop_assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));

        let mut buf = Vec::new();
        write_ranking(&mut buf, &scores).expect("write to vec");
        let parsed = read_ranking(buf.as_slice()).expect("own output parses");

        prop_assert_eq!(parsed.len(), ranked.len());
        let ids: BTreeSet<NodeId> = parsed.iter().map(|(id, _)| *id).collect();
        prop_assert_eq!(ids.len(), g.node_count());
        for ((id, score), (rid, rscore)) in parsed.iter().zip(&ranked) {
            prop_assert_eq!(id, rid);
            prop_assert!((score - rscore).abs() <= 5e-7);
        }
    }
}
