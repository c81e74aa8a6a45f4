//! Known-topology regression tests for the centrality engines.
//!
//! Each test uses a hand-crafted graph with known properties. Expected
//! values are computed analytically and hardcoded, so any algorithm change
//! that shifts them is caught.

use centra_core::{Graph, GraphBuilder, NodeId};
use centra_rank::betweenness::betweenness_centrality;
use centra_rank::closeness::closeness_centrality;
use centra_rank::pagerank::{PageRankConfig, Personalization, pagerank};
use centra_rank::sink::rank;
use centra_rank::structure::structure_report;

const EPS: f64 = 1e-9;

fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < EPS,
        "{what}: expected {expected}, got {actual}"
    );
}

// ===========================================================================
// Barbell: triangles {1,2,3} and {4,5,6} joined by the bridge 3 - 4
// ===========================================================================

fn barbell() -> Graph {
    Graph::from_edges([(1, 2), (2, 3), (3, 1), (3, 4), (4, 5), (5, 6), (6, 4)])
}

#[test]
fn barbell_closeness() {
    let cc = closeness_centrality(&barbell());
    // Bridge end: 1 + 1 + 1 + 2 + 2.
    assert_close(cc[&3], 5.0 / 7.0, "closeness(3)");
    assert_close(cc[&4], 5.0 / 7.0, "closeness(4)");
    // Outer node: 1 + 1 + 2 + 3 + 3.
    assert_close(cc[&1], 0.5, "closeness(1)");
}

#[test]
fn barbell_betweenness() {
    let bc = betweenness_centrality(&barbell());
    // {1,2} x {4,5,6} all cross 3: 6 pairs, both directions, over 5 * 4.
    assert_close(bc[&3], 12.0 / 20.0, "betweenness(3)");
    assert_close(bc[&4], 12.0 / 20.0, "betweenness(4)");
    for outer in [1, 2, 5, 6] {
        assert_close(bc[&outer], 0.0, "outer betweenness");
    }
}

#[test]
fn barbell_pagerank_is_symmetric() {
    let r = pagerank(
        &barbell(),
        &PageRankConfig::default(),
        &Personalization::Uniform,
    )
    .expect("valid input");
    assert!(r.converged());
    assert!((r.scores[&1] - r.scores[&6]).abs() < 1e-8);
    assert!((r.scores[&3] - r.scores[&4]).abs() < 1e-8);
    assert!(r.scores[&3] > r.scores[&1]);
}

#[test]
fn barbell_ranking_puts_bridge_first() {
    let ranked = rank(&betweenness_centrality(&barbell()));
    let top: Vec<NodeId> = ranked.iter().take(2).map(|(id, _)| *id).collect();
    assert_eq!(top, vec![3, 4]);
    // Zero-score tail is ordered by id.
    let tail: Vec<NodeId> = ranked.iter().skip(2).map(|(id, _)| *id).collect();
    assert_eq!(tail, vec![1, 2, 5, 6]);
}

#[test]
fn barbell_structure() {
    let report = structure_report(&barbell(), &[10, 100], 42);
    assert_eq!(report.node_count, 6);
    assert_eq!(report.edge_count, 7);
    assert_eq!(report.max_degree, 3);
    assert_eq!(report.max_degree_nodes, vec![3, 4]);
    assert_eq!(report.component_count, 1);
    assert_close(report.largest_component_fraction, 1.0, "largest component");
    assert_eq!(report.triangle_count, 2);
    // Every sample covers all six nodes, which reach the far end at 3 hops.
    assert!(report.diameters.iter().all(|d| d.full == 3));
}

// ===========================================================================
// Cycle C5: vertex-transitive, every node looks the same
// ===========================================================================

fn cycle5() -> Graph {
    Graph::from_edges([(1, 2), (2, 3), (3, 4), (4, 5), (5, 1)])
}

#[test]
fn cycle_scores_are_uniform() {
    let g = cycle5();
    let cc = closeness_centrality(&g);
    let bc = betweenness_centrality(&g);
    let pr = pagerank(&g, &PageRankConfig::default(), &Personalization::Uniform)
        .expect("valid input");

    for id in 1..=5 {
        assert_close(cc[&id], 4.0 / 6.0, "cycle closeness");
        // One distance-2 pair per node, both directions, over 4 * 3.
        assert_close(bc[&id], 2.0 / 12.0, "cycle betweenness");
        assert_close(pr.scores[&id], 0.2, "cycle pagerank");
    }
}

// ===========================================================================
// Mixed components with isolated nodes
// ===========================================================================

fn path_plus_isolated() -> Graph {
    let mut b = GraphBuilder::new();
    b.add_edge(1, 2);
    b.add_edge(2, 3);
    b.add_node(5);
    b.build()
}

#[test]
fn isolated_node_is_zero_everywhere_but_pagerank() {
    let g = path_plus_isolated();
    let cc = closeness_centrality(&g);
    let bc = betweenness_centrality(&g);
    assert_close(cc[&5], 0.0, "closeness(5)");
    assert_close(bc[&5], 0.0, "betweenness(5)");
    // Path middle: 2 ordered pairs over 3 * 2.
    assert_close(bc[&2], 2.0 / 6.0, "betweenness(2)");

    let pr = pagerank(&g, &PageRankConfig::default(), &Personalization::Uniform)
        .expect("valid input");
    assert!(pr.scores[&5] > 0.0);
    assert_close(pr.scores.values().sum(), 1.0, "pagerank mass");
}

#[test]
fn modulo_preference_pulls_mass_to_multiples_of_four() {
    let g = Graph::from_edges([(1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 7), (7, 8)]);
    let biased = pagerank(
        &g,
        &PageRankConfig::default(),
        &Personalization::modulo(&g, 4).expect("positive modulus"),
    )
    .expect("valid input");
    let ranked = rank(&biased.scores);
    let top: Vec<NodeId> = ranked.iter().take(2).map(|(id, _)| *id).collect();
    assert!(top.contains(&4), "top two: {top:?}");
}
