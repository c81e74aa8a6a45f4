//! Graph store tests against real files and generated graphs.

use std::io::Write;

use centra_core::edgelist::write_edge_list;
use centra_core::{EdgeListFormat, Graph, GraphError, Separator};
use proptest::prelude::*;
use tempfile::NamedTempFile;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write edge list");
    file
}

#[test]
fn load_space_separated_file() {
    let file = write_temp("0 1\n0 2\n1 2\n2 3\n");
    let g = Graph::load(file.path(), Separator::Space).expect("valid file");

    assert_eq!(g.node_count(), 4);
    assert_eq!(g.edge_count(), 4);
    assert_eq!(g.degree(2).expect("node 2"), 3);
    assert_eq!(g.max_node_id(), Some(3));
}

#[test]
fn load_keeps_isolated_node_lines() {
    let file = write_temp("1\t2\n2\t3\n5\n");
    let g = Graph::load(file.path(), Separator::Tab).expect("valid file");

    assert!(g.contains(5));
    assert_eq!(g.neighbors(5).expect("node 5").count(), 0);
}

#[test]
fn malformed_line_aborts_load() {
    let file = write_temp("1\t2\n2\tthree\n3\t4\n");
    let err = Graph::load(file.path(), Separator::Tab).expect_err("must fail");
    assert!(matches!(err, GraphError::MalformedLine { line: 2, .. }));
}

#[test]
fn snap_style_header_is_ignored() {
    let file = write_temp(
        "# Undirected graph: ../../data/output/amazon.ungraph.txt\n# FromNodeId\tToNodeId\n1\t88160\n1\t118052\n",
    );
    let g = Graph::from_edge_list(file.path(), &EdgeListFormat::default()).expect("valid file");
    assert_eq!(g.edge_count(), 2);
    assert!(g.contains(118_052));
}

#[test]
fn subgraph_round_trips_through_file() {
    let g = Graph::from_edges([(4, 8), (8, 12), (12, 5), (16, 20), (3, 4)]);
    let sub = g.induced(|id| id % 4 == 0);

    let mut file = NamedTempFile::new().expect("temp file");
    write_edge_list(&mut file, &sub, Separator::Space).expect("write");

    let reloaded = Graph::load(file.path(), Separator::Space).expect("reload");
    assert_eq!(reloaded.node_count(), sub.node_count());
    assert_eq!(reloaded.edge_count(), sub.edge_count());
    for id in sub.nodes() {
        assert_eq!(
            reloaded.degree(id).expect("node present"),
            sub.degree(id).expect("node present")
        );
    }
}

fn arb_edges() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((0_i64..40, 0_i64..40), 0..120)
}

proptest! {
    #[test]
    fn adjacency_is_always_symmetric(edges in arb_edges()) {
        let g = Graph::from_edges(edges);
        for u in g.nodes() {
            for v in g.neighbors(u).expect("node exists") {
                prop_assert!(g.neighbors(v).expect("node exists").any(|w| w == u));
            }
        }
    }

    #[test]
    fn every_endpoint_is_a_node(edges in arb_edges()) {
        let g = Graph::from_edges(edges.clone());
        for (u, v) in edges {
            prop_assert!(g.contains(u));
            prop_assert!(g.contains(v));
        }
    }

    #[test]
    fn degree_sum_matches_edge_count(edges in arb_edges()) {
        let g = Graph::from_edges(edges);
        let loops = g.edges().filter(|(u, v)| u == v).count();
        let degree_sum: usize = g.nodes().map(|id| g.degree(id).expect("node exists")).sum();
        prop_assert_eq!(degree_sum, 2 * g.edge_count() - loops);
    }
}
