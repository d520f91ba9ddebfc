//! Custom assertions for graph verification

use docgraph_ir::features::graph_builder::GraphDocument;
use docgraph_ir::shared::models::{EdgeKind, NodeKind};
use std::collections::{HashMap, HashSet};

/// `text[begin..end]` equals the token text for every offset, in order and
/// without overlap
pub fn assert_offsets_consistent(graph: &GraphDocument, expected_texts: &[&str]) {
    let texts: Vec<_> = graph
        .text
        .offsets
        .iter()
        .map(|offset| graph.text.slice(offset.range()))
        .collect();
    assert_eq!(texts, expected_texts, "token texts recovered from offsets");

    for pair in graph.text.offsets.windows(2) {
        assert!(
            pair[0].end <= pair[1].begin,
            "offsets overlap or go backwards: {:?} then {:?}",
            pair[0],
            pair[1]
        );
    }
}

/// Every node and edge is listed by at least one layer, and the layer lists
/// agree with the per-element layer indices
pub fn assert_layers_complete(graph: &GraphDocument) {
    for node in &graph.nodes {
        assert!(!node.layers.is_empty(), "node {} has no layer", node.seq);
        for &layer in &node.layers {
            assert!(
                graph.layers[layer].nodes.contains(&node.seq),
                "layer {} does not list node {}",
                layer,
                node.seq
            );
        }
    }
    for edge in &graph.edges {
        assert!(!edge.layers.is_empty(), "edge {} has no layer", edge.seq);
        for &layer in &edge.layers {
            assert!(
                graph.layers[layer].edges.contains(&edge.seq),
                "layer {} does not list edge {}",
                layer,
                edge.seq
            );
        }
    }
}

/// Dominance edges form a forest: one parent per node and layer, and every
/// parent numbered after its children
pub fn assert_dominance_forest(graph: &GraphDocument) {
    let mut parents: HashMap<(usize, usize), usize> = HashMap::new();
    for edge in graph.edges_of_kind(EdgeKind::DominanceRelation) {
        assert!(
            edge.source > edge.target,
            "dominance edge {} -> {} does not point to an earlier node",
            edge.source,
            edge.target
        );
        for &layer in &edge.layers {
            if let Some(previous) = parents.insert((layer, edge.target), edge.source) {
                panic!(
                    "node {} dominated by both {} and {} in layer {}",
                    edge.target, previous, edge.source, layer
                );
            }
        }
    }
}

/// Node numbers are exactly `0..n` in list order
pub fn assert_dense_numbering(graph: &GraphDocument) {
    for (i, node) in graph.nodes.iter().enumerate() {
        assert_eq!(node.seq, i, "node numbering has a gap");
    }
    for (i, edge) in graph.edges.iter().enumerate() {
        assert_eq!(edge.seq, i, "edge numbering has a gap");
    }
}

/// Token node numbers a span node reaches through spanning relations, per edge
pub fn spanning_runs(graph: &GraphDocument, source: usize) -> Vec<Vec<usize>> {
    graph
        .edges_from(source)
        .filter(|edge| edge.kind == EdgeKind::SpanningRelation)
        .map(|edge| edge.tokens.clone())
        .collect()
}

/// Node number of an element id
pub fn node_of(graph: &GraphDocument, element_id: &str) -> usize {
    graph
        .node_by_element(element_id)
        .unwrap_or_else(|| panic!("no node for element '{}'", element_id))
        .seq
}

pub fn count_kind(graph: &GraphDocument, kind: NodeKind) -> usize {
    graph.nodes_of_kind(kind).count()
}

/// Distinct (type, set) pairs of the graph's layers
pub fn layer_keys(graph: &GraphDocument) -> HashSet<(String, Option<String>)> {
    graph
        .layers
        .iter()
        .map(|layer| (layer.annotation_type.clone(), layer.set.clone()))
        .collect()
}
