//! Structural checks on a finished graph
//!
//! - every edge endpoint is a node
//! - every node and edge belongs to at least one layer
//! - dominance relations are acyclic, and within one layer no node has two
//!   dominance parents
//! - datasource offsets are ordered and non-overlapping

use ahash::AHashMap;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;

use crate::features::graph_builder::domain::{Datasource, GraphDocument};
use crate::shared::models::EdgeKind;

pub struct IntegrityChecker;

impl IntegrityChecker {
    /// All violations found, empty when the graph is sound
    pub fn check(graph: &GraphDocument) -> Vec<String> {
        let mut violations = Vec::new();
        Self::check_endpoints(graph, &mut violations);
        Self::check_layers(graph, &mut violations);
        Self::check_dominance(graph, &mut violations);
        Self::check_offsets("text", &graph.text, &mut violations);
        if let Some(phon) = &graph.phon {
            Self::check_offsets("phon", phon, &mut violations);
        }
        violations
    }

    fn check_endpoints(graph: &GraphDocument, violations: &mut Vec<String>) {
        let count = graph.nodes.len();
        for edge in &graph.edges {
            if edge.source >= count || edge.target >= count {
                violations.push(format!(
                    "edge {} connects missing node ({} -> {})",
                    edge.seq, edge.source, edge.target
                ));
            }
        }
    }

    fn check_layers(graph: &GraphDocument, violations: &mut Vec<String>) {
        for node in graph.nodes.iter().filter(|n| n.layers.is_empty()) {
            violations.push(format!("node {} ({}) belongs to no layer", node.seq, node.kind.as_str()));
        }
        for edge in graph.edges.iter().filter(|e| e.layers.is_empty()) {
            violations.push(format!("edge {} ({}) belongs to no layer", edge.seq, edge.kind.as_str()));
        }
    }

    fn check_dominance(graph: &GraphDocument, violations: &mut Vec<String>) {
        let mut dominance: DiGraph<usize, ()> = DiGraph::new();
        let indices: Vec<_> = graph.nodes.iter().map(|n| dominance.add_node(n.seq)).collect();
        let mut parents: AHashMap<(usize, usize), usize> = AHashMap::new();

        for edge in graph.edges_of_kind(EdgeKind::DominanceRelation) {
            let (Some(&source), Some(&target)) = (indices.get(edge.source), indices.get(edge.target))
            else {
                continue;
            };
            dominance.add_edge(source, target, ());

            for &layer in &edge.layers {
                if let Some(previous) = parents.insert((layer, edge.target), edge.source) {
                    if previous != edge.source {
                        violations.push(format!(
                            "node {} has dominance parents {} and {} in layer {}",
                            edge.target, previous, edge.source, layer
                        ));
                    }
                }
            }
        }

        if is_cyclic_directed(&dominance) {
            violations.push("dominance relations contain a cycle".to_string());
        }
    }

    fn check_offsets(name: &str, datasource: &Datasource, violations: &mut Vec<String>) {
        let content_len = datasource.content.chars().count();
        let mut last_end = 0;
        for offset in &datasource.offsets {
            if offset.begin < last_end || offset.end < offset.begin || offset.end > content_len {
                violations.push(format!(
                    "{} offset of token {} ({}..{}) out of order",
                    name, offset.token, offset.begin, offset.end
                ));
            }
            last_end = offset.end;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::graph_builder::domain::{GraphEdge, GraphLayer, GraphNode, TokenOffset};
    use crate::shared::models::NodeKind;

    fn graph(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> GraphDocument {
        GraphDocument {
            id: "doc".to_string(),
            labels: Vec::new(),
            nodes,
            edges,
            layers: vec![GraphLayer {
                annotation_type: "syntax".to_string(),
                set: None,
                namespace: "FoLiA::syntax".to_string(),
                nodes: vec![],
                edges: vec![],
            }],
            text: Datasource {
                node: 0,
                content: "ab".to_string(),
                offsets: vec![],
            },
            phon: None,
            warnings: Vec::new(),
        }
    }

    fn node(seq: usize, kind: NodeKind) -> GraphNode {
        let mut node = GraphNode::new(seq, kind);
        node.layers.push(0);
        node
    }

    fn dominance(seq: usize, source: usize, target: usize) -> GraphEdge {
        let mut edge = GraphEdge::new(seq, EdgeKind::DominanceRelation, source, target);
        edge.layers.push(0);
        edge
    }

    #[test]
    fn test_sound_graph() {
        let g = graph(
            vec![node(0, NodeKind::Token), node(1, NodeKind::DominanceNode)],
            vec![dominance(0, 1, 0)],
        );
        assert!(IntegrityChecker::check(&g).is_empty());
    }

    #[test]
    fn test_detects_cycle_and_double_parent() {
        let g = graph(
            vec![
                node(0, NodeKind::DominanceNode),
                node(1, NodeKind::DominanceNode),
                node(2, NodeKind::DominanceNode),
            ],
            vec![dominance(0, 0, 1), dominance(1, 1, 0), dominance(2, 2, 1)],
        );
        let violations = IntegrityChecker::check(&g);
        assert!(violations.iter().any(|v| v.contains("cycle")));
        assert!(violations.iter().any(|v| v.contains("dominance parents")));
    }

    #[test]
    fn test_detects_missing_layer_and_endpoint() {
        let mut g = graph(
            vec![GraphNode::new(0, NodeKind::Token)],
            vec![dominance(0, 0, 7)],
        );
        g.text.offsets.push(TokenOffset {
            token: 0,
            begin: 1,
            end: 5,
        });
        let violations = IntegrityChecker::check(&g);
        assert!(violations.iter().any(|v| v.contains("belongs to no layer")));
        assert!(violations.iter().any(|v| v.contains("missing node")));
        assert!(violations.iter().any(|v| v.contains("out of order")));
    }
}
