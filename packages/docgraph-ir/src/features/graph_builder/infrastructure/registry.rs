//! Node/edge registry
//!
//! Single owner of node and edge numbering for one document. Append-only:
//! a sequence number, once handed out, never changes meaning.

use ahash::AHashMap;

use crate::errors::{ExportError, Result};
use crate::features::graph_builder::domain::{GraphEdge, GraphNode};
use crate::shared::models::{EdgeKind, NodeKind};

#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    ids: AHashMap<String, usize>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node and return its sequence number
    pub fn new_node(&mut self, kind: NodeKind) -> usize {
        let seq = self.nodes.len();
        self.nodes.push(GraphNode::new(seq, kind));
        seq
    }

    /// Record a directed edge and return its sequence number
    pub fn record_edge(&mut self, kind: EdgeKind, source: usize, target: usize) -> usize {
        let seq = self.edges.len();
        self.edges.push(GraphEdge::new(seq, kind, source, target));
        seq
    }

    /// Associate an element identifier with a node
    pub fn bind(&mut self, element_id: &str, seq: usize) -> Result<()> {
        if self.ids.contains_key(element_id) {
            return Err(ExportError::DuplicateIdentifier {
                id: element_id.to_string(),
            });
        }
        self.ids.insert(element_id.to_string(), seq);
        if let Some(node) = self.nodes.get_mut(seq) {
            node.element_id = Some(element_id.to_string());
        }
        Ok(())
    }

    pub fn lookup(&self, element_id: &str) -> Option<usize> {
        self.ids.get(element_id).copied()
    }

    /// Lookup that treats an unknown id as a dangling reference
    pub fn resolve(&self, element_id: &str, referrer: &str) -> Result<usize> {
        self.lookup(element_id)
            .ok_or_else(|| ExportError::dangling(element_id, referrer))
    }

    pub fn node(&self, seq: usize) -> Option<&GraphNode> {
        self.nodes.get(seq)
    }

    pub fn node_mut(&mut self, seq: usize) -> Option<&mut GraphNode> {
        self.nodes.get_mut(seq)
    }

    pub fn edge_mut(&mut self, seq: usize) -> Option<&mut GraphEdge> {
        self.edges.get_mut(seq)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn into_parts(self) -> (Vec<GraphNode>, Vec<GraphEdge>) {
        (self.nodes, self.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_numbers_are_monotonic() {
        let mut registry = NodeRegistry::new();
        assert_eq!(registry.new_node(NodeKind::TextDatasource), 0);
        assert_eq!(registry.new_node(NodeKind::Token), 1);
        assert_eq!(registry.new_node(NodeKind::Span), 2);
        assert_eq!(registry.record_edge(EdgeKind::TextRelation, 1, 0), 0);
        assert_eq!(registry.record_edge(EdgeKind::SpanningRelation, 2, 1), 1);
        assert_eq!(registry.node_count(), 3);
        assert_eq!(registry.edge_count(), 2);
    }

    #[test]
    fn test_bind_and_lookup() {
        let mut registry = NodeRegistry::new();
        let seq = registry.new_node(NodeKind::Token);
        registry.bind("w1", seq).unwrap();

        assert_eq!(registry.lookup("w1"), Some(seq));
        assert_eq!(registry.lookup("w2"), None);
        assert_eq!(registry.node(seq).unwrap().element_id.as_deref(), Some("w1"));
    }

    #[test]
    fn test_duplicate_bind_fails() {
        let mut registry = NodeRegistry::new();
        let a = registry.new_node(NodeKind::Token);
        let b = registry.new_node(NodeKind::Token);
        registry.bind("w1", a).unwrap();

        let err = registry.bind("w1", b).unwrap_err();
        assert!(matches!(err, ExportError::DuplicateIdentifier { ref id } if id == "w1"));
        assert_eq!(registry.lookup("w1"), Some(a));
    }

    #[test]
    fn test_resolve_dangling() {
        let registry = NodeRegistry::new();
        let err = registry.resolve("w9", "span 'e1'").unwrap_err();
        assert!(matches!(err, ExportError::DanglingReference { .. }));
    }
}
