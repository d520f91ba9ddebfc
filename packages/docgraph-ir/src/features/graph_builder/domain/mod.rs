// Graph Builder Domain Models
//
// Flat, offset-addressed output graph: numbered nodes and edges grouped into
// (annotation type, set) layers, plus the datasource strings the token
// offsets point into.

use docgraph_storage::GraphSummary;
use serde::{Deserialize, Serialize};

use crate::shared::models::{EdgeKind, Label, NodeKind, TextRange};

// ============================================================
// Graph Node / Edge
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Sequence number, zero-based per document
    pub seq: usize,
    pub kind: NodeKind,
    /// Identifier of the source element, if it had one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    /// Indices into `GraphDocument::layers`, filled at finalization
    #[serde(default)]
    pub layers: Vec<usize>,
}

impl GraphNode {
    pub fn new(seq: usize, kind: NodeKind) -> Self {
        Self {
            seq,
            kind,
            element_id: None,
            labels: Vec::new(),
            layers: Vec::new(),
        }
    }

    /// First label with the given name
    pub fn label(&self, name: &str) -> Option<&Label> {
        self.labels.iter().find(|label| label.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub seq: usize,
    pub kind: EdgeKind,
    pub source: usize,
    pub target: usize,
    /// Referenced text range (text relations, spanning relations)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<TextRange>,
    /// Token node numbers covered by a spanning relation, in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tokens: Vec<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub layers: Vec<usize>,
}

impl GraphEdge {
    pub fn new(seq: usize, kind: EdgeKind, source: usize, target: usize) -> Self {
        Self {
            seq,
            kind,
            source,
            target,
            range: None,
            tokens: Vec::new(),
            labels: Vec::new(),
            layers: Vec::new(),
        }
    }
}

// ============================================================
// Layers
// ============================================================

/// Handle returned by the layer grouper; index into the layer list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerHandle(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLayer {
    pub annotation_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
    /// `<prefix>::<type>[::<set>]`
    pub namespace: String,
    pub nodes: Vec<usize>,
    pub edges: Vec<usize>,
}

impl GraphLayer {
    pub fn matches(&self, annotation_type: &str, set: Option<&str>) -> bool {
        self.annotation_type == annotation_type && self.set.as_deref() == set
    }
}

// ============================================================
// Datasources
// ============================================================

/// `(token node, begin, end)` triple into a datasource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenOffset {
    pub token: usize,
    pub begin: usize,
    pub end: usize,
}

impl TokenOffset {
    pub fn range(&self) -> TextRange {
        TextRange::new(self.begin, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datasource {
    /// Datasource node number
    pub node: usize,
    pub content: String,
    pub offsets: Vec<TokenOffset>,
}

impl Datasource {
    /// Text covered by a range
    pub fn slice(&self, range: TextRange) -> &str {
        range.slice(&self.content)
    }
}

// ============================================================
// Warnings
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Container without descendant tokens
    UntokenizedStructure,
    /// Span annotation or role referencing no token
    EmptySpan,
    /// Tree node without children
    EmptyNestedNode,
    /// Integrity check found a problem in the finished graph
    Integrity,
}

/// Recoverable problem recorded during conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionWarning {
    pub kind: WarningKind,
    /// Identifier (or description) of the offending element
    pub element: String,
    pub message: String,
}

// ============================================================
// Graph Document
// ============================================================

/// Converted document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub id: String,
    /// Document metadata labels
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub layers: Vec<GraphLayer>,
    pub text: Datasource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phon: Option<Datasource>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ConversionWarning>,
}

impl GraphDocument {
    pub fn node(&self, seq: usize) -> Option<&GraphNode> {
        self.nodes.get(seq)
    }

    /// Node created for an element id
    pub fn node_by_element(&self, element_id: &str) -> Option<&GraphNode> {
        self.nodes
            .iter()
            .find(|node| node.element_id.as_deref() == Some(element_id))
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &GraphNode> + '_ {
        self.nodes.iter().filter(move |node| node.kind == kind)
    }

    /// Outgoing edges of a node, in creation order
    pub fn edges_from(&self, source: usize) -> impl Iterator<Item = &GraphEdge> + '_ {
        self.edges.iter().filter(move |edge| edge.source == source)
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &GraphEdge> + '_ {
        self.edges.iter().filter(move |edge| edge.kind == kind)
    }

    pub fn layer(&self, annotation_type: &str, set: Option<&str>) -> Option<&GraphLayer> {
        self.layers
            .iter()
            .find(|layer| layer.matches(annotation_type, set))
    }

    /// Counts recorded in the corpus manifest
    pub fn summary(&self) -> GraphSummary {
        GraphSummary::new(self.nodes.len(), self.edges.len(), self.layers.len())
    }

    /// Text of a token node, via its offset
    pub fn token_text(&self, token: usize) -> Option<&str> {
        self.text
            .offsets
            .iter()
            .find(|offset| offset.token == token)
            .map(|offset| self.text.slice(offset.range()))
    }
}
