//! Annotation document model
//!
//! Serde representation of a hierarchical, multi-layer annotation document:
//! structural containers holding tokens, plus independent span layers and
//! nested (tree-shaped) span layers that reference tokens by identifier.
//!
//! ```text
//! Document
//!  ├─ body: [Structure]            text > div > p > s > w
//!  │         └─ children: Structure | Token
//!  └─ annotations: [AnnotationLayer]
//!            ├─ Span   { spans: [SpanAnnotation { wrefs, roles }] }
//!            └─ Nested { roots: [NestedNode { children: Node | Token }] }
//! ```

use ahash::AHashMap;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

// ============================================================
// Shared element attributes
// ============================================================

/// Attributes every annotation element may carry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor: Option<Processor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<Feature>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub descriptions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
}

impl ElementInfo {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Tool or person that produced an annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Processor {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default = "default_processor_type")]
    pub processor_type: String,
}

fn default_processor_type() -> String {
    "auto".to_string()
}

/// Subset/class pair attached to an annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub subset: String,
    pub class: String,
}

// ============================================================
// Annotation categories
// ============================================================

/// How an annotation is turned into graph structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationCategory {
    /// Container above tokens (sentence, paragraph, division)
    Structural,
    /// Independent, possibly discontinuous span
    SimpleSpan,
    /// Role inside a span annotation (head, dependent)
    SpanRole,
    /// Tree-shaped span (syntax)
    NestedSpan,
}

impl AnnotationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::SimpleSpan => "simple_span",
            Self::SpanRole => "span_role",
            Self::NestedSpan => "nested_span",
        }
    }
}

impl std::fmt::Display for AnnotationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================
// Structure and tokens
// ============================================================

/// Structural container (sentence, paragraph, division, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub annotation_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    #[serde(flatten)]
    pub info: ElementInfo,
    #[serde(default)]
    pub children: Vec<StructureChild>,
}

impl Structure {
    pub fn new(annotation_type: impl Into<String>, id: Option<&str>) -> Self {
        Self {
            annotation_type: annotation_type.into(),
            set: None,
            element_type: None,
            info: ElementInfo {
                id: id.map(str::to_string),
                ..Default::default()
            },
            children: Vec::new(),
        }
    }

    pub fn with_token(mut self, token: Token) -> Self {
        self.children.push(StructureChild::Token(token));
        self
    }

    pub fn with_structure(mut self, structure: Structure) -> Self {
        self.children.push(StructureChild::Structure(structure));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureChild {
    Structure(Structure),
    Token(Token),
}

/// Smallest text-bearing unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    #[serde(flatten)]
    pub info: ElementInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phon: Option<String>,
    /// Whitespace follows this token in the original text
    #[serde(default = "default_space")]
    pub space: bool,
    /// Inline annotations (part-of-speech, lemma, ...)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<InlineAnnotation>,
}

fn default_space() -> bool {
    true
}

impl Token {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            info: ElementInfo::with_id(id),
            set: None,
            text: Some(text.into()),
            phon: None,
            space: true,
            annotations: Vec::new(),
        }
    }

    pub fn no_space(mut self) -> Self {
        self.space = false;
        self
    }

    pub fn with_annotation(mut self, annotation: InlineAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.info.id()
    }

    /// Text content, `None` when absent or empty
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    pub fn phon(&self) -> Option<&str> {
        self.phon.as_deref().filter(|p| !p.is_empty())
    }
}

/// Annotation attached to exactly one token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineAnnotation {
    pub annotation_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    #[serde(flatten)]
    pub info: ElementInfo,
}

impl InlineAnnotation {
    pub fn new(annotation_type: impl Into<String>, set: Option<&str>, class: &str) -> Self {
        Self {
            annotation_type: annotation_type.into(),
            set: set.map(str::to_string),
            element_type: None,
            info: ElementInfo {
                class: Some(class.to_string()),
                ..Default::default()
            },
        }
    }
}

// ============================================================
// Span layers
// ============================================================

/// Layer of stand-off annotations over tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum AnnotationLayer {
    Span(SpanLayer),
    Nested(NestedLayer),
}

impl AnnotationLayer {
    pub fn category(&self) -> AnnotationCategory {
        match self {
            Self::Span(_) => AnnotationCategory::SimpleSpan,
            Self::Nested(_) => AnnotationCategory::NestedSpan,
        }
    }

    pub fn annotation_type(&self) -> &str {
        match self {
            Self::Span(layer) => &layer.annotation_type,
            Self::Nested(layer) => &layer.annotation_type,
        }
    }

    pub fn set(&self) -> Option<&str> {
        match self {
            Self::Span(layer) => layer.set.as_deref(),
            Self::Nested(layer) => layer.set.as_deref(),
        }
    }
}

/// Independent span annotations (entities, chunks, dependencies, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanLayer {
    pub annotation_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
    #[serde(default)]
    pub spans: Vec<SpanAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    #[serde(flatten)]
    pub info: ElementInfo,
    /// Referenced token ids, in annotation order
    #[serde(default)]
    pub wrefs: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<SpanRole>,
}

impl SpanAnnotation {
    pub fn new(id: Option<&str>, wrefs: &[&str]) -> Self {
        Self {
            element_type: None,
            info: ElementInfo {
                id: id.map(str::to_string),
                ..Default::default()
            },
            wrefs: wrefs.iter().map(|w| w.to_string()).collect(),
            roles: Vec::new(),
        }
    }

    /// Direct references, or the roles' references when there are none
    pub fn effective_wrefs(&self) -> Vec<&str> {
        if !self.wrefs.is_empty() {
            return self.wrefs.iter().map(String::as_str).collect();
        }
        let mut seen = ahash::AHashSet::new();
        self.roles
            .iter()
            .flat_map(|role| role.wrefs.iter())
            .map(String::as_str)
            .filter(|w| seen.insert(*w))
            .collect()
    }
}

/// Role inside a span annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanRole {
    /// Role element ("hd", "dep", ...)
    pub element_type: String,
    #[serde(flatten)]
    pub info: ElementInfo,
    #[serde(default)]
    pub wrefs: Vec<String>,
}

/// Tree-shaped annotations (syntax)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedLayer {
    pub annotation_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
    #[serde(default)]
    pub roots: Vec<NestedNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    #[serde(flatten)]
    pub info: ElementInfo,
    #[serde(default)]
    pub children: Vec<NestedChild>,
}

impl NestedNode {
    pub fn new(id: Option<&str>, class: &str) -> Self {
        Self {
            element_type: None,
            info: ElementInfo {
                id: id.map(str::to_string),
                class: Some(class.to_string()),
                ..Default::default()
            },
            children: Vec::new(),
        }
    }

    pub fn with_node(mut self, node: NestedNode) -> Self {
        self.children.push(NestedChild::Node(node));
        self
    }

    pub fn with_token(mut self, wref: &str) -> Self {
        self.children.push(NestedChild::Token(wref.to_string()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NestedChild {
    Node(NestedNode),
    /// Token reference by id
    Token(String),
}

// ============================================================
// Document
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Empty when absent; the loader then uses the file stem
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    /// Annotation type → default set
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub default_sets: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Vec<Structure>,
    #[serde(default)]
    pub annotations: Vec<AnnotationLayer>,
}

impl Document {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            metadata: BTreeMap::new(),
            default_sets: BTreeMap::new(),
            body: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn default_set(&self, annotation_type: &str) -> Option<&str> {
        self.default_sets.get(annotation_type).map(String::as_str)
    }

    /// Ordered token/container enumeration
    pub fn index(&self) -> DocumentIndex<'_> {
        DocumentIndex::build(self)
    }
}

// ============================================================
// Document index
// ============================================================

/// Token in document order with its immediate container
#[derive(Debug, Clone, Copy)]
pub struct TokenSlot<'a> {
    pub token: &'a Token,
    /// Position in document order (0-based)
    pub position: usize,
    /// Ordinal of the immediate container in `DocumentIndex::structures`
    pub parent: usize,
}

/// Container in pre-order with the positions of its descendant tokens
#[derive(Debug, Clone)]
pub struct StructureSlot<'a> {
    pub structure: &'a Structure,
    pub ordinal: usize,
    pub depth: usize,
    pub tokens: Range<usize>,
}

impl StructureSlot<'_> {
    pub fn is_tokenized(&self) -> bool {
        !self.tokens.is_empty()
    }
}

/// Flattened view of a document's structure
///
/// Descendant tokens of a container are contiguous in document order, so
/// every container is described by a position range.
#[derive(Debug)]
pub struct DocumentIndex<'a> {
    pub tokens: Vec<TokenSlot<'a>>,
    pub structures: Vec<StructureSlot<'a>>,
    positions: AHashMap<&'a str, usize>,
}

impl<'a> DocumentIndex<'a> {
    pub fn build(doc: &'a Document) -> Self {
        let mut index = Self {
            tokens: Vec::new(),
            structures: Vec::new(),
            positions: AHashMap::new(),
        };
        for structure in &doc.body {
            index.visit(structure, 0);
        }
        index
    }

    fn visit(&mut self, structure: &'a Structure, depth: usize) {
        let ordinal = self.structures.len();
        let first = self.tokens.len();
        self.structures.push(StructureSlot {
            structure,
            ordinal,
            depth,
            tokens: first..first,
        });

        for child in &structure.children {
            match child {
                StructureChild::Structure(inner) => self.visit(inner, depth + 1),
                StructureChild::Token(token) => {
                    let position = self.tokens.len();
                    if let Some(id) = token.id() {
                        self.positions.entry(id).or_insert(position);
                    }
                    self.tokens.push(TokenSlot {
                        token,
                        position,
                        parent: ordinal,
                    });
                }
            }
        }

        self.structures[ordinal].tokens = first..self.tokens.len();
    }

    /// Document position of a token id
    pub fn position(&self, token_id: &str) -> Option<usize> {
        self.positions.get(token_id).copied()
    }

    pub fn tokens_of(&self, slot: &StructureSlot<'_>) -> &[TokenSlot<'a>] {
        &self.tokens[slot.tokens.clone()]
    }
}
