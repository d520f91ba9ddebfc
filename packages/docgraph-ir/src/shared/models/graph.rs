//! Graph element kinds and labels

use serde::{Deserialize, Serialize};

/// Node kind in the exported graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Text (or phonetic) datasource holding the linearized string
    TextDatasource,
    Token,
    /// Independent span annotation or span role
    Span,
    /// Structural container (sentence, paragraph, ...)
    StructuralSpan,
    /// Internal node of a nested span annotation
    DominanceNode,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextDatasource => "text_datasource",
            Self::Token => "token",
            Self::Span => "span",
            Self::StructuralSpan => "structural_span",
            Self::DominanceNode => "dominance_node",
        }
    }
}

/// Edge kind in the exported graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// token → datasource
    TextRelation,
    /// span / structural span → token (run)
    SpanningRelation,
    /// tree node → child tree node or token
    DominanceRelation,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextRelation => "text_relation",
            Self::SpanningRelation => "spanning_relation",
            Self::DominanceRelation => "dominance_relation",
        }
    }
}

/// What a label describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelKind {
    /// Stable identifier of the source element
    Identifier,
    /// Linguistic annotation value (class, features)
    Annotation,
    /// Provenance and bookkeeping (type info, confidence, processor, ...)
    MetaAnnotation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum LabelValue {
    Text(String),
    Float(f64),
}

impl LabelValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Float(_) => None,
        }
    }
}

/// Typed key/value attached to a node, edge or graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub kind: LabelKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub name: String,
    pub value: LabelValue,
}

impl Label {
    pub fn text(
        kind: LabelKind,
        namespace: Option<&str>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            namespace: namespace.map(str::to_string),
            name: name.into(),
            value: LabelValue::Text(value.into()),
        }
    }

    pub fn float(kind: LabelKind, namespace: Option<&str>, name: impl Into<String>, value: f64) -> Self {
        Self {
            kind,
            namespace: namespace.map(str::to_string),
            name: name.into(),
            value: LabelValue::Float(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(NodeKind::StructuralSpan.as_str(), "structural_span");
        assert_eq!(EdgeKind::DominanceRelation.as_str(), "dominance_relation");
        let json = serde_json::to_string(&NodeKind::DominanceNode).unwrap();
        assert_eq!(json, "\"dominance_node\"");
    }

    #[test]
    fn test_label_value_serialization() {
        let label = Label::float(LabelKind::MetaAnnotation, Some("FoLiA::pos"), "confidence", 0.5);
        let json = serde_json::to_value(&label).unwrap();
        assert_eq!(json["value"]["type"], "float");
        assert_eq!(json["value"]["value"], 0.5);
        assert_eq!(json["namespace"], "FoLiA::pos");
    }
}
