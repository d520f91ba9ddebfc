//! Per-document conversion context
//!
//! Owns the registry, the layer grouper and the collected warnings for one
//! document. Converters receive it by `&mut`; nothing outlives the document.

use ahash::AHashMap;
use std::collections::BTreeMap;
use std::ops::Range;
use tracing::warn;

use super::labels::LabelConverter;
use super::layer_grouper::LayerGrouper;
use super::registry::NodeRegistry;
use crate::config::ExportConfig;
use crate::errors::{ExportError, Result};
use crate::features::graph_builder::domain::{ConversionWarning, LayerHandle, WarningKind};
use crate::features::span_conversion::domain::ConversionStats;
use crate::features::text_linearizer::domain::LinearizedText;
use crate::shared::models::{DocumentIndex, EdgeKind, Label, TextRange};

/// Layer of an element together with its namespace
#[derive(Debug, Clone)]
pub struct LayerRef {
    pub handle: LayerHandle,
    pub namespace: String,
}

pub struct GraphContext<'a> {
    pub document_id: &'a str,
    pub config: &'a ExportConfig,
    pub registry: NodeRegistry,
    pub layers: LayerGrouper,
    pub labels: LabelConverter,
    pub warnings: Vec<ConversionWarning>,
    pub stats: ConversionStats,
    pub text: LinearizedText,
    default_sets: &'a BTreeMap<String, String>,
    /// Token node number by document position
    token_nodes: Vec<usize>,
    edge_names: AHashMap<&'static str, usize>,
}

impl<'a> GraphContext<'a> {
    pub fn new(
        document_id: &'a str,
        default_sets: &'a BTreeMap<String, String>,
        config: &'a ExportConfig,
        text: LinearizedText,
    ) -> Self {
        Self {
            document_id,
            config,
            registry: NodeRegistry::new(),
            layers: LayerGrouper::new(config.namespace_prefix.as_str()),
            labels: LabelConverter::new(
                config.namespace_prefix.as_str(),
                config.batch.corpus_prefix.as_str(),
                document_id,
            ),
            warnings: Vec::new(),
            stats: ConversionStats::default(),
            text,
            default_sets,
            token_nodes: Vec::new(),
            edge_names: AHashMap::new(),
        }
    }

    /// Layer of (type, set), falling back to the declared default set
    pub fn layer_for(&mut self, annotation_type: &str, set: Option<&str>) -> LayerRef {
        let default_sets = self.default_sets;
        let set = set.or_else(|| default_sets.get(annotation_type).map(String::as_str));
        let handle = self.layers.ensure_layer(annotation_type, set);
        LayerRef {
            handle,
            namespace: self.layers.namespace(annotation_type, set),
        }
    }

    /// Set the default set is taken from for an annotation type
    pub fn default_set(&self, annotation_type: &str) -> Option<&'a str> {
        self.default_sets.get(annotation_type).map(String::as_str)
    }

    pub fn register_token(&mut self, position: usize, seq: usize) {
        debug_assert_eq!(position, self.token_nodes.len());
        self.token_nodes.push(seq);
    }

    pub fn token_node(&self, position: usize) -> Option<usize> {
        self.token_nodes.get(position).copied()
    }

    /// Resolve token ids to document positions; unknown ids are fatal
    pub fn resolve_positions<S: AsRef<str>>(
        &self,
        index: &DocumentIndex<'_>,
        wrefs: &[S],
        referrer: &str,
    ) -> Result<Vec<usize>> {
        wrefs
            .iter()
            .map(|wref| {
                let wref = wref.as_ref();
                index
                    .position(wref)
                    .ok_or_else(|| ExportError::dangling(wref, referrer))
            })
            .collect()
    }

    /// Char range covered by a run of token positions
    pub fn run_range(&self, run: Range<usize>) -> Option<TextRange> {
        run.filter_map(|position| self.text.offset(position))
            .reduce(|a, b| a.cover(&b))
    }

    pub fn attach_labels(&mut self, seq: usize, labels: Vec<Label>) {
        if let Some(node) = self.registry.node_mut(seq) {
            node.labels.extend(labels);
        }
    }

    /// Next numbered edge name for a relation family (`sSpanRel1`, ...)
    pub fn next_edge_name(&mut self, family: &'static str) -> String {
        let counter = self.edge_names.entry(family).or_insert(0);
        *counter += 1;
        format!("{}{}", family, counter)
    }

    /// Spanning relation from `source` over a run of token positions
    pub fn spanning_relation(
        &mut self,
        source: usize,
        run: Range<usize>,
        layer: LayerHandle,
        family: &'static str,
    ) -> Result<usize> {
        let tokens = run
            .clone()
            .map(|position| {
                self.token_node(position).ok_or_else(|| {
                    ExportError::dangling(format!("token #{}", position), format!("node {}", source))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let target = tokens.first().copied().ok_or_else(|| {
            ExportError::dangling("empty token run", format!("node {}", source))
        })?;

        let range = self.run_range(run);
        let name = self.next_edge_name(family);
        let label = self.labels.edge_name(name);

        let seq = self
            .registry
            .record_edge(EdgeKind::SpanningRelation, source, target);
        if let Some(edge) = self.registry.edge_mut(seq) {
            edge.range = range;
            edge.tokens = tokens;
            edge.labels.push(label);
        }
        self.layers.add_edge(layer, seq);
        Ok(seq)
    }

    /// Record a skipped element
    pub fn warn(&mut self, kind: WarningKind, element: impl Into<String>, message: impl Into<String>) {
        let element = element.into();
        let message = message.into();
        warn!(
            document = self.document_id,
            element = %element,
            kind = ?kind,
            "{}",
            message
        );
        self.warnings.push(ConversionWarning {
            kind,
            element,
            message,
        });
        if matches!(kind, WarningKind::UntokenizedStructure | WarningKind::EmptySpan) {
            self.stats.skipped += 1;
        }
    }
}

/// Human-readable name of an element for warnings and errors
pub fn describe(kind: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("{} '{}'", kind, id),
        None => format!("anonymous {}", kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{Document, NodeKind, Structure, Token};

    fn document() -> Document {
        let mut doc = Document::new("doc");
        doc.default_sets
            .insert("entity".to_string(), "ner-default".to_string());
        doc.body.push(
            Structure::new("sentence", Some("s1"))
                .with_token(Token::new("w1", "a"))
                .with_token(Token::new("w2", "b"))
                .with_token(Token::new("w3", "c")),
        );
        doc
    }

    fn linearized() -> LinearizedText {
        LinearizedText {
            text: "a b c".to_string(),
            offsets: vec![
                Some(TextRange::new(0, 1)),
                Some(TextRange::new(2, 3)),
                Some(TextRange::new(4, 5)),
            ],
            char_len: 5,
        }
    }

    #[test]
    fn test_layer_for_uses_default_set() {
        let doc = document();
        let config = ExportConfig::default();
        let mut ctx = GraphContext::new(&doc.id, &doc.default_sets, &config, linearized());

        let explicit = ctx.layer_for("entity", Some("ner-default"));
        let implicit = ctx.layer_for("entity", None);
        assert_eq!(explicit.handle, implicit.handle);
        assert_eq!(implicit.namespace, "FoLiA::entity::ner-default");
        assert_eq!(ctx.default_set("entity"), Some("ner-default"));
    }

    #[test]
    fn test_resolve_positions() {
        let doc = document();
        let index = doc.index();
        let config = ExportConfig::default();
        let ctx = GraphContext::new(&doc.id, &doc.default_sets, &config, linearized());

        assert_eq!(ctx.resolve_positions(&index, &["w3", "w1"], "x").unwrap(), vec![2, 0]);
        let err = ctx.resolve_positions(&index, &["w9"], "span 'e1'").unwrap_err();
        assert!(matches!(err, ExportError::DanglingReference { .. }));
    }

    #[test]
    fn test_spanning_relation_covers_run() {
        let doc = document();
        let config = ExportConfig::default();
        let mut ctx = GraphContext::new(&doc.id, &doc.default_sets, &config, linearized());

        for position in 0..3 {
            let seq = ctx.registry.new_node(NodeKind::Token);
            ctx.register_token(position, seq);
        }
        let span = ctx.registry.new_node(NodeKind::Span);
        let layer = ctx.layer_for("entity", None);

        let edge = ctx.spanning_relation(span, 1..3, layer.handle, "sSpanRel").unwrap();
        let (_, edges) = ctx.registry.into_parts();
        assert_eq!(edges[edge].range, Some(TextRange::new(2, 5)));
        assert_eq!(edges[edge].tokens, vec![1, 2]);
        assert_eq!(edges[edge].target, 1);
        assert_eq!(edges[edge].labels[0].value.as_text(), Some("sSpanRel1"));
    }

    #[test]
    fn test_warn_records_and_counts() {
        let doc = document();
        let config = ExportConfig::default();
        let mut ctx = GraphContext::new(&doc.id, &doc.default_sets, &config, linearized());

        ctx.warn(WarningKind::EmptySpan, "span 'e1'", "references no token");
        assert_eq!(ctx.warnings.len(), 1);
        assert_eq!(ctx.stats.skipped, 1);
        assert_eq!(describe("span", None), "anonymous span");
    }
}
