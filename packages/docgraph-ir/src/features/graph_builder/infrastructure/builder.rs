// Graph Builder - Main Entry Point
//
// Converts one annotation document into a GraphDocument:
// 1. Linearize token text (and phonetic content)
// 2. Datasource nodes, then token nodes with text relations and inline labels
// 3. Annotation units dispatched by category (structure, span, nested)
// 4. Layer finalization and integrity check
//
// Node numbering is fixed: 0 = text datasource, 1 = phonetic datasource (only
// when present), tokens in document order, then annotations in unit order.

use tracing::{debug, info, warn};

use super::context::GraphContext;
use super::integrity::IntegrityChecker;
use super::labels::NEUTRAL_NAMESPACE;
use crate::config::ExportConfig;
use crate::errors::{ExportError, Result};
use crate::features::graph_builder::domain::{
    ConversionWarning, Datasource, GraphDocument, LayerHandle, TokenOffset, WarningKind,
};
use crate::features::span_conversion::domain::AnnotationUnit;
use crate::features::span_conversion::infrastructure::{
    NestedConverter, SpanConverter, StructureConverter,
};
use crate::features::text_linearizer::domain::{LinearizedText, TextChannel};
use crate::features::text_linearizer::infrastructure::TextLinearizer;
use crate::shared::models::{
    Document, DocumentIndex, EdgeKind, Label, LabelKind, NodeKind, TextRange,
};

const TEXT_LAYER: &str = "text";
const PHON_LAYER: &str = "phon";
const TOKEN_TYPE: &str = "token";
const TOKEN_ELEMENT: &str = "w";

/// Datasource node with its linearized content
struct DatasourceSlot {
    node: usize,
    linearized: LinearizedText,
}

/// Document → graph converter
///
/// Holds only configuration; every `build` call starts from an empty
/// context, so one builder can serve many documents (and threads).
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    config: ExportConfig,
    linearizer: TextLinearizer,
}

impl GraphBuilder {
    pub fn new(config: ExportConfig) -> Self {
        let linearizer = TextLinearizer::new(config.spacing);
        Self { config, linearizer }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Convert one document
    ///
    /// ## Errors
    /// - `MissingTokenId` when a token lacks an id and ids are required
    /// - `NoText` when no token carries text
    /// - `DanglingReference` / `DuplicateIdentifier` from the converters
    pub fn build(&self, doc: &Document) -> Result<GraphDocument> {
        let index = doc.index();

        if self.config.require_token_ids {
            if let Some(slot) = index.tokens.iter().find(|slot| slot.token.id().is_none()) {
                return Err(ExportError::MissingTokenId {
                    document: doc.id.clone(),
                    position: slot.position,
                });
            }
        }

        let text = self.linearizer.linearize(&index.tokens, TextChannel::Text);
        if text.is_empty() {
            return Err(ExportError::NoText {
                document: doc.id.clone(),
            });
        }
        let phon = if self.config.include_phon {
            Some(self.linearizer.linearize(&index.tokens, TextChannel::Phon))
                .filter(|phon| !phon.is_empty())
        } else {
            None
        };

        let mut ctx = GraphContext::new(&doc.id, &doc.default_sets, &self.config, text);

        // Datasources
        let text_node = Self::datasource_node(&mut ctx, TEXT_LAYER, "sText1");
        let phon = phon.map(|linearized| DatasourceSlot {
            node: Self::datasource_node(&mut ctx, PHON_LAYER, "sPhon1"),
            linearized,
        });

        // Tokens
        let text_offsets = self.convert_tokens(&mut ctx, &index, text_node, phon.as_ref())?;

        // Annotations
        for unit in AnnotationUnit::collect(doc, &index) {
            match &unit {
                AnnotationUnit::Structure(slot) => {
                    StructureConverter::convert(&mut ctx, slot)?;
                }
                AnnotationUnit::Span { layer, span } => {
                    SpanConverter::convert(&mut ctx, &index, layer, span)?;
                }
                AnnotationUnit::Nested { layer, root } => {
                    NestedConverter::convert(&mut ctx, &index, layer, root)?;
                }
            }
        }

        let metadata = ctx.labels.metadata(&doc.metadata);
        let stats = ctx.stats;
        let GraphContext {
            registry,
            layers,
            warnings,
            text,
            ..
        } = ctx;
        let (mut nodes, mut edges) = registry.into_parts();
        let layers = layers.finalize(&mut nodes, &mut edges);

        let phon = phon.map(|slot| Datasource {
            node: slot.node,
            offsets: Self::token_offsets(&slot.linearized, &text_offsets),
            content: slot.linearized.text,
        });
        let mut graph = GraphDocument {
            id: doc.id.clone(),
            labels: metadata,
            nodes,
            edges,
            layers,
            text: Datasource {
                node: text_node,
                offsets: Self::token_offsets(&text, &text_offsets),
                content: text.text,
            },
            phon,
            warnings,
        };

        if self.config.verify_integrity {
            for violation in IntegrityChecker::check(&graph) {
                warn!(document = %graph.id, "Integrity violation: {}", violation);
                graph.warnings.push(ConversionWarning {
                    kind: WarningKind::Integrity,
                    element: graph.id.clone(),
                    message: violation,
                });
            }
        }

        debug!(document = %graph.id, stats = ?stats, "Conversion statistics");
        info!(
            document = %graph.id,
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            layers = graph.layers.len(),
            warnings = graph.warnings.len(),
            "Converted document"
        );
        Ok(graph)
    }

    fn datasource_node(ctx: &mut GraphContext<'_>, layer: &str, name: &str) -> usize {
        let seq = ctx.registry.new_node(NodeKind::TextDatasource);
        let handle = ctx.layers.ensure_layer(layer, None);
        ctx.layers.add_node(handle, seq);
        ctx.attach_labels(
            seq,
            vec![Label::text(LabelKind::Identifier, Some(NEUTRAL_NAMESPACE), "name", name)],
        );
        seq
    }

    /// Token nodes in document order; returns token node numbers by position
    fn convert_tokens(
        &self,
        ctx: &mut GraphContext<'_>,
        index: &DocumentIndex<'_>,
        text_node: usize,
        phon: Option<&DatasourceSlot>,
    ) -> Result<Vec<usize>> {
        let mut token_nodes = Vec::with_capacity(index.tokens.len());

        for slot in &index.tokens {
            let token = slot.token;
            let layer = ctx.layer_for(TOKEN_TYPE, token.set.as_deref());
            let seq = ctx.registry.new_node(NodeKind::Token);
            if let Some(id) = token.id() {
                ctx.registry.bind(id, seq)?;
            }
            ctx.register_token(slot.position, seq);
            ctx.layers.add_node(layer.handle, seq);
            token_nodes.push(seq);

            let mut labels =
                ctx.labels
                    .element(&token.info, TOKEN_ELEMENT, TOKEN_TYPE, &layer.namespace);

            for annotation in &token.annotations {
                if self.config.simplified_annotations {
                    let default = ctx.default_set(&annotation.annotation_type);
                    if annotation.set.is_none() || annotation.set.as_deref() == default {
                        labels.extend(ctx.labels.simplified(annotation));
                    }
                }
                if !self.config.simplified_only {
                    let inline = ctx.layer_for(&annotation.annotation_type, annotation.set.as_deref());
                    ctx.layers.add_node(inline.handle, seq);
                    labels.extend(ctx.labels.inline(annotation, &inline.namespace));
                }
            }
            ctx.attach_labels(seq, labels);

            if let Some(range) = ctx.text.offset(slot.position) {
                Self::text_relation(ctx, seq, text_node, range, layer.handle, "sTextRel");
            }
            if let Some(phon) = phon {
                if let Some(range) = phon.linearized.offset(slot.position) {
                    Self::text_relation(ctx, seq, phon.node, range, layer.handle, "sPhonRel");
                }
            }
        }

        ctx.stats.tokens = token_nodes.len();
        debug!(document = ctx.document_id, tokens = token_nodes.len(), "Converted tokens");
        Ok(token_nodes)
    }

    fn text_relation(
        ctx: &mut GraphContext<'_>,
        token: usize,
        datasource: usize,
        range: TextRange,
        layer: LayerHandle,
        family: &'static str,
    ) {
        let seq = ctx
            .registry
            .record_edge(EdgeKind::TextRelation, token, datasource);
        let name = ctx.next_edge_name(family);
        let label = ctx.labels.edge_name(name);
        if let Some(edge) = ctx.registry.edge_mut(seq) {
            edge.range = Some(range);
            edge.labels.push(label);
        }
        ctx.layers.add_edge(layer, seq);
    }

    /// `(token node, begin, end)` triples for content-bearing tokens
    fn token_offsets(linearized: &LinearizedText, token_nodes: &[usize]) -> Vec<TokenOffset> {
        linearized
            .ranges()
            .filter_map(|(position, range)| {
                token_nodes.get(position).map(|&token| TokenOffset {
                    token,
                    begin: range.begin,
                    end: range.end,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{
        AnnotationLayer, InlineAnnotation, NestedLayer, NestedNode, SpanAnnotation, SpanLayer,
        Structure, StructureChild, Token,
    };
    use pretty_assertions::assert_eq;

    fn the_cat_sat() -> Document {
        let mut doc = Document::new("doc1");
        doc.body.push(
            Structure::new("paragraph", Some("p1")).with_structure(
                Structure::new("sentence", Some("s1"))
                    .with_token(Token::new("w1", "The"))
                    .with_token(Token::new("w2", "cat"))
                    .with_token(Token::new("w3", "sat")),
            ),
        );
        doc
    }

    #[test]
    fn test_numbering_convention() {
        let graph = GraphBuilder::default().build(&the_cat_sat()).unwrap();

        assert_eq!(graph.nodes[0].kind, NodeKind::TextDatasource);
        let tokens: Vec<_> = graph.nodes_of_kind(NodeKind::Token).map(|n| n.seq).collect();
        assert_eq!(tokens, vec![1, 2, 3]);
        assert_eq!(graph.node_by_element("p1").map(|n| n.seq), Some(4));
        assert_eq!(graph.node_by_element("s1").map(|n| n.seq), Some(5));
        assert_eq!(graph.text.content, "The cat sat");
        assert!(graph.phon.is_none());
        assert!(graph.warnings.is_empty());
    }

    #[test]
    fn test_text_relations_and_offsets() {
        let graph = GraphBuilder::default().build(&the_cat_sat()).unwrap();

        let offsets: Vec<_> = graph
            .text
            .offsets
            .iter()
            .map(|o| (o.token, o.begin, o.end))
            .collect();
        assert_eq!(offsets, vec![(1, 0, 3), (2, 4, 7), (3, 8, 11)]);

        let relations: Vec<_> = graph
            .edges_of_kind(EdgeKind::TextRelation)
            .map(|e| (e.source, e.target, e.range))
            .collect();
        assert_eq!(relations[1], (2, 0, Some(TextRange::new(4, 7))));
    }

    #[test]
    fn test_inline_annotations_join_layers() {
        let mut doc = Document::new("doc");
        doc.default_sets.insert("pos".to_string(), "cgn".to_string());
        doc.body.push(
            Structure::new("sentence", Some("s1")).with_token(
                Token::new("w1", "katten")
                    .with_annotation(InlineAnnotation::new("pos", None, "N"))
                    .with_annotation(InlineAnnotation::new("lemma", Some("lemmas"), "kat")),
            ),
        );

        let graph = GraphBuilder::default().build(&doc).unwrap();
        let token = graph.node_by_element("w1").unwrap();
        let layer_names: Vec<_> = token
            .layers
            .iter()
            .map(|&l| graph.layers[l].namespace.as_str())
            .collect();
        assert_eq!(
            layer_names,
            vec!["FoLiA::token", "FoLiA::pos::cgn", "FoLiA::lemma::lemmas"]
        );
        assert!(token
            .labels
            .iter()
            .any(|l| l.name == "class" && l.value.as_text() == Some("kat")));
    }

    #[test]
    fn test_simplified_only() {
        let mut doc = Document::new("doc");
        doc.body.push(
            Structure::new("sentence", Some("s1"))
                .with_token(Token::new("w1", "cats").with_annotation(InlineAnnotation::new("pos", None, "N"))),
        );
        let builder = GraphBuilder::new(ExportConfig::default().simplified(true));
        let graph = builder.build(&doc).unwrap();

        let token = graph.node_by_element("w1").unwrap();
        assert_eq!(token.layers.len(), 1);
        let simplified = token.label("pos").unwrap();
        assert_eq!(simplified.namespace.as_deref(), Some("salt"));
        assert!(graph.layer("pos", None).is_none());
    }

    #[test]
    fn test_phonetic_datasource_takes_node_one() {
        let mut doc = the_cat_sat();
        if let Some(StructureChild::Structure(sentence)) =
            doc.body[0].children.first_mut()
        {
            if let Some(StructureChild::Token(token)) =
                sentence.children.first_mut()
            {
                token.phon = Some("ðə".to_string());
            }
        }

        let graph = GraphBuilder::default().build(&doc).unwrap();
        let phon = graph.phon.as_ref().unwrap();
        assert_eq!(phon.node, 1);
        assert_eq!(phon.content, "ðə");
        assert_eq!(phon.offsets, vec![TokenOffset { token: 2, begin: 0, end: 2 }]);
        assert_eq!(graph.layer("phon", None).unwrap().nodes, vec![1]);

        let without = GraphBuilder::new(ExportConfig {
            include_phon: false,
            ..Default::default()
        })
        .build(&doc)
        .unwrap();
        assert!(without.phon.is_none());
        assert_eq!(without.nodes[1].kind, NodeKind::Token);
    }

    #[test]
    fn test_no_text_is_fatal() {
        let mut doc = Document::new("empty");
        doc.body.push(Structure::new("paragraph", Some("p1")));
        let err = GraphBuilder::default().build(&doc).unwrap_err();
        assert!(matches!(err, ExportError::NoText { .. }));
    }

    #[test]
    fn test_missing_token_id() {
        let mut anonymous = Token::new("x", "word");
        anonymous.info.id = None;
        let mut doc = Document::new("doc");
        doc.body.push(
            Structure::new("sentence", Some("s1"))
                .with_token(Token::new("w1", "a"))
                .with_token(anonymous),
        );

        let err = GraphBuilder::default().build(&doc).unwrap_err();
        assert!(matches!(err, ExportError::MissingTokenId { position: 1, .. }));

        let lenient = GraphBuilder::new(ExportConfig {
            require_token_ids: false,
            ..Default::default()
        });
        let graph = lenient.build(&doc).unwrap();
        assert_eq!(graph.nodes_of_kind(NodeKind::Token).count(), 2);
    }

    #[test]
    fn test_duplicate_identifier() {
        let mut doc = the_cat_sat();
        doc.annotations.push(AnnotationLayer::Span(SpanLayer {
            annotation_type: "entity".to_string(),
            set: None,
            spans: vec![SpanAnnotation::new(Some("s1"), &["w1"])],
        }));
        let err = GraphBuilder::default().build(&doc).unwrap_err();
        assert!(matches!(err, ExportError::DuplicateIdentifier { ref id } if id == "s1"));
    }

    #[test]
    fn test_all_units_converted_and_layered() {
        let mut doc = the_cat_sat();
        doc.annotations.push(AnnotationLayer::Span(SpanLayer {
            annotation_type: "entity".to_string(),
            set: Some("ner".to_string()),
            spans: vec![SpanAnnotation::new(Some("e1"), &["w1", "w3"])],
        }));
        doc.annotations.push(AnnotationLayer::Nested(NestedLayer {
            annotation_type: "syntax".to_string(),
            set: None,
            roots: vec![NestedNode::new(Some("su1"), "S")
                .with_node(NestedNode::new(Some("su2"), "NP").with_token("w1").with_token("w2"))
                .with_token("w3")],
        }));

        let graph = GraphBuilder::default().build(&doc).unwrap();
        assert!(graph.warnings.is_empty(), "{:?}", graph.warnings);
        assert!(graph.nodes.iter().all(|n| !n.layers.is_empty()));
        assert!(graph.edges.iter().all(|e| !e.layers.is_empty()));

        let entity = graph.node_by_element("e1").unwrap();
        assert_eq!(graph.edges_from(entity.seq).count(), 2);
        let root = graph.node_by_element("su1").unwrap();
        let inner = graph.node_by_element("su2").unwrap();
        assert!(inner.seq < root.seq);
        assert_eq!(graph.layer("syntax", None).unwrap().nodes, vec![inner.seq, root.seq]);
    }
}
