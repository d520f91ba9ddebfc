//! Structural containers → structural span nodes
//!
//! A container references its descendant tokens directly, never the
//! containers nested inside it.

use tracing::debug;

use crate::errors::Result;
use crate::features::graph_builder::domain::WarningKind;
use crate::features::graph_builder::infrastructure::context::{describe, GraphContext};
use crate::shared::models::{AnnotationCategory, Label, LabelKind, NodeKind, StructureSlot};

pub struct StructureConverter;

impl StructureConverter {
    /// Convert one container; `None` when it was skipped
    pub fn convert(ctx: &mut GraphContext<'_>, slot: &StructureSlot<'_>) -> Result<Option<usize>> {
        let structure = slot.structure;
        let annotation_type = structure.annotation_type.as_str();
        let name = describe(annotation_type, structure.info.id());

        if !slot.is_tokenized() {
            ctx.warn(
                WarningKind::UntokenizedStructure,
                name,
                "container has no descendant tokens, skipped",
            );
            return Ok(None);
        }

        let layer = ctx.layer_for(annotation_type, structure.set.as_deref());
        let seq = ctx.registry.new_node(NodeKind::StructuralSpan);
        if let Some(id) = structure.info.id() {
            ctx.registry.bind(id, seq)?;
        }
        ctx.layers.add_node(layer.handle, seq);

        let element_type = structure
            .element_type
            .as_deref()
            .unwrap_or(annotation_type);
        let mut labels = vec![Label::text(
            LabelKind::Annotation,
            None,
            annotation_type,
            annotation_type,
        )];
        labels.extend(ctx.labels.element(
            &structure.info,
            element_type,
            annotation_type,
            &layer.namespace,
        ));
        ctx.attach_labels(seq, labels);

        for position in slot.tokens.clone() {
            ctx.spanning_relation(seq, position..position + 1, layer.handle, "sStructureSpanRel")?;
        }

        ctx.stats.record(AnnotationCategory::Structural);
        debug!(
            element = %name,
            node = seq,
            tokens = slot.tokens.len(),
            depth = slot.depth,
            "Converted structural span"
        );
        Ok(Some(seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportConfig;
    use crate::features::text_linearizer::{TextChannel, TextLinearizer};
    use crate::shared::models::{Document, EdgeKind, Structure, Token};

    #[test]
    fn test_structure_references_tokens_directly() {
        let mut doc = Document::new("doc");
        doc.body.push(
            Structure::new("paragraph", Some("p1"))
                .with_structure(
                    Structure::new("sentence", Some("s1"))
                        .with_token(Token::new("w1", "a"))
                        .with_token(Token::new("w2", "b")),
                )
                .with_structure(Structure::new("sentence", None).with_token(Token::new("w3", "c"))),
        );
        let index = doc.index();
        let config = ExportConfig::default();
        let text = TextLinearizer::default().linearize(&index.tokens, TextChannel::Text);
        let mut ctx = GraphContext::new(&doc.id, &doc.default_sets, &config, text);
        for slot in &index.tokens {
            let seq = ctx.registry.new_node(NodeKind::Token);
            ctx.register_token(slot.position, seq);
        }

        let paragraph = StructureConverter::convert(&mut ctx, &index.structures[0])
            .unwrap()
            .unwrap();
        let anonymous = StructureConverter::convert(&mut ctx, &index.structures[2])
            .unwrap()
            .unwrap();

        assert_eq!(ctx.registry.lookup("p1"), Some(paragraph));
        let (nodes, edges) = ctx.registry.into_parts();
        let targets: Vec<_> = edges
            .iter()
            .filter(|e| e.source == paragraph)
            .map(|e| e.target)
            .collect();
        assert_eq!(targets, vec![0, 1, 2]);
        assert!(edges.iter().all(|e| e.kind == EdgeKind::SpanningRelation));
        assert_eq!(nodes[anonymous].kind, NodeKind::StructuralSpan);
        assert!(nodes[anonymous].element_id.is_none());
    }

    #[test]
    fn test_untokenized_structure_is_skipped() {
        let mut doc = Document::new("doc");
        doc.body.push(
            Structure::new("paragraph", Some("p1"))
                .with_structure(Structure::new("sentence", Some("s1")).with_token(Token::new("w1", "a"))),
        );
        doc.body.push(Structure::new("paragraph", Some("p2")));
        let index = doc.index();
        let config = ExportConfig::default();
        let text = TextLinearizer::default().linearize(&index.tokens, TextChannel::Text);
        let mut ctx = GraphContext::new(&doc.id, &doc.default_sets, &config, text);

        let result = StructureConverter::convert(&mut ctx, &index.structures[2]).unwrap();
        assert!(result.is_none());
        assert_eq!(ctx.warnings.len(), 1);
        assert_eq!(ctx.warnings[0].kind, WarningKind::UntokenizedStructure);
        assert_eq!(ctx.registry.node_count(), 0);
        assert!(ctx.layers.is_empty());
    }
}
