//! Nested (tree-shaped) span annotations → dominance nodes
//!
//! Post-order: children are converted before their parent, so every
//! dominance relation points from a higher to a lower node number.
//! Children get node numbers in annotation order; dominance relations are
//! emitted in document order of the children (first covered token).

use tracing::debug;

use crate::errors::{ExportError, Result};
use crate::features::graph_builder::domain::WarningKind;
use crate::features::graph_builder::infrastructure::context::{describe, GraphContext};
use crate::shared::models::{
    AnnotationCategory, DocumentIndex, EdgeKind, NestedChild, NestedLayer, NestedNode, NodeKind,
};

pub struct NestedConverter;

impl NestedConverter {
    /// Convert a tree rooted at `node`; returns the root's node number
    pub fn convert(
        ctx: &mut GraphContext<'_>,
        index: &DocumentIndex<'_>,
        layer: &NestedLayer,
        node: &NestedNode,
    ) -> Result<usize> {
        Self::convert_node(ctx, index, layer, node).map(|(seq, _)| seq)
    }

    /// Node number plus the first token position the subtree covers
    fn convert_node(
        ctx: &mut GraphContext<'_>,
        index: &DocumentIndex<'_>,
        layer: &NestedLayer,
        node: &NestedNode,
    ) -> Result<(usize, Option<usize>)> {
        let annotation_type = layer.annotation_type.as_str();
        let name = describe(annotation_type, node.info.id());

        let mut children = Vec::with_capacity(node.children.len());
        for child in &node.children {
            let converted = match child {
                NestedChild::Node(inner) => Self::convert_node(ctx, index, layer, inner)?,
                NestedChild::Token(wref) => index
                    .position(wref)
                    .and_then(|position| ctx.token_node(position).map(|seq| (seq, Some(position))))
                    .ok_or_else(|| ExportError::dangling(wref.as_str(), name.as_str()))?,
            };
            children.push(converted);
        }
        let first = children.iter().filter_map(|&(_, position)| position).min();
        // childless subtrees cover no token and go last
        children.sort_by_key(|&(_, position)| (position.is_none(), position));

        let layer_ref = ctx.layer_for(annotation_type, layer.set.as_deref());
        let seq = ctx.registry.new_node(NodeKind::DominanceNode);
        if let Some(id) = node.info.id() {
            ctx.registry.bind(id, seq)?;
        }
        ctx.layers.add_node(layer_ref.handle, seq);

        let element_type = node.element_type.as_deref().unwrap_or(annotation_type);
        let labels = ctx.labels.element(
            &node.info,
            element_type,
            annotation_type,
            &layer_ref.namespace,
        );
        ctx.attach_labels(seq, labels);

        if children.is_empty() {
            ctx.warn(
                WarningKind::EmptyNestedNode,
                name.as_str(),
                "tree node has no children",
            );
        }

        for &(child, _) in &children {
            let edge = ctx.registry.record_edge(EdgeKind::DominanceRelation, seq, child);
            let label = ctx.labels.edge_name(format!("sDomRel{}-{}", seq, child));
            if let Some(edge) = ctx.registry.edge_mut(edge) {
                edge.labels.push(label);
            }
            ctx.layers.add_edge(layer_ref.handle, edge);
        }

        ctx.stats.record(AnnotationCategory::NestedSpan);
        debug!(element = %name, node = seq, children = children.len(), "Converted tree node");
        Ok((seq, first))
    }
}
