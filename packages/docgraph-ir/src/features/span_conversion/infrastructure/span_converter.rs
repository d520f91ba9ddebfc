//! Independent (possibly discontinuous) span annotations → span nodes
//!
//! In text-range mode each maximal run of document-adjacent tokens becomes
//! one spanning relation, whatever the order of the references; relations
//! follow the first reference into each run. In token-reference mode every
//! distinct token gets its own, in reference order.

use tracing::debug;

use crate::errors::Result;
use crate::features::graph_builder::domain::{LayerHandle, WarningKind};
use crate::features::graph_builder::infrastructure::context::{describe, GraphContext};
use crate::features::span_conversion::domain::{distinct_positions, partition_runs, SpanMode};
use crate::shared::models::{
    AnnotationCategory, DocumentIndex, ElementInfo, NodeKind, SpanAnnotation, SpanLayer,
};

const SPAN_RELATION: &str = "sSpanRel";

pub struct SpanConverter;

impl SpanConverter {
    /// Convert one span annotation (and its roles); `None` when skipped
    pub fn convert(
        ctx: &mut GraphContext<'_>,
        index: &DocumentIndex<'_>,
        layer: &SpanLayer,
        span: &SpanAnnotation,
    ) -> Result<Option<usize>> {
        let annotation_type = layer.annotation_type.as_str();
        let name = describe(annotation_type, span.info.id());

        let wrefs = span.effective_wrefs();
        if wrefs.is_empty() {
            ctx.warn(WarningKind::EmptySpan, name, "span references no token, skipped");
            return Ok(None);
        }
        let positions = ctx.resolve_positions(index, &wrefs, &name)?;

        let layer_ref = ctx.layer_for(annotation_type, layer.set.as_deref());
        let element_type = span.element_type.as_deref().unwrap_or(annotation_type);
        let seq = Self::span_node(
            ctx,
            &span.info,
            element_type,
            annotation_type,
            layer_ref.handle,
            &layer_ref.namespace,
        )?;
        let relations = Self::relate(ctx, seq, &positions, layer_ref.handle)?;
        ctx.stats.record(AnnotationCategory::SimpleSpan);
        debug!(element = %name, node = seq, relations, "Converted span");

        if ctx.config.include_span_roles {
            for role in &span.roles {
                let role_name = describe(&role.element_type, role.info.id());
                if role.wrefs.is_empty() {
                    ctx.warn(
                        WarningKind::EmptySpan,
                        role_name,
                        "span role references no token, skipped",
                    );
                    continue;
                }
                let positions = ctx.resolve_positions(index, &role.wrefs, &role_name)?;
                let role_seq = Self::span_node(
                    ctx,
                    &role.info,
                    &role.element_type,
                    annotation_type,
                    layer_ref.handle,
                    &layer_ref.namespace,
                )?;
                let relations = Self::relate(ctx, role_seq, &positions, layer_ref.handle)?;
                ctx.stats.record(AnnotationCategory::SpanRole);
                debug!(element = %role_name, node = role_seq, parent = seq, relations, "Converted span role");
            }
        }

        Ok(Some(seq))
    }

    fn span_node(
        ctx: &mut GraphContext<'_>,
        info: &ElementInfo,
        element_type: &str,
        annotation_type: &str,
        layer: LayerHandle,
        namespace: &str,
    ) -> Result<usize> {
        let seq = ctx.registry.new_node(NodeKind::Span);
        if let Some(id) = info.id() {
            ctx.registry.bind(id, seq)?;
        }
        ctx.layers.add_node(layer, seq);
        let labels = ctx
            .labels
            .element(info, element_type, annotation_type, namespace);
        ctx.attach_labels(seq, labels);
        Ok(seq)
    }

    /// Spanning relations from `seq` to the referenced tokens; returns the count
    fn relate(
        ctx: &mut GraphContext<'_>,
        seq: usize,
        positions: &[usize],
        layer: LayerHandle,
    ) -> Result<usize> {
        let runs = match ctx.config.span_mode {
            SpanMode::TextRange => partition_runs(positions),
            SpanMode::TokenReference => distinct_positions(positions)
                .into_iter()
                .map(|p| p..p + 1)
                .collect(),
        };
        for run in &runs {
            ctx.spanning_relation(seq, run.clone(), layer, SPAN_RELATION)?;
        }
        Ok(runs.len())
    }
}
