// Span Conversion Domain Models
//
// Conversion units (one per annotation to convert), token-run partitioning
// and span reference modes.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::str::FromStr;

use crate::config::ConfigError;
use crate::shared::models::{
    AnnotationCategory, AnnotationLayer, Document, DocumentIndex, NestedLayer, NestedNode,
    SpanAnnotation, SpanLayer, StructureSlot,
};

// ============================================================
// Span Mode
// ============================================================

/// How a span annotation references its tokens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanMode {
    /// One spanning relation per maximal run of adjacent tokens
    #[default]
    TextRange,
    /// One spanning relation per referenced token
    TokenReference,
}

impl SpanMode {
    pub const VARIANTS: &'static [&'static str] = &["text-range", "token-reference"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextRange => "text-range",
            Self::TokenReference => "token-reference",
        }
    }
}

impl FromStr for SpanMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "text-range" => Ok(Self::TextRange),
            "token-reference" => Ok(Self::TokenReference),
            _ => Err(ConfigError::unknown_value_with_suggestion(
                "span_mode",
                s,
                Self::VARIANTS,
            )),
        }
    }
}

impl std::fmt::Display for SpanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================
// Token Runs
// ============================================================

/// Split referenced token positions into maximal runs of document-adjacent
/// tokens
///
/// Runs are computed over the deduplicated position set, so the order and
/// repetition of references never split a run. Runs are returned in the
/// order their first reference appears in `positions`.
pub fn partition_runs(positions: &[usize]) -> Vec<Range<usize>> {
    let mut sorted = positions.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut runs: Vec<Range<usize>> = Vec::new();
    for position in sorted {
        match runs.last_mut() {
            Some(run) if run.end == position => run.end = position + 1,
            _ => runs.push(position..position + 1),
        }
    }

    runs.sort_by_cached_key(|run| positions.iter().position(|p| run.contains(p)));
    runs
}

/// Referenced positions in first-reference order, repeats removed
pub fn distinct_positions(positions: &[usize]) -> Vec<usize> {
    let mut seen = AHashSet::with_capacity(positions.len());
    positions
        .iter()
        .copied()
        .filter(|&position| seen.insert(position))
        .collect()
}

// ============================================================
// Conversion Units
// ============================================================

/// One annotation to convert, tagged by category
#[derive(Debug, Clone)]
pub enum AnnotationUnit<'d> {
    Structure(StructureSlot<'d>),
    Span {
        layer: &'d SpanLayer,
        span: &'d SpanAnnotation,
    },
    Nested {
        layer: &'d NestedLayer,
        root: &'d NestedNode,
    },
}

impl<'d> AnnotationUnit<'d> {
    pub fn category(&self) -> AnnotationCategory {
        match self {
            Self::Structure(_) => AnnotationCategory::Structural,
            Self::Span { .. } => AnnotationCategory::SimpleSpan,
            Self::Nested { .. } => AnnotationCategory::NestedSpan,
        }
    }

    /// All units of a document: containers in pre-order, then annotation
    /// layers in document order
    pub fn collect(doc: &'d Document, index: &DocumentIndex<'d>) -> Vec<Self> {
        let mut units: Vec<Self> = index
            .structures
            .iter()
            .cloned()
            .map(Self::Structure)
            .collect();

        for layer in &doc.annotations {
            match layer {
                AnnotationLayer::Span(layer) => {
                    units.extend(layer.spans.iter().map(|span| Self::Span { layer, span }));
                }
                AnnotationLayer::Nested(layer) => {
                    units.extend(layer.roots.iter().map(|root| Self::Nested { layer, root }));
                }
            }
        }
        units
    }
}

/// Per-document conversion counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub tokens: usize,
    pub structures: usize,
    pub spans: usize,
    pub roles: usize,
    pub nested_nodes: usize,
    pub skipped: usize,
}

impl ConversionStats {
    pub fn record(&mut self, category: AnnotationCategory) {
        match category {
            AnnotationCategory::Structural => self.structures += 1,
            AnnotationCategory::SimpleSpan => self.spans += 1,
            AnnotationCategory::SpanRole => self.roles += 1,
            AnnotationCategory::NestedSpan => self.nested_nodes += 1,
        }
    }
}
