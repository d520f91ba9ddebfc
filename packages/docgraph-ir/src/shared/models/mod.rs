//! Shared models

pub mod document;
mod graph;
mod offset;

pub use document::{
    AnnotationCategory, AnnotationLayer, Document, DocumentIndex, ElementInfo, Feature,
    InlineAnnotation, NestedChild, NestedLayer, NestedNode, Processor, SpanAnnotation, SpanLayer,
    SpanRole, Structure, StructureChild, StructureSlot, Token, TokenSlot,
};
pub use graph::{EdgeKind, Label, LabelKind, LabelValue, NodeKind};
pub use offset::TextRange;
