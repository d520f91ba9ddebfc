// Feature modules
//
// text_linearizer → graph_builder → span_conversion
//
// The graph builder owns the per-document context; the span converters are
// driven from it, one conversion unit at a time.

pub mod graph_builder;
pub mod span_conversion;
pub mod text_linearizer;
