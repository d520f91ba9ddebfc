// Span Conversion
//
// Structural containers, independent spans (with roles) and nested trees,
// each turned into nodes plus spanning or dominance relations over the
// token nodes already in the registry.

pub mod domain;
pub mod infrastructure;

pub use domain::{distinct_positions, partition_runs, AnnotationUnit, ConversionStats, SpanMode};
pub use infrastructure::{NestedConverter, SpanConverter, StructureConverter};
