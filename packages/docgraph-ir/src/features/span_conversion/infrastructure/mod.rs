mod nested_converter;
mod span_converter;
mod structure_converter;

pub use nested_converter::NestedConverter;
pub use span_converter::SpanConverter;
pub use structure_converter::StructureConverter;
