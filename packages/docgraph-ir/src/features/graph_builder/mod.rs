// Graph Builder - Annotation Document to Graph Conversion
//
// ## Architecture
// - Domain: output models (GraphDocument, GraphNode, GraphEdge, GraphLayer)
// - Infrastructure: registry, layer grouper, labels, builder, integrity check
// - Application: use case facade used by the pipeline

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export application layer
pub use application::{GraphBuilderUseCase, GraphBuilderUseCaseImpl};

// Re-exports
pub use domain::{
    ConversionWarning, Datasource, GraphDocument, GraphEdge, GraphLayer, GraphNode, LayerHandle,
    TokenOffset, WarningKind,
};

pub use infrastructure::GraphBuilder;
