/*
 * Docgraph IR - Annotation Document to Graph Export Engine
 *
 * Feature-First Hexagonal Architecture:
 * - shared/         : Document model, graph element kinds, labels, offsets
 * - features/       : Vertical slices (text_linearizer → graph_builder → span_conversion)
 * - infrastructure/ : Document loading
 * - pipeline/       : Single-document and batch orchestration
 * - config/         : Export configuration (versioned YAML)
 *
 * Concurrency:
 * - One registry/layer grouper per document, no shared mutable state
 * - Rayon work-stealing across documents
 */

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models
pub mod shared;

/// Feature modules (linearization, graph building, span conversion)
pub mod features;

/// Filesystem adapters
pub mod infrastructure;

/// Pipeline orchestration
pub mod pipeline;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{BatchConfig, ConfigError, ExportConfig, Validatable};
pub use errors::{ExportError, Result};
pub use features::graph_builder::{
    ConversionWarning, GraphBuilder, GraphBuilderUseCase, GraphBuilderUseCaseImpl,
    GraphDocument, GraphEdge, GraphLayer, GraphNode, WarningKind,
};
pub use features::span_conversion::SpanMode;
pub use features::text_linearizer::SpacingPolicy;
pub use infrastructure::load_document;
pub use pipeline::{collect_inputs, BatchConverter, BatchReport};
pub use shared::models::Document;
