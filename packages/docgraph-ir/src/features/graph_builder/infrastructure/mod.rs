// Graph Builder Infrastructure
//
// - registry: node/edge numbering and element id bindings
// - layer_grouper: (type, set) layers
// - labels: element attributes → node labels
// - context: per-document state handed to every converter
// - builder: orchestration
// - integrity: post-conversion checks

pub mod builder;
pub mod context;
pub mod integrity;
pub mod labels;
pub mod layer_grouper;
pub mod registry;

pub use builder::GraphBuilder;
pub use context::GraphContext;
pub use integrity::IntegrityChecker;
pub use labels::LabelConverter;
pub use layer_grouper::LayerGrouper;
pub use registry::NodeRegistry;
