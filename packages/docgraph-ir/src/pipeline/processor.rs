//! Single-document processing
//!
//! load → build graph → (optionally) store

use docgraph_storage::{GraphStore, ManifestEntry};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use crate::errors::Result;
use crate::features::graph_builder::{GraphBuilderUseCase, GraphDocument};
use crate::infrastructure::load_document;

/// Load a document file and convert it
pub fn convert_file(usecase: &dyn GraphBuilderUseCase, path: &Path) -> Result<GraphDocument> {
    let start = Instant::now();
    let document = load_document(path)?;
    let graph = usecase.build_graph(&document)?;
    debug!(
        "converted {} in {:.2?}",
        path.display(),
        start.elapsed()
    );
    Ok(graph)
}

/// Convert a document file and write its graph
pub fn export_file<S: GraphStore>(
    usecase: &dyn GraphBuilderUseCase,
    store: &S,
    path: &Path,
) -> Result<ManifestEntry> {
    let graph = convert_file(usecase, path)?;
    let entry = store.save_graph(&graph.id, &graph, graph.summary())?;
    info!(
        "{} → {} ({} nodes, {} edges)",
        path.display(),
        entry.location,
        entry.summary.nodes,
        entry.summary.edges
    );
    Ok(entry)
}
