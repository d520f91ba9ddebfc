//! Batch conversion
//!
//! Input collection (`walkdir`), document-level parallelism (`rayon`),
//! per-document failure isolation, and the corpus manifest.
//!
//! Each document is converted by an independent worker with its own
//! registry and layer grouper; nothing mutable is shared between documents.
//! Results are collected in input order, so the manifest is deterministic
//! regardless of the number of workers.

use ahash::AHashMap;
use docgraph_storage::{CorpusManifest, GraphStore};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::processor::convert_file;
use crate::config::{BatchConfig, ExportConfig};
use crate::errors::{ExportError, Result};
use crate::features::graph_builder::{GraphBuilderUseCaseImpl, GraphDocument};

// ============================================================
// Input collection
// ============================================================

/// Expand the given paths into the list of documents to convert
///
/// Files are taken as given. Directories contribute the files whose name
/// ends in `.<extension>`, sorted by name; subdirectories only with
/// `recurse`. A path that does not exist fails the whole collection.
pub fn collect_inputs(paths: &[PathBuf], batch: &BatchConfig) -> Result<Vec<PathBuf>> {
    let suffix = format!(".{}", batch.extension.trim_start_matches('.'));
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            let max_depth = if batch.recurse { usize::MAX } else { 1 };
            for entry in WalkDir::new(path)
                .max_depth(max_depth)
                .follow_links(false)
                .sort_by_file_name()
            {
                let entry = entry.map_err(|e| {
                    let at = e.path().unwrap_or(path).to_path_buf();
                    ExportError::io(at, std::io::Error::other(e.to_string()))
                })?;
                if entry.file_type().is_file() && has_suffix(entry.path(), &suffix) {
                    files.push(entry.into_path());
                }
            }
        } else {
            return Err(ExportError::NotFound(path.clone()));
        }
    }

    debug!("collected {} input file(s)", files.len());
    Ok(files)
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.len() > suffix.len() && name.ends_with(suffix))
}

// ============================================================
// Batch report
// ============================================================

/// Outcome of one batch run
#[derive(Debug)]
pub struct BatchReport {
    pub manifest: CorpusManifest,
    pub manifest_path: PathBuf,
    /// Conversion warnings over all converted documents
    pub warnings: usize,
}

impl BatchReport {
    pub fn converted(&self) -> usize {
        self.manifest.documents.len()
    }

    pub fn failed(&self) -> usize {
        self.manifest.failures.len()
    }

    /// At least one document converted and none failed
    pub fn is_success(&self) -> bool {
        self.converted() > 0 && self.manifest.is_complete()
    }
}

// ============================================================
// Batch converter
// ============================================================

pub struct BatchConverter {
    usecase: GraphBuilderUseCaseImpl,
    batch: BatchConfig,
}

impl BatchConverter {
    pub fn new(config: ExportConfig) -> Self {
        let batch = config.batch.clone();
        Self {
            usecase: GraphBuilderUseCaseImpl::new(config),
            batch,
        }
    }

    pub fn batch_config(&self) -> &BatchConfig {
        &self.batch
    }

    /// Convert every input in parallel; one result per input, in input order
    pub fn convert_all(&self, inputs: &[PathBuf]) -> Result<Vec<(PathBuf, Result<GraphDocument>)>> {
        let workers = self.batch.worker_count();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("docgraph-worker-{}", i))
            .build()?;
        debug!("converting {} document(s) on {} worker(s)", inputs.len(), workers);

        let usecase = &self.usecase;
        Ok(pool.install(|| {
            inputs
                .par_iter()
                .map(|path| (path.clone(), convert_file(usecase, path)))
                .collect()
        }))
    }

    /// Convert, store every graph, and write the manifest
    pub fn run<S: GraphStore>(&self, inputs: &[PathBuf], store: &S) -> Result<BatchReport> {
        let start = Instant::now();
        let results = self.convert_all(inputs)?;

        let mut manifest = CorpusManifest::new(self.batch.corpus_prefix.clone());
        let mut written: AHashMap<String, PathBuf> = AHashMap::new();
        let mut warnings = 0;

        for (path, result) in results {
            let source = path.display().to_string();
            let graph = match result {
                Ok(graph) => graph,
                Err(err) => {
                    warn!("{}: {}", source, err);
                    manifest.push_failure(source, err);
                    continue;
                }
            };

            if let Some(first) = written.get(&graph.id) {
                let err = ExportError::DuplicateIdentifier {
                    id: graph.id.clone(),
                };
                warn!("{}: {} (already written from {})", source, err, first.display());
                manifest.push_failure(source, err);
                continue;
            }

            match store.save_graph(&graph.id, &graph, graph.summary()) {
                Ok(entry) => {
                    warnings += graph.warnings.len();
                    written.insert(graph.id.clone(), path);
                    manifest.push_entry(entry);
                }
                Err(err) => {
                    warn!("{}: {}", source, err);
                    manifest.push_failure(source, err);
                }
            }
        }

        let manifest_path = store.save_manifest(&manifest)?;
        info!(
            converted = manifest.documents.len(),
            failed = manifest.failures.len(),
            warnings,
            "Batch finished in {:.2?}, manifest at {}",
            start.elapsed(),
            manifest_path.display()
        );

        Ok(BatchReport {
            manifest,
            manifest_path,
            warnings,
        })
    }
}
