//! JSON file adapter for GraphStore
//!
//! Layout:
//! ```text
//! <output_dir>/
//!   <corpus_prefix>/
//!     corpus.json
//!     <document_id>.graph.json
//! ```

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::{CorpusManifest, GraphStore, GraphSummary, ManifestEntry};
use crate::{Result, StorageError};

pub const MANIFEST_FILE: &str = "corpus.json";
pub const GRAPH_EXTENSION: &str = "graph.json";

/// Filesystem store writing pretty-printed JSON
#[derive(Debug, Clone)]
pub struct JsonGraphStore {
    output_dir: PathBuf,
    corpus_prefix: String,
}

impl JsonGraphStore {
    /// Create the store, making `<output_dir>/<corpus_prefix>` if needed
    pub fn new(output_dir: impl Into<PathBuf>, corpus_prefix: impl Into<String>) -> Result<Self> {
        let output_dir = output_dir.into();
        let corpus_prefix = corpus_prefix.into();
        if !is_plain_file_name(&corpus_prefix) {
            return Err(StorageError::config(format!(
                "Corpus prefix must be a single path component: '{}'",
                corpus_prefix
            )));
        }

        let store = Self {
            output_dir,
            corpus_prefix,
        };
        fs::create_dir_all(store.corpus_dir())?;
        Ok(store)
    }

    pub fn corpus_dir(&self) -> PathBuf {
        self.output_dir.join(&self.corpus_prefix)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.corpus_dir().join(MANIFEST_FILE)
    }

    /// Path of the graph file for a document (relative to the output dir)
    pub fn relative_location(&self, document_id: &str) -> String {
        format!("{}/{}.{}", self.corpus_prefix, document_id, GRAPH_EXTENSION)
    }

    fn graph_path(&self, document_id: &str) -> PathBuf {
        self.corpus_dir()
            .join(format!("{}.{}", document_id, GRAPH_EXTENSION))
    }
}

impl GraphStore for JsonGraphStore {
    fn save_graph<G: Serialize>(
        &self,
        document_id: &str,
        graph: &G,
        summary: GraphSummary,
    ) -> Result<ManifestEntry> {
        if !is_plain_file_name(document_id) {
            return Err(StorageError::invalid_document_id(document_id));
        }

        let bytes = serde_json::to_vec_pretty(graph)?;
        let path = self.graph_path(document_id);
        fs::write(&path, &bytes)?;
        debug!("wrote {} ({} bytes)", path.display(), bytes.len());

        Ok(ManifestEntry {
            document_id: document_id.to_string(),
            location: self.relative_location(document_id),
            digest: sha256_hex(&bytes),
            summary,
        })
    }

    fn save_manifest(&self, manifest: &CorpusManifest) -> Result<PathBuf> {
        let path = self.manifest_path();
        let bytes = serde_json::to_vec_pretty(manifest)?;
        fs::write(&path, bytes)?;
        debug!("wrote manifest {}", path.display());
        Ok(path)
    }

    fn load_manifest(&self) -> Result<CorpusManifest> {
        let path = self.manifest_path();
        if !path.is_file() {
            return Err(StorageError::manifest_not_found(path.display().to_string()));
        }
        let bytes = fs::read(&path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Lowercase hex SHA-256
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).components().count() == 1
}
