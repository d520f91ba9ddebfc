//! Domain layer for GraphStore
//!
//! # Domain Models
//!
//! - `GraphSummary`: Node/edge/layer counts of one exported graph
//! - `ManifestEntry`: Where a graph was written and what it contained
//! - `FailedDocument`: A document whose conversion aborted
//! - `CorpusManifest`: All entries and failures of one batch
//!
//! # Port Trait
//!
//! - `GraphStore`: Primary storage abstraction

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::Result;

// ═══════════════════════════════════════════════════════════════════════════
// Domain Models
// ═══════════════════════════════════════════════════════════════════════════

/// Size of an exported graph, recorded in the manifest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
    pub layers: usize,
}

impl GraphSummary {
    pub fn new(nodes: usize, edges: usize, layers: usize) -> Self {
        Self {
            nodes,
            edges,
            layers,
        }
    }
}

/// One successfully written document graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Document identifier
    pub document_id: String,
    /// Location relative to the output directory
    pub location: String,
    /// SHA-256 of the written bytes (lowercase hex)
    pub digest: String,
    #[serde(flatten)]
    pub summary: GraphSummary,
}

/// A document whose conversion failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedDocument {
    /// Input path as given to the converter
    pub source: String,
    /// Rendered error message
    pub error: String,
}

/// Index of one conversion batch
///
/// The manifest plays the role of the corpus graph: one corpus node
/// (`corpus_prefix`) with one relation per document entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusManifest {
    pub corpus_prefix: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub documents: Vec<ManifestEntry>,
    #[serde(default)]
    pub failures: Vec<FailedDocument>,
}

impl CorpusManifest {
    pub fn new(corpus_prefix: impl Into<String>) -> Self {
        Self {
            corpus_prefix: corpus_prefix.into(),
            generated_at: Utc::now(),
            documents: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn push_entry(&mut self, entry: ManifestEntry) {
        self.documents.push(entry);
    }

    pub fn push_failure(&mut self, source: impl Into<String>, error: impl ToString) {
        self.failures.push(FailedDocument {
            source: source.into(),
            error: error.to_string(),
        });
    }

    /// True when no document of the batch failed
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn entry(&self, document_id: &str) -> Option<&ManifestEntry> {
        self.documents.iter().find(|e| e.document_id == document_id)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Port Trait
// ═══════════════════════════════════════════════════════════════════════════

/// Storage abstraction for exported graphs
///
/// Graphs are taken as `Serialize` so the store stays independent of the
/// engine's graph types.
pub trait GraphStore {
    /// Write one document graph and describe where it went
    fn save_graph<G: Serialize>(
        &self,
        document_id: &str,
        graph: &G,
        summary: GraphSummary,
    ) -> Result<ManifestEntry>;

    /// Write the corpus manifest, returning its path
    fn save_manifest(&self, manifest: &CorpusManifest) -> Result<PathBuf>;

    /// Read back a previously written manifest
    fn load_manifest(&self) -> Result<CorpusManifest>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> ManifestEntry {
        ManifestEntry {
            document_id: id.to_string(),
            location: format!("corpus/{}.graph.json", id),
            digest: "00".repeat(32),
            summary: GraphSummary::new(5, 7, 2),
        }
    }

    #[test]
    fn test_manifest_complete_without_failures() {
        let mut manifest = CorpusManifest::new("corpus");
        manifest.push_entry(entry("doc1"));
        assert!(manifest.is_complete());
        assert_eq!(manifest.entry("doc1").unwrap().summary.edges, 7);
        assert!(manifest.entry("doc2").is_none());
    }

    #[test]
    fn test_manifest_failure_marks_incomplete() {
        let mut manifest = CorpusManifest::new("corpus");
        manifest.push_failure("in/broken.json", "document has no text");
        assert!(!manifest.is_complete());
        assert_eq!(manifest.failures[0].error, "document has no text");
    }

    #[test]
    fn test_entry_summary_is_flattened() {
        let json = serde_json::to_value(entry("doc1")).unwrap();
        assert_eq!(json["nodes"], 5);
        assert_eq!(json["layers"], 2);
        assert!(json.get("summary").is_none());
    }
}
