//! GraphStore - persistence for exported annotation graphs
//!
//! ## Core Principles
//!
//! 1. **One file per document**: each converted document is written to
//!    `<output>/<corpus_prefix>/<document_id>.graph.json`
//! 2. **Corpus manifest**: `<output>/<corpus_prefix>/corpus.json` lists every
//!    document of a batch, including the ones that failed
//! 3. **Content digest**: every entry records the SHA-256 of the bytes written,
//!    so repeated conversions can be diffed cheaply
//!
//! ## Usage
//!
//! ```rust,ignore
//! use docgraph_storage::{CorpusManifest, GraphStore, GraphSummary, JsonGraphStore};
//!
//! let store = JsonGraphStore::new("out", "mycorpus")?;
//! let mut manifest = CorpusManifest::new("mycorpus");
//!
//! let entry = store.save_graph("doc1", &graph, GraphSummary::new(12, 30, 4))?;
//! manifest.push_entry(entry);
//!
//! store.save_manifest(&manifest)?;
//! ```

pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::{ErrorKind, Result, StorageError};

pub use domain::{CorpusManifest, FailedDocument, GraphStore, GraphSummary, ManifestEntry};
pub use infrastructure::JsonGraphStore;
