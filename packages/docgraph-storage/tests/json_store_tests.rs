//! JsonGraphStore integration tests
//!
//! Exercises the store through the `GraphStore` port only.

use docgraph_storage::{CorpusManifest, ErrorKind, GraphStore, GraphSummary, JsonGraphStore};
use pretty_assertions::assert_eq;
use serde::Serialize;
use tempfile::TempDir;

#[derive(Serialize)]
struct TinyGraph {
    id: &'static str,
    nodes: Vec<u32>,
}

fn export_corpus<S: GraphStore>(store: &S) -> CorpusManifest {
    let mut manifest = CorpusManifest::new("corpus");
    for (id, nodes) in [("doc1", vec![0, 1, 2]), ("doc2", vec![0])] {
        let summary = GraphSummary::new(nodes.len(), 0, 1);
        let entry = store
            .save_graph(id, &TinyGraph { id, nodes }, summary)
            .unwrap();
        manifest.push_entry(entry);
    }
    manifest.push_failure("in/doc3.json", "Document 'doc3' has no text");
    manifest
}

#[test]
fn test_corpus_roundtrip_through_port() {
    let dir = TempDir::new().unwrap();
    let store = JsonGraphStore::new(dir.path(), "corpus").unwrap();

    let manifest = export_corpus(&store);
    store.save_manifest(&manifest).unwrap();

    let loaded = store.load_manifest().unwrap();
    assert_eq!(loaded, manifest);
    assert!(!loaded.is_complete());
    assert_eq!(loaded.entry("doc1").unwrap().summary.nodes, 3);
    assert_ne!(
        loaded.entry("doc1").unwrap().digest,
        loaded.entry("doc2").unwrap().digest
    );
}

#[test]
fn test_load_manifest_before_save() {
    let dir = TempDir::new().unwrap();
    let store = JsonGraphStore::new(dir.path(), "corpus").unwrap();

    let err = store.load_manifest().unwrap_err();
    assert_eq!(err.kind, ErrorKind::ManifestNotFound);
}

#[test]
fn test_rewrite_replaces_graph_file() {
    let dir = TempDir::new().unwrap();
    let store = JsonGraphStore::new(dir.path(), "corpus").unwrap();

    let first = store
        .save_graph("doc1", &TinyGraph { id: "doc1", nodes: vec![0] }, GraphSummary::default())
        .unwrap();
    let second = store
        .save_graph("doc1", &TinyGraph { id: "doc1", nodes: vec![0, 1] }, GraphSummary::default())
        .unwrap();

    assert_eq!(first.location, second.location);
    assert_ne!(first.digest, second.digest);
    let on_disk = std::fs::read_to_string(dir.path().join(&second.location)).unwrap();
    assert!(on_disk.contains('1'));
}
