//! Document loading
//!
//! Annotation documents are read from JSON (default) or YAML (`.yaml` /
//! `.yml`). A document without an `id` takes the file stem.

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::errors::{ExportError, Result};
use crate::shared::models::Document;

/// On-disk document encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Format implied by a file name
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }

    pub fn parse(&self, path: &Path, content: &str) -> Result<Document> {
        match self {
            DocumentFormat::Json => {
                serde_json::from_str(content).map_err(|source| ExportError::Json {
                    path: path.to_path_buf(),
                    source,
                })
            }
            // `{token: ...}` maps select enum variants, as in JSON
            DocumentFormat::Yaml => serde_yaml::with::singleton_map_recursive::deserialize(
                serde_yaml::Deserializer::from_str(content),
            )
            .map_err(|source| ExportError::Yaml {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Read and parse one document
pub fn load_document(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ExportError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
    let format = DocumentFormat::detect(path);
    let mut document = format.parse(path, &content)?;

    if document.id.is_empty() {
        document.id = document_stem(path);
    }

    debug!(
        "loaded {} as {:?} (document '{}')",
        path.display(),
        format,
        document.id
    );
    Ok(document)
}

/// File name up to the first dot: `a.folia.json` → `a`
fn document_stem(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_detect_format() {
        assert_eq!(DocumentFormat::detect(Path::new("a.json")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::detect(Path::new("a.YML")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::detect(Path::new("a.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::detect(Path::new("noext")), DocumentFormat::Json);
    }

    #[test]
    fn test_load_yaml_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.yaml");
        fs::write(
            &path,
            "id: d1\nbody:\n  - annotation_type: sentence\n    children:\n      - token: {id: w1, text: Hi}\n",
        )
        .unwrap();

        let doc = load_document(&path).unwrap();
        assert_eq!(doc.id, "d1");
        assert_eq!(doc.index().tokens.len(), 1);
    }

    #[test]
    fn test_yaml_and_json_documents_agree() {
        let dir = TempDir::new().unwrap();
        let yaml = dir.path().join("doc.yml");
        fs::write(
            &yaml,
            "\
id: d1
body:
  - annotation_type: sentence
    id: s1
    children:
      - token: {id: w1, text: The}
      - structure:
          annotation_type: part
          children:
            - token: {id: w2, text: cat}
annotations:
  - category: nested
    annotation_type: syntax
    roots:
      - id: np
        class: NP
        children:
          - token: w1
          - node:
              class: NN
              children:
                - token: w2
",
        )
        .unwrap();
        let json = dir.path().join("doc.json");
        fs::write(
            &json,
            r#"{
  "id": "d1",
  "body": [{
    "annotation_type": "sentence", "id": "s1",
    "children": [
      {"token": {"id": "w1", "text": "The"}},
      {"structure": {"annotation_type": "part", "children": [{"token": {"id": "w2", "text": "cat"}}]}}
    ]
  }],
  "annotations": [{
    "category": "nested", "annotation_type": "syntax",
    "roots": [{"id": "np", "class": "NP", "children": [
      {"token": "w1"},
      {"node": {"class": "NN", "children": [{"token": "w2"}]}}
    ]}]
  }]
}"#,
        )
        .unwrap();

        let from_yaml = load_document(&yaml).unwrap();
        assert_eq!(from_yaml, load_document(&json).unwrap());
        assert_eq!(from_yaml.index().tokens.len(), 2);
    }

    #[test]
    fn test_missing_id_takes_file_stem() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("story.folia.json");
        fs::write(&path, r#"{"body": []}"#).unwrap();

        assert_eq!(load_document(&path).unwrap().id, "story");
    }

    #[test]
    fn test_load_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(load_document(&missing), Err(ExportError::NotFound(p)) if p == missing));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        let err = load_document(&broken).unwrap_err();
        assert!(matches!(err, ExportError::Json { ref path, .. } if *path == PathBuf::from(&broken)));
        assert!(err.is_document_error());
    }
}
