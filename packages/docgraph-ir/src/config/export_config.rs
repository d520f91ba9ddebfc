//! Export configuration
//!
//! One `ExportConfig` drives a conversion run. It can be built in code,
//! loaded from a versioned YAML file, and overridden from the CLI.
//!
//! ```yaml
//! version: 1
//! export:
//!   span_mode: token_reference
//!   simplified_annotations: true
//!   batch:
//!     extension: folia.json
//!     recurse: true
//!     jobs: 4
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ConfigError, ConfigResult};
use super::validation::Validatable;
use crate::features::span_conversion::domain::SpanMode;
use crate::features::text_linearizer::domain::SpacingPolicy;

/// Supported schema versions
const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Upper bound for explicit worker counts
const MAX_JOBS: usize = 1024;

/// Per-document conversion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// When a separator is inserted between two tokens
    pub spacing: SpacingPolicy,

    /// How span annotations reference tokens
    pub span_mode: SpanMode,

    /// Abort on tokens without identifier
    pub require_token_ids: bool,

    /// Emit a phonetic datasource when tokens carry phonetic content
    pub include_phon: bool,

    /// Convert roles of span annotations into their own span nodes
    pub include_span_roles: bool,

    /// Add class labels in the neutral namespace
    pub simplified_annotations: bool,

    /// Only emit the neutral-namespace class labels for inline annotations
    pub simplified_only: bool,

    /// Prefix of layer and label namespaces
    pub namespace_prefix: String,

    /// Run the graph integrity check after each conversion
    pub verify_integrity: bool,

    pub batch: BatchConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            spacing: SpacingPolicy::default(),
            span_mode: SpanMode::default(),
            require_token_ids: true,
            include_phon: true,
            include_span_roles: true,
            simplified_annotations: false,
            simplified_only: false,
            namespace_prefix: "FoLiA".to_string(),
            verify_integrity: true,
            batch: BatchConfig::default(),
        }
    }
}

impl ExportConfig {
    pub fn with_span_mode(mut self, span_mode: SpanMode) -> Self {
        self.span_mode = span_mode;
        self
    }

    pub fn with_spacing(mut self, spacing: SpacingPolicy) -> Self {
        self.spacing = spacing;
        self
    }

    /// Enable simplified labels; `only` drops the namespaced inline labels
    pub fn simplified(mut self, only: bool) -> Self {
        self.simplified_annotations = true;
        self.simplified_only = only;
        self
    }

    /// Load from a versioned YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ExportConfigFileV1 = serde_yaml::from_str(content)?;

        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let config = file.export;
        config.validate()?;
        Ok(config)
    }

    /// Export as versioned YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ExportConfigFileV1 {
            version: Some(1),
            export: self.clone(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}

impl Validatable for ExportConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.namespace_prefix.is_empty() {
            return Err(ConfigError::invalid("namespace_prefix", "must not be empty"));
        }
        if self.namespace_prefix.contains(':') {
            return Err(ConfigError::invalid(
                "namespace_prefix",
                format!("'{}' must not contain ':'", self.namespace_prefix),
            ));
        }
        if self.simplified_only && !self.simplified_annotations {
            return Err(ConfigError::Conflict {
                issue: "simplified_only requires simplified_annotations".to_string(),
                fix: "Set simplified_annotations: true or drop simplified_only".to_string(),
            });
        }
        self.batch.validate()
    }

    fn config_name(&self) -> &'static str {
        "ExportConfig"
    }
}

/// Batch conversion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// File extension of input documents when scanning directories
    pub extension: String,

    /// Descend into subdirectories
    pub recurse: bool,

    /// Corpus name, used as output subdirectory
    pub corpus_prefix: String,

    /// Worker threads (0 = one per CPU)
    pub jobs: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            extension: "json".to_string(),
            recurse: false,
            corpus_prefix: "corpus".to_string(),
            jobs: 0,
        }
    }
}

impl BatchConfig {
    /// Effective worker count
    pub fn worker_count(&self) -> usize {
        if self.jobs == 0 {
            num_cpus::get()
        } else {
            self.jobs
        }
    }
}

impl Validatable for BatchConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.jobs > MAX_JOBS {
            return Err(ConfigError::range_with_hint(
                "jobs",
                self.jobs,
                0,
                MAX_JOBS,
                "Use 0 for one worker per CPU",
            ));
        }
        if self.extension.is_empty() {
            return Err(ConfigError::invalid("extension", "must not be empty"));
        }
        if self.corpus_prefix.is_empty()
            || self.corpus_prefix.contains(['/', '\\'])
            || self.corpus_prefix == "."
            || self.corpus_prefix == ".."
        {
            return Err(ConfigError::invalid(
                "corpus_prefix",
                format!("'{}' must be a plain directory name", self.corpus_prefix),
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "BatchConfig"
    }
}

/// YAML schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExportConfigFileV1 {
    /// Schema version (always 1 for v1)
    #[serde(default)]
    version: Option<u32>,

    #[serde(default)]
    export: ExportConfig,
}
