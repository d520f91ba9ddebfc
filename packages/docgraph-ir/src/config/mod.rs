//! Configuration system
//!
//! - `ExportConfig`: per-document conversion switches plus the batch section
//! - Versioned YAML schema (`version: 1`) with unknown-field rejection
//! - `Validatable` range and consistency checks
//!
//! ```rust,ignore
//! use docgraph_ir::config::{ExportConfig, Validatable};
//!
//! let config = ExportConfig::from_yaml("corpus.yaml")?;
//! let config = ExportConfig::default().simplified(false);
//! config.validate()?;
//! ```

pub mod error;
pub mod export_config;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use export_config::{BatchConfig, ExportConfig};
pub use validation::Validatable;
