//! Shared module - Common types
//!
//! Types shared by every feature: the input document model, graph element
//! kinds and labels, and text offsets.

pub mod models;

// Re-exports for convenience
pub use models::*;
