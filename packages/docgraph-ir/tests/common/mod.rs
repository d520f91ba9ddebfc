//! Common test utilities for docgraph-ir
//!
//! Shared document builders and graph assertions for the integration tests.

#![allow(dead_code)]

mod assertions;
mod builders;

// Re-export all utilities
pub use assertions::*;
pub use builders::*;
