//! Infrastructure layer - Storage adapters

pub mod json;

pub use json::JsonGraphStore;
