//! Pipeline orchestration
//!
//! - `processor`: one document (load → build → store)
//! - `batch`: many documents, in parallel, with a corpus manifest

pub mod batch;
pub mod processor;

pub use batch::{collect_inputs, BatchConverter, BatchReport};
pub use processor::{convert_file, export_file};
