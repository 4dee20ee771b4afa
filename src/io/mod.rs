//! Input/output helpers.
//!
//! - live ingestion with synthetic fallback (`ingest`)
//! - lead CSV / dataset JSON exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
