//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - company records and the provenance-tagged `Dataset`
//! - ranked output rows (`LeadCandidate`)
//! - run configuration (`ScoringConfig`, `ForestParams`)

pub mod types;

pub use types::*;
