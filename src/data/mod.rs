//! Company record sources.
//!
//! - `source`: the record-source boundary (trait + raw records)
//! - `crunchbase`: live funding-rounds listing over HTTP
//! - `sample`: seeded synthetic generator (fallback path)

pub mod crunchbase;
pub mod sample;
pub mod source;

pub use crunchbase::{CrunchbaseSource, SourceConfig, parse_listing};
pub use sample::generate_sample;
pub use source::{RawRecord, RecordSource, SourceError};
