//! The record-source boundary.
//!
//! A source hands back raw, untyped field text page by page. Turning that text
//! into `CompanyRecord`s (with per-field defaults) is the ingestion
//! coordinator's job, not the source's.

use thiserror::Error;

/// One company as extracted from a source page, before any parsing.
///
/// Every field is optional: a card missing an element simply yields `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub name: Option<String>,
    pub funding: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub employees: Option<String>,
    pub founding_year: Option<String>,
}

/// Failures raised by a record source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("source setup failed: {0}")]
    Setup(String),

    #[error("source used before open()")]
    NotOpen,

    #[error("request failed: {0}")]
    Request(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("page {page} has no company cards")]
    MissingElements { page: usize },

    #[error("page parse failed: {0}")]
    Parse(String),
}

/// A paginated supplier of raw company records.
///
/// Lifecycle: `open` once, `fetch_page` for pages `1..=n`, then `close`
/// exactly once. The ingestion coordinator enforces the `close` call.
pub trait RecordSource {
    /// Short label for logs.
    fn name(&self) -> &str;

    /// Acquire whatever session the source needs (HTTP client, browser, ...).
    fn open(&mut self) -> Result<(), SourceError>;

    /// Fetch one 1-based page.
    fn fetch_page(&mut self, page: usize) -> Result<Vec<RawRecord>, SourceError>;

    /// Release the session acquired by `open`.
    fn close(&mut self);
}
