//! Ingestion: live source with synthetic fallback, plus record normalization.
//!
//! Design goals:
//! - **Never fail**: any live-source failure becomes a synthetic dataset
//! - **Visible fallback**: every dataset carries its `Provenance`
//! - **Field-level recovery**: one unparseable field defaults to 0, never
//!   dropping the record or the batch
//! - **Session discipline**: an opened source is closed exactly once

use std::time::Duration;

use chrono::{Datelike, Local};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::data::sample::generate_sample;
use crate::data::source::{RawRecord, RecordSource, SourceError};
use crate::domain::{CompanyRecord, Dataset, Provenance, ScoringConfig};

/// Earliest founding year accepted from the live source.
const MIN_FOUNDING_YEAR: i32 = 1900;

/// Label for categorical fields the source left blank.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Why the live attempt produced no dataset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestFailure {
    #[error("{name} setup failed: {error}")]
    Setup { name: String, error: SourceError },

    #[error("page {page} failed: {error}")]
    Page { page: usize, error: SourceError },

    #[error("no records across {pages} page(s)")]
    Empty { pages: usize },
}

/// Result of one live acquisition attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeOutcome {
    Collected(Vec<CompanyRecord>),
    Failed(IngestFailure),
}

/// Ingestion settings, derived from `ScoringConfig`.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub pages: usize,
    pub page_delay: Duration,
    pub sample_count: usize,
    pub sample_seed: u64,
}

impl From<&ScoringConfig> for IngestOptions {
    fn from(config: &ScoringConfig) -> Self {
        Self {
            pages: config.pages,
            page_delay: config.page_delay,
            sample_count: config.sample_count,
            sample_seed: config.sample_seed,
        }
    }
}

/// Acquire the run's dataset.
///
/// `source = None` (offline mode) goes straight to the synthetic generator.
pub fn acquire(source: Option<&mut dyn RecordSource>, opts: &IngestOptions) -> Dataset {
    let outcome = match source {
        Some(source) => scrape(source, opts.pages, opts.page_delay),
        None => {
            info!("offline mode: skipping live source");
            return generate_sample(opts.sample_count, opts.sample_seed);
        }
    };

    match outcome {
        ScrapeOutcome::Collected(records) => {
            info!(records = records.len(), "collected live company records");
            Dataset::new(Provenance::Live, records)
        }
        ScrapeOutcome::Failed(reason) => {
            warn!(%reason, "live source unavailable; using synthetic companies");
            generate_sample(opts.sample_count, opts.sample_seed)
        }
    }
}

/// Run the live source over `pages` pages.
pub fn scrape(source: &mut dyn RecordSource, pages: usize, page_delay: Duration) -> ScrapeOutcome {
    let name = source.name().to_string();
    if let Err(error) = source.open() {
        return ScrapeOutcome::Failed(IngestFailure::Setup { name, error });
    }

    // From here on the session is released when `session` drops.
    let mut session = SessionGuard { source };
    let mut raw = Vec::new();

    for page in 1..=pages {
        if page > 1 && !page_delay.is_zero() {
            std::thread::sleep(page_delay);
        }
        match session.source.fetch_page(page) {
            Ok(records) => {
                debug!(page, records = records.len(), "page extracted");
                raw.extend(records);
            }
            Err(error) => return ScrapeOutcome::Failed(IngestFailure::Page { page, error }),
        }
    }
    drop(session);

    if raw.is_empty() {
        return ScrapeOutcome::Failed(IngestFailure::Empty { pages });
    }

    let current_year = Local::now().year();
    let records = raw
        .iter()
        .enumerate()
        .map(|(i, r)| normalize_record(r, i, current_year))
        .collect();
    ScrapeOutcome::Collected(records)
}

/// Closes the wrapped source on drop, on every exit path.
struct SessionGuard<'a> {
    source: &'a mut dyn RecordSource,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.source.close();
    }
}

/// Turn one raw card into a fully populated record.
///
/// Live listings only contain companies with a funding round, so the label is
/// always positive here (unlike synthetic data, which is drawn at 70%).
pub fn normalize_record(raw: &RawRecord, index: usize, current_year: i32) -> CompanyRecord {
    let funding_amount = raw.funding.as_deref().and_then(parse_funding).unwrap_or(0.0);
    let employee_count = raw.employees.as_deref().and_then(parse_employees).unwrap_or(0);
    let founding_year = raw
        .founding_year
        .as_deref()
        .and_then(|y| parse_year(y, current_year))
        .unwrap_or(0);

    if funding_amount == 0.0 || employee_count == 0 || founding_year == 0 {
        debug!(index, "defaulted one or more numeric fields to 0");
    }

    CompanyRecord {
        name: raw
            .name
            .clone()
            .unwrap_or_else(|| format!("Company_{index}")),
        funding_amount,
        industry: category(raw.industry.as_deref()),
        location: category(raw.location.as_deref()),
        employee_count,
        founding_year,
        raised_money: true,
    }
}

fn category(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNKNOWN_CATEGORY.to_string(),
    }
}

/// Parse amounts like `$12M`, `$750K`, `$1.2B` or `$12,500,000` into USD.
pub fn parse_funding(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let (digits, multiplier) = match cleaned.chars().last()?.to_ascii_uppercase() {
        'K' => (&cleaned[..cleaned.len() - 1], 1e3),
        'M' => (&cleaned[..cleaned.len() - 1], 1e6),
        'B' => (&cleaned[..cleaned.len() - 1], 1e9),
        _ => (cleaned.as_str(), 1.0),
    };

    let v = digits.parse::<f64>().ok()? * multiplier;
    if v.is_finite() && v >= 0.0 { Some(v) } else { None }
}

/// Parse head-count text; ranges such as `51-100` use the lower bound.
pub fn parse_employees(raw: &str) -> Option<u32> {
    let lower = raw.split('-').next()?;
    let cleaned: String = lower
        .chars()
        .filter(|c| !matches!(c, ',' | '+' | ' '))
        .collect();
    cleaned.parse::<u32>().ok()
}

/// Parse a founding year within `[1900, current_year]`.
pub fn parse_year(raw: &str, current_year: i32) -> Option<i32> {
    let year = raw.trim().parse::<i32>().ok()?;
    (MIN_FOUNDING_YEAR..=current_year).contains(&year).then_some(year)
}
