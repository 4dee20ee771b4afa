//! Shared domain types.
//!
//! Records and datasets are serializable so they can be handed, unmodified,
//! to external consumers (dataset JSON export, lead CSV export).

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where a dataset's records came from.
///
/// Never part of the feature schema; carried alongside the records so a
/// synthetic fallback is always visible downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Live,
    Synthetic,
}

impl Provenance {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Provenance::Live => "live",
            Provenance::Synthetic => "synthetic",
        }
    }
}

/// One observed or synthesized company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub name: String,
    /// Total disclosed funding in USD (0 when unknown).
    pub funding_amount: f64,
    pub industry: String,
    pub location: String,
    pub employee_count: u32,
    /// Founding year (0 when unknown or implausible).
    pub founding_year: i32,
    /// Training label: has the company raised money.
    pub raised_money: bool,
}

/// The single in-memory dataset of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub provenance: Provenance,
    pub records: Vec<CompanyRecord>,
}

impl Dataset {
    pub fn new(provenance: Provenance, records: Vec<CompanyRecord>) -> Self {
        Self { provenance, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fraction of records labelled as having raised money.
    pub fn positive_rate(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let positives = self.records.iter().filter(|r| r.raised_money).count();
        positives as f64 / self.records.len() as f64
    }

    /// Subset of the dataset by row index, keeping provenance.
    pub fn select_rows(&self, indices: &[usize]) -> Dataset {
        Dataset {
            provenance: self.provenance,
            records: indices.iter().map(|&i| self.records[i].clone()).collect(),
        }
    }
}

/// A company scored above the lead threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadCandidate {
    /// Row index in the ingested dataset (ranking tie-breaker).
    pub row: usize,
    pub name: String,
    pub industry: String,
    pub location: String,
    pub funding_amount: f64,
    pub probability: f64,
}

/// Forest hyper-parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ForestParams {
    pub n_trees: usize,
    /// `None` grows every tree until its leaves are pure.
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Pages requested from the live source (0 skips straight to fallback).
    pub pages: usize,
    /// Skip the live source entirely.
    pub offline: bool,
    /// Fixed pause between live page fetches.
    pub page_delay: Duration,
    /// Per-request timeout for the live source.
    pub request_timeout: Duration,

    /// Synthetic fallback size and seed.
    pub sample_count: usize,
    pub sample_seed: u64,

    /// Held-out fraction for evaluation.
    pub test_fraction: f64,
    /// Seed for the train/test shuffle.
    pub split_seed: u64,
    pub forest: ForestParams,

    /// Minimum probability for a lead.
    pub threshold: f64,

    pub top_n: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_leads: Option<PathBuf>,
    pub export_dataset: Option<PathBuf>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            pages: 5,
            offline: false,
            page_delay: Duration::from_secs(2),
            request_timeout: Duration::from_secs(10),
            sample_count: crate::data::sample::DEFAULT_SAMPLE_COUNT,
            sample_seed: crate::data::sample::DEFAULT_SEED,
            test_fraction: 0.2,
            split_seed: 42,
            forest: ForestParams::default(),
            threshold: 0.7,
            top_n: 20,
            plot: true,
            plot_width: 72,
            plot_height: 16,
            export_leads: None,
            export_dataset: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, raised: bool) -> CompanyRecord {
        CompanyRecord {
            name: name.to_string(),
            funding_amount: 1.0,
            industry: "Software".to_string(),
            location: "Berlin".to_string(),
            employee_count: 10,
            founding_year: 2015,
            raised_money: raised,
        }
    }

    #[test]
    fn positive_rate_and_row_selection() {
        let ds = Dataset::new(
            Provenance::Synthetic,
            vec![record("a", true), record("b", false), record("c", true), record("d", true)],
        );
        assert!((ds.positive_rate() - 0.75).abs() < 1e-12);

        let sub = ds.select_rows(&[3, 1]);
        assert_eq!(sub.provenance, Provenance::Synthetic);
        assert_eq!(sub.records[0].name, "d");
        assert_eq!(sub.records[1].name, "b");
    }

    #[test]
    fn provenance_serializes_lowercase() {
        let json = serde_json::to_string(&Provenance::Live).unwrap();
        assert_eq!(json, "\"live\"");
    }
}
