//! Shared scoring pipeline used by the `run` and `rank` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest (live or synthetic) -> train -> select
//!
//! Each step hands an immutable value to the next; the commands only differ
//! in presentation.

use crate::data::{CrunchbaseSource, RecordSource, SourceConfig};
use crate::domain::{Dataset, ScoringConfig};
use crate::error::AppError;
use crate::io::ingest::{IngestOptions, acquire};
use crate::report::{LeadSelection, ModelStage, select_leads};

/// All computed outputs of a single scoring run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub dataset: Dataset,
    pub selection: LeadSelection,
}

/// Execute the full pipeline against the live listing (unless offline).
pub fn run_pipeline(config: &ScoringConfig) -> Result<RunOutput, AppError> {
    if config.offline {
        return run_with_source(config, None);
    }
    let mut source = CrunchbaseSource::new(SourceConfig::from_env(config.request_timeout));
    run_with_source(config, Some(&mut source))
}

/// Execute the pipeline with an explicit (or no) record source.
pub fn run_with_source(config: &ScoringConfig, source: Option<&mut dyn RecordSource>) -> Result<RunOutput, AppError> {
    // 1) Ingest; never fails, falls back to synthetic data.
    let dataset = acquire(source, &IngestOptions::from(config));

    // 2) + 3) Train on demand, then score and rank the whole dataset.
    let selection = select_leads(ModelStage::Untrained, &dataset, config)?;

    Ok(RunOutput { dataset, selection })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::data::sample::{DEFAULT_SAMPLE_COUNT, generate_sample};
    use crate::data::{RawRecord, SourceError};
    use crate::domain::Provenance;

    struct DownSource;

    impl RecordSource for DownSource {
        fn name(&self) -> &str {
            "down"
        }

        fn open(&mut self) -> Result<(), SourceError> {
            Ok(())
        }

        fn fetch_page(&mut self, _page: usize) -> Result<Vec<RawRecord>, SourceError> {
            Err(SourceError::Request("connection refused".to_string()))
        }

        fn close(&mut self) {}
    }

    fn offline_config() -> ScoringConfig {
        ScoringConfig {
            offline: true,
            page_delay: Duration::ZERO,
            ..ScoringConfig::default()
        }
    }

    #[test]
    fn offline_run_ranks_synthetic_leads() {
        let config = offline_config();
        let out = run_pipeline(&config).unwrap();

        assert_eq!(out.dataset, generate_sample(100, 42));
        let leads = &out.selection.leads;
        assert!(!leads.is_empty());
        assert!(leads.iter().all(|l| l.probability >= 0.7));
        assert!(leads.windows(2).all(|w| w[0].probability >= w[1].probability));
        assert!(out.selection.report.is_some());
    }

    #[test]
    fn failing_source_still_produces_a_run() {
        let config = ScoringConfig {
            offline: false,
            ..offline_config()
        };
        let mut source = DownSource;
        let out = run_with_source(&config, Some(&mut source)).unwrap();

        assert_eq!(out.dataset.len(), DEFAULT_SAMPLE_COUNT);
        assert_eq!(out.dataset.provenance, Provenance::Synthetic);
    }

    #[test]
    fn invalid_threshold_is_a_config_error() {
        let config = ScoringConfig {
            threshold: 1.2,
            ..offline_config()
        };
        let err = run_pipeline(&config).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn too_few_records_is_insufficient_data() {
        let config = ScoringConfig {
            sample_count: 1,
            ..offline_config()
        };
        let err = run_pipeline(&config).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
