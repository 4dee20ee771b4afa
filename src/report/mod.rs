//! Lead selection and formatted terminal output.
//!
//! Selection always scores through a `TrainedModel`, so the schema and scaler
//! used at inference are exactly the ones frozen at training time.

pub mod format;

use tracing::info;

use crate::domain::{Dataset, LeadCandidate, ScoringConfig};
use crate::error::PipelineError;
use crate::fit::{ClassificationReport, TrainOptions, TrainedModel, train_pipeline};

/// Whether a trained model is available when selection starts.
#[derive(Debug, Clone)]
pub enum ModelStage {
    Untrained,
    Trained(TrainedModel),
}

/// Output of the selection step.
#[derive(Debug, Clone)]
pub struct LeadSelection {
    pub model: TrainedModel,
    /// Present only when training happened as part of this selection.
    pub report: Option<ClassificationReport>,
    pub n_train: usize,
    pub n_test: usize,
    pub leads: Vec<LeadCandidate>,
}

/// Score every record, keep `probability >= threshold`, rank descending.
///
/// The sort is stable, so equal probabilities keep ingestion order.
pub fn select(model: &TrainedModel, dataset: &Dataset, threshold: f64) -> Result<Vec<LeadCandidate>, PipelineError> {
    validate_threshold(threshold)?;

    let scores = model.score(dataset)?;
    let mut leads: Vec<LeadCandidate> = dataset
        .records
        .iter()
        .zip(scores)
        .enumerate()
        .filter(|(_, (_, p))| *p >= threshold)
        .map(|(row, (r, probability))| LeadCandidate {
            row,
            name: r.name.clone(),
            industry: r.industry.clone(),
            location: r.location.clone(),
            funding_amount: r.funding_amount,
            probability,
        })
        .collect();

    leads.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    Ok(leads)
}

/// Select leads, training first when no model is available yet.
pub fn select_leads(stage: ModelStage, dataset: &Dataset, config: &ScoringConfig) -> Result<LeadSelection, PipelineError> {
    validate_threshold(config.threshold)?;

    let (model, report, n_train, n_test) = match stage {
        ModelStage::Trained(model) => (model, None, 0, 0),
        ModelStage::Untrained => {
            info!(records = dataset.len(), "no trained model yet, training before selection");
            let out = train_pipeline(dataset, &TrainOptions::from(config))?;
            (out.model, Some(out.report), out.n_train, out.n_test)
        }
    };

    let leads = select(&model, dataset, config.threshold)?;
    info!(
        leads = leads.len(),
        threshold = config.threshold,
        scored = dataset.len(),
        "lead selection complete"
    );

    Ok(LeadSelection {
        model,
        report,
        n_train,
        n_test,
        leads,
    })
}

fn validate_threshold(threshold: f64) -> Result<(), PipelineError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(PipelineError::InvalidConfig(format!(
            "threshold must lie in [0, 1], got {threshold}"
        )))
    }
}
