//! Training orchestration.
//!
//! Produces the one artifact the rest of the run depends on: a `TrainedModel`
//! bundling the forest with the exact schema and scaler state it was fit with.
//! Everything downstream scores through that bundle.

use tracing::{debug, info};

use crate::domain::{Dataset, ForestParams, ScoringConfig};
use crate::error::PipelineError;
use crate::features::{FeatureSchema, ScalerState, encode, fit_schema, labels, scaler};
use crate::fit::metrics::{ClassificationReport, evaluate};
use crate::fit::split::train_test_split;
use crate::models::{self, RandomForest};

/// Training settings, derived from `ScoringConfig`.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub test_fraction: f64,
    pub split_seed: u64,
    pub forest: ForestParams,
}

impl From<&ScoringConfig> for TrainOptions {
    fn from(config: &ScoringConfig) -> Self {
        Self {
            test_fraction: config.test_fraction,
            split_seed: config.split_seed,
            forest: config.forest.clone(),
        }
    }
}

/// Forest + the schema and scaler state it was trained against.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    forest: RandomForest,
    schema: FeatureSchema,
    scaler: ScalerState,
}

impl TrainedModel {
    /// Bundle the parts, rejecting any width disagreement between them.
    pub fn new(forest: RandomForest, schema: FeatureSchema, scaler: ScalerState) -> Result<Self, PipelineError> {
        let expected = schema.width();
        for found in [scaler.width(), forest.n_features()] {
            if found != expected {
                return Err(PipelineError::SchemaMismatch { expected, found });
            }
        }
        Ok(Self { forest, schema, scaler })
    }

    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn scaler(&self) -> &ScalerState {
        &self.scaler
    }

    /// Positive-class probability for every record of `dataset`, in row order.
    ///
    /// Always encodes with the stored schema and scales with the stored state.
    pub fn score(&self, dataset: &Dataset) -> Result<Vec<f64>, PipelineError> {
        let x = encode(dataset, &self.schema);
        let z = scaler::transform(&x, &self.scaler)?;
        self.forest.predict_proba(&z)
    }
}

/// All outputs of the training step.
#[derive(Debug, Clone)]
pub struct TrainingOutput {
    pub model: TrainedModel,
    pub report: ClassificationReport,
    pub n_train: usize,
    pub n_test: usize,
}

/// Fit schema, split, scale (train partition only), train and evaluate.
pub fn train_pipeline(dataset: &Dataset, opts: &TrainOptions) -> Result<TrainingOutput, PipelineError> {
    if dataset.is_empty() {
        return Err(PipelineError::InsufficientData("dataset has no records".to_string()));
    }

    // Categories come from the whole ingested dataset; labels are not used.
    let schema = fit_schema(dataset);
    debug!(columns = ?schema.columns(), "feature schema fit");

    let split = train_test_split(dataset.len(), opts.test_fraction, opts.split_seed)?;
    let train_set = dataset.select_rows(&split.train);
    let test_set = dataset.select_rows(&split.test);

    let x_train = encode(&train_set, &schema);
    let x_test = encode(&test_set, &schema);
    let y_train = labels(&train_set);
    let y_test = labels(&test_set);

    let state = scaler::fit(&x_train)?;
    let z_train = scaler::transform(&x_train, &state)?;
    let z_test = scaler::transform(&x_test, &state)?;

    let forest = models::train(&z_train, &y_train, &opts.forest)?;
    info!(
        trees = forest.n_trees(),
        features = schema.width(),
        train = split.train.len(),
        test = split.test.len(),
        mean_nodes = %format!("{:.1}", forest.mean_nodes()),
        "forest trained"
    );

    let report = evaluate(&forest, &z_test, &y_test)?;
    info!(accuracy = %format!("{:.3}", report.accuracy), "held-out evaluation");

    Ok(TrainingOutput {
        model: TrainedModel::new(forest, schema, state)?,
        report,
        n_train: split.train.len(),
        n_test: split.test.len(),
    })
}
