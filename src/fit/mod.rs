//! Model fitting orchestration.
//!
//! Responsibilities:
//!
//! - partition the dataset into train/test rows (seeded)
//! - fit schema and scaler, train the forest
//! - report held-out classification metrics

pub mod metrics;
pub mod split;
pub mod trainer;

pub use metrics::{ClassMetrics, ClassificationReport, classification_report, evaluate};
pub use split::{TrainTestSplit, train_test_split};
pub use trainer::{TrainOptions, TrainedModel, TrainingOutput, train_pipeline};
