//! Feature preparation: one-hot encoding and standardization.

pub mod encoder;
pub mod scaler;

pub use encoder::{FeatureSchema, NUMERIC_COLUMNS, encode, fit_schema, labels};
pub use scaler::ScalerState;
