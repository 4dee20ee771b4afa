//! Column standardization with a fit-once state.

use nalgebra::DMatrix;

use crate::error::PipelineError;

/// Standard deviations at or below this are treated as 1.0.
const STD_FLOOR: f64 = 1e-12;

/// Per-column mean and standard deviation learned from the training partition.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalerState {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl ScalerState {
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn stds(&self) -> &[f64] {
        &self.stds
    }

    pub fn width(&self) -> usize {
        self.means.len()
    }

    fn check_width(&self, x: &DMatrix<f64>) -> Result<(), PipelineError> {
        if x.ncols() != self.width() {
            return Err(PipelineError::SchemaMismatch {
                expected: self.width(),
                found: x.ncols(),
            });
        }
        Ok(())
    }
}

/// Learn column means and population standard deviations.
///
/// Zero-variance columns (e.g. a category absent from the training rows) get a
/// std of 1.0 so that transforming never divides by zero.
pub fn fit(x: &DMatrix<f64>) -> Result<ScalerState, PipelineError> {
    if x.nrows() == 0 {
        return Err(PipelineError::InsufficientData(
            "cannot fit scaler on zero rows".to_string(),
        ));
    }

    let n = x.nrows() as f64;
    let mut means = Vec::with_capacity(x.ncols());
    let mut stds = Vec::with_capacity(x.ncols());

    for col in x.column_iter() {
        let mean = col.iter().sum::<f64>() / n;
        let var = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = var.sqrt();
        means.push(mean);
        stds.push(if std.is_finite() && std > STD_FLOOR { std } else { 1.0 });
    }

    Ok(ScalerState { means, stds })
}

/// Apply `(x - mean) / std` column-wise using a previously fit state.
pub fn transform(x: &DMatrix<f64>, state: &ScalerState) -> Result<DMatrix<f64>, PipelineError> {
    state.check_width(x)?;
    let mut out = x.clone();
    for (j, mut col) in out.column_iter_mut().enumerate() {
        let (mean, std) = (state.means[j], state.stds[j]);
        col.apply(|v| *v = (*v - mean) / std);
    }
    Ok(out)
}

/// Undo `transform`: `x * std + mean`.
pub fn inverse_transform(x: &DMatrix<f64>, state: &ScalerState) -> Result<DMatrix<f64>, PipelineError> {
    state.check_width(x)?;
    let mut out = x.clone();
    for (j, mut col) in out.column_iter_mut().enumerate() {
        let (mean, std) = (state.means[j], state.stds[j]);
        col.apply(|v| *v = *v * std + mean);
    }
    Ok(out)
}
