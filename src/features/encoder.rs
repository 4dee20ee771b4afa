//! One-hot feature encoding against a frozen schema.
//!
//! `FeatureSchema` is fit once, at training time, and then passed to every
//! `encode` call. Encoding never re-derives categories from the dataset it is
//! given, so the column layout cannot drift between training and scoring.

use std::collections::BTreeSet;

use nalgebra::DMatrix;

use crate::domain::Dataset;

/// Raw numeric columns, appended after the indicator columns.
pub const NUMERIC_COLUMNS: [&str; 3] = ["funding_amount", "employee_count", "founding_year"];

/// Ordered column contract shared by the scaler and the classifier.
///
/// Layout: `industry=<label>` (sorted), `location=<label>` (sorted), then
/// `NUMERIC_COLUMNS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    industries: Vec<String>,
    locations: Vec<String>,
}

impl FeatureSchema {
    pub fn new(industries: Vec<String>, locations: Vec<String>) -> Self {
        let sorted = |v: Vec<String>| -> Vec<String> {
            v.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
        };
        Self {
            industries: sorted(industries),
            locations: sorted(locations),
        }
    }

    pub fn industries(&self) -> &[String] {
        &self.industries
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// Total number of feature columns.
    pub fn width(&self) -> usize {
        self.industries.len() + self.locations.len() + NUMERIC_COLUMNS.len()
    }

    /// Column names in matrix order.
    pub fn columns(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.width());
        out.extend(self.industries.iter().map(|l| format!("industry={l}")));
        out.extend(self.locations.iter().map(|l| format!("location={l}")));
        out.extend(NUMERIC_COLUMNS.iter().map(|c| c.to_string()));
        out
    }

    fn industry_col(&self, label: &str) -> Option<usize> {
        self.industries
            .binary_search_by(|probe| probe.as_str().cmp(label))
            .ok()
    }

    fn location_col(&self, label: &str) -> Option<usize> {
        self.locations
            .binary_search_by(|probe| probe.as_str().cmp(label))
            .ok()
            .map(|i| self.industries.len() + i)
    }

    fn numeric_offset(&self) -> usize {
        self.industries.len() + self.locations.len()
    }
}

/// Derive the schema from every category observed in `dataset`.
pub fn fit_schema(dataset: &Dataset) -> FeatureSchema {
    FeatureSchema::new(
        dataset.records.iter().map(|r| r.industry.clone()).collect(),
        dataset.records.iter().map(|r| r.location.clone()).collect(),
    )
}

/// Encode `dataset` into a `rows x schema.width()` matrix.
///
/// Categories unknown to the schema get no indicator (all zeros for that
/// field); schema categories missing from the dataset stay all-zero columns.
pub fn encode(dataset: &Dataset, schema: &FeatureSchema) -> DMatrix<f64> {
    let mut x = DMatrix::<f64>::zeros(dataset.len(), schema.width());
    let numeric = schema.numeric_offset();

    for (i, r) in dataset.records.iter().enumerate() {
        if let Some(j) = schema.industry_col(&r.industry) {
            x[(i, j)] = 1.0;
        }
        if let Some(j) = schema.location_col(&r.location) {
            x[(i, j)] = 1.0;
        }
        x[(i, numeric)] = r.funding_amount;
        x[(i, numeric + 1)] = f64::from(r.employee_count);
        x[(i, numeric + 2)] = f64::from(r.founding_year);
    }

    x
}

/// Label vector (`1` = raised money), in row order.
pub fn labels(dataset: &Dataset) -> Vec<u8> {
    dataset.records.iter().map(|r| u8::from(r.raised_money)).collect()
}
