//! Bagged decision-tree ensemble (random forest).
//!
//! Each tree gets its own RNG seeded from `seed + tree_index`, so trees can be
//! grown in parallel and still come out identical on every run.

use nalgebra::DMatrix;
use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::domain::ForestParams;
use crate::error::PipelineError;
use crate::models::tree::{DecisionTree, TreeParams};

#[derive(Debug, Clone, PartialEq)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
}

impl RandomForest {
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Column count the forest was trained on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Mean node count per tree.
    pub fn mean_nodes(&self) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        self.trees.iter().map(|t| t.node_count()).sum::<usize>() as f64 / self.trees.len() as f64
    }

    /// Positive-class probability per row: the mean of per-tree leaf fractions.
    pub fn predict_proba(&self, x: &DMatrix<f64>) -> Result<Vec<f64>, PipelineError> {
        if x.ncols() != self.n_features {
            return Err(PipelineError::SchemaMismatch {
                expected: self.n_features,
                found: x.ncols(),
            });
        }
        let n_trees = self.trees.len() as f64;
        Ok((0..x.nrows())
            .map(|i| self.trees.iter().map(|t| t.predict_row(x, i)).sum::<f64>() / n_trees)
            .collect())
    }

    /// Hard class predictions (positive when probability exceeds one half).
    pub fn predict(&self, x: &DMatrix<f64>) -> Result<Vec<u8>, PipelineError> {
        Ok(self
            .predict_proba(x)?
            .into_iter()
            .map(|p| u8::from(p > 0.5))
            .collect())
    }
}

/// Train a forest on a scaled feature matrix and 0/1 labels.
pub fn train(x: &DMatrix<f64>, y: &[u8], params: &ForestParams) -> Result<RandomForest, PipelineError> {
    if x.nrows() != y.len() {
        return Err(PipelineError::InvalidConfig(format!(
            "feature rows ({}) and labels ({}) differ",
            x.nrows(),
            y.len()
        )));
    }
    if x.nrows() == 0 {
        return Err(PipelineError::InsufficientData("no training rows".to_string()));
    }
    if params.n_trees == 0 {
        return Err(PipelineError::InvalidConfig("forest needs at least one tree".to_string()));
    }
    if params.min_samples_split < 2 {
        return Err(PipelineError::InvalidConfig("min_samples_split must be >= 2".to_string()));
    }

    let n = x.nrows();
    let tree_params = TreeParams {
        max_depth: params.max_depth,
        min_samples_split: params.min_samples_split,
        max_features: default_max_features(x.ncols()),
    };

    // Parallel, but `collect` keeps tree order so the ensemble is reproducible.
    let trees: Vec<DecisionTree> = (0..params.n_trees)
        .into_par_iter()
        .map(|t| {
            let mut rng = StdRng::seed_from_u64(params.seed.wrapping_add(t as u64));
            let rows: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            DecisionTree::fit(x, y, &rows, &tree_params, &mut rng)
        })
        .collect();

    Ok(RandomForest {
        trees,
        n_features: x.ncols(),
    })
}

/// `floor(sqrt(d))`, at least 1.
fn default_max_features(n_features: usize) -> usize {
    ((n_features as f64).sqrt().floor() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Positives cluster at high values of column 0; column 1 is noise.
    fn toy() -> (DMatrix<f64>, Vec<u8>) {
        let mut data = Vec::new();
        let mut y = Vec::new();
        for i in 0..40 {
            let v = i as f64;
            data.push(v);
            data.push(((i * 7) % 5) as f64);
            y.push(u8::from(i >= 20));
        }
        (DMatrix::from_row_slice(40, 2, &data), y)
    }

    fn params(seed: u64) -> ForestParams {
        ForestParams {
            n_trees: 25,
            max_depth: None,
            min_samples_split: 2,
            seed,
        }
    }

    #[test]
    fn same_seed_same_forest() {
        let (x, y) = toy();
        let a = train(&x, &y, &params(42)).unwrap();
        let b = train(&x, &y, &params(42)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.predict_proba(&x).unwrap(), b.predict_proba(&x).unwrap());
    }

    #[test]
    fn learns_a_separable_signal() {
        let (x, y) = toy();
        let forest = train(&x, &y, &params(7)).unwrap();
        assert_eq!(forest.n_trees(), 25);

        let proba = forest.predict_proba(&x).unwrap();
        assert!(proba.iter().all(|p| (0.0..=1.0).contains(p)));
        assert!(proba[0] < 0.2, "far negative scored {}", proba[0]);
        assert!(proba[39] > 0.8, "far positive scored {}", proba[39]);

        let preds = forest.predict(&x).unwrap();
        let correct = preds.iter().zip(&y).filter(|(p, l)| p == l).count();
        assert!(correct >= 36, "training accuracy too low: {correct}/40");
    }

    #[test]
    fn rejects_wrong_width_at_prediction() {
        let (x, y) = toy();
        let forest = train(&x, &y, &params(1)).unwrap();
        let wide = DMatrix::<f64>::zeros(3, 5);
        assert_eq!(
            forest.predict_proba(&wide).unwrap_err(),
            PipelineError::SchemaMismatch { expected: 2, found: 5 }
        );
    }

    #[test]
    fn rejects_bad_inputs() {
        let (x, y) = toy();
        assert!(train(&x, &y[..10], &params(1)).is_err());
        assert!(train(&DMatrix::<f64>::zeros(0, 2), &[], &params(1)).is_err());
        let mut p = params(1);
        p.n_trees = 0;
        assert!(train(&x, &y, &p).is_err());
    }

    #[test]
    fn max_features_is_floor_sqrt() {
        assert_eq!(default_max_features(1), 1);
        assert_eq!(default_max_features(13), 3);
        assert_eq!(default_max_features(16), 4);
    }
}
