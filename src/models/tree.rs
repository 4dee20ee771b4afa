//! CART decision tree (Gini impurity) over a bootstrap row sample.
//!
//! Trees are stored as a flat node arena. Each leaf keeps the fraction of
//! positive labels among the training rows that reached it, which is what the
//! forest averages into a probability.

use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Growth limits for a single tree.
#[derive(Debug, Clone)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    /// Non-constant features examined per split.
    pub max_features: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        positive: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

impl DecisionTree {
    /// Grow a tree on `rows` (indices into `x`/`y`, duplicates allowed).
    pub fn fit(x: &DMatrix<f64>, y: &[u8], rows: &[usize], params: &TreeParams, rng: &mut StdRng) -> Self {
        let mut tree = DecisionTree { nodes: Vec::new() };
        tree.grow(x, y, rows.to_vec(), 0, params, rng);
        tree
    }

    /// Probability of the positive class for row `i` of `x`.
    pub fn predict_row(&self, x: &DMatrix<f64>, i: usize) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { positive } => return *positive,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[(i, *feature)] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| matches!(n, Node::Leaf { .. })).count()
    }

    fn grow(
        &mut self,
        x: &DMatrix<f64>,
        y: &[u8],
        rows: Vec<usize>,
        depth: usize,
        params: &TreeParams,
        rng: &mut StdRng,
    ) -> usize {
        let idx = self.nodes.len();
        let positives = rows.iter().filter(|&&r| y[r] == 1).count();
        let positive = if rows.is_empty() {
            0.0
        } else {
            positives as f64 / rows.len() as f64
        };
        self.nodes.push(Node::Leaf { positive });

        let pure = positives == 0 || positives == rows.len();
        let depth_reached = params.max_depth.is_some_and(|d| depth >= d);
        if pure || depth_reached || rows.len() < params.min_samples_split {
            return idx;
        }

        let Some(split) = best_split(x, y, &rows, params.max_features, rng) else {
            return idx;
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .iter()
            .copied()
            .partition(|&r| x[(r, split.feature)] <= split.threshold);

        let left = self.grow(x, y, left_rows, depth + 1, params, rng);
        let right = self.grow(x, y, right_rows, depth + 1, params, rng);
        self.nodes[idx] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        idx
    }
}

/// Search a random subset of features for the lowest weighted Gini split.
///
/// Constant features do not count against `max_features`; the search keeps
/// drawing until it has evaluated that many splittable features or run out.
fn best_split(
    x: &DMatrix<f64>,
    y: &[u8],
    rows: &[usize],
    max_features: usize,
    rng: &mut StdRng,
) -> Option<Split> {
    let mut features: Vec<usize> = (0..x.ncols()).collect();
    features.shuffle(rng);

    let mut best: Option<Split> = None;
    let mut evaluated = 0usize;
    for feature in features {
        if evaluated >= max_features.max(1) {
            break;
        }
        let Some(candidate) = best_threshold(x, y, rows, feature) else {
            continue;
        };
        evaluated += 1;
        if best.is_none_or(|b| candidate.impurity < b.impurity) {
            best = Some(candidate);
        }
    }
    best
}

/// Best threshold on one feature, or `None` if the feature is constant here.
fn best_threshold(x: &DMatrix<f64>, y: &[u8], rows: &[usize], feature: usize) -> Option<Split> {
    let mut values: Vec<(f64, u8)> = rows.iter().map(|&r| (x[(r, feature)], y[r])).collect();
    values.sort_by(|a, b| a.0.total_cmp(&b.0));

    let n = values.len();
    let total_pos = values.iter().filter(|v| v.1 == 1).count();
    let mut left_pos = 0usize;
    let mut best: Option<Split> = None;

    for k in 0..n.saturating_sub(1) {
        left_pos += usize::from(values[k].1);
        let (lo, hi) = (values[k].0, values[k + 1].0);
        if lo == hi {
            continue;
        }

        let n_left = k + 1;
        let n_right = n - n_left;
        let impurity = n_left as f64 * gini(left_pos, n_left)
            + n_right as f64 * gini(total_pos - left_pos, n_right);

        if best.is_none_or(|b| impurity < b.impurity) {
            // Midpoint, kept strictly below `hi` so `<=` routes `hi` right.
            let mut threshold = lo + (hi - lo) / 2.0;
            if threshold >= hi {
                threshold = lo;
            }
            best = Some(Split {
                feature,
                threshold,
                impurity,
            });
        }
    }
    best
}

fn gini(positives: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = positives as f64 / n as f64;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn params(max_depth: Option<usize>) -> TreeParams {
        TreeParams {
            max_depth,
            min_samples_split: 2,
            max_features: 2,
        }
    }

    #[test]
    fn separable_data_is_fit_exactly() {
        // Label is 1 exactly when the first feature exceeds 5.
        let x = DMatrix::from_row_slice(6, 2, &[1.0, 0.0, 2.0, 1.0, 3.0, 0.0, 7.0, 1.0, 8.0, 0.0, 9.0, 1.0]);
        let y = [0, 0, 0, 1, 1, 1];
        let rows: Vec<usize> = (0..6).collect();
        let mut rng = StdRng::seed_from_u64(1);

        let tree = DecisionTree::fit(&x, &y, &rows, &params(None), &mut rng);
        for (i, &label) in y.iter().enumerate() {
            assert_eq!(tree.predict_row(&x, i), f64::from(label));
        }
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn depth_limit_produces_mixed_leaf() {
        let x = DMatrix::from_row_slice(4, 1, &[1.0, 2.0, 3.0, 4.0]);
        let y = [0, 1, 0, 1];
        let rows: Vec<usize> = (0..4).collect();
        let mut rng = StdRng::seed_from_u64(1);

        let stump = DecisionTree::fit(&x, &y, &rows, &params(Some(0)), &mut rng);
        assert_eq!(stump.node_count(), 1);
        assert!((stump.predict_row(&x, 0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn constant_features_yield_single_leaf() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 5.0, 1.0, 5.0, 1.0, 5.0]);
        let y = [0, 1, 1];
        let rows: Vec<usize> = (0..3).collect();
        let mut rng = StdRng::seed_from_u64(3);

        let tree = DecisionTree::fit(&x, &y, &rows, &params(None), &mut rng);
        assert_eq!(tree.node_count(), 1);
        assert!((tree.predict_row(&x, 0) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn gini_values() {
        assert_eq!(gini(0, 4), 0.0);
        assert_eq!(gini(4, 4), 0.0);
        assert!((gini(2, 4) - 0.5).abs() < 1e-12);
        assert_eq!(gini(0, 0), 0.0);
    }
}
