//! Held-out evaluation: per-class precision/recall/F1 and accuracy.
//!
//! Reporting only; nothing here feeds back into training or selection.

use nalgebra::DMatrix;

use crate::error::PipelineError;
use crate::models::RandomForest;

/// Metrics for one class label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Classification report over the two labels (0 = no funding, 1 = raised).
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    /// Indexed by label.
    pub classes: [ClassMetrics; 2],
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    pub fn support(&self) -> usize {
        self.classes[0].support + self.classes[1].support
    }
}

/// Score the forest on a held-out partition.
pub fn evaluate(model: &RandomForest, x_test: &DMatrix<f64>, y_test: &[u8]) -> Result<ClassificationReport, PipelineError> {
    let predictions = model.predict(x_test)?;
    Ok(classification_report(&predictions, y_test))
}

/// Build a report from predicted and true labels.
///
/// Undefined ratios (no predicted or no actual members of a class) are 0.
pub fn classification_report(predictions: &[u8], labels: &[u8]) -> ClassificationReport {
    let mut tp: usize = 0;
    let mut fp: usize = 0;
    let mut tn: usize = 0;
    let mut fn_count: usize = 0;

    for (&pred, &label) in predictions.iter().zip(labels.iter()) {
        match (pred, label) {
            (1, 1) => tp += 1,
            (1, 0) => fp += 1,
            (0, 0) => tn += 1,
            (0, 1) => fn_count += 1,
            _ => {}
        }
    }

    // The negative class sees the same matrix with roles swapped.
    let positive = class_metrics(tp, fp, fn_count);
    let negative = class_metrics(tn, fn_count, fp);

    let total = tp + fp + tn + fn_count;
    let accuracy = ratio(tp + tn, total);

    let macro_avg = ClassMetrics {
        precision: (negative.precision + positive.precision) / 2.0,
        recall: (negative.recall + positive.recall) / 2.0,
        f1: (negative.f1 + positive.f1) / 2.0,
        support: total,
    };

    let weight = |f: fn(&ClassMetrics) -> f64| -> f64 {
        if total == 0 {
            return 0.0;
        }
        (f(&negative) * negative.support as f64 + f(&positive) * positive.support as f64) / total as f64
    };
    let weighted_avg = ClassMetrics {
        precision: weight(|m| m.precision),
        recall: weight(|m| m.recall),
        f1: weight(|m| m.f1),
        support: total,
    };

    ClassificationReport {
        classes: [negative, positive],
        accuracy,
        macro_avg,
        weighted_avg,
    }
}

fn class_metrics(tp: usize, fp: usize, fn_count: usize) -> ClassMetrics {
    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_count);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };
    ClassMetrics {
        precision,
        recall,
        f1,
        support: tp + fn_count,
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den > 0 { num as f64 / den as f64 } else { 0.0 }
}

impl std::fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:>14} {:>10} {:>10} {:>10} {:>10}", "", "precision", "recall", "f1-score", "support")?;
        writeln!(f)?;
        for (label, m) in self.classes.iter().enumerate() {
            writeln!(
                f,
                "{:>14} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                label, m.precision, m.recall, m.f1, m.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10.2} {:>10}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.support()
        )?;
        for (name, m) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>14} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                name, m.precision, m.recall, m.f1, m.support
            )?;
        }
        Ok(())
    }
}
