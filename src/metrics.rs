//! Classification metrics for evaluating seizure predictions.

use crate::error::{Result, SeizureError};
use serde::{Deserialize, Serialize};

/// Confusion matrix for binary classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub tp: usize,
    pub tn: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
}

impl ConfusionMatrix {
    pub fn from_predictions(y_true: &[bool], y_pred: &[bool]) -> Self {
        let mut cm = Self::default();
        for (&t, &p) in y_true.iter().zip(y_pred) {
            match (t, p) {
                (true, true) => cm.tp += 1,
                (false, false) => cm.tn += 1,
                (false, true) => cm.fp += 1,
                (true, false) => cm.fn_ += 1,
            }
        }
        cm
    }

    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }

    pub fn display(&self) -> String {
        format!(
            "Predicted:    0       1\n\
             Actual 0:   {:>5}   {:>5}  (TN/FP)\n\
             Actual 1:   {:>5}   {:>5}  (FN/TP)",
            self.tn, self.fp, self.fn_, self.tp
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub confusion_matrix: ConfusionMatrix,
    pub accuracy: f64,
    pub precision: f64,
    /// Sensitivity
    pub recall: f64,
    pub specificity: f64,
    pub f1: f64,
    /// `None` without probabilities or when only one class is present
    pub roc_auc: Option<f64>,
}

impl ClassificationMetrics {
    pub fn compute(
        y_true: &[bool],
        y_pred: &[bool],
        probabilities: Option<&[f64]>,
    ) -> Result<Self> {
        if y_pred.len() != y_true.len() {
            return Err(SeizureError::DimensionMismatch {
                expected: y_true.len(),
                got: y_pred.len(),
            });
        }
        if let Some(probs) = probabilities {
            if probs.len() != y_true.len() {
                return Err(SeizureError::DimensionMismatch {
                    expected: y_true.len(),
                    got: probs.len(),
                });
            }
        }

        let cm = ConfusionMatrix::from_predictions(y_true, y_pred);
        let precision = ratio(cm.tp, cm.tp + cm.fp);
        let recall = ratio(cm.tp, cm.tp + cm.fn_);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Ok(Self {
            confusion_matrix: cm,
            accuracy: ratio(cm.tp + cm.tn, cm.total()),
            precision,
            recall,
            specificity: ratio(cm.tn, cm.tn + cm.fp),
            f1,
            roc_auc: probabilities.and_then(|p| roc_auc(y_true, p)),
        })
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Area under the ROC curve via the Mann-Whitney U statistic, with average
/// ranks for tied scores.
pub fn roc_auc(y_true: &[bool], scores: &[f64]) -> Option<f64> {
    let n_pos = y_true.iter().filter(|&&t| t).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut rank_sum_pos = 0.0;
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        // ranks are 1-based; tied block [i, j] shares the mean rank
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            if y_true[idx] {
                rank_sum_pos += avg_rank;
            }
        }
        i = j + 1;
    }

    let u = rank_sum_pos - (n_pos * (n_pos + 1)) as f64 / 2.0;
    Some(u / (n_pos * n_neg) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confusion_matrix() {
        let y_true = [true, true, false, false, true];
        let y_pred = [true, false, false, true, true];
        let cm = ConfusionMatrix::from_predictions(&y_true, &y_pred);
        assert_eq!(
            cm,
            ConfusionMatrix {
                tp: 2,
                tn: 1,
                fp: 1,
                fn_: 1
            }
        );
        assert_eq!(cm.total(), 5);
        assert!(cm.display().contains("(FN/TP)"));
    }

    #[test]
    fn test_metrics_values() {
        let y_true = [true, true, false, false, true];
        let y_pred = [true, false, false, true, true];
        let m = ClassificationMetrics::compute(&y_true, &y_pred, None).unwrap();
        assert!((m.accuracy - 0.6).abs() < 1e-12);
        assert!((m.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((m.recall - 2.0 / 3.0).abs() < 1e-12);
        assert!((m.specificity - 0.5).abs() < 1e-12);
        assert!((m.f1 - 2.0 / 3.0).abs() < 1e-12);
        assert!(m.roc_auc.is_none());
    }

    #[test]
    fn test_zero_denominators() {
        let m = ClassificationMetrics::compute(&[false, false], &[false, false], None).unwrap();
        assert_eq!(m.precision, 0.0);
        assert_eq!(m.recall, 0.0);
        assert_eq!(m.f1, 0.0);
        assert_eq!(m.accuracy, 1.0);
    }

    #[test]
    fn test_roc_auc() {
        assert_eq!(roc_auc(&[false, false, true, true], &[0.1, 0.2, 0.8, 0.9]), Some(1.0));
        assert_eq!(roc_auc(&[true, true, false, false], &[0.1, 0.2, 0.8, 0.9]), Some(0.0));
        assert_eq!(roc_auc(&[true, false], &[0.5, 0.5]), Some(0.5));
        // one of four positive/negative pairs is misordered
        assert_eq!(roc_auc(&[false, true, false, true], &[0.1, 0.35, 0.4, 0.8]), Some(0.75));
        assert_eq!(roc_auc(&[true, true], &[0.1, 0.2]), None);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(ClassificationMetrics::compute(&[true], &[true, false], None).is_err());
        assert!(ClassificationMetrics::compute(&[true], &[true], Some(&[0.1, 0.2])).is_err());
    }
}
