use std::fmt;

use serde::{Deserialize, Serialize};

/// Prediction quality for a single state, derived from a confusion matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionEstimation {
    pub true_positives: u64,
    pub false_positives: u64,
    pub true_negatives: u64,
    pub false_negatives: u64,
    /// Harmonic mean of precision and recall, `0.0` when both are zero.
    pub f_measure: f64,
}

impl PredictionEstimation {
    /// Fraction of steps predicted as this state that really were it.
    #[must_use]
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// Fraction of steps truly in this state that were predicted as it.
    #[must_use]
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// Number of observations the counts were taken over.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }
}

pub(crate) fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl fmt::Display for PredictionEstimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "True Positives={}, False Positives={}, True Negatives={}, False Negatives={}, f-measure={:.4}",
            self.true_positives,
            self.false_positives,
            self.true_negatives,
            self.false_negatives,
            self.f_measure
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_report_layout() {
        let est = PredictionEstimation {
            true_positives: 3,
            false_positives: 1,
            true_negatives: 5,
            false_negatives: 2,
            f_measure: 2.0 / 3.0,
        };
        assert_eq!(
            est.to_string(),
            "True Positives=3, False Positives=1, True Negatives=5, False Negatives=2, f-measure=0.6667"
        );
    }

    #[test]
    fn precision_and_recall() {
        let est = PredictionEstimation {
            true_positives: 3,
            false_positives: 1,
            true_negatives: 5,
            false_negatives: 2,
            f_measure: 0.0,
        };
        assert!((est.precision() - 0.75).abs() < 1e-12);
        assert!((est.recall() - 0.6).abs() < 1e-12);
        assert_eq!(est.total(), 11);
    }

    #[test]
    fn empty_counts_give_zero_ratios() {
        let est = PredictionEstimation::default();
        assert_eq!(est.precision(), 0.0);
        assert_eq!(est.recall(), 0.0);
    }
}
