use crate::error::Result;
use crate::scoring::confusion::check_square;
use crate::types::estimation::{ratio, PredictionEstimation};

/// Per-state TP/FP/TN/FN and F-measure from a `[predicted][actual]` matrix.
///
/// The matrix must be square and non-empty. One entry is produced per state,
/// begin and end included; hiding those is left to the caller.
pub fn estimations(matrix: &[Vec<u64>]) -> Result<Vec<PredictionEstimation>> {
    check_square(matrix)?;
    Ok(derive_estimations(matrix))
}

/// Same as [`estimations`] for a matrix already known to be square.
pub(crate) fn derive_estimations(matrix: &[Vec<u64>]) -> Vec<PredictionEstimation> {
    let num_states = matrix.len();
    let mut row_sums = vec![0u64; num_states];
    let mut col_sums = vec![0u64; num_states];
    for (i, row) in matrix.iter().enumerate() {
        for (j, &count) in row.iter().enumerate() {
            row_sums[i] += count;
            col_sums[j] += count;
        }
    }
    let total: u64 = row_sums.iter().sum();

    (0..num_states)
        .map(|state| {
            let true_positives = matrix[state][state];
            let false_positives = row_sums[state] - true_positives;
            let false_negatives = col_sums[state] - true_positives;
            let true_negatives = total - true_positives - false_positives - false_negatives;

            let precision = ratio(true_positives, row_sums[state]);
            let recall = ratio(true_positives, col_sums[state]);
            let f_measure = if precision + recall == 0.0 {
                0.0
            } else {
                2.0 * precision * recall / (precision + recall)
            };

            PredictionEstimation {
                true_positives,
                false_positives,
                true_negatives,
                false_negatives,
                f_measure,
            }
        })
        .collect()
}
