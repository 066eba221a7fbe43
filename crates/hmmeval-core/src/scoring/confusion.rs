use serde::{Deserialize, Serialize};

use crate::error::{HmmError, Result};
use crate::scoring::estimation::derive_estimations;
use crate::types::{ObservationSequence, PredictionEstimation};

/// Square count matrix indexed `[predicted][actual]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConfusionMatrix")]
pub struct ConfusionMatrix {
    counts: Vec<Vec<u64>>,
}

/// Unchecked wire form; deserialization goes through [`ConfusionMatrix::from_rows`].
#[derive(Deserialize)]
struct RawConfusionMatrix {
    counts: Vec<Vec<u64>>,
}

impl TryFrom<RawConfusionMatrix> for ConfusionMatrix {
    type Error = HmmError;

    fn try_from(raw: RawConfusionMatrix) -> Result<Self> {
        Self::from_rows(raw.counts)
    }
}

impl ConfusionMatrix {
    /// Count (predicted, actual) pairs over every observation.
    ///
    /// Fails if the lengths differ or any index falls outside `[0, num_states)`.
    pub fn build(
        observations: &ObservationSequence,
        predicted: &[usize],
        num_states: usize,
    ) -> Result<Self> {
        if predicted.len() != observations.len() {
            return Err(HmmError::SizeMismatch {
                predicted: predicted.len(),
                actual: observations.len(),
            });
        }

        let mut counts = vec![vec![0u64; num_states]; num_states];
        for (step, (&pred, obs)) in predicted.iter().zip(observations).enumerate() {
            if pred >= num_states {
                return Err(HmmError::IndexOutOfRange {
                    role: "predicted",
                    index: pred,
                    step,
                    num_states,
                });
            }
            if obs.state >= num_states {
                return Err(HmmError::IndexOutOfRange {
                    role: "actual",
                    index: obs.state,
                    step,
                    num_states,
                });
            }
            counts[pred][obs.state] += 1;
        }

        Ok(Self { counts })
    }

    /// Wrap existing counts, checking the matrix is square and non-empty.
    pub fn from_rows(counts: Vec<Vec<u64>>) -> Result<Self> {
        check_square(&counts)?;
        Ok(Self { counts })
    }

    #[must_use]
    pub fn num_states(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn get(&self, predicted: usize, actual: usize) -> u64 {
        self.counts[predicted][actual]
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<u64>] {
        &self.counts
    }

    /// Steps predicted as `state`.
    #[must_use]
    pub fn row_sum(&self, state: usize) -> u64 {
        self.counts[state].iter().sum()
    }

    /// Steps truly in `state`.
    #[must_use]
    pub fn col_sum(&self, state: usize) -> u64 {
        self.counts.iter().map(|row| row[state]).sum()
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Per-state estimations, ordered by state index.
    #[must_use]
    pub fn estimations(&self) -> Vec<PredictionEstimation> {
        derive_estimations(&self.counts)
    }
}

pub(crate) fn check_square(rows: &[Vec<u64>]) -> Result<()> {
    if rows.is_empty() {
        return Err(HmmError::EmptyMatrix);
    }
    if let Some((row, values)) = rows.iter().enumerate().find(|(_, r)| r.len() != rows.len()) {
        return Err(HmmError::NonSquareMatrix {
            rows: rows.len(),
            row,
            cols: values.len(),
        });
    }
    Ok(())
}

/// Build the confusion matrix for `predicted` against the true states.
pub fn confusion_matrix(
    observations: &ObservationSequence,
    predicted: &[usize],
    num_states: usize,
) -> Result<ConfusionMatrix> {
    ConfusionMatrix::build(observations, predicted, num_states)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_step_scenario() {
        let obs = ObservationSequence::from_pairs([(1, 0)]);
        let m = confusion_matrix(&obs, &[1], 3).unwrap();
        for p in 0..3 {
            for a in 0..3 {
                let expected = u64::from(p == 1 && a == 1);
                assert_eq!(m.get(p, a), expected, "cell [{p}][{a}]");
            }
        }
        assert_eq!(m.total(), 1);
    }

    #[test]
    fn counts_predicted_by_actual() {
        let obs = ObservationSequence::from_pairs([(1, 0), (1, 0), (2, 0), (2, 0)]);
        let m = confusion_matrix(&obs, &[1, 2, 2, 1], 4).unwrap();
        assert_eq!(m.get(1, 1), 1);
        assert_eq!(m.get(2, 1), 1);
        assert_eq!(m.get(2, 2), 1);
        assert_eq!(m.get(1, 2), 1);
        assert_eq!(m.row_sum(1), 2);
        assert_eq!(m.col_sum(2), 2);
        assert_eq!(m.total(), 4);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let obs = ObservationSequence::from_pairs([(1, 0), (1, 0)]);
        let err = confusion_matrix(&obs, &[1], 3).unwrap_err();
        assert!(matches!(
            err,
            HmmError::SizeMismatch {
                predicted: 1,
                actual: 2
            }
        ));
    }

    #[test]
    fn predicted_out_of_range() {
        let obs = ObservationSequence::from_pairs([(1, 0), (1, 0)]);
        let err = confusion_matrix(&obs, &[1, 3], 3).unwrap_err();
        assert!(matches!(
            err,
            HmmError::IndexOutOfRange {
                role: "predicted",
                index: 3,
                step: 1,
                ..
            }
        ));
    }

    #[test]
    fn actual_out_of_range() {
        let obs = ObservationSequence::from_pairs([(5, 0)]);
        let err = confusion_matrix(&obs, &[1], 3).unwrap_err();
        assert!(matches!(
            err,
            HmmError::IndexOutOfRange {
                role: "actual",
                index: 5,
                ..
            }
        ));
    }

    #[test]
    fn from_rows_validates_shape() {
        assert!(ConfusionMatrix::from_rows(vec![vec![1, 0], vec![0, 1]]).is_ok());
        assert!(matches!(
            ConfusionMatrix::from_rows(vec![vec![1, 0], vec![0]]).unwrap_err(),
            HmmError::NonSquareMatrix {
                rows: 2,
                row: 1,
                cols: 1
            }
        ));
        assert!(matches!(
            ConfusionMatrix::from_rows(Vec::new()).unwrap_err(),
            HmmError::EmptyMatrix
        ));
    }

    #[test]
    fn deserialize_checks_shape() {
        let matrix = ConfusionMatrix::from_rows(vec![vec![2, 1], vec![0, 3]]).unwrap();
        let json = serde_json::to_string(&matrix).unwrap();
        let back: ConfusionMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, matrix);

        let ragged = serde_json::from_str::<ConfusionMatrix>(r#"{"counts":[[1,0,0],[0,1]]}"#);
        let err = ragged.unwrap_err().to_string();
        assert!(err.contains("must be square"), "{err}");

        assert!(serde_json::from_str::<ConfusionMatrix>(r#"{"counts":[]}"#).is_err());
    }
}
