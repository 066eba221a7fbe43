use serde::{Deserialize, Serialize};

use crate::error::{HmmError, Result};
use crate::types::model::Model;

/// One observed time step: the emitted symbol and the true hidden state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Observation {
    /// Zero-based time index.
    pub time: usize,
    /// Ground-truth state index.
    pub state: usize,
    /// Emitted symbol index.
    pub symbol: usize,
}

impl Observation {
    #[must_use]
    pub fn new(time: usize, state: usize, symbol: usize) -> Self {
        Self {
            time,
            state,
            symbol,
        }
    }
}

/// Time-ordered observations with contiguous time indices starting at 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawObservationSequence")]
pub struct ObservationSequence {
    steps: Vec<Observation>,
}

/// Unchecked wire form; deserialization goes through [`ObservationSequence::new`].
#[derive(Deserialize)]
struct RawObservationSequence {
    steps: Vec<Observation>,
}

impl TryFrom<RawObservationSequence> for ObservationSequence {
    type Error = HmmError;

    fn try_from(raw: RawObservationSequence) -> Result<Self> {
        Self::new(raw.steps)
    }
}

impl ObservationSequence {
    /// Wrap a list of observations, checking that time runs 0, 1, 2, ...
    pub fn new(steps: Vec<Observation>) -> Result<Self> {
        for (expected, step) in steps.iter().enumerate() {
            if step.time != expected {
                return Err(HmmError::StepOutOfOrder {
                    expected,
                    found: step.time,
                });
            }
        }
        Ok(Self { steps })
    }

    /// Build a sequence from `(true_state, symbol)` pairs, numbering steps from 0.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let steps = pairs
            .into_iter()
            .enumerate()
            .map(|(time, (state, symbol))| Observation::new(time, state, symbol))
            .collect();
        Self { steps }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn get(&self, time: usize) -> Option<&Observation> {
        self.steps.get(time)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.steps.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Observation] {
        &self.steps
    }

    /// Emitted symbol indices in time order.
    #[must_use]
    pub fn symbols(&self) -> Vec<usize> {
        self.steps.iter().map(|o| o.symbol).collect()
    }

    /// Ground-truth state indices in time order.
    #[must_use]
    pub fn true_states(&self) -> Vec<usize> {
        self.steps.iter().map(|o| o.state).collect()
    }

    /// Check that every state and symbol index fits `model`.
    pub fn validate_against(&self, model: &Model) -> Result<()> {
        for obs in &self.steps {
            if obs.state >= model.num_states() {
                return Err(HmmError::StateOutOfRange {
                    step: obs.time,
                    state: obs.state,
                    num_states: model.num_states(),
                });
            }
            if obs.symbol >= model.alphabet_size() {
                return Err(HmmError::SymbolOutOfRange {
                    symbol: obs.symbol,
                    alphabet_size: model.alphabet_size(),
                });
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ObservationSequence {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_numbers_steps() {
        let seq = ObservationSequence::from_pairs([(1, 0), (2, 1)]);
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.get(1), Some(&Observation::new(1, 2, 1)));
        assert_eq!(seq.symbols(), vec![0, 1]);
        assert_eq!(seq.true_states(), vec![1, 2]);
    }

    #[test]
    fn new_rejects_gaps() {
        let err = ObservationSequence::new(vec![
            Observation::new(0, 1, 0),
            Observation::new(2, 1, 0),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            HmmError::StepOutOfOrder {
                expected: 1,
                found: 2
            }
        ));
    }

    #[test]
    fn empty_sequence_is_allowed() {
        let seq = ObservationSequence::new(Vec::new()).unwrap();
        assert!(seq.is_empty());
    }

    #[test]
    fn validate_against_model() {
        let model = Model::builder(["begin", "A", "end"], 2)
            .unwrap()
            .build()
            .unwrap();

        assert!(ObservationSequence::from_pairs([(1, 1)])
            .validate_against(&model)
            .is_ok());

        let err = ObservationSequence::from_pairs([(1, 0), (3, 0)])
            .validate_against(&model)
            .unwrap_err();
        assert!(matches!(
            err,
            HmmError::StateOutOfRange {
                step: 1,
                state: 3,
                num_states: 3
            }
        ));

        let err = ObservationSequence::from_pairs([(1, 2)])
            .validate_against(&model)
            .unwrap_err();
        assert!(matches!(err, HmmError::SymbolOutOfRange { symbol: 2, .. }));
    }

    #[test]
    fn deserialize_checks_step_order() {
        let seq = ObservationSequence::from_pairs([(1, 0), (2, 1)]);
        let json = serde_json::to_string(&seq).unwrap();
        let back: ObservationSequence = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seq);

        let gap = r#"{"steps":[{"time":0,"state":1,"symbol":0},{"time":2,"state":1,"symbol":0}]}"#;
        let err = serde_json::from_str::<ObservationSequence>(gap).unwrap_err();
        assert!(err.to_string().contains("expected 1, got 2"), "{err}");
    }
}
