//! # Viterbi Decoding for HMMs
//!
//! Finds the single most probable hidden-state path for an observation
//! sequence. Probabilities are raw products (no log space, no rescaling),
//! so very long sequences can underflow to zero; that surfaces as a
//! [`PathStatus::NoViablePath`] result rather than an error.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::types::{Model, ObservationSequence, BEGIN_STATE};

/// How completely the decoder could recover a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathStatus {
    /// One state for every observation.
    Complete,
    /// Every state at the last step had zero probability; the path is empty.
    NoViablePath,
    /// Backtracking hit an undefined predecessor. The path covers steps
    /// `from_step..len` only.
    Truncated {
        /// First time step present in the path.
        from_step: usize,
    },
}

/// Output of [`ViterbiDecoder::decode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViterbiPath {
    /// Decoded state indices, time 0 first.
    pub states: Vec<usize>,
    /// Probability of the best path (`0.0` when none exists).
    pub probability: f64,
    /// Whether `states` covers every step.
    pub status: PathStatus,
}

impl ViterbiPath {
    fn empty(status: PathStatus) -> Self {
        Self {
            states: Vec::new(),
            probability: 0.0,
            status,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == PathStatus::Complete
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[must_use]
    pub fn into_states(self) -> Vec<usize> {
        self.states
    }
}

/// Best path probability and backpointer for one (time, state) cell.
#[derive(Debug, Clone, Copy)]
struct PathState {
    probability: f64,
    prev_state: Option<usize>,
}

impl PathState {
    const DEAD: Self = Self {
        probability: 0.0,
        prev_state: None,
    };
}

/// Viterbi decoder over a borrowed model.
#[derive(Debug, Clone, Copy)]
pub struct ViterbiDecoder<'m> {
    model: &'m Model,
}

impl<'m> ViterbiDecoder<'m> {
    pub fn new(model: &'m Model) -> Self {
        Self { model }
    }

    /// Decode the most probable state sequence.
    ///
    /// Returns an error only when an observation does not fit the model.
    /// A missing or broken path is reported through [`ViterbiPath::status`].
    pub fn decode(&self, observations: &ObservationSequence) -> Result<ViterbiPath> {
        observations.validate_against(self.model)?;

        let seq_len = observations.len();
        if seq_len == 0 {
            return Ok(ViterbiPath::empty(PathStatus::Complete));
        }

        let dp = self.fill_table(observations);

        let last = &dp[seq_len - 1];
        let Some(best_final) = first_max_positive(last.iter().map(|cell| cell.probability)) else {
            warn!(
                steps = seq_len,
                "no probable last state in Viterbi decoding: every final probability is zero"
            );
            return Ok(ViterbiPath::empty(PathStatus::NoViablePath));
        };

        let (states, truncated_at) = backtrack(&dp, best_final);
        let status = match truncated_at {
            None => PathStatus::Complete,
            Some(step) => {
                warn!(
                    step,
                    "undefined predecessor during Viterbi backtracking, returning partial path"
                );
                PathStatus::Truncated { from_step: step }
            }
        };

        Ok(ViterbiPath {
            states,
            probability: last[best_final].probability,
            status,
        })
    }

    /// Forward pass: fill the `[seq_len][num_states]` table.
    fn fill_table(&self, observations: &ObservationSequence) -> Vec<Vec<PathState>> {
        let model = self.model;
        let num_states = model.num_states();
        let seq_len = observations.len();
        debug!(seq_len, num_states, "filling Viterbi table");

        let mut dp = vec![vec![PathState::DEAD; num_states]; seq_len];

        // At t = 0 the predecessor is always the begin state.
        let first_symbol = observations.as_slice()[0].symbol;
        for (state, cell) in dp[0].iter_mut().enumerate() {
            cell.probability =
                model.transition(BEGIN_STATE, state) * model.emission(state, first_symbol);
            cell.prev_state = Some(BEGIN_STATE);
        }

        for (pos, obs) in observations.iter().enumerate().skip(1) {
            let (done, rest) = dp.split_at_mut(pos);
            let prev = &done[pos - 1];
            let current = &mut rest[0];

            for (curr_state, cell) in current.iter_mut().enumerate() {
                let emit = model.emission(curr_state, obs.symbol);
                let mut best_probability = 0.0;
                let mut best_prev = None;

                for (prev_state, prev_cell) in prev.iter().enumerate() {
                    let probability =
                        prev_cell.probability * model.transition(prev_state, curr_state) * emit;
                    if probability > best_probability {
                        best_probability = probability;
                        best_prev = Some(prev_state);
                    }
                }

                cell.probability = best_probability;
                cell.prev_state = best_prev;
            }
        }

        dp
    }
}

/// Index of the first strictly positive maximum, scanning from index 0.
fn first_max_positive(values: impl Iterator<Item = f64>) -> Option<usize> {
    let mut best = None;
    let mut best_value = 0.0;
    for (idx, value) in values.enumerate() {
        if value > best_value {
            best_value = value;
            best = Some(idx);
        }
    }
    best
}

/// Walk backpointers from `last_state` at the final step.
///
/// Returns the chronological path and, if an undefined backpointer cut the
/// walk short, the first step the path still covers.
fn backtrack(dp: &[Vec<PathState>], last_state: usize) -> (Vec<usize>, Option<usize>) {
    let mut path = Vec::with_capacity(dp.len());
    let mut curr_state = last_state;
    let mut truncated_at = None;

    path.push(curr_state);
    for pos in (1..dp.len()).rev() {
        match dp[pos][curr_state].prev_state {
            Some(prev) => {
                curr_state = prev;
                path.push(curr_state);
            }
            None => {
                truncated_at = Some(pos);
                break;
            }
        }
    }

    path.reverse();
    (path, truncated_at)
}

/// Decode `observations` under `model`.
pub fn decode(model: &Model, observations: &ObservationSequence) -> Result<ViterbiPath> {
    ViterbiDecoder::new(model).decode(observations)
}
