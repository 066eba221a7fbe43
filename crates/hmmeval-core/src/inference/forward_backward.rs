//! # Forward-Backward Probabilities
//!
//! Computes `alpha[t][s]`, the probability of the observations up to `t`
//! ending in state `s`, and `beta[t][s]`, the probability of the
//! observations after `t` given state `s` at `t`. Nothing is normalized:
//! long sequences underflow to zero and are reported as such.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::types::{Model, ObservationSequence, BEGIN_STATE};

/// Dense forward and backward tables, both `[seq_len][num_states]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForwardBackward {
    alpha: Vec<Vec<f64>>,
    beta: Vec<Vec<f64>>,
}

impl ForwardBackward {
    /// Number of time steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alpha.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alpha.is_empty()
    }

    #[must_use]
    pub fn alpha(&self) -> &[Vec<f64>] {
        &self.alpha
    }

    #[must_use]
    pub fn beta(&self) -> &[Vec<f64>] {
        &self.beta
    }

    /// `(alpha, beta)` for one cell.
    #[must_use]
    pub fn pair(&self, time: usize, state: usize) -> Option<(f64, f64)> {
        let alpha = *self.alpha.get(time)?.get(state)?;
        let beta = *self.beta.get(time)?.get(state)?;
        Some((alpha, beta))
    }

    /// The tables as `[time][state] -> (alpha, beta)`.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<Vec<(f64, f64)>> {
        self.alpha
            .iter()
            .zip(&self.beta)
            .map(|(a, b)| a.iter().copied().zip(b.iter().copied()).collect())
            .collect()
    }

    /// Per-step state maximizing `alpha * beta`.
    #[must_use]
    pub fn most_probable_states(&self) -> Vec<usize> {
        self.alpha
            .iter()
            .zip(&self.beta)
            .map(|(a, b)| first_max_index(a.iter().zip(b).map(|(x, y)| x * y)))
            .collect()
    }

    /// Raw likelihood of the whole observation sequence, `Σ_s alpha[T-1][s]`.
    #[must_use]
    pub fn sequence_likelihood(&self) -> f64 {
        self.alpha
            .last()
            .map(|row| row.iter().sum())
            .unwrap_or(0.0)
    }
}

/// Forward-backward engine over a borrowed model.
#[derive(Debug, Clone, Copy)]
pub struct ForwardBackwardEngine<'m> {
    model: &'m Model,
}

impl<'m> ForwardBackwardEngine<'m> {
    pub fn new(model: &'m Model) -> Self {
        Self { model }
    }

    pub fn compute(&self, observations: &ObservationSequence) -> Result<ForwardBackward> {
        observations.validate_against(self.model)?;
        if observations.is_empty() {
            return Ok(ForwardBackward::default());
        }

        debug!(
            seq_len = observations.len(),
            num_states = self.model.num_states(),
            "computing forward-backward tables"
        );

        let symbols = observations.symbols();
        Ok(ForwardBackward {
            alpha: self.forward(&symbols),
            beta: self.backward(&symbols),
        })
    }

    fn forward(&self, symbols: &[usize]) -> Vec<Vec<f64>> {
        let model = self.model;
        let num_states = model.num_states();
        let mut alpha = vec![vec![0.0; num_states]; symbols.len()];

        for (state, value) in alpha[0].iter_mut().enumerate() {
            *value = model.transition(BEGIN_STATE, state) * model.emission(state, symbols[0]);
        }

        for t in 1..symbols.len() {
            let (done, rest) = alpha.split_at_mut(t);
            let prev = &done[t - 1];
            for (curr_state, value) in rest[0].iter_mut().enumerate() {
                let mut incoming = 0.0;
                for (prev_state, &prev_alpha) in prev.iter().enumerate() {
                    incoming += prev_alpha * model.transition(prev_state, curr_state);
                }
                *value = incoming * model.emission(curr_state, symbols[t]);
            }
        }

        alpha
    }

    fn backward(&self, symbols: &[usize]) -> Vec<Vec<f64>> {
        let model = self.model;
        let num_states = model.num_states();
        let seq_len = symbols.len();
        let mut beta = vec![vec![0.0; num_states]; seq_len];

        // Explaining the empty suffix has probability 1.
        beta[seq_len - 1].fill(1.0);

        for t in (0..seq_len - 1).rev() {
            let next_symbol = symbols[t + 1];
            let (head, tail) = beta.split_at_mut(t + 1);
            let next = &tail[0];
            for (curr_state, value) in head[t].iter_mut().enumerate() {
                let mut outgoing = 0.0;
                for (next_state, &next_beta) in next.iter().enumerate() {
                    outgoing += model.transition(curr_state, next_state)
                        * model.emission(next_state, next_symbol)
                        * next_beta;
                }
                *value = outgoing;
            }
        }

        beta
    }
}

/// Index of the first maximal element; `0` when every value is zero.
fn first_max_index(values: impl Iterator<Item = f64>) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (idx, value) in values.enumerate() {
        if value > best_value {
            best_value = value;
            best = idx;
        }
    }
    best
}

/// Compute forward-backward tables for `observations` under `model`.
pub fn forward_backward(model: &Model, observations: &ObservationSequence) -> Result<ForwardBackward> {
    ForwardBackwardEngine::new(model).compute(observations)
}

/// Per-step state maximizing `alpha * beta`, from `[time][state]` pairs.
///
/// Ties, including an all-zero step, go to the lowest state index.
#[must_use]
pub fn most_probable_states_from_marginals(pairs: &[Vec<(f64, f64)>]) -> Vec<usize> {
    pairs
        .iter()
        .map(|step| first_max_index(step.iter().map(|&(alpha, beta)| alpha * beta)))
        .collect()
}
