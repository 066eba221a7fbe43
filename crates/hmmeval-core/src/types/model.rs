use std::collections::HashMap;
use std::ops::Range;

use crate::error::{HmmError, Result};

/// Index of the begin state in every model.
pub const BEGIN_STATE: usize = 0;

/// A discrete hidden Markov model with explicit begin and end states.
///
/// State 0 is the begin state and state `num_states() - 1` the end state.
/// Construction rejects any model with a transition out of the end state or
/// into the begin state, so the inference code can rely on both rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    state_names: Vec<String>,
    state_index: HashMap<String, usize>,
    alphabet_size: usize,
    transition: Vec<Vec<f64>>,
    emission: Vec<Vec<f64>>,
}

impl Model {
    /// Build a model from dense probability tables.
    ///
    /// # Arguments
    /// * `state_names` - State names in index order, begin first and end last
    /// * `alphabet_size` - Number of distinct emission symbols
    /// * `transition` - `[num_states][num_states]` transition probabilities
    /// * `emission` - `[num_states][alphabet_size]` emission probabilities
    pub fn new(
        state_names: Vec<String>,
        alphabet_size: usize,
        transition: Vec<Vec<f64>>,
        emission: Vec<Vec<f64>>,
    ) -> Result<Self> {
        let state_index = index_state_names(&state_names)?;
        let num_states = state_names.len();

        check_table("transition", &transition, num_states, num_states)?;
        check_table("emission", &emission, num_states, alphabet_size)?;

        let end = num_states - 1;
        if let Some(to) = transition[end].iter().position(|&p| p != 0.0) {
            return Err(HmmError::ForbiddenTransition {
                from: end,
                to,
                reason: "the end state has no outgoing transitions",
            });
        }
        if let Some(from) = transition.iter().position(|row| row[BEGIN_STATE] != 0.0) {
            return Err(HmmError::ForbiddenTransition {
                from,
                to: BEGIN_STATE,
                reason: "the begin state has no incoming transitions",
            });
        }

        Ok(Self {
            state_names,
            state_index,
            alphabet_size,
            transition,
            emission,
        })
    }

    /// Start building a model by state name.
    pub fn builder<I, S>(state_names: I, alphabet_size: usize) -> Result<ModelBuilder>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ModelBuilder::new(state_names, alphabet_size)
    }

    /// Number of states, including begin and end.
    #[must_use]
    pub fn num_states(&self) -> usize {
        self.state_names.len()
    }

    #[must_use]
    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// Index of the end state.
    #[must_use]
    pub fn end_state(&self) -> usize {
        self.state_names.len() - 1
    }

    /// States strictly between begin and end.
    #[must_use]
    pub fn intermediate_states(&self) -> Range<usize> {
        1..self.end_state()
    }

    #[must_use]
    pub fn has_intermediate_states(&self) -> bool {
        self.num_states() > 2
    }

    #[must_use]
    pub fn state_names(&self) -> &[String] {
        &self.state_names
    }

    #[must_use]
    pub fn state_name(&self, index: usize) -> Option<&str> {
        self.state_names.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn state_index(&self, name: &str) -> Option<usize> {
        self.state_index.get(name).copied()
    }

    /// P(transition `from` -> `to`).
    #[inline]
    #[must_use]
    pub fn transition(&self, from: usize, to: usize) -> f64 {
        self.transition[from][to]
    }

    /// P(emit `symbol` | `state`).
    #[inline]
    #[must_use]
    pub fn emission(&self, state: usize, symbol: usize) -> f64 {
        self.emission[state][symbol]
    }

    #[must_use]
    pub fn transition_matrix(&self) -> &[Vec<f64>] {
        &self.transition
    }

    #[must_use]
    pub fn emission_matrix(&self) -> &[Vec<f64>] {
        &self.emission
    }
}

fn index_state_names(state_names: &[String]) -> Result<HashMap<String, usize>> {
    if state_names.len() < 2 {
        return Err(HmmError::TooFewStates {
            found: state_names.len(),
        });
    }
    let mut index = HashMap::with_capacity(state_names.len());
    for (i, name) in state_names.iter().enumerate() {
        if index.insert(name.clone(), i).is_some() {
            return Err(HmmError::DuplicateState(name.clone()));
        }
    }
    Ok(index)
}

fn check_table(table: &'static str, rows: &[Vec<f64>], num_rows: usize, num_cols: usize) -> Result<()> {
    if rows.len() != num_rows {
        return Err(HmmError::DimensionMismatch {
            table: format!("{table} matrix"),
            expected: num_rows,
            found: rows.len(),
        });
    }
    for (row, values) in rows.iter().enumerate() {
        if values.len() != num_cols {
            return Err(HmmError::DimensionMismatch {
                table: format!("{table} row {row}"),
                expected: num_cols,
                found: values.len(),
            });
        }
        for (col, &value) in values.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(HmmError::InvalidProbability {
                    table,
                    row,
                    col,
                    value,
                });
            }
        }
    }
    Ok(())
}

/// Name-based model construction, used by the text parser and by tests.
///
/// Every probability not set explicitly is zero.
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    state_names: Vec<String>,
    state_index: HashMap<String, usize>,
    alphabet_size: usize,
    transition: Vec<Vec<f64>>,
    emission: Vec<Vec<f64>>,
}

impl ModelBuilder {
    /// Declare the states (begin first, end last) and the alphabet size.
    pub fn new<I, S>(state_names: I, alphabet_size: usize) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let state_names: Vec<String> = state_names.into_iter().map(Into::into).collect();
        let state_index = index_state_names(&state_names)?;
        let n = state_names.len();
        Ok(Self {
            state_names,
            state_index,
            alphabet_size,
            transition: vec![vec![0.0; n]; n],
            emission: vec![vec![0.0; alphabet_size]; n],
        })
    }

    fn lookup(&self, name: &str) -> Result<usize> {
        self.state_index
            .get(name)
            .copied()
            .ok_or_else(|| HmmError::UnknownState(name.to_string()))
    }

    /// Set P(`from` -> `to`).
    ///
    /// Any transition out of the end state or into the begin state is
    /// rejected, even with probability zero.
    pub fn transition(mut self, from: &str, to: &str, probability: f64) -> Result<Self> {
        let from_idx = self.lookup(from)?;
        let to_idx = self.lookup(to)?;
        if from_idx + 1 == self.state_names.len() {
            return Err(HmmError::ForbiddenTransition {
                from: from_idx,
                to: to_idx,
                reason: "the end state has no outgoing transitions",
            });
        }
        if to_idx == BEGIN_STATE {
            return Err(HmmError::ForbiddenTransition {
                from: from_idx,
                to: to_idx,
                reason: "the begin state has no incoming transitions",
            });
        }
        self.transition[from_idx][to_idx] = probability;
        Ok(self)
    }

    /// Set P(emit `symbol` | `state`).
    pub fn emission(mut self, state: &str, symbol: usize, probability: f64) -> Result<Self> {
        let state_idx = self.lookup(state)?;
        if symbol >= self.alphabet_size {
            return Err(HmmError::SymbolOutOfRange {
                symbol,
                alphabet_size: self.alphabet_size,
            });
        }
        self.emission[state_idx][symbol] = probability;
        Ok(self)
    }

    pub fn build(self) -> Result<Model> {
        Model::new(
            self.state_names,
            self.alphabet_size,
            self.transition,
            self.emission,
        )
    }
}
