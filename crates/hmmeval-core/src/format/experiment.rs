//! Experiment data reader: `<num_steps> (<step> <state name> <symbol>)*`.

use std::fs;
use std::io::Read;
use std::path::Path;

use crate::error::{HmmError, Result};
use crate::format::tokens::{symbol_index, TokenCursor};
use crate::types::{Model, Observation, ObservationSequence};

/// Parse experiment data, resolving state names and symbols against `model`.
///
/// Steps must be numbered 0, 1, 2, ... and there must be at least one.
pub fn parse_observations(input: &str, model: &Model) -> Result<ObservationSequence> {
    let mut cursor = TokenCursor::new(input);

    let num_steps: usize = cursor.parse_next("step count")?;
    if num_steps == 0 {
        return Err(HmmError::EmptyExperiment);
    }

    // The declared count is untrusted; let the vector grow with the tokens read.
    let mut steps = Vec::new();
    for expected in 0..num_steps {
        let time: usize = cursor.parse_next("step number")?;
        if time != expected {
            return Err(HmmError::StepOutOfOrder {
                expected,
                found: time,
            });
        }

        let name = cursor.next_token("state name")?;
        let state = model
            .state_index(name)
            .ok_or_else(|| HmmError::UnknownState(name.to_string()))?;

        let symbol = symbol_index(cursor.next_token("symbol")?)?;
        if symbol >= model.alphabet_size() {
            return Err(HmmError::SymbolOutOfRange {
                symbol,
                alphabet_size: model.alphabet_size(),
            });
        }

        steps.push(Observation::new(time, state, symbol));
    }

    ObservationSequence::new(steps)
}

/// Read and parse experiment data from any reader.
pub fn read_observations<R: Read>(mut reader: R, model: &Model) -> Result<ObservationSequence> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    parse_observations(&input, model)
}

/// Read and parse an experiment data file.
pub fn load_observations<P: AsRef<Path>>(path: P, model: &Model) -> Result<ObservationSequence> {
    parse_observations(&fs::read_to_string(path)?, model)
}
