//! # Model Description Reader
//!
//! Token layout (whitespace separated, line breaks are not significant):
//!
//! ```text
//! <num_states> <state names...>
//! <alphabet_size>
//! <num_transitions> (<from> <to> <probability>)*
//! <num_emissions> (<state> <symbol> <probability>)*
//! ```
//!
//! The first state is the begin state and the last the end state. Symbols are
//! single lowercase letters. Probabilities not listed are zero.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::error::{HmmError, Result};
use crate::format::tokens::{symbol_index, TokenCursor, MAX_ALPHABET_SIZE};
use crate::types::{Model, ModelBuilder};

/// Parse a model description.
pub fn parse_model(input: &str) -> Result<Model> {
    let mut cursor = TokenCursor::new(input);

    let num_states: usize = cursor.parse_next("state count")?;
    if num_states < 2 {
        return Err(HmmError::TooFewStates { found: num_states });
    }
    let names = (0..num_states)
        .map(|_| cursor.next_token("state name"))
        .collect::<Result<Vec<_>>>()?;

    let alphabet_size: usize = cursor.parse_next("alphabet size")?;
    if alphabet_size > MAX_ALPHABET_SIZE {
        return Err(HmmError::AlphabetTooLarge {
            size: alphabet_size,
            max: MAX_ALPHABET_SIZE,
        });
    }
    let mut builder = ModelBuilder::new(names, alphabet_size)?;

    let num_transitions: usize = cursor.parse_next("transition count")?;
    for _ in 0..num_transitions {
        let from = cursor.next_token("transition source")?;
        let to = cursor.next_token("transition target")?;
        let probability: f64 = cursor.parse_next("transition probability")?;
        builder = builder.transition(from, to, probability)?;
    }

    let num_emissions: usize = cursor.parse_next("emission count")?;
    for _ in 0..num_emissions {
        let state = cursor.next_token("emission state")?;
        let symbol = symbol_index(cursor.next_token("emission symbol")?)?;
        let probability: f64 = cursor.parse_next("emission probability")?;
        builder = builder.emission(state, symbol, probability)?;
    }

    builder.build()
}

/// Read and parse a model description from any reader.
pub fn read_model<R: Read>(mut reader: R) -> Result<Model> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    parse_model(&input)
}

/// Read and parse a model description file.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Model> {
    parse_model(&fs::read_to_string(path)?)
}

impl FromStr for Model {
    type Err = HmmError;

    fn from_str(s: &str) -> Result<Self> {
        parse_model(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_STATE: &str = "3 begin A end
2
3
begin A 1.0
A A 0.5
A end 0.5
1
A a 1.0
";

    #[test]
    fn parses_three_state_model() {
        let model = parse_model(THREE_STATE).unwrap();
        let expected = Model::builder(["begin", "A", "end"], 2)
            .unwrap()
            .transition("begin", "A", 1.0)
            .unwrap()
            .transition("A", "A", 0.5)
            .unwrap()
            .transition("A", "end", 0.5)
            .unwrap()
            .emission("A", 0, 1.0)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(model, expected);
    }

    #[test]
    fn from_str_and_reader_agree() {
        let a: Model = THREE_STATE.parse().unwrap();
        let b = read_model(THREE_STATE.as_bytes()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_single_state() {
        let err = parse_model("1 only 1 0 0").unwrap_err();
        assert!(matches!(err, HmmError::TooFewStates { found: 1 }));
    }

    #[test]
    fn rejects_unknown_state_in_transition() {
        let err = parse_model("2 begin end 1 1 begin X 1.0 0").unwrap_err();
        assert!(matches!(err, HmmError::UnknownState(ref s) if s == "X"));
    }

    #[test]
    fn rejects_transition_from_end() {
        let err = parse_model("3 begin A end 1 1 end A 1.0 0").unwrap_err();
        assert!(matches!(err, HmmError::ForbiddenTransition { from: 2, .. }));
    }

    #[test]
    fn rejects_transition_to_begin() {
        let err = parse_model("3 begin A end 1 1 A begin 1.0 0").unwrap_err();
        assert!(matches!(err, HmmError::ForbiddenTransition { to: 0, .. }));
    }

    #[test]
    fn rejects_symbol_outside_alphabet() {
        let err = parse_model("3 begin A end 2 0 1 A c 1.0").unwrap_err();
        assert!(matches!(
            err,
            HmmError::SymbolOutOfRange {
                symbol: 2,
                alphabet_size: 2
            }
        ));
    }

    #[test]
    fn rejects_alphabet_beyond_letters() {
        let err = parse_model("2 begin end 18446744073709551615 0 0").unwrap_err();
        assert!(matches!(
            err,
            HmmError::AlphabetTooLarge {
                size: usize::MAX,
                max: MAX_ALPHABET_SIZE
            }
        ));

        let err = parse_model("2 begin end 27 0 0").unwrap_err();
        assert!(matches!(err, HmmError::AlphabetTooLarge { size: 27, .. }));
        assert!(parse_model("2 begin end 26 0 0").is_ok());
    }

    #[test]
    fn rejects_bad_symbol() {
        let err = parse_model("3 begin A end 2 0 1 A Q 1.0").unwrap_err();
        assert!(matches!(err, HmmError::InvalidSymbol(_)));
    }

    #[test]
    fn reports_truncated_input() {
        let err = parse_model("3 begin A end 2 1 begin A").unwrap_err();
        assert!(matches!(
            err,
            HmmError::UnexpectedEof {
                expected: "transition probability"
            }
        ));
    }

    #[test]
    fn reports_bad_probability() {
        let err = parse_model("3 begin A end 2 1 begin A high 0").unwrap_err();
        assert!(matches!(
            err,
            HmmError::InvalidToken {
                expected: "transition probability",
                ..
            }
        ));
    }

    #[test]
    fn rejects_negative_probability() {
        let err = parse_model("3 begin A end 2 1 begin A -0.5 0").unwrap_err();
        assert!(matches!(err, HmmError::InvalidProbability { .. }));
    }
}
