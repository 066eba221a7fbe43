use thiserror::Error;

/// Errors that can occur while loading, decoding or scoring an HMM experiment.
#[derive(Debug, Error)]
pub enum HmmError {
    /// A model needs at least a begin and an end state.
    #[error("there must be at least two states (begin and end), found {found}")]
    TooFewStates {
        /// Number of states supplied.
        found: usize,
    },

    /// The same state name was declared twice.
    #[error("duplicate state name: {0:?}")]
    DuplicateState(String),

    /// A state name that the model does not declare.
    #[error("unknown state name: {0:?}")]
    UnknownState(String),

    /// A table does not have the dimensions the model requires.
    #[error("{table} has wrong dimensions: expected {expected}, got {found}")]
    DimensionMismatch {
        /// Which table or row was malformed.
        table: String,
        /// Expected length.
        expected: usize,
        /// Actual length.
        found: usize,
    },

    /// A transition leaves the end state or enters the begin state.
    #[error("transition {from} -> {to} is forbidden: {reason}")]
    ForbiddenTransition {
        /// Source state index.
        from: usize,
        /// Target state index.
        to: usize,
        /// Which structural rule was broken.
        reason: &'static str,
    },

    /// A probability that is negative, NaN or infinite.
    #[error("invalid probability {value} in {table}[{row}][{col}]")]
    InvalidProbability {
        /// Table holding the value.
        table: &'static str,
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// Offending value.
        value: f64,
    },

    /// An emission symbol that is not a single lowercase letter.
    #[error("symbol must be a single lowercase letter a-z, got {0:?}")]
    InvalidSymbol(String),

    /// An alphabet larger than the letters the text format can name.
    #[error("alphabet size {size} exceeds the {max} symbols a-z")]
    AlphabetTooLarge {
        /// Declared alphabet size.
        size: usize,
        /// Largest alphabet the format supports.
        max: usize,
    },

    /// A symbol index beyond the model alphabet.
    #[error("symbol index {symbol} is outside the alphabet of size {alphabet_size}")]
    SymbolOutOfRange {
        /// Symbol index.
        symbol: usize,
        /// Alphabet size of the model.
        alphabet_size: usize,
    },

    /// An observation refers to a state the model does not have.
    #[error("state index {state} at step {step} is outside the model's {num_states} states")]
    StateOutOfRange {
        /// Time step of the observation.
        step: usize,
        /// State index.
        state: usize,
        /// Number of model states.
        num_states: usize,
    },

    /// Observation time indices must run 0, 1, 2, ...
    #[error("observation step out of order: expected {expected}, got {found}")]
    StepOutOfOrder {
        /// Expected time index.
        expected: usize,
        /// Time index found.
        found: usize,
    },

    /// Experiment data with no observations.
    #[error("experiment data contains no observations")]
    EmptyExperiment,

    /// The text input ended before a required token.
    #[error("unexpected end of input while reading {expected}")]
    UnexpectedEof {
        /// What the reader was looking for.
        expected: &'static str,
    },

    /// A token could not be parsed as the expected kind of value.
    #[error("invalid {expected} at token {position}: {token:?}")]
    InvalidToken {
        /// The raw token.
        token: String,
        /// What the token should have been.
        expected: &'static str,
        /// Zero-based token position in the input.
        position: usize,
    },

    /// Predicted and true sequences have different lengths.
    #[error("predicted states ({predicted} steps) and observations ({actual} steps) must have the same size")]
    SizeMismatch {
        /// Length of the predicted sequence.
        predicted: usize,
        /// Length of the observation sequence.
        actual: usize,
    },

    /// A predicted or true state index outside `[0, num_states)` during scoring.
    #[error("{role} state index {index} out of bounds [0, {num_states}) at step {step}")]
    IndexOutOfRange {
        /// `"predicted"` or `"actual"`.
        role: &'static str,
        /// Offending index.
        index: usize,
        /// Time step.
        step: usize,
        /// Number of states.
        num_states: usize,
    },

    /// A confusion matrix that is not square.
    #[error("confusion matrix must be square: row {row} has {cols} columns, expected {rows}")]
    NonSquareMatrix {
        /// Number of rows.
        rows: usize,
        /// First row whose length differs.
        row: usize,
        /// Length of that row.
        cols: usize,
    },

    /// A confusion matrix without any rows.
    #[error("confusion matrix is empty")]
    EmptyMatrix,

    /// Reading model or experiment input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for hmmeval operations.
pub type Result<T> = std::result::Result<T, HmmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = HmmError::SizeMismatch {
            predicted: 3,
            actual: 4,
        };
        assert_eq!(
            err.to_string(),
            "predicted states (3 steps) and observations (4 steps) must have the same size"
        );

        let err = HmmError::UnknownState("Z".into());
        assert!(err.to_string().contains("\"Z\""));

        let err = HmmError::IndexOutOfRange {
            role: "predicted",
            index: 7,
            step: 2,
            num_states: 3,
        };
        assert_eq!(
            err.to_string(),
            "predicted state index 7 out of bounds [0, 3) at step 2"
        );
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: HmmError = io.into();
        assert!(matches!(err, HmmError::Io(_)));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HmmError>();
    }
}
