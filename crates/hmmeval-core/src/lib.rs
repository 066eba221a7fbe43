//! # hmmeval Core
//!
//! Hidden-state estimation for discrete hidden Markov models. Provides
//! Viterbi decoding, forward-backward marginals and confusion-matrix scoring
//! of a predicted state sequence against ground-truth labels.
//!
//! ## Quick Start
//!
//! ```rust
//! use hmmeval_core::{decode, confusion_matrix, Model, ObservationSequence};
//!
//! let model: Model = "3 begin A end  2  3 begin A 1.0 A A 0.5 A end 0.5  1 A a 1.0"
//!     .parse()
//!     .unwrap();
//! let observations = ObservationSequence::from_pairs([(1, 0)]);
//!
//! let path = decode(&model, &observations).unwrap();
//! assert_eq!(path.states, vec![1]);
//!
//! let matrix = confusion_matrix(&observations, &path.states, model.num_states()).unwrap();
//! let estimations = matrix.estimations();
//! assert_eq!(estimations[1].true_positives, 1);
//! assert_eq!(estimations[1].f_measure, 1.0);
//! ```
pub mod error;
pub mod evaluate;
pub mod format;
pub mod inference;
pub mod scoring;
pub mod types;

// Re-export primary API
pub use error::{HmmError, Result};
pub use evaluate::{
    evaluate, Algorithm, AlgorithmReport, EvaluationConfig, EvaluationReport, Evaluator,
    SectionOutcome, StateEstimation,
};
pub use format::{load_model, load_observations, parse_model, parse_observations};
pub use inference::{
    decode, forward_backward, most_probable_states_from_marginals, ForwardBackward,
    ForwardBackwardEngine, PathStatus, ViterbiDecoder, ViterbiPath,
};
pub use scoring::{confusion_matrix, estimations, ConfusionMatrix};
pub use types::{Model, ModelBuilder, Observation, ObservationSequence, PredictionEstimation};
