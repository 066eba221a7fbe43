//! # Evaluation Pipeline
//!
//! Runs the configured decoding algorithms over one experiment, scores each
//! prediction against the true states and collects a per-algorithm report.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::inference::{decode, forward_backward, PathStatus};
use crate::scoring::ConfusionMatrix;
use crate::types::{Model, ObservationSequence, PredictionEstimation};

/// A state-sequence estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Single most probable path.
    Viterbi,
    /// Per-step most probable state from forward-backward marginals.
    ForwardBackward,
}

impl Algorithm {
    /// Every algorithm, in report order.
    pub const ALL: [Algorithm; 2] = [Algorithm::Viterbi, Algorithm::ForwardBackward];

    /// Heading used in text reports.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Viterbi => "Viterbi algorithm",
            Self::ForwardBackward => "Forward-backward algorithm",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Viterbi => write!(f, "viterbi"),
            Self::ForwardBackward => write!(f, "forward-backward"),
        }
    }
}

/// Configuration for the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationConfig {
    /// Algorithms to run, in report order.
    pub algorithms: Vec<Algorithm>,
    /// Whether the begin and end states appear in the report.
    pub include_boundary_states: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            algorithms: Algorithm::ALL.to_vec(),
            include_boundary_states: false,
        }
    }
}

impl EvaluationConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list of algorithms to run.
    pub fn with_algorithms<I: IntoIterator<Item = Algorithm>>(mut self, algorithms: I) -> Self {
        self.algorithms = algorithms.into_iter().collect();
        self
    }

    /// Include or hide the begin and end states.
    pub fn with_boundary_states(mut self, include: bool) -> Self {
        self.include_boundary_states = include;
        self
    }
}

/// Estimation for one named state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEstimation {
    pub index: usize,
    pub name: String,
    #[serde(flatten)]
    pub estimation: PredictionEstimation,
}

/// What happened to one algorithm's section of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum SectionOutcome {
    Scored {
        predicted: Vec<usize>,
        confusion: ConfusionMatrix,
        states: Vec<StateEstimation>,
    },
    /// The prediction could not be scored, e.g. Viterbi found no full path.
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmReport {
    pub algorithm: Algorithm,
    pub outcome: SectionOutcome,
}

impl AlgorithmReport {
    /// Estimations shown for this algorithm; empty if skipped.
    #[must_use]
    pub fn states(&self) -> &[StateEstimation] {
        match &self.outcome {
            SectionOutcome::Scored { states, .. } => states,
            SectionOutcome::Skipped { .. } => &[],
        }
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, SectionOutcome::Skipped { .. })
    }
}

impl fmt::Display for AlgorithmReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} state prediction estimations:", self.algorithm.title())?;
        match &self.outcome {
            SectionOutcome::Scored { states, .. } => {
                for state in states {
                    writeln!(f, "State {} => {}", state.name, state.estimation)?;
                }
            }
            SectionOutcome::Skipped { reason } => writeln!(f, "Skipped: {reason}")?,
        }
        Ok(())
    }
}

/// Reports for every configured algorithm, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub sections: Vec<AlgorithmReport>,
}

impl EvaluationReport {
    #[must_use]
    pub fn section(&self, algorithm: Algorithm) -> Option<&AlgorithmReport> {
        self.sections.iter().find(|s| s.algorithm == algorithm)
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{section}")?;
        }
        Ok(())
    }
}

/// Runs decoding and scoring for one model and experiment.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvaluationConfig,
}

impl Evaluator {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Decode with every configured algorithm and score the results.
    ///
    /// Errors only when the observations do not fit the model. An incomplete
    /// Viterbi path is reported as a skipped section.
    pub fn evaluate(
        &self,
        model: &Model,
        observations: &ObservationSequence,
    ) -> Result<EvaluationReport> {
        observations.validate_against(model)?;

        if !model.has_intermediate_states() && !self.config.include_boundary_states {
            warn!("model has no states besides begin and end; the report will be empty");
        }

        let sections = self
            .config
            .algorithms
            .iter()
            .map(|&algorithm| self.run(algorithm, model, observations))
            .collect::<Result<Vec<_>>>()?;

        Ok(EvaluationReport { sections })
    }

    fn run(
        &self,
        algorithm: Algorithm,
        model: &Model,
        observations: &ObservationSequence,
    ) -> Result<AlgorithmReport> {
        let predicted = match algorithm {
            Algorithm::Viterbi => {
                let path = decode(model, observations)?;
                if let Some(reason) = incomplete_reason(path.status, observations.len()) {
                    warn!(%algorithm, %reason, "skipping estimations");
                    return Ok(AlgorithmReport {
                        algorithm,
                        outcome: SectionOutcome::Skipped { reason },
                    });
                }
                path.into_states()
            }
            Algorithm::ForwardBackward => {
                forward_backward(model, observations)?.most_probable_states()
            }
        };

        let confusion = ConfusionMatrix::build(observations, &predicted, model.num_states())?;
        let estimations = confusion.estimations();

        let shown = if self.config.include_boundary_states {
            0..model.num_states()
        } else {
            model.intermediate_states()
        };
        let states = shown
            .map(|index| StateEstimation {
                index,
                name: model.state_name(index).unwrap_or_default().to_string(),
                estimation: estimations[index],
            })
            .collect();

        Ok(AlgorithmReport {
            algorithm,
            outcome: SectionOutcome::Scored {
                predicted,
                confusion,
                states,
            },
        })
    }
}

fn incomplete_reason(status: PathStatus, steps: usize) -> Option<String> {
    match status {
        PathStatus::Complete => None,
        PathStatus::NoViablePath => Some(format!(
            "no state path has positive probability over {steps} steps"
        )),
        PathStatus::Truncated { from_step } => Some(format!(
            "path covers only steps {from_step}..{steps} of {steps}"
        )),
    }
}

/// Evaluate with the default configuration.
pub fn evaluate(model: &Model, observations: &ObservationSequence) -> Result<EvaluationReport> {
    Evaluator::default().evaluate(model, observations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_state() -> Model {
        Model::builder(["begin", "A", "end"], 2)
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
            .unwrap()
    }

    #[test]
    fn config_builder() {
        let config = EvaluationConfig::new()
            .with_algorithms([Algorithm::ForwardBackward])
            .with_boundary_states(true);
        assert_eq!(config.algorithms, vec![Algorithm::ForwardBackward]);
        assert!(config.include_boundary_states);

        let default = EvaluationConfig::default();
        assert_eq!(default.algorithms, Algorithm::ALL.to_vec());
        assert!(!default.include_boundary_states);
    }

    #[test]
    fn default_report_hides_boundary_states() {
        let model = three_state();
        let obs = ObservationSequence::from_pairs([(1, 0)]);
        let report = evaluate(&model, &obs).unwrap();

        assert_eq!(report.sections.len(), 2);
        for section in &report.sections {
            let states = section.states();
            assert_eq!(states.len(), 1);
            assert_eq!(states[0].name, "A");
            assert_eq!(states[0].estimation.true_positives, 1);
            assert_eq!(states[0].estimation.f_measure, 1.0);
        }
    }

    #[test]
    fn boundary_states_on_request() {
        let model = three_state();
        let obs = ObservationSequence::from_pairs([(1, 0)]);
        let report = Evaluator::new(EvaluationConfig::new().with_boundary_states(true))
            .evaluate(&model, &obs)
            .unwrap();
        let names: Vec<_> = report.sections[0]
            .states()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, ["begin", "A", "end"]);
    }

    #[test]
    fn dead_end_skips_viterbi_only() {
        let model = three_state();
        let obs = ObservationSequence::from_pairs([(1, 0), (1, 1)]);
        let report = evaluate(&model, &obs).unwrap();

        assert!(report.section(Algorithm::Viterbi).unwrap().is_skipped());
        let fb = report.section(Algorithm::ForwardBackward).unwrap();
        assert!(!fb.is_skipped());
        // Every marginal is zero, so both steps are predicted as begin.
        assert_eq!(fb.states()[0].estimation.false_negatives, 2);
    }

    #[test]
    fn text_report_layout() {
        let model = three_state();
        let obs = ObservationSequence::from_pairs([(1, 0)]);
        let report = Evaluator::new(EvaluationConfig::new().with_algorithms([Algorithm::Viterbi]))
            .evaluate(&model, &obs)
            .unwrap();
        assert_eq!(
            report.to_string(),
            "Viterbi algorithm state prediction estimations:\n\
             State A => True Positives=1, False Positives=0, True Negatives=0, False Negatives=0, f-measure=1.0000\n"
        );
    }

    #[test]
    fn rejects_observations_outside_model() {
        let model = three_state();
        let obs = ObservationSequence::from_pairs([(7, 0)]);
        assert!(evaluate(&model, &obs).is_err());
    }

    #[test]
    fn algorithm_display() {
        assert_eq!(Algorithm::Viterbi.to_string(), "viterbi");
        assert_eq!(Algorithm::ForwardBackward.to_string(), "forward-backward");
    }
}
