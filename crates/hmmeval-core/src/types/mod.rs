pub mod estimation;
pub mod model;
pub mod observation;

pub use estimation::PredictionEstimation;
pub use model::{Model, ModelBuilder, BEGIN_STATE};
pub use observation::{Observation, ObservationSequence};
