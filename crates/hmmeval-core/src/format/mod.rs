//! Text formats for model descriptions and experiment data.

pub mod experiment;
pub mod model;
mod tokens;

pub use experiment::{load_observations, parse_observations, read_observations};
pub use model::{load_model, parse_model, read_model};
pub use tokens::{symbol_index, MAX_ALPHABET_SIZE};
