pub mod confusion;
pub mod estimation;

pub use confusion::{confusion_matrix, ConfusionMatrix};
pub use estimation::estimations;
