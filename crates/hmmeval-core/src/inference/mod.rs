pub mod forward_backward;
pub mod viterbi;

pub use forward_backward::{
    forward_backward, most_probable_states_from_marginals, ForwardBackward, ForwardBackwardEngine,
};
pub use viterbi::{decode, PathStatus, ViterbiDecoder, ViterbiPath};
