// Crossfade progress estimation
// Synthetic 0-100 loading percentage from elapsed time vs. a host estimate.

mod estimator;

pub use estimator::{ProgressEstimator, COMPLETE_THRESHOLD};
