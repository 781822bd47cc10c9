//! Progress aggregation: recording completions and building the skill chart.

mod service;
mod view_state;

pub use service::{Completion, ProgressService};
pub use view_state::ProgressViewState;
