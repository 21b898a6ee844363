//! Console progress and structured run output.

pub mod progress;

mod summary;

pub use summary::{FailureEntry, RunSummary, emit_summary};
