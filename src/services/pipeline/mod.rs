pub mod fingerprint;
pub mod orchestrator;

pub use orchestrator::{debug_ingredient, run_mapping, RunOptions, RunSummary};
