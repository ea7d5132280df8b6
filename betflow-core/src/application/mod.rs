// betflow-core/src/application/mod.rs

pub mod clean;
pub mod compile;
pub mod seeds;
pub mod testing;

// The CLI only needs: `use betflow_core::application::{compile_project, run_tests, ...};`
pub use clean::clean_project;
pub use compile::{CompileOutput, compile_project};
pub use seeds::load_seeds;
pub use testing::{RunResults, RunSummary, TestOutcome, TestResult, run_tests, write_run_results};
