//! Use cases (application services)

pub mod beam_search;
pub mod consensus;
pub mod logging_oracle;
pub mod run_benchmark;
pub mod scoring;
pub mod verify;
