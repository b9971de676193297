//! High-level benchmark orchestration.
//!
//! Ties grid, bed, forcing, stepper and time loop together into a complete
//! run with an analytical comparison at the end.

mod config;
mod runner;

pub use config::BenchmarkConfig;
pub use runner::{Benchmark, BenchmarkReport, BenchmarkResult};
