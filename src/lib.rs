//! # sia-rs
//!
//! Explicit finite-difference Shallow Ice Approximation over a bedrock step.
//!
//! This crate provides the building blocks of the benchmark:
//! - Uniform 1D grid with clamped (zero-flux) neighbors
//! - Stepped bedrock and polynomial mass balance
//! - Nonlinear SIA diffusivity on staggered flux points
//! - Stability-limited sub-stepping with a bed floor
//! - Outer time loop with periodic snapshots
//! - Analytical steady state and volume error report
//!
//! # Example
//!
//! ```no_run
//! use sia_rs::{Benchmark, BenchmarkConfig};
//!
//! let result = Benchmark::new(BenchmarkConfig::default())?.run()?;
//! println!("{}", result.report);
//! # Ok::<(), sia_rs::SiaError>(())
//! ```

pub mod analysis;
pub mod equations;
pub mod error;
pub mod io;
pub mod mesh;
pub mod simulation;
pub mod solver;
pub mod source;
pub mod time;

// Re-export main types for convenience
pub use analysis::{SteadyStateSolution, SurfaceMisfit, VolumeComparison, ice_volume, trapezoid};
pub use equations::ShallowIce1D;
pub use error::{ConfigError, SiaError, SolverError, StepContext};
pub use mesh::{BedElevation, Grid1D};
pub use simulation::{Benchmark, BenchmarkConfig, BenchmarkReport, BenchmarkResult};
pub use solver::{
    C_STAB_BENCHMARK, DiagnosticsTracker, DiffusionStepper, ProgressReporter, SiaDiagnostics,
    StaggeredDiffusivity, SubStep, SurfaceState, compute_rhs_sia,
};
pub use source::{MassBalance1D, MassBalanceModel, PolynomialAccumulation};
pub use time::{
    MarchConfig, MarchObserver, MarchResult, Snapshot, StabilityBudget, TimeMarcher,
};

// I/O types
pub use io::{ProfileFileError, read_profile_file, write_profile, write_profile_series};
