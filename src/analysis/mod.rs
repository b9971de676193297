//! Steady-state validation of a run.
//!
//! This module provides tools for:
//! - Evaluating the closed-form steady surface over a bedrock step
//! - Integrating ice volume with the trapezoidal rule
//! - Comparing numerical and analytical volumes and surfaces
//!
//! # Example
//!
//! ```
//! use sia_rs::analysis::VolumeComparison;
//!
//! let cmp = VolumeComparison::from_volumes(9.5e5, 1.0e6);
//! assert!((cmp.error_percent.unwrap() + 5.0).abs() < 1e-12);
//! ```

mod analytical;
mod volume;

pub use analytical::SteadyStateSolution;
pub use volume::{SurfaceMisfit, VolumeComparison, ice_volume, trapezoid};
