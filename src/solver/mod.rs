//! SIA solver components.
//!
//! # Submodules
//!
//! - [`state`]: Ice surface container
//! - [`diffusivity`]: Nonlinear diffusivity on the staggered flux points
//! - [`rhs`]: Surface tendency (flux divergence plus mass balance)
//! - [`stepper`]: One stable explicit sub-step with bed clipping
//! - [`diagnostics`]: Run diagnostics and progress reporting

pub mod diagnostics;
pub mod diffusivity;
pub mod rhs;
pub mod state;
pub mod stepper;

pub use diagnostics::{DiagnosticsTracker, ProgressReporter, SiaDiagnostics, format_duration};
pub use diffusivity::StaggeredDiffusivity;
pub use rhs::{compute_rhs_sia, flux_divergence};
pub use state::SurfaceState;
pub use stepper::{C_STAB_BENCHMARK, DiffusionStepper, SubStep};
