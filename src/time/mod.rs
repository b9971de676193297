//! Time integration for the surface equation.
//!
//! - [`integrator`]: explicit integrator traits and forward Euler
//! - [`budget`]: per-unit sub-step budget
//! - [`marcher`]: outer loop, snapshots and observers

mod budget;
pub mod integrator;
mod marcher;

pub use budget::StabilityBudget;
pub use integrator::{ForwardEuler, Integrable, IntegratorInfo, TimeIntegrator};
pub use marcher::{
    MarchConfig, MarchObserver, MarchResult, Snapshot, SnapshotCallback, SubStepCallback,
    TimeMarcher,
};
