//! Mesh representation.
//!
//! Provides the 1D grid and the fields defined on it:
//! - Uniform node grid with clamped neighbor indices
//! - Bedrock elevation sampled from a profile

mod bedrock;
mod grid;

pub use bedrock::BedElevation;
pub use grid::{BoundaryFace, Grid1D, NeighborIndex};
