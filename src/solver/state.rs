//! Ice surface storage for 1D problems.

use crate::mesh::BedElevation;
use crate::time::Integrable;

/// Ice surface elevation S at every grid node.
///
/// The only field that changes during a run. The stepper keeps it at or
/// above the bed after every sub-step. The same type also holds surface
/// tendencies (dS/dt) returned by the RHS evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceState {
    data: Vec<f64>,
}

impl SurfaceState {
    /// Zero surface on `n_nodes` nodes.
    pub fn new(n_nodes: usize) -> Self {
        Self {
            data: vec![0.0; n_nodes],
        }
    }

    /// Surface from explicit nodal values.
    pub fn from_values(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// Ice-free start: surface equal to the bed (zero thickness).
    pub fn ice_free(bed: &BedElevation) -> Self {
        Self {
            data: bed.as_slice().to_vec(),
        }
    }

    /// Surface at node `i`.
    #[inline]
    pub fn get(&self, i: usize) -> f64 {
        self.data[i]
    }

    /// All nodal values.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable nodal values.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consume into the raw vector.
    pub fn into_inner(self) -> Vec<f64> {
        self.data
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Ice thickness H = S - B.
    pub fn thickness(&self, bed: &BedElevation) -> Vec<f64> {
        debug_assert_eq!(self.data.len(), bed.len());
        self.data
            .iter()
            .zip(bed.as_slice())
            .map(|(&s, &b)| s - b)
            .collect()
    }

    /// Raise every node below the bed up to the bed.
    ///
    /// Mass removed below the bed is discarded, not redistributed.
    /// Returns the number of nodes that were clipped.
    pub fn clip_to_bed(&mut self, bed: &BedElevation) -> usize {
        let mut n_clipped = 0;
        for (s, &b) in self.data.iter_mut().zip(bed.as_slice()) {
            if *s < b {
                *s = b;
                n_clipped += 1;
            }
        }
        n_clipped
    }

    /// First node holding NaN or infinity, with its value.
    pub fn first_non_finite(&self) -> Option<(usize, f64)> {
        self.data
            .iter()
            .copied()
            .enumerate()
            .find(|(_, v)| !v.is_finite())
    }

    /// First node whose surface lies below the bed, as (node, surface, bed).
    pub fn first_below_bed(&self, bed: &BedElevation) -> Option<(usize, f64, f64)> {
        self.data
            .iter()
            .zip(bed.as_slice())
            .enumerate()
            .find(|(_, (s, b))| *s < *b)
            .map(|(i, (&s, &b))| (i, s, b))
    }

    /// Maximum surface elevation.
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

impl Integrable for SurfaceState {
    fn scale(&mut self, c: f64) {
        for v in &mut self.data {
            *v *= c;
        }
    }

    fn axpy(&mut self, c: f64, other: &Self) {
        assert_eq!(self.data.len(), other.data.len());
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += c * *b;
        }
    }
}
