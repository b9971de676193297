//! Bedrock elevation over a 1D grid.
//!
//! The bed B(x) is fixed for the whole run. Ice thickness is H = S - B,
//! where S is the ice surface elevation.

use crate::mesh::Grid1D;

/// Nodal bed elevation.
#[derive(Clone, Debug, PartialEq)]
pub struct BedElevation {
    data: Vec<f64>,
}

impl BedElevation {
    /// Flat bed (B = 0 everywhere).
    pub fn flat(n_nodes: usize) -> Self {
        Self {
            data: vec![0.0; n_nodes],
        }
    }

    /// Bed from explicit nodal values.
    pub fn from_values(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// Evaluate a bed profile B(x) at every grid node.
    pub fn from_function<F>(grid: &Grid1D, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self {
            data: grid.sample(f),
        }
    }

    /// Benchmark step bed: `b_0` left of `x_s`, zero elsewhere.
    pub fn step(grid: &Grid1D, x_s: f64, b_0: f64) -> Self {
        Self::from_function(grid, |x| if x < x_s { b_0 } else { 0.0 })
    }

    /// Bed elevation at node `i`.
    #[inline]
    pub fn get(&self, i: usize) -> f64 {
        self.data[i]
    }

    /// All nodal values.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True for an empty bed.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Highest bed point.
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Lowest bed point.
    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_bed() {
        let grid = Grid1D::for_margin(20_000.0, 1.5, 500.0).unwrap();
        let bed = BedElevation::step(&grid, 7000.0, 250.0);

        assert_eq!(bed.len(), grid.n_nodes());
        // Nodes 0..=13 are at x < 7000
        for i in 0..14 {
            assert_eq!(bed.get(i), 250.0);
        }
        // x = 7000 itself is on the low side
        assert_eq!(bed.get(14), 0.0);
        assert_eq!(bed.get(60), 0.0);
        assert_eq!(bed.max(), 250.0);
        assert_eq!(bed.min(), 0.0);
    }

    #[test]
    fn test_flat_and_sampled() {
        let bed = BedElevation::flat(5);
        assert!(bed.as_slice().iter().all(|&b| b == 0.0));

        let grid = Grid1D::uniform(0.0, 2000.0, 500.0).unwrap();
        let bed = BedElevation::from_function(&grid, |x| 100.0 - x / 20.0);
        assert_eq!(bed.as_slice(), &[100.0, 75.0, 50.0, 25.0, 0.0]);
    }
}
