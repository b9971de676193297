//! Uniform 1D finite-difference grid.
//!
//! Nodes sit at `x_i = x_min + i * dx` for `i = 0..n_nodes`. Fluxes are
//! evaluated on the staggered points halfway between a node and its
//! neighbors, with neighbors taken from [`NeighborIndex`].

use crate::error::ConfigError;

/// Boundary face identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryFace {
    /// Left boundary (x = x_min)
    Left,
    /// Right boundary (x = x_max)
    Right,
}

/// Forward/backward neighbor of every node, clamped at the domain edges.
///
/// `forward(i) = min(i + 1, n - 1)` and `backward(i) = max(i - 1, 0)`.
/// At an edge the neighbor is the node itself, so the surface difference
/// across the outer flux point vanishes and no ice leaves the domain
/// (reflective, zero-flux boundary).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeighborIndex {
    forward: Vec<usize>,
    backward: Vec<usize>,
}

impl NeighborIndex {
    /// Build clamped neighbor tables for `n_nodes` nodes.
    ///
    /// Zero nodes give empty tables; one node is its own neighbor on both sides.
    pub fn clamped(n_nodes: usize) -> Self {
        let last = n_nodes.saturating_sub(1);
        let forward = (0..n_nodes).map(|i| (i + 1).min(last)).collect();
        let backward = (0..n_nodes).map(|i| i.saturating_sub(1)).collect();
        Self { forward, backward }
    }

    /// Number of nodes covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// True if built for an empty grid.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Forward (right) neighbor of node `i`.
    #[inline]
    pub fn forward(&self, i: usize) -> usize {
        self.forward[i]
    }

    /// Backward (left) neighbor of node `i`.
    #[inline]
    pub fn backward(&self, i: usize) -> usize {
        self.backward[i]
    }

    /// Forward neighbor table.
    pub fn forward_table(&self) -> &[usize] {
        &self.forward
    }

    /// Backward neighbor table.
    pub fn backward_table(&self) -> &[usize] {
        &self.backward
    }

    /// Which edge (if any) node `i` is clamped at.
    ///
    /// A single-node grid reports `Left`, since both neighbors clamp there.
    pub fn is_boundary(&self, i: usize) -> Option<BoundaryFace> {
        if self.backward[i] == i {
            Some(BoundaryFace::Left)
        } else if self.forward[i] == i {
            Some(BoundaryFace::Right)
        } else {
            None
        }
    }
}

/// Uniform 1D grid with its neighbor tables.
#[derive(Clone, Debug)]
pub struct Grid1D {
    /// Left endpoint of domain
    pub x_min: f64,
    /// Node spacing
    pub dx: f64,
    /// Node positions, strictly increasing
    pub positions: Vec<f64>,
    /// Clamped neighbor tables for the staggered flux points
    pub neighbors: NeighborIndex,
}

impl Grid1D {
    /// Relative tolerance used when counting how many steps of `dx` fit in the extent.
    const EXTENT_TOL: f64 = 1e-9;

    /// Grid covering `[x_min, x_min + extent]` inclusive with spacing `dx`.
    ///
    /// The node count is `floor(extent / dx) + 1`. The last node lands on the
    /// extent only when `dx` divides it.
    pub fn uniform(x_min: f64, extent: f64, dx: f64) -> Result<Self, ConfigError> {
        ConfigError::require_finite("x_min", x_min)?;
        ConfigError::require_positive("dx", dx)?;
        ConfigError::require_finite("extent", extent)?;
        if extent < 0.0 {
            return Err(ConfigError::NonPositive {
                name: "extent",
                value: extent,
            });
        }

        let n_nodes = (extent / dx + Self::EXTENT_TOL).floor() as usize + 1;
        let positions: Vec<f64> = (0..n_nodes).map(|i| x_min + i as f64 * dx).collect();

        Ok(Self {
            x_min,
            dx,
            positions,
            neighbors: NeighborIndex::clamped(n_nodes),
        })
    }

    /// Benchmark grid from 0 to `x_m * margin_factor` inclusive.
    ///
    /// With `x_m = 20 km`, `margin_factor = 1.5` and `dx = 500 m` this gives 61 nodes.
    pub fn for_margin(x_m: f64, margin_factor: f64, dx: f64) -> Result<Self, ConfigError> {
        ConfigError::require_positive("x_m", x_m)?;
        ConfigError::require_positive("margin_factor", margin_factor)?;
        Self::uniform(0.0, x_m * margin_factor, dx)
    }

    /// Number of nodes.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.positions.len()
    }

    /// Position of node `i`.
    #[inline]
    pub fn x(&self, i: usize) -> f64 {
        self.positions[i]
    }

    /// Right endpoint (position of the last node).
    pub fn x_max(&self) -> f64 {
        self.positions.last().copied().unwrap_or(self.x_min)
    }

    /// Length of the covered interval.
    pub fn length(&self) -> f64 {
        self.x_max() - self.x_min
    }

    /// Sample a function at every node.
    pub fn sample<F>(&self, f: F) -> Vec<f64>
    where
        F: Fn(f64) -> f64,
    {
        self.positions.iter().map(|&x| f(x)).collect()
    }
}
