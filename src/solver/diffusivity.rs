//! Nonlinear diffusivity at the staggered flux points.
//!
//! Each node i has two flux points: forward (between i and i+1) and backward
//! (between i-1 and i). At both, thickness is the arithmetic mean of the
//! two adjacent nodes, and the slope is the one-sided difference between them.

use crate::equations::ShallowIce1D;
use crate::mesh::{BedElevation, Grid1D};
use crate::solver::SurfaceState;

/// Diffusivities on the forward and backward flux points of every node.
#[derive(Clone, Debug, PartialEq)]
pub struct StaggeredDiffusivity {
    /// D at the flux point between node i and its forward neighbor
    pub forward: Vec<f64>,
    /// D at the flux point between node i and its backward neighbor
    pub backward: Vec<f64>,
}

impl StaggeredDiffusivity {
    /// Evaluate D = Γ H^(n+2) |∂S/∂x|^(n-1) on both flux points of every node.
    pub fn compute(
        surface: &SurfaceState,
        bed: &BedElevation,
        grid: &Grid1D,
        law: &ShallowIce1D,
    ) -> Self {
        let s = surface.as_slice();
        let h = surface.thickness(bed);
        let nb = &grid.neighbors;
        let dx = grid.dx;

        let n = s.len();
        let mut forward = Vec::with_capacity(n);
        let mut backward = Vec::with_capacity(n);

        for i in 0..n {
            let kp = nb.forward(i);
            let km = nb.backward(i);

            let h_up = 0.5 * (h[kp] + h[i]);
            let h_dn = 0.5 * (h[i] + h[km]);

            forward.push(law.diffusivity(h_up, s[kp] - s[i], dx));
            backward.push(law.diffusivity(h_dn, s[i] - s[km], dx));
        }

        Self { forward, backward }
    }

    /// Largest |D| over both flux point sets.
    ///
    /// NaN propagates, so a corrupted field is not mistaken for a small one.
    pub fn max_abs(&self) -> f64 {
        self.forward
            .iter()
            .chain(self.backward.iter())
            .fold(0.0_f64, |acc, &d| {
                if d.is_nan() || acc.is_nan() {
                    f64::NAN
                } else {
                    acc.max(d.abs())
                }
            })
    }

    /// First node with a non-finite diffusivity on either flux point.
    pub fn first_non_finite(&self) -> Option<(usize, f64)> {
        self.forward
            .iter()
            .zip(self.backward.iter())
            .enumerate()
            .find_map(|(i, (&f, &b))| {
                if !f.is_finite() {
                    Some((i, f))
                } else if !b.is_finite() {
                    Some((i, b))
                } else {
                    None
                }
            })
    }

    /// Largest stable explicit step, c_stab * dx² / max|D|.
    ///
    /// Returns infinity when every diffusivity is zero (flat or ice-free
    /// surface). The caller then takes the whole remaining budget.
    pub fn stable_dt(&self, c_stab: f64, dx: f64) -> f64 {
        let d_max = self.max_abs();
        if d_max > 0.0 {
            c_stab * dx * dx / d_max
        } else {
            f64::INFINITY
        }
    }
}
