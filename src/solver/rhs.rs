//! Right-hand side of the surface equation.
//!
//! dS/dt = ṁ + (D⁺ (S[i+1] - S[i]) / dx - D⁻ (S[i] - S[i-1]) / dx) / dx
//!
//! with D⁺/D⁻ the forward/backward staggered diffusivities.

use crate::mesh::Grid1D;
use crate::solver::{StaggeredDiffusivity, SurfaceState};
use crate::source::MassBalance1D;

/// Flux divergence ∂/∂x (D ∂S/∂x) at every node.
pub fn flux_divergence(
    surface: &SurfaceState,
    diffusivity: &StaggeredDiffusivity,
    grid: &Grid1D,
) -> Vec<f64> {
    let s = surface.as_slice();
    let nb = &grid.neighbors;
    let dx = grid.dx;

    (0..s.len())
        .map(|i| {
            let kp = nb.forward(i);
            let km = nb.backward(i);
            let q_up = diffusivity.forward[i] * (s[kp] - s[i]) / dx;
            let q_dn = diffusivity.backward[i] * (s[i] - s[km]) / dx;
            (q_up - q_dn) / dx
        })
        .collect()
}

/// Surface tendency dS/dt = ṁ + div_q.
///
/// `diffusivity` must have been evaluated on the same `surface`.
pub fn compute_rhs_sia(
    surface: &SurfaceState,
    diffusivity: &StaggeredDiffusivity,
    mass_balance: &MassBalance1D,
    grid: &Grid1D,
) -> SurfaceState {
    let div_q = flux_divergence(surface, diffusivity, grid);
    let tendency = div_q
        .into_iter()
        .zip(mass_balance.as_slice())
        .map(|(d, &m)| m + d)
        .collect();
    SurfaceState::from_values(tendency)
}
