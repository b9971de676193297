//! One stable explicit sub-step of the SIA surface equation.
//!
//! Per sub-step:
//! 1. Staggered diffusivities from the current surface
//! 2. Stable step dt_stab = c_stab dx² / max|D| (infinite if D ≡ 0)
//! 3. dt_use = min(dt_stab, remaining budget of the outer unit)
//! 4. Forward Euler update S += (ṁ + div_q) dt_use
//! 5. Bed clip S = max(S, B)

use log::trace;

use crate::equations::ShallowIce1D;
use crate::error::{ConfigError, SolverError, StepContext};
use crate::mesh::{BedElevation, Grid1D};
use crate::solver::{StaggeredDiffusivity, SurfaceState, compute_rhs_sia};
use crate::source::MassBalance1D;
use crate::time::{ForwardEuler, StabilityBudget, TimeIntegrator};

/// Stability coefficient of the bedrock-step benchmark.
pub const C_STAB_BENCHMARK: f64 = 0.165;

/// Outcome of one sub-step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubStep {
    /// Step actually taken (<= remaining budget)
    pub dt_use: f64,
    /// Stability limit at the start of the sub-step (may be infinite)
    pub dt_stab: f64,
    /// Largest |D| at the start of the sub-step
    pub max_diffusivity: f64,
    /// Nodes raised back to the bed by the clip
    pub n_clipped: usize,
}

impl SubStep {
    /// True if the stability limit, not the remaining budget, set the step.
    pub fn is_stability_limited(&self) -> bool {
        self.dt_use == self.dt_stab
    }
}

/// Explicit diffusion stepper for the surface equation.
///
/// Holds everything that is fixed for the run: grid, bed, mass balance,
/// flow law and stability coefficient. The surface itself is passed in on
/// every call and owned by the caller.
#[derive(Clone, Debug)]
pub struct DiffusionStepper {
    grid: Grid1D,
    bed: BedElevation,
    mass_balance: MassBalance1D,
    law: ShallowIce1D,
    c_stab: f64,
}

impl DiffusionStepper {
    /// Create a stepper. Field lengths must match the grid.
    pub fn new(
        grid: Grid1D,
        bed: BedElevation,
        mass_balance: MassBalance1D,
        law: ShallowIce1D,
        c_stab: f64,
    ) -> Result<Self, ConfigError> {
        if !(c_stab > 0.0 && c_stab <= 0.5) {
            return Err(ConfigError::InvalidStabilityCoefficient(c_stab));
        }
        ConfigError::require_len("bed", grid.n_nodes(), bed.len())?;
        ConfigError::require_len("mass balance", grid.n_nodes(), mass_balance.len())?;

        Ok(Self {
            grid,
            bed,
            mass_balance,
            law,
            c_stab,
        })
    }

    /// Grid reference.
    pub fn grid(&self) -> &Grid1D {
        &self.grid
    }

    /// Bed reference.
    pub fn bed(&self) -> &BedElevation {
        &self.bed
    }

    /// Mass balance reference.
    pub fn mass_balance(&self) -> &MassBalance1D {
        &self.mass_balance
    }

    /// Flow law reference.
    pub fn law(&self) -> &ShallowIce1D {
        &self.law
    }

    /// Stability coefficient.
    pub fn c_stab(&self) -> f64 {
        self.c_stab
    }

    /// Staggered diffusivities of a surface.
    pub fn diffusivity(&self, surface: &SurfaceState) -> StaggeredDiffusivity {
        StaggeredDiffusivity::compute(surface, &self.bed, &self.grid, &self.law)
    }

    /// Largest stable step for a surface, ignoring any budget.
    pub fn stable_dt(&self, surface: &SurfaceState) -> f64 {
        self.diffusivity(surface).stable_dt(self.c_stab, self.grid.dx)
    }

    /// Advance `surface` by one stable sub-step drawn from `budget`.
    ///
    /// The step taken is consumed from the budget. A surface whose length
    /// differs from the grid is rejected before anything is evaluated. On
    /// success the surface is at or above the bed at every node. On a later
    /// error the surface is left in its partially updated state and must not
    /// be used further.
    pub fn advance(
        &self,
        surface: &mut SurfaceState,
        budget: &mut StabilityBudget,
        context: StepContext,
    ) -> Result<SubStep, SolverError> {
        if surface.len() != self.grid.n_nodes() {
            return Err(SolverError::SurfaceLengthMismatch {
                context,
                expected: self.grid.n_nodes(),
                found: surface.len(),
            });
        }

        let diffusivity = self.diffusivity(surface);
        if let Some((node, value)) = diffusivity.first_non_finite() {
            return Err(SolverError::NonFiniteDiffusivity {
                context,
                node,
                value,
            });
        }

        let max_diffusivity = diffusivity.max_abs();
        let dt_stab = diffusivity.stable_dt(self.c_stab, self.grid.dx);
        let remaining = budget.remaining();
        if !(remaining > 0.0 && remaining.is_finite()) {
            return Err(SolverError::StalledSubStep {
                context,
                dt: remaining,
            });
        }
        if !(dt_stab > 0.0) {
            return Err(SolverError::StalledSubStep {
                context,
                dt: dt_stab,
            });
        }
        let dt_use = budget.consume(dt_stab);

        ForwardEuler.step(surface, dt_use, context.time, |s, _t| {
            compute_rhs_sia(s, &diffusivity, &self.mass_balance, &self.grid)
        });

        // f64::max would silently replace NaN with the bed, so check first
        if let Some((node, value)) = surface.first_non_finite() {
            return Err(SolverError::NonFiniteSurface {
                context,
                node,
                value,
            });
        }

        let n_clipped = surface.clip_to_bed(&self.bed);

        if let Some((node, s, b)) = surface.first_below_bed(&self.bed) {
            return Err(SolverError::BedFloorViolation {
                context,
                node,
                surface: s,
                bed: b,
            });
        }

        trace!(
            "unit {} sub-step {}: dt_use = {:.6}, dt_stab = {:.6e}, D_max = {:.4e}",
            context.unit, context.substep, dt_use, dt_stab, max_diffusivity
        );

        Ok(SubStep {
            dt_use,
            dt_stab,
            max_diffusivity,
            n_clipped,
        })
    }
}
