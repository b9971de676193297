//! Outer time loop of the SIA run.
//!
//! The run is split into outer units of `dt` (one year in the benchmark).
//! Each unit is traversed by as many stable sub-steps as it needs, drawn from
//! a [`StabilityBudget`] so the unit ends exactly on its boundary. Snapshots
//! of the surface are handed to a [`MarchObserver`] at a fixed unit interval.

use std::time::Instant;

use log::{debug, info};

use crate::error::{ConfigError, SolverError, StepContext};
use crate::solver::{DiffusionStepper, ProgressReporter, SubStep, SurfaceState};
use crate::time::StabilityBudget;

// =============================================================================
// March Configuration
// =============================================================================

/// Configuration of the outer time loop.
#[derive(Clone, Debug, PartialEq)]
pub struct MarchConfig {
    /// Outer unit duration (yr)
    pub dt: f64,
    /// Total simulated time (yr)
    pub t_total: f64,
    /// Capture a snapshot after every unit whose index is a multiple of this
    pub snapshot_interval: usize,
    /// Log progress and summaries at info level
    pub verbose: bool,
    /// Progress report spacing in percent (only when verbose)
    pub progress_interval_pct: u32,
}

impl Default for MarchConfig {
    fn default() -> Self {
        Self {
            dt: 1.0,
            t_total: 25_000.0,
            snapshot_interval: 1000,
            verbose: false,
            progress_interval_pct: 10,
        }
    }
}

impl MarchConfig {
    /// Set the outer unit duration.
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Set the total simulated time.
    pub fn with_t_total(mut self, t_total: f64) -> Self {
        self.t_total = t_total;
        self
    }

    /// Set the snapshot interval in outer units.
    pub fn with_snapshot_interval(mut self, interval: usize) -> Self {
        self.snapshot_interval = interval;
        self
    }

    /// Enable verbose output.
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Check all parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_positive("dt", self.dt)?;
        ConfigError::require_finite("t_total", self.t_total)?;
        if self.t_total < 0.0 {
            return Err(ConfigError::NonPositive {
                name: "t_total",
                value: self.t_total,
            });
        }
        if self.snapshot_interval == 0 {
            return Err(ConfigError::ZeroSnapshotInterval);
        }
        Ok(())
    }

    /// Number of outer units: units 0 through ceil(t_total / dt) inclusive.
    pub fn n_units(&self) -> usize {
        // Guard against t_total / dt landing a hair above an integer
        let ratio = self.t_total / self.dt;
        let last = (ratio - 1e-9 * ratio.abs().max(1.0)).ceil().max(0.0);
        last as usize + 1
    }

    /// Simulated time at the end of the run.
    pub fn end_time(&self) -> f64 {
        self.n_units() as f64 * self.dt
    }
}

// =============================================================================
// Snapshots and observers
// =============================================================================

/// Independent copy of the surface at the end of an outer unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// Outer unit that just completed
    pub unit: usize,
    /// Simulated time at the end of that unit
    pub time: f64,
    /// Surface elevation at every node
    pub surface: Vec<f64>,
}

/// Receives events from the time loop.
///
/// All hooks default to no-ops. Observers only read the surface; they cannot
/// stall or alter the run.
pub trait MarchObserver {
    /// Called after every accepted sub-step.
    fn on_substep(&mut self, _context: StepContext, _step: &SubStep, _surface: &SurfaceState) {}

    /// Called after every completed outer unit.
    fn on_unit(&mut self, _unit: usize, _time: f64, _surface: &SurfaceState) {}

    /// Called with each periodic snapshot.
    fn on_snapshot(&mut self, _snapshot: Snapshot) {}
}

impl MarchObserver for () {}

/// Collects every snapshot.
impl MarchObserver for Vec<Snapshot> {
    fn on_snapshot(&mut self, snapshot: Snapshot) {
        self.push(snapshot);
    }
}

/// Adapts a closure into a snapshot observer.
pub struct SnapshotCallback<F>(pub F);

impl<F: FnMut(Snapshot)> MarchObserver for SnapshotCallback<F> {
    fn on_snapshot(&mut self, snapshot: Snapshot) {
        (self.0)(snapshot);
    }
}

/// Adapts a closure into a sub-step observer.
pub struct SubStepCallback<F>(pub F);

impl<F: FnMut(StepContext, &SubStep, &SurfaceState)> MarchObserver for SubStepCallback<F> {
    fn on_substep(&mut self, context: StepContext, step: &SubStep, surface: &SurfaceState) {
        (self.0)(context, step, surface);
    }
}

// =============================================================================
// March Result
// =============================================================================

/// Statistics of a completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct MarchResult {
    /// Final simulated time reached
    pub final_time: f64,
    /// Outer units completed
    pub n_units: usize,
    /// Total number of sub-steps taken
    pub n_substeps: usize,
    /// Smallest sub-step used
    pub dt_min: f64,
    /// Largest sub-step used
    pub dt_max: f64,
    /// Most sub-steps needed by a single unit
    pub max_substeps_per_unit: usize,
    /// Total wall-clock time in seconds
    pub wall_time: f64,
}

// =============================================================================
// Time Marcher
// =============================================================================

/// Drives a [`DiffusionStepper`] through the whole run.
#[derive(Clone, Debug)]
pub struct TimeMarcher {
    stepper: DiffusionStepper,
    config: MarchConfig,
}

impl TimeMarcher {
    /// Create a marcher. The configuration is validated here.
    pub fn new(stepper: DiffusionStepper, config: MarchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { stepper, config })
    }

    /// Stepper reference.
    pub fn stepper(&self) -> &DiffusionStepper {
        &self.stepper
    }

    /// Configuration reference.
    pub fn config(&self) -> &MarchConfig {
        &self.config
    }

    /// Run the full march on `surface`.
    pub fn run(&self, surface: &mut SurfaceState) -> Result<MarchResult, SolverError> {
        self.run_with_observer(surface, &mut ())
    }

    /// Run the full march, passing each snapshot to `callback`.
    pub fn run_with_callback<F>(
        &self,
        surface: &mut SurfaceState,
        callback: F,
    ) -> Result<MarchResult, SolverError>
    where
        F: FnMut(Snapshot),
    {
        self.run_with_observer(surface, &mut SnapshotCallback(callback))
    }

    /// Run the full march with an observer.
    ///
    /// Aborts on the first failed sub-step. The surface is then left in the
    /// failing state and the error carries the unit, sub-step and time.
    pub fn run_with_observer<O>(
        &self,
        surface: &mut SurfaceState,
        observer: &mut O,
    ) -> Result<MarchResult, SolverError>
    where
        O: MarchObserver + ?Sized,
    {
        let start_wall = Instant::now();
        let dt = self.config.dt;
        let n_units = self.config.n_units();

        let mut progress =
            ProgressReporter::new(self.config.end_time(), self.config.progress_interval_pct);
        let mut n_substeps = 0;
        let mut dt_min_used = f64::INFINITY;
        let mut dt_max_used: f64 = 0.0;
        let mut max_substeps_per_unit = 0;
        let mut time = 0.0;

        if self.config.verbose {
            info!(
                "Starting march: {} units of {} yr on {} nodes (c_stab = {})",
                n_units,
                dt,
                self.stepper.grid().n_nodes(),
                self.stepper.c_stab()
            );
        }

        for unit in 0..n_units {
            let unit_start = unit as f64 * dt;
            let mut budget = StabilityBudget::new(dt);
            let mut unit_substeps = 0;

            while !budget.is_exhausted() {
                let context = StepContext {
                    unit,
                    substep: n_substeps,
                    time: unit_start + budget.elapsed(),
                };
                let step = self.stepper.advance(surface, &mut budget, context)?;

                dt_min_used = dt_min_used.min(step.dt_use);
                dt_max_used = dt_max_used.max(step.dt_use);
                n_substeps += 1;
                unit_substeps += 1;
                progress.step();

                observer.on_substep(context, &step, surface);
            }

            max_substeps_per_unit = max_substeps_per_unit.max(unit_substeps);
            time = (unit + 1) as f64 * dt;
            debug!("unit {} done in {} sub-steps", unit, unit_substeps);

            observer.on_unit(unit, time, surface);

            if unit % self.config.snapshot_interval == 0 {
                observer.on_snapshot(Snapshot {
                    unit,
                    time,
                    surface: surface.as_slice().to_vec(),
                });
            }

            if self.config.verbose {
                progress.maybe_report(time);
            }
        }

        let wall_time = start_wall.elapsed().as_secs_f64();

        if self.config.verbose {
            progress.finish(time);
            info!("  dt range: [{:.2e}, {:.2e}]", dt_min_used, dt_max_used);
            info!("  Max sub-steps per unit: {}", max_substeps_per_unit);
        }

        Ok(MarchResult {
            final_time: time,
            n_units,
            n_substeps,
            dt_min: dt_min_used,
            dt_max: dt_max_used,
            max_substeps_per_unit,
            wall_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::ShallowIce1D;
    use crate::mesh::{BedElevation, Grid1D};
    use crate::solver::C_STAB_BENCHMARK;
    use crate::source::{ConstantMassBalance, MassBalance1D};

    fn flat_marcher(rate: f64, config: MarchConfig) -> TimeMarcher {
        let grid = Grid1D::uniform(0.0, 2000.0, 500.0).unwrap();
        let bed = BedElevation::flat(5);
        let mb = MassBalance1D::from_model(&grid, &ConstantMassBalance::new(rate));
        let stepper =
            DiffusionStepper::new(grid, bed, mb, ShallowIce1D::benchmark(), C_STAB_BENCHMARK)
                .unwrap();
        TimeMarcher::new(stepper, config).unwrap()
    }

    #[test]
    fn test_n_units() {
        let config = MarchConfig::default();
        assert_eq!(config.n_units(), 25_001);
        assert_eq!(config.end_time(), 25_001.0);

        assert_eq!(MarchConfig::default().with_t_total(2.5).n_units(), 4);
        assert_eq!(MarchConfig::default().with_t_total(0.0).n_units(), 1);
        assert_eq!(
            MarchConfig::default().with_dt(0.1).with_t_total(0.3).n_units(),
            4
        );
    }

    #[test]
    fn test_config_validation() {
        assert!(MarchConfig::default().validate().is_ok());
        assert_eq!(
            MarchConfig::default().with_snapshot_interval(0).validate(),
            Err(ConfigError::ZeroSnapshotInterval)
        );
        assert!(matches!(
            MarchConfig::default().with_dt(0.0).validate(),
            Err(ConfigError::NonPositive { name: "dt", .. })
        ));
        assert!(matches!(
            MarchConfig::default().with_t_total(f64::NAN).validate(),
            Err(ConfigError::NonFinite { name: "t_total", .. })
        ));
    }

    #[test]
    fn test_snapshot_units() {
        let config = MarchConfig::default()
            .with_t_total(10.0)
            .with_snapshot_interval(5);
        let marcher = flat_marcher(0.1, config);
        let mut s = SurfaceState::new(5);

        let mut snapshots: Vec<Snapshot> = Vec::new();
        let result = marcher.run_with_observer(&mut s, &mut snapshots).unwrap();

        assert_eq!(result.n_units, 11);
        assert_eq!(result.final_time, 11.0);
        let units: Vec<usize> = snapshots.iter().map(|s| s.unit).collect();
        assert_eq!(units, vec![0, 5, 10]);
        assert_eq!(snapshots[0].time, 1.0);
        assert_eq!(snapshots[2].time, 11.0);
    }

    #[test]
    fn test_snapshots_are_independent() {
        let config = MarchConfig::default()
            .with_t_total(3.0)
            .with_snapshot_interval(1);
        let marcher = flat_marcher(1.0, config);
        let mut s = SurfaceState::new(5);

        let mut snapshots = Vec::new();
        marcher
            .run_with_callback(&mut s, |snap| snapshots.push(snap))
            .unwrap();

        // Uniform accumulation of 1 per unit on a flat bed
        assert_eq!(snapshots.len(), 4);
        for (k, snap) in snapshots.iter().enumerate() {
            for &v in &snap.surface {
                assert!((v - (k + 1) as f64).abs() < 1e-12, "unit {}: {}", k, v);
            }
        }
        assert_eq!(s.as_slice(), snapshots[3].surface.as_slice());
    }

    #[test]
    fn test_no_forcing_fixed_point() {
        let config = MarchConfig::default().with_t_total(20.0);
        let marcher = flat_marcher(0.0, config);
        let mut s = SurfaceState::new(5);

        let result = marcher.run(&mut s).unwrap();

        assert_eq!(s.as_slice(), &[0.0; 5]);
        // D ≡ 0 everywhere: every unit is one whole sub-step
        assert_eq!(result.n_substeps, 21);
        assert_eq!(result.max_substeps_per_unit, 1);
        assert_eq!(result.dt_min, 1.0);
        assert_eq!(result.dt_max, 1.0);
    }

    #[test]
    fn test_substep_sums_per_unit() {
        let config = MarchConfig::default().with_t_total(3.0);
        let grid = Grid1D::uniform(0.0, 2000.0, 500.0).unwrap();
        let bed = BedElevation::flat(5);
        let mb = MassBalance1D::zero(5);
        let stepper =
            DiffusionStepper::new(grid, bed, mb, ShallowIce1D::benchmark(), C_STAB_BENCHMARK)
                .unwrap();
        let marcher = TimeMarcher::new(stepper, config).unwrap();

        // Steep dome: many stability-limited sub-steps per unit
        let mut s = SurfaceState::from_values(vec![0.0, 300.0, 600.0, 300.0, 0.0]);
        let mut sums = vec![0.0; 4];
        let mut observer = SubStepCallback(|ctx: StepContext, step: &SubStep, _s: &SurfaceState| {
            sums[ctx.unit] += step.dt_use;
        });

        let result = marcher.run_with_observer(&mut s, &mut observer).unwrap();

        assert!(result.max_substeps_per_unit > 1);
        for (unit, sum) in sums.iter().enumerate() {
            assert!((sum - 1.0).abs() < 1e-12, "unit {} sums to {}", unit, sum);
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let grid = Grid1D::uniform(0.0, 1000.0, 500.0).unwrap();
        let stepper = DiffusionStepper::new(
            grid,
            BedElevation::flat(3),
            MassBalance1D::zero(3),
            ShallowIce1D::benchmark(),
            C_STAB_BENCHMARK,
        )
        .unwrap();

        let err = TimeMarcher::new(stepper, MarchConfig::default().with_snapshot_interval(0));
        assert_eq!(err.unwrap_err(), ConfigError::ZeroSnapshotInterval);
    }
}
