//! Benchmark runner.
//!
//! Builds the grid, bed and forcing from a [`BenchmarkConfig`], marches the
//! surface from an ice-free start, and compares the result against the
//! analytical steady state.

use std::fmt;

use log::{debug, info};

use crate::analysis::{SteadyStateSolution, SurfaceMisfit, VolumeComparison};
use crate::equations::ShallowIce1D;
use crate::error::{SiaError, StepContext};
use crate::mesh::{BedElevation, Grid1D};
use crate::simulation::BenchmarkConfig;
use crate::solver::{DiagnosticsTracker, DiffusionStepper, SiaDiagnostics, SubStep, SurfaceState};
use crate::source::{MassBalance1D, PolynomialAccumulation};
use crate::time::{MarchObserver, MarchResult, Snapshot, TimeMarcher};

// =============================================================================
// Benchmark Report
// =============================================================================

/// Final scalars of a benchmark run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BenchmarkReport {
    /// Numerical and analytical volumes
    pub volumes: VolumeComparison,
    /// Pointwise surface misfit against the analytical solution
    pub misfit: SurfaceMisfit,
    /// Simulated time at the end of the run
    pub final_time: f64,
}

impl BenchmarkReport {
    /// Relative volume error in percent.
    pub fn vol_err_percent(&self) -> Option<f64> {
        self.volumes.error_percent
    }
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.volumes)
    }
}

// =============================================================================
// Benchmark Result
// =============================================================================

/// Everything a run produces, for reporting and plotting.
#[derive(Clone, Debug)]
pub struct BenchmarkResult {
    /// Grid the run used
    pub grid: Grid1D,
    /// Bed elevation
    pub bed: BedElevation,
    /// Final numerical surface
    pub surface: SurfaceState,
    /// Analytical steady surface on the same grid
    pub analytical: Vec<f64>,
    /// Periodic snapshots, oldest first
    pub snapshots: Vec<Snapshot>,
    /// Time loop statistics
    pub march: MarchResult,
    /// Diagnostics tracked over the snapshots
    pub diagnostics: DiagnosticsTracker,
    /// Volume comparison
    pub report: BenchmarkReport,
}

// =============================================================================
// Benchmark
// =============================================================================

/// The bedrock-step benchmark, ready to run.
#[derive(Clone, Debug)]
pub struct Benchmark {
    config: BenchmarkConfig,
    marcher: TimeMarcher,
    steady_state: SteadyStateSolution,
}

impl Benchmark {
    /// Validate the configuration and build the problem.
    pub fn new(config: BenchmarkConfig) -> Result<Self, SiaError> {
        config.validate()?;

        let law = config.flow_law()?;
        let grid = Grid1D::for_margin(config.x_m, config.margin_factor, config.dx)?;
        let bed = BedElevation::step(&grid, config.x_s, config.b_0());
        let accumulation = PolynomialAccumulation::new(config.mdot_0, config.n, config.x_m)?;
        let mass_balance = MassBalance1D::from_model(&grid, &accumulation);

        let steady_state =
            SteadyStateSolution::new(&law, config.mdot_0, config.x_m, config.x_s, config.b_0())?;

        let stepper = DiffusionStepper::new(grid, bed, mass_balance, law, config.c_stab)?;
        let marcher = TimeMarcher::new(stepper, config.march_config())?;

        Ok(Self {
            config,
            marcher,
            steady_state,
        })
    }

    /// Configuration reference.
    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Grid reference.
    pub fn grid(&self) -> &Grid1D {
        self.marcher.stepper().grid()
    }

    /// Bed reference.
    pub fn bed(&self) -> &BedElevation {
        self.marcher.stepper().bed()
    }

    /// Analytical steady state.
    pub fn steady_state(&self) -> &SteadyStateSolution {
        &self.steady_state
    }

    /// Run from an ice-free start.
    pub fn run(&self) -> Result<BenchmarkResult, SiaError> {
        self.run_with_observer(&mut ())
    }

    /// Run from an ice-free start, forwarding time-loop events to `observer`.
    ///
    /// Snapshots are collected into the result regardless of the observer.
    pub fn run_with_observer<O>(&self, observer: &mut O) -> Result<BenchmarkResult, SiaError>
    where
        O: MarchObserver + ?Sized,
    {
        let grid = self.grid();
        let bed = self.bed();
        let law = self.marcher.stepper().law();

        if self.config.verbose {
            info!(
                "Bedrock-step benchmark: {} nodes, dx = {} m, step {} m at x = {} m",
                grid.n_nodes(),
                grid.dx,
                self.config.b_0(),
                self.config.x_s
            );
        }

        let mut surface = SurfaceState::ice_free(bed);
        let mut recorder = Recorder {
            grid,
            bed,
            law,
            snapshots: Vec::new(),
            tracker: DiagnosticsTracker::new(),
            inner: observer,
        };
        let march = self.marcher.run_with_observer(&mut surface, &mut recorder)?;
        let Recorder {
            snapshots, tracker, ..
        } = recorder;

        let analytical = self.steady_state.surface(grid);
        let report = BenchmarkReport {
            volumes: VolumeComparison::compute(surface.as_slice(), &analytical, bed, grid),
            misfit: SurfaceMisfit::compute(surface.as_slice(), &analytical),
            final_time: march.final_time,
        };

        if self.config.verbose {
            tracker.log_summary();
            for line in report.to_string().lines() {
                info!("{}", line);
            }
        }

        Ok(BenchmarkResult {
            grid: grid.clone(),
            bed: bed.clone(),
            surface,
            analytical,
            snapshots,
            march,
            diagnostics: tracker,
            report,
        })
    }
}

/// Collects snapshots and diagnostics, then forwards every event.
struct Recorder<'a, O: ?Sized> {
    grid: &'a Grid1D,
    bed: &'a BedElevation,
    law: &'a ShallowIce1D,
    snapshots: Vec<Snapshot>,
    tracker: DiagnosticsTracker,
    inner: &'a mut O,
}

impl<O: MarchObserver + ?Sized> MarchObserver for Recorder<'_, O> {
    fn on_substep(&mut self, context: StepContext, step: &SubStep, surface: &SurfaceState) {
        self.inner.on_substep(context, step, surface);
    }

    fn on_unit(&mut self, unit: usize, time: f64, surface: &SurfaceState) {
        self.inner.on_unit(unit, time, surface);
    }

    fn on_snapshot(&mut self, snapshot: Snapshot) {
        let surface = SurfaceState::from_values(snapshot.surface.clone());
        let diag = SiaDiagnostics::compute(&surface, self.bed, self.grid, self.law);
        debug!("snapshot at unit {}: {}", snapshot.unit, diag.summary_line());
        self.tracker.update(snapshot.time, diag);

        self.snapshots.push(snapshot.clone());
        self.inner.on_snapshot(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_config() -> BenchmarkConfig {
        BenchmarkConfig::default()
            .with_t_total(50.0)
            .with_snapshot_interval(10)
    }

    #[test]
    fn test_reference_setup() {
        let bench = Benchmark::new(BenchmarkConfig::default()).unwrap();

        // x from 0 to 30 km inclusive at 500 m
        assert_eq!(bench.grid().n_nodes(), 61);
        assert_eq!(bench.bed().get(0), 250.0);
        assert_eq!(bench.bed().get(13), 250.0);
        assert_eq!(bench.bed().get(14), 0.0);
    }

    #[test]
    fn test_invalid_config_fails_before_stepping() {
        let err = Benchmark::new(BenchmarkConfig::default().with_dx(0.0)).unwrap_err();
        assert!(matches!(err, SiaError::Config(_)));
    }

    #[test]
    fn test_short_run() {
        let bench = Benchmark::new(short_config()).unwrap();
        let result = bench.run().unwrap();

        assert_eq!(result.march.n_units, 51);
        assert_eq!(result.snapshots.len(), 6);
        assert_eq!(result.diagnostics.n_updates, 6);
        assert_eq!(result.analytical.len(), 61);

        // Bed floor and margin: no ice beyond x_m after a short run
        for (i, (&s, &b)) in result
            .surface
            .as_slice()
            .iter()
            .zip(result.bed.as_slice())
            .enumerate()
        {
            assert!(s >= b, "node {} below bed", i);
            if result.grid.x(i) > 20_000.0 {
                assert_eq!(s, b, "ice beyond the margin at node {}", i);
            }
        }

        // Ice is still far from steady state
        let err = result.report.vol_err_percent().unwrap();
        assert!(err < -50.0, "unexpected volume error {}", err);
    }

    #[test]
    fn test_observer_sees_snapshots() {
        let bench = Benchmark::new(short_config()).unwrap();
        let mut seen: Vec<Snapshot> = Vec::new();
        let result = bench.run_with_observer(&mut seen).unwrap();

        assert_eq!(seen, result.snapshots);
    }

    #[test]
    fn test_zero_forcing_has_undefined_error() {
        let config = short_config().with_mdot_0(0.0);
        let result = Benchmark::new(config).unwrap().run().unwrap();

        assert_eq!(result.surface.as_slice(), result.bed.as_slice());
        assert_eq!(result.report.volumes.vol_exact, 0.0);
        assert_eq!(result.report.volumes.vol_numeric, 0.0);
        assert_eq!(result.report.vol_err_percent(), None);
        assert!(result.report.to_string().ends_with("err M2 undefined (zero exact volume)"));
    }

    #[test]
    fn test_report_format() {
        let report = BenchmarkReport {
            volumes: VolumeComparison::from_volumes(4.5e6, 5.0e6),
            misfit: SurfaceMisfit::compute(&[0.0], &[0.0]),
            final_time: 25_001.0,
        };
        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "vol exact: 5.000000e6");
        assert_eq!(lines[1], "vol M2: 4.500000e6");
        assert_eq!(lines[2], "err M2 -10.000");
    }
}
