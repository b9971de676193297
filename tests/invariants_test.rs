//! Invariants of the explicit scheme that must hold at every sub-step.

use sia_rs::error::StepContext;
use sia_rs::mesh::{BedElevation, Grid1D};
use sia_rs::solver::{C_STAB_BENCHMARK, DiffusionStepper, SubStep, SurfaceState};
use sia_rs::source::{ConstantMassBalance, MassBalance1D, PolynomialAccumulation};
use sia_rs::time::{MarchConfig, MarchObserver, TimeMarcher};
use sia_rs::{Benchmark, BenchmarkConfig, ShallowIce1D, SolverError};

/// Checks the bed floor and the per-unit budget after every sub-step.
struct InvariantChecker {
    bed: Vec<f64>,
    unit_sums: Vec<f64>,
    max_overshoot: f64,
    n_substeps: usize,
}

impl InvariantChecker {
    fn new(bed: &BedElevation) -> Self {
        Self {
            bed: bed.as_slice().to_vec(),
            unit_sums: Vec::new(),
            max_overshoot: 0.0,
            n_substeps: 0,
        }
    }
}

impl MarchObserver for InvariantChecker {
    fn on_substep(&mut self, context: StepContext, step: &SubStep, surface: &SurfaceState) {
        for (i, (&s, &b)) in surface.as_slice().iter().zip(&self.bed).enumerate() {
            assert!(s >= b, "surface {} below bed {} at node {} ({})", s, b, i, context);
        }

        if self.unit_sums.len() <= context.unit {
            self.unit_sums.resize(context.unit + 1, 0.0);
        }
        self.unit_sums[context.unit] += step.dt_use;
        self.max_overshoot = self.max_overshoot.max(self.unit_sums[context.unit] - 1.0);
        // The final sub-step of a unit may absorb a residue of at most 1e-12
        assert!(
            step.dt_use <= step.dt_stab + 1e-12,
            "dt_use exceeds stability limit ({})",
            context
        );
        self.n_substeps += 1;
    }
}

#[test]
fn test_invariants_during_benchmark_spinup() {
    let config = BenchmarkConfig::default().with_t_total(3000.0);
    let bench = Benchmark::new(config).unwrap();

    let mut checker = InvariantChecker::new(bench.bed());
    let result = bench.run_with_observer(&mut checker).unwrap();

    assert_eq!(checker.n_substeps, result.march.n_substeps);
    assert_eq!(checker.unit_sums.len(), 3001);
    for (unit, &sum) in checker.unit_sums.iter().enumerate() {
        assert!((sum - 1.0).abs() < 1e-12, "unit {} sums to {}", unit, sum);
    }
    assert!(checker.max_overshoot < 1e-12);
    assert!(
        result.march.max_substeps_per_unit > 1,
        "Expected stability-limited units once the sheet has grown"
    );
}

#[test]
fn test_no_forcing_fixed_point() {
    let grid = Grid1D::for_margin(20_000.0, 1.5, 500.0).unwrap();
    let bed = BedElevation::step(&grid, 7000.0, 250.0);
    let mb = MassBalance1D::from_model(&grid, &ConstantMassBalance::zero());
    let stepper =
        DiffusionStepper::new(grid, bed, mb, ShallowIce1D::benchmark(), C_STAB_BENCHMARK).unwrap();
    let marcher = TimeMarcher::new(stepper, MarchConfig::default().with_t_total(500.0)).unwrap();

    let mut surface = SurfaceState::ice_free(marcher.stepper().bed());
    let initial = surface.clone();
    let result = marcher.run(&mut surface).unwrap();

    assert_eq!(surface, initial);
    assert_eq!(result.n_substeps, result.n_units);
}

#[test]
fn test_tiny_grids() {
    for extent in [0.0, 500.0] {
        let grid = Grid1D::uniform(0.0, extent, 500.0).unwrap();
        let n = grid.n_nodes();
        let bed = BedElevation::flat(n);
        let mb = MassBalance1D::from_model(&grid, &ConstantMassBalance::new(0.5));
        let stepper =
            DiffusionStepper::new(grid, bed, mb, ShallowIce1D::benchmark(), C_STAB_BENCHMARK)
                .unwrap();
        let marcher = TimeMarcher::new(stepper, MarchConfig::default().with_t_total(10.0)).unwrap();

        let mut surface = SurfaceState::new(n);
        marcher.run(&mut surface).unwrap();

        // Uniform accumulation on a flat bed never develops a slope
        for &v in surface.as_slice() {
            assert!((v - 5.5).abs() < 1e-12, "n={}: surface {}", n, v);
        }
    }
}

#[test]
fn test_sloped_bed() {
    let grid = Grid1D::uniform(0.0, 20_000.0, 500.0).unwrap();
    // 400 m at the divide falling to sea level at 20 km
    let bed = BedElevation::from_function(&grid, |x| 400.0 * (1.0 - x / 20_000.0));
    let accumulation = PolynomialAccumulation::new(2.0, 3.0, 15_000.0).unwrap();
    let mb = MassBalance1D::from_model(&grid, &accumulation);
    let stepper = DiffusionStepper::new(
        grid,
        bed.clone(),
        mb,
        ShallowIce1D::benchmark(),
        C_STAB_BENCHMARK,
    )
    .unwrap();
    let marcher = TimeMarcher::new(stepper, MarchConfig::default().with_t_total(2000.0)).unwrap();

    let mut checker = InvariantChecker::new(&bed);
    let mut surface = SurfaceState::ice_free(&bed);
    marcher.run_with_observer(&mut surface, &mut checker).unwrap();

    let h = surface.thickness(&bed);
    assert!(h.iter().any(|&v| v > 10.0), "no ice grew on the slope");
    assert!(h.iter().all(|&v| v >= 0.0));
}

#[test]
fn test_failure_carries_context() {
    let grid = Grid1D::uniform(0.0, 1000.0, 500.0).unwrap();
    let bed = BedElevation::flat(3);
    let mb = MassBalance1D::from_values(vec![0.0, f64::NAN, 0.0]);
    let stepper =
        DiffusionStepper::new(grid, bed, mb, ShallowIce1D::benchmark(), C_STAB_BENCHMARK).unwrap();
    let marcher = TimeMarcher::new(stepper, MarchConfig::default().with_t_total(5.0)).unwrap();

    let mut surface = SurfaceState::new(3);
    let err = marcher.run(&mut surface).unwrap_err();

    let ctx = err.context();
    assert_eq!(ctx.unit, 0);
    assert_eq!(ctx.substep, 0);
    assert_eq!(ctx.time, 0.0);
    assert!(err.to_string().contains("node 1"), "message: {}", err);
}

#[test]
fn test_mismatched_surface_aborts_run() {
    let grid = Grid1D::uniform(0.0, 2000.0, 500.0).unwrap();
    let bed = BedElevation::flat(5);
    let mb = MassBalance1D::from_model(&grid, &ConstantMassBalance::new(1.0));
    let stepper =
        DiffusionStepper::new(grid, bed, mb, ShallowIce1D::benchmark(), C_STAB_BENCHMARK).unwrap();
    let marcher = TimeMarcher::new(stepper, MarchConfig::default().with_t_total(5.0)).unwrap();

    let mut snapshots = Vec::new();
    let mut surface = SurfaceState::new(3);
    let err = marcher
        .run_with_observer(&mut surface, &mut snapshots)
        .unwrap_err();

    assert!(matches!(
        err,
        SolverError::SurfaceLengthMismatch {
            expected: 5,
            found: 3,
            ..
        }
    ));
    assert_eq!(err.context().unit, 0);
    assert!(snapshots.is_empty());
}
