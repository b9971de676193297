//! Benchmark configuration.

use crate::equations::{A_BENCHMARK, G_STANDARD, N_GLEN, RHO_ICE, ShallowIce1D};
use crate::error::ConfigError;
use crate::solver::C_STAB_BENCHMARK;
use crate::time::MarchConfig;

/// Parameters of the bedrock-step benchmark.
///
/// Defaults reproduce the reference configuration: a margin at 20 km, a
/// 250 m step at 7 km, 500 m spacing and 25 000 one-year outer units.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkConfig {
    /// Ice softness A (Pa⁻ⁿ a⁻¹)
    pub softness: f64,
    /// Glen's flow-law exponent n
    pub n: f64,
    /// Gravitational acceleration g (m s⁻²)
    pub g: f64,
    /// Ice density ρ (kg m⁻³)
    pub rho: f64,
    /// Mass balance scale ṁ₀ (m a⁻¹)
    pub mdot_0: f64,
    /// Steady-state margin position x_m (m)
    pub x_m: f64,
    /// Bedrock step position x_s (m)
    pub x_s: f64,
    /// Stability coefficient c_stab
    pub c_stab: f64,
    /// Grid spacing dx (m)
    pub dx: f64,
    /// Outer unit duration (a)
    pub dt: f64,
    /// Total simulated time (a)
    pub t_total: f64,
    /// Step height in grid spacings, b₀ = N dx
    pub step_factor: f64,
    /// Domain extent as a multiple of x_m
    pub margin_factor: f64,
    /// Snapshot every this many outer units
    pub snapshot_interval: usize,
    /// Log progress and the report at info level
    pub verbose: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            softness: A_BENCHMARK,
            n: N_GLEN,
            g: G_STANDARD,
            rho: RHO_ICE,
            mdot_0: 2.0,
            x_m: 20_000.0,
            x_s: 7000.0,
            c_stab: C_STAB_BENCHMARK,
            dx: 500.0,
            dt: 1.0,
            t_total: 25_000.0,
            step_factor: 0.5,
            margin_factor: 1.5,
            snapshot_interval: 1000,
            verbose: false,
        }
    }
}

impl BenchmarkConfig {
    /// Set the grid spacing.
    pub fn with_dx(mut self, dx: f64) -> Self {
        self.dx = dx;
        self
    }

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

    /// Set the stability coefficient.
    pub fn with_c_stab(mut self, c_stab: f64) -> Self {
        self.c_stab = c_stab;
        self
    }

    /// Set the flow-law parameters.
    pub fn with_flow_law(mut self, softness: f64, n: f64) -> Self {
        self.softness = softness;
        self.n = n;
        self
    }

    /// Set the mass balance scale.
    pub fn with_mdot_0(mut self, mdot_0: f64) -> Self {
        self.mdot_0 = mdot_0;
        self
    }

    /// Set the margin and step positions.
    pub fn with_geometry(mut self, x_m: f64, x_s: f64) -> Self {
        self.x_m = x_m;
        self.x_s = x_s;
        self
    }

    /// Set the step height factor N (b₀ = N dx).
    pub fn with_step_factor(mut self, step_factor: f64) -> Self {
        self.step_factor = step_factor;
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

    /// Step height b₀ = N dx.
    pub fn b_0(&self) -> f64 {
        self.step_factor * self.dx
    }

    /// Check all parameters before any stepping.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_positive("dx", self.dx)?;
        ConfigError::require_positive("x_m", self.x_m)?;
        ConfigError::require_positive("margin_factor", self.margin_factor)?;
        ConfigError::require_finite("x_s", self.x_s)?;
        ConfigError::require_finite("step_factor", self.step_factor)?;
        ConfigError::require_non_negative("mdot_0", self.mdot_0)?;
        if !(self.c_stab > 0.0 && self.c_stab <= 0.5) {
            return Err(ConfigError::InvalidStabilityCoefficient(self.c_stab));
        }
        self.flow_law()?;
        self.march_config().validate()
    }

    /// Flow law built from the physical parameters.
    pub fn flow_law(&self) -> Result<ShallowIce1D, ConfigError> {
        ShallowIce1D::new(self.softness, self.n, self.g, self.rho)
    }

    /// Outer loop configuration.
    pub fn march_config(&self) -> MarchConfig {
        let config = MarchConfig::default()
            .with_dt(self.dt)
            .with_t_total(self.t_total)
            .with_snapshot_interval(self.snapshot_interval);
        if self.verbose { config.verbose() } else { config }
    }
}
