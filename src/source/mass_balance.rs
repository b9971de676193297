//! Surface mass balance (accumulation minus ablation).
//!
//! The mass balance enters the surface equation as a source:
//! ∂S/∂t = ṁ(x) + ∂/∂x (D ∂S/∂x)

use crate::error::ConfigError;
use crate::mesh::Grid1D;

/// Trait for time-independent mass balance laws.
pub trait MassBalanceModel: Send + Sync {
    /// Mass balance rate (m ice per time unit) at position `x`.
    fn rate(&self, x: f64) -> f64;

    /// Name of this model for debugging.
    fn name(&self) -> &'static str;
}

/// Polynomial accumulation law of the bedrock-step benchmark.
///
/// ṁ(x) = (n ṁ₀ / x_m^(2n-1)) x^(n-1) |x_m - x|^(n-1) (x_m - 2x)   for x <= x_m
/// ṁ(x) = 0                                                         for x > x_m
///
/// Accumulation on `[0, x_m/2)`, ablation on `(x_m/2, x_m]`. The integral
/// over `[0, x_m]` vanishes, which is what gives a steady margin at `x_m`.
#[derive(Clone, Debug, PartialEq)]
pub struct PolynomialAccumulation {
    /// Peak rate scale ṁ₀
    pub mdot_0: f64,
    /// Flow-law exponent n
    pub n: f64,
    /// Steady-state margin position x_m
    pub x_m: f64,
    prefactor: f64,
}

impl PolynomialAccumulation {
    /// Create the law. `x_m` must be positive.
    pub fn new(mdot_0: f64, n: f64, x_m: f64) -> Result<Self, ConfigError> {
        ConfigError::require_finite("mdot_0", mdot_0)?;
        ConfigError::require_positive("x_m", x_m)?;
        if !n.is_finite() || n < 1.0 {
            return Err(ConfigError::InvalidFlowExponent(n));
        }

        Ok(Self {
            mdot_0,
            n,
            x_m,
            prefactor: n * mdot_0 / x_m.powf(2.0 * n - 1.0),
        })
    }
}

impl MassBalanceModel for PolynomialAccumulation {
    fn rate(&self, x: f64) -> f64 {
        // Hard clamp beyond the margin, not a decay
        if x > self.x_m {
            return 0.0;
        }
        let n1 = self.n - 1.0;
        self.prefactor * x.powf(n1) * (self.x_m - x).abs().powf(n1) * (self.x_m - 2.0 * x)
    }

    fn name(&self) -> &'static str {
        "polynomial_accumulation"
    }
}

/// Spatially uniform mass balance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantMassBalance {
    /// Rate applied at every node
    pub rate: f64,
}

impl ConstantMassBalance {
    /// Uniform rate.
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    /// No forcing at all.
    pub fn zero() -> Self {
        Self { rate: 0.0 }
    }
}

impl MassBalanceModel for ConstantMassBalance {
    fn rate(&self, _x: f64) -> f64 {
        self.rate
    }

    fn name(&self) -> &'static str {
        "constant"
    }
}

/// Mass balance sampled at the grid nodes. Fixed for the run.
#[derive(Clone, Debug, PartialEq)]
pub struct MassBalance1D {
    data: Vec<f64>,
}

impl MassBalance1D {
    /// Sample a model at every node.
    pub fn from_model<M: MassBalanceModel + ?Sized>(grid: &Grid1D, model: &M) -> Self {
        Self {
            data: grid.sample(|x| model.rate(x)),
        }
    }

    /// Zero forcing on `n_nodes` nodes.
    pub fn zero(n_nodes: usize) -> Self {
        Self {
            data: vec![0.0; n_nodes],
        }
    }

    /// From explicit nodal values.
    pub fn from_values(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// Rate at node `i`.
    #[inline]
    pub fn get(&self, i: usize) -> f64 {
        self.data[i]
    }

    /// All nodal rates.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
