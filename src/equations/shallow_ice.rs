//! 1D Shallow Ice Approximation.
//!
//! Surface evolution under the SIA is a nonlinear diffusion equation:
//!
//! ∂S/∂t = ṁ + ∂/∂x ( D ∂S/∂x )
//!
//! D = Γ H^(n+2) |∂S/∂x|^(n-1),   Γ = 2A (ρg)^n / (n+2)
//!
//! where:
//! - S = ice surface elevation
//! - H = S - B = ice thickness over bed B
//! - ṁ = mass balance rate
//! - A = ice softness (rate factor of Glen's flow law)
//! - n = Glen's flow-law exponent
//! - ρ, g = ice density, gravitational acceleration

use crate::error::ConfigError;

/// Ice softness of the bedrock-step benchmark (Pa⁻³ a⁻¹).
pub const A_BENCHMARK: f64 = 1e-16;
/// Glen's flow-law exponent.
pub const N_GLEN: f64 = 3.0;
/// Gravitational acceleration (m s⁻²).
pub const G_STANDARD: f64 = 9.81;
/// Density of ice (kg m⁻³).
pub const RHO_ICE: f64 = 910.0;

/// Shallow-ice flow law with its derived constants.
///
/// Γ and the exponents are computed once at construction, so the hot loop
/// only does two `powf` calls per flux point.
#[derive(Clone, Debug, PartialEq)]
pub struct ShallowIce1D {
    /// Ice softness A
    pub softness: f64,
    /// Flow-law exponent n (>= 1)
    pub n: f64,
    /// Gravitational acceleration g
    pub g: f64,
    /// Ice density ρ
    pub rho: f64,
    gamma: f64,
    thickness_exponent: f64,
    slope_exponent: f64,
}

impl ShallowIce1D {
    /// Create the flow law, rejecting non-physical parameters.
    pub fn new(softness: f64, n: f64, g: f64, rho: f64) -> Result<Self, ConfigError> {
        ConfigError::require_positive("softness", softness)?;
        ConfigError::require_positive("gravity", g)?;
        ConfigError::require_positive("density", rho)?;
        if !n.is_finite() || n < 1.0 {
            return Err(ConfigError::InvalidFlowExponent(n));
        }

        Ok(Self {
            softness,
            n,
            g,
            rho,
            gamma: 2.0 * softness * (rho * g).powf(n) / (n + 2.0),
            thickness_exponent: n + 2.0,
            slope_exponent: 0.5 * (n - 1.0),
        })
    }

    /// Benchmark parameters: A = 1e-16, n = 3, g = 9.81, ρ = 910.
    pub fn benchmark() -> Self {
        let n = N_GLEN;
        let (a, g, rho) = (A_BENCHMARK, G_STANDARD, RHO_ICE);
        Self {
            softness: a,
            n,
            g,
            rho,
            gamma: 2.0 * a * (rho * g).powf(n) / (n + 2.0),
            thickness_exponent: n + 2.0,
            slope_exponent: 0.5 * (n - 1.0),
        }
    }

    /// Γ = 2A (ρg)^n / (n+2).
    #[inline]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Exponent on thickness in the diffusivity, n + 2.
    #[inline]
    pub fn thickness_exponent(&self) -> f64 {
        self.thickness_exponent
    }

    /// Exponent applied to the squared slope, (n - 1) / 2.
    #[inline]
    pub fn slope_exponent(&self) -> f64 {
        self.slope_exponent
    }

    /// Slope term |∂S/∂x|^(n-1), evaluated as ((ΔS/dx)²)^((n-1)/2).
    ///
    /// Squaring first keeps the base non-negative for either slope sign.
    #[inline]
    pub fn slope_term(&self, surface_difference: f64, dx: f64) -> f64 {
        let grad = surface_difference / dx;
        (grad * grad).powf(self.slope_exponent)
    }

    /// Diffusivity D = Γ H^(n+2) |∂S/∂x|^(n-1) at a flux point.
    ///
    /// `thickness` is the staggered (averaged) thickness and must be non-negative.
    #[inline]
    pub fn diffusivity(&self, thickness: f64, surface_difference: f64, dx: f64) -> f64 {
        self.gamma * thickness.powf(self.thickness_exponent) * self.slope_term(surface_difference, dx)
    }
}

impl Default for ShallowIce1D {
    fn default() -> Self {
        Self::benchmark()
    }
}
