//! Closed-form steady state of the bedrock-step benchmark.
//!
//! Right of the step (x_s <= x <= x_m), Eq. 56:
//! ```text
//! s(x) = (C (x_m + 2x) (x_m - x)²)^(n/(2n+2))
//! C    = (2n+2) (n+2)^(1/n) ṁ₀^(1/n) / (2^(1/n) 6n A^(1/n) ρ g x_m^((2n-1)/n))
//! ```
//!
//! Left of the step (x < x_s), Eqs. 57-59, with the thickness jump across
//! the step h⁺ = s(x_s), h⁻ = max(h⁺ - b₀, 0):
//! ```text
//! h(x) = (h⁻^((2n+2)/n) - h⁺^((2n+2)/n) + C (x_m + 2x) (x_m - x)²)^(n/(2n+2))
//! s(x) = h(x) + b₀
//! ```
//!
//! Beyond the margin (x > x_m) the surface is zero.

use crate::equations::ShallowIce1D;
use crate::error::ConfigError;
use crate::mesh::Grid1D;

/// Analytical steady-state surface over a single bedrock step.
#[derive(Clone, Debug, PartialEq)]
pub struct SteadyStateSolution {
    n: f64,
    x_m: f64,
    x_s: f64,
    b_0: f64,
    c: f64,
    h_plus: f64,
    h_minus: f64,
}

impl SteadyStateSolution {
    /// Build the solution for a flow law and forcing.
    ///
    /// # Arguments
    /// * `law` - Flow law (supplies A, n, ρ, g)
    /// * `mdot_0` - Mass balance scale of the polynomial accumulation
    /// * `x_m` - Steady-state margin position
    /// * `x_s` - Step position
    /// * `b_0` - Step height (bed is `b_0` left of `x_s`, zero right of it)
    pub fn new(
        law: &ShallowIce1D,
        mdot_0: f64,
        x_m: f64,
        x_s: f64,
        b_0: f64,
    ) -> Result<Self, ConfigError> {
        ConfigError::require_non_negative("mdot_0", mdot_0)?;
        ConfigError::require_positive("x_m", x_m)?;
        ConfigError::require_finite("x_s", x_s)?;
        ConfigError::require_finite("b_0", b_0)?;

        let n = law.n;
        let c = ((2.0 * n + 2.0) * (n + 2.0).powf(1.0 / n) * mdot_0.powf(1.0 / n))
            / (2.0_f64.powf(1.0 / n)
                * 6.0
                * n
                * law.softness.powf(1.0 / n)
                * law.rho
                * law.g
                * x_m.powf((2.0 * n - 1.0) / n));

        let mut solution = Self {
            n,
            x_m,
            x_s,
            b_0,
            c,
            h_plus: 0.0,
            h_minus: 0.0,
        };
        solution.h_plus = solution.right_of_step(x_s);
        solution.h_minus = (solution.h_plus - b_0).max(0.0);
        Ok(solution)
    }

    /// Shape constant C.
    pub fn c(&self) -> f64 {
        self.c
    }

    /// Thickness just right of the step (Eq. 58).
    pub fn h_plus(&self) -> f64 {
        self.h_plus
    }

    /// Thickness just left of the step (Eq. 59).
    pub fn h_minus(&self) -> f64 {
        self.h_minus
    }

    /// Step height b₀.
    pub fn b_0(&self) -> f64 {
        self.b_0
    }

    /// C (x_m + 2x) (x_m - x)²
    fn shape(&self, x: f64) -> f64 {
        let d = self.x_m - x;
        self.c * (self.x_m + 2.0 * x) * d * d
    }

    fn right_of_step(&self, x: f64) -> f64 {
        let exponent = self.n / (2.0 * self.n + 2.0);
        self.shape(x).max(0.0).powf(exponent)
    }

    fn left_of_step(&self, x: f64) -> f64 {
        let p = (2.0 * self.n + 2.0) / self.n;
        let base = self.h_minus.powf(p) - self.h_plus.powf(p) + self.shape(x);
        base.max(0.0).powf(1.0 / p) + self.b_0
    }

    /// Steady surface elevation at `x`.
    pub fn surface_at(&self, x: f64) -> f64 {
        if x > self.x_m {
            0.0
        } else if x >= self.x_s {
            self.right_of_step(x)
        } else {
            self.left_of_step(x)
        }
    }

    /// Steady surface at every grid node.
    pub fn surface(&self, grid: &Grid1D) -> Vec<f64> {
        grid.sample(|x| self.surface_at(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn benchmark() -> SteadyStateSolution {
        SteadyStateSolution::new(&ShallowIce1D::benchmark(), 2.0, 20_000.0, 7000.0, 250.0)
            .unwrap()
    }

    #[test]
    fn test_zero_at_margin_and_beyond() {
        let s = benchmark();
        assert_eq!(s.surface_at(20_000.0), 0.0);
        assert_eq!(s.surface_at(25_000.0), 0.0);
    }

    #[test]
    fn test_step_jump() {
        let s = benchmark();

        // Right of the step the surface is h⁺, left of it h⁻ + b₀
        assert_relative_eq!(s.surface_at(7000.0), s.h_plus(), max_relative = 1e-14);
        let left = s.surface_at(7000.0 - 1e-9);
        assert_relative_eq!(left, s.h_minus() + 250.0, max_relative = 1e-9);
        assert!(s.h_plus() > 250.0);
        assert_relative_eq!(left, s.h_plus(), max_relative = 1e-9);
    }

    #[test]
    fn test_surface_decreases_to_margin() {
        let s = benchmark();
        let xs: Vec<f64> = (0..=40).map(|i| i as f64 * 500.0).collect();

        for w in xs.windows(2) {
            assert!(
                s.surface_at(w[1]) <= s.surface_at(w[0]) + 1e-9,
                "surface rises between {} and {}",
                w[0],
                w[1]
            );
        }
    }

    #[test]
    fn test_eq56_value() {
        // n = 3: s = (C (x_m + 2x)(x_m - x)²)^(3/8)
        let s = benchmark();
        let x: f64 = 10_000.0;
        let expected = (s.c() * 40_000.0 * 1.0e8_f64).powf(3.0 / 8.0);
        assert_relative_eq!(s.surface_at(x), expected, max_relative = 1e-14);
    }

    #[test]
    fn test_thin_ice_over_tall_step() {
        // Step taller than h⁺: no ice left of the step
        let s = SteadyStateSolution::new(&ShallowIce1D::benchmark(), 2.0, 20_000.0, 19_900.0, 5000.0)
            .unwrap();
        assert_eq!(s.h_minus(), 0.0);
        assert!(s.surface_at(19_899.0) >= 5000.0);
    }

    #[test]
    fn test_zero_forcing_is_ice_free() {
        let law = ShallowIce1D::benchmark();
        let s = SteadyStateSolution::new(&law, 0.0, 20_000.0, 7000.0, 250.0).unwrap();
        assert_eq!(s.c(), 0.0);
        assert_eq!(s.h_plus(), 0.0);
        // Surface rests on the bed on both sides of the step
        assert_eq!(s.surface_at(3000.0), 250.0);
        assert_eq!(s.surface_at(12_000.0), 0.0);

        let err = SteadyStateSolution::new(&law, -1.0, 20_000.0, 7000.0, 250.0).unwrap_err();
        assert!(matches!(err, ConfigError::Negative { name: "mdot_0", .. }));
    }

    #[test]
    fn test_rejects_bad_margin() {
        let err =
            SteadyStateSolution::new(&ShallowIce1D::benchmark(), 2.0, 0.0, 7000.0, 250.0)
                .unwrap_err();
        assert!(matches!(err, ConfigError::NonPositive { name: "x_m", .. }));
    }
}
