//! Trait-based time integrator abstraction.
//!
//! The SIA scheme advances the surface with a single explicit stage per
//! sub-step. The traits keep the update generic over the state type so the
//! stepper does not hand-roll the vector arithmetic.
//!
//! # Example
//! ```
//! use sia_rs::time::{Integrable, TimeIntegrator, ForwardEuler};
//! use sia_rs::solver::SurfaceState;
//!
//! let mut s = SurfaceState::from_values(vec![1.0; 4]);
//!
//! // du/dt = -u
//! ForwardEuler.step(&mut s, 0.1, 0.0, |state, _time| {
//!     let mut rhs = state.clone();
//!     rhs.scale(-1.0);
//!     rhs
//! });
//! assert!((s.get(0) - 0.9).abs() < 1e-14);
//! ```

// =============================================================================
// Integrable Trait
// =============================================================================

/// Trait for state types that can be time-integrated.
///
/// Provides the vector space operations needed by explicit integrators:
/// - `scale`: Multiply by scalar (x <- c * x)
/// - `axpy`: Add scaled vector (x <- x + c * y)
pub trait Integrable: Clone + Send + Sized {
    /// Scale the state by a constant: self <- c * self
    fn scale(&mut self, c: f64);

    /// Add a scaled vector: self <- self + c * other
    fn axpy(&mut self, c: f64, other: &Self);

    /// Create a zero-initialized state with the same shape.
    fn zeros_like(&self) -> Self {
        let mut result = self.clone();
        result.scale(0.0);
        result
    }
}

// =============================================================================
// IntegratorInfo Trait (non-generic, dyn-compatible)
// =============================================================================

/// Non-generic information about a time integrator.
pub trait IntegratorInfo: Send + Sync {
    /// Human-readable name for debugging and logging.
    fn name(&self) -> &'static str;

    /// Order of accuracy of the integrator.
    fn order(&self) -> usize;

    /// Number of RHS evaluations per step.
    fn n_stages(&self) -> usize;
}

// =============================================================================
// TimeIntegrator Trait
// =============================================================================

/// Trait for explicit time integrators.
///
/// Advances the state from `t` to `t + dt`. The RHS function receives the
/// current state and time and returns the time derivative.
pub trait TimeIntegrator<S: Integrable>: IntegratorInfo {
    /// Advance the state by one step (modified in place).
    fn step<F>(&self, state: &mut S, dt: f64, t: f64, rhs: F)
    where
        F: Fn(&S, f64) -> S;
}

// =============================================================================
// Forward Euler
// =============================================================================

/// Forward Euler integrator (1st order).
///
/// ```text
/// u_new = u + dt * L(u, t)
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ForwardEuler;

impl IntegratorInfo for ForwardEuler {
    fn name(&self) -> &'static str {
        "forward-euler"
    }

    fn order(&self) -> usize {
        1
    }

    fn n_stages(&self) -> usize {
        1
    }
}

impl<S: Integrable> TimeIntegrator<S> for ForwardEuler {
    fn step<F>(&self, state: &mut S, dt: f64, t: f64, rhs: F)
    where
        F: Fn(&S, f64) -> S,
    {
        let l_u = rhs(state, t);
        state.axpy(dt, &l_u);
    }
}
