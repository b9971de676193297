//! Error types for configuration and time stepping.
//!
//! - [`ConfigError`]: rejected parameters, raised before any stepping
//! - [`SolverError`]: a sub-step produced a state that cannot be continued from
//! - [`SiaError`]: top-level error returned by the benchmark runner

use thiserror::Error;

/// Invalid benchmark or physics parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A parameter that must be strictly positive was not.
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    /// A parameter that must not be negative was.
    #[error("{name} must be non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    /// A parameter was NaN or infinite.
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    /// Glen's flow-law exponent below 1.
    #[error("flow-law exponent must be >= 1, got {0}")]
    InvalidFlowExponent(f64),

    /// Stability coefficient outside the explicit-diffusion bound.
    #[error("stability coefficient must lie in (0, 0.5], got {0}")]
    InvalidStabilityCoefficient(f64),

    /// Snapshots requested every zero units.
    #[error("snapshot interval must be at least one outer unit")]
    ZeroSnapshotInterval,

    /// A nodal field does not match the grid.
    #[error("{name} has {found} values, grid has {expected} nodes")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        found: usize,
    },
}

impl ConfigError {
    /// Check that `value` is finite and strictly positive.
    pub fn require_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
        if !value.is_finite() {
            return Err(ConfigError::NonFinite { name, value });
        }
        if value <= 0.0 {
            return Err(ConfigError::NonPositive { name, value });
        }
        Ok(())
    }

    /// Check that `value` is finite and not negative.
    pub fn require_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
        Self::require_finite(name, value)?;
        if value < 0.0 {
            return Err(ConfigError::Negative { name, value });
        }
        Ok(())
    }

    /// Check that a nodal field has one value per grid node.
    pub fn require_len(
        name: &'static str,
        expected: usize,
        found: usize,
    ) -> Result<(), ConfigError> {
        if expected == found {
            Ok(())
        } else {
            Err(ConfigError::LengthMismatch {
                name,
                expected,
                found,
            })
        }
    }

    /// Check that `value` is finite (any sign).
    pub fn require_finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(ConfigError::NonFinite { name, value })
        }
    }
}

/// Where in the run a sub-step was taken.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepContext {
    /// Outer (reporting) unit index
    pub unit: usize,
    /// Global sub-step counter, starting at zero
    pub substep: usize,
    /// Simulated time at the start of the sub-step
    pub time: f64,
}

impl std::fmt::Display for StepContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unit {}, sub-step {}, t = {:.6}",
            self.unit, self.substep, self.time
        )
    }
}

/// Fatal failure during a sub-step.
///
/// The scheme is deterministic, so none of these are retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// Diffusivity evaluated to NaN or infinity at a flux point.
    #[error("non-finite diffusivity {value} at node {node} ({context})")]
    NonFiniteDiffusivity {
        context: StepContext,
        node: usize,
        value: f64,
    },

    /// Updated surface is NaN or infinite before bed clipping.
    #[error("non-finite surface {value} at node {node} ({context})")]
    NonFiniteSurface {
        context: StepContext,
        node: usize,
        value: f64,
    },

    /// Surface below bed after clipping. Indicates a logic defect.
    #[error("surface {surface} below bed {bed} at node {node} ({context})")]
    BedFloorViolation {
        context: StepContext,
        node: usize,
        surface: f64,
        bed: f64,
    },

    /// Surface handed to the stepper does not match its grid.
    #[error("surface has {found} values, grid has {expected} nodes ({context})")]
    SurfaceLengthMismatch {
        context: StepContext,
        expected: usize,
        found: usize,
    },

    /// Sub-step made no progress through the outer unit.
    #[error("sub-step of {dt} made no progress ({context})")]
    StalledSubStep { context: StepContext, dt: f64 },
}

impl SolverError {
    /// Context of the failing sub-step.
    pub fn context(&self) -> StepContext {
        match self {
            Self::NonFiniteDiffusivity { context, .. }
            | Self::NonFiniteSurface { context, .. }
            | Self::BedFloorViolation { context, .. }
            | Self::SurfaceLengthMismatch { context, .. }
            | Self::StalledSubStep { context, .. } => *context,
        }
    }
}

/// Top-level error for a benchmark run.
#[derive(Debug, Error)]
pub enum SiaError {
    /// Rejected configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Time stepping aborted.
    #[error("solver failure: {0}")]
    Solver(#[from] SolverError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_positive() {
        assert!(ConfigError::require_positive("dx", 500.0).is_ok());
        assert_eq!(
            ConfigError::require_positive("dx", 0.0),
            Err(ConfigError::NonPositive {
                name: "dx",
                value: 0.0
            })
        );
        assert!(matches!(
            ConfigError::require_positive("dx", f64::NAN),
            Err(ConfigError::NonFinite { name: "dx", .. })
        ));
    }

    #[test]
    fn test_require_non_negative() {
        assert!(ConfigError::require_non_negative("mdot_0", 0.0).is_ok());
        assert_eq!(
            ConfigError::require_non_negative("mdot_0", -1.0),
            Err(ConfigError::Negative {
                name: "mdot_0",
                value: -1.0
            })
        );
        assert!(matches!(
            ConfigError::require_non_negative("mdot_0", f64::INFINITY),
            Err(ConfigError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_require_len() {
        assert!(ConfigError::require_len("bed", 5, 5).is_ok());
        let err = ConfigError::require_len("bed", 5, 4).unwrap_err();
        assert_eq!(err.to_string(), "bed has 4 values, grid has 5 nodes");
    }

    #[test]
    fn test_solver_error_display_has_context() {
        let err = SolverError::BedFloorViolation {
            context: StepContext {
                unit: 12,
                substep: 40,
                time: 12.5,
            },
            node: 3,
            surface: 1.0,
            bed: 2.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("unit 12"));
        assert!(msg.contains("sub-step 40"));
        assert!(msg.contains("node 3"));
        assert_eq!(err.context().unit, 12);
    }

    #[test]
    fn test_sia_error_from() {
        let err: SiaError = ConfigError::ZeroSnapshotInterval.into();
        assert!(matches!(err, SiaError::Config(_)));
    }
}
