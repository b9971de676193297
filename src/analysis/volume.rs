//! Ice volume and numerical-versus-analytical comparison.

use std::fmt;

use crate::mesh::{BedElevation, Grid1D};

/// Trapezoidal integral of `y` over the sample positions `x`.
///
/// # Panics
///
/// Panics if the slices have different lengths.
pub fn trapezoid(y: &[f64], x: &[f64]) -> f64 {
    assert_eq!(y.len(), x.len(), "Samples and positions must have same length");
    y.windows(2)
        .zip(x.windows(2))
        .map(|(yw, xw)| 0.5 * (yw[0] + yw[1]) * (xw[1] - xw[0]))
        .sum()
}

/// Ice volume per unit width of a surface over a bed.
pub fn ice_volume(surface: &[f64], bed: &BedElevation, grid: &Grid1D) -> f64 {
    let h: Vec<f64> = surface
        .iter()
        .zip(bed.as_slice())
        .map(|(&s, &b)| s - b)
        .collect();
    trapezoid(&h, &grid.positions)
}

/// Volumes of the numerical and analytical steady states.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeComparison {
    /// Volume of the analytical solution
    pub vol_exact: f64,
    /// Volume of the numerical solution
    pub vol_numeric: f64,
    /// Relative error in percent, None if the exact volume is zero
    pub error_percent: Option<f64>,
}

impl VolumeComparison {
    /// Compare a numerical surface against the analytical one on the same grid.
    pub fn compute(
        numeric: &[f64],
        exact: &[f64],
        bed: &BedElevation,
        grid: &Grid1D,
    ) -> Self {
        Self::from_volumes(ice_volume(numeric, bed, grid), ice_volume(exact, bed, grid))
    }

    /// Comparison from precomputed volumes.
    pub fn from_volumes(vol_numeric: f64, vol_exact: f64) -> Self {
        let error_percent = if vol_exact == 0.0 {
            None
        } else {
            Some((vol_numeric - vol_exact) / vol_exact * 100.0)
        };
        Self {
            vol_exact,
            vol_numeric,
            error_percent,
        }
    }
}

impl fmt::Display for VolumeComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "vol exact: {:.6e}", self.vol_exact)?;
        writeln!(f, "vol M2: {:.6e}", self.vol_numeric)?;
        match self.error_percent {
            Some(err) => write!(f, "err M2 {:.3}", err),
            None => write!(f, "err M2 undefined (zero exact volume)"),
        }
    }
}

/// Pointwise misfit between two surfaces.
///
/// The first surface is the model and the second the reference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceMisfit {
    /// Root mean square error: sqrt(mean((model - reference)²))
    pub rmse: f64,
    /// Maximum absolute error: max(|model - reference|)
    pub max_error: f64,
    /// Node holding the maximum error
    pub max_error_node: usize,
}

impl SurfaceMisfit {
    /// Compute the misfit.
    ///
    /// # Panics
    ///
    /// Panics if the surfaces have different lengths or are empty.
    pub fn compute(model: &[f64], reference: &[f64]) -> Self {
        assert_eq!(
            model.len(),
            reference.len(),
            "Model and reference must have same length"
        );
        assert!(!model.is_empty(), "Surfaces must not be empty");

        let n = model.len();
        let mut sum_sq = 0.0;
        let mut max_error = 0.0;
        let mut max_error_node = 0;

        for (i, (&m, &r)) in model.iter().zip(reference).enumerate() {
            let e = m - r;
            sum_sq += e * e;
            if e.abs() > max_error {
                max_error = e.abs();
                max_error_node = i;
            }
        }

        Self {
            rmse: (sum_sq / n as f64).sqrt(),
            max_error,
            max_error_node,
        }
    }
}
