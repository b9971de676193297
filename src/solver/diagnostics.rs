//! Diagnostics and progress reporting for SIA runs.
//!
//! Provides:
//! - Ice volume, peak thickness and margin position of a surface
//! - Tracking of extremes across snapshots
//! - Percentage progress through the `log` facade

use std::fmt;
use std::time::Instant;

use log::info;

use crate::analysis::trapezoid;
use crate::equations::ShallowIce1D;
use crate::mesh::{BedElevation, Grid1D};
use crate::solver::{StaggeredDiffusivity, SurfaceState};

/// Diagnostic quantities of one ice surface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SiaDiagnostics {
    /// Trapezoidal ice volume per unit width (m²)
    pub ice_volume: f64,
    /// Maximum ice thickness (m)
    pub max_thickness: f64,
    /// Position of the last node carrying ice, None if ice-free (m)
    pub margin_position: Option<f64>,
    /// Largest staggered diffusivity (m²/yr)
    pub max_diffusivity: f64,
}

impl SiaDiagnostics {
    /// Compute diagnostics for a surface.
    pub fn compute(
        surface: &SurfaceState,
        bed: &BedElevation,
        grid: &Grid1D,
        law: &ShallowIce1D,
    ) -> Self {
        let h = surface.thickness(bed);
        let ice_volume = trapezoid(&h, &grid.positions);
        let max_thickness = h.iter().copied().fold(0.0_f64, f64::max);
        let margin_position = h
            .iter()
            .rposition(|&v| v > 0.0)
            .map(|i| grid.x(i));
        let max_diffusivity = StaggeredDiffusivity::compute(surface, bed, grid, law).max_abs();

        Self {
            ice_volume,
            max_thickness,
            margin_position,
            max_diffusivity,
        }
    }

    /// One-line summary for log output.
    pub fn summary_line(&self) -> String {
        let margin = match self.margin_position {
            Some(x) => format!("{:.0} m", x),
            None => "none".to_string(),
        };
        format!(
            "V={:.4e} m² H_max={:.1} m margin={} D_max={:.3e}",
            self.ice_volume, self.max_thickness, margin, self.max_diffusivity
        )
    }
}

impl fmt::Display for SiaDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary_line())
    }
}

/// Tracks diagnostics across the snapshots of a run.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticsTracker {
    /// Diagnostics of the latest update
    pub current: SiaDiagnostics,
    /// Time of the latest update
    pub current_time: f64,
    /// Number of updates recorded
    pub n_updates: usize,
    /// Largest thickness seen
    pub max_thickness_seen: f64,
    /// Largest diffusivity seen
    pub max_diffusivity_seen: f64,
    /// Furthest margin position seen
    pub max_extent_seen: Option<f64>,
}

impl DiagnosticsTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the diagnostics of a new snapshot.
    pub fn update(&mut self, time: f64, diag: SiaDiagnostics) {
        self.max_thickness_seen = self.max_thickness_seen.max(diag.max_thickness);
        self.max_diffusivity_seen = self.max_diffusivity_seen.max(diag.max_diffusivity);
        self.max_extent_seen = match (self.max_extent_seen, diag.margin_position) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        self.current = diag;
        self.current_time = time;
        self.n_updates += 1;
    }

    /// Log a summary of the tracked extremes.
    pub fn log_summary(&self) {
        info!("=== Diagnostics Summary ===");
        info!("Time: {:.1} yr ({} updates)", self.current_time, self.n_updates);
        info!("  Max thickness: {:.2} m", self.max_thickness_seen);
        info!("  Max D:         {:.4e} m²/yr", self.max_diffusivity_seen);
        match self.max_extent_seen {
            Some(x) => info!("  Max extent:    {:.0} m", x),
            None => info!("  Max extent:    ice-free"),
        }
        info!("Current: {}", self.current);
    }
}

/// Progress reporter for long runs.
#[derive(Clone, Debug)]
pub struct ProgressReporter {
    start_instant: Instant,
    total_sim_time: f64,
    last_reported_pct: u32,
    report_interval_pct: u32,
    n_steps: usize,
}

impl ProgressReporter {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    /// * `total_sim_time` - Total simulated time to reach
    /// * `report_interval_pct` - Report every N percent (e.g., 10 for 10%, 20%, ...)
    pub fn new(total_sim_time: f64, report_interval_pct: u32) -> Self {
        Self {
            start_instant: Instant::now(),
            total_sim_time,
            last_reported_pct: 0,
            report_interval_pct: report_interval_pct.max(1),
            n_steps: 0,
        }
    }

    /// Record a sub-step.
    pub fn step(&mut self) {
        self.n_steps += 1;
    }

    /// Number of sub-steps recorded.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Report progress if the next threshold was reached.
    ///
    /// Returns true if progress was reported.
    pub fn maybe_report(&mut self, current_time: f64) -> bool {
        let pct = self.percent(current_time) as u32;
        let threshold = self.last_reported_pct + self.report_interval_pct;

        if pct >= threshold {
            self.report(current_time);
            self.last_reported_pct = (pct / self.report_interval_pct) * self.report_interval_pct;
            true
        } else {
            false
        }
    }

    /// Force a progress report.
    pub fn report(&self, current_time: f64) {
        let elapsed = self.start_instant.elapsed().as_secs_f64();
        let pct = self.percent(current_time);

        let eta = if pct > 0.1 {
            format_duration(elapsed * 100.0 / pct - elapsed)
        } else {
            "calculating...".to_string()
        };

        let steps_per_sec = if elapsed > 0.0 {
            self.n_steps as f64 / elapsed
        } else {
            0.0
        };

        info!(
            "[{:>5.1}%] t={:.0} yr | elapsed={} | ETA={} | {:.0} sub-steps/s",
            pct,
            current_time,
            format_duration(elapsed),
            eta,
            steps_per_sec
        );
    }

    /// Log the final summary.
    pub fn finish(&self, final_time: f64) {
        let elapsed = self.start_instant.elapsed().as_secs_f64();
        info!(
            "Reached t={:.0} yr in {} ({} sub-steps)",
            final_time,
            format_duration(elapsed),
            self.n_steps
        );
    }

    fn percent(&self, current_time: f64) -> f64 {
        if self.total_sim_time > 0.0 {
            (current_time / self.total_sim_time * 100.0).min(100.0)
        } else {
            100.0
        }
    }
}

/// Format a duration in seconds as human-readable string.
pub fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        let s = secs - mins * 60.0;
        format!("{:.0}m{:.0}s", mins, s)
    } else {
        let hours = (secs / 3600.0).floor();
        let mins = ((secs - hours * 3600.0) / 60.0).floor();
        format!("{:.0}h{:.0}m", hours, mins)
    }
}
