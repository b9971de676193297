//! Remaining time of one outer unit.

/// Sub-steps closer than this to the end of the unit finish it exactly.
const BUDGET_EPS: f64 = 1e-12;

/// Tracks how much of one outer time unit is still to be integrated.
///
/// Sub-steps consumed from a budget sum to the unit's duration exactly: a
/// step that would leave less than a relative `1e-12` residue is clamped to
/// the remainder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StabilityBudget {
    duration: f64,
    elapsed: f64,
}

impl StabilityBudget {
    /// Fresh budget of `duration`.
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            elapsed: 0.0,
        }
    }

    /// Total duration of the unit.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Time already consumed.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Time still to be integrated.
    pub fn remaining(&self) -> f64 {
        (self.duration - self.elapsed).max(0.0)
    }

    /// True once the whole duration has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Consume `dt` and return the step to actually record.
    ///
    /// Steps within the tolerance of the remainder (or beyond it) close the
    /// budget exactly.
    pub fn consume(&mut self, dt: f64) -> f64 {
        let remaining = self.remaining();
        if dt >= remaining - BUDGET_EPS * self.duration.abs().max(1.0) {
            self.elapsed = self.duration;
            remaining
        } else {
            self.elapsed += dt;
            dt
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_step_exhausts() {
        let mut b = StabilityBudget::new(1.0);
        assert_eq!(b.remaining(), 1.0);

        assert_eq!(b.consume(1.0), 1.0);
        assert!(b.is_exhausted());
        assert_eq!(b.remaining(), 0.0);
    }

    #[test]
    fn test_steps_sum_to_duration() {
        let mut b = StabilityBudget::new(1.0);
        let mut total = 0.0;
        let mut n = 0;

        while !b.is_exhausted() {
            let dt = 0.1_f64.min(b.remaining());
            total += b.consume(dt);
            n += 1;
        }

        assert_eq!(n, 10);
        assert!((total - 1.0).abs() < 1e-12, "Sum {} != 1", total);
        assert_eq!(b.elapsed(), b.duration());
    }

    #[test]
    fn test_residue_absorbed() {
        let mut b = StabilityBudget::new(1.0);
        b.consume(0.5);

        // Leaves a residue far below the tolerance
        let taken = b.consume(0.5 - 1e-15);
        assert_eq!(taken, 0.5);
        assert!(b.is_exhausted());
    }

    #[test]
    fn test_overshoot_clamped() {
        let mut b = StabilityBudget::new(2.0);
        b.consume(1.5);
        assert_eq!(b.consume(10.0), 0.5);
        assert!(b.is_exhausted());
    }
}
