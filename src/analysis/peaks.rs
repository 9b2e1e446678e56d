//! Falling peak markers above the spectrum bars.

/// Per-bar peak marker with gravity-driven fall
///
/// Markers snap up to any bar that reaches them and otherwise fall with
/// constant acceleration. Every term scales with the elapsed time, so the
/// fall does not depend on the frame rate.
#[derive(Debug, Clone)]
pub struct PeakAnimator {
    peaks: Vec<f32>,
    velocities: Vec<f32>,
    /// Fall acceleration (bar heights per second²)
    gravity: f32,
}

impl PeakAnimator {
    pub fn new(bar_count: usize, gravity: f32) -> Self {
        Self {
            peaks: vec![0.0; bar_count],
            velocities: vec![0.0; bar_count],
            gravity,
        }
    }

    pub fn peaks(&self) -> &[f32] {
        &self.peaks
    }

    /// Current fall velocity per bar
    pub fn velocities(&self) -> &[f32] {
        &self.velocities
    }

    /// Drop all markers to the floor
    pub fn reset(&mut self) {
        self.peaks.fill(0.0);
        self.velocities.fill(0.0);
    }

    /// Advance by `dt_secs` against the current bar values
    pub fn update(&mut self, bars: &[f32], dt_secs: f32) {
        if bars.len() != self.peaks.len() {
            self.peaks.resize(bars.len(), 0.0);
            self.velocities.resize(bars.len(), 0.0);
        }

        for ((peak, velocity), &bar) in self.peaks.iter_mut().zip(&mut self.velocities).zip(bars) {
            *velocity += dt_secs * self.gravity;
            let new_peak = (*peak - dt_secs * *velocity).max(bar).max(0.0);
            // Re-hit: stop accelerating
            if new_peak >= *peak {
                *velocity = 0.0;
            }
            *peak = new_peak;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_snaps_up_instantly() {
        let mut animator = PeakAnimator::new(3, 2.0);
        animator.update(&[0.2, 0.9, 0.0], 0.016);
        assert_eq!(animator.peaks(), &[0.2, 0.9, 0.0]);
        assert!(animator.velocities().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_falls_with_acceleration() {
        let mut animator = PeakAnimator::new(1, 2.0);
        animator.update(&[1.0], 0.1);

        animator.update(&[0.0], 0.1);
        let first_drop = 1.0 - animator.peaks()[0];
        let before = animator.peaks()[0];
        animator.update(&[0.0], 0.1);
        let second_drop = before - animator.peaks()[0];

        assert_abs_diff_eq!(first_drop, 0.02, epsilon = 1e-6);
        assert!(second_drop > first_drop);
    }

    #[test]
    fn test_peak_never_below_bar() {
        let mut animator = PeakAnimator::new(4, 2.0);
        let frames = [
            [0.9, 0.1, 0.5, 0.0],
            [0.3, 0.4, 0.5, 0.2],
            [0.0, 0.0, 0.6, 0.1],
            [0.8, 0.2, 0.1, 0.0],
        ];
        for _ in 0..50 {
            for bars in &frames {
                animator.update(bars, 0.033);
                for (peak, bar) in animator.peaks().iter().zip(bars) {
                    assert!(peak >= bar);
                }
            }
        }
    }

    #[test]
    fn test_floor_at_zero() {
        let mut animator = PeakAnimator::new(1, 2.0);
        animator.update(&[0.1], 0.016);
        for _ in 0..200 {
            animator.update(&[0.0], 0.1);
        }
        assert_eq!(animator.peaks()[0], 0.0);
    }

    #[test]
    fn test_frame_rate_independent() {
        let mut one_step = PeakAnimator::new(1, 2.0);
        let mut two_steps = PeakAnimator::new(1, 2.0);
        one_step.update(&[0.8], 0.0);
        two_steps.update(&[0.8], 0.0);

        one_step.update(&[0.0], 0.016);
        two_steps.update(&[0.0], 0.008);
        two_steps.update(&[0.0], 0.008);

        assert_abs_diff_eq!(one_step.peaks()[0], two_steps.peaks()[0], epsilon = 1e-3);
    }

    #[test]
    fn test_resizes_to_bar_count() {
        let mut animator = PeakAnimator::new(2, 2.0);
        animator.update(&[0.5; 5], 0.016);
        assert_eq!(animator.peaks().len(), 5);

        animator.reset();
        assert!(animator.peaks().iter().all(|&p| p == 0.0));
    }
}
