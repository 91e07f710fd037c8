//! Stuck detection for walking agents.
//!
//! A walking agent must move at least `progress_threshold` away from its last
//! recorded position; every tick it fails to, its stuck timer grows. Once the
//! timer passes `stuck_duration` the agent is reported stuck and the caller
//! forces a short recovery pause.

use serde::{Deserialize, Serialize};

use crate::constants::liveness;
use crate::geometry::Vec2;

/// Tuning for [`LivenessMonitor`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LivenessParams {
    /// Displacement from the baseline that counts as progress.
    pub progress_threshold: f32,
    /// Seconds without progress before an agent is stuck.
    pub stuck_duration: f32,
}

impl Default for LivenessParams {
    fn default() -> Self {
        Self {
            progress_threshold: liveness::PROGRESS_THRESHOLD,
            stuck_duration: liveness::STUCK_DURATION,
        }
    }
}

/// Verdict for one walking tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Moved far enough; baseline re-recorded.
    Advancing,
    /// Not enough movement yet, still under the stuck duration.
    Stalled,
    /// Stalled for longer than the stuck duration. The timer has been reset.
    Stuck,
}

/// Per-agent progress bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LivenessMonitor {
    baseline: Vec2,
    stuck_timer: f32,
}

impl LivenessMonitor {
    pub fn new(position: Vec2) -> Self {
        Self {
            baseline: position,
            stuck_timer: 0.0,
        }
    }

    /// Last position at which the agent was seen making progress.
    pub fn baseline(&self) -> Vec2 {
        self.baseline
    }

    pub fn stuck_timer(&self) -> f32 {
        self.stuck_timer
    }

    /// Observe a walking agent after it has moved this tick.
    pub fn observe_walking(&mut self, position: Vec2, dt: f32, params: &LivenessParams) -> Progress {
        if position.distance(self.baseline) < params.progress_threshold {
            self.stuck_timer += dt;
        } else {
            self.stuck_timer = 0.0;
            self.baseline = position;
            return Progress::Advancing;
        }

        if self.stuck_timer > params.stuck_duration {
            self.stuck_timer = 0.0;
            Progress::Stuck
        } else {
            Progress::Stalled
        }
    }

    /// Observe a waiting agent: inert, keeps the baseline current.
    pub fn observe_waiting(&mut self, position: Vec2) {
        self.stuck_timer = 0.0;
        self.baseline = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn steady_walker_never_stuck() {
        let params = LivenessParams::default();
        let mut monitor = LivenessMonitor::new(Vec2::ZERO);
        // 4.8 units/s: crosses the 0.48 threshold every ~6 ticks.
        for i in 1..=600 {
            let p = Vec2::new(i as f32 * 4.8 * DT, 0.0);
            assert_ne!(monitor.observe_walking(p, DT, &params), Progress::Stuck, "tick {i}");
        }
        assert!(monitor.stuck_timer() < params.stuck_duration);
    }

    #[test]
    fn stationary_walker_stuck_after_duration() {
        let params = LivenessParams::default();
        let mut monitor = LivenessMonitor::new(Vec2::ZERO);
        let mut stuck_at = None;
        for i in 1..=120 {
            if monitor.observe_walking(Vec2::new(0.01, 0.0), DT, &params) == Progress::Stuck {
                stuck_at = Some(i);
                break;
            }
        }
        // 0.5 s at 60 Hz: stuck on the first tick past 30.
        let tick = stuck_at.expect("never reported stuck");
        assert!((30..=32).contains(&tick), "stuck at tick {tick}");
        assert_eq!(monitor.stuck_timer(), 0.0);
    }

    #[test]
    fn oscillation_between_two_points_is_stuck() {
        let params = LivenessParams::default();
        let mut monitor = LivenessMonitor::new(Vec2::ZERO);
        let mut stuck = false;
        for i in 0..60 {
            let p = if i % 2 == 0 { Vec2::new(0.2, 0.0) } else { Vec2::new(-0.2, 0.0) };
            stuck |= monitor.observe_walking(p, DT, &params) == Progress::Stuck;
        }
        assert!(stuck);
    }

    #[test]
    fn progress_rebaselines() {
        let params = LivenessParams::default();
        let mut monitor = LivenessMonitor::new(Vec2::ZERO);
        assert_eq!(monitor.observe_walking(Vec2::new(0.1, 0.0), DT, &params), Progress::Stalled);
        assert!(monitor.stuck_timer() > 0.0);
        assert_eq!(monitor.observe_walking(Vec2::new(1.0, 0.0), DT, &params), Progress::Advancing);
        assert_eq!(monitor.stuck_timer(), 0.0);
        assert_eq!(monitor.baseline(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn waiting_is_inert() {
        let params = LivenessParams::default();
        let mut monitor = LivenessMonitor::new(Vec2::ZERO);
        monitor.observe_walking(Vec2::ZERO, 0.4, &params);
        monitor.observe_waiting(Vec2::new(3.0, 3.0));
        assert_eq!(monitor.stuck_timer(), 0.0);
        assert_eq!(monitor.baseline(), Vec2::new(3.0, 3.0));
    }
}
