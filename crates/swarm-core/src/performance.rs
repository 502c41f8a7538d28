//! Closed-loop particle budget.
//!
//! The controller compares a rolling frame rate against the profile's target
//! and scales the active particle count and point size inside a hysteresis
//! band (`target - 8` .. `target + 6`). Inside the band nothing changes.

use crate::constants::*;
use crate::profile::DeviceProfile;
use std::collections::VecDeque;

/// Rolling mean of `1/dt` over the last [`FPS_WINDOW`] frames.
#[derive(Clone, Debug, Default)]
pub struct FpsMeter {
    samples: VecDeque<f32>,
}

impl FpsMeter {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(FPS_WINDOW),
        }
    }

    /// Records one frame and returns the smoothed rate.
    pub fn push_dt(&mut self, dt_sec: f32) -> f32 {
        if dt_sec > 0.0 {
            self.samples.push_back(1.0 / dt_sec);
            if self.samples.len() > FPS_WINDOW {
                self.samples.pop_front();
            }
        }
        self.average()
    }

    pub fn average(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f32>() / self.samples.len() as f32
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Adjustment {
    Shrink,
    Grow,
    Hold,
}

#[derive(Clone, Debug)]
pub struct PerformanceController {
    total: usize,
    target_fps: f32,
    base_size: f32,
    active_count: usize,
    point_size: f32,
}

impl PerformanceController {
    pub fn new(profile: &DeviceProfile) -> Self {
        Self {
            total: profile.total_particles,
            target_fps: profile.target_fps,
            base_size: profile.base_point_size,
            active_count: profile.total_particles,
            point_size: profile.base_point_size,
        }
    }

    /// Lowest active count the controller will shrink to.
    pub fn floor(&self) -> usize {
        let share = self.total * ACTIVE_FLOOR_PCT / 100;
        ACTIVE_FLOOR_MIN.max(share).min(self.total)
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    pub fn target_fps(&self) -> f32 {
        self.target_fps
    }

    /// Applies the policy for one rendered frame given the smoothed rate.
    pub fn update(&mut self, avg_fps: f32) -> Adjustment {
        if avg_fps.is_nan() || avg_fps <= 0.0 {
            return Adjustment::Hold;
        }
        let floor = self.floor();
        if avg_fps < self.target_fps - FPS_BAND_LOW && self.active_count > floor {
            let shrunk = (self.active_count as f32 * SHRINK_COUNT).floor() as usize;
            self.active_count = shrunk.max(floor);
            self.point_size = (self.point_size * SHRINK_SIZE).max(MIN_POINT_SIZE);
            log::debug!(
                "[perf] {:.1} fps -> shrink to {} particles, size {:.2}",
                avg_fps,
                self.active_count,
                self.point_size
            );
            Adjustment::Shrink
        } else if avg_fps > self.target_fps + FPS_BAND_HIGH && self.active_count < self.total {
            let grown = (self.active_count as f32 * GROW_COUNT).floor() as usize;
            self.active_count = grown.min(self.total);
            self.point_size = (self.point_size * GROW_SIZE).min(self.base_size);
            log::debug!(
                "[perf] {:.1} fps -> grow to {} particles, size {:.2}",
                avg_fps,
                self.active_count,
                self.point_size
            );
            Adjustment::Grow
        } else {
            Adjustment::Hold
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_keeps_last_eight() {
        let mut m = FpsMeter::new();
        for _ in 0..20 {
            m.push_dt(1.0 / 10.0);
        }
        for _ in 0..8 {
            m.push_dt(1.0 / 60.0);
        }
        assert!((m.average() - 60.0).abs() < 0.01);
    }

    #[test]
    fn zero_dt_is_ignored() {
        let mut m = FpsMeter::new();
        assert_eq!(m.push_dt(0.0), 0.0);
    }
}
