//! Rolling frame-time statistics.
//!
//! Keeps the last N clamped frame deltas and logs a summary once per full
//! window at debug level.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::debug;

/// Summary of one statistics window (seconds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

pub struct FrameStats {
    samples: VecDeque<f64>,
    capacity: usize,
    frames: u64,
}

impl FrameStats {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            frames: 0,
        }
    }

    /// Record one frame delta. Returns the window summary every
    /// `capacity` frames.
    pub fn record(&mut self, dt: f64) -> Option<FrameSummary> {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(dt);
        self.frames += 1;

        if self.frames % self.capacity as u64 != 0 {
            return None;
        }
        let summary = self.summary()?;
        debug!(
            frames = self.capacity,
            min = summary.min,
            max = summary.max,
            mean = summary.mean,
            std_dev = summary.std_dev,
            "frame delta window"
        );
        Some(summary)
    }

    /// Statistics over the current window, once it is full.
    pub fn summary(&self) -> Option<FrameSummary> {
        if self.samples.len() < self.capacity {
            return None;
        }
        let n = self.samples.len() as f64;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &dt in &self.samples {
            min = min.min(dt);
            max = max.max(dt);
            sum += dt;
        }
        let mean = sum / n;
        let variance = self
            .samples
            .iter()
            .map(|dt| (dt - mean) * (dt - mean))
            .sum::<f64>()
            / n;

        Some(FrameSummary {
            min,
            max,
            mean,
            std_dev: variance.sqrt(),
        })
    }

    /// Frame rate implied by the window mean, once it is full.
    pub fn mean_fps(&self) -> Option<f64> {
        self.summary()
            .filter(|s| s.mean > 0.0)
            .map(|s| 1.0 / s.mean)
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_waits_for_full_window() {
        let mut stats = FrameStats::new(4);
        assert!(stats.record(0.01).is_none());
        assert!(stats.record(0.01).is_none());
        assert!(stats.record(0.01).is_none());
        assert!(stats.summary().is_none());
        assert!(stats.record(0.01).is_some());
    }

    #[test]
    fn test_summary_values() {
        let mut stats = FrameStats::new(4);
        for dt in [1.0, 2.0, 3.0, 4.0] {
            stats.record(dt);
        }
        let s = stats.summary().unwrap();
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert_eq!(s.mean, 2.5);
        // Population variance of 1..4 is 1.25.
        assert!((s.std_dev - 1.25f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_window_rolls_and_reports_once_per_window() {
        let mut stats = FrameStats::new(3);
        let mut reports = 0;
        for i in 0..9 {
            if stats.record(i as f64).is_some() {
                reports += 1;
            }
        }
        assert_eq!(reports, 3);
        let s = stats.summary().unwrap();
        assert_eq!(s.min, 6.0);
        assert_eq!(s.max, 8.0);
        assert_eq!(stats.frames(), 9);
    }

    #[test]
    fn test_mean_fps() {
        let mut stats = FrameStats::new(2);
        stats.record(0.02);
        stats.record(0.02);
        assert!((stats.mean_fps().unwrap() - 50.0).abs() < 1e-9);
    }
}
