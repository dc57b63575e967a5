//! Simulation clock.
//!
//! Turns one frame's measured wall-clock delta into a [`FrameTick`]: how many
//! fixed steps to run, of what size, whether to snapshot for interpolation,
//! and the interpolation factor to render with. The clock never reads the
//! time itself, so any sequence of deltas can be replayed in tests.

use std::time::Duration;

use serde::Serialize;
use tracing::{trace, warn};

use runt_core::config::EngineConfig;
use runt_core::error::ConfigError;
use runt_core::types::StepMode;

/// Largest `f32` below 1.0. Keeps the published factor inside `[0, 1)`.
const MAX_INTERPOLATION: f32 = 1.0 - f32::EPSILON / 2.0;

/// What the loop should do this frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameTick {
    /// Number of simulation updates to run.
    pub steps: u32,
    /// Delta passed to each update (seconds).
    pub step_secs: f64,
    /// Snapshot interpolation state before stepping.
    pub snapshot: bool,
    /// Clamped frame delta before time scaling (seconds).
    pub delta_secs: f64,
    /// Clamped, time-scaled frame delta (seconds).
    pub elapsed: f64,
    /// Blend factor for rendering, `[0, 1)` in fixed mode, 0 in variable mode.
    pub interpolation: f32,
    /// Accumulated lag hit the frame-skip ceiling and was truncated.
    pub lag_capped: bool,
}

pub struct SimulationClock {
    mode: StepMode,
    step: Duration,
    max_elapsed: Duration,
    max_frame_skip: u32,
    /// `step × max_frame_skip`, checked at construction.
    lag_ceiling: Duration,
    lag: Duration,
    time_scale: f64,
    paused: bool,
    elapsed: f64,
    interpolation: f32,
    total_steps: u64,
    anomalies: u64,
}

impl SimulationClock {
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            mode: config.mode,
            step: config.tick_duration(),
            max_elapsed: config.max_elapsed()?,
            max_frame_skip: config.max_frame_skip,
            lag_ceiling: config.lag_ceiling()?,
            lag: Duration::ZERO,
            time_scale: config.time_scale,
            paused: false,
            elapsed: 0.0,
            interpolation: 0.0,
            total_steps: 0,
            anomalies: 0,
        })
    }

    /// Advance by one frame's raw measured delta (seconds).
    pub fn advance(&mut self, raw_dt: f64) -> FrameTick {
        let delta = self.clamp_delta(raw_dt);
        self.elapsed = delta.as_secs_f64() * self.time_scale;

        if self.paused {
            return FrameTick {
                steps: 0,
                step_secs: self.step.as_secs_f64(),
                snapshot: false,
                delta_secs: delta.as_secs_f64(),
                elapsed: self.elapsed,
                interpolation: self.interpolation,
                lag_capped: false,
            };
        }

        match self.mode {
            StepMode::Fixed => {
                let lag = self.lag + delta;
                let lag_capped = lag > self.lag_ceiling;
                self.lag = lag.min(self.lag_ceiling);

                let mut steps = 0;
                while self.lag >= self.step {
                    self.lag -= self.step;
                    steps += 1;
                }
                self.total_steps += u64::from(steps);
                self.interpolation = self.lag_fraction();

                FrameTick {
                    steps,
                    step_secs: self.step.as_secs_f64(),
                    snapshot: true,
                    delta_secs: delta.as_secs_f64(),
                    elapsed: self.elapsed,
                    interpolation: self.interpolation,
                    lag_capped,
                }
            }
            StepMode::Variable => {
                self.total_steps += 1;
                self.interpolation = 0.0;
                FrameTick {
                    steps: 1,
                    step_secs: delta.as_secs_f64(),
                    snapshot: false,
                    delta_secs: delta.as_secs_f64(),
                    elapsed: self.elapsed,
                    interpolation: 0.0,
                    lag_capped: false,
                }
            }
        }
    }

    /// Coerce a measured delta into `[0, max_elapsed]`.
    /// Regressions and NaN count as zero elapsed time.
    fn clamp_delta(&mut self, raw_dt: f64) -> Duration {
        if raw_dt.is_nan() || raw_dt < 0.0 {
            self.anomalies += 1;
            if self.anomalies == 1 {
                warn!(raw_dt, "clock regression; frame delta treated as zero");
            } else {
                trace!(raw_dt, "clock regression");
            }
            return Duration::ZERO;
        }
        if raw_dt == 0.0 {
            return Duration::ZERO;
        }
        if raw_dt >= self.max_elapsed.as_secs_f64() {
            return self.max_elapsed;
        }
        Duration::from_secs_f64(raw_dt)
    }

    fn lag_fraction(&self) -> f32 {
        let fraction = self.lag.as_secs_f64() / self.step.as_secs_f64();
        (fraction as f32).min(MAX_INTERPOLATION)
    }

    // --- Controls ---

    /// Stop running steps. Rendering continues with the current state.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Continue from exactly the lag held when paused.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Set the multiplier applied to the published elapsed time.
    /// Negative values clamp to 0; non-finite values are ignored.
    pub fn set_time_scale(&mut self, scale: f64) {
        if !scale.is_finite() {
            warn!(scale, "ignoring non-finite time scale");
            return;
        }
        self.time_scale = scale.max(0.0);
    }

    // --- Queries ---

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn mode(&self) -> StepMode {
        self.mode
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn lag(&self) -> Duration {
        self.lag
    }

    pub fn lag_ceiling(&self) -> Duration {
        self.lag_ceiling
    }

    pub fn max_frame_skip(&self) -> u32 {
        self.max_frame_skip
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn interpolation(&self) -> f32 {
        self.interpolation
    }

    /// Total simulation updates issued since construction.
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Number of negative or NaN deltas seen so far.
    pub fn anomalies(&self) -> u64 {
        self.anomalies
    }
}
