//! Engine configuration.
//!
//! Loaded from JSON; every field has a default so a partial file is valid.
//! Values are checked by [`EngineConfig::validate`] and a bad value is an
//! error, never silently replaced.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;
use crate::render::Color;
use crate::types::StepMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Target frame rate; the fixed step is `1 / fps` seconds.
    pub fps: u32,
    pub mode: StepMode,
    /// Ceiling on one frame's measured delta (seconds).
    pub max_elapsed_secs: f64,
    /// Maximum fixed steps per frame.
    pub max_frame_skip: u32,
    /// Multiplier applied to the published elapsed time.
    pub time_scale: f64,
    pub seed: u64,
    pub background: Color,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "runt".to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fps: DEFAULT_FPS,
            mode: StepMode::Fixed,
            max_elapsed_secs: DEFAULT_MAX_ELAPSED_SECS,
            max_frame_skip: DEFAULT_MAX_FRAME_SKIP,
            time_scale: 1.0,
            seed: DEFAULT_SEED,
            background: Color::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::NonPositiveFps);
        }
        if self.tick_duration().is_zero() {
            return Err(ConfigError::FpsTooHigh(self.fps));
        }
        if self.max_frame_skip == 0 {
            return Err(ConfigError::ZeroFrameSkip);
        }
        self.max_elapsed()?;
        self.lag_ceiling()?;
        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            return Err(ConfigError::InvalidTimeScale(self.time_scale));
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Duration of one fixed step. Only meaningful once validated.
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }

    /// Ceiling on one frame's delta. Must be positive and representable
    /// as a non-zero `Duration`.
    pub fn max_elapsed(&self) -> Result<Duration, ConfigError> {
        let invalid = ConfigError::InvalidMaxElapsed(self.max_elapsed_secs);
        if !self.max_elapsed_secs.is_finite() || self.max_elapsed_secs <= 0.0 {
            return Err(invalid);
        }
        match Duration::try_from_secs_f64(self.max_elapsed_secs) {
            Ok(max) if !max.is_zero() => Ok(max),
            _ => Err(invalid),
        }
    }

    /// Most lag the fixed-step clock may hold: `max_frame_skip` steps.
    pub fn lag_ceiling(&self) -> Result<Duration, ConfigError> {
        self.tick_duration()
            .checked_mul(self.max_frame_skip)
            .ok_or(ConfigError::LagCeilingOverflow {
                fps: self.fps,
                max_frame_skip: self.max_frame_skip,
            })
    }
}
