//! Error types for configuration and startup.

use std::path::PathBuf;

use thiserror::Error;

/// A configuration value the engine refuses to run with.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("target frame rate must be positive")]
    NonPositiveFps,
    #[error("target frame rate {0} is above one step per nanosecond")]
    FpsTooHigh(u32),
    #[error("max_frame_skip must be at least 1")]
    ZeroFrameSkip,
    #[error("max_elapsed_secs must be a positive finite number, got {0}")]
    InvalidMaxElapsed(f64),
    #[error("{max_frame_skip} steps of 1/{fps} s overflow the lag ceiling")]
    LagCeilingOverflow { fps: u32, max_frame_skip: u32 },
    #[error("time_scale must be a non-negative finite number, got {0}")]
    InvalidTimeScale(f64),
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
