//! Engine defaults and tuning parameters.

/// Default target frame rate (Hz). Also the fixed tick rate.
pub const DEFAULT_FPS: u32 = 60;

/// Ceiling applied to a single frame's measured delta (seconds).
/// A debugger stall or OS hiccup never produces more than this much catch-up.
pub const DEFAULT_MAX_ELAPSED_SECS: f64 = 0.1;

/// Maximum number of fixed steps run in one frame.
pub const DEFAULT_MAX_FRAME_SKIP: u32 = 5;

/// Default RNG seed. Same seed = same random sequence.
pub const DEFAULT_SEED: u64 = 42;

/// Default virtual screen size.
pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;

/// Number of frames in the rolling delta-time statistics window.
pub const FRAME_STATS_SAMPLES: usize = 120;

/// Initial capacity of a freshly created layer list.
pub const LAYER_CAPACITY: usize = 8;
