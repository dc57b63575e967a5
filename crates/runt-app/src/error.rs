use thiserror::Error;

use runt_core::error::ConfigError;

/// Errors that stop the demo before the loop starts.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("RUNT_FRAMES must be a non-negative integer, got {0:?}")]
    FrameBudget(String),
}
