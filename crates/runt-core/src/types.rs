//! Fundamental keys and enums used by the container and the clock.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer ordering key. Lower layers update and draw first.
pub type Layer = i32;

/// Caller-supplied kind label used for population counts and pooling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKind(String);

impl EntityKind {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityKind {
    fn from(label: &str) -> Self {
        Self(label.to_owned())
    }
}

impl From<String> for EntityKind {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl Borrow<str> for EntityKind {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the clock advances the simulation. Chosen once at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepMode {
    /// Constant-size steps with interpolation between them.
    #[default]
    Fixed,
    /// One update per frame using the measured delta.
    Variable,
}
