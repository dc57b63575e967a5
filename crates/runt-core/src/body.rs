//! Embeddable position state with fixed-step interpolation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::Interpolate;
use crate::types::Layer;

/// Position, layer and visibility shared by most drawable entities.
///
/// `previous` is the position at the start of the current frame's fixed
/// steps; rendering blends from it towards `position`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    pub previous: Vec2,
    pub layer: Layer,
    pub visible: bool,
}

impl Body {
    pub fn new(position: Vec2, layer: Layer) -> Self {
        Self {
            position,
            previous: position,
            layer,
            visible: true,
        }
    }

    /// Position to draw at for the given interpolation factor.
    /// A zero factor (variable mode) draws the current position unblended.
    pub fn draw_position(&self, interpolation: f32) -> Vec2 {
        if interpolation > 0.0 {
            self.previous.lerp(self.position, interpolation)
        } else {
            self.position
        }
    }

    /// Move to `position` without blending from the old spot.
    pub fn teleport(&mut self, position: Vec2) {
        self.position = position;
        self.previous = position;
    }
}

impl Interpolate for Body {
    fn snapshot(&mut self) {
        self.previous = self.position;
    }
}
