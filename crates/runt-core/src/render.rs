//! Rendering boundary.
//!
//! The core never paints pixels itself. Entities draw through a [`Canvas`],
//! which the embedding backend implements.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// RGBA clear color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const CHARCOAL: Color = Color::rgb(0x36, 0x45, 0x4f);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::CHARCOAL
    }
}

/// Per-entity draw primitive supplied by the rendering backend.
pub trait Canvas {
    /// Draw at a world-space position, offset by the camera.
    fn draw(&mut self, position: Vec2, camera: Vec2);
}
