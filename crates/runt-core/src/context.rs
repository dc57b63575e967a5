//! Per-application frame context.
//!
//! Holds what would otherwise be global state: the queue into the world,
//! the camera offset, the published frame timing and the shared RNG.
//! Built once and threaded through every `Game` and `Entity` call.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::commands::WorldQueue;
use crate::entity::EntityRef;
use crate::types::EntityKind;

pub struct FrameContext {
    queue: WorldQueue,
    camera: Vec2,
    interpolation: f32,
    elapsed: f64,
    rng: ChaCha8Rng,
}

impl FrameContext {
    pub fn new(queue: WorldQueue, seed: u64) -> Self {
        Self {
            queue,
            camera: Vec2::ZERO,
            interpolation: 0.0,
            elapsed: 0.0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Queue an addition into the world.
    pub fn add(&self, kind: impl Into<EntityKind>, entity: EntityRef) {
        self.queue.add(kind, entity);
    }

    /// Queue a removal from the world.
    pub fn remove(&self, entity: EntityRef) {
        self.queue.remove(entity);
    }

    pub fn queue(&self) -> &WorldQueue {
        &self.queue
    }

    pub fn camera(&self) -> Vec2 {
        self.camera
    }

    pub fn set_camera(&mut self, camera: Vec2) {
        self.camera = camera;
    }

    pub fn reset_camera(&mut self) {
        self.camera = Vec2::ZERO;
    }

    /// Interpolation factor for the current render, in `[0, 1)`.
    pub fn interpolation(&self) -> f32 {
        self.interpolation
    }

    /// Clamped, time-scaled delta of the current frame (seconds).
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Publish the current frame's timing. Called by the engine loop.
    pub fn publish_timing(&mut self, elapsed: f64, interpolation: f32) {
        self.elapsed = elapsed;
        self.interpolation = interpolation;
    }

    /// Uniform float in `[0, 1)`.
    pub fn random(&mut self) -> f64 {
        self.rng.gen()
    }

    /// Uniform integer in `[0, n)`. Returns 0 when `n` is 0.
    pub fn rand(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }
}
