//! Frame loop.
//!
//! `Engine` owns the world, the frame context and the clock, and drives a
//! [`Game`] through a [`Backend`] one frame at a time:
//! measure → snapshot → step × N → draw. Completely headless; the backend
//! and time source are supplied by the embedding application.

use std::time::Instant;

use glam::Vec2;
use tracing::{debug, info};

use runt_core::config::EngineConfig;
use runt_core::constants::FRAME_STATS_SAMPLES;
use runt_core::context::FrameContext;
use runt_core::error::ConfigError;
use runt_core::render::{Canvas, Color};

use crate::clock::{FrameTick, SimulationClock};
use crate::stats::FrameStats;
use crate::world::World;

/// The application driven by the loop.
pub trait Game {
    /// Called once before the first frame.
    fn create(&mut self, world: &mut World, ctx: &mut FrameContext);

    /// Called once per step: several times a frame in fixed mode, once in
    /// variable mode, never while paused.
    fn update(&mut self, world: &mut World, dt: f64, ctx: &mut FrameContext) {
        world.update(dt, ctx);
    }

    /// Called exactly once per frame, including while paused.
    fn draw(
        &mut self,
        world: &mut World,
        _interpolation: f32,
        ctx: &FrameContext,
        canvas: &mut dyn Canvas,
    ) {
        world.render(ctx, canvas);
    }
}

/// Window and renderer services.
pub trait Backend: Canvas {
    fn begin_frame(&mut self);
    fn clear(&mut self, color: Color);
    fn begin_camera(&mut self, camera: Vec2);
    fn end_camera(&mut self);
    fn end_frame(&mut self);
    fn should_close(&self) -> bool;
    fn set_target_fps(&mut self, fps: u32);
    fn measured_fps(&self) -> f64;
}

/// Source of wall-clock time in seconds.
pub trait TimeSource {
    fn now_secs(&mut self) -> f64;
}

/// Monotonic time since construction.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn now_secs(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

pub struct Engine<G, B, T = SystemClock> {
    game: G,
    backend: B,
    time: T,
    world: World,
    ctx: FrameContext,
    clock: SimulationClock,
    stats: FrameStats,
    fps: u32,
    background: Color,
    previous: f64,
    frame_rate: f64,
    frames: u64,
    started: bool,
}

impl<G: Game, B: Backend, T: TimeSource> Engine<G, B, T> {
    pub fn new(config: &EngineConfig, game: G, backend: B, time: T) -> Result<Self, ConfigError> {
        let clock = SimulationClock::new(config)?;
        let world = World::new();
        let ctx = FrameContext::new(world.queue(), config.seed);
        Ok(Self {
            game,
            backend,
            time,
            world,
            ctx,
            clock,
            stats: FrameStats::new(FRAME_STATS_SAMPLES),
            fps: config.fps,
            background: config.background,
            previous: 0.0,
            frame_rate: 0.0,
            frames: 0,
            started: false,
        })
    }

    /// Run frames until the backend asks to close.
    pub fn run(&mut self) {
        self.start();
        while !self.backend.should_close() {
            self.frame();
        }
        info!(
            frames = self.frames,
            steps = self.clock.total_steps(),
            "engine stopped"
        );
    }

    /// One-time setup. Called by `run` and by the first `frame`.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.backend.set_target_fps(self.fps);
        info!(
            fps = self.fps,
            mode = ?self.clock.mode(),
            max_frame_skip = self.clock.max_frame_skip(),
            "engine started"
        );

        self.game.create(&mut self.world, &mut self.ctx);
        self.world.flush();
        self.previous = self.time.now_secs();
    }

    /// Process one frame and return what the clock decided for it.
    pub fn frame(&mut self) -> FrameTick {
        self.start();

        // 1. Measure
        let now = self.time.now_secs();
        let raw_dt = now - self.previous;
        self.previous = now;

        // 2. Advance the clock
        let tick = self.clock.advance(raw_dt);
        self.stats.record(tick.delta_secs);
        if tick.lag_capped {
            debug!(steps = tick.steps, "frame skip ceiling reached; lag truncated");
        }
        let previous_interpolation = self.ctx.interpolation();
        self.ctx.publish_timing(tick.elapsed, previous_interpolation);

        // 3. Simulate
        if tick.snapshot {
            self.world.snapshot();
        }
        for _ in 0..tick.steps {
            self.game.update(&mut self.world, tick.step_secs, &mut self.ctx);
        }

        // 4. Render
        self.ctx.publish_timing(tick.elapsed, tick.interpolation);
        self.backend.begin_frame();
        self.backend.clear(self.background);
        self.backend.begin_camera(self.ctx.camera());
        self.game.draw(
            &mut self.world,
            tick.interpolation,
            &self.ctx,
            &mut self.backend,
        );
        self.backend.end_camera();
        self.backend.end_frame();

        self.frame_rate = self.backend.measured_fps();
        self.frames += 1;
        tick
    }

    // --- Controls ---

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn resume(&mut self) {
        self.clock.resume();
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn set_time_scale(&mut self, scale: f64) {
        self.clock.set_time_scale(scale);
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    /// Frame rate last reported by the backend.
    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    // --- Accessors ---

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn context(&self) -> &FrameContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut FrameContext {
        &mut self.ctx
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
