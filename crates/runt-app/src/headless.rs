//! Headless backend.
//!
//! Stands in for a window: counts draw calls, paces frames to the target
//! rate with `thread::sleep`, and asks the loop to close once a frame budget
//! is spent.

use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec2;
use tracing::{debug, trace};

use runt_core::render::{Canvas, Color};
use runt_sim::Backend;

use crate::error::AppError;

/// Frames run when `RUNT_FRAMES` is unset.
pub const DEFAULT_FRAME_BUDGET: u64 = 600;

/// Frame timestamps kept for the measured rate.
const FPS_WINDOW: usize = 60;

/// Parse a `RUNT_FRAMES` value. Unset means the default budget, `0` means
/// run until interrupted.
pub fn parse_frame_budget(raw: Option<&str>) -> Result<Option<u64>, AppError> {
    let Some(raw) = raw else {
        return Ok(Some(DEFAULT_FRAME_BUDGET));
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Ok(None),
        Ok(frames) => Ok(Some(frames)),
        Err(_) => Err(AppError::FrameBudget(raw.to_string())),
    }
}

pub struct HeadlessBackend {
    budget: Option<u64>,
    pacing: bool,
    frame_time: Option<Duration>,
    next_frame: Option<Instant>,
    recent: VecDeque<Instant>,
    frames: u64,
    draws: usize,
    total_draws: u64,
    clear_color: Option<Color>,
    camera: Vec2,
}

impl HeadlessBackend {
    /// Backend that sleeps to hold the target frame rate.
    pub fn new(budget: Option<u64>) -> Self {
        Self {
            budget,
            pacing: true,
            frame_time: None,
            next_frame: None,
            recent: VecDeque::with_capacity(FPS_WINDOW),
            frames: 0,
            draws: 0,
            total_draws: 0,
            clear_color: None,
            camera: Vec2::ZERO,
        }
    }

    /// Backend that never sleeps. Used with a synthetic time source.
    pub fn unpaced(budget: Option<u64>) -> Self {
        Self {
            pacing: false,
            ..Self::new(budget)
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draw calls in the most recent frame.
    pub fn last_draws(&self) -> usize {
        self.draws
    }

    pub fn total_draws(&self) -> u64 {
        self.total_draws
    }

    pub fn clear_color(&self) -> Option<Color> {
        self.clear_color
    }

    pub fn camera(&self) -> Vec2 {
        self.camera
    }

    /// Sleep until the next frame is due.
    fn pace(&mut self) {
        let Some(frame_time) = self.frame_time else {
            return;
        };
        let now = Instant::now();
        let next = self.next_frame.unwrap_or(now) + frame_time;
        if next > now {
            thread::sleep(next - now);
            self.next_frame = Some(next);
        } else if now - next > frame_time * 2 {
            // Too far behind; restart the schedule from now.
            self.next_frame = Some(now);
        } else {
            self.next_frame = Some(next);
        }
    }
}

impl Canvas for HeadlessBackend {
    fn draw(&mut self, position: Vec2, camera: Vec2) {
        self.draws += 1;
        let screen = position - camera;
        trace!(x = screen.x, y = screen.y, "draw");
    }
}

impl Backend for HeadlessBackend {
    fn begin_frame(&mut self) {
        self.draws = 0;
    }

    fn clear(&mut self, color: Color) {
        self.clear_color = Some(color);
    }

    fn begin_camera(&mut self, camera: Vec2) {
        self.camera = camera;
    }

    fn end_camera(&mut self) {}

    fn end_frame(&mut self) {
        self.frames += 1;
        self.total_draws += self.draws as u64;
        trace!(frame = self.frames, draws = self.draws, "frame presented");

        if self.recent.len() == FPS_WINDOW {
            self.recent.pop_front();
        }
        self.recent.push_back(Instant::now());

        if self.pacing {
            self.pace();
        }
    }

    fn should_close(&self) -> bool {
        self.budget.is_some_and(|budget| self.frames >= budget)
    }

    fn set_target_fps(&mut self, fps: u32) {
        self.frame_time = Some(Duration::from_secs(1) / fps.max(1));
        debug!(fps, pacing = self.pacing, "target frame rate set");
    }

    fn measured_fps(&self) -> f64 {
        let (Some(first), Some(last)) = (self.recent.front(), self.recent.back()) else {
            return 0.0;
        };
        let span = last.duration_since(*first).as_secs_f64();
        if span <= 0.0 {
            return 0.0;
        }
        (self.recent.len() - 1) as f64 / span
    }
}
