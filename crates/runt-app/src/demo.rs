//! Bouncing boxes.
//!
//! A handful of boxes bounce inside the window bounds. Every wall hit
//! throws off a short-lived spark one layer above the boxes and brings the
//! box that hit to the front of its layer. Spent sparks are parked in the
//! world pool and relaunched on later hits.

use std::cell::RefCell;
use std::collections::HashMap;
use std::f32::consts::TAU;
use std::rc::Rc;

use glam::Vec2;
use tracing::{debug, info};

use runt_core::body::Body;
use runt_core::config::EngineConfig;
use runt_core::context::FrameContext;
use runt_core::entity::{Entity, EntityKey, EntityRef, Interpolate};
use runt_core::render::Canvas;
use runt_core::types::Layer;
use runt_sim::{Game, World};

pub const BOX_KIND: &str = "box";
pub const SPARK_KIND: &str = "spark";

pub const BOX_LAYER: Layer = 0;
pub const SPARK_LAYER: Layer = 1;

/// Box edge length (pixels).
pub const BOX_SIZE: f32 = 16.0;
/// Box speed range (pixels/second).
const MIN_SPEED: f32 = 80.0;
const MAX_SPEED: f32 = 240.0;
const SPARK_SPEED: f32 = 60.0;
/// Spark lifetime (seconds).
const SPARK_LIFETIME: f64 = 0.25;

// --- Entities ---

pub struct Bouncer {
    body: Body,
    velocity: Vec2,
    bounds: Vec2,
    hit: Option<Vec2>,
}

impl Bouncer {
    pub fn new(position: Vec2, velocity: Vec2, bounds: Vec2) -> Self {
        Self {
            body: Body::new(position, BOX_LAYER),
            velocity,
            bounds,
            hit: None,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Wall contact from the last update, if there was one.
    fn take_hit(&mut self) -> Option<Vec2> {
        self.hit.take()
    }
}

impl Entity for Bouncer {
    fn update(&mut self, dt: f64, _ctx: &mut FrameContext) {
        let max = (self.bounds - Vec2::splat(BOX_SIZE)).max(Vec2::ZERO);
        let mut position = self.body.position + self.velocity * dt as f32;

        for axis in 0..2 {
            if position[axis] < 0.0 {
                position[axis] = -position[axis];
                self.velocity[axis] = self.velocity[axis].abs();
                self.hit = Some(position);
            } else if position[axis] > max[axis] {
                position[axis] = 2.0 * max[axis] - position[axis];
                self.velocity[axis] = -self.velocity[axis].abs();
                self.hit = Some(position);
            }
        }
        // A reflection can overshoot when dt is large.
        self.body.position = position.clamp(Vec2::ZERO, max);
    }

    fn render(&self, ctx: &FrameContext, canvas: &mut dyn Canvas) {
        if self.body.visible {
            canvas.draw(self.body.draw_position(ctx.interpolation()), ctx.camera());
        }
    }

    fn layer(&self) -> Layer {
        self.body.layer
    }

    fn interpolated(&mut self) -> Option<&mut dyn Interpolate> {
        Some(&mut self.body)
    }
}

pub struct Spark {
    body: Body,
    velocity: Vec2,
    ttl: f64,
}

impl Spark {
    fn new() -> Self {
        Self {
            body: Body::new(Vec2::ZERO, SPARK_LAYER),
            velocity: Vec2::ZERO,
            ttl: 0.0,
        }
    }

    fn launch(&mut self, at: Vec2, velocity: Vec2) {
        self.body.teleport(at);
        self.velocity = velocity;
        self.ttl = SPARK_LIFETIME;
    }

    pub fn spent(&self) -> bool {
        self.ttl <= 0.0
    }
}

impl Entity for Spark {
    fn update(&mut self, dt: f64, _ctx: &mut FrameContext) {
        if self.spent() {
            return;
        }
        self.body.position += self.velocity * dt as f32;
        self.ttl -= dt;
    }

    fn render(&self, ctx: &FrameContext, canvas: &mut dyn Canvas) {
        if !self.spent() {
            canvas.draw(self.body.draw_position(ctx.interpolation()), ctx.camera());
        }
    }

    fn layer(&self) -> Layer {
        self.body.layer
    }

    fn interpolated(&mut self) -> Option<&mut dyn Interpolate> {
        Some(&mut self.body)
    }
}

// --- Game ---

pub struct BounceDemo {
    box_count: usize,
    bounds: Vec2,
    boxes: Vec<Rc<RefCell<Bouncer>>>,
    /// Every spark ever built, so pooled handles can be relaunched.
    sparks: HashMap<EntityKey, Rc<RefCell<Spark>>>,
    live_sparks: Vec<Rc<RefCell<Spark>>>,
    bounces: u64,
    sparks_built: u64,
    sparks_reused: u64,
}

impl BounceDemo {
    pub fn new(config: &EngineConfig, box_count: usize) -> Self {
        Self {
            box_count,
            bounds: Vec2::new(config.width as f32, config.height as f32),
            boxes: Vec::with_capacity(box_count),
            sparks: HashMap::new(),
            live_sparks: Vec::new(),
            bounces: 0,
            sparks_built: 0,
            sparks_reused: 0,
        }
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn box_positions(&self) -> Vec<Vec2> {
        self.boxes.iter().map(|b| b.borrow().position()).collect()
    }

    pub fn box_velocities(&self) -> Vec<Vec2> {
        self.boxes.iter().map(|b| b.borrow().velocity()).collect()
    }

    pub fn bounces(&self) -> u64 {
        self.bounces
    }

    pub fn live_sparks(&self) -> usize {
        self.live_sparks.len()
    }

    pub fn sparks_built(&self) -> u64 {
        self.sparks_built
    }

    pub fn sparks_reused(&self) -> u64 {
        self.sparks_reused
    }

    fn spawn_spark(&mut self, world: &mut World, ctx: &mut FrameContext, at: Vec2) {
        let angle = ctx.random() as f32 * TAU;
        let velocity = Vec2::from_angle(angle) * SPARK_SPEED;

        let mut built = None;
        let entity = world.create(SPARK_KIND, || -> EntityRef {
            let spark = Rc::new(RefCell::new(Spark::new()));
            built = Some(spark.clone());
            spark
        });
        let key = EntityKey::of(&entity);
        let spark = match built {
            Some(spark) => {
                self.sparks_built += 1;
                self.sparks.insert(key, spark.clone());
                spark
            }
            None => match self.sparks.get(&key) {
                Some(spark) => {
                    self.sparks_reused += 1;
                    spark.clone()
                }
                None => {
                    debug!("pooled spark has no typed handle; dropped");
                    return;
                }
            },
        };

        spark.borrow_mut().launch(at, velocity);
        world.add(SPARK_KIND, entity);
        self.live_sparks.push(spark);
    }

    /// Take spent sparks out of the world and park them for reuse.
    fn retire_sparks(&mut self, world: &mut World) {
        let (spent, live): (Vec<_>, Vec<_>) = self
            .live_sparks
            .drain(..)
            .partition(|spark| spark.borrow().spent());
        self.live_sparks = live;
        for spark in spent {
            world.remove(spark.clone());
            world.recycle(SPARK_KIND, spark);
        }
    }
}

impl Game for BounceDemo {
    fn create(&mut self, world: &mut World, ctx: &mut FrameContext) {
        let max = (self.bounds - Vec2::splat(BOX_SIZE)).max(Vec2::ZERO);
        for _ in 0..self.box_count {
            let position = Vec2::new(ctx.random() as f32, ctx.random() as f32) * max;
            let angle = ctx.random() as f32 * TAU;
            let speed = MIN_SPEED + ctx.random() as f32 * (MAX_SPEED - MIN_SPEED);
            let bouncer = Rc::new(RefCell::new(Bouncer::new(
                position,
                Vec2::from_angle(angle) * speed,
                self.bounds,
            )));
            world.add(BOX_KIND, bouncer.clone());
            self.boxes.push(bouncer);
        }
        info!(
            boxes = self.box_count,
            width = self.bounds.x,
            height = self.bounds.y,
            "bounce demo created"
        );
    }

    fn update(&mut self, world: &mut World, dt: f64, ctx: &mut FrameContext) {
        world.update(dt, ctx);

        let mut hits = Vec::new();
        for bouncer in &self.boxes {
            if let Some(at) = bouncer.borrow_mut().take_hit() {
                hits.push((bouncer.clone(), at));
            }
        }
        for (bouncer, at) in hits {
            self.bounces += 1;
            let entity: EntityRef = bouncer;
            world.bring_to_front(&entity);
            self.spawn_spark(world, ctx, at);
        }

        self.retire_sparks(world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use runt_sim::{Engine, TimeSource};

    use crate::headless::HeadlessBackend;

    /// Advances by a constant step on every read.
    struct Ticker {
        now: f64,
        step: f64,
    }

    impl TimeSource for Ticker {
        fn now_secs(&mut self) -> f64 {
            let now = self.now;
            self.now += self.step;
            now
        }
    }

    fn run(seed: u64, frames: u64) -> Engine<BounceDemo, HeadlessBackend, Ticker> {
        let config = EngineConfig {
            seed,
            ..Default::default()
        };
        let game = BounceDemo::new(&config, 8);
        let backend = HeadlessBackend::unpaced(Some(frames));
        let time = Ticker {
            now: 0.0,
            step: 1.0 / 60.0,
        };
        let mut engine = Engine::new(&config, game, backend, time).unwrap();
        engine.run();
        engine
    }

    #[test]
    fn test_boxes_stay_in_bounds() {
        let engine = run(7, 1200);
        let max = engine.game().bounds() - Vec2::splat(BOX_SIZE);
        for p in engine.game().box_positions() {
            assert!(p.x >= 0.0 && p.x <= max.x, "x out of bounds: {p}");
            assert!(p.y >= 0.0 && p.y <= max.y, "y out of bounds: {p}");
        }
        assert_eq!(engine.backend().frames(), 1200);
    }

    #[test]
    fn test_same_seed_same_run() {
        let a = run(42, 300);
        let b = run(42, 300);
        assert_eq!(a.game().box_positions(), b.game().box_positions());
        assert_eq!(a.game().bounces(), b.game().bounces());

        let c = run(43, 300);
        assert_ne!(a.game().box_velocities(), c.game().box_velocities());
    }

    #[test]
    fn test_sparks_are_pooled_and_reused() {
        let mut engine = run(11, 1200);
        let game = engine.game();
        assert!(game.bounces() > 0);
        assert_eq!(game.bounces(), game.sparks_built() + game.sparks_reused());
        assert!(game.sparks_reused() > 0);

        let live = game.live_sparks();
        let built = game.sparks_built();
        let world = engine.world_mut();
        assert_eq!(world.type_count(SPARK_KIND), live);
        assert_eq!(world.pooled(SPARK_KIND) + live, built as usize);
        assert_eq!(world.type_count(BOX_KIND), 8);
    }

    #[test]
    fn test_every_live_entity_is_drawn() {
        let mut engine = run(3, 120);
        let live = engine.world_mut().count();
        assert_eq!(engine.backend().last_draws(), live);
    }

    #[test]
    fn test_bouncer_reflects_off_walls() {
        let mut world = World::new();
        let mut ctx = FrameContext::new(world.queue(), 1);
        let bounds = Vec2::new(100.0, 100.0);
        let bouncer = Rc::new(RefCell::new(Bouncer::new(
            Vec2::new(80.0, 2.0),
            Vec2::new(10.0, -4.0),
            bounds,
        )));
        world.add(BOX_KIND, bouncer.clone());
        world.update(1.0, &mut ctx);

        let mut b = bouncer.borrow_mut();
        // x: 90 reflects off 84 to 78; y: -2 reflects to 2.
        assert_eq!(b.position(), Vec2::new(78.0, 2.0));
        assert_eq!(b.velocity(), Vec2::new(-10.0, 4.0));
        assert!(b.take_hit().is_some());
        assert!(b.take_hit().is_none());
    }

    #[test]
    fn test_spark_expires() {
        let mut world = World::new();
        let mut ctx = FrameContext::new(world.queue(), 1);
        let mut spark = Spark::new();
        assert!(spark.spent());
        spark.launch(Vec2::ZERO, Vec2::X);
        assert!(!spark.spent());
        spark.update(0.2, &mut ctx);
        assert!(!spark.spent());
        spark.update(0.1, &mut ctx);
        assert!(spark.spent());
        assert_eq!(world.count(), 0);
    }
}
