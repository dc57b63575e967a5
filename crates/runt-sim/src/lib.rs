//! Simulation core for runt.
//!
//! Owns the layered entity container, the fixed/variable-step clock and the
//! frame loop that ties them to a game and a rendering backend.

pub mod clock;
pub mod engine;
pub mod stats;
pub mod world;

pub use clock::{FrameTick, SimulationClock};
pub use engine::{Backend, Engine, Game, SystemClock, TimeSource};
pub use runt_core as core;
pub use world::World;
