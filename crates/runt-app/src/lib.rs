//! runt headless demo.
//!
//! Wires the simulation crates to a window-less backend and a small
//! bouncing-box game so the loop can be run and inspected from a terminal.

pub mod demo;
pub mod error;
pub mod headless;

pub use runt_core as core;
