//! Core types and definitions for the runt simulation framework.
//!
//! This crate defines the vocabulary shared by the container, the clock and
//! the application: the entity traits, kinds and layers, the deferred
//! mutation queue, the per-frame context, configuration and errors.
//! It has no dependency on a window, renderer or runtime loop.

pub mod body;
pub mod commands;
pub mod config;
pub mod constants;
pub mod context;
pub mod entity;
pub mod error;
pub mod render;
pub mod types;
