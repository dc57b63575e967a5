//! The entity contract.
//!
//! Entities are heap-allocated and shared between the world and any game
//! code that keeps a handle. Identity is the address of the shared
//! allocation, never structural equality.

use std::cell::RefCell;
use std::rc::Rc;

use crate::context::FrameContext;
use crate::render::Canvas;
use crate::types::Layer;

/// A simulation object driven by the world.
pub trait Entity {
    /// Advance by `dt` seconds.
    fn update(&mut self, dt: f64, ctx: &mut FrameContext);

    /// Draw the current state.
    fn render(&self, ctx: &FrameContext, canvas: &mut dyn Canvas);

    /// Layer this entity belongs to. Read once when it is queued for addition.
    fn layer(&self) -> Layer;

    /// Interpolation capability, if this entity supports it.
    fn interpolated(&mut self) -> Option<&mut dyn Interpolate> {
        None
    }
}

/// State that can be blended between two fixed steps.
pub trait Interpolate {
    /// Capture the current state as the "previous" state.
    /// Called once per frame before any fixed step runs.
    fn snapshot(&mut self);
}

/// Shared handle to a live or pooled entity.
pub type EntityRef = Rc<RefCell<dyn Entity>>;

/// Address-based identity of an entity allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityKey(usize);

impl EntityKey {
    pub fn of(entity: &EntityRef) -> Self {
        Self(Rc::as_ptr(entity) as *const () as usize)
    }
}

/// Wrap a concrete entity into a shared handle.
pub fn share<E: Entity + 'static>(entity: E) -> EntityRef {
    Rc::new(RefCell::new(entity))
}

/// True if both handles point at the same allocation.
pub fn same_entity(a: &EntityRef, b: &EntityRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
