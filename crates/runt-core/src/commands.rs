//! Deferred world mutations.
//!
//! Adds and removes are queued here and only become observable when the
//! world flushes. The queue is a shared handle, so entities can queue
//! mutations while the world is iterating over them.

use std::cell::RefCell;
use std::rc::Rc;

use crate::entity::EntityRef;
use crate::types::{EntityKind, Layer};

/// An addition waiting for the next flush.
pub struct PendingAdd {
    pub kind: EntityKind,
    /// Layer read at enqueue time. `None` when the entity was mutably
    /// borrowed (it queued itself from inside its own update); the layer
    /// is then read at flush.
    pub layer: Option<Layer>,
    pub entity: EntityRef,
}

/// Both queues, in call order.
#[derive(Default)]
pub struct PendingOps {
    pub adds: Vec<PendingAdd>,
    pub removes: Vec<EntityRef>,
}

impl PendingOps {
    pub fn is_empty(&self) -> bool {
        self.adds.is_empty() && self.removes.is_empty()
    }
}

/// Cloneable handle to the world's add/remove queues.
#[derive(Clone, Default)]
pub struct WorldQueue {
    inner: Rc<RefCell<PendingOps>>,
}

impl WorldQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `entity` for addition at the next flush.
    pub fn add(&self, kind: impl Into<EntityKind>, entity: EntityRef) {
        let layer = entity.try_borrow().ok().map(|e| e.layer());
        self.inner.borrow_mut().adds.push(PendingAdd {
            kind: kind.into(),
            layer,
            entity,
        });
    }

    /// Queue `entity` for removal at the next flush.
    pub fn remove(&self, entity: EntityRef) {
        self.inner.borrow_mut().removes.push(entity);
    }

    pub fn pending_adds(&self) -> usize {
        self.inner.borrow().adds.len()
    }

    pub fn pending_removes(&self) -> usize {
        self.inner.borrow().removes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Take both queues, leaving them empty.
    pub fn take(&self) -> PendingOps {
        std::mem::take(&mut *self.inner.borrow_mut())
    }
}
