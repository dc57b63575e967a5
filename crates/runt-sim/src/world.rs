//! Layered entity container.
//!
//! `World` owns every live entity, grouped by layer and kept in ascending
//! layer order, then insertion order. Mutation is deferred: `add` and
//! `remove` go through a shared [`WorldQueue`] and only take effect at
//! [`World::flush`], which every read and traversal calls first.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, trace};

use runt_core::commands::{PendingAdd, PendingOps, WorldQueue};
use runt_core::constants::LAYER_CAPACITY;
use runt_core::context::FrameContext;
use runt_core::entity::{same_entity, EntityKey, EntityRef};
use runt_core::render::Canvas;
use runt_core::types::{EntityKind, Layer};

/// A live entity and the kind it was added under.
struct Slot {
    kind: EntityKind,
    entity: EntityRef,
}

pub struct World {
    layers: BTreeMap<Layer, Vec<Slot>>,
    /// Layer each live entity was stored under.
    residence: HashMap<EntityKey, Layer>,
    queue: WorldQueue,
    pool: HashMap<EntityKind, Vec<EntityRef>>,
    type_counts: HashMap<EntityKind, usize>,
    len: usize,
}

impl World {
    pub fn new() -> Self {
        Self {
            layers: BTreeMap::new(),
            residence: HashMap::new(),
            queue: WorldQueue::new(),
            pool: HashMap::new(),
            type_counts: HashMap::new(),
            len: 0,
        }
    }

    /// Handle onto this world's add/remove queues.
    pub fn queue(&self) -> WorldQueue {
        self.queue.clone()
    }

    /// Queue `entity` for addition at the next flush.
    pub fn add(&self, kind: impl Into<EntityKind>, entity: EntityRef) {
        self.queue.add(kind, entity);
    }

    /// Queue `entity` for removal at the next flush.
    /// Removing something that is not live by then is a no-op.
    pub fn remove(&self, entity: EntityRef) {
        self.queue.remove(entity);
    }

    /// Apply queued removals, then queued additions.
    pub fn flush(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        let PendingOps { adds, removes } = self.queue.take();
        for entity in &removes {
            self.detach(entity);
        }
        for add in adds {
            self.attach(add);
        }
    }

    fn detach(&mut self, entity: &EntityRef) {
        let key = EntityKey::of(entity);
        let Some(layer) = self.residence.get(&key).copied() else {
            trace!("remove of an entity that is not live; ignored");
            return;
        };
        let Some(list) = self.layers.get_mut(&layer) else {
            return;
        };
        let Some(index) = list.iter().position(|s| same_entity(&s.entity, entity)) else {
            return;
        };

        let slot = list.remove(index);
        if list.is_empty() {
            self.layers.remove(&layer);
            trace!(layer, "layer emptied");
        }
        self.residence.remove(&key);
        self.len -= 1;

        if let Some(count) = self.type_counts.get_mut(&slot.kind) {
            *count -= 1;
            if *count == 0 {
                self.type_counts.remove(&slot.kind);
            }
        }
    }

    fn attach(&mut self, add: PendingAdd) {
        let PendingAdd {
            kind,
            layer,
            entity,
        } = add;
        let key = EntityKey::of(&entity);
        if self.residence.contains_key(&key) {
            trace!(%kind, "add of an entity that is already live; ignored");
            return;
        }
        let layer = layer.unwrap_or_else(|| entity.borrow().layer());

        self.layers
            .entry(layer)
            .or_insert_with(|| {
                debug!(layer, "layer created");
                Vec::with_capacity(LAYER_CAPACITY)
            })
            .push(Slot {
                kind: kind.clone(),
                entity,
            });
        self.residence.insert(key, layer);
        *self.type_counts.entry(kind).or_insert(0) += 1;
        self.len += 1;
    }

    fn live(&self) -> impl Iterator<Item = &EntityRef> {
        self.layers.values().flatten().map(|slot| &slot.entity)
    }

    // --- Traversal ---

    /// All live entities, ascending layer then insertion order.
    pub fn entities(&mut self) -> Vec<EntityRef> {
        self.flush();
        let mut all = Vec::with_capacity(self.len);
        all.extend(self.live().cloned());
        all
    }

    pub fn for_each(&mut self, mut f: impl FnMut(&EntityRef)) {
        self.flush();
        for entity in self.live() {
            f(entity);
        }
    }

    /// Run one update pass. Entities may queue adds/removes through `ctx`;
    /// they take effect at the next flush.
    pub fn update(&mut self, dt: f64, ctx: &mut FrameContext) {
        self.flush();
        for entity in self.live() {
            entity.borrow_mut().update(dt, ctx);
        }
    }

    /// Run one render pass, back to front.
    pub fn render(&mut self, ctx: &FrameContext, canvas: &mut dyn Canvas) {
        self.flush();
        for entity in self.live() {
            entity.borrow().render(ctx, canvas);
        }
    }

    /// Capture interpolation state on every entity that supports it.
    pub fn snapshot(&mut self) {
        self.flush();
        for entity in self.live() {
            let mut entity = entity.borrow_mut();
            if let Some(state) = entity.interpolated() {
                state.snapshot();
            }
        }
    }

    // --- Population ---

    pub fn count(&mut self) -> usize {
        self.flush();
        self.len
    }

    pub fn layer_count(&mut self, layer: Layer) -> usize {
        self.flush();
        self.layers.get(&layer).map_or(0, Vec::len)
    }

    pub fn type_count(&mut self, kind: &str) -> usize {
        self.flush();
        self.type_counts.get(kind).copied().unwrap_or(0)
    }

    /// Layers with at least one live entity, ascending.
    pub fn layers(&mut self) -> Vec<Layer> {
        self.flush();
        self.layers.keys().copied().collect()
    }

    pub fn contains(&mut self, entity: &EntityRef) -> bool {
        self.flush();
        self.residence.contains_key(&EntityKey::of(entity))
    }

    // --- Z-order within a layer ---

    fn locate(&mut self, entity: &EntityRef) -> Option<(&mut Vec<Slot>, usize)> {
        self.flush();
        let layer = *self.residence.get(&EntityKey::of(entity))?;
        let list = self.layers.get_mut(&layer)?;
        let index = list.iter().position(|s| same_entity(&s.entity, entity))?;
        Some((list, index))
    }

    /// Move to the end of its layer (drawn last, on top).
    /// Returns false if the entity is not live.
    pub fn bring_to_front(&mut self, entity: &EntityRef) -> bool {
        let Some((list, index)) = self.locate(entity) else {
            return false;
        };
        let slot = list.remove(index);
        list.push(slot);
        true
    }

    /// Move to the start of its layer (drawn first, underneath).
    pub fn send_to_back(&mut self, entity: &EntityRef) -> bool {
        let Some((list, index)) = self.locate(entity) else {
            return false;
        };
        let slot = list.remove(index);
        list.insert(0, slot);
        true
    }

    /// Swap with the next entity in its layer.
    pub fn bring_forward(&mut self, entity: &EntityRef) -> bool {
        let Some((list, index)) = self.locate(entity) else {
            return false;
        };
        if index + 1 < list.len() {
            list.swap(index, index + 1);
        }
        true
    }

    /// Swap with the previous entity in its layer.
    pub fn send_backward(&mut self, entity: &EntityRef) -> bool {
        let Some((list, index)) = self.locate(entity) else {
            return false;
        };
        if index > 0 {
            list.swap(index, index - 1);
        }
        true
    }

    // --- Pool ---

    /// Park a removed entity for reuse. Does not remove it from the world.
    pub fn recycle(&mut self, kind: impl Into<EntityKind>, entity: EntityRef) {
        self.pool.entry(kind.into()).or_default().push(entity);
    }

    /// Reuse the most recently recycled entity of `kind`, or build a new one.
    /// The result is not added to the world.
    pub fn create(&mut self, kind: &str, ctor: impl FnOnce() -> EntityRef) -> EntityRef {
        match self.pool.get_mut(kind).and_then(Vec::pop) {
            Some(entity) => entity,
            None => ctor(),
        }
    }

    pub fn pooled(&self, kind: &str) -> usize {
        self.pool.get(kind).map_or(0, Vec::len)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
