//! Id-keyed entity storage with two-phase removal.
//!
//! [`EntityStore`] keeps entities in a dense slot vector addressed by
//! [`EntityId::index`]. Removal is split in two steps: entities are first
//! *marked* (they stay readable, and their ids stay allocated) and then
//! physically dropped by an explicit [`EntityStore::commit`]. Only committed
//! removals release ids for reuse, so ids handed out while removals are
//! pending can never alias an entity that is still logically alive.
//!
//! Id generation is deterministic: the lowest released id is reused first,
//! fresh ids are appended after the highest id ever handed out.

use std::collections::BTreeSet;

use crate::mesh_error::MeshError;
use crate::topology::id::EntityId;

/// Dense id-keyed store of patch entities.
#[derive(Clone, Debug)]
pub struct EntityStore<T> {
    slots: Vec<Option<T>>,
    /// Released (or skipped) slots available for reuse.
    free: BTreeSet<usize>,
    /// One past the highest slot ever handed out or occupied.
    high_water: usize,
    pending: BTreeSet<EntityId>,
    len: usize,
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: BTreeSet::new(),
            high_water: 0,
            pending: BTreeSet::new(),
            len: 0,
        }
    }
}

impl<T> EntityStore<T> {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entities, including those pending removal.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no entity is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reserve a fresh id. The id stays reserved until an entity is inserted
    /// with it (or forever, if none is).
    pub fn generate_id(&mut self) -> EntityId {
        let idx = match self.free.pop_first() {
            Some(idx) => idx,
            None => {
                self.high_water += 1;
                self.high_water - 1
            }
        };
        EntityId::from_index(idx)
    }

    /// Insert `value` under `id`.
    pub fn insert(&mut self, id: EntityId, value: T) -> Result<(), MeshError> {
        let idx = id.index();
        if self.slots.get(idx).is_some_and(Option::is_some) {
            return Err(MeshError::DuplicateEntity(id));
        }
        if idx >= self.slots.len() {
            self.slots.resize_with(idx + 1, || None);
        }
        if idx >= self.high_water {
            self.free.extend(self.high_water..idx);
            self.high_water = idx + 1;
        } else {
            self.free.remove(&idx);
        }
        self.slots[idx] = Some(value);
        self.len += 1;
        Ok(())
    }

    /// Insert `value` under a freshly generated id.
    pub fn push(&mut self, make: impl FnOnce(EntityId) -> T) -> EntityId {
        let id = self.generate_id();
        let idx = id.index();
        if idx >= self.slots.len() {
            self.slots.resize_with(idx + 1, || None);
        }
        self.slots[idx] = Some(make(id));
        self.len += 1;
        id
    }

    /// Whether an entity is stored under `id`.
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// The entity stored under `id`, pending removal or not.
    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Mutable access to the entity stored under `id`.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Mark `id` for removal at the next [`EntityStore::commit`].
    ///
    /// Returns `false` when no entity is stored under `id`.
    pub fn mark_for_removal(&mut self, id: EntityId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.pending.insert(id);
        true
    }

    /// Physically remove every marked entity and release their ids.
    ///
    /// Returns the removed entities in id order.
    pub fn commit(&mut self) -> Vec<(EntityId, T)> {
        let pending = std::mem::take(&mut self.pending);
        let mut removed = Vec::with_capacity(pending.len());
        for id in pending {
            if let Some(value) = self.slots.get_mut(id.index()).and_then(Option::take) {
                self.free.insert(id.index());
                self.len -= 1;
                removed.push((id, value));
            }
        }
        removed
    }

    /// Drop every entity and forget all ids.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Iterate `(id, entity)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|v| (EntityId::from_index(idx), v)))
    }

    /// Iterate `(id, entity)` pairs mutably in id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> + '_ {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_mut().map(|v| (EntityId::from_index(idx), v)))
    }

    /// Ids in increasing order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.iter().map(|(id, _)| id)
    }
}
