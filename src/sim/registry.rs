//! Handle-based entity registry
//!
//! Each archetype owns one registry. Handles stay stable for the entity's
//! lifetime; `destroy` is idempotent and takes effect immediately, so a
//! destroyed entity is skipped by every later pass in the same tick.
//! Inactive slots are compacted by `sweep()` at the end of the tick.

use serde::{Deserialize, Serialize};

/// Stable identifier for a live entity within one registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityHandle(pub u32);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry<T> {
    id: u32,
    active: bool,
    data: T,
}

/// Collection of live entities of one archetype
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity under a caller-allocated id
    pub fn spawn(&mut self, id: u32, data: T) -> EntityHandle {
        self.entries.push(Entry { id, active: true, data });
        EntityHandle(id)
    }

    /// Deactivate an entity. No-op if the handle is unknown or already
    /// destroyed. Returns whether a live entity was destroyed.
    pub fn destroy(&mut self, handle: EntityHandle) -> bool {
        match self.entries.iter_mut().find(|e| e.id == handle.0) {
            Some(entry) if entry.active => {
                entry.active = false;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, handle: EntityHandle) -> Option<&T> {
        self.entries
            .iter()
            .find(|e| e.id == handle.0 && e.active)
            .map(|e| &e.data)
    }

    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find(|e| e.id == handle.0 && e.active)
            .map(|e| &mut e.data)
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (EntityHandle, &T)> {
        self.entries
            .iter()
            .filter(|e| e.active)
            .map(|e| (EntityHandle(e.id), &e.data))
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (EntityHandle, &mut T)> {
        self.entries
            .iter_mut()
            .filter(|e| e.active)
            .map(|e| (EntityHandle(e.id), &mut e.data))
    }

    pub fn count_active(&self) -> usize {
        self.entries.iter().filter(|e| e.active).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count_active() == 0
    }

    /// Deactivate every entity failing the predicate (bounds culling)
    pub fn destroy_where(&mut self, mut doomed: impl FnMut(&T) -> bool) {
        for entry in self.entries.iter_mut().filter(|e| e.active) {
            if doomed(&entry.data) {
                entry.active = false;
            }
        }
    }

    /// Drop inactive slots. Call once per tick, after all passes ran.
    pub fn sweep(&mut self) {
        self.entries.retain(|e| e.active);
    }

    /// Deactivate and drop everything
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
