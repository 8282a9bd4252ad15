//! Selected keys and their drag offsets

use indexmap::IndexSet;
use rustc_hash::FxHashMap;

use crate::track::KeyId;

/// Ordered set of selected keys
///
/// Each key may carry a horizontal offset, in pixels, from the pointer to the
/// key at the moment the drag was armed.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    keys: IndexSet<KeyId>,
    offsets: FxHashMap<KeyId, f64>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: KeyId) -> bool {
        self.keys.contains(&key)
    }

    pub fn first(&self) -> Option<KeyId> {
        self.keys.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = KeyId> + '_ {
        self.keys.iter().copied()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.offsets.clear();
    }

    pub fn insert(&mut self, key: KeyId, offset: f64) {
        self.keys.insert(key);
        self.offsets.insert(key, offset);
    }

    /// Select exactly `key`
    pub fn set_single(&mut self, key: KeyId, offset: f64) {
        self.clear();
        self.insert(key, offset);
    }

    pub fn offset(&self, key: KeyId) -> f64 {
        self.offsets.get(&key).copied().unwrap_or(0.0)
    }
}
