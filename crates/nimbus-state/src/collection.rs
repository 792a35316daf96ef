//! Normalized entity collection with a stable display order.

use std::collections::HashMap;

use nimbus_entity::Keyed;

/// An id → entity map plus the order items are shown in.
///
/// Ids are unique. `upsert` puts new items at the head and replaces
/// existing ones in place; `remove` of an absent id is a no-op. Every
/// operation is idempotent under repetition.
#[derive(Debug, Clone)]
pub struct Collection<T: Keyed> {
    order: Vec<T::Id>,
    items: HashMap<T::Id, T>,
}

impl<T: Keyed> Default for Collection<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            items: HashMap::new(),
        }
    }
}

impl<T: Keyed> Collection<T> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection. Duplicate ids keep the first occurrence.
    pub fn set_all(&mut self, items: impl IntoIterator<Item = T>) {
        self.order.clear();
        self.items.clear();
        for item in items {
            let id = item.id().clone();
            if self.items.contains_key(&id) {
                continue;
            }
            self.order.push(id.clone());
            self.items.insert(id, item);
        }
    }

    /// Insert a new item at the head, or replace an existing one in place.
    pub fn upsert(&mut self, item: T) {
        let id = item.id().clone();
        if self.items.insert(id.clone(), item).is_none() {
            self.order.insert(0, id);
        }
    }

    /// Remove an item. Returns it if it was present.
    pub fn remove(&mut self, id: &T::Id) -> Option<T> {
        let removed = self.items.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(removed)
    }

    /// Look up an item by id.
    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.get(id)
    }

    /// Whether an item with this id is present.
    pub fn contains(&self, id: &T::Id) -> bool {
        self.items.contains_key(id)
    }

    /// Items in display order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// Owned copy of the items in display order.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drop every item.
    pub fn clear(&mut self) {
        self.order.clear();
        self.items.clear();
    }
}
