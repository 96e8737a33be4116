//! Scene registry: the ordered list of placed items.
//!
//! Vector order is z-order. Index 0 is drawn first (bottom); the last item is
//! drawn last and wins hit-tests. Picking an item promotes it to the end.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use crate::geometry::{Point, overlaps};
use crate::item::{ConnectionMatch, Item, ItemId};

/// In-memory, z-ordered store of items.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    items: Vec<Item>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append an item on top of everything else.
    pub fn add(&mut self, item: Item) -> ItemId {
        let id = item.id;
        self.items.push(item);
        id
    }

    /// Remove an item by id, returning it if it was present.
    ///
    /// Previews on other items that point at the removed item are cleared.
    pub fn remove(&mut self, id: &ItemId) -> Option<Item> {
        let idx = self.index_of(id)?;
        let removed = self.items.remove(idx);
        for item in &mut self.items {
            if item.connection.is_some_and(|m| m.partner == *id) {
                item.connection = None;
            }
        }
        Some(removed)
    }

    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == *id)
    }

    pub fn get_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == *id)
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.index_of(id).is_some()
    }

    /// Position of an item in z-order (0 = bottom).
    #[must_use]
    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|i| i.id == *id)
    }

    /// Move an item to the top of the z-order. Returns false if absent.
    pub fn promote(&mut self, id: &ItemId) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let item = self.items.remove(idx);
        self.items.push(item);
        true
    }

    /// Topmost item under `pt`, without changing the order.
    #[must_use]
    pub fn topmost_at(&self, pt: Point) -> Option<ItemId> {
        self.items.iter().rev().find(|i| i.contains_point(pt)).map(|i| i.id)
    }

    /// Topmost item under `pt`, promoted to the top of the z-order.
    pub fn hit_test(&mut self, pt: Point) -> Option<ItemId> {
        let id = self.topmost_at(pt)?;
        self.promote(&id);
        Some(id)
    }

    /// First other item, bottom to top, whose bounds overlap `id`'s bounds.
    #[must_use]
    pub fn first_overlap(&self, id: &ItemId) -> Option<ItemId> {
        let bounds = self.get(id)?.bounds();
        self.items
            .iter()
            .filter(|i| i.id != *id)
            .find(|i| overlaps(&bounds, &i.bounds()))
            .map(|i| i.id)
    }

    /// The live preview on `item`, if its partner still exists.
    #[must_use]
    pub fn live_match(&self, item: &Item) -> Option<ConnectionMatch> {
        item.connection.filter(|m| self.contains(&m.partner))
    }

    /// The stationary item currently previewing a connection with `dragged`.
    #[must_use]
    pub fn match_holder(&self, dragged: &ItemId) -> Option<(&Item, ConnectionMatch)> {
        self.items
            .iter()
            .filter(|i| i.id != *dragged)
            .find_map(|i| self.live_match(i).filter(|m| m.partner == *dragged).map(|m| (i, m)))
    }

    /// Items in draw order, bottom first.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Item> {
        self.items.iter_mut()
    }

    /// Number of items currently in the scene.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the scene contains no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
