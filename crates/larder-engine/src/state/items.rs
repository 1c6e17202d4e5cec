//! # Item Store
//!
//! The in-memory item collection, newest first.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Item Store Operations                                │
//! │                                                                         │
//! │  insert_front(item) ──────► items.insert(0, item)                      │
//! │  with_item_mut(id, f) ────► f(&mut items[i]) if the id exists          │
//! │  remove(id) ──────────────► items.retain(id != ..)                     │
//! │  replace_all(items) ──────► whole collection swapped (import, load)    │
//! │                                                                         │
//! │  restock_list() ──────────► quantity <= threshold, collection order    │
//! │  sorted_for_display() ────► low stock first, then updatedAt desc       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::cmp::Reverse;
use std::sync::{Arc, Mutex};

use larder_core::Item;

/// Shared, lock-protected item collection.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    items: Arc<Mutex<Vec<Item>>>,
}

impl ItemStore {
    /// Creates a store holding `items`.
    pub fn new(items: Vec<Item>) -> Self {
        ItemStore {
            items: Arc::new(Mutex::new(items)),
        }
    }

    /// Executes a function with read access to the collection.
    pub fn with_items<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[Item]) -> R,
    {
        let items = self.items.lock().expect("Items mutex poisoned");
        f(&items)
    }

    /// Executes a function with write access to the collection.
    pub fn with_items_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Vec<Item>) -> R,
    {
        let mut items = self.items.lock().expect("Items mutex poisoned");
        f(&mut items)
    }

    /// Executes a function on the item with `id`, if present.
    pub fn with_item_mut<F, R>(&self, id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut Item) -> R,
    {
        self.with_items_mut(|items| items.iter_mut().find(|i| i.id == id).map(f))
    }

    /// Adds an item at the front of the collection.
    pub fn insert_front(&self, item: Item) {
        self.with_items_mut(|items| items.insert(0, item));
    }

    /// Removes the item with `id`. Returns true if one was removed.
    pub fn remove(&self, id: &str) -> bool {
        self.with_items_mut(|items| {
            let before = items.len();
            items.retain(|i| i.id != id);
            items.len() != before
        })
    }

    /// Replaces the whole collection.
    pub fn replace_all(&self, new_items: Vec<Item>) {
        self.with_items_mut(|items| *items = new_items);
    }

    /// Returns a copy of the item with `id`.
    pub fn get(&self, id: &str) -> Option<Item> {
        self.with_items(|items| items.iter().find(|i| i.id == id).cloned())
    }

    /// Returns a copy of the collection.
    pub fn snapshot(&self) -> Vec<Item> {
        self.with_items(|items| items.to_vec())
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.with_items(|items| items.len())
    }

    /// Returns true if there are no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Items at or below their threshold, in collection order.
    pub fn restock_list(&self) -> Vec<Item> {
        self.with_items(|items| items.iter().filter(|i| i.is_low_stock()).cloned().collect())
    }

    /// Items ordered for display: low stock first, then most recently
    /// updated first.
    pub fn sorted_for_display(&self) -> Vec<Item> {
        let mut items = self.snapshot();
        items.sort_by_key(|i| (!i.is_low_stock(), Reverse(i.updated_at)));
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use larder_core::NewItem;

    fn item(name: &str, quantity: u32, threshold: u32, minutes: i64) -> Item {
        let at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap() + Duration::minutes(minutes);
        Item::create(NewItem::new(name, quantity).threshold(threshold), at)
    }

    #[test]
    fn test_insert_front_and_remove() {
        let store = ItemStore::default();
        let first = item("Tea", 3, 1, 0);
        let second = item("Salt", 1, 1, 1);
        store.insert_front(first.clone());
        store.insert_front(second.clone());

        assert_eq!(store.snapshot()[0].id, second.id);
        assert!(store.remove(&first.id));
        assert!(!store.remove(&first.id));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_with_item_mut_missing_id() {
        let store = ItemStore::new(vec![item("Tea", 3, 1, 0)]);
        assert!(store.with_item_mut("nope", |i| i.quantity = 0).is_none());
        assert_eq!(store.snapshot()[0].quantity, 3);
    }

    #[test]
    fn test_restock_list_is_inclusive() {
        let store = ItemStore::new(vec![
            item("Tea", 3, 1, 0),
            item("Salt", 1, 1, 0),
            item("Rice", 0, 2, 0),
        ]);
        let names: Vec<_> = store.restock_list().into_iter().map(|i| i.name).collect();
        assert_eq!(names, ["Salt", "Rice"]);
    }

    #[test]
    fn test_sorted_for_display() {
        let store = ItemStore::new(vec![
            item("Old ok", 9, 1, 0),
            item("New ok", 9, 1, 10),
            item("Old low", 0, 1, 1),
            item("New low", 1, 1, 5),
        ]);
        let names: Vec<_> = store
            .sorted_for_display()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, ["New low", "Old low", "New ok", "Old ok"]);
    }
}
