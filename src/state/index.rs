//! Dual-keyed ordered storage.
//!
//! Entries are unique by identity key and iterate in a second, derived
//! order (e.g. creation order), so every walk over the graph is
//! deterministic.

use std::borrow::Borrow;
use std::collections::BTreeMap;

pub trait Indexed {
    type Key: Ord + Clone;
    type Order: Ord + Clone;

    fn key(&self) -> Self::Key;
    fn order(&self) -> Self::Order;
}

#[derive(Debug, Clone)]
pub struct OrderedIndex<V: Indexed> {
    by_key: BTreeMap<V::Key, V>,
    by_order: BTreeMap<V::Order, V::Key>,
}

impl<V: Indexed> Default for OrderedIndex<V> {
    fn default() -> Self {
        Self {
            by_key: BTreeMap::new(),
            by_order: BTreeMap::new(),
        }
    }
}

impl<V: Indexed> OrderedIndex<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry with the same key, returning the old one.
    pub fn insert(&mut self, value: V) -> Option<V> {
        let key = value.key();
        let previous = self.by_key.remove(&key);
        if let Some(old) = &previous {
            self.by_order.remove(&old.order());
        }
        self.by_order.insert(value.order(), key.clone());
        self.by_key.insert(key, value);
        previous
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        V::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.by_key.get(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        V::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.by_key.contains_key(key)
    }

    /// Mutate an entry in place; the derived order is recomputed afterwards.
    pub fn modify<Q, F>(&mut self, key: &Q, f: F) -> bool
    where
        V::Key: Borrow<Q>,
        Q: Ord + ?Sized,
        F: FnOnce(&mut V),
    {
        let Some(value) = self.by_key.get_mut(key) else {
            return false;
        };
        let before = value.order();
        f(value);
        let after = value.order();
        if before != after {
            let owned = value.key();
            self.by_order.remove(&before);
            self.by_order.insert(after, owned);
        }
        true
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Values in derived order.
    pub fn iter(&self) -> impl Iterator<Item = &V> + '_ {
        self.by_order.values().filter_map(move |k| self.by_key.get(k))
    }

    /// Keys in derived order.
    pub fn keys(&self) -> impl Iterator<Item = &V::Key> + '_ {
        self.by_order.values()
    }
}
