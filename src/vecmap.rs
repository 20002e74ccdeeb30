//! An insertion-ordered map used for JKSN objects.
//!
//! JKSN object keys can be any value, including floats and nested containers. The map keeps
//! the wire order of its keys and looks them up by hash, so decoding an object costs time
//! linear in its size.
//!
//! # Example
//!
//! ```
//! use jksn::prelude::*;
//!
//! let mut vmap = VecMap::new();
//! vmap.insert("a", 1);
//! vmap.insert("b", 2);
//!
//! // overwriting keeps the original position
//! vmap.insert("a", 3);
//!
//! assert_eq!(vmap.iter().map(|(k, _)| *k).collect::<Vec<_>>(), vec!["a", "b"]);
//! assert_eq!(vmap.get(&"a"), Some(&3));
//! ```

use indexmap::{map, IndexMap};
use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    iter::FromIterator,
};

#[derive(Clone, Debug)]
/// A map that remembers insertion order.
///
/// Equality is map equality: two `VecMap`s are equal when they hold the same keys with the
/// same values, regardless of order. Hashing agrees with that.
///
/// See also: [module level documentation](`crate::vecmap`).
pub struct VecMap<K, V>(IndexMap<K, V>);

impl<K, V> VecMap<K, V> {
    /// Creates an empty map.
    pub fn new() -> Self { VecMap(IndexMap::new()) }

    /// Creates an empty map with room for `cap` entries.
    pub fn with_capacity(cap: usize) -> Self { VecMap(IndexMap::with_capacity(cap)) }

    /// Returns length.
    ///
    /// # Example
    ///
    /// ```
    /// use jksn::prelude::*;
    ///
    /// let vmap: VecMap<_, _> = vec![("foo", "bar")].into_iter().collect();
    ///
    /// assert_eq!(vmap.len(), 1);
    /// ```
    pub fn len(&self) -> usize { self.0.len() }

    /// Indicates whether the [`VecMap`] is empty.
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Iterates over the key value pairs, in insertion order.
    pub fn iter(&self) -> map::Iter<K, V> { self.0.iter() }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> map::Keys<K, V> { self.0.keys() }

    /// Iterates over the values in insertion order.
    pub fn values(&self) -> map::Values<K, V> { self.0.values() }

    /// Consumes the map, returning the pairs in insertion order.
    pub fn into_vec(self) -> Vec<(K, V)> { self.0.into_iter().collect() }
}

impl<K: Hash + Eq, V> VecMap<K, V> {
    /// Inserts a pair. An existing key keeps its position and gets the new value; the old
    /// value is returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> { self.0.insert(key, value) }

    /// Looks up the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> { self.0.get(key) }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &K) -> bool { self.0.contains_key(key) }

    /// Removes `key`, returning its value. Later entries move up one place.
    pub fn remove(&mut self, key: &K) -> Option<V> { self.0.shift_remove(key) }
}

impl<K, V> Default for VecMap<K, V> {
    fn default() -> Self { VecMap::new() }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for VecMap<K, V> {
    fn eq(&self, other: &Self) -> bool { self.0 == other.0 }
}

impl<K: Hash + Eq, V: Eq> Eq for VecMap<K, V> {}

/// Entries are hashed one by one and summed, so the result does not depend on order.
impl<K: Hash, V: Hash> Hash for VecMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut sum = 0u64;
        for entry in self.0.iter() {
            let mut h = DefaultHasher::new();
            entry.hash(&mut h);
            sum = sum.wrapping_add(h.finish());
        }
        state.write_usize(self.len());
        state.write_u64(sum);
    }
}

impl<K: Hash + Eq, V> From<Vec<(K, V)>> for VecMap<K, V> {
    fn from(v: Vec<(K, V)>) -> Self { v.into_iter().collect() }
}

impl<K, V> IntoIterator for VecMap<K, V> {
    type IntoIter = map::IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> map::IntoIter<K, V> { self.0.into_iter() }
}

impl<'a, K, V> IntoIterator for &'a VecMap<K, V> {
    type IntoIter = map::Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> map::Iter<'a, K, V> { self.0.iter() }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for VecMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> VecMap<K, V> {
        let iter = iter.into_iter();
        let mut out = VecMap::with_capacity(iter.size_hint().0);
        for (k, v) in iter {
            out.insert(k, v);
        }
        out
    }
}
