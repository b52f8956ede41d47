//! An insertion-ordered map where the first value stored for a key wins.
//!
//! The dictionary bridge, the frequency list adapter and both dedup passes of the
//! reconciliation pipeline all keep the earliest occurrence of a key and silently
//! drop later ones. They share this type so the rule cannot drift between them.

use std::hash::Hash;

use indexmap::IndexMap;
use indexmap::map::Entry;

#[derive(Clone, PartialEq, Eq)]
pub struct FirstSeen<K: Hash + Eq, V> {
    inner: IndexMap<K, V>,
}

impl<K: Hash + Eq, V> FirstSeen<K, V> {
    /// Creates a new empty map
    pub fn new() -> Self {
        Self {
            inner: IndexMap::new(),
        }
    }

    /// Returns the number of distinct keys
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if the map contains no elements
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Inserts a key-value pair unless the key is already present.
    ///
    /// Returns true if the pair was stored. An existing value is never replaced.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        match self.inner.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized + Hash + indexmap::Equivalent<K>,
    {
        self.inner.get(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + indexmap::Equivalent<K>,
    {
        self.inner.contains_key(key)
    }

    /// Returns an iterator over the key-value pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.inner.iter()
    }

    /// Returns an iterator over the keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.inner.keys()
    }

    /// Consumes the map, yielding values in insertion order
    pub fn into_values(self) -> impl Iterator<Item = V> {
        self.inner.into_values()
    }
}

impl<K: Hash + Eq, V> Default for FirstSeen<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for FirstSeen<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K: Hash + Eq, V> IntoIterator for FirstSeen<K, V> {
    type Item = (K, V);
    type IntoIter = indexmap::map::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<K: Hash + Eq + std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for FirstSeen<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.inner.iter()).finish()
    }
}

/// Keeps the first item for each key, preserving input order.
pub fn dedup_first_seen<T, K, F>(items: impl IntoIterator<Item = T>, mut key: F) -> Vec<T>
where
    K: Hash + Eq,
    F: FnMut(&T) -> K,
{
    let mut seen = FirstSeen::new();
    for item in items {
        seen.insert(key(&item), item);
    }
    seen.into_values().collect()
}
