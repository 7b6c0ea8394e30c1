// Grouping engine: partition records into buckets by key, in first-seen order

use serde::{Serialize, Serializer};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Distinct keys in first-seen order with constant-time position lookup
#[derive(Debug, Clone)]
pub struct OrderedKeys<K> {
    keys: Vec<K>,
    index: HashMap<K, usize>,
}

impl<K: Clone + Eq + Hash> OrderedKeys<K> {
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert `key` if unseen; returns its position either way
    pub fn insert(&mut self, key: K) -> usize {
        if let Some(&pos) = self.index.get(&key) {
            return pos;
        }
        let pos = self.keys.len();
        self.index.insert(key.clone(), pos);
        self.keys.push(key);
        pos
    }

    pub fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).copied()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    pub fn get(&self, pos: usize) -> Option<&K> {
        self.keys.get(pos)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, K> {
        self.keys.iter()
    }

    pub fn as_slice(&self) -> &[K] {
        &self.keys
    }
}

impl<K: Clone + Eq + Hash> Default for OrderedKeys<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Eq + Hash> FromIterator<K> for OrderedKeys<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut keys = Self::new();
        for key in iter {
            keys.insert(key);
        }
        keys
    }
}

impl<K: PartialEq> PartialEq for OrderedKeys<K> {
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys
    }
}

impl<K: Serialize> Serialize for OrderedKeys<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.keys.serialize(serializer)
    }
}

/// Records partitioned by key. Bucket `i` belongs to `keys()[i]`.
#[derive(Debug, Clone)]
pub struct Groups<K, R> {
    keys: OrderedKeys<K>,
    buckets: Vec<Vec<R>>,
}

impl<K: Clone + Eq + Hash, R> Groups<K, R> {
    pub fn keys(&self) -> &[K] {
        self.keys.as_slice()
    }

    pub fn get(&self, key: &K) -> Option<&[R]> {
        self.keys.position(key).map(|pos| self.buckets[pos].as_slice())
    }

    /// Buckets in first-seen key order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[R])> {
        self.keys.iter().zip(self.buckets.iter().map(Vec::as_slice))
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of records across all buckets
    pub fn record_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

/// Partition `records` by `key_fn`. Every record lands in exactly one
/// bucket and no record is created or dropped.
pub fn group_by<K, R, I, F>(records: I, mut key_fn: F) -> Groups<K, R>
where
    K: Clone + Eq + Hash,
    I: IntoIterator<Item = R>,
    F: FnMut(&R) -> K,
{
    let mut keys = OrderedKeys::new();
    let mut buckets: Vec<Vec<R>> = Vec::new();

    for record in records {
        let pos = keys.insert(key_fn(&record));
        if pos == buckets.len() {
            buckets.push(Vec::new());
        }
        buckets[pos].push(record);
    }

    Groups { keys, buckets }
}

/// Partition `records` into buckets laid out in the order of `keys`.
/// Listed keys without records keep an empty bucket; the first record
/// whose key is not listed is returned as `Err(key)`.
pub fn group_by_keys<K, R, I, F>(keys: impl IntoIterator<Item = K>, records: I, mut key_fn: F) -> Result<Groups<K, R>, K>
where
    K: Clone + Eq + Hash,
    I: IntoIterator<Item = R>,
    F: FnMut(&R) -> K,
{
    let keys: OrderedKeys<K> = keys.into_iter().collect();
    let mut buckets: Vec<Vec<R>> = (0..keys.len()).map(|_| Vec::new()).collect();

    for record in records {
        let key = key_fn(&record);
        match keys.position(&key) {
            Some(pos) => buckets[pos].push(record),
            None => return Err(key),
        }
    }

    Ok(Groups { keys, buckets })
}
