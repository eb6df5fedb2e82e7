//! Immutable key/value pair stored in map buckets.

use crate::key::Key;

/// A key/value relationship. The key is `None` for the absent key.
///
/// Pairs are never mutated once stored; `KeyMap::put` replaces the whole pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair<K, V> {
    key: Option<K>,
    value: V,
}

impl<K, V> Pair<K, V> {
    pub fn new(key: Option<K>, value: V) -> Self {
        Self { key, value }
    }

    #[inline]
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_parts(self) -> (Option<K>, V) {
        (self.key, self.value)
    }

    pub(crate) fn into_value(self) -> V {
        self.value
    }
}

impl<K: Key, V> Pair<K, V> {
    /// Hash code of the key, `0` for the absent key.
    #[inline]
    pub fn hash_code(&self) -> i64 {
        hash_of(self.key())
    }

    /// Whether this pair's key equals `key`; two absent keys are equal.
    #[inline]
    pub fn matches(&self, key: Option<&K>) -> bool {
        keys_equal(self.key(), key)
    }
}

#[inline]
pub(crate) fn hash_of<K: Key>(key: Option<&K>) -> i64 {
    key.map_or(0, Key::hash_code)
}

pub(crate) fn keys_equal<K: Key>(a: Option<&K>, b: Option<&K>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.equals(b.as_any()),
        _ => false,
    }
}
