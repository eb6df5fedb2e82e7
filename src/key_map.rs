//! KeyMap: buckets of pairs indexed by the keys' own hash codes.

use crate::cursor::Cursor;
use crate::key::Key;
use crate::pair::{hash_of, Pair};
use crate::reentrancy::DebugReentrancy;
use core::fmt;
use hashbrown::hash_map::{self, Entry};
use hashbrown::HashMap;
use std::collections::BTreeMap;
use tracing::{error, trace};

/// Rendering of the absent key in `KeyMap::serialize`.
pub const ABSENT_KEY_LABEL: &str = "<nil>";

/// Slots sharing one hash code. `None` slots are tombstones and are skipped
/// by every scan.
pub(crate) type Bucket<K, V> = Vec<Option<Pair<K, V>>>;

/// Hash map over keys that bring their own `hash_code` and `equals`.
///
/// Each hash code owns a bucket scanned linearly, so a poor hash function
/// degrades lookups to O(n). Buckets are created on first insert and dropped
/// once their last live pair is removed.
///
/// Not thread-safe: the map is `!Send` and `!Sync`.
pub struct KeyMap<K, V> {
    pub(crate) buckets: HashMap<i64, Bucket<K, V>>,
    pub(crate) size: usize,
    reentrancy: DebugReentrancy,
}

impl<K, V> KeyMap<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Pre-size the hash-code index for `buckets` distinct hash codes.
    pub fn with_capacity(buckets: usize) -> Self {
        Self {
            buckets: HashMap::with_capacity(buckets),
            size: 0,
            reentrancy: DebugReentrancy::new(),
        }
    }

    /// Number of live pairs.
    #[doc(alias = "size")]
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// All keys, one per live pair; `None` is the absent key.
    ///
    /// # Panics
    /// If the live pairs found disagree with the recorded size.
    pub fn keys(&self) -> Vec<Option<&K>> {
        self.collect_checked("keys", Pair::key)
    }

    /// All values, in the same order as `keys`.
    ///
    /// # Panics
    /// If the live pairs found disagree with the recorded size.
    pub fn values(&self) -> Vec<&V> {
        self.collect_checked("values", Pair::value)
    }

    /// All live pairs, in the same order as `keys`.
    ///
    /// # Panics
    /// If the live pairs found disagree with the recorded size.
    pub fn pairs(&self) -> Vec<&Pair<K, V>> {
        self.collect_checked("pairs", |p| p)
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.values(),
            slots: Default::default(),
        }
    }

    /// Start a bidirectional cursor over the hash codes present right now.
    #[doc(alias = "iterator")]
    pub fn cursor(&self) -> Cursor<'_, K, V> {
        Cursor::new(self, self.buckets.keys().copied().collect())
    }

    pub(crate) fn bucket(&self, hash: i64) -> Option<&[Option<Pair<K, V>>]> {
        self.buckets.get(&hash).map(Vec::as_slice)
    }

    fn collect_checked<'a, T, F>(&'a self, op: &'static str, f: F) -> Vec<T>
    where
        F: FnMut(&'a Pair<K, V>) -> T,
    {
        let mut out = Vec::with_capacity(self.size);
        out.extend(self.iter().map(f));
        if out.len() != self.size {
            error!(
                op,
                enumerated = out.len(),
                size = self.size,
                "live pair count disagrees with recorded size"
            );
            panic!(
                "{op}: enumerated {} live pairs but the map records {}",
                out.len(),
                self.size
            );
        }
        out
    }
}

impl<K: Key, V> KeyMap<K, V> {
    /// Bucket hash and slot index of the live pair whose key equals `key`.
    fn locate(&self, key: Option<&K>) -> Option<(i64, usize)> {
        let hash = hash_of(key);
        let bucket = self.buckets.get(&hash)?;
        bucket
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|p| p.matches(key)))
            .map(|i| (hash, i))
    }

    pub fn contains(&self, key: Option<&K>) -> bool {
        let _g = self.reentrancy.enter("contains");
        self.locate(key).is_some()
    }

    pub fn get(&self, key: Option<&K>) -> Option<&V> {
        let _g = self.reentrancy.enter("get");
        let (hash, i) = self.locate(key)?;
        self.buckets.get(&hash)?.get(i)?.as_ref().map(Pair::value)
    }

    /// Store `value` under `key`, returning the value it replaced.
    ///
    /// An existing pair is replaced in its own slot; a new pair is appended to
    /// the bucket for the key's hash code.
    pub fn put(&mut self, key: Option<K>, value: V) -> Option<V> {
        let _g = self.reentrancy.enter("put");
        let hash = hash_of(key.as_ref());
        let bucket = match self.buckets.entry(hash) {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => {
                trace!(hash, "bucket created");
                v.insert(Vec::with_capacity(1))
            }
        };
        if let Some(slot) = bucket
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|p| p.matches(key.as_ref())))
        {
            return slot.replace(Pair::new(key, value)).map(Pair::into_value);
        }
        bucket.push(Some(Pair::new(key, value)));
        self.size += 1;
        None
    }

    /// Remove the pair for `key`, returning its value.
    ///
    /// The last slot of the bucket moves into the freed one, so slot order
    /// within a bucket is not stable across removals.
    pub fn remove(&mut self, key: Option<&K>) -> Option<V> {
        let _g = self.reentrancy.enter("remove");
        let (hash, i) = self.locate(key)?;
        let bucket = self.buckets.get_mut(&hash)?;
        let removed = bucket.swap_remove(i)?;
        if bucket.iter().all(Option::is_none) {
            self.buckets.remove(&hash);
            trace!(hash, "bucket removed");
        }
        self.size -= 1;
        Some(removed.into_value())
    }

    /// Best-effort string rendering of the map for debugging.
    ///
    /// Keys render through `Key::label`, falling back to `Debug`; the absent
    /// key renders as [`ABSENT_KEY_LABEL`]. Distinct keys with the same
    /// rendering overwrite each other.
    pub fn serialize(&self) -> BTreeMap<String, &V> {
        let _g = self.reentrancy.enter("serialize");
        self.iter()
            .map(|p| (render_key(p.key()), p.value()))
            .collect()
    }
}

pub(crate) fn render_key<K: Key>(key: Option<&K>) -> String {
    match key {
        None => ABSENT_KEY_LABEL.to_string(),
        Some(k) => k.label().unwrap_or_else(|| format!("{k:?}")),
    }
}

impl<K, V> Default for KeyMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for KeyMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|p| (p.key(), p.value())))
            .finish()
    }
}

impl<K: Key, V> Extend<(Option<K>, V)> for KeyMap<K, V> {
    fn extend<I: IntoIterator<Item = (Option<K>, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K: Key, V> FromIterator<(Option<K>, V)> for KeyMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (Option<K>, V)>>(iter: I) -> Self {
        let mut map = KeyMap::new();
        map.extend(iter);
        map
    }
}

/// Forward iterator over live pairs, in hash-code index order then slot order.
pub struct Iter<'a, K, V> {
    buckets: hash_map::Values<'a, i64, Bucket<K, V>>,
    slots: core::slice::Iter<'a, Option<Pair<K, V>>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Pair<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(slot) = self.slots.next() {
                match slot {
                    Some(pair) => return Some(pair),
                    None => continue,
                }
            }
            self.slots = self.buckets.next()?.iter();
        }
    }
}

impl<'a, K, V> IntoIterator for &'a KeyMap<K, V> {
    type Item = &'a Pair<K, V>;
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
