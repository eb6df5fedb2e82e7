//! hashkey-map: a single-threaded hash map whose keys supply their own
//! integer hash code and equality test, with a bidirectional cursor.
//!
//! Internal Design:
//!
//! Summary
//! - Keys implement [`Key`]: `hash_code() -> i64` and
//!   `equals(&dyn Any) -> bool`. Keys may be one concrete type or
//!   `Box<dyn Key>` for a map with heterogeneous keys.
//! - The absent key is `None` in an `Option<K>` key position. It hashes to
//!   `0` and equals only itself, so it is an ordinary key to the map.
//! - [`KeyMap`] indexes buckets by hash code (`hashbrown::HashMap<i64, _>`).
//!   Each bucket is a `Vec` of pair slots scanned linearly with `equals`.
//! - [`Cursor`] walks a snapshot of the bucket hash codes forwards or
//!   backwards from one stored position.
//!
//! Constraints
//! - Single-threaded: `KeyMap` is `!Send`/`!Sync`.
//! - Equal keys must have equal hash codes. This is not checked; breaking
//!   it gives wrong lookups, never memory unsafety.
//! - Lookup cost is the length of the key's bucket, so a constant hash
//!   function degrades every operation to O(n).
//!
//! Buckets and tombstones
//! - Removal swaps the bucket's last slot into the hole, so slot order is
//!   not stable across removals.
//! - A `None` slot is a tombstone; every scan skips it. A bucket with no
//!   live slot left after a removal is dropped from the index.
//! - `keys`/`values`/`pairs` panic if the number of live slots disagrees
//!   with the recorded size. That only happens after internal corruption.
//!
//! Cursor direction changes
//! - A cursor yields a pair and leaves its position one past it. Stepping
//!   the other way first moves back onto that pair, so the first step after
//!   a turn yields the same pair again.
//! - After running off either end, a turn re-homes the cursor to the
//!   natural start of the new direction.
//! - The cursor borrows the map, so the map cannot change under it.
//!
//! Reentrancy
//! - Map methods that call `Key` code hold a debug-only guard. A key that
//!   calls back into the same map from `hash_code`, `equals` or `label`
//!   panics in debug builds.
//!
//! Notes and non-goals
//! - No `clear()`; build a new map instead.
//! - No shrinking policy, persistence, or ordering between unrelated keys.
//! - `serialize` is a lossy debugging view keyed by label strings.

pub mod cursor;
pub mod key;
pub mod key_map;
#[cfg(test)]
mod key_map_proptest;
mod pair;
mod reentrancy;
#[cfg(feature = "serde")]
mod serde_impl;

// Public surface
pub use cursor::{Cursor, CursorState, Direction};
pub use key::{AsAny, Key};
pub use key_map::{Iter, KeyMap, ABSENT_KEY_LABEL};
pub use pair::Pair;
