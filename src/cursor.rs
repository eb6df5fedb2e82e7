//! Bidirectional, resumable cursor over a `KeyMap`'s buckets.
//!
//! A cursor keeps one raw position (bucket index into a snapshot of hash
//! codes, slot index into that bucket) and reinterprets it by direction.
//! After yielding a pair the position already points one past it, so
//! turning around first moves the position back by one: the first step in
//! the new direction yields the same pair again, and later steps carry on
//! from there. Turning around after running off either end re-homes the
//! cursor to the natural start of the new direction.
//!
//! The snapshot is taken by `KeyMap::cursor`. Hash codes whose bucket is
//! missing or empty, and tombstoned slots, are skipped.

use crate::key_map::KeyMap;
use crate::pair::Pair;
use core::fmt;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    #[inline]
    fn delta(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Where a cursor stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// No step taken yet.
    Uninitialized,
    /// Inside the snapshot, moving in the given direction.
    Active(Direction),
    /// Ran off the front.
    ExhaustedAtStart,
    /// Ran off the back.
    ExhaustedAtEnd,
}

pub struct Cursor<'a, K, V> {
    map: &'a KeyMap<K, V>,
    hashes: Vec<i64>,
    bucket: isize,
    slot: isize,
    direction: Direction,
    active: bool,
    current: Option<&'a Pair<K, V>>,
}

#[inline]
fn in_bounds(index: isize, len: usize) -> bool {
    index >= 0 && (index as usize) < len
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) fn new(map: &'a KeyMap<K, V>, hashes: Vec<i64>) -> Self {
        Self {
            map,
            hashes,
            bucket: 0,
            slot: 0,
            direction: Direction::Forward,
            active: false,
            current: None,
        }
    }

    /// Last pair yielded, kept after the cursor runs off either end.
    #[inline]
    pub fn pair(&self) -> Option<&'a Pair<K, V>> {
        self.current
    }

    /// Key of the last pair yielded. The inner `None` is the absent key.
    #[inline]
    pub fn key(&self) -> Option<Option<&'a K>> {
        self.current.map(Pair::key)
    }

    #[inline]
    pub fn value(&self) -> Option<&'a V> {
        self.current.map(Pair::value)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn state(&self) -> CursorState {
        if !self.active {
            CursorState::Uninitialized
        } else if self.bucket < 0 {
            CursorState::ExhaustedAtStart
        } else if self.bucket as usize >= self.hashes.len() {
            CursorState::ExhaustedAtEnd
        } else {
            CursorState::Active(self.direction)
        }
    }

    /// Hash codes captured when the cursor was created.
    pub fn snapshot(&self) -> &[i64] {
        &self.hashes
    }

    /// Step forward; see [`Cursor::step`].
    #[inline]
    pub fn forward(&mut self) -> bool {
        self.step(Direction::Forward)
    }

    /// Step backward; see [`Cursor::step`].
    #[inline]
    pub fn backward(&mut self) -> bool {
        self.step(Direction::Backward)
    }

    /// Move to the next live pair in `direction` and return whether one was
    /// found. On `false` the accessors keep returning the last pair yielded.
    pub fn step(&mut self, direction: Direction) -> bool {
        if !self.active {
            self.active = true;
            self.direction = direction;
            self.rehome(direction);
        }
        if direction != self.direction {
            if in_bounds(self.bucket, self.hashes.len()) {
                self.slot += direction.delta();
            } else {
                trace!(?direction, "cursor re-homed after exhaustion");
                self.rehome(direction);
            }
        }
        self.direction = direction;

        let delta = direction.delta();
        while in_bounds(self.bucket, self.hashes.len()) {
            let slots = self.slots_at(self.bucket);
            while in_bounds(self.slot, slots.len()) {
                let slot = &slots[self.slot as usize];
                self.slot += delta;
                if let Some(pair) = slot {
                    self.current = Some(pair);
                    return true;
                }
            }
            self.bucket += delta;
            self.reset_slot(direction);
        }
        false
    }

    fn slots_at(&self, bucket: isize) -> &'a [Option<Pair<K, V>>] {
        let map: &'a KeyMap<K, V> = self.map;
        if !in_bounds(bucket, self.hashes.len()) {
            return &[];
        }
        map.bucket(self.hashes[bucket as usize]).unwrap_or(&[])
    }

    fn rehome(&mut self, direction: Direction) {
        self.bucket = match direction {
            Direction::Forward => 0,
            Direction::Backward => self.hashes.len() as isize - 1,
        };
        self.reset_slot(direction);
    }

    /// Put the slot index at the entry edge of the current bucket.
    fn reset_slot(&mut self, direction: Direction) {
        self.slot = match direction {
            Direction::Backward if in_bounds(self.bucket, self.hashes.len()) => {
                self.slots_at(self.bucket).len() as isize - 1
            }
            _ => 0,
        };
    }

    #[cfg(test)]
    pub(crate) fn position(&self) -> (isize, isize) {
        (self.bucket, self.slot)
    }
}

// Manual impls: cloning or printing a cursor never needs `K`/`V` bounds.
impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            map: self.map,
            hashes: self.hashes.clone(),
            bucket: self.bucket,
            slot: self.slot,
            direction: self.direction,
            active: self.active,
            current: self.current,
        }
    }
}

impl<K, V> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("hashes", &self.hashes)
            .field("bucket", &self.bucket)
            .field("slot", &self.slot)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
