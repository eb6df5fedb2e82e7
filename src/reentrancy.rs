//! Debug-only reentrancy guard for map entry points.
//!
//! `KeyMap` calls into user code (`Key::hash_code`, `Key::equals`,
//! `Key::label`, `Debug`) while scanning buckets. A key that reaches back
//! into the same map from one of those calls would observe a half-finished
//! operation, so in debug builds the second entry panics and names both
//! operations. Release builds compile the guard away.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-map tracker. Public entry points start with
/// `let _g = self.reentrancy.enter("op");`.
#[derive(Debug)]
pub struct DebugReentrancy {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    // !Send + !Sync: the map is single-threaded.
    _nosend: PhantomData<*mut ()>,
}

impl DebugReentrancy {
    pub const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _nosend: PhantomData,
        }
    }

    /// Mark `op` as running until the guard drops. Debug builds panic when
    /// another operation is already running.
    #[inline]
    pub fn enter(&self, op: &'static str) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(running) = self.active.get() {
                panic!(
                    "reentrancy detected: `{op}` called from a key callback during `{running}`"
                );
            }
            self.active.set(Some(op));
            return ReentrancyGuard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            return ReentrancyGuard { _z: PhantomData };
        }
    }

    #[cfg(all(test, debug_assertions))]
    pub fn running(&self) -> Option<&'static str> {
        self.active.get()
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard returned by `DebugReentrancy::enter`.
pub struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(self.owner.active.get().is_some());
            self.owner.active.set(None);
        }
    }
}
