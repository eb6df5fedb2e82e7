//! Key capability: integer hash code plus equality against a value of
//! unknown concrete type.
//!
//! Keys compare through `&dyn Any`, so a map can hold keys of one type
//! (`KeyMap<MyKey, V>`) or of many (`KeyMap<Box<dyn Key>, V>`). Equal keys
//! must report equal hash codes; the map never checks this.

use core::any::Any;
use core::fmt;

/// Upcast to `&dyn Any`. Implemented for every `'static` type, so key
/// implementors never write it by hand.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A value usable as a `KeyMap` key.
///
/// `equals` receives the other key type-erased; implementations downcast it
/// and return `false` when the concrete type differs. The `Debug` form is the
/// fallback rendering used by `KeyMap::serialize` when `label` is `None`.
pub trait Key: AsAny + fmt::Debug {
    fn hash_code(&self) -> i64;

    fn equals(&self, other: &dyn Any) -> bool;

    /// Display form for `KeyMap::serialize`.
    fn label(&self) -> Option<String> {
        None
    }
}

macro_rules! integer_key {
    ($($t:ty)*) => {$(
        impl Key for $t {
            #[inline]
            fn hash_code(&self) -> i64 {
                *self as i64
            }

            #[inline]
            fn equals(&self, other: &dyn Any) -> bool {
                other.downcast_ref::<$t>().is_some_and(|o| o == self)
            }

            fn label(&self) -> Option<String> {
                Some(self.to_string())
            }
        }
    )*};
}

integer_key!(i8 i16 i32 i64 isize u8 u16 u32 u64 usize);

/// 31-multiplier polynomial over UTF-16 code units, wrapping at 32 bits.
fn string_hash(s: &str) -> i64 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit))) as i64
}

fn as_str(other: &dyn Any) -> Option<&str> {
    if let Some(s) = other.downcast_ref::<String>() {
        return Some(s.as_str());
    }
    other.downcast_ref::<&'static str>().copied()
}

impl Key for String {
    fn hash_code(&self) -> i64 {
        string_hash(self)
    }

    fn equals(&self, other: &dyn Any) -> bool {
        as_str(other) == Some(self.as_str())
    }

    fn label(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl Key for &'static str {
    fn hash_code(&self) -> i64 {
        string_hash(self)
    }

    fn equals(&self, other: &dyn Any) -> bool {
        as_str(other) == Some(*self)
    }

    fn label(&self) -> Option<String> {
        Some((*self).to_string())
    }
}

// Stored boxes are compared against boxes, so unwrap `other` before handing
// it to the inner key.
impl Key for Box<dyn Key> {
    fn hash_code(&self) -> i64 {
        (**self).hash_code()
    }

    fn equals(&self, other: &dyn Any) -> bool {
        let other = match other.downcast_ref::<Box<dyn Key>>() {
            Some(boxed) => (**boxed).as_any(),
            None => other,
        };
        (**self).equals(other)
    }

    fn label(&self) -> Option<String> {
        (**self).label()
    }
}
