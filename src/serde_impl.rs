//! `Serialize` for `KeyMap` through its label rendering.
//!
//! Keys cannot be rebuilt from labels, so there is no `Deserialize`.

use crate::key::Key;
use crate::key_map::KeyMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

impl<K, V> Serialize for KeyMap<K, V>
where
    K: Key,
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let rendered = KeyMap::serialize(self);
        let mut map = serializer.serialize_map(Some(rendered.len()))?;
        for (label, value) in rendered {
            map.serialize_entry(&label, value)?;
        }
        map.end()
    }
}
