//! Lookup abstraction shared by the topology validators.
//!
//! The validators are pure functions over "something that resolves a handle
//! to a value". Both store types implement it, and so does a plain `HashMap`,
//! which lets callers validate candidate entities that are not stored yet.

use std::collections::HashMap;
use std::hash::Hash;

/// Resolve a handle to a borrowed value, `None` if absent.
pub trait EntityLookup<K, T> {
    fn lookup(&self, id: K) -> Option<&T>;
}

impl<K: Eq + Hash + Copy, T> EntityLookup<K, T> for HashMap<K, T> {
    fn lookup(&self, id: K) -> Option<&T> {
        self.get(&id)
    }
}
