//! Sparse/dense handle table.
//!
//! Values live packed in a dense `Vec`; a sparse table maps each handle to its
//! current dense slot. Removal swaps the last value into the vacated slot, so
//! the dense order is arbitrary but handles stay valid. Freed handles are
//! recycled (last freed, first reissued).

use std::fmt::Debug;
use std::hash::Hash;

use tracing::trace;

use crate::traits::EntityLookup;

/// A typed 32-bit handle issued by an [`EntityStore`].
pub trait EntityKey: Copy + Eq + Ord + Hash + Debug {
    fn from_index(index: u32) -> Self;
    fn index(self) -> u32;
}

/// Declare typed handle newtypes implementing [`EntityKey`].
macro_rules! entity_key {
    ($($(#[$attr:meta])* $vis:vis struct $name:ident;)*) => {
        $(
            $(#[$attr])*
            #[derive(
                Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
                ::serde::Serialize, ::serde::Deserialize,
            )]
            #[serde(transparent)]
            $vis struct $name(u32);

            impl $crate::topology::store::EntityKey for $name {
                fn from_index(index: u32) -> Self {
                    Self(index)
                }

                fn index(self) -> u32 {
                    self.0
                }
            }

            impl ::std::fmt::Display for $name {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    write!(f, "{}({})", stringify!($name), self.0)
                }
            }
        )*
    };
}

pub(crate) use entity_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("no live entity at handle {index}")]
    NotFound { index: u32 },

    #[error("handle {index} is already occupied")]
    Occupied { index: u32 },
}

/// Stable-handle container over a compact array.
#[derive(Debug, Clone)]
pub struct EntityStore<K, T> {
    dense: Vec<T>,
    dense_to_id: Vec<K>,
    sparse: Vec<Option<u32>>,
    free_ids: Vec<K>,
}

impl<K: EntityKey, T> Default for EntityStore<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EntityKey, T> EntityStore<K, T> {
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            dense_to_id: Vec::new(),
            sparse: Vec::new(),
            free_ids: Vec::new(),
        }
    }

    /// Insert a value and return the handle assigned to it.
    pub fn insert(&mut self, value: T) -> K {
        let id = self.allocate_id();
        self.push_dense(id, value);
        id
    }

    /// Re-occupy a handle this store issued earlier and has since freed.
    ///
    /// Used to bring an entity back under the handle it had before removal,
    /// so references held elsewhere resolve again. Handles never issued are
    /// `NotFound`.
    pub fn restore(&mut self, id: K, value: T) -> Result<(), StoreError> {
        if self.contains(id) {
            return Err(StoreError::Occupied { index: id.index() });
        }
        let pos = self
            .free_ids
            .iter()
            .position(|&free| free == id)
            .ok_or(StoreError::NotFound { index: id.index() })?;
        self.free_ids.remove(pos);

        self.push_dense(id, value);
        Ok(())
    }

    /// Remove the value at `id`, moving the last dense value into its slot.
    pub fn remove(&mut self, id: K) -> Result<T, StoreError> {
        let remove_index = self.slot(id)?;
        let last_index = self.dense.len() - 1;

        if remove_index != last_index {
            let moved_id = self.dense_to_id[last_index];
            self.sparse[moved_id.index() as usize] = Some(remove_index as u32);
            trace!(?moved_id, from = last_index, to = remove_index, "dense slot moved");
        }

        let value = self.dense.swap_remove(remove_index);
        self.dense_to_id.swap_remove(remove_index);
        self.sparse[id.index() as usize] = None;
        self.free_ids.push(id);

        Ok(value)
    }

    pub fn contains(&self, id: K) -> bool {
        self.sparse
            .get(id.index() as usize)
            .is_some_and(|slot| slot.is_some())
    }

    pub fn get(&self, id: K) -> Result<&T, StoreError> {
        let slot = self.slot(id)?;
        Ok(&self.dense[slot])
    }

    pub fn get_mut(&mut self, id: K) -> Result<&mut T, StoreError> {
        let slot = self.slot(id)?;
        Ok(&mut self.dense[slot])
    }

    /// Clone the values for several handles, failing on the first absent one.
    pub fn get_many(&self, ids: &[K]) -> Result<Vec<T>, StoreError>
    where
        T: Clone,
    {
        ids.iter().map(|&id| self.get(id).cloned()).collect()
    }

    /// Current position of `id` in [`dense`](Self::dense).
    pub fn dense_index(&self, id: K) -> Result<u32, StoreError> {
        self.slot(id).map(|slot| slot as u32)
    }

    /// All live values, packed. Order is not insertion order.
    pub fn dense(&self) -> &[T] {
        &self.dense
    }

    /// Handles of the live values, parallel to [`dense`](Self::dense).
    pub fn ids(&self) -> &[K] {
        &self.dense_to_id
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> {
        self.dense_to_id.iter().copied().zip(self.dense.iter())
    }

    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    fn slot(&self, id: K) -> Result<usize, StoreError> {
        self.sparse
            .get(id.index() as usize)
            .copied()
            .flatten()
            .map(|slot| slot as usize)
            .ok_or(StoreError::NotFound { index: id.index() })
    }

    fn allocate_id(&mut self) -> K {
        if let Some(id) = self.free_ids.pop() {
            return id;
        }
        let id = K::from_index(self.sparse.len() as u32);
        self.sparse.push(None);
        id
    }

    fn push_dense(&mut self, id: K, value: T) {
        self.sparse[id.index() as usize] = Some(self.dense.len() as u32);
        self.dense.push(value);
        self.dense_to_id.push(id);
    }
}

impl<K: EntityKey, T> EntityLookup<K, T> for EntityStore<K, T> {
    fn lookup(&self, id: K) -> Option<&T> {
        self.get(id).ok()
    }
}

/// An [`EntityStore`] that raises a dirty flag on every mutation.
///
/// Reads never touch the flag. The owner polls [`is_dirty`](Self::is_dirty)
/// and lowers it with [`clear_dirty`](Self::clear_dirty) once derived state
/// has been rebuilt.
#[derive(Debug, Clone)]
pub struct DirtyStore<K, T> {
    store: EntityStore<K, T>,
    dirty: bool,
}

impl<K: EntityKey, T> Default for DirtyStore<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EntityKey, T> DirtyStore<K, T> {
    pub fn new() -> Self {
        Self {
            store: EntityStore::new(),
            dirty: false,
        }
    }

    pub fn insert(&mut self, value: T) -> K {
        self.dirty = true;
        self.store.insert(value)
    }

    pub fn restore(&mut self, id: K, value: T) -> Result<(), StoreError> {
        self.store.restore(id, value)?;
        self.dirty = true;
        Ok(())
    }

    pub fn remove(&mut self, id: K) -> Result<T, StoreError> {
        let value = self.store.remove(id)?;
        self.dirty = true;
        Ok(value)
    }

    /// Successful mutable access counts as a mutation.
    pub fn get_mut(&mut self, id: K) -> Result<&mut T, StoreError> {
        let value = self.store.get_mut(id)?;
        self.dirty = true;
        Ok(value)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Read-only view of the wrapped store.
    pub fn store(&self) -> &EntityStore<K, T> {
        &self.store
    }

    pub fn contains(&self, id: K) -> bool {
        self.store.contains(id)
    }

    pub fn get(&self, id: K) -> Result<&T, StoreError> {
        self.store.get(id)
    }

    pub fn get_many(&self, ids: &[K]) -> Result<Vec<T>, StoreError>
    where
        T: Clone,
    {
        self.store.get_many(ids)
    }

    pub fn dense_index(&self, id: K) -> Result<u32, StoreError> {
        self.store.dense_index(id)
    }

    pub fn dense(&self) -> &[T] {
        self.store.dense()
    }

    pub fn ids(&self) -> &[K] {
        self.store.ids()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> {
        self.store.iter()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl<K: EntityKey, T> EntityLookup<K, T> for DirtyStore<K, T> {
    fn lookup(&self, id: K) -> Option<&T> {
        self.store.lookup(id)
    }
}
