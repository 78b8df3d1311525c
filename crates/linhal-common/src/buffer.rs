//! Shared, lockable storage used by the buffer-based entry points.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A reference-counted array. Clones alias the same storage.
///
/// Backends take read locks on inputs and write locks on outputs for the
/// duration of a task, so passing the same buffer as both input and output of
/// one call is rejected by the front-ends.
#[derive(Debug)]
pub struct Buffer<T> {
    data: Arc<RwLock<Vec<T>>>,
}

impl<T> Clone for Buffer<T> {
    fn clone(&self) -> Self {
        Self { data: Arc::clone(&self.data) }
    }
}

impl<T> Buffer<T> {
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data: Arc::new(RwLock::new(data)) }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.data.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.data.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Identity of the underlying storage; equal ids mean aliasing buffers.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.data) as *const () as usize
    }

    pub fn same_storage<U>(&self, other: &Buffer<U>) -> bool {
        self.id() == other.id()
    }
}

impl<T: Clone> Buffer<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.read().clone()
    }
}

impl<T: Clone + Default> Buffer<T> {
    /// Buffer of `len` default-initialised elements.
    pub fn new(len: usize) -> Self {
        Self::from_vec(vec![T::default(); len])
    }
}

impl<T> From<Vec<T>> for Buffer<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_alias_storage() {
        let a = Buffer::from_vec(vec![1.0f32, 2.0, 3.0]);
        let b = a.clone();
        b.write()[1] = 7.0;
        assert_eq!(a.to_vec(), vec![1.0, 7.0, 3.0]);
        assert!(a.same_storage(&b));
    }

    #[test]
    fn distinct_buffers_have_distinct_ids() {
        let a: Buffer<f64> = Buffer::new(4);
        let b: Buffer<f64> = Buffer::new(4);
        assert!(!a.same_storage(&b));
        assert_eq!(a.len(), 4);
        assert!(!a.is_empty());
    }
}
