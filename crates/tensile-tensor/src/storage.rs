//! Owned, contiguous storage for tensor data.
//!
//! The buffer is always host resident and row-major. Backends that keep
//! their data elsewhere are expected to stage it through this buffer.

/// Owned tensor buffer.
///
/// Cloning a storage deep-copies the data. The buffer keeps its allocation
/// across [`TensorStorage::overwrite`] calls whenever the element count is
/// unchanged, which is what lets output arguments be refilled in place.
#[derive(Clone, PartialEq)]
pub struct TensorStorage<T> {
    data: Vec<T>,
}

impl<T> TensorStorage<T> {
    /// Creates a new storage from a vector, taking ownership of its allocation.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Returns the pointer to the first element.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    /// Returns the storage data as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the number of elements in the storage.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the storage holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consumes the storage and returns the data as a vector.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Clone> TensorStorage<T> {
    /// Replaces the contents with `src`.
    ///
    /// Copies in place when the lengths match; otherwise the buffer is
    /// resized first and may move.
    pub fn overwrite(&mut self, src: &[T]) {
        if self.data.len() == src.len() {
            self.data.clone_from_slice(src);
        } else {
            self.data.clear();
            self.data.extend_from_slice(src);
        }
    }
}

impl<T> std::fmt::Debug for TensorStorage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TensorStorage")
            .field("ptr", &self.data.as_ptr())
            .field("len", &self.data.len())
            .finish()
    }
}
