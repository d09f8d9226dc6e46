use std::marker::PhantomData;

use num_traits::{One, Zero};
use thiserror::Error;

use crate::{
    backend::{Backend, Cpu},
    device::Device,
    storage::TensorStorage,
};

/// An error type for tensor operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TensorError {
    /// The number of elements does not match the requested shape.
    #[error("Shape mismatch: expected {expected} elements for shape, but got {actual} elements in data")]
    InvalidShape {
        /// Expected number of elements based on shape
        expected: usize,
        /// Actual number of elements in the data
        actual: usize,
    },

    /// Tensor dimensions incompatible for the requested operation.
    #[error("Dimension mismatch: {message}. Expected shape: {expected}, got: {actual}")]
    DimensionMismatch {
        /// Human-readable description of the mismatch
        message: String,
        /// Expected shape description
        expected: String,
        /// Actual shape description
        actual: String,
    },

    /// The axes passed to a permutation are not a permutation of `0..ndim`.
    #[error("Invalid permutation {axes:?} for a tensor with {ndim} dimensions")]
    InvalidPermutation {
        /// The axes that were requested
        axes: Vec<usize>,
        /// Number of dimensions of the tensor
        ndim: usize,
    },
}

impl TensorError {
    /// Creates an InvalidShape error.
    pub fn invalid_shape(expected: usize, actual: usize) -> Self {
        Self::InvalidShape { expected, actual }
    }

    /// Creates a DimensionMismatch error with formatted shapes.
    pub fn dimension_mismatch(
        message: impl Into<String>,
        expected: &[usize],
        actual: &[usize],
    ) -> Self {
        Self::DimensionMismatch {
            message: message.into(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }
}

/// Computes the strides for a row-major (C-contiguous) tensor layout.
///
/// # Examples
///
/// ```rust
/// use tensile_tensor::get_strides_from_shape;
///
/// assert_eq!(get_strides_from_shape(&[2, 3]), vec![3, 1]);
/// assert_eq!(get_strides_from_shape(&[2, 3, 4]), vec![12, 4, 1]);
/// assert!(get_strides_from_shape(&[]).is_empty());
/// ```
pub fn get_strides_from_shape(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![0; shape.len()];
    let mut stride = 1;
    for i in (0..shape.len()).rev() {
        strides[i] = stride;
        stride *= shape[i];
    }
    strides
}

/// A multi-dimensional array with owned, contiguous row-major data.
///
/// # Type Parameters
///
/// * `T` - The element type stored in the tensor
/// * `D` - The backend marker (e.g. [`Cpu`]) used as the dispatch key
///
/// The rank is dynamic. A tensor with shape `[]` is zero-dimensional and
/// holds exactly one element.
///
/// # Examples
///
/// ```rust
/// use tensile_tensor::{Cpu, Tensor};
///
/// let t = Tensor::<u8, Cpu>::from_shape_vec(&[2, 2], vec![1, 2, 3, 4]).unwrap();
/// assert_eq!(t.shape(), &[2, 2]);
/// assert_eq!(t.numel(), 4);
/// ```
pub struct Tensor<T, D: Backend = Cpu> {
    storage: TensorStorage<T>,
    shape: Vec<usize>,
    strides: Vec<usize>,
    _backend: PhantomData<D>,
}

impl<T, D: Backend> Tensor<T, D> {
    /// Creates a one-dimensional tensor with no elements (shape `[0]`).
    pub fn empty() -> Self {
        Self {
            storage: TensorStorage::from_vec(Vec::new()),
            shape: vec![0],
            strides: vec![1],
            _backend: PhantomData,
        }
    }

    /// Creates a new `Tensor` with the given shape and vector of data.
    ///
    /// # Errors
    ///
    /// If the number of elements in the data does not match the shape, an error is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use tensile_tensor::{Cpu, Tensor};
    ///
    /// let t = Tensor::<f32, Cpu>::from_shape_vec(&[3], vec![1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(t.ndim(), 1);
    /// assert!(Tensor::<f32, Cpu>::from_shape_vec(&[2, 2], vec![1.0]).is_err());
    /// ```
    pub fn from_shape_vec(shape: &[usize], data: Vec<T>) -> Result<Self, TensorError> {
        let numel = shape.iter().product::<usize>();
        if numel != data.len() {
            return Err(TensorError::invalid_shape(numel, data.len()));
        }
        Ok(Self {
            storage: TensorStorage::from_vec(data),
            shape: shape.to_vec(),
            strides: get_strides_from_shape(shape),
            _backend: PhantomData,
        })
    }

    /// Create a new `Tensor` with the given shape and a function to generate the data.
    ///
    /// The function `f` is called with the multi-index of each element, in
    /// row-major order.
    ///
    /// # Example
    ///
    /// ```
    /// use tensile_tensor::{Cpu, Tensor};
    ///
    /// let t = Tensor::<usize, Cpu>::from_shape_fn(&[2, 2], |idx| idx[0] * 2 + idx[1]);
    /// assert_eq!(t.as_slice(), &[0, 1, 2, 3]);
    /// ```
    pub fn from_shape_fn<F>(shape: &[usize], mut f: F) -> Self
    where
        F: FnMut(&[usize]) -> T,
    {
        let numel = shape.iter().product::<usize>();
        let mut index = vec![0; shape.len()];
        let mut data = Vec::with_capacity(numel);
        for _ in 0..numel {
            data.push(f(&index));
            // advance the row-major multi-index
            for k in (0..shape.len()).rev() {
                index[k] += 1;
                if index[k] < shape[k] {
                    break;
                }
                index[k] = 0;
            }
        }
        Self {
            storage: TensorStorage::from_vec(data),
            shape: shape.to_vec(),
            strides: get_strides_from_shape(shape),
            _backend: PhantomData,
        }
    }

    /// Returns the tensor data as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.storage.as_slice()
    }

    /// Get the data of the tensor as a pointer.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    /// Consumes the tensor and returns the underlying vector.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.storage.into_vec()
    }

    /// Returns the shape of the tensor.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the row-major strides of the tensor, in elements.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Returns the number of dimensions.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Returns the number of elements in the tensor.
    #[inline]
    pub fn numel(&self) -> usize {
        self.storage.len()
    }

    /// Returns true if the tensor holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Returns the device of the tensor's backend.
    #[inline]
    pub fn device(&self) -> Device {
        D::device()
    }

    /// Get the offset of the element at the given index.
    ///
    /// Returns `None` if the index has the wrong rank or is out of bounds.
    pub fn get_iter_offset(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut offset = 0;
        for ((&idx, &dim_size), &stride) in index.iter().zip(&self.shape).zip(&self.strides) {
            if idx >= dim_size {
                return None;
            }
            offset += idx * stride;
        }
        Some(offset)
    }

    /// Get the element at the given index, checking bounds.
    ///
    /// # Example
    ///
    /// ```
    /// use tensile_tensor::{Cpu, Tensor};
    ///
    /// let t = Tensor::<u8, Cpu>::from_shape_vec(&[2, 2], vec![1, 2, 3, 4]).unwrap();
    /// assert_eq!(t.get(&[1, 0]), Some(&3));
    /// assert!(t.get(&[2, 0]).is_none());
    /// ```
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        self.get_iter_offset(index)
            .and_then(|i| self.storage.as_slice().get(i))
    }

    /// Reinterpret the tensor with a new shape, consuming it.
    ///
    /// # Errors
    ///
    /// If the number of elements in the new shape does not match, an error is returned.
    pub fn into_shape(self, shape: &[usize]) -> Result<Self, TensorError> {
        let numel = shape.iter().product::<usize>();
        if numel != self.numel() {
            return Err(TensorError::dimension_mismatch(
                "Reshape operation requires same number of elements",
                shape,
                &self.shape,
            ));
        }
        Ok(Self {
            storage: self.storage,
            shape: shape.to_vec(),
            strides: get_strides_from_shape(shape),
            _backend: PhantomData,
        })
    }

    /// Apply a function to each element of the tensor.
    ///
    /// # Example
    ///
    /// ```
    /// use tensile_tensor::{Cpu, Tensor};
    ///
    /// let t = Tensor::<u8, Cpu>::from_shape_vec(&[4], vec![1, 2, 3, 4]).unwrap();
    /// let t2 = t.map(|x| *x + 1);
    /// assert_eq!(t2.as_slice(), &[2, 3, 4, 5]);
    /// ```
    pub fn map<U, F>(&self, f: F) -> Tensor<U, D>
    where
        F: Fn(&T) -> U,
    {
        Tensor {
            storage: TensorStorage::from_vec(self.as_slice().iter().map(f).collect()),
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            _backend: PhantomData,
        }
    }
}

impl<T: Clone, D: Backend> Tensor<T, D> {
    /// Creates a new `Tensor` with the given shape, copying the data from a slice.
    ///
    /// # Errors
    ///
    /// If the number of elements in the data does not match the shape, an error is returned.
    pub fn from_shape_slice(shape: &[usize], data: &[T]) -> Result<Self, TensorError> {
        Self::from_shape_vec(shape, data.to_vec())
    }

    /// Creates a new `Tensor` with every element set to `value`.
    ///
    /// # Example
    ///
    /// ```
    /// use tensile_tensor::{Cpu, Tensor};
    ///
    /// let t = Tensor::<u8, Cpu>::from_shape_val(&[2, 1, 3], 2);
    /// assert_eq!(t.as_slice(), &[2; 6]);
    /// ```
    pub fn from_shape_val(shape: &[usize], value: T) -> Self {
        let numel = shape.iter().product::<usize>();
        Self {
            storage: TensorStorage::from_vec(vec![value; numel]),
            shape: shape.to_vec(),
            strides: get_strides_from_shape(shape),
            _backend: PhantomData,
        }
    }

    /// Returns a copy of the tensor with a new shape.
    ///
    /// # Errors
    ///
    /// If the number of elements in the new shape does not match, an error is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use tensile_tensor::{Cpu, Tensor};
    ///
    /// let t = Tensor::<u8, Cpu>::from_shape_vec(&[4], vec![1, 2, 3, 4]).unwrap();
    /// let t2 = t.reshape(&[2, 2]).unwrap();
    /// assert_eq!(t2.strides(), &[2, 1]);
    /// assert_eq!(t2.as_slice(), &[1, 2, 3, 4]);
    /// ```
    pub fn reshape(&self, shape: &[usize]) -> Result<Self, TensorError> {
        self.clone().into_shape(shape)
    }

    /// Returns a contiguous copy with the dimensions reordered.
    ///
    /// `axes[i]` is the source dimension that becomes dimension `i`.
    ///
    /// # Errors
    ///
    /// If `axes` is not a permutation of `0..ndim`, an error is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use tensile_tensor::{Cpu, Tensor};
    ///
    /// let t = Tensor::<u8, Cpu>::from_shape_vec(&[2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap();
    /// let p = t.permute(&[1, 0]).unwrap();
    /// assert_eq!(p.shape(), &[3, 2]);
    /// assert_eq!(p.as_slice(), &[1, 4, 2, 5, 3, 6]);
    /// ```
    pub fn permute(&self, axes: &[usize]) -> Result<Self, TensorError> {
        let ndim = self.ndim();
        let mut seen = vec![false; ndim];
        let valid = axes.len() == ndim
            && axes.iter().all(|&a| a < ndim && !std::mem::replace(&mut seen[a], true));
        if !valid {
            return Err(TensorError::InvalidPermutation {
                axes: axes.to_vec(),
                ndim,
            });
        }

        let new_shape: Vec<usize> = axes.iter().map(|&a| self.shape[a]).collect();
        let src_strides: Vec<usize> = axes.iter().map(|&a| self.strides[a]).collect();
        let data = self.as_slice();
        Ok(Self::from_shape_fn(&new_shape, |idx| {
            let offset: usize = idx.iter().zip(&src_strides).map(|(i, s)| i * s).sum();
            data[offset].clone()
        }))
    }

    /// Replaces the shape and contents of `self` with those of `src`.
    ///
    /// The existing allocation is reused when the element counts match.
    ///
    /// # Returns
    ///
    /// `true` if the element count changed and the buffer had to be resized.
    pub fn copy_from(&mut self, src: &Tensor<T, D>) -> bool {
        let resized = self.numel() != src.numel();
        self.storage.overwrite(src.as_slice());
        self.shape.clone_from(&src.shape);
        self.strides.clone_from(&src.strides);
        resized
    }
}

impl<T: Clone + Zero, D: Backend> Tensor<T, D> {
    /// Create a new tensor with all elements set to zero.
    pub fn zeros(shape: &[usize]) -> Self {
        Self::from_shape_val(shape, T::zero())
    }
}

impl<T: Clone + Zero + One, D: Backend> Tensor<T, D> {
    /// Create an `n x n` identity matrix.
    ///
    /// # Example
    ///
    /// ```
    /// use tensile_tensor::{Cpu, Tensor};
    ///
    /// let eye = Tensor::<f64, Cpu>::eye(2);
    /// assert_eq!(eye.as_slice(), &[1.0, 0.0, 0.0, 1.0]);
    /// ```
    pub fn eye(n: usize) -> Self {
        Self::from_shape_fn(&[n, n], |idx| if idx[0] == idx[1] { T::one() } else { T::zero() })
    }
}

impl<T: Clone, D: Backend> Clone for Tensor<T, D> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            _backend: PhantomData,
        }
    }
}

impl<T: PartialEq, D: Backend> PartialEq for Tensor<T, D> {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && self.as_slice() == other.as_slice()
    }
}

impl<T: std::fmt::Debug, D: Backend> std::fmt::Debug for Tensor<T, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape)
            .field("strides", &self.strides)
            .field("device", &D::device())
            .field("data", &self.as_slice())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_1d() -> Result<(), TensorError> {
        let t = Tensor::<u8, Cpu>::from_shape_vec(&[1], vec![1])?;
        assert_eq!(t.shape(), &[1]);
        assert_eq!(t.as_slice(), &[1]);
        assert_eq!(t.strides(), &[1]);
        Ok(())
    }

    #[test]
    fn constructor_3d() -> Result<(), TensorError> {
        let t = Tensor::<u8, Cpu>::from_shape_vec(&[2, 1, 3], vec![1, 2, 3, 4, 5, 6])?;
        assert_eq!(t.shape(), &[2, 1, 3]);
        assert_eq!(t.strides(), &[3, 3, 1]);
        assert_eq!(t.get(&[1, 0, 2]), Some(&6));
        Ok(())
    }

    #[test]
    fn constructor_invalid_shape() {
        let res = Tensor::<u8, Cpu>::from_shape_vec(&[2, 2], vec![1, 2, 3]);
        assert_eq!(res.unwrap_err(), TensorError::invalid_shape(4, 3));
    }

    #[test]
    fn zero_dimensional() -> Result<(), TensorError> {
        let t = Tensor::<f64, Cpu>::from_shape_vec(&[], vec![3.5])?;
        assert_eq!(t.ndim(), 0);
        assert_eq!(t.numel(), 1);
        assert_eq!(t.get(&[]), Some(&3.5));
        Ok(())
    }

    #[test]
    fn empty_tensor() {
        let t = Tensor::<f32, Cpu>::empty();
        assert_eq!(t.shape(), &[0]);
        assert!(t.is_empty());
    }

    #[test]
    fn iter_offset_bounds() -> Result<(), TensorError> {
        let t = Tensor::<u8, Cpu>::from_shape_vec(&[2, 3], vec![0; 6])?;
        assert_eq!(t.get_iter_offset(&[1, 1]), Some(4));
        assert_eq!(t.get_iter_offset(&[2, 0]), None);
        assert_eq!(t.get_iter_offset(&[1]), None);
        Ok(())
    }

    #[test]
    fn reshape_mismatch() -> Result<(), TensorError> {
        let t = Tensor::<u8, Cpu>::from_shape_vec(&[4], vec![1, 2, 3, 4])?;
        assert!(matches!(
            t.reshape(&[3]),
            Err(TensorError::DimensionMismatch { .. })
        ));
        Ok(())
    }

    #[test]
    fn permute_3d() -> Result<(), TensorError> {
        let t = Tensor::<usize, Cpu>::from_shape_fn(&[2, 3, 4], |idx| idx[0] * 100 + idx[1] * 10 + idx[2]);
        let p = t.permute(&[2, 0, 1])?;
        assert_eq!(p.shape(), &[4, 2, 3]);
        assert_eq!(p.get(&[3, 1, 2]), Some(&123));
        Ok(())
    }

    #[test]
    fn permute_invalid() -> Result<(), TensorError> {
        let t = Tensor::<u8, Cpu>::from_shape_vec(&[2, 2], vec![1, 2, 3, 4])?;
        assert!(t.permute(&[0, 0]).is_err());
        assert!(t.permute(&[0]).is_err());
        assert!(t.permute(&[0, 2]).is_err());
        Ok(())
    }

    #[test]
    fn copy_from_keeps_allocation() -> Result<(), TensorError> {
        let mut dst = Tensor::<f64, Cpu>::zeros(&[2, 2]);
        let ptr = dst.as_ptr();
        let src = Tensor::<f64, Cpu>::from_shape_vec(&[4], vec![1.0, 2.0, 3.0, 4.0])?;
        assert!(!dst.copy_from(&src));
        assert_eq!(dst.as_ptr(), ptr);
        assert_eq!(dst.shape(), &[4]);
        assert_eq!(dst, src);
        Ok(())
    }

    #[test]
    fn copy_from_resizes() {
        let mut dst = Tensor::<f64, Cpu>::empty();
        let src = Tensor::<f64, Cpu>::eye(3);
        assert!(dst.copy_from(&src));
        assert_eq!(dst.shape(), &[3, 3]);
        assert_eq!(dst, src);
    }

    #[test]
    fn eye_and_zeros() {
        let eye = Tensor::<f32, Cpu>::eye(3);
        assert_eq!(eye.get(&[1, 1]), Some(&1.0));
        assert_eq!(eye.get(&[1, 2]), Some(&0.0));
        let z = Tensor::<i64, Cpu>::zeros(&[2]);
        assert_eq!(z.as_slice(), &[0, 0]);
    }

    #[test]
    fn device_of_cpu_tensor() {
        let t = Tensor::<f32, Cpu>::zeros(&[1]);
        assert_eq!(t.device(), Device::Cpu);
    }
}
