use num_traits::{Float, FromPrimitive, NumCast, ToPrimitive};

/// Runtime tag for the element type of a tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DType {
    /// 32-bit floating point.
    F32,
    /// 64-bit floating point.
    F64,
    /// 64-bit signed integer.
    I64,
}

/// A type that can be stored in a tensor.
pub trait Element: Copy + Default + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    /// The runtime tag of this type.
    const DTYPE: DType;
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;
}

impl Element for i64 {
    const DTYPE: DType = DType::I64;
}

/// A real floating point element accepted by the linear algebra operations.
pub trait FloatElement: Element + Float + FromPrimitive + ToPrimitive + NumCast {
    /// Converts from `f64`, rounding to the nearest representable value.
    fn from_f64_lossy(value: f64) -> Self;

    /// Widens to `f64`.
    fn to_f64_lossy(self) -> f64;
}

impl FloatElement for f32 {
    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self as f64
    }
}

impl FloatElement for f64 {
    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        value
    }

    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_tags() {
        assert_eq!(f32::DTYPE, DType::F32);
        assert_eq!(f64::DTYPE, DType::F64);
        assert_eq!(i64::DTYPE, DType::I64);
    }

    #[test]
    fn test_from_f64_lossy() {
        assert_eq!(f32::from_f64_lossy(0.5), 0.5f32);
        assert_eq!(f64::from_f64_lossy(1e-300), 1e-300);
        assert_eq!(0.25f32.to_f64_lossy(), 0.25);
    }
}
