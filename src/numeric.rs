//! Numeric conversion used by averaging operations.
//!
//! Averages are always reported as `f64`, whatever the element type, so that
//! the mean of `[1, 2]` is `1.5` rather than an integer-truncated `1`.

/// A type whose values can take part in an arithmetic mean.
///
/// Implemented for all primitive integer and floating point types.
///
/// # Examples
///
/// ```rust
/// use orderly::Numeric;
///
/// assert_eq!(3_i32.to_f64(), 3.0);
/// assert_eq!(2.5_f32.to_f64(), 2.5);
/// ```
pub trait Numeric {
    /// Converts the value to `f64`, possibly losing precision for very large
    /// 64 and 128-bit integers.
    fn to_f64(&self) -> f64;
}

macro_rules! impl_numeric {
    ($($numeric_type:ty),* $(,)?) => {
        $(
            impl Numeric for $numeric_type {
                #[inline]
                #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
                fn to_f64(&self) -> f64 {
                    *self as f64
                }
            }
        )*
    };
}

impl_numeric!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

impl<T: Numeric + ?Sized> Numeric for &T {
    #[inline]
    fn to_f64(&self) -> f64 {
        (**self).to_f64()
    }
}
