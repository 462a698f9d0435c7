/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
};
use thiserror::Error;

use crate::views::{DenseData, MutDenseData};

/// A strided vector.
///
/// Element `i` lives at offset `i * stride` of the underlying slice. Columns of a
/// column-major matrix are vectors with a stride of one, while rows are vectors whose
/// stride is the leading dimension of the matrix.
///
/// ```text
///            |<- stride ->|
///            +--+----------+--+----------+--+
///            |v0|          |v1|          |v2|
///            +--+----------+--+----------+--+
///             ^                            ^
///             |                            |
///           start                    last element (no trailing gap)
/// ```
#[derive(Debug, Clone, Copy)]
pub struct VectorBase<T>
where
    T: DenseData,
{
    data: T,
    len: usize,
    // The distance between consecutive elements. This is always at least one.
    stride: usize,
}

/// A mutable strided window into another buffer.
pub type VectorView<'a> = VectorBase<&'a mut [f64]>;

/// An immutable strided window into another buffer.
pub type VectorConstView<'a> = VectorBase<&'a [f64]>;

/// Return the linear length of a slice underlying a `VectorBase` with the given parameters.
pub fn linear_length(len: usize, stride: usize) -> usize {
    (len.max(1) - 1) * stride + len.min(1)
}

/// Like [`linear_length`], but return `None` if the length does not fit in a `usize`.
pub fn checked_linear_length(len: usize, stride: usize) -> Option<usize> {
    (len.max(1) - 1)
        .checked_mul(stride)?
        .checked_add(len.min(1))
}

fn expected_length(len: usize, stride: usize) -> String {
    match checked_linear_length(len, stride) {
        Some(n) => n.to_string(),
        None => "more than usize::MAX".to_string(),
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
#[error(
    "tried to construct a strided vector with {len} elements and stride {stride} over a \
     slice of length {} (expected {})",
    slice_len,
    expected_length(*len, *stride)
)]
pub struct TryFromErrorLight {
    slice_len: usize,
    len: usize,
    stride: usize,
}

#[derive(Error)]
#[non_exhaustive]
#[error(
    "tried to construct a strided vector with {len} elements and stride {stride} over a \
     slice of length {} (expected {})",
    data.as_slice().len(),
    expected_length(*len, *stride)
)]
pub struct TryFromError<T: DenseData> {
    data: T,
    len: usize,
    stride: usize,
}

// Manually implement `fmt::Debug` so we don't require `T::Debug`.
impl<T: DenseData> fmt::Debug for TryFromError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryFromError")
            .field("data_len", &self.data.as_slice().len())
            .field("len", &self.len)
            .field("stride", &self.stride)
            .finish()
    }
}

impl<T: DenseData> TryFromError<T> {
    /// Consume the error and return the base data.
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Drop the data portion of the error and return an equivalent error that is guaranteed
    /// to be `'static`.
    pub fn as_static(&self) -> TryFromErrorLight {
        TryFromErrorLight {
            slice_len: self.data.as_slice().len(),
            len: self.len,
            stride: self.stride,
        }
    }
}

impl<'a> VectorBase<&'a [f64]> {
    /// Construct a strided view over a data slice, shrinking the slice as needed.
    ///
    /// Returns an error if `data` is shorter than the value returned by `linear_length`.
    ///
    /// # Panics
    ///
    /// * Panics if `stride == 0`.
    pub fn try_shrink_from(
        data: &'a [f64],
        len: usize,
        stride: usize,
    ) -> Result<Self, TryFromError<&'a [f64]>> {
        assert!(stride != 0, "stride must be non-zero");
        match checked_linear_length(len, stride).and_then(|n| data.get(..n)) {
            Some(data) => Ok(Self { data, len, stride }),
            None => Err(TryFromError { data, len, stride }),
        }
    }
}

impl<'a> VectorBase<&'a mut [f64]> {
    /// Construct a mutable strided view over a data slice, shrinking the slice as needed.
    ///
    /// Returns an error if `data` is shorter than the value returned by `linear_length`.
    ///
    /// # Panics
    ///
    /// * Panics if `stride == 0`.
    pub fn try_shrink_from(
        data: &'a mut [f64],
        len: usize,
        stride: usize,
    ) -> Result<Self, TryFromError<&'a mut [f64]>> {
        assert!(stride != 0, "stride must be non-zero");
        match checked_linear_length(len, stride) {
            Some(required_length) if data.len() >= required_length => Ok(Self {
                data: &mut data[..required_length],
                len,
                stride,
            }),
            _ => Err(TryFromError { data, len, stride }),
        }
    }
}

impl<T> VectorBase<T>
where
    T: DenseData,
{
    /// Construct a strided view over `data`.
    ///
    /// Returns an error if the length of `data` is not exactly `linear_length(len, stride)`.
    ///
    /// # Panics
    ///
    /// * Panics if `stride == 0`.
    pub fn try_from(data: T, len: usize, stride: usize) -> Result<Self, TryFromError<T>> {
        assert!(stride != 0, "stride must be non-zero");
        if checked_linear_length(len, stride) == Some(data.as_slice().len()) {
            Ok(Self { data, len, stride })
        } else {
            Err(TryFromError { data, len, stride })
        }
    }

    /// Construct a vector with a stride of one covering all of `data`.
    pub fn contiguous(data: T) -> Self {
        let len = data.as_slice().len();
        Self {
            data,
            len,
            stride: 1,
        }
    }

    /// Construct a vector without checking the length of `data`.
    ///
    /// # Safety
    ///
    /// * `data.as_slice().len() == linear_length(len, stride)`.
    /// * `stride != 0`.
    pub(crate) unsafe fn new_unchecked(data: T, len: usize, stride: usize) -> Self {
        debug_assert_ne!(stride, 0);
        debug_assert_eq!(data.as_slice().len(), linear_length(len, stride));
        Self { data, len, stride }
    }

    /// Return the number of elements in the vector.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return `true` if the vector has no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Return the count of elements between consecutive entries.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Return the underlying data as a slice.
    ///
    /// # Note
    ///
    /// The underlying representation for a strided vector is not necessarily dense.
    pub fn as_slice(&self) -> &[f64] {
        self.data.as_slice()
    }

    /// Return the underlying data as a mutable slice.
    ///
    /// # Note
    ///
    /// The underlying representation for a strided vector is not necessarily dense.
    pub fn as_mut_slice(&mut self) -> &mut [f64]
    where
        T: MutDenseData,
    {
        self.data.as_mut_slice()
    }

    /// Return element `i` if `i < self.len()`. Otherwise, return `None`.
    pub fn get(&self, i: usize) -> Option<f64> {
        if i < self.len {
            // SAFETY: `i` is in-bounds.
            Some(unsafe { *self.get_unchecked(i) })
        } else {
            None
        }
    }

    /// Returns a reference to an element without boundschecking.
    ///
    /// # Safety
    ///
    /// The following conditions must hold to avoid undefined behavior:
    /// * `i < self.len()`.
    pub unsafe fn get_unchecked(&self, i: usize) -> &f64 {
        debug_assert!(i < self.len);
        self.as_slice().get_unchecked(i * self.stride)
    }

    /// Returns a mutable reference to an element without boundschecking.
    ///
    /// # Safety
    ///
    /// The following conditions must hold to avoid undefined behavior:
    /// * `i < self.len()`.
    pub unsafe fn get_unchecked_mut(&mut self, i: usize) -> &mut f64
    where
        T: MutDenseData,
    {
        debug_assert!(i < self.len);
        let stride = self.stride;
        self.as_mut_slice().get_unchecked_mut(i * stride)
    }

    /// Return an iterator over the elements of the vector.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &f64> {
        self.as_slice().iter().step_by(self.stride)
    }

    /// Return a mutable iterator over the elements of the vector.
    pub fn iter_mut(&mut self) -> impl ExactSizeIterator<Item = &mut f64>
    where
        T: MutDenseData,
    {
        let stride = self.stride;
        self.as_mut_slice().iter_mut().step_by(stride)
    }

    /// Set every element of the vector to `value`.
    pub fn set_all(&mut self, value: f64)
    where
        T: MutDenseData,
    {
        self.iter_mut().for_each(|x| *x = value);
    }

    /// Copy the elements of `other` into `self`.
    ///
    /// # Panics
    ///
    /// Panics if `self.len() != other.len()`.
    pub fn copy_from<U>(&mut self, other: &VectorBase<U>)
    where
        T: MutDenseData,
        U: DenseData,
    {
        assert_eq!(
            self.len(),
            other.len(),
            "tried to copy a vector of length {} into a vector of length {}",
            other.len(),
            self.len()
        );
        std::iter::zip(self.iter_mut(), other.iter()).for_each(|(d, s)| *d = *s);
    }

    /// Collect the elements into a dense `Vec`.
    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().copied().collect()
    }
}

impl<T, U> PartialEq<VectorBase<U>> for VectorBase<T>
where
    T: DenseData,
    U: DenseData,
{
    fn eq(&self, other: &VectorBase<U>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

/// Return a reference to element `i`.
///
/// # Panics
///
/// Panics if `i >= self.len()`.
impl<T> Index<usize> for VectorBase<T>
where
    T: DenseData,
{
    type Output = f64;

    fn index(&self, i: usize) -> &Self::Output {
        assert!(
            i < self.len(),
            "index {i} is out of bounds (max: {})",
            self.len()
        );
        // SAFETY: We have checked that `i` is in-bounds.
        unsafe { self.get_unchecked(i) }
    }
}

/// Return a mutable reference to element `i`.
///
/// # Panics
///
/// Panics if `i >= self.len()`.
impl<T> IndexMut<usize> for VectorBase<T>
where
    T: MutDenseData,
{
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        assert!(
            i < self.len(),
            "index {i} is out of bounds (max: {})",
            self.len()
        );
        // SAFETY: We have checked that `i` is in-bounds.
        unsafe { self.get_unchecked_mut(i) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_length() {
        assert_eq!(linear_length(0, 1), 0);
        assert_eq!(linear_length(0, 7), 0);
        assert_eq!(linear_length(1, 7), 1);

        for len in 1..10 {
            for stride in 1..10 {
                assert_eq!(linear_length(len, stride), (len - 1) * stride + 1);
            }
        }
    }

    #[test]
    fn oversized_shapes_are_rejected() {
        assert_eq!(checked_linear_length(3, 4), Some(linear_length(3, 4)));
        assert_eq!(checked_linear_length(0, usize::MAX), Some(0));
        assert_eq!(checked_linear_length(1, usize::MAX), Some(1));
        assert_eq!(checked_linear_length(3, usize::MAX / 2 + 1), None);

        // `2 * (usize::MAX / 2 + 2) + 1` wraps around to 3.
        let data = [0.0; 3];
        let stride = usize::MAX / 2 + 2;
        let err = VectorConstView::try_from(&data[..], 3, stride).unwrap_err();
        assert!(err.to_string().contains("expected more than usize::MAX"));
        assert!(VectorConstView::try_shrink_from(&data[..], 3, stride).is_err());

        let mut data = [0.0; 3];
        assert!(VectorView::try_shrink_from(&mut data[..], 3, stride).is_err());
    }

    fn expected_error(slice_len: usize, len: usize, stride: usize) -> String {
        format!(
            "tried to construct a strided vector with {len} elements and stride {stride} \
             over a slice of length {} (expected {})",
            slice_len,
            linear_length(len, stride)
        )
    }

    #[test]
    fn try_from_error_misc() {
        let x = TryFromError::<&[f64]> {
            data: &[],
            len: 2,
            stride: 3,
        };

        let display = format!("{}", x);
        let debug = format!("{:?}", x);
        assert!(debug.contains("TryFromError"));
        assert!(debug.contains("data_len: 0"));
        assert!(debug.contains("len: 2"));
        assert!(debug.contains("stride: 3"));
        assert_eq!(display, expected_error(0, 2, 3));

        let x = x.as_static();
        assert_eq!(
            display,
            format!("{}", x),
            "static version of the error must have the same message"
        );
    }

    #[test]
    fn strided_indexing() {
        let data: Vec<f64> = (0..10).map(|i| i as f64).collect();

        let err = VectorConstView::try_from(&data, 3, 4).unwrap_err();
        assert_eq!(err.to_string(), expected_error(10, 3, 4));
        assert_eq!(err.into_inner().len(), 10);

        let v = VectorConstView::try_from(&data[1..10], 3, 4).unwrap();
        assert_eq!(v.len(), 3);
        assert_eq!(v.stride(), 4);
        assert_eq!(v[0], 1.0);
        assert_eq!(v[1], 5.0);
        assert_eq!(v[2], 9.0);
        assert_eq!(v.get(3), None);
        assert_eq!(v.iter().len(), 3);
        assert_eq!(v.to_vec(), [1.0, 5.0, 9.0]);

        let v = VectorConstView::try_shrink_from(&data, 4, 3).unwrap();
        assert_eq!(v.to_vec(), [0.0, 3.0, 6.0, 9.0]);
        assert!(VectorConstView::try_shrink_from(&data, 5, 3).is_err());
    }

    #[test]
    fn strided_mutation() {
        let mut data = vec![0.0; 7];
        {
            let mut v = VectorView::try_shrink_from(&mut data, 3, 3).unwrap();
            v.set_all(2.0);
            v[1] = -1.0;
        }
        assert_eq!(data, [2.0, 0.0, 0.0, -1.0, 0.0, 0.0, 2.0]);

        let source = [7.0, 8.0, 9.0];
        let source = VectorConstView::contiguous(&source[..]);
        let mut v = VectorView::try_shrink_from(&mut data, 3, 2).unwrap();
        v.copy_from(&source);
        assert_eq!(v, source);
        assert_eq!(data, [7.0, 0.0, 8.0, -1.0, 9.0, 0.0, 2.0]);
    }

    #[test]
    fn zero_length() {
        let v = VectorConstView::try_from(&[][..], 0, 5).unwrap();
        assert!(v.is_empty());
        assert_eq!(v.iter().count(), 0);
    }

    #[test]
    #[should_panic(expected = "stride must be non-zero")]
    fn zero_stride_panics() {
        let _ = VectorConstView::try_from(&[1.0][..], 1, 0);
    }

    #[test]
    #[should_panic(expected = "index 3 is out of bounds (max: 3)")]
    fn index_panics() {
        let data = [1.0, 2.0, 3.0];
        let v = VectorConstView::contiguous(&data[..]);
        let _ = v[3];
    }

    #[test]
    #[should_panic(expected = "tried to copy a vector of length 2 into a vector of length 3")]
    fn copy_from_panics() {
        let mut data = [0.0; 3];
        let mut v = VectorView::contiguous(&mut data[..]);
        let source = [1.0, 2.0];
        v.copy_from(&VectorConstView::contiguous(&source[..]));
    }
}
