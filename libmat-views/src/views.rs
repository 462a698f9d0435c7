/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
};

#[cfg(feature = "rayon")]
use rayon::prelude::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
use thiserror::Error;

use crate::strided::{VectorBase, VectorConstView, VectorView};

/// Matrix types (the owning [`Matrix`] as well as the borrowed [`MatrixView`] and
/// [`MatrixConstView`]) need both immutable and mutable storage.
///
/// This trait is implemented by wrappers for immutable and mutable slice references as
/// well as boxed slices, allowing for a common code path for all matrix types.
///
/// # Safety
///
/// This trait is unsafe because it requires `as_slice` to be idempotent (and unsafe code
/// relies on this).
///
/// In other words: `as_slice` must **always** return the same slice with the same length.
pub unsafe trait DenseData {
    /// Return the underlying data as a slice.
    fn as_slice(&self) -> &[f64];
}

/// A mutable companion to `DenseData`.
///
/// Mutating methods on the matrix and vector types are only available when the storage
/// implements this trait, so a [`MatrixConstView`] cannot be written through.
///
/// # Safety
///
/// This trait is unsafe because it requires `as_mut_slice` to be idempotent (and unsafe
/// code relies on this).
///
/// Additionally, the returned slice must span the exact same memory as `as_slice`.
pub unsafe trait MutDenseData: DenseData {
    fn as_mut_slice(&mut self) -> &mut [f64];
}

// SAFETY: This fulfills the idempotency requirement.
unsafe impl DenseData for &[f64] {
    fn as_slice(&self) -> &[f64] {
        self
    }
}

// SAFETY: This fulfills the idempotency requirement.
unsafe impl DenseData for &mut [f64] {
    fn as_slice(&self) -> &[f64] {
        self
    }
}

// SAFETY: This fulfills the idempotency requirement and returns a slice spanning the same
// range as `as_slice`.
unsafe impl MutDenseData for &mut [f64] {
    fn as_mut_slice(&mut self) -> &mut [f64] {
        self
    }
}

// SAFETY: This fulfills the idempotency requirement.
unsafe impl DenseData for Box<[f64]> {
    fn as_slice(&self) -> &[f64] {
        self
    }
}

// SAFETY: This fulfills the idempotency requirement and returns a slice spanning the same
// memory as `as_slice`.
unsafe impl MutDenseData for Box<[f64]> {
    fn as_mut_slice(&mut self) -> &mut [f64] {
        self
    }
}

////////////
// Matrix //
////////////

/// Field width used when a matrix is displayed without an explicit width.
pub const DEFAULT_FIELD_WIDTH: usize = 13;

/// Significant digits used when a matrix is displayed without an explicit precision.
pub const DEFAULT_SIGNIFICANT_DIGITS: usize = 6;

/// Render `value` with [`DEFAULT_SIGNIFICANT_DIGITS`] significant digits.
///
/// Magnitudes below `1e-4` or at least `1e6` switch to scientific notation with a signed,
/// two-digit exponent, and trailing zeros of the fraction are dropped, so `1.0 / 3.0`
/// renders as `0.333333` and `-1234567.0` as `-1.23457e+06`. Finite values never need
/// more than [`DEFAULT_FIELD_WIDTH`] characters.
pub fn format_significant(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let digits = DEFAULT_SIGNIFICANT_DIGITS;
    // Rounding in scientific form first lets the exponent absorb any carry.
    let scientific = format!("{value:.prec$e}", prec = digits - 1);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (digits as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Return the linear length of a slice underlying a `MatrixBase` with the given parameters.
///
/// Every column but the last occupies `ld` elements. The last column only needs `nrows`.
pub fn linear_length(nrows: usize, ncols: usize, ld: usize) -> usize {
    (ncols.max(1) - 1) * ld + ncols.min(1) * nrows
}

/// Like [`linear_length`], but return `None` if the length does not fit in a `usize`.
pub fn checked_linear_length(nrows: usize, ncols: usize, ld: usize) -> Option<usize> {
    (ncols.max(1) - 1)
        .checked_mul(ld)?
        .checked_add(ncols.min(1) * nrows)
}

// The expected length reported by `TryFromError`.
fn expected_length(nrows: usize, ncols: usize, ld: usize) -> String {
    match checked_linear_length(nrows, ncols, ld) {
        Some(len) => len.to_string(),
        None => "more than usize::MAX".to_string(),
    }
}

/// A 2-dimensional matrix laid out in column-major order, as in Fortran and Matlab.
///
/// Element `(row, col)` lives at offset `row + col * ld` of the underlying slice, where
/// the leading dimension `ld` is the distance between the starts of two consecutive
/// columns.
///
/// ```text
///            |<---------- ncols ---------->|
///            +-----------------------------+   ^
///            | a0       b0       c0       |   |
///            | a1       b1       c1       | nrows
///            | a2       b2       c2       |   v
///            +-----------------------------+
///              a3       b3                 ^
///              a4       b4                 |
///              |<- ld ->|            rows skipped between columns
/// ```
///
/// An owning [`Matrix`] is always dense (`ld == nrows`). Views created through
/// [`MatrixBase::submatrix`] inherit the leading dimension of their parent and skip the
/// rows outside the block when stepping from one column to the next.
///
/// When the matrix views immutable memory, it is `Copy`.
#[derive(Debug, Clone, Copy)]
pub struct MatrixBase<T>
where
    T: DenseData,
{
    data: T,
    nrows: usize,
    ncols: usize,
    // The distance between columns. This must be greater than or equal to `nrows`.
    ld: usize,
}

/// Represents an owning matrix in column-major order with no padding between columns.
pub type Matrix = MatrixBase<Box<[f64]>>;

/// Represents a mutable non-owning window into the storage of another matrix.
///
/// Writes through the view are immediately visible through the parent once the view is
/// dropped. The parent cannot be used (or dropped) while the view is alive.
///
/// ```
/// use libmat_views::Matrix;
///
/// let mut m = Matrix::zeros(3, 3);
/// let mut v = m.submatrix_mut(1, 1, 2, 2);
/// v[(1, 1)] = 1.0;
/// m[(0, 0)] = 2.0;
/// assert_eq!(m[(2, 2)], 1.0);
/// ```
///
/// Touching the parent while the view is still used afterwards is a compiler error.
/// ```compile_fail
/// use libmat_views::Matrix;
///
/// let mut m = Matrix::zeros(3, 3);
/// let mut v = m.submatrix_mut(1, 1, 2, 2);
/// m[(0, 0)] = 2.0;
/// v[(1, 1)] = 1.0;
/// ```
///
/// So is keeping a view after its parent is gone.
/// ```compile_fail
/// use libmat_views::{Matrix, MatrixView};
///
/// let v: MatrixView<'_> = {
///     let mut m = Matrix::zeros(3, 3);
///     m.submatrix_mut(1, 1, 2, 2)
/// };
/// assert_eq!(v.nrows(), 2);
/// ```
pub type MatrixView<'a> = MatrixBase<&'a mut [f64]>;

/// Represents an immutable non-owning window into the storage of another matrix.
///
/// ```
/// use libmat_views::{Matrix, StridedMatrix};
///
/// let m = Matrix::from_fn(3, 3, |i, j| (i + 3 * j) as f64);
/// let v = m.submatrix(1, 1, 2, 2);
/// assert_eq!(v[(0, 0)], 4.0);
/// assert_eq!(v.at(1, 1), 8.0);
/// ```
///
/// Writing through a read-only view is a compiler error, whether by index...
/// ```compile_fail
/// use libmat_views::Matrix;
///
/// let m = Matrix::zeros(3, 3);
/// let mut v = m.submatrix(1, 1, 2, 2);
/// v[(0, 0)] = 1.0;
/// ```
///
/// ...or through the mutable matrix concept.
/// ```compile_fail
/// use libmat_views::{Matrix, StridedMatrixMut};
///
/// let m = Matrix::zeros(3, 3);
/// let mut v = m.as_view();
/// v.set_all(1.0);
/// ```
pub type MatrixConstView<'a> = MatrixBase<&'a [f64]>;

#[derive(Debug, Error)]
#[non_exhaustive]
#[error(
    "tried to construct a matrix with {nrows} rows, {ncols} columns and leading dimension \
     {ld} over a slice of length {len} (expected {})",
    expected_length(*nrows, *ncols, *ld)
)]
pub struct TryFromErrorLight {
    len: usize,
    nrows: usize,
    ncols: usize,
    ld: usize,
}

#[derive(Error)]
#[non_exhaustive]
#[error(
    "tried to construct a matrix with {nrows} rows, {ncols} columns and leading dimension \
     {ld} over a slice of length {} (expected {})",
    data.as_slice().len(),
    expected_length(*nrows, *ncols, *ld)
)]
pub struct TryFromError<T: DenseData> {
    data: T,
    nrows: usize,
    ncols: usize,
    ld: usize,
}

// Manually implement `fmt::Debug` so we don't require `T::Debug`.
impl<T: DenseData> fmt::Debug for TryFromError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryFromError")
            .field("data_len", &self.data.as_slice().len())
            .field("nrows", &self.nrows)
            .field("ncols", &self.ncols)
            .field("ld", &self.ld)
            .finish()
    }
}

impl<T: DenseData> TryFromError<T> {
    /// Consume the error and return the base data.
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Return a variation of `Self` that is guaranteed to be `'static` by removing the
    /// data that was passed to the original constructor.
    pub fn as_static(&self) -> TryFromErrorLight {
        TryFromErrorLight {
            len: self.data.as_slice().len(),
            nrows: self.nrows,
            ncols: self.ncols,
            ld: self.ld,
        }
    }
}

/// A requested sub-block does not fit inside its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "cannot take a {nrows}x{ncols} block at offset ({row_offset}, {col_offset}) of a \
     {parent_nrows}x{parent_ncols} matrix"
)]
pub struct SubmatrixError {
    pub row_offset: usize,
    pub col_offset: usize,
    pub nrows: usize,
    pub ncols: usize,
    pub parent_nrows: usize,
    pub parent_ncols: usize,
}

/// Whole-matrix assignment between matrices of different shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "cannot assign a {src_nrows}x{src_ncols} matrix to a {dest_nrows}x{dest_ncols} matrix"
)]
pub struct ShapeError {
    pub dest_nrows: usize,
    pub dest_ncols: usize,
    pub src_nrows: usize,
    pub src_ncols: usize,
}

/// A source of initial element values for `Matrix::new`.
///
/// A plain `f64` fills the matrix with that constant.
pub trait Generator {
    /// Produce the value of the next element in column-major order.
    fn next_value(&mut self) -> f64;
}

impl Generator for f64 {
    fn next_value(&mut self) -> f64 {
        *self
    }
}

/// Initialize each element with the result of a closure, called once per element.
pub struct Init<F>(pub F);

impl<F> Generator for Init<F>
where
    F: FnMut() -> f64,
{
    fn next_value(&mut self) -> f64 {
        (self.0)()
    }
}

impl MatrixBase<Box<[f64]>> {
    /// Construct a new Matrix initialized with the contents of the generator.
    ///
    /// Elements are initialized in memory order, which is column-major.
    ///
    /// # Panics
    ///
    /// Panics if `nrows * ncols` overflows `usize`.
    pub fn new<U>(mut generator: U, nrows: usize, ncols: usize) -> Self
    where
        U: Generator,
    {
        let Some(len) = nrows.checked_mul(ncols) else {
            panic!("a matrix with {nrows} rows and {ncols} columns overflows usize");
        };
        let data: Box<[f64]> = (0..len).map(|_| generator.next_value()).collect();
        Self {
            data,
            nrows,
            ncols,
            ld: nrows,
        }
    }

    /// Construct a new `nrows x ncols` matrix filled with zeros.
    ///
    /// # Panics
    ///
    /// Panics if `nrows * ncols` overflows `usize`.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self::new(0.0, nrows, ncols)
    }

    /// Construct a new square `n x n` matrix filled with zeros.
    pub fn square(n: usize) -> Self {
        Self::zeros(n, n)
    }

    /// Construct a new matrix whose entry `(row, col)` is `f(row, col)`.
    pub fn from_fn<F>(nrows: usize, ncols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let data: Box<[f64]> = (0..ncols)
            .flat_map(|col| (0..nrows).map(move |row| (row, col)))
            .map(|(row, col)| f(row, col))
            .collect();
        Self {
            data,
            nrows,
            ncols,
            ld: nrows,
        }
    }

    /// Try to construct a `Matrix` over the provided column-major data. If the size of
    /// the data is incorrect, return a `TryFromError` containing the data.
    ///
    /// The length of the data must be equal to `nrows * ncols`.
    pub fn try_from(
        data: Box<[f64]>,
        nrows: usize,
        ncols: usize,
    ) -> Result<Self, TryFromError<Box<[f64]>>> {
        if nrows.checked_mul(ncols) != Some(data.len()) {
            Err(TryFromError {
                data,
                nrows,
                ncols,
                ld: nrows,
            })
        } else {
            Ok(Self {
                data,
                nrows,
                ncols,
                ld: nrows,
            })
        }
    }

    /// Consume the matrix, returning the column-major data.
    ///
    /// This loses the information about the number of rows and columns.
    pub fn into_inner(self) -> Box<[f64]> {
        self.data
    }
}

impl<'a> MatrixBase<&'a [f64]> {
    /// Construct a view over `data` with the given shape and leading dimension.
    ///
    /// Returns an error if the length of `data` is not exactly `linear_length(nrows, ncols, ld)`.
    ///
    /// # Panics
    ///
    /// Panics if `ld < nrows`.
    pub fn try_from(
        data: &'a [f64],
        nrows: usize,
        ncols: usize,
        ld: usize,
    ) -> Result<Self, TryFromError<&'a [f64]>> {
        assert!(ld >= nrows, "ld must be greater than or equal to nrows");
        if checked_linear_length(nrows, ncols, ld) == Some(data.len()) {
            Ok(Self {
                data,
                nrows,
                ncols,
                ld,
            })
        } else {
            Err(TryFromError {
                data,
                nrows,
                ncols,
                ld,
            })
        }
    }

    /// Construct a view over `data`, shrinking the slice as needed.
    ///
    /// Returns an error if `data` is shorter than the value returned by `linear_length`.
    ///
    /// # Panics
    ///
    /// Panics if `ld < nrows`.
    pub fn try_shrink_from(
        data: &'a [f64],
        nrows: usize,
        ncols: usize,
        ld: usize,
    ) -> Result<Self, TryFromError<&'a [f64]>> {
        assert!(ld >= nrows, "ld must be greater than or equal to nrows");
        match checked_linear_length(nrows, ncols, ld).and_then(|len| data.get(..len)) {
            Some(data) => Ok(Self {
                data,
                nrows,
                ncols,
                ld,
            }),
            None => Err(TryFromError {
                data,
                nrows,
                ncols,
                ld,
            }),
        }
    }

    /// Construct a view with a single column whose contents are `data`.
    pub fn column_vector(data: &'a [f64]) -> Self {
        let nrows = data.len();
        Self {
            data,
            nrows,
            ncols: 1,
            ld: nrows,
        }
    }

    /// Consume the view and return row `row` with the lifetime of the parent.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.nrows()`.
    pub fn into_row(self, row: usize) -> VectorConstView<'a> {
        assert!(
            row < self.nrows,
            "tried to access row {row} of a matrix with {} rows",
            self.nrows
        );
        let Self {
            data, ncols, ld, ..
        } = self;
        let len = crate::strided::linear_length(ncols, ld);
        let data: &'a [f64] = if ncols == 0 {
            &[]
        } else {
            &data[row..row + len]
        };
        // SAFETY: `data` has exactly the length required for `ncols` elements with a
        // stride of `ld`, and `ld >= nrows > row` so the stride is non-zero.
        unsafe { VectorBase::new_unchecked(data, ncols, ld) }
    }
}

impl<'a> MatrixBase<&'a mut [f64]> {
    /// Construct a mutable view over `data` with the given shape and leading dimension.
    ///
    /// Returns an error if the length of `data` is not exactly `linear_length(nrows, ncols, ld)`.
    ///
    /// # Panics
    ///
    /// Panics if `ld < nrows`.
    pub fn try_from(
        data: &'a mut [f64],
        nrows: usize,
        ncols: usize,
        ld: usize,
    ) -> Result<Self, TryFromError<&'a mut [f64]>> {
        assert!(ld >= nrows, "ld must be greater than or equal to nrows");
        if checked_linear_length(nrows, ncols, ld) == Some(data.len()) {
            Ok(Self {
                data,
                nrows,
                ncols,
                ld,
            })
        } else {
            Err(TryFromError {
                data,
                nrows,
                ncols,
                ld,
            })
        }
    }

    /// Construct a mutable view over `data`, shrinking the slice as needed.
    ///
    /// Returns an error if `data` is shorter than the value returned by `linear_length`.
    ///
    /// # Panics
    ///
    /// Panics if `ld < nrows`.
    pub fn try_shrink_from(
        data: &'a mut [f64],
        nrows: usize,
        ncols: usize,
        ld: usize,
    ) -> Result<Self, TryFromError<&'a mut [f64]>> {
        assert!(ld >= nrows, "ld must be greater than or equal to nrows");
        match checked_linear_length(nrows, ncols, ld) {
            Some(required_length) if data.len() >= required_length => Ok(Self {
                data: &mut data[..required_length],
                nrows,
                ncols,
                ld,
            }),
            _ => Err(TryFromError {
                data,
                nrows,
                ncols,
                ld,
            }),
        }
    }

    /// Consume the view and return row `row` with the lifetime of the parent.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.nrows()`.
    pub fn into_row(self, row: usize) -> VectorView<'a> {
        assert!(
            row < self.nrows,
            "tried to access row {row} of a matrix with {} rows",
            self.nrows
        );
        let Self {
            data, ncols, ld, ..
        } = self;
        let len = crate::strided::linear_length(ncols, ld);
        let data: &'a mut [f64] = if ncols == 0 {
            &mut []
        } else {
            &mut data[row..row + len]
        };
        // SAFETY: `data` has exactly the length required for `ncols` elements with a
        // stride of `ld`, and `ld >= nrows > row` so the stride is non-zero.
        unsafe { VectorBase::new_unchecked(data, ncols, ld) }
    }

    /// Split the view into two disjoint views holding columns `[0, col)` and
    /// `[col, ncols)` respectively.
    ///
    /// # Panics
    ///
    /// Panics if `col > self.ncols()`.
    pub fn split_at_col(self, col: usize) -> (MatrixView<'a>, MatrixView<'a>) {
        assert!(
            col <= self.ncols,
            "tried to split a matrix with {} columns at column {col}",
            self.ncols
        );
        let Self {
            data,
            nrows,
            ncols,
            ld,
        } = self;

        let at = (col * ld).min(data.len());
        let (left, right) = data.split_at_mut(at);
        let left_len = linear_length(nrows, col, ld);
        debug_assert_eq!(right.len(), linear_length(nrows, ncols - col, ld));
        (
            MatrixBase {
                data: &mut left[..left_len],
                nrows,
                ncols: col,
                ld,
            },
            MatrixBase {
                data: right,
                nrows,
                ncols: ncols - col,
                ld,
            },
        )
    }
}

impl<T> MatrixBase<T>
where
    T: DenseData,
{
    /// Return the number of columns in the matrix.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Return the number of rows in the matrix.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Return the count of elements between the start of each column.
    pub fn ld(&self) -> usize {
        self.ld
    }

    /// Return `(nrows, ncols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Return `true` if there is no gap between consecutive columns.
    pub fn is_contiguous(&self) -> bool {
        self.ld == self.nrows
    }

    /// Return the underlying data as a slice.
    ///
    /// # Note
    ///
    /// The underlying representation of a view is not necessarily dense: rows outside
    /// of the view are included between columns.
    pub fn as_slice(&self) -> &[f64] {
        self.data.as_slice()
    }

    /// Return the underlying data as a mutable slice.
    ///
    /// # Note
    ///
    /// The underlying representation of a view is not necessarily dense: rows outside
    /// of the view are included between columns.
    pub fn as_mut_slice(&mut self) -> &mut [f64]
    where
        T: MutDenseData,
    {
        self.data.as_mut_slice()
    }

    /// Return column `col` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `col >= self.ncols()`.
    pub fn col(&self, col: usize) -> &[f64] {
        assert!(
            col < self.ncols(),
            "tried to access column {col} of a matrix with {} columns",
            self.ncols()
        );

        // SAFETY: `col` is in-bounds.
        unsafe { self.get_col_unchecked(col) }
    }

    /// Return column `col` if `col < self.ncols()`. Otherwise, return `None`.
    pub fn get_col(&self, col: usize) -> Option<&[f64]> {
        if col < self.ncols() {
            // SAFETY: `col` is in-bounds.
            Some(unsafe { self.get_col_unchecked(col) })
        } else {
            None
        }
    }

    /// Returns the requested column without boundschecking.
    ///
    /// # Safety
    ///
    /// The following conditions must hold to avoid undefined behavior:
    /// * `col < self.ncols()`.
    pub unsafe fn get_col_unchecked(&self, col: usize) -> &[f64] {
        debug_assert!(col < self.ncols);
        let nrows = self.nrows;
        let start = col * self.ld;

        debug_assert!(start + nrows <= self.as_slice().len());
        // SAFETY: The idempotency requirement of `as_slice` and our audited constructors
        // mean that `self.as_slice()` has a length of `linear_length(nrows, ncols, ld)`.
        //
        // Therefore, this access is in-bounds.
        unsafe { self.as_slice().get_unchecked(start..start + nrows) }
    }

    /// Return column `col` as a mutable slice.
    ///
    /// # Panics
    ///
    /// Panics if `col >= self.ncols()`.
    pub fn col_mut(&mut self, col: usize) -> &mut [f64]
    where
        T: MutDenseData,
    {
        assert!(
            col < self.ncols(),
            "tried to access column {col} of a matrix with {} columns",
            self.ncols()
        );

        // SAFETY: `col` is in-bounds.
        unsafe { self.get_col_unchecked_mut(col) }
    }

    /// Returns the requested column without boundschecking.
    ///
    /// # Safety
    ///
    /// The following conditions must hold to avoid undefined behavior:
    /// * `col < self.ncols()`.
    pub unsafe fn get_col_unchecked_mut(&mut self, col: usize) -> &mut [f64]
    where
        T: MutDenseData,
    {
        debug_assert!(col < self.ncols);
        let nrows = self.nrows;
        let start = col * self.ld;

        debug_assert!(start + nrows <= self.as_slice().len());
        // SAFETY: The idempotency requirement of `as_mut_slice` and our audited
        // constructors mean that `self.as_mut_slice()` has a length of
        // `linear_length(nrows, ncols, ld)`.
        //
        // Therefore, this access is in-bounds.
        unsafe {
            self.data
                .as_mut_slice()
                .get_unchecked_mut(start..start + nrows)
        }
    }

    /// Return row `row` as a strided vector view with a stride of `self.ld()`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.nrows()`.
    pub fn row(&self, row: usize) -> VectorConstView<'_> {
        self.as_view().into_row(row)
    }

    /// Return row `row` as a mutable strided vector view with a stride of `self.ld()`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.nrows()`.
    pub fn row_mut(&mut self, row: usize) -> VectorView<'_>
    where
        T: MutDenseData,
    {
        self.as_mut_view().into_row(row)
    }

    /// Return an iterator over all columns in the matrix.
    ///
    /// Columns are yielded sequentially beginning with column 0.
    pub fn col_iter(&self) -> impl ExactSizeIterator<Item = &[f64]> {
        // SAFETY: `col` is always less than `self.ncols()`.
        (0..self.ncols).map(move |col| unsafe { self.get_col_unchecked(col) })
    }

    /// Return a mutable iterator over all columns in the matrix.
    ///
    /// Columns are yielded sequentially beginning with column 0.
    pub fn col_iter_mut(&mut self) -> ColIterMut<'_>
    where
        T: MutDenseData,
    {
        let nrows = self.nrows;
        let ncols = self.ncols;
        let ld = self.ld;
        ColIterMut {
            rest: self.data.as_mut_slice(),
            remaining: ncols,
            nrows,
            ld,
        }
    }

    /// Return a parallel iterator over the columns of the matrix.
    #[cfg(feature = "rayon")]
    pub fn par_col_iter(&self) -> impl IndexedParallelIterator<Item = &[f64]>
    where
        T: Sync,
    {
        (0..self.ncols)
            .into_par_iter()
            // SAFETY: `col` is always less than `self.ncols()`.
            .map(move |col| unsafe { self.get_col_unchecked(col) })
    }

    /// Return a parallel iterator over the mutable columns of the matrix.
    ///
    /// Each worker receives a disjoint column.
    #[cfg(feature = "rayon")]
    pub fn par_col_iter_mut(&mut self) -> impl IndexedParallelIterator<Item = &mut [f64]>
    where
        T: MutDenseData,
    {
        self.col_iter_mut().collect::<Vec<_>>().into_par_iter()
    }

    /// Return a view over the matrix.
    pub fn as_view(&self) -> MatrixConstView<'_> {
        MatrixBase {
            data: self.as_slice(),
            nrows: self.nrows,
            ncols: self.ncols,
            ld: self.ld,
        }
    }

    /// Return a mutable view over the matrix.
    pub fn as_mut_view(&mut self) -> MatrixView<'_>
    where
        T: MutDenseData,
    {
        let nrows = self.nrows;
        let ncols = self.ncols;
        let ld = self.ld;
        MatrixBase {
            data: self.as_mut_slice(),
            nrows,
            ncols,
            ld,
        }
    }

    // Return the offset of element `(row_offset, col_offset)` if the requested block fits.
    fn block_offset(
        &self,
        row_offset: usize,
        col_offset: usize,
        nrows: usize,
        ncols: usize,
    ) -> Result<usize, SubmatrixError> {
        let fits = row_offset < self.nrows
            && nrows <= self.nrows - row_offset
            && col_offset < self.ncols
            && ncols <= self.ncols - col_offset;

        if fits {
            Ok(row_offset + col_offset * self.ld)
        } else {
            Err(SubmatrixError {
                row_offset,
                col_offset,
                nrows,
                ncols,
                parent_nrows: self.nrows,
                parent_ncols: self.ncols,
            })
        }
    }

    /// Return a read-only view of the `nrows x ncols` block whose top-left corner is
    /// `(row_offset, col_offset)`, or an error if the block does not fit.
    ///
    /// The view shares storage and leading dimension with `self`.
    pub fn try_submatrix(
        &self,
        row_offset: usize,
        col_offset: usize,
        nrows: usize,
        ncols: usize,
    ) -> Result<MatrixConstView<'_>, SubmatrixError> {
        let offset = self.block_offset(row_offset, col_offset, nrows, ncols)?;
        let len = linear_length(nrows, ncols, self.ld);
        Ok(MatrixBase {
            data: &self.as_slice()[offset..offset + len],
            nrows,
            ncols,
            ld: self.ld,
        })
    }

    /// Return a read-only view of the `nrows x ncols` block whose top-left corner is
    /// `(row_offset, col_offset)`.
    ///
    /// # Panics
    ///
    /// Panics unless `row_offset < self.nrows()`, `row_offset + nrows <= self.nrows()`,
    /// `col_offset < self.ncols()` and `col_offset + ncols <= self.ncols()`.
    pub fn submatrix(
        &self,
        row_offset: usize,
        col_offset: usize,
        nrows: usize,
        ncols: usize,
    ) -> MatrixConstView<'_> {
        match self.try_submatrix(row_offset, col_offset, nrows, ncols) {
            Ok(view) => view,
            Err(err) => panic!("{err}"),
        }
    }

    /// Return a mutable view of the `nrows x ncols` block whose top-left corner is
    /// `(row_offset, col_offset)`, or an error if the block does not fit.
    pub fn try_submatrix_mut(
        &mut self,
        row_offset: usize,
        col_offset: usize,
        nrows: usize,
        ncols: usize,
    ) -> Result<MatrixView<'_>, SubmatrixError>
    where
        T: MutDenseData,
    {
        let offset = self.block_offset(row_offset, col_offset, nrows, ncols)?;
        let len = linear_length(nrows, ncols, self.ld);
        let ld = self.ld;
        Ok(MatrixBase {
            data: &mut self.as_mut_slice()[offset..offset + len],
            nrows,
            ncols,
            ld,
        })
    }

    /// Return a mutable view of the `nrows x ncols` block whose top-left corner is
    /// `(row_offset, col_offset)`.
    ///
    /// # Panics
    ///
    /// Panics unless `row_offset < self.nrows()`, `row_offset + nrows <= self.nrows()`,
    /// `col_offset < self.ncols()` and `col_offset + ncols <= self.ncols()`.
    pub fn submatrix_mut(
        &mut self,
        row_offset: usize,
        col_offset: usize,
        nrows: usize,
        ncols: usize,
    ) -> MatrixView<'_>
    where
        T: MutDenseData,
    {
        match self.try_submatrix_mut(row_offset, col_offset, nrows, ncols) {
            Ok(view) => view,
            Err(err) => panic!("{err}"),
        }
    }

    /// Return two disjoint mutable views holding columns `[0, col)` and `[col, ncols)`.
    ///
    /// # Panics
    ///
    /// Panics if `col > self.ncols()`.
    pub fn split_at_col_mut(&mut self, col: usize) -> (MatrixView<'_>, MatrixView<'_>)
    where
        T: MutDenseData,
    {
        self.as_mut_view().split_at_col(col)
    }

    /// Return a pointer to the base of the matrix.
    pub fn as_ptr(&self) -> *const f64 {
        self.as_slice().as_ptr()
    }

    /// Return a pointer to the base of the matrix.
    pub fn as_mut_ptr(&mut self) -> *mut f64
    where
        T: MutDenseData,
    {
        self.as_mut_slice().as_mut_ptr()
    }

    // Panic with the offending coordinate unless `(row, col)` is inside the matrix.
    #[inline]
    #[track_caller]
    fn check_index(&self, row: usize, col: usize) {
        if row >= self.nrows {
            panic!("row {row} is out of bounds (max: {})", self.nrows);
        }
        if col >= self.ncols {
            panic!("col {col} is out of bounds (max: {})", self.ncols);
        }
    }

    /// Returns a reference to an element without boundschecking.
    ///
    /// # Safety
    ///
    /// The following conditions must hold to avoid undefined behavior:
    /// * `row < self.nrows()`.
    /// * `col < self.ncols()`.
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> &f64 {
        debug_assert!(row < self.nrows);
        debug_assert!(col < self.ncols);
        self.as_slice().get_unchecked(row + col * self.ld)
    }

    /// Returns a mutable reference to an element without boundschecking.
    ///
    /// # Safety
    ///
    /// The following conditions must hold to avoid undefined behavior:
    /// * `row < self.nrows()`.
    /// * `col < self.ncols()`.
    pub unsafe fn get_unchecked_mut(&mut self, row: usize, col: usize) -> &mut f64
    where
        T: MutDenseData,
    {
        let ld = self.ld;
        debug_assert!(row < self.nrows);
        debug_assert!(col < self.ncols);
        self.as_mut_slice().get_unchecked_mut(row + col * ld)
    }

    /// Copy the in-view elements into a new dense `Matrix`.
    pub fn to_owned(&self) -> Matrix {
        let data: Box<[f64]> = self.col_iter().flatten().copied().collect();
        Matrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
            ld: self.nrows,
        }
    }
}

/// Mutable iterator over the columns of a matrix, returned by
/// [`MatrixBase::col_iter_mut`].
#[derive(Debug)]
pub struct ColIterMut<'a> {
    rest: &'a mut [f64],
    remaining: usize,
    nrows: usize,
    ld: usize,
}

impl<'a> Iterator for ColIterMut<'a> {
    type Item = &'a mut [f64];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let rest = std::mem::take(&mut self.rest);
        if self.remaining == 0 {
            // The last column has no trailing gap.
            Some(&mut rest[..self.nrows])
        } else {
            let (head, tail) = rest.split_at_mut(self.ld);
            self.rest = tail;
            Some(&mut head[..self.nrows])
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ColIterMut<'_> {}

/// Allow mutable views to be demoted to read-only views.
impl<'a> From<MatrixView<'a>> for MatrixConstView<'a> {
    fn from(view: MatrixView<'a>) -> Self {
        MatrixBase {
            data: view.data,
            nrows: view.nrows,
            ncols: view.ncols,
            ld: view.ld,
        }
    }
}

/// Two matrices are equal when they have the same shape and the same in-view elements.
/// Storage outside of the view (the gap between columns) does not participate.
impl<T, U> PartialEq<MatrixBase<U>> for MatrixBase<T>
where
    T: DenseData,
    U: DenseData,
{
    fn eq(&self, other: &MatrixBase<U>) -> bool {
        self.shape() == other.shape()
            && std::iter::zip(self.col_iter(), other.col_iter()).all(|(a, b)| a == b)
    }
}

/// Renders one row per line with every field right-aligned.
///
/// The field width defaults to [`DEFAULT_FIELD_WIDTH`] and values are rendered by
/// [`format_significant`]. The width and precision of the formatter (as in `{:8.3}`) are
/// honored when provided.
impl<T> fmt::Display for MatrixBase<T>
where
    T: DenseData,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = f.width().unwrap_or(DEFAULT_FIELD_WIDTH);
        let precision = f.precision();
        for row in 0..self.nrows {
            for col in 0..self.ncols {
                // SAFETY: `row` and `col` are in-bounds.
                let value = unsafe { *self.get_unchecked(row, col) };
                match precision {
                    Some(precision) => write!(f, "{value:>width$.precision$} ")?,
                    None => write!(f, "{:>width$} ", format_significant(value))?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Return a reference to the item at entry `(row, col)` in the matrix.
///
/// # Panics
///
/// Panics if `row >= self.nrows()` or `col >= self.ncols()`.
impl<T> Index<(usize, usize)> for MatrixBase<T>
where
    T: DenseData,
{
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        self.check_index(row, col);
        // SAFETY: `check_index` returned, so both coordinates are in-bounds.
        unsafe { self.get_unchecked(row, col) }
    }
}

/// Return a mutable reference to the item at entry `(row, col)` in the matrix.
///
/// # Panics
///
/// Panics if `row >= self.nrows()` or `col >= self.ncols()`.
impl<T> IndexMut<(usize, usize)> for MatrixBase<T>
where
    T: MutDenseData,
{
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        self.check_index(row, col);
        // SAFETY: `check_index` returned, so both coordinates are in-bounds.
        unsafe { self.get_unchecked_mut(row, col) }
    }
}

///////////
// Tests //
///////////
