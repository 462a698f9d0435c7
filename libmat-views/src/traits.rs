/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! The read-only and mutable "matrix concept" shared by every matrix type.
//!
//! Generic algorithms are written against these traits and work unchanged on owning
//! matrices, sub-block views and read-only views.

use crate::views::{
    DenseData, MatrixBase, MatrixConstView, MatrixView, MutDenseData, ShapeError,
};

/// A column-major matrix whose columns are contiguous slices spaced `ld()` elements apart.
///
/// Implementations must uphold the following for every `j < ncols()`:
/// * `col(j)` has length `nrows()` and starts at offset `j * ld()` of `as_slice()`.
/// * `as_slice()` has length `linear_length(nrows(), ncols(), ld())`.
pub trait StridedMatrix {
    /// Return the number of rows.
    fn nrows(&self) -> usize;

    /// Return the number of columns.
    fn ncols(&self) -> usize;

    /// Return the distance between the starts of two consecutive columns.
    fn ld(&self) -> usize;

    /// Return the storage backing the matrix, including any gap between columns.
    fn as_slice(&self) -> &[f64];

    /// Return column `col`.
    ///
    /// # Panics
    ///
    /// Panics if `col >= self.ncols()`.
    fn col(&self, col: usize) -> &[f64];

    /// Return a read-only view of the whole matrix.
    fn as_view(&self) -> MatrixConstView<'_>;

    /// Return `(nrows, ncols)`.
    fn shape(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    /// Return the element at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.nrows()` or `col >= self.ncols()`.
    fn at(&self, row: usize, col: usize) -> f64 {
        assert!(
            row < self.nrows(),
            "row {row} is out of bounds (max: {})",
            self.nrows()
        );
        self.col(col)[row]
    }
}

/// The mutable half of the matrix concept.
pub trait StridedMatrixMut: StridedMatrix {
    /// Return the storage backing the matrix, including any gap between columns.
    fn as_mut_slice(&mut self) -> &mut [f64];

    /// Return column `col` as a mutable slice.
    ///
    /// # Panics
    ///
    /// Panics if `col >= self.ncols()`.
    fn col_mut(&mut self, col: usize) -> &mut [f64];

    /// Return a mutable view of the whole matrix.
    fn as_mut_view(&mut self) -> MatrixView<'_>;

    /// Return a mutable reference to the element at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.nrows()` or `col >= self.ncols()`.
    fn at_mut(&mut self, row: usize, col: usize) -> &mut f64 {
        assert!(
            row < self.nrows(),
            "row {row} is out of bounds (max: {})",
            self.nrows()
        );
        &mut self.col_mut(col)[row]
    }

    /// Overwrite every in-view element with `value`.
    ///
    /// Dense storage is filled in one pass. Strided storage is filled column by column,
    /// leaving the gap between columns untouched.
    fn set_all(&mut self, value: f64) {
        if self.ld() == self.nrows() {
            self.as_mut_slice().fill(value);
        } else {
            for col in 0..self.ncols() {
                self.col_mut(col).fill(value);
            }
        }
    }

    /// Copy the contents of `src` into `self` column by column.
    ///
    /// Returns an error without writing anything if the shapes differ.
    fn try_assign<M>(&mut self, src: &M) -> Result<(), ShapeError>
    where
        M: StridedMatrix + ?Sized,
    {
        if self.shape() != src.shape() {
            return Err(ShapeError {
                dest_nrows: self.nrows(),
                dest_ncols: self.ncols(),
                src_nrows: src.nrows(),
                src_ncols: src.ncols(),
            });
        }

        for col in 0..self.ncols() {
            self.col_mut(col).copy_from_slice(src.col(col));
        }
        Ok(())
    }

    /// Copy the contents of `src` into `self` column by column.
    ///
    /// # Panics
    ///
    /// Panics if `self.shape() != src.shape()`.
    fn assign<M>(&mut self, src: &M)
    where
        M: StridedMatrix + ?Sized,
    {
        if let Err(err) = self.try_assign(src) {
            panic!("{err}");
        }
    }
}

impl<T> StridedMatrix for MatrixBase<T>
where
    T: DenseData,
{
    fn nrows(&self) -> usize {
        MatrixBase::nrows(self)
    }

    fn ncols(&self) -> usize {
        MatrixBase::ncols(self)
    }

    fn ld(&self) -> usize {
        MatrixBase::ld(self)
    }

    fn as_slice(&self) -> &[f64] {
        MatrixBase::as_slice(self)
    }

    fn col(&self, col: usize) -> &[f64] {
        MatrixBase::col(self, col)
    }

    fn as_view(&self) -> MatrixConstView<'_> {
        MatrixBase::as_view(self)
    }

    fn shape(&self) -> (usize, usize) {
        MatrixBase::shape(self)
    }

    fn at(&self, row: usize, col: usize) -> f64 {
        self[(row, col)]
    }
}

impl<T> StridedMatrixMut for MatrixBase<T>
where
    T: MutDenseData,
{
    fn as_mut_slice(&mut self) -> &mut [f64] {
        MatrixBase::as_mut_slice(self)
    }

    fn col_mut(&mut self, col: usize) -> &mut [f64] {
        MatrixBase::col_mut(self, col)
    }

    fn as_mut_view(&mut self) -> MatrixView<'_> {
        MatrixBase::as_mut_view(self)
    }

    fn at_mut(&mut self, row: usize, col: usize) -> &mut f64 {
        &mut self[(row, col)]
    }
}

/// Forward the read-only concept through shared references.
impl<M> StridedMatrix for &M
where
    M: StridedMatrix + ?Sized,
{
    fn nrows(&self) -> usize {
        (**self).nrows()
    }

    fn ncols(&self) -> usize {
        (**self).ncols()
    }

    fn ld(&self) -> usize {
        (**self).ld()
    }

    fn as_slice(&self) -> &[f64] {
        (**self).as_slice()
    }

    fn col(&self, col: usize) -> &[f64] {
        (**self).col(col)
    }

    fn as_view(&self) -> MatrixConstView<'_> {
        (**self).as_view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::Matrix;

    // Sum every element through the concept only.
    fn generic_sum<M: StridedMatrix + ?Sized>(m: &M) -> f64 {
        let mut sum = 0.0;
        for j in 0..m.ncols() {
            for i in 0..m.nrows() {
                sum += m.at(i, j);
            }
        }
        sum
    }

    fn create_test_matrix() -> Matrix {
        Matrix::from_fn(4, 4, |i, j| (i + 4 * j) as f64)
    }

    #[test]
    fn concept_is_uniform() {
        let mut m = create_test_matrix();
        assert_eq!(generic_sum(&m), 120.0);
        assert_eq!(generic_sum(&m.as_view()), 120.0);
        assert_eq!(generic_sum(&m.submatrix(1, 1, 2, 2)), 5.0 + 6.0 + 9.0 + 10.0);
        assert_eq!(generic_sum(&m.submatrix_mut(0, 3, 4, 1)), 12.0 + 13.0 + 14.0 + 15.0);
        assert_eq!(generic_sum(&&m), 120.0);
    }

    #[test]
    fn set_all_on_view_leaves_the_rest() {
        let mut m = create_test_matrix();
        StridedMatrixMut::set_all(&mut m.submatrix_mut(1, 1, 2, 2), -1.0);
        for i in 0..4 {
            for j in 0..4 {
                let inside = (1..3).contains(&i) && (1..3).contains(&j);
                let expected = if inside { -1.0 } else { (i + 4 * j) as f64 };
                assert_eq!(m[(i, j)], expected, "at ({i}, {j})");
            }
        }

        m.set_all(3.0);
        assert!(m.as_slice().iter().all(|&x| x == 3.0));
    }

    #[test]
    fn assign_copies_columns() {
        let src = create_test_matrix();
        let mut dest = Matrix::zeros(6, 6);
        {
            let mut block = dest.submatrix_mut(2, 1, 2, 3);
            block.assign(&src.submatrix(0, 1, 2, 3));
        }
        assert_eq!(dest.submatrix(2, 1, 2, 3), src.submatrix(0, 1, 2, 3));
        assert_eq!(dest[(1, 1)], 0.0);
        assert_eq!(dest[(4, 1)], 0.0);

        let mut owned = Matrix::zeros(4, 4);
        owned.assign(&src);
        assert_eq!(owned, src);
    }

    #[test]
    fn try_assign_reports_shapes() {
        let src = create_test_matrix();
        let mut dest = Matrix::square(3);
        let err = dest.try_assign(&src).unwrap_err();
        assert_eq!(
            err,
            ShapeError {
                dest_nrows: 3,
                dest_ncols: 3,
                src_nrows: 4,
                src_ncols: 4,
            }
        );
        assert!(dest.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    #[should_panic(expected = "cannot assign a 4x4 matrix to a 3x3 matrix")]
    fn assign_panics() {
        let src = create_test_matrix();
        let mut dest = Matrix::square(3);
        dest.assign(&src);
    }

    #[test]
    fn at_mut_writes_through_view() {
        let mut m = create_test_matrix();
        *m.submatrix_mut(1, 2, 3, 2).at_mut(2, 1) = 99.0;
        assert_eq!(m[(3, 3)], 99.0);
    }

    #[test]
    #[should_panic(expected = "row 2 is out of bounds (max: 2)")]
    fn at_panics_on_view() {
        let m = create_test_matrix();
        let v = m.submatrix(1, 1, 2, 2);
        let _ = StridedMatrix::at(&&v, 2, 0);
    }
}
