/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Generic algorithms over the matrix concept.
//!
//! Every function is bounded on [`StridedMatrix`] or [`StridedMatrixMut`] and therefore
//! accepts owning matrices, mutable views and read-only views alike. Precondition
//! violations panic with a message naming the offending values.

use std::io;

use libmat_views::{StridedMatrix, StridedMatrixMut, VectorConstView, VectorView};

/// Return a read-only vector view of column `col` of `m`, with a stride of one.
///
/// # Panics
///
/// Panics if `col >= m.ncols()`.
pub fn get_col<M>(m: &M, col: usize) -> VectorConstView<'_>
where
    M: StridedMatrix + ?Sized,
{
    VectorConstView::contiguous(m.col(col))
}

/// Return a mutable vector view of column `col` of `m`, with a stride of one.
///
/// # Panics
///
/// Panics if `col >= m.ncols()`.
pub fn get_col_mut<M>(m: &mut M, col: usize) -> VectorView<'_>
where
    M: StridedMatrixMut + ?Sized,
{
    VectorView::contiguous(m.col_mut(col))
}

/// Return a read-only vector view of row `row` of `m`, with a stride of `m.ld()`.
///
/// # Panics
///
/// Panics if `row >= m.nrows()`.
pub fn get_row<M>(m: &M, row: usize) -> VectorConstView<'_>
where
    M: StridedMatrix + ?Sized,
{
    m.as_view().into_row(row)
}

/// Return a mutable vector view of row `row` of `m`, with a stride of `m.ld()`.
///
/// # Panics
///
/// Panics if `row >= m.nrows()`.
pub fn get_row_mut<M>(m: &mut M, row: usize) -> VectorView<'_>
where
    M: StridedMatrixMut + ?Sized,
{
    m.as_mut_view().into_row(row)
}

/// Copy column `col_src` of `src` into column `col_dest` of `dest`.
///
/// # Panics
///
/// * Panics if `src.nrows() != dest.nrows()`.
/// * Panics if either column index is out of bounds.
pub fn col_copy<A, B>(src: &B, col_src: usize, dest: &mut A, col_dest: usize)
where
    A: StridedMatrixMut + ?Sized,
    B: StridedMatrix + ?Sized,
{
    assert_eq!(
        src.nrows(),
        dest.nrows(),
        "cannot copy a column with {} rows into a column with {} rows",
        src.nrows(),
        dest.nrows()
    );
    dest.col_mut(col_dest).copy_from_slice(src.col(col_src));
}

// The row range `[offset, offset + count)` must start inside the matrix and fit in it.
fn check_row_range(offset: usize, count: usize, nrows: usize, which: &str) {
    assert!(
        offset < nrows && count <= nrows - offset,
        "rows {offset}..{} are out of bounds for the {which} matrix with {nrows} rows",
        offset.saturating_add(count)
    );
}

/// Copy `row_nb` elements of column `col_src` of `src`, starting at row
/// `row_offset_src`, into column `col_dest` of `dest` starting at row `row_offset_dest`.
///
/// # Panics
///
/// * Panics if `row_offset_src >= src.nrows()` or the range overruns `src`.
/// * Panics if `row_offset_dest >= dest.nrows()` or the range overruns `dest`.
/// * Panics if either column index is out of bounds.
pub fn col_copy_range<A, B>(
    src: &B,
    col_src: usize,
    row_offset_src: usize,
    row_nb: usize,
    dest: &mut A,
    col_dest: usize,
    row_offset_dest: usize,
) where
    A: StridedMatrixMut + ?Sized,
    B: StridedMatrix + ?Sized,
{
    check_row_range(row_offset_src, row_nb, src.nrows(), "source");
    check_row_range(row_offset_dest, row_nb, dest.nrows(), "destination");
    let from = &src.col(col_src)[row_offset_src..row_offset_src + row_nb];
    dest.col_mut(col_dest)[row_offset_dest..row_offset_dest + row_nb].copy_from_slice(from);
}

/// Copy row `row_src` of `src` into row `row_dest` of `dest`.
///
/// # Panics
///
/// * Panics if `src.ncols() != dest.ncols()`.
/// * Panics if either row index is out of bounds.
pub fn row_copy<A, B>(src: &B, row_src: usize, dest: &mut A, row_dest: usize)
where
    A: StridedMatrixMut + ?Sized,
    B: StridedMatrix + ?Sized,
{
    assert_eq!(
        src.ncols(),
        dest.ncols(),
        "cannot copy a row with {} columns into a row with {} columns",
        src.ncols(),
        dest.ncols()
    );
    get_row_mut(dest, row_dest).copy_from(&get_row(src, row_src));
}

/// Set `row_nb` elements of column `col` of `m`, starting at row `row_offset`, to `value`.
///
/// # Panics
///
/// * Panics if `row_offset >= m.nrows()` or the range overruns `m`.
/// * Panics if `col >= m.ncols()`.
pub fn col_set<M>(m: &mut M, col: usize, row_offset: usize, row_nb: usize, value: f64)
where
    M: StridedMatrixMut + ?Sized,
{
    check_row_range(row_offset, row_nb, m.nrows(), "destination");
    m.col_mut(col)[row_offset..row_offset + row_nb].fill(value);
}

/// Mirror the strict upper triangle of the leading `min(nrows, ncols)` block into the
/// lower triangle.
pub fn copy_upper_to_lower<M>(m: &mut M)
where
    M: StridedMatrixMut + ?Sized,
{
    let dim = m.nrows().min(m.ncols());
    for i in 0..dim {
        for j in 0..i {
            let upper = m.at(j, i);
            *m.at_mut(i, j) = upper;
        }
    }
}

/// Mirror the strict lower triangle of the leading `min(nrows, ncols)` block into the
/// upper triangle.
pub fn copy_lower_to_upper<M>(m: &mut M)
where
    M: StridedMatrixMut + ?Sized,
{
    let dim = m.nrows().min(m.ncols());
    for i in 0..dim {
        for j in 0..i {
            let lower = m.at(i, j);
            *m.at_mut(j, i) = lower;
        }
    }
}

/// Zero `m` and put ones on its main diagonal.
pub fn set_identity<M>(m: &mut M)
where
    M: StridedMatrixMut + ?Sized,
{
    m.set_all(0.0);
    for i in 0..m.nrows().min(m.ncols()) {
        *m.at_mut(i, i) = 1.0;
    }
}

/// Transpose the square matrix `m` in place.
///
/// # Panics
///
/// Panics if `m` is not square.
pub fn transpose<M>(m: &mut M)
where
    M: StridedMatrixMut + ?Sized,
{
    assert_eq!(
        m.nrows(),
        m.ncols(),
        "in-place transpose requires a square matrix, got {}x{}",
        m.nrows(),
        m.ncols()
    );
    for i in 0..m.nrows() {
        for j in 0..i {
            let lower = m.at(i, j);
            let upper = m.at(j, i);
            *m.at_mut(i, j) = upper;
            *m.at_mut(j, i) = lower;
        }
    }
}

/// Write the transpose of `src` into `dest`.
///
/// # Panics
///
/// Panics unless `dest` is `src.ncols() x src.nrows()`.
pub fn transpose_into<A, B>(dest: &mut A, src: &B)
where
    A: StridedMatrixMut + ?Sized,
    B: StridedMatrix + ?Sized,
{
    assert!(
        dest.nrows() == src.ncols() && dest.ncols() == src.nrows(),
        "cannot transpose a {}x{} matrix into a {}x{} matrix",
        src.nrows(),
        src.ncols(),
        dest.nrows(),
        dest.ncols()
    );
    for j in 0..dest.ncols() {
        // Column `j` of the destination is row `j` of the source.
        get_col_mut(dest, j).copy_from(&get_row(src, j));
    }
}

fn zip_columns<A, B, F>(a: &mut A, b: &B, op: &str, mut f: F)
where
    A: StridedMatrixMut + ?Sized,
    B: StridedMatrix + ?Sized,
    F: FnMut(&mut f64, f64),
{
    assert_eq!(
        a.shape(),
        b.shape(),
        "cannot {op} a {}x{} matrix and a {}x{} matrix",
        a.nrows(),
        a.ncols(),
        b.nrows(),
        b.ncols()
    );
    for col in 0..a.ncols() {
        std::iter::zip(a.col_mut(col), b.col(col)).for_each(|(x, y)| f(x, *y));
    }
}

fn for_each_element<A, F>(a: &mut A, f: F)
where
    A: StridedMatrixMut + ?Sized,
    F: FnMut(&mut f64) + Copy,
{
    for col in 0..a.ncols() {
        a.col_mut(col).iter_mut().for_each(f);
    }
}

/// Compute `a += b` element-wise.
///
/// # Panics
///
/// Panics if `a.shape() != b.shape()`.
pub fn add<A, B>(a: &mut A, b: &B)
where
    A: StridedMatrixMut + ?Sized,
    B: StridedMatrix + ?Sized,
{
    zip_columns(a, b, "add", |x, y| *x += y);
}

/// Compute `a -= b` element-wise.
///
/// # Panics
///
/// Panics if `a.shape() != b.shape()`.
pub fn sub<A, B>(a: &mut A, b: &B)
where
    A: StridedMatrixMut + ?Sized,
    B: StridedMatrix + ?Sized,
{
    zip_columns(a, b, "subtract", |x, y| *x -= y);
}

/// Add `d` to every element of `a`.
pub fn add_scalar<A>(a: &mut A, d: f64)
where
    A: StridedMatrixMut + ?Sized,
{
    for_each_element(a, move |x| *x += d);
}

/// Subtract `d` from every element of `a`.
pub fn sub_scalar<A>(a: &mut A, d: f64)
where
    A: StridedMatrixMut + ?Sized,
{
    for_each_element(a, move |x| *x -= d);
}

/// Negate every element of `a`.
pub fn negate<A>(a: &mut A)
where
    A: StridedMatrixMut + ?Sized,
{
    for_each_element(a, |x| *x = -*x);
}

/// Return the largest absolute value in `m`, or `0.0` if `m` is empty.
///
/// `NaN` elements are skipped.
pub fn nrminf<M>(m: &M) -> f64
where
    M: StridedMatrix + ?Sized,
{
    (0..m.ncols())
        .flat_map(|col| m.col(col))
        .fold(0.0, |norm: f64, x| norm.max(x.abs()))
}

/// Return `true` if some pair of corresponding elements differs by more than `tol`.
///
/// # Panics
///
/// Panics if `a.shape() != b.shape()`.
pub fn is_diff<A, B>(a: &A, b: &B, tol: f64) -> bool
where
    A: StridedMatrix + ?Sized,
    B: StridedMatrix + ?Sized,
{
    assert_eq!(
        a.shape(),
        b.shape(),
        "cannot compare a {}x{} matrix with a {}x{} matrix",
        a.nrows(),
        a.ncols(),
        b.nrows(),
        b.ncols()
    );
    (0..a.ncols()).any(|col| {
        std::iter::zip(a.col(col), b.col(col)).any(|(x, y)| (x - y).abs() > tol)
    })
}

/// Like [`is_diff`], but only compares the upper triangle (diagonal included) of two
/// square matrices.
///
/// # Panics
///
/// Panics if `a.shape() != b.shape()` or if `a` is not square.
pub fn is_diff_sym<A, B>(a: &A, b: &B, tol: f64) -> bool
where
    A: StridedMatrix + ?Sized,
    B: StridedMatrix + ?Sized,
{
    assert!(
        a.shape() == b.shape() && a.nrows() == a.ncols(),
        "cannot symmetrically compare a {}x{} matrix with a {}x{} matrix",
        a.nrows(),
        a.ncols(),
        b.nrows(),
        b.ncols()
    );
    let n = a.nrows();
    (0..n).any(|col| (0..=col).any(|row| (a.at(row, col) - b.at(row, col)).abs() > tol))
}

/// Tile `a` `multv` times vertically and `multh` times horizontally into `out`.
///
/// # Panics
///
/// Panics unless `out` is `(multv * a.nrows()) x (multh * a.ncols())`, including when
/// either product overflows `usize`.
pub fn repmat<A, B>(a: &B, multv: usize, multh: usize, out: &mut A)
where
    A: StridedMatrixMut + ?Sized,
    B: StridedMatrix + ?Sized,
{
    let (nrows, ncols) = a.shape();
    assert!(
        multv.checked_mul(nrows) == Some(out.nrows())
            && multh.checked_mul(ncols) == Some(out.ncols()),
        "cannot tile a {nrows}x{ncols} matrix {multv}x{multh} times into a {}x{} matrix",
        out.nrows(),
        out.ncols()
    );
    for tile_col in 0..multh {
        for col in 0..ncols {
            let dest = out.col_mut(tile_col * ncols + col);
            for tile_row in 0..multv {
                dest[tile_row * nrows..(tile_row + 1) * nrows].copy_from_slice(a.col(col));
            }
        }
    }
}

/// Write `m` to `out`, one line per row with right-aligned fields of width 13.
///
/// Values keep six significant digits, so every field fits its width.
pub fn print<W, M>(out: &mut W, m: &M) -> io::Result<()>
where
    W: io::Write + ?Sized,
    M: StridedMatrix + ?Sized,
{
    write!(out, "{}", m.as_view())
}
