/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Indexed assignment between matrices using lists of row and column indices.
//!
//! A [`Selection`] is either [`Selection::All`], which stands for every index of its own
//! side of the assignment, or an explicit list of indices. Repeated indices are allowed on
//! both sides; when a destination index repeats, the last write wins.
//!
//! Every routine comes in two forms. The `try_*` form validates its arguments up front and
//! returns a [`SelectionError`] without writing anything when they are inconsistent. The
//! plain form panics with the same message.

use libmat_views::{StridedMatrix, StridedMatrixMut};
use thiserror::Error;
use tracing::{debug, trace};

use crate::common::{Axis, Side};
use crate::ops;

/// The indices taking part in an indexed assignment along one axis.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    /// Every index of the matrix on this side, in increasing order.
    #[default]
    All,
    /// The listed indices, in order. An empty list selects nothing.
    Indices(&'a [usize]),
}

impl<'a> Selection<'a> {
    /// Return `true` if this is [`Selection::All`].
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Return the number of indices selected from an axis of length `extent`.
    pub fn len(&self, extent: usize) -> usize {
        match self {
            Self::All => extent,
            Self::Indices(indices) => indices.len(),
        }
    }

    // Check every index against `extent`.
    fn resolve(
        self,
        side: Side,
        axis: Axis,
        extent: usize,
    ) -> Result<Resolved<'a>, SelectionError> {
        if let Self::Indices(indices) = self {
            if let Some((position, &index)) =
                indices.iter().enumerate().find(|&(_, &index)| index >= extent)
            {
                return Err(SelectionError::OutOfBounds {
                    side,
                    axis,
                    position,
                    index,
                    extent,
                });
            }
        }
        Ok(Resolved {
            selection: self,
            len: self.len(extent),
        })
    }
}

impl<'a> From<&'a [usize]> for Selection<'a> {
    fn from(indices: &'a [usize]) -> Self {
        Self::Indices(indices)
    }
}

impl<'a, const N: usize> From<&'a [usize; N]> for Selection<'a> {
    fn from(indices: &'a [usize; N]) -> Self {
        Self::Indices(indices)
    }
}

impl<'a> From<&'a Vec<usize>> for Selection<'a> {
    fn from(indices: &'a Vec<usize>) -> Self {
        Self::Indices(indices)
    }
}

impl From<std::ops::RangeFull> for Selection<'_> {
    fn from(_: std::ops::RangeFull) -> Self {
        Self::All
    }
}

/// A selection whose indices have been checked against the matrix it applies to.
#[derive(Debug, Clone, Copy)]
struct Resolved<'a> {
    selection: Selection<'a>,
    len: usize,
}

impl Resolved<'_> {
    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, k: usize) -> usize {
        match self.selection {
            Selection::All => k,
            Selection::Indices(indices) => indices[k],
        }
    }
}

/// Reasons an indexed assignment can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SelectionError {
    /// An explicit index does not address a row or column of its matrix.
    #[error(
        "{side} {axis} index {index} at position {position} is out of bounds \
         for a matrix with {extent} {axis}s"
    )]
    OutOfBounds {
        side: Side,
        axis: Axis,
        position: usize,
        index: usize,
        extent: usize,
    },
    /// The two selections along an axis pick different numbers of indices.
    #[error("cannot assign {src} selected source {axis}s to {dest} selected destination {axis}s")]
    LengthMismatch { axis: Axis, dest: usize, src: usize },
    /// The two matrices differ along an axis that is copied in full.
    #[error("destination has {dest} {axis}s but source has {src}")]
    ShapeMismatch { axis: Axis, dest: usize, src: usize },
}

fn check_extent(axis: Axis, dest: usize, src: usize) -> Result<(), SelectionError> {
    if dest == src {
        Ok(())
    } else {
        Err(SelectionError::ShapeMismatch { axis, dest, src })
    }
}

fn resolve_pair<'a, 'b>(
    axis: Axis,
    dest: Selection<'a>,
    dest_extent: usize,
    src: Selection<'b>,
    src_extent: usize,
) -> Result<(Resolved<'a>, Resolved<'b>), SelectionError> {
    let dest = dest.resolve(Side::Destination, axis, dest_extent)?;
    let src = src.resolve(Side::Source, axis, src_extent)?;
    if dest.len() != src.len() {
        return Err(SelectionError::LengthMismatch {
            axis,
            dest: dest.len(),
            src: src.len(),
        });
    }
    Ok((dest, src))
}

fn rejected(err: &SelectionError) {
    debug!(error = %err, "rejected indexed assignment");
}

fn reorder_columns<A, B>(
    dest: &mut A,
    dest_cols: Selection<'_>,
    src: &B,
    src_cols: Selection<'_>,
) -> Result<(), SelectionError>
where
    A: StridedMatrixMut + ?Sized,
    B: StridedMatrix + ?Sized,
{
    check_extent(Axis::Row, dest.nrows(), src.nrows())?;
    if dest_cols.is_all() && src_cols.is_all() {
        check_extent(Axis::Column, dest.ncols(), src.ncols())?;
        trace!(nrows = dest.nrows(), ncols = dest.ncols(), "full copy");
        dest.assign(src);
        return Ok(());
    }

    let (to, from) = resolve_pair(Axis::Column, dest_cols, dest.ncols(), src_cols, src.ncols())?;
    trace!(count = to.len(), "column reorder");
    for k in 0..to.len() {
        ops::col_copy(src, from.get(k), dest, to.get(k));
    }
    Ok(())
}

fn reorder_rows<A, B>(
    dest: &mut A,
    dest_rows: Selection<'_>,
    src: &B,
    src_rows: Selection<'_>,
) -> Result<(), SelectionError>
where
    A: StridedMatrixMut + ?Sized,
    B: StridedMatrix + ?Sized,
{
    check_extent(Axis::Column, dest.ncols(), src.ncols())?;
    if dest_rows.is_all() && src_rows.is_all() {
        check_extent(Axis::Row, dest.nrows(), src.nrows())?;
        trace!(nrows = dest.nrows(), ncols = dest.ncols(), "full copy");
        dest.assign(src);
        return Ok(());
    }

    let (to, from) = resolve_pair(Axis::Row, dest_rows, dest.nrows(), src_rows, src.nrows())?;
    trace!(count = to.len(), "row reorder");
    for k in 0..to.len() {
        ops::row_copy(src, from.get(k), dest, to.get(k));
    }
    Ok(())
}

fn gather<A, B>(
    dest: &mut A,
    dest_rows: Selection<'_>,
    dest_cols: Selection<'_>,
    src: &B,
    src_rows: Selection<'_>,
    src_cols: Selection<'_>,
) -> Result<(), SelectionError>
where
    A: StridedMatrixMut + ?Sized,
    B: StridedMatrix + ?Sized,
{
    let (to_rows, from_rows) =
        resolve_pair(Axis::Row, dest_rows, dest.nrows(), src_rows, src.nrows())?;
    let (to_cols, from_cols) =
        resolve_pair(Axis::Column, dest_cols, dest.ncols(), src_cols, src.ncols())?;
    trace!(
        nrows = to_rows.len(),
        ncols = to_cols.len(),
        "element-wise gather"
    );

    // A repeated destination cell keeps the write with the largest `(i, j)`.
    for j in 0..to_cols.len() {
        let from = src.col(from_cols.get(j));
        let to = dest.col_mut(to_cols.get(j));
        for i in 0..to_rows.len() {
            to[to_rows.get(i)] = from[from_rows.get(i)];
        }
    }
    Ok(())
}

/// Copy the selected columns of `src` into the selected columns of `dest`, so that
/// column `dest_cols[k]` of `dest` receives column `src_cols[k]` of `src`.
///
/// If both selections are [`Selection::All`], this is a whole-matrix assignment and the
/// shapes must match. Otherwise [`Selection::All`] stands for every column of its own
/// matrix and the two selections must have the same length.
///
/// Returns an error without modifying `dest` if
/// * `dest.nrows() != src.nrows()`,
/// * an index is out of bounds, or
/// * the selections differ in length.
pub fn try_reorder_columns_by_vectors<A, B>(
    dest: &mut A,
    dest_cols: Selection<'_>,
    src: &B,
    src_cols: Selection<'_>,
) -> Result<(), SelectionError>
where
    A: StridedMatrixMut + ?Sized,
    B: StridedMatrix + ?Sized,
{
    reorder_columns(dest, dest_cols, src, src_cols).inspect_err(rejected)
}

/// Panicking form of [`try_reorder_columns_by_vectors`].
///
/// # Panics
///
/// Panics under the conditions [`try_reorder_columns_by_vectors`] reports as errors.
pub fn reorder_columns_by_vectors<A, B>(
    dest: &mut A,
    dest_cols: Selection<'_>,
    src: &B,
    src_cols: Selection<'_>,
) where
    A: StridedMatrixMut + ?Sized,
    B: StridedMatrix + ?Sized,
{
    if let Err(err) = try_reorder_columns_by_vectors(dest, dest_cols, src, src_cols) {
        panic!("{err}");
    }
}

/// Copy the selected rows of `src` into the selected rows of `dest`, so that row
/// `dest_rows[k]` of `dest` receives row `src_rows[k]` of `src`.
///
/// The row analogue of [`try_reorder_columns_by_vectors`]: the column counts of the two
/// matrices must match instead of the row counts.
pub fn try_reorder_rows_by_vectors<A, B>(
    dest: &mut A,
    dest_rows: Selection<'_>,
    src: &B,
    src_rows: Selection<'_>,
) -> Result<(), SelectionError>
where
    A: StridedMatrixMut + ?Sized,
    B: StridedMatrix + ?Sized,
{
    reorder_rows(dest, dest_rows, src, src_rows).inspect_err(rejected)
}

/// Panicking form of [`try_reorder_rows_by_vectors`].
///
/// # Panics
///
/// Panics under the conditions [`try_reorder_rows_by_vectors`] reports as errors.
pub fn reorder_rows_by_vectors<A, B>(
    dest: &mut A,
    dest_rows: Selection<'_>,
    src: &B,
    src_rows: Selection<'_>,
) where
    A: StridedMatrixMut + ?Sized,
    B: StridedMatrix + ?Sized,
{
    if let Err(err) = try_reorder_rows_by_vectors(dest, dest_rows, src, src_rows) {
        panic!("{err}");
    }
}

/// Perform `dest[dest_rows, dest_cols] = src[src_rows, src_cols]`.
///
/// For every `i` and `j`, element `(dest_rows[i], dest_cols[j])` of `dest` receives
/// element `(src_rows[i], src_cols[j])` of `src`.
///
/// When both row selections are [`Selection::All`] the work is done by
/// [`try_reorder_columns_by_vectors`], and when both column selections are
/// [`Selection::All`] by [`try_reorder_rows_by_vectors`]; in those cases the matrices must
/// agree along the axis that is copied in full. Otherwise the selections are resolved per
/// axis and must have matching lengths.
///
/// Returns an error without modifying `dest` if an index is out of bounds, the
/// selections along an axis differ in length, or a fully copied axis differs in extent.
pub fn try_assign_by_vectors<A, B>(
    dest: &mut A,
    dest_rows: Selection<'_>,
    dest_cols: Selection<'_>,
    src: &B,
    src_rows: Selection<'_>,
    src_cols: Selection<'_>,
) -> Result<(), SelectionError>
where
    A: StridedMatrixMut + ?Sized,
    B: StridedMatrix + ?Sized,
{
    let result = if dest_rows.is_all() && src_rows.is_all() {
        reorder_columns(dest, dest_cols, src, src_cols)
    } else if dest_cols.is_all() && src_cols.is_all() {
        reorder_rows(dest, dest_rows, src, src_rows)
    } else {
        gather(dest, dest_rows, dest_cols, src, src_rows, src_cols)
    };
    result.inspect_err(rejected)
}

/// Panicking form of [`try_assign_by_vectors`].
///
/// # Panics
///
/// Panics under the conditions [`try_assign_by_vectors`] reports as errors.
pub fn assign_by_vectors<A, B>(
    dest: &mut A,
    dest_rows: Selection<'_>,
    dest_cols: Selection<'_>,
    src: &B,
    src_rows: Selection<'_>,
    src_cols: Selection<'_>,
) where
    A: StridedMatrixMut + ?Sized,
    B: StridedMatrix + ?Sized,
{
    if let Err(err) = try_assign_by_vectors(dest, dest_rows, dest_cols, src, src_rows, src_cols)
    {
        panic!("{err}");
    }
}
