/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Generic dense matrix algorithms built on the matrix concept of [`libmat_views`].
//!
//! * [`ops`]: column and row access, copies, symmetrization, transposition, arithmetic,
//!   norms, comparison, tiling and printing.
//! * [`select`]: Matlab-style indexed assignment `dest[rows, cols] = src[rows, cols]`.
//!
//! Every routine is generic over [`StridedMatrix`](libmat_views::StridedMatrix) and
//! [`StridedMatrixMut`](libmat_views::StridedMatrixMut), so it applies equally to an owning
//! [`Matrix`](libmat_views::Matrix) and to views into one.

pub mod common;
pub use common::{Axis, Side};

pub mod ops;

pub mod select;
pub use select::{
    assign_by_vectors, reorder_columns_by_vectors, reorder_rows_by_vectors,
    try_assign_by_vectors, try_reorder_columns_by_vectors, try_reorder_rows_by_vectors,
    Selection, SelectionError,
};

// Make the reference implementation available for internal testing.
#[cfg(test)]
mod reference;

#[cfg(test)]
mod test_util;
