/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Dense column-major matrices and the borrowed views that address them without copying.
//!
//! * [`Matrix`] owns its storage.
//! * [`MatrixView`] and [`MatrixConstView`] borrow a rectangular block of another matrix.
//! * [`VectorView`] and [`VectorConstView`] borrow a single row or column.
//!
//! All of them implement the [`StridedMatrix`] concept (and [`StridedMatrixMut`] when
//! writable) so that generic algorithms accept any of them.
//!
//! Views borrow their parent, so the borrow checker rejects a view that outlives its
//! parent as well as two live mutable views over the same storage. The only way to hold
//! two mutable views of one matrix at once is [`MatrixBase::split_at_col_mut`], which
//! hands out disjoint blocks.

pub mod traits;
pub use traits::{StridedMatrix, StridedMatrixMut};

// Views
pub mod strided;
pub mod views;

pub use strided::{VectorBase, VectorConstView, VectorView};
pub use views::{
    DenseData, Generator, Init, Matrix, MatrixBase, MatrixConstView, MatrixView, MutDenseData,
    ShapeError, SubmatrixError,
};
