/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use libmat_views::{Matrix, StridedMatrix};
use rand::Rng;
use thiserror::Error;

/// A row-major matrix used to compute expected results element by element.
///
/// Deliberately shares no code with the column-major storage under test.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Dense {
    nrows: usize,
    ncols: usize,
    data: Vec<f64>,
}

#[derive(Debug, Error)]
#[error("mismatch in test problem. got {:?}, expected {:?}", got, expected)]
pub(crate) struct ReferenceError {
    got: Dense,
    expected: Dense,
}

impl Dense {
    pub(crate) fn from_matrix<M: StridedMatrix + ?Sized>(m: &M) -> Self {
        let mut data = Vec::with_capacity(m.nrows() * m.ncols());
        for i in 0..m.nrows() {
            for j in 0..m.ncols() {
                data.push(m.at(i, j));
            }
        }
        Self {
            nrows: m.nrows(),
            ncols: m.ncols(),
            data,
        }
    }

    pub(crate) fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.nrows && j < self.ncols);
        self.data[i * self.ncols + j]
    }

    pub(crate) fn set(&mut self, i: usize, j: usize, value: f64) {
        assert!(i < self.nrows && j < self.ncols);
        self.data[i * self.ncols + j] = value;
    }

    pub(crate) fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.ncols {
            for i in 0..self.nrows {
                data.push(self.get(i, j));
            }
        }
        Self {
            nrows: self.ncols,
            ncols: self.nrows,
            data,
        }
    }

    /// Compare against a matrix produced by the code under test.
    pub(crate) fn check<M: StridedMatrix + ?Sized>(&self, got: &M) -> Result<(), ReferenceError> {
        let got = Self::from_matrix(got);
        if got == *self {
            Ok(())
        } else {
            Err(ReferenceError {
                got,
                expected: self.clone(),
            })
        }
    }
}

/// Expand an optional index list, where `None` means every index below `extent`.
pub(crate) fn expand(indices: Option<&[usize]>, extent: usize) -> Vec<usize> {
    match indices {
        Some(indices) => indices.to_vec(),
        None => (0..extent).collect(),
    }
}

/// Indexed assignment over the cross product of the selected rows and columns.
///
/// The caller is responsible for passing consistent selections.
pub(crate) fn assign_by_vectors(
    dest: &mut Dense,
    dest_rows: Option<&[usize]>,
    dest_cols: Option<&[usize]>,
    src: &Dense,
    src_rows: Option<&[usize]>,
    src_cols: Option<&[usize]>,
) {
    let to_rows = expand(dest_rows, dest.nrows);
    let to_cols = expand(dest_cols, dest.ncols);
    let from_rows = expand(src_rows, src.nrows);
    let from_cols = expand(src_cols, src.ncols);
    assert_eq!(to_rows.len(), from_rows.len());
    assert_eq!(to_cols.len(), from_cols.len());

    for i in 0..to_rows.len() {
        for j in 0..to_cols.len() {
            dest.set(to_rows[i], to_cols[j], src.get(from_rows[i], from_cols[j]));
        }
    }
}

pub(crate) fn random_matrix<R: Rng>(rng: &mut R, nrows: usize, ncols: usize) -> Matrix {
    Matrix::from_fn(nrows, ncols, |_, _| rng.random_range(-100.0..100.0))
}

/// Draw `count` indices below `extent`, repeats allowed.
pub(crate) fn random_indices<R: Rng>(rng: &mut R, count: usize, extent: usize) -> Vec<usize> {
    (0..count).map(|_| rng.random_range(0..extent)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_roundtrip() {
        let m = Matrix::from_fn(2, 3, |i, j| (10 * i + j) as f64);
        let dense = Dense::from_matrix(&m);
        assert_eq!(dense.data, vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(dense.transpose().get(2, 1), 12.0);
        dense.check(&m).unwrap();

        let err = dense.check(&Matrix::zeros(2, 3)).unwrap_err();
        assert!(err.to_string().starts_with("mismatch in test problem"));
    }

    #[test]
    fn naive_assignment() {
        let src = Dense::from_matrix(&Matrix::from_fn(2, 2, |i, j| (1 + 2 * i + j) as f64));
        let mut dest = Dense::from_matrix(&Matrix::zeros(2, 2));
        assign_by_vectors(&mut dest, Some(&[1, 0]), None, &src, None, None);
        assert_eq!(dest.data, vec![3.0, 4.0, 1.0, 2.0]);
    }
}
