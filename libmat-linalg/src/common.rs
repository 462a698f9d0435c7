/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::fmt;

/// One of the two axes of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Indices select rows.
    Row,
    /// Indices select columns.
    Column,
}

impl Axis {
    /// Forward one of the arguments, depending on the value of `self`.
    pub fn forward<T>(&self, if_row: T, if_column: T) -> T {
        match self {
            Self::Row => if_row,
            Self::Column => if_column,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.forward("row", "column"))
    }
}

/// Which operand of a two-matrix operation a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The matrix being written.
    Destination,
    /// The matrix being read.
    Source,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Destination => f.write_str("destination"),
            Self::Source => f.write_str("source"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward() {
        assert_eq!(Axis::Row.forward(1, 2), 1);
        assert_eq!(Axis::Column.forward(1, 2), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(Axis::Row.to_string(), "row");
        assert_eq!(Axis::Column.to_string(), "column");
        assert_eq!(Side::Destination.to_string(), "destination");
        assert_eq!(Side::Source.to_string(), "source");
    }
}
