//! # Types Module
//!
//! This module defines the in-memory values the batcher works with: a decoded response is either a
//! numeric scalar, a numeric matrix, or raw text.

use crate::error::BatcherError;
use std::fmt;

/// A dense, row-major matrix of `f64` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl Matrix {
    /// Build a matrix from a list of rows.
    ///
    /// # Errors
    ///
    /// Returns [`BatcherError::InvalidLayout`] when the rows do not all have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, BatcherError> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(BatcherError::InvalidLayout(format!(
                "row {} has {} columns, expected {}",
                index + 1,
                row.len(),
                cols
            )));
        }

        let height = rows.len();
        Ok(Self {
            rows: height,
            cols,
            values: rows.into_iter().flatten().collect(),
        })
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All values in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over the rows of the matrix.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // `chunks(0)` panics, and a matrix with zero columns has no values anyway.
        self.values.chunks(self.cols.max(1))
    }
}

/// A decoded response value.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseValue {
    /// A numeric file holding exactly one element.
    Scalar(f64),
    /// A numeric file holding a 2-D table of values.
    Matrix(Matrix),
    /// Raw contents of a text or symbolic file.
    Text(String),
}

impl fmt::Display for ResponseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseValue::Scalar(v) => write!(f, "{v:?}"),
            ResponseValue::Text(s) => f.write_str(s),
            ResponseValue::Matrix(m) => {
                f.write_str("[")?;
                for (i, row) in m.rows().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{row:?}")?;
                }
                f.write_str("]")
            }
        }
    }
}
