// src/scalar_field.rs

use std::ops::{Index, IndexMut};

use rayon::prelude::*;

use crate::error::{PhaseFieldError, Result};
use crate::grid::Shape2D;

/// Dense scalar field on a 2D grid, stored row-major.
///
/// Every binary/N-ary operation checks that the participating fields share
/// one shape and fails with [`PhaseFieldError::ShapeMismatch`] otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField2D {
    shape: Shape2D,
    data: Vec<f64>,
}

impl ScalarField2D {
    /// Create a zero-initialised field.
    pub fn new(shape: Shape2D) -> Self {
        Self::filled(shape, 0.0)
    }

    /// Create a field with every cell set to `value`.
    pub fn filled(shape: Shape2D, value: f64) -> Self {
        Self {
            shape,
            data: vec![value; shape.n_cells()],
        }
    }

    /// Zero-initialised field with the same shape as `other`.
    pub fn like(other: &ScalarField2D) -> Self {
        Self::new(other.shape)
    }

    /// Wrap a row-major buffer.
    pub fn from_vec(shape: Shape2D, data: Vec<f64>) -> Result<Self> {
        if data.len() != shape.n_cells() {
            return Err(PhaseFieldError::InvalidArgument(format!(
                "buffer of length {} does not fit shape {} ({} cells)",
                data.len(),
                shape,
                shape.n_cells()
            )));
        }
        Ok(Self { shape, data })
    }

    /// Build a field from nested rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != n_cols {
                return Err(PhaseFieldError::InvalidArgument(format!(
                    "row {} has {} columns, expected {}",
                    r,
                    row.len(),
                    n_cols
                )));
            }
            data.extend(row);
        }
        Ok(Self {
            shape: Shape2D::new(n_rows, n_cols),
            data,
        })
    }

    #[inline]
    pub fn shape(&self) -> Shape2D {
        self.shape
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.shape.cols
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// One grid row.
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.shape.cols;
        &self.data[start..start + self.shape.cols]
    }

    /// Bounds-checked read.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if self.shape.contains(row, col) {
            Some(self.data[self.shape.idx(row, col)])
        } else {
            None
        }
    }

    /// Fail with `ShapeMismatch` unless `other` has this field's shape.
    pub fn ensure_same_shape(&self, other: &ScalarField2D) -> Result<()> {
        if self.shape != other.shape {
            return Err(PhaseFieldError::ShapeMismatch {
                expected: self.shape,
                got: other.shape,
            });
        }
        Ok(())
    }

    /// Overwrite every cell with `f` applied to the co-located cells of `inputs`.
    ///
    /// `self[i] = f([inputs[0][i], inputs[1][i], ...])`. Rows are evaluated in
    /// parallel; each cell depends only on the inputs, so the result does not
    /// depend on scheduling. `self` cannot alias any input (borrow rules).
    pub fn zip_map<const N: usize, F>(
        &mut self,
        inputs: [&ScalarField2D; N],
        f: F,
    ) -> Result<&mut Self>
    where
        F: Fn([f64; N]) -> f64 + Sync + Send,
    {
        for input in &inputs {
            self.ensure_same_shape(input)?;
        }
        let cols = self.shape.cols;
        if self.data.is_empty() {
            return Ok(self);
        }
        self.data
            .par_chunks_mut(cols)
            .enumerate()
            .for_each(|(r, out_row)| {
                let base = r * cols;
                for (c, out) in out_row.iter_mut().enumerate() {
                    let i = base + c;
                    *out = f(std::array::from_fn(|k| inputs[k].data[i]));
                }
            });
        Ok(self)
    }

    /// Apply `f` to every cell in place.
    pub fn map_inplace<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(f64) -> f64 + Sync + Send,
    {
        self.data.par_iter_mut().for_each(|v| *v = f(*v));
        self
    }

    /// Smallest and largest finite values, or `None` if there are none.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Field with rows and columns swapped.
    pub fn transpose(&self) -> Self {
        let shape = self.shape.transposed();
        let mut out = Self::new(shape);
        for r in 0..self.shape.rows {
            for c in 0..self.shape.cols {
                out.data[shape.idx(c, r)] = self.data[self.shape.idx(r, c)];
            }
        }
        out
    }
}

impl Index<(usize, usize)> for ScalarField2D {
    type Output = f64;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(
            self.shape.contains(row, col),
            "index ({row}, {col}) out of bounds for shape {}",
            self.shape
        );
        &self.data[self.shape.idx(row, col)]
    }
}

impl IndexMut<(usize, usize)> for ScalarField2D {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        assert!(
            self.shape.contains(row, col),
            "index ({row}, {col}) out of bounds for shape {}",
            self.shape
        );
        let i = self.shape.idx(row, col);
        &mut self.data[i]
    }
}
