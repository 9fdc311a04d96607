// src/stencil.rs
//
// 3x3 finite-difference stencils and the 2D convolution used to apply them.
//
// Conventions:
// - field[(row, col)]: row is y, col is x.
// - conv2d is a cross-correlation: out[r][c] = sum_{a,b} k[a][b] * f[r+a-1][c+b-1].
// - Cells outside the grid are supplied by the `Boundary` policy.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::Serialize;

use crate::error::{PhaseFieldError, Result};
use crate::scalar_field::ScalarField2D;

/// How `conv2d` samples neighbours that fall outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Boundary {
    /// Ghost cell equals the nearest edge cell (zero normal derivative).
    #[default]
    Replicate,
    /// Mirror about the edge cell: f[-1] = f[1], f[n] = f[n-2].
    Reflect,
    /// Ghost cells are 0.
    Zero,
    /// Wrap around to the opposite edge.
    Periodic,
}

impl Boundary {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Replicate => "replicate",
            Self::Reflect => "reflect",
            Self::Zero => "zero",
            Self::Periodic => "periodic",
        }
    }

    /// Map a possibly out-of-range index onto the grid, or `None` for a zero ghost.
    #[inline]
    fn resolve(&self, i: isize, n: usize) -> Option<usize> {
        let n_is = n as isize;
        if (0..n_is).contains(&i) {
            return Some(i as usize);
        }
        match self {
            Self::Zero => None,
            Self::Replicate => Some(i.clamp(0, n_is - 1) as usize),
            Self::Reflect => {
                if n == 1 {
                    Some(0)
                } else if i < 0 {
                    Some((-i).min(n_is - 1) as usize)
                } else {
                    Some((2 * (n_is - 1) - i).max(0) as usize)
                }
            }
            Self::Periodic => Some(i.rem_euclid(n_is) as usize),
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Boundary {
    type Err = PhaseFieldError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "replicate" | "edge" | "neumann" => Ok(Self::Replicate),
            "reflect" | "mirror" => Ok(Self::Reflect),
            "zero" | "dirichlet" => Ok(Self::Zero),
            "periodic" | "wrap" => Ok(Self::Periodic),
            other => Err(PhaseFieldError::InvalidArgument(format!(
                "unknown boundary policy '{other}' (expected replicate|reflect|zero|periodic)"
            ))),
        }
    }
}

/// Immutable 3x3 stencil, indexed `[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StencilFilter {
    coeffs: [[f64; 3]; 3],
}

impl StencilFilter {
    pub const fn new(coeffs: [[f64; 3]; 3]) -> Self {
        Self { coeffs }
    }

    /// Central difference along x (columns), scaled by 1/(2 dx).
    pub fn gradient_x(dx: f64) -> Self {
        Self::new([[0.0, 0.0, 0.0], [-1.0, 0.0, 1.0], [0.0, 0.0, 0.0]]).scaled(1.0 / (2.0 * dx))
    }

    /// Central difference along y (rows), scaled by 1/(2 dx).
    pub fn gradient_y(dx: f64) -> Self {
        Self::new([[0.0, -1.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0]]).scaled(1.0 / (2.0 * dx))
    }

    /// 5-point Laplacian, scaled by 1/dx^2.
    pub fn laplacian(dx: f64) -> Self {
        Self::new([[0.0, 1.0, 0.0], [1.0, -4.0, 1.0], [0.0, 1.0, 0.0]]).scaled(1.0 / (dx * dx))
    }

    pub fn scaled(&self, factor: f64) -> Self {
        let mut coeffs = self.coeffs;
        for row in &mut coeffs {
            for w in row.iter_mut() {
                *w *= factor;
            }
        }
        Self { coeffs }
    }

    pub fn coeffs(&self) -> &[[f64; 3]; 3] {
        &self.coeffs
    }
}

/// The three stencils the solver needs for one grid spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StencilSet {
    pub dx: StencilFilter,
    pub dy: StencilFilter,
    pub laplacian: StencilFilter,
}

impl StencilSet {
    pub fn new(dx: f64) -> Self {
        Self {
            dx: StencilFilter::gradient_x(dx),
            dy: StencilFilter::gradient_y(dx),
            laplacian: StencilFilter::laplacian(dx),
        }
    }
}

/// Cross-correlate `field` with `filter` into `out`.
///
/// `out` must have the shape of `field`. The two cannot alias: every output cell
/// reads a 3x3 neighbourhood of the input.
pub fn conv2d(
    field: &ScalarField2D,
    filter: &StencilFilter,
    boundary: Boundary,
    out: &mut ScalarField2D,
) -> Result<()> {
    field.ensure_same_shape(out)?;
    let rows = field.rows();
    let cols = field.cols();
    if rows == 0 || cols == 0 {
        return Ok(());
    }
    let src = field.as_slice();
    let k = filter.coeffs();

    out.as_mut_slice()
        .par_chunks_mut(cols)
        .enumerate()
        .for_each(|(r, out_row)| {
            for (c, out_cell) in out_row.iter_mut().enumerate() {
                let mut acc = 0.0f64;
                for (a, k_row) in k.iter().enumerate() {
                    let sr = boundary.resolve(r as isize + a as isize - 1, rows);
                    for (b, &w) in k_row.iter().enumerate() {
                        if w == 0.0 {
                            continue;
                        }
                        let sc = boundary.resolve(c as isize + b as isize - 1, cols);
                        if let (Some(sr), Some(sc)) = (sr, sc) {
                            acc += w * src[sr * cols + sc];
                        }
                    }
                }
                *out_cell = acc;
            }
        });
    Ok(())
}
