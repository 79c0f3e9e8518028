//! Owned complex field samples on a `(nx, ny, nz)` grid.
//!
//! Storage is row-major with the longitudinal index fastest, i.e. the same
//! flat order as a C-ordered `(nx, ny, nz)` array.

mod window;

pub use window::{ResolvedWindow, SliceWindow};

use crate::domain::{WavefrontError, WavefrontResult};
use crate::numerics::NumericTolerance;
use num_complex::Complex64;
use std::fmt::{Display, Formatter};
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldShape {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl FieldShape {
    pub const fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self { nx, ny, nz }
    }

    pub fn from_dims(dims: &[usize]) -> WavefrontResult<Self> {
        match dims {
            [nx, ny, nz] => Ok(Self::new(*nx, *ny, *nz)),
            _ => Err(WavefrontError::ShapeMismatch {
                context: "field component",
                expected: "3 dimensions".to_string(),
                actual: format!("{} dimensions", dims.len()),
            }),
        }
    }

    pub const fn len(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn transverse_len(&self) -> usize {
        self.nx * self.ny
    }

    pub const fn is_square(&self) -> bool {
        self.nx == self.ny
    }

    pub const fn offset(&self, ix: usize, iy: usize, iz: usize) -> usize {
        (ix * self.ny + iy) * self.nz + iz
    }

    pub const fn with_nz(self, nz: usize) -> Self {
        Self::new(self.nx, self.ny, nz)
    }

    pub const fn transposed_xy(self) -> Self {
        Self::new(self.ny, self.nx, self.nz)
    }
}

impl Display for FieldShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.nx, self.ny, self.nz)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComplexField3 {
    shape: FieldShape,
    data: Vec<Complex64>,
}

impl ComplexField3 {
    pub fn new(shape: FieldShape, data: Vec<Complex64>) -> WavefrontResult<Self> {
        if data.len() != shape.len() {
            return Err(WavefrontError::ShapeMismatch {
                context: "complex field samples",
                expected: format!("{} samples for shape {shape}", shape.len()),
                actual: data.len().to_string(),
            });
        }

        Ok(Self { shape, data })
    }

    pub fn zeros(shape: FieldShape) -> Self {
        Self {
            shape,
            data: vec![Complex64::new(0.0, 0.0); shape.len()],
        }
    }

    pub fn from_fn<F>(shape: FieldShape, mut sample: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> Complex64,
    {
        let mut data = Vec::with_capacity(shape.len());
        for ix in 0..shape.nx {
            for iy in 0..shape.ny {
                for iz in 0..shape.nz {
                    data.push(sample(ix, iy, iz));
                }
            }
        }

        Self { shape, data }
    }

    pub const fn shape(&self) -> FieldShape {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[Complex64] {
        &self.data
    }

    pub fn scale(&mut self, factor: f64) {
        for value in &mut self.data {
            *value *= factor;
        }
    }

    pub fn scaled(mut self, factor: f64) -> Self {
        self.scale(factor);
        self
    }

    /// Keep only the longitudinal slices selected by `window`.
    pub fn select_slices(&self, window: &ResolvedWindow) -> WavefrontResult<Self> {
        if let Some(last) = window.last().filter(|last| *last >= self.shape.nz) {
            return Err(WavefrontError::InvalidWindow {
                reason: format!(
                    "slice index {last} is outside the {} longitudinal slices",
                    self.shape.nz
                ),
            });
        }

        let shape = self.shape.with_nz(window.count);
        let mut data = Vec::with_capacity(shape.len());
        for column in self.data.chunks_exact(self.shape.nz.max(1)) {
            data.extend(window.indices().map(|iz| column[iz]));
        }

        Ok(Self { shape, data })
    }

    /// Reorder `(x, y, z)` into `(y, x, z)`.
    pub fn transpose_xy(&self) -> Self {
        let source = self.shape;
        Self::from_fn(source.transposed_xy(), |iy, ix, iz| {
            self.data[source.offset(ix, iy, iz)]
        })
    }

    /// Flattened transverse grid of slice `iz`, x-major like a
    /// `(nx * ny, nz)` reshape.
    pub fn slice_column(&self, iz: usize) -> impl Iterator<Item = Complex64> + '_ {
        self.data
            .iter()
            .skip(iz)
            .step_by(self.shape.nz.max(1))
            .copied()
    }

    pub fn approx_eq(&self, other: &Self, tolerance: NumericTolerance) -> bool {
        self.shape == other.shape
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(lhs, rhs)| tolerance.accepts_complex(*lhs, *rhs))
    }
}

impl Index<(usize, usize, usize)> for ComplexField3 {
    type Output = Complex64;

    fn index(&self, (ix, iy, iz): (usize, usize, usize)) -> &Self::Output {
        &self.data[self.shape.offset(ix, iy, iz)]
    }
}

impl IndexMut<(usize, usize, usize)> for ComplexField3 {
    fn index_mut(&mut self, (ix, iy, iz): (usize, usize, usize)) -> &mut Self::Output {
        let offset = self.shape.offset(ix, iy, iz);
        &mut self.data[offset]
    }
}
