use crate::error::{Error, Result};
use crate::math::dim::Dim;
use crate::math::vector::Vector;

/// A stateless mapping between a flat vector and an `(x, y)` grid of the
/// same total size: `(x, y)` lives at flat index `y * width + x`.
///
/// Reads outside the grid return the caller's default and writes outside
/// the grid are dropped — the out-of-bounds policy convolution and sampling
/// windows rely on for zero padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection2d {
    width: Dim,
    height: Dim,
}

impl Projection2d {
    pub fn new(width: usize, height: usize) -> Result<Projection2d> {
        Ok(Projection2d {
            width: Dim::new(width)?,
            height: Dim::new(height)?,
        })
    }

    pub fn width(&self) -> usize {
        self.width.rank()
    }

    pub fn height(&self) -> usize {
        self.height.rank()
    }

    /// Rank of the flat vectors this projection maps.
    pub fn size(&self) -> usize {
        self.width() * self.height()
    }

    fn check_vector(&self, rank: usize) -> Result<()> {
        if rank != self.size() {
            return Err(Error::mismatch("projection", self.size(), rank));
        }
        Ok(())
    }

    pub fn get(&self, vector: &Vector, x: usize, y: usize, default: f64) -> Result<f64> {
        self.check_vector(vector.rank())?;
        if x >= self.width() || y >= self.height() {
            return Ok(default);
        }
        vector.get(y * self.width() + x)
    }

    pub fn set(&self, vector: &mut Vector, x: usize, y: usize, value: f64) -> Result<()> {
        self.check_vector(vector.rank())?;
        if x >= self.width() || y >= self.height() {
            return Ok(());
        }
        vector.set(y * self.width() + x, value)
    }
}
