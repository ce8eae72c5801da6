use rand::prelude::*;
use std::ops::{Add, Index, IndexMut, Mul, Sub};

use crate::error::{Error, Result};
use crate::math::dim::{approx_eq, Dim};

static ZERO: f64 = 0.0;

/// A fixed-rank sequence of `f64` values.
///
/// A freshly constructed vector is logically all-zero but owns no backing
/// storage; the buffer is allocated zero-filled on the first mutable access.
/// Copying a vector duplicates the buffer — no aliasing is implied.
#[derive(Debug, Clone)]
pub struct Vector {
    dim: Dim,
    values: Vec<f64>,
}

impl Vector {
    /// Creates a logically-zero vector of the given rank without allocating.
    pub fn new(rank: usize) -> Result<Vector> {
        Ok(Vector {
            dim: Dim::new(rank)?,
            values: Vec::new(),
        })
    }

    /// Builds a vector from an explicit list of values; the rank is the list
    /// length.
    pub fn from_vec(values: Vec<f64>) -> Result<Vector> {
        Ok(Vector {
            dim: Dim::new(values.len())?,
            values,
        })
    }

    /// Builds a vector from a pre-sized buffer, checking that the buffer
    /// length matches the declared rank exactly.
    pub fn with_rank(rank: usize, values: Vec<f64>) -> Result<Vector> {
        if values.len() != rank {
            return Err(Error::construction(format!(
                "initializer of size {} does not match vector rank {rank}",
                values.len()
            )));
        }
        Vector::from_vec(values)
    }

    /// Uniformly random values in `[min, max)`.
    pub fn random(rank: usize, min: f64, max: f64) -> Result<Vector> {
        let mut rng = rand::thread_rng();
        let values = (0..rank).map(|_| rng.gen_range(min..max)).collect();
        Vector::with_rank(rank, values)
    }

    pub fn rank(&self) -> usize {
        self.dim.rank()
    }

    /// True while the vector has no backing storage. An empty vector reads
    /// as all-zero and compares equal to an allocated all-zero vector.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Discards the backing storage, returning the vector to its logical
    /// all-zero state.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn get(&self, index: usize) -> Result<f64> {
        if index >= self.rank() {
            return Err(Error::out_of_range(index, self.rank()));
        }
        Ok(self.values.get(index).copied().unwrap_or(0.0))
    }

    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut f64> {
        if index >= self.rank() {
            return Err(Error::out_of_range(index, self.rank()));
        }
        if self.values.is_empty() {
            self.values.resize(self.rank(), 0.0);
        }
        Ok(&mut self.values[index])
    }

    /// Iterates the logical values, yielding zeros for unallocated storage.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.rank()).map(move |i| self.values.get(i).copied().unwrap_or(0.0))
    }

    fn check_rank(&self, other: &Vector, operation: &'static str) -> Result<()> {
        if self.dim != other.dim {
            return Err(Error::mismatch(operation, self.rank(), other.rank()));
        }
        Ok(())
    }

    pub fn checked_add(&self, other: &Vector) -> Result<Vector> {
        self.check_rank(other, "vector addition")?;
        let values = self.iter().zip(other.iter()).map(|(a, b)| a + b).collect();
        Vector::from_vec(values)
    }

    pub fn checked_sub(&self, other: &Vector) -> Result<Vector> {
        self.check_rank(other, "vector subtraction")?;
        let values = self.iter().zip(other.iter()).map(|(a, b)| a - b).collect();
        Vector::from_vec(values)
    }

    pub fn scale(&self, factor: f64) -> Vector {
        Vector {
            dim: self.dim,
            values: self.values.iter().map(|v| v * factor).collect(),
        }
    }

    pub fn dot(&self, other: &Vector) -> Result<f64> {
        self.check_rank(other, "dot product")?;
        Ok(self.iter().zip(other.iter()).map(|(a, b)| a * b).sum())
    }
}

/// Elementwise equality within the crate tolerance; structural emptiness
/// counts as equal to an all-zero vector of the same rank.
impl PartialEq for Vector {
    fn eq(&self, other: &Vector) -> bool {
        self.dim == other.dim && self.iter().zip(other.iter()).all(|(a, b)| approx_eq(a, b))
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        if index >= self.rank() {
            panic!("{}", Error::out_of_range(index, self.rank()));
        }
        self.values.get(index).unwrap_or(&ZERO)
    }
}

impl IndexMut<usize> for Vector {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        match self.get_mut(index) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}

impl Add for &Vector {
    type Output = Vector;

    fn add(self, rhs: &Vector) -> Vector {
        match self.checked_add(rhs) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl Sub for &Vector {
    type Output = Vector;

    fn sub(self, rhs: &Vector) -> Vector {
        match self.checked_sub(rhs) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl Mul<f64> for &Vector {
    type Output = Vector;

    fn mul(self, factor: f64) -> Vector {
        self.scale(factor)
    }
}

impl Mul<&Vector> for f64 {
    type Output = Vector;

    fn mul(self, vector: &Vector) -> Vector {
        vector.scale(self)
    }
}

/// Dot product.
impl Mul for &Vector {
    type Output = f64;

    fn mul(self, rhs: &Vector) -> f64 {
        match self.dot(rhs) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}
