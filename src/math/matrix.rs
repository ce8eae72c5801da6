use rand::prelude::*;
use std::ops::{Add, Index, IndexMut, Mul, Sub};

use crate::error::{Error, Result};
use crate::math::dim::{approx_eq, Dim};
use crate::math::grid::{Grid, GridMut};
use crate::math::vector::Vector;

static ZERO: f64 = 0.0;

/// A dense `rows x columns` matrix of `f64` in row-major layout.
///
/// Shares the [`Vector`] lifecycle: constructed logically all-zero with no
/// backing buffer, allocated zero-filled on the first mutable access, copied
/// by value.
#[derive(Debug, Clone)]
pub struct Matrix {
    rows: Dim,
    columns: Dim,
    values: Vec<f64>,
}

impl Matrix {
    /// Creates a logically-zero matrix of the given shape without allocating.
    pub fn new(rows: usize, columns: usize) -> Result<Matrix> {
        Ok(Matrix {
            rows: Dim::new(rows)?,
            columns: Dim::new(columns)?,
            values: Vec::new(),
        })
    }

    /// Builds a matrix from a flat row-major buffer whose length must equal
    /// `rows * columns` exactly.
    pub fn from_vec(rows: usize, columns: usize, values: Vec<f64>) -> Result<Matrix> {
        if values.len() != rows * columns {
            return Err(Error::construction(format!(
                "initializer of size {} does not match a {rows}x{columns} matrix",
                values.len()
            )));
        }
        Ok(Matrix {
            rows: Dim::new(rows)?,
            columns: Dim::new(columns)?,
            values,
        })
    }

    /// The identity matrix of the given rank.
    pub fn eye(rank: usize) -> Result<Matrix> {
        let mut m = Matrix::new(rank, rank)?;
        m.allocate();
        for i in 0..rank {
            m.values[i * rank + i] = 1.0;
        }
        Ok(m)
    }

    pub fn ones(rows: usize, columns: usize) -> Result<Matrix> {
        Matrix::from_vec(rows, columns, vec![1.0; rows * columns])
    }

    /// Uniformly random values in `[min, max)`.
    pub fn random(rows: usize, columns: usize, min: f64, max: f64) -> Result<Matrix> {
        let mut rng = rand::thread_rng();
        let values = (0..rows * columns)
            .map(|_| rng.gen_range(min..max))
            .collect();
        Matrix::from_vec(rows, columns, values)
    }

    pub fn row_rank(&self) -> usize {
        self.rows.rank()
    }

    pub fn column_rank(&self) -> usize {
        self.columns.rank()
    }

    /// True while the matrix has no backing storage; it reads as all-zero
    /// and compares equal to an allocated all-zero matrix.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    fn allocate(&mut self) {
        if self.values.is_empty() {
            let size = self.row_rank() * self.column_rank();
            self.values.resize(size, 0.0);
        }
    }

    fn check_cell(&self, row: usize, column: usize) -> Result<()> {
        if column >= self.column_rank() {
            return Err(Error::out_of_range(column, self.column_rank()));
        }
        if row >= self.row_rank() {
            return Err(Error::out_of_range(row, self.row_rank()));
        }
        Ok(())
    }

    // Unchecked logical read; unallocated storage reads as zero.
    fn logical(&self, row: usize, column: usize) -> f64 {
        self.values
            .get(row * self.column_rank() + column)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn get(&self, row: usize, column: usize) -> Result<f64> {
        self.check_cell(row, column)?;
        Ok(self.logical(row, column))
    }

    pub fn set(&mut self, row: usize, column: usize, value: f64) -> Result<()> {
        *self.get_mut(row, column)? = value;
        Ok(())
    }

    pub fn get_mut(&mut self, row: usize, column: usize) -> Result<&mut f64> {
        self.check_cell(row, column)?;
        self.allocate();
        let offset = row * self.column_rank() + column;
        Ok(&mut self.values[offset])
    }

    pub fn transpose(&self) -> Matrix {
        let mut result = Matrix {
            rows: self.columns,
            columns: self.rows,
            values: Vec::new(),
        };
        if !self.is_empty() {
            result.allocate();
            let result_column_rank = result.column_rank();
            for row in 0..self.row_rank() {
                for col in 0..self.column_rank() {
                    result.values[col * result_column_rank + row] = self.logical(row, col);
                }
            }
        }
        result
    }

    fn check_shape(&self, other: &Matrix, operation: &'static str) -> Result<()> {
        if self.rows != other.rows {
            return Err(Error::mismatch(
                operation,
                self.row_rank(),
                other.row_rank(),
            ));
        }
        if self.columns != other.columns {
            return Err(Error::mismatch(
                operation,
                self.column_rank(),
                other.column_rank(),
            ));
        }
        Ok(())
    }

    pub fn checked_add(&self, other: &Matrix) -> Result<Matrix> {
        self.check_shape(other, "matrix addition")?;
        // Keep the lazy-zero representation when an operand carries it.
        if self.is_empty() {
            return Ok(other.clone());
        }
        if other.is_empty() {
            return Ok(self.clone());
        }
        let values = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| a + b)
            .collect();
        Ok(Matrix {
            rows: self.rows,
            columns: self.columns,
            values,
        })
    }

    pub fn checked_sub(&self, other: &Matrix) -> Result<Matrix> {
        self.check_shape(other, "matrix subtraction")?;
        if other.is_empty() {
            return Ok(self.clone());
        }
        if self.is_empty() {
            return Ok(other.scale(-1.0));
        }
        let values = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| a - b)
            .collect();
        Ok(Matrix {
            rows: self.rows,
            columns: self.columns,
            values,
        })
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        Matrix {
            rows: self.rows,
            columns: self.columns,
            values: self.values.iter().map(|v| v * factor).collect(),
        }
    }

    /// Matrix product; the left column rank must equal the right row rank.
    pub fn checked_mul(&self, other: &Matrix) -> Result<Matrix> {
        if self.columns != other.rows {
            return Err(Error::mismatch(
                "matrix multiplication",
                self.column_rank(),
                other.row_rank(),
            ));
        }
        let mut result = Matrix {
            rows: self.rows,
            columns: other.columns,
            values: Vec::new(),
        };
        if !self.is_empty() && !other.is_empty() {
            result.allocate();
            let inner = self.column_rank();
            let result_column_rank = result.column_rank();
            for row in 0..result.row_rank() {
                for col in 0..result.column_rank() {
                    let mut cell = 0.0;
                    for i in 0..inner {
                        cell += self.logical(row, i) * other.logical(i, col);
                    }
                    result.values[row * result_column_rank + col] = cell;
                }
            }
        }
        Ok(result)
    }

    pub fn mul_vector(&self, vector: &Vector) -> Result<Vector> {
        if self.column_rank() != vector.rank() {
            return Err(Error::mismatch(
                "matrix-vector multiplication",
                self.column_rank(),
                vector.rank(),
            ));
        }
        let mut result = Vector::new(self.row_rank())?;
        if !self.is_empty() && !vector.is_empty() {
            for row in 0..self.row_rank() {
                let mut cell = 0.0;
                for col in 0..self.column_rank() {
                    cell += self.logical(row, col) * vector.get(col)?;
                }
                result.set(row, cell)?;
            }
        }
        Ok(result)
    }

    /// Raises a square matrix to a non-negative integer power;
    /// `pow(0)` is the identity.
    pub fn pow(&self, exponent: usize) -> Result<Matrix> {
        if self.rows != self.columns {
            return Err(Error::mismatch(
                "matrix power",
                self.row_rank(),
                self.column_rank(),
            ));
        }
        if exponent == 0 {
            return Matrix::eye(self.row_rank());
        }
        if self.is_empty() {
            return Matrix::new(self.row_rank(), self.column_rank());
        }
        let mut result = self.clone();
        for _ in 1..exponent {
            result = result.checked_mul(self)?;
        }
        Ok(result)
    }

    /// Raises every element to the given power, in place.
    pub fn element_pow(&mut self, exponent: f64) -> &mut Matrix {
        for value in &mut self.values {
            *value = value.powf(exponent);
        }
        self
    }

    /// Replaces every element with its absolute value, in place.
    pub fn abs(&mut self) -> &mut Matrix {
        for value in &mut self.values {
            *value = value.abs();
        }
        self
    }

    pub fn min(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Sum of all elements; zero for an unallocated matrix.
    pub fn accumulate(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Copies into a new shape, cropping on axes that shrink and
    /// zero-filling on axes that grow. An unallocated matrix resizes to an
    /// unallocated matrix.
    pub fn resize(&self, rows: usize, columns: usize) -> Result<Matrix> {
        let mut result = Matrix::new(rows, columns)?;
        if !self.is_empty() {
            result.allocate();
            let copy_rows = rows.min(self.row_rank());
            let copy_columns = columns.min(self.column_rank());
            for row in 0..copy_rows {
                for col in 0..copy_columns {
                    result.values[row * columns + col] = self.logical(row, col);
                }
            }
        }
        Ok(result)
    }
}

impl Grid for Matrix {
    fn row_rank(&self) -> usize {
        Matrix::row_rank(self)
    }

    fn column_rank(&self) -> usize {
        Matrix::column_rank(self)
    }

    fn get(&self, row: usize, column: usize) -> Result<f64> {
        Matrix::get(self, row, column)
    }
}

impl GridMut for Matrix {
    fn set(&mut self, row: usize, column: usize, value: f64) -> Result<()> {
        Matrix::set(self, row, column, value)
    }
}

/// Elementwise equality within the crate tolerance; structural emptiness
/// counts as equal to an all-zero matrix of the same shape.
impl PartialEq for Matrix {
    fn eq(&self, other: &Matrix) -> bool {
        if self.rows != other.rows || self.columns != other.columns {
            return false;
        }
        for row in 0..self.row_rank() {
            for col in 0..self.column_rank() {
                if !approx_eq(self.logical(row, col), other.logical(row, col)) {
                    return false;
                }
            }
        }
        true
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, column): (usize, usize)) -> &f64 {
        if let Err(e) = self.check_cell(row, column) {
            panic!("{e}");
        }
        self.values
            .get(row * self.column_rank() + column)
            .unwrap_or(&ZERO)
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut f64 {
        match self.get_mut(row, column) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}

impl Add for &Matrix {
    type Output = Matrix;

    fn add(self, rhs: &Matrix) -> Matrix {
        match self.checked_add(rhs) {
            Ok(m) => m,
            Err(e) => panic!("{e}"),
        }
    }
}

impl Sub for &Matrix {
    type Output = Matrix;

    fn sub(self, rhs: &Matrix) -> Matrix {
        match self.checked_sub(rhs) {
            Ok(m) => m,
            Err(e) => panic!("{e}"),
        }
    }
}

impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: &Matrix) -> Matrix {
        match self.checked_mul(rhs) {
            Ok(m) => m,
            Err(e) => panic!("{e}"),
        }
    }
}

impl Mul<f64> for &Matrix {
    type Output = Matrix;

    fn mul(self, factor: f64) -> Matrix {
        self.scale(factor)
    }
}

impl Mul<&Matrix> for f64 {
    type Output = Matrix;

    fn mul(self, matrix: &Matrix) -> Matrix {
        matrix.scale(self)
    }
}

impl Mul<&Vector> for &Matrix {
    type Output = Vector;

    fn mul(self, vector: &Vector) -> Vector {
        match self.mul_vector(vector) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}
