use crate::error::{Error, Result};
use crate::math::dim::{approx_eq, is_zero, Dim};
use crate::math::matrix::Matrix;

/// One sparse row: parallel column-index/value arrays. Indices are strictly
/// increasing and values within tolerance of zero are never stored.
#[derive(Debug, Clone, Default)]
struct SparseRow {
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseRow {
    fn get(&self, column: usize) -> f64 {
        match self.indices.binary_search(&column) {
            Ok(slot) => self.values[slot],
            Err(_) => 0.0,
        }
    }

    fn set(&mut self, column: usize, value: f64) {
        match self.indices.binary_search(&column) {
            Ok(slot) => {
                if is_zero(value) {
                    self.indices.remove(slot);
                    self.values.remove(slot);
                } else {
                    self.values[slot] = value;
                }
            }
            Err(slot) => {
                if !is_zero(value) {
                    self.indices.insert(slot, column);
                    self.values.insert(slot, value);
                }
            }
        }
    }

    // Two-pointer merge of this row with another, combining overlapping
    // entries with `combine` and passing absent entries through as zero.
    fn merge(&self, other: &SparseRow, combine: impl Fn(f64, f64) -> f64) -> SparseRow {
        let mut result = SparseRow::default();
        let (mut a, mut b) = (0, 0);
        while a < self.indices.len() || b < other.indices.len() {
            let ia = self.indices.get(a).copied().unwrap_or(usize::MAX);
            let ib = other.indices.get(b).copied().unwrap_or(usize::MAX);
            let (column, value) = if ia < ib {
                a += 1;
                (ia, combine(self.values[a - 1], 0.0))
            } else if ib < ia {
                b += 1;
                (ib, combine(0.0, other.values[b - 1]))
            } else {
                a += 1;
                b += 1;
                (ia, combine(self.values[a - 1], other.values[b - 1]))
            };
            if !is_zero(value) {
                result.indices.push(column);
                result.values.push(value);
            }
        }
        result
    }

    fn equals(&self, other: &SparseRow) -> bool {
        // Stored values are never near-zero, so equal rows must store the
        // same index set.
        self.indices == other.indices
            && self
                .values
                .iter()
                .zip(other.values.iter())
                .all(|(a, b)| approx_eq(*a, *b))
    }
}

/// A per-row sparse matrix with the same rank contract as [`Matrix`].
///
/// Lookups of absent cells yield zero; explicit zeros are never stored.
#[derive(Debug, Clone)]
pub struct SparseMatrix {
    rows: Dim,
    columns: Dim,
    entries: Vec<SparseRow>,
}

impl SparseMatrix {
    pub fn new(rows: usize, columns: usize) -> Result<SparseMatrix> {
        let rows = Dim::new(rows)?;
        Ok(SparseMatrix {
            rows,
            columns: Dim::new(columns)?,
            entries: vec![SparseRow::default(); rows.rank()],
        })
    }

    /// Builds from a flat row-major buffer, eliding values within tolerance
    /// of zero. The buffer length must equal `rows * columns` exactly.
    pub fn from_vec(rows: usize, columns: usize, values: Vec<f64>) -> Result<SparseMatrix> {
        if values.len() != rows * columns {
            return Err(Error::construction(format!(
                "initializer of size {} does not match a {rows}x{columns} matrix",
                values.len()
            )));
        }
        let mut result = SparseMatrix::new(rows, columns)?;
        for (offset, value) in values.into_iter().enumerate() {
            if !is_zero(value) {
                let row = offset / columns;
                result.entries[row].indices.push(offset % columns);
                result.entries[row].values.push(value);
            }
        }
        Ok(result)
    }

    pub fn row_rank(&self) -> usize {
        self.rows.rank()
    }

    pub fn column_rank(&self) -> usize {
        self.columns.rank()
    }

    /// Number of stored (non-zero) entries.
    pub fn stored(&self) -> usize {
        self.entries.iter().map(|row| row.indices.len()).sum()
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

    pub fn get(&self, row: usize, column: usize) -> Result<f64> {
        self.check_cell(row, column)?;
        Ok(self.entries[row].get(column))
    }

    pub fn set(&mut self, row: usize, column: usize, value: f64) -> Result<()> {
        self.check_cell(row, column)?;
        self.entries[row].set(column, value);
        Ok(())
    }

    fn check_shape(&self, other: &SparseMatrix, operation: &'static str) -> Result<()> {
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

    /// Sparse addition: rows are merged pairwise, entries that cancel are
    /// dropped from the result.
    pub fn checked_add(&self, other: &SparseMatrix) -> Result<SparseMatrix> {
        self.check_shape(other, "sparse addition")?;
        let entries = self
            .entries
            .iter()
            .zip(other.entries.iter())
            .map(|(a, b)| a.merge(b, |x, y| x + y))
            .collect();
        Ok(SparseMatrix {
            rows: self.rows,
            columns: self.columns,
            entries,
        })
    }

    pub fn checked_sub(&self, other: &SparseMatrix) -> Result<SparseMatrix> {
        self.check_shape(other, "sparse subtraction")?;
        let entries = self
            .entries
            .iter()
            .zip(other.entries.iter())
            .map(|(a, b)| a.merge(b, |x, y| x - y))
            .collect();
        Ok(SparseMatrix {
            rows: self.rows,
            columns: self.columns,
            entries,
        })
    }

    pub fn transpose(&self) -> SparseMatrix {
        let mut entries = vec![SparseRow::default(); self.column_rank()];
        // Scanning rows in order keeps each transposed row's indices sorted.
        for (row, sparse_row) in self.entries.iter().enumerate() {
            for (slot, &column) in sparse_row.indices.iter().enumerate() {
                entries[column].indices.push(row);
                entries[column].values.push(sparse_row.values[slot]);
            }
        }
        SparseMatrix {
            rows: self.columns,
            columns: self.rows,
            entries,
        }
    }

    pub fn to_dense(&self) -> Result<Matrix> {
        let mut result = Matrix::new(self.row_rank(), self.column_rank())?;
        for (row, sparse_row) in self.entries.iter().enumerate() {
            for (slot, &column) in sparse_row.indices.iter().enumerate() {
                result.set(row, column, sparse_row.values[slot])?;
            }
        }
        Ok(result)
    }

    /// Converts into the compressed (Yale/CSR) form.
    pub fn to_csr(&self) -> Csr {
        let mut csr = Csr {
            values: Vec::with_capacity(self.stored()),
            column_indices: Vec::with_capacity(self.stored()),
            row_offsets: Vec::with_capacity(self.row_rank() + 1),
            columns: self.column_rank(),
        };
        csr.row_offsets.push(0);
        for row in &self.entries {
            csr.values.extend_from_slice(&row.values);
            csr.column_indices.extend_from_slice(&row.indices);
            csr.row_offsets.push(csr.values.len());
        }
        csr
    }
}

impl PartialEq for SparseMatrix {
    fn eq(&self, other: &SparseMatrix) -> bool {
        self.rows == other.rows
            && self.columns == other.columns
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|(a, b)| a.equals(b))
    }
}

/// Compressed sparse row form: one flat value array, one flat column-index
/// array, and per-row offsets into both. A lookup-only companion to
/// [`SparseMatrix`] — it carries no arithmetic.
#[derive(Debug, Clone)]
pub struct Csr {
    values: Vec<f64>,
    column_indices: Vec<usize>,
    row_offsets: Vec<usize>,
    columns: usize,
}

impl Csr {
    pub fn row_rank(&self) -> usize {
        self.row_offsets.len() - 1
    }

    pub fn column_rank(&self) -> usize {
        self.columns
    }

    pub fn get(&self, row: usize, column: usize) -> Result<f64> {
        if row >= self.row_rank() {
            return Err(Error::out_of_range(row, self.row_rank()));
        }
        if column >= self.columns {
            return Err(Error::out_of_range(column, self.columns));
        }
        let slots = self.row_offsets[row]..self.row_offsets[row + 1];
        match self.column_indices[slots.clone()].binary_search(&column) {
            Ok(slot) => Ok(self.values[slots.start + slot]),
            Err(_) => Ok(0.0),
        }
    }
}
