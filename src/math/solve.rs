use crate::error::{Error, Result};
use crate::math::dim::is_zero;
use crate::math::grid::GridMut;
use crate::math::matrix::Matrix;
use crate::math::vector::Vector;

/// Solves the linear system `A * x = b` for square `A` by Gauss-Jordan
/// elimination over an augmented matrix.
///
/// Returns `Ok(None)` when a pivot within tolerance of zero is encountered;
/// rows are not reordered to recover from that.
pub fn solve(a: &Matrix, b: &Vector) -> Result<Option<Vector>> {
    let n = a.row_rank();
    if a.column_rank() != n {
        return Err(Error::mismatch("linear solve", n, a.column_rank()));
    }
    if b.rank() != n {
        return Err(Error::mismatch("linear solve", n, b.rank()));
    }

    // Augment the coefficient matrix with b as one extra column.
    let mut m = a.resize(n, n + 1)?;
    {
        let mut column = m.column_begin_mut(n)?;
        for i in 0..n {
            column.set(b.get(i)?)?;
            column.advance();
        }
    }

    for col in 0..n {
        let pivot = m.get(col, col)?;
        if is_zero(pivot) {
            return Ok(None);
        }

        // Add the pivot row into every other row so the current column
        // becomes zero everywhere but the diagonal. Entries left of the
        // pivot column are already zero and can be skipped.
        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = -m.get(row, col)? / pivot;
            for k in col..=n {
                let value = m.get(row, k)? + m.get(col, k)? * factor;
                m.set(row, k, value)?;
            }
        }
    }

    // Normalize each row and read the solution off the augmented column.
    let mut x = Vector::new(n)?;
    for row in 0..n {
        x.set(row, m.get(row, n)? / m.get(row, row)?)?;
    }
    Ok(Some(x))
}
