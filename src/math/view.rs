use crate::error::{Error, Result};
use crate::math::dim::Dim;
use crate::math::grid::{Grid, GridMut};

fn check_window<G: Grid>(
    base: &G,
    row: usize,
    column: usize,
    rows: usize,
    columns: usize,
) -> Result<(Dim, Dim)> {
    let rows = Dim::new(rows)?;
    let columns = Dim::new(columns)?;

    if column >= base.column_rank() {
        return Err(Error::construction(format!(
            "base column offset {column} is out of range for rank {}",
            base.column_rank()
        )));
    }
    if base.column_rank() - column < columns.rank() {
        return Err(Error::construction(format!(
            "view of {} columns at offset {column} does not fit a base of rank {}",
            columns.rank(),
            base.column_rank()
        )));
    }
    if row >= base.row_rank() {
        return Err(Error::construction(format!(
            "base row offset {row} is out of range for rank {}",
            base.row_rank()
        )));
    }
    if base.row_rank() - row < rows.rank() {
        return Err(Error::construction(format!(
            "view of {} rows at offset {row} does not fit a base of rank {}",
            rows.rank(),
            base.row_rank()
        )));
    }

    Ok((rows, columns))
}

/// A read-only rectangular window into a base grid.
///
/// The view owns no storage; it carries the base offsets and its own ranks.
/// Because any [`Grid`] can be the base, views nest.
pub struct View<'a, G: Grid> {
    base: &'a G,
    row: usize,
    column: usize,
    rows: Dim,
    columns: Dim,
}

impl<'a, G: Grid> View<'a, G> {
    pub fn new(base: &'a G, row: usize, column: usize, rows: usize, columns: usize) -> Result<Self> {
        let (rows, columns) = check_window(base, row, column, rows, columns)?;
        Ok(View {
            base,
            row,
            column,
            rows,
            columns,
        })
    }
}

impl<'a, G: Grid> Grid for View<'a, G> {
    fn row_rank(&self) -> usize {
        self.rows.rank()
    }

    fn column_rank(&self) -> usize {
        self.columns.rank()
    }

    fn get(&self, row: usize, column: usize) -> Result<f64> {
        if column >= self.column_rank() {
            return Err(Error::out_of_range(column, self.column_rank()));
        }
        if row >= self.row_rank() {
            return Err(Error::out_of_range(row, self.row_rank()));
        }
        self.base.get(self.row + row, self.column + column)
    }
}

impl<'a, G: Grid> Clone for View<'a, G> {
    fn clone(&self) -> Self {
        View {
            base: self.base,
            row: self.row,
            column: self.column,
            rows: self.rows,
            columns: self.columns,
        }
    }
}

impl<'a, G: Grid> Copy for View<'a, G> {}

/// A writable rectangular window; mutation reaches the base container.
pub struct ViewMut<'a, G: GridMut> {
    base: &'a mut G,
    row: usize,
    column: usize,
    rows: Dim,
    columns: Dim,
}

impl<'a, G: GridMut> ViewMut<'a, G> {
    pub fn new(
        base: &'a mut G,
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    ) -> Result<Self> {
        let (rows, columns) = check_window(&*base, row, column, rows, columns)?;
        Ok(ViewMut {
            base,
            row,
            column,
            rows,
            columns,
        })
    }
}

impl<'a, G: GridMut> Grid for ViewMut<'a, G> {
    fn row_rank(&self) -> usize {
        self.rows.rank()
    }

    fn column_rank(&self) -> usize {
        self.columns.rank()
    }

    fn get(&self, row: usize, column: usize) -> Result<f64> {
        if column >= self.column_rank() {
            return Err(Error::out_of_range(column, self.column_rank()));
        }
        if row >= self.row_rank() {
            return Err(Error::out_of_range(row, self.row_rank()));
        }
        self.base.get(self.row + row, self.column + column)
    }
}

impl<'a, G: GridMut> GridMut for ViewMut<'a, G> {
    fn set(&mut self, row: usize, column: usize, value: f64) -> Result<()> {
        if column >= self.column_rank() {
            return Err(Error::out_of_range(column, self.column_rank()));
        }
        if row >= self.row_rank() {
            return Err(Error::out_of_range(row, self.row_rank()));
        }
        self.base.set(self.row + row, self.column + column, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::matrix::Matrix;

    fn sample() -> Matrix {
        Matrix::from_vec(
            4,
            5,
            vec![
                11.0, 12.0, 13.0, 14.0, 15.0, //
                21.0, 22.0, 23.0, 24.0, 25.0, //
                31.0, 32.0, 33.0, 34.0, 35.0, //
                41.0, 42.0, 43.0, 44.0, 45.0,
            ],
        )
        .unwrap()
    }

    #[test]
    fn construction_rejects_windows_outside_the_base() {
        let m = sample();
        // Offset past the base rank.
        assert!(m.view(0, 6, 2, 2).is_err());
        assert!(m.view(5, 0, 2, 2).is_err());
        // Offset in range but the window does not fit.
        assert!(m.view(0, 4, 2, 2).is_err());
        assert!(m.view(3, 0, 2, 2).is_err());
        // Zero-rank windows are not a thing.
        assert!(m.view(0, 0, 0, 2).is_err());

        let mut m = sample();
        assert!(m.view_mut(0, 6, 2, 2).is_err());
        assert!(m.view_mut(3, 0, 2, 2).is_err());
    }

    #[test]
    fn accessors_map_to_the_base_offset() {
        let m = sample();
        let v = m.view(2, 1, 2, 2).unwrap();

        for row in 0..v.row_rank() {
            for col in 0..v.column_rank() {
                assert_eq!(v.get(row, col).unwrap(), m.get(row + 2, col + 1).unwrap());
            }
        }

        assert!(matches!(v.get(0, 3), Err(Error::IndexOutOfRange { .. })));
        assert!(matches!(v.get(2, 0), Err(Error::IndexOutOfRange { .. })));
    }

    #[test]
    fn writes_through_a_mutable_view_reach_the_base() {
        let mut m = sample();
        {
            let mut v = m.view_mut(1, 2, 2, 2).unwrap();
            for row in 0..2 {
                for col in 0..2 {
                    v.set(row, col, row as f64 * 1000.0 + col as f64 * 10.0)
                        .unwrap();
                }
            }
            assert!(matches!(
                v.set(0, 3, -5.0),
                Err(Error::IndexOutOfRange { .. })
            ));
            assert!(matches!(
                v.set(2, 0, -1.0),
                Err(Error::IndexOutOfRange { .. })
            ));
        }

        for row in 0..2 {
            for col in 0..2 {
                assert_eq!(
                    m.get(row + 1, col + 2).unwrap(),
                    row as f64 * 1000.0 + col as f64 * 10.0
                );
            }
        }
    }

    #[test]
    fn views_nest() {
        let m = sample();
        let outer = m.view(1, 1, 3, 3).unwrap();
        let inner = outer.view(1, 1, 2, 2).unwrap();

        assert_eq!(inner.get(0, 0).unwrap(), m.get(2, 2).unwrap());
        assert_eq!(inner.get(1, 1).unwrap(), m.get(3, 3).unwrap());
        assert!(outer.view(2, 0, 2, 2).is_err());
    }

    #[test]
    fn view_cursors_walk_the_window() {
        let m = sample();
        let v = m.view(1, 2, 3, 3).unwrap();

        let row: Vec<f64> = v.row_begin(0).unwrap().collect();
        assert_eq!(row, vec![23.0, 24.0, 25.0]);

        let it = v.row_begin(1).unwrap();
        let end = v.row_end(1).unwrap();
        assert_eq!(end - it, 3);
        assert!(matches!(end.get(), Err(Error::IndexOutOfRange { .. })));

        let column: Vec<f64> = v.column_begin(0).unwrap().collect();
        assert_eq!(column, vec![23.0, 33.0, 43.0]);
    }

    #[test]
    fn mutable_view_cursor_writes_reach_the_base() {
        let mut m = sample();
        {
            let mut v = m.view_mut(0, 1, 3, 3).unwrap();
            let mut it = v.row_begin_mut(0).unwrap();
            it.set(-1.0).unwrap();
            it.advance();
            it.set(-2.0).unwrap();
        }
        assert_eq!(m.get(0, 1).unwrap(), -1.0);
        assert_eq!(m.get(0, 2).unwrap(), -2.0);
    }
}
