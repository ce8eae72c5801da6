use crate::error::Result;
use crate::math::iter::{ColumnCursor, ColumnCursorMut, RowCursor, RowCursorMut};
use crate::math::view::{View, ViewMut};

/// Read access shared by matrices and views over them.
///
/// Everything that exposes a rectangular grid of values implements this
/// trait, which is what lets views nest and cursors walk matrices and views
/// through one contract.
pub trait Grid {
    fn row_rank(&self) -> usize;
    fn column_rank(&self) -> usize;

    /// Reads one cell; out-of-range access is an error, never a clamp.
    fn get(&self, row: usize, column: usize) -> Result<f64>;

    /// A rectangular window into this grid. The window must fit entirely
    /// inside the base: `row + rows <= row_rank` and
    /// `column + columns <= column_rank`.
    fn view(&self, row: usize, column: usize, rows: usize, columns: usize) -> Result<View<'_, Self>>
    where
        Self: Sized,
    {
        View::new(self, row, column, rows, columns)
    }

    fn row_begin(&self, row: usize) -> Result<RowCursor<'_, Self>>
    where
        Self: Sized,
    {
        RowCursor::new(self, row)
    }

    fn row_end(&self, row: usize) -> Result<RowCursor<'_, Self>>
    where
        Self: Sized,
    {
        let mut cursor = RowCursor::new(self, row)?;
        cursor.seek(self.column_rank() as isize);
        Ok(cursor)
    }

    fn column_begin(&self, column: usize) -> Result<ColumnCursor<'_, Self>>
    where
        Self: Sized,
    {
        ColumnCursor::new(self, column)
    }

    fn column_end(&self, column: usize) -> Result<ColumnCursor<'_, Self>>
    where
        Self: Sized,
    {
        let mut cursor = ColumnCursor::new(self, column)?;
        cursor.seek(self.row_rank() as isize);
        Ok(cursor)
    }
}

/// Write access on top of [`Grid`]. Writes through a view or cursor reach
/// the base container.
pub trait GridMut: Grid {
    fn set(&mut self, row: usize, column: usize, value: f64) -> Result<()>;

    fn view_mut(
        &mut self,
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    ) -> Result<ViewMut<'_, Self>>
    where
        Self: Sized,
    {
        ViewMut::new(self, row, column, rows, columns)
    }

    fn row_begin_mut(&mut self, row: usize) -> Result<RowCursorMut<'_, Self>>
    where
        Self: Sized,
    {
        RowCursorMut::new(self, row)
    }

    fn column_begin_mut(&mut self, column: usize) -> Result<ColumnCursorMut<'_, Self>>
    where
        Self: Sized,
    {
        ColumnCursorMut::new(self, column)
    }
}
