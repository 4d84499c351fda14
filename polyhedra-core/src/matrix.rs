use std::ops::{Index, IndexMut};

use crate::types::Row;

/// Row-major dense storage with a fixed column count.
///
/// Rows live in one contiguous arena; appending never moves the index of an existing row.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Matrix<N> {
    rows: usize,
    cols: usize,
    data: Vec<N>,
}

impl<N> Default for Matrix<N> {
    fn default() -> Self {
        Self {
            rows: 0,
            cols: 0,
            data: Vec::new(),
        }
    }
}

impl<N: Clone> Matrix<N> {
    pub fn with_columns(cols: usize) -> Self {
        Self {
            rows: 0,
            cols,
            data: Vec::new(),
        }
    }

    /// Builds from explicit rows, or returns the index of the first row whose length differs
    /// from `cols`.
    pub fn try_from_rows<I, R>(cols: usize, rows: I) -> Result<Self, usize>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[N]>,
    {
        let mut out = Self::with_columns(cols);
        for (idx, row) in rows.into_iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(idx);
            }
            out.data.extend_from_slice(row);
            out.rows += 1;
        }
        Ok(out)
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn col_count(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn row(&self, row: Row) -> Option<&[N]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(&self.data[start..start + self.cols])
    }

    pub fn push_row(&mut self, row: &[N]) {
        assert_eq!(
            row.len(),
            self.cols,
            "pushed row length must match column count"
        );
        self.data.extend_from_slice(row);
        self.rows += 1;
    }

    pub fn iter(&self) -> MatrixRowIter<'_, N> {
        MatrixRowIter {
            matrix: self,
            next: 0,
        }
    }

    pub fn select_rows(&self, rows: &[Row]) -> Self {
        let mut out = Self::with_columns(self.cols);
        for &r in rows {
            out.push_row(&self[r]);
        }
        out
    }
}

impl<N> Index<Row> for Matrix<N> {
    type Output = [N];

    fn index(&self, row: Row) -> &[N] {
        assert!(
            row < self.rows,
            "matrix row out of range (row={row}, rows={})",
            self.rows
        );
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }
}

impl<N> IndexMut<Row> for Matrix<N> {
    fn index_mut(&mut self, row: Row) -> &mut [N] {
        assert!(
            row < self.rows,
            "matrix row out of range (row={row}, rows={})",
            self.rows
        );
        let start = row * self.cols;
        &mut self.data[start..start + self.cols]
    }
}

#[derive(Clone, Debug)]
pub struct MatrixRowIter<'a, N> {
    matrix: &'a Matrix<N>,
    next: usize,
}

impl<'a, N: Clone> Iterator for MatrixRowIter<'a, N> {
    type Item = &'a [N];

    fn next(&mut self) -> Option<&'a [N]> {
        let row = self.matrix.row(self.next)?;
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.matrix.rows - self.next.min(self.matrix.rows);
        (left, Some(left))
    }
}

impl<N: Clone> ExactSizeIterator for MatrixRowIter<'_, N> {}
