use std::collections::BTreeSet;
use std::fmt::{self, Write};
use std::ops::{Index, Range, RangeFrom, RangeFull, RangeTo};
use std::str::FromStr;

use polyhedra_core::matrix::{Matrix, MatrixRowIter};
use polyhedra_core::types::{RepresentationKind, Row, RowIndex, RowSet};

use crate::error::{PolyhedraError as Error, Result};
use crate::num::{Epsilon, Literal, Num, NumberKind, NumberKindHolder};

/// Objective sense carried alongside a matrix. It is never solved here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum LpObjective {
    #[default]
    None,
    Maximize,
    Minimize,
}

impl FromStr for LpObjective {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(LpObjective::None),
            "maximize" | "max" => Ok(LpObjective::Maximize),
            "minimize" | "min" => Ok(LpObjective::Minimize),
            _ => Err(Error::InvalidArgument {
                context: "unknown objective",
            }),
        }
    }
}

/// Constraint or generator rows plus their metadata.
///
/// Rows sit in an append-only arena: existing row indices never move except when the whole
/// row set is replaced by canonicalization.
#[derive(Clone, Debug, PartialEq)]
pub struct LpMatrix<N: Num> {
    storage: Matrix<N>,
    representation: Option<RepresentationKind>,
    linearity: RowSet,
    objective: LpObjective,
    row_vec: Vec<N>,
}

#[derive(Clone, Debug)]
pub struct LpMatrixBuilder<N: Num> {
    storage: Matrix<N>,
    representation: Option<RepresentationKind>,
    linearity: Vec<Row>,
    objective: LpObjective,
    row_vec: Vec<N>,
}

impl<N: Num> LpMatrixBuilder<N> {
    pub fn with_columns(col_count: usize) -> Self {
        Self {
            storage: Matrix::with_columns(col_count),
            representation: None,
            linearity: Vec::new(),
            objective: LpObjective::None,
            row_vec: vec![N::zero(); col_count],
        }
    }

    /// # Panics
    ///
    /// Panics if the row length differs from the column count.
    pub fn push_row<T: AsRef<[N]>>(mut self, row: T, is_linearity: bool) -> Self {
        if is_linearity {
            self.linearity.push(self.storage.row_count());
        }
        self.storage.push_row(row.as_ref());
        self
    }

    pub fn representation(mut self, kind: RepresentationKind) -> Self {
        self.representation = Some(kind);
        self
    }

    pub fn inequalities(self) -> Self {
        self.representation(RepresentationKind::Inequality)
    }

    pub fn generators(self) -> Self {
        self.representation(RepresentationKind::Generator)
    }

    /// # Panics
    ///
    /// Panics if `row_vec` has the wrong length.
    pub fn objective(mut self, objective: LpObjective, row_vec: Vec<N>) -> Self {
        assert_eq!(
            row_vec.len(),
            self.storage.col_count(),
            "objective length must match column count"
        );
        self.objective = objective;
        self.row_vec = row_vec;
        self
    }

    pub fn build(self) -> LpMatrix<N> {
        let rows = self.storage.row_count();
        LpMatrix {
            linearity: RowSet::from_indices(rows, &self.linearity),
            storage: self.storage,
            representation: self.representation,
            objective: self.objective,
            row_vec: self.row_vec,
        }
    }
}

fn check_row_lengths<'a, T: 'a>(
    expected: usize,
    rows: impl IntoIterator<Item = &'a Vec<T>>,
) -> Result<usize> {
    let mut count = 0;
    for (row, values) in rows.into_iter().enumerate() {
        if values.len() != expected {
            return Err(Error::RaggedRows {
                row,
                expected,
                found: values.len(),
            });
        }
        count += 1;
    }
    Ok(count)
}

impl<N: Num> LpMatrix<N> {
    pub fn new(col_count: usize) -> Self {
        LpMatrixBuilder::with_columns(col_count).build()
    }

    pub fn builder(col_count: usize) -> LpMatrixBuilder<N> {
        LpMatrixBuilder::with_columns(col_count)
    }

    /// Builds from explicit rows; the column count is taken from the first row.
    pub fn from_rows(rows: Vec<Vec<N>>, linear: bool) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        check_row_lengths(cols, &rows)?;
        let mut out = Self::new(cols);
        out.push_rows_unchecked(rows, linear);
        Ok(out)
    }

    /// Builds from raw literals, converting each into `N`.
    pub fn from_literals(rows: &[Vec<Literal>], linear: bool) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let converted = convert_literals::<N>(cols, rows)?;
        let mut out = Self::new(cols);
        out.push_rows_unchecked(converted, linear);
        Ok(out)
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.storage.row_count()
    }

    #[inline]
    pub fn col_count(&self) -> usize {
        self.storage.col_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn storage(&self) -> &Matrix<N> {
        &self.storage
    }

    pub fn rows(&self) -> MatrixRowIter<'_, N> {
        self.storage.iter()
    }

    pub fn row(&self, row: Row) -> Option<&[N]> {
        self.storage.row(row)
    }

    pub fn try_row(&self, row: Row) -> Result<&[N]> {
        self.storage.row(row).ok_or(Error::RowOutOfRange {
            index: row,
            len: self.row_count(),
        })
    }

    /// Rows selected by a Python-style slice.
    pub fn slice(&self, slice: impl Into<RowSlice>) -> Result<Vec<&[N]>> {
        let indices = slice.into().indices(self.row_count())?;
        Ok(indices.into_iter().map(|i| &self.storage[i]).collect())
    }

    pub fn representation(&self) -> Option<RepresentationKind> {
        self.representation
    }

    pub fn set_representation(&mut self, kind: Option<RepresentationKind>) {
        self.representation = kind;
    }

    pub fn with_representation(mut self, kind: RepresentationKind) -> Self {
        self.representation = Some(kind);
        self
    }

    pub(crate) fn require_representation(
        &self,
        operation: &'static str,
    ) -> Result<RepresentationKind> {
        self.representation
            .ok_or(Error::MissingRepresentation { operation })
    }

    pub fn linearity(&self) -> &RowSet {
        &self.linearity
    }

    pub fn lin_set(&self) -> BTreeSet<usize> {
        self.linearity.iter().raw().collect()
    }

    pub fn is_linearity(&self, row: Row) -> bool {
        self.linearity.contains(row)
    }

    pub fn objective(&self) -> LpObjective {
        self.objective
    }

    pub fn row_vec(&self) -> &[N] {
        &self.row_vec
    }

    pub fn set_objective(&mut self, objective: LpObjective, row_vec: Vec<N>) -> Result<()> {
        if row_vec.len() != self.col_count() {
            return Err(Error::ColumnMismatch {
                expected: self.col_count(),
                found: row_vec.len(),
            });
        }
        self.objective = objective;
        self.row_vec = row_vec;
        Ok(())
    }

    /// Appends rows in order; when `linear` is set their indices join the linearity set.
    ///
    /// Every row is validated before the receiver changes.
    pub fn extend(&mut self, rows: Vec<Vec<N>>, linear: bool) -> Result<()> {
        let expected = self.col_count();
        if let Some(bad) = rows.iter().find(|r| r.len() != expected) {
            return Err(Error::ColumnMismatch {
                expected,
                found: bad.len(),
            });
        }
        self.push_rows_unchecked(rows, linear);
        Ok(())
    }

    /// Like [`extend`](Self::extend), converting literals into this matrix's number kind.
    pub fn extend_literals(&mut self, rows: &[Vec<Literal>], linear: bool) -> Result<()> {
        let expected = self.col_count();
        if let Some(bad) = rows.iter().find(|r| r.len() != expected) {
            return Err(Error::ColumnMismatch {
                expected,
                found: bad.len(),
            });
        }
        let converted = convert_literals::<N>(expected, rows)?;
        self.push_rows_unchecked(converted, linear);
        Ok(())
    }

    fn push_rows_unchecked(&mut self, rows: Vec<Vec<N>>, linear: bool) {
        let start = self.row_count();
        for row in &rows {
            self.storage.push_row(row);
        }
        self.linearity.resize(self.row_count());
        if linear {
            for idx in start..self.row_count() {
                self.linearity.insert(idx);
            }
        }
    }

    pub fn zero_set_into(&self, vector: &[N], out: &mut RowSet, eps: &impl Epsilon<N>) {
        out.resize(self.row_count());
        out.clear();
        for (idx, row) in self.rows().enumerate() {
            if eps.is_zero(&crate::linalg::dot(row, vector)) {
                out.insert(idx);
            }
        }
    }

    /// Rows on which `vector` evaluates to zero.
    pub fn zero_set(&self, vector: &[N], eps: &impl Epsilon<N>) -> RowSet {
        let mut out = RowSet::new(self.row_count());
        self.zero_set_into(vector, &mut out, eps);
        out
    }

    /// True when every row has a zero first coordinate.
    pub fn is_homogeneous(&self, eps: &impl Epsilon<N>) -> bool {
        self.rows().all(|row| row.first().is_none_or(|v| eps.is_zero(v)))
    }

    pub fn select_rows(&self, rows: &[Row]) -> Self {
        let linearity: Vec<Row> = rows
            .iter()
            .enumerate()
            .filter(|&(_, &r)| self.linearity.contains(r))
            .map(|(pos, _)| pos)
            .collect();
        Self {
            storage: self.storage.select_rows(rows),
            representation: self.representation,
            linearity: RowSet::from_indices(rows.len(), &linearity),
            objective: self.objective,
            row_vec: self.row_vec.clone(),
        }
    }

    /// Drops the rows in `delete`, returning the new position of each old row (`-1` if gone).
    pub fn submatrix_with_positions(&self, delete: &RowSet) -> (Self, RowIndex) {
        let mut positions: RowIndex = vec![-1; self.row_count()];
        let mut kept = Vec::with_capacity(self.row_count());
        for idx in delete.iter().complement().raw() {
            positions[idx] = kept.len() as isize;
            kept.push(idx);
        }
        (self.select_rows(&kept), positions)
    }

    /// Replaces the row set wholesale, keeping representation and objective.
    pub(crate) fn replace_rows(&mut self, storage: Matrix<N>, linearity: RowSet) {
        debug_assert_eq!(storage.col_count(), self.col_count());
        debug_assert_eq!(linearity.len(), storage.row_count());
        self.storage = storage;
        self.linearity = linearity;
    }

    pub fn to_cdd_string(&self) -> String {
        let mut out = String::new();
        if let Some(kind) = self.representation {
            out.push_str(kind.header());
            out.push('\n');
        }
        push_linearity(&self.linearity, &mut out);
        push_matrix_block(self, &mut out);
        push_objective_row(self, &mut out);
        out
    }
}

fn convert_literals<N: Num>(cols: usize, rows: &[Vec<Literal>]) -> Result<Vec<Vec<N>>> {
    check_row_lengths(cols, rows)?;
    rows.iter()
        .map(|row| row.iter().map(N::from_literal).collect())
        .collect()
}

fn push_linearity(linearity: &RowSet, out: &mut String) {
    if linearity.is_empty() {
        return;
    }
    let _ = write!(out, "linearity {}", linearity.cardinality());
    for idx in linearity.iter() {
        let _ = write!(out, " {}", idx.as_index() + 1);
    }
    out.push('\n');
}

fn push_matrix_block<N: Num>(matrix: &LpMatrix<N>, out: &mut String) {
    out.push_str("begin\n");
    let _ = writeln!(
        out,
        " {} {} {}",
        matrix.row_count(),
        matrix.col_count(),
        N::KIND.cdd_keyword()
    );
    for row in matrix.rows() {
        for val in row {
            let _ = write!(out, " {val}");
        }
        out.push('\n');
    }
    out.push_str("end\n");
}

fn push_objective_row<N: Num>(matrix: &LpMatrix<N>, out: &mut String) {
    match matrix.objective {
        LpObjective::Maximize => out.push_str("maximize\n"),
        LpObjective::Minimize => out.push_str("minimize\n"),
        LpObjective::None => return,
    }
    for val in &matrix.row_vec {
        let _ = write!(out, " {val}");
    }
    out.push('\n');
}

impl<N: Num> fmt::Display for LpMatrix<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cdd_string())
    }
}

impl<N: Num> Index<Row> for LpMatrix<N> {
    type Output = [N];

    fn index(&self, row: Row) -> &[N] {
        &self.storage[row]
    }
}

impl<N: Num> NumberKindHolder for LpMatrix<N> {
    fn number_kind(&self) -> NumberKind {
        N::KIND
    }
}

/// Python-style row slice: optional bounds, negative indices from the end, non-zero step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowSlice {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: isize,
}

impl RowSlice {
    pub fn new(start: Option<isize>, stop: Option<isize>, step: isize) -> Self {
        Self { start, stop, step }
    }

    pub fn all() -> Self {
        Self::new(None, None, 1)
    }

    pub fn step_by(mut self, step: isize) -> Self {
        self.step = step;
        self
    }

    /// The selected row indices for a matrix of `len` rows.
    pub fn indices(&self, len: usize) -> Result<Vec<usize>> {
        if self.step == 0 {
            return Err(Error::InvalidArgument {
                context: "slice step cannot be zero",
            });
        }
        let len = len as isize;
        let resolve = |bound: isize, low: isize, high: isize| {
            let b = if bound < 0 { bound + len } else { bound };
            b.clamp(low, high)
        };
        let mut out = Vec::new();
        if self.step > 0 {
            let start = self.start.map_or(0, |s| resolve(s, 0, len));
            let stop = self.stop.map_or(len, |s| resolve(s, 0, len));
            let mut i = start;
            while i < stop {
                out.push(i as usize);
                i += self.step;
            }
        } else {
            let start = self.start.map_or(len - 1, |s| resolve(s, -1, len - 1));
            let stop = self.stop.map_or(-1, |s| resolve(s, -1, len - 1));
            let mut i = start;
            while i > stop {
                out.push(i as usize);
                i += self.step;
            }
        }
        Ok(out)
    }
}

impl From<RangeFull> for RowSlice {
    fn from(_: RangeFull) -> Self {
        Self::all()
    }
}

impl From<Range<isize>> for RowSlice {
    fn from(r: Range<isize>) -> Self {
        Self::new(Some(r.start), Some(r.end), 1)
    }
}

impl From<RangeFrom<isize>> for RowSlice {
    fn from(r: RangeFrom<isize>) -> Self {
        Self::new(Some(r.start), None, 1)
    }
}

impl From<RangeTo<isize>> for RowSlice {
    fn from(r: RangeTo<isize>) -> Self {
        Self::new(None, Some(r.end), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::{LpMatrix, LpMatrixBuilder, LpObjective, RowSlice};
    use crate::error::ErrorKind;
    use crate::num::{Literal, Rat};
    use polyhedra_core::types::{RepresentationKind, RowSet};

    fn sample() -> LpMatrix<Rat> {
        LpMatrixBuilder::with_columns(2)
            .push_row([Rat::from(1), Rat::new(1, 2)], false)
            .push_row([Rat::from(0), Rat::from(3)], true)
            .push_row([Rat::from(-1), Rat::from(0)], false)
            .inequalities()
            .build()
    }

    #[test]
    fn slices_follow_python_semantics() {
        let cases: [(RowSlice, &[usize]); 6] = [
            (RowSlice::all(), &[0, 1, 2, 3, 4]),
            ((-2..).into(), &[3, 4]),
            ((..-3).into(), &[0, 1]),
            ((1..100).into(), &[1, 2, 3, 4]),
            (RowSlice::all().step_by(-2), &[4, 2, 0]),
            (RowSlice::new(Some(3), Some(0), -1), &[3, 2, 1]),
        ];
        for (slice, expected) in cases {
            assert_eq!(slice.indices(5).unwrap(), expected, "{slice:?}");
        }
        assert_eq!(
            RowSlice::all().step_by(0).indices(5).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert!(RowSlice::all().step_by(-1).indices(0).unwrap().is_empty());
    }

    #[test]
    fn failed_extend_leaves_matrix_untouched() {
        let mut m = sample();
        let before = m.clone();
        let err = m
            .extend(vec![vec![Rat::from(1), Rat::from(1)], vec![Rat::from(1)]], false)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
        assert_eq!(m, before);
    }

    #[test]
    fn extend_marks_linear_rows() {
        let mut m = sample();
        m.extend_literals(&[vec![Literal::from(4), Literal::from("2/3")]], true)
            .unwrap();
        assert_eq!(m.row_count(), 4);
        assert_eq!(m.lin_set().into_iter().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(m[3][1], Rat::new(2, 3));
    }

    #[test]
    fn out_of_range_row_is_a_range_error() {
        let m = sample();
        assert_eq!(m.try_row(3).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(m.try_row(0).unwrap()[1], Rat::new(1, 2));
    }

    #[test]
    fn cdd_text_uses_one_based_linearity() {
        let mut m = sample();
        m.set_objective(LpObjective::Maximize, vec![Rat::from(0), Rat::from(1)])
            .unwrap();
        let expected = "H-representation\nlinearity 1 2\nbegin\n 3 2 rational\n\
                        \x201 1/2\n 0 3\n -1 0\nend\nmaximize\n 0 1\n";
        assert_eq!(m.to_cdd_string(), expected);

        m.set_representation(None);
        assert!(m.to_cdd_string().starts_with("linearity"));
    }

    #[test]
    fn submatrix_reports_positions() {
        let m = sample();
        let (sub, pos) = m.submatrix_with_positions(&RowSet::from_indices(3, &[0]));
        assert_eq!(pos, vec![-1, 0, 1]);
        assert_eq!(sub.lin_set().into_iter().collect::<Vec<_>>(), vec![0]);
        assert_eq!(sub.representation(), Some(RepresentationKind::Inequality));
    }
}
