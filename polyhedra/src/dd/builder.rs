use polyhedra_core::matrix::Matrix;
use polyhedra_core::types::{RepresentationKind, Row, RowSet};

use crate::dd::ConeOptions;
use crate::dd::state::{ConeBasisPrep, ConeEngine};
use crate::error::{PolyhedraError as Error, Result};
use crate::matrix::LpMatrix;
use crate::num::{Epsilon, Num};

/// The homogenized constraint system handed to the engine.
#[derive(Clone, Debug)]
pub struct Cone<N: Num> {
    pub(crate) rows: Matrix<N>,
    pub(crate) equalities: RowSet,
    pub(crate) source_rows: usize,
    pub(crate) placeholder: bool,
    pub(crate) source_kind: RepresentationKind,
    pub(crate) options: ConeOptions,
    pub(crate) eps: N::Eps,
}

impl<N: Num> Cone<N> {
    /// Reads `matrix` as cone constraints.
    ///
    /// H input always gains the artificial row `x0 >= 0`. V input gains the origin only when it
    /// has rows and every row has a zero first coordinate.
    pub fn from_matrix(matrix: &LpMatrix<N>, options: ConeOptions, eps: N::Eps) -> Result<Self> {
        let source_kind = matrix.require_representation("conversion")?;
        let cols = matrix.col_count();
        if cols == 0 {
            return Err(Error::InvalidArgument {
                context: "matrix has no columns",
            });
        }
        let m = matrix.row_count();
        let placeholder = match source_kind {
            RepresentationKind::Inequality => true,
            RepresentationKind::Generator => m > 0 && matrix.is_homogeneous(&eps),
        };

        let mut rows = matrix.storage().clone();
        if placeholder {
            rows.push_row(&artificial_row::<N>(cols));
        }
        let mut equalities = matrix.linearity().clone();
        equalities.resize(rows.row_count());

        Ok(Self {
            rows,
            equalities,
            source_rows: m,
            placeholder,
            source_kind,
            options,
            eps,
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.row_count()
    }

    pub fn col_count(&self) -> usize {
        self.rows.col_count()
    }

    pub fn source_rows(&self) -> usize {
        self.source_rows
    }

    pub fn has_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn placeholder_row(&self) -> Option<Row> {
        self.placeholder.then_some(self.source_rows)
    }

    pub fn source_kind(&self) -> RepresentationKind {
        self.source_kind
    }

    pub fn rows(&self) -> &Matrix<N> {
        &self.rows
    }

    pub fn equalities(&self) -> &RowSet {
        &self.equalities
    }

    pub fn eps(&self) -> &N::Eps {
        &self.eps
    }

    /// Rows of the cone on which `vector` vanishes.
    pub(crate) fn zero_set(&self, vector: &[N]) -> RowSet {
        let mut out = RowSet::new(self.row_count());
        for (idx, row) in self.rows.iter().enumerate() {
            if self.eps.is_zero(&crate::linalg::dot(row, vector)) {
                out.insert(idx);
            }
        }
        out
    }

    pub fn into_engine(self) -> ConeBasisPrep<N> {
        ConeBasisPrep::new(ConeEngine::new(self))
    }
}

pub(crate) fn artificial_row<N: Num>(cols: usize) -> Vec<N> {
    let mut row = vec![N::zero(); cols];
    row[0] = N::one();
    row
}
