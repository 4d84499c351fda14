//! Matrices and polyhedra whose number kind is chosen at run time.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use polyhedra_core::set_family::SetFamily;
use polyhedra_core::types::{ComputationStatus, RepresentationKind, RowSet};

use crate::error::{PolyhedraError, Result};
use crate::graph::PolyhedronGraphs;
use crate::matrix::{LpMatrix, LpObjective, RowSlice};
use crate::num::{F64Eps, Literal, NumberKind, NumberKindHolder, Rat};
use crate::polyhedron::Polyhedron;

macro_rules! dispatch {
    ($value:expr, $inner:pat => $body:expr) => {
        match $value {
            AnyMatrix::Rational($inner) => $body,
            AnyMatrix::Float($inner) => $body,
        }
    };
}

macro_rules! dispatch_polyhedron {
    ($value:expr, $inner:pat => $body:expr) => {
        match $value {
            AnyPolyhedron::Rational($inner) => $body,
            AnyPolyhedron::Float($inner) => $body,
        }
    };
}

/// A matrix of either number kind. Kinds never mix within one matrix.
#[derive(Clone, Debug, PartialEq)]
pub enum AnyMatrix {
    Rational(LpMatrix<Rat>),
    Float(LpMatrix<f64>),
}

/// One borrowed row of an [`AnyMatrix`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnyRow<'a> {
    Rational(&'a [Rat]),
    Float(&'a [f64]),
}

impl AnyRow<'_> {
    pub fn len(&self) -> usize {
        match self {
            AnyRow::Rational(row) => row.len(),
            AnyRow::Float(row) => row.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_rational(&self) -> Option<&[Rat]> {
        match *self {
            AnyRow::Rational(row) => Some(row),
            AnyRow::Float(_) => None,
        }
    }

    pub fn as_float(&self) -> Option<&[f64]> {
        match *self {
            AnyRow::Float(row) => Some(row),
            AnyRow::Rational(_) => None,
        }
    }

    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            AnyRow::Rational(row) => row.iter().map(Rat::to_f64).collect(),
            AnyRow::Float(row) => row.to_vec(),
        }
    }
}

impl fmt::Display for AnyRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, row: &[T]) -> fmt::Result {
            for (i, v) in row.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{v}")?;
            }
            Ok(())
        }
        match self {
            AnyRow::Rational(row) => join(f, row),
            AnyRow::Float(row) => join(f, row),
        }
    }
}

impl AnyMatrix {
    /// Builds from raw literals.
    ///
    /// With `kind` unset, any exact or textual literal selects [`NumberKind::Rational`];
    /// otherwise the matrix is floating.
    pub fn from_literals(
        rows: &[Vec<Literal>],
        linear: bool,
        kind: Option<NumberKind>,
    ) -> Result<Self> {
        let kind = kind.unwrap_or_else(|| Literal::infer_kind(rows.iter().flatten()));
        Ok(match kind {
            NumberKind::Rational => AnyMatrix::Rational(LpMatrix::from_literals(rows, linear)?),
            NumberKind::Float => AnyMatrix::Float(LpMatrix::from_literals(rows, linear)?),
        })
    }

    pub fn as_rational(&self) -> Option<&LpMatrix<Rat>> {
        match self {
            AnyMatrix::Rational(m) => Some(m),
            AnyMatrix::Float(_) => None,
        }
    }

    pub fn as_float(&self) -> Option<&LpMatrix<f64>> {
        match self {
            AnyMatrix::Float(m) => Some(m),
            AnyMatrix::Rational(_) => None,
        }
    }

    pub fn row_count(&self) -> usize {
        dispatch!(self, m => m.row_count())
    }

    pub fn col_count(&self) -> usize {
        dispatch!(self, m => m.col_count())
    }

    pub fn representation(&self) -> Option<RepresentationKind> {
        dispatch!(self, m => m.representation())
    }

    pub fn set_representation(&mut self, kind: Option<RepresentationKind>) {
        dispatch!(self, m => m.set_representation(kind))
    }

    pub fn with_representation(mut self, kind: RepresentationKind) -> Self {
        self.set_representation(Some(kind));
        self
    }

    pub fn linearity(&self) -> &RowSet {
        dispatch!(self, m => m.linearity())
    }

    pub fn lin_set(&self) -> BTreeSet<usize> {
        dispatch!(self, m => m.lin_set())
    }

    pub fn objective(&self) -> LpObjective {
        dispatch!(self, m => m.objective())
    }

    /// The objective vector in this matrix's number kind.
    pub fn objective_row(&self) -> AnyRow<'_> {
        match self {
            AnyMatrix::Rational(m) => AnyRow::Rational(m.row_vec()),
            AnyMatrix::Float(m) => AnyRow::Float(m.row_vec()),
        }
    }

    pub fn set_objective(&mut self, objective: LpObjective, row_vec: &[Literal]) -> Result<()> {
        match self {
            AnyMatrix::Rational(m) => m.set_objective(objective, convert_row(row_vec)?),
            AnyMatrix::Float(m) => m.set_objective(objective, convert_row(row_vec)?),
        }
    }

    pub fn row(&self, row: usize) -> Result<AnyRow<'_>> {
        Ok(match self {
            AnyMatrix::Rational(m) => AnyRow::Rational(m.try_row(row)?),
            AnyMatrix::Float(m) => AnyRow::Float(m.try_row(row)?),
        })
    }

    pub fn slice(&self, slice: impl Into<RowSlice>) -> Result<Vec<AnyRow<'_>>> {
        Ok(match self {
            AnyMatrix::Rational(m) => m.slice(slice)?.into_iter().map(AnyRow::Rational).collect(),
            AnyMatrix::Float(m) => m.slice(slice)?.into_iter().map(AnyRow::Float).collect(),
        })
    }

    /// Appends rows converted into this matrix's number kind.
    pub fn extend(&mut self, rows: &[Vec<Literal>], linear: bool) -> Result<()> {
        dispatch!(self, m => m.extend_literals(rows, linear))
    }

    pub fn canonicalize(&mut self) -> Result<(RowSet, RowSet)> {
        dispatch!(self, m => m.canonicalize())
    }

    /// Like [`canonicalize`](Self::canonicalize); `tolerance` applies to floating matrices.
    pub fn canonicalize_with_tolerance(&mut self, tolerance: F64Eps) -> Result<(RowSet, RowSet)> {
        match self {
            AnyMatrix::Rational(m) => m.canonicalize(),
            AnyMatrix::Float(m) => m.canonicalize_with_eps(&tolerance),
        }
    }

    pub fn to_cdd_string(&self) -> String {
        dispatch!(self, m => m.to_cdd_string())
    }
}

fn convert_row<N: crate::num::Num>(row: &[Literal]) -> Result<Vec<N>> {
    row.iter().map(N::from_literal).collect()
}

impl NumberKindHolder for AnyMatrix {
    fn number_kind(&self) -> NumberKind {
        match self {
            AnyMatrix::Rational(_) => NumberKind::Rational,
            AnyMatrix::Float(_) => NumberKind::Float,
        }
    }
}

impl fmt::Display for AnyMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, m => fmt::Display::fmt(m, f))
    }
}

impl FromStr for AnyMatrix {
    type Err = PolyhedraError;

    fn from_str(s: &str) -> Result<Self> {
        crate::cdd::parse_any(s)
    }
}

impl From<LpMatrix<Rat>> for AnyMatrix {
    fn from(m: LpMatrix<Rat>) -> Self {
        AnyMatrix::Rational(m)
    }
}

impl From<LpMatrix<f64>> for AnyMatrix {
    fn from(m: LpMatrix<f64>) -> Self {
        AnyMatrix::Float(m)
    }
}

/// A polyhedron of either number kind.
#[derive(Clone, Debug)]
pub enum AnyPolyhedron {
    Rational(Polyhedron<Rat>),
    Float(Polyhedron<f64>),
}

impl AnyPolyhedron {
    pub fn new(matrix: &AnyMatrix) -> Result<Self> {
        Ok(match matrix {
            AnyMatrix::Rational(m) => AnyPolyhedron::Rational(Polyhedron::new(m)?),
            AnyMatrix::Float(m) => AnyPolyhedron::Float(Polyhedron::new(m)?),
        })
    }

    /// Like [`new`](Self::new); `tolerance` applies to floating matrices.
    pub fn with_tolerance(matrix: &AnyMatrix, tolerance: F64Eps) -> Result<Self> {
        Ok(match matrix {
            AnyMatrix::Rational(m) => AnyPolyhedron::Rational(Polyhedron::new(m)?),
            AnyMatrix::Float(m) => {
                AnyPolyhedron::Float(Polyhedron::builder(m).eps(tolerance).build()?)
            }
        })
    }

    pub fn source(&self) -> AnyMatrix {
        match self {
            AnyPolyhedron::Rational(p) => AnyMatrix::Rational(p.source().clone()),
            AnyPolyhedron::Float(p) => AnyMatrix::Float(p.source().clone()),
        }
    }

    pub fn dual(&self) -> AnyMatrix {
        match self {
            AnyPolyhedron::Rational(p) => AnyMatrix::Rational(p.dual().clone()),
            AnyPolyhedron::Float(p) => AnyMatrix::Float(p.dual().clone()),
        }
    }

    pub fn graphs(&self) -> &PolyhedronGraphs {
        dispatch_polyhedron!(self, p => p.graphs())
    }

    pub fn source_adjacency(&self) -> &SetFamily {
        dispatch_polyhedron!(self, p => p.source_adjacency())
    }

    pub fn dual_adjacency(&self) -> &SetFamily {
        dispatch_polyhedron!(self, p => p.dual_adjacency())
    }

    pub fn source_incidence(&self) -> &SetFamily {
        dispatch_polyhedron!(self, p => p.source_incidence())
    }

    pub fn dual_incidence(&self) -> &SetFamily {
        dispatch_polyhedron!(self, p => p.dual_incidence())
    }

    pub fn inequality_adjacency(&self) -> &SetFamily {
        dispatch_polyhedron!(self, p => p.inequality_adjacency())
    }

    pub fn generator_adjacency(&self) -> &SetFamily {
        dispatch_polyhedron!(self, p => p.generator_adjacency())
    }

    pub fn inequality_incidence(&self) -> &SetFamily {
        dispatch_polyhedron!(self, p => p.inequality_incidence())
    }

    pub fn generator_incidence(&self) -> &SetFamily {
        dispatch_polyhedron!(self, p => p.generator_incidence())
    }

    pub fn status(&self) -> ComputationStatus {
        dispatch_polyhedron!(self, p => p.status())
    }
}

impl NumberKindHolder for AnyPolyhedron {
    fn number_kind(&self) -> NumberKind {
        dispatch_polyhedron!(self, p => p.number_kind())
    }
}
