//! Redundancy removal and implicit-linearity detection.
//!
//! Both are read off the face lattice of the homogenized cone: the DD engine enumerates its
//! generators, and each row is classified by the generators it is tight on.

use ahash::AHashMap;
use polyhedra_core::types::{RepresentationKind, Row, RowIndex, RowSet};
use tracing::debug;

use crate::dd::{Cone, ConeOptions, ConeOutput, Ray};
use crate::error::Result;
use crate::linalg::{self, Echelon};
use crate::matrix::LpMatrix;
use crate::num::{Epsilon, Num};

/// Outcome of [`LpMatrix::canonicalize_with_positions`]. Both sets index the input rows.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CanonicalizationResult {
    pub redundant_rows: RowSet,
    pub implicit_linearity: RowSet,
    /// New index of each input row, `-1` when it was removed.
    pub positions: RowIndex,
}

impl<N: Num> LpMatrix<N> {
    /// Reduces the matrix to a minimal system and returns `(redundant, implicit_linearity)`.
    pub fn canonicalize(&mut self) -> Result<(RowSet, RowSet)> {
        self.canonicalize_with_eps(&N::default_eps())
    }

    pub fn canonicalize_with_eps(&mut self, eps: &N::Eps) -> Result<(RowSet, RowSet)> {
        let result = self.canonicalize_with_positions(eps)?;
        Ok((result.redundant_rows, result.implicit_linearity))
    }

    pub fn canonicalize_with_positions(&mut self, eps: &N::Eps) -> Result<CanonicalizationResult> {
        let kind = self.require_representation("canonicalize")?;
        let m = self.row_count();
        if m == 0 {
            return Ok(CanonicalizationResult {
                redundant_rows: RowSet::new(0),
                implicit_linearity: RowSet::new(0),
                positions: RowIndex::new(),
            });
        }

        let output = run_cone(self, eps)?;
        let (redundant, implicit) =
            if kind == RepresentationKind::Inequality && !has_affine_ray(&output, eps) {
                (self.infeasible_core(eps)?, RowSet::new(m))
            } else {
                classify_rows(self, &output, eps)
            };

        let (reduced, positions) = self.submatrix_with_positions(&redundant);
        let mut linearity = RowSet::new(reduced.row_count());
        for (row, &pos) in positions.iter().enumerate() {
            if pos >= 0 && (self.is_linearity(row) || implicit.contains(row)) {
                linearity.insert(pos as usize);
            }
        }
        debug!(
            rows = m,
            kept = reduced.row_count(),
            redundant = redundant.cardinality(),
            implicit = implicit.cardinality(),
            "canonicalized"
        );
        self.replace_rows(reduced.storage().clone(), linearity);

        Ok(CanonicalizationResult {
            redundant_rows: redundant,
            implicit_linearity: implicit,
            positions,
        })
    }

    /// Drops rows in input order while the rest stays infeasible; returns the dropped rows.
    fn infeasible_core(&self, eps: &N::Eps) -> Result<RowSet> {
        let m = self.row_count();
        let mut dropped = RowSet::new(m);
        let mut kept: Vec<Row> = (0..m).collect();
        for row in 0..m {
            let trial: Vec<Row> = kept.iter().copied().filter(|&r| r != row).collect();
            let output = run_cone(&self.select_rows(&trial), eps)?;
            if !has_affine_ray(&output, eps) {
                kept = trial;
                dropped.insert(row);
            }
        }
        debug!(core = kept.len(), "infeasible subsystem isolated");
        Ok(dropped)
    }
}

fn run_cone<N: Num>(matrix: &LpMatrix<N>, eps: &N::Eps) -> Result<ConeOutput<N>> {
    Cone::from_matrix(matrix, ConeOptions::default(), eps.clone())?
        .into_engine()
        .run_dd()
}

fn has_affine_ray<N: Num>(output: &ConeOutput<N>, eps: &N::Eps) -> bool {
    output
        .rays()
        .any(|ray| ray.vector().first().is_some_and(|t| eps.is_positive(t)))
}

fn classify_rows<N: Num>(
    matrix: &LpMatrix<N>,
    output: &ConeOutput<N>,
    eps: &N::Eps,
) -> (RowSet, RowSet) {
    let m = matrix.row_count();
    let cols = matrix.col_count();
    let from_h = output.cone().source_kind() == RepresentationKind::Inequality;
    let rays: Vec<&Ray<N>> = output.rays().collect();
    let lines = output.lines();

    let dim = linalg::rank(
        cols,
        lines
            .iter()
            .map(Vec::as_slice)
            .chain(rays.iter().map(|r| r.vector())),
        eps,
    );
    let tight_rays = |row: Row| -> RowSet {
        let mut set = RowSet::new(rays.len());
        for (k, ray) in rays.iter().enumerate() {
            if ray.zero_set().contains(row) {
                set.insert(k);
            }
        }
        set
    };

    let mut implicit = RowSet::new(m);
    for row in 0..m {
        if !matrix.is_linearity(row) && rays.iter().all(|ray| ray.zero_set().contains(row)) {
            implicit.insert(row);
        }
    }

    let mut redundant = RowSet::new(m);
    let mut equalities = Echelon::new(cols);
    for row in 0..m {
        if (matrix.is_linearity(row) || implicit.contains(row))
            && !equalities.offer(&matrix[row], eps)
        {
            redundant.insert(row);
        }
    }

    let mut seen: AHashMap<RowSet, Row> = AHashMap::new();
    if let Some(placeholder) = output.cone().placeholder_row() {
        seen.insert(tight_rays(placeholder), placeholder);
    }
    for row in 0..m {
        if matrix.is_linearity(row) || implicit.contains(row) {
            continue;
        }
        let tight = tight_rays(row);
        let face_rank = linalg::rank(
            cols,
            lines
                .iter()
                .map(Vec::as_slice)
                .chain(tight.iter().raw().map(|k| rays[k].vector())),
            eps,
        );
        let facet = face_rank + 1 == dim;
        let bounded_face = !from_h
            || tight
                .iter()
                .raw()
                .any(|k| rays[k].vector().first().is_some_and(|t| eps.is_positive(t)));
        if !facet || !bounded_face || seen.contains_key(&tight) {
            redundant.insert(row);
            continue;
        }
        seen.insert(tight, row);
    }
    (redundant, implicit)
}
