//! Adjacency and incidence between the rows of a source matrix and its dual.

use polyhedra_core::adjacency::{adjacency_from_incidence, input_adjacency_from_incidence};
use polyhedra_core::set_family::SetFamily;
use polyhedra_core::types::RowSet;
use tracing::debug;

use crate::dd::{Cone, ConeOptions, ConeOutput, DualRows};
use crate::error::{PolyhedraError as Error, Result};
use crate::linalg;
use crate::matrix::LpMatrix;
use crate::num::Num;

/// The four relations between source rows and dual rows.
///
/// Source-side families carry one trailing set for the artificial row when the cone had one.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PolyhedronGraphs {
    pub source_adjacency: SetFamily,
    pub dual_adjacency: SetFamily,
    /// For each source row, the dual rows lying on it.
    pub source_incidence: SetFamily,
    /// For each dual row, the source rows it lies on.
    pub dual_incidence: SetFamily,
}

impl PolyhedronGraphs {
    /// Graphs from the byproducts of a finished engine run.
    pub fn from_engine<N: Num>(output: &mut ConeOutput<N>, dual: &DualRows<N>) -> Self {
        let dual_incidence = output.dual_incidence(dual);
        let dual_adjacency = output.dual_adjacency(dual);
        Self::with_dual(
            dual_incidence,
            dual_adjacency,
            output.cone().equalities(),
            dual.sources.len(),
        )
    }

    fn with_dual(
        dual_incidence: SetFamily,
        dual_adjacency: SetFamily,
        source_linearity: &RowSet,
        dual_rows: usize,
    ) -> Self {
        let source_incidence = dual_incidence.transpose();
        let classes = source_incidence.classify_input_incidence(source_linearity, dual_rows);
        let source_adjacency = input_adjacency_from_incidence(&source_incidence, &classes);
        Self {
            source_adjacency,
            dual_adjacency,
            source_incidence,
            dual_incidence,
        }
    }
}

/// Recomputes all four graphs from a finished pair of matrices.
///
/// Dual adjacency uses the combinatorial ridge test over incidence sets, so on exact input
/// the result matches the engine's graphs.
pub fn extract<N: Num>(
    source: &LpMatrix<N>,
    dual: &LpMatrix<N>,
    eps: &N::Eps,
) -> Result<PolyhedronGraphs> {
    let cone = Cone::from_matrix(source, ConeOptions::default(), eps.clone())?;
    if !dual.is_empty() && dual.col_count() != cone.col_count() {
        return Err(Error::ColumnMismatch {
            expected: cone.col_count(),
            found: dual.col_count(),
        });
    }
    let rank = linalg::rank(cone.col_count(), cone.rows().iter(), eps);

    let sets: Vec<RowSet> = dual.rows().map(|row| cone.zero_set(row)).collect();
    let dual_incidence = SetFamily::from_sets(cone.row_count(), sets);
    let excluded: Vec<bool> = (0..dual.row_count())
        .map(|row| dual.is_linearity(row))
        .collect();
    let dual_adjacency = adjacency_from_incidence(&dual_incidence, rank, &excluded);
    debug!(
        source_rows = source.row_count(),
        dual_rows = dual.row_count(),
        rank,
        "graphs recomputed from incidence"
    );
    Ok(PolyhedronGraphs::with_dual(
        dual_incidence,
        dual_adjacency,
        cone.equalities(),
        dual.row_count(),
    ))
}
