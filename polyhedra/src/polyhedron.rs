use polyhedra_core::set_family::SetFamily;
use polyhedra_core::types::{ComputationStatus, RepresentationKind};
use tracing::debug;

use crate::dd::{Cone, ConeOptions};
use crate::error::Result;
use crate::graph::{self, PolyhedronGraphs};
use crate::matrix::LpMatrix;
use crate::num::{Num, NumberKind, NumberKindHolder};

/// Where the graphs of a [`Polyhedron`] come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum GraphSource {
    /// Byproducts of the conversion run.
    #[default]
    Engine,
    /// Recomputed from the finished matrix pair by [`graph::extract`].
    Recompute,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PolyhedronOptions {
    pub graphs: GraphSource,
}

/// A converted polyhedron: the source matrix, its dual, and the graphs between them.
///
/// The dual is minimal only when the source was canonicalized first.
#[derive(Clone, Debug)]
pub struct Polyhedron<N: Num> {
    source: LpMatrix<N>,
    dual: LpMatrix<N>,
    graphs: PolyhedronGraphs,
    status: ComputationStatus,
}

#[derive(Clone, Debug)]
pub struct PolyhedronBuilder<'a, N: Num> {
    matrix: &'a LpMatrix<N>,
    cone_options: ConeOptions,
    options: PolyhedronOptions,
    eps: N::Eps,
}

impl<'a, N: Num> PolyhedronBuilder<'a, N> {
    pub fn cone_options(mut self, options: ConeOptions) -> Self {
        self.cone_options = options;
        self
    }

    pub fn options(mut self, options: PolyhedronOptions) -> Self {
        self.options = options;
        self
    }

    pub fn eps(mut self, eps: N::Eps) -> Self {
        self.eps = eps;
        self
    }

    pub fn build(self) -> Result<Polyhedron<N>> {
        let cone = Cone::from_matrix(self.matrix, self.cone_options, self.eps.clone())?;
        let mut output = cone.into_engine().run_dd()?;
        let dual = output.dual_rows();
        let graphs = match self.options.graphs {
            GraphSource::Engine => PolyhedronGraphs::from_engine(&mut output, &dual),
            GraphSource::Recompute => graph::extract(self.matrix, &dual.matrix, &self.eps)?,
        };
        debug!(
            source_rows = self.matrix.row_count(),
            dual_rows = dual.matrix.row_count(),
            status = ?dual.status,
            "polyhedron built"
        );
        Ok(Polyhedron {
            source: self.matrix.clone(),
            dual: dual.matrix,
            graphs,
            status: dual.status,
        })
    }
}

impl<N: Num> Polyhedron<N> {
    /// Converts `matrix` with default options.
    pub fn new(matrix: &LpMatrix<N>) -> Result<Self> {
        Self::builder(matrix).build()
    }

    pub fn builder(matrix: &LpMatrix<N>) -> PolyhedronBuilder<'_, N> {
        PolyhedronBuilder {
            matrix,
            cone_options: ConeOptions::default(),
            options: PolyhedronOptions::default(),
            eps: N::default_eps(),
        }
    }

    pub fn source(&self) -> &LpMatrix<N> {
        &self.source
    }

    pub fn dual(&self) -> &LpMatrix<N> {
        &self.dual
    }

    fn source_is_h(&self) -> bool {
        self.source.representation() == Some(RepresentationKind::Inequality)
    }

    pub fn inequalities(&self) -> &LpMatrix<N> {
        if self.source_is_h() {
            &self.source
        } else {
            &self.dual
        }
    }

    pub fn generators(&self) -> &LpMatrix<N> {
        if self.source_is_h() {
            &self.dual
        } else {
            &self.source
        }
    }

    pub fn graphs(&self) -> &PolyhedronGraphs {
        &self.graphs
    }

    pub fn source_adjacency(&self) -> &SetFamily {
        &self.graphs.source_adjacency
    }

    pub fn dual_adjacency(&self) -> &SetFamily {
        &self.graphs.dual_adjacency
    }

    pub fn source_incidence(&self) -> &SetFamily {
        &self.graphs.source_incidence
    }

    pub fn dual_incidence(&self) -> &SetFamily {
        &self.graphs.dual_incidence
    }

    /// Facet adjacency, whichever side the inequalities are on.
    pub fn inequality_adjacency(&self) -> &SetFamily {
        if self.source_is_h() {
            self.source_adjacency()
        } else {
            self.dual_adjacency()
        }
    }

    /// Vertex and ray adjacency, whichever side the generators are on.
    pub fn generator_adjacency(&self) -> &SetFamily {
        if self.source_is_h() {
            self.dual_adjacency()
        } else {
            self.source_adjacency()
        }
    }

    /// For each inequality, the generators lying on it.
    pub fn inequality_incidence(&self) -> &SetFamily {
        if self.source_is_h() {
            self.source_incidence()
        } else {
            self.dual_incidence()
        }
    }

    /// For each generator, the inequalities it lies on.
    pub fn generator_incidence(&self) -> &SetFamily {
        if self.source_is_h() {
            self.dual_incidence()
        } else {
            self.source_incidence()
        }
    }

    pub fn status(&self) -> ComputationStatus {
        self.status
    }

    pub fn is_empty(&self) -> bool {
        self.status == ComputationStatus::RegionEmpty
    }
}

impl<N: Num> NumberKindHolder for Polyhedron<N> {
    fn number_kind(&self) -> NumberKind {
        N::KIND
    }
}

#[cfg(test)]
mod tests {
    use super::{GraphSource, Polyhedron, PolyhedronOptions};
    use crate::matrix::LpMatrix;
    use crate::num::Rat;
    use polyhedra_core::types::RepresentationKind;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn polyhedron_is_shareable() {
        assert_send_sync::<Polyhedron<Rat>>();
        assert_send_sync::<Polyhedron<f64>>();
    }

    #[test]
    fn recomputed_graphs_match_engine_graphs() {
        let rows = [[1, 1, 0], [1, 0, 1], [1, -1, 0], [1, 0, -1], [3, 1, 1]]
            .iter()
            .map(|r| r.iter().map(|&v| Rat::from(v)).collect())
            .collect();
        let square = LpMatrix::from_rows(rows, false)
            .unwrap()
            .with_representation(RepresentationKind::Inequality);
        let engine = Polyhedron::new(&square).unwrap();
        let recomputed = Polyhedron::builder(&square)
            .options(PolyhedronOptions {
                graphs: GraphSource::Recompute,
            })
            .build()
            .unwrap();
        assert_eq!(engine.dual(), recomputed.dual());
        assert_eq!(engine.graphs(), recomputed.graphs());
        assert_eq!(engine.source_incidence().family_size(), 6);
        // The redundant row and the artificial row touch no vertex.
        assert!(engine.source_adjacency().sets()[4].is_empty());
        assert!(engine.source_adjacency().sets()[5].is_empty());
    }
}
