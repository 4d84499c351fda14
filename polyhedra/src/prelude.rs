pub use crate::any::{AnyMatrix, AnyPolyhedron, AnyRow};
pub use crate::canonicalize::CanonicalizationResult;
pub use crate::dd::{AdjacencyTest, ConeOptions, ConeOptionsBuilder, HalfspaceOrder};
pub use crate::error::{ErrorKind, PolyhedraError};
pub use crate::graph::PolyhedronGraphs;
pub use crate::matrix::{LpMatrix, LpMatrixBuilder, LpObjective, RowSlice};
pub use crate::num::{Epsilon, ExactEps, F64Eps, Literal, Num, NumberKind, NumberKindHolder, Rat};
pub use crate::polyhedron::{GraphSource, Polyhedron, PolyhedronBuilder, PolyhedronOptions};
pub use polyhedra_core::{
    AdjacencyList, ComputationStatus, RepresentationKind, Row, RowIndex, RowSet, SetFamily,
};
