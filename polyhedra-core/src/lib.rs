//! Index-level building blocks shared by the polyhedral engine: row bitsets, dense row
//! storage, set families and the graphs derived from incidence.

pub mod adjacency;
pub mod adjacency_list;
pub mod matrix;
pub mod set_family;
pub mod types;

pub use adjacency::{AdjacencyBuilder, AdjacencyListBuilder, Graph};
pub use adjacency_list::AdjacencyList;
pub use matrix::Matrix;
pub use set_family::{IncidenceClasses, ListFamily, SetFamily, SetFamilyBuilder};
pub use types::{
    Col, ComputationStatus, RepresentationKind, Row, RowId, RowIndex, RowSet,
    UnknownRepresentation,
};
