//! Double description conversion between halfspace and generator representations of convex
//! polyhedra, with canonicalization and the adjacency/incidence graphs of the result.

pub mod any;
pub mod canonicalize;
pub mod cdd;
pub mod dd;
pub mod error;
pub mod graph;
pub mod linalg;
pub mod matrix;
pub mod num;
pub mod polyhedron;
pub mod prelude;

pub use error::{ErrorKind, PolyhedraError, Result};
