//! DD (Double Description) core engine.
//!
//! The engine works on a homogenized cone: every source row becomes a constraint
//! `row · y >= 0` (or `= 0` for linearity rows), optionally followed by one artificial row.
//! It enumerates the lines and extreme rays of that cone one constraint at a time.

use std::fmt;
use std::str::FromStr;

use crate::error::PolyhedraError;

mod basis;
mod builder;
mod engine;
mod index;
mod output;
mod ray;
mod state;

pub use builder::Cone;
pub use output::{DualRow, DualRows};
pub use ray::{Ray, RayId};
pub use state::{ConeBasisPrep, ConeDd, ConeEngine, ConeOutput};

/// How two rays are judged adjacent before combining them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum AdjacencyTest {
    /// The processed rows tight on both rays have rank `dim - 2`.
    #[default]
    Algebraic,
    /// No third ray is tight on every processed row the pair shares.
    Combinatorial,
}

/// Order in which the non-basis rows are added.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum HalfspaceOrder {
    #[default]
    MinIndex,
    MaxIndex,
    /// Lexicographically smallest row first, ties by index.
    LexMin,
}

impl FromStr for AdjacencyTest {
    type Err = PolyhedraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "algebraic" | "rank" => Ok(AdjacencyTest::Algebraic),
            "combinatorial" => Ok(AdjacencyTest::Combinatorial),
            _ => Err(PolyhedraError::InvalidArgument {
                context: "unknown adjacency test",
            }),
        }
    }
}

impl FromStr for HalfspaceOrder {
    type Err = PolyhedraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "minindex" => Ok(HalfspaceOrder::MinIndex),
            "maxindex" => Ok(HalfspaceOrder::MaxIndex),
            "lexmin" => Ok(HalfspaceOrder::LexMin),
            _ => Err(PolyhedraError::InvalidArgument {
                context: "unknown halfspace order",
            }),
        }
    }
}

impl fmt::Display for HalfspaceOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HalfspaceOrder::MinIndex => "minindex",
            HalfspaceOrder::MaxIndex => "maxindex",
            HalfspaceOrder::LexMin => "lexmin",
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ConeOptions {
    adjacency_test: AdjacencyTest,
    halfspace_order: HalfspaceOrder,
}

impl ConeOptions {
    pub fn builder() -> ConeOptionsBuilder {
        ConeOptionsBuilder::default()
    }

    pub fn adjacency_test(&self) -> AdjacencyTest {
        self.adjacency_test
    }

    pub fn halfspace_order(&self) -> HalfspaceOrder {
        self.halfspace_order
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConeOptionsBuilder {
    options: ConeOptions,
}

impl ConeOptionsBuilder {
    pub fn adjacency_test(mut self, test: AdjacencyTest) -> Self {
        self.options.adjacency_test = test;
        self
    }

    pub fn halfspace_order(mut self, order: HalfspaceOrder) -> Self {
        self.options.halfspace_order = order;
        self
    }

    pub fn finish(self) -> ConeOptions {
        self.options
    }
}
