use std::ops::{Deref, DerefMut};

use polyhedra_core::types::{Col, ComputationStatus, Row, RowSet};

use crate::dd::builder::Cone;
use crate::dd::index::RayZeroSetIndex;
use crate::dd::ray::{Ray, RayGraph, RayId};
use crate::dd::{ConeOptions, HalfspaceOrder};
use crate::num::Num;

#[derive(Clone, Debug)]
pub(crate) struct IterationState {
    pub(crate) iteration: usize,
    pub(crate) rank: usize,
    pub(crate) pending: Vec<Row>,
    pub(crate) cursor: usize,
}

#[derive(Clone, Debug)]
pub struct ConeEngine<N: Num> {
    pub(crate) cone: Cone<N>,
    pub(crate) added_halfspaces: RowSet,
    pub(crate) initial_halfspaces: RowSet,
    pub(crate) redundant_halfspaces: RowSet,
    pub(crate) lines: Vec<Vec<N>>,
    pub(crate) ray_graph: RayGraph<N>,
    pub(crate) ray_index: RayZeroSetIndex,
    pub(crate) iter_state: IterationState,
    pub(crate) comp_status: ComputationStatus,
    pub(crate) adj_face: RowSet,
    pub(crate) count_intersections: u64,
    pub(crate) dedup_drops: u64,
}

/// Engine before the initial basis is chosen.
#[derive(Clone, Debug)]
pub struct ConeBasisPrep<N: Num> {
    pub(crate) state: ConeEngine<N>,
}

/// Engine with an initial simplicial cone, ready to add the remaining rows.
#[derive(Clone, Debug)]
pub struct ConeDd<N: Num> {
    pub(crate) state: ConeEngine<N>,
}

/// Engine after every row has been processed (or the region collapsed).
#[derive(Clone, Debug)]
pub struct ConeOutput<N: Num> {
    pub(crate) state: ConeEngine<N>,
}

impl<N: Num> ConeEngine<N> {
    pub(crate) fn new(cone: Cone<N>) -> Self {
        let m = cone.row_count();
        Self {
            cone,
            added_halfspaces: RowSet::new(m),
            initial_halfspaces: RowSet::new(m),
            redundant_halfspaces: RowSet::new(m),
            lines: Vec::new(),
            ray_graph: RayGraph::default(),
            ray_index: RayZeroSetIndex::default(),
            iter_state: IterationState {
                iteration: 0,
                rank: 0,
                pending: Vec::new(),
                cursor: 0,
            },
            comp_status: ComputationStatus::InProgress,
            adj_face: RowSet::new(m),
            count_intersections: 0,
            dedup_drops: 0,
        }
    }

    pub fn cone(&self) -> &Cone<N> {
        &self.cone
    }

    pub fn options(&self) -> &ConeOptions {
        &self.cone.options
    }

    pub fn halfspace_order(&self) -> HalfspaceOrder {
        self.cone.options.halfspace_order()
    }

    pub fn added_halfspaces(&self) -> &RowSet {
        &self.added_halfspaces
    }

    /// Rows of the initial basis.
    pub fn initial_halfspaces(&self) -> &RowSet {
        &self.initial_halfspaces
    }

    /// Rows that no active ray violated when they were added.
    pub fn redundant_halfspaces(&self) -> &RowSet {
        &self.redundant_halfspaces
    }

    pub fn iteration(&self) -> usize {
        self.iter_state.iteration
    }

    /// Rank of the cone rows, i.e. the dimension of the space modulo lines.
    pub fn rank(&self) -> usize {
        self.iter_state.rank
    }

    pub fn lines(&self) -> &[Vec<N>] {
        &self.lines
    }

    pub fn rays(&self) -> impl Iterator<Item = &Ray<N>> {
        self.ray_graph.active_rays()
    }

    pub fn ray(&self, id: RayId) -> Option<&Ray<N>> {
        self.ray_graph.ray_data(id)
    }

    pub fn ray_ids(&self) -> &[RayId] {
        self.ray_graph.active_ids()
    }

    pub fn ray_count(&self) -> usize {
        self.ray_graph.active_len()
    }

    pub fn status(&self) -> ComputationStatus {
        self.comp_status
    }

    pub fn row_count(&self) -> Row {
        self.cone.row_count()
    }

    pub fn col_count(&self) -> Col {
        self.cone.col_count()
    }

    pub fn dedup_drops(&self) -> u64 {
        self.dedup_drops
    }

    pub fn intersections(&self) -> u64 {
        self.count_intersections
    }
}

impl<N: Num> ConeBasisPrep<N> {
    pub(crate) fn new(state: ConeEngine<N>) -> Self {
        Self { state }
    }
}

impl<N: Num> ConeOutput<N> {
    pub fn into_engine(self) -> ConeEngine<N> {
        self.state
    }
}

impl<N: Num> Deref for ConeBasisPrep<N> {
    type Target = ConeEngine<N>;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl<N: Num> Deref for ConeDd<N> {
    type Target = ConeEngine<N>;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl<N: Num> Deref for ConeOutput<N> {
    type Target = ConeEngine<N>;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl<N: Num> DerefMut for ConeBasisPrep<N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.state
    }
}

impl<N: Num> DerefMut for ConeDd<N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.state
    }
}

impl<N: Num> DerefMut for ConeOutput<N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.state
    }
}
