use polyhedra_core::types::{ComputationStatus, Row, RowSet};
use tracing::{debug, trace, warn};

use crate::dd::AdjacencyTest;
use crate::dd::ray::{Ray, RayId};
use crate::dd::state::{ConeDd, ConeEngine, ConeOutput};
use crate::error::Result;
use crate::linalg;
use crate::num::{Epsilon, Num};

/// Active rays split by the sign they take on the entering row.
#[derive(Clone, Debug)]
pub(crate) struct RayPartition<N> {
    pub(crate) negative: Vec<(RayId, N)>,
    pub(crate) positive: Vec<(RayId, N)>,
    pub(crate) zero: Vec<RayId>,
}

impl<N: Num> ConeDd<N> {
    pub fn run_to_completion(mut self) -> Result<ConeOutput<N>> {
        while self.state.comp_status == ComputationStatus::InProgress {
            let cursor = self.state.iter_state.cursor;
            let Some(&row) = self.state.iter_state.pending.get(cursor) else {
                self.state.comp_status = ComputationStatus::AllFound;
                break;
            };
            self.state.iter_state.cursor += 1;
            self.state.add_halfspace(row);
        }
        debug!(
            status = ?self.state.comp_status,
            rays = self.state.ray_count(),
            lines = self.state.lines.len(),
            iterations = self.state.iter_state.iteration,
            initial = self.state.initial_halfspaces.cardinality(),
            redundant = self.state.redundant_halfspaces.cardinality(),
            intersections = self.state.count_intersections,
            dedup_drops = self.state.dedup_drops,
            "double description finished"
        );
        Ok(ConeOutput { state: self.state })
    }
}

impl<N: Num> ConeEngine<N> {
    pub(crate) fn evaluate_row_partition(&self, row: Row) -> RayPartition<N> {
        let eps = &self.cone.eps;
        let coeffs = &self.cone.rows[row];
        let mut partition = RayPartition {
            negative: Vec::new(),
            positive: Vec::new(),
            zero: Vec::new(),
        };
        for &id in self.ray_graph.active_ids() {
            let Some(ray) = self.ray_graph.ray_data(id) else {
                continue;
            };
            let value = linalg::dot(coeffs, &ray.vector);
            if eps.is_negative(&value) {
                partition.negative.push((id, value));
            } else if eps.is_positive(&value) {
                partition.positive.push((id, value));
            } else {
                partition.zero.push(id);
            }
        }
        partition
    }

    /// Intersects the current cone with the halfspace of `row`.
    pub(crate) fn add_halfspace(&mut self, row: Row) {
        self.iter_state.iteration += 1;
        let partition = self.evaluate_row_partition(row);
        trace!(
            iteration = self.iter_state.iteration,
            row,
            negative = partition.negative.len(),
            positive = partition.positive.len(),
            zero = partition.zero.len(),
            "adding halfspace"
        );

        if partition.negative.is_empty() {
            self.redundant_halfspaces.insert(row);
            self.added_halfspaces.insert(row);
            return;
        }
        if partition.positive.is_empty() && partition.zero.is_empty() {
            debug!(row, "halfspace excludes every ray; region is empty");
            self.ray_graph.clear();
            self.ray_index.clear();
            self.added_halfspaces.insert(row);
            self.comp_status = ComputationStatus::RegionEmpty;
            return;
        }

        let candidates = self.ray_graph.active_ids().to_vec();
        for (pos, pos_value) in &partition.positive {
            for (neg, neg_value) in &partition.negative {
                if !self.check_adjacency(*neg, *pos, &candidates) {
                    continue;
                }
                self.create_new_ray((*neg, neg_value), (*pos, pos_value), row);
            }
        }

        let negative: Vec<RayId> = partition.negative.iter().map(|(id, _)| *id).collect();
        for &id in &negative {
            if let Some(ray) = self.ray_graph.ray_data(id) {
                self.ray_index.unregister(id, ray.signature);
            }
        }
        self.ray_graph.remove_many(&negative);
        self.added_halfspaces.insert(row);
    }

    fn adjacency_dimension(&self) -> usize {
        self.iter_state.rank
    }

    /// Whether `r1` and `r2` span a two-dimensional face of the current cone.
    ///
    /// Only processed rows count towards the common face. `candidates` are the rays tested
    /// against the face under [`AdjacencyTest::Combinatorial`].
    pub(crate) fn check_adjacency(&mut self, r1: RayId, r2: RayId, candidates: &[RayId]) -> bool {
        if r1 == r2 {
            return false;
        }
        let (Some(ray1), Some(ray2)) = (self.ray_graph.ray_data(r1), self.ray_graph.ray_data(r2))
        else {
            return false;
        };
        let required = self.adjacency_dimension().saturating_sub(2);
        if ray1.zero_count.min(ray2.zero_count) < required {
            return false;
        }

        let face = &mut self.adj_face;
        face.copy_from(&ray1.zero_set);
        face.intersection_inplace(&ray2.zero_set);
        face.intersection_inplace(&self.added_halfspaces);
        if face.cardinality() < required {
            return false;
        }

        match self.cone.options.adjacency_test() {
            AdjacencyTest::Algebraic => {
                let rows = face.iter().raw().map(|row| &self.cone.rows[row]);
                linalg::rank(self.cone.col_count(), rows, &self.cone.eps) == required
            }
            AdjacencyTest::Combinatorial => !candidates.iter().any(|&other| {
                other != r1
                    && other != r2
                    && self
                        .ray_graph
                        .ray_data(other)
                        .is_some_and(|ray| face.subset_of(&ray.zero_set))
            }),
        }
    }

    /// Combines an infeasible and a feasible ray into one lying on `row`.
    pub(crate) fn create_new_ray(
        &mut self,
        (neg, neg_value): (RayId, &N),
        (pos, pos_value): (RayId, &N),
        row: Row,
    ) -> Option<RayId> {
        self.count_intersections += 1;
        let (ray_neg, ray_pos) = (self.ray_graph.ray_data(neg)?, self.ray_graph.ray_data(pos)?);
        let mut vector = Vec::with_capacity(ray_neg.vector.len());
        linalg::lin_comb2_into(
            &mut vector,
            &ray_neg.vector,
            &pos_value.abs(),
            &ray_pos.vector,
            &neg_value.abs(),
        );
        N::normalize_direction(&mut vector, &self.cone.eps);
        if linalg::is_zero_vector(&vector, &self.cone.eps) {
            warn!(%neg, %pos, row, "combined ray vanished under tolerance; skipped");
            return None;
        }
        let mut zero_set = self.cone.zero_set(&vector);
        zero_set.insert(row);
        self.insert_ray(vector, zero_set)
    }

    /// Registers a new active ray unless an equal one is already active.
    pub(crate) fn insert_ray(&mut self, vector: Vec<N>, zero_set: RowSet) -> Option<RayId> {
        let signature = self.ray_index.signature(&zero_set);
        let duplicate = self.ray_index.candidates(signature).iter().any(|&id| {
            self.ray_graph.ray_data(id).is_some_and(|ray| {
                ray.zero_set == zero_set
                    && linalg::vectors_equal(&ray.vector, &vector, &self.cone.eps)
            })
        });
        if duplicate {
            self.dedup_drops += 1;
            warn!(drops = self.dedup_drops, "duplicate ray discarded");
            return None;
        }
        let zero_count = zero_set.cardinality();
        let id = self.ray_graph.insert_active(Ray {
            vector,
            zero_set,
            zero_count,
            signature,
        });
        self.ray_index.register(id, signature);
        Some(id)
    }
}
