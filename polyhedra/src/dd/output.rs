use polyhedra_core::set_family::SetFamily;
use polyhedra_core::types::{ComputationStatus, RepresentationKind, RowSet};

use crate::dd::ray::RayId;
use crate::dd::state::ConeOutput;
use crate::matrix::LpMatrix;
use crate::num::{Epsilon, Num};

/// Where a row of the dual matrix came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DualRow {
    /// Index into the engine's lines.
    Line(usize),
    Ray(RayId),
}

/// The dual matrix together with the engine object behind each of its rows.
#[derive(Clone, Debug)]
pub struct DualRows<N: Num> {
    pub matrix: LpMatrix<N>,
    pub sources: Vec<DualRow>,
    pub status: ComputationStatus,
}

impl<N: Num> ConeOutput<N> {
    /// Assembles the dual matrix: lines first as linear rows, then rays in creation order.
    ///
    /// For H input each ray with a positive first coordinate is scaled to a vertex `(1, x)`.
    /// When no such ray exists the region is empty and the dual has no rows.
    pub fn dual_rows(&self) -> DualRows<N> {
        let cols = self.col_count();
        let eps = &self.cone.eps;
        let dual_kind = self.cone.source_kind.dual();
        let mut status = self.comp_status;

        let from_h = self.cone.source_kind == RepresentationKind::Inequality;
        if from_h
            && !self
                .rays()
                .any(|ray| ray.vector.first().is_some_and(|t| eps.is_positive(t)))
        {
            return DualRows {
                matrix: LpMatrix::builder(cols).representation(dual_kind).build(),
                sources: Vec::new(),
                status: ComputationStatus::RegionEmpty,
            };
        }

        let mut builder = LpMatrix::builder(cols).representation(dual_kind);
        let mut sources = Vec::with_capacity(self.lines.len() + self.ray_count());
        for (idx, line) in self.lines.iter().enumerate() {
            builder = builder.push_row(line, true);
            sources.push(DualRow::Line(idx));
        }
        for &id in self.ray_ids() {
            let Some(ray) = self.ray(id) else {
                continue;
            };
            match ray.vector.first() {
                Some(t) if from_h && eps.is_positive(t) => {
                    let scaled: Vec<N> = std::iter::once(N::one())
                        .chain(ray.vector[1..].iter().map(|v| v.ref_div(t)))
                        .collect();
                    builder = builder.push_row(scaled, false);
                }
                _ => builder = builder.push_row(&ray.vector, false),
            }
            sources.push(DualRow::Ray(id));
        }
        if status == ComputationStatus::InProgress {
            status = ComputationStatus::AllFound;
        }
        DualRows {
            matrix: builder.build(),
            sources,
            status,
        }
    }

    /// For each dual row, the cone rows it lies on. Lines lie on every row.
    pub fn dual_incidence(&self, dual: &DualRows<N>) -> SetFamily {
        let capacity = self.row_count();
        let sets = dual
            .sources
            .iter()
            .map(|source| match source {
                DualRow::Line(_) => RowSet::full(capacity),
                DualRow::Ray(id) => self
                    .ray(*id)
                    .map_or_else(|| RowSet::new(capacity), |ray| ray.zero_set.clone()),
            })
            .collect();
        SetFamily::from_sets(capacity, sets)
    }

    /// Adjacency among the dual rows by the engine's adjacency test. Linear rows are isolated.
    pub fn dual_adjacency(&mut self, dual: &DualRows<N>) -> SetFamily {
        let size = dual.sources.len();
        let mut builder = SetFamily::builder(size, size);
        let candidates = self.ray_ids().to_vec();
        for i in 0..size {
            let DualRow::Ray(a) = dual.sources[i] else {
                continue;
            };
            for j in (i + 1)..size {
                let DualRow::Ray(b) = dual.sources[j] else {
                    continue;
                };
                if self.state.check_adjacency(a, b, &candidates) {
                    builder.insert_into_set(i, j.into());
                    builder.insert_into_set(j, i.into());
                }
            }
        }
        builder.build()
    }
}
