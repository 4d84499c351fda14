use std::fmt;

use polyhedra_core::types::RowSet;

/// Stable handle of a ray slot in the engine arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RayId(pub(crate) usize);

impl RayId {
    #[inline(always)]
    pub fn as_index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// An extreme ray together with the cone rows it is tight on.
#[derive(Clone, Debug)]
pub struct Ray<N> {
    pub(crate) vector: Vec<N>,
    pub(crate) zero_set: RowSet,
    pub(crate) zero_count: usize,
    pub(crate) signature: u64,
}

impl<N> Ray<N> {
    pub fn vector(&self) -> &[N] {
        &self.vector
    }

    pub fn zero_set(&self) -> &RowSet {
        &self.zero_set
    }

    pub fn zero_count(&self) -> usize {
        self.zero_count
    }
}

/// Arena of rays. Freed slots are recycled, so an id is only meaningful while its ray is active.
#[derive(Clone, Debug)]
pub(crate) struct RayGraph<N> {
    slots: Vec<Option<Ray<N>>>,
    free: Vec<usize>,
    active: Vec<RayId>,
}

impl<N> Default for RayGraph<N> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            active: Vec::new(),
        }
    }
}

impl<N> RayGraph<N> {
    pub(crate) fn insert_active(&mut self, ray: Ray<N>) -> RayId {
        let id = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(ray);
                RayId(slot)
            }
            None => {
                self.slots.push(Some(ray));
                RayId(self.slots.len() - 1)
            }
        };
        self.active.push(id);
        id
    }

    #[inline]
    pub(crate) fn ray_data(&self, id: RayId) -> Option<&Ray<N>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Active ids in insertion order.
    #[inline]
    pub(crate) fn active_ids(&self) -> &[RayId] {
        &self.active
    }

    #[inline]
    pub(crate) fn active_len(&self) -> usize {
        self.active.len()
    }

    pub(crate) fn active_rays(&self) -> impl Iterator<Item = &Ray<N>> {
        self.active.iter().filter_map(|&id| self.ray_data(id))
    }

    /// Removes the listed rays, returning them in the order given.
    pub(crate) fn remove_many(&mut self, ids: &[RayId]) -> Vec<Ray<N>> {
        let mut removed = Vec::with_capacity(ids.len());
        let mut dead = vec![false; self.slots.len()];
        for &id in ids {
            if let Some(ray) = self.slots.get_mut(id.0).and_then(Option::take) {
                dead[id.0] = true;
                self.free.push(id.0);
                removed.push(ray);
            }
        }
        self.active.retain(|id| !dead[id.0]);
        removed
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{Ray, RayGraph, RayId};
    use polyhedra_core::types::RowSet;

    fn ray(v: i32) -> Ray<i32> {
        Ray {
            vector: vec![v],
            zero_set: RowSet::new(1),
            zero_count: 0,
            signature: 0,
        }
    }

    #[test]
    fn removal_keeps_insertion_order_and_ids() {
        let mut graph = RayGraph::default();
        let a = graph.insert_active(ray(1));
        let b = graph.insert_active(ray(2));
        let c = graph.insert_active(ray(3));
        let removed = graph.remove_many(&[b]);
        assert_eq!(removed.len(), 1);
        assert_eq!(graph.active_ids(), &[a, c]);
        assert!(graph.ray_data(b).is_none());
        let d = graph.insert_active(ray(4));
        assert_eq!(d, RayId(1));
        assert_eq!(graph.active_ids(), &[a, c, d]);
        let values: Vec<i32> = graph.active_rays().map(|r| r.vector[0]).collect();
        assert_eq!(values, vec![1, 3, 4]);
    }

    #[test]
    fn freed_slots_are_recycled() {
        let mut graph = RayGraph::default();
        let mut ids: Vec<RayId> = (0..4).map(|v| graph.insert_active(ray(v))).collect();
        for round in 0..50 {
            let removed = graph.remove_many(&ids[..2]);
            assert_eq!(removed.len(), 2);
            ids.drain(..2);
            ids.push(graph.insert_active(ray(round)));
            ids.push(graph.insert_active(ray(round + 1)));
            assert_eq!(graph.active_len(), 4);
            assert_eq!(graph.slots.len(), 4);
        }
        assert!(ids.iter().all(|&id| graph.ray_data(id).is_some()));

        graph.clear();
        assert!(graph.slots.is_empty());
        assert_eq!(graph.insert_active(ray(9)), RayId(0));
    }
}
