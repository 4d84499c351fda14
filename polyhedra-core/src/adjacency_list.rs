use std::collections::VecDeque;

use crate::set_family::{ListFamily, SetFamily};

/// Undirected graph stored as sorted neighbor lists.
///
/// Vertices are 0-based indices.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct AdjacencyList {
    inner: ListFamily,
}

impl AdjacencyList {
    pub fn empty() -> Self {
        Self {
            inner: ListFamily::from_sorted_sets(Vec::new(), 0),
        }
    }

    pub fn from_unsorted_adjacency_lists(adjacency: Vec<Vec<usize>>) -> Self {
        let universe = adjacency.len();
        Self {
            inner: ListFamily::new(adjacency, universe),
        }
    }

    pub fn from_sorted_adjacency_lists(adjacency: Vec<Vec<usize>>) -> Self {
        let universe = adjacency.len();
        Self {
            inner: ListFamily::from_sorted_sets(adjacency, universe),
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.inner.len()
    }

    pub fn degree(&self, v: usize) -> usize {
        self.neighbors(v).len()
    }

    /// # Panics
    ///
    /// Panics if `v` is not a vertex.
    pub fn neighbors(&self, v: usize) -> &[usize] {
        match self.inner.set(v) {
            Some(list) => list,
            None => panic!(
                "vertex index out of range (vertex={v}, size={})",
                self.num_vertices()
            ),
        }
    }

    pub fn contains(&self, v: usize, neighbor: usize) -> bool {
        self.neighbors(v).binary_search(&neighbor).is_ok()
    }

    pub fn adjacency_lists(&self) -> &[Vec<usize>] {
        self.inner.sets()
    }

    /// Each undirected edge once, as `(low, high)`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency_lists()
            .iter()
            .enumerate()
            .flat_map(|(v, list)| list.iter().filter(move |&&n| n > v).map(move |&n| (v, n)))
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    pub fn is_symmetric(&self) -> bool {
        self.adjacency_lists().iter().enumerate().all(|(v, list)| {
            list.iter()
                .all(|&n| n < self.num_vertices() && self.contains(n, v))
        })
    }

    /// Shortest path length between two vertices, or `None` if they are disconnected.
    ///
    /// # Panics
    ///
    /// Panics if `start` or `goal` are out of bounds.
    pub fn distance(&self, start: usize, goal: usize) -> Option<usize> {
        let n = self.num_vertices();
        assert!(
            start < n && goal < n,
            "graph indices out of range (start={start}, goal={goal}, size={n})"
        );
        self.levels_from(start)[goal]
    }

    /// Largest finite distance, or `None` when the graph is disconnected.
    pub fn diameter(&self) -> Option<usize> {
        let mut best = 0usize;
        for start in 0..self.num_vertices() {
            for level in self.levels_from(start) {
                best = best.max(level?);
            }
        }
        Some(best)
    }

    fn levels_from(&self, start: usize) -> Vec<Option<usize>> {
        let mut levels = vec![None; self.num_vertices()];
        let mut queue = VecDeque::from([start]);
        levels[start] = Some(0);
        while let Some(v) = queue.pop_front() {
            let next = levels[v].map_or(0, |l| l + 1);
            for &n in self.neighbors(v) {
                if levels[n].is_none() {
                    levels[n] = Some(next);
                    queue.push_back(n);
                }
            }
        }
        levels
    }
}

impl From<&SetFamily> for AdjacencyList {
    fn from(family: &SetFamily) -> Self {
        Self::from_sorted_adjacency_lists(family.to_index_lists())
    }
}

#[cfg(test)]
mod tests {
    use super::AdjacencyList;

    #[test]
    fn edges_are_listed_once() {
        let graph = AdjacencyList::from_unsorted_adjacency_lists(vec![
            vec![3, 1],
            vec![0, 2],
            vec![1, 3],
            vec![2, 0],
        ]);
        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges, vec![(0, 1), (0, 3), (1, 2), (2, 3)]);
        assert_eq!(graph.edge_count(), 4);
        assert!(graph.is_symmetric());
    }

    #[test]
    fn disconnected_graph_has_no_diameter() {
        let graph =
            AdjacencyList::from_sorted_adjacency_lists(vec![vec![1], vec![0], vec![3], vec![2]]);
        assert_eq!(graph.distance(0, 2), None);
        assert_eq!(graph.diameter(), None);
        assert_eq!(AdjacencyList::empty().diameter(), Some(0));
    }

    #[test]
    fn one_sided_edges_are_not_symmetric() {
        let graph = AdjacencyList::from_sorted_adjacency_lists(vec![vec![1], vec![]]);
        assert!(!graph.is_symmetric());
    }
}
