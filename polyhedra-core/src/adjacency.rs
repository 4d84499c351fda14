use ahash::AHashMap;
use smallvec::SmallVec;

use crate::adjacency_list::AdjacencyList;
use crate::set_family::{IncidenceClasses, SetFamily, SetFamilyBuilder};
use crate::types::RowId;

type RidgeKey = SmallVec<[usize; 16]>;

/// Read-only view of an undirected adjacency structure.
pub trait Graph {
    fn node_count(&self) -> usize;
    fn degree(&self, node: usize) -> usize;
    fn contains(&self, node: usize, neighbor: usize) -> bool;
    fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_;
}

/// A sink for undirected edges.
///
/// The incidence-based builders write into either an edge-list graph (`AdjacencyList`) or a
/// bitset family (`SetFamily`) without converting afterwards.
pub trait AdjacencyBuilder {
    type Output;

    fn new(node_count: usize) -> Self;
    fn add_undirected_edge(&mut self, a: usize, b: usize);
    fn finish(self) -> Self::Output;
}

#[derive(Clone, Debug)]
pub struct AdjacencyListBuilder {
    adjacency: Vec<Vec<usize>>,
}

impl AdjacencyBuilder for AdjacencyListBuilder {
    type Output = AdjacencyList;

    fn new(node_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); node_count],
        }
    }

    fn add_undirected_edge(&mut self, a: usize, b: usize) {
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
    }

    fn finish(self) -> AdjacencyList {
        AdjacencyList::from_unsorted_adjacency_lists(self.adjacency)
    }
}

impl AdjacencyBuilder for SetFamilyBuilder {
    type Output = SetFamily;

    fn new(node_count: usize) -> Self {
        SetFamily::builder(node_count, node_count)
    }

    fn add_undirected_edge(&mut self, a: usize, b: usize) {
        self.insert_into_set(a, RowId::new(b));
        self.insert_into_set(b, RowId::new(a));
    }

    fn finish(self) -> SetFamily {
        self.build()
    }
}

impl Graph for AdjacencyList {
    fn node_count(&self) -> usize {
        self.num_vertices()
    }

    fn degree(&self, node: usize) -> usize {
        AdjacencyList::degree(self, node)
    }

    fn contains(&self, node: usize, neighbor: usize) -> bool {
        AdjacencyList::contains(self, node, neighbor)
    }

    fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        AdjacencyList::neighbors(self, node).iter().copied()
    }
}

impl Graph for SetFamily {
    fn node_count(&self) -> usize {
        self.family_size()
    }

    fn degree(&self, node: usize) -> usize {
        self.sets()[node].cardinality()
    }

    fn contains(&self, node: usize, neighbor: usize) -> bool {
        self.sets()[node].contains(neighbor)
    }

    fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.sets()[node].iter().raw()
    }
}

/// For each universe row, the sorted list of nodes whose incidence contains it.
#[derive(Clone, Debug)]
struct RowMembership {
    offsets: Vec<usize>,
    members: Vec<usize>,
}

impl RowMembership {
    fn new(rows_by_node: &[Vec<usize>], row_capacity: usize) -> Self {
        let mut offsets = vec![0usize; row_capacity + 1];
        for rows in rows_by_node {
            for &row in rows {
                offsets[row + 1] += 1;
            }
        }
        for row in 0..row_capacity {
            offsets[row + 1] += offsets[row];
        }
        let mut cursor = offsets.clone();
        let mut members = vec![0usize; offsets[row_capacity]];
        for (node, rows) in rows_by_node.iter().enumerate() {
            for &row in rows {
                members[cursor[row]] = node;
                cursor[row] += 1;
            }
        }
        Self { offsets, members }
    }

    fn nodes_of(&self, row: usize) -> &[usize] {
        &self.members[self.offsets[row]..self.offsets[row + 1]]
    }

    fn row_has(&self, row: usize, node: usize) -> bool {
        self.nodes_of(row).binary_search(&node).is_ok()
    }

    /// Whether some node other than `a` and `b` is incident to every row of `face`.
    fn third_node_covers(&self, face: &[usize], a: usize, b: usize, active_nodes: usize) -> bool {
        let Some(&pivot) = face.iter().min_by_key(|&&row| self.nodes_of(row).len()) else {
            // The empty face lies in every node.
            return active_nodes > 2;
        };
        self.nodes_of(pivot).iter().any(|&node| {
            node != a
                && node != b
                && face
                    .iter()
                    .all(|&row| row == pivot || self.row_has(row, node))
        })
    }
}

fn intersect_sorted(a: &[usize], b: &[usize], out: &mut Vec<usize>) {
    out.clear();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
}

/// Ridge adjacency from per-node incidence sets.
///
/// Nodes `i` and `j` are adjacent when `face = S[i] ∩ S[j]` has at least `adj_dim - 2` rows and
/// no third active node contains `face`. `adj_dim` is the dimension of the homogenized cone.
/// Nodes flagged in `excluded` get no edges.
pub fn adjacency_from_incidence_with<S: AdjacencyBuilder>(
    incidence: &SetFamily,
    adj_dim: usize,
    excluded: &[bool],
) -> S::Output {
    let size = incidence.family_size();
    assert_eq!(
        excluded.len(),
        size,
        "excluded mask length mismatch (excluded={} family_size={size})",
        excluded.len()
    );
    let rows_by_node: Vec<Vec<usize>> = incidence
        .sets()
        .iter()
        .zip(excluded)
        .map(|(set, &skip)| if skip { Vec::new() } else { set.to_indices() })
        .collect();
    let mut sink = S::new(size);
    add_ridge_edges(
        &mut sink,
        &rows_by_node,
        incidence.set_capacity(),
        adj_dim,
        excluded,
    );
    sink.finish()
}

pub fn adjacency_from_incidence(
    incidence: &SetFamily,
    adj_dim: usize,
    excluded: &[bool],
) -> SetFamily {
    adjacency_from_incidence_with::<SetFamilyBuilder>(incidence, adj_dim, excluded)
}

/// Adjacency among input rows given their incidence against the output rows.
///
/// Redundant rows are isolated. Dominant rows (incident to everything) touch every other
/// non-redundant row.
pub fn input_adjacency_from_incidence(
    incidence: &SetFamily,
    classes: &IncidenceClasses,
) -> SetFamily {
    let size = incidence.family_size();
    assert_eq!(
        classes.redundant.len(),
        size,
        "redundant set length mismatch (redundant={} family_size={size})",
        classes.redundant.len()
    );
    let excluded: Vec<bool> = (0..size)
        .map(|i| classes.redundant.contains(i) || classes.dominant.contains(i))
        .collect();
    let rows_by_node: Vec<Vec<usize>> = incidence
        .sets()
        .iter()
        .zip(&excluded)
        .map(|(set, &skip)| if skip { Vec::new() } else { set.to_indices() })
        .collect();

    let mut sink = <SetFamilyBuilder as AdjacencyBuilder>::new(size);
    // Only the containment test matters for input rows: any shared output row suffices.
    add_ridge_edges(
        &mut sink,
        &rows_by_node,
        incidence.set_capacity(),
        3,
        &excluded,
    );

    let active: Vec<usize> = (0..size).filter(|&i| !excluded[i]).collect();
    if let [a, b] = active[..] {
        sink.add_undirected_edge(a, b);
    }

    for dom in classes.dominant.iter().raw() {
        if classes.redundant.contains(dom) {
            continue;
        }
        for other in (0..size).filter(|&o| o != dom && !classes.redundant.contains(o)) {
            sink.add_undirected_edge(dom, other);
        }
    }
    sink.finish()
}

fn add_ridge_edges<S: AdjacencyBuilder>(
    sink: &mut S,
    rows_by_node: &[Vec<usize>],
    row_capacity: usize,
    adj_dim: usize,
    excluded: &[bool],
) {
    let size = rows_by_node.len();
    let active_nodes = excluded.iter().filter(|&&e| !e).count();
    if active_nodes < 2 {
        return;
    }
    let required = adj_dim.saturating_sub(2);

    if required == 0 {
        // Overlap counting cannot see empty faces; with two nodes they are adjacent.
        if active_nodes == 2 {
            let mut it = (0..size).filter(|&i| !excluded[i]);
            if let (Some(a), Some(b)) = (it.next(), it.next()) {
                sink.add_undirected_edge(a, b);
            }
        }
        return;
    }

    let facet_len = required + 1;
    let membership = RowMembership::new(rows_by_node, row_capacity);
    let mut face: Vec<usize> = Vec::new();
    for (a, b) in simplicial_ridge_pairs(rows_by_node, facet_len, excluded) {
        intersect_sorted(&rows_by_node[a], &rows_by_node[b], &mut face);
        if !membership.third_node_covers(&face, a, b, active_nodes) {
            sink.add_undirected_edge(a, b);
        }
    }

    let mut counts = vec![0usize; size];
    let mut touched: Vec<usize> = Vec::new();
    for i in 0..size {
        if excluded[i] {
            continue;
        }
        let i_simplicial = rows_by_node[i].len() == facet_len;
        touched.clear();
        for &row in &rows_by_node[i] {
            for &j in membership.nodes_of(row) {
                if counts[j] == 0 {
                    touched.push(j);
                }
                counts[j] += 1;
            }
        }
        for &j in &touched {
            let j_simplicial = rows_by_node[j].len() == facet_len;
            // Simplicial pairs come from ridge hashing; every other pair is visited once.
            let skip = excluded[j]
                || j == i
                || i_simplicial
                || (j < i && !j_simplicial);
            if skip || counts[j] < required {
                continue;
            }
            intersect_sorted(&rows_by_node[i], &rows_by_node[j], &mut face);
            if membership.third_node_covers(&face, i, j, active_nodes) {
                continue;
            }
            sink.add_undirected_edge(i, j);
        }
        for &j in &touched {
            counts[j] = 0;
        }
    }
}

/// Pairs of simplicial nodes (exactly `facet_len` rows) that share a ridge with no other
/// simplicial node.
fn simplicial_ridge_pairs(
    rows_by_node: &[Vec<usize>],
    facet_len: usize,
    excluded: &[bool],
) -> Vec<(usize, usize)> {
    if facet_len < 2 {
        return Vec::new();
    }
    let mut ridges: AHashMap<RidgeKey, SmallVec<[usize; 2]>> = AHashMap::new();
    for (node, rows) in rows_by_node.iter().enumerate() {
        if excluded[node] || rows.len() != facet_len {
            continue;
        }
        for drop in 0..facet_len {
            let key: RidgeKey = rows
                .iter()
                .enumerate()
                .filter(|&(pos, _)| pos != drop)
                .map(|(_, &row)| row)
                .collect();
            ridges.entry(key).or_default().push(node);
        }
    }
    let mut pairs: Vec<(usize, usize)> = ridges
        .into_values()
        .filter_map(|nodes| match nodes[..] {
            [a, b] if a != b => Some((a.min(b), a.max(b))),
            _ => None,
        })
        .collect();
    pairs.sort_unstable();
    pairs.dedup();
    pairs
}

#[cfg(test)]
mod tests {
    use super::{
        adjacency_from_incidence, adjacency_from_incidence_with, input_adjacency_from_incidence,
    };
    use crate::adjacency::AdjacencyListBuilder;
    use crate::set_family::SetFamily;
    use crate::types::RowSet;

    fn family(capacity: usize, sets: &[&[usize]]) -> SetFamily {
        SetFamily::from_sets(
            capacity,
            sets.iter()
                .map(|s| RowSet::from_indices(capacity, s))
                .collect(),
        )
    }

    #[test]
    fn square_facets_form_cycle() {
        // Facets of the unit square listed by the vertices they contain.
        let facets = family(4, &[&[0, 1], &[1, 3], &[2, 3], &[0, 2]]);
        let g = adjacency_from_incidence_with::<AdjacencyListBuilder>(&facets, 3, &[false; 4]);
        let degrees: Vec<usize> = g.adjacency_lists().iter().map(Vec::len).collect();
        assert_eq!(degrees, vec![2, 2, 2, 2]);
        assert!(g.contains(0, 1) && g.contains(0, 3) && !g.contains(0, 2));
    }

    #[test]
    fn non_simplicial_pyramid_apex() {
        // Square pyramid: vertices 0..4 are the base, 4 is the apex. Facets: base + 4 triangles.
        let facets = family(
            5,
            &[&[0, 1, 2, 3], &[0, 1, 4], &[1, 2, 4], &[2, 3, 4], &[3, 0, 4]],
        );
        let g = adjacency_from_incidence(&facets, 4, &[false; 5]);
        assert!(g.is_symmetric());
        assert_eq!(g.sets()[0].cardinality(), 4);
        assert_eq!(g.sets()[1].to_indices(), vec![0, 2, 4]);
    }

    #[test]
    fn excluded_nodes_are_isolated() {
        let facets = family(4, &[&[0, 1], &[1, 3], &[2, 3], &[0, 2]]);
        let g = adjacency_from_incidence(&facets, 3, &[true, false, false, false]);
        assert!(g.sets()[0].is_empty());
        assert_eq!(g.sets()[1].to_indices(), vec![2]);
    }

    #[test]
    fn input_adjacency_links_dominant_rows() {
        let incidence = family(2, &[&[0], &[1], &[0, 1]]);
        let classes = incidence.classify_input_incidence(&RowSet::new(3), 2);
        let g = input_adjacency_from_incidence(&incidence, &classes);
        assert_eq!(g.sets()[2].to_indices(), vec![0, 1]);
        assert_eq!(g.sets()[0].to_indices(), vec![1, 2]);
    }
}
