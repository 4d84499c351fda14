use polyhedra_core::adjacency::{adjacency_from_incidence, input_adjacency_from_incidence};
use polyhedra_core::{RowSet, SetFamily};

fn family(capacity: usize, sets: &[&[usize]]) -> SetFamily {
    SetFamily::from_sets(
        capacity,
        sets.iter()
            .map(|s| RowSet::from_indices(capacity, s))
            .collect(),
    )
}

/// Unit cube: facets by the vertices they contain, vertex `i` has coordinates from its bits.
fn cube_facets() -> SetFamily {
    let facets: Vec<Vec<usize>> = (0..3)
        .flat_map(|axis| {
            [0usize, 1].map(|side| {
                (0..8usize)
                    .filter(|v| (v >> axis) & 1 == side)
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    let refs: Vec<&[usize]> = facets.iter().map(Vec::as_slice).collect();
    family(8, &refs)
}

#[test]
fn cube_vertex_graph_from_transposed_incidence() {
    let vertex_incidence = cube_facets().transpose();
    let graph = adjacency_from_incidence(&vertex_incidence, 4, &[false; 8]);
    assert!(graph.is_symmetric());
    for v in 0..8 {
        let expected: Vec<usize> = (0..3).map(|axis| v ^ (1 << axis)).collect();
        let mut expected = expected;
        expected.sort_unstable();
        assert_eq!(graph.sets()[v].to_indices(), expected);
    }
}

#[test]
fn cube_facet_graph_skips_opposite_faces() {
    let facets = cube_facets();
    let classes = facets.classify_input_incidence(&RowSet::new(6), 8);
    assert!(classes.redundant.is_empty());
    let graph = input_adjacency_from_incidence(&facets, &classes);
    for f in 0..6 {
        let opposite = f ^ 1;
        assert_eq!(graph.sets()[f].cardinality(), 4);
        assert!(!graph.sets()[f].contains(opposite));
    }
}
