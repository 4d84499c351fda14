use polyhedra_core::{AdjacencyList, Graph, RowSet, SetFamily};

#[test]
fn graph_distances_and_diameter_on_cycle4() {
    let graph = AdjacencyList::from_sorted_adjacency_lists(vec![
        vec![1, 3],
        vec![0, 2],
        vec![1, 3],
        vec![0, 2],
    ]);

    let expected = [
        [0usize, 1, 2, 1],
        [1usize, 0, 1, 2],
        [2usize, 1, 0, 1],
        [1usize, 2, 1, 0],
    ];

    for (i, row) in expected.iter().enumerate() {
        for (j, expected_dist) in row.iter().copied().enumerate() {
            assert_eq!(graph.distance(i, j).unwrap(), expected_dist);
        }
    }
    assert_eq!(graph.diameter().unwrap(), 2);
}

#[test]
fn bitset_and_list_graphs_agree() {
    let sets = vec![
        RowSet::from_indices(3, &[1, 2]),
        RowSet::from_indices(3, &[0]),
        RowSet::from_indices(3, &[0]),
    ];
    let family = SetFamily::from_sets(3, sets);
    let list = AdjacencyList::from(&family);

    for v in 0..3 {
        assert_eq!(Graph::degree(&family, v), Graph::degree(&list, v));
        let a: Vec<usize> = Graph::neighbors(&family, v).collect();
        let b: Vec<usize> = Graph::neighbors(&list, v).collect();
        assert_eq!(a, b);
    }
    assert_eq!(list.distance(1, 2), Some(2));
}
