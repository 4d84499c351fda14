#![allow(dead_code)]

use polyhedra::prelude::*;

pub fn rat_rows(rows: &[&[i64]]) -> Vec<Vec<Rat>> {
    rows.iter()
        .map(|r| r.iter().map(|&v| Rat::from(v)).collect())
        .collect()
}

pub fn h_matrix(rows: &[&[i64]]) -> LpMatrix<Rat> {
    LpMatrix::from_rows(rat_rows(rows), false)
        .expect("rectangular rows")
        .with_representation(RepresentationKind::Inequality)
}

pub fn v_matrix(rows: &[&[i64]]) -> LpMatrix<Rat> {
    LpMatrix::from_rows(rat_rows(rows), false)
        .expect("rectangular rows")
        .with_representation(RepresentationKind::Generator)
}

pub fn sorted_rows<N: Num + Ord>(matrix: &LpMatrix<N>) -> Vec<Vec<N>> {
    let mut rows: Vec<Vec<N>> = matrix.rows().map(<[N]>::to_vec).collect();
    rows.sort();
    rows
}

pub fn square_h() -> LpMatrix<Rat> {
    h_matrix(&[&[1, 1, 0], &[1, 0, 1], &[1, -1, 0], &[1, 0, -1]])
}

pub fn cube_h() -> LpMatrix<Rat> {
    h_matrix(&[
        &[1, 1, 0, 0],
        &[1, -1, 0, 0],
        &[1, 0, 1, 0],
        &[1, 0, -1, 0],
        &[1, 0, 0, 1],
        &[1, 0, 0, -1],
    ])
}

pub fn cube_v() -> LpMatrix<Rat> {
    let mut rows = Vec::new();
    for x in [-1, 1] {
        for y in [-1, 1] {
            for z in [-1, 1] {
                rows.push(vec![1, x, y, z]);
            }
        }
    }
    let refs: Vec<&[i64]> = rows.iter().map(Vec::as_slice).collect();
    v_matrix(&refs)
}

pub fn degrees(family: &SetFamily) -> Vec<usize> {
    family.sets().iter().map(RowSet::cardinality).collect()
}
