//! Property tests over random integer point sets and inequality systems.

#[path = "support/common.rs"]
mod common;

use std::collections::BTreeSet;

use common::sorted_rows;
use polyhedra::prelude::*;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

fn points_strategy(dim: usize) -> impl Strategy<Value = Vec<Vec<i64>>> {
    prop::collection::vec(prop::collection::vec(-4i64..=4, dim), 1..9)
}

fn distinct_points(dim: usize) -> impl Strategy<Value = Vec<Vec<i64>>> {
    points_strategy(dim).prop_map(|mut points| {
        points.sort();
        points.dedup();
        points
    })
}

/// Rows of `[b, a]` over three coordinates, each flagged linear with low probability.
fn inequality_system() -> impl Strategy<Value = Vec<(Vec<i64>, bool)>> {
    prop::collection::vec(
        (prop::collection::vec(-3i64..=3, 4), prop::bool::weighted(0.25)),
        1..6,
    )
}

fn generators(points: &[Vec<i64>]) -> LpMatrix<Rat> {
    let rows = points
        .iter()
        .map(|p| {
            std::iter::once(Rat::from(1))
                .chain(p.iter().map(|&v| Rat::from(v)))
                .collect()
        })
        .collect();
    LpMatrix::from_rows(rows, false)
        .expect("rectangular rows")
        .with_representation(RepresentationKind::Generator)
}

fn inequalities(rows: &[(Vec<i64>, bool)]) -> LpMatrix<Rat> {
    rows.iter()
        .fold(LpMatrix::builder(4), |builder, (row, linear)| {
            let row: Vec<Rat> = row.iter().map(|&v| Rat::from(v)).collect();
            builder.push_row(row, *linear)
        })
        .inequalities()
        .build()
}

fn dot(a: &[Rat], b: &[Rat]) -> Rat {
    a.iter().zip(b).fold(Rat::from(0), |acc, (x, y)| acc + x * y)
}

fn positively_proportional(a: &[Rat], b: &[Rat]) -> bool {
    let zero = Rat::from(0);
    let Some(k) = a.iter().position(|v| *v != zero) else {
        return b.iter().all(|v| *v == zero);
    };
    b[k] != zero
        && (a[k] > zero) == (b[k] > zero)
        && a.iter().zip(b).all(|(x, y)| x * &b[k] == y * &a[k])
}

fn has_proportional_pair(matrix: &LpMatrix<Rat>) -> bool {
    let rows: Vec<&[Rat]> = matrix.rows().collect();
    rows.iter()
        .enumerate()
        .any(|(i, a)| rows[i + 1..].iter().any(|b| positively_proportional(a, b)))
}

fn reversed(matrix: &LpMatrix<Rat>) -> LpMatrix<Rat> {
    let order: Vec<Row> = (0..matrix.row_count()).rev().collect();
    matrix.select_rows(&order)
}

/// Redundant and implicit rows, each in input indices.
fn classification(matrix: &LpMatrix<Rat>) -> (BTreeSet<usize>, BTreeSet<usize>) {
    let (redundant, implicit) = matrix
        .clone()
        .canonicalize()
        .expect("canonicalize succeeds");
    (
        redundant.iter().raw().collect(),
        implicit.iter().raw().collect(),
    )
}

/// Classifies `matrix` in its given and reversed row order and compares the outcomes.
///
/// Implicit equalities may keep a different representative, so only their count must agree.
fn assert_order_independent(matrix: &LpMatrix<Rat>) -> Result<(), TestCaseError> {
    let m = matrix.row_count();
    let (redundant, implicit) = classification(matrix);
    let (rev_redundant, rev_implicit) = classification(&reversed(matrix));
    let back = |set: BTreeSet<usize>| -> BTreeSet<usize> {
        set.into_iter().map(|i| m - 1 - i).collect()
    };
    let (rev_redundant, rev_implicit) = (back(rev_redundant), back(rev_implicit));

    prop_assert_eq!(&rev_implicit, &implicit);
    prop_assert_eq!(rev_redundant.len(), redundant.len());
    prop_assert_eq!(
        rev_redundant.difference(&implicit).collect::<Vec<_>>(),
        redundant.difference(&implicit).collect::<Vec<_>>()
    );
    Ok(())
}

/// Every generator lies in the region cut out by `constraints`.
fn assert_generators_satisfy(
    generators: &LpMatrix<Rat>,
    constraints: &LpMatrix<Rat>,
) -> Result<(), TestCaseError> {
    let zero = Rat::from(0);
    for (g, generator) in generators.rows().enumerate() {
        for (r, row) in constraints.rows().enumerate() {
            let value = dot(row, generator);
            if generators.is_linearity(g) || constraints.is_linearity(r) {
                prop_assert_eq!(&value, &zero, "generator {} on row {}", g, r);
            } else {
                prop_assert!(value >= zero, "generator {} violates row {}", g, r);
            }
        }
    }
    Ok(())
}

fn canonical(mut matrix: LpMatrix<Rat>) -> LpMatrix<Rat> {
    matrix.canonicalize().expect("canonicalize succeeds");
    matrix
}

fn assert_graphs_symmetric(poly: &Polyhedron<Rat>) {
    assert!(poly.source_adjacency().is_symmetric());
    assert!(poly.dual_adjacency().is_symmetric());
    assert_eq!(poly.source_incidence().transpose(), *poly.dual_incidence());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn vertices_survive_a_round_trip_in_the_plane(points in points_strategy(2)) {
        let source = generators(&points);
        let facets = Polyhedron::new(&source).expect("V to H");
        let vertices = Polyhedron::new(facets.dual()).expect("H to V");
        prop_assert_eq!(vertices.status(), ComputationStatus::AllFound);
        prop_assert_eq!(
            sorted_rows(&canonical(vertices.dual().clone())),
            sorted_rows(&canonical(source))
        );
    }

    #[test]
    fn vertices_survive_a_round_trip_in_space(points in points_strategy(3)) {
        let source = generators(&points);
        let facets = Polyhedron::new(&source).expect("V to H");
        let vertices = Polyhedron::new(facets.dual()).expect("H to V");
        prop_assert_eq!(
            sorted_rows(&canonical(vertices.dual().clone())),
            sorted_rows(&canonical(source))
        );
    }

    #[test]
    fn graphs_are_symmetric_and_match_recomputation(points in points_strategy(3)) {
        let source = generators(&points);
        let poly = Polyhedron::new(&source).expect("V to H");
        assert_graphs_symmetric(&poly);
        let back = Polyhedron::new(poly.dual()).expect("H to V");
        assert_graphs_symmetric(&back);

        let recomputed = Polyhedron::builder(&source)
            .options(PolyhedronOptions { graphs: GraphSource::Recompute })
            .build()
            .expect("V to H");
        prop_assert_eq!(recomputed.graphs(), poly.graphs());
    }

    #[test]
    fn canonicalization_is_idempotent(points in points_strategy(3)) {
        let facets = Polyhedron::new(&generators(&points)).expect("V to H");
        for matrix in [generators(&points), facets.dual().clone()] {
            let once = canonical(matrix);
            let mut twice = once.clone();
            let (redundant, implicit) = twice.canonicalize().expect("canonicalize succeeds");
            prop_assert!(redundant.is_empty());
            prop_assert!(implicit.is_empty());
            prop_assert_eq!(twice, once);
        }
    }

    #[test]
    fn adjacency_tests_agree(points in points_strategy(3)) {
        let source = generators(&points);
        let with = |test: AdjacencyTest| {
            let options = ConeOptions::builder().adjacency_test(test).finish();
            Polyhedron::builder(&source)
                .cone_options(options)
                .build()
                .expect("V to H")
        };
        let algebraic = with(AdjacencyTest::Algebraic);
        let combinatorial = with(AdjacencyTest::Combinatorial);
        prop_assert_eq!(algebraic.dual(), combinatorial.dual());
        prop_assert_eq!(algebraic.graphs(), combinatorial.graphs());
    }

    #[test]
    fn redundancy_ignores_generator_order(points in distinct_points(3)) {
        assert_order_independent(&generators(&points))?;
    }

    #[test]
    fn redundancy_ignores_inequality_order(points in distinct_points(3)) {
        let facets = Polyhedron::new(&generators(&points)).expect("V to H");
        prop_assume!(facets.dual().lin_set().is_empty());

        // Lift into a fourth coordinate pinned to zero by a pair of opposite inequalities.
        let lift = |row: &[Rat]| -> Vec<Rat> {
            row.iter().cloned().chain(std::iter::once(Rat::from(0))).collect()
        };
        let facet_rows: Vec<Vec<Rat>> = facets.dual().rows().map(lift).collect();
        let mut rows = facet_rows.clone();
        for pair in facet_rows.windows(2) {
            rows.push(pair[0].iter().zip(&pair[1]).map(|(a, b)| a + b).collect());
        }
        let mut pin = vec![Rat::from(0); 5];
        pin[4] = Rat::from(1);
        rows.insert(rows.len() / 2, pin.iter().map(|v| -v).collect());
        rows.push(pin);

        let system = LpMatrix::from_rows(rows, false)
            .expect("rectangular rows")
            .with_representation(RepresentationKind::Inequality);
        prop_assume!(!has_proportional_pair(&system));
        let (_, implicit) = classification(&system);
        prop_assert_eq!(implicit.len(), 2);
        assert_order_independent(&system)?;
    }

    #[test]
    fn inequalities_survive_a_round_trip(rows in inequality_system()) {
        let source = inequalities(&rows);
        let poly = Polyhedron::new(&source).expect("H to V");
        prop_assume!(!poly.is_empty());
        let generators = poly.dual();
        assert_generators_satisfy(generators, &source)?;

        let facets = Polyhedron::new(generators).expect("V to H");
        assert_generators_satisfy(generators, facets.dual())?;
        let regenerated = Polyhedron::new(facets.dual()).expect("H to V");
        assert_generators_satisfy(regenerated.dual(), &source)?;
    }
}
