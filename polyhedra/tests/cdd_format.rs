#[path = "support/common.rs"]
mod common;

use common::{cube_v, square_h};
use polyhedra::prelude::*;

#[test]
fn square_is_written_in_cdd_layout() {
    let text = square_h().to_cdd_string();
    assert_eq!(
        text,
        "H-representation\nbegin\n 4 3 rational\n 1 1 0\n 1 0 1\n 1 -1 0\n 1 0 -1\nend\n"
    );
}

#[test]
fn converted_duals_survive_a_text_round_trip() {
    for matrix in [square_h(), cube_v()] {
        let poly = Polyhedron::new(&matrix).expect("conversion succeeds");
        let text = poly.dual().to_string();
        let back = polyhedra::cdd::parse::<Rat>(&text).expect("text parses");
        assert_eq!(&back, poly.dual());
    }
}

#[test]
fn linearity_and_objective_are_preserved() {
    let text = "\
* a slab with a declared equality
H-representation
linearity 1 3
begin
 3 3 rational
 1 1 0
 1 -1 0
 0 0 1
end
minimize
 0 1/2 1
";
    let parsed: AnyMatrix = text.parse().expect("text parses");
    assert_eq!(parsed.representation(), Some(RepresentationKind::Inequality));
    assert_eq!(parsed.lin_set().into_iter().collect::<Vec<_>>(), vec![2]);
    assert_eq!(parsed.objective(), LpObjective::Minimize);
    assert_eq!(parsed.objective_row().to_string(), "0 1/2 1");

    let reparsed: AnyMatrix = parsed.to_string().parse().expect("round trip parses");
    assert_eq!(reparsed, parsed);
}

#[test]
fn float_documents_keep_their_kind() {
    let text = "V-representation\nbegin\n 2 3 real\n 1 0.25 0\n 1 -0.5 2\nend\n";
    let parsed: AnyMatrix = text.parse().expect("text parses");
    assert_eq!(parsed.number_kind(), NumberKind::Float);
    assert_eq!(parsed.row(1).expect("row exists"), AnyRow::Float(&[1.0, -0.5, 2.0]));
    let reparsed: AnyMatrix = parsed.to_string().parse().expect("round trip parses");
    assert_eq!(reparsed, parsed);
}

#[test]
fn unknown_number_type_is_a_parse_error() {
    let err = "begin\n 1 2 complex\n 1 0\nend\n"
        .parse::<AnyMatrix>()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(matches!(err, PolyhedraError::Parse { line: 2, .. }));
}
