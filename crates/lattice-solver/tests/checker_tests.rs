use lattice_model::{Combination, TestModel, TupleList};
use lattice_solver::{ConstraintChecker, DynamicConstraintChecker};

fn forbidden_pair_model() -> TestModel {
    let forbidden = vec![TupleList::new(
        1,
        vec![0, 1],
        vec![vec![0, 0], vec![1, 1]],
    )];
    TestModel::new(2, vec![2, 2, 2], forbidden, vec![]).unwrap()
}

#[test]
fn test_reference_fixture() {
    // Parameter sizes [2,2,2], one forbidden tuple list on {0,1}
    // disallowing (0,0) and (1,1).
    let mut checker = ConstraintChecker::new(&forbidden_pair_model());

    assert!(checker.is_valid(&Combination::full(vec![1, 0, 1])).unwrap());
    assert!(!checker.is_valid(&Combination::full(vec![0, 0, 1])).unwrap());
    assert!(checker
        .is_extension_valid(&Combination::full(vec![1, 0]), 2, 0)
        .unwrap());
    assert!(!checker
        .is_extension_valid(&Combination::full(vec![0, 0]), 2, 0)
        .unwrap());
}

#[test]
fn test_forbidden_pair_rejected_in_any_context() {
    // Any full combination with position 0 = 1 and position 1 = 1 must be
    // rejected, whatever the rest of the row looks like.
    let mut checker = ConstraintChecker::new(&forbidden_pair_model());
    for third in 0..2 {
        assert!(!checker
            .is_valid(&Combination::full(vec![1, 1, third]))
            .unwrap());
    }
}

#[test]
fn test_accepted_rows_have_valid_prefixes() {
    // isValid(c) implies isExtensionValid for every prefix against the next
    // assigned position.
    let mut checker = ConstraintChecker::new(&forbidden_pair_model());
    let accepted = [[0u32, 1, 0], [1, 0, 1], [0, 1, 1], [1, 0, 0]];
    for row in accepted {
        assert!(checker.is_valid(&Combination::full(row.to_vec())).unwrap());
        let mut prefix = Combination::empty(3);
        for (p, &v) in row.iter().enumerate() {
            assert!(
                checker.is_extension_valid(&prefix, p, v).unwrap(),
                "prefix {prefix} should extend with {p}={v}"
            );
            prefix.set(p, v);
        }
    }
}

#[test]
fn test_empty_learned_constraint_makes_every_query_false() {
    let model = TestModel::new(2, vec![2, 2, 2], vec![], vec![]).unwrap();
    let mut checker = DynamicConstraintChecker::new(&model);
    checker.add_constraint(&Combination::empty(3)).unwrap();

    for a in 0..2u32 {
        for b in 0..2u32 {
            for c in 0..2u32 {
                assert!(!checker.is_valid(&Combination::full(vec![a, b, c])).unwrap());
            }
        }
    }
    assert!(!checker.is_valid(&Combination::empty(3)).unwrap());
}
