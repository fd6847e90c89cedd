//! Full pipeline: plan generation, execution, and failure characterization.

use lattice_engine::{plan, EngineError, PlanConfig, Session};
use lattice_locate::{Oracle, OracleError, Verdict};
use lattice_model::{Combination, TestModel};

struct PairFaultOracle;

impl Oracle for PairFaultOracle {
    fn execute(&mut self, input: &Combination) -> Result<Verdict, OracleError> {
        if input.get(0) == Some(1) && input.get(1) == Some(1) {
            Ok(Verdict::Fail {
                condition: Some("pair".into()),
            })
        } else {
            Ok(Verdict::Pass)
        }
    }
}

#[test]
fn test_clean_run_reports_no_faults() {
    struct AllPass;
    impl Oracle for AllPass {
        fn execute(&mut self, _input: &Combination) -> Result<Verdict, OracleError> {
            Ok(Verdict::Pass)
        }
    }

    let model = TestModel::new(2, vec![2, 2, 2], vec![], vec![]).unwrap();
    let test_plan = plan(&model, &PlanConfig::default()).unwrap();
    let report = Session::new(&model, test_plan).run(&mut AllPass).unwrap();

    assert_eq!(report.passed, report.executed);
    assert!(report.failed.is_empty());
    assert!(report.faults.is_empty());
}

#[test]
fn test_failing_pair_is_characterized_once() {
    let model = TestModel::new(2, vec![2, 2, 2], vec![], vec![]).unwrap();
    let test_plan = plan(&model, &PlanConfig::default()).unwrap();
    assert!(test_plan.complete);

    let report = Session::new(&model, test_plan)
        .run(&mut PairFaultOracle)
        .unwrap();

    // A complete pairwise plan must exercise the faulty pair.
    assert!(!report.failed.is_empty());
    assert_eq!(report.passed + report.failed.len(), report.executed);

    let expected = Combination::from_slots(vec![Some(1), Some(1), None]);
    assert_eq!(report.faults.len(), 1);
    assert_eq!(report.faults[0].combination, expected);

    let groups = report.group_by_condition();
    assert_eq!(groups[&Some("pair".to_string())], vec![expected]);
}

#[test]
fn test_oracle_error_aborts_run() {
    struct Broken;
    impl Oracle for Broken {
        fn execute(&mut self, _input: &Combination) -> Result<Verdict, OracleError> {
            Err(OracleError::Timeout { seconds: 30 })
        }
    }

    let model = TestModel::new(2, vec![2, 2], vec![], vec![]).unwrap();
    let test_plan = plan(&model, &PlanConfig::default()).unwrap();
    let err = Session::new(&model, test_plan).run(&mut Broken).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Oracle(OracleError::Timeout { seconds: 30 })
    ));
}
